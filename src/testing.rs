//! Assertion macros for testing code that returns results.
//!
//! Every macro settles the result with `.await`, so they are used inside
//! async tests. Each one evaluates to the part it asserted on, ready for
//! further checks.
//!
//! # Example
//!
//! ```rust
//! use tideline::{assert_err, assert_ok, ok, AsyncResult, Errors};
//!
//! #[derive(Debug, PartialEq)]
//! struct NotFound;
//!
//! # tokio_test::block_on(async {
//! assert_ok!(ok(21).map(|v| v * 2), 42);
//!
//! let missing = AsyncResult::<i32, Errors![NotFound]>::err(NotFound);
//! assert_eq!(assert_err!(missing, NotFound), NotFound);
//! # });
//! ```

/// Assert that a result succeeds.
///
/// With one argument, evaluates to the success value. With two, also
/// compares it to the expected value.
///
/// # Example
///
/// ```rust
/// use tideline::{assert_ok, ok};
///
/// # tokio_test::block_on(async {
/// let value = assert_ok!(ok("ready"));
/// assert_eq!(value, "ready");
/// # });
/// ```
#[macro_export]
macro_rules! assert_ok {
    ($result:expr) => {
        match $result.settle().await {
            ::std::result::Result::Ok(value) => value,
            ::std::result::Result::Err(fault) => {
                panic!("Expected Ok, got Err: {:?}", fault);
            }
        }
    };
    ($result:expr, $expected:expr) => {
        assert_eq!($crate::assert_ok!($result), $expected)
    };
}

/// Assert that a result fails with a declared error.
///
/// With one argument, evaluates to the whole error set value. With a kind,
/// also checks that the active kind is that one and evaluates to it.
///
/// # Example
///
/// ```rust
/// use tideline::{assert_err, AsyncResult, Errors};
///
/// #[derive(Debug)]
/// struct Timeout(u32);
///
/// # tokio_test::block_on(async {
/// let slow = AsyncResult::<(), Errors![Timeout]>::err(Timeout(30));
/// let Timeout(seconds) = assert_err!(slow, Timeout);
/// assert_eq!(seconds, 30);
/// # });
/// ```
#[macro_export]
macro_rules! assert_err {
    ($result:expr) => {
        match $result.settle().await {
            ::std::result::Result::Err($crate::Fault::Known(error)) => error,
            ::std::result::Result::Err($crate::Fault::Unknown(error)) => {
                panic!("Expected a declared error, got {:?}", error);
            }
            ::std::result::Result::Ok(value) => {
                panic!("Expected Err, got Ok: {:?}", value);
            }
        }
    };
    ($result:expr, $kind:ty) => {
        match <_ as $crate::Member<$kind, _>>::pluck($crate::assert_err!($result)) {
            ::std::result::Result::Ok(kind) => kind,
            ::std::result::Result::Err(other) => {
                panic!("Expected {}, got {:?}", stringify!($kind), other);
            }
        }
    };
}

/// Assert that a result failed with a captured panic.
///
/// Evaluates to the [`UnknownError`](crate::UnknownError).
///
/// # Example
///
/// ```rust
/// use tideline::{assert_unknown, from_fn};
///
/// # tokio_test::block_on(async {
/// let error = assert_unknown!(from_fn(|| -> u8 { panic!("overflow") }));
/// assert_eq!(error.message(), Some("overflow"));
/// # });
/// ```
#[macro_export]
macro_rules! assert_unknown {
    ($result:expr) => {
        match $result.settle().await {
            ::std::result::Result::Err($crate::Fault::Unknown(error)) => error,
            ::std::result::Result::Err($crate::Fault::Known(error)) => {
                panic!("Expected an unknown error, got {:?}", error);
            }
            ::std::result::Result::Ok(value) => {
                panic!("Expected Err, got Ok: {:?}", value);
            }
        }
    };
}
