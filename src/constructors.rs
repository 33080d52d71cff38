//! Constructor functions for creating results.
//!
//! These functions provide ergonomic ways to create results without naming
//! the error set up front.

use std::future::Future;
use std::sync::Arc;

use crate::result::AsyncResult;
use crate::union::{Never, OneOf};
use crate::wrapper::{capture, normalize, IntoResult};

/// Create a result that succeeds with the given value.
///
/// The error set is empty, so the result can be consumed with
/// [`promise`](AsyncResult::promise) directly.
///
/// # Example
///
/// ```rust
/// use tideline::ok;
///
/// # tokio_test::block_on(async {
/// assert_eq!(ok(42).promise().await.ok(), Some(42));
/// # });
/// ```
pub fn ok<V>(value: V) -> AsyncResult<V, Never>
where
    V: Send + 'static,
{
    AsyncResult::ok(value)
}

/// Create a result that fails with the given error kind.
///
/// The kind is stored as-is; it is never inspected.
///
/// # Example
///
/// ```rust
/// use tideline::{err, Errors, AsyncResult};
///
/// #[derive(Debug)]
/// struct NotFound;
///
/// let result: AsyncResult<u32, Errors![NotFound]> = err(NotFound);
/// ```
pub fn err<V, K>(kind: K) -> AsyncResult<V, OneOf<K, Never>>
where
    V: Send + 'static,
    K: Send + 'static,
{
    AsyncResult::fail(OneOf::Here(kind))
}

/// Create a result from a synchronous function returning a plain value.
///
/// The function runs when the result is first polled. A panic settles the
/// result with an [`UnknownError`](crate::UnknownError).
///
/// # Example
///
/// ```rust
/// use tideline::from_fn;
///
/// # tokio_test::block_on(async {
/// let failed = from_fn(|| -> i32 { panic!("boom") });
/// let payload = failed.unsafe_promise().await.err().unwrap();
/// assert_eq!(payload.downcast_ref::<&str>(), Some(&"boom"));
/// # });
/// ```
pub fn from_fn<V, F>(f: F) -> AsyncResult<V, Never>
where
    F: FnOnce() -> V + Send + 'static,
    V: Send + 'static,
{
    AsyncResult::from_wrapper_future(capture(async move { Ok(f()) }))
}

/// Create a result from an async function returning a plain value.
///
/// ```rust,ignore
/// let body = from_async(|| async { fetch_body().await });
/// ```
pub fn from_async<V, F, Fut>(f: F) -> AsyncResult<V, Never>
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = V> + Send + 'static,
    V: Send + 'static,
{
    AsyncResult::from_wrapper_future(capture(async move { Ok(f().await) }))
}

/// Create a result from a factory that returns a result.
///
/// The factory may return an [`AsyncResult`], a `std::result::Result`, or a
/// future of either; its outcome is adopted as-is. Synchronous panics and
/// panics while awaiting are captured the same way.
///
/// # Example
///
/// ```rust
/// use tideline::{from_result, AsyncResult, Errors};
///
/// #[derive(Debug, PartialEq)]
/// struct ParseFailed;
///
/// # tokio_test::block_on(async {
/// let parsed: AsyncResult<u8, Errors![ParseFailed]> =
///     from_result(|| "7".parse::<u8>().map_err(|_| ParseFailed));
/// assert_eq!(parsed.settle().await.ok(), Some(7));
/// # });
/// ```
pub fn from_result<R, M, P>(factory: P) -> AsyncResult<R::Value, R::Error>
where
    P: FnOnce() -> R + Send + 'static,
    R: IntoResult<M>,
{
    AsyncResult::from_wrapper_future(normalize::<R, M, _>(factory))
}

/// Wrap a function so every call returns a result.
///
/// `f` returns anything [`from_result`] accepts. Functions of several
/// arguments take them as a tuple.
///
/// # Example
///
/// ```rust
/// use tideline::resultify;
///
/// #[derive(Debug)]
/// struct DivideByZero;
///
/// let divide = resultify(|(a, b): (i32, i32)| {
///     if b == 0 { Err(DivideByZero) } else { Ok(a / b) }
/// });
///
/// # tokio_test::block_on(async {
/// assert_eq!(divide((10, 2)).settle().await.ok(), Some(5));
/// assert!(divide((1, 0)).settle().await.is_err());
/// # });
/// ```
pub fn resultify<A, R, M, F>(f: F) -> impl Fn(A) -> AsyncResult<R::Value, R::Error>
where
    F: Fn(A) -> R + Send + Sync + 'static,
    A: Send + 'static,
    R: IntoResult<M>,
{
    let f = Arc::new(f);
    move |args| {
        let f = Arc::clone(&f);
        from_result::<R, M, _>(move || f(args))
    }
}

/// Wrap a function returning a plain value so every call returns a result.
///
/// A panic inside `f` settles that call's result with an
/// [`UnknownError`](crate::UnknownError).
pub fn resultify_value<A, V, F>(f: F) -> impl Fn(A) -> AsyncResult<V, Never>
where
    F: Fn(A) -> V + Send + Sync + 'static,
    A: Send + 'static,
    V: Send + 'static,
{
    let f = Arc::new(f);
    move |args| {
        let f = Arc::clone(&f);
        from_fn(move || f(args))
    }
}
