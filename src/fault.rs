//! The error channel of an [`AsyncResult`](crate::AsyncResult).
//!
//! A failed result holds a [`Fault`]: either one of the declared error kinds
//! ([`Fault::Known`]) or an [`UnknownError`] ([`Fault::Unknown`]) standing in
//! for a panic that escaped user code.
//!
//! # Example
//!
//! ```rust
//! use tideline::{Fault, UnknownError};
//!
//! let fault: Fault<&str> = Fault::Known("not found");
//! assert!(fault.is_known());
//! assert_eq!(fault.to_string(), "not found");
//!
//! let fault: Fault<&str> = Fault::Unknown(UnknownError::new(Box::new("boom")));
//! assert_eq!(fault.unknown().and_then(|e| e.message().map(String::from)), Some("boom".to_string()));
//! ```

use std::any::Any;
use std::error::Error as StdError;
use std::fmt;

use crate::union::{ErrorSet, Member};

/// The raw payload a failed result rejects with.
///
/// Either the active error kind itself or the original panic payload.
pub type Rejection = Box<dyn Any + Send>;

/// A panic captured inside a result chain.
///
/// Created only when a mapper, a factory, or an awaited future panics. The
/// original panic payload is kept as the cause so it can be inspected or
/// rethrown with [`resume`](UnknownError::resume).
pub struct UnknownError {
    cause: Rejection,
}

impl UnknownError {
    /// Wrap a panic payload.
    pub fn new(cause: Rejection) -> Self {
        UnknownError { cause }
    }

    /// Borrow the original payload.
    pub fn cause(&self) -> &(dyn Any + Send) {
        &*self.cause
    }

    /// Take the original payload.
    pub fn into_cause(self) -> Rejection {
        self.cause
    }

    /// Returns `true` if the payload is a `T`.
    pub fn cause_is<T: Any>(&self) -> bool {
        self.cause.is::<T>()
    }

    /// The panic message, when the payload is a string.
    ///
    /// `panic!("literal")` carries a `&'static str`, formatted panics carry a
    /// `String`; both are recognised.
    pub fn message(&self) -> Option<&str> {
        if let Some(message) = self.cause.downcast_ref::<&'static str>() {
            Some(*message)
        } else {
            self.cause.downcast_ref::<String>().map(String::as_str)
        }
    }

    /// Continue the original panic.
    pub fn resume(self) -> ! {
        std::panic::resume_unwind(self.cause)
    }
}

impl fmt::Debug for UnknownError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnknownError")
            .field("cause", &self.message().unwrap_or("<non-string payload>"))
            .finish()
    }
}

impl fmt::Display for UnknownError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.message() {
            Some(message) => write!(f, "unknown error: {}", message),
            None => write!(f, "unknown error"),
        }
    }
}

impl StdError for UnknownError {}

/// Why a result failed.
pub enum Fault<E> {
    /// One of the declared error kinds.
    Known(E),
    /// A captured panic.
    Unknown(UnknownError),
}

impl<E> Fault<E> {
    /// Returns `true` for a declared error kind.
    pub fn is_known(&self) -> bool {
        matches!(self, Fault::Known(_))
    }

    /// Returns `true` for a captured panic.
    pub fn is_unknown(&self) -> bool {
        matches!(self, Fault::Unknown(_))
    }

    /// The declared error, if any.
    pub fn known(self) -> Option<E> {
        match self {
            Fault::Known(error) => Some(error),
            Fault::Unknown(_) => None,
        }
    }

    /// The captured panic, if any.
    pub fn unknown(self) -> Option<UnknownError> {
        match self {
            Fault::Known(_) => None,
            Fault::Unknown(error) => Some(error),
        }
    }

    /// Borrow the declared error, if any.
    pub fn as_known(&self) -> Option<&E> {
        match self {
            Fault::Known(error) => Some(error),
            Fault::Unknown(_) => None,
        }
    }

    /// Borrow the captured panic, if any.
    pub fn as_unknown(&self) -> Option<&UnknownError> {
        match self {
            Fault::Known(_) => None,
            Fault::Unknown(error) => Some(error),
        }
    }

    /// Transform the declared error, leaving a captured panic untouched.
    pub fn map_known<E2>(self, f: impl FnOnce(E) -> E2) -> Fault<E2> {
        match self {
            Fault::Known(error) => Fault::Known(f(error)),
            Fault::Unknown(error) => Fault::Unknown(error),
        }
    }

    /// Borrow the declared error if it is of kind `K`.
    pub fn kind<K, I>(&self) -> Option<&K>
    where
        E: Member<K, I>,
    {
        self.as_known()
            .and_then(|error| <E as Member<K, I>>::peek(error))
    }
}

impl<E: ErrorSet> Fault<E> {
    /// Hand the fault out as a raw payload.
    ///
    /// A declared error yields the bare kind; a captured panic yields its
    /// original cause, not the `UnknownError` wrapper.
    pub fn into_rejection(self) -> Rejection {
        match self {
            Fault::Known(error) => error.into_rejection(),
            Fault::Unknown(error) => error.into_cause(),
        }
    }
}

impl<E: fmt::Debug> fmt::Debug for Fault<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fault::Known(error) => f.debug_tuple("Known").field(error).finish(),
            Fault::Unknown(error) => f.debug_tuple("Unknown").field(error).finish(),
        }
    }
}

impl<E: fmt::Display> fmt::Display for Fault<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fault::Known(error) => error.fmt(f),
            Fault::Unknown(error) => error.fmt(f),
        }
    }
}

impl<E: StdError + 'static> StdError for Fault<E> {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Fault::Known(error) => Some(error),
            Fault::Unknown(error) => Some(error),
        }
    }
}

impl<E> From<UnknownError> for Fault<E> {
    fn from(error: UnknownError) -> Self {
        Fault::Unknown(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::union::OneOf;

    #[derive(Debug, PartialEq)]
    struct NotFound;
    #[derive(Debug, PartialEq)]
    struct Timeout;

    type Kinds = crate::Errors![NotFound, Timeout];

    #[test]
    fn test_message_from_static_str_payload() {
        let error = UnknownError::new(Box::new("boom"));
        assert_eq!(error.message(), Some("boom"));
        assert!(error.cause_is::<&str>());
    }

    #[test]
    fn test_message_from_string_payload() {
        let error = UnknownError::new(Box::new(format!("boom {}", 42)));
        assert_eq!(error.message(), Some("boom 42"));
        assert_eq!(error.to_string(), "unknown error: boom 42");
    }

    #[test]
    fn test_message_absent_for_other_payloads() {
        let error = UnknownError::new(Box::new(7_u8));
        assert_eq!(error.message(), None);
        assert_eq!(error.to_string(), "unknown error");
        assert_eq!(error.into_cause().downcast_ref::<u8>(), Some(&7));
    }

    #[test]
    fn test_resume_continues_the_panic() {
        let error = UnknownError::new(Box::new("again"));
        let caught = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| error.resume()));
        let payload = caught.expect_err("resume must panic");
        assert_eq!(payload.downcast_ref::<&str>(), Some(&"again"));
    }

    #[test]
    fn test_kind_finds_declared_error() {
        let fault: Fault<Kinds> = Fault::Known(OneOf::inject(Timeout));
        assert_eq!(fault.kind::<Timeout, _>(), Some(&Timeout));
        assert_eq!(fault.kind::<NotFound, _>(), None);
    }

    #[test]
    fn test_rejection_of_known_is_the_bare_kind() {
        let fault: Fault<Kinds> = Fault::Known(OneOf::inject(NotFound));
        let payload = fault.into_rejection();
        assert_eq!(payload.downcast_ref::<NotFound>(), Some(&NotFound));
    }

    #[test]
    fn test_rejection_of_unknown_is_the_cause() {
        let fault: Fault<Kinds> = Fault::Unknown(UnknownError::new(Box::new("boom")));
        let payload = fault.into_rejection();
        assert!(payload.downcast_ref::<UnknownError>().is_none());
        assert_eq!(payload.downcast_ref::<&str>(), Some(&"boom"));
    }

    #[test]
    fn test_map_known_skips_unknown() {
        let fault: Fault<u32> = Fault::Unknown(UnknownError::new(Box::new("boom")));
        let mapped = fault.map_known(|n| n + 1);
        assert!(mapped.is_unknown());

        let fault: Fault<u32> = Fault::Known(1);
        assert_eq!(fault.map_known(|n| n + 1).known(), Some(2));
    }
}
