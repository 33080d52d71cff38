//! Tracing support for results.
//!
//! With the `tracing` feature enabled the library emits:
//!
//! - a `WARN` event whenever a panic is captured as an
//!   [`UnknownError`](crate::UnknownError);
//! - `TRACE` events when [`map_err`](crate::AsyncResult::map_err) matches a
//!   kind, when [`map_any_err`](crate::AsyncResult::map_any_err) handles a
//!   fault, and when [`combine`](crate::combine) selects the first error.
//!
//! [`ResultTracingExt::instrument`] runs a result's whole pending chain inside
//! a span.

use crate::result::AsyncResult;

/// Extension trait for adding tracing instrumentation to results.
///
/// This trait is only available when the `tracing` feature is enabled.
pub trait ResultTracingExt: Sized {
    /// Run everything attached so far inside `span`.
    ///
    /// The span is entered each time the chain is polled and exited when it
    /// yields. Stages attached after this call run outside the span.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use tideline::{ok, ResultTracingExt};
    /// use tracing::info_span;
    ///
    /// let user = fetch_user(id)
    ///     .map(|user| user.name)
    ///     .instrument(info_span!("fetch_user", %id));
    /// ```
    fn instrument(self, span: tracing::Span) -> Self;
}

impl<V, E> ResultTracingExt for AsyncResult<V, E>
where
    V: Send + 'static,
    E: Send + 'static,
{
    fn instrument(self, span: tracing::Span) -> Self {
        AsyncResult::from_wrapper_future(tracing::Instrument::instrument(self.into_inner(), span))
    }
}

#[cfg(test)]
mod tests {
    use tracing_test::traced_test;

    use super::*;
    use crate::{combine, ok, Errors, Fault};

    #[derive(Debug, PartialEq)]
    struct NotFound;

    #[tokio::test]
    async fn test_instrument_returns_value() {
        let result = ok(42).instrument(tracing::info_span!("test_span"));
        assert_eq!(result.promise().await.ok(), Some(42));
    }

    #[tokio::test]
    async fn test_error_in_span_propagates() {
        let result = AsyncResult::<i32, Errors![NotFound]>::err(NotFound)
            .instrument(tracing::info_span!("failing"));
        let fault = result.settle().await.err();
        assert!(fault.as_ref().is_some_and(Fault::is_known));
    }

    #[tokio::test]
    async fn test_nested_spans() {
        let result = ok(1)
            .instrument(tracing::debug_span!("inner_op"))
            .and_then(|x| ok(x + 1).instrument(tracing::debug_span!("outer_op")));
        assert_eq!(result.promise().await.ok(), Some(2));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_captured_panic_is_logged() {
        let result = ok(1).map(|_| -> i32 { panic!("mapper exploded") });
        assert!(result.promise().await.is_err());
        assert!(logs_contain("captured panic as UnknownError"));
        assert!(logs_contain("mapper exploded"));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_map_err_match_is_logged() {
        let result =
            AsyncResult::<i32, Errors![NotFound]>::err(NotFound).map_err(|_: NotFound| ok(0));
        assert_eq!(result.promise().await.ok(), Some(0));
        assert!(logs_contain("map_err matched"));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_map_any_err_is_logged() {
        let result = AsyncResult::<i32, Errors![NotFound]>::err(NotFound).map_any_err(|_| ok(0));
        assert_eq!(result.promise().await.ok(), Some(0));
        assert!(logs_contain("map_any_err handling fault"));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_combine_selection_is_logged() {
        let result = combine(vec![
            AsyncResult::<i32, Errors![NotFound]>::ok(1),
            AsyncResult::err(NotFound),
        ]);
        assert!(result.settle().await.is_err());
        assert!(logs_contain("combine selected first error"));
        assert!(logs_contain("position=1"));
    }
}
