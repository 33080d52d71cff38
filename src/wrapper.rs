//! Settled outcomes and the normalization of whatever user code hands back.
//!
//! Every result resolves to exactly one [`Wrapper`]: the success value or a
//! [`Fault`]. User code reaches a wrapper through one of two doors:
//!
//! - [`capture`] polls a future to completion and turns a panic into
//!   [`Fault::Unknown`].
//! - [`normalize`] runs a producer under [`capture`] and adopts its
//!   [`IntoResult`] return value, flattening nested results and awaiting
//!   futures on the way.
//!
//! [`IntoResult`] is the "anything a mapper may return" contract:
//!
//! | Returned value | Marker | Becomes |
//! |----------------|--------|---------|
//! | `AsyncResult<V, E>` | [`Direct`] | adopted as-is |
//! | `Result<V, K>` | [`Direct`] | `Ok(v)`, or the single-kind set `Errors![K]` |
//! | `impl Future<Output = R>` | [`Deferred<M>`] | awaited, then `R` is normalized |
//!
//! The marker is always inferred. Plain values are not `IntoResult`; they
//! enter through [`AsyncResult::map`] and friends.

use std::future::Future;
use std::marker::PhantomData;
use std::panic::AssertUnwindSafe;

use futures::future::BoxFuture;
use futures::FutureExt;

use crate::fault::{Fault, UnknownError};
use crate::result::AsyncResult;
use crate::union::{Never, OneOf};

/// One settled outcome of a result chain.
pub(crate) type Wrapper<V, E> = Result<V, Fault<E>>;

/// Marker for values that already are a result.
#[derive(Debug, Clone, Copy, Default)]
pub struct Direct;

/// Marker for futures whose output is normalized with marker `M`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Deferred<M>(PhantomData<M>);

/// A value that can stand in for a result.
///
/// Implemented for [`AsyncResult`], for `std::result::Result`, and for any
/// `Send + 'static` future whose output is itself `IntoResult`.
pub trait IntoResult<M>: Send {
    /// The success type.
    type Value: Send + 'static;

    /// The error set.
    type Error: Send + 'static;

    /// Convert into a result.
    fn into_result(self) -> AsyncResult<Self::Value, Self::Error>;
}

impl<V, E> IntoResult<Direct> for AsyncResult<V, E>
where
    V: Send + 'static,
    E: Send + 'static,
{
    type Value = V;
    type Error = E;

    fn into_result(self) -> AsyncResult<V, E> {
        self
    }
}

impl<V, K> IntoResult<Direct> for Result<V, K>
where
    V: Send + 'static,
    K: Send + 'static,
{
    type Value = V;
    type Error = OneOf<K, Never>;

    fn into_result(self) -> AsyncResult<V, OneOf<K, Never>> {
        AsyncResult::resolved(self.map_err(|kind| Fault::Known(OneOf::Here(kind))))
    }
}

impl<F, M> IntoResult<Deferred<M>> for F
where
    F: Future + Send + 'static,
    F::Output: IntoResult<M>,
{
    type Value = <F::Output as IntoResult<M>>::Value;
    type Error = <F::Output as IntoResult<M>>::Error;

    fn into_result(self) -> AsyncResult<Self::Value, Self::Error> {
        AsyncResult::from_wrapper_future(async move {
            let output = self.await;
            <F::Output as IntoResult<M>>::into_result(output).settle().await
        })
    }
}

/// Poll `future` to completion, turning a panic into [`Fault::Unknown`].
///
/// This is the only place an [`UnknownError`] is created.
pub(crate) async fn capture<V, E, F>(future: F) -> Wrapper<V, E>
where
    F: Future<Output = Wrapper<V, E>>,
{
    match AssertUnwindSafe(future).catch_unwind().await {
        Ok(wrapper) => wrapper,
        Err(cause) => {
            let error = UnknownError::new(cause);
            #[cfg(feature = "tracing")]
            tracing::warn!(
                cause = error.message().unwrap_or("<non-string payload>"),
                "captured panic as UnknownError"
            );
            Err(Fault::Unknown(error))
        }
    }
}

/// Run `produce` and normalize what it returns.
///
/// A panic in `produce` itself, in a future it returns, or anywhere down a
/// result it returns is captured the same way.
pub(crate) fn normalize<R, M, P>(produce: P) -> BoxFuture<'static, Wrapper<R::Value, R::Error>>
where
    P: FnOnce() -> R + Send + 'static,
    R: IntoResult<M>,
{
    capture(async move {
        let result = produce().into_result();
        result.settle().await
    })
    .boxed()
}

/// An already settled success.
pub(crate) fn resolved_ok<V, E>(value: V) -> Wrapper<V, E> {
    Ok(value)
}

/// An already settled domain error.
pub(crate) fn resolved_err<V, E>(error: E) -> Wrapper<V, E> {
    Err(Fault::Known(error))
}
