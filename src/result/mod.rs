//! The [`AsyncResult`] type and its combinators.
//!
//! An `AsyncResult<V, E>` is a pending computation that settles exactly once,
//! either with a value `V` or with a [`Fault<E>`]. `E` is an error set built
//! with [`Errors!`](crate::Errors); the combinators rewrite it precisely:
//!
//! | Combinator | Error set afterwards |
//! |------------|----------------------|
//! | [`map`](AsyncResult::map), [`map_async`](AsyncResult::map_async), [`tap`](AsyncResult::tap), [`tap_err`](AsyncResult::tap_err) | unchanged |
//! | [`and_then`](AsyncResult::and_then) | the set followed by the mapper's errors |
//! | [`map_err`](AsyncResult::map_err) with `K` | the set without `K`, followed by the handler's errors |
//! | [`map_any_err`](AsyncResult::map_any_err) | exactly the handler's own set |
//! | [`map_unknown_err`](AsyncResult::map_unknown_err) | the set followed by the handler's errors |
//! | [`and_then_within`](AsyncResult::and_then_within), [`map_err_within`](AsyncResult::map_err_within) | as above, but the new errors must already be in the set |
//! | [`widen`](AsyncResult::widen) | any superset you name |
//!
//! Joined sets keep kinds in the order written, so a kind can show up twice;
//! [`widen`](AsyncResult::widen) folds it back into one.
//!
//! A panic is always possible and never part of `E`: it travels as
//! [`Fault::Unknown`].
//!
//! Every combinator returns immediately. Nothing runs until the result is
//! consumed with [`settle`](AsyncResult::settle),
//! [`unsafe_promise`](AsyncResult::unsafe_promise) or
//! [`promise`](AsyncResult::promise), and stages of one chain run strictly in
//! the order they were attached.
//!
//! A chain is a queue of stages driven by one loop, so its length does not
//! grow the stack.

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;

use futures::future::{self, BoxFuture};
use futures::FutureExt;

use crate::fault::{Fault, Rejection, UnknownError};
use crate::union::{Concat, Embed, ErrorSet, Member, Never};
use crate::wrapper::{capture, normalize, resolved_err, resolved_ok, IntoResult, Wrapper};

/// A settled outcome with its types erased, passed from stage to stage.
type Erased = Box<dyn Any + Send>;

/// One queued step of a chain.
type Stage = Box<dyn FnOnce(Erased) -> BoxFuture<'static, Erased> + Send>;

/// Errors of `and_then`: the current set followed by the mapper's.
type Chained<E, R, M> = <E as Concat<<R as IntoResult<M>>::Error>>::Output;

/// Errors of `map_err`: the set without `K`, followed by the handler's.
type Handled<E, K, I, R, M> =
    <<E as Member<K, I>>::Rest as Concat<<R as IntoResult<M>>::Error>>::Output;

fn erase<V, E>(wrapper: Wrapper<V, E>) -> Erased
where
    V: Send + 'static,
    E: Send + 'static,
{
    Box::new(wrapper)
}

fn restore<V, E>(erased: Erased) -> Wrapper<V, E>
where
    V: 'static,
    E: 'static,
{
    match erased.downcast::<Wrapper<V, E>>() {
        Ok(wrapper) => *wrapper,
        // Stages are pushed by typed methods only; a mismatch is a bug here.
        Err(_) => Err(Fault::Unknown(UnknownError::new(Box::new(
            "result stage received an outcome of another type",
        )))),
    }
}

/// A typed, asynchronously settling result.
///
/// # Example
///
/// ```rust
/// use tideline::{ok, Errors, AsyncResult};
///
/// #[derive(Debug)]
/// struct NotFound;
///
/// # tokio_test::block_on(async {
/// let doubled = ok(5).map(|v| v * 2);
/// assert_eq!(doubled.promise().await.ok(), Some(10));
///
/// let missing = AsyncResult::<i32, Errors![NotFound]>::err(NotFound)
///     .map(|v| v * 2)
///     .map_err(|_: NotFound| ok(0));
/// assert_eq!(missing.promise().await.ok(), Some(0));
/// # });
/// ```
#[must_use = "results do nothing unless settled"]
pub struct AsyncResult<V, E> {
    source: BoxFuture<'static, Erased>,
    stages: Vec<Stage>,
    _outcome: PhantomData<fn() -> Wrapper<V, E>>,
}

impl<V, E> fmt::Debug for AsyncResult<V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncResult")
            .field("stages", &self.stages.len())
            .finish_non_exhaustive()
    }
}

impl<V, E> AsyncResult<V, E>
where
    V: Send + 'static,
    E: Send + 'static,
{
    pub(crate) fn from_wrapper_future<F>(future: F) -> Self
    where
        F: Future<Output = Wrapper<V, E>> + Send + 'static,
    {
        AsyncResult {
            source: future.map(erase::<V, E>).boxed(),
            stages: Vec::new(),
            _outcome: PhantomData,
        }
    }

    /// Drive the source and every queued stage, one after the other.
    pub(crate) fn into_inner(self) -> BoxFuture<'static, Wrapper<V, E>> {
        let AsyncResult { source, stages, .. } = self;
        async move {
            let mut outcome = source.await;
            for stage in stages {
                outcome = stage(outcome).await;
            }
            restore::<V, E>(outcome)
        }
        .boxed()
    }

    /// Queue a step that turns this outcome into the next one.
    fn then<U, E2, F, Fut>(self, step: F) -> AsyncResult<U, E2>
    where
        F: FnOnce(Wrapper<V, E>) -> Fut + Send + 'static,
        Fut: Future<Output = Wrapper<U, E2>> + Send + 'static,
        U: Send + 'static,
        E2: Send + 'static,
    {
        let AsyncResult {
            source, mut stages, ..
        } = self;
        stages.push(Box::new(move |input: Erased| {
            step(restore::<V, E>(input)).map(erase::<U, E2>).boxed()
        }));
        AsyncResult {
            source,
            stages,
            _outcome: PhantomData,
        }
    }

    /// Create a result from an outcome that is already known.
    pub fn resolved(outcome: Result<V, Fault<E>>) -> Self {
        Self::from_wrapper_future(future::ready(outcome))
    }

    /// Create a successful result.
    ///
    /// Use the free function [`ok`](crate::ok) when the result cannot fail.
    pub fn ok(value: V) -> Self {
        Self::resolved(resolved_ok(value))
    }

    /// Create a failed result holding one kind of the error set.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tideline::{AsyncResult, Errors};
    ///
    /// #[derive(Debug, PartialEq)]
    /// struct NotFound;
    /// #[derive(Debug, PartialEq)]
    /// struct Timeout;
    ///
    /// # tokio_test::block_on(async {
    /// let result = AsyncResult::<u8, Errors![NotFound, Timeout]>::err(Timeout);
    /// let fault = result.settle().await.err().unwrap();
    /// assert_eq!(fault.kind::<Timeout, _>(), Some(&Timeout));
    /// # });
    /// ```
    pub fn err<K, I>(kind: K) -> Self
    where
        E: Member<K, I>,
    {
        Self::resolved(resolved_err(<E as Member<K, I>>::inject(kind)))
    }

    /// Create a failed result from a whole error set value.
    pub fn fail(error: E) -> Self {
        Self::resolved(resolved_err(error))
    }

    /// Transform the success value.
    ///
    /// A failed result passes through and `f` is never called. A panic in
    /// `f` settles the result as [`Fault::Unknown`].
    ///
    /// `map` never flattens: use [`and_then`](AsyncResult::and_then) when `f`
    /// returns a result.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let result = ok(21).map(|x| x * 2);
    /// assert_eq!(result.promise().await.ok(), Some(42));
    /// ```
    pub fn map<U, F>(self, f: F) -> AsyncResult<U, E>
    where
        F: FnOnce(V) -> U + Send + 'static,
        U: Send + 'static,
    {
        self.then(move |outcome| async move {
            match outcome {
                Ok(value) => capture(async move { Ok(f(value)) }).await,
                Err(fault) => Err(fault),
            }
        })
    }

    /// Transform the success value with an async function.
    ///
    /// Same rules as [`map`](AsyncResult::map); a panic while the returned
    /// future is polled is captured too.
    pub fn map_async<U, F, Fut>(self, f: F) -> AsyncResult<U, E>
    where
        F: FnOnce(V) -> Fut + Send + 'static,
        Fut: Future<Output = U> + Send + 'static,
        U: Send + 'static,
    {
        self.then(move |outcome| async move {
            match outcome {
                Ok(value) => capture(async move { Ok(f(value).await) }).await,
                Err(fault) => Err(fault),
            }
        })
    }

    /// Chain a function that returns a result.
    ///
    /// `f` may return an [`AsyncResult`], a `std::result::Result`, or a future
    /// of either (see [`IntoResult`]). Its outcome is adopted as-is, so nested
    /// results flatten, and its error kinds join the set after the current
    /// ones.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tideline::{ok, AsyncResult, Errors};
    ///
    /// #[derive(Debug, PartialEq)]
    /// struct TooLarge;
    ///
    /// # tokio_test::block_on(async {
    /// let result: AsyncResult<i32, Errors![TooLarge]> =
    ///     ok(8).and_then(|v| if v > 6 { Err(TooLarge) } else { Ok(v * 2) });
    /// let fault = result.settle().await.err().unwrap();
    /// assert_eq!(fault.kind::<TooLarge, _>(), Some(&TooLarge));
    /// # });
    /// ```
    pub fn and_then<R, M, F>(self, f: F) -> AsyncResult<R::Value, Chained<E, R, M>>
    where
        F: FnOnce(V) -> R + Send + 'static,
        R: IntoResult<M>,
        <R as IntoResult<M>>::Error: ErrorSet,
        E: Concat<<R as IntoResult<M>>::Error>,
    {
        self.then(move |outcome| async move {
            match outcome {
                Ok(value) => normalize::<R, M, _>(move || f(value))
                    .await
                    .map_err(|fault| fault.map_known(E::right)),
                Err(fault) => Err(fault.map_known(E::left)),
            }
        })
    }

    /// Chain a function whose errors are already part of the set.
    ///
    /// Same as [`and_then`](AsyncResult::and_then), but the error set stays
    /// `E` instead of growing.
    pub fn and_then_within<R, M, I, F>(self, f: F) -> AsyncResult<R::Value, E>
    where
        F: FnOnce(V) -> R + Send + 'static,
        R: IntoResult<M>,
        <R as IntoResult<M>>::Error: Embed<E, I>,
    {
        self.then(move |outcome| async move {
            match outcome {
                Ok(value) => normalize::<R, M, _>(move || f(value))
                    .await
                    .map_err(|fault| {
                        fault.map_known(<<R as IntoResult<M>>::Error as Embed<E, I>>::embed)
                    }),
                Err(fault) => Err(fault),
            }
        })
    }

    /// Observe the success value without changing the result.
    pub fn tap<F>(self, f: F) -> Self
    where
        F: FnOnce(&V) + Send + 'static,
    {
        self.then(move |outcome| async move {
            match outcome {
                Ok(value) => {
                    capture(async move {
                        f(&value);
                        Ok(value)
                    })
                    .await
                }
                Err(fault) => Err(fault),
            }
        })
    }

    /// Handle one specific error kind.
    ///
    /// The kind `K` is chosen by the type of the handler's argument. When the
    /// result failed with a `K`, the handler runs and its outcome replaces the
    /// failure; success, other kinds, and [`Fault::Unknown`] pass through
    /// untouched.
    ///
    /// The error set afterwards is `E` without `K`, followed by whatever the
    /// handler can fail with. A handler that recovers with [`ok`](crate::ok)
    /// adds nothing.
    ///
    /// `K` has to appear exactly once in `E`. A set with duplicates is folded
    /// with [`widen`](AsyncResult::widen) first.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tideline::{ok, AsyncResult, Errors};
    ///
    /// #[derive(Debug)]
    /// struct NotFound;
    /// #[derive(Debug)]
    /// struct Timeout;
    /// #[derive(Debug)]
    /// struct HttpNotFound;
    ///
    /// # tokio_test::block_on(async {
    /// let result = AsyncResult::<&str, Errors![NotFound, Timeout]>::err(NotFound);
    ///
    /// // `NotFound` is gone from the set, `HttpNotFound` joined it.
    /// let translated: AsyncResult<&str, Errors![Timeout, HttpNotFound]> =
    ///     result.map_err(|_: NotFound| Err(HttpNotFound));
    ///
    /// let value = translated
    ///     .map_err(|_: HttpNotFound| ok("default"))
    ///     .map_err(|_: Timeout| ok("retry later"))
    ///     .promise()
    ///     .await;
    /// assert_eq!(value.ok(), Some("default"));
    /// # });
    /// ```
    pub fn map_err<K, I, R, M, F>(self, handler: F) -> AsyncResult<V, Handled<E, K, I, R, M>>
    where
        E: Member<K, I>,
        <E as Member<K, I>>::Rest: Concat<<R as IntoResult<M>>::Error>,
        <R as IntoResult<M>>::Error: ErrorSet,
        K: Send + 'static,
        F: FnOnce(K) -> R + Send + 'static,
        R: IntoResult<M, Value = V>,
    {
        self.then(move |outcome| async move {
            match outcome {
                Ok(value) => Ok(value),
                Err(Fault::Known(error)) => match <E as Member<K, I>>::pluck(error) {
                    Ok(kind) => {
                        #[cfg(feature = "tracing")]
                        tracing::trace!(kind = std::any::type_name::<K>(), "map_err matched");
                        normalize::<R, M, _>(move || handler(kind))
                            .await
                            .map_err(|fault| {
                                fault.map_known(
                                    <<E as Member<K, I>>::Rest as Concat<R::Error>>::right,
                                )
                            })
                    }
                    Err(rest) => Err(Fault::Known(
                        <<E as Member<K, I>>::Rest as Concat<R::Error>>::left(rest),
                    )),
                },
                Err(Fault::Unknown(error)) => Err(Fault::Unknown(error)),
            }
        })
    }

    /// Handle one specific error kind with a handler whose errors are already
    /// part of what is left.
    ///
    /// Same as [`map_err`](AsyncResult::map_err), but the error set afterwards
    /// is exactly `E` without `K`.
    pub fn map_err_within<K, I, R, M, J, F>(
        self,
        handler: F,
    ) -> AsyncResult<V, <E as Member<K, I>>::Rest>
    where
        E: Member<K, I>,
        <E as Member<K, I>>::Rest: Send + 'static,
        K: Send + 'static,
        F: FnOnce(K) -> R + Send + 'static,
        R: IntoResult<M, Value = V>,
        <R as IntoResult<M>>::Error: Embed<<E as Member<K, I>>::Rest, J>,
    {
        self.then(move |outcome| async move {
            match outcome {
                Ok(value) => Ok(value),
                Err(Fault::Known(error)) => match <E as Member<K, I>>::pluck(error) {
                    Ok(kind) => {
                        #[cfg(feature = "tracing")]
                        tracing::trace!(kind = std::any::type_name::<K>(), "map_err matched");
                        normalize::<R, M, _>(move || handler(kind))
                            .await
                            .map_err(|fault| {
                                fault.map_known(
                                    <<R as IntoResult<M>>::Error as Embed<
                                        <E as Member<K, I>>::Rest,
                                        J,
                                    >>::embed,
                                )
                            })
                    }
                    Err(rest) => Err(Fault::Known(rest)),
                },
                Err(Fault::Unknown(error)) => Err(Fault::Unknown(error)),
            }
        })
    }

    /// Observe one specific error kind without handling it.
    ///
    /// The result is unchanged; `f` only runs when the result failed with a
    /// `K`. A panic in `f` settles the result as [`Fault::Unknown`].
    pub fn tap_err<K, I, F>(self, f: F) -> Self
    where
        E: Member<K, I>,
        F: FnOnce(&K) + Send + 'static,
    {
        self.then(move |outcome| async move {
            match outcome {
                Err(Fault::Known(error)) => {
                    capture(async move {
                        if let Some(kind) = <E as Member<K, I>>::peek(&error) {
                            f(kind);
                        }
                        Err(Fault::Known(error))
                    })
                    .await
                }
                other => other,
            }
        })
    }

    /// Handle any failure, declared or not.
    ///
    /// The handler receives the whole [`Fault`] and its outcome replaces the
    /// failure. The error set afterwards is exactly the handler's own, so a
    /// handler that always recovers yields a result that cannot fail.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let value = risky()
    ///     .map_any_err(|fault| ok(fallback_for(&fault)))
    ///     .promise()
    ///     .await;
    /// ```
    pub fn map_any_err<R, M, F>(self, handler: F) -> AsyncResult<V, <R as IntoResult<M>>::Error>
    where
        F: FnOnce(Fault<E>) -> R + Send + 'static,
        R: IntoResult<M, Value = V>,
    {
        self.then(move |outcome| async move {
            match outcome {
                Ok(value) => Ok(value),
                Err(fault) => {
                    #[cfg(feature = "tracing")]
                    tracing::trace!(unknown = fault.is_unknown(), "map_any_err handling fault");
                    normalize::<R, M, _>(move || handler(fault)).await
                }
            }
        })
    }

    /// Handle a captured panic.
    ///
    /// Declared errors pass through. The handler's errors join the set after
    /// the current ones.
    pub fn map_unknown_err<R, M, F>(self, handler: F) -> AsyncResult<V, Chained<E, R, M>>
    where
        F: FnOnce(UnknownError) -> R + Send + 'static,
        R: IntoResult<M, Value = V>,
        <R as IntoResult<M>>::Error: ErrorSet,
        E: Concat<<R as IntoResult<M>>::Error>,
    {
        self.then(move |outcome| async move {
            match outcome {
                Ok(value) => Ok(value),
                Err(Fault::Unknown(error)) => normalize::<R, M, _>(move || handler(error))
                    .await
                    .map_err(|fault| fault.map_known(E::right)),
                Err(Fault::Known(error)) => Err(Fault::Known(E::left(error))),
            }
        })
    }

    /// Move the error set into a superset.
    ///
    /// Used to reorder a set, to name a larger set up front, or to fold away
    /// duplicate kinds left by joining sets.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let widened: AsyncResult<i32, Errors![NotFound, Timeout]> =
    ///     ok(1).widen::<Errors![NotFound, Timeout], _>();
    /// ```
    pub fn widen<T, I>(self) -> AsyncResult<V, T>
    where
        E: Embed<T, I>,
        T: Send + 'static,
    {
        self.then(move |outcome| async move {
            outcome.map_err(|fault| fault.map_known(<E as Embed<T, I>>::embed))
        })
    }

    /// Wait for the outcome.
    ///
    /// This is the typed way out: the failure keeps its error set.
    pub async fn settle(self) -> Result<V, Fault<E>> {
        self.into_inner().await
    }

    /// Start driving the chain right away on the current tokio runtime.
    ///
    /// The returned result settles with the same outcome. Outside a runtime
    /// the result is returned unchanged and stays lazy.
    #[cfg(feature = "async")]
    pub fn spawn(self) -> Self {
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => return self,
        };
        let task = handle.spawn(self.into_inner());
        AsyncResult::from_wrapper_future(async move {
            match task.await {
                Ok(wrapper) => wrapper,
                Err(join_error) => {
                    let cause: Rejection = match join_error.try_into_panic() {
                        Ok(payload) => payload,
                        Err(join_error) => Box::new(join_error.to_string()),
                    };
                    Err(Fault::Unknown(UnknownError::new(cause)))
                }
            }
        })
    }
}

impl<V, E> AsyncResult<V, E>
where
    V: Send + 'static,
    E: ErrorSet,
{
    /// Wait for the value, giving up the error's type on failure.
    ///
    /// A declared error rejects with the bare kind and a captured panic with
    /// its original payload; recover either with `downcast`.
    ///
    /// Prefer [`promise`](AsyncResult::promise), which is only available once
    /// every declared kind has been handled.
    pub async fn unsafe_promise(self) -> Result<V, Rejection> {
        self.settle().await.map_err(Fault::into_rejection)
    }
}

impl<V> AsyncResult<V, Never>
where
    V: Send + 'static,
{
    /// Wait for the value of a result that cannot fail with a declared error.
    ///
    /// Behaves exactly like [`unsafe_promise`](AsyncResult::unsafe_promise);
    /// the only possible rejection is a captured panic's payload.
    pub async fn promise(self) -> Result<V, Rejection> {
        self.unsafe_promise().await
    }
}
