//! Running several results together.
//!
//! [`combine`] settles every input concurrently, then scans the outcomes in
//! input order: the first failure by position wins, regardless of which
//! input settled first. When nothing failed, the values come back in input
//! order.
//!
//! | Input | Values | Error set |
//! |-------|--------|-----------|
//! | `Vec<AsyncResult<V, E>>` | `Vec<V>` | `E` |
//! | `[AsyncResult<V, E>; N]` | `[V; N]` | `E` |
//! | `(AsyncResult<V1, E1>, AsyncResult<V2, E2>)` | `(V1, V2)` | `E1` followed by `E2` |
//! | tuples of three and four | tuple of values | all sets, in order |
//!
//! Tuple error sets are concatenated as written, so a kind that appears in
//! two inputs appears twice; [`widen`](AsyncResult::widen) folds it back.
//!
//! # Example
//!
//! ```rust
//! use tideline::{combine, ok};
//!
//! # tokio_test::block_on(async {
//! let pair = combine((ok(1), ok("a")));
//! assert_eq!(pair.promise().await.ok(), Some((1, "a")));
//! # });
//! ```

use std::future::Future;

use futures::future::join_all;

use crate::fault::{Fault, UnknownError};
use crate::result::AsyncResult;
use crate::union::{Concat, ErrorSet};
use crate::wrapper::{capture, Wrapper};

type Joined<A, B> = <A as Concat<B>>::Output;

/// A collection of results that can be settled together.
pub trait Combine {
    /// The collected success values.
    type Values: Send + 'static;

    /// The error set of the combined result.
    type Error: Send + 'static;

    /// Settle all results concurrently into one.
    fn combine(self) -> AsyncResult<Self::Values, Self::Error>;
}

/// Settle all results concurrently into one.
///
/// See the [module documentation](self) for the accepted inputs.
pub fn combine<C>(results: C) -> AsyncResult<C::Values, C::Error>
where
    C: Combine,
{
    results.combine()
}

/// Combine any number of results of the same type.
///
/// # Example
///
/// ```rust
/// use tideline::{combine_all, ok};
///
/// # tokio_test::block_on(async {
/// let all = combine_all((1..=3).map(ok));
/// assert_eq!(all.promise().await.ok(), Some(vec![1, 2, 3]));
/// # });
/// ```
pub fn combine_all<I, V, E>(results: I) -> AsyncResult<Vec<V>, E>
where
    I: IntoIterator<Item = AsyncResult<V, E>>,
    V: Send + 'static,
    E: Send + 'static,
{
    let pending: Vec<_> = results.into_iter().map(AsyncResult::into_inner).collect();
    AsyncResult::from_wrapper_future(async move { first_error(join_all(pending).await) })
}

/// Combine the results a future resolves to.
///
/// The future is awaited first; a panic while awaiting it settles the
/// combined result with an [`UnknownError`](crate::UnknownError).
///
/// ```rust,ignore
/// let pages = combine_future(async { ids.into_iter().map(fetch_page).collect::<Vec<_>>() });
/// ```
pub fn combine_future<C, F>(results: F) -> AsyncResult<C::Values, C::Error>
where
    F: Future<Output = C> + Send + 'static,
    C: Combine + Send,
{
    AsyncResult::from_wrapper_future(capture(async move {
        results.await.combine().settle().await
    }))
}

fn first_error<V, E>(settled: Vec<Wrapper<V, E>>) -> Wrapper<Vec<V>, E> {
    let mut values = Vec::with_capacity(settled.len());
    for (position, wrapper) in settled.into_iter().enumerate() {
        match wrapper {
            Ok(value) => values.push(value),
            Err(fault) => return Err(selected(position, fault)),
        }
    }
    Ok(values)
}

#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
fn selected<E>(position: usize, fault: Fault<E>) -> Fault<E> {
    #[cfg(feature = "tracing")]
    tracing::trace!(position, unknown = fault.is_unknown(), "combine selected first error");
    fault
}

impl<V, E> Combine for Vec<AsyncResult<V, E>>
where
    V: Send + 'static,
    E: Send + 'static,
{
    type Values = Vec<V>;
    type Error = E;

    fn combine(self) -> AsyncResult<Vec<V>, E> {
        combine_all(self)
    }
}

impl<V, E, const N: usize> Combine for [AsyncResult<V, E>; N]
where
    V: Send + 'static,
    E: Send + 'static,
{
    type Values = [V; N];
    type Error = E;

    fn combine(self) -> AsyncResult<[V; N], E> {
        let joined = combine_all(self).into_inner();
        AsyncResult::from_wrapper_future(async move {
            joined.await.and_then(|values| {
                <[V; N]>::try_from(values).map_err(|_| {
                    Fault::Unknown(UnknownError::new(Box::new("combine lost an input")))
                })
            })
        })
    }
}

impl<V1, E1, V2, E2> Combine for (AsyncResult<V1, E1>, AsyncResult<V2, E2>)
where
    V1: Send + 'static,
    V2: Send + 'static,
    E1: Concat<E2>,
    E2: ErrorSet,
{
    type Values = (V1, V2);
    type Error = Joined<E1, E2>;

    fn combine(self) -> AsyncResult<Self::Values, Self::Error> {
        let (a, b) = (self.0.into_inner(), self.1.into_inner());
        AsyncResult::from_wrapper_future(async move {
            match futures::join!(a, b) {
                (Ok(a), Ok(b)) => Ok((a, b)),
                (Err(fault), _) => Err(selected(0, fault).map_known(E1::left)),
                (_, Err(fault)) => Err(selected(1, fault).map_known(E1::right)),
            }
        })
    }
}

impl<V1, E1, V2, E2, V3, E3> Combine
    for (AsyncResult<V1, E1>, AsyncResult<V2, E2>, AsyncResult<V3, E3>)
where
    V1: Send + 'static,
    V2: Send + 'static,
    V3: Send + 'static,
    E1: Concat<E2>,
    E2: ErrorSet,
    E3: ErrorSet,
    Joined<E1, E2>: Concat<E3>,
{
    type Values = (V1, V2, V3);
    type Error = Joined<Joined<E1, E2>, E3>;

    fn combine(self) -> AsyncResult<Self::Values, Self::Error> {
        let (a, b, c) = (self.0.into_inner(), self.1.into_inner(), self.2.into_inner());
        AsyncResult::from_wrapper_future(async move {
            match futures::join!(a, b, c) {
                (Ok(a), Ok(b), Ok(c)) => Ok((a, b, c)),
                (Err(fault), _, _) => Err(selected(0, fault)
                    .map_known(|e| <Joined<E1, E2> as Concat<E3>>::left(E1::left(e)))),
                (_, Err(fault), _) => Err(selected(1, fault)
                    .map_known(|e| <Joined<E1, E2> as Concat<E3>>::left(E1::right(e)))),
                (_, _, Err(fault)) => Err(selected(2, fault)
                    .map_known(<Joined<E1, E2> as Concat<E3>>::right)),
            }
        })
    }
}

impl<V1, E1, V2, E2, V3, E3, V4, E4> Combine
    for (
        AsyncResult<V1, E1>,
        AsyncResult<V2, E2>,
        AsyncResult<V3, E3>,
        AsyncResult<V4, E4>,
    )
where
    V1: Send + 'static,
    V2: Send + 'static,
    V3: Send + 'static,
    V4: Send + 'static,
    E1: Concat<E2>,
    E2: ErrorSet,
    E3: ErrorSet,
    E4: ErrorSet,
    Joined<E1, E2>: Concat<E3>,
    Joined<Joined<E1, E2>, E3>: Concat<E4>,
{
    type Values = (V1, V2, V3, V4);
    type Error = Joined<Joined<Joined<E1, E2>, E3>, E4>;

    fn combine(self) -> AsyncResult<Self::Values, Self::Error> {
        let (a, b, c, d) = (
            self.0.into_inner(),
            self.1.into_inner(),
            self.2.into_inner(),
            self.3.into_inner(),
        );
        AsyncResult::from_wrapper_future(async move {
            match futures::join!(a, b, c, d) {
                (Ok(a), Ok(b), Ok(c), Ok(d)) => Ok((a, b, c, d)),
                (Err(fault), _, _, _) => Err(selected(0, fault).map_known(|e| {
                    <Joined<Joined<E1, E2>, E3> as Concat<E4>>::left(
                        <Joined<E1, E2> as Concat<E3>>::left(E1::left(e)),
                    )
                })),
                (_, Err(fault), _, _) => Err(selected(1, fault).map_known(|e| {
                    <Joined<Joined<E1, E2>, E3> as Concat<E4>>::left(
                        <Joined<E1, E2> as Concat<E3>>::left(E1::right(e)),
                    )
                })),
                (_, _, Err(fault), _) => Err(selected(2, fault).map_known(|e| {
                    <Joined<Joined<E1, E2>, E3> as Concat<E4>>::left(
                        <Joined<E1, E2> as Concat<E3>>::right(e),
                    )
                })),
                (_, _, _, Err(fault)) => Err(selected(3, fault)
                    .map_known(<Joined<Joined<E1, E2>, E3> as Concat<E4>>::right)),
            }
        })
    }
}
