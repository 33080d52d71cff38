//! Type-level error sets.
//!
//! An error set is a chain of [`OneOf`] cells ending in [`Never`]:
//! `OneOf<NotFound, OneOf<Timeout, Never>>` reads "either `NotFound` or
//! `Timeout`". The [`Errors!`](crate::Errors) macro spells that chain for you.
//!
//! The traits in this module are what keep the error set of an
//! [`AsyncResult`](crate::AsyncResult) precise as it flows through
//! combinators:
//!
//! | Trait | Question it answers |
//! |-------|---------------------|
//! | [`Member<K, I>`] | Is `K` one of the kinds? What is left once `K` is removed? |
//! | [`Embed<T, I>`] | Is every kind of this set also a kind of `T`? |
//! | [`Concat<R>`] | What is this set followed by `R`? |
//! | [`ErrorSet`] | How is the active kind handed out as a raw payload? |
//!
//! The `I` parameters are index witnesses (built from [`Here`] and
//! [`There`]). They are always inferred; pass `_` when a turbofish asks for
//! them.
//!
//! # Example
//!
//! ```rust
//! use tideline::{Errors, OneOf};
//!
//! #[derive(Debug, PartialEq)]
//! struct NotFound;
//! #[derive(Debug, PartialEq)]
//! struct Timeout;
//!
//! let error: Errors![NotFound, Timeout] = OneOf::inject(Timeout);
//! assert_eq!(error.get::<Timeout, _>(), Some(&Timeout));
//! assert_eq!(error.get::<NotFound, _>(), None);
//! ```

use std::any::Any;
use std::error::Error as StdError;
use std::fmt;
use std::marker::PhantomData;

/// The empty error set.
///
/// A result whose error set is `Never` cannot fail with a domain error. Only
/// such results expose [`AsyncResult::promise`](crate::AsyncResult::promise).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Never {}

/// One cell of an error set: either the head kind `H` or one of the kinds in `T`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum OneOf<H, T> {
    /// The value is the head kind.
    Here(H),
    /// The value is one of the remaining kinds.
    There(T),
}

/// Index witness: the kind sits in the current cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Here;

/// Index witness: the kind sits somewhere after the current cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct There<I>(PhantomData<I>);

/// Spell an error set type.
///
/// `Errors![A, B, C]` expands to `OneOf<A, OneOf<B, OneOf<C, Never>>>` and
/// `Errors![]` to [`Never`].
///
/// # Example
///
/// ```rust
/// use tideline::{Errors, Never, OneOf};
///
/// struct A;
/// struct B;
///
/// let _: Errors![A, B] = OneOf::<A, OneOf<B, Never>>::Here(A);
/// let _: Option<Errors![]> = None::<Never>;
/// ```
#[macro_export]
macro_rules! Errors {
    () => { $crate::Never };
    ($head:ty $(, $tail:ty)* $(,)?) => {
        $crate::OneOf<$head, $crate::Errors![$($tail),*]>
    };
}

/// `K` is one of the kinds of this error set, found at index `I`.
pub trait Member<K, I>: Sized {
    /// The error set left once `K` is removed.
    type Rest;

    /// Place a `K` into the set.
    fn inject(kind: K) -> Self;

    /// Split the value into `K` or the remainder of the set.
    fn pluck(self) -> Result<K, Self::Rest>;

    /// Borrow the value if it currently holds a `K`.
    fn peek(&self) -> Option<&K>;
}

impl<K, T> Member<K, Here> for OneOf<K, T> {
    type Rest = T;

    fn inject(kind: K) -> Self {
        OneOf::Here(kind)
    }

    fn pluck(self) -> Result<K, T> {
        match self {
            OneOf::Here(kind) => Ok(kind),
            OneOf::There(rest) => Err(rest),
        }
    }

    fn peek(&self) -> Option<&K> {
        match self {
            OneOf::Here(kind) => Some(kind),
            OneOf::There(_) => None,
        }
    }
}

impl<K, H, T, I> Member<K, There<I>> for OneOf<H, T>
where
    T: Member<K, I>,
{
    type Rest = OneOf<H, T::Rest>;

    fn inject(kind: K) -> Self {
        OneOf::There(<T as Member<K, I>>::inject(kind))
    }

    fn pluck(self) -> Result<K, Self::Rest> {
        match self {
            OneOf::Here(head) => Err(OneOf::Here(head)),
            OneOf::There(tail) => <T as Member<K, I>>::pluck(tail).map_err(OneOf::There),
        }
    }

    fn peek(&self) -> Option<&K> {
        match self {
            OneOf::Here(_) => None,
            OneOf::There(tail) => <T as Member<K, I>>::peek(tail),
        }
    }
}

/// Every kind of this set is also a kind of `Target`.
///
/// `Indices` is a list of [`Member`] indices, one per kind, and is always
/// inferred.
pub trait Embed<Target, Indices> {
    /// Move the value into the larger set.
    fn embed(self) -> Target;
}

impl<Target> Embed<Target, ()> for Never {
    fn embed(self) -> Target {
        match self {}
    }
}

impl<H, T, Target, HeadIndex, TailIndices> Embed<Target, (HeadIndex, TailIndices)> for OneOf<H, T>
where
    Target: Member<H, HeadIndex>,
    T: Embed<Target, TailIndices>,
{
    fn embed(self) -> Target {
        match self {
            OneOf::Here(head) => Target::inject(head),
            OneOf::There(tail) => tail.embed(),
        }
    }
}

/// Append the error set `Rhs` after this one.
///
/// Duplicate kinds are kept. Use [`Embed`] (through
/// [`AsyncResult::widen`](crate::AsyncResult::widen)) to fold duplicates away.
pub trait Concat<Rhs: ErrorSet>: ErrorSet {
    /// The combined set.
    type Output: ErrorSet;

    /// Move a value of this set into the combined set.
    fn left(self) -> Self::Output;

    /// Move a value of `Rhs` into the combined set.
    fn right(rhs: Rhs) -> Self::Output;
}

impl<Rhs: ErrorSet> Concat<Rhs> for Never {
    type Output = Rhs;

    fn left(self) -> Rhs {
        match self {}
    }

    fn right(rhs: Rhs) -> Rhs {
        rhs
    }
}

impl<H, T, Rhs> Concat<Rhs> for OneOf<H, T>
where
    H: Send + 'static,
    T: Concat<Rhs>,
    Rhs: ErrorSet,
{
    type Output = OneOf<H, T::Output>;

    fn left(self) -> Self::Output {
        match self {
            OneOf::Here(head) => OneOf::Here(head),
            OneOf::There(tail) => OneOf::There(tail.left()),
        }
    }

    fn right(rhs: Rhs) -> Self::Output {
        OneOf::There(T::right(rhs))
    }
}

/// An error set whose active kind can be handed out as a raw payload.
pub trait ErrorSet: Send + 'static {
    /// Box the active kind itself (not the surrounding `OneOf` cells).
    ///
    /// The payload can be recovered with `downcast::<K>()`.
    fn into_rejection(self) -> Box<dyn Any + Send>;

    /// Type name of the active kind.
    fn kind_name(&self) -> &'static str;
}

impl ErrorSet for Never {
    fn into_rejection(self) -> Box<dyn Any + Send> {
        match self {}
    }

    fn kind_name(&self) -> &'static str {
        match *self {}
    }
}

impl<H, T> ErrorSet for OneOf<H, T>
where
    H: Send + 'static,
    T: ErrorSet,
{
    fn into_rejection(self) -> Box<dyn Any + Send> {
        match self {
            OneOf::Here(head) => Box::new(head),
            OneOf::There(tail) => tail.into_rejection(),
        }
    }

    fn kind_name(&self) -> &'static str {
        match self {
            OneOf::Here(_) => std::any::type_name::<H>(),
            OneOf::There(tail) => tail.kind_name(),
        }
    }
}

impl<H, T> OneOf<H, T> {
    /// Place a kind into this set.
    pub fn inject<K, I>(kind: K) -> Self
    where
        Self: Member<K, I>,
    {
        <Self as Member<K, I>>::inject(kind)
    }

    /// Borrow the value if it holds a `K`.
    pub fn get<K, I>(&self) -> Option<&K>
    where
        Self: Member<K, I>,
    {
        <Self as Member<K, I>>::peek(self)
    }

    /// Split the value into `K` or the remainder of the set.
    pub fn take<K, I>(self) -> Result<K, <Self as Member<K, I>>::Rest>
    where
        Self: Member<K, I>,
    {
        <Self as Member<K, I>>::pluck(self)
    }

    /// Returns `true` if the value holds a `K`.
    pub fn is<K, I>(&self) -> bool
    where
        Self: Member<K, I>,
    {
        self.get::<K, I>().is_some()
    }
}

impl fmt::Debug for Never {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}

impl fmt::Display for Never {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}

impl StdError for Never {}

// Formatting is transparent: only the active kind is shown.
impl<H: fmt::Debug, T: fmt::Debug> fmt::Debug for OneOf<H, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OneOf::Here(head) => head.fmt(f),
            OneOf::There(tail) => tail.fmt(f),
        }
    }
}

impl<H: fmt::Display, T: fmt::Display> fmt::Display for OneOf<H, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OneOf::Here(head) => head.fmt(f),
            OneOf::There(tail) => tail.fmt(f),
        }
    }
}

impl<H, T> StdError for OneOf<H, T>
where
    H: StdError,
    T: StdError,
{
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            OneOf::Here(head) => head.source(),
            OneOf::There(tail) => tail.source(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct NotFound;
    #[derive(Debug, Clone, PartialEq)]
    struct Timeout(u32);
    #[derive(Debug, Clone, PartialEq)]
    struct Denied;

    type Three = crate::Errors![NotFound, Timeout, Denied];

    #[test]
    fn test_inject_places_kind_at_its_position() {
        let error: Three = OneOf::inject(Timeout(3));
        assert_eq!(error, OneOf::There(OneOf::Here(Timeout(3))));
    }

    #[test]
    fn test_pluck_matching_kind() {
        let error: Three = OneOf::inject(Denied);
        assert_eq!(error.take::<Denied, _>(), Ok(Denied));
    }

    #[test]
    fn test_pluck_other_kind_returns_rest_without_that_kind() {
        let error: Three = OneOf::inject(NotFound);
        let rest: crate::Errors![NotFound, Denied] = match error.take::<Timeout, _>() {
            Ok(kind) => panic!("unexpected {:?}", kind),
            Err(rest) => rest,
        };
        assert_eq!(rest.get::<NotFound, _>(), Some(&NotFound));
    }

    #[test]
    fn test_get_and_is() {
        let error: Three = OneOf::inject(Timeout(1));
        assert!(error.is::<Timeout, _>());
        assert!(!error.is::<NotFound, _>());
        assert_eq!(error.get::<Timeout, _>(), Some(&Timeout(1)));
    }

    #[test]
    fn test_embed_into_reordered_superset() {
        let small: crate::Errors![Denied, NotFound] = OneOf::inject(NotFound);
        let large: crate::Errors![NotFound, Timeout, Denied] = small.embed();
        assert_eq!(large.get::<NotFound, _>(), Some(&NotFound));
    }

    #[test]
    fn test_embed_folds_duplicates() {
        let doubled: crate::Errors![Denied, Denied] = OneOf::There(OneOf::Here(Denied));
        let single: crate::Errors![Denied] = doubled.embed();
        assert_eq!(single, OneOf::Here(Denied));
    }

    #[test]
    fn test_concat_keeps_both_sides() {
        type Left = crate::Errors![NotFound];
        type Right = crate::Errors![Timeout, Denied];

        let from_left = <Left as Concat<Right>>::left(OneOf::Here(NotFound));
        let from_right = <Left as Concat<Right>>::right(OneOf::inject(Denied));

        assert_eq!(from_left.get::<NotFound, _>(), Some(&NotFound));
        assert_eq!(from_right.get::<Denied, _>(), Some(&Denied));
        assert_eq!(from_right.get::<NotFound, _>(), None);
    }

    #[test]
    fn test_rejection_is_the_bare_kind() {
        let error: Three = OneOf::inject(Timeout(9));
        assert_eq!(error.kind_name(), std::any::type_name::<Timeout>());

        let payload = error.into_rejection();
        assert_eq!(payload.downcast_ref::<Timeout>(), Some(&Timeout(9)));
    }

    #[test]
    fn test_debug_shows_active_kind_only() {
        let error: Three = OneOf::inject(Timeout(2));
        assert_eq!(format!("{:?}", error), "Timeout(2)");
    }
}
