//! # Tideline
//!
//! > *"Every tide turns once"*
//!
//! Typed async results for Rust: errors are values, and the compiler keeps
//! track of exactly which ones are still possible.
//!
//! ## Philosophy
//!
//! An [`AsyncResult<V, E>`] is a pending computation that settles once, as a
//! value or as a [`Fault`]. `E` is an error *set*, and every combinator
//! rewrites it precisely:
//! - [`map`](AsyncResult::map) keeps the set;
//! - [`and_then`](AsyncResult::and_then) adds the mapper's errors;
//! - [`map_err`](AsyncResult::map_err) removes the one kind it handles and
//!   adds whatever the handler can fail with;
//! - [`map_any_err`](AsyncResult::map_any_err) replaces the set entirely.
//!
//! Panics in user code are never lost: they are captured as an
//! [`UnknownError`] carrying the original payload. Only a result whose set is
//! empty offers [`promise`](AsyncResult::promise); everything else has to go
//! through [`unsafe_promise`](AsyncResult::unsafe_promise), which gives up
//! the error's type.
//!
//! ## Quick Example
//!
//! ```rust
//! use tideline::{combine, from_result, ok, AsyncResult, Errors};
//!
//! #[derive(Debug)]
//! struct NotFound;
//! #[derive(Debug)]
//! struct Timeout;
//!
//! fn lookup(id: u32) -> AsyncResult<&'static str, Errors![NotFound, Timeout]> {
//!     from_result(move || match id {
//!         1 => Ok("alice"),
//!         _ => Err(NotFound),
//!     })
//!     .widen()
//! }
//!
//! # tokio_test::block_on(async {
//! let names = combine((lookup(1), lookup(2)))
//!     .widen::<Errors![NotFound, Timeout], _>()
//!     .map(|(a, b)| format!("{a} and {b}"))
//!     .map_err(|_: NotFound| ok("someone is missing".to_string()))
//!     .map_err(|_: Timeout| ok("too slow".to_string()));
//!
//! assert_eq!(names.promise().await.ok().as_deref(), Some("someone is missing"));
//! # });
//! ```
//!
//! Tuple [`combine`] concatenates error sets, so both lookups contribute
//! `NotFound` and `Timeout`. [`widen`](AsyncResult::widen) folds the
//! duplicates back into one set before they are handled.
//!
//! ## Features
//!
//! - `tracing`: emit events for captured panics and error handling, and
//!   instrument results with spans through [`ResultTracingExt`].
//! - `async`: [`AsyncResult::spawn`] drives a result eagerly on the tokio
//!   runtime.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod combine;
pub mod constructors;
pub mod fault;
#[cfg(feature = "tracing")]
pub mod instrument;
pub mod result;
pub mod testing;
pub mod union;
pub mod wrapper;

// Re-exports
pub use combine::{combine, combine_all, combine_future, Combine};
pub use constructors::{err, from_async, from_fn, from_result, ok, resultify, resultify_value};
pub use fault::{Fault, Rejection, UnknownError};
#[cfg(feature = "tracing")]
pub use instrument::ResultTracingExt;
pub use result::AsyncResult;
pub use union::{Concat, Embed, ErrorSet, Here, Member, Never, OneOf, There};
pub use wrapper::{Deferred, Direct, IntoResult};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::combine::{combine, combine_all, Combine};
    pub use crate::constructors::{err, from_async, from_fn, from_result, ok, resultify};
    pub use crate::fault::{Fault, UnknownError};
    #[cfg(feature = "tracing")]
    pub use crate::instrument::ResultTracingExt;
    pub use crate::result::AsyncResult;
    pub use crate::union::{Never, OneOf};
    pub use crate::Errors;
}
