#![warn(
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    clippy::clone_on_ref_ptr,
    clippy::dbg_macro,
    clippy::exhaustive_enums,
    clippy::undocumented_unsafe_blocks
)]
#![allow(clippy::redundant_pub_crate, clippy::must_use_candidate)]
#![deny(missing_debug_implementations, missing_docs)]

//! # `StableRef`
//!
//! `stable_ref` provides imperative-style mutation over values that are not
//! naturally stateful, for single-threaded code where real atomics are overhead.
//!
//! * [`FastCell`] is an atom without synchronization, validation or watches.
//! * [`ValidatedCell`] adds an optional validator and keyed watches.
//! * [`StableHandle`] wraps a builder whose operations may return a new head, and
//!   keeps forwarding to the latest head so the handle can be edited in place.
//!
//! None of these types are `Sync`, and nothing is ever retried: a `swap` runs its
//! function exactly once.
//!
//! ## Example
//!
//! ```rust
//! use stable_ref::FastCell;
//!
//! let cell = FastCell::new(0);
//!
//! cell.swap(|x| x + 1);
//! let six = cell.swap(|x| x + 5);
//!
//! // compared by identity, not by value
//! assert!(cell.compare_and_set(&six, 10));
//! assert!(!cell.compare_and_set(&six, 20));
//! assert_eq!(*cell.read(), 10);
//! ```
//!
//! Validated cells report rejected values and failing watches as errors. Their
//! mutating operations come from the [`Reference`] trait.
//!
//! ```rust
//! use stable_ref::{CellError, Reference, ValidatedCell};
//!
//! let cell = ValidatedCell::with_validator(5, |x: &i32| *x >= 0).unwrap();
//! cell.add_watch("log", |key, old, new| {
//!     println!("{key}: {} -> {}", **old, **new);
//!     Ok(())
//! });
//!
//! assert!(matches!(cell.reset(-1), Err(CellError::InvalidState)));
//! assert_eq!(*cell.read(), 5);
//! ```
//!
//! A builder becomes usable behind a [`StableHandle`] by implementing
//! [`Capability`]: enumerate its operations, declare which of them return the
//! builder itself, and perform one call at a time.
//!
//! ```rust
//! use std::cell::RefCell;
//! use stable_ref::{Call, Capability, Declaration, Reply, StableHandle};
//! use triomphe::Arc;
//!
//! #[derive(Debug)]
//! struct Buffer(RefCell<String>);
//!
//! #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
//! enum Op { Push, Len }
//!
//! enum BufferCall { Push(char), Len }
//!
//! impl Call for BufferCall {
//!     type Id = Op;
//!
//!     fn id(&self) -> Op {
//!         match self {
//!             Self::Push(_) => Op::Push,
//!             Self::Len => Op::Len,
//!         }
//!     }
//! }
//!
//! impl Capability for Buffer {
//!     type Call = BufferCall;
//!     type Value = usize;
//!     type Error = std::convert::Infallible;
//!
//!     fn surface() -> Vec<Declaration<Op>> {
//!         vec![Declaration::head("Buffer", Op::Push), Declaration::value("Buffer", Op::Len)]
//!     }
//!
//!     fn invoke(this: &Arc<Self>, call: BufferCall) -> Result<Reply<Self, usize>, Self::Error> {
//!         Ok(match call {
//!             // every push moves to a fresh buffer
//!             BufferCall::Push(c) => {
//!                 let mut next = this.0.borrow().clone();
//!                 next.push(c);
//!                 Reply::Head(Arc::new(Buffer(RefCell::new(next))))
//!             }
//!             BufferCall::Len => Reply::Value(this.0.borrow().len()),
//!         })
//!     }
//! }
//!
//! let handle = StableHandle::wrap(Arc::new(Buffer(RefCell::new(String::new())))).unwrap();
//! for c in "abc".chars() {
//!     handle.invoke(BufferCall::Push(c)).unwrap();
//! }
//!
//! assert_eq!(handle.current().0.borrow().as_str(), "abc");
//! assert_eq!(handle.migrations(), 3);
//! ```

mod cell;
mod error;
mod handle;
mod reference;
mod utils;

pub use crate::cell::{FastCell, Metadata, ValidatedCell, Validator};
pub use crate::error::{BoxError, CellError, ClassificationConflict};
pub use crate::handle::{
    Call, Capability, Classification, Declaration, Editable, Reply, Returns, StableHandle,
};
pub use crate::reference::Reference;

/// Swaps a cell's value with `f(current, args...)`.
///
/// Works with any cell exposing `swap`; bring [`Reference`] into scope for
/// [`ValidatedCell`].
///
/// ```rust
/// use stable_ref::{swap, FastCell};
///
/// let cell = FastCell::new(1);
/// swap!(cell, |x: &i32, a, b| x * a + b, 10, 2);
/// assert_eq!(*cell.read(), 12);
/// ```
#[macro_export]
macro_rules! swap {
    ($cell:expr, $f:expr $(, $arg:expr)* $(,)?) => {
        $cell.swap(|value| ($f)(value $(, $arg)*))
    };
}
