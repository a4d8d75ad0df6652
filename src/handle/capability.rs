use std::fmt;
use std::hash::Hash;
use triomphe::Arc;

use crate::handle::classification::Declaration;

/// A single invocation on a capability surface: which operation, plus its arguments.
pub trait Call {
    /// Identifier of the operation, without arguments.
    type Id: Copy + Eq + Hash + fmt::Debug;

    /// Returns the operation this call invokes.
    fn id(&self) -> Self::Id;
}

/// Result of invoking an operation on a capability.
#[derive(Debug)]
#[allow(clippy::exhaustive_enums)]
pub enum Reply<C, V> {
    /// An instance of the capability: either the receiver itself or a migrated head.
    Head(Arc<C>),
    /// Any other result.
    Value(V),
}

impl<C, V> Reply<C, V> {
    /// Returns the capability instance, if the reply carries one.
    pub const fn head(&self) -> Option<&Arc<C>> {
        match self {
            Self::Head(head) => Some(head),
            Self::Value(_) => None,
        }
    }

    /// Returns the plain value, if the reply carries one.
    pub fn into_value(self) -> Option<V> {
        match self {
            Self::Head(_) => None,
            Self::Value(value) => Some(value),
        }
    }
}

/// A builder whose operations may return a different instance as the next state.
///
/// Implementations enumerate the operations they declare in [`surface`](Capability::surface),
/// grouped by the interface declaring them, and perform one operation per
/// [`invoke`](Capability::invoke). An operation that continues editing in place
/// replies with the receiver itself; one that migrates replies with the new head.
pub trait Capability: Sized {
    /// Invocation type of this surface.
    type Call: Call;
    /// Non-capability results.
    type Value;
    /// Failure of an operation.
    type Error;

    /// Every operation declared across the interfaces this capability implements.
    fn surface() -> Vec<Declaration<<Self::Call as Call>::Id>>;

    /// Performs `call` on `this`.
    ///
    /// # Errors
    ///
    /// Whatever the builder reports for the operation.
    fn invoke(this: &Arc<Self>, call: Self::Call) -> Result<Reply<Self, Self::Value>, Self::Error>;
}

/// A value that can produce an initial builder of itself.
pub trait Editable {
    /// Builder produced from this value.
    type Transient: Capability;

    /// Returns a fresh builder seeded from `self`.
    fn as_transient(&self) -> Arc<Self::Transient>;
}
