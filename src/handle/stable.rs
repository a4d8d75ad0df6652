use std::cell::{Cell, RefCell};
use std::fmt;
use triomphe::Arc;

use crate::error::ClassificationConflict;
use crate::handle::capability::{Call, Capability, Editable, Reply};
use crate::handle::classification::Classification;
use crate::utils::arc_ptr_compare;

type OpId<C> = <<C as Capability>::Call as Call>::Id;

/// Handle that stays the same while the builder behind it migrates heads.
///
/// Every call is forwarded to the current target. When the operation is
/// classified as head-mutating and replies with a capability instance, that
/// instance becomes the target for later calls. The reply is handed back
/// unchanged either way, and builder errors pass through untouched with the
/// target left as it was.
///
/// Like the cells, the handle is single-writer: callers serialize access.
pub struct StableHandle<C: Capability> {
    target: RefCell<Arc<C>>,
    classification: Arc<Classification<OpId<C>>>,
    migrations: Cell<usize>,
}

impl<C: Capability> StableHandle<C> {
    /// Wraps `target`, deciding head migrations with `classification`.
    ///
    /// The table is shared, so one built per capability serves every handle.
    pub fn new(target: Arc<C>, classification: Arc<Classification<OpId<C>>>) -> Self {
        Self {
            target: RefCell::new(target),
            classification,
            migrations: Cell::new(0),
        }
    }

    /// Wraps `target`, classifying the surface declared by `C`.
    ///
    /// # Errors
    ///
    /// [`ClassificationConflict`] if the declared surface is ambiguous.
    pub fn wrap(target: Arc<C>) -> Result<Self, ClassificationConflict> {
        let classification = Classification::of::<C>()?;
        Ok(Self::new(target, Arc::new(classification)))
    }

    /// Creates a builder from `coll` and wraps it.
    ///
    /// # Errors
    ///
    /// [`ClassificationConflict`] if the declared surface is ambiguous.
    pub fn from_editable<E>(coll: &E) -> Result<Self, ClassificationConflict>
    where
        E: Editable<Transient = C>,
    {
        Self::wrap(coll.as_transient())
    }

    /// Performs `call` on the current target.
    ///
    /// # Errors
    ///
    /// Whatever the target reports. The target is not replaced in that case.
    pub fn invoke(&self, call: C::Call) -> Result<Reply<C, C::Value>, C::Error> {
        let op = call.id();
        let target = self.current();

        let reply = C::invoke(&target, call)?;

        if let Reply::Head(head) = &reply {
            if self.classification.replaces_target(op) {
                if !arc_ptr_compare(head, &target) {
                    let migrations = self.migrations.get() + 1;
                    self.migrations.set(migrations);
                    tracing::trace!(?op, migrations, "stable handle head migrated");
                }
                self.target.replace(Arc::clone(head));
            }
        }

        Ok(reply)
    }

    /// Returns the builder calls are currently forwarded to.
    pub fn current(&self) -> Arc<C> {
        Arc::clone(&self.target.borrow())
    }

    /// Returns the table deciding head migrations.
    pub const fn classification(&self) -> &Arc<Classification<OpId<C>>> {
        &self.classification
    }

    /// Number of times the target was replaced by a different instance.
    pub fn migrations(&self) -> usize {
        self.migrations.get()
    }

    /// Consumes the handle, returning the current builder.
    pub fn into_target(self) -> Arc<C> {
        self.target.into_inner()
    }
}

impl<C> fmt::Debug for StableHandle<C>
where
    C: Capability + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StableHandle")
            .field("target", &self.current())
            .field("classification", &self.classification)
            .field("migrations", &self.migrations.get())
            .finish()
    }
}
