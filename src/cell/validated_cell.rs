use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use triomphe::Arc;

use crate::cell::meta::{MetaSlot, Metadata};
use crate::cell::slot::Slot;
use crate::cell::watches::Watches;
use crate::error::{BoxError, CellError};
use crate::reference::{self, Commit, Reference};

/// Predicate a candidate value must satisfy before it is committed.
pub type Validator<T> = Rc<dyn Fn(&T) -> bool>;

/// Unsynchronized reference cell with an optional validator and keyed watches.
///
/// Mutation goes through [`Reference`]. A candidate is validated only when a
/// validator is installed; a rejected candidate leaves the cell untouched and no
/// watch runs. After a commit every watch is called in registration order with
/// the `(old, new)` pair of that commit. Watches run after the value changed, so
/// a failing watch is reported to the caller but does not roll anything back.
pub struct ValidatedCell<T> {
    slot: Slot<T>,
    meta: MetaSlot,
    validator: RefCell<Option<Validator<T>>>,
    watches: Watches<T>,
}

impl<T> ValidatedCell<T> {
    /// Creates a cell holding `initial`, with no validator.
    pub fn new(initial: T) -> Self {
        Self::build(initial, None, None)
    }

    /// Creates a cell holding `initial` with metadata attached.
    pub fn with_meta(initial: T, meta: Metadata) -> Self {
        Self::build(initial, Some(meta), None)
    }

    /// Creates a cell guarded by `validator`.
    ///
    /// # Errors
    ///
    /// [`CellError::InvalidState`] if `validator` rejects `initial`.
    pub fn with_validator<F>(initial: T, validator: F) -> Result<Self, CellError>
    where
        F: Fn(&T) -> bool + 'static,
    {
        let validator: Validator<T> = Rc::new(validator);
        check(Some(&validator), &initial)?;

        Ok(Self::build(initial, None, Some(validator)))
    }

    /// Creates a cell with metadata attached and guarded by `validator`.
    ///
    /// # Errors
    ///
    /// [`CellError::InvalidState`] if `validator` rejects `initial`.
    pub fn with_meta_and_validator<F>(
        initial: T,
        meta: Metadata,
        validator: F,
    ) -> Result<Self, CellError>
    where
        F: Fn(&T) -> bool + 'static,
    {
        let validator: Validator<T> = Rc::new(validator);
        check(Some(&validator), &initial)?;

        Ok(Self::build(initial, Some(meta), Some(validator)))
    }

    fn build(initial: T, meta: Option<Metadata>, validator: Option<Validator<T>>) -> Self {
        Self {
            slot: Slot::new(Arc::new(initial)),
            meta: MetaSlot::new(meta),
            validator: RefCell::new(validator),
            watches: Watches::new(),
        }
    }

    /// Returns the current value.
    pub fn read(&self) -> Arc<T> {
        self.slot.load()
    }

    /// Installs `validator` after checking the current value against it.
    ///
    /// # Errors
    ///
    /// [`CellError::InvalidState`] if the current value is rejected. The previous
    /// validator stays installed.
    pub fn set_validator<F>(&self, validator: F) -> Result<(), CellError>
    where
        F: Fn(&T) -> bool + 'static,
    {
        let validator: Validator<T> = Rc::new(validator);
        check(Some(&validator), &*self.slot.load())?;

        self.validator.replace(Some(validator));
        Ok(())
    }

    /// Removes the validator, if any.
    pub fn clear_validator(&self) -> Option<Validator<T>> {
        self.validator.replace(None)
    }

    /// Returns the installed validator.
    pub fn validator(&self) -> Option<Validator<T>> {
        self.validator.borrow().clone()
    }

    /// Registers `watch` under `key`, replacing any watch already using that key.
    pub fn add_watch<F>(&self, key: impl Into<String>, watch: F)
    where
        F: Fn(&str, &Arc<T>, &Arc<T>) -> Result<(), BoxError> + 'static,
    {
        self.watches.add(key.into(), Rc::new(watch));
    }

    /// Removes the watch registered under `key`. Returns whether one existed.
    pub fn remove_watch(&self, key: &str) -> bool {
        self.watches.remove(key)
    }

    /// Keys of the registered watches, in notification order.
    pub fn watch_keys(&self) -> Vec<String> {
        self.watches.keys()
    }

    /// Returns the attached metadata.
    pub fn meta(&self) -> Option<Arc<Metadata>> {
        self.meta.get()
    }

    /// Replaces the attached metadata.
    pub fn reset_meta(&self, meta: Option<Metadata>) -> Option<Arc<Metadata>> {
        self.meta.reset(meta)
    }

    /// Replaces the attached metadata with `f(current)`.
    pub fn alter_meta<F>(&self, f: F) -> Arc<Metadata>
    where
        F: FnOnce(Option<&Metadata>) -> Metadata,
    {
        self.meta.alter(f)
    }
}

fn check<T>(validator: Option<&Validator<T>>, candidate: &T) -> Result<(), CellError> {
    match validator {
        Some(validator) if !validator(candidate) => {
            tracing::debug!("validator rejected candidate state");
            Err(CellError::InvalidState)
        }
        _ => Ok(()),
    }
}

impl<T> Commit<T> for ValidatedCell<T> {
    type Error = CellError;

    fn load(&self) -> Arc<T> {
        self.slot.load()
    }

    fn validate(&self, candidate: &T) -> Result<(), CellError> {
        // cloned out so the validator may inspect the cell
        let validator = self.validator.borrow().clone();
        check(validator.as_ref(), candidate)
    }

    fn commit(&self, new: Arc<T>) -> Result<Arc<T>, CellError> {
        let old = self.slot.store(Arc::clone(&new));
        self.watches.notify(&old, &new)?;
        Ok(old)
    }
}

impl<T> Reference<T> for ValidatedCell<T> {
    type Error = CellError;

    fn read(&self) -> Arc<T> {
        self.slot.load()
    }

    fn swap_vals<F>(&self, f: F) -> Result<(Arc<T>, Arc<T>), CellError>
    where
        F: FnOnce(&T) -> T,
    {
        reference::swap_vals(self, f)
    }

    fn reset_vals(&self, next: impl Into<Arc<T>>) -> Result<(Arc<T>, Arc<T>), CellError> {
        reference::reset_vals(self, next.into())
    }

    fn compare_and_set(
        &self,
        expected: &Arc<T>,
        next: impl Into<Arc<T>>,
    ) -> Result<bool, CellError> {
        reference::compare_and_set(self, expected, next.into())
    }
}

impl<T: fmt::Debug> fmt::Debug for ValidatedCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatedCell")
            .field("value", &self.slot.load())
            .field("meta", &self.meta.get())
            .field("validator", &self.validator.borrow().is_some())
            .field("watches", &self.watches)
            .finish()
    }
}
