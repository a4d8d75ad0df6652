use std::convert::Infallible;
use triomphe::Arc;

use crate::cell::meta::{MetaSlot, Metadata};
use crate::cell::slot::Slot;
use crate::reference::{self, Commit, Reference};
use crate::utils::into_ok;

/// Reference cell without validation, watches or synchronization.
///
/// Intended for single-writer hot loops. Operations are the same as on an atom,
/// but nothing is retried and there are no memory barriers: the cell is `!Sync`,
/// and callers sharing it between logical writers get last-write-wins.
#[derive(Debug)]
pub struct FastCell<T> {
    slot: Slot<T>,
    meta: MetaSlot,
}

impl<T> FastCell<T> {
    /// Creates a cell holding `initial`.
    pub fn new(initial: T) -> Self {
        Self {
            slot: Slot::new(Arc::new(initial)),
            meta: MetaSlot::default(),
        }
    }

    /// Creates a cell holding `initial` with metadata attached.
    pub fn with_meta(initial: T, meta: Metadata) -> Self {
        Self {
            slot: Slot::new(Arc::new(initial)),
            meta: MetaSlot::new(Some(meta)),
        }
    }

    /// Returns the current value.
    pub fn read(&self) -> Arc<T> {
        self.slot.load()
    }

    /// Replaces the value with `f(current)` and returns it.
    pub fn swap<F>(&self, f: F) -> Arc<T>
    where
        F: FnOnce(&T) -> T,
    {
        into_ok(Reference::swap(self, f))
    }

    /// Like [`swap`](FastCell::swap), passing `arg` through to `f`.
    pub fn swap_with<A, F>(&self, f: F, arg: A) -> Arc<T>
    where
        F: FnOnce(&T, A) -> T,
    {
        into_ok(Reference::swap_with(self, f, arg))
    }

    /// Like [`swap`](FastCell::swap), returning `(old, new)`.
    pub fn swap_vals<F>(&self, f: F) -> (Arc<T>, Arc<T>)
    where
        F: FnOnce(&T) -> T,
    {
        into_ok(Reference::swap_vals(self, f))
    }

    /// Unconditionally replaces the value and returns it.
    pub fn reset(&self, next: impl Into<Arc<T>>) -> Arc<T> {
        into_ok(Reference::reset(self, next))
    }

    /// Like [`reset`](FastCell::reset), returning `(old, new)`.
    pub fn reset_vals(&self, next: impl Into<Arc<T>>) -> (Arc<T>, Arc<T>) {
        into_ok(Reference::reset_vals(self, next))
    }

    /// Sets the value to `next` if the current value is identical to `expected`.
    pub fn compare_and_set(&self, expected: &Arc<T>, next: impl Into<Arc<T>>) -> bool {
        into_ok(Reference::compare_and_set(self, expected, next))
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

impl<T> Commit<T> for FastCell<T> {
    type Error = Infallible;

    fn load(&self) -> Arc<T> {
        self.slot.load()
    }

    fn validate(&self, _: &T) -> Result<(), Infallible> {
        Ok(())
    }

    fn commit(&self, new: Arc<T>) -> Result<Arc<T>, Infallible> {
        Ok(self.slot.store(new))
    }
}

impl<T> Reference<T> for FastCell<T> {
    type Error = Infallible;

    fn read(&self) -> Arc<T> {
        self.slot.load()
    }

    fn swap_vals<F>(&self, f: F) -> Result<(Arc<T>, Arc<T>), Infallible>
    where
        F: FnOnce(&T) -> T,
    {
        reference::swap_vals(self, f)
    }

    fn reset_vals(&self, next: impl Into<Arc<T>>) -> Result<(Arc<T>, Arc<T>), Infallible> {
        reference::reset_vals(self, next.into())
    }

    fn compare_and_set(
        &self,
        expected: &Arc<T>,
        next: impl Into<Arc<T>>,
    ) -> Result<bool, Infallible> {
        reference::compare_and_set(self, expected, next.into())
    }
}

impl<T: Default> Default for FastCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod test {
    use super::FastCell;
    use crate::cell::Metadata;
    use proptest::prelude::*;
    use std::cell::Cell;
    use triomphe::Arc;

    #[test]
    fn counter_sequence() {
        let cell = FastCell::new(0);

        assert_eq!(*cell.swap(|x| x + 1), 1);
        let six = cell.swap(|x| x + 5);
        assert_eq!(*six, 6);

        assert!(cell.compare_and_set(&six, 10));
        assert_eq!(*cell.read(), 10);

        assert!(!cell.compare_and_set(&six, 20));
        assert_eq!(*cell.read(), 10);
    }

    #[test]
    fn compare_and_set_uses_identity() {
        let cell = FastCell::new(String::from("a"));
        let lookalike = Arc::new(String::from("a"));

        assert!(!cell.compare_and_set(&lookalike, String::from("b")));
        assert_eq!(cell.read().as_str(), "a");
    }

    #[test]
    fn reset_keeps_identity_of_shared_values() {
        let shared = Arc::new(vec![1, 2]);
        let cell = FastCell::<Vec<i32>>::new(Vec::new());

        let stored = cell.reset(Arc::clone(&shared));

        assert!(Arc::ptr_eq(&stored, &shared));
        assert!(cell.compare_and_set(&shared, vec![3]));
    }

    #[test]
    fn swap_runs_function_once() {
        let calls = Cell::new(0);
        let cell = FastCell::new(1);

        cell.swap(|x| {
            calls.set(calls.get() + 1);
            x * 2
        });

        assert_eq!(calls.get(), 1);
        assert_eq!(*cell.read(), 2);
    }

    #[test]
    fn swap_with_arguments() {
        let cell = FastCell::new(10);

        assert_eq!(*cell.swap_with(|x, n| x - n, 3), 7);
        assert_eq!(*cell.swap_with(|x, (a, b)| x * a + b, (2, 1)), 15);
        assert_eq!(*crate::swap!(cell, |x: &i32, a, b, c| x + a + b + c, 1, 2, 3), 21);
    }

    #[test]
    fn vals_variants() {
        let cell = FastCell::new(1);

        let (old, new) = cell.swap_vals(|x| x + 1);
        assert_eq!((*old, *new), (1, 2));

        let (old, new) = cell.reset_vals(9);
        assert_eq!((*old, *new), (2, 9));
    }

    #[test]
    fn function_may_read_cell() {
        let cell = FastCell::new(2);
        let result = cell.swap(|x| x + *cell.read());
        assert_eq!(*result, 4);
    }

    #[test]
    fn metadata() {
        let mut meta = Metadata::new();
        meta.insert("owner".to_owned(), "loop".to_owned());
        let cell = FastCell::with_meta(0, meta);

        assert_eq!(cell.meta().unwrap()["owner"], "loop");

        let altered = cell.alter_meta(|current| {
            let mut next = current.cloned().unwrap_or_default();
            next.insert("phase".to_owned(), "warm".to_owned());
            next
        });
        assert_eq!(altered.len(), 2);

        assert!(cell.reset_meta(None).is_none());
        assert!(cell.meta().is_none());
        assert_eq!(*cell.read(), 0);
    }

    proptest! {
        #[test]
        fn prop_swap_applies_function(v0 in any::<i64>(), delta in any::<i64>()) {
            let cell = FastCell::new(v0);
            let returned = cell.swap(|x| x.wrapping_add(delta));

            prop_assert_eq!(*returned, v0.wrapping_add(delta));
            prop_assert_eq!(*cell.read(), v0.wrapping_add(delta));
        }

        #[test]
        fn prop_reset_is_unconditional(v0 in any::<i32>(), next in any::<i32>()) {
            let cell = FastCell::new(v0);
            prop_assert_eq!(*cell.reset(next), next);
            prop_assert_eq!(*cell.read(), next);
        }
    }
}
