use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use triomphe::Arc;

use crate::error::{BoxError, CellError};

/// Callback invoked after a committed change with `(key, old, new)`.
pub(crate) type Watch<T> = Rc<dyn Fn(&str, &Arc<T>, &Arc<T>) -> Result<(), BoxError>>;

/// Keyed watch callbacks, notified in registration order.
pub(crate) struct Watches<T> {
    entries: RefCell<Vec<(String, Watch<T>)>>,
}

impl<T> Watches<T> {
    pub(crate) fn new() -> Self {
        Self {
            entries: RefCell::new(Vec::new()),
        }
    }

    /// Registers `watch` under `key`. An existing key keeps its position.
    pub(crate) fn add(&self, key: String, watch: Watch<T>) {
        let mut entries = self.entries.borrow_mut();

        match entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = watch,
            None => entries.push((key, watch)),
        }
    }

    pub(crate) fn remove(&self, key: &str) -> bool {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|(existing, _)| existing != key);
        entries.len() != before
    }

    pub(crate) fn keys(&self) -> Vec<String> {
        self.entries
            .borrow()
            .iter()
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Calls every watch with `(old, new)`, stopping at the first failure.
    ///
    /// Iterates over a snapshot so callbacks may add or remove watches.
    pub(crate) fn notify(&self, old: &Arc<T>, new: &Arc<T>) -> Result<(), CellError> {
        let snapshot: Vec<(String, Watch<T>)> = self
            .entries
            .borrow()
            .iter()
            .map(|(key, watch)| (key.clone(), Rc::clone(watch)))
            .collect();

        for (key, watch) in snapshot {
            if let Err(source) = watch(key.as_str(), old, new) {
                tracing::debug!(key = %key, error = %source, "watch failed after commit");
                return Err(CellError::Watch { key, source });
            }
        }

        Ok(())
    }
}

impl<T> fmt::Debug for Watches<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.keys()).finish()
    }
}
