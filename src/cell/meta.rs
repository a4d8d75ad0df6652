use std::cell::RefCell;
use std::collections::BTreeMap;
use triomphe::Arc;

/// Metadata attached to a cell.
pub type Metadata = BTreeMap<String, String>;

#[derive(Debug, Default)]
pub(crate) struct MetaSlot {
    meta: RefCell<Option<Arc<Metadata>>>,
}

impl MetaSlot {
    pub(crate) fn new(meta: Option<Metadata>) -> Self {
        Self {
            meta: RefCell::new(meta.map(Arc::new)),
        }
    }

    pub(crate) fn get(&self) -> Option<Arc<Metadata>> {
        self.meta.borrow().clone()
    }

    pub(crate) fn reset(&self, meta: Option<Metadata>) -> Option<Arc<Metadata>> {
        let meta = meta.map(Arc::new);
        self.meta.replace(meta.clone());
        meta
    }

    pub(crate) fn alter<F>(&self, f: F) -> Arc<Metadata>
    where
        F: FnOnce(Option<&Metadata>) -> Metadata,
    {
        let current = self.get();
        let next = Arc::new(f(current.as_deref()));
        self.meta.replace(Some(Arc::clone(&next)));
        next
    }
}
