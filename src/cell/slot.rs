use std::cell::RefCell;
use triomphe::Arc;

/// Single value holder shared by both cell flavours.
///
/// Borrows never outlive a method call, so user code running between a `load`
/// and a `store` may touch the slot again without panicking.
#[derive(Debug)]
pub(crate) struct Slot<T> {
    value: RefCell<Arc<T>>,
}

impl<T> Slot<T> {
    pub(crate) fn new(value: Arc<T>) -> Self {
        Self {
            value: RefCell::new(value),
        }
    }

    pub(crate) fn load(&self) -> Arc<T> {
        Arc::clone(&self.value.borrow())
    }

    /// Stores `new` and returns the value it replaced.
    pub(crate) fn store(&self, new: Arc<T>) -> Arc<T> {
        self.value.replace(new)
    }
}
