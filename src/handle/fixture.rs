//! Head-migrating vector builder used by the handle tests.
//!
//! Appends edit in place until the chunk is full, then move everything to a new
//! builder with twice the capacity and retire the old one. Popping below a
//! quarter of the capacity shrinks the same way. A retired builder refuses edits,
//! so callers holding it directly must follow the returned heads.

use std::cell::{Cell, RefCell};
use thiserror::Error;
use triomphe::Arc;

use crate::handle::capability::{Call, Capability, Editable, Reply};
use crate::handle::classification::Declaration;

const MIN_CAPACITY: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Op {
    Append,
    Pop,
    Peek,
    Count,
    Persistent,
}

#[derive(Debug)]
pub(crate) enum VecCall {
    Append(i64),
    Pop,
    Peek,
    Count,
    Persistent,
}

impl Call for VecCall {
    type Id = Op;

    fn id(&self) -> Op {
        match self {
            Self::Append(_) => Op::Append,
            Self::Pop => Op::Pop,
            Self::Peek => Op::Peek,
            Self::Count => Op::Count,
            Self::Persistent => Op::Persistent,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum VecValue {
    Item(Option<i64>),
    Count(usize),
    Items(Vec<i64>),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum VecError {
    #[error("transient used after persistent call")]
    Finished,
    #[error("transient used after its head migrated")]
    Migrated,
    #[error("can't pop empty vector")]
    Empty,
}

#[derive(Clone, Copy, Debug)]
enum State {
    Editable,
    Migrated,
    Finished,
}

#[derive(Debug)]
pub(crate) struct ChunkedVec {
    items: RefCell<Vec<i64>>,
    capacity: usize,
    state: Cell<State>,
}

impl ChunkedVec {
    pub(crate) fn with_capacity(capacity: usize) -> Arc<Self> {
        Self::seeded(Vec::new(), capacity)
    }

    fn seeded(items: Vec<i64>, capacity: usize) -> Arc<Self> {
        Arc::new(Self {
            items: RefCell::new(items),
            capacity: capacity.max(MIN_CAPACITY),
            state: Cell::new(State::Editable),
        })
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn items(&self) -> Vec<i64> {
        self.items.borrow().clone()
    }

    fn ensure_editable(&self) -> Result<(), VecError> {
        match self.state.get() {
            State::Editable => Ok(()),
            State::Migrated => Err(VecError::Migrated),
            State::Finished => Err(VecError::Finished),
        }
    }

    fn migrate(&self, capacity: usize) -> Arc<Self> {
        self.state.set(State::Migrated);
        Self::seeded(self.items.take(), capacity)
    }
}

impl Capability for ChunkedVec {
    type Call = VecCall;
    type Value = VecValue;
    type Error = VecError;

    fn surface() -> Vec<Declaration<Op>> {
        vec![
            Declaration::head("TransientCollection", Op::Append),
            Declaration::value("TransientCollection", Op::Count),
            Declaration::value("TransientCollection", Op::Persistent),
            Declaration::head("TransientVector", Op::Append),
            Declaration::head("TransientVector", Op::Pop),
            Declaration::value("TransientVector", Op::Peek),
            Declaration::value("Counted", Op::Count),
        ]
    }

    fn invoke(this: &Arc<Self>, call: VecCall) -> Result<Reply<Self, VecValue>, VecError> {
        match call {
            VecCall::Append(item) => {
                this.ensure_editable()?;

                let len = this.items.borrow().len();
                let head = if len < this.capacity {
                    Arc::clone(this)
                } else {
                    this.migrate(this.capacity * 2)
                };
                head.items.borrow_mut().push(item);

                Ok(Reply::Head(head))
            }
            VecCall::Pop => {
                this.ensure_editable()?;

                let len = {
                    let mut items = this.items.borrow_mut();
                    items.pop().ok_or(VecError::Empty)?;
                    items.len()
                };

                if this.capacity > MIN_CAPACITY && len <= this.capacity / 4 {
                    Ok(Reply::Head(this.migrate(this.capacity / 2)))
                } else {
                    Ok(Reply::Head(Arc::clone(this)))
                }
            }
            VecCall::Peek => {
                this.ensure_editable()?;
                Ok(Reply::Value(VecValue::Item(this.items.borrow().last().copied())))
            }
            VecCall::Count => {
                this.ensure_editable()?;
                Ok(Reply::Value(VecValue::Count(this.items.borrow().len())))
            }
            VecCall::Persistent => {
                this.ensure_editable()?;
                this.state.set(State::Finished);
                Ok(Reply::Value(VecValue::Items(this.items())))
            }
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct PersistentVec(pub(crate) Vec<i64>);

impl Editable for PersistentVec {
    type Transient = ChunkedVec;

    fn as_transient(&self) -> Arc<ChunkedVec> {
        ChunkedVec::seeded(self.0.clone(), self.0.len().next_power_of_two())
    }
}
