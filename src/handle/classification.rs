use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use crate::error::ClassificationConflict;
use crate::handle::capability::{Call, Capability};

/// What an operation declares as its result type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[allow(clippy::exhaustive_enums)]
pub enum Returns {
    /// The capability itself, making the operation head-mutating.
    Capability,
    /// Anything else.
    Value,
}

/// One operation as declared by one interface of a capability.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Declaration<Id> {
    /// Name of the declaring interface.
    pub interface: &'static str,
    /// Operation identifier.
    pub op: Id,
    /// Declared result type.
    pub returns: Returns,
}

impl<Id> Declaration<Id> {
    /// Declares `op` on `interface` as returning the capability.
    pub const fn head(interface: &'static str, op: Id) -> Self {
        Self {
            interface,
            op,
            returns: Returns::Capability,
        }
    }

    /// Declares `op` on `interface` as returning a plain value.
    pub const fn value(interface: &'static str, op: Id) -> Self {
        Self {
            interface,
            op,
            returns: Returns::Value,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Entry {
    interface: &'static str,
    returns: Returns,
}

/// Table deciding, per operation, whether its result replaces a stable handle's target.
///
/// Operations missing from the table never replace the target.
#[derive(Clone, Debug)]
pub struct Classification<Id> {
    table: HashMap<Id, Entry>,
}

impl<Id: Copy + Eq + Hash + fmt::Debug> Classification<Id> {
    /// Builds the table from the declarations of every interface.
    ///
    /// # Errors
    ///
    /// [`ClassificationConflict`] when one operation is declared as returning the
    /// capability by one interface and a plain value by another.
    pub fn build<I>(declarations: I) -> Result<Self, ClassificationConflict>
    where
        I: IntoIterator<Item = Declaration<Id>>,
    {
        let mut table: HashMap<Id, Entry> = HashMap::new();

        for declaration in declarations {
            let entry = Entry {
                interface: declaration.interface,
                returns: declaration.returns,
            };

            match table.get(&declaration.op) {
                Some(existing) if existing.returns != entry.returns => {
                    let (head, value) = match existing.returns {
                        Returns::Capability => (existing.interface, entry.interface),
                        Returns::Value => (entry.interface, existing.interface),
                    };
                    tracing::debug!(op = ?declaration.op, head, value, "conflicting operation classification");

                    return Err(ClassificationConflict {
                        op: format!("{:?}", declaration.op),
                        head,
                        value,
                    });
                }
                Some(_) => {}
                None => {
                    table.insert(declaration.op, entry);
                }
            }
        }

        Ok(Self { table })
    }

    /// Builds the table from the surface declared by `C`.
    ///
    /// # Errors
    ///
    /// See [`Classification::build`].
    pub fn of<C>() -> Result<Self, ClassificationConflict>
    where
        C: Capability,
        C::Call: Call<Id = Id>,
    {
        Self::build(C::surface())
    }

    /// Returns whether the result of `op` becomes the new target.
    pub fn replaces_target(&self, op: Id) -> bool {
        self.table
            .get(&op)
            .is_some_and(|entry| entry.returns == Returns::Capability)
    }

    /// Number of classified operations.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether no operation is classified.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
