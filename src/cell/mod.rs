mod fast_cell;
mod meta;
mod slot;
mod validated_cell;
mod watches;

pub use crate::cell::fast_cell::FastCell;
pub use crate::cell::meta::Metadata;
pub use crate::cell::validated_cell::{ValidatedCell, Validator};
