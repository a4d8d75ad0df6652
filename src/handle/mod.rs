mod capability;
mod classification;
#[cfg(test)]
mod fixture;
mod stable;

pub use crate::handle::capability::{Call, Capability, Editable, Reply};
pub use crate::handle::classification::{Classification, Declaration, Returns};
pub use crate::handle::stable::StableHandle;
