//! Host side of the bridge: type descriptors and the values host functions
//! consume and produce.

mod ty;
mod value;

pub use ty::*;
pub use value::*;
