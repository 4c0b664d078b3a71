//! FerroBridge
//!
//! Lets the array interpreter call host functions and work with host records
//! without hand-written bindings. Host packages describe their functions with
//! [`fb_core::host::Signature`] and their records with
//! [`fb_core::host::RecordType`]; this crate turns those descriptions into
//! interpreter values:
//!
//! - [`Callable`] marshals operands into positional host arguments and imports
//!   the results,
//! - [`Reflect`] reads and writes fields of boxed host records and binds their
//!   methods,
//! - [`Constructor`] allocates zeroed host values,
//! - [`convert`] holds the conversion rules both directions share.

pub mod boxed;
pub mod callable;
pub mod constructor;
pub mod convert;
pub mod package;

pub use boxed::{exported_name, Reflect};
pub use callable::{ArgLayout, Callable};
pub use constructor::Constructor;
pub use convert::{export, import};
pub use package::Package;
