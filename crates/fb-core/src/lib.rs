//! FerroBridge core
//!
//! Shared vocabulary between the array interpreter and the host bridge: the
//! dynamic [`value::Value`] model, host type descriptors and host values, and
//! the error taxonomy every bridge operation reports through.

#[macro_use]
pub mod macros;

pub mod config;
pub mod error;
pub mod host;
pub mod utils;
pub mod value;

// Re-export commonly used items for convenience
pub use eyre;
pub use num_complex::Complex64;
pub use tracing;

// Alias for error types
pub type Error = crate::error::Error;
pub type Result<T> = crate::error::Result<T>;
