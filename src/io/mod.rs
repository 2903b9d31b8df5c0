//! Input/output helpers.
//!
//! - dataset artifact read/write (`dataset`)
//! - period summary export (`summary`)

pub mod dataset;
pub mod summary;

pub use dataset::*;
pub use summary::*;
