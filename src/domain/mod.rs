//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the day-level intensity classifier (`intensity`)
//! - observations, date ranges and period summaries (`types`)

pub mod intensity;
pub mod types;

pub use intensity::*;
pub use types::*;
