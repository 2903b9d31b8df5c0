//! Reporting: formatted terminal output for summaries, tables and the
//! station card.

pub mod format;

pub use format::*;
