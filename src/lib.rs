//! `hujan` library crate.
//!
//! The binary (`hujan`) is a thin wrapper around this library so that:
//!
//! - the classifier, filter and summary logic is testable without spawning processes
//! - the acquirer and the aggregator can be used independently
//! - presentation stays a thin layer over the derived values

pub mod aggregate;
pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod plot;
pub mod report;
pub mod settings;
