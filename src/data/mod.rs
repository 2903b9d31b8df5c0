//! External data sources.

pub mod open_meteo;

pub use open_meteo::{ArchiveClient, ArchiveResponse, observations_from_response};
