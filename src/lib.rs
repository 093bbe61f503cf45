//! Batch geocoder - resolves a CSV of addresses to coordinates via Nominatim
//!
//! This library provides the pipeline stages used by the `geocode` binary.

pub mod config;
pub mod error;
pub mod input;
pub mod models;
pub mod nominatim;
pub mod output;
pub mod rate;
pub mod runner;

pub use config::Config;
pub use error::GeocodeError;
pub use models::{Coordinate, InputRecord, ResultMap};
pub use nominatim::{Geocoder, NominatimClient};
pub use rate::{FixedDelay, Pause};
pub use runner::{run_batch, RunSummary};
