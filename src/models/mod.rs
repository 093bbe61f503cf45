//! Core data models for the batch geocoder.

pub mod coordinate;
pub mod record;

pub use coordinate::{Coordinate, ResultMap};
pub use record::InputRecord;
