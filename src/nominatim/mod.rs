//! Remote address lookup against a Nominatim-compatible search endpoint.

mod client;

pub use client::{parse_first_hit, NominatimClient};

use crate::error::Result;
use crate::models::Coordinate;

/// Resolves a free-text address to at most one coordinate.
///
/// `Ok(None)` means the service answered but had no candidates.
#[allow(async_fn_in_trait)]
pub trait Geocoder {
    async fn lookup(&self, address: &str) -> Result<Option<Coordinate>>;
}
