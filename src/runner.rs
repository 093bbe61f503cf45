//! Sequential geocoding loop.
//!
//! Reads all records, looks each one up in input order with a pause between
//! consecutive requests, then writes the collected coordinates.

use std::io::Write;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{GeocodeError, Result};
use crate::input::read_records;
use crate::models::{InputRecord, ResultMap};
use crate::nominatim::Geocoder;
use crate::output::write_results;
use crate::rate::Pause;

/// Outcome counts of a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub written: usize,
    pub failed: usize,
}

/// Geocode `records` in order, pausing between consecutive lookups.
///
/// Lookup errors abort the batch unless `keep_going` is set, in which case
/// they are reported and counted like an empty result.
pub async fn geocode_all<G, P, W>(
    records: &[InputRecord],
    geocoder: &G,
    gate: &mut P,
    keep_going: bool,
    out: &mut W,
) -> Result<(ResultMap, usize)>
where
    G: Geocoder,
    P: Pause,
    W: Write,
{
    let total = records.len();
    let mut results = ResultMap::new();
    let mut failed = 0;

    writeln!(out, "Geocoding {} records...", total).map_err(GeocodeError::Report)?;

    for (i, record) in records.iter().enumerate() {
        write!(out, "  [{}/{}] {}... ", i + 1, total, record.id)
            .map_err(GeocodeError::Report)?;
        out.flush().map_err(GeocodeError::Report)?;

        match geocoder.lookup(&record.address).await {
            Ok(Some(coordinate)) => {
                writeln!(out, "OK {}", coordinate).map_err(GeocodeError::Report)?;
                results.insert(record.id.clone(), coordinate);
            }
            Ok(None) => {
                writeln!(out, "FAILED - no results").map_err(GeocodeError::Report)?;
                info!("No results for {} ({})", record.id, record.address);
                failed += 1;
            }
            Err(e) if keep_going => {
                writeln!(out, "FAILED - {}", e).map_err(GeocodeError::Report)?;
                warn!("Lookup failed for {}: {:?}", record.id, e);
                failed += 1;
            }
            Err(e) => {
                writeln!(out, "FAILED - {}", e).map_err(GeocodeError::Report)?;
                return Err(e);
            }
        }

        if i + 1 < total {
            gate.pause().await;
        }
    }

    Ok((results, failed))
}

/// Full pipeline: read input, geocode, write output, print the summary.
///
/// Nothing is written to the output path unless every step before it
/// succeeded.
pub async fn run_batch<G, P, W>(
    config: &Config,
    geocoder: &G,
    gate: &mut P,
    out: &mut W,
) -> Result<RunSummary>
where
    G: Geocoder,
    P: Pause,
    W: Write,
{
    let records = read_records(&config.input)?;

    let (results, failed) =
        geocode_all(&records, geocoder, gate, config.keep_going, out).await?;

    write_results(&config.output, &results)?;

    let summary = RunSummary {
        total: records.len(),
        written: results.len(),
        failed,
    };

    writeln!(
        out,
        "\nWrote {} coordinates to {}",
        summary.written,
        config.output.display()
    )
    .map_err(GeocodeError::Report)?;

    if summary.failed > 0 {
        writeln!(out, "Warning: {} records failed to geocode", summary.failed)
            .map_err(GeocodeError::Report)?;
        warn!("{} of {} records failed to geocode", summary.failed, summary.total);
    }

    Ok(summary)
}
