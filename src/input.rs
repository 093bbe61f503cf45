//! CSV input reader.

use csv::{ReaderBuilder, StringRecord, Trim};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{GeocodeError, Result};
use crate::models::InputRecord;

pub const ID_COLUMN: &str = "Id";
pub const ADDRESS_COLUMN: &str = "Address";

/// Load input records from a CSV file with an `Id` and `Address` header.
///
/// Gzip-compressed files (`.gz`) are decompressed on the fly.
pub fn read_records(path: &Path) -> Result<Vec<InputRecord>> {
    info!("Loading input records from {}", path.display());

    let file = File::open(path).map_err(|source| GeocodeError::Input {
        path: path.to_path_buf(),
        source,
    })?;
    let reader: Box<dyn Read> = if path.extension().map_or(false, |e| e == "gz") {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };

    let records = parse_records(reader, path)?;
    info!("Loaded {} records", records.len());
    Ok(records)
}

fn parse_records<R: Read>(reader: R, path: &Path) -> Result<Vec<InputRecord>> {
    let csv_err = |source: csv::Error| GeocodeError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers().map_err(csv_err)?.clone();

    let id_idx = column_index(&headers, ID_COLUMN, path)?;
    let address_idx = column_index(&headers, ADDRESS_COLUMN, path)?;

    let mut records = Vec::new();
    for result in csv_reader.records() {
        let row = result.map_err(csv_err)?;
        let record = InputRecord::new(&row[id_idx], &row[address_idx]);
        debug!("Read record {}", record.id);
        records.push(record);
    }

    Ok(records)
}

fn column_index(headers: &StringRecord, column: &'static str, path: &Path) -> Result<usize> {
    headers
        .iter()
        // Excel likes to prefix the first header with a BOM
        .position(|h| h.trim_start_matches('\u{feff}') == column)
        .ok_or_else(|| GeocodeError::MissingColumn {
            path: path.to_path_buf(),
            column,
        })
}
