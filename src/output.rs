//! JSON output writer.

use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::info;

use crate::error::{GeocodeError, Result};
use crate::models::ResultMap;

/// Write the result map as a pretty-printed JSON object, replacing any
/// existing file at `path`.
pub fn write_results(path: &Path, results: &ResultMap) -> Result<()> {
    let io_err = |source: std::io::Error| GeocodeError::Output {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let mut json = serde_json::to_vec_pretty(results).map_err(|e| io_err(e.into()))?;
    json.push(b'\n');

    let mut file = fs::File::create(path).map_err(io_err)?;
    file.write_all(&json).map_err(io_err)?;

    info!("Wrote {} entries to {}", results.len(), path.display());
    Ok(())
}
