//! Error taxonomy for the geocoding pipeline.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeocodeError {
    /// Input file missing or unreadable
    #[error("failed to read input file {path}")]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("input file {path} has no '{column}' column")]
    MissingColumn { path: PathBuf, column: &'static str },

    #[error("malformed CSV in {path}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Transport-level failure talking to the geocoding service
    #[error("request for '{address}' failed")]
    Http {
        address: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("geocoding service returned {status} for '{address}'")]
    Status {
        address: String,
        status: reqwest::StatusCode,
    },

    #[error("malformed response for '{address}': {reason}")]
    MalformedResponse { address: String, reason: String },

    #[error("failed to write output file {path}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write progress report")]
    Report(#[source] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T, E = GeocodeError> = std::result::Result<T, E>;
