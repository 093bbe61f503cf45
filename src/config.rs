use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{GeocodeError, Result};

pub const DEFAULT_INPUT: &str = "public/libraries.csv";
pub const DEFAULT_OUTPUT: &str = "public/library-coords.json";
pub const DEFAULT_ENDPOINT: &str = "https://nominatim.openstreetmap.org/search";
pub const DEFAULT_USER_AGENT: &str = "HarvardLibrariesMap/1.0";
/// Nominatim usage policy: at most one request per second
pub const DEFAULT_DELAY_MS: u64 = 1000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Runner configuration. Every field is optional in the TOML file.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub input: PathBuf,
    pub output: PathBuf,
    pub endpoint: String,
    pub user_agent: String,
    pub delay_ms: u64,
    pub timeout_secs: u64,
    /// Treat per-record lookup errors as misses instead of aborting
    pub keep_going: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            delay_ms: DEFAULT_DELAY_MS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            keep_going: false,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            GeocodeError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&content).map_err(|e| {
            GeocodeError::Config(format!("failed to parse {}: {}", path.display(), e))
        })
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<()> {
        if self.user_agent.trim().is_empty() {
            return Err(GeocodeError::Config(
                "user_agent must identify the client".to_string(),
            ));
        }
        if self.delay_ms < DEFAULT_DELAY_MS {
            return Err(GeocodeError::Config(format!(
                "delay_ms must be at least {} (Nominatim usage policy)",
                DEFAULT_DELAY_MS
            )));
        }
        if self.timeout_secs == 0 {
            return Err(GeocodeError::Config(
                "timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
