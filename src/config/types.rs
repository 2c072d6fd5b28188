use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::runner::DEFAULT_RECOVERY_FILE;

/// Root configuration container.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub simc: SimcConfig,
    #[serde(default)]
    pub run: RunConfig,
}

/// Where simc lives and how it is run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimcConfig {
    /// Directory containing the simc executable. Falls back to `SIMC_PATH`.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Kill simc after this many seconds (default: no limit).
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
    /// Where arguments are saved when simc cannot be launched.
    #[serde(default = "default_recovery_file")]
    pub recovery_file: PathBuf,
}

/// Arguments applied to every run, before the ones given on the command line.
///
/// Items are strings (`"iterations=1000"`) or inline tables
/// (`{ target_error = 0.1 }`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default)]
    pub args: Vec<toml::Value>,
}

fn default_recovery_file() -> PathBuf {
    PathBuf::from(DEFAULT_RECOVERY_FILE)
}

impl Default for SimcConfig {
    fn default() -> Self {
        Self {
            path: None,
            timeout_seconds: None,
            recovery_file: default_recovery_file(),
        }
    }
}

impl SimcConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}
