use std::path::PathBuf;
use thiserror::Error;

use crate::runner::SIMC_PATH_ENV;

/// Errors that can occur when setting up or persisting runner state.
///
/// Launch failures and non-zero exits are not errors: they are recorded in
/// the runner history instead.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("simc location unknown: pass an explicit path or set {}", SIMC_PATH_ENV)]
    MissingSimcPath,

    #[error("Failed to write recovery file '{path}': {source}")]
    WriteRecovery {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize history: {0}")]
    Serialize(#[from] serde_json::Error),
}
