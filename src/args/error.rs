use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building argument nodes.
#[derive(Debug, Error)]
pub enum ArgError {
    #[error("Failed to create export directory '{path}': {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Export path '{}' is not valid UTF-8", path.display())]
    NonUtf8Path { path: PathBuf },

    #[error("Profile set name must not be empty")]
    EmptyName,

    #[error("Profile set name '{name}' must not contain a double quote")]
    QuotedName { name: String },
}
