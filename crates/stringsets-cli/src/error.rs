use std::path::PathBuf;
use stringsets_core::StoreError;
use thiserror::Error;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Set {key} in {path}: {source}")]
    InvalidSet {
        path: PathBuf,
        key: String,
        source: StoreError,
    },

    #[error("Set key {key:?} in {path} is not a numeric id")]
    BadKey { path: PathBuf, key: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CliError {
    /// Process exit code: 2 for bad input, 1 for everything else.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Store(e) if e.is_bad_request() => 2,
            CliError::Json { .. } | CliError::InvalidSet { .. } | CliError::BadKey { .. } => 2,
            _ => 1,
        }
    }
}
