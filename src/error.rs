//! Error types for listing operations

use std::io;
use std::path::PathBuf;

/// Rejected listing option. Raised before the filesystem is touched.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid type: at least one type must be listed")]
    EmptyType,

    #[error("invalid type char {0:?}, must be 'f', 'd' or '?'")]
    InvalidType(char),

    #[error("invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("negative depth {0} is invalid")]
    NegativeDepth(i64),
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("can't read directory {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("can't stat {}: {source}", path.display())]
    Metadata {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("can't write output: {0}")]
    Output(#[source] io::Error),

    #[error("can't serialize entries: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
