//! Error type for store operations

use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by [`Storage`](crate::Storage)
///
/// None of these are retried internally. A `Persistence` error returned from a
/// mutating call means the in-memory mapping was updated but the file was not.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing file exists but does not hold a JSON object
    #[error("Failed to parse store file {}: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A value could not be represented as JSON (or read back as the requested type)
    #[error("Value for key '{key}' cannot be represented as JSON: {source}")]
    Unserializable {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Reading, writing or deleting the backing file failed
    #[error("Failed to persist store file {}: {source}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    pub(crate) fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Persistence {
            path: path.into(),
            source,
        }
    }
}
