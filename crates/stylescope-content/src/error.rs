//! Content-side errors.

use thiserror::Error;

/// Failure to load a serialized page.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Failed to read snapshot {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid snapshot: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Snapshot node without a tag name")]
    MissingTag,
}
