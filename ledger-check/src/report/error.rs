//! Report error types.

use std::path::PathBuf;

/// Errors that can occur when writing reports.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Writing a report file failed
    #[error("cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Encoding the JSON summary failed
    #[error("cannot encode summary for {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
