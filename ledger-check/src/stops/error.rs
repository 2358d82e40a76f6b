//! Stop directory error types.

use std::path::PathBuf;

/// Errors that can occur when loading the stop directory.
#[derive(Debug, thiserror::Error)]
pub enum StopDirectoryError {
    /// The directory file could not be opened
    #[error("cannot read stop directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A row could not be parsed
    #[error("bad stop directory row in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The same stop id appears twice
    #[error("duplicate stop id {stop_id} in {path}")]
    Duplicate { path: PathBuf, stop_id: u32 },
}
