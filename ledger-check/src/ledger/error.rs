//! Ledger error types.

use std::path::PathBuf;

use crate::domain::TimeError;

/// Errors that abort reading a ledger.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The ledger could not be read
    #[error("cannot read ledger {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line does not follow the ledger grammar
    #[error("illegal line {line} at {path}")]
    IllegalLine { path: PathBuf, line: usize },

    /// A line's times cannot be placed on the timeline
    #[error("bad time on line {line} at {path}: {source}")]
    Time {
        path: PathBuf,
        line: usize,
        #[source]
        source: TimeError,
    },
}
