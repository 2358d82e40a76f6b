//! Run summaries and invalid-trip logs.

mod error;
mod summary;
mod writer;

pub use error::ReportError;
pub use summary::{CodeCount, Summary};
pub use writer::{INVALID_LOG_NAME, write_invalid_details, write_invalid_log, write_summary_json};
