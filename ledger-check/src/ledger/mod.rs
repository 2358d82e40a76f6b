//! Reading the fixed-format stop ledger.
//!
//! Each ledger line describes one train at one stop. Lines are tokenized by
//! [`LedgerLine::parse`] and turned into [`StopRecord`](crate::domain::StopRecord)s
//! by [`read_ledger`].

mod error;
mod line;
mod reader;

pub use error::LedgerError;
pub use line::LedgerLine;
pub use reader::{PROGRESS_INTERVAL, parse_ledger, read_ledger};
