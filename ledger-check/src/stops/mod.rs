//! Stop name and kind lookup.

mod directory;
mod error;

pub use directory::{StopDirectory, StopInfo};
pub use error::StopDirectoryError;
