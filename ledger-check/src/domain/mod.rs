//! Domain types for the stop ledger.
//!
//! These types represent ledger data after decoding: stop records with
//! absolute, timezone-aware times. Code that receives them can rely on the
//! midnight correction having been applied.

mod stop;
mod time;

pub use stop::{StopId, StopRecord};
pub use time::{NETWORK_TZ, RawTimes, StopTime, StopTimes, TimeError, TimeKind};
