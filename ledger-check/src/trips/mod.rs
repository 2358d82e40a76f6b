//! Trip reconstruction and validation.
//!
//! A train's stop records are cut into trips at each origin stop, and each
//! trip is checked against the consistency rules in [`validate`].

mod builder;
mod failure;
mod trip;
pub mod validate;

pub use builder::{TrainStops, build_trips, group_by_train, split_trips};
pub use failure::{CheckFailure, Detail, ErrorCode};
pub use trip::{Trip, Verdict};
