//! Train stop ledger checker.
//!
//! Reads a ledger of train-at-stop events, rebuilds each train's trips and
//! classifies every trip as valid or invalid with a stable error code.

pub mod config;
pub mod domain;
pub mod ledger;
pub mod report;
pub mod stops;
pub mod trips;
