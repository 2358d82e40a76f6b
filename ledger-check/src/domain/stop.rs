//! Stop record types.
//!
//! A `StopRecord` is one ledger line: a train calling at one stop on one
//! service date, with its expected and actual arrival and departure times.

use chrono::NaiveDate;
use std::fmt;

use super::{StopTime, StopTimes};

/// Numeric stop identifier used by the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StopId(pub u32);

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for StopId {
    fn from(value: u32) -> Self {
        StopId(value)
    }
}

/// One parsed stop event.
///
/// # Time Semantics
///
/// - The origin of a trip has no arrival times
/// - The terminus of a trip has no departure times
/// - `date` is the nominal date printed in the ledger; the absolute times
///   may fall on the day before or after it once midnight is corrected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopRecord {
    /// Train number grouping the stops of one daily service list
    pub train_number: String,
    /// Nominal service date
    pub date: NaiveDate,
    /// Stop identifier
    pub stop_id: StopId,
    /// Resolved stop name
    pub stop_name: String,
    /// Whether the stop is a passenger stop rather than a timing point
    pub is_real: bool,
    /// 1-based line number in the source ledger
    pub line: usize,
    /// Normalized times
    pub times: StopTimes,
}

impl StopRecord {
    /// Returns the expected arrival time.
    pub fn expected_arrival(&self) -> Option<StopTime> {
        self.times.expected_arrival
    }

    /// Returns the actual arrival time.
    pub fn actual_arrival(&self) -> Option<StopTime> {
        self.times.actual_arrival
    }

    /// Returns the expected departure time.
    pub fn expected_departure(&self) -> Option<StopTime> {
        self.times.expected_departure
    }

    /// Returns the actual departure time.
    pub fn actual_departure(&self) -> Option<StopTime> {
        self.times.actual_departure
    }

    /// Returns true if this record opens a trip (no expected arrival).
    pub fn is_origin(&self) -> bool {
        self.times.expected_arrival.is_none()
    }
}

/// Formats an optional time as `HH:MM`, or dashes if not recorded.
struct ClockCell(Option<StopTime>);

impl fmt::Display for ClockCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(t) => f.pad(&t.to_string()),
            None => f.pad("-----"),
        }
    }
}

/// Fixed-width diagnostic line: `line stop name A=actual(expected) D=actual(expected)`.
impl fmt::Display for StopRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:5} {:4} {:<20} A={:>5}({:>5}) D={:>5}({:>5})",
            self.line,
            self.stop_id.0,
            self.stop_name,
            ClockCell(self.times.actual_arrival),
            ClockCell(self.times.expected_arrival),
            ClockCell(self.times.actual_departure),
            ClockCell(self.times.expected_departure),
        )
    }
}
