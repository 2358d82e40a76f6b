//! Trip validation failure types.

use serde::{Serialize, Serializer};
use std::fmt;

/// Why a trip failed validation.
///
/// The string forms returned by [`ErrorCode::as_str`] are stable and appear
/// verbatim in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorCode {
    /// Trip has no stops
    NoStops,
    /// First stop has an expected arrival
    ExpArrivalNonNone,
    /// First stop has an actual arrival
    ActualArrivalNonNone,
    /// Last stop has an expected departure
    ExpDepartureNonNone,
    /// Last stop has an actual departure
    ActualDepartureNonNone,
    /// A stop after the first lacks an expected arrival
    ExpArrivalNone,
    /// A stop before the last lacks an expected departure
    ExpDepartureNone,
    /// Arrival delay exceeds the limit
    ArriveDelayTooLong,
    /// Departure delay exceeds the limit
    DepartureDelayTooLong,
    /// Adjacent stops are too far apart in time
    GapTooLong,
    /// A later stop is timed before an earlier one
    NegativeGap,
}

impl ErrorCode {
    /// All codes, in report order.
    pub const ALL: [ErrorCode; 11] = [
        ErrorCode::NoStops,
        ErrorCode::ExpArrivalNonNone,
        ErrorCode::ActualArrivalNonNone,
        ErrorCode::ExpDepartureNonNone,
        ErrorCode::ActualDepartureNonNone,
        ErrorCode::ExpArrivalNone,
        ErrorCode::ExpDepartureNone,
        ErrorCode::ArriveDelayTooLong,
        ErrorCode::DepartureDelayTooLong,
        ErrorCode::GapTooLong,
        ErrorCode::NegativeGap,
    ];

    /// Returns the stable identifier of this code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NoStops => "ERROR_NO_STOPS",
            ErrorCode::ExpArrivalNonNone => "ERROR_EXP_ARRIVAL_NON_NONE",
            ErrorCode::ActualArrivalNonNone => "ERROR_ACTUAL_ARRIVAL_NON_NONE",
            ErrorCode::ExpDepartureNonNone => "ERROR_EXP_DEPARTURE_NON_NONE",
            ErrorCode::ActualDepartureNonNone => "ERROR_ACTUAL_DEPARTURE_NON_NONE",
            ErrorCode::ExpArrivalNone => "ERROR_EXP_ARRIVAL_NONE",
            ErrorCode::ExpDepartureNone => "ERROR_EXP_DEPARTURE_NONE",
            ErrorCode::ArriveDelayTooLong => "ERROR_ARRIVE_DELAY_TOO_LONG",
            ErrorCode::DepartureDelayTooLong => "ERROR_DEPARTURE_DELAY_TOO_LONG",
            ErrorCode::GapTooLong => "ERROR_GAP_TOO_LONG",
            ErrorCode::NegativeGap => "ERROR_NEGATIVE_GAP",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Where in a trip a failure was found. Diagnostic only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detail {
    /// A single stop position
    StopIndex(usize),
    /// An adjacent pair of stop positions
    StopPair(usize, usize),
}

impl fmt::Display for Detail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Detail::StopIndex(idx) => write!(f, "stop index {idx}"),
            Detail::StopPair(early, late) => write!(f, "stop indexes {early} {late}"),
        }
    }
}

/// A validation failure: the code plus optional position detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckFailure {
    pub code: ErrorCode,
    pub detail: Option<Detail>,
}

impl CheckFailure {
    /// A failure with no position detail.
    pub fn new(code: ErrorCode) -> Self {
        Self { code, detail: None }
    }

    /// A failure at one stop.
    pub fn at_stop(code: ErrorCode, idx: usize) -> Self {
        Self {
            code,
            detail: Some(Detail::StopIndex(idx)),
        }
    }

    /// A failure between two stops.
    pub fn between(code: ErrorCode, early: usize, late: usize) -> Self {
        Self {
            code,
            detail: Some(Detail::StopPair(early, late)),
        }
    }
}

impl fmt::Display for CheckFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "{}: {}", self.code, detail),
            None => write!(f, "{}", self.code),
        }
    }
}

impl std::error::Error for CheckFailure {}
