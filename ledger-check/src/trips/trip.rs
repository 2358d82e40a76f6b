//! The trip type.

use std::fmt;

use super::failure::CheckFailure;
use super::validate::check_stops;
use crate::config::CheckConfig;
use crate::domain::StopRecord;

/// Outcome of validating a trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Valid,
    Invalid(CheckFailure),
}

impl Verdict {
    /// Returns true for a valid trip.
    pub fn is_valid(&self) -> bool {
        matches!(self, Verdict::Valid)
    }

    /// Returns the failure of an invalid trip.
    pub fn failure(&self) -> Option<&CheckFailure> {
        match self {
            Verdict::Valid => None,
            Verdict::Invalid(failure) => Some(failure),
        }
    }
}

impl From<Result<(), CheckFailure>> for Verdict {
    fn from(result: Result<(), CheckFailure>) -> Self {
        match result {
            Ok(()) => Verdict::Valid,
            Err(failure) => Verdict::Invalid(failure),
        }
    }
}

/// One journey of a train, from origin to terminus.
///
/// Stops are borrowed from the batch's record list and kept in ledger
/// order. A trip is validated when it is built and never changes after.
#[derive(Debug, Clone)]
pub struct Trip<'a> {
    train_number: String,
    stops: Vec<&'a StopRecord>,
    verdict: Verdict,
}

impl<'a> Trip<'a> {
    /// Build and validate a trip from its stops.
    pub fn new(stops: Vec<&'a StopRecord>, config: &CheckConfig) -> Self {
        let train_number = stops
            .first()
            .map(|s| s.train_number.clone())
            .unwrap_or_default();
        let verdict = check_stops(&stops, config).into();

        Self {
            train_number,
            stops,
            verdict,
        }
    }

    /// Returns the train number.
    pub fn train_number(&self) -> &str {
        &self.train_number
    }

    /// Returns the stops in order.
    pub fn stops(&self) -> &[&'a StopRecord] {
        &self.stops
    }

    /// Returns the validation outcome.
    pub fn verdict(&self) -> &Verdict {
        &self.verdict
    }

    /// Returns true if the trip passed every check.
    pub fn is_valid(&self) -> bool {
        self.verdict.is_valid()
    }

    /// Returns the failure, if the trip is invalid.
    pub fn error(&self) -> Option<&CheckFailure> {
        self.verdict.failure()
    }

    /// Writes every stop on its own line, prefixed with its position.
    pub fn write_stops(&self, out: &mut impl fmt::Write) -> fmt::Result {
        for (idx, stop) in self.stops.iter().enumerate() {
            if idx > 0 {
                out.write_char('\n')?;
            }
            write!(out, "{idx:2} {stop}")?;
        }
        Ok(())
    }
}

/// Short description: train number, date and end points.
impl fmt::Display for Trip<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.stops.first(), self.stops.last()) {
            (Some(first), Some(last)) => write!(
                f,
                "Num {} in {} from {} to {}",
                self.train_number, first.date, first.stop_name, last.stop_name
            ),
            _ => write!(f, "Num {} (no stops)", self.train_number),
        }
    }
}
