//! Aggregate counts over a run.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::info;

use crate::trips::{ErrorCode, Trip};

/// Number of invalid trips with one error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CodeCount {
    pub code: ErrorCode,
    pub count: usize,
}

/// Totals for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total_trips: usize,
    pub valid_trips: usize,
    pub invalid_trips: usize,
    /// Only codes that occurred, in code order
    pub by_code: Vec<CodeCount>,
}

impl Summary {
    /// Count trips and failures.
    pub fn from_trips(trips: &[Trip<'_>]) -> Self {
        let mut counts: BTreeMap<ErrorCode, usize> = BTreeMap::new();
        for failure in trips.iter().filter_map(Trip::error) {
            *counts.entry(failure.code).or_default() += 1;
        }

        let invalid_trips: usize = counts.values().sum();
        Self {
            total_trips: trips.len(),
            valid_trips: trips.len() - invalid_trips,
            invalid_trips,
            by_code: counts
                .into_iter()
                .map(|(code, count)| CodeCount { code, count })
                .collect(),
        }
    }

    /// Returns the count for one code.
    pub fn count(&self, code: ErrorCode) -> usize {
        self.by_code
            .iter()
            .find(|c| c.code == code)
            .map_or(0, |c| c.count)
    }

    /// Log the totals.
    pub fn log(&self) {
        info!(
            total = self.total_trips,
            valid = self.valid_trips,
            invalid = self.invalid_trips,
            "checked trips"
        );
        for c in &self.by_code {
            info!(code = %c.code, count = c.count, "invalid trips by code");
        }
    }
}

/// Console form: totals, then one indented line per code.
impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total trips: {}", self.total_trips)?;
        write!(f, "Invalid trips: {}", self.invalid_trips)?;
        for c in &self.by_code {
            write!(f, "\n    {}: {}", c.code, c.count)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CheckConfig;
    use crate::domain::{NETWORK_TZ, RawTimes, StopId, StopRecord, StopTimes};
    use chrono::NaiveDate;

    fn record(line: usize, raw: RawTimes) -> StopRecord {
        let date = NaiveDate::from_ymd_opt(2016, 3, 15).unwrap();
        StopRecord {
            train_number: "1".into(),
            date,
            stop_id: StopId(1),
            stop_name: "S".into(),
            is_real: true,
            line,
            times: StopTimes::from_raw(raw, date, NETWORK_TZ).unwrap(),
        }
    }

    fn origin(line: usize, dep: u32) -> StopRecord {
        record(
            line,
            RawTimes {
                expected_departure: dep,
                actual_departure: dep,
                ..RawTimes::default()
            },
        )
    }

    fn terminus(line: usize, arr: u32) -> StopRecord {
        record(
            line,
            RawTimes {
                expected_arrival: arr,
                actual_arrival: arr,
                ..RawTimes::default()
            },
        )
    }

    #[test]
    fn counts_by_code() {
        let records = vec![
            origin(1, 800),
            terminus(2, 830),
            // Lone origins keep their departure
            origin(3, 900),
            origin(4, 1000),
            origin(5, 1100),
            terminus(6, 1130),
        ];
        let config = CheckConfig::default();
        let trips = vec![
            Trip::new(vec![&records[0], &records[1]], &config),
            Trip::new(vec![&records[2]], &config),
            Trip::new(vec![&records[3]], &config),
            Trip::new(vec![&records[4], &records[5]], &config),
            Trip::new(vec![&records[1]], &config),
        ];

        let summary = Summary::from_trips(&trips);
        assert_eq!(summary.total_trips, 5);
        assert_eq!(summary.valid_trips, 2);
        assert_eq!(summary.invalid_trips, 3);
        assert_eq!(
            summary.by_code,
            vec![
                CodeCount {
                    code: ErrorCode::ExpArrivalNonNone,
                    count: 1
                },
                CodeCount {
                    code: ErrorCode::ExpDepartureNonNone,
                    count: 2
                },
            ]
        );
        assert_eq!(summary.count(ErrorCode::ExpDepartureNonNone), 2);
        assert_eq!(summary.count(ErrorCode::NegativeGap), 0);
    }

    #[test]
    fn empty_run() {
        let summary = Summary::from_trips(&[]);
        assert_eq!(summary.total_trips, 0);
        assert_eq!(summary.invalid_trips, 0);
        assert!(summary.by_code.is_empty());
        assert_eq!(summary.to_string(), "Total trips: 0\nInvalid trips: 0");
    }

    #[test]
    fn display_lists_codes() {
        let summary = Summary {
            total_trips: 10,
            valid_trips: 7,
            invalid_trips: 3,
            by_code: vec![
                CodeCount {
                    code: ErrorCode::GapTooLong,
                    count: 1,
                },
                CodeCount {
                    code: ErrorCode::NegativeGap,
                    count: 2,
                },
            ],
        };
        assert_eq!(
            summary.to_string(),
            "Total trips: 10\nInvalid trips: 3\n    ERROR_GAP_TOO_LONG: 1\n    ERROR_NEGATIVE_GAP: 2"
        );
    }

    #[test]
    fn serializes_codes_as_strings() {
        let summary = Summary {
            total_trips: 1,
            valid_trips: 0,
            invalid_trips: 1,
            by_code: vec![CodeCount {
                code: ErrorCode::NoStops,
                count: 1,
            }],
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["by_code"][0]["code"], "ERROR_NO_STOPS");
        assert_eq!(json["invalid_trips"], 1);
    }
}
