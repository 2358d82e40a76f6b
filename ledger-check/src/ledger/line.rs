//! Ledger line tokenizer.

use chrono::NaiveDate;
use regex::{Captures, Regex};
use std::sync::LazyLock;

use crate::domain::{RawTimes, StopId};

/// `YYYYMMDD "train" exp_arr act_arr exp_dep act_dep stop_id "name"`
static LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"^\s*"#,
        r#"(?P<date>[0-9]{8})\s+"#,
        r#""(?P<train>[0-9]+)"\s+"#,
        r#"(?P<exp_arrival>[0-9]+)\s+"#,
        r#"(?P<actual_arrival>[0-9]+)\s+"#,
        r#"(?P<exp_departure>[0-9]+)\s+"#,
        r#"(?P<actual_departure>[0-9]+)\s+"#,
        r#"(?P<stop_id>[0-9]+)\s+"#,
        r#""(?P<stop_name>.*)"\s*$"#,
    ))
    .expect("ledger line pattern is valid")
});

/// The typed fields of one ledger line, before time normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerLine {
    pub date: NaiveDate,
    pub train_number: String,
    pub times: RawTimes,
    pub stop_id: StopId,
    /// Stop name as printed in the ledger
    pub stop_name: String,
}

impl LedgerLine {
    /// Tokenize one line.
    ///
    /// Returns `None` if the line does not follow the ledger grammar, the
    /// date is not a calendar date, or a number does not fit.
    ///
    /// # Examples
    ///
    /// ```
    /// use ledger_check::ledger::LedgerLine;
    ///
    /// let line = LedgerLine::parse(r#"20160315 "137" 0 0 2158 2201 3700 "Tel Aviv""#).unwrap();
    /// assert_eq!(line.train_number, "137");
    /// assert_eq!(line.times.expected_departure, 2158);
    /// assert_eq!(line.times.actual_departure, 2201);
    ///
    /// assert!(LedgerLine::parse("garbage").is_none());
    /// ```
    pub fn parse(line: &str) -> Option<Self> {
        let caps = LINE_RE.captures(line)?;

        Some(Self {
            date: parse_date(&caps["date"])?,
            train_number: caps["train"].to_string(),
            times: RawTimes {
                expected_arrival: number(&caps, "exp_arrival")?,
                actual_arrival: number(&caps, "actual_arrival")?,
                expected_departure: number(&caps, "exp_departure")?,
                actual_departure: number(&caps, "actual_departure")?,
            },
            stop_id: StopId(number(&caps, "stop_id")?),
            stop_name: caps["stop_name"].to_string(),
        })
    }
}

fn number(caps: &Captures<'_>, name: &str) -> Option<u32> {
    caps.name(name)?.as_str().parse().ok()
}

/// Parse an 8-digit `YYYYMMDD` date.
fn parse_date(s: &str) -> Option<NaiveDate> {
    let year = s.get(0..4)?.parse().ok()?;
    let month = s.get(4..6)?.parse().ok()?;
    let day = s.get(6..8)?.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}
