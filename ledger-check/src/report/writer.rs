//! Report files.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use super::error::ReportError;
use super::summary::Summary;
use crate::trips::Trip;

/// File name of the invalid-trip log inside the log directory.
pub const INVALID_LOG_NAME: &str = "invalid.txt";

const SEPARATOR_WIDTH: usize = 80;

/// Write every invalid trip: a separator, a header naming the trip and its
/// failure, then its stops.
pub fn write_invalid_details<W: Write>(out: &mut W, trips: &[Trip<'_>]) -> io::Result<()> {
    for trip in trips {
        let Some(failure) = trip.error() else {
            continue;
        };

        let mut stops = String::new();
        trip.write_stops(&mut stops).map_err(io::Error::other)?;

        writeln!(out, "{}", "=".repeat(SEPARATOR_WIDTH))?;
        writeln!(out, "TRIP = {trip} ERROR = {failure}")?;
        writeln!(out, "{stops}")?;
    }
    Ok(())
}

/// Write the invalid-trip log into `log_dir`, creating it if needed.
///
/// Returns the path written.
pub fn write_invalid_log(log_dir: &Path, trips: &[Trip<'_>]) -> Result<PathBuf, ReportError> {
    fs::create_dir_all(log_dir).map_err(|source| ReportError::Io {
        path: log_dir.to_path_buf(),
        source,
    })?;

    let path = log_dir.join(INVALID_LOG_NAME);
    let io_err = |source: io::Error| ReportError::Io {
        path: path.clone(),
        source,
    };

    let file = File::create(&path).map_err(io_err)?;
    let mut out = BufWriter::new(file);
    write_invalid_details(&mut out, trips).map_err(io_err)?;
    out.flush().map_err(io_err)?;

    info!(path = %path.display(), "invalid details written");
    Ok(path)
}

/// Write the summary as pretty-printed JSON.
pub fn write_summary_json(path: &Path, summary: &Summary) -> Result<(), ReportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ReportError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let json = serde_json::to_string_pretty(summary).map_err(|source| ReportError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    info!(path = %path.display(), "summary written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CheckConfig;
    use crate::domain::{NETWORK_TZ, RawTimes, StopId, StopRecord, StopTimes};
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn record(line: usize, name: &str, raw: RawTimes) -> StopRecord {
        let date = NaiveDate::from_ymd_opt(2016, 3, 15).unwrap();
        StopRecord {
            train_number: "88".into(),
            date,
            stop_id: StopId(line as u32),
            stop_name: name.into(),
            is_real: true,
            line,
            times: StopTimes::from_raw(raw, date, NETWORK_TZ).unwrap(),
        }
    }

    fn records() -> Vec<StopRecord> {
        vec![
            record(
                1,
                "Lod",
                RawTimes {
                    expected_departure: 700,
                    actual_departure: 700,
                    ..RawTimes::default()
                },
            ),
            record(
                2,
                "Rehovot",
                RawTimes {
                    expected_arrival: 715,
                    actual_arrival: 716,
                    ..RawTimes::default()
                },
            ),
            record(
                3,
                "Ashdod",
                RawTimes {
                    expected_departure: 800,
                    actual_departure: 801,
                    ..RawTimes::default()
                },
            ),
        ]
    }

    #[test]
    fn only_invalid_trips_are_written() {
        let records = records();
        let config = CheckConfig::default();
        let trips = vec![
            Trip::new(vec![&records[0], &records[1]], &config),
            Trip::new(vec![&records[2]], &config),
        ];

        let mut out = Vec::new();
        write_invalid_details(&mut out, &trips).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "=".repeat(80));
        assert_eq!(
            lines[1],
            "TRIP = Num 88 in 2016-03-15 from Ashdod to Ashdod ERROR = ERROR_EXP_DEPARTURE_NON_NONE"
        );
        assert_eq!(
            lines[2],
            " 0     3    3 Ashdod               A=-----(-----) D=08:01(08:00)"
        );
    }

    #[test]
    fn writes_log_file() {
        let records = records();
        let config = CheckConfig::default();
        let trips = vec![Trip::new(vec![&records[1], &records[2]], &config)];

        let dir = tempdir().unwrap();
        let log_dir = dir.path().join("log");
        let path = write_invalid_log(&log_dir, &trips).unwrap();

        assert_eq!(path, log_dir.join("invalid.txt"));
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("ERROR = ERROR_EXP_ARRIVAL_NON_NONE"));
        assert!(text.contains("from Rehovot to Ashdod"));
    }

    #[test]
    fn no_invalid_trips_writes_empty_log() {
        let records = records();
        let config = CheckConfig::default();
        let trips = vec![Trip::new(vec![&records[0], &records[1]], &config)];

        let dir = tempdir().unwrap();
        let path = write_invalid_log(dir.path(), &trips).unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "");
    }

    #[test]
    fn writes_summary_json() {
        let records = records();
        let config = CheckConfig::default();
        let trips = vec![
            Trip::new(vec![&records[0], &records[1]], &config),
            Trip::new(vec![&records[2]], &config),
        ];
        let summary = Summary::from_trips(&trips);

        let dir = tempdir().unwrap();
        let path = dir.path().join("out").join("summary.json");
        write_summary_json(&path, &summary).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["total_trips"], 2);
        assert_eq!(value["invalid_trips"], 1);
        assert_eq!(value["by_code"][0]["code"], "ERROR_EXP_DEPARTURE_NON_NONE");
    }
}
