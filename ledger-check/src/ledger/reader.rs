//! Turning a ledger into stop records.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info};

use super::error::LedgerError;
use super::line::LedgerLine;
use crate::config::CheckConfig;
use crate::domain::{StopRecord, StopTimes};
use crate::stops::StopDirectory;

/// How many lines are read between progress messages.
pub const PROGRESS_INTERVAL: usize = 10_000;

/// Read and decode a ledger file.
pub fn read_ledger(
    path: impl AsRef<Path>,
    directory: &StopDirectory,
    config: &CheckConfig,
) -> Result<Vec<StopRecord>, LedgerError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LedgerError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_ledger(BufReader::new(file), path, directory, config)
}

/// Decode ledger lines from any reader. `path` is only used in messages.
///
/// Bytes that are not UTF-8 are replaced rather than rejected. The stop
/// name printed in the ledger is ignored in favour of the directory's.
pub fn parse_ledger<R: BufRead>(
    mut reader: R,
    path: &Path,
    directory: &StopDirectory,
    config: &CheckConfig,
) -> Result<Vec<StopRecord>, LedgerError> {
    let mut records = Vec::new();
    let mut buf = Vec::new();
    let mut line_number = 0;

    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|source| LedgerError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        if read == 0 {
            break;
        }
        line_number += 1;

        let text = String::from_utf8_lossy(&buf);
        let parsed = LedgerLine::parse(&text).ok_or_else(|| LedgerError::IllegalLine {
            path: path.to_path_buf(),
            line: line_number,
        })?;
        records.push(decode(parsed, line_number, path, directory, config)?);

        if line_number % PROGRESS_INTERVAL == 0 {
            info!(lines = line_number, "parsed ledger lines");
        }
    }

    debug!(
        records = records.len(),
        path = %path.display(),
        "finished reading ledger"
    );
    Ok(records)
}

fn decode(
    parsed: LedgerLine,
    line: usize,
    path: &Path,
    directory: &StopDirectory,
    config: &CheckConfig,
) -> Result<StopRecord, LedgerError> {
    let times = StopTimes::from_raw(parsed.times, parsed.date, config.timezone).map_err(
        |source| LedgerError::Time {
            path: path.to_path_buf(),
            line,
            source,
        },
    )?;

    Ok(StopRecord {
        train_number: parsed.train_number,
        date: parsed.date,
        stop_id: parsed.stop_id,
        stop_name: directory.name(parsed.stop_id),
        is_real: directory.is_real(parsed.stop_id),
        line,
        times,
    })
}
