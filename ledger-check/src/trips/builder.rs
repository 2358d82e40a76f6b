//! Splitting a ledger into trips.
//!
//! Records are first grouped by train number, keeping ledger order inside
//! each group. Each group is then cut into trips: a record without an
//! expected arrival is the origin of a new journey.

use std::collections::HashMap;
use tracing::debug;

use super::trip::Trip;
use crate::config::CheckConfig;
use crate::domain::StopRecord;

/// All records of one train number, in ledger order.
#[derive(Debug, Clone)]
pub struct TrainStops<'a> {
    pub train_number: &'a str,
    pub stops: Vec<&'a StopRecord>,
}

/// Group records by train number.
///
/// Groups come out in order of each train number's first appearance, so
/// reports built from them are reproducible.
pub fn group_by_train(records: &[StopRecord]) -> Vec<TrainStops<'_>> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<TrainStops<'_>> = Vec::new();

    for record in records {
        let slot = *index.entry(record.train_number.as_str()).or_insert_with(|| {
            groups.push(TrainStops {
                train_number: record.train_number.as_str(),
                stops: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].stops.push(record);
    }

    groups
}

/// Cut one train's records into trips and validate each.
///
/// A single trailing or isolated origin becomes a one-stop trip.
///
/// # Examples
///
/// ```
/// use ledger_check::config::CheckConfig;
/// use ledger_check::domain::{NETWORK_TZ, RawTimes, StopId, StopRecord, StopTimes};
/// use ledger_check::trips::split_trips;
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2016, 3, 15).unwrap();
/// let record = |line: usize, arrival: u32, departure: u32| StopRecord {
///     train_number: "9".into(),
///     date,
///     stop_id: StopId(line as u32),
///     stop_name: format!("Stop {line}"),
///     is_real: true,
///     line,
///     times: StopTimes::from_raw(
///         RawTimes {
///             expected_arrival: arrival,
///             actual_arrival: arrival,
///             expected_departure: departure,
///             actual_departure: departure,
///         },
///         date,
///         NETWORK_TZ,
///     )
///     .unwrap(),
/// };
///
/// let records = vec![
///     record(1, 0, 800),
///     record(2, 830, 0),
///     record(3, 0, 900),
///     record(4, 930, 0),
/// ];
/// let stops: Vec<&StopRecord> = records.iter().collect();
/// let trips = split_trips(&stops, &CheckConfig::default());
///
/// assert_eq!(trips.len(), 2);
/// assert!(trips.iter().all(|t| t.is_valid()));
/// ```
pub fn split_trips<'a>(stops: &[&'a StopRecord], config: &CheckConfig) -> Vec<Trip<'a>> {
    let mut trips = Vec::new();
    let mut current: Vec<&'a StopRecord> = Vec::new();

    for &stop in stops {
        if stop.is_origin() && !current.is_empty() {
            trips.push(Trip::new(std::mem::take(&mut current), config));
        }
        current.push(stop);
    }

    if !current.is_empty() {
        trips.push(Trip::new(current, config));
    }

    trips
}

/// Group a whole ledger by train and build every trip.
///
/// Trips of one train stay together and in ledger order; trains follow the
/// order of their first record.
pub fn build_trips<'a>(records: &'a [StopRecord], config: &CheckConfig) -> Vec<Trip<'a>> {
    let groups = group_by_train(records);
    debug!(
        records = records.len(),
        trains = groups.len(),
        "grouped records by train"
    );

    let mut trips = Vec::new();
    for group in &groups {
        let built = split_trips(&group.stops, config);
        debug!(
            train = group.train_number,
            stops = group.stops.len(),
            trips = built.len(),
            "split train into trips"
        );
        trips.extend(built);
    }

    trips
}
