//! Trip consistency rules.
//!
//! Checks run in a fixed order and the first failing check decides the
//! outcome:
//!
//! 1. The trip has at least one stop
//! 2. The first stop has no arrival times
//! 3. The last stop has no departure times
//! 4. Every later stop has an expected arrival
//! 5. Every earlier stop has an expected departure
//! 6. Adjacent stops are neither out of order nor too far apart
//! 7. No stop is delayed (or early) beyond the limit

use chrono::Duration;

use super::failure::{CheckFailure, ErrorCode};
use crate::config::CheckConfig;
use crate::domain::{StopRecord, TimeKind};

/// Run all checks over a trip's stops.
///
/// Pure and deterministic: the result depends only on `stops` and `config`.
pub fn check_stops(stops: &[&StopRecord], config: &CheckConfig) -> Result<(), CheckFailure> {
    let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
        return Err(CheckFailure::new(ErrorCode::NoStops));
    };

    check_origin(first)?;
    check_terminus(last)?;
    check_interior(stops)?;

    for late_idx in 1..stops.len() {
        check_gap(stops, late_idx - 1, late_idx, config.max_gap())?;
    }

    for (idx, stop) in stops.iter().enumerate() {
        check_delay(stop, idx, config.max_delay())?;
    }

    Ok(())
}

fn check_origin(first: &StopRecord) -> Result<(), CheckFailure> {
    if first.expected_arrival().is_some() {
        return Err(CheckFailure::new(ErrorCode::ExpArrivalNonNone));
    }
    if first.actual_arrival().is_some() {
        return Err(CheckFailure::new(ErrorCode::ActualArrivalNonNone));
    }
    Ok(())
}

fn check_terminus(last: &StopRecord) -> Result<(), CheckFailure> {
    if last.expected_departure().is_some() {
        return Err(CheckFailure::new(ErrorCode::ExpDepartureNonNone));
    }
    if last.actual_departure().is_some() {
        return Err(CheckFailure::new(ErrorCode::ActualDepartureNonNone));
    }
    Ok(())
}

/// Positions are reported relative to the checked sub-slice: stops after
/// the first for arrivals, stops before the last for departures.
fn check_interior(stops: &[&StopRecord]) -> Result<(), CheckFailure> {
    if let Some(idx) = stops[1..]
        .iter()
        .position(|s| s.expected_arrival().is_none())
    {
        return Err(CheckFailure::at_stop(ErrorCode::ExpArrivalNone, idx));
    }

    if let Some(idx) = stops[..stops.len() - 1]
        .iter()
        .position(|s| s.expected_departure().is_none())
    {
        return Err(CheckFailure::at_stop(ErrorCode::ExpDepartureNone, idx));
    }

    Ok(())
}

/// Compare each kind of time between two adjacent stops.
///
/// The first kind missing on either side ends the comparison for this pair:
/// later kinds are not looked at. An origin never has an actual arrival, so
/// the pair starting at the origin always passes.
fn check_gap(
    stops: &[&StopRecord],
    early_idx: usize,
    late_idx: usize,
    max_gap: Duration,
) -> Result<(), CheckFailure> {
    let early = &stops[early_idx].times;
    let late = &stops[late_idx].times;

    for kind in TimeKind::GAP_ORDER {
        let (Some(early_time), Some(late_time)) = (early.get(kind), late.get(kind)) else {
            return Ok(());
        };

        let gap = late_time.signed_duration_since(early_time);
        if gap < Duration::zero() {
            return Err(CheckFailure::between(
                ErrorCode::NegativeGap,
                early_idx,
                late_idx,
            ));
        }
        if gap > max_gap {
            return Err(CheckFailure::between(
                ErrorCode::GapTooLong,
                early_idx,
                late_idx,
            ));
        }
    }

    Ok(())
}

fn check_delay(stop: &StopRecord, idx: usize, max_delay: Duration) -> Result<(), CheckFailure> {
    if let Some(delay) = stop.times.arrival_delay() {
        if delay.abs() > max_delay {
            return Err(CheckFailure::at_stop(ErrorCode::ArriveDelayTooLong, idx));
        }
    }
    if let Some(delay) = stop.times.departure_delay() {
        if delay.abs() > max_delay {
            return Err(CheckFailure::at_stop(ErrorCode::DepartureDelayTooLong, idx));
        }
    }
    Ok(())
}
