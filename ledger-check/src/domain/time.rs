//! Stop time handling for the ledger.
//!
//! The ledger records clock values as `HHMM` integers, with 0 meaning "not
//! recorded", and stamps every stop with one nominal calendar date. This
//! module turns those values into absolute, timezone-aware timestamps and
//! repairs the date of times recorded on the other side of midnight.

use chrono::{
    DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, Offset, TimeZone, Timelike,
};
use chrono_tz::Tz;
use std::fmt;

/// The network's local timezone.
pub const NETWORK_TZ: Tz = chrono_tz::Asia::Jerusalem;

/// An anchor at or after this hour is a late-night stop.
const LATE_ANCHOR_HOUR: u32 = 22;

/// An anchor at or before this hour is a just-after-midnight stop.
const EARLY_ANCHOR_HOUR: u32 = 3;

/// Dependent times before this hour belong to the day after a late anchor.
const EARLY_DEPENDENT_HOUR: u32 = 3;

/// Dependent times at or after this hour belong to the day before an early anchor.
const LATE_DEPENDENT_HOUR: u32 = 22;

/// Error returned when a coded time cannot be turned into a timestamp.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time {code:04} on {date}: {reason}")]
pub struct TimeError {
    code: u32,
    date: NaiveDate,
    reason: &'static str,
}

impl TimeError {
    fn new(code: u32, date: NaiveDate, reason: &'static str) -> Self {
        Self { code, date, reason }
    }
}

/// An absolute stop time in the network timezone.
///
/// Subtraction between two `StopTime`s yields real elapsed time, so gaps
/// spanning a daylight-saving change are measured correctly.
///
/// # Examples
///
/// ```
/// use ledger_check::domain::{NETWORK_TZ, StopTime};
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2016, 3, 15).unwrap();
/// let time = StopTime::from_code(1430, date, NETWORK_TZ).unwrap().unwrap();
/// assert_eq!(time.to_string(), "14:30");
///
/// // 0 means the time was not recorded
/// assert!(StopTime::from_code(0, date, NETWORK_TZ).unwrap().is_none());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StopTime(DateTime<Tz>);

impl StopTime {
    /// Wrap an already-localized timestamp.
    pub fn new(datetime: DateTime<Tz>) -> Self {
        Self(datetime)
    }

    /// Decode an `HHMM` value recorded on `date`.
    ///
    /// Returns `Ok(None)` for 0. Hours and minutes are added to midnight of
    /// `date` as durations, so out-of-range components roll forward rather
    /// than being rejected.
    pub fn from_code(code: u32, date: NaiveDate, tz: Tz) -> Result<Option<Self>, TimeError> {
        wall_clock(code, date)?
            .map(|naive| Self::localized(naive, tz, code, date))
            .transpose()
    }

    fn localized(
        naive: NaiveDateTime,
        tz: Tz,
        code: u32,
        date: NaiveDate,
    ) -> Result<Self, TimeError> {
        localize(tz, naive)
            .map(Self)
            .ok_or_else(|| TimeError::new(code, date, "not representable in timezone"))
    }

    /// Returns the underlying timestamp.
    pub fn datetime(&self) -> DateTime<Tz> {
        self.0
    }

    /// Returns the local calendar date.
    pub fn date(&self) -> NaiveDate {
        self.0.date_naive()
    }

    /// Returns the local hour (0-23).
    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    /// Returns the local minute (0-59).
    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    /// Add a duration of elapsed time.
    pub fn checked_add(&self, duration: Duration) -> Option<Self> {
        self.0.checked_add_signed(duration).map(Self)
    }

    /// Subtract a duration of elapsed time.
    pub fn checked_sub(&self, duration: Duration) -> Option<Self> {
        self.0.checked_sub_signed(duration).map(Self)
    }

    /// Returns the elapsed time from `other` to `self`.
    ///
    /// Negative if `other` is later than `self`.
    pub fn signed_duration_since(&self, other: Self) -> Duration {
        self.0.signed_duration_since(other.0)
    }
}

impl fmt::Debug for StopTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StopTime({})", self.0.format("%Y-%m-%d %H:%M %Z"))
    }
}

impl fmt::Display for StopTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// Decode an `HHMM` value into a wall-clock time on `date`, before any
/// timezone is applied.
fn wall_clock(code: u32, date: NaiveDate) -> Result<Option<NaiveDateTime>, TimeError> {
    if code == 0 {
        return Ok(None);
    }

    let hours = i64::from(code / 100);
    let minutes = i64::from(code % 100);

    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| TimeError::new(code, date, "invalid date"))?;
    midnight
        .checked_add_signed(Duration::hours(hours) + Duration::minutes(minutes))
        .map(Some)
        .ok_or_else(|| TimeError::new(code, date, "time overflow"))
}

/// A time the midnight rule can inspect and move.
trait ClockReading: Copy {
    fn clock_hour(&self) -> u32;
    fn clock_date(&self) -> NaiveDate;
    fn shifted(&self, by: Duration) -> Option<Self>;
}

impl ClockReading for NaiveDateTime {
    fn clock_hour(&self) -> u32 {
        self.hour()
    }

    fn clock_date(&self) -> NaiveDate {
        self.date()
    }

    fn shifted(&self, by: Duration) -> Option<Self> {
        self.checked_add_signed(by)
    }
}

impl ClockReading for StopTime {
    fn clock_hour(&self) -> u32 {
        self.hour()
    }

    fn clock_date(&self) -> NaiveDate {
        self.date()
    }

    fn shifted(&self, by: Duration) -> Option<Self> {
        self.checked_add(by)
    }
}

/// Move dependents recorded across midnight from `anchor` onto the right day.
///
/// A dependent is only moved while it still sits on the anchor's date.
fn shift_across_midnight<T: ClockReading>(anchor: Option<T>, dependents: [&mut Option<T>; 3]) {
    let Some(anchor) = anchor else {
        return;
    };
    let anchor_date = anchor.clock_date();
    let one_day = Duration::hours(24);

    if anchor.clock_hour() >= LATE_ANCHOR_HOUR {
        for t in dependents.into_iter().flatten() {
            if t.clock_hour() < EARLY_DEPENDENT_HOUR && t.clock_date() <= anchor_date {
                if let Some(shifted) = t.shifted(one_day) {
                    *t = shifted;
                }
            }
        }
    } else if anchor.clock_hour() <= EARLY_ANCHOR_HOUR {
        for t in dependents.into_iter().flatten() {
            if t.clock_hour() >= LATE_DEPENDENT_HOUR && t.clock_date() >= anchor_date {
                if let Some(shifted) = t.shifted(-one_day) {
                    *t = shifted;
                }
            }
        }
    }
}

/// Localize a wall-clock value in `tz`.
///
/// Ambiguous values (clocks going back) resolve to the later, standard-time
/// instant. Values inside a spring-forward gap are read with the offset in
/// force before the transition, which puts them one hour later on the wall
/// clock.
fn localize(tz: Tz, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(_, standard) => Some(standard),
        LocalResult::None => {
            let before = naive.checked_sub_signed(Duration::hours(24))?;
            let offset = tz.offset_from_local_datetime(&before).earliest()?;
            let utc_offset = Duration::seconds(i64::from(offset.fix().local_minus_utc()));
            let utc = naive.checked_sub_signed(utc_offset)?;
            Some(tz.from_utc_datetime(&utc))
        }
    }
}

/// The four raw coded times of one ledger line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawTimes {
    pub expected_arrival: u32,
    pub actual_arrival: u32,
    pub expected_departure: u32,
    pub actual_departure: u32,
}

/// Which of a stop's four times a value refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeKind {
    ActualArrival,
    ExpectedArrival,
    ActualDeparture,
    ExpectedDeparture,
}

impl TimeKind {
    /// Order in which adjacent stops are compared.
    pub const GAP_ORDER: [TimeKind; 4] = [
        TimeKind::ActualArrival,
        TimeKind::ExpectedArrival,
        TimeKind::ActualDeparture,
        TimeKind::ExpectedDeparture,
    ];
}

/// The normalized times of one stop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StopTimes {
    pub expected_arrival: Option<StopTime>,
    pub actual_arrival: Option<StopTime>,
    pub expected_departure: Option<StopTime>,
    pub actual_departure: Option<StopTime>,
}

impl StopTimes {
    /// Decode all four coded times and apply the midnight correction.
    ///
    /// # Examples
    ///
    /// ```
    /// use ledger_check::domain::{NETWORK_TZ, RawTimes, StopTimes};
    /// use chrono::NaiveDate;
    ///
    /// let date = NaiveDate::from_ymd_opt(2016, 3, 15).unwrap();
    /// let raw = RawTimes {
    ///     expected_arrival: 2355,
    ///     actual_arrival: 2358,
    ///     expected_departure: 1,
    ///     actual_departure: 5,
    /// };
    /// let times = StopTimes::from_raw(raw, date, NETWORK_TZ).unwrap();
    ///
    /// // The departure happened after midnight
    /// let next_day = NaiveDate::from_ymd_opt(2016, 3, 16).unwrap();
    /// assert_eq!(times.expected_departure.unwrap().date(), next_day);
    /// assert_eq!(times.actual_arrival.unwrap().date(), date);
    /// ```
    pub fn from_raw(raw: RawTimes, date: NaiveDate, tz: Tz) -> Result<Self, TimeError> {
        let codes = [
            raw.expected_arrival,
            raw.actual_arrival,
            raw.expected_departure,
            raw.actual_departure,
        ];
        let mut clocks: [Option<NaiveDateTime>; 4] = [None; 4];
        for (clock, code) in clocks.iter_mut().zip(codes) {
            *clock = wall_clock(code, date)?;
        }

        // Decide on the wall clock, so a value in a spring-forward gap is
        // judged by the hour that was written down.
        let [anchor, actual_arrival, expected_departure, actual_departure] = &mut clocks;
        shift_across_midnight(
            *anchor,
            [actual_arrival, expected_departure, actual_departure],
        );

        let local = |clock: Option<NaiveDateTime>, code: u32| {
            clock
                .map(|naive| StopTime::localized(naive, tz, code, date))
                .transpose()
        };
        Ok(Self {
            expected_arrival: local(clocks[0], codes[0])?,
            actual_arrival: local(clocks[1], codes[1])?,
            expected_departure: local(clocks[2], codes[2])?,
            actual_departure: local(clocks[3], codes[3])?,
        })
    }

    /// Returns the time of the given kind.
    pub fn get(&self, kind: TimeKind) -> Option<StopTime> {
        match kind {
            TimeKind::ActualArrival => self.actual_arrival,
            TimeKind::ExpectedArrival => self.expected_arrival,
            TimeKind::ActualDeparture => self.actual_departure,
            TimeKind::ExpectedDeparture => self.expected_departure,
        }
    }

    /// Move times recorded across midnight onto the right calendar day.
    ///
    /// The ledger dates each line by its expected arrival. When that anchor
    /// is late at night, early-morning values belong to the next day; when
    /// it is just after midnight, late-evening values belong to the previous
    /// day. A value is only moved while it still sits on the anchor's date,
    /// so calling this again on corrected times changes nothing.
    pub fn correct_midnight(&mut self) {
        shift_across_midnight(
            self.expected_arrival,
            [
                &mut self.actual_arrival,
                &mut self.expected_departure,
                &mut self.actual_departure,
            ],
        );
    }

    /// Returns `actual - expected` arrival, if both were recorded.
    pub fn arrival_delay(&self) -> Option<Duration> {
        match (self.actual_arrival, self.expected_arrival) {
            (Some(actual), Some(expected)) => Some(actual.signed_duration_since(expected)),
            _ => None,
        }
    }

    /// Returns `actual - expected` departure, if both were recorded.
    pub fn departure_delay(&self) -> Option<Duration> {
        match (self.actual_departure, self.expected_departure) {
            (Some(actual), Some(expected)) => Some(actual.signed_duration_since(expected)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(code: u32, d: NaiveDate) -> StopTime {
        StopTime::from_code(code, d, NETWORK_TZ).unwrap().unwrap()
    }

    fn raw(ea: u32, aa: u32, ed: u32, ad: u32) -> RawTimes {
        RawTimes {
            expected_arrival: ea,
            actual_arrival: aa,
            expected_departure: ed,
            actual_departure: ad,
        }
    }

    #[test]
    fn zero_is_not_recorded() {
        let d = date(2016, 3, 15);
        assert_eq!(StopTime::from_code(0, d, NETWORK_TZ).unwrap(), None);
    }

    #[test]
    fn decodes_hours_and_minutes() {
        let d = date(2016, 3, 15);

        let t = time(1430, d);
        assert_eq!(t.hour(), 14);
        assert_eq!(t.minute(), 30);
        assert_eq!(t.date(), d);

        let t = time(5, d);
        assert_eq!(t.hour(), 0);
        assert_eq!(t.minute(), 5);

        let t = time(2359, d);
        assert_eq!(t.to_string(), "23:59");
    }

    #[test]
    fn out_of_range_hour_rolls_into_next_day() {
        let d = date(2016, 3, 15);
        let t = time(2430, d);
        assert_eq!(t.date(), date(2016, 3, 16));
        assert_eq!(t.to_string(), "00:30");
    }

    #[test]
    fn localized_in_network_timezone() {
        let d = date(2016, 1, 10);
        let t = time(1200, d);
        // Israel standard time is UTC+2
        assert_eq!(t.datetime().naive_utc().format("%H:%M").to_string(), "10:00");
    }

    #[test]
    fn duration_across_dst_start_is_elapsed_time() {
        // Israel moved clocks forward at 02:00 on 2016-03-25
        let d = date(2016, 3, 25);
        let before = time(130, d);
        let after = time(330, d);
        assert_eq!(after.signed_duration_since(before), Duration::hours(1));
    }

    #[test]
    fn gap_time_lands_after_transition() {
        let d = date(2016, 3, 25);
        let t = time(230, d);
        assert_eq!(t.to_string(), "03:30");
    }

    #[test]
    fn ambiguous_time_resolves_to_standard_time() {
        // Israel moved clocks back at 02:00 on 2016-10-30
        let d = date(2016, 10, 30);
        let t = time(130, d);
        let later = time(300, d);
        assert_eq!(later.signed_duration_since(t), Duration::minutes(90));
    }

    #[test]
    fn late_anchor_shifts_early_dependents_forward() {
        let d = date(2016, 3, 15);
        let times = StopTimes::from_raw(raw(2300, 100, 105, 110), d, NETWORK_TZ).unwrap();

        let next = date(2016, 3, 16);
        assert_eq!(times.expected_arrival.unwrap().date(), d);
        assert_eq!(times.actual_arrival.unwrap().date(), next);
        assert_eq!(times.expected_departure.unwrap().date(), next);
        assert_eq!(times.actual_departure.unwrap().date(), next);
        assert_eq!(
            times
                .actual_arrival
                .unwrap()
                .signed_duration_since(times.expected_arrival.unwrap()),
            Duration::hours(2)
        );
    }

    #[test]
    fn early_anchor_shifts_late_dependents_backward() {
        let d = date(2016, 3, 16);
        let times = StopTimes::from_raw(raw(100, 2300, 105, 2350), d, NETWORK_TZ).unwrap();

        let prev = date(2016, 3, 15);
        assert_eq!(times.expected_arrival.unwrap().date(), d);
        assert_eq!(times.actual_arrival.unwrap().date(), prev);
        assert_eq!(times.expected_departure.unwrap().date(), d);
        assert_eq!(times.actual_departure.unwrap().date(), prev);
    }

    #[test]
    fn midday_anchor_never_shifts() {
        let d = date(2016, 3, 15);
        let times = StopTimes::from_raw(raw(1200, 100, 2300, 200), d, NETWORK_TZ).unwrap();

        assert_eq!(times.actual_arrival.unwrap().date(), d);
        assert_eq!(times.expected_departure.unwrap().date(), d);
        assert_eq!(times.actual_departure.unwrap().date(), d);
    }

    #[test]
    fn missing_anchor_never_shifts() {
        let d = date(2016, 3, 15);
        let times = StopTimes::from_raw(raw(0, 0, 2350, 10), d, NETWORK_TZ).unwrap();

        assert_eq!(times.expected_departure.unwrap().date(), d);
        assert_eq!(times.actual_departure.unwrap().date(), d);
    }

    #[test]
    fn boundary_hours() {
        let d = date(2016, 3, 15);

        // Hour 3 is not early enough to follow a late anchor
        let times = StopTimes::from_raw(raw(2200, 0, 300, 0), d, NETWORK_TZ).unwrap();
        assert_eq!(times.expected_departure.unwrap().date(), d);

        // Hour 3 is still an early anchor
        let times = StopTimes::from_raw(raw(359, 2200, 0, 0), d, NETWORK_TZ).unwrap();
        assert_eq!(times.actual_arrival.unwrap().date(), date(2016, 3, 14));

        // Hour 21 is not late enough to precede an early anchor
        let times = StopTimes::from_raw(raw(100, 2159, 0, 0), d, NETWORK_TZ).unwrap();
        assert_eq!(times.actual_arrival.unwrap().date(), d);
    }

    #[test]
    fn correction_is_idempotent() {
        let d = date(2016, 3, 15);

        let mut forward = StopTimes::from_raw(raw(2300, 100, 105, 0), d, NETWORK_TZ).unwrap();
        let once = forward;
        forward.correct_midnight();
        assert_eq!(forward, once);

        let mut backward = StopTimes::from_raw(raw(100, 2300, 0, 2310), d, NETWORK_TZ).unwrap();
        let once = backward;
        backward.correct_midnight();
        assert_eq!(backward, once);
    }

    #[test]
    fn gap_hour_dependent_after_late_anchor_moves_to_next_day() {
        // Clocks skipped 02:00-03:00 on 2016-03-25, but the departure coded
        // 0230 belongs to the 26th, where 02:30 exists
        let d = date(2016, 3, 25);
        let times = StopTimes::from_raw(raw(2350, 0, 2355, 230), d, NETWORK_TZ).unwrap();

        let departure = times.actual_departure.unwrap();
        assert_eq!(departure.date(), date(2016, 3, 26));
        assert_eq!(departure.to_string(), "02:30");
        assert_eq!(
            times.departure_delay(),
            Some(Duration::hours(2) + Duration::minutes(35))
        );
    }

    #[test]
    fn dependent_shifted_into_gap_lands_after_transition() {
        // The late anchor is on the 24th, so 0230 moves onto the changeover
        // day and is then read past the skipped hour
        let d = date(2016, 3, 24);
        let times = StopTimes::from_raw(raw(2350, 0, 2355, 230), d, NETWORK_TZ).unwrap();

        let departure = times.actual_departure.unwrap();
        assert_eq!(departure.date(), date(2016, 3, 25));
        assert_eq!(departure.to_string(), "03:30");
        assert_eq!(
            times.departure_delay(),
            Some(Duration::hours(2) + Duration::minutes(35))
        );

        let mut again = times;
        again.correct_midnight();
        assert_eq!(again, times);
    }

    #[test]
    fn rolled_over_anchor_does_not_pull_dependents_back() {
        // 2430 is 00:30 on the next day; the 23:50 dependent is already a
        // day before it and stays where it was recorded
        let d = date(2016, 3, 15);
        let times = StopTimes::from_raw(raw(2430, 0, 2350, 0), d, NETWORK_TZ).unwrap();

        let anchor = times.expected_arrival.unwrap();
        assert_eq!(anchor.date(), date(2016, 3, 16));
        assert_eq!(anchor.to_string(), "00:30");

        let departure = times.expected_departure.unwrap();
        assert_eq!(departure.date(), d);
        assert_eq!(departure.to_string(), "23:50");
    }

    #[test]
    fn delays() {
        let d = date(2016, 3, 15);
        let times = StopTimes::from_raw(raw(1000, 1005, 1010, 1008), d, NETWORK_TZ).unwrap();

        assert_eq!(times.arrival_delay(), Some(Duration::minutes(5)));
        assert_eq!(times.departure_delay(), Some(Duration::minutes(-2)));

        let times = StopTimes::from_raw(raw(0, 0, 1010, 0), d, NETWORK_TZ).unwrap();
        assert_eq!(times.arrival_delay(), None);
        assert_eq!(times.departure_delay(), None);
    }

    #[test]
    fn delay_across_midnight() {
        let d = date(2016, 3, 15);
        let times = StopTimes::from_raw(raw(2350, 10, 2355, 15), d, NETWORK_TZ).unwrap();

        assert_eq!(times.arrival_delay(), Some(Duration::minutes(20)));
        assert_eq!(times.departure_delay(), Some(Duration::minutes(20)));
    }

    #[test]
    fn get_by_kind() {
        let d = date(2016, 3, 15);
        let times = StopTimes::from_raw(raw(1000, 1001, 1002, 1003), d, NETWORK_TZ).unwrap();

        assert_eq!(times.get(TimeKind::ExpectedArrival), Some(time(1000, d)));
        assert_eq!(times.get(TimeKind::ActualArrival), Some(time(1001, d)));
        assert_eq!(times.get(TimeKind::ExpectedDeparture), Some(time(1002, d)));
        assert_eq!(times.get(TimeKind::ActualDeparture), Some(time(1003, d)));
    }

    #[test]
    fn display_and_debug() {
        let d = date(2016, 3, 15);
        let t = time(905, d);
        assert_eq!(t.to_string(), "09:05");
        assert!(format!("{t:?}").contains("2016-03-15 09:05"));
    }
}
