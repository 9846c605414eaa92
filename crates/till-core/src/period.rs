//! # Reporting Periods
//!
//! The four canonical reporting periods and the date windows they cover.
//!
//! ## Windows
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  now = Wed 18 Mar 2026 14:30 (server local calendar)                   │
//! │                                                                         │
//! │  week        [11 Mar 14:30 ─────────────────────────► 18 Mar 14:30]    │
//! │  two-weeks   [03 Mar 14:30 ─────────────────────────► 18 Mar 14:30]    │
//! │  month       [01 Mar 00:00 ─────────────────────────► 18 Mar 14:30]    │
//! │  last-month  [01 Feb 00:00 ─────────────────► 28 Feb 23:59:59.999]     │
//! │                                                                         │
//! │  Both bounds are inclusive.                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Window math is generic over [`chrono::TimeZone`]: production passes
//! `DateTime<Local>` from the clock, tests pin `Utc` or a fixed offset.

use chrono::{DateTime, Datelike, Days, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::CoreError;

// =============================================================================
// Period
// =============================================================================

/// A canonical reporting period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum Period {
    /// The last 7 days up to now.
    Week,
    /// The last 15 days up to now.
    TwoWeeks,
    /// The current calendar month up to now.
    Month,
    /// The whole previous calendar month.
    LastMonth,
}

impl Period {
    /// Every period, in the order summaries are computed.
    pub const ALL: [Period; 4] = [
        Period::Month,
        Period::LastMonth,
        Period::TwoWeeks,
        Period::Week,
    ];

    /// Returns the wire label (`"two-weeks"`, ...).
    pub const fn as_str(&self) -> &'static str {
        match self {
            Period::Week => "week",
            Period::TwoWeeks => "two-weeks",
            Period::Month => "month",
            Period::LastMonth => "last-month",
        }
    }

    /// Computes the inclusive window this period covers at `now`.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::{TimeZone, Utc};
    /// use till_core::Period;
    ///
    /// let now = Utc.with_ymd_and_hms(2026, 3, 18, 14, 30, 0).unwrap();
    /// let window = Period::LastMonth.window(&now);
    ///
    /// assert_eq!(window.start, Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap());
    /// assert_eq!(window.end.to_rfc3339(), "2026-02-28T23:59:59.999+00:00");
    /// ```
    pub fn window<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> ReportWindow {
        let (start, end) = match self {
            Period::Week => (days_before(now, 7), now.clone()),
            Period::TwoWeeks => (days_before(now, 15), now.clone()),
            Period::Month => (month_start(now, 0), now.clone()),
            Period::LastMonth => (
                month_start(now, -1),
                month_start(now, 0) - Duration::milliseconds(1),
            ),
        };

        ReportWindow::new(&start, &end)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "week" => Ok(Period::Week),
            "two-weeks" => Ok(Period::TwoWeeks),
            "month" => Ok(Period::Month),
            "last-month" => Ok(Period::LastMonth),
            other => Err(CoreError::InvalidPeriod(other.to_string())),
        }
    }
}

// =============================================================================
// Report Window
// =============================================================================

/// An inclusive `[start, end]` time range, normalized to UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ReportWindow {
    /// Creates a window from bounds in any time zone.
    pub fn new<Tz: TimeZone>(start: &DateTime<Tz>, end: &DateTime<Tz>) -> Self {
        ReportWindow {
            start: start.with_timezone(&Utc),
            end: end.with_timezone(&Utc),
        }
    }

    /// The whole calendar month containing `now`, through 23:59:59.999 of
    /// its last day.
    pub fn current_month<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        let start = month_start(now, 0);
        let end = month_start(now, 1) - Duration::milliseconds(1);
        ReportWindow::new(&start, &end)
    }

    /// Start bound as epoch milliseconds (the storage representation).
    pub fn start_millis(&self) -> i64 {
        self.start.timestamp_millis()
    }

    /// End bound as epoch milliseconds.
    pub fn end_millis(&self) -> i64 {
        self.end.timestamp_millis()
    }

    /// Checks whether `at` falls inside the window (bounds inclusive).
    pub fn contains(&self, at: &DateTime<Utc>) -> bool {
        *at >= self.start && *at <= self.end
    }
}

// =============================================================================
// Calendar Helpers
// =============================================================================

/// Steps back whole calendar days, keeping the local wall-clock time.
fn days_before<Tz: TimeZone>(now: &DateTime<Tz>, days: u64) -> DateTime<Tz> {
    now.clone()
        .checked_sub_days(Days::new(days))
        .unwrap_or_else(|| now.clone() - Duration::days(days as i64))
}

/// Midnight of the first day of the month `offset` months away from `now`.
fn month_start<Tz: TimeZone>(now: &DateTime<Tz>, offset: i32) -> DateTime<Tz> {
    let months = now.year() * 12 + now.month0() as i32 + offset;
    let (year, month) = (months.div_euclid(12), months.rem_euclid(12) as u32 + 1);

    let date = NaiveDate::from_ymd_opt(year, month, 1).unwrap_or_else(|| now.date_naive());
    let midnight = date.and_time(NaiveTime::MIN);

    let tz = now.timezone();
    // Midnight can fall in a DST gap; take the first valid instant.
    tz.from_local_datetime(&midnight)
        .earliest()
        .unwrap_or_else(|| tz.from_utc_datetime(&midnight))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    fn end_of_day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        utc(y, m, d, 23, 59, 59) + Duration::milliseconds(999)
    }

    #[test]
    fn test_parse_labels() {
        for period in Period::ALL {
            assert_eq!(period.as_str().parse::<Period>().unwrap(), period);
        }
        assert!(matches!(
            "bogus".parse::<Period>(),
            Err(CoreError::InvalidPeriod(label)) if label == "bogus"
        ));
        assert!("Week".parse::<Period>().is_err());
    }

    #[test]
    fn test_rolling_windows() {
        let now = utc(2026, 3, 18, 14, 30, 0);

        let week = Period::Week.window(&now);
        assert_eq!(week.start, utc(2026, 3, 11, 14, 30, 0));
        assert_eq!(week.end, now);

        let two_weeks = Period::TwoWeeks.window(&now);
        assert_eq!(two_weeks.start, utc(2026, 3, 3, 14, 30, 0));
        assert_eq!(two_weeks.end, now);
    }

    #[test]
    fn test_calendar_windows() {
        let now = utc(2026, 3, 18, 14, 30, 0);

        let month = Period::Month.window(&now);
        assert_eq!(month.start, utc(2026, 3, 1, 0, 0, 0));
        assert_eq!(month.end, now);

        let last_month = Period::LastMonth.window(&now);
        assert_eq!(last_month.start, utc(2026, 2, 1, 0, 0, 0));
        assert_eq!(last_month.end, end_of_day(2026, 2, 28));
    }

    #[test]
    fn test_last_month_rolls_back_a_year_in_january() {
        let now = utc(2026, 1, 10, 9, 0, 0);
        let window = Period::LastMonth.window(&now);

        assert_eq!(window.start, utc(2025, 12, 1, 0, 0, 0));
        assert_eq!(window.end, end_of_day(2025, 12, 31));
    }

    #[test]
    fn test_current_month_handles_leap_february_and_december() {
        let feb = ReportWindow::current_month(&utc(2028, 2, 10, 8, 0, 0));
        assert_eq!(feb.start, utc(2028, 2, 1, 0, 0, 0));
        assert_eq!(feb.end, end_of_day(2028, 2, 29));

        let dec = ReportWindow::current_month(&utc(2026, 12, 31, 23, 0, 0));
        assert_eq!(dec.start, utc(2026, 12, 1, 0, 0, 0));
        assert_eq!(dec.end, end_of_day(2026, 12, 31));
    }

    #[test]
    fn test_month_start_uses_local_calendar() {
        // 01:00 on 1 March in UTC+5 is still February in UTC.
        let tz = FixedOffset::east_opt(5 * 3600).unwrap();
        let now = tz.with_ymd_and_hms(2026, 3, 1, 1, 0, 0).unwrap();

        let month = Period::Month.window(&now);
        assert_eq!(month.start, utc(2026, 2, 28, 19, 0, 0));
        assert_eq!(month.end, utc(2026, 2, 28, 20, 0, 0));
    }

    #[test]
    fn test_contains_is_inclusive() {
        let window = Period::LastMonth.window(&utc(2026, 3, 18, 14, 30, 0));

        assert!(window.contains(&window.start));
        assert!(window.contains(&window.end));
        assert!(!window.contains(&utc(2026, 3, 1, 0, 0, 0)));
        assert_eq!(window.end_millis() + 1, utc(2026, 3, 1, 0, 0, 0).timestamp_millis());
    }
}
