//! Validated reporting windows.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::error::{AnalyticsError, Result};

/// An inclusive range of UTC dates for windowed reports.
///
/// `from <= to` is enforced at construction, so every function that takes a
/// window can assume the range is well formed. Both endpoints are whole
/// days: the window covers `from` at midnight through the last nanosecond
/// of `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    from: NaiveDate,
    to: NaiveDate,
}

impl ReportWindow {
    /// Window length used when a caller has no explicit range in mind.
    pub const DEFAULT_DAYS: u32 = 30;

    /// Creates a window covering `from` through `to`, inclusive.
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self> {
        if from > to {
            return Err(AnalyticsError::InvalidRange { from, to });
        }
        Ok(Self { from, to })
    }

    /// Creates the window of the last `days` days ending at `today`,
    /// inclusive on both ends. A zero `days` still covers `today` itself.
    pub fn last_days(today: NaiveDate, days: u32) -> Self {
        let span = Duration::days(i64::from(days.saturating_sub(1)));
        Self {
            from: today.checked_sub_signed(span).unwrap_or(NaiveDate::MIN),
            to: today,
        }
    }

    /// The first day of the window.
    pub fn from(&self) -> NaiveDate {
        self.from
    }

    /// The last day of the window.
    pub fn to(&self) -> NaiveDate {
        self.to
    }

    /// Number of days the window covers.
    pub fn days(&self) -> i64 {
        (self.to - self.from).num_days() + 1
    }

    /// The instant the window opens: `from` at midnight UTC.
    pub fn start_bound(&self) -> DateTime<Utc> {
        self.from.and_time(NaiveTime::MIN).and_utc()
    }

    /// The last instant the window covers: the final nanosecond of `to`.
    pub fn end_bound(&self) -> DateTime<Utc> {
        match self.to.succ_opt() {
            Some(next_day) => {
                next_day.and_time(NaiveTime::MIN).and_utc() - Duration::nanoseconds(1)
            }
            None => NaiveDateTime::MAX.and_utc(),
        }
    }

    /// Whether a day falls inside the window.
    pub fn contains_day(&self, day: NaiveDate) -> bool {
        self.from <= day && day <= self.to
    }

    /// Whether an instant falls inside the window (by its UTC date).
    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        self.contains_day(timestamp.date_naive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[test]
    fn accepts_ordered_range() {
        let window = ReportWindow::new(day(1), day(30)).unwrap();
        assert_eq!(window.from(), day(1));
        assert_eq!(window.to(), day(30));
        assert_eq!(window.days(), 30);
    }

    #[test]
    fn accepts_single_day_range() {
        let window = ReportWindow::new(day(15), day(15)).unwrap();
        assert_eq!(window.days(), 1);
        assert!(window.contains_day(day(15)));
    }

    #[test]
    fn rejects_inverted_range() {
        let result = ReportWindow::new(day(10), day(1));
        assert!(matches!(
            result,
            Err(AnalyticsError::InvalidRange { .. })
        ));
    }

    #[test]
    fn last_days_covers_today_inclusive() {
        let window = ReportWindow::last_days(day(30), ReportWindow::DEFAULT_DAYS);
        assert_eq!(window.to(), day(30));
        assert_eq!(window.from(), day(1));
        assert_eq!(window.days(), 30);
    }

    #[test]
    fn last_days_zero_still_covers_today() {
        let window = ReportWindow::last_days(day(15), 0);
        assert_eq!(window.from(), day(15));
        assert_eq!(window.to(), day(15));
    }

    #[test]
    fn bounds_cover_whole_days() {
        let window = ReportWindow::new(day(1), day(2)).unwrap();

        assert_eq!(
            window.start_bound(),
            Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
        );

        let last_second = Utc.with_ymd_and_hms(2024, 6, 2, 23, 59, 59).unwrap();
        let next_midnight = Utc.with_ymd_and_hms(2024, 6, 3, 0, 0, 0).unwrap();
        assert!(window.end_bound() >= last_second);
        assert!(window.end_bound() < next_midnight);
    }

    #[test]
    fn contains_uses_utc_dates() {
        let window = ReportWindow::new(day(1), day(2)).unwrap();

        assert!(window.contains(Utc.with_ymd_and_hms(2024, 6, 2, 23, 59, 59).unwrap()));
        assert!(!window.contains(Utc.with_ymd_and_hms(2024, 6, 3, 0, 0, 0).unwrap()));
        assert!(!window.contains(Utc.with_ymd_and_hms(2024, 5, 31, 23, 59, 59).unwrap()));
    }
}
