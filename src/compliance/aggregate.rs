//! Pure aggregation over time entries.
//!
//! Totals are computed on demand from a passed-in snapshot of entries; there
//! is no cached or incremental state. Window boundaries follow the driver's
//! local calendar (regulation windows are wall-clock days, not UTC days)
//! while the entries themselves carry UTC instants.

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{ActivityType, TimeEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    Day,
    Week,
    Biweek,
}

impl TimeRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::Day => "day",
            TimeRange::Week => "week",
            TimeRange::Biweek => "biweek",
        }
    }
}

/// Local calendar date of a UTC instant.
pub(crate) fn local_date(instant: DateTime<Utc>) -> NaiveDate {
    instant.with_timezone(&Local).date_naive()
}

/// UTC instant of local midnight on `date`.
pub(crate) fn local_midnight(date: NaiveDate) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);
    // A DST transition at exactly 00:00 can leave midnight ambiguous or
    // nonexistent; take the earliest instant that exists on that day.
    Local
        .from_local_datetime(&midnight)
        .earliest()
        .or_else(|| {
            Local
                .from_local_datetime(&(midnight + Duration::hours(1)))
                .earliest()
        })
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&midnight))
}

/// Start instant of the window `range` ending at `now`.
///
/// `Day` is local midnight today; `Week` is the most recent Monday at local
/// midnight (ISO week, so a Sunday reaches 6 days back); `Biweek` is a
/// 14-day inclusive trailing window, not aligned to any calendar boundary.
pub fn range_start(range: TimeRange, now: DateTime<Utc>) -> DateTime<Utc> {
    let today = local_date(now);
    match range {
        TimeRange::Day => local_midnight(today),
        TimeRange::Week => {
            let days_back = today.weekday().num_days_from_monday() as i64;
            local_midnight(today - Duration::days(days_back))
        }
        TimeRange::Biweek => local_midnight(today - Duration::days(13)),
    }
}

/// Total minutes of `activity` across entries starting within
/// `[window_start, window_end]` inclusive.
///
/// Manual entries contribute their fixed duration; live entries contribute
/// whole minutes between start and end, with `now` standing in for a missing
/// end. Entries are attributed whole to the window containing their start.
pub fn activity_minutes_between(
    entries: &[TimeEntry],
    activity: ActivityType,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
    now: DateTime<Utc>,
) -> i64 {
    entries
        .iter()
        .filter(|entry| entry.activity == activity)
        .filter(|entry| entry.start_time >= window_start && entry.start_time <= window_end)
        .map(|entry| entry.elapsed_minutes(now))
        .sum()
}

/// Total minutes of `activity` from `window_start` up to `now`.
pub fn activity_minutes(
    entries: &[TimeEntry],
    activity: ActivityType,
    window_start: DateTime<Utc>,
    now: DateTime<Utc>,
) -> i64 {
    activity_minutes_between(entries, activity, window_start, now, now)
}
