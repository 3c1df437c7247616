//! Extended-day counting.
//!
//! EU-style rules allow a bounded number of days per week above the standard
//! daily limit before the stricter limit snaps back. Counting which days of
//! the current week went over is the gate that decides the applicable limit.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};

use crate::compliance::aggregate::{local_date, range_start, TimeRange};
use crate::models::{ActivityType, TimeEntry};

/// Number of days in the week up to `today` whose total minutes of
/// `activity` are strictly over `standard_daily_limit`.
///
/// Entries are bucketed by the local calendar date of their start; a manual
/// entry's whole duration lands on its start date, never split across
/// midnight. Recomputed from scratch on every call — entries can be added
/// and deleted in any order, so nothing here may be cached.
pub fn count_extended_days(
    entries: &[TimeEntry],
    activity: ActivityType,
    standard_daily_limit: i64,
    today: DateTime<Utc>,
) -> u32 {
    let week_start = range_start(TimeRange::Week, today);

    let mut per_day: HashMap<NaiveDate, i64> = HashMap::new();
    for entry in entries
        .iter()
        .filter(|entry| entry.activity == activity)
        .filter(|entry| entry.start_time >= week_start && entry.start_time <= today)
    {
        *per_day.entry(local_date(entry.start_time)).or_insert(0) +=
            entry.elapsed_minutes(today);
    }

    per_day
        .values()
        .filter(|&&minutes| minutes > standard_daily_limit)
        .count() as u32
}
