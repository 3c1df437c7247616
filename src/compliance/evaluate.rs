//! Compliance evaluation.
//!
//! Converts aggregated totals into percentage-of-limit and a three-level
//! status, and answers the advisory "would this manual entry push a day or
//! week over its limit" question. Exceeding a limit is a normal evaluated
//! result here, never an error: the caller decides whether to warn or block.

use chrono::{DateTime, Datelike, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::compliance::aggregate::{local_date, TimeRange};
use crate::compliance::extended::count_extended_days;
use crate::models::{format_minutes, ActivityType, TimeEntry};
use crate::regulation::RegulationSet;

/// Percentage at which a total turns from safe to warning.
pub const WARNING_THRESHOLD: f64 = 80.0;
/// Percentage at which a total turns from warning to danger.
pub const DANGER_THRESHOLD: f64 = 95.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplianceStatus {
    Safe,
    Warning,
    Danger,
}

impl ComplianceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplianceStatus::Safe => "safe",
            ComplianceStatus::Warning => "warning",
            ComplianceStatus::Danger => "danger",
        }
    }

    /// Three-way partition of [0, 100]: below 80 safe, below 95 warning,
    /// 95 and up danger.
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage < WARNING_THRESHOLD {
            ComplianceStatus::Safe
        } else if percentage < DANGER_THRESHOLD {
            ComplianceStatus::Warning
        } else {
            ComplianceStatus::Danger
        }
    }
}

/// Percentage of the resolved limit that `activity_time` represents,
/// capped at 100.
///
/// The extended-day counts feed the daily limit resolution for driving and
/// availability (see [`RegulationSet::limit_for`]); they are ignored for
/// other activity/range combinations.
pub fn compliance_percentage(
    activity_time: i64,
    activity: ActivityType,
    range: TimeRange,
    regulation: &RegulationSet,
    extended_driving_days: u32,
    extended_availability_days: u32,
) -> f64 {
    let limit = regulation.limit_for(
        activity,
        range,
        extended_driving_days,
        extended_availability_days,
    );
    if limit <= 0 {
        return 100.0;
    }
    (activity_time as f64 / limit as f64 * 100.0).min(100.0)
}

/// Advisory verdict on a hypothetical entry. `reason` is empty when the
/// entry stays within limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimitCheck {
    pub exceeds: bool,
    pub reason: String,
}

impl LimitCheck {
    pub fn ok() -> Self {
        Self {
            exceeds: false,
            reason: String::new(),
        }
    }

    pub fn exceeded(reason: String) -> Self {
        Self {
            exceeds: true,
            reason,
        }
    }
}

/// Whether adding `new_duration_minutes` of `activity` on `date`'s calendar
/// day would cross a limit, given the existing entries.
///
/// The daily limit uses the same extended/standard resolution as the
/// dashboard, with extended-day counts re-derived from `entries` over the
/// week containing `date`. Driving additionally checks the resulting weekly
/// total; the daily verdict takes precedence when both fire. For
/// availability an exhausted extended-day quota means the stricter standard
/// cap is what the projected total is compared against.
///
/// Advisory only: this never writes and never blocks — callers prompt for
/// confirmation (or refuse, under a blocking policy) based on the verdict.
pub fn would_exceed_limit(
    activity: ActivityType,
    new_duration_minutes: i64,
    date: DateTime<Utc>,
    entries: &[TimeEntry],
    regulation: &RegulationSet,
    now: DateTime<Utc>,
) -> LimitCheck {
    let day = local_date(date);

    let day_total: i64 = entries
        .iter()
        .filter(|entry| entry.activity == activity)
        .filter(|entry| local_date(entry.start_time) == day)
        .map(|entry| entry.elapsed_minutes(now))
        .sum();

    let extended_driving =
        count_extended_days(entries, ActivityType::Driving, regulation.driving.daily, date);
    let extended_availability = count_extended_days(
        entries,
        ActivityType::Available,
        regulation.available.daily,
        date,
    );

    let daily_limit = regulation.limit_for(
        activity,
        TimeRange::Day,
        extended_driving,
        extended_availability,
    );
    let projected = day_total + new_duration_minutes;
    if projected > daily_limit {
        return LimitCheck::exceeded(format!(
            "daily {} limit of {} exceeded: the day would reach {}",
            activity.label(),
            format_minutes(daily_limit),
            format_minutes(projected)
        ));
    }

    if activity == ActivityType::Driving {
        let week_first = day - Duration::days(day.weekday().num_days_from_monday() as i64);
        let week_total: i64 = entries
            .iter()
            .filter(|entry| entry.activity == activity)
            .filter(|entry| {
                let entry_day = local_date(entry.start_time);
                entry_day >= week_first && entry_day <= day
            })
            .map(|entry| entry.elapsed_minutes(now))
            .sum();

        if week_total + new_duration_minutes > regulation.driving.weekly {
            return LimitCheck::exceeded(format!(
                "weekly driving limit of {} exceeded: the week would reach {}",
                format_minutes(regulation.driving.weekly),
                format_minutes(week_total + new_duration_minutes)
            ));
        }
    }

    LimitCheck::ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    fn local(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Local
            .with_ymd_and_hms(y, mo, d, h, mi, 0)
            .single()
            .expect("unambiguous local time")
            .with_timezone(&Utc)
    }

    fn manual(activity: ActivityType, day: DateTime<Utc>, minutes: i64) -> TimeEntry {
        TimeEntry::manual(activity, day, minutes, None)
    }

    /// Rule set whose resolved daily driving limit is a flat 540, so the
    /// percentage arithmetic below is exact.
    fn flat_540() -> RegulationSet {
        let mut set = RegulationSet::spain();
        set.driving.extended_daily = set.driving.daily;
        set
    }

    #[test]
    fn percentage_is_monotonic_and_capped() {
        let set = flat_540();
        let pct = |minutes| {
            compliance_percentage(minutes, ActivityType::Driving, TimeRange::Day, &set, 0, 0)
        };

        assert_eq!(pct(0), 0.0);
        assert_eq!(pct(270), 50.0);
        assert!(pct(270) <= pct(271));
        assert_eq!(pct(540), 100.0);
        // Ten times the limit still reads 100, not 1000.
        assert_eq!(pct(5400), 100.0);
    }

    #[test]
    fn status_partitions_the_whole_scale() {
        assert_eq!(ComplianceStatus::from_percentage(0.0), ComplianceStatus::Safe);
        assert_eq!(ComplianceStatus::from_percentage(79.999), ComplianceStatus::Safe);
        assert_eq!(ComplianceStatus::from_percentage(80.0), ComplianceStatus::Warning);
        assert_eq!(ComplianceStatus::from_percentage(94.999), ComplianceStatus::Warning);
        assert_eq!(ComplianceStatus::from_percentage(95.0), ComplianceStatus::Danger);
        assert_eq!(ComplianceStatus::from_percentage(100.0), ComplianceStatus::Danger);
    }

    #[test]
    fn half_a_day_of_driving_reads_safe() {
        let set = flat_540();
        let now = local(2024, 5, 6, 14, 0);
        let entries = vec![{
            let mut entry = TimeEntry::open(ActivityType::Driving, local(2024, 5, 6, 8, 0));
            entry.end_time = Some(local(2024, 5, 6, 12, 30));
            entry
        }];

        let minutes = crate::compliance::activity_minutes(
            &entries,
            ActivityType::Driving,
            crate::compliance::range_start(TimeRange::Day, now),
            now,
        );
        assert_eq!(minutes, 270);

        let pct =
            compliance_percentage(minutes, ActivityType::Driving, TimeRange::Day, &set, 0, 0);
        assert_eq!(pct, 50.0);
        assert_eq!(ComplianceStatus::from_percentage(pct), ComplianceStatus::Safe);
    }

    #[test]
    fn daily_overrun_reports_with_reason() {
        let set = flat_540();
        let today = local(2024, 5, 6, 12, 0);
        let existing = vec![manual(ActivityType::Driving, today, 480)];

        let check = would_exceed_limit(
            ActivityType::Driving,
            400,
            today,
            &existing,
            &set,
            today,
        );
        assert!(check.exceeds);
        assert!(check.reason.contains("daily driving limit"));
        assert!(check.reason.contains("09:00"));
    }

    #[test]
    fn within_limits_is_clean() {
        let set = flat_540();
        let today = local(2024, 5, 6, 12, 0);
        let existing = vec![manual(ActivityType::Driving, today, 120)];

        let check =
            would_exceed_limit(ActivityType::Driving, 60, today, &existing, &set, today);
        assert!(!check.exceeds);
        assert!(check.reason.is_empty());
    }

    #[test]
    fn weekly_driving_cap_fires_when_days_are_fine() {
        let mut set = flat_540();
        set.driving.weekly = 1000;
        let today = local(2024, 5, 9, 12, 0);
        // Three prior days this week, each under the daily cap.
        let existing = vec![
            manual(ActivityType::Driving, local(2024, 5, 6, 8, 0), 400),
            manual(ActivityType::Driving, local(2024, 5, 7, 8, 0), 400),
            manual(ActivityType::Driving, local(2024, 5, 8, 8, 0), 150),
        ];

        let check =
            would_exceed_limit(ActivityType::Driving, 100, today, &existing, &set, today);
        assert!(check.exceeds);
        assert!(check.reason.contains("weekly driving limit"));
    }

    #[test]
    fn daily_verdict_takes_precedence_over_weekly() {
        let mut set = flat_540();
        set.driving.weekly = 600;
        let today = local(2024, 5, 6, 12, 0);
        let existing = vec![manual(ActivityType::Driving, today, 500)];

        // 500 + 200 crosses both caps; the daily one is reported.
        let check =
            would_exceed_limit(ActivityType::Driving, 200, today, &existing, &set, today);
        assert!(check.exceeds);
        assert!(check.reason.contains("daily driving limit"));
    }

    #[test]
    fn exhausted_availability_quota_tightens_the_daily_cap() {
        let set = RegulationSet::spain();
        let today = local(2024, 5, 9, 12, 0);
        // Three extended availability days this week: quota of 3 used up.
        let existing = vec![
            manual(ActivityType::Available, local(2024, 5, 6, 8, 0), 300),
            manual(ActivityType::Available, local(2024, 5, 7, 8, 0), 300),
            manual(ActivityType::Available, local(2024, 5, 8, 8, 0), 300),
        ];

        // 200 fits the extended cap of 360 but not the post-quota cap of 240.
        let check =
            would_exceed_limit(ActivityType::Available, 250, today, &existing, &set, today);
        assert!(check.exceeds);
        assert!(check.reason.contains("04:00"));

        // With quota remaining the same entry would have passed.
        let fresh = vec![existing[0].clone()];
        let check =
            would_exceed_limit(ActivityType::Available, 250, today, &fresh, &set, today);
        assert!(!check.exceeds);
    }
}
