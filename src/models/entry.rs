//! Time-entry data models.
//!
//! A `TimeEntry` is either live-tracked (open until stopped, duration derived
//! from its start/end instants) or manual (fixed duration entered by the
//! driver, authoritative over the start/end delta).

use chrono::{DateTime, Duration, Utc};
use log::warn;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    Driving,
    Rest,
    Additional,
    Available,
}

impl ActivityType {
    pub const ALL: [ActivityType; 4] = [
        ActivityType::Driving,
        ActivityType::Rest,
        ActivityType::Additional,
        ActivityType::Available,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Driving => "driving",
            ActivityType::Rest => "rest",
            ActivityType::Additional => "additional",
            ActivityType::Available => "available",
        }
    }

    /// Display name used in reason strings and logs.
    pub fn label(&self) -> &'static str {
        match self {
            ActivityType::Driving => "driving",
            ActivityType::Rest => "rest",
            ActivityType::Additional => "other work",
            ActivityType::Available => "availability",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub activity: ActivityType,
    pub start_time: DateTime<Utc>,
    /// Absent while the entry is still open (activity in progress).
    pub end_time: Option<DateTime<Utc>>,
    pub is_manual_entry: bool,
    /// Authoritative duration for manual entries; ignored for live ones.
    pub duration_minutes: Option<i64>,
    pub notes: Option<String>,
    /// Set when a manual entry was force-saved despite exceeding a limit.
    #[serde(default)]
    pub is_non_compliant: bool,
}

impl TimeEntry {
    /// Creates an open live entry starting at `start_time`.
    pub fn open(activity: ActivityType, start_time: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            activity,
            start_time,
            end_time: None,
            is_manual_entry: false,
            duration_minutes: None,
            notes: None,
            is_non_compliant: false,
        }
    }

    /// Creates a closed manual entry of `duration_minutes` on the given day.
    pub fn manual(
        activity: ActivityType,
        start_time: DateTime<Utc>,
        duration_minutes: i64,
        notes: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            activity,
            start_time,
            end_time: Some(start_time + Duration::minutes(duration_minutes)),
            is_manual_entry: true,
            duration_minutes: Some(duration_minutes),
            notes,
            is_non_compliant: false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }

    /// Elapsed minutes of this entry. Manual entries report their fixed
    /// duration; live entries report the whole minutes between start and
    /// end, with `now` standing in for a missing end.
    ///
    /// A start after the end breaks the interval invariant; the delta is
    /// clamped to zero and logged rather than propagated as negative time.
    pub fn elapsed_minutes(&self, now: DateTime<Utc>) -> i64 {
        if self.is_manual_entry {
            return self.duration_minutes.unwrap_or(0).max(0);
        }

        let end = self.end_time.unwrap_or(now);
        let minutes = (end - self.start_time).num_minutes();
        if minutes < 0 {
            warn!(
                "entry {} has start {} after end {}; counting as zero",
                self.id, self.start_time, end
            );
            return 0;
        }
        minutes
    }
}

/// Formats a minute total as zero-padded `HH:MM`.
pub fn format_minutes(minutes: i64) -> String {
    let minutes = minutes.max(0);
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 6, h, m, s).unwrap()
    }

    #[test]
    fn live_entry_truncates_to_whole_minutes() {
        let mut entry = TimeEntry::open(ActivityType::Driving, at(8, 0, 0));

        entry.end_time = Some(at(8, 0, 59));
        assert_eq!(entry.elapsed_minutes(at(12, 0, 0)), 0);

        entry.end_time = Some(at(8, 1, 0));
        assert_eq!(entry.elapsed_minutes(at(12, 0, 0)), 1);

        entry.end_time = Some(at(12, 30, 59));
        assert_eq!(entry.elapsed_minutes(at(13, 0, 0)), 270);
    }

    #[test]
    fn open_entry_uses_now_as_end() {
        let entry = TimeEntry::open(ActivityType::Rest, at(8, 0, 0));
        assert!(entry.is_open());
        assert_eq!(entry.elapsed_minutes(at(8, 45, 0)), 45);
    }

    #[test]
    fn manual_entry_duration_overrides_delta() {
        let mut entry = TimeEntry::manual(ActivityType::Additional, at(9, 0, 0), 90, None);
        assert_eq!(entry.end_time, Some(at(10, 30, 0)));

        // The fixed duration wins even when the interval disagrees.
        entry.end_time = Some(at(9, 5, 0));
        assert_eq!(entry.elapsed_minutes(at(23, 0, 0)), 90);
    }

    #[test]
    fn inverted_interval_clamps_to_zero() {
        let mut entry = TimeEntry::open(ActivityType::Driving, at(10, 0, 0));
        entry.end_time = Some(at(9, 0, 0));
        assert_eq!(entry.elapsed_minutes(at(12, 0, 0)), 0);
    }

    #[test]
    fn wire_format_matches_persisted_shape() {
        let entry = TimeEntry::manual(ActivityType::Driving, at(8, 0, 0), 60, None);
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["type"], "driving");
        assert!(json["startTime"].is_string());
        assert_eq!(json["isManualEntry"], true);
        assert_eq!(json["durationMinutes"], 60);
        assert_eq!(json["isNonCompliant"], false);
    }

    #[test]
    fn formats_minutes_as_hours_and_minutes() {
        assert_eq!(format_minutes(0), "00:00");
        assert_eq!(format_minutes(45), "00:45");
        assert_eq!(format_minutes(540), "09:00");
        assert_eq!(format_minutes(601), "10:01");
    }
}
