use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{ActivityType, TimeEntry};

/// The active-session state machine: idle, or exactly one open entry.
///
/// `begin` closes any prior open entry before opening the next one, so
/// switching activities leaves neither a gap nor two simultaneously open
/// intervals; `stop` on an idle state is a no-op.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub current: Option<TimeEntry>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    pub fn activity(&self) -> Option<ActivityType> {
        self.current.as_ref().map(|entry| entry.activity)
    }

    /// Opens a new live entry at `now`, returning the previously open entry
    /// (closed at `now`) when there was one.
    pub fn begin(&mut self, activity: ActivityType, now: DateTime<Utc>) -> Option<TimeEntry> {
        let closed = self.stop(now);
        self.current = Some(TimeEntry::open(activity, now));
        closed
    }

    /// Closes the open entry at `now`. `None` when already idle.
    pub fn stop(&mut self, now: DateTime<Utc>) -> Option<TimeEntry> {
        let mut entry = self.current.take()?;
        entry.end_time = Some(now);
        Some(entry)
    }

    /// Minutes elapsed on the open entry, zero when idle.
    pub fn elapsed_minutes(&self, now: DateTime<Utc>) -> i64 {
        self.current
            .as_ref()
            .map(|entry| entry.elapsed_minutes(now))
            .unwrap_or(0)
    }
}
