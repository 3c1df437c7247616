//! Working-time tracking and driving-time compliance for professional
//! drivers: a log of activity intervals, aggregation over regulation
//! windows, extended-day counting, and percentage/status evaluation against
//! swappable limit tables.
//!
//! ```
//! use jornada::{ActivityType, MemoryStore, TimeTracker, TrackerConfig};
//!
//! # fn main() -> anyhow::Result<()> {
//! let store = Box::new(MemoryStore::new());
//! let mut tracker = TimeTracker::load(store, TrackerConfig::default())?;
//!
//! tracker.start_activity(ActivityType::Driving)?;
//! let closed = tracker.stop_activity()?;
//! assert_eq!(closed.unwrap().activity, ActivityType::Driving);
//! # Ok(())
//! # }
//! ```

pub mod compliance;
pub mod config;
pub mod models;
pub mod regulation;
pub mod store;
pub mod tracker;

pub use compliance::{
    activity_minutes, activity_minutes_between, advisories, break_due, compliance_percentage,
    count_extended_days, range_start, remaining_rest, would_exceed_limit, Advisory,
    ComplianceStatus, DailyTotals, LimitCheck, RestKind, TimeRange,
};
pub use config::{EnforcementPolicy, TrackerConfig};
pub use models::{format_minutes, ActivityType, HolidayEntry, TimeEntry};
pub use regulation::{RegulationSet, ADDITIONAL_DAILY_FALLBACK};
pub use store::{KvStore, MemoryStore, SqliteStore};
pub use tracker::{
    ComplianceReport, DashboardSnapshot, ManualEntryOutcome, StartOutcome, TimeTracker,
};
