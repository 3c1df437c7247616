pub mod advisory;
pub mod aggregate;
pub mod evaluate;
pub mod extended;

pub use advisory::{advisories, break_due, remaining_rest, Advisory, DailyTotals, RestKind};
pub use aggregate::{activity_minutes, activity_minutes_between, range_start, TimeRange};
pub use evaluate::{compliance_percentage, would_exceed_limit, ComplianceStatus, LimitCheck};
pub use extended::count_extended_days;
