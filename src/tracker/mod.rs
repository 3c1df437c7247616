pub mod controller;
pub mod state;

pub use controller::{
    ComplianceReport, DashboardSnapshot, ManualEntryOutcome, StartOutcome, TimeTracker,
};
pub use state::SessionState;
