pub mod entry;
pub mod holiday;

pub use entry::{format_minutes, ActivityType, TimeEntry};
pub use holiday::HolidayEntry;
