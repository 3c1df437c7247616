//! Holiday calendar records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A worked holiday or a marked 6th consecutive working day. Record-keeping
/// only; these never enter the compliance math.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HolidayEntry {
    pub id: String,
    pub date: NaiveDate,
    pub description: String,
    pub is_sixth_day: bool,
}

impl HolidayEntry {
    pub fn new(date: NaiveDate, description: String, is_sixth_day: bool) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            date,
            description,
            is_sixth_day,
        }
    }
}
