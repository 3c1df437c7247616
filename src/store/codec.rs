//! JSON codec for store payloads.
//!
//! Decoding is lenient element-by-element: a corrupt record is excluded and
//! logged instead of failing the load, so one bad row never takes the
//! dashboard down. Timestamps re-hydrate to real datetime values through
//! the models' typed fields.

use anyhow::{Context, Result};
use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

pub fn encode<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).context("failed to serialize store payload")
}

/// Decodes a JSON array, dropping elements that fail to deserialize.
pub fn decode_collection<T: DeserializeOwned>(raw: &str, what: &str) -> Vec<T> {
    let items: Vec<Value> = match serde_json::from_str(raw) {
        Ok(items) => items,
        Err(err) => {
            warn!("discarding corrupt {what} payload: {err}");
            return Vec::new();
        }
    };

    let mut decoded = Vec::with_capacity(items.len());
    let mut dropped = 0usize;
    for item in items {
        match serde_json::from_value(item) {
            Ok(value) => decoded.push(value),
            Err(err) => {
                dropped += 1;
                warn!("skipping corrupt {what} record: {err}");
            }
        }
    }
    if dropped > 0 {
        warn!("excluded {dropped} corrupt {what} record(s) from load");
    }
    decoded
}

/// Decodes a single JSON value, yielding `None` when it is corrupt.
pub fn decode_single<T: DeserializeOwned>(raw: &str, what: &str) -> Option<T> {
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!("discarding corrupt {what} payload: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimeEntry;

    #[test]
    fn corrupt_records_are_excluded_not_fatal() {
        // Second record has an unparseable startTime.
        let raw = r#"[
            {"id":"a","type":"driving","startTime":"2024-05-06T08:00:00Z","endTime":"2024-05-06T09:00:00Z","isManualEntry":false,"durationMinutes":null,"notes":null},
            {"id":"b","type":"driving","startTime":"not-a-date","endTime":null,"isManualEntry":false,"durationMinutes":null,"notes":null}
        ]"#;

        let entries: Vec<TimeEntry> = decode_collection(raw, "time entry");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, "a");
    }

    #[test]
    fn non_array_payload_yields_empty() {
        let entries: Vec<TimeEntry> = decode_collection("{\"oops\":1}", "time entry");
        assert!(entries.is_empty());
    }

    #[test]
    fn entries_round_trip_with_dates_rehydrated() {
        let entry = TimeEntry::manual(
            crate::models::ActivityType::Rest,
            chrono::Utc::now(),
            60,
            Some("lunch stop".into()),
        );
        let raw = encode(&vec![entry.clone()]).unwrap();
        let restored: Vec<TimeEntry> = decode_collection(&raw, "time entry");
        assert_eq!(restored, vec![entry]);
    }

    #[test]
    fn single_value_decode_tolerates_corruption() {
        assert_eq!(decode_single::<TimeEntry>("garbage", "current entry"), None);
    }
}
