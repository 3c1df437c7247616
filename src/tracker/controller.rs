//! The tracker service: owns the entry log, the holiday calendar, the
//! active session, and the persistence boundary.
//!
//! State is loaded once at construction and saved after every mutating
//! operation. All compliance reads are computed on demand from the owned
//! snapshot; nothing is cached between calls.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use log::{debug, info, warn};
use serde::Serialize;

use crate::compliance::{
    activity_minutes, advisories, compliance_percentage, count_extended_days, range_start,
    would_exceed_limit, Advisory, ComplianceStatus, DailyTotals, LimitCheck, TimeRange,
};
use crate::config::{EnforcementPolicy, TrackerConfig};
use crate::models::{format_minutes, ActivityType, HolidayEntry, TimeEntry};
use crate::regulation::RegulationSet;
use crate::store::{codec, keys, KvStore};
use crate::tracker::state::SessionState;

/// Result of a start request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StartOutcome {
    /// The session is running. Under the advisory policy `warning` carries
    /// the limit check when the day was already at its cap.
    Started { warning: Option<LimitCheck> },
    /// Refused under the blocking policy; no state changed.
    Blocked { check: LimitCheck },
}

/// Result of a manual entry submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ManualEntryOutcome {
    Added { entry: TimeEntry },
    /// Nothing was written; the caller should present the reason and, if the
    /// driver confirms, resubmit with `acknowledged = true`.
    LimitExceeded { check: LimitCheck },
}

/// The per-activity totals a dashboard subscribes to, computed in one pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub driving_today: i64,
    pub rest_today: i64,
    pub additional_today: i64,
    pub available_today: i64,
    pub driving_week: i64,
    pub rest_week: i64,
    pub driving_biweek: i64,
    pub extended_driving_days: u32,
    pub extended_availability_days: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceReport {
    pub minutes: i64,
    pub limit: i64,
    pub percentage: f64,
    pub status: ComplianceStatus,
}

pub struct TimeTracker {
    entries: Vec<TimeEntry>,
    holidays: Vec<HolidayEntry>,
    session: SessionState,
    store: Box<dyn KvStore>,
    config: TrackerConfig,
}

impl TimeTracker {
    /// Loads persisted state from `store`. Corrupt records are excluded and
    /// logged rather than failing the load; a persisted "current" entry that
    /// already has an end time is moved into the log instead of resuming.
    pub fn load(store: Box<dyn KvStore>, config: TrackerConfig) -> Result<Self> {
        let mut entries: Vec<TimeEntry> = match store.get(keys::TIME_ENTRIES)? {
            Some(raw) => codec::decode_collection(&raw, "time entry"),
            None => Vec::new(),
        };
        let holidays: Vec<HolidayEntry> = match store.get(keys::HOLIDAY_ENTRIES)? {
            Some(raw) => codec::decode_collection(&raw, "holiday entry"),
            None => Vec::new(),
        };

        let mut session = SessionState::new();
        let current: Option<TimeEntry> = store
            .get(keys::CURRENT_ENTRY)?
            .and_then(|raw| codec::decode_single(&raw, "current entry"));
        if let Some(entry) = current {
            if entry.end_time.is_some() {
                warn!("persisted current entry {} is already closed; moving it to the log", entry.id);
                entries.push(entry);
            } else {
                session.current = Some(entry);
            }
        }

        info!(
            "Loaded {} time entries, {} holiday entries ({} regulation set)",
            entries.len(),
            holidays.len(),
            config.regulation.name
        );

        Ok(Self {
            entries,
            holidays,
            session,
            store,
            config,
        })
    }

    pub fn entries(&self) -> &[TimeEntry] {
        &self.entries
    }

    pub fn holidays(&self) -> &[HolidayEntry] {
        &self.holidays
    }

    pub fn current_entry(&self) -> Option<&TimeEntry> {
        self.session.current.as_ref()
    }

    pub fn current_activity(&self) -> Option<ActivityType> {
        self.session.activity()
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn regulation(&self) -> &RegulationSet {
        &self.config.regulation
    }

    /// Minutes elapsed on the open session, zero when idle. The open session
    /// is not part of the logged totals until it is stopped.
    pub fn session_elapsed_minutes(&self) -> i64 {
        self.session.elapsed_minutes(Utc::now())
    }

    /// Logged minutes of `activity` in the window ending now.
    pub fn activity_minutes_in(&self, activity: ActivityType, range: TimeRange) -> i64 {
        let now = Utc::now();
        activity_minutes(&self.entries, activity, range_start(range, now), now)
    }

    /// Extended days used this week. Defined for driving and availability;
    /// rest and other work have no extended-day rule and report zero.
    pub fn extended_days(&self, activity: ActivityType) -> u32 {
        let now = Utc::now();
        let regulation = &self.config.regulation;
        match activity {
            ActivityType::Driving => count_extended_days(
                &self.entries,
                ActivityType::Driving,
                regulation.driving.daily,
                now,
            ),
            ActivityType::Available => count_extended_days(
                &self.entries,
                ActivityType::Available,
                regulation.available.daily,
                now,
            ),
            ActivityType::Rest | ActivityType::Additional => 0,
        }
    }

    pub fn dashboard(&self) -> DashboardSnapshot {
        let now = Utc::now();
        let day = range_start(TimeRange::Day, now);
        let week = range_start(TimeRange::Week, now);
        let biweek = range_start(TimeRange::Biweek, now);
        let (extended_driving, extended_availability) = self.extended_counts(now);

        DashboardSnapshot {
            driving_today: activity_minutes(&self.entries, ActivityType::Driving, day, now),
            rest_today: activity_minutes(&self.entries, ActivityType::Rest, day, now),
            additional_today: activity_minutes(&self.entries, ActivityType::Additional, day, now),
            available_today: activity_minutes(&self.entries, ActivityType::Available, day, now),
            driving_week: activity_minutes(&self.entries, ActivityType::Driving, week, now),
            rest_week: activity_minutes(&self.entries, ActivityType::Rest, week, now),
            driving_biweek: activity_minutes(&self.entries, ActivityType::Driving, biweek, now),
            extended_driving_days: extended_driving,
            extended_availability_days: extended_availability,
        }
    }

    /// Percentage-of-limit and status for `activity` over `range`.
    pub fn compliance(&self, activity: ActivityType, range: TimeRange) -> ComplianceReport {
        let now = Utc::now();
        let minutes = activity_minutes(&self.entries, activity, range_start(range, now), now);
        let (extended_driving, extended_availability) = self.extended_counts(now);
        let regulation = &self.config.regulation;

        let limit = regulation.limit_for(activity, range, extended_driving, extended_availability);
        let percentage = compliance_percentage(
            minutes,
            activity,
            range,
            regulation,
            extended_driving,
            extended_availability,
        );
        ComplianceReport {
            minutes,
            limit,
            percentage,
            status: ComplianceStatus::from_percentage(percentage),
        }
    }

    /// Advisory notifications for the current day.
    pub fn daily_advisories(&self) -> Vec<Advisory> {
        let now = Utc::now();
        let day = range_start(TimeRange::Day, now);
        let totals = DailyTotals {
            driving: activity_minutes(&self.entries, ActivityType::Driving, day, now),
            rest: activity_minutes(&self.entries, ActivityType::Rest, day, now),
            additional: activity_minutes(&self.entries, ActivityType::Additional, day, now),
            available: activity_minutes(&self.entries, ActivityType::Available, day, now),
        };
        let weekly_driving = activity_minutes(
            &self.entries,
            ActivityType::Driving,
            range_start(TimeRange::Week, now),
            now,
        );
        advisories(&totals, weekly_driving, &self.config.regulation)
    }

    /// Evaluates a hypothetical manual entry without writing anything.
    pub fn evaluate_manual_entry(
        &self,
        activity: ActivityType,
        duration_minutes: i64,
        date: DateTime<Utc>,
    ) -> LimitCheck {
        would_exceed_limit(
            activity,
            duration_minutes,
            date,
            &self.entries,
            &self.config.regulation,
            Utc::now(),
        )
    }

    pub fn holiday_on(&self, date: NaiveDate) -> Option<&HolidayEntry> {
        self.holidays.iter().find(|holiday| holiday.date == date)
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holiday_on(date).is_some()
    }

    /// Starts tracking `activity`, closing any running session first. Under
    /// the blocking policy a driving or availability day already at its
    /// resolved limit refuses to start.
    pub fn start_activity(&mut self, activity: ActivityType) -> Result<StartOutcome> {
        let now = Utc::now();
        let check = self.start_check(activity, now);
        if check.exceeds && self.config.enforcement == EnforcementPolicy::Blocking {
            info!("refused to start {}: {}", activity.as_str(), check.reason);
            return Ok(StartOutcome::Blocked { check });
        }

        if let Some(closed) = self.session.begin(activity, now) {
            info!(
                "closed {} session at {} after {}",
                closed.activity.as_str(),
                now,
                format_minutes(closed.elapsed_minutes(now))
            );
            self.entries.push(closed);
            self.save_entries()?;
        }
        self.save_session()?;
        info!("started {} session", activity.as_str());

        let warning = if check.exceeds { Some(check) } else { None };
        Ok(StartOutcome::Started { warning })
    }

    /// Stops the running session, if any, and logs the closed entry.
    /// Calling it while idle is a no-op.
    pub fn stop_activity(&mut self) -> Result<Option<TimeEntry>> {
        let now = Utc::now();
        let Some(closed) = self.session.stop(now) else {
            return Ok(None);
        };
        info!(
            "stopped {} session after {}",
            closed.activity.as_str(),
            format_minutes(closed.elapsed_minutes(now))
        );
        self.entries.push(closed.clone());
        self.save_entries()?;
        self.save_session()?;
        Ok(Some(closed))
    }

    /// Two-phase manual entry: the limit check runs first, and an exceeding
    /// entry is only written when the caller has acknowledged the warning
    /// (advisory policy) — it is then marked non-compliant. The blocking
    /// policy refuses exceeding entries regardless of acknowledgment.
    pub fn add_manual_entry(
        &mut self,
        activity: ActivityType,
        date: DateTime<Utc>,
        duration_minutes: i64,
        notes: Option<String>,
        acknowledged: bool,
    ) -> Result<ManualEntryOutcome> {
        if duration_minutes <= 0 {
            bail!("manual entry duration must be positive, got {duration_minutes}");
        }

        let check = would_exceed_limit(
            activity,
            duration_minutes,
            date,
            &self.entries,
            &self.config.regulation,
            Utc::now(),
        );
        if check.exceeds {
            let refused = self.config.enforcement == EnforcementPolicy::Blocking || !acknowledged;
            if refused {
                return Ok(ManualEntryOutcome::LimitExceeded { check });
            }
        }

        let mut entry = TimeEntry::manual(activity, date, duration_minutes, notes);
        entry.is_non_compliant = check.exceeds;
        if entry.is_non_compliant {
            warn!(
                "manual {} entry {} force-saved over limit: {}",
                activity.as_str(),
                entry.id,
                check.reason
            );
        }
        self.entries.push(entry.clone());
        self.save_entries()?;
        Ok(ManualEntryOutcome::Added { entry })
    }

    /// Deletes an entry by id. Unknown ids are logged, not errors.
    pub fn delete_entry(&mut self, id: &str) -> Result<()> {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        if self.entries.len() == before {
            warn!("delete requested for unknown entry {id}");
            return Ok(());
        }
        self.save_entries()
    }

    pub fn add_holiday_entry(
        &mut self,
        date: NaiveDate,
        description: String,
        is_sixth_day: bool,
    ) -> Result<HolidayEntry> {
        let holiday = HolidayEntry::new(date, description, is_sixth_day);
        self.holidays.push(holiday.clone());
        self.save_holidays()?;
        Ok(holiday)
    }

    pub fn remove_holiday_entry(&mut self, id: &str) -> Result<()> {
        let before = self.holidays.len();
        self.holidays.retain(|holiday| holiday.id != id);
        if self.holidays.len() == before {
            warn!("delete requested for unknown holiday {id}");
            return Ok(());
        }
        self.save_holidays()
    }

    /// Clears the time log and any open session. Holiday records are kept.
    pub fn reset_all(&mut self) -> Result<()> {
        self.session = SessionState::new();
        self.entries.clear();
        self.save_entries()?;
        self.save_session()?;
        info!("time log reset");
        Ok(())
    }

    fn extended_counts(&self, now: DateTime<Utc>) -> (u32, u32) {
        let regulation = &self.config.regulation;
        (
            count_extended_days(
                &self.entries,
                ActivityType::Driving,
                regulation.driving.daily,
                now,
            ),
            count_extended_days(
                &self.entries,
                ActivityType::Available,
                regulation.available.daily,
                now,
            ),
        )
    }

    /// Whether a new `activity` session may start: driving and availability
    /// refuse (or warn) once today's logged total has reached the resolved
    /// daily limit; rest and other work always start clean.
    fn start_check(&self, activity: ActivityType, now: DateTime<Utc>) -> LimitCheck {
        match activity {
            ActivityType::Driving | ActivityType::Available => {
                let today =
                    activity_minutes(&self.entries, activity, range_start(TimeRange::Day, now), now);
                let (extended_driving, extended_availability) = self.extended_counts(now);
                let limit = self.config.regulation.limit_for(
                    activity,
                    TimeRange::Day,
                    extended_driving,
                    extended_availability,
                );
                if today >= limit {
                    LimitCheck::exceeded(format!(
                        "daily {} limit of {} already reached ({} logged today)",
                        activity.label(),
                        format_minutes(limit),
                        format_minutes(today)
                    ))
                } else {
                    LimitCheck::ok()
                }
            }
            ActivityType::Rest | ActivityType::Additional => LimitCheck::ok(),
        }
    }

    fn save_entries(&mut self) -> Result<()> {
        let payload = codec::encode(&self.entries)?;
        self.store
            .set(keys::TIME_ENTRIES, &payload)
            .context("failed to persist time entries")?;
        debug!("persisted {} time entries", self.entries.len());
        Ok(())
    }

    fn save_holidays(&mut self) -> Result<()> {
        let payload = codec::encode(&self.holidays)?;
        self.store
            .set(keys::HOLIDAY_ENTRIES, &payload)
            .context("failed to persist holiday entries")
    }

    fn save_session(&mut self) -> Result<()> {
        match &self.session.current {
            Some(entry) => {
                let payload = codec::encode(entry)?;
                self.store.set(keys::CURRENT_ENTRY, &payload)?;
                self.store
                    .set(keys::CURRENT_ACTIVITY, entry.activity.as_str())?;
            }
            None => {
                self.store.remove(keys::CURRENT_ENTRY)?;
                self.store.remove(keys::CURRENT_ACTIVITY)?;
            }
        }
        Ok(())
    }
}
