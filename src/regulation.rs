//! Regulation limit tables.
//!
//! A `RegulationSet` is a versioned, immutable table of minute thresholds.
//! It is injected configuration: aggregation and evaluation code receive the
//! active set as a parameter and never reach for a global. Swapping variants
//! (or loading a custom table from config) touches no calculation code.

use serde::{Deserialize, Serialize};

use crate::compliance::TimeRange;
use crate::models::ActivityType;

/// Placeholder daily limit for other work, used because none of the shipped
/// tables define a per-day figure for it: 8 hours.
pub const ADDITIONAL_DAILY_FALLBACK: i64 = 480;

/// Driving thresholds, in minutes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrivingLimits {
    /// Standard daily limit, applied once the extended-day quota is used up.
    pub daily: i64,
    /// Daily limit while extended days remain available this week.
    pub extended_daily: i64,
    pub weekly: i64,
    pub biweekly: i64,
    /// Continuous driving allowed before a break is due.
    pub continuous: i64,
    /// How many days per week may exceed the standard daily limit.
    pub extended_days_per_week: u32,
}

/// Rest requirements, in minutes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestLimits {
    pub daily: i64,
    pub reduced_daily: i64,
    pub weekly: i64,
    pub reduced_weekly: i64,
    /// Break owed after the continuous-driving threshold.
    pub full_break: i64,
    /// First part when the break is split in two.
    pub split_break_first: i64,
    pub split_break_second: i64,
}

/// Availability (on-call presence) thresholds, in minutes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableLimits {
    /// Standard daily limit, applied once the extended-day quota is used up.
    pub daily: i64,
    /// Daily limit while extended days remain available this week.
    pub extended_daily: i64,
    pub weekly: i64,
    /// How many days per week may exceed the standard daily limit.
    pub extended_days_per_week: u32,
}

/// Other-work thresholds, in minutes. No table defines a daily figure;
/// see [`ADDITIONAL_DAILY_FALLBACK`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalLimits {
    pub weekly: i64,
    pub biweekly: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegulationSet {
    /// Human-readable version tag of this variant.
    pub name: String,
    pub driving: DrivingLimits,
    pub rest: RestLimits,
    pub available: AvailableLimits,
    pub additional: AdditionalLimits,
}

impl RegulationSet {
    /// The original Spain table (RD 1561/1995 era figures).
    pub fn spain() -> Self {
        Self {
            name: "Spain RD 1561/1995".into(),
            driving: DrivingLimits {
                daily: 540,
                extended_daily: 600,
                weekly: 3360,
                biweekly: 5400,
                continuous: 270,
                extended_days_per_week: 2,
            },
            rest: RestLimits {
                daily: 660,
                reduced_daily: 540,
                weekly: 2700,
                reduced_weekly: 1440,
                full_break: 45,
                split_break_first: 15,
                split_break_second: 30,
            },
            available: AvailableLimits {
                daily: 240,
                extended_daily: 360,
                weekly: 1200,
                extended_days_per_week: 3,
            },
            additional: AdditionalLimits {
                weekly: 1080,
                biweekly: 2160,
            },
        }
    }

    /// The revised EU 2024 table.
    pub fn eu_2024() -> Self {
        Self {
            name: "EU 2024".into(),
            driving: DrivingLimits {
                daily: 480,
                extended_daily: 540,
                weekly: 2880,
                biweekly: 5400,
                continuous: 240,
                extended_days_per_week: 2,
            },
            rest: RestLimits {
                daily: 660,
                reduced_daily: 540,
                weekly: 2880,
                reduced_weekly: 1440,
                full_break: 45,
                split_break_first: 15,
                split_break_second: 30,
            },
            available: AvailableLimits {
                daily: 240,
                extended_daily: 300,
                weekly: 1200,
                extended_days_per_week: 3,
            },
            additional: AdditionalLimits {
                weekly: 960,
                biweekly: 1920,
            },
        }
    }

    /// Draft revision of the EU 2024 table with tighter figures throughout.
    pub fn eu_2024_draft() -> Self {
        Self {
            name: "EU 2024 draft".into(),
            driving: DrivingLimits {
                daily: 450,
                extended_daily: 480,
                weekly: 2700,
                biweekly: 5100,
                continuous: 210,
                extended_days_per_week: 1,
            },
            rest: RestLimits {
                daily: 720,
                reduced_daily: 600,
                weekly: 3000,
                reduced_weekly: 1800,
                full_break: 45,
                split_break_first: 15,
                split_break_second: 30,
            },
            available: AvailableLimits {
                daily: 180,
                extended_daily: 240,
                weekly: 900,
                extended_days_per_week: 2,
            },
            additional: AdditionalLimits {
                weekly: 900,
                biweekly: 1800,
            },
        }
    }

    /// Resolves the limit for an activity over a range.
    ///
    /// Driving and availability use their extended daily threshold while the
    /// week's extended-day quota is not yet used up, and fall back to the
    /// standard one at or past the quota. Rest has no biweekly figure and
    /// doubles its weekly one; other work has no daily figure and uses
    /// [`ADDITIONAL_DAILY_FALLBACK`].
    pub fn limit_for(
        &self,
        activity: ActivityType,
        range: TimeRange,
        extended_driving_days: u32,
        extended_availability_days: u32,
    ) -> i64 {
        match (activity, range) {
            (ActivityType::Driving, TimeRange::Day) => {
                if extended_driving_days >= self.driving.extended_days_per_week {
                    self.driving.daily
                } else {
                    self.driving.extended_daily
                }
            }
            (ActivityType::Driving, TimeRange::Week) => self.driving.weekly,
            (ActivityType::Driving, TimeRange::Biweek) => self.driving.biweekly,
            (ActivityType::Rest, TimeRange::Day) => self.rest.daily,
            (ActivityType::Rest, TimeRange::Week) => self.rest.weekly,
            (ActivityType::Rest, TimeRange::Biweek) => self.rest.weekly * 2,
            (ActivityType::Additional, TimeRange::Day) => ADDITIONAL_DAILY_FALLBACK,
            (ActivityType::Additional, TimeRange::Week) => self.additional.weekly,
            (ActivityType::Additional, TimeRange::Biweek) => self.additional.biweekly,
            (ActivityType::Available, TimeRange::Day) => {
                if extended_availability_days >= self.available.extended_days_per_week {
                    self.available.daily
                } else {
                    self.available.extended_daily
                }
            }
            (ActivityType::Available, TimeRange::Week) => self.available.weekly,
            (ActivityType::Available, TimeRange::Biweek) => self.available.weekly,
        }
    }
}

impl Default for RegulationSet {
    fn default() -> Self {
        Self::eu_2024()
    }
}
