//! Advisory notifications derived from daily totals.
//!
//! These mirror what a dashboard surfaces proactively: a break coming due,
//! totals approaching their caps, a day that is all work and no rest. None
//! of them block anything; hosts decide how (or whether) to present them.

use serde::Serialize;

use crate::regulation::RegulationSet;

/// Fraction of the daily limit at which an approach warning triggers.
pub const DAILY_WARN_RATIO: f64 = 0.8;
/// Fraction of the weekly limit at which an approach warning triggers.
pub const WEEKLY_WARN_RATIO: f64 = 0.9;
/// Active minutes in a day past which accumulated rest is audited.
pub const REST_AUDIT_ACTIVE_MINUTES: i64 = 720;
/// Minimum accumulated rest expected once the audit threshold is passed.
pub const REST_AUDIT_MINIMUM_MINUTES: i64 = 480;

/// Which rest requirement a remaining-rest query is against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestKind {
    Break,
    Daily,
    Weekly,
}

/// Minutes of rest still owed against the requirement, floored at zero.
pub fn remaining_rest(kind: RestKind, rest_minutes: i64, regulation: &RegulationSet) -> i64 {
    let required = match kind {
        RestKind::Break => regulation.rest.full_break,
        RestKind::Daily => regulation.rest.daily,
        RestKind::Weekly => regulation.rest.weekly,
    };
    (required - rest_minutes).max(0)
}

/// True when driving has reached the continuous-driving threshold without a
/// full break's worth of rest accumulated.
pub fn break_due(driving_minutes: i64, rest_minutes: i64, regulation: &RegulationSet) -> bool {
    driving_minutes >= regulation.driving.continuous && rest_minutes < regulation.rest.full_break
}

/// Today's per-activity minute totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyTotals {
    pub driving: i64,
    pub rest: i64,
    pub additional: i64,
    pub available: i64,
}

impl DailyTotals {
    /// Driving plus other work plus availability; everything but rest.
    pub fn active(&self) -> i64 {
        self.driving + self.additional + self.available
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Advisory {
    /// Continuous-driving threshold reached without a full break.
    BreakDue { rest_needed: i64 },
    /// Daily driving at or past [`DAILY_WARN_RATIO`] of its limit.
    DailyDrivingNear { minutes: i64, limit: i64 },
    /// Weekly driving at or past [`WEEKLY_WARN_RATIO`] of its limit.
    WeeklyDrivingNear { minutes: i64, limit: i64 },
    /// Daily availability at or past [`DAILY_WARN_RATIO`] of its limit.
    AvailabilityNear { minutes: i64, limit: i64 },
    /// A long active day with too little accumulated rest.
    InsufficientRest { active_minutes: i64, rest_minutes: i64 },
}

/// Advisories for the current day, in presentation order.
///
/// The approach checks compare against the standard daily limits, not the
/// extended ones: an approach warning that silently widened on extended
/// days would defeat its purpose.
pub fn advisories(
    totals: &DailyTotals,
    weekly_driving: i64,
    regulation: &RegulationSet,
) -> Vec<Advisory> {
    let mut out = Vec::new();

    if break_due(totals.driving, totals.rest, regulation) {
        out.push(Advisory::BreakDue {
            rest_needed: remaining_rest(RestKind::Break, totals.rest, regulation),
        });
    }

    let daily_limit = regulation.driving.daily;
    if totals.driving as f64 >= daily_limit as f64 * DAILY_WARN_RATIO {
        out.push(Advisory::DailyDrivingNear {
            minutes: totals.driving,
            limit: daily_limit,
        });
    }

    let weekly_limit = regulation.driving.weekly;
    if weekly_driving as f64 >= weekly_limit as f64 * WEEKLY_WARN_RATIO {
        out.push(Advisory::WeeklyDrivingNear {
            minutes: weekly_driving,
            limit: weekly_limit,
        });
    }

    let available_limit = regulation.available.daily;
    if totals.available as f64 >= available_limit as f64 * DAILY_WARN_RATIO {
        out.push(Advisory::AvailabilityNear {
            minutes: totals.available,
            limit: available_limit,
        });
    }

    if totals.active() > REST_AUDIT_ACTIVE_MINUTES && totals.rest < REST_AUDIT_MINIMUM_MINUTES {
        out.push(Advisory::InsufficientRest {
            active_minutes: totals.active(),
            rest_minutes: totals.rest,
        });
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_rest_floors_at_zero() {
        let set = RegulationSet::spain();
        assert_eq!(remaining_rest(RestKind::Break, 0, &set), 45);
        assert_eq!(remaining_rest(RestKind::Break, 30, &set), 15);
        assert_eq!(remaining_rest(RestKind::Break, 60, &set), 0);
        assert_eq!(remaining_rest(RestKind::Daily, 600, &set), 60);
        assert_eq!(remaining_rest(RestKind::Weekly, 2700, &set), 0);
    }

    #[test]
    fn break_is_due_after_continuous_driving_without_rest() {
        let set = RegulationSet::spain();
        assert!(!break_due(269, 0, &set));
        assert!(break_due(270, 0, &set));
        assert!(break_due(270, 44, &set));
        assert!(!break_due(270, 45, &set));
    }

    #[test]
    fn quiet_day_produces_no_advisories() {
        let totals = DailyTotals {
            driving: 60,
            rest: 60,
            additional: 30,
            available: 30,
        };
        assert!(advisories(&totals, 60, &RegulationSet::spain()).is_empty());
    }

    #[test]
    fn each_condition_triggers_its_advisory() {
        let set = RegulationSet::spain();

        // 80% of the 540 standard daily driving limit.
        let totals = DailyTotals {
            driving: 432,
            rest: 60,
            additional: 0,
            available: 0,
        };
        let found = advisories(&totals, 432, &set);
        assert_eq!(
            found,
            vec![Advisory::DailyDrivingNear {
                minutes: 432,
                limit: 540
            }]
        );

        // 90% of the 3360 weekly limit.
        let totals = DailyTotals {
            rest: 60,
            ..DailyTotals::default()
        };
        let found = advisories(&totals, 3024, &set);
        assert_eq!(
            found,
            vec![Advisory::WeeklyDrivingNear {
                minutes: 3024,
                limit: 3360
            }]
        );

        // 80% of the 240 availability limit.
        let totals = DailyTotals {
            available: 192,
            rest: 60,
            ..DailyTotals::default()
        };
        let found = advisories(&totals, 0, &set);
        assert_eq!(
            found,
            vec![Advisory::AvailabilityNear {
                minutes: 192,
                limit: 240
            }]
        );
    }

    #[test]
    fn long_day_without_rest_is_flagged() {
        let set = RegulationSet::spain();
        let totals = DailyTotals {
            driving: 400,
            rest: 100,
            additional: 200,
            available: 200,
        };
        let found = advisories(&totals, 400, &set);
        assert!(found.contains(&Advisory::InsufficientRest {
            active_minutes: 800,
            rest_minutes: 100
        }));
    }

    #[test]
    fn break_advisory_reports_rest_still_owed() {
        let set = RegulationSet::spain();
        let totals = DailyTotals {
            driving: 270,
            rest: 20,
            additional: 0,
            available: 0,
        };
        let found = advisories(&totals, 270, &set);
        assert!(found.contains(&Advisory::BreakDue { rest_needed: 25 }));
    }
}
