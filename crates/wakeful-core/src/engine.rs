//! Suppression decision engine.
//!
//! Combines schedule evaluation and the excluded-app check into a single
//! "should activity be withheld right now" answer. The engine is pure
//! apart from the process query; it holds no state and is invoked once per
//! worker tick.

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::exclusions::ExclusionList;
use crate::schedule::WeeklyConfig;

/// Process-wide runtime toggles plus the last emission timestamp.
///
/// A single instance lives inside the worker; the feature toggles are
/// replaced from the presentation surface, `last_action_time` is written
/// only on successful emission and is never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeState {
    pub master_enabled: bool,
    pub schedule_enabled: bool,
    pub app_monitoring_enabled: bool,
    pub last_action_time: NaiveDateTime,
}

/// Why activity is currently being withheld.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum SuppressionReason {
    /// Scheduling is on and the current instant is not inside any active
    /// window (including days that do not participate at all).
    OutsideSchedule,
    /// An excluded application is currently running.
    ExcludedAppRunning { name: String },
}

/// Query for the set of currently running process names.
///
/// Implementations must swallow enumeration failures and return an empty
/// set; a failed query must never suppress nor propagate.
pub trait ProcessQuery {
    fn running_process_names(&mut self) -> HashSet<String>;
}

/// Decide whether synthetic activity should be withheld at `now`.
///
/// Two independent suppression sources, short-circuit OR:
/// 1. Schedule (only when `schedule_enabled`): suppression is the default;
///    only a matching active window lifts it.
/// 2. App presence (only when `app_monitoring_enabled` and the exclusion
///    list is non-empty): any excluded process running forces suppression.
///
/// Returns the first applicable reason, or `None` when activity may flow.
/// If neither feature is enabled, never suppresses.
pub fn evaluate(
    state: &RuntimeState,
    weekly: &WeeklyConfig,
    exclusions: &ExclusionList,
    now: NaiveDateTime,
    processes: &mut dyn ProcessQuery,
) -> Option<SuppressionReason> {
    if state.schedule_enabled && !inside_active_window(weekly, now) {
        return Some(SuppressionReason::OutsideSchedule);
    }

    if state.app_monitoring_enabled && !exclusions.is_empty() {
        let running = processes.running_process_names();
        if let Some(name) = exclusions.iter().find(|name| running.contains(*name)) {
            return Some(SuppressionReason::ExcludedAppRunning {
                name: name.to_string(),
            });
        }
    }

    None
}

/// Boolean form of [`evaluate`].
pub fn should_suppress(
    state: &RuntimeState,
    weekly: &WeeklyConfig,
    exclusions: &ExclusionList,
    now: NaiveDateTime,
    processes: &mut dyn ProcessQuery,
) -> bool {
    evaluate(state, weekly, exclusions, now, processes).is_some()
}

fn inside_active_window(weekly: &WeeklyConfig, now: NaiveDateTime) -> bool {
    let Some(periods) = weekly.resolve_active_periods(now.weekday()) else {
        // Day does not participate.
        return false;
    };
    periods.iter().any(|p| p.contains(now.time()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Weekday};

    struct FakeProcesses {
        names: HashSet<String>,
    }

    impl FakeProcesses {
        fn none() -> Self {
            Self {
                names: HashSet::new(),
            }
        }

        fn with(names: &[&str]) -> Self {
            Self {
                names: names.iter().map(|n| n.to_string()).collect(),
            }
        }
    }

    impl ProcessQuery for FakeProcesses {
        fn running_process_names(&mut self) -> HashSet<String> {
            self.names.clone()
        }
    }

    /// 2025-01-06 is a Monday.
    fn monday_at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 6)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    /// 2025-01-11 is a Saturday.
    fn saturday_at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 11)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn state(schedule: bool, apps: bool) -> RuntimeState {
        RuntimeState {
            master_enabled: true,
            schedule_enabled: schedule,
            app_monitoring_enabled: apps,
            last_action_time: monday_at(0, 0),
        }
    }

    #[test]
    fn inside_window_is_not_suppressed() {
        let weekly = WeeklyConfig::default();
        let reason = evaluate(
            &state(true, false),
            &weekly,
            &ExclusionList::new(),
            monday_at(10, 0),
            &mut FakeProcesses::none(),
        );
        assert_eq!(reason, None);
    }

    #[test]
    fn outside_window_is_suppressed() {
        let weekly = WeeklyConfig::default();
        let reason = evaluate(
            &state(true, false),
            &weekly,
            &ExclusionList::new(),
            monday_at(20, 0),
            &mut FakeProcesses::none(),
        );
        assert_eq!(reason, Some(SuppressionReason::OutsideSchedule));
    }

    #[test]
    fn non_participating_day_is_suppressed() {
        let weekly = WeeklyConfig::default();
        let reason = evaluate(
            &state(true, false),
            &weekly,
            &ExclusionList::new(),
            saturday_at(10, 0),
            &mut FakeProcesses::none(),
        );
        assert_eq!(reason, Some(SuppressionReason::OutsideSchedule));
    }

    #[test]
    fn day_deferring_to_disabled_global_is_suppressed_all_day() {
        let mut weekly = WeeklyConfig::default();
        weekly.global.enabled = false;
        assert!(should_suppress(
            &state(true, false),
            &weekly,
            &ExclusionList::new(),
            monday_at(10, 0),
            &mut FakeProcesses::none(),
        ));
    }

    #[test]
    fn enabled_day_with_disabled_periods_is_suppressed_all_day() {
        let mut weekly = WeeklyConfig::default();
        let day = weekly.day_mut(Weekday::Mon);
        day.use_global = false;
        for p in &mut day.periods {
            p.enabled = false;
        }
        assert!(should_suppress(
            &state(true, false),
            &weekly,
            &ExclusionList::new(),
            monday_at(10, 0),
            &mut FakeProcesses::none(),
        ));
    }

    #[test]
    fn running_excluded_app_suppresses_even_inside_window() {
        let weekly = WeeklyConfig::default();
        let mut exclusions = ExclusionList::new();
        exclusions.add("vlc.exe").unwrap();
        let reason = evaluate(
            &state(true, true),
            &weekly,
            &exclusions,
            monday_at(10, 0),
            &mut FakeProcesses::with(&["explorer.exe", "vlc.exe"]),
        );
        assert_eq!(
            reason,
            Some(SuppressionReason::ExcludedAppRunning {
                name: "vlc.exe".to_string()
            })
        );
    }

    #[test]
    fn app_monitoring_ignored_when_list_empty() {
        let weekly = WeeklyConfig::default();
        let reason = evaluate(
            &state(true, true),
            &weekly,
            &ExclusionList::new(),
            monday_at(10, 0),
            &mut FakeProcesses::with(&["vlc.exe"]),
        );
        assert_eq!(reason, None);
    }

    #[test]
    fn failed_enumeration_reads_as_no_match() {
        // A query that errors internally surfaces as an empty set.
        let weekly = WeeklyConfig::default();
        let mut exclusions = ExclusionList::new();
        exclusions.add("vlc.exe").unwrap();
        let reason = evaluate(
            &state(true, true),
            &weekly,
            &exclusions,
            monday_at(10, 0),
            &mut FakeProcesses::none(),
        );
        assert_eq!(reason, None);
    }

    #[test]
    fn neither_feature_enabled_never_suppresses() {
        let mut weekly = WeeklyConfig::default();
        weekly.global.enabled = false;
        let mut exclusions = ExclusionList::new();
        exclusions.add("vlc.exe").unwrap();
        assert!(!should_suppress(
            &state(false, false),
            &weekly,
            &exclusions,
            monday_at(3, 0),
            &mut FakeProcesses::with(&["vlc.exe"]),
        ));
    }

    #[test]
    fn schedule_disabled_skips_schedule_source() {
        let weekly = WeeklyConfig::default();
        // Saturday outside any window, but scheduling is off.
        assert!(!should_suppress(
            &state(false, false),
            &weekly,
            &ExclusionList::new(),
            saturday_at(3, 0),
            &mut FakeProcesses::none(),
        ));
    }
}
