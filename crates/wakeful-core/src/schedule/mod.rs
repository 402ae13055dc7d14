//! Weekly schedule model and time-window evaluation.
//!
//! A [`WeeklyConfig`] holds one [`DaySchedule`] per weekday plus a shared
//! [`GlobalSchedule`] that days can defer to. Each schedule carries an
//! ordered list of [`Period`]s; a period may span midnight, in which case
//! membership wraps around.
//!
//! Note one deliberate quirk: an enabled day whose periods are all disabled
//! participates in scheduling but never matches a window, so the engine
//! suppresses activity for that whole day. That is a valid configuration
//! ("keep this day on the schedule, but currently with no active hours"),
//! not a bug.

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// One contiguous daily time window, inclusive at both ends.
///
/// Field names match the persisted JSON shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub start_hour: u8,
    pub start_minute: u8,
    pub end_hour: u8,
    pub end_minute: u8,
}

fn default_true() -> bool {
    true
}

impl Period {
    /// Create an enabled period, validating both endpoints.
    pub fn new(
        start_hour: u8,
        start_minute: u8,
        end_hour: u8,
        end_minute: u8,
    ) -> Result<Self, ValidationError> {
        for (hour, minute) in [(start_hour, start_minute), (end_hour, end_minute)] {
            if hour > 23 || minute > 59 {
                return Err(ValidationError::InvalidTime { hour, minute });
            }
        }
        Ok(Self {
            enabled: true,
            start_hour,
            start_minute,
            end_hour,
            end_minute,
        })
    }

    pub fn start(&self) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(self.start_hour as u32, self.start_minute as u32, 0)
    }

    pub fn end(&self) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(self.end_hour as u32, self.end_minute as u32, 0)
    }

    /// Whether `instant` falls inside this window.
    ///
    /// Inclusive at both ends. When `start > end` the window spans midnight
    /// and membership wraps: `instant >= start || instant <= end`.
    ///
    /// The date component of the caller's clock is discarded before calling;
    /// only the time of day matters. Periods with out-of-range endpoints
    /// (possible via a hand-edited config file) never match.
    pub fn contains(&self, instant: NaiveTime) -> bool {
        let (Some(start), Some(end)) = (self.start(), self.end()) else {
            return false;
        };
        if start <= end {
            start <= instant && instant <= end
        } else {
            instant >= start || instant <= end
        }
    }
}

/// Per-day configuration.
///
/// `enabled` gates whether the day participates in scheduling at all.
/// When `use_global` is set the day's own `periods` are ignored in favor of
/// the global schedule, but `enabled` still applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    pub enabled: bool,
    pub use_global: bool,
    pub periods: Vec<Period>,
}

impl DaySchedule {
    fn with_enabled(enabled: bool) -> Self {
        Self {
            enabled,
            use_global: true,
            periods: vec![default_period()],
        }
    }

    /// Replace this day's periods. At least one period must remain.
    pub fn set_periods(&mut self, periods: Vec<Period>) -> Result<(), ValidationError> {
        if periods.is_empty() {
            return Err(ValidationError::EmptyPeriods);
        }
        self.periods = periods;
        Ok(())
    }

    fn enabled_periods(&self) -> Vec<Period> {
        self.periods.iter().filter(|p| p.enabled).copied().collect()
    }
}

/// Shared fallback schedule applied to any day with `use_global = true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalSchedule {
    pub enabled: bool,
    pub periods: Vec<Period>,
}

impl GlobalSchedule {
    /// Replace the global periods. At least one period must remain.
    pub fn set_periods(&mut self, periods: Vec<Period>) -> Result<(), ValidationError> {
        if periods.is_empty() {
            return Err(ValidationError::EmptyPeriods);
        }
        self.periods = periods;
        Ok(())
    }

    fn enabled_periods(&self) -> Vec<Period> {
        self.periods.iter().filter(|p| p.enabled).copied().collect()
    }
}

impl Default for GlobalSchedule {
    fn default() -> Self {
        Self {
            enabled: true,
            periods: vec![default_period()],
        }
    }
}

/// 09:00-17:00, the default working window.
fn default_period() -> Period {
    Period {
        enabled: true,
        start_hour: 9,
        start_minute: 0,
        end_hour: 17,
        end_minute: 0,
    }
}

fn default_weekday() -> DaySchedule {
    DaySchedule::with_enabled(true)
}

fn default_weekend() -> DaySchedule {
    DaySchedule::with_enabled(false)
}

/// The full weekly configuration: seven named days plus the global schedule.
///
/// Serializes to the persisted `weekly_schedules` JSON object, with
/// capitalized day names and a `global` key, byte-compatible with existing
/// config files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyConfig {
    #[serde(rename = "Monday", default = "default_weekday")]
    pub monday: DaySchedule,
    #[serde(rename = "Tuesday", default = "default_weekday")]
    pub tuesday: DaySchedule,
    #[serde(rename = "Wednesday", default = "default_weekday")]
    pub wednesday: DaySchedule,
    #[serde(rename = "Thursday", default = "default_weekday")]
    pub thursday: DaySchedule,
    #[serde(rename = "Friday", default = "default_weekday")]
    pub friday: DaySchedule,
    #[serde(rename = "Saturday", default = "default_weekend")]
    pub saturday: DaySchedule,
    #[serde(rename = "Sunday", default = "default_weekend")]
    pub sunday: DaySchedule,
    #[serde(rename = "global", default)]
    pub global: GlobalSchedule,
}

impl Default for WeeklyConfig {
    /// Weekdays enabled and deferring to the global schedule, weekends
    /// disabled, global enabled 09:00-17:00.
    fn default() -> Self {
        Self {
            monday: default_weekday(),
            tuesday: default_weekday(),
            wednesday: default_weekday(),
            thursday: default_weekday(),
            friday: default_weekday(),
            saturday: default_weekend(),
            sunday: default_weekend(),
            global: GlobalSchedule::default(),
        }
    }
}

impl WeeklyConfig {
    pub fn day(&self, weekday: Weekday) -> &DaySchedule {
        match weekday {
            Weekday::Mon => &self.monday,
            Weekday::Tue => &self.tuesday,
            Weekday::Wed => &self.wednesday,
            Weekday::Thu => &self.thursday,
            Weekday::Fri => &self.friday,
            Weekday::Sat => &self.saturday,
            Weekday::Sun => &self.sunday,
        }
    }

    pub fn day_mut(&mut self, weekday: Weekday) -> &mut DaySchedule {
        match weekday {
            Weekday::Mon => &mut self.monday,
            Weekday::Tue => &mut self.tuesday,
            Weekday::Wed => &mut self.wednesday,
            Weekday::Thu => &mut self.thursday,
            Weekday::Fri => &mut self.friday,
            Weekday::Sat => &mut self.saturday,
            Weekday::Sun => &mut self.sunday,
        }
    }

    /// Build a config that applies one window to every day and to global.
    ///
    /// Used by the legacy-config migration, which has only a single
    /// schedule to work from.
    pub fn uniform(period: Period) -> Self {
        let mut config = Self::default();
        for weekday in ALL_WEEKDAYS {
            config.day_mut(weekday).periods = vec![period];
        }
        config.global.periods = vec![period];
        config
    }

    /// Resolve which periods apply to `weekday`, filtered to enabled ones.
    ///
    /// Returns `None` when the day does not participate in scheduling
    /// (its `enabled` flag is off). Returns `Some(empty)` when the day
    /// participates but currently resolves to zero active windows -- either
    /// it defers to a disabled global schedule, or all resolved periods are
    /// individually disabled. The engine suppresses for the whole day in
    /// that case.
    pub fn resolve_active_periods(&self, weekday: Weekday) -> Option<Vec<Period>> {
        let day = self.day(weekday);
        if !day.enabled {
            return None;
        }
        if day.use_global {
            if !self.global.enabled {
                return Some(Vec::new());
            }
            return Some(self.global.enabled_periods());
        }
        Some(day.enabled_periods())
    }
}

/// All seven weekdays in calendar order.
pub const ALL_WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];
