//! Legacy config-shape upgrades.
//!
//! Two older on-disk shapes exist in the wild. Each gets one explicit
//! upgrade step, detected by a sentinel key and applied to the raw JSON
//! value before deserialization:
//!
//! 1. A flat single-window shape, `schedule.{start_hour, start_minute,
//!    end_hour, end_minute}`: expanded into a full `weekly_schedules`
//!    object applying that window to every day and to global.
//! 2. A wrapper shape, `weekly_schedule.{enabled, schedules}`: the
//!    schedules move to `weekly_schedules` and the enable flag to
//!    `schedule.enabled`.
//!
//! Steps run oldest-first so a step may feed the next one. Missing
//! sections after upgrading are left to serde defaults.

use serde_json::{json, Value};

use crate::schedule::{Period, WeeklyConfig};

/// Apply all applicable upgrade steps to a raw config document.
pub fn upgrade(mut value: Value) -> Value {
    if has_flat_schedule(&value) {
        upgrade_flat_schedule(&mut value);
    }
    if has_weekly_wrapper(&value) {
        upgrade_weekly_wrapper(&mut value);
    }
    value
}

/// Sentinel: the very old flat shape kept window fields directly under
/// `schedule`.
fn has_flat_schedule(value: &Value) -> bool {
    value
        .get("schedule")
        .map(|s| s.get("start_hour").is_some())
        .unwrap_or(false)
}

/// Sentinel: the intermediate shape nested day schedules under
/// `weekly_schedule.schedules`.
fn has_weekly_wrapper(value: &Value) -> bool {
    value
        .get("weekly_schedule")
        .map(|w| w.get("schedules").is_some())
        .unwrap_or(false)
}

fn upgrade_flat_schedule(value: &mut Value) {
    let Some(schedule) = value.get("schedule") else {
        return;
    };
    let window = Period::new(
        field_u8(schedule, "start_hour", 9),
        field_u8(schedule, "start_minute", 0),
        field_u8(schedule, "end_hour", 17),
        field_u8(schedule, "end_minute", 0),
    )
    // Hand-edited garbage in the legacy file: keep the default window.
    .unwrap_or(Period {
        enabled: true,
        start_hour: 9,
        start_minute: 0,
        end_hour: 17,
        end_minute: 0,
    });
    let enabled = schedule
        .get("enabled")
        .and_then(Value::as_bool)
        .unwrap_or(true);

    if let Ok(weekly) = serde_json::to_value(WeeklyConfig::uniform(window)) {
        if let Some(obj) = value.as_object_mut() {
            obj.insert("weekly_schedules".to_string(), weekly);
            obj.insert("schedule".to_string(), json!({ "enabled": enabled }));
        }
    }
}

fn upgrade_weekly_wrapper(value: &mut Value) {
    let Some(obj) = value.as_object_mut() else {
        return;
    };
    let Some(wrapper) = obj.remove("weekly_schedule") else {
        return;
    };
    if let Some(schedules) = wrapper.get("schedules") {
        obj.insert("weekly_schedules".to_string(), schedules.clone());
    }
    let enabled = wrapper
        .get("enabled")
        .and_then(Value::as_bool)
        .unwrap_or(true);
    obj.insert("schedule".to_string(), json!({ "enabled": enabled }));
}

fn field_u8(value: &Value, key: &str, fallback: u8) -> u8 {
    value
        .get(key)
        .and_then(Value::as_u64)
        .and_then(|n| u8::try_from(n).ok())
        .unwrap_or(fallback)
}
