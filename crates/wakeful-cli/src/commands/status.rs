use chrono::Local;
use serde::Serialize;
use wakeful_core::platform::SystemProcessQuery;
use wakeful_core::{engine, AppConfig, RuntimeState, SuppressionReason};

#[derive(Serialize)]
struct Status {
    active: bool,
    schedule_enabled: bool,
    app_monitoring_enabled: bool,
    suppressed: bool,
    reason: Option<SuppressionReason>,
}

/// Evaluate the suppression engine against the live system and print the
/// verdict.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load_or_default().engine_config();
    let now = Local::now().naive_local();
    let state = RuntimeState {
        master_enabled: config.master_enabled,
        schedule_enabled: config.schedule_enabled,
        app_monitoring_enabled: config.app_monitoring_enabled,
        last_action_time: now,
    };
    let mut processes = SystemProcessQuery::new();
    let reason = engine::evaluate(
        &state,
        &config.weekly,
        &config.exclusions,
        now,
        &mut processes,
    );

    let status = Status {
        active: config.master_enabled,
        schedule_enabled: config.schedule_enabled,
        app_monitoring_enabled: config.app_monitoring_enabled,
        suppressed: reason.is_some(),
        reason,
    };
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}
