use std::sync::mpsc;

use tracing::info;
use wakeful_core::platform::{InputEmitter, SystemProcessQuery};
use wakeful_core::{AppConfig, Worker};

/// Run the activity worker in the foreground, printing events as JSON
/// lines until the process is terminated.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load_or_default();
    let engine_config = config.engine_config();
    if !engine_config.master_enabled {
        info!("master switch is off; the worker will idle until config changes");
    }

    let emitter = InputEmitter::new()?;
    let processes = SystemProcessQuery::new();
    let (events_tx, events_rx) = mpsc::channel();

    let _worker = Worker::spawn(
        engine_config,
        Box::new(emitter),
        Box::new(processes),
        events_tx,
    );

    for event in events_rx {
        println!("{}", serde_json::to_string(&event)?);
    }
    Ok(())
}
