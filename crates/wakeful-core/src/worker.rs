//! Background activity worker.
//!
//! One dedicated thread evaluates the suppression engine on a fixed
//! five-second cadence (independent of the configured emission interval)
//! and emits synthetic activity when due. The thread is caller-owned
//! through [`Worker`]: configuration is replaced wholesale under a single
//! mutex, shutdown is a cooperative stop flag plus join, and observable
//! state changes flow out over an `mpsc` event channel.
//!
//! ## Tick rule
//!
//! ```text
//! master off      -> nothing
//! suppressed      -> nothing (Idle)
//! interval not up -> nothing (Armed, waiting)
//! otherwise       -> emit, update last_action_time on success
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use chrono::{Local, NaiveDateTime, Utc};
use tracing::{debug, warn};

use crate::activity::{self, ActivityEmitter, ActivitySettings};
use crate::engine::{evaluate, ProcessQuery, RuntimeState, SuppressionReason};
use crate::events::Event;
use crate::exclusions::ExclusionList;
use crate::schedule::WeeklyConfig;

/// Fixed cadence at which the worker re-evaluates suppression.
pub const TICK_PERIOD: Duration = Duration::from_secs(5);

/// The full worker-visible configuration snapshot.
///
/// Readers always see either the old or the new snapshot in full, never a
/// partially-updated mix: the worker clones the whole structure under the
/// mutex once per tick, and writers replace it wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub master_enabled: bool,
    pub schedule_enabled: bool,
    pub app_monitoring_enabled: bool,
    pub weekly: WeeklyConfig,
    pub exclusions: ExclusionList,
    pub activity: ActivitySettings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            master_enabled: true,
            schedule_enabled: true,
            app_monitoring_enabled: false,
            weekly: WeeklyConfig::default(),
            exclusions: ExclusionList::new(),
            activity: ActivitySettings::default(),
        }
    }
}

/// Handle to the background worker thread.
pub struct Worker {
    shared: Arc<Mutex<EngineConfig>>,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    /// Spawn the worker thread with the given collaborators.
    ///
    /// Events are pushed onto `events`; a disconnected receiver is
    /// tolerated (the worker keeps ticking and drops the events).
    pub fn spawn(
        config: EngineConfig,
        emitter: Box<dyn ActivityEmitter + Send>,
        processes: Box<dyn ProcessQuery + Send>,
        events: Sender<Event>,
    ) -> Self {
        let shared = Arc::new(Mutex::new(config));
        let stop = Arc::new(AtomicBool::new(false));
        let handle = {
            let shared = Arc::clone(&shared);
            let stop = Arc::clone(&stop);
            std::thread::Builder::new()
                .name("wakeful-worker".into())
                .spawn(move || run_loop(shared, stop, emitter, processes, events))
                .ok()
        };
        if handle.is_none() {
            warn!("failed to spawn worker thread");
        }
        Self {
            shared,
            stop,
            handle,
        }
    }

    /// Replace the entire configuration snapshot.
    pub fn replace_config(&self, config: EngineConfig) {
        *self.lock_shared() = config;
    }

    /// Current configuration snapshot.
    pub fn config(&self) -> EngineConfig {
        self.lock_shared().clone()
    }

    pub fn set_master_enabled(&self, enabled: bool) {
        self.lock_shared().master_enabled = enabled;
    }

    /// Request shutdown and wait for the current tick to finish.
    ///
    /// Latency is at most one tick.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            handle.thread().unpark();
            if handle.join().is_err() {
                warn!("worker thread panicked before shutdown");
            }
        }
    }

    fn lock_shared(&self) -> std::sync::MutexGuard<'_, EngineConfig> {
        self.shared
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_loop(
    shared: Arc<Mutex<EngineConfig>>,
    stop: Arc<AtomicBool>,
    mut emitter: Box<dyn ActivityEmitter + Send>,
    mut processes: Box<dyn ProcessQuery + Send>,
    events: Sender<Event>,
) {
    let _ = events.send(Event::WorkerStarted { at: Utc::now() });
    // First emission happens one full interval after start.
    let mut last_action_time = Local::now().naive_local();
    let mut prev_reason: Option<SuppressionReason> = None;
    let mut out = Vec::new();

    while !stop.load(Ordering::Acquire) {
        let config = shared
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone();
        tick(
            &config,
            &mut last_action_time,
            &mut prev_reason,
            Local::now().naive_local(),
            emitter.as_mut(),
            processes.as_mut(),
            &mut out,
        );
        for event in out.drain(..) {
            if events.send(event).is_err() {
                debug!("event receiver disconnected");
            }
        }
        std::thread::park_timeout(TICK_PERIOD);
    }

    let _ = events.send(Event::WorkerStopped { at: Utc::now() });
}

/// One bounded, synchronous unit of work.
fn tick(
    config: &EngineConfig,
    last_action_time: &mut NaiveDateTime,
    prev_reason: &mut Option<SuppressionReason>,
    now: NaiveDateTime,
    emitter: &mut dyn ActivityEmitter,
    processes: &mut dyn ProcessQuery,
    out: &mut Vec<Event>,
) {
    if !config.master_enabled {
        return;
    }

    let state = RuntimeState {
        master_enabled: config.master_enabled,
        schedule_enabled: config.schedule_enabled,
        app_monitoring_enabled: config.app_monitoring_enabled,
        last_action_time: *last_action_time,
    };
    let reason = evaluate(
        &state,
        &config.weekly,
        &config.exclusions,
        now,
        processes,
    );
    if reason != *prev_reason {
        debug!(suppressed = reason.is_some(), "suppression verdict changed");
        out.push(Event::SuppressionChanged {
            suppressed: reason.is_some(),
            reason: reason.clone(),
            at: Utc::now(),
        });
        *prev_reason = reason.clone();
    }
    if reason.is_some() {
        return;
    }

    let elapsed_secs = (now - *last_action_time).num_seconds();
    if elapsed_secs > i64::from(config.activity.interval_secs) {
        match activity::emit(&config.activity, emitter) {
            Ok(()) => {
                *last_action_time = now;
                out.push(Event::ActivityEmitted {
                    kind: config.activity.kind,
                    at: Utc::now(),
                });
            }
            Err(e) => {
                warn!("activity emission failed: {e}");
                out.push(Event::ActivityFailed {
                    message: e.to_string(),
                    at: Utc::now(),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::ActivityKind;
    use crate::error::EmitError;
    use chrono::NaiveDate;
    use std::collections::HashSet;
    use std::sync::mpsc;

    struct FakeEmitter {
        fail: bool,
        emissions: u32,
    }

    impl FakeEmitter {
        fn new() -> Self {
            Self {
                fail: false,
                emissions: 0,
            }
        }
    }

    impl ActivityEmitter for FakeEmitter {
        fn pointer_nudge(&mut self) -> Result<(), EmitError> {
            if self.fail {
                return Err(EmitError::Input("nope".into()));
            }
            self.emissions += 1;
            Ok(())
        }

        fn key_tap(&mut self, _code: u16) -> Result<(), EmitError> {
            if self.fail {
                return Err(EmitError::Input("nope".into()));
            }
            self.emissions += 1;
            Ok(())
        }
    }

    struct NoProcesses;

    impl ProcessQuery for NoProcesses {
        fn running_process_names(&mut self) -> HashSet<String> {
            HashSet::new()
        }
    }

    /// 2025-01-06 is a Monday; 10:00 is inside the default window.
    fn monday_at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 6)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn run_tick(
        config: &EngineConfig,
        last: &mut NaiveDateTime,
        prev: &mut Option<SuppressionReason>,
        now: NaiveDateTime,
        emitter: &mut FakeEmitter,
    ) -> Vec<Event> {
        let mut out = Vec::new();
        tick(config, last, prev, now, emitter, &mut NoProcesses, &mut out);
        out
    }

    #[test]
    fn emits_only_after_interval_elapses() {
        let config = EngineConfig::default(); // interval 50s
        let start = monday_at(10, 0, 0);
        let mut last = start;
        let mut prev = None;
        let mut emitter = FakeEmitter::new();

        let out = run_tick(&config, &mut last, &mut prev, monday_at(10, 0, 49), &mut emitter);
        assert!(out.is_empty());
        assert_eq!(emitter.emissions, 0);
        assert_eq!(last, start);

        let out = run_tick(&config, &mut last, &mut prev, monday_at(10, 0, 51), &mut emitter);
        assert_eq!(emitter.emissions, 1);
        assert_eq!(last, monday_at(10, 0, 51));
        assert!(matches!(out[0], Event::ActivityEmitted { .. }));
    }

    #[test]
    fn master_disabled_does_nothing() {
        let config = EngineConfig {
            master_enabled: false,
            ..Default::default()
        };
        let mut last = monday_at(10, 0, 0);
        let mut prev = None;
        let mut emitter = FakeEmitter::new();
        let out = run_tick(&config, &mut last, &mut prev, monday_at(10, 30, 0), &mut emitter);
        assert!(out.is_empty());
        assert_eq!(emitter.emissions, 0);
    }

    #[test]
    fn suppressed_tick_does_not_emit() {
        let config = EngineConfig::default();
        let mut last = monday_at(19, 0, 0);
        let mut prev = None;
        let mut emitter = FakeEmitter::new();
        // 20:00 is outside the default 09:00-17:00 window.
        let out = run_tick(&config, &mut last, &mut prev, monday_at(20, 0, 0), &mut emitter);
        assert_eq!(emitter.emissions, 0);
        assert_eq!(out.len(), 1);
        assert!(matches!(
            out[0],
            Event::SuppressionChanged {
                suppressed: true,
                ..
            }
        ));
    }

    #[test]
    fn failed_emission_reports_and_keeps_last_action_time() {
        let config = EngineConfig::default();
        let start = monday_at(10, 0, 0);
        let mut last = start;
        let mut prev = None;
        let mut emitter = FakeEmitter::new();
        emitter.fail = true;

        let out = run_tick(&config, &mut last, &mut prev, monday_at(10, 1, 0), &mut emitter);
        assert_eq!(last, start, "last_action_time must only move on success");
        assert!(matches!(out[0], Event::ActivityFailed { .. }));

        // Next tick retries.
        emitter.fail = false;
        let out = run_tick(&config, &mut last, &mut prev, monday_at(10, 1, 5), &mut emitter);
        assert!(matches!(out[0], Event::ActivityEmitted { .. }));
        assert_eq!(last, monday_at(10, 1, 5));
    }

    #[test]
    fn both_kind_partial_failure_still_updates_last_action_time() {
        struct HalfBroken;
        impl ActivityEmitter for HalfBroken {
            fn pointer_nudge(&mut self) -> Result<(), EmitError> {
                Err(EmitError::Input("pointer rejected".into()))
            }
            fn key_tap(&mut self, _code: u16) -> Result<(), EmitError> {
                Ok(())
            }
        }

        let config = EngineConfig {
            activity: ActivitySettings {
                kind: ActivityKind::Both,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut last = monday_at(10, 0, 0);
        let mut prev = None;
        let mut out = Vec::new();
        tick(
            &config,
            &mut last,
            &mut prev,
            monday_at(10, 1, 0),
            &mut HalfBroken,
            &mut NoProcesses,
            &mut out,
        );
        assert_eq!(last, monday_at(10, 1, 0));
        assert!(matches!(out[0], Event::ActivityEmitted { .. }));
    }

    #[test]
    fn suppression_change_is_reported_once_per_transition() {
        let config = EngineConfig::default();
        let mut last = monday_at(16, 59, 0);
        let mut prev = None;
        let mut emitter = FakeEmitter::new();

        // Two ticks outside the window: one transition event, then silence.
        let out = run_tick(&config, &mut last, &mut prev, monday_at(20, 0, 0), &mut emitter);
        assert_eq!(out.len(), 1);
        let out = run_tick(&config, &mut last, &mut prev, monday_at(20, 0, 5), &mut emitter);
        assert!(out.is_empty());

        // Back inside the window: one transition back.
        let out = run_tick(&config, &mut last, &mut prev, monday_at(9, 0, 0), &mut emitter);
        assert!(matches!(
            out[0],
            Event::SuppressionChanged {
                suppressed: false,
                ..
            }
        ));
    }

    #[test]
    fn spawn_and_stop_joins_promptly() {
        let config = EngineConfig {
            master_enabled: false,
            ..Default::default()
        };
        let (tx, rx) = mpsc::channel();
        let worker = Worker::spawn(config, Box::new(FakeEmitter::new()), Box::new(NoProcesses), tx);
        let first = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert!(matches!(first, Event::WorkerStarted { .. }));

        worker.stop();
        let mut saw_stopped = false;
        while let Ok(event) = rx.recv_timeout(Duration::from_secs(2)) {
            if matches!(event, Event::WorkerStopped { .. }) {
                saw_stopped = true;
                break;
            }
        }
        assert!(saw_stopped);
    }

    #[test]
    fn replace_config_swaps_whole_snapshot() {
        let (tx, _rx) = mpsc::channel();
        let worker = Worker::spawn(
            EngineConfig {
                master_enabled: false,
                ..Default::default()
            },
            Box::new(FakeEmitter::new()),
            Box::new(NoProcesses),
            tx,
        );
        let mut next = EngineConfig::default();
        next.exclusions.add("vlc.exe").unwrap();
        next.app_monitoring_enabled = true;
        worker.replace_config(next.clone());
        assert_eq!(worker.config(), next);
        worker.stop();
    }
}
