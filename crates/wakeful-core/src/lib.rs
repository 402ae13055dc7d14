//! # Wakeful Core Library
//!
//! This library provides the core logic for Wakeful, a tool that keeps a
//! workstation from entering idle sleep by periodically emitting harmless
//! synthetic input. All behavior is available through this library; the
//! CLI binary (and any future tray/GUI surface) is a thin layer over it.
//!
//! ## Architecture
//!
//! - **Schedule Model**: per-day time windows with a shared global
//!   fallback; a pure evaluator decides window membership
//! - **Suppression Engine**: combines the schedule with an excluded-app
//!   check into a single per-tick verdict
//! - **Worker**: a background thread that ticks every five seconds and
//!   emits activity when enabled, unsuppressed, and due
//! - **Storage**: JSON configuration with legacy-shape migrations
//! - **Platform**: process enumeration and input synthesis collaborators
//!
//! ## Key Components
//!
//! - [`WeeklyConfig`]: the weekly schedule model
//! - [`evaluate`] / [`should_suppress`]: the suppression decision engine
//! - [`Worker`]: the background activity loop
//! - [`AppConfig`]: persisted configuration

pub mod activity;
pub mod engine;
pub mod error;
pub mod events;
pub mod exclusions;
pub mod platform;
pub mod schedule;
pub mod storage;
pub mod worker;

pub use activity::{ActivityEmitter, ActivityKind, ActivitySettings};
pub use engine::{evaluate, should_suppress, ProcessQuery, RuntimeState, SuppressionReason};
pub use error::{ConfigError, CoreError, EmitError, ValidationError};
pub use events::Event;
pub use exclusions::ExclusionList;
pub use schedule::{DaySchedule, GlobalSchedule, Period, WeeklyConfig};
pub use storage::AppConfig;
pub use worker::{EngineConfig, Worker};
