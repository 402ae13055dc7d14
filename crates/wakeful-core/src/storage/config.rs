//! JSON-based persisted configuration.
//!
//! Stored at `~/.config/wakeful/config.json`. The shape is byte-compatible
//! with the config files the tool has always written:
//!
//! ```json
//! {
//!   "active": true,
//!   "schedule": { "enabled": true },
//!   "weekly_schedules": { "Monday": { ... }, ..., "global": { ... } },
//!   "app_monitoring": { "enabled": false, "apps": [] },
//!   "activity_settings": { "type": "mouse_movement", "interval": 50, "custom_key": "7E" }
//! }
//! ```
//!
//! Older config shapes are upgraded on load (see [`super::migrations`]).
//! A missing or unreadable file falls back to defaults; nothing here is
//! fatal.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use super::{data_dir, migrations};
use crate::activity::{
    parse_key_code, ActivityKind, ActivitySettings, DEFAULT_INTERVAL_SECS, DEFAULT_KEY_CODE,
};
use crate::error::ConfigError;
use crate::exclusions::ExclusionList;
use crate::schedule::WeeklyConfig;
use crate::worker::EngineConfig;

/// The `schedule` section: a single enable flag for schedule checking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSection {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for ScheduleSection {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// The `app_monitoring` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppMonitoringSection {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub apps: Vec<String>,
}

/// The `activity_settings` section. The key code is stored as a hex string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivitySettingsSection {
    #[serde(rename = "type", default)]
    pub kind: ActivityKind,
    #[serde(default = "default_interval")]
    pub interval: u32,
    #[serde(default = "default_custom_key")]
    pub custom_key: String,
}

impl Default for ActivitySettingsSection {
    fn default() -> Self {
        Self {
            kind: ActivityKind::default(),
            interval: DEFAULT_INTERVAL_SECS,
            custom_key: default_custom_key(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_interval() -> u32 {
    DEFAULT_INTERVAL_SECS
}

fn default_custom_key() -> String {
    format!("{DEFAULT_KEY_CODE:X}")
}

/// Application configuration.
///
/// Serialized to/from JSON at `~/.config/wakeful/config.json`. Every
/// section carries serde defaults so configs from older versions load
/// with missing parts backfilled rather than failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub schedule: ScheduleSection,
    #[serde(default)]
    pub weekly_schedules: WeeklyConfig,
    #[serde(default)]
    pub app_monitoring: AppMonitoringSection,
    #[serde(default)]
    pub activity_settings: ActivitySettingsSection,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            active: true,
            schedule: ScheduleSection::default(),
            weekly_schedules: WeeklyConfig::default(),
            app_monitoring: AppMonitoringSection::default(),
            activity_settings: ActivitySettingsSection::default(),
        }
    }
}

impl AppConfig {
    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.json"))
    }

    /// Load from disk, upgrading legacy shapes and backfilling missing
    /// sections. A missing file writes and returns the defaults; a
    /// malformed file is reported and replaced by defaults in memory.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        Ok(Self::load_from(&path))
    }

    fn load_from(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => {
                let cfg = Self::default();
                if let Err(e) = cfg.save_to(path) {
                    warn!("could not write default config: {e}");
                }
                return cfg;
            }
        };
        match Self::parse(&content) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("malformed config at {}: {e}; using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Parse a config document, applying the legacy-shape upgrade chain
    /// first.
    pub fn parse(content: &str) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_str(content)?;
        let value = migrations::upgrade(value);
        serde_json::from_value(value)
    }

    /// Persist to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        self.save_to(&path)
    }

    fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        std::fs::write(path, content).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load from disk, returning defaults on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// The configured key code, decoded from its hex representation.
    pub fn custom_key_code(&self) -> Result<u16, ConfigError> {
        parse_key_code(&self.activity_settings.custom_key).map_err(|e| {
            ConfigError::InvalidValue {
                key: "activity_settings.custom_key".to_string(),
                message: e.to_string(),
            }
        })
    }

    /// Store a key code in its hex representation.
    pub fn set_custom_key_code(&mut self, code: u16) {
        self.activity_settings.custom_key = format!("{code:X}");
    }

    /// Build the worker-facing snapshot from this configuration.
    ///
    /// Invalid boundary values that slipped into the file (bad hex key,
    /// out-of-range interval) are replaced by their defaults here; the
    /// worker never sees them.
    pub fn engine_config(&self) -> EngineConfig {
        let custom_key_code = self.custom_key_code().unwrap_or_else(|e| {
            warn!("{e}; falling back to default key");
            DEFAULT_KEY_CODE
        });
        let activity =
            ActivitySettings::new(self.activity_settings.kind, self.activity_settings.interval, custom_key_code)
                .unwrap_or_else(|e| {
                    warn!("{e}; falling back to default interval");
                    ActivitySettings {
                        kind: self.activity_settings.kind,
                        custom_key_code,
                        ..Default::default()
                    }
                });
        EngineConfig {
            master_enabled: self.active,
            schedule_enabled: self.schedule.enabled,
            app_monitoring_enabled: self.app_monitoring.enabled,
            weekly: self.weekly_schedules.clone(),
            exclusions: ExclusionList::from(self.app_monitoring.apps.clone()),
            activity,
        }
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key and persist.
    ///
    /// # Errors
    /// Returns an error if the key is unknown, the value does not fit the
    /// existing field's type, or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        self.save()?;
        Ok(())
    }
}

fn get_json_value_by_path<'a>(
    root: &'a serde_json::Value,
    key: &str,
) -> Option<&'a serde_json::Value> {
    if key.is_empty() {
        return None;
    }

    let mut current = root;
    for part in key.split('.') {
        current = current.get(part)?;
    }
    Some(current)
}

fn set_json_value_by_path(
    root: &mut serde_json::Value,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    let unknown = || ConfigError::UnknownKey(key.to_string());
    let invalid = |message: String| ConfigError::InvalidValue {
        key: key.to_string(),
        message,
    };

    let mut parts = key.split('.').peekable();
    if parts.peek().is_none() {
        return Err(unknown());
    }

    let mut current = root;
    while let Some(part) = parts.next() {
        let is_leaf = parts.peek().is_none();
        if is_leaf {
            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;

            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                ),
                serde_json::Value::Number(_) => {
                    if let Ok(n) = value.parse::<u64>() {
                        serde_json::Value::Number(n.into())
                    } else {
                        return Err(invalid(format!("cannot parse '{value}' as number")));
                    }
                }
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                }
                _ => serde_json::Value::String(value.into()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        current = current.get_mut(part).ok_or_else(unknown)?;
    }

    Err(unknown())
}
