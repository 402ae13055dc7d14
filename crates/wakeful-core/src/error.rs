//! Core error types for wakeful-core.
//!
//! Nothing in this library is fatal to the process: configuration problems
//! fall back to defaults, and OS primitive failures are reported and
//! retried on the next tick. Errors exist so callers can decide what to log.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for wakeful-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Activity emission errors
    #[error("Emission error: {0}")]
    Emit(#[from] EmitError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Hour or minute outside the valid clock range
    #[error("Invalid time {hour:02}:{minute:02}: hour must be 0-23, minute 0-59")]
    InvalidTime { hour: u8, minute: u8 },

    /// Activity interval outside the accepted range
    #[error("Activity interval {secs}s is out of range ({min}-{max}s)")]
    IntervalOutOfRange { secs: u32, min: u32, max: u32 },

    /// A day schedule must keep at least one period
    #[error("Day schedule must contain at least one period")]
    EmptyPeriods,

    /// Process name already present in the exclusion list
    #[error("'{0}' is already in the exclusion list")]
    DuplicateApp(String),

    /// Process name not present in the exclusion list
    #[error("'{0}' is not in the exclusion list")]
    UnknownApp(String),

    /// Custom key code that is not valid hexadecimal
    #[error("'{0}' is not a valid hexadecimal key code")]
    InvalidKeyCode(String),
}

/// Errors from the OS-level input synthesis primitives.
///
/// These are soft failures: the worker reports them and keeps ticking.
#[derive(Error, Debug)]
pub enum EmitError {
    /// The input backend could not be initialized
    #[error("Input backend unavailable: {0}")]
    Backend(String),

    /// A synthesized input event was rejected by the OS
    #[error("Failed to synthesize input: {0}")]
    Input(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
