//! Synthetic activity settings and emission.
//!
//! The worker emits activity through the [`ActivityEmitter`] trait so the
//! OS-level primitives stay out of the core. [`emit`] implements the
//! per-kind behavior, including the partial-failure semantics of
//! [`ActivityKind::Both`].

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{EmitError, ValidationError};

/// Minimum accepted emission interval, in seconds.
pub const MIN_INTERVAL_SECS: u32 = 10;
/// Maximum accepted emission interval, in seconds.
pub const MAX_INTERVAL_SECS: u32 = 300;
/// Default emission interval, in seconds.
pub const DEFAULT_INTERVAL_SECS: u32 = 50;
/// Virtual key code for F15, which almost no keyboard carries and almost
/// nothing binds.
pub const DEFAULT_KEY_CODE: u16 = 0x7E;

/// What kind of synthetic input to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    MouseMovement,
    KeyPress,
    CustomKey,
    Both,
}

impl Default for ActivityKind {
    fn default() -> Self {
        ActivityKind::MouseMovement
    }
}

/// Governs what the emitted activity does and how often.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivitySettings {
    pub kind: ActivityKind,
    pub interval_secs: u32,
    pub custom_key_code: u16,
}

impl ActivitySettings {
    /// Create settings, validating the interval range.
    pub fn new(
        kind: ActivityKind,
        interval_secs: u32,
        custom_key_code: u16,
    ) -> Result<Self, ValidationError> {
        validate_interval(interval_secs)?;
        Ok(Self {
            kind,
            interval_secs,
            custom_key_code,
        })
    }
}

impl Default for ActivitySettings {
    fn default() -> Self {
        Self {
            kind: ActivityKind::default(),
            interval_secs: DEFAULT_INTERVAL_SECS,
            custom_key_code: DEFAULT_KEY_CODE,
        }
    }
}

/// Check an interval against the accepted range.
pub fn validate_interval(secs: u32) -> Result<(), ValidationError> {
    if !(MIN_INTERVAL_SECS..=MAX_INTERVAL_SECS).contains(&secs) {
        return Err(ValidationError::IntervalOutOfRange {
            secs,
            min: MIN_INTERVAL_SECS,
            max: MAX_INTERVAL_SECS,
        });
    }
    Ok(())
}

/// Parse a hexadecimal key code string (as stored in the config file).
pub fn parse_key_code(hex: &str) -> Result<u16, ValidationError> {
    u16::from_str_radix(hex.trim(), 16)
        .map_err(|_| ValidationError::InvalidKeyCode(hex.to_string()))
}

/// OS-level input synthesis primitives.
///
/// Implemented over a real input backend in [`crate::platform`] and by
/// test doubles in unit tests.
pub trait ActivityEmitter {
    /// Move the pointer by a minimal delta and restore its exact position.
    fn pointer_nudge(&mut self) -> Result<(), EmitError>;

    /// Press and release a key by virtual key code.
    fn key_tap(&mut self, code: u16) -> Result<(), EmitError>;
}

/// Emit one round of synthetic activity per `settings.kind`.
///
/// For [`ActivityKind::Both`] the pointer nudge and key tap are attempted
/// independently; the round succeeds if either does, and an individual
/// failure is logged rather than aborting the other.
pub fn emit(
    settings: &ActivitySettings,
    emitter: &mut dyn ActivityEmitter,
) -> Result<(), EmitError> {
    match settings.kind {
        ActivityKind::MouseMovement => emitter.pointer_nudge(),
        ActivityKind::KeyPress => emitter.key_tap(DEFAULT_KEY_CODE),
        ActivityKind::CustomKey => emitter.key_tap(settings.custom_key_code),
        ActivityKind::Both => {
            let mouse = emitter.pointer_nudge();
            let key = emitter.key_tap(DEFAULT_KEY_CODE);
            match (mouse, key) {
                (Ok(()), Ok(())) => Ok(()),
                (Ok(()), Err(e)) => {
                    warn!("key tap failed during combined emission: {e}");
                    Ok(())
                }
                (Err(e), Ok(())) => {
                    warn!("pointer nudge failed during combined emission: {e}");
                    Ok(())
                }
                (Err(mouse), Err(key)) => {
                    Err(EmitError::Input(format!("pointer: {mouse}; key: {key}")))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Emitter double with programmable failures.
    struct FakeEmitter {
        fail_mouse: bool,
        fail_key: bool,
        nudges: u32,
        taps: Vec<u16>,
    }

    impl FakeEmitter {
        fn new() -> Self {
            Self {
                fail_mouse: false,
                fail_key: false,
                nudges: 0,
                taps: Vec::new(),
            }
        }
    }

    impl ActivityEmitter for FakeEmitter {
        fn pointer_nudge(&mut self) -> Result<(), EmitError> {
            if self.fail_mouse {
                return Err(EmitError::Input("pointer rejected".into()));
            }
            self.nudges += 1;
            Ok(())
        }

        fn key_tap(&mut self, code: u16) -> Result<(), EmitError> {
            if self.fail_key {
                return Err(EmitError::Input("key rejected".into()));
            }
            self.taps.push(code);
            Ok(())
        }
    }

    #[test]
    fn interval_bounds() {
        assert!(validate_interval(9).is_err());
        assert!(validate_interval(10).is_ok());
        assert!(validate_interval(300).is_ok());
        assert!(validate_interval(301).is_err());
    }

    #[test]
    fn settings_new_rejects_bad_interval() {
        assert!(ActivitySettings::new(ActivityKind::KeyPress, 5, DEFAULT_KEY_CODE).is_err());
        assert!(ActivitySettings::new(ActivityKind::KeyPress, 50, DEFAULT_KEY_CODE).is_ok());
    }

    #[test]
    fn parse_key_code_accepts_hex_only() {
        assert_eq!(parse_key_code("7E").unwrap(), 0x7E);
        assert_eq!(parse_key_code("a3").unwrap(), 0xA3);
        assert!(parse_key_code("zz").is_err());
        assert!(parse_key_code("").is_err());
    }

    #[test]
    fn kind_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&ActivityKind::MouseMovement).unwrap(),
            r#""mouse_movement""#
        );
        assert_eq!(
            serde_json::to_string(&ActivityKind::CustomKey).unwrap(),
            r#""custom_key""#
        );
    }

    #[test]
    fn key_press_uses_default_key() {
        let mut emitter = FakeEmitter::new();
        let settings = ActivitySettings {
            kind: ActivityKind::KeyPress,
            ..Default::default()
        };
        emit(&settings, &mut emitter).unwrap();
        assert_eq!(emitter.taps, vec![DEFAULT_KEY_CODE]);
    }

    #[test]
    fn custom_key_uses_configured_code() {
        let mut emitter = FakeEmitter::new();
        let settings = ActivitySettings {
            kind: ActivityKind::CustomKey,
            custom_key_code: 0xA4,
            ..Default::default()
        };
        emit(&settings, &mut emitter).unwrap();
        assert_eq!(emitter.taps, vec![0xA4]);
    }

    #[test]
    fn both_succeeds_when_only_key_succeeds() {
        let mut emitter = FakeEmitter::new();
        emitter.fail_mouse = true;
        let settings = ActivitySettings {
            kind: ActivityKind::Both,
            ..Default::default()
        };
        assert!(emit(&settings, &mut emitter).is_ok());
        assert_eq!(emitter.taps, vec![DEFAULT_KEY_CODE]);
    }

    #[test]
    fn both_fails_only_when_both_fail() {
        let mut emitter = FakeEmitter::new();
        emitter.fail_mouse = true;
        emitter.fail_key = true;
        let settings = ActivitySettings {
            kind: ActivityKind::Both,
            ..Default::default()
        };
        assert!(emit(&settings, &mut emitter).is_err());
    }

    #[test]
    fn both_attempts_key_even_after_mouse_failure() {
        let mut emitter = FakeEmitter::new();
        emitter.fail_mouse = true;
        let settings = ActivitySettings {
            kind: ActivityKind::Both,
            ..Default::default()
        };
        emit(&settings, &mut emitter).unwrap();
        assert_eq!(emitter.taps.len(), 1);
    }
}
