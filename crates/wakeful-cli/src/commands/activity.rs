use clap::Subcommand;
use wakeful_core::activity::{parse_key_code, validate_interval};
use wakeful_core::{ActivityKind, AppConfig};

#[derive(Subcommand)]
pub enum ActivityAction {
    /// Print the activity settings as JSON
    Show,
    /// Set the activity type
    Type {
        /// One of: mouse_movement, key_press, custom_key, both
        kind: String,
    },
    /// Set the emission interval in seconds (10-300)
    Interval {
        secs: u32,
    },
    /// Set the custom key code (hex, e.g. "7E")
    Key {
        hex: String,
    },
}

pub fn run(action: ActivityAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ActivityAction::Show => {
            let config = AppConfig::load_or_default();
            println!("{}", serde_json::to_string_pretty(&config.activity_settings)?);
        }
        ActivityAction::Type { kind } => {
            let kind = parse_kind(&kind)?;
            let mut config = AppConfig::load_or_default();
            config.activity_settings.kind = kind;
            config.save()?;
            println!("activity type set");
        }
        ActivityAction::Interval { secs } => {
            validate_interval(secs)?;
            let mut config = AppConfig::load_or_default();
            config.activity_settings.interval = secs;
            config.save()?;
            println!("activity interval set to {secs} seconds");
        }
        ActivityAction::Key { hex } => {
            let code = parse_key_code(&hex)?;
            let mut config = AppConfig::load_or_default();
            config.set_custom_key_code(code);
            config.save()?;
            println!("custom key set to 0x{code:X}");
        }
    }
    Ok(())
}

fn parse_kind(kind: &str) -> Result<ActivityKind, String> {
    match kind {
        "mouse_movement" => Ok(ActivityKind::MouseMovement),
        "key_press" => Ok(ActivityKind::KeyPress),
        "custom_key" => Ok(ActivityKind::CustomKey),
        "both" => Ok(ActivityKind::Both),
        other => Err(format!(
            "unknown activity type '{other}' (expected mouse_movement, key_press, custom_key or both)"
        )),
    }
}
