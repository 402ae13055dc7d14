use chrono::Weekday;
use clap::Subcommand;
use wakeful_core::{AppConfig, Period};

#[derive(Subcommand)]
pub enum ScheduleAction {
    /// Print the weekly schedule as JSON
    Show,
    /// Turn schedule checking on
    Enable,
    /// Turn schedule checking off
    Disable,
    /// Configure one day of the week
    Day {
        /// Day name (monday..sunday)
        day: String,
        /// Whether the day participates in scheduling
        #[arg(long)]
        enabled: Option<bool>,
        /// Defer to the global schedule instead of the day's own windows
        #[arg(long)]
        use_global: Option<bool>,
        /// Replace the day's windows ("HH:MM-HH:MM", repeatable)
        #[arg(long = "window")]
        windows: Vec<String>,
    },
    /// Configure the global schedule
    Global {
        /// Whether the global schedule is enabled
        #[arg(long)]
        enabled: Option<bool>,
        /// Replace the global windows ("HH:MM-HH:MM", repeatable)
        #[arg(long = "window")]
        windows: Vec<String>,
    },
}

pub fn run(action: ScheduleAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ScheduleAction::Show => {
            let config = AppConfig::load_or_default();
            println!("{}", serde_json::to_string_pretty(&config.weekly_schedules)?);
        }
        ScheduleAction::Enable => set_schedule_enabled(true)?,
        ScheduleAction::Disable => set_schedule_enabled(false)?,
        ScheduleAction::Day {
            day,
            enabled,
            use_global,
            windows,
        } => {
            let weekday = parse_weekday(&day)?;
            let mut config = AppConfig::load_or_default();
            let periods = parse_windows(&windows)?;
            {
                let day = config.weekly_schedules.day_mut(weekday);
                if let Some(enabled) = enabled {
                    day.enabled = enabled;
                }
                if let Some(use_global) = use_global {
                    day.use_global = use_global;
                }
                if let Some(periods) = periods {
                    day.set_periods(periods)?;
                }
            }
            config.save()?;
            println!(
                "{}",
                serde_json::to_string_pretty(config.weekly_schedules.day(weekday))?
            );
        }
        ScheduleAction::Global { enabled, windows } => {
            let mut config = AppConfig::load_or_default();
            if let Some(enabled) = enabled {
                config.weekly_schedules.global.enabled = enabled;
            }
            if let Some(periods) = parse_windows(&windows)? {
                config.weekly_schedules.global.set_periods(periods)?;
            }
            config.save()?;
            println!(
                "{}",
                serde_json::to_string_pretty(&config.weekly_schedules.global)?
            );
        }
    }
    Ok(())
}

fn set_schedule_enabled(enabled: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load_or_default();
    config.schedule.enabled = enabled;
    config.save()?;
    println!(
        "schedule checking {}",
        if enabled { "enabled" } else { "disabled" }
    );
    Ok(())
}

fn parse_weekday(day: &str) -> Result<Weekday, String> {
    match day.to_ascii_lowercase().as_str() {
        "monday" | "mon" => Ok(Weekday::Mon),
        "tuesday" | "tue" => Ok(Weekday::Tue),
        "wednesday" | "wed" => Ok(Weekday::Wed),
        "thursday" | "thu" => Ok(Weekday::Thu),
        "friday" | "fri" => Ok(Weekday::Fri),
        "saturday" | "sat" => Ok(Weekday::Sat),
        "sunday" | "sun" => Ok(Weekday::Sun),
        other => Err(format!("unknown day: {other}")),
    }
}

/// Parse repeated "HH:MM-HH:MM" window arguments. Empty input means
/// "leave the existing windows alone".
fn parse_windows(windows: &[String]) -> Result<Option<Vec<Period>>, Box<dyn std::error::Error>> {
    if windows.is_empty() {
        return Ok(None);
    }
    let mut periods = Vec::with_capacity(windows.len());
    for window in windows {
        periods.push(parse_window(window)?);
    }
    Ok(Some(periods))
}

fn parse_window(window: &str) -> Result<Period, Box<dyn std::error::Error>> {
    let (start, end) = window
        .split_once('-')
        .ok_or_else(|| format!("expected HH:MM-HH:MM, got '{window}'"))?;
    let (sh, sm) = parse_hhmm(start)?;
    let (eh, em) = parse_hhmm(end)?;
    Ok(Period::new(sh, sm, eh, em)?)
}

fn parse_hhmm(s: &str) -> Result<(u8, u8), Box<dyn std::error::Error>> {
    let (h, m) = s
        .trim()
        .split_once(':')
        .ok_or_else(|| format!("expected HH:MM, got '{s}'"))?;
    Ok((h.parse::<u8>()?, m.parse::<u8>()?))
}
