use clap::Subcommand;
use wakeful_core::platform::{list_process_names, SystemProcessQuery};
use wakeful_core::{AppConfig, ExclusionList};

#[derive(Subcommand)]
pub enum AppsAction {
    /// Add a process name to the exclusion list
    Add {
        /// Process name as it appears in the process table (e.g. "vlc.exe")
        name: String,
    },
    /// Remove a process name from the exclusion list
    Remove {
        /// Process name
        name: String,
    },
    /// List the excluded process names
    List,
    /// Turn app monitoring on
    Enable,
    /// Turn app monitoring off
    Disable,
    /// List currently running process names (to pick exclusions from)
    Ps,
}

pub fn run(action: AppsAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        AppsAction::Add { name } => {
            let mut config = AppConfig::load_or_default();
            let mut list = ExclusionList::from(config.app_monitoring.apps.clone());
            list.add(name.clone())?;
            config.app_monitoring.apps = list.iter().map(String::from).collect();
            config.save()?;
            println!("added '{name}'");
        }
        AppsAction::Remove { name } => {
            let mut config = AppConfig::load_or_default();
            let mut list = ExclusionList::from(config.app_monitoring.apps.clone());
            list.remove(&name)?;
            config.app_monitoring.apps = list.iter().map(String::from).collect();
            config.save()?;
            println!("removed '{name}'");
        }
        AppsAction::List => {
            let config = AppConfig::load_or_default();
            for name in &config.app_monitoring.apps {
                println!("{name}");
            }
        }
        AppsAction::Enable => set_monitoring(true)?,
        AppsAction::Disable => set_monitoring(false)?,
        AppsAction::Ps => {
            let mut query = SystemProcessQuery::new();
            for name in list_process_names(&mut query) {
                println!("{name}");
            }
        }
    }
    Ok(())
}

fn set_monitoring(enabled: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load_or_default();
    config.app_monitoring.enabled = enabled;
    config.save()?;
    println!(
        "app monitoring {}",
        if enabled { "enabled" } else { "disabled" }
    );
    Ok(())
}
