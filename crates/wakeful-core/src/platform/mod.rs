//! OS-level collaborators: process enumeration and input synthesis.
//!
//! Everything here is best-effort. Enumeration failures surface as an
//! empty set and emission failures as [`EmitError`]; neither is ever
//! allowed to take the worker down.

use std::collections::HashSet;

use enigo::{Coordinate, Direction, Enigo, Key, Keyboard, Mouse, Settings};
use sysinfo::{ProcessesToUpdate, System};
use tracing::debug;

use crate::activity::{ActivityEmitter, DEFAULT_KEY_CODE};
use crate::engine::ProcessQuery;
use crate::error::EmitError;

/// Process enumeration over the system process table.
pub struct SystemProcessQuery {
    system: System,
}

impl SystemProcessQuery {
    pub fn new() -> Self {
        Self {
            system: System::new(),
        }
    }
}

impl Default for SystemProcessQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessQuery for SystemProcessQuery {
    fn running_process_names(&mut self) -> HashSet<String> {
        self.system.refresh_processes(ProcessesToUpdate::All, true);
        self.system
            .processes()
            .values()
            .map(|p| p.name().to_string_lossy().into_owned())
            .collect()
    }
}

/// Currently running process names, sorted and deduplicated, for display.
pub fn list_process_names(query: &mut dyn ProcessQuery) -> Vec<String> {
    let mut names: Vec<String> = query.running_process_names().into_iter().collect();
    names.sort();
    names
}

/// Synthetic input over the real input backend.
pub struct InputEmitter {
    enigo: Enigo,
}

impl InputEmitter {
    /// Connect to the input backend.
    ///
    /// # Errors
    /// Returns [`EmitError::Backend`] when no input connection is available
    /// (e.g. headless session, missing permissions).
    pub fn new() -> Result<Self, EmitError> {
        let enigo =
            Enigo::new(&Settings::default()).map_err(|e| EmitError::Backend(e.to_string()))?;
        Ok(Self { enigo })
    }
}

impl ActivityEmitter for InputEmitter {
    /// Wiggle the pointer one pixel down and back, then restore the exact
    /// original coordinates so no visible movement remains.
    fn pointer_nudge(&mut self) -> Result<(), EmitError> {
        let (x, y) = self
            .enigo
            .location()
            .map_err(|e| EmitError::Input(e.to_string()))?;
        self.enigo
            .move_mouse(0, 1, Coordinate::Rel)
            .map_err(|e| EmitError::Input(e.to_string()))?;
        self.enigo
            .move_mouse(0, -1, Coordinate::Rel)
            .map_err(|e| EmitError::Input(e.to_string()))?;
        self.enigo
            .move_mouse(x, y, Coordinate::Abs)
            .map_err(|e| EmitError::Input(e.to_string()))?;
        debug!("pointer nudged");
        Ok(())
    }

    fn key_tap(&mut self, code: u16) -> Result<(), EmitError> {
        let key = if code == DEFAULT_KEY_CODE {
            Key::F15
        } else {
            Key::Other(code.into())
        };
        self.enigo
            .key(key, Direction::Click)
            .map_err(|e| EmitError::Input(e.to_string()))?;
        debug!(code, "key tapped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_process_names_sorts_and_dedups() {
        struct Fixed;
        impl ProcessQuery for Fixed {
            fn running_process_names(&mut self) -> HashSet<String> {
                ["b.exe", "a.exe", "c.exe"]
                    .into_iter()
                    .map(String::from)
                    .collect()
            }
        }
        let names = list_process_names(&mut Fixed);
        assert_eq!(names, vec!["a.exe", "b.exe", "c.exe"]);
    }
}
