//! Excluded-application list.
//!
//! An ordered set of process names. While app monitoring is enabled, the
//! presence of any of these processes suppresses synthetic activity
//! regardless of the schedule.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Ordered, duplicate-free list of process names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExclusionList {
    apps: Vec<String>,
}

impl ExclusionList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a process name. Duplicates are rejected.
    pub fn add(&mut self, name: impl Into<String>) -> Result<(), ValidationError> {
        let name = name.into();
        if self.apps.iter().any(|a| a == &name) {
            return Err(ValidationError::DuplicateApp(name));
        }
        self.apps.push(name);
        Ok(())
    }

    /// Remove a process name. Unknown names are rejected.
    pub fn remove(&mut self, name: &str) -> Result<(), ValidationError> {
        match self.apps.iter().position(|a| a == name) {
            Some(idx) => {
                self.apps.remove(idx);
                Ok(())
            }
            None => Err(ValidationError::UnknownApp(name.to_string())),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.apps.iter().any(|a| a == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.apps.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.apps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }
}

impl From<Vec<String>> for ExclusionList {
    /// Build from a raw list (e.g. a persisted config), dropping duplicates
    /// while preserving first-occurrence order.
    fn from(names: Vec<String>) -> Self {
        let mut list = Self::new();
        for name in names {
            let _ = list.add(name);
        }
        list
    }
}
