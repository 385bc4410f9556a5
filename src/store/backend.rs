//! Record-store backends.
//!
//! The engine treats persistence as an external collaborator behind the
//! `RecordStore` trait: a flat load/save interface over the full rule set
//! and the settings singleton. Two implementations ship with the crate: an
//! in-memory store for tests and embedding, and a JSON-file store holding
//! the rule list and the settings as two documents under one directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use log::debug;

use crate::errors::FilterError;
use crate::rules::{FilterRule, Settings};

/// Authoritative storage for rules and settings.
///
/// The store re-reads through this interface before every validating write,
/// so implementations must return current state on every `load`.
pub trait RecordStore: Send + Sync {
    fn load(&self) -> Result<Vec<FilterRule>, FilterError>;
    fn save(&self, rules: &[FilterRule]) -> Result<(), FilterError>;
    fn load_settings(&self) -> Result<Settings, FilterError>;
    fn save_settings(&self, settings: &Settings) -> Result<(), FilterError>;
}

/// Volatile backend for tests and short-lived embedders.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rules: RwLock<Vec<FilterRule>>,
    settings: RwLock<Settings>,
}

impl RecordStore for MemoryStore {
    fn load(&self) -> Result<Vec<FilterRule>, FilterError> {
        Ok(self.rules.read().unwrap().clone())
    }

    fn save(&self, rules: &[FilterRule]) -> Result<(), FilterError> {
        *self.rules.write().unwrap() = rules.to_vec();
        Ok(())
    }

    fn load_settings(&self) -> Result<Settings, FilterError> {
        Ok(*self.settings.read().unwrap())
    }

    fn save_settings(&self, settings: &Settings) -> Result<(), FilterError> {
        *self.settings.write().unwrap() = *settings;
        Ok(())
    }
}

/// File-backed store: `filters.json` and `settings.json` under a directory.
/// Missing files read as an empty rule list and default settings.
#[derive(Debug)]
pub struct JsonFileStore {
    rules_path: PathBuf,
    settings_path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            rules_path: dir.join("filters.json"),
            settings_path: dir.join("settings.json"),
        }
    }

    fn write_document<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), FilterError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(value)
            .map_err(|e| FilterError::Serialization(e.to_string()))?;
        fs::write(path, text)?;
        Ok(())
    }
}

impl RecordStore for JsonFileStore {
    fn load(&self) -> Result<Vec<FilterRule>, FilterError> {
        if !self.rules_path.exists() {
            return Ok(Vec::new());
        }
        let text = fs::read_to_string(&self.rules_path)?;
        let rules: Vec<FilterRule> =
            serde_json::from_str(&text).map_err(|e| FilterError::Serialization(e.to_string()))?;
        debug!("Loaded {} rules from {}", rules.len(), self.rules_path.display());
        Ok(rules)
    }

    fn save(&self, rules: &[FilterRule]) -> Result<(), FilterError> {
        Self::write_document(&self.rules_path, &rules)
    }

    fn load_settings(&self) -> Result<Settings, FilterError> {
        if !self.settings_path.exists() {
            return Ok(Settings::default());
        }
        let text = fs::read_to_string(&self.settings_path)?;
        serde_json::from_str(&text).map_err(|e| FilterError::Serialization(e.to_string()))
    }

    fn save_settings(&self, settings: &Settings) -> Result<(), FilterError> {
        Self::write_document(&self.settings_path, settings)
    }
}
