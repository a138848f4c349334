// src/infrastructure/session.rs
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, trace};

use crate::application::SessionStore;
use crate::domain::DomainError;

/// Session values persisted as a flat JSON object on disk.
///
/// Every write rewrites the whole file; the store only ever holds a handful
/// of short strings.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// `<data dir>/snappad/session.json`
    pub fn default_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir().context("Could not find data directory")?;
        Ok(data_dir.join("snappad").join("session.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<BTreeMap<String, String>, DomainError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path).map_err(|e| {
            DomainError::Storage(format!("Failed to read {}: {e}", self.path.display()))
        })?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(|e| {
            DomainError::Storage(format!("Corrupt session file {}: {e}", self.path.display()))
        })
    }

    fn write(&self, values: &BTreeMap<String, String>) -> Result<(), DomainError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                DomainError::Storage(format!("Failed to create {}: {e}", parent.display()))
            })?;
        }
        let json = serde_json::to_string_pretty(values)
            .map_err(|e| DomainError::Storage(format!("Failed to encode session: {e}")))?;
        fs::write(&self.path, json).map_err(|e| {
            DomainError::Storage(format!("Failed to write {}: {e}", self.path.display()))
        })
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.read()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), DomainError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut values = self.read()?;
        values.insert(key.to_string(), value.to_string());
        trace!(key, path = %self.path.display(), "Storing session value");
        self.write(&values)
    }

    fn remove(&self, key: &str) -> Result<(), DomainError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut values = self.read()?;
        if values.remove(key).is_some() {
            debug!(key, "Removed session value");
            self.write(&values)?;
        }
        Ok(())
    }
}
