use crate::error::{ConverterError, Result};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// Key under which the cached rate is stored
pub const STORAGE_KEY: &str = "yenUserscript";

/// Cached rate entry, stored as JSON under [`STORAGE_KEY`]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CachedRate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,

    /// UTC day the rate was fetched, `YYYY-MM-DD`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<String>,
}

impl CachedRate {
    /// The cached rate if it was fetched on `today`
    pub fn valid_for(&self, today: &str) -> Option<f64> {
        match (self.rate, self.day.as_deref()) {
            (Some(rate), Some(day)) if day == today && rate != 0.0 => Some(rate),
            _ => None,
        }
    }
}

/// String key/value store with durable semantics
pub trait RateStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Store kept in memory, mostly for tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RateStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store backed by a JSON object in a file; a missing file is an empty store
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => serde_json::from_str(&content).map_err(|e| {
                ConverterError::Storage(format!("Corrupt store {}: {}", self.path.display(), e))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl RateStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(&entries)?)?;
        Ok(())
    }
}
