use crate::error::{ConverterError, Result};
use crate::rate::{DEFAULT_ENDPOINT, DEFAULT_RATE, STORAGE_KEY};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings for rate resolution and the trigger loop
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConverterConfig {
    /// Exchange-rate endpoint returning `{"rates": {"EUR": ...}}`
    pub rate_endpoint: String,

    /// Rate used when fetching fails
    pub default_rate: f64,

    /// Key of the cached rate entry
    pub storage_key: String,

    /// JSON file for the rate cache; the page's localStorage when unset
    pub cache_path: Option<PathBuf>,

    /// Re-run the pass on DOM mutations
    pub observe_mutations: bool,

    /// How often the live page is polled for triggers
    pub poll_interval_ms: u64,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            rate_endpoint: DEFAULT_ENDPOINT.to_string(),
            default_rate: DEFAULT_RATE,
            storage_key: STORAGE_KEY.to_string(),
            cache_path: None,
            observe_mutations: true,
            poll_interval_ms: 250,
        }
    }
}

impl ConverterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config from a JSON file; missing fields take default values
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConverterError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            ConverterError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.default_rate.is_finite() || self.default_rate <= 0.0 {
            return Err(ConverterError::Config(format!(
                "default_rate must be a positive number, got {}",
                self.default_rate
            )));
        }
        if self.storage_key.is_empty() {
            return Err(ConverterError::Config("storage_key must not be empty".to_string()));
        }
        if self.poll_interval_ms == 0 {
            return Err(ConverterError::Config("poll_interval_ms must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn rate_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.rate_endpoint = endpoint.into();
        self
    }

    pub fn default_rate(mut self, rate: f64) -> Self {
        self.default_rate = rate;
        self
    }

    pub fn cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_path = Some(path.into());
        self
    }

    pub fn observe_mutations(mut self, observe: bool) -> Self {
        self.observe_mutations = observe;
        self
    }

    pub fn poll_interval_ms(mut self, interval: u64) -> Self {
        self.poll_interval_ms = interval;
        self
    }
}
