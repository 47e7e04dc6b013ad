//! Conversion rate resolution
//!
//! The rate is fetched at most once per UTC day and cached in a [`RateStore`]
//! under [`STORAGE_KEY`]. Any failure along the way (store read, fetch, store
//! write) is logged and resolved to [`DEFAULT_RATE`].

pub mod exchange_api;
pub mod store;

pub use exchange_api::{DEFAULT_ENDPOINT, ExchangeRateApi};
pub use store::{CachedRate, JsonFileStore, MemoryStore, RateStore, STORAGE_KEY};

use crate::currency::{ConversionContext, RateSource};
use crate::error::{ConverterError, Result};

/// Yen-to-Euro rate used when no fresh rate can be obtained
pub const DEFAULT_RATE: f64 = 0.00577;

/// Source of the current Yen-to-Euro rate
pub trait RateProvider {
    fn fetch_rate(&self) -> Result<f64>;
}

/// Provider that always answers with the same rate
#[derive(Debug, Clone, Copy)]
pub struct FixedRate(pub f64);

impl RateProvider for FixedRate {
    fn fetch_rate(&self) -> Result<f64> {
        Ok(self.0)
    }
}

/// Today's date as used for cache keys (`YYYY-MM-DD`, UTC)
pub fn today() -> String {
    chrono::Utc::now().format("%Y-%m-%d").to_string()
}

/// Resolves the conversion context from a provider and a cache store
pub struct RateResolver<'a> {
    provider: &'a dyn RateProvider,
    store: &'a dyn RateStore,
    key: String,
    default_rate: f64,
}

impl<'a> RateResolver<'a> {
    pub fn new(provider: &'a dyn RateProvider, store: &'a dyn RateStore) -> Self {
        Self {
            provider,
            store,
            key: STORAGE_KEY.to_string(),
            default_rate: DEFAULT_RATE,
        }
    }

    /// Builder method: set the storage key
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Builder method: set the fallback rate
    pub fn default_rate(mut self, rate: f64) -> Self {
        self.default_rate = rate;
        self
    }

    /// Resolve the rate for `today`, falling back to the default on any failure
    pub fn resolve(&self, today: &str) -> ConversionContext {
        match self.try_resolve(today) {
            Ok(context) => {
                log::info!("Using conversion rate {} ({:?})", context.rate(), context.source());
                context
            }
            Err(e) => {
                log::warn!("Falling back to default conversion rate {}: {}", self.default_rate, e);
                self.fallback()
            }
        }
    }

    fn fallback(&self) -> ConversionContext {
        ConversionContext::new(self.default_rate, RateSource::Fallback).unwrap_or(ConversionContext::FALLBACK)
    }

    fn try_resolve(&self, today: &str) -> Result<ConversionContext> {
        let mut cached: CachedRate = match self.store.get(&self.key)? {
            Some(json) => serde_json::from_str(&json)
                .map_err(|e| ConverterError::Storage(format!("Corrupt cached rate: {}", e)))?,
            None => CachedRate::default(),
        };

        if let Some(rate) = cached.valid_for(today) {
            return ConversionContext::new(rate, RateSource::Cache);
        }

        let rate = self.provider.fetch_rate()?;
        let context = ConversionContext::new(rate, RateSource::Fetched)?;
        cached.rate = Some(rate);
        cached.day = Some(today.to_string());
        self.store.set(&self.key, &serde_json::to_string(&cached)?)?;
        Ok(context)
    }
}
