//! Yen token detection and Euro conversion

pub mod format;
pub mod matcher;

pub use format::format_euro;
pub use matcher::{TokenMatch, YEN_SYMBOL, match_window, parse_amount};

use crate::error::{ConverterError, Result};

/// Where a conversion rate came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateSource {
    /// Cached entry from today
    Cache,
    /// Freshly fetched from the exchange-rate service
    Fetched,
    /// Fixed default after a failure
    Fallback,
    /// Set explicitly by the caller
    Override,
}

/// Yen-to-Euro rate handed to every conversion pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionContext {
    rate: f64,
    source: RateSource,
}

impl ConversionContext {
    /// Context built from [`DEFAULT_RATE`](crate::rate::DEFAULT_RATE)
    pub const FALLBACK: ConversionContext = ConversionContext {
        rate: crate::rate::DEFAULT_RATE,
        source: RateSource::Fallback,
    };

    /// Create a context, rejecting rates that are not positive and finite
    pub fn new(rate: f64, source: RateSource) -> Result<Self> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(ConverterError::InvalidRate(rate));
        }
        Ok(Self { rate, source })
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn source(&self) -> RateSource {
        self.source
    }

    /// Convert a Yen amount to Euro
    pub fn convert(&self, yen: f64) -> f64 {
        yen * self.rate
    }

    /// Convert and format a Yen amount, e.g. `7,12 €`; `None` when the
    /// result has no finite Euro value
    pub fn euro_string(&self, yen: f64) -> Option<String> {
        format_euro(self.convert(yen))
    }
}
