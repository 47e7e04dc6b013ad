use crate::error::{ConverterError, Result};
use crate::rate::RateProvider;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// Latest JPY-based rates from the open exchange-rate API
pub const DEFAULT_ENDPOINT: &str = "https://open.exchangerate-api.com/v6/latest/JPY";

/// Response body: only the rates table matters
#[derive(Debug, Deserialize)]
struct LatestRates {
    rates: HashMap<String, f64>,
}

/// Fetches the Yen-to-Euro rate over HTTPS
pub struct ExchangeRateApi {
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl ExchangeRateApi {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let endpoint = endpoint.into().trim().to_string();
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(ConverterError::Config(format!(
                "Invalid rate endpoint: must start with http:// or https://, got: '{}'",
                endpoint
            )));
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent(concat!("yen-to-euro/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ConverterError::RateFetchFailed(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { endpoint, client })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl RateProvider for ExchangeRateApi {
    fn fetch_rate(&self) -> Result<f64> {
        log::debug!("Fetching conversion rate from {}", self.endpoint);

        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .map_err(|e| ConverterError::RateFetchFailed(format!("Request to {} failed: {}", self.endpoint, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ConverterError::RateFetchFailed(format!(
                "{} answered with status {}",
                self.endpoint, status
            )));
        }

        let body = response
            .text()
            .map_err(|e| ConverterError::RateFetchFailed(format!("Failed to read response: {}", e)))?;
        parse_eur_rate(&body)
    }
}

/// Extract `rates.EUR` from a response body
pub fn parse_eur_rate(body: &str) -> Result<f64> {
    let latest: LatestRates = serde_json::from_str(body)
        .map_err(|e| ConverterError::RateFetchFailed(format!("Malformed rate response: {}", e)))?;
    latest
        .rates
        .get("EUR")
        .copied()
        .ok_or_else(|| ConverterError::RateFetchFailed("No EUR rate in response".to_string()))
}
