use crate::error::{ConverterError, Result};
use crate::rate::RateStore;
use headless_chrome::Tab;
use std::sync::Arc;

/// Rate store backed by the page's `localStorage`
///
/// Entries are scoped to the origin of the page currently loaded in the tab.
pub struct LocalStorageStore {
    tab: Arc<Tab>,
}

impl LocalStorageStore {
    pub fn new(tab: Arc<Tab>) -> Self {
        Self { tab }
    }

    fn evaluate(&self, js: &str) -> Result<Option<serde_json::Value>> {
        let result = self
            .tab
            .evaluate(js, false)
            .map_err(|e| ConverterError::Storage(format!("localStorage unavailable: {}", e)))?;
        Ok(result.value)
    }
}

impl RateStore for LocalStorageStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let js = format!("localStorage.getItem({})", serde_json::to_string(key)?);
        Ok(self
            .evaluate(&js)?
            .and_then(|value| value.as_str().map(str::to_string)))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let js = format!(
            "(function() {{ localStorage.setItem({}, {}); return true; }})()",
            serde_json::to_string(key)?,
            serde_json::to_string(value)?
        );
        match self.evaluate(&js)? {
            Some(serde_json::Value::Bool(true)) => Ok(()),
            other => Err(ConverterError::Storage(format!("localStorage.setItem returned {:?}", other))),
        }
    }
}
