use crate::dom::{Change, Document};
use crate::error::{ConverterError, Result};
use crate::orchestrator::{Page, Trigger};
use headless_chrome::Tab;
use serde::Serialize;
use std::sync::Arc;

const SNAPSHOT_JS: &str = include_str!("snapshot.js");
const APPLY_JS: &str = include_str!("apply.js");
const TRIGGERS_JS: &str = include_str!("triggers.js");

// Drains the pending counters; `null` means the listeners are gone (reload)
const POLL_JS: &str = r#"
    (function() {
        const pending = window.__yenToEuroTriggers;
        if (!pending) return "null";
        const fired = [];
        if (pending.click) fired.push("click");
        if (pending.mutation) fired.push("mutation");
        pending.click = 0;
        pending.mutation = 0;
        return JSON.stringify(fired);
    })()
"#;

/// A change addressed by the page-side node handle
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum PagePatch<'a> {
    /// Skipped on the page when the node no longer holds `previous`
    Text { id: u64, value: &'a str, previous: &'a str },
    Attribute { id: u64, name: &'a str, value: &'a str },
}

fn patches<'a>(doc: &Document, changes: &'a [Change]) -> Vec<PagePatch<'a>> {
    changes
        .iter()
        .filter_map(|change| {
            let id = doc.dom_id(change.node())?;
            Some(match change {
                Change::Text { value, previous, .. } => PagePatch::Text { id, value, previous },
                Change::Attribute { name, value, .. } => PagePatch::Attribute { id, name, value },
            })
        })
        .collect()
}

/// [`Page`] backed by a Chrome tab
pub struct LivePage {
    tab: Arc<Tab>,
    observe_mutations: bool,
}

impl LivePage {
    pub fn new(tab: Arc<Tab>, observe_mutations: bool) -> Self {
        Self { tab, observe_mutations }
    }

    pub fn tab(&self) -> &Arc<Tab> {
        &self.tab
    }

    fn evaluate(&self, js: &str) -> Result<serde_json::Value> {
        let result = self
            .tab
            .evaluate(js, false)
            .map_err(|e| ConverterError::EvaluationFailed(e.to_string()))?;
        result
            .value
            .ok_or_else(|| ConverterError::EvaluationFailed("No value returned from page".to_string()))
    }

    /// Register the click listener and, if enabled, the mutation observer.
    /// Returns false when they were already installed on this document.
    pub fn install_triggers(&self) -> Result<bool> {
        let js = format!("({})({})", TRIGGERS_JS.trim(), self.observe_mutations);
        let installed = self.evaluate(&js)?.as_bool().unwrap_or(false);
        if installed {
            log::debug!("Installed page triggers (mutations: {})", self.observe_mutations);
        }
        Ok(installed)
    }
}

impl Page for LivePage {
    fn snapshot(&mut self) -> Result<Document> {
        let value = self
            .evaluate(SNAPSHOT_JS)
            .map_err(|e| ConverterError::SnapshotFailed(e.to_string()))?;

        // The script returns a JSON string, so we need to parse it as a string first
        let json = value
            .as_str()
            .ok_or_else(|| ConverterError::SnapshotFailed("Snapshot is not a string".to_string()))?;

        Document::from_json(json).map_err(|e| ConverterError::SnapshotFailed(e.to_string()))
    }

    fn apply(&mut self, doc: &Document, changes: &[Change]) -> Result<()> {
        let patches = patches(doc, changes);
        if patches.is_empty() {
            return Ok(());
        }

        let js = format!("({})({})", APPLY_JS.trim(), serde_json::to_string(&patches)?);
        let applied = self
            .evaluate(&js)
            .map_err(|e| ConverterError::ApplyFailed(e.to_string()))?
            .as_u64()
            .unwrap_or(0);

        if applied < patches.len() as u64 {
            log::debug!("{} of {} changes skipped (nodes gone)", patches.len() as u64 - applied, patches.len());
        }
        Ok(())
    }

    fn poll_triggers(&mut self) -> Result<Vec<Trigger>> {
        let value = self.evaluate(POLL_JS)?;
        let json = value.as_str().unwrap_or("null");

        if json == "null" {
            // New document: listeners are gone and nothing was converted yet
            return Ok(if self.install_triggers()? { vec![Trigger::Load] } else { Vec::new() });
        }

        Ok(serde_json::from_str(json)?)
    }
}
