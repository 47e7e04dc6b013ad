use crate::converter::{Converter, PassReport};
use crate::currency::ConversionContext;
use crate::dom::{Change, Document};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Event that asks for a fresh conversion pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trigger {
    /// The conversion rate became available
    Load,
    /// A click anywhere in the document
    Click,
    /// The DOM changed
    Mutation,
}

/// Page the orchestrator works on
pub trait Page {
    /// Capture the current DOM
    fn snapshot(&mut self) -> Result<Document>;

    /// Replay writes made to a snapshot onto the page
    fn apply(&mut self, doc: &Document, changes: &[Change]) -> Result<()>;

    /// Triggers that fired since the last poll
    fn poll_triggers(&mut self) -> Result<Vec<Trigger>>;
}

/// Queues triggers and runs one pass per trigger, never two at once
pub struct Orchestrator {
    converter: Option<Converter>,
    queue: VecDeque<Trigger>,
    observe_mutations: bool,
}

impl Orchestrator {
    pub fn new() -> Self {
        Self {
            converter: None,
            queue: VecDeque::new(),
            observe_mutations: true,
        }
    }

    /// Builder method: react to mutation triggers or drop them
    pub fn observe_mutations(mut self, observe: bool) -> Self {
        self.observe_mutations = observe;
        self
    }

    /// Builder method: start with a resolved rate
    pub fn with_context(mut self, context: ConversionContext) -> Self {
        self.set_context(context);
        self
    }

    /// Install the resolved rate; passes before this are no-ops
    pub fn set_context(&mut self, context: ConversionContext) {
        self.converter = Some(Converter::new(context));
    }

    pub fn is_ready(&self) -> bool {
        self.converter.is_some()
    }

    /// Triggers waiting to be processed
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Queue a trigger; identical pending triggers coalesce
    pub fn enqueue(&mut self, trigger: Trigger) {
        if trigger == Trigger::Mutation && !self.observe_mutations {
            return;
        }
        if !self.queue.contains(&trigger) {
            self.queue.push_back(trigger);
        }
    }

    /// Process queued triggers one at a time. Failures are logged and the
    /// queue keeps draining. Returns the number of triggers handled.
    pub fn process_pending(&mut self, page: &mut dyn Page) -> usize {
        let mut handled = 0;
        while let Some(trigger) = self.queue.pop_front() {
            handled += 1;
            match self.run_pass(trigger, page) {
                Ok(Some(report)) if report.annotated > 0 => {
                    log::info!("{:?} pass annotated {} amount(s)", trigger, report.annotated);
                }
                Ok(_) => {}
                Err(e) => log::warn!("{:?} pass failed: {}", trigger, e),
            }
        }
        handled
    }

    /// Snapshot the page, convert, and write the changes back.
    /// Returns `None` when no rate is available yet.
    pub fn run_pass(&self, trigger: Trigger, page: &mut dyn Page) -> Result<Option<PassReport>> {
        let Some(converter) = &self.converter else {
            log::debug!("{:?} ignored: conversion rate not available yet", trigger);
            return Ok(None);
        };

        let mut doc = page.snapshot()?;
        let report = converter.run_pass(&mut doc);
        let changes = doc.take_changes();
        if !changes.is_empty() {
            page.apply(&doc, &changes)?;
        }
        Ok(Some(report))
    }

    /// Poll the page for triggers and process them until `deadline`, or
    /// forever when there is none
    pub fn run(&mut self, page: &mut dyn Page, poll_interval: Duration, deadline: Option<Instant>) {
        loop {
            self.process_pending(page);

            if deadline.is_some_and(|d| Instant::now() >= d) {
                log::debug!("trigger loop reached its deadline");
                return;
            }

            std::thread::sleep(poll_interval);

            match page.poll_triggers() {
                Ok(triggers) => triggers.into_iter().for_each(|t| self.enqueue(t)),
                Err(e) => log::warn!("Failed to poll page triggers: {}", e),
            }
        }
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new()
    }
}

/// [`Page`] over an in-memory document, used for offline conversion and tests
#[derive(Debug, Clone)]
pub struct DocumentPage {
    document: Document,
    triggers: Vec<Trigger>,
    applied: usize,
}

impl DocumentPage {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            triggers: Vec::new(),
            applied: 0,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    /// Simulate a trigger firing on the page
    pub fn fire(&mut self, trigger: Trigger) {
        self.triggers.push(trigger);
    }

    /// Number of changes written to the page so far
    pub fn applied(&self) -> usize {
        self.applied
    }
}

impl Page for DocumentPage {
    fn snapshot(&mut self) -> Result<Document> {
        Ok(self.document.clone())
    }

    fn apply(&mut self, doc: &Document, changes: &[Change]) -> Result<()> {
        // Snapshots are clones of this document, so node ids line up
        debug_assert_eq!(doc.len(), self.document.len());
        for change in changes {
            match change {
                Change::Text { node, value, previous } => {
                    // rewritten since the snapshot
                    if self.document.text(*node) != Some(previous.as_str()) {
                        log::debug!("text of {:?} changed since snapshot, not overwriting", node);
                        continue;
                    }
                    self.document.set_text(*node, value.as_str());
                }
                Change::Attribute { node, name, value } => {
                    self.document.set_attribute(*node, name.as_str(), value.as_str());
                }
            }
            self.applied += 1;
        }
        self.document.take_changes();
        Ok(())
    }

    fn poll_triggers(&mut self) -> Result<Vec<Trigger>> {
        Ok(std::mem::take(&mut self.triggers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::RateSource;

    fn page_with(text: &str) -> DocumentPage {
        let mut doc = Document::new("body");
        let root = doc.root();
        doc.append_element_with_text(root, "p", text);
        DocumentPage::new(doc)
    }

    fn context() -> ConversionContext {
        ConversionContext::new(0.00577, RateSource::Override).unwrap()
    }

    #[test]
    fn test_no_rate_means_no_op() {
        let mut page = page_with("¥1,234");
        let mut orchestrator = Orchestrator::new();
        orchestrator.enqueue(Trigger::Click);

        assert_eq!(orchestrator.process_pending(&mut page), 1);
        assert_eq!(page.applied(), 0);
        assert!(!orchestrator.is_ready());
    }

    #[test]
    fn test_load_pass_applies_changes() {
        let mut page = page_with("¥1,234");
        let mut orchestrator = Orchestrator::new().with_context(context());
        orchestrator.enqueue(Trigger::Load);
        orchestrator.process_pending(&mut page);

        // marker attribute + text
        assert_eq!(page.applied(), 2);
        let root = page.document().root();
        assert_eq!(page.document().text_content(root), "(7,12\u{a0}€) ¥1,234");
    }

    #[test]
    fn test_repeated_triggers_are_idempotent() {
        let mut page = page_with("¥1,234");
        let mut orchestrator = Orchestrator::new().with_context(context());
        for trigger in [Trigger::Load, Trigger::Click, Trigger::Mutation] {
            orchestrator.enqueue(trigger);
            orchestrator.process_pending(&mut page);
        }

        assert_eq!(page.applied(), 2);
    }

    #[test]
    fn test_coalescing_and_disabled_mutations() {
        let mut orchestrator = Orchestrator::new().observe_mutations(false);
        orchestrator.enqueue(Trigger::Click);
        orchestrator.enqueue(Trigger::Click);
        orchestrator.enqueue(Trigger::Mutation);
        assert_eq!(orchestrator.pending(), 1);

        let mut observing = Orchestrator::new();
        observing.enqueue(Trigger::Mutation);
        observing.enqueue(Trigger::Click);
        observing.enqueue(Trigger::Mutation);
        assert_eq!(observing.pending(), 2);
    }

    #[test]
    fn test_run_until_deadline_picks_up_fired_triggers() {
        let mut page = page_with("¥1,000");
        page.fire(Trigger::Click);
        let mut orchestrator = Orchestrator::new().with_context(context());

        let deadline = Instant::now() + Duration::from_millis(30);
        orchestrator.run(&mut page, Duration::from_millis(5), Some(deadline));

        let root = page.document().root();
        assert!(page.document().text_content(root).starts_with("(5,77\u{a0}€)"));
    }

    #[test]
    fn test_text_rewritten_after_snapshot_is_kept() {
        let mut page = page_with("¥1,000");
        let mut snapshot = page.snapshot().unwrap();
        Converter::new(context()).run_pass(&mut snapshot);
        let changes = snapshot.take_changes();

        // the page updates the price before the annotation lands
        let p = page.document.children(page.document.root())[0];
        let text = page.document.children(p)[0];
        page.document.set_text(text, "¥2,000");
        page.apply(&snapshot, &changes).unwrap();

        assert_eq!(page.document().text(text), Some("¥2,000"));
        assert_eq!(page.document().get_attribute(p, crate::dom::MARKER_ATTRIBUTE), Some("true"));
        assert_eq!(page.applied(), 1);
    }

    #[test]
    fn test_trigger_serde() {
        let triggers: Vec<Trigger> = serde_json::from_str(r#"["click","mutation","load"]"#).unwrap();
        assert_eq!(triggers, vec![Trigger::Click, Trigger::Mutation, Trigger::Load]);
    }
}
