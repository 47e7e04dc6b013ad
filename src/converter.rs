use crate::currency::{ConversionContext, TokenMatch, YEN_SYMBOL, match_window};
use crate::dom::{
    Direction, Document, Growth, NodeId, NodeKind, TextNodeCursor, WalkOutcome, check_and_mark,
    text_nodes, walk,
};
use serde::Serialize;

/// Tags whose text is never rendered and never scanned
pub const NON_VISIBLE_TAGS: [&str; 3] = ["script", "style", "noscript"];

/// Counters for one conversion pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PassReport {
    /// Text nodes visited
    pub scanned: usize,
    /// Text nodes containing the Yen sign
    pub candidates: usize,
    /// Candidates inside script/style/noscript
    pub skipped_non_visible: usize,
    /// Candidates whose parent was already marked
    pub already_marked: usize,
    /// Candidates that received an annotation
    pub annotated: usize,
    /// Candidates searched in both directions without finding an amount
    pub unmatched: usize,
}

/// Runs scan-and-annotate passes with a fixed conversion context
#[derive(Debug, Clone)]
pub struct Converter {
    context: ConversionContext,
}

impl Converter {
    pub fn new(context: ConversionContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &ConversionContext {
        &self.context
    }

    /// Scan every text node under the document body and annotate Yen amounts
    pub fn run_pass(&self, doc: &mut Document) -> PassReport {
        let mut report = PassReport::default();
        let mut cursor = TextNodeCursor::new(doc.body());

        while let Some(node) = cursor.next(doc) {
            report.scanned += 1;
            if !doc.text(node).is_some_and(|text| text.contains(YEN_SYMBOL)) {
                continue;
            }
            report.candidates += 1;

            if is_non_visible(doc, node) {
                report.skipped_non_visible += 1;
                continue;
            }
            if check_and_mark(doc, node) {
                report.already_marked += 1;
                continue;
            }

            if self.annotate(doc, node) {
                report.annotated += 1;
            } else {
                report.unmatched += 1;
            }
        }

        log::debug!("conversion pass finished: {:?}", report);
        report
    }

    /// Search forward, then backward, for the amount belonging to the Yen
    /// sign in `node`, and write the annotation into `node` on success
    fn annotate(&self, doc: &mut Document, node: NodeId) -> bool {
        let (amount, direction) = match self.search(doc, node, Direction::Forward) {
            Some(amount) => (amount, Direction::Forward),
            None => match self.search(doc, node, Direction::Backward) {
                Some(amount) => (amount, Direction::Backward),
                None => return false,
            },
        };

        let Some(euro) = self.context.euro_string(amount) else {
            log::debug!("¥{} has no finite Euro value", amount);
            return false;
        };
        let original = doc.text(node).unwrap_or_default();
        let annotated = match direction {
            Direction::Forward => format!("({euro}) {original}"),
            Direction::Backward => format!("{original} ({euro})"),
        };
        log::info!("annotating ¥{} as {}", amount, euro);
        doc.set_text(node, annotated)
    }

    fn search(&self, doc: &Document, node: NodeId, direction: Direction) -> Option<f64> {
        // best amount so far for a number that may continue in the next node
        let mut unfinished = None;
        let outcome = walk(doc, node, direction, |window| {
            let text = window_text(doc, window, node, direction);
            match match_window(&text, direction) {
                TokenMatch::Amount(amount) => Growth::Found(amount),
                TokenMatch::Unfinished(amount) => {
                    unfinished = Some(amount);
                    Growth::KeepGoing
                }
                TokenMatch::NotAnAmount => Growth::Stop,
                TokenMatch::Incomplete => Growth::KeepGoing,
            }
        });
        match outcome {
            WalkOutcome::Found(amount) => Some(amount),
            other => {
                log::debug!("{:?} search from {:?} ended: {:?}", direction, node, other);
                unfinished
            }
        }
    }
}

/// Concatenated text of a window, clipped to the search side of `start`.
///
/// After a climb the window begins (forward) or ends (backward) with an
/// ancestor of `start`; only the text from `start` onwards, or up to and
/// including `start`, belongs to the search.
fn window_text(doc: &Document, window: &[NodeId], start: NodeId, direction: Direction) -> String {
    let mut out = String::new();
    let last = window.len().saturating_sub(1);

    for (i, &node) in window.iter().enumerate() {
        if let NodeKind::Comment(data) = doc.kind(node) {
            out.push_str(data);
            continue;
        }
        let clip = match direction {
            Direction::Forward => i == 0,
            Direction::Backward => i == last,
        };
        if !clip {
            out.push_str(&doc.text_content(node));
            continue;
        }

        let mut reached = false;
        for text_node in text_nodes(doc, node) {
            reached |= text_node == start;
            let keep = match direction {
                Direction::Forward => reached,
                Direction::Backward => true,
            };
            if keep {
                out.push_str(doc.text(text_node).unwrap_or_default());
            }
            if reached && direction == Direction::Backward {
                break;
            }
        }
    }
    out
}

fn is_non_visible(doc: &Document, node: NodeId) -> bool {
    doc.parent_element(node)
        .and_then(|parent| doc.tag_name(parent))
        .is_some_and(|tag| NON_VISIBLE_TAGS.iter().any(|t| tag.eq_ignore_ascii_case(t)))
}
