use crate::dom::document::{Document, NodeId, NodeKind};
use crate::error::{ConverterError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One node of a serialized page subtree, as produced by the snapshot script
///
/// A snapshot is a flat list in document order. The first entry is the root
/// element; every later entry names its parent by position in the list, and
/// siblings appear in child order. The list keeps the JSON nesting constant
/// however deep the page is.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SnapshotNode {
    /// Page-side node handle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    /// Position of the parent entry; absent only on the root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<usize>,

    #[serde(flatten)]
    pub kind: SnapshotKind,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SnapshotKind {
    Element {
        /// HTML tag name
        tag: String,

        #[serde(default, skip_serializing_if = "HashMap::is_empty")]
        attributes: HashMap<String, String>,
    },
    Text {
        text: String,
    },
    Comment {
        text: String,
    },
}

impl Document {
    /// Build a document from a snapshot list whose first entry is an element
    pub fn from_snapshot(snapshot: &[SnapshotNode]) -> Result<Self> {
        let (first, rest) = snapshot
            .split_first()
            .ok_or_else(|| ConverterError::SnapshotFailed("snapshot is empty".to_string()))?;
        let SnapshotKind::Element { tag, attributes } = &first.kind else {
            return Err(ConverterError::SnapshotFailed(
                "snapshot root is not an element".to_string(),
            ));
        };
        if first.parent.is_some() {
            return Err(ConverterError::SnapshotFailed("snapshot root has a parent".to_string()));
        }

        let mut doc = Document::new(tag.as_str());
        let root = doc.root();
        doc.fill_element(root, first.id, attributes);

        // nodes[i] is the document node built from entry i
        let mut nodes = Vec::with_capacity(snapshot.len());
        nodes.push(root);

        for (index, entry) in rest.iter().enumerate() {
            let index = index + 1;
            let parent = entry
                .parent
                .and_then(|parent| nodes.get(parent).copied())
                .filter(|&parent| doc.is_element(parent))
                .ok_or_else(|| {
                    ConverterError::SnapshotFailed(format!(
                        "entry {} has no preceding element as parent",
                        index
                    ))
                })?;

            let node = match &entry.kind {
                SnapshotKind::Element { tag, attributes } => {
                    let node = doc.append_element(parent, tag.as_str());
                    doc.fill_element(node, entry.id, attributes);
                    node
                }
                SnapshotKind::Text { text } => doc.append_text(parent, text.as_str()),
                SnapshotKind::Comment { text } => doc.append_comment(parent, text.as_str()),
            };
            if let Some(id) = entry.id {
                doc.set_dom_id(node, id);
            }
            nodes.push(node);
        }
        Ok(doc)
    }

    fn fill_element(&mut self, node: NodeId, id: Option<u64>, attributes: &HashMap<String, String>) {
        if let Some(id) = id {
            self.set_dom_id(node, id);
        }
        for (name, value) in attributes {
            self.set_attribute_silently(node, name.clone(), value.clone());
        }
    }

    /// Serialize the whole document in document order
    pub fn to_snapshot(&self) -> Vec<SnapshotNode> {
        let mut out = Vec::with_capacity(self.len());
        let mut stack = vec![(self.root(), None)];

        while let Some((node, parent)) = stack.pop() {
            let index = out.len();
            let kind = match self.kind(node) {
                NodeKind::Element(element) => SnapshotKind::Element {
                    tag: element.tag_name.clone(),
                    attributes: element.attributes.clone(),
                },
                NodeKind::Text(text) => SnapshotKind::Text { text: text.clone() },
                NodeKind::Comment(text) => SnapshotKind::Comment { text: text.clone() },
            };
            out.push(SnapshotNode { id: self.dom_id(node), parent, kind });
            stack.extend(self.children(node).iter().rev().map(|&child| (child, Some(index))));
        }
        out
    }

    /// Parse a document from snapshot JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: Vec<SnapshotNode> = serde_json::from_str(json)?;
        Self::from_snapshot(&snapshot)
    }

    /// Convert the document to pretty snapshot JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_snapshot())?)
    }
}
