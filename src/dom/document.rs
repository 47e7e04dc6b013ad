use crate::dom::text_nodes::text_nodes;
use std::collections::HashMap;

/// Handle to a node inside a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in the document arena
    pub fn index(self) -> usize {
        self.0
    }
}

/// Element payload: tag name and attributes
#[derive(Debug, Clone, PartialEq)]
pub struct ElementData {
    /// Lower-case HTML tag name (e.g., "div", "span", "script")
    pub tag_name: String,

    /// Element attributes (e.g., id, class, data-*)
    pub attributes: HashMap<String, String>,
}

/// What a node holds
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Element(ElementData),
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    dom_id: Option<u64>,
}

/// A write made to the document, kept so it can be replayed on the live page
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    /// `previous` is the value the node held before the write
    Text { node: NodeId, value: String, previous: String },
    Attribute { node: NodeId, name: String, value: String },
}

impl Change {
    /// The node the change applies to
    pub fn node(&self) -> NodeId {
        match self {
            Change::Text { node, .. } | Change::Attribute { node, .. } => *node,
        }
    }
}

/// Arena-backed DOM tree with parent links and a change log
///
/// Nodes are never removed. Text and attribute writes go through
/// [`Document::set_text`] and [`Document::set_attribute`], which record a
/// [`Change`] for each write.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    changes: Vec<Change>,
}

impl Document {
    /// Create a document whose root is an element with the given tag
    pub fn new(root_tag: impl Into<String>) -> Self {
        let root = Node {
            kind: NodeKind::Element(ElementData {
                tag_name: root_tag.into().to_ascii_lowercase(),
                attributes: HashMap::new(),
            }),
            parent: None,
            children: Vec::new(),
            dom_id: None,
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
            changes: Vec::new(),
        }
    }

    /// Root node of the document
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes in the arena
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn push(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: Some(parent),
            children: Vec::new(),
            dom_id: None,
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Append an element as the last child of `parent`
    pub fn append_element(&mut self, parent: NodeId, tag_name: impl Into<String>) -> NodeId {
        self.push(
            parent,
            NodeKind::Element(ElementData {
                tag_name: tag_name.into().to_ascii_lowercase(),
                attributes: HashMap::new(),
            }),
        )
    }

    /// Append a text node as the last child of `parent`
    pub fn append_text(&mut self, parent: NodeId, text: impl Into<String>) -> NodeId {
        self.push(parent, NodeKind::Text(text.into()))
    }

    /// Append a comment node as the last child of `parent`
    pub fn append_comment(&mut self, parent: NodeId, data: impl Into<String>) -> NodeId {
        self.push(parent, NodeKind::Comment(data.into()))
    }

    /// Builder helper: append `<tag>text</tag>` under `parent` and return the element
    pub fn append_element_with_text(
        &mut self,
        parent: NodeId,
        tag_name: impl Into<String>,
        text: impl Into<String>,
    ) -> NodeId {
        let element = self.append_element(parent, tag_name);
        self.append_text(element, text);
        element
    }

    pub fn kind(&self, node: NodeId) -> &NodeKind {
        &self.nodes[node.0].kind
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    /// Parent if it is an element
    pub fn parent_element(&self, node: NodeId) -> Option<NodeId> {
        self.parent(node).filter(|&parent| self.is_element(parent))
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    fn position_in_parent(&self, node: NodeId) -> Option<(NodeId, usize)> {
        let parent = self.parent(node)?;
        let position = self.nodes[parent.0].children.iter().position(|&c| c == node)?;
        Some((parent, position))
    }

    pub fn previous_sibling(&self, node: NodeId) -> Option<NodeId> {
        let (parent, position) = self.position_in_parent(node)?;
        position
            .checked_sub(1)
            .map(|previous| self.nodes[parent.0].children[previous])
    }

    pub fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        let (parent, position) = self.position_in_parent(node)?;
        self.nodes[parent.0].children.get(position + 1).copied()
    }

    pub fn is_element(&self, node: NodeId) -> bool {
        matches!(self.kind(node), NodeKind::Element(_))
    }

    pub fn is_text(&self, node: NodeId) -> bool {
        matches!(self.kind(node), NodeKind::Text(_))
    }

    fn element(&self, node: NodeId) -> Option<&ElementData> {
        match self.kind(node) {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Tag name of an element node
    pub fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|e| e.tag_name.as_str())
    }

    /// Check if node is an element with a specific tag
    pub fn is_tag(&self, node: NodeId, tag: &str) -> bool {
        self.tag_name(node).is_some_and(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Get attribute value by name
    pub fn get_attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)
            .and_then(|e| e.attributes.get(name))
            .map(String::as_str)
    }

    /// Set an attribute on an element and record the change.
    /// Returns false when `node` is not an element.
    pub fn set_attribute(
        &mut self,
        node: NodeId,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> bool {
        let NodeKind::Element(element) = &mut self.nodes[node.0].kind else {
            return false;
        };
        let (name, value) = (name.into(), value.into());
        element.attributes.insert(name.clone(), value.clone());
        self.changes.push(Change::Attribute { node, name, value });
        true
    }

    /// Value of a text node
    pub fn text(&self, node: NodeId) -> Option<&str> {
        match self.kind(node) {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Replace the value of a text node and record the change.
    /// Returns false when `node` is not a text node.
    pub fn set_text(&mut self, node: NodeId, value: impl Into<String>) -> bool {
        let NodeKind::Text(text) = &mut self.nodes[node.0].kind else {
            return false;
        };
        let value = value.into();
        let previous = std::mem::replace(text, value.clone());
        self.changes.push(Change::Text { node, value, previous });
        true
    }

    /// Rendered text of a node: its own value for text and comment nodes,
    /// the concatenation of every descendant text node for elements
    pub fn text_content(&self, node: NodeId) -> String {
        match self.kind(node) {
            NodeKind::Text(text) | NodeKind::Comment(text) => text.clone(),
            NodeKind::Element(_) => text_nodes(self, node)
                .filter_map(|text| self.text(text))
                .collect(),
        }
    }

    /// First `<body>` element in document order, or the root when there is none
    pub fn body(&self) -> NodeId {
        let mut stack = vec![self.root];
        while let Some(node) = stack.pop() {
            if self.is_tag(node, "body") {
                return node;
            }
            stack.extend(self.children(node).iter().rev().copied());
        }
        self.root
    }

    /// Live-page handle the node was captured from, if any
    pub fn dom_id(&self, node: NodeId) -> Option<u64> {
        self.nodes[node.0].dom_id
    }

    pub(crate) fn set_dom_id(&mut self, node: NodeId, dom_id: u64) {
        self.nodes[node.0].dom_id = Some(dom_id);
    }

    pub(crate) fn set_attribute_silently(&mut self, node: NodeId, name: String, value: String) {
        if let NodeKind::Element(element) = &mut self.nodes[node.0].kind {
            element.attributes.insert(name, value);
        }
    }

    /// Changes recorded since the last call to [`Document::take_changes`]
    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    /// Drain the change log
    pub fn take_changes(&mut self) -> Vec<Change> {
        std::mem::take(&mut self.changes)
    }
}
