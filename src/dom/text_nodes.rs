use crate::dom::document::{Document, NodeId};

/// Pre-order cursor over the text nodes of a subtree
///
/// The cursor only holds node ids, so the document may be written to
/// between steps as long as its structure stays the same.
#[derive(Debug, Clone)]
pub struct TextNodeCursor {
    stack: Vec<NodeId>,
}

impl TextNodeCursor {
    pub fn new(root: NodeId) -> Self {
        Self { stack: vec![root] }
    }

    /// Advance to the next text node in document order
    pub fn next(&mut self, doc: &Document) -> Option<NodeId> {
        while let Some(node) = self.stack.pop() {
            if doc.is_text(node) {
                return Some(node);
            }
            self.stack.extend(doc.children(node).iter().rev().copied());
        }
        None
    }
}

/// Iterator form of [`TextNodeCursor`], borrowing the document
pub struct TextNodes<'a> {
    doc: &'a Document,
    cursor: TextNodeCursor,
}

impl Iterator for TextNodes<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        self.cursor.next(self.doc)
    }
}

/// Every text node under `root` (inclusive), in document order
pub fn text_nodes(doc: &Document, root: NodeId) -> TextNodes<'_> {
    TextNodes {
        doc,
        cursor: TextNodeCursor::new(root),
    }
}
