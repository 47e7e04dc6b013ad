use crate::dom::document::{Document, NodeId};

/// Attribute set on the parent element of every handled currency mention
pub const MARKER_ATTRIBUTE: &str = "data-yen-to-euro-converted";

/// Check whether `node`'s parent element was already handled, marking it if not.
///
/// Returns `true` when the parent already carries a non-empty marker, in which
/// case nothing is written. Otherwise the marker is set and `false` is
/// returned. A node without a parent element cannot be marked and always
/// counts as not handled.
pub fn check_and_mark(doc: &mut Document, node: NodeId) -> bool {
    let Some(parent) = doc.parent_element(node) else {
        return false;
    };
    if is_marked(doc, parent) {
        return true;
    }
    doc.set_attribute(parent, MARKER_ATTRIBUTE, "true");
    false
}

/// Whether an element carries the marker
pub fn is_marked(doc: &Document, element: NodeId) -> bool {
    doc.get_attribute(element, MARKER_ATTRIBUTE)
        .is_some_and(|value| !value.is_empty())
}
