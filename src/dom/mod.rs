//! DOM model and traversal
//!
//! This module provides the in-process view of a page that the conversion
//! pass works on. It includes:
//! - Document: arena tree of element, text and comment nodes with a change log
//! - SnapshotNode: flat, document-order serialized form exchanged with the live page
//! - Text node enumeration, the sideways-and-up walker and the idempotency marker

pub mod document;
pub mod marker;
pub mod snapshot;
pub mod text_nodes;
pub mod walker;

pub use document::{Change, Document, ElementData, NodeId, NodeKind};
pub use marker::{MARKER_ATTRIBUTE, check_and_mark};
pub use snapshot::{SnapshotKind, SnapshotNode};
pub use text_nodes::{TextNodeCursor, text_nodes};
pub use walker::{Direction, Growth, MAX_GROWTH_STEPS, WalkOutcome, walk};
