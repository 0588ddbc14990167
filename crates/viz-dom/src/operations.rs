//! DOM node utilities and the operation error taxonomy.
//!
//! Every helper is a stateless, synchronous, single-call operation on
//! nodes already present in (or absent from) a tree. "Node has no parent"
//! is a valid state, never an error: UI code calls these defensively.

use crate::{Document, NodeId};

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// A child value the factory cannot append; carries the serialized
    /// offending value. A programmer error at the call site.
    #[error("expected a node, string, false or null, got {0}")]
    InvalidChild(String),

    /// Node id outside the arena
    #[error("node not found: {0:?}")]
    NotFound(NodeId),

    /// Structural operation would create a cycle
    #[error("hierarchy request error")]
    HierarchyRequest,

    /// Reference node is not a child of the given parent
    #[error("node is not a child of the given parent")]
    NotAChild,

    /// Operation requires an element node
    #[error("not an element node")]
    NotAnElement,

    /// Selector text could not be parsed
    #[error("invalid selector: {0}")]
    InvalidSelector(String),
}

/// Detach a node from its parent; no-op when it has none.
pub fn remove(doc: &mut Document, node: NodeId) -> DomResult<()> {
    doc.tree_mut().detach(node)
}

/// Replace a node with `replacement` in the same position under its
/// parent; no-op when the node is detached.
pub fn replace_with(doc: &mut Document, node: NodeId, replacement: NodeId) -> DomResult<()> {
    doc.tree_mut().replace_with(node, replacement)
}

/// Remove every child, leaving the node attached but empty.
pub fn empty(doc: &mut Document, node: NodeId) -> DomResult<()> {
    doc.tree_mut().clear_children(node)
}

/// Force `display: none` on the inline style.
pub fn hide(doc: &mut Document, node: NodeId) -> DomResult<()> {
    let elem = doc.tree_mut().require_element_mut(node)?;
    elem.style.set_property("display", "none");
    Ok(())
}

/// Clear any inline display override, reverting the node to its
/// stylesheet-determined display. No prior inline value is restored.
pub fn show(doc: &mut Document, node: NodeId) -> DomResult<()> {
    let elem = doc.tree_mut().require_element_mut(node)?;
    elem.style.remove_property("display");
    Ok(())
}
