//! Viz DOM - Document Object Model
//!
//! Declarative element construction and manipulation over an arena-based
//! document tree. Calling code builds element trees from an attribute map
//! plus a variadic children list instead of imperative node assembly, then
//! uses the structural and geometry helpers on the constructed nodes.

mod attributes;
mod document;
mod factory;
mod geometry;
mod node;
mod operations;
mod query;
mod style;
mod tree;
mod value;

pub use attributes::AttrMap;
pub use document::Document;
pub use factory::{
    Attrs, FRAGMENT, a, canvas, create_element, div, input, label, li, link, ol, option, p, pre,
    select, span, style, ul,
};
pub use geometry::{ElementGeometry, Point, Rect, offset, position};
pub use node::{ClassList, ElementData, Node, NodeData, TextData};
pub use operations::{DomError, DomResult, empty, hide, remove, replace_with, show};
pub use query::{SelectorEngine, closest, matches, query_selector, query_selector_all};
pub use style::InlineStyle;
pub use tree::{Children, DomTree};
pub use value::Value;

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root node ID
    pub const ROOT: NodeId = NodeId(0);
    /// Sentinel meaning "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Whether this id refers to a real arena slot
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }
}
