//! DOM node data.
//!
//! Nodes live in an arena and reference each other by `NodeId` (4 bytes)
//! instead of pointers; sibling links give O(1) append and removal.

use crate::NodeId;
use crate::attributes::AttrMap;
use crate::geometry::ElementGeometry;
use crate::style::InlineStyle;

/// A single node in the arena
#[derive(Debug)]
pub struct Node {
    /// Parent node (NONE if detached)
    pub parent: NodeId,
    /// First child
    pub first_child: NodeId,
    /// Last child (for O(1) append)
    pub last_child: NodeId,
    /// Previous sibling
    pub prev_sibling: NodeId,
    /// Next sibling
    pub next_sibling: NodeId,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    fn detached(data: NodeData) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            data,
        }
    }

    /// Create a new element node
    pub fn element(tag: &str) -> Self {
        Self::detached(NodeData::Element(ElementData::new(tag)))
    }

    /// Create a new text node
    pub fn text(content: impl Into<String>) -> Self {
        Self::detached(NodeData::Text(TextData {
            content: content.into(),
        }))
    }

    /// Create a fragment node
    pub fn fragment() -> Self {
        Self::detached(NodeData::Fragment)
    }

    /// Create a document node
    pub fn document() -> Self {
        Self::detached(NodeData::Document)
    }

    /// Check if this is an element
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Check if this is text
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.data, NodeData::Text(_))
    }

    /// Check if this is a fragment
    #[inline]
    pub fn is_fragment(&self) -> bool {
        matches!(self.data, NodeData::Fragment)
    }

    /// Get element data if this is an element
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get mutable element data
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get text content if this is a text node
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(&t.content),
            _ => None,
        }
    }
}

/// Node-specific data
#[derive(Debug)]
pub enum NodeData {
    /// Document root
    Document,
    /// Grouping container with no tag identity, attributes or styling
    Fragment,
    /// Element
    Element(ElementData),
    /// Text content
    Text(TextData),
}

/// Element-specific data
#[derive(Debug)]
pub struct ElementData {
    /// Tag name (ASCII-lowercased)
    pub tag: String,
    /// Attributes, in insertion order
    pub attrs: AttrMap,
    /// Cached id attribute (very common lookup)
    pub id: Option<String>,
    /// Class list
    pub classes: ClassList,
    /// Inline style declarations
    pub style: InlineStyle,
    /// Geometry, written by the layout pass
    pub geometry: ElementGeometry,
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: AttrMap::new(),
            id: None,
            classes: ClassList::new(),
            style: InlineStyle::new(),
            geometry: ElementGeometry::default(),
        }
    }

    /// Get an attribute value
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name)
    }

    /// Set an attribute, keeping the cached id, class list and inline style
    /// in sync with plain-string writes to their reserved names.
    pub fn set_attr(&mut self, name: &str, value: &str) {
        self.attrs.set(name, value);
        match name {
            "id" => self.id = Some(value.to_string()),
            "class" => self.classes.set_from_text(value),
            "style" => self.style = InlineStyle::parse(value),
            _ => {}
        }
    }

    /// Add a class name (idempotent) and reflect the list into the `class`
    /// attribute.
    pub fn add_class(&mut self, name: &str) {
        self.classes.add(name);
        self.attrs.set("class", &self.classes.to_attr_value());
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.classes.contains(name)
    }
}

/// Text node data
#[derive(Debug)]
pub struct TextData {
    pub content: String,
}

/// Ordered, deduplicated class name set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassList {
    names: Vec<String>,
}

impl ClassList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a class name; duplicates are ignored
    pub fn add(&mut self, name: &str) {
        if !self.contains(name) {
            self.names.push(name.to_string());
        }
    }

    /// Remove a class name; returns whether it was present
    pub fn remove(&mut self, name: &str) -> bool {
        match self.names.iter().position(|n| n == name) {
            Some(index) => {
                self.names.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Replace the list from whitespace-separated attribute text
    pub(crate) fn set_from_text(&mut self, text: &str) {
        self.names.clear();
        for name in text.split_whitespace() {
            self.add(name);
        }
    }

    /// Space-joined attribute rendering
    pub fn to_attr_value(&self) -> String {
        self.names.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_list_add_idempotent() {
        let mut classes = ClassList::new();
        classes.add("a");
        classes.add("b");
        classes.add("a");

        assert_eq!(classes.len(), 2);
        assert_eq!(classes.iter().collect::<Vec<_>>(), vec!["a", "b"]);
        assert!(classes.remove("a"));
        assert!(!classes.remove("a"));
    }

    #[test]
    fn test_set_attr_refreshes_caches() {
        let mut elem = ElementData::new("DIV");
        assert_eq!(elem.tag, "div");

        elem.set_attr("id", "main");
        assert_eq!(elem.id.as_deref(), Some("main"));

        elem.set_attr("class", "btn  active");
        assert!(elem.has_class("btn"));
        assert!(elem.has_class("active"));
        assert_eq!(elem.classes.len(), 2);

        elem.set_attr("style", "color: red");
        assert_eq!(elem.style.get_property("color"), Some("red"));
    }

    #[test]
    fn test_add_class_reflects_attribute() {
        let mut elem = ElementData::new("span");
        elem.add_class("a");
        elem.add_class("b");

        assert_eq!(elem.attr("class"), Some("a b"));
    }

    #[test]
    fn test_node_kinds() {
        assert!(Node::element("div").is_element());
        assert!(Node::text("x").is_text());
        assert!(Node::fragment().is_fragment());
        assert_eq!(Node::text("x").as_text(), Some("x"));
        assert!(Node::fragment().as_element().is_none());
    }
}
