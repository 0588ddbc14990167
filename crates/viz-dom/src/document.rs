//! Document - high-level document API

use crate::NodeId;
use crate::tree::DomTree;

/// A live document tree with its viewport scroll state.
///
/// Layout and scrolling are external collaborators: they write scroll
/// offsets and per-element geometry here, and the geometry helpers read
/// them back.
pub struct Document {
    /// The DOM tree
    tree: DomTree,
    /// The document node itself
    document_node: NodeId,
    /// Cached reference to the `<html>` element
    html_element: NodeId,
    /// Cached reference to the `<head>` element
    head_element: NodeId,
    /// Cached reference to the `<body>` element
    body_element: NodeId,
    /// Current page scroll
    page_x_offset: f64,
    page_y_offset: f64,
}

impl Document {
    /// Create a new document with the html/head/body scaffold
    pub fn new() -> Self {
        let mut tree = DomTree::new();

        let document_node = tree.create_document();
        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        // Fresh arena, fresh ids: the scaffold links cannot fail
        tree.link_scaffold(document_node, html);
        tree.link_scaffold(html, head);
        tree.link_scaffold(html, body);

        tracing::debug!("created document scaffold");

        Self {
            tree,
            document_node,
            html_element: html,
            head_element: head,
            body_element: body,
            page_x_offset: 0.0,
            page_y_offset: 0.0,
        }
    }

    /// The document node (parent of the `<html>` element)
    pub fn document_node(&self) -> NodeId {
        self.document_node
    }

    /// Get the `<html>` element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// Get the `<head>` element
    pub fn head(&self) -> NodeId {
        self.head_element
    }

    /// Get the `<body>` element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// Horizontal page scroll
    pub fn page_x_offset(&self) -> f64 {
        self.page_x_offset
    }

    /// Vertical page scroll
    pub fn page_y_offset(&self) -> f64 {
        self.page_y_offset
    }

    /// Record the current page scroll (written by the host on scroll)
    pub fn set_page_offset(&mut self, x: f64, y: f64) {
        self.page_x_offset = x;
        self.page_y_offset = y;
    }

    /// Get element by ID
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.find_element_with_id(self.document_node, id)
    }

    fn find_element_with_id(&self, start: NodeId, target: &str) -> Option<NodeId> {
        for (node_id, node) in self.tree.children(start) {
            if let Some(elem) = node.as_element() {
                if elem.id.as_deref() == Some(target) {
                    return Some(node_id);
                }
            }
            if let Some(found) = self.find_element_with_id(node_id, target) {
                return Some(found);
            }
        }
        None
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
