//! DOM tree (arena-based allocation) and structural operations.
//!
//! Nodes are allocated once and linked through sibling/parent ids; detached
//! nodes stay in the arena and can be re-attached anywhere. Placement is
//! entirely the caller's concern once a node id is handed out.

use crate::NodeId;
use crate::node::{ElementData, Node};
use crate::operations::{DomError, DomResult};

/// Arena-based DOM tree
#[derive(Debug, Default)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a new empty DOM tree
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Allocate the document node
    pub(crate) fn create_document(&mut self) -> NodeId {
        self.alloc(Node::document())
    }

    /// Allocate a new element of the given kind
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(Node::element(tag))
    }

    /// Allocate a fragment (grouping container with no identity)
    pub fn create_fragment(&mut self) -> NodeId {
        self.alloc(Node::fragment())
    }

    /// Allocate a text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.alloc(Node::text(content))
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if id.is_valid() {
            self.nodes.get(id.0 as usize)
        } else {
            None
        }
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if id.is_valid() {
            self.nodes.get_mut(id.0 as usize)
        } else {
            None
        }
    }

    /// Get element data for an element node
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(Node::as_element)
    }

    /// Get mutable element data for an element node
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.get_mut(id).and_then(Node::as_element_mut)
    }

    /// Get element data, distinguishing missing nodes from non-elements
    pub fn require_element_mut(&mut self, id: NodeId) -> DomResult<&mut ElementData> {
        self.check(id)?;
        self.node_mut(id).as_element_mut().ok_or(DomError::NotAnElement)
    }

    /// Text content of a text node
    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(Node::as_text)
    }

    /// Parent of a node, if attached
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).map(|node| node.parent).filter(|p| p.is_valid())
    }

    /// First child of a node
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)
            .map(|node| node.first_child)
            .filter(|c| c.is_valid())
    }

    /// Next sibling of a node
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)
            .map(|node| node.next_sibling)
            .filter(|s| s.is_valid())
    }

    /// Iterate over the direct children of a node
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.get(id).map_or(NodeId::NONE, |node| node.first_child),
        }
    }

    /// Number of direct children
    pub fn child_count(&self, id: NodeId) -> usize {
        self.children(id).count()
    }

    /// Number of nodes in the arena
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn check(&self, id: NodeId) -> DomResult<()> {
        if self.get(id).is_some() {
            Ok(())
        } else {
            Err(DomError::NotFound(id))
        }
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0 as usize]
    }

    fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.node(node).parent;
        while current.is_valid() {
            if current == ancestor {
                return true;
            }
            current = self.node(current).parent;
        }
        false
    }

    /// Unchecked tail append; `child` must be valid and detached.
    fn link_last(&mut self, parent: NodeId, child: NodeId) {
        let last = self.node(parent).last_child;
        if last.is_valid() {
            self.node_mut(last).next_sibling = child;
            self.node_mut(child).prev_sibling = last;
        } else {
            self.node_mut(parent).first_child = child;
        }
        self.node_mut(parent).last_child = child;
        self.node_mut(child).parent = parent;
    }

    /// Scaffold linking for `Document::new`; ids come straight from the
    /// allocator, so no checks apply.
    pub(crate) fn link_scaffold(&mut self, parent: NodeId, child: NodeId) {
        self.link_last(parent, child);
    }

    /// Append `child` as the last child of `parent`.
    ///
    /// A child attached elsewhere is re-parented. Appending a fragment
    /// splices the fragment's children into `parent` in order and leaves
    /// the fragment empty. Appending a node into its own subtree is a
    /// hierarchy error.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.check(parent)?;
        self.check(child)?;
        if parent == child {
            return Err(DomError::HierarchyRequest);
        }
        if self.node(child).is_fragment() {
            while let Some(first) = self.first_child(child) {
                self.append_child(parent, first)?;
            }
            return Ok(child);
        }
        if self.is_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest);
        }
        self.detach(child)?;
        self.link_last(parent, child);
        Ok(child)
    }

    /// Insert `new_child` before `ref_child` (append when `None`).
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        new_child: NodeId,
        ref_child: Option<NodeId>,
    ) -> DomResult<NodeId> {
        let Some(reference) = ref_child else {
            return self.append_child(parent, new_child);
        };
        self.check(parent)?;
        self.check(new_child)?;
        self.check(reference)?;
        if self.node(reference).parent != parent {
            return Err(DomError::NotAChild);
        }
        if new_child == reference {
            return Ok(new_child);
        }
        if parent == new_child || self.is_ancestor(new_child, parent) {
            return Err(DomError::HierarchyRequest);
        }
        self.detach(new_child)?;

        let prev = self.node(reference).prev_sibling;
        if prev.is_valid() {
            self.node_mut(prev).next_sibling = new_child;
            self.node_mut(new_child).prev_sibling = prev;
        } else {
            self.node_mut(parent).first_child = new_child;
        }
        self.node_mut(new_child).next_sibling = reference;
        self.node_mut(reference).prev_sibling = new_child;
        self.node_mut(new_child).parent = parent;
        Ok(new_child)
    }

    /// Replace `old_child` with `new_child` in the same position.
    pub fn replace_child(
        &mut self,
        parent: NodeId,
        new_child: NodeId,
        old_child: NodeId,
    ) -> DomResult<NodeId> {
        self.check(parent)?;
        self.check(new_child)?;
        self.check(old_child)?;
        if self.node(old_child).parent != parent {
            return Err(DomError::NotAChild);
        }
        if new_child == old_child {
            return Ok(old_child);
        }
        self.insert_before(parent, new_child, Some(old_child))?;
        self.detach(old_child)?;
        Ok(old_child)
    }

    /// Unlink a node from its parent; no-op when it has none.
    pub fn detach(&mut self, id: NodeId) -> DomResult<()> {
        self.check(id)?;
        let (parent, prev, next) = {
            let node = self.node(id);
            (node.parent, node.prev_sibling, node.next_sibling)
        };
        if !parent.is_valid() {
            return Ok(());
        }
        if prev.is_valid() {
            self.node_mut(prev).next_sibling = next;
        } else {
            self.node_mut(parent).first_child = next;
        }
        if next.is_valid() {
            self.node_mut(next).prev_sibling = prev;
        } else {
            self.node_mut(parent).last_child = prev;
        }
        let node = self.node_mut(id);
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;
        Ok(())
    }

    /// Substitute `replacement` for `node` in its parent; no-op when the
    /// node has no parent.
    pub fn replace_with(&mut self, node: NodeId, replacement: NodeId) -> DomResult<()> {
        self.check(node)?;
        self.check(replacement)?;
        if node == replacement {
            return Ok(());
        }
        let parent = self.node(node).parent;
        if !parent.is_valid() {
            return Ok(());
        }
        self.replace_child(parent, replacement, node)?;
        Ok(())
    }

    /// Remove the first child repeatedly until none remain. The first
    /// child is re-read after every removal, so the loop is correct over
    /// the live child list.
    pub fn clear_children(&mut self, id: NodeId) -> DomResult<()> {
        self.check(id)?;
        while let Some(first) = self.first_child(id) {
            self.detach(first)?;
        }
        Ok(())
    }
}

/// Iterator over a node's direct children
pub struct Children<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl<'a> Iterator for Children<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        if !self.next.is_valid() {
            return None;
        }
        let id = self.next;
        let node = self.tree.node(id);
        self.next = node.next_sibling;
        Some((id, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_children_order() {
        let mut tree = DomTree::new();
        let parent = tree.create_element("ul");
        let first = tree.create_element("li");
        let second = tree.create_element("li");

        tree.append_child(parent, first).unwrap();
        tree.append_child(parent, second).unwrap();

        let children: Vec<_> = tree.children(parent).map(|(id, _)| id).collect();
        assert_eq!(children, vec![first, second]);
        assert_eq!(tree.parent(first), Some(parent));
        assert_eq!(tree.child_count(parent), 2);
    }

    #[test]
    fn test_detach_without_parent_is_noop() {
        let mut tree = DomTree::new();
        let node = tree.create_element("div");

        tree.detach(node).unwrap();
        tree.detach(node).unwrap();
        assert_eq!(tree.parent(node), None);
    }

    #[test]
    fn test_append_reparents() {
        let mut tree = DomTree::new();
        let old_parent = tree.create_element("div");
        let new_parent = tree.create_element("div");
        let child = tree.create_element("span");

        tree.append_child(old_parent, child).unwrap();
        tree.append_child(new_parent, child).unwrap();

        assert_eq!(tree.child_count(old_parent), 0);
        assert_eq!(tree.parent(child), Some(new_parent));
    }

    #[test]
    fn test_append_fragment_splices_children() {
        let mut tree = DomTree::new();
        let parent = tree.create_element("div");
        let fragment = tree.create_fragment();
        let one = tree.create_text("one");
        let two = tree.create_text("two");
        tree.append_child(fragment, one).unwrap();
        tree.append_child(fragment, two).unwrap();

        tree.append_child(parent, fragment).unwrap();

        let children: Vec<_> = tree.children(parent).map(|(id, _)| id).collect();
        assert_eq!(children, vec![one, two]);
        assert_eq!(tree.child_count(fragment), 0);
        assert_eq!(tree.parent(fragment), None);
    }

    #[test]
    fn test_append_into_own_subtree_errors() {
        let mut tree = DomTree::new();
        let outer = tree.create_element("div");
        let inner = tree.create_element("div");
        tree.append_child(outer, inner).unwrap();

        assert_eq!(
            tree.append_child(inner, outer),
            Err(DomError::HierarchyRequest)
        );
        assert_eq!(tree.append_child(outer, outer), Err(DomError::HierarchyRequest));
    }

    #[test]
    fn test_insert_before() {
        let mut tree = DomTree::new();
        let parent = tree.create_element("ol");
        let second = tree.create_element("li");
        let first = tree.create_element("li");
        tree.append_child(parent, second).unwrap();

        tree.insert_before(parent, first, Some(second)).unwrap();

        let children: Vec<_> = tree.children(parent).map(|(id, _)| id).collect();
        assert_eq!(children, vec![first, second]);

        let stranger = tree.create_element("li");
        let orphan = tree.create_element("li");
        assert_eq!(
            tree.insert_before(parent, orphan, Some(stranger)),
            Err(DomError::NotAChild)
        );
    }

    #[test]
    fn test_replace_child_preserves_position() {
        let mut tree = DomTree::new();
        let parent = tree.create_element("div");
        let first = tree.create_text("a");
        let second = tree.create_text("b");
        let third = tree.create_text("c");
        let replacement = tree.create_element("span");
        for child in [first, second, third] {
            tree.append_child(parent, child).unwrap();
        }

        tree.replace_child(parent, replacement, second).unwrap();

        let children: Vec<_> = tree.children(parent).map(|(id, _)| id).collect();
        assert_eq!(children, vec![first, replacement, third]);
        assert_eq!(tree.parent(second), None);
    }

    #[test]
    fn test_replace_with_detached_is_noop() {
        let mut tree = DomTree::new();
        let node = tree.create_element("div");
        let replacement = tree.create_element("span");

        tree.replace_with(node, replacement).unwrap();
        assert_eq!(tree.parent(replacement), None);
    }

    #[test]
    fn test_clear_children() {
        let mut tree = DomTree::new();
        let parent = tree.create_element("div");
        for _ in 0..3 {
            let child = tree.create_text("x");
            tree.append_child(parent, child).unwrap();
        }

        tree.clear_children(parent).unwrap();
        assert_eq!(tree.child_count(parent), 0);

        // N = 0 is fine
        tree.clear_children(parent).unwrap();
        assert_eq!(tree.child_count(parent), 0);
    }
}
