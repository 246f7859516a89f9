//! DOM Tree (arena-based allocation)
//!
//! Detached nodes stay in the arena; a node is "connected" only while its
//! parent chain reaches the document root.

use crate::{DomError, DomResult, Node, NodeId};

/// Arena-based DOM tree
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::document()],
        }
    }

    /// Document node
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize)
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0 as usize)
    }

    /// Number of nodes in the arena (detached ones included)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(Node::element(tag))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.alloc(Node::text(content))
    }

    fn node(&self, id: NodeId) -> DomResult<&Node> {
        self.get(id).ok_or(DomError::NotFound)
    }

    fn node_mut(&mut self, id: NodeId) -> DomResult<&mut Node> {
        self.get_mut(id).ok_or(DomError::NotFound)
    }

    /// Parent of a node, if attached
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.parent.to_option()
    }

    /// Iterate direct children in order
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.get(id).map_or(NodeId::NONE, |n| n.first_child),
        }
    }

    /// Child IDs in order
    pub fn child_ids(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id).map(|(child, _)| child).collect()
    }

    /// All descendants in document (pre-)order, excluding `id` itself
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.child_ids(id).into_iter().rev().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.child_ids(next).into_iter().rev());
        }
        out
    }

    /// True if `ancestor` is `node` or one of its ancestors
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = node.to_option();
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// True while the node's parent chain reaches the document root
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.get(id).is_some() && self.is_inclusive_ancestor(NodeId::ROOT, id)
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(text) = self.get(id).and_then(Node::as_text) {
            return text.to_string();
        }
        self.descendants(id)
            .into_iter()
            .filter_map(|d| self.get(d).and_then(Node::as_text))
            .collect()
    }

    /// Append a child, detaching it from any previous parent
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` before `reference` (or at the end when `None`)
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> DomResult<NodeId> {
        self.node(parent)?;
        self.node(child)?;
        if child == NodeId::ROOT || self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest);
        }
        if self.node(parent)?.is_text() {
            return Err(DomError::HierarchyRequest);
        }
        if let Some(reference) = reference {
            if self.parent(reference) != Some(parent) {
                return Err(DomError::NotAChild);
            }
            if reference == child {
                return Ok(child);
            }
        }

        if let Some(old_parent) = self.parent(child) {
            self.unlink(old_parent, child)?;
        }

        let prev = match reference {
            Some(r) => self.node(r)?.prev_sibling,
            None => self.node(parent)?.last_child,
        };
        let next = reference.unwrap_or(NodeId::NONE);

        {
            let node = self.node_mut(child)?;
            node.parent = parent;
            node.prev_sibling = prev;
            node.next_sibling = next;
        }
        match prev.to_option() {
            Some(p) => self.node_mut(p)?.next_sibling = child,
            None => self.node_mut(parent)?.first_child = child,
        }
        match next.to_option() {
            Some(n) => self.node_mut(n)?.prev_sibling = child,
            None => self.node_mut(parent)?.last_child = child,
        }
        Ok(child)
    }

    /// Remove a child from its parent; the node stays in the arena
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        if self.parent(child) != Some(parent) {
            return Err(DomError::NotAChild);
        }
        self.unlink(parent, child)?;
        Ok(child)
    }

    fn unlink(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        let (prev, next) = {
            let node = self.node(child)?;
            (node.prev_sibling, node.next_sibling)
        };
        match prev.to_option() {
            Some(p) => self.node_mut(p)?.next_sibling = next,
            None => self.node_mut(parent)?.first_child = next,
        }
        match next.to_option() {
            Some(n) => self.node_mut(n)?.prev_sibling = prev,
            None => self.node_mut(parent)?.last_child = prev,
        }
        let node = self.node_mut(child)?;
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;
        Ok(())
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over direct children
pub struct Children<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl<'a> Iterator for Children<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next.to_option()?;
        let node = self.tree.get(id)?;
        self.next = node.next_sibling;
        Some((id, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_order() {
        let mut tree = DomTree::new();
        let a = tree.create_element("a");
        let b = tree.create_element("b");
        let c = tree.create_element("c");
        tree.append_child(NodeId::ROOT, a).unwrap();
        tree.append_child(NodeId::ROOT, c).unwrap();
        tree.insert_before(NodeId::ROOT, b, Some(c)).unwrap();

        assert_eq!(tree.child_ids(NodeId::ROOT), vec![a, b, c]);
    }

    #[test]
    fn test_reparent_detaches() {
        let mut tree = DomTree::new();
        let outer = tree.create_element("div");
        let inner = tree.create_element("span");
        tree.append_child(NodeId::ROOT, outer).unwrap();
        tree.append_child(NodeId::ROOT, inner).unwrap();
        tree.append_child(outer, inner).unwrap();

        assert_eq!(tree.child_ids(NodeId::ROOT), vec![outer]);
        assert_eq!(tree.parent(inner), Some(outer));
    }

    #[test]
    fn test_cycle_rejected() {
        let mut tree = DomTree::new();
        let outer = tree.create_element("div");
        let inner = tree.create_element("div");
        tree.append_child(outer, inner).unwrap();

        assert_eq!(tree.append_child(inner, outer), Err(DomError::HierarchyRequest));
    }

    #[test]
    fn test_descendants_preorder() {
        let mut tree = DomTree::new();
        let a = tree.create_element("a");
        let a1 = tree.create_element("a1");
        let a2 = tree.create_element("a2");
        let b = tree.create_element("b");
        tree.append_child(NodeId::ROOT, a).unwrap();
        tree.append_child(a, a1).unwrap();
        tree.append_child(a, a2).unwrap();
        tree.append_child(NodeId::ROOT, b).unwrap();

        assert_eq!(tree.descendants(NodeId::ROOT), vec![a, a1, a2, b]);
    }

    #[test]
    fn test_remove_disconnects() {
        let mut tree = DomTree::new();
        let a = tree.create_element("a");
        let t = tree.create_text("hi");
        tree.append_child(NodeId::ROOT, a).unwrap();
        tree.append_child(a, t).unwrap();
        assert!(tree.is_connected(t));

        tree.remove_child(NodeId::ROOT, a).unwrap();
        assert!(!tree.is_connected(t));
        assert_eq!(tree.text_content(a), "hi");
        assert_eq!(tree.remove_child(NodeId::ROOT, a), Err(DomError::NotAChild));
    }
}
