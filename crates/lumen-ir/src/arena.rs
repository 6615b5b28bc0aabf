//! The node arena.
//!
//! All nodes of one parse live in a single [`Arena`], addressed by integer
//! id. Parent, child and reference links are plain ids resolved through the
//! arena, so there is no ownership between nodes. The arena only grows: there
//! is no remove or detach.

use std::collections::BTreeMap;

use crate::error::IrError;
use crate::node::{Node, NodeId, NodeType, SourceLocation};
use crate::value::NodeValue;

/// How the arena reacts to operations naming a node it does not hold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strictness {
    /// Fail with [`IrError::DanglingReference`].
    #[default]
    Strict,
    /// Skip the operation and log a warning.
    Permissive,
}

#[derive(Debug, Clone)]
pub struct Arena {
    nodes: BTreeMap<NodeId, Node>,
    root_id: NodeId,
    next_id: NodeId,
    source_path: Option<String>,
    strictness: Strictness,
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

impl Arena {
    /// A fresh arena holding only the `Program` root.
    pub fn new() -> Self {
        let root_id = 0;
        let mut nodes = BTreeMap::new();
        nodes.insert(root_id, Node::new(root_id, NodeType::Program));
        Self {
            nodes,
            root_id,
            next_id: root_id + 1,
            source_path: None,
            strictness: Strictness::Strict,
        }
    }

    pub fn with_source_path(mut self, path: impl Into<String>) -> Self {
        self.source_path = Some(path.into());
        self
    }

    pub fn with_strictness(mut self, strictness: Strictness) -> Self {
        self.strictness = strictness;
        self
    }

    /// Assemble an arena from decoded parts. The caller validates.
    pub(crate) fn from_parts(
        nodes: BTreeMap<NodeId, Node>,
        root_id: NodeId,
        next_id: NodeId,
        source_path: Option<String>,
    ) -> Self {
        Self {
            nodes,
            root_id,
            next_id,
            source_path,
            strictness: Strictness::Strict,
        }
    }

    pub fn set_source_path(&mut self, path: impl Into<String>) {
        self.source_path = Some(path.into());
    }

    pub fn source_path(&self) -> Option<&str> {
        self.source_path.as_deref()
    }

    pub fn strictness(&self) -> Strictness {
        self.strictness
    }

    pub fn root_id(&self) -> NodeId {
        self.root_id
    }

    /// The id the next `create_node` call will hand out.
    pub fn next_id(&self) -> NodeId {
        self.next_id
    }

    pub fn root(&self) -> &Node {
        // The root is inserted on construction and nodes are never removed.
        &self.nodes[&self.root_id]
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Nodes in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Allocate a new detached node with empty attributes and an unknown span.
    ///
    /// # Panics
    ///
    /// Panics if the id space is exhausted, like `Vec::push` on capacity
    /// overflow. Decoded arenas start at or below
    /// [`MAX_NEXT_ID`](crate::node::MAX_NEXT_ID), so reaching the
    /// end takes billions of live nodes.
    pub fn create_node(&mut self, node_type: NodeType) -> NodeId {
        let id = self.next_id;
        self.next_id = id.checked_add(1).expect("node id space exhausted");
        self.nodes.insert(id, Node::new(id, node_type));
        id
    }

    /// Append `child_id` to the children of `parent_id`.
    ///
    /// Attaching the root, re-attaching a node that already has a parent, or
    /// closing a cycle are rejected in both strictness modes.
    pub fn add_child(&mut self, parent_id: NodeId, child_id: NodeId) -> Result<(), IrError> {
        if !self.contains(parent_id) {
            return self.missing(parent_id, "add_child: parent");
        }
        let Some(child) = self.nodes.get(&child_id) else {
            return self.missing(child_id, "add_child: child");
        };
        if child_id == self.root_id {
            return Err(IrError::RootAsChild);
        }
        if let Some(parent) = child.parent {
            return Err(IrError::AlreadyAttached {
                child: child_id,
                parent,
            });
        }

        let mut cursor = Some(parent_id);
        while let Some(ancestor) = cursor {
            if ancestor == child_id {
                return Err(IrError::Cycle {
                    parent: parent_id,
                    child: child_id,
                });
            }
            cursor = self.nodes.get(&ancestor).and_then(|n| n.parent);
        }

        if let Some(parent) = self.nodes.get_mut(&parent_id) {
            parent.children.push(child_id);
        }
        if let Some(child) = self.nodes.get_mut(&child_id) {
            child.parent = Some(parent_id);
        }
        Ok(())
    }

    /// Set an attribute, replacing any previous value under `key`.
    pub fn set_attribute(
        &mut self,
        node_id: NodeId,
        key: impl Into<String>,
        value: NodeValue,
    ) -> Result<(), IrError> {
        let key = key.into();
        if !self.contains(node_id) {
            return self.missing(node_id, format!("set_attribute `{key}`"));
        }
        if let NodeValue::Number(n) = value {
            if !n.is_finite() {
                return Err(IrError::NonFiniteNumber { key });
            }
        }
        if let Some(target) = value.references().find(|id| !self.contains(*id)) {
            return self.missing(target, format!("attribute `{key}` of node {node_id}"));
        }

        if let Some(node) = self.nodes.get_mut(&node_id) {
            node.attributes.insert(key, value);
        }
        Ok(())
    }

    pub fn set_location(&mut self, node_id: NodeId, location: SourceLocation) -> Result<(), IrError> {
        match self.nodes.get_mut(&node_id) {
            Some(node) => {
                node.location = location;
                Ok(())
            }
            None => self.missing(node_id, "set_location"),
        }
    }

    /// Depth-first pre-order walk from the root, children in order.
    pub fn visit<F>(&self, mut visitor: F)
    where
        F: FnMut(&Node),
    {
        let mut stack = vec![self.root_id];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            visitor(node);
            // Reverse so the leftmost child is popped first.
            stack.extend(node.children.iter().rev().copied());
        }
    }

    /// Check every structural invariant, returning the first violation.
    pub fn validate(&self) -> Result<(), IrError> {
        let root = self
            .nodes
            .get(&self.root_id)
            .ok_or_else(|| IrError::dangling(self.root_id, "root"))?;
        if let Some(parent) = root.parent {
            return Err(IrError::AlreadyAttached {
                child: self.root_id,
                parent,
            });
        }

        for (id, node) in &self.nodes {
            if *id != node.id {
                return Err(IrError::MalformedDocument(format!(
                    "node stored under {id} claims id {}",
                    node.id
                )));
            }
            if *id >= self.next_id {
                return Err(IrError::MalformedDocument(format!(
                    "node {id} is not below nextId {}",
                    self.next_id
                )));
            }

            if *id != self.root_id {
                let parent_id = node
                    .parent
                    .ok_or_else(|| IrError::MalformedDocument(format!("node {id} has no parent")))?;
                let parent = self
                    .nodes
                    .get(&parent_id)
                    .ok_or_else(|| IrError::dangling(parent_id, format!("parent of node {id}")))?;
                let occurrences = parent.children.iter().filter(|c| **c == *id).count();
                if occurrences != 1 {
                    return Err(IrError::MalformedDocument(format!(
                        "node {id} appears {occurrences} times among the children of {parent_id}"
                    )));
                }
            }

            for child_id in &node.children {
                let child = self
                    .nodes
                    .get(child_id)
                    .ok_or_else(|| IrError::dangling(*child_id, format!("child of node {id}")))?;
                if child.parent != Some(*id) {
                    return Err(IrError::MalformedDocument(format!(
                        "node {child_id} is listed as a child of {id} but its parent is {:?}",
                        child.parent
                    )));
                }
            }

            for (key, value) in &node.attributes {
                if let Some(target) = value.references().find(|t| !self.nodes.contains_key(t)) {
                    return Err(IrError::dangling(
                        target,
                        format!("attribute `{key}` of node {id}"),
                    ));
                }
            }
        }

        // Every node must hang off the root; a detached subtree means the
        // parent links form a cycle somewhere.
        let mut reachable = 0usize;
        self.visit(|_| reachable += 1);
        if reachable != self.nodes.len() {
            return Err(IrError::MalformedDocument(format!(
                "{} nodes are unreachable from the root",
                self.nodes.len() - reachable
            )));
        }
        Ok(())
    }

    fn missing(&self, id: NodeId, context: impl Into<String>) -> Result<(), IrError> {
        let context = context.into();
        match self.strictness {
            Strictness::Strict => Err(IrError::dangling(id, context)),
            Strictness::Permissive => {
                tracing::warn!(node = id, %context, "skipping operation on missing node");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_new_arena_has_parentless_root() {
        let arena = Arena::new();
        assert_eq!(arena.root_id(), 0);
        assert_eq!(arena.next_id(), 1);
        assert_eq!(arena.root().node_type(), NodeType::Program);
        assert_eq!(arena.root().parent(), None);
        assert!(arena.is_empty());
        arena.validate().unwrap();
    }

    #[test]
    fn test_create_node_ids_increase() {
        let mut arena = Arena::new();
        let a = arena.create_node(NodeType::Identifier);
        let b = arena.create_node(NodeType::Identifier);
        let c = arena.create_node(NodeType::Comment);
        assert_eq!((a, b, c), (1, 2, 3));
        let node = arena.get(b).unwrap();
        assert!(node.attributes().is_empty());
        assert!(node.children().is_empty());
        assert_eq!(node.parent(), None);
        assert!(node.location().is_unknown());
    }

    #[test]
    fn test_add_child_links_both_ways_in_order() {
        let mut arena = Arena::new();
        let decl = arena.create_node(NodeType::VariableDeclaration);
        let ident = arena.create_node(NodeType::Identifier);
        let lit = arena.create_node(NodeType::NumericLiteral);
        arena.add_child(0, decl).unwrap();
        arena.add_child(decl, ident).unwrap();
        arena.add_child(decl, lit).unwrap();

        assert_eq!(arena.root().children(), &[decl]);
        assert_eq!(arena.get(decl).unwrap().children(), &[ident, lit]);
        assert_eq!(arena.get(lit).unwrap().parent(), Some(decl));
        arena.validate().unwrap();
    }

    #[test]
    fn test_strict_dangling_child_fails() {
        let mut arena = Arena::new();
        let err = arena.add_child(0, 99).unwrap_err();
        assert!(matches!(err, IrError::DanglingReference { id: 99, .. }));
        assert_eq!(err.kind(), ErrorKind::DanglingReference);
        assert!(arena.root().children().is_empty());
    }

    #[test]
    fn test_permissive_dangling_is_noop() {
        let mut arena = Arena::new().with_strictness(Strictness::Permissive);
        arena.add_child(0, 99).unwrap();
        arena.add_child(42, 0).unwrap();
        arena
            .set_attribute(7, "name", NodeValue::from("x"))
            .unwrap();
        let id = arena.create_node(NodeType::ArrayExpression);
        arena
            .set_attribute(id, "elements", NodeValue::ArrayRef(vec![55]))
            .unwrap();
        assert!(arena.get(id).unwrap().attributes().is_empty());
        assert!(arena.root().children().is_empty());
    }

    #[test]
    fn test_structural_misuse_is_rejected() {
        let mut arena = Arena::new();
        let a = arena.create_node(NodeType::BlockStatement);
        let b = arena.create_node(NodeType::BlockStatement);
        arena.add_child(0, a).unwrap();

        assert!(matches!(arena.add_child(a, 0), Err(IrError::RootAsChild)));
        assert!(matches!(
            arena.add_child(b, a),
            Err(IrError::AlreadyAttached { child, parent: 0 }) if child == a
        ));

        let c = arena.create_node(NodeType::BlockStatement);
        let d = arena.create_node(NodeType::BlockStatement);
        arena.add_child(c, d).unwrap();
        assert!(matches!(arena.add_child(d, c), Err(IrError::Cycle { .. })));
        assert!(matches!(arena.add_child(c, c), Err(IrError::Cycle { .. })));
    }

    #[test]
    fn test_set_attribute_last_write_wins() {
        let mut arena = Arena::new();
        let id = arena.create_node(NodeType::Identifier);
        arena.set_attribute(id, "name", "a".into()).unwrap();
        arena.set_attribute(id, "name", "b".into()).unwrap();
        assert_eq!(arena.get(id).unwrap().get_string("name"), Some("b"));
    }

    #[test]
    fn test_set_attribute_rejects_non_finite_and_dangling() {
        let mut arena = Arena::new();
        let id = arena.create_node(NodeType::NumericLiteral);
        assert!(matches!(
            arena.set_attribute(id, "value", NodeValue::Number(f64::NAN)),
            Err(IrError::NonFiniteNumber { .. })
        ));
        assert!(matches!(
            arena.set_attribute(id, "refs", NodeValue::object_ref([("a", 12)])),
            Err(IrError::DanglingReference { id: 12, .. })
        ));
    }

    #[test]
    fn test_set_location_overwrites() {
        let mut arena = Arena::new();
        let id = arena.create_node(NodeType::Identifier);
        arena.set_location(id, SourceLocation::new(1, 5, 1, 6)).unwrap();
        arena.set_location(id, SourceLocation::new(2, 1, 2, 3)).unwrap();
        assert_eq!(arena.get(id).unwrap().location(), SourceLocation::new(2, 1, 2, 3));
        assert!(arena.set_location(77, SourceLocation::default()).is_err());
    }

    #[test]
    fn test_visit_is_preorder() {
        let mut arena = Arena::new();
        let a = arena.create_node(NodeType::BlockStatement);
        let b = arena.create_node(NodeType::Identifier);
        let c = arena.create_node(NodeType::Identifier);
        arena.add_child(0, a).unwrap();
        arena.add_child(a, b).unwrap();
        arena.add_child(0, c).unwrap();

        let mut order = Vec::new();
        arena.visit(|node| order.push(node.id()));
        assert_eq!(order, vec![0, a, b, c]);
    }

    #[test]
    fn test_validate_flags_detached_nodes() {
        let mut arena = Arena::new();
        arena.create_node(NodeType::Identifier);
        assert!(arena.validate().is_err());
    }
}
