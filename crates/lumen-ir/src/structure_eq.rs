//! Structural equality for arenas.
//!
//! `structure_eq` compares two trees ignoring the fields that only describe
//! where the tree lives rather than what it is.
//!
//! # Ignored
//!
//! - Node ids and `nextId` - a renumbered tree is the same tree
//! - `sourcePath`
//!
//! # Must match
//!
//! - Node types, locations and child order
//! - Attribute keys and scalar values
//! - Reference attributes, compared through the id correspondence the walk
//!   establishes

use std::collections::HashMap;

use crate::arena::Arena;
use crate::node::{Node, NodeId};
use crate::value::NodeValue;

/// Trait for structural equality comparison.
///
/// Unlike `PartialEq`, this ignores identity fields that may differ between
/// two renderings of the same tree.
pub trait StructureEq {
    /// Compare two values for structural equality.
    fn structure_eq(&self, other: &Self) -> bool;
}

impl StructureEq for Arena {
    fn structure_eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }

        let mut mapping: HashMap<NodeId, NodeId> = HashMap::with_capacity(self.len());
        let mut stack = vec![(self.root_id(), other.root_id())];
        while let Some((a_id, b_id)) = stack.pop() {
            let (Some(a), Some(b)) = (self.get(a_id), other.get(b_id)) else {
                return false;
            };
            if !shallow_eq(a, b) {
                return false;
            }
            if mapping.insert(a_id, b_id).is_some() {
                // Reached twice: not a tree.
                return false;
            }
            stack.extend(a.children().iter().copied().zip(b.children().iter().copied()));
        }

        // Unreachable nodes in either arena would have been skipped above.
        if mapping.len() != self.len() {
            return false;
        }

        mapping.iter().all(|(a_id, b_id)| {
            match (self.get(*a_id), other.get(*b_id)) {
                (Some(a), Some(b)) => references_eq(a, b, &mapping),
                _ => false,
            }
        })
    }
}

/// Type, location, child count and scalar attributes.
fn shallow_eq(a: &Node, b: &Node) -> bool {
    a.node_type() == b.node_type()
        && a.location() == b.location()
        && a.children().len() == b.children().len()
        && a.attributes().len() == b.attributes().len()
        && a
            .attributes()
            .iter()
            .zip(b.attributes())
            .all(|((ka, va), (kb, vb))| ka == kb && scalar_eq(va, vb))
}

/// Scalars must be equal; reference values only need the same shape here.
fn scalar_eq(a: &NodeValue, b: &NodeValue) -> bool {
    match (a, b) {
        (NodeValue::ArrayRef(x), NodeValue::ArrayRef(y)) => x.len() == y.len(),
        (NodeValue::ObjectRef(x), NodeValue::ObjectRef(y)) => {
            x.len() == y.len() && x.keys().eq(y.keys())
        }
        _ => a == b,
    }
}

fn references_eq(a: &Node, b: &Node, mapping: &HashMap<NodeId, NodeId>) -> bool {
    a.attributes()
        .values()
        .zip(b.attributes().values())
        .filter(|(va, _)| va.is_reference())
        .all(|(va, vb)| {
            va.references()
                .zip(vb.references())
                .all(|(ra, rb)| mapping.get(&ra) == Some(&rb))
        })
}
