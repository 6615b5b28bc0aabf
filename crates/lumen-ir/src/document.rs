//! Canonical wire document.
//!
//! ```text
//! {
//!   "rootId": 0, "nextId": 4, "sourcePath": "a.js",
//!   "nodes": {
//!     "0": {"id": 0, "nodeType": "Program",
//!           "location": {"startLine": 1, ...},
//!           "children": [1], "values": {}},
//!     ...
//!   }
//! }
//! ```
//!
//! Nodes are written in ascending numeric id order and attribute keys in
//! byte order, so the output depends only on the arena contents.

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use serde::de::{MapAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::arena::Arena;
use crate::error::IrError;
use crate::node::{MAX_NEXT_ID, Node, NodeId, NodeType, SourceLocation};
use crate::value::NodeValue;

// Every map key is a string and the writer is in memory, so rendering
// cannot fail.
const INFALLIBLE: &str = "in-memory document rendering failed";

/// Render the canonical compact document.
pub fn to_canonical_bytes(arena: &Arena) -> Vec<u8> {
    serde_json::to_vec(&DocumentView(arena)).expect(INFALLIBLE)
}

pub fn to_canonical_string(arena: &Arena) -> String {
    serde_json::to_string(&DocumentView(arena)).expect(INFALLIBLE)
}

/// Indented rendering for people. Not canonical.
pub fn to_pretty_string(arena: &Arena) -> String {
    serde_json::to_string_pretty(&DocumentView(arena)).expect(INFALLIBLE)
}

/// Serialize-only view of a whole arena in wire layout.
pub struct DocumentView<'a>(pub &'a Arena);

impl Serialize for DocumentView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let arena = self.0;
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("rootId", &arena.root_id())?;
        map.serialize_entry("nextId", &arena.next_id())?;
        if let Some(path) = arena.source_path() {
            map.serialize_entry("sourcePath", path)?;
        }
        map.serialize_entry("nodes", &NodesView(arena))?;
        map.end()
    }
}

struct NodesView<'a>(&'a Arena);

impl Serialize for NodesView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for node in self.0.iter() {
            map.serialize_entry(&node.id().to_string(), &NodeView(node))?;
        }
        map.end()
    }
}

struct NodeView<'a>(&'a Node);

impl Serialize for NodeView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let node = self.0;
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("id", &node.id())?;
        map.serialize_entry("nodeType", node.node_type().as_str())?;
        if let Some(parent) = node.parent() {
            map.serialize_entry("parent", &parent)?;
        }
        map.serialize_entry("location", &node.location())?;
        map.serialize_entry("children", node.children())?;
        map.serialize_entry("values", node.attributes())?;
        map.end()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawDocument {
    root_id: NodeId,
    next_id: NodeId,
    #[serde(default)]
    source_path: Option<String>,
    #[serde(deserialize_with = "entries")]
    nodes: Vec<(String, RawNode)>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawNode {
    id: NodeId,
    node_type: String,
    #[serde(default)]
    parent: Option<NodeId>,
    location: SourceLocation,
    children: Vec<NodeId>,
    #[serde(deserialize_with = "entries")]
    values: Vec<(String, Value)>,
}

/// Keep every entry of a JSON object, repeated keys included, so the
/// decoder can reject them instead of letting the last one win.
fn entries<'de, D, V>(deserializer: D) -> Result<Vec<(String, V)>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    struct Entries<V>(PhantomData<V>);

    impl<'de, V: Deserialize<'de>> Visitor<'de> for Entries<V> {
        type Value = Vec<(String, V)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a JSON object")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut out = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(entry) = map.next_entry()? {
                out.push(entry);
            }
            Ok(out)
        }
    }

    deserializer.deserialize_map(Entries(PhantomData))
}

/// Rebuild an arena from a wire document.
///
/// The result is an independent arena; every structural invariant is
/// checked before it is returned.
pub fn from_slice(bytes: &[u8]) -> Result<Arena, IrError> {
    let raw: RawDocument = serde_json::from_slice(bytes)?;
    from_raw(raw)
}

pub fn from_str(text: &str) -> Result<Arena, IrError> {
    from_slice(text.as_bytes())
}

fn from_raw(raw: RawDocument) -> Result<Arena, IrError> {
    if raw.next_id > MAX_NEXT_ID {
        return Err(IrError::MalformedDocument(format!(
            "nextId {} is above the ceiling {MAX_NEXT_ID}",
            raw.next_id
        )));
    }
    let mut nodes = BTreeMap::new();
    for (key, raw_node) in raw.nodes {
        if key != raw_node.id.to_string() {
            return Err(IrError::MalformedDocument(format!(
                "node key `{key}` does not match id {}",
                raw_node.id
            )));
        }
        let node_type: NodeType = raw_node
            .node_type
            .parse()
            .map_err(IrError::MalformedDocument)?;

        let id = raw_node.id;
        let mut node = Node::new(id, node_type);
        node.parent = raw_node.parent;
        node.location = raw_node.location;
        node.children = raw_node.children;
        for (name, value) in &raw_node.values {
            let value = NodeValue::from_json(name, value)?;
            if let NodeValue::Number(n) = value {
                if !n.is_finite() {
                    return Err(IrError::NonFiniteNumber { key: name.clone() });
                }
            }
            if node.attributes.insert(name.clone(), value).is_some() {
                return Err(IrError::MalformedDocument(format!(
                    "attribute `{name}` of node {id} appears more than once"
                )));
            }
        }
        if nodes.insert(id, node).is_some() {
            return Err(IrError::MalformedDocument(format!(
                "node {id} appears more than once"
            )));
        }
    }

    let arena = Arena::from_parts(nodes, raw.root_id, raw.next_id, raw.source_path);
    arena.validate()?;
    Ok(arena)
}
