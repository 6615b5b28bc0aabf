//! Attribute values.

use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::Value;

use crate::error::IrError;
use crate::node::NodeId;

/// A tagged attribute value.
///
/// `ArrayRef` and `ObjectRef` hold references to other arena entries. They
/// are not parent/child links and are rendered as plain ids on the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeValue {
    String(String),
    Number(f64),
    Boolean(bool),
    Null,
    ArrayRef(Vec<NodeId>),
    ObjectRef(BTreeMap<String, NodeId>),
}

impl NodeValue {
    pub fn string(s: impl Into<String>) -> Self {
        NodeValue::String(s.into())
    }

    pub fn object_ref<K: Into<String>>(entries: impl IntoIterator<Item = (K, NodeId)>) -> Self {
        NodeValue::ObjectRef(entries.into_iter().map(|(k, id)| (k.into(), id)).collect())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            NodeValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            NodeValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            NodeValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, NodeValue::ArrayRef(_) | NodeValue::ObjectRef(_))
    }

    /// Ids referenced by this value, in wire order.
    pub fn references(&self) -> Box<dyn Iterator<Item = NodeId> + '_> {
        match self {
            NodeValue::ArrayRef(ids) => Box::new(ids.iter().copied()),
            NodeValue::ObjectRef(map) => Box::new(map.values().copied()),
            _ => Box::new(std::iter::empty()),
        }
    }

    /// Decode a wire value. Arrays and objects must hold node ids only.
    pub(crate) fn from_json(key: &str, value: &Value) -> Result<Self, IrError> {
        match value {
            Value::String(s) => Ok(NodeValue::String(s.clone())),
            Value::Number(n) => n.as_f64().map(NodeValue::Number).ok_or_else(|| {
                IrError::MalformedDocument(format!("attribute `{key}`: number out of range"))
            }),
            Value::Bool(b) => Ok(NodeValue::Boolean(*b)),
            Value::Null => Ok(NodeValue::Null),
            Value::Array(items) => items
                .iter()
                .map(|item| reference_id(key, item))
                .collect::<Result<Vec<_>, _>>()
                .map(NodeValue::ArrayRef),
            Value::Object(entries) => entries
                .iter()
                .map(|(name, item)| Ok((name.clone(), reference_id(key, item)?)))
                .collect::<Result<BTreeMap<_, _>, IrError>>()
                .map(NodeValue::ObjectRef),
        }
    }
}

fn reference_id(key: &str, value: &Value) -> Result<NodeId, IrError> {
    value
        .as_u64()
        .and_then(|id| NodeId::try_from(id).ok())
        .ok_or_else(|| {
            IrError::MalformedDocument(format!(
                "attribute `{key}`: expected a node id, got {value}"
            ))
        })
}

impl Serialize for NodeValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            NodeValue::String(s) => serializer.serialize_str(s),
            NodeValue::Number(n) => serializer.serialize_f64(*n),
            NodeValue::Boolean(b) => serializer.serialize_bool(*b),
            NodeValue::Null => serializer.serialize_unit(),
            NodeValue::ArrayRef(ids) => {
                let mut seq = serializer.serialize_seq(Some(ids.len()))?;
                for id in ids {
                    seq.serialize_element(id)?;
                }
                seq.end()
            }
            NodeValue::ObjectRef(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (name, id) in entries {
                    map.serialize_entry(name, id)?;
                }
                map.end()
            }
        }
    }
}

impl From<&str> for NodeValue {
    fn from(s: &str) -> Self {
        NodeValue::String(s.to_string())
    }
}

impl From<String> for NodeValue {
    fn from(s: String) -> Self {
        NodeValue::String(s)
    }
}

impl From<f64> for NodeValue {
    fn from(n: f64) -> Self {
        NodeValue::Number(n)
    }
}

impl From<bool> for NodeValue {
    fn from(b: bool) -> Self {
        NodeValue::Boolean(b)
    }
}

impl From<Vec<NodeId>> for NodeValue {
    fn from(ids: Vec<NodeId>) -> Self {
        NodeValue::ArrayRef(ids)
    }
}
