//! Node types, source spans and the node record itself.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::value::NodeValue;

/// Identity of a node inside one arena.
pub type NodeId = u32;

/// Largest `nextId` an arena accepts from a decoded document.
///
/// The upper half of the id space stays free for nodes created after
/// decoding. Filling it would take more nodes than fit in memory.
pub const MAX_NEXT_ID: NodeId = NodeId::MAX / 2;

/// Syntactic category of a node.
///
/// The set is closed: the wire document only accepts the names in
/// [`NodeType::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeType {
    // Top level
    Program,
    Module,

    // Declarations
    FunctionDeclaration,
    VariableDeclaration,
    ClassDeclaration,
    ImportDeclaration,
    ExportDeclaration,

    // Expressions
    BinaryExpression,
    UnaryExpression,
    CallExpression,
    MemberExpression,
    ArrowFunctionExpression,
    ObjectExpression,
    ArrayExpression,

    // Statements
    BlockStatement,
    IfStatement,
    ForStatement,
    WhileStatement,
    TryStatement,
    ReturnStatement,

    // Literals
    StringLiteral,
    NumericLiteral,
    BooleanLiteral,
    NullLiteral,
    RegExpLiteral,

    Identifier,

    // Markup
    #[serde(rename = "JSXElement")]
    JsxElement,
    #[serde(rename = "JSXAttribute")]
    JsxAttribute,

    // Type system
    #[serde(rename = "TSType")]
    TsType,
    #[serde(rename = "TSInterface")]
    TsInterface,
    #[serde(rename = "TSEnum")]
    TsEnum,

    Comment,
    Unknown,
}

impl NodeType {
    /// Every node type, in declaration order.
    pub const ALL: [NodeType; 33] = [
        NodeType::Program,
        NodeType::Module,
        NodeType::FunctionDeclaration,
        NodeType::VariableDeclaration,
        NodeType::ClassDeclaration,
        NodeType::ImportDeclaration,
        NodeType::ExportDeclaration,
        NodeType::BinaryExpression,
        NodeType::UnaryExpression,
        NodeType::CallExpression,
        NodeType::MemberExpression,
        NodeType::ArrowFunctionExpression,
        NodeType::ObjectExpression,
        NodeType::ArrayExpression,
        NodeType::BlockStatement,
        NodeType::IfStatement,
        NodeType::ForStatement,
        NodeType::WhileStatement,
        NodeType::TryStatement,
        NodeType::ReturnStatement,
        NodeType::StringLiteral,
        NodeType::NumericLiteral,
        NodeType::BooleanLiteral,
        NodeType::NullLiteral,
        NodeType::RegExpLiteral,
        NodeType::Identifier,
        NodeType::JsxElement,
        NodeType::JsxAttribute,
        NodeType::TsType,
        NodeType::TsInterface,
        NodeType::TsEnum,
        NodeType::Comment,
        NodeType::Unknown,
    ];

    /// Wire name of this node type.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Program => "Program",
            NodeType::Module => "Module",
            NodeType::FunctionDeclaration => "FunctionDeclaration",
            NodeType::VariableDeclaration => "VariableDeclaration",
            NodeType::ClassDeclaration => "ClassDeclaration",
            NodeType::ImportDeclaration => "ImportDeclaration",
            NodeType::ExportDeclaration => "ExportDeclaration",
            NodeType::BinaryExpression => "BinaryExpression",
            NodeType::UnaryExpression => "UnaryExpression",
            NodeType::CallExpression => "CallExpression",
            NodeType::MemberExpression => "MemberExpression",
            NodeType::ArrowFunctionExpression => "ArrowFunctionExpression",
            NodeType::ObjectExpression => "ObjectExpression",
            NodeType::ArrayExpression => "ArrayExpression",
            NodeType::BlockStatement => "BlockStatement",
            NodeType::IfStatement => "IfStatement",
            NodeType::ForStatement => "ForStatement",
            NodeType::WhileStatement => "WhileStatement",
            NodeType::TryStatement => "TryStatement",
            NodeType::ReturnStatement => "ReturnStatement",
            NodeType::StringLiteral => "StringLiteral",
            NodeType::NumericLiteral => "NumericLiteral",
            NodeType::BooleanLiteral => "BooleanLiteral",
            NodeType::NullLiteral => "NullLiteral",
            NodeType::RegExpLiteral => "RegExpLiteral",
            NodeType::Identifier => "Identifier",
            NodeType::JsxElement => "JSXElement",
            NodeType::JsxAttribute => "JSXAttribute",
            NodeType::TsType => "TSType",
            NodeType::TsInterface => "TSInterface",
            NodeType::TsEnum => "TSEnum",
            NodeType::Comment => "Comment",
            NodeType::Unknown => "Unknown",
        }
    }

    /// Literal categories carry their value in attributes. They have no
    /// children, except template strings (`template: true`), whose
    /// substitution expressions are their children.
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            NodeType::StringLiteral
                | NodeType::NumericLiteral
                | NodeType::BooleanLiteral
                | NodeType::NullLiteral
                | NodeType::RegExpLiteral
        )
    }

    pub fn is_markup(&self) -> bool {
        matches!(self, NodeType::JsxElement | NodeType::JsxAttribute)
    }

    pub fn is_type_system(&self) -> bool {
        matches!(
            self,
            NodeType::TsType | NodeType::TsInterface | NodeType::TsEnum
        )
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeType::ALL
            .iter()
            .find(|ty| ty.as_str() == s)
            .copied()
            .ok_or_else(|| format!("unknown node type: {s}"))
    }
}

/// A span in the source text.
///
/// Lines and columns are 1-indexed; columns count UTF-8 bytes from the start
/// of the line. The end position is exclusive. The all-zero value means the
/// span is unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceLocation {
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
}

impl SourceLocation {
    pub fn new(start_line: u32, start_column: u32, end_line: u32, end_column: u32) -> Self {
        Self {
            start_line,
            start_column,
            end_line,
            end_column,
        }
    }

    /// Span covering all of `text`, from `1:1` to one past its last byte.
    pub fn of_text(text: &str) -> Self {
        let mut line = 1u32;
        let mut line_start = 0usize;
        for (offset, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line += 1;
                line_start = offset + 1;
            }
        }
        let column = (text.len() - line_start) as u32 + 1;
        Self::new(1, 1, line, column)
    }

    pub fn is_unknown(&self) -> bool {
        *self == Self::default()
    }

    /// Whether `other` lies within this span.
    pub fn contains(&self, other: &SourceLocation) -> bool {
        (self.start_line, self.start_column) <= (other.start_line, other.start_column)
            && (other.end_line, other.end_column) <= (self.end_line, self.end_column)
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}-{}:{}",
            self.start_line, self.start_column, self.end_line, self.end_column
        )
    }
}

/// One element of the tree.
///
/// Nodes are only created through [`crate::Arena`], which owns the links
/// between them.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) node_type: NodeType,
    pub(crate) attributes: BTreeMap<String, NodeValue>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) location: SourceLocation,
}

impl Node {
    pub(crate) fn new(id: NodeId, node_type: NodeType) -> Self {
        Self {
            id,
            node_type,
            attributes: BTreeMap::new(),
            children: Vec::new(),
            parent: None,
            location: SourceLocation::default(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn location(&self) -> SourceLocation {
        self.location
    }

    /// Attributes in key order.
    pub fn attributes(&self) -> &BTreeMap<String, NodeValue> {
        &self.attributes
    }

    pub fn get_value(&self, key: &str) -> Option<&NodeValue> {
        self.attributes.get(key)
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.get_value(key).and_then(NodeValue::as_str)
    }

    pub fn get_number(&self, key: &str) -> Option<f64> {
        self.get_value(key).and_then(NodeValue::as_number)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get_value(key).and_then(NodeValue::as_bool)
    }
}
