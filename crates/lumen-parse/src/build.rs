//! The build pass: one walk over a grammar tree that populates an arena.
//!
//! Every named grammar node is classified by [`crate::kinds::classify`].
//! Created nodes are attached to the nearest created ancestor in source
//! order, so ids come out in pre-order. Transparent nodes hand their
//! children (and the field bindings under them) up to that ancestor.

use std::collections::BTreeMap;

use lumen_ir::{Arena, NodeId, NodeType, NodeValue, SourceLocation};
use tree_sitter::{Node, Tree, TreeCursor};

use crate::error::ParseError;
use crate::kinds::{self, Class};
use crate::literal;
use crate::options::ParseOptions;
use crate::variant::Capabilities;

/// Grammar position to a 1-indexed, end-exclusive location.
pub(crate) fn location_of(node: Node) -> SourceLocation {
    let start = node.start_position();
    let end = node.end_position();
    SourceLocation::new(
        start.row as u32 + 1,
        start.column as u32 + 1,
        end.row as u32 + 1,
        end.column as u32 + 1,
    )
}

/// What visiting one grammar node handed back to its created ancestor.
#[derive(Debug, Default)]
struct Produced {
    ids: Vec<NodeId>,
    fields: Vec<(&'static str, NodeId)>,
    params: Vec<NodeId>,
    arguments: Vec<NodeId>,
}

impl Produced {
    fn single(id: NodeId) -> Self {
        Self {
            ids: vec![id],
            ..Self::default()
        }
    }
}

/// Who receives a frame's output once all its children are visited.
#[derive(Debug, Clone, Copy)]
enum Owner {
    Root,
    Transparent,
    Created { id: NodeId, node_type: NodeType },
}

/// One grammar node whose children are being visited.
struct Frame<'tree> {
    kind: &'static str,
    cursor: TreeCursor<'tree>,
    parent: NodeId,
    depth: usize,
    owner: Owner,
    exhausted: bool,
    out: Produced,
}

impl<'tree> Frame<'tree> {
    /// `depth` is the depth its children are visited at.
    fn open(node: Node<'tree>, parent: NodeId, depth: usize, owner: Owner) -> Self {
        let mut cursor = node.walk();
        let exhausted = !cursor.goto_first_child();
        Self {
            kind: node.kind(),
            cursor,
            parent,
            depth,
            owner,
            exhausted,
            out: Produced::default(),
        }
    }

    fn advance(&mut self) {
        self.exhausted = !self.cursor.goto_next_sibling();
    }

    /// Fold the output of the child under the cursor into this frame.
    fn absorb(&mut self, produced: Produced) {
        let out = &mut self.out;
        let first = produced.ids.first().copied();
        if let (Some(field), Some(first)) = (self.cursor.field_name(), first) {
            out.fields.push((field, first));
            if field == "parameter" {
                out.params.push(first);
            }
        }
        if let Some(first) = first.filter(|_| self.cursor.node().kind() != "comment") {
            match self.kind {
                "formal_parameters" => out.params.push(first),
                "arguments" => out.arguments.push(first),
                _ => {}
            }
        }
        out.ids.extend(produced.ids);
        out.fields.extend(produced.fields);
        out.params.extend(produced.params);
        out.arguments.extend(produced.arguments);
    }
}

/// Outcome of entering one named grammar node.
enum Step<'tree> {
    Done(Produced),
    Descend(Frame<'tree>),
}

pub(crate) struct BuildPass<'a> {
    source: &'a str,
    options: &'a ParseOptions,
    caps: Capabilities,
    arena: Arena,
}

impl<'a> BuildPass<'a> {
    pub(crate) fn new(source: &'a str, options: &'a ParseOptions) -> Self {
        let mut arena = Arena::new();
        if let Some(path) = &options.source_path {
            arena.set_source_path(path.clone());
        }
        Self {
            source,
            options,
            caps: options.variant.capabilities(),
            arena,
        }
    }

    pub(crate) fn run(mut self, tree: &Tree) -> Result<Arena, ParseError> {
        let root = self.arena.root_id();
        self.arena
            .set_location(root, SourceLocation::of_text(self.source))?;
        self.walk(tree.root_node(), root)?;
        Ok(self.arena)
    }

    /// Pre-order walk with an explicit stack; nesting depth is bounded only
    /// by the configured limit.
    fn walk(&mut self, root_node: Node, root: NodeId) -> Result<(), ParseError> {
        let mut stack = vec![Frame::open(root_node, root, 1, Owner::Root)];
        while let Some(frame) = stack.last_mut() {
            if frame.exhausted {
                let Some(done) = stack.pop() else { break };
                let produced = self.close(done.owner, done.out)?;
                if let Some(outer) = stack.last_mut() {
                    outer.absorb(produced);
                    outer.advance();
                }
                continue;
            }

            let child = frame.cursor.node();
            if !child.is_named() {
                frame.advance();
                continue;
            }
            match self.enter(child, frame.parent, frame.depth)? {
                Step::Done(produced) => {
                    frame.absorb(produced);
                    frame.advance();
                }
                Step::Descend(inner) => stack.push(inner),
            }
        }
        Ok(())
    }

    fn text(&self, node: Node) -> &'a str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    fn field_text(&self, node: Node, field: &str) -> Option<&'a str> {
        node.child_by_field_name(field).map(|n| self.text(n))
    }

    fn unsupported(&self, construct: &'static str, node: Node) -> ParseError {
        ParseError::UnsupportedSyntax {
            construct,
            variant: self.options.variant,
            location: location_of(node),
        }
    }

    fn create(&mut self, node_type: NodeType) -> Result<NodeId, ParseError> {
        let max = self.options.limits.max_nodes;
        if self.arena.len() >= max {
            return Err(ParseError::LimitExceeded {
                limit: "nodes",
                value: self.arena.len() + 1,
                max,
            });
        }
        Ok(self.arena.create_node(node_type))
    }

    fn set(&mut self, id: NodeId, key: &str, value: impl Into<NodeValue>) -> Result<(), ParseError> {
        self.arena.set_attribute(id, key, value.into())?;
        Ok(())
    }

    fn enter<'tree>(
        &mut self,
        node: Node<'tree>,
        parent: NodeId,
        depth: usize,
    ) -> Result<Step<'tree>, ParseError> {
        let max_depth = self.options.limits.max_depth;
        if depth > max_depth {
            return Err(ParseError::LimitExceeded {
                limit: "depth",
                value: depth,
                max: max_depth,
            });
        }

        let kind = node.kind();
        if kinds::is_markup(kind) && !self.caps.markup {
            return Err(self.unsupported("markup element", node));
        }
        if kinds::is_type_syntax(kind) && !self.caps.typed {
            return Err(self.unsupported("type annotation", node));
        }

        let (node_type, descend) = match kinds::classify(kind) {
            Class::Skip => return Ok(Step::Done(Produced::default())),
            Class::Transparent => {
                return Ok(Step::Descend(Frame::open(
                    node,
                    parent,
                    depth + 1,
                    Owner::Transparent,
                )));
            }
            Class::Leaf(node_type) => (node_type, false),
            Class::Branch(node_type) => (node_type, true),
        };
        if node_type == NodeType::Comment && !self.options.comments {
            return Ok(Step::Done(Produced::default()));
        }
        if kind == "jsx_text" && self.text(node).trim().is_empty() {
            return Ok(Step::Done(Produced::default()));
        }

        let id = self.create(node_type)?;
        self.arena.add_child(parent, id)?;
        self.arena.set_location(id, location_of(node))?;

        if descend {
            self.branch_attributes(id, node, node_type)?;
            let owner = Owner::Created { id, node_type };
            Ok(Step::Descend(Frame::open(node, id, depth + 1, owner)))
        } else {
            self.leaf_attributes(id, node, node_type)?;
            Ok(Step::Done(Produced::single(id)))
        }
    }

    /// Complete a frame: created nodes record their gathered references and
    /// stand for themselves; transparent ones pass everything up.
    fn close(&mut self, owner: Owner, out: Produced) -> Result<Produced, ParseError> {
        match owner {
            Owner::Transparent => Ok(out),
            Owner::Created { id, node_type } => {
                self.finish(id, node_type, out)?;
                Ok(Produced::single(id))
            }
            Owner::Root => {
                let root = self.arena.root_id();
                self.finish(root, NodeType::Program, out)?;
                Ok(Produced::default())
            }
        }
    }

    /// Record the reference attributes gathered from a created node's children.
    fn finish(&mut self, id: NodeId, node_type: NodeType, produced: Produced) -> Result<(), ParseError> {
        if !produced.fields.is_empty() {
            let mut fields = BTreeMap::new();
            for (name, target) in produced.fields {
                fields.entry(name.to_string()).or_insert(target);
            }
            self.set(id, "fields", NodeValue::ObjectRef(fields))?;
        }
        match node_type {
            NodeType::FunctionDeclaration | NodeType::ArrowFunctionExpression => {
                self.set(id, "params", NodeValue::ArrayRef(produced.params))?;
            }
            NodeType::CallExpression => {
                self.set(id, "arguments", NodeValue::ArrayRef(produced.arguments))?;
            }
            _ => {}
        }
        Ok(())
    }

    fn branch_attributes(&mut self, id: NodeId, node: Node, node_type: NodeType) -> Result<(), ParseError> {
        let kind = node.kind();
        match kind {
            "variable_declaration" => {
                self.set(id, "kind", "var")?;
                self.set(id, "constant", false)?;
            }
            "lexical_declaration" => {
                let keyword = node.child(0).map(|n| self.text(n)).unwrap_or("let");
                self.set(id, "kind", keyword)?;
                self.set(id, "constant", keyword == "const")?;
            }
            "binary_expression" | "augmented_assignment_expression" | "unary_expression" => {
                let operator = self.field_text(node, "operator").unwrap_or("");
                self.set(id, "operator", operator)?;
                if kind == "unary_expression" {
                    self.set(id, "prefix", true)?;
                }
            }
            "assignment_expression" => self.set(id, "operator", "=")?,
            "update_expression" => {
                let operator = node.child_by_field_name("operator");
                let argument = node.child_by_field_name("argument");
                let prefix = match (operator, argument) {
                    (Some(op), Some(arg)) => op.start_byte() < arg.start_byte(),
                    _ => false,
                };
                self.set(id, "operator", operator.map(|n| self.text(n)).unwrap_or(""))?;
                self.set(id, "prefix", prefix)?;
            }
            "member_expression" => self.set(id, "computed", false)?,
            "subscript_expression" => self.set(id, "computed", true)?,
            "call_expression" => self.set(id, "new", false)?,
            "new_expression" => self.set(id, "new", true)?,
            "for_statement" => self.set(id, "kind", "for")?,
            "for_in_statement" => {
                let operator = self.field_text(node, "operator").unwrap_or("in");
                self.set(id, "kind", operator)?;
            }
            "while_statement" => self.set(id, "kind", "while")?,
            "do_statement" => self.set(id, "kind", "do")?,
            "import_statement" => {
                if let Some(source) = self.field_text(node, "source") {
                    self.set(id, "source", literal::unquote(source))?;
                }
            }
            "export_statement" => {
                let mut cursor = node.walk();
                let default = node.children(&mut cursor).any(|c| c.kind() == "default");
                self.set(id, "default", default)?;
            }
            "jsx_element" => {
                let name = node
                    .child_by_field_name("open_tag")
                    .and_then(|tag| self.field_text(tag, "name"));
                if let Some(name) = name {
                    self.set(id, "name", name)?;
                }
            }
            "jsx_self_closing_element" => {
                if let Some(name) = self.field_text(node, "name") {
                    self.set(id, "name", name)?;
                }
            }
            "jsx_attribute" => {
                if let Some(name) = node.named_child(0).map(|n| self.text(n)) {
                    self.set(id, "name", name)?;
                }
            }
            "template_string" => {
                let raw = self.text(node);
                let inner = raw
                    .strip_prefix('`')
                    .and_then(|s| s.strip_suffix('`'))
                    .unwrap_or(raw);
                self.set(id, "value", inner)?;
                self.set(id, "template", true)?;
            }
            _ => {}
        }

        match node_type {
            NodeType::FunctionDeclaration
            | NodeType::ClassDeclaration
            | NodeType::TsInterface
            | NodeType::TsEnum => {
                if let Some(name) = self.field_text(node, "name") {
                    self.set(id, "name", name)?;
                }
            }
            NodeType::Unknown => self.set(id, "kind", kind)?,
            _ => {}
        }
        Ok(())
    }

    fn leaf_attributes(&mut self, id: NodeId, node: Node, node_type: NodeType) -> Result<(), ParseError> {
        let text = self.text(node);
        match node_type {
            NodeType::Identifier => self.set(id, "name", text)?,
            NodeType::StringLiteral if node.kind() == "jsx_text" => self.set(id, "value", text.trim())?,
            NodeType::StringLiteral => {
                self.set(id, "value", literal::unquote(text))?;
                self.set(id, "raw", text)?;
            }
            NodeType::NumericLiteral => {
                let value = literal::parse_number(text).map_or(NodeValue::Null, NodeValue::Number);
                self.set(id, "value", value)?;
                self.set(id, "raw", text)?;
                if text.ends_with('n') {
                    self.set(id, "bigint", true)?;
                }
            }
            NodeType::BooleanLiteral => self.set(id, "value", text == "true")?,
            NodeType::NullLiteral => self.set(id, "value", NodeValue::Null)?,
            NodeType::RegExpLiteral => {
                let pattern = self.field_text(node, "pattern").unwrap_or("");
                let flags = self.field_text(node, "flags").unwrap_or("");
                self.set(id, "pattern", pattern)?;
                self.set(id, "flags", flags)?;
            }
            NodeType::Comment => self.set(id, "text", text)?,
            NodeType::TsType => {
                self.set(id, "kind", node.kind())?;
                let annotation = match node.kind() {
                    "type_annotation" | "opting_type_annotation" | "omitting_type_annotation" => {
                        text.trim_start_matches(['?', '-', ':']).trim()
                    }
                    _ => text,
                };
                self.set(id, "annotation", annotation)?;
                if let Some(name) = self.field_text(node, "name") {
                    self.set(id, "name", name)?;
                }
            }
            _ => {}
        }
        Ok(())
    }
}
