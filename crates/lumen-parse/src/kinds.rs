//! Grammar node kinds and the node types they produce.

use lumen_ir::NodeType;

/// How the build pass treats one named grammar node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
    /// Create a node and descend into its children.
    Branch(NodeType),
    /// Create a node; its children are not visited.
    Leaf(NodeType),
    /// Create nothing; children are hoisted into the nearest created ancestor.
    Transparent,
    /// Drop the node and everything under it.
    Skip,
}

pub fn classify(kind: &str) -> Class {
    use NodeType::*;

    if is_type_syntax(kind) {
        return Class::Leaf(TsType);
    }

    match kind {
        "program" => Class::Branch(Program),

        // Declarations
        "function_declaration"
        | "generator_function_declaration"
        | "function_expression"
        | "function"
        | "generator_function"
        | "method_definition"
        | "function_signature" => Class::Branch(FunctionDeclaration),
        "variable_declaration" | "lexical_declaration" => Class::Branch(VariableDeclaration),
        "class_declaration" | "class" | "abstract_class_declaration" => {
            Class::Branch(ClassDeclaration)
        }
        "import_statement" => Class::Branch(ImportDeclaration),
        "export_statement" => Class::Branch(ExportDeclaration),

        // Expressions
        "binary_expression" | "assignment_expression" | "augmented_assignment_expression" => {
            Class::Branch(BinaryExpression)
        }
        "unary_expression" | "update_expression" => Class::Branch(UnaryExpression),
        "call_expression" | "new_expression" => Class::Branch(CallExpression),
        "member_expression" | "subscript_expression" => Class::Branch(MemberExpression),
        "arrow_function" => Class::Branch(ArrowFunctionExpression),
        "object" => Class::Branch(ObjectExpression),
        "array" => Class::Branch(ArrayExpression),

        // Statements
        "statement_block" | "class_body" => Class::Branch(BlockStatement),
        "if_statement" => Class::Branch(IfStatement),
        "for_statement" | "for_in_statement" => Class::Branch(ForStatement),
        "while_statement" | "do_statement" => Class::Branch(WhileStatement),
        "try_statement" => Class::Branch(TryStatement),
        "return_statement" => Class::Branch(ReturnStatement),

        // Literals
        "string" => Class::Leaf(StringLiteral),
        "template_string" => Class::Branch(StringLiteral),
        "number" => Class::Leaf(NumericLiteral),
        "true" | "false" => Class::Leaf(BooleanLiteral),
        "null" => Class::Leaf(NullLiteral),
        "regex" => Class::Leaf(RegExpLiteral),

        "identifier"
        | "property_identifier"
        | "shorthand_property_identifier"
        | "shorthand_property_identifier_pattern"
        | "private_property_identifier"
        | "statement_identifier"
        | "type_identifier"
        | "this"
        | "super"
        | "undefined" => Class::Leaf(Identifier),

        // Markup
        "jsx_element" | "jsx_self_closing_element" => Class::Branch(JsxElement),
        "jsx_attribute" => Class::Branch(JsxAttribute),
        "jsx_text" => Class::Leaf(StringLiteral),

        // Type system
        "interface_declaration" => Class::Branch(TsInterface),
        "enum_declaration" => Class::Branch(TsEnum),

        "comment" | "hash_bang_line" => Class::Leaf(Comment),

        "variable_declarator"
        | "expression_statement"
        | "parenthesized_expression"
        | "arguments"
        | "formal_parameters"
        | "else_clause"
        | "pair"
        | "jsx_opening_element"
        | "jsx_expression"
        | "template_substitution"
        | "catch_clause"
        | "finally_clause"
        | "import_clause"
        | "named_imports"
        | "import_specifier"
        | "namespace_import"
        | "export_clause"
        | "export_specifier"
        | "enum_body"
        | "enum_assignment"
        | "interface_body"
        | "required_parameter"
        | "optional_parameter"
        | "class_heritage"
        | "extends_clause" => Class::Transparent,

        "jsx_closing_element" | "empty_statement" | "string_fragment" | "escape_sequence" => {
            Class::Skip
        }

        _ => Class::Branch(Unknown),
    }
}

/// Kinds that only exist in typed grammars and carry type information.
pub fn is_type_syntax(kind: &str) -> bool {
    matches!(
        kind,
        "type_annotation"
            | "opting_type_annotation"
            | "omitting_type_annotation"
            | "asserts_annotation"
            | "type_predicate_annotation"
            | "type_alias_declaration"
            | "type_parameters"
            | "type_arguments"
            | "implements_clause"
            | "property_signature"
            | "method_signature"
            | "index_signature"
            | "call_signature"
            | "construct_signature"
            | "abstract_method_signature"
    )
}

pub fn is_markup(kind: &str) -> bool {
    kind.starts_with("jsx_")
}
