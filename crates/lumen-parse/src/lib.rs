//! Variant dispatch and the build pass that populates a lumen IR arena.
//!
//! Four language variants share one build pass. A variant selects a set of
//! [`Capabilities`] (type annotations, markup); the capabilities select a
//! tree-sitter grammar and decide which constructs are accepted.
//!
//! # Architecture
//!
//! ```text
//! Variant ─> Capabilities ─> Grammar ─> tree-sitter Tree
//!                                            │
//!                                       BuildPass (build.rs)
//!                                            │
//!                                            v
//!                                      lumen_ir::Arena
//! ```
//!
//! # Example
//!
//! ```ignore
//! use lumen_parse::{Variant, parse};
//!
//! let arena = parse("var x = 42;", Variant::Script)?;
//! let bytes = lumen_ir::document::to_canonical_bytes(&arena);
//! ```

mod build;
pub mod error;
pub mod grammar;
pub mod kinds;
pub mod literal;
pub mod options;
pub mod registry;
pub mod traits;
pub mod variant;

use std::path::Path;
use std::time::Instant;

use lumen_ir::{Arena, SourceLocation};
use tree_sitter::Node;

pub use error::ParseError;
pub use grammar::Grammar;
pub use options::{BuildLimits, ParseOptions};
pub use registry::{reader_for_extension, reader_for_name, readers, register_reader};
pub use traits::{Reader, VariantReader};
pub use variant::{Capabilities, Variant};

/// Parse source text with default options for `variant`.
pub fn parse(source: &str, variant: Variant) -> Result<Arena, ParseError> {
    parse_with_options(source, &ParseOptions::for_variant(variant))
}

pub fn parse_script(source: &str) -> Result<Arena, ParseError> {
    parse(source, Variant::Script)
}

pub fn parse_typed_script(source: &str) -> Result<Arena, ParseError> {
    parse(source, Variant::TypedScript)
}

pub fn parse_script_markup(source: &str) -> Result<Arena, ParseError> {
    parse(source, Variant::ScriptMarkup)
}

pub fn parse_typed_script_markup(source: &str) -> Result<Arena, ParseError> {
    parse(source, Variant::TypedScriptMarkup)
}

/// Parse raw bytes, rejecting input that is not UTF-8.
pub fn parse_bytes(source: &[u8], options: &ParseOptions) -> Result<Arena, ParseError> {
    parse_with_options(std::str::from_utf8(source)?, options)
}

/// Parse a file, choosing the variant from its extension.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Arena, ParseError> {
    let path = path.as_ref();
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let variant =
        Variant::from_extension(ext).ok_or_else(|| ParseError::UnknownExtension(ext.to_string()))?;
    let bytes = std::fs::read(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let options = ParseOptions::for_variant(variant).with_source_path(path.display().to_string());
    parse_bytes(&bytes, &options)
}

pub fn parse_with_options(source: &str, options: &ParseOptions) -> Result<Arena, ParseError> {
    let max = options.limits.max_source_bytes;
    if source.len() > max {
        return Err(ParseError::LimitExceeded {
            limit: "source bytes",
            value: source.len(),
            max,
        });
    }

    let started = Instant::now();
    let caps = options.variant.capabilities();
    let grammar = Grammar::for_capabilities(caps);
    let tree = grammar.parse(source)?;
    let root = tree.root_node();
    if root.has_error() {
        return Err(diagnose(source, options.variant, grammar, root));
    }

    let arena = build::BuildPass::new(source, options).run(&tree)?;
    tracing::debug!(
        variant = %options.variant,
        grammar = grammar.name(),
        nodes = arena.len(),
        elapsed = ?started.elapsed(),
        "built arena"
    );
    Ok(arena)
}

/// Turn a rejected parse into an error. If a richer grammar accepts the
/// source, the input used a construct the variant lacks.
fn diagnose(source: &str, variant: Variant, grammar: Grammar, root: Node) -> ParseError {
    let location = first_error(root)
        .map(build::location_of)
        .unwrap_or_else(|| SourceLocation::of_text(source));
    let caps = variant.capabilities();
    for probe in grammar.probes(caps) {
        match probe.parse(source) {
            Ok(tree) if !tree.root_node().has_error() => {
                let construct = if caps.typed {
                    "markup element"
                } else {
                    "type annotation"
                };
                return ParseError::UnsupportedSyntax {
                    construct,
                    variant,
                    location,
                };
            }
            Ok(_) => {}
            Err(err) => tracing::debug!(grammar = probe.name(), %err, "probe skipped"),
        }
    }
    ParseError::Syntax { location }
}

fn first_error<'tree>(node: Node<'tree>) -> Option<Node<'tree>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    node.children(&mut cursor).find_map(first_error)
}
