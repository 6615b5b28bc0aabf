//! Grammar selection.
//!
//! One tree-sitter grammar per capability profile. The JavaScript grammar
//! recognises markup natively, so markup under a variant without the markup
//! capability is rejected by the build pass rather than by the grammar.

use tree_sitter::{Language, Parser, Tree};

use crate::error::ParseError;
use crate::variant::Capabilities;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grammar {
    JavaScript,
    TypeScript,
    Tsx,
}

impl Grammar {
    pub fn for_capabilities(caps: Capabilities) -> Self {
        match (caps.typed, caps.markup) {
            (false, _) => Grammar::JavaScript,
            (true, false) => Grammar::TypeScript,
            (true, true) => Grammar::Tsx,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Grammar::JavaScript => "javascript",
            Grammar::TypeScript => "typescript",
            Grammar::Tsx => "tsx",
        }
    }

    /// Richer grammars to try when this one rejects the source, used to tell
    /// an unsupported construct from a plain syntax error.
    pub fn probes(&self, caps: Capabilities) -> &'static [Grammar] {
        match self {
            Grammar::JavaScript if caps.markup => &[Grammar::Tsx],
            Grammar::JavaScript => &[Grammar::TypeScript, Grammar::Tsx],
            Grammar::TypeScript => &[Grammar::Tsx],
            Grammar::Tsx => &[],
        }
    }

    pub fn language(&self) -> Result<Language, ParseError> {
        match self {
            #[cfg(feature = "script")]
            Grammar::JavaScript => Ok(arborium_javascript::language().into()),
            #[cfg(feature = "typed")]
            Grammar::TypeScript => Ok(arborium_typescript::language().into()),
            #[cfg(feature = "typed")]
            Grammar::Tsx => Ok(arborium_tsx::language().into()),
            #[allow(unreachable_patterns)]
            other => Err(ParseError::GrammarUnavailable(other.name())),
        }
    }

    pub fn parse(&self, source: &str) -> Result<Tree, ParseError> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.language()?)
            .map_err(|err| ParseError::Grammar(err.to_string()))?;
        parser
            .parse(source, None)
            .ok_or_else(|| ParseError::Grammar(format!("{} parser produced no tree", self.name())))
    }
}
