//! Parse errors.

use std::path::PathBuf;

use lumen_ir::{ErrorKind, IrError, SourceLocation};

use crate::variant::Variant;

/// Error that can occur when building an arena from source text.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("source is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    #[error("syntax error at {location}")]
    Syntax { location: SourceLocation },

    #[error("{construct} is not supported by the {variant} variant (at {location})")]
    UnsupportedSyntax {
        construct: &'static str,
        variant: Variant,
        location: SourceLocation,
    },

    #[error("{limit} limit exceeded: {value} > {max}")]
    LimitExceeded {
        limit: &'static str,
        value: usize,
        max: usize,
    },

    #[error("grammar not compiled in: {0}")]
    GrammarUnavailable(&'static str),

    #[error("grammar error: {0}")]
    Grammar(String),

    #[error(transparent)]
    Ir(#[from] IrError),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no variant handles extension: {0:?}")]
    UnknownExtension(String),
}

impl ParseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::InvalidUtf8(_)
            | ParseError::Syntax { .. }
            | ParseError::Grammar(_)
            | ParseError::Io { .. }
            | ParseError::UnknownExtension(_) => ErrorKind::InvalidInput,
            ParseError::UnsupportedSyntax { .. } | ParseError::GrammarUnavailable(_) => {
                ErrorKind::UnsupportedSyntax
            }
            ParseError::LimitExceeded { .. } => ErrorKind::AllocationFailure,
            ParseError::Ir(err) => err.kind(),
        }
    }

    /// Source span the error points at, when it has one.
    pub fn location(&self) -> Option<SourceLocation> {
        match self {
            ParseError::Syntax { location } | ParseError::UnsupportedSyntax { location, .. } => {
                Some(*location)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        let syntax = ParseError::Syntax {
            location: SourceLocation::new(1, 4, 1, 5),
        };
        assert_eq!(syntax.kind(), ErrorKind::InvalidInput);
        assert_eq!(syntax.location(), Some(SourceLocation::new(1, 4, 1, 5)));
        assert_eq!(syntax.to_string(), "syntax error at 1:4-1:5");

        let limit = ParseError::LimitExceeded {
            limit: "depth",
            value: 11,
            max: 10,
        };
        assert_eq!(limit.kind(), ErrorKind::AllocationFailure);
        assert_eq!(limit.location(), None);

        let ir = ParseError::from(IrError::RootAsChild);
        assert_eq!(ir.kind(), ErrorKind::DanglingReference);
    }

    #[test]
    fn test_unsupported_message() {
        let err = ParseError::UnsupportedSyntax {
            construct: "markup element",
            variant: Variant::Script,
            location: SourceLocation::new(2, 1, 2, 8),
        };
        assert_eq!(
            err.to_string(),
            "markup element is not supported by the script variant (at 2:1-2:8)"
        );
        assert_eq!(err.kind(), ErrorKind::UnsupportedSyntax);
    }
}
