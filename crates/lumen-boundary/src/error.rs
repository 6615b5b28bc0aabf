//! Boundary errors.

use lumen_ir::{ErrorKind, IrError, SourceLocation};
use lumen_parse::ParseError;

use crate::transform::TransformError;

#[derive(Debug, thiserror::Error)]
pub enum BoundaryError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("invalid IR document: {0}")]
    InvalidDocument(#[source] IrError),

    #[error("unknown variant code: {0}")]
    UnknownVariant(u32),

    #[error("invalid options document: {0}")]
    InvalidOptions(#[source] serde_json::Error),

    #[error("{0} argument is not valid UTF-8")]
    InvalidText(&'static str),

    #[error("null {0} pointer")]
    NullPointer(&'static str),

    #[error("no {stage} registered for {target:?}")]
    NoTransformer {
        stage: &'static str,
        target: Option<String>,
    },

    #[error("{stage} failed: {source}")]
    Transform {
        stage: &'static str,
        #[source]
        source: TransformError,
    },
}

impl BoundaryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BoundaryError::Parse(err) => err.kind(),
            BoundaryError::InvalidDocument(_)
            | BoundaryError::UnknownVariant(_)
            | BoundaryError::InvalidOptions(_)
            | BoundaryError::InvalidText(_)
            | BoundaryError::NullPointer(_) => ErrorKind::InvalidInput,
            BoundaryError::NoTransformer { .. } => ErrorKind::UnsupportedSyntax,
            BoundaryError::Transform { source, .. } => source.kind(),
        }
    }

    pub fn location(&self) -> Option<SourceLocation> {
        match self {
            BoundaryError::Parse(err) => err.location(),
            _ => None,
        }
    }
}
