//! Error types shared by the IR layer.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::node::NodeId;

/// Failure taxonomy visible to callers of the toolchain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Source or document cannot be decoded or violates the wire schema.
    InvalidInput,
    /// A construct needs a language feature the selected variant lacks.
    UnsupportedSyntax,
    /// Internal invariant failure: a link or reference to a missing node.
    DanglingReference,
    /// Resource exhaustion, including configured build ceilings.
    AllocationFailure,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "InvalidInput",
            ErrorKind::UnsupportedSyntax => "UnsupportedSyntax",
            ErrorKind::DanglingReference => "DanglingReference",
            ErrorKind::AllocationFailure => "AllocationFailure",
        }
    }

    /// Whether a caller can meaningfully report this to a user.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ErrorKind::InvalidInput | ErrorKind::UnsupportedSyntax)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while building, validating or decoding an arena.
#[derive(Debug, thiserror::Error)]
pub enum IrError {
    #[error("dangling reference to node {id} ({context})")]
    DanglingReference { id: NodeId, context: String },

    #[error("the root node cannot be attached as a child")]
    RootAsChild,

    #[error("node {child} is already attached to parent {parent}")]
    AlreadyAttached { child: NodeId, parent: NodeId },

    #[error("attaching node {child} under {parent} would create a cycle")]
    Cycle { parent: NodeId, child: NodeId },

    #[error("attribute `{key}` is not a finite number")]
    NonFiniteNumber { key: String },

    #[error("malformed document: {0}")]
    MalformedDocument(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl IrError {
    pub(crate) fn dangling(id: NodeId, context: impl Into<String>) -> Self {
        IrError::DanglingReference {
            id,
            context: context.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            IrError::DanglingReference { .. }
            | IrError::RootAsChild
            | IrError::AlreadyAttached { .. }
            | IrError::Cycle { .. } => ErrorKind::DanglingReference,
            IrError::NonFiniteNumber { .. } | IrError::MalformedDocument(_) | IrError::Json(_) => {
                ErrorKind::InvalidInput
            }
        }
    }
}
