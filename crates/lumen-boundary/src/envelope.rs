//! The detailed result envelope.
//!
//! The plain operations return a document or null and nothing else. The
//! detailed variant wraps the outcome instead, so the caller can tell why a
//! call failed:
//!
//! ```text
//! {"ok": <canonical document>}
//! {"error": {"kind": "UnsupportedSyntax", "message": "...", "location": {...}}}
//! ```

use lumen_ir::document::DocumentView;
use lumen_ir::{Arena, ErrorKind, SourceLocation};
use serde::Serialize;

use crate::error::BoundaryError;

#[derive(Serialize)]
struct Success<'a> {
    ok: DocumentView<'a>,
}

#[derive(Serialize)]
struct Failure {
    error: ErrorBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,
}

impl From<&BoundaryError> for ErrorBody {
    fn from(err: &BoundaryError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
            location: err.location(),
        }
    }
}

// String keys into an in-memory writer; rendering cannot fail.
const INFALLIBLE: &str = "in-memory envelope rendering failed";

pub fn success(arena: &Arena) -> Vec<u8> {
    serde_json::to_vec(&Success {
        ok: DocumentView(arena),
    })
    .expect(INFALLIBLE)
}

pub fn failure(err: &BoundaryError) -> Vec<u8> {
    serde_json::to_vec(&Failure { error: err.into() }).expect(INFALLIBLE)
}
