//! External transform stages that consume and produce IR documents.
//!
//! Code generation, optimization and wasm emission live outside this
//! toolchain. Implementations plug in through the traits here and the
//! registries in [`crate::registry`]; the boundary only validates documents
//! on the way in and serializes results on the way out.

use lumen_ir::{Arena, ErrorKind, IrError};
use serde::{Deserialize, Serialize};

/// Options handed to a [`CodeGenerator`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CodegenOptions {
    pub minify: bool,
    pub sourcemap: bool,
    /// Output language level, e.g. "es2020"
    pub target: String,
    pub inline_sources: bool,
    pub preserve_comments: bool,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        Self {
            minify: false,
            sourcemap: false,
            target: "es2020".to_string(),
            inline_sources: false,
            preserve_comments: true,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error("unsupported: {0}")]
    Unsupported(String),

    #[error("{0}")]
    Failed(String),

    #[error(transparent)]
    Ir(#[from] IrError),
}

impl TransformError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TransformError::Unsupported(_) => ErrorKind::UnsupportedSyntax,
            TransformError::Failed(_) => ErrorKind::InvalidInput,
            TransformError::Ir(err) => err.kind(),
        }
    }
}

/// Renders an arena as source text.
pub trait CodeGenerator: Send + Sync {
    fn name(&self) -> &'static str;

    /// Targets accepted in [`CodegenOptions::target`].
    fn targets(&self) -> &'static [&'static str];

    fn generate(&self, arena: &Arena, options: &CodegenOptions) -> Result<String, TransformError>;
}

/// Rewrites an arena. Level 0 must leave the tree unchanged.
pub trait Optimizer: Send + Sync {
    fn name(&self) -> &'static str;

    fn optimize(&self, arena: Arena, level: u32) -> Result<Arena, TransformError>;
}

/// Compiles an arena to a WebAssembly module.
pub trait WasmEmitter: Send + Sync {
    fn name(&self) -> &'static str;

    /// `options` is the caller's options document, `{}` when none was given.
    fn emit(&self, arena: &Arena, options: &serde_json::Value) -> Result<Vec<u8>, TransformError>;
}
