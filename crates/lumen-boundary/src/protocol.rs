//! Safe entry points of the boundary protocol.
//!
//! Each call is independent: it builds or decodes its own arena and returns
//! either an owned buffer or `None`. On `None` the reason is only available on
//! the `tracing` side channel; [`parse_detailed`] returns it in-band instead.

use lumen_ir::{Arena, ErrorKind, document};
use lumen_parse::{ParseOptions, Variant};

use crate::buffer::OwnedBuffer;
use crate::envelope;
use crate::error::BoundaryError;
use crate::registry;
use crate::transform::{CodegenOptions, TransformError};

/// Parse `source` and return its canonical document.
pub fn parse(source: &[u8], variant: Variant) -> Option<OwnedBuffer> {
    let result = build_arena(source, &ParseOptions::for_variant(variant))
        .map(|arena| document::to_canonical_bytes(&arena));
    report("parse", result)
}

/// Like [`parse`], with a JSON [`ParseOptions`] document. An empty options
/// document means defaults.
pub fn parse_with_options(source: &[u8], options: &[u8]) -> Option<OwnedBuffer> {
    let result = decode_options(options)
        .and_then(|options| build_arena(source, &options))
        .map(|arena| document::to_canonical_bytes(&arena));
    report("parse", result)
}

/// Parse and always return an envelope: `{"ok": document}` or
/// `{"error": {kind, message, location}}`.
pub fn parse_detailed(source: &[u8], variant: Variant) -> OwnedBuffer {
    let result = build_arena(source, &ParseOptions::for_variant(variant));
    OwnedBuffer::new(envelope_for("parse", result))
}

/// Render a document as source text with the generator registered for
/// `target`.
pub fn generate_code(document: &[u8], minify: bool, target: &str) -> Option<OwnedBuffer> {
    let options = CodegenOptions {
        minify,
        target: target.to_string(),
        ..CodegenOptions::default()
    };
    generate_code_with_options(document, &options)
}

pub fn generate_code_with_options(document: &[u8], options: &CodegenOptions) -> Option<OwnedBuffer> {
    report("generate_code", generate_code_bytes(document, options))
}

/// Run the registered optimizer and return the canonical document of its
/// output.
pub fn optimize(document: &[u8], level: u32) -> Option<OwnedBuffer> {
    report("optimize", optimize_bytes(document, level))
}

/// Compile a document with the registered wasm emitter. An empty options
/// document means `{}`.
pub fn generate_wasm(document: &[u8], options: &[u8]) -> Option<OwnedBuffer> {
    report("generate_wasm", generate_wasm_bytes(document, options))
}

pub(crate) fn variant_from_code(code: u32) -> Result<Variant, BoundaryError> {
    Variant::from_code(code).ok_or(BoundaryError::UnknownVariant(code))
}

pub(crate) fn build_arena(source: &[u8], options: &ParseOptions) -> Result<Arena, BoundaryError> {
    Ok(lumen_parse::parse_bytes(source, options)?)
}

pub(crate) fn decode_options(options: &[u8]) -> Result<ParseOptions, BoundaryError> {
    if options.trim_ascii().is_empty() {
        return Ok(ParseOptions::default());
    }
    serde_json::from_slice(options).map_err(BoundaryError::InvalidOptions)
}

fn decode_document(document: &[u8]) -> Result<Arena, BoundaryError> {
    document::from_slice(document).map_err(BoundaryError::InvalidDocument)
}

pub(crate) fn generate_code_bytes(
    document: &[u8],
    options: &CodegenOptions,
) -> Result<Vec<u8>, BoundaryError> {
    let arena = decode_document(document)?;
    let generator = registry::code_generator_for_target(&options.target).ok_or_else(|| {
        BoundaryError::NoTransformer {
            stage: "code generator",
            target: Some(options.target.clone()),
        }
    })?;
    let code = generator
        .generate(&arena, options)
        .map_err(|source| BoundaryError::Transform {
            stage: "code generator",
            source,
        })?;
    tracing::debug!(generator = generator.name(), bytes = code.len(), "generated code");
    Ok(code.into_bytes())
}

pub(crate) fn optimize_bytes(document: &[u8], level: u32) -> Result<Vec<u8>, BoundaryError> {
    let arena = decode_document(document)?;
    let optimizer = registry::optimizer().ok_or(BoundaryError::NoTransformer {
        stage: "optimizer",
        target: None,
    })?;
    let transform_failed = |source: TransformError| BoundaryError::Transform {
        stage: "optimizer",
        source,
    };
    let before = arena.len();
    let optimized = optimizer.optimize(arena, level).map_err(transform_failed)?;
    optimized
        .validate()
        .map_err(|err| transform_failed(err.into()))?;
    tracing::debug!(
        optimizer = optimizer.name(),
        level,
        before,
        after = optimized.len(),
        "optimized arena"
    );
    Ok(document::to_canonical_bytes(&optimized))
}

pub(crate) fn generate_wasm_bytes(document: &[u8], options: &[u8]) -> Result<Vec<u8>, BoundaryError> {
    let arena = decode_document(document)?;
    let options = if options.trim_ascii().is_empty() {
        serde_json::Value::Object(serde_json::Map::new())
    } else {
        serde_json::from_slice(options).map_err(BoundaryError::InvalidOptions)?
    };
    let emitter = registry::wasm_emitter().ok_or(BoundaryError::NoTransformer {
        stage: "wasm emitter",
        target: None,
    })?;
    let module = emitter
        .emit(&arena, &options)
        .map_err(|source| BoundaryError::Transform {
            stage: "wasm emitter",
            source,
        })?;
    tracing::debug!(emitter = emitter.name(), bytes = module.len(), "emitted wasm");
    Ok(module)
}

/// Emit the failure diagnostic for `err`.
pub(crate) fn diagnose(operation: &'static str, err: &BoundaryError) {
    let kind = err.kind();
    let location = err.location().map(|l| l.to_string());
    let location = location.as_deref();
    if kind == ErrorKind::DanglingReference {
        // Only reachable through a bug in the build pass.
        tracing::error!(operation, %kind, location, "{err}");
    } else {
        tracing::warn!(operation, %kind, location, "{err}");
    }
}

pub(crate) fn report(
    operation: &'static str,
    result: Result<Vec<u8>, BoundaryError>,
) -> Option<OwnedBuffer> {
    match result {
        Ok(bytes) => Some(OwnedBuffer::new(bytes)),
        Err(err) => {
            diagnose(operation, &err);
            None
        }
    }
}

pub(crate) fn envelope_for(operation: &'static str, result: Result<Arena, BoundaryError>) -> Vec<u8> {
    match result {
        Ok(arena) => envelope::success(&arena),
        Err(err) => {
            diagnose(operation, &err);
            envelope::failure(&err)
        }
    }
}
