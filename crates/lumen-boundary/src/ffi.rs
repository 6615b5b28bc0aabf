//! C exports.
//!
//! Functions returning `*mut LumenBuffer` return null on failure. Every
//! non-null handle must be passed to [`lumen_release`] exactly once. Passing a
//! pointer this library did not return, or releasing the same handle twice,
//! is undefined behavior.
//!
//! Input buffers are `(pointer, length)` pairs. A null pointer is accepted
//! only with length zero. Panics are caught and reported as null.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::ptr::null_mut;

use lumen_parse::ParseOptions;

use crate::buffer::{LumenBuffer, OwnedBuffer, live_buffers};
use crate::error::BoundaryError;
use crate::protocol;
use crate::transform::CodegenOptions;

fn guarded(
    operation: &'static str,
    call: impl FnOnce() -> Result<Vec<u8>, BoundaryError>,
) -> *mut LumenBuffer {
    match catch_unwind(AssertUnwindSafe(call)) {
        Ok(result) => match protocol::report(operation, result) {
            Some(buffer) => buffer.into_raw(),
            None => null_mut(),
        },
        Err(_) => {
            tracing::error!(operation, "panic caught at the boundary");
            null_mut()
        }
    }
}

/// # Safety
///
/// `ptr` must be null or valid for reads of `len` bytes for the whole call.
unsafe fn input<'a>(what: &'static str, ptr: *const u8, len: usize) -> Result<&'a [u8], BoundaryError> {
    if ptr.is_null() {
        return if len == 0 {
            Ok(&[])
        } else {
            Err(BoundaryError::NullPointer(what))
        };
    }
    // SAFETY: non-null and readable for `len` bytes per the caller contract.
    Ok(unsafe { std::slice::from_raw_parts(ptr, len) })
}

/// # Safety
///
/// Same contract as [`input`].
unsafe fn text<'a>(what: &'static str, ptr: *const u8, len: usize) -> Result<&'a str, BoundaryError> {
    let bytes = unsafe { input(what, ptr, len)? };
    std::str::from_utf8(bytes).map_err(|_| BoundaryError::InvalidText(what))
}

/// Parse source bytes under the variant with code `variant` (0 script,
/// 1 typed script, 2 script markup, 3 typed script markup).
///
/// # Safety
///
/// `source` must be null or valid for reads of `len` bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn lumen_parse(source: *const u8, len: usize, variant: u32) -> *mut LumenBuffer {
    guarded("parse", || {
        let source = unsafe { input("source", source, len)? };
        let variant = protocol::variant_from_code(variant)?;
        let arena = protocol::build_arena(source, &ParseOptions::for_variant(variant))?;
        Ok(lumen_ir::document::to_canonical_bytes(&arena))
    })
}

/// Parse with a JSON options document (`ParseOptions`).
///
/// # Safety
///
/// Both pointers must be null or valid for reads of their lengths.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn lumen_parse_with_options(
    source: *const u8,
    len: usize,
    options: *const u8,
    options_len: usize,
) -> *mut LumenBuffer {
    guarded("parse", || {
        let source = unsafe { input("source", source, len)? };
        let options = protocol::decode_options(unsafe { input("options", options, options_len)? })?;
        let arena = protocol::build_arena(source, &options)?;
        Ok(lumen_ir::document::to_canonical_bytes(&arena))
    })
}

/// Parse and return the result envelope. Null only if the call panicked.
///
/// # Safety
///
/// `source` must be null or valid for reads of `len` bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn lumen_parse_detailed(
    source: *const u8,
    len: usize,
    variant: u32,
) -> *mut LumenBuffer {
    guarded("parse", || {
        let result = unsafe { input("source", source, len) }.and_then(|source| {
            let variant = protocol::variant_from_code(variant)?;
            protocol::build_arena(source, &ParseOptions::for_variant(variant))
        });
        Ok(protocol::envelope_for("parse", result))
    })
}

/// # Safety
///
/// Both pointers must be null or valid for reads of their lengths.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn lumen_generate_code(
    document: *const u8,
    document_len: usize,
    minify: bool,
    target: *const u8,
    target_len: usize,
) -> *mut LumenBuffer {
    guarded("generate_code", || {
        let document = unsafe { input("document", document, document_len)? };
        let target = unsafe { text("target", target, target_len)? };
        let options = CodegenOptions {
            minify,
            target: target.to_string(),
            ..CodegenOptions::default()
        };
        protocol::generate_code_bytes(document, &options)
    })
}

/// # Safety
///
/// `document` must be null or valid for reads of `document_len` bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn lumen_optimize(
    document: *const u8,
    document_len: usize,
    level: u32,
) -> *mut LumenBuffer {
    guarded("optimize", || {
        let document = unsafe { input("document", document, document_len)? };
        protocol::optimize_bytes(document, level)
    })
}

/// # Safety
///
/// Both pointers must be null or valid for reads of their lengths.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn lumen_generate_wasm(
    document: *const u8,
    document_len: usize,
    options: *const u8,
    options_len: usize,
) -> *mut LumenBuffer {
    guarded("generate_wasm", || {
        let document = unsafe { input("document", document, document_len)? };
        let options = unsafe { input("options", options, options_len)? };
        protocol::generate_wasm_bytes(document, options)
    })
}

/// Release a buffer returned by any `lumen_*` function. Null is ignored.
///
/// # Safety
///
/// `buffer` must be null or a handle from this library that has not been
/// released yet.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn lumen_release(buffer: *mut LumenBuffer) {
    // SAFETY: forwarded caller contract.
    drop(unsafe { OwnedBuffer::from_raw(buffer) });
}

/// Buffers handed out and not yet released.
#[unsafe(no_mangle)]
pub extern "C" fn lumen_live_buffers() -> usize {
    live_buffers()
}
