//! Boundary protocol between the lumen toolchain and its host runtime.
//!
//! Every operation returns an owned buffer holding a canonical IR document
//! (or, for the transform stages, their output) or nothing on failure. The
//! caller releases each buffer exactly once.
//!
//! # Architecture
//!
//! ```text
//! host ──(ptr, len, variant)──> ffi.rs ──> protocol.rs ──> lumen_parse ──> Arena
//!  ^                                            │
//!  └──── *mut LumenBuffer <── OwnedBuffer <─────┘ (canonical document)
//!  └──── lumen_release(buffer) ───────────────────> drop
//! ```
//!
//! Transform stages (code generation, optimization, wasm emission) are
//! external. They register through [`registry`] and exchange the same
//! document format.
//!
//! # Example
//!
//! ```ignore
//! use lumen_boundary::{Variant, parse, release};
//!
//! let buffer = parse(b"var x = 42;", Variant::Script).expect("document");
//! let document = buffer.as_str();
//! release(buffer);
//! ```

pub mod buffer;
pub mod envelope;
pub mod error;
pub mod ffi;
pub mod protocol;
pub mod registry;
pub mod transform;

pub use buffer::{LumenBuffer, OwnedBuffer, live_buffers, release};
pub use envelope::ErrorBody;
pub use error::BoundaryError;
pub use lumen_parse::Variant;
pub use protocol::{
    generate_code, generate_code_with_options, generate_wasm, optimize, parse, parse_detailed,
    parse_with_options,
};
pub use registry::{
    code_generator_for_target, code_generators, optimizer, register_code_generator,
    register_optimizer, register_wasm_emitter, wasm_emitter,
};
pub use transform::{CodeGenerator, CodegenOptions, Optimizer, TransformError, WasmEmitter};
