//! Boundary protocol tests through the safe API and the C exports.

use std::sync::Once;

use lumen_boundary::ffi::{lumen_parse, lumen_parse_detailed, lumen_release};
use lumen_boundary::{
    CodeGenerator, CodegenOptions, Optimizer, TransformError, Variant, WasmEmitter, generate_code,
    generate_code_with_options, generate_wasm, optimize, parse, parse_detailed, parse_with_options,
    release,
};
use lumen_ir::{Arena, NodeType, NodeValue, document};
use serde_json::Value;

struct NodeCountGenerator;

impl CodeGenerator for NodeCountGenerator {
    fn name(&self) -> &'static str {
        "node-count"
    }

    fn targets(&self) -> &'static [&'static str] {
        &["node-count"]
    }

    fn generate(&self, arena: &Arena, options: &CodegenOptions) -> Result<String, TransformError> {
        if arena.len() > 1_000 {
            return Err(TransformError::Unsupported("too many nodes".into()));
        }
        let sep = if options.minify { "" } else { " " };
        Ok(format!("nodes{sep}={sep}{}", arena.len()))
    }
}

struct MarkRootOptimizer;

impl Optimizer for MarkRootOptimizer {
    fn name(&self) -> &'static str {
        "mark-root"
    }

    fn optimize(&self, mut arena: Arena, level: u32) -> Result<Arena, TransformError> {
        let root = arena.root_id();
        arena.set_attribute(root, "optimized", NodeValue::Number(f64::from(level)))?;
        Ok(arena)
    }
}

struct HeaderOnlyEmitter;

impl WasmEmitter for HeaderOnlyEmitter {
    fn name(&self) -> &'static str {
        "header-only"
    }

    fn emit(&self, _arena: &Arena, options: &Value) -> Result<Vec<u8>, TransformError> {
        if options.get("fail").and_then(Value::as_bool) == Some(true) {
            return Err(TransformError::Failed("asked to fail".into()));
        }
        Ok(b"\0asm\x01\0\0\0".to_vec())
    }
}

static NODE_COUNT_GENERATOR: NodeCountGenerator = NodeCountGenerator;
static MARK_ROOT_OPTIMIZER: MarkRootOptimizer = MarkRootOptimizer;
static HEADER_ONLY_EMITTER: HeaderOnlyEmitter = HeaderOnlyEmitter;

fn setup() {
    static REGISTER: Once = Once::new();
    REGISTER.call_once(|| {
        lumen_boundary::register_code_generator(&NODE_COUNT_GENERATOR);
        lumen_boundary::register_optimizer(&MARK_ROOT_OPTIMIZER);
        lumen_boundary::register_wasm_emitter(&HEADER_ONLY_EMITTER);
    });
}

fn json(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap()
}

fn var_document() -> Vec<u8> {
    let buffer = parse(b"var x = 42;", Variant::Script).unwrap();
    let bytes = buffer.as_bytes().to_vec();
    release(buffer);
    bytes
}

// ============================================================================
// Parse
// ============================================================================

#[test]
fn parse_returns_canonical_document() {
    let buffer = parse(b"var x = 42;", Variant::Script).unwrap();
    let expected = document::to_canonical_bytes(&lumen_parse::parse_script("var x = 42;").unwrap());
    assert_eq!(buffer.as_bytes(), expected.as_slice());

    let doc = json(buffer.as_bytes());
    assert_eq!(doc["nodes"]["1"]["nodeType"], "VariableDeclaration");
    assert_eq!(doc["nodes"]["3"]["values"]["value"], 42.0);
    release(buffer);
}

#[test]
fn parse_failures_return_none() {
    assert!(parse(b"const a = <div/>;", Variant::Script).is_none());
    assert!(parse(b"var = ;", Variant::Script).is_none());
    assert!(parse(&[0xff, 0xfe], Variant::Script).is_none());
}

#[test]
fn parse_with_options_document() {
    let options = br#"{"variant":"typed-script","comments":false,"sourcePath":"a.ts"}"#;
    let buffer = parse_with_options(b"// note\nlet n: number = 1;", options).unwrap();
    let doc = json(buffer.as_bytes());
    assert_eq!(doc["sourcePath"], "a.ts");
    assert_eq!(doc["nodes"]["0"]["children"].as_array().unwrap().len(), 1);
    release(buffer);

    assert!(parse_with_options(b"x;", b"").is_some());
    assert!(parse_with_options(b"x;", b"{\"variant\":").is_none());
    assert!(parse_with_options(b"x;", br#"{"variant":"cobol"}"#).is_none());
}

#[test]
fn detailed_success_and_failure() {
    let ok = parse_detailed(b"var x = 42;", Variant::Script);
    let doc = json(ok.as_bytes());
    assert_eq!(doc["ok"]["nodes"]["2"]["values"]["name"], "x");
    release(ok);

    let failed = parse_detailed(b"const a = <div/>;", Variant::Script);
    let doc = json(failed.as_bytes());
    assert_eq!(doc["error"]["kind"], "UnsupportedSyntax");
    assert_eq!(doc["error"]["location"]["startColumn"], 11);
    assert!(
        doc["error"]["message"]
            .as_str()
            .unwrap()
            .contains("markup element")
    );
    release(failed);
}

#[test]
fn concurrent_calls_are_independent() {
    let sources = ["var a = 1;", "let b = [1, 2];", "f(g(3));", "if (x) { y(); }"];
    let handles: Vec<_> = sources
        .iter()
        .map(|source| {
            let source = source.to_string();
            std::thread::spawn(move || {
                let buffer = parse(source.as_bytes(), Variant::Script).unwrap();
                let bytes = buffer.as_bytes().to_vec();
                release(buffer);
                bytes
            })
        })
        .collect();
    for (source, handle) in sources.iter().zip(handles) {
        let bytes = handle.join().unwrap();
        let expected = document::to_canonical_bytes(&lumen_parse::parse_script(source).unwrap());
        assert_eq!(bytes, expected);
    }
}

// ============================================================================
// Transform stages
// ============================================================================

#[test]
fn generate_code_dispatches_on_target() {
    setup();
    let doc = var_document();

    let code = generate_code(&doc, false, "node-count").unwrap();
    assert_eq!(code.as_str(), Some("nodes = 4"));
    release(code);

    let options = CodegenOptions {
        minify: true,
        target: "node-count".into(),
        ..CodegenOptions::default()
    };
    let code = generate_code_with_options(&doc, &options).unwrap();
    assert_eq!(code.as_str(), Some("nodes=4"));
    release(code);

    assert!(generate_code(&doc, false, "es1999").is_none());
}

#[test]
fn transforms_reject_invalid_documents() {
    setup();
    assert!(generate_code(b"not json", false, "node-count").is_none());
    assert!(optimize(b"{}", 1).is_none());

    let dangling = br#"{"rootId":0,"nextId":1,"nodes":{"0":{"id":0,"nodeType":"Program","location":{"startLine":0,"startColumn":0,"endLine":0,"endColumn":0},"children":[],"values":{"elements":[7]}}}}"#;
    assert!(generate_wasm(dangling, b"").is_none());

    let exhausted = br#"{"rootId":0,"nextId":4294967295,"nodes":{"0":{"id":0,"nodeType":"Program","location":{"startLine":0,"startColumn":0,"endLine":0,"endColumn":0},"children":[],"values":{}}}}"#;
    assert!(optimize(exhausted, 1).is_none());
}

#[test]
fn optimize_reserializes_canonically() {
    setup();
    let doc = var_document();
    let optimized = optimize(&doc, 2).unwrap();

    let arena = document::from_slice(optimized.as_bytes()).unwrap();
    assert_eq!(arena.root().get_number("optimized"), Some(2.0));
    assert_eq!(arena.len(), 4);
    assert_eq!(
        optimized.as_bytes(),
        document::to_canonical_bytes(&arena).as_slice()
    );
    release(optimized);
}

#[test]
fn generate_wasm_passes_options() {
    setup();
    let doc = var_document();

    let module = generate_wasm(&doc, b"").unwrap();
    assert_eq!(&module.as_bytes()[..4], b"\0asm");
    release(module);

    assert!(generate_wasm(&doc, br#"{"fail":true}"#).is_none());
    assert!(generate_wasm(&doc, b"{").is_none());
}

#[test]
fn extended_documents_are_accepted() {
    setup();
    let mut arena = document::from_slice(&var_document()).unwrap();
    let note = arena.create_node(NodeType::Comment);
    arena.add_child(arena.root_id(), note).unwrap();
    let doc = document::to_canonical_bytes(&arena);

    let code = generate_code(&doc, false, "node-count").unwrap();
    assert_eq!(code.as_str(), Some("nodes = 5"));
    release(code);
}

// ============================================================================
// C exports
// ============================================================================

#[test]
fn ffi_parse_and_release() {
    let source = b"var x = 42;";
    let raw = unsafe { lumen_parse(source.as_ptr(), source.len(), 0) };
    assert!(!raw.is_null());
    let bytes = unsafe { (*raw).as_slice().to_vec() };
    assert_eq!(bytes, var_document());
    unsafe { lumen_release(raw) };
}

#[test]
fn ffi_null_and_bad_arguments() {
    let empty = unsafe { lumen_parse(std::ptr::null(), 0, 1) };
    assert!(!empty.is_null());
    let doc = json(unsafe { (*empty).as_slice() });
    assert_eq!(doc["nextId"], 1);
    unsafe { lumen_release(empty) };

    assert!(unsafe { lumen_parse(std::ptr::null(), 5, 0) }.is_null());

    let source = b"x;";
    assert!(unsafe { lumen_parse(source.as_ptr(), source.len(), 7) }.is_null());

    unsafe { lumen_release(std::ptr::null_mut()) };
}

#[test]
fn ffi_detailed_reports_bad_variant() {
    let source = b"x;";
    let raw = unsafe { lumen_parse_detailed(source.as_ptr(), source.len(), 9) };
    assert!(!raw.is_null());
    let doc = json(unsafe { (*raw).as_slice() });
    assert_eq!(doc["error"]["kind"], "InvalidInput");
    assert_eq!(doc["error"]["message"], "unknown variant code: 9");
    unsafe { lumen_release(raw) };
}
