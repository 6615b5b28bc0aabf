//! Registries for the external transform stages.

use crate::transform::{CodeGenerator, Optimizer, WasmEmitter};
use std::sync::RwLock;

static CODE_GENERATORS: RwLock<Vec<&'static dyn CodeGenerator>> = RwLock::new(Vec::new());
static OPTIMIZERS: RwLock<Vec<&'static dyn Optimizer>> = RwLock::new(Vec::new());
static WASM_EMITTERS: RwLock<Vec<&'static dyn WasmEmitter>> = RwLock::new(Vec::new());

pub fn register_code_generator(generator: &'static dyn CodeGenerator) {
    CODE_GENERATORS.write().unwrap().push(generator);
}

pub fn register_optimizer(optimizer: &'static dyn Optimizer) {
    OPTIMIZERS.write().unwrap().push(optimizer);
}

pub fn register_wasm_emitter(emitter: &'static dyn WasmEmitter) {
    WASM_EMITTERS.write().unwrap().push(emitter);
}

/// First registered generator that accepts `target`.
pub fn code_generator_for_target(target: &str) -> Option<&'static dyn CodeGenerator> {
    CODE_GENERATORS
        .read()
        .unwrap()
        .iter()
        .find(|g| g.targets().contains(&target))
        .copied()
}

pub fn optimizer() -> Option<&'static dyn Optimizer> {
    OPTIMIZERS.read().unwrap().first().copied()
}

pub fn wasm_emitter() -> Option<&'static dyn WasmEmitter> {
    WASM_EMITTERS.read().unwrap().first().copied()
}

pub fn code_generators() -> Vec<&'static dyn CodeGenerator> {
    CODE_GENERATORS.read().unwrap().clone()
}
