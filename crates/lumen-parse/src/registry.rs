//! Registry for readers.

use crate::traits::Reader;
use std::sync::{OnceLock, RwLock};

/// Global reader registry.
static READERS: RwLock<Vec<&'static dyn Reader>> = RwLock::new(Vec::new());
static READERS_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Register a custom reader. Lookups return the first match, so built-in
/// names cannot be shadowed.
pub fn register_reader(reader: &'static dyn Reader) {
    init_readers();
    READERS.write().unwrap().push(reader);
}

fn init_readers() {
    READERS_INITIALIZED.get_or_init(|| {
        let mut readers = READERS.write().unwrap();
        readers.push(&crate::traits::SCRIPT_READER);
        readers.push(&crate::traits::TYPED_SCRIPT_READER);
        readers.push(&crate::traits::SCRIPT_MARKUP_READER);
        readers.push(&crate::traits::TYPED_SCRIPT_MARKUP_READER);
    });
}

/// Get a reader by name.
pub fn reader_for_name(name: &str) -> Option<&'static dyn Reader> {
    init_readers();
    READERS
        .read()
        .unwrap()
        .iter()
        .find(|r| r.name() == name)
        .copied()
}

/// Get a reader by file extension.
pub fn reader_for_extension(ext: &str) -> Option<&'static dyn Reader> {
    init_readers();
    READERS
        .read()
        .unwrap()
        .iter()
        .find(|r| r.extensions().contains(&ext))
        .copied()
}

/// Get all registered readers.
pub fn readers() -> Vec<&'static dyn Reader> {
    init_readers();
    READERS.read().unwrap().clone()
}
