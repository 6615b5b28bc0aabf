//! Reader trait and the built-in variant readers.

use lumen_ir::Arena;

use crate::error::ParseError;
use crate::options::ParseOptions;
use crate::variant::Variant;

/// A reader parses source text into an arena.
pub trait Reader: Send + Sync {
    /// Reader identifier (e.g., "typed-script").
    fn name(&self) -> &'static str;

    /// File extensions this reader handles (e.g., &["ts", "mts"]).
    fn extensions(&self) -> &'static [&'static str];

    /// Parse source text into a fresh arena.
    fn read(&self, source: &str, options: &ParseOptions) -> Result<Arena, ParseError>;
}

/// Built-in reader for one variant. The variant in the caller's options is
/// replaced by the reader's own.
#[derive(Debug, Clone, Copy)]
pub struct VariantReader(pub Variant);

pub static SCRIPT_READER: VariantReader = VariantReader(Variant::Script);
pub static TYPED_SCRIPT_READER: VariantReader = VariantReader(Variant::TypedScript);
pub static SCRIPT_MARKUP_READER: VariantReader = VariantReader(Variant::ScriptMarkup);
pub static TYPED_SCRIPT_MARKUP_READER: VariantReader = VariantReader(Variant::TypedScriptMarkup);

impl Reader for VariantReader {
    fn name(&self) -> &'static str {
        self.0.as_str()
    }

    fn extensions(&self) -> &'static [&'static str] {
        self.0.extensions()
    }

    fn read(&self, source: &str, options: &ParseOptions) -> Result<Arena, ParseError> {
        let options = ParseOptions {
            variant: self.0,
            ..options.clone()
        };
        crate::parse_with_options(source, &options)
    }
}
