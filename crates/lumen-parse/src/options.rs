//! Parse configuration.
//!
//! Options are plain serde structs so a caller on the far side of the
//! boundary can pass them as a JSON document:
//!
//! ```json
//! {"variant": "typed-script", "comments": false, "limits": {"maxDepth": 512}}
//! ```

use serde::{Deserialize, Serialize};

use crate::variant::Variant;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParseOptions {
    pub variant: Variant,
    /// Keep comment nodes. Default: true
    pub comments: bool,
    /// Recorded as the arena's `sourcePath`
    pub source_path: Option<String>,
    pub limits: BuildLimits,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            variant: Variant::default(),
            comments: true,
            source_path: None,
            limits: BuildLimits::default(),
        }
    }
}

impl ParseOptions {
    pub fn for_variant(variant: Variant) -> Self {
        Self {
            variant,
            ..Self::default()
        }
    }

    pub fn with_source_path(mut self, path: impl Into<String>) -> Self {
        self.source_path = Some(path.into());
        self
    }

    pub fn with_comments(mut self, comments: bool) -> Self {
        self.comments = comments;
        self
    }

    pub fn with_limits(mut self, limits: BuildLimits) -> Self {
        self.limits = limits;
        self
    }
}

/// Ceilings that stop a build on pathological input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BuildLimits {
    pub max_source_bytes: usize,
    pub max_nodes: usize,
    pub max_depth: usize,
}

impl Default for BuildLimits {
    fn default() -> Self {
        Self {
            max_source_bytes: 16 * 1024 * 1024,
            max_nodes: 4_000_000,
            max_depth: 2_048,
        }
    }
}
