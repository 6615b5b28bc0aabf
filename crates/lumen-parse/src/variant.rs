//! Language variants and the capability sets they select.

use serde::{Deserialize, Serialize};

/// One of the four language configurations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    /// Plain script
    #[default]
    Script,
    /// Script with type annotations
    TypedScript,
    /// Script with markup elements
    ScriptMarkup,
    /// Typed script with markup elements
    TypedScriptMarkup,
}

/// Optional grammar features a build pass may emit nodes for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Capabilities {
    pub typed: bool,
    pub markup: bool,
}

impl Variant {
    pub const ALL: [Variant; 4] = [
        Variant::Script,
        Variant::TypedScript,
        Variant::ScriptMarkup,
        Variant::TypedScriptMarkup,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Script => "script",
            Variant::TypedScript => "typed-script",
            Variant::ScriptMarkup => "script-markup",
            Variant::TypedScriptMarkup => "typed-script-markup",
        }
    }

    /// Numeric code used across the C boundary.
    pub fn code(&self) -> u32 {
        match self {
            Variant::Script => 0,
            Variant::TypedScript => 1,
            Variant::ScriptMarkup => 2,
            Variant::TypedScriptMarkup => 3,
        }
    }

    pub fn from_code(code: u32) -> Option<Self> {
        Variant::ALL.get(code as usize).copied()
    }

    pub fn capabilities(&self) -> Capabilities {
        match self {
            Variant::Script => Capabilities {
                typed: false,
                markup: false,
            },
            Variant::TypedScript => Capabilities {
                typed: true,
                markup: false,
            },
            Variant::ScriptMarkup => Capabilities {
                typed: false,
                markup: true,
            },
            Variant::TypedScriptMarkup => Capabilities {
                typed: true,
                markup: true,
            },
        }
    }

    /// File extensions handled by this variant (e.g., &["ts", "mts", "cts"]).
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Variant::Script => &["js", "mjs", "cjs"],
            Variant::TypedScript => &["ts", "mts", "cts"],
            Variant::ScriptMarkup => &["jsx"],
            Variant::TypedScriptMarkup => &["tsx"],
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_ascii_lowercase();
        Variant::ALL
            .into_iter()
            .find(|v| v.extensions().contains(&ext.as_str()))
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Variant {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "script" => Ok(Self::Script),
            "typed-script" => Ok(Self::TypedScript),
            "script-markup" => Ok(Self::ScriptMarkup),
            "typed-script-markup" => Ok(Self::TypedScriptMarkup),
            _ => Err(format!("unknown variant: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip() {
        for variant in Variant::ALL {
            assert_eq!(Variant::from_code(variant.code()), Some(variant));
            assert_eq!(variant.as_str().parse::<Variant>(), Ok(variant));
        }
        assert_eq!(Variant::from_code(4), None);
    }

    #[test]
    fn test_capability_profiles() {
        assert_eq!(Variant::Script.capabilities(), Capabilities::default());
        assert!(Variant::TypedScript.capabilities().typed);
        assert!(!Variant::TypedScript.capabilities().markup);
        assert!(Variant::ScriptMarkup.capabilities().markup);
        let full = Variant::TypedScriptMarkup.capabilities();
        assert!(full.typed && full.markup);
    }

    #[test]
    fn test_from_extension() {
        assert_eq!(Variant::from_extension("js"), Some(Variant::Script));
        assert_eq!(Variant::from_extension("MTS"), Some(Variant::TypedScript));
        assert_eq!(Variant::from_extension("jsx"), Some(Variant::ScriptMarkup));
        assert_eq!(Variant::from_extension("tsx"), Some(Variant::TypedScriptMarkup));
        assert_eq!(Variant::from_extension("lua"), None);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Variant::TypedScriptMarkup).unwrap();
        assert_eq!(json, "\"typed-script-markup\"");
    }
}
