//! Parser configuration.

use serde::{Deserialize, Serialize};

/// Nesting limit used when none is configured.
///
/// Input at this depth parses within a 2 MiB thread stack in a debug build.
/// Higher limits need a larger stack on the parsing thread.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Tunables for a single parse.
///
/// Loaded from JSON, e.g. `{ "maxDepth": 32 }`; absent fields keep their
/// defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ParserOptions {
    /// Maximum nesting of modules, interfaces, value types, constructed
    /// types, sequences and parenthesized expressions.
    pub max_depth: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParserOptions {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Set the nesting limit. Callers raising it above [`DEFAULT_MAX_DEPTH`]
    /// must parse on a thread with a correspondingly larger stack.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(ParserOptions::default().max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(ParserOptions::from_json("{}").unwrap(), ParserOptions::default());
    }

    #[test]
    fn test_from_json() {
        let options = ParserOptions::from_json(r#"{ "maxDepth": 8 }"#).unwrap();
        assert_eq!(options.max_depth, 8);
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        assert!(ParserOptions::from_json(r#"{ "depth": 8 }"#).is_err());
    }
}
