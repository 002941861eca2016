//! Generation settings
//!
//! Settings come from built-in defaults, optionally overlaid by a JSON file.
//! Command-line flags are applied on top by the binary.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{GenerationError, Result};

/// When an initializer body may receive generated statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyPolicy {
    /// Only bodies made of `pass`, `...`, a docstring or comments
    #[default]
    TrivialOnly,
    /// Every body, regardless of its contents
    Always,
}

/// Settings shared by the signature pipeline and the document collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationConfig {
    /// Parameter names treated as the receiver and never assigned
    pub receiver_names: Vec<String>,
    /// Receiver used on the left-hand side when the signature has none
    pub default_receiver: String,
    /// One level of indentation, used when the body indentation is unknown
    pub indent_unit: String,
    pub body_policy: BodyPolicy,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            receiver_names: vec!["self".to_string(), "cls".to_string()],
            default_receiver: "self".to_string(),
            indent_unit: "    ".to_string(),
            body_policy: BodyPolicy::default(),
        }
    }
}

impl GenerationConfig {
    /// Parse a JSON configuration; missing fields keep their defaults.
    pub fn from_json_str(content: &str, origin: impl AsRef<Path>) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| GenerationError::Config {
            path: origin.as_ref().to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Add extra receiver names, ignoring ones already present.
    pub fn with_receivers<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            let name = name.into();
            if !self.receiver_names.contains(&name) {
                self.receiver_names.push(name);
            }
        }
        self
    }

    pub fn with_body_policy(mut self, body_policy: BodyPolicy) -> Self {
        self.body_policy = body_policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GenerationConfig::default();
        assert_eq!(config.receiver_names, vec!["self", "cls"]);
        assert_eq!(config.default_receiver, "self");
        assert_eq!(config.indent_unit, "    ");
        assert_eq!(config.body_policy, BodyPolicy::TrivialOnly);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            GenerationConfig::from_json_str(r#"{"body_policy": "always"}"#, "init-assign.json")
                .unwrap();
        assert_eq!(config.body_policy, BodyPolicy::Always);
        assert_eq!(config.default_receiver, "self");
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let err = GenerationConfig::from_json_str(r#"{"indent": 2}"#, "bad.json").unwrap_err();
        assert!(matches!(err, GenerationError::Config { .. }));
        assert!(err.to_string().contains("bad.json"));
    }

    #[test]
    fn test_with_receivers_deduplicates() {
        let config = GenerationConfig::default().with_receivers(["self", "this"]);
        assert_eq!(config.receiver_names, vec!["self", "cls", "this"]);
    }
}
