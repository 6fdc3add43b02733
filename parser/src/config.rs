//! Parser configuration.
//!
//! Every setting defaults to the documented token grammar, so
//! `ParserConfig::default()` is what most tools want. The type is
//! serde-friendly and can be loaded from YAML; omitted keys keep their
//! defaults.
//!
//! # Example YAML
//!
//! ```yaml
//! slash_prefix: false
//! combine_short: true
//! help_tokens: ["-h", "--help", "-?"]
//! enum_ignore_case: true
//! ```

use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors loading a [`ParserConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

/// Knobs for token normalization and coercion.
///
/// # Examples
///
/// ```
/// use argbind_parser::ParserConfig;
///
/// let config = ParserConfig::from_yaml_str("slash_prefix: false").unwrap();
/// assert!(!config.slash_prefix);
/// assert!(config.combine_short);
/// assert_eq!(config.help_tokens, vec!["-h", "--help"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Accept `/x` as an alternate spelling of `-x`.
    pub slash_prefix: bool,
    /// Split `-abc` into `-a -b -c`.
    pub combine_short: bool,
    /// Tokens that switch the parse into help mode.
    pub help_tokens: Vec<String>,
    /// Fall back to case-insensitive enumeration name matching.
    pub enum_ignore_case: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            slash_prefix: true,
            combine_short: true,
            help_tokens: vec!["-h".to_string(), "--help".to_string()],
            enum_ignore_case: true,
        }
    }
}

impl ParserConfig {
    /// Parses a configuration from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`YamlError`](ConfigError::YamlError) on malformed YAML or
    /// mistyped keys.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Loads a configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](ConfigError::IoError) if the file cannot be read,
    /// or [`YamlError`](ConfigError::YamlError) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        Ok(serde_yaml::from_reader(reader)?)
    }

    /// Returns `true` if `token` is one of the help tokens.
    pub fn is_help_token(&self, token: &str) -> bool {
        self.help_tokens.iter().any(|t| t == token)
    }
}
