//! Token-to-value coercion per value kind.

use std::path::PathBuf;
use std::sync::LazyLock;

use argbind_core::{EnumSpec, Value, ValueKind};
use regex::Regex;
use thiserror::Error;

use crate::config::ParserConfig;

/// Why a token could not be coerced. `Display` is the diagnostic line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoerceError {
    /// Neither recognizer matched a boolean token.
    #[error("Value not recognized: {0}")]
    NotRecognized(String),
    /// Integer token that is not a member ordinal.
    #[error("Value {value} is not valid, expected one of: {valid}")]
    InvalidOrdinal { value: String, valid: String },
    /// Name token that matches no member.
    #[error("Value {value} is not valid, expected one of: {valid}")]
    InvalidName { value: String, valid: String },
    /// Token does not convert to the scalar kind.
    #[error("Value not recognized: {value} (expected {kind})")]
    Invalid { value: String, kind: &'static str },
}

static AFFIRMATIVE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:on|true|yes|1)$").expect("static regex must compile"));
static NEGATIVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:off|false|no|not|0)$").expect("static regex must compile")
});

/// Coerces one token into a value of `kind`.
///
/// # Examples
///
/// ```
/// use argbind_core::{Value, ValueKind};
/// use argbind_parser::{ParserConfig, coerce_value};
///
/// let config = ParserConfig::default();
/// assert_eq!(coerce_value(&ValueKind::Bool, "Yes", &config), Ok(Value::Bool(true)));
/// assert_eq!(coerce_value(&ValueKind::Int, "-42", &config), Ok(Value::Int(-42)));
/// assert!(coerce_value(&ValueKind::UInt, "-42", &config).is_err());
/// ```
pub fn coerce_value(kind: &ValueKind, token: &str, config: &ParserConfig) -> Result<Value, CoerceError> {
    match kind {
        ValueKind::Bool => coerce_bool(token),
        ValueKind::Enum(spec) => coerce_enum(spec, token, config.enum_ignore_case),
        ValueKind::String => Ok(Value::Str(token.to_string())),
        ValueKind::Path => Ok(Value::Path(PathBuf::from(token))),
        ValueKind::Char => {
            let mut chars = token.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => Ok(Value::Char(ch)),
                _ => Err(invalid(token, kind)),
            }
        }
        ValueKind::Int => token
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| invalid(token, kind)),
        ValueKind::UInt => token
            .parse::<u64>()
            .map(Value::UInt)
            .map_err(|_| invalid(token, kind)),
        ValueKind::Float => token
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| invalid(token, kind)),
    }
}

fn invalid(token: &str, kind: &ValueKind) -> CoerceError {
    CoerceError::Invalid {
        value: token.to_string(),
        kind: kind.label(),
    }
}

/// Matches the affirmative and negative recognizers, ignoring case.
pub fn coerce_bool(token: &str) -> Result<Value, CoerceError> {
    if AFFIRMATIVE_RE.is_match(token) {
        Ok(Value::Bool(true))
    } else if NEGATIVE_RE.is_match(token) {
        Ok(Value::Bool(false))
    } else {
        Err(CoerceError::NotRecognized(token.to_string()))
    }
}

/// Resolves an enumeration member by ordinal or by name.
///
/// A token that parses as an integer is only ever matched against
/// ordinals. Names match exactly first; with `ignore_case` a
/// case-insensitive match is tried next.
pub fn coerce_enum(spec: &EnumSpec, token: &str, ignore_case: bool) -> Result<Value, CoerceError> {
    if let Ok(ordinal) = token.parse::<i64>() {
        return spec
            .by_ordinal(ordinal)
            .map(|member| Value::Enum(member.clone()))
            .ok_or_else(|| CoerceError::InvalidOrdinal {
                value: token.to_string(),
                valid: spec
                    .members
                    .iter()
                    .map(|m| format!("{} ({})", m.ordinal, m.name))
                    .collect::<Vec<_>>()
                    .join(", "),
            });
    }

    spec.by_name(token)
        .or_else(|| {
            if ignore_case {
                spec.by_name_ignore_case(token)
            } else {
                None
            }
        })
        .map(|member| Value::Enum(member.clone()))
        .ok_or_else(|| CoerceError::InvalidName {
            value: token.to_string(),
            valid: spec.names().join(", "),
        })
}
