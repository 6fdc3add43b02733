//! Schema declaration validation.
//!
//! Catches programming errors in a [`SchemaSpec`] before any token is
//! parsed: malformed or duplicate option tokens, counters that cannot
//! count, and metadata that does not fit the field kind. These are fatal
//! for the schema, unlike the per-parse errors the parser accumulates.
//!
//! # Examples
//!
//! ```
//! use argbind_core::*;
//!
//! let spec = SchemaSpec::new()
//!     .with_field(FieldSpec::flag("verbose").with_options(["-v", "--verbose"]));
//! assert!(validate_spec(&spec).is_empty());
//!
//! // Invalid: long option with a single dash
//! let bad = SchemaSpec::new().with_field(FieldSpec::flag("verbose").with_option("-verbose"));
//! assert!(!validate_spec(&bad).is_empty());
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::types::{FieldKind, FieldSpec, SchemaSpec, ValueKind};

/// Fatal schema declaration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Two fields declare the same option token.
    #[error("option {option} is declared by both '{first}' and '{second}'")]
    DuplicateOption {
        option: String,
        first: String,
        second: String,
    },
    /// Option token is neither `-x` nor `--word`.
    #[error("invalid option token '{option}' on field '{field}'")]
    InvalidOption { field: String, option: String },
    /// Mention counter on a field that is not a plain integer.
    #[error("counted field '{0}' must be an integer")]
    CounterNotInteger(String),
    /// Mention counter without any option token to mention.
    #[error("counted field '{0}' needs at least one option")]
    CounterWithoutOption(String),
    /// Two fields share a name.
    #[error("duplicate field name: {0}")]
    DuplicateField(String),
    /// Presence flag that no token can set.
    #[error("flag field '{0}' needs at least one option")]
    FlagWithoutOption(String),
    /// Fixed length on something other than an array.
    #[error("field '{0}' has a length but is not an array")]
    LengthOnScalar(String),
    /// Fixed array length of zero, which can never take a value.
    #[error("array field '{0}' has a fixed length of zero")]
    ZeroLength(String),
    /// Array without options. Positional slots take one token each.
    #[error("array field '{0}' needs at least one option")]
    PositionalArray(String),
    /// Enumeration without members.
    #[error("enumeration field '{0}' has no members")]
    EmptyEnum(String),
    /// Enumeration with a repeated member name.
    #[error("enumeration field '{field}' repeats member '{member}'")]
    DuplicateEnumMember { field: String, member: String },
}

/// Option grammar: a dash and one word character, or two dashes and a word.
static OPTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:-\w|--\w+)$").expect("static regex must compile"));

/// Returns `true` if `option` is a well-formed option token.
///
/// # Examples
///
/// ```
/// use argbind_core::is_valid_option;
///
/// assert!(is_valid_option("-v"));
/// assert!(is_valid_option("--verbose"));
/// assert!(!is_valid_option("-vv"));
/// assert!(!is_valid_option("--dry-run"));
/// assert!(!is_valid_option("verbose"));
/// ```
pub fn is_valid_option(option: &str) -> bool {
    OPTION_RE.is_match(option)
}

/// Validates a schema declaration and returns every problem found.
///
/// Fields are checked in declaration order, so the first error is the one
/// closest to the top of the declaration.
///
/// # Examples
///
/// ```
/// use argbind_core::*;
///
/// let spec = SchemaSpec::new()
///     .with_field(FieldSpec::flag("all").with_option("-a"))
///     .with_field(FieldSpec::flag("append").with_option("-a"))
///     .with_field(FieldSpec::string("level").counted().with_option("-l"));
///
/// let errors = validate_spec(&spec);
/// assert_eq!(errors.len(), 2);
/// assert!(matches!(errors[0], SchemaError::DuplicateOption { .. }));
/// assert_eq!(errors[1], SchemaError::CounterNotInteger("level".into()));
/// ```
pub fn validate_spec(spec: &SchemaSpec) -> Vec<SchemaError> {
    let mut errors = Vec::new();
    let mut seen_fields: HashSet<&str> = HashSet::new();
    let mut owners: HashMap<&str, &str> = HashMap::new();

    for field in &spec.fields {
        if !seen_fields.insert(field.name.as_str()) {
            errors.push(SchemaError::DuplicateField(field.name.clone()));
        }

        for option in &field.options {
            if !is_valid_option(option) {
                errors.push(SchemaError::InvalidOption {
                    field: field.name.clone(),
                    option: option.clone(),
                });
                continue;
            }
            if let Some(first) = owners.insert(option.as_str(), field.name.as_str()) {
                errors.push(SchemaError::DuplicateOption {
                    option: option.clone(),
                    first: first.to_string(),
                    second: field.name.clone(),
                });
            }
        }

        errors.extend(validate_field(field));
    }

    errors
}

fn validate_field(field: &FieldSpec) -> Vec<SchemaError> {
    let mut errors = Vec::new();
    let name = || field.name.clone();

    if field.counted {
        if !matches!(&field.kind, FieldKind::Value(kind) if kind.is_integer()) {
            errors.push(SchemaError::CounterNotInteger(name()));
        }
        if field.options.is_empty() {
            errors.push(SchemaError::CounterWithoutOption(name()));
        }
    }

    if field.kind == FieldKind::Flag && field.options.is_empty() {
        errors.push(SchemaError::FlagWithoutOption(name()));
    }

    if field.kind.is_array() {
        if field.options.is_empty() {
            errors.push(SchemaError::PositionalArray(name()));
        }
        if field.length == Some(0) {
            errors.push(SchemaError::ZeroLength(name()));
        }
    } else if field.length.is_some() {
        errors.push(SchemaError::LengthOnScalar(name()));
    }

    if let Some(ValueKind::Enum(spec)) = field.kind.value_kind() {
        if spec.members.is_empty() {
            errors.push(SchemaError::EmptyEnum(name()));
        }
        let mut members = HashSet::new();
        for member in &spec.members {
            if !members.insert(member.name.as_str()) {
                errors.push(SchemaError::DuplicateEnumMember {
                    field: name(),
                    member: member.name.clone(),
                });
            }
        }
    }

    errors
}
