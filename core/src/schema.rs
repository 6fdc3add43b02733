//! Built, immutable schemas.
//!
//! [`Schema::build`] validates a [`SchemaSpec`] and resolves it into the
//! three artifacts the parser walks: the descriptor list, the option lookup
//! table and the positional queue.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::types::{FieldKind, FieldSpec, SchemaInfo, SchemaSpec};
use crate::validate::{SchemaError, validate_spec};

/// Resolved description of one bindable field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Descriptor {
    /// Field name handed to the record.
    pub name: String,
    /// Display name override, falling back to the field name.
    pub display_name: String,
    pub kind: FieldKind,
    /// Option tokens in declaration order; empty for positional fields.
    pub options: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub non_empty: bool,
    pub counted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
    /// Positional fields, or option fields declared mandatory.
    pub mandatory: bool,
}

impl Descriptor {
    fn from_spec(spec: FieldSpec) -> Self {
        let mandatory = spec.options.is_empty() || spec.mandatory;
        let display_name = spec.display_name.unwrap_or_else(|| spec.name.clone());
        Self {
            name: spec.name,
            display_name,
            kind: spec.kind,
            options: spec.options,
            description: spec.description,
            non_empty: spec.non_empty,
            counted: spec.counted,
            length: spec.length,
            mandatory,
        }
    }

    /// Returns `true` if the descriptor is filled positionally.
    pub fn is_positional(&self) -> bool {
        self.options.is_empty()
    }

    /// The name users see: the longest option token, or the display name
    /// for positional fields.
    pub fn label(&self) -> &str {
        self.options
            .iter()
            .max_by_key(|option| option.len())
            .map_or(self.display_name.as_str(), String::as_str)
    }
}

/// A validated schema, ready to parse any number of token lists.
///
/// # Examples
///
/// ```
/// use argbind_core::*;
///
/// let spec = SchemaSpec::new()
///     .with_field(FieldSpec::flag("verbose").with_options(["-v", "--verbose"]))
///     .with_field(FieldSpec::string("input"))
///     .with_field(FieldSpec::string("output"));
///
/// let schema = Schema::build(spec).unwrap();
/// assert_eq!(schema.find_option("--verbose"), Some(0));
/// assert!(schema.is_option("-v"));
/// assert!(!schema.is_option("input"));
/// assert_eq!(schema.positional(), &[1, 2]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schema {
    info: SchemaInfo,
    descriptors: Vec<Descriptor>,
    options: HashMap<String, usize>,
    positional: Vec<usize>,
}

impl Schema {
    /// Validates `spec` and builds the schema.
    ///
    /// # Errors
    ///
    /// Returns the first [`SchemaError`] reported by
    /// [`validate_spec`](crate::validate_spec).
    pub fn build(spec: SchemaSpec) -> Result<Self, SchemaError> {
        if let Some(error) = validate_spec(&spec).into_iter().next() {
            return Err(error);
        }

        let SchemaSpec { info, fields } = spec;
        let descriptors: Vec<Descriptor> = fields.into_iter().map(Descriptor::from_spec).collect();

        let mut options = HashMap::new();
        let mut positional = Vec::new();
        for (index, descriptor) in descriptors.iter().enumerate() {
            if descriptor.is_positional() {
                positional.push(index);
            }
            for option in &descriptor.options {
                options.insert(option.clone(), index);
            }
        }

        debug!(
            fields = descriptors.len(),
            options = options.len(),
            positional = positional.len(),
            "Built option schema"
        );

        Ok(Self {
            info,
            descriptors,
            options,
            positional,
        })
    }

    pub fn info(&self) -> &SchemaInfo {
        &self.info
    }

    /// All descriptors in declaration order.
    pub fn descriptors(&self) -> &[Descriptor] {
        &self.descriptors
    }

    pub fn descriptor(&self, index: usize) -> Option<&Descriptor> {
        self.descriptors.get(index)
    }

    /// Finds a descriptor by field name.
    pub fn field(&self, name: &str) -> Option<&Descriptor> {
        self.descriptors.iter().find(|d| d.name == name)
    }

    /// Resolves an option token to its descriptor index.
    pub fn find_option(&self, token: &str) -> Option<usize> {
        self.options.get(token).copied()
    }

    /// Returns `true` if `token` is a declared option token.
    pub fn is_option(&self, token: &str) -> bool {
        self.options.contains_key(token)
    }

    /// Descriptor indices of positional fields, in declaration order.
    pub fn positional(&self) -> &[usize] {
        &self.positional
    }
}
