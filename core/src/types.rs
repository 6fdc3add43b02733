//! Declaration types for option schemas.
//!
//! A [`SchemaSpec`] is what a tool declares once: schema-level metadata plus
//! one [`FieldSpec`] per bindable field. The types are plain data and
//! round-trip through JSON and YAML, so a schema can live in a file as well
//! as in code.

use serde::{Deserialize, Serialize};

use crate::value::ArgEnum;

/// Element kind of a value-consuming field.
///
/// Arrays use the same kinds for their elements, which is why presence
/// flags and counters are not listed here.
///
/// # Examples
///
/// ```
/// use argbind_core::ValueKind;
///
/// assert!(ValueKind::Int.is_integer());
/// assert!(!ValueKind::Float.is_integer());
/// assert_eq!(ValueKind::Path.label(), "path");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// `on`/`off`, `yes`/`no`, `true`/`false`, `1`/`0`.
    Bool,
    /// Any string, taken as-is.
    String,
    /// Exactly one character.
    Char,
    /// Signed 64-bit integer.
    Int,
    /// Unsigned 64-bit integer.
    #[serde(rename = "uint")]
    UInt,
    /// 64-bit float.
    Float,
    /// Filesystem path, taken as-is.
    Path,
    /// One member of a fixed enumeration, by name or ordinal.
    Enum(EnumSpec),
}

impl ValueKind {
    /// Returns `true` for the plain integer kinds a counter may use.
    pub fn is_integer(&self) -> bool {
        matches!(self, Self::Int | Self::UInt)
    }

    /// Short lowercase name used in help text and diagnostics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::String => "string",
            Self::Char => "char",
            Self::Int => "int",
            Self::UInt => "uint",
            Self::Float => "float",
            Self::Path => "path",
            Self::Enum(_) => "enum",
        }
    }
}

/// Semantic kind of a field.
///
/// # Examples
///
/// ```
/// use argbind_core::{FieldKind, ValueKind};
///
/// assert!(!FieldKind::Flag.takes_value());
/// assert!(FieldKind::Value(ValueKind::String).takes_value());
/// assert!(FieldKind::Array(ValueKind::Int).is_array());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Set to `true` by the presence of its option; consumes no value.
    Flag,
    /// Consumes exactly one value token.
    Value(ValueKind),
    /// Consumes value tokens until the next known option, the fixed length,
    /// or the end of input.
    Array(ValueKind),
}

impl FieldKind {
    /// Returns `true` if the field reads at least one value token.
    pub fn takes_value(&self) -> bool {
        !matches!(self, Self::Flag)
    }

    /// Returns `true` for array fields.
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// Returns the element kind for value and array fields.
    pub fn value_kind(&self) -> Option<&ValueKind> {
        match self {
            Self::Flag => None,
            Self::Value(kind) | Self::Array(kind) => Some(kind),
        }
    }
}

/// One member of an enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumMember {
    /// Member name as typed on the command line.
    pub name: String,
    /// Integer accepted in place of the name.
    pub ordinal: i64,
}

impl EnumMember {
    /// Creates a member.
    pub fn new(name: impl Into<String>, ordinal: i64) -> Self {
        Self {
            name: name.into(),
            ordinal,
        }
    }
}

/// Ordered members of an enumeration kind.
///
/// # Examples
///
/// ```
/// use argbind_core::EnumSpec;
///
/// let spec = EnumSpec::from_names(["low", "high"]);
/// assert_eq!(spec.by_ordinal(1).map(|m| m.name.as_str()), Some("high"));
/// assert_eq!(spec.names(), vec!["low", "high"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnumSpec {
    pub members: Vec<EnumMember>,
}

impl EnumSpec {
    /// Creates an enumeration from explicit members.
    pub fn new(members: Vec<EnumMember>) -> Self {
        Self { members }
    }

    /// Creates an enumeration whose ordinals follow declaration order,
    /// starting at zero.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let members = names
            .into_iter()
            .enumerate()
            .map(|(index, name)| EnumMember::new(name, index as i64))
            .collect();
        Self { members }
    }

    /// Creates an enumeration from a Rust enum implementing [`ArgEnum`].
    pub fn of<E: ArgEnum>() -> Self {
        let members = E::members()
            .iter()
            .map(|(name, ordinal)| EnumMember::new(*name, *ordinal))
            .collect();
        Self { members }
    }

    /// Finds the member with the given ordinal.
    pub fn by_ordinal(&self, ordinal: i64) -> Option<&EnumMember> {
        self.members.iter().find(|m| m.ordinal == ordinal)
    }

    /// Finds a member by exact name.
    pub fn by_name(&self, name: &str) -> Option<&EnumMember> {
        self.members.iter().find(|m| m.name == name)
    }

    /// Finds a member by name, ignoring case.
    pub fn by_name_ignore_case(&self, name: &str) -> Option<&EnumMember> {
        let lowered = name.to_lowercase();
        self.members
            .iter()
            .find(|m| m.name.to_lowercase() == lowered)
    }

    /// Member names in declaration order.
    pub fn names(&self) -> Vec<&str> {
        self.members.iter().map(|m| m.name.as_str()).collect()
    }
}

/// Declaration of one bindable field.
///
/// Use the kind constructors ([`flag`](FieldSpec::flag),
/// [`string`](FieldSpec::string), [`array`](FieldSpec::array), ...) and chain
/// the `with_*` builders. A field without option tokens is positional and
/// mandatory.
///
/// # Examples
///
/// ```
/// use argbind_core::{FieldSpec, ValueKind};
///
/// let input = FieldSpec::string("input")
///     .with_options(["-i", "--input"])
///     .with_description("File to read");
/// assert!(!input.is_positional());
///
/// let files = FieldSpec::array("files", ValueKind::Path)
///     .with_option("--files")
///     .non_empty();
/// assert!(files.non_empty);
///
/// let target = FieldSpec::string("target");
/// assert!(target.is_positional());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Field name passed to [`Record::assign`](crate::Record::assign).
    pub name: String,
    /// What the field holds and how many tokens it reads.
    pub kind: FieldKind,
    /// Option tokens (`-i`, `--input`); empty for positional fields.
    #[serde(default)]
    pub options: Vec<String>,
    /// Name shown in help and diagnostics instead of `name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Help text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Arrays only: at least one element must coerce.
    #[serde(default)]
    pub non_empty: bool,
    /// Integer fields only: count mentions instead of reading a value.
    #[serde(default)]
    pub counted: bool,
    /// Arrays only: maximum number of elements read.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
    /// Report the field as missing when no token binds to it.
    #[serde(default)]
    pub mandatory: bool,
}

impl FieldSpec {
    /// Creates a field of the given kind with no options or metadata.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            options: Vec::new(),
            display_name: None,
            description: None,
            non_empty: false,
            counted: false,
            length: None,
            mandatory: false,
        }
    }

    /// Presence flag.
    pub fn flag(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Flag)
    }

    /// Boolean that reads a value token.
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Value(ValueKind::Bool))
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Value(ValueKind::String))
    }

    pub fn char(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Value(ValueKind::Char))
    }

    pub fn int(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Value(ValueKind::Int))
    }

    pub fn uint(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Value(ValueKind::UInt))
    }

    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Value(ValueKind::Float))
    }

    pub fn path(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Value(ValueKind::Path))
    }

    /// Enumeration field whose members come from a Rust enum.
    pub fn choice<E: ArgEnum>(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Value(ValueKind::Enum(EnumSpec::of::<E>())))
    }

    /// Enumeration field with explicit members.
    pub fn choice_of(name: impl Into<String>, spec: EnumSpec) -> Self {
        Self::new(name, FieldKind::Value(ValueKind::Enum(spec)))
    }

    /// Array field with the given element kind.
    pub fn array(name: impl Into<String>, element: ValueKind) -> Self {
        Self::new(name, FieldKind::Array(element))
    }

    /// Mention counter: a signed integer incremented per occurrence.
    ///
    /// Counters need at least one option token. Each parse counts from zero
    /// and assigns the running total, so a record whose `Default` starts the
    /// field above zero sees that value replaced rather than incremented.
    pub fn counter(name: impl Into<String>) -> Self {
        Self::int(name).counted()
    }

    /// Adds one option token.
    pub fn with_option(mut self, option: &str) -> Self {
        self.options.push(option.to_string());
        self
    }

    /// Adds several option tokens.
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.extend(options.into_iter().map(Into::into));
        self
    }

    pub fn with_display_name(mut self, display_name: &str) -> Self {
        self.display_name = Some(display_name.to_string());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Limits an array to `length` elements.
    pub fn with_length(mut self, length: usize) -> Self {
        self.length = Some(length);
        self
    }

    /// Requires an array to end up with at least one element.
    pub fn non_empty(mut self) -> Self {
        self.non_empty = true;
        self
    }

    /// Marks an integer field as a mention counter.
    pub fn counted(mut self) -> Self {
        self.counted = true;
        self
    }

    /// Makes an option field mandatory. Positional fields always are.
    pub fn mandatory(mut self) -> Self {
        self.mandatory = true;
        self
    }

    /// Returns `true` if the field has no option tokens.
    pub fn is_positional(&self) -> bool {
        self.options.is_empty()
    }
}

/// Schema-level metadata, used only for help output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaInfo {
    /// Program name shown in the usage line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Free text printed after the option tables.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addendum: Option<String>,
}

/// Complete declaration of an option schema.
///
/// # Examples
///
/// ```
/// use argbind_core::{FieldSpec, SchemaSpec};
///
/// let spec = SchemaSpec::new()
///     .with_name("copy")
///     .with_version("1.2.0")
///     .with_field(FieldSpec::flag("force").with_options(["-f", "--force"]))
///     .with_field(FieldSpec::path("source"))
///     .with_field(FieldSpec::path("dest"));
///
/// assert_eq!(spec.fields.len(), 3);
/// assert_eq!(spec.info.name.as_deref(), Some("copy"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaSpec {
    #[serde(default)]
    pub info: SchemaInfo,
    pub fields: Vec<FieldSpec>,
}

impl SchemaSpec {
    /// Creates an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field. Declaration order is positional order.
    pub fn with_field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.info.name = Some(name.to_string());
        self
    }

    pub fn with_version(mut self, version: &str) -> Self {
        self.info.version = Some(version.to_string());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.info.description = Some(description.to_string());
        self
    }

    pub fn with_addendum(mut self, addendum: &str) -> Self {
        self.info.addendum = Some(addendum.to_string());
        self
    }
}
