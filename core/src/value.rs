//! Coerced values and the traits that receive them.
//!
//! The parser turns tokens into [`Value`]s and hands each one to
//! [`Record::assign`]. Records convert values into their field types with
//! the `TryFrom<Value>` impls in this module; a failed conversion is a
//! [`ValueError`] and is reported to the user as a wrong value.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{EnumMember, SchemaSpec};

/// Errors raised while converting a [`Value`] into a field type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// The value has a different kind than the field expects.
    #[error("expected {expected}, found {found}")]
    Mismatch {
        expected: &'static str,
        found: &'static str,
    },
    /// A number does not fit the field's integer or float type.
    #[error("{value} is out of range for {target}")]
    OutOfRange { value: String, target: &'static str },
    /// An enumeration member has no counterpart in the Rust enum.
    #[error("unknown enumeration member: {0}")]
    UnknownMember(String),
    /// The record has no field with this name.
    #[error("unknown field: {0}")]
    UnknownField(String),
}

/// A value produced by coercion.
///
/// # Examples
///
/// ```
/// use argbind_core::Value;
///
/// let port: u16 = Value::UInt(8080).try_into().unwrap();
/// assert_eq!(port, 8080);
///
/// let too_big: Result<u8, _> = Value::UInt(300).try_into();
/// assert!(too_big.is_err());
///
/// let names: Vec<String> = Value::Array(vec![Value::Str("a".into()), Value::Str("b".into())])
///     .try_into()
///     .unwrap();
/// assert_eq!(names, vec!["a", "b"]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Char(char),
    Str(String),
    Path(PathBuf),
    Enum(EnumMember),
    Array(Vec<Value>),
}

impl Value {
    /// Kind name used in conversion errors.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::UInt(_) => "uint",
            Self::Float(_) => "float",
            Self::Char(_) => "char",
            Self::Str(_) => "string",
            Self::Path(_) => "path",
            Self::Enum(_) => "enum",
            Self::Array(_) => "array",
        }
    }

    /// Converts an enumeration value into a Rust enum.
    ///
    /// # Examples
    ///
    /// ```
    /// use argbind_core::{ArgEnum, EnumMember, Value};
    ///
    /// #[derive(Debug, PartialEq)]
    /// enum Mode { Fast, Safe }
    ///
    /// impl ArgEnum for Mode {
    ///     fn members() -> &'static [(&'static str, i64)] {
    ///         &[("Fast", 0), ("Safe", 1)]
    ///     }
    ///     fn from_ordinal(ordinal: i64) -> Option<Self> {
    ///         match ordinal {
    ///             0 => Some(Mode::Fast),
    ///             1 => Some(Mode::Safe),
    ///             _ => None,
    ///         }
    ///     }
    /// }
    ///
    /// let mode: Mode = Value::Enum(EnumMember::new("Safe", 1)).into_enum().unwrap();
    /// assert_eq!(mode, Mode::Safe);
    /// ```
    pub fn into_enum<E: ArgEnum>(self) -> Result<E, ValueError> {
        match self {
            Self::Enum(member) => {
                E::from_ordinal(member.ordinal).ok_or(ValueError::UnknownMember(member.name))
            }
            other => Err(mismatch("enum", &other)),
        }
    }

    /// Converts an array of enumeration values into a vector of a Rust enum.
    pub fn into_enum_vec<E: ArgEnum>(self) -> Result<Vec<E>, ValueError> {
        match self {
            Self::Array(items) => items.into_iter().map(Value::into_enum::<E>).collect(),
            other => Err(mismatch("array", &other)),
        }
    }
}

fn mismatch(expected: &'static str, found: &Value) -> ValueError {
    ValueError::Mismatch {
        expected,
        found: found.kind_name(),
    }
}

impl TryFrom<Value> for bool {
    type Error = ValueError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(mismatch("bool", &other)),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = ValueError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Str(s) => Ok(s),
            Value::Path(p) => Ok(p.to_string_lossy().into_owned()),
            Value::Char(c) => Ok(c.to_string()),
            Value::Enum(member) => Ok(member.name),
            other => Err(mismatch("string", &other)),
        }
    }
}

impl TryFrom<Value> for char {
    type Error = ValueError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Char(c) => Ok(c),
            other => Err(mismatch("char", &other)),
        }
    }
}

impl TryFrom<Value> for PathBuf {
    type Error = ValueError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Path(p) => Ok(p),
            Value::Str(s) => Ok(PathBuf::from(s)),
            other => Err(mismatch("path", &other)),
        }
    }
}

macro_rules! impl_try_from_integer {
    ($($target:ty),*) => {$(
        impl TryFrom<Value> for $target {
            type Error = ValueError;

            fn try_from(value: Value) -> Result<Self, Self::Error> {
                let out_of_range = |value: String| ValueError::OutOfRange {
                    value,
                    target: stringify!($target),
                };
                match value {
                    Value::Int(n) => <$target>::try_from(n).map_err(|_| out_of_range(n.to_string())),
                    Value::UInt(n) => <$target>::try_from(n).map_err(|_| out_of_range(n.to_string())),
                    other => Err(mismatch("integer", &other)),
                }
            }
        }
    )*};
}

impl_try_from_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl TryFrom<Value> for f64 {
    type Error = ValueError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Float(f) => Ok(f),
            Value::Int(n) => Ok(n as f64),
            Value::UInt(n) => Ok(n as f64),
            other => Err(mismatch("float", &other)),
        }
    }
}

impl TryFrom<Value> for f32 {
    type Error = ValueError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let wide = f64::try_from(value)?;
        if wide.is_finite() && wide.abs() > f32::MAX as f64 {
            return Err(ValueError::OutOfRange {
                value: wide.to_string(),
                target: "f32",
            });
        }
        Ok(wide as f32)
    }
}

impl<T> TryFrom<Value> for Vec<T>
where
    T: TryFrom<Value, Error = ValueError>,
{
    type Error = ValueError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Array(items) => items.into_iter().map(T::try_from).collect(),
            other => Err(mismatch("array", &other)),
        }
    }
}

/// A Rust enum usable as an enumeration field.
///
/// `members` lists names and ordinals in declaration order; ordinals are
/// what users may type instead of a name.
pub trait ArgEnum: Sized {
    fn members() -> &'static [(&'static str, i64)];

    fn from_ordinal(ordinal: i64) -> Option<Self>;
}

/// Destination of coerced values.
///
/// `field` is the [`FieldSpec::name`](crate::FieldSpec::name) of the
/// descriptor being bound. Returning an error marks the value as wrong and
/// leaves the field untouched.
pub trait Record {
    fn assign(&mut self, field: &str, value: Value) -> Result<(), ValueError>;
}

/// A record type with a statically declared schema.
///
/// The schema is built from [`schema_spec`](Arguments::schema_spec) once per
/// type and cached for the process; the parse result starts from
/// `Default::default()`.
///
/// # Examples
///
/// ```
/// use argbind_core::{Arguments, FieldSpec, Record, SchemaSpec, Value, ValueError};
///
/// #[derive(Debug, Default)]
/// struct Opts {
///     verbose: bool,
///     name: String,
/// }
///
/// impl Record for Opts {
///     fn assign(&mut self, field: &str, value: Value) -> Result<(), ValueError> {
///         match field {
///             "verbose" => self.verbose = value.try_into()?,
///             "name" => self.name = value.try_into()?,
///             other => return Err(ValueError::UnknownField(other.to_string())),
///         }
///         Ok(())
///     }
/// }
///
/// impl Arguments for Opts {
///     fn schema_spec() -> SchemaSpec {
///         SchemaSpec::new()
///             .with_field(FieldSpec::flag("verbose").with_option("-v"))
///             .with_field(FieldSpec::string("name"))
///     }
/// }
///
/// let mut opts = Opts::default();
/// opts.assign("name", Value::Str("demo".into())).unwrap();
/// assert_eq!(opts.name, "demo");
/// assert_eq!(Opts::schema_spec().fields.len(), 2);
/// ```
pub trait Arguments: Record + Default + 'static {
    fn schema_spec() -> SchemaSpec;
}

/// A record for schemas only known at run time.
///
/// Keeps every assigned value by field name; later assignments replace
/// earlier ones.
///
/// # Examples
///
/// ```
/// use argbind_core::{DynamicRecord, Record, Value};
///
/// let mut record = DynamicRecord::default();
/// record.assign("count", Value::Int(2)).unwrap();
/// assert_eq!(record.get("count"), Some(&Value::Int(2)));
/// assert!(record.get("missing").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DynamicRecord {
    values: BTreeMap<String, Value>,
}

impl DynamicRecord {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Record for DynamicRecord {
    fn assign(&mut self, field: &str, value: Value) -> Result<(), ValueError> {
        self.values.insert(field.to_string(), value);
        Ok(())
    }
}
