//! Core declaration types for argbind option schemas.
//!
//! This crate defines what a tool declares and what the parser produces:
//!
//! - [`SchemaSpec`]: schema-level metadata plus one [`FieldSpec`] per field.
//! - [`FieldSpec`]: a field's kind, option tokens and constraints.
//! - [`Schema`]: the validated form: [`Descriptor`]s, an option lookup
//!   table and the positional queue.
//! - [`Value`]: a coerced value, converted into field types via `TryFrom`.
//! - [`Record`] / [`Arguments`]: the receiving side of a parse.
//!
//! Validation ([`validate_spec`]) rejects declarations that can never parse
//! correctly, such as duplicate option tokens or counters without options.
//!
//! # Example
//!
//! ```
//! use argbind_core::*;
//!
//! let spec = SchemaSpec::new()
//!     .with_name("grep")
//!     .with_field(FieldSpec::flag("ignore_case").with_options(["-i", "--ignore_case"]))
//!     .with_field(FieldSpec::counter("verbose").with_option("-v"))
//!     .with_field(FieldSpec::string("pattern"))
//!     .with_field(FieldSpec::array("files", ValueKind::Path).with_option("--files"));
//!
//! assert!(validate_spec(&spec).is_empty());
//! let schema = Schema::build(spec).unwrap();
//! assert_eq!(schema.positional().len(), 1);
//! assert!(schema.is_option("--files"));
//! ```

mod schema;
mod types;
mod validate;
mod value;

pub use schema::{Descriptor, Schema};
pub use types::*;
pub use validate::{SchemaError, is_valid_option, validate_spec};
pub use value::{ArgEnum, Arguments, DynamicRecord, Record, Value, ValueError};
