//! Command-line token parsing against argbind schemas.
//!
//! A parse runs in two passes. [`normalize_tokens`] splits short-option
//! clusters and rewrites `/x` into `-x`. [`TokenParser`] then walks the
//! tokens, binding each to an option or the next positional field and
//! coercing values with [`coerce_value`].
//!
//! Recoverable problems never abort a parse. They are collected in
//! [`ParseErrors`] and reported line by line to a [`DiagnosticSink`].
//! Only an invalid declaration is fatal, as a [`SchemaError`] from
//! [`schema_for`].
//!
//! # Main entry points
//!
//! - [`parse`]: parse into an [`Arguments`] type with default settings,
//!   diagnostics on stderr.
//! - [`parse_env`]: same, over the process arguments.
//! - [`parse_with`]: explicit [`ParserConfig`] and sink.
//! - [`parse_into`]: parse against an already built [`Schema`], for
//!   example into a [`DynamicRecord`].
//!
//! # Example
//!
//! ```
//! use argbind_core::{Arguments, FieldSpec, Record, SchemaSpec, Value, ValueError};
//! use argbind_parser::{CollectingSink, ParseErrors, ParserConfig, parse_with};
//!
//! #[derive(Debug, Default)]
//! struct CopyArgs {
//!     force: bool,
//!     verbose: u8,
//!     source: String,
//!     dest: String,
//! }
//!
//! impl Record for CopyArgs {
//!     fn assign(&mut self, field: &str, value: Value) -> Result<(), ValueError> {
//!         match field {
//!             "force" => self.force = value.try_into()?,
//!             "verbose" => self.verbose = value.try_into()?,
//!             "source" => self.source = value.try_into()?,
//!             "dest" => self.dest = value.try_into()?,
//!             other => return Err(ValueError::UnknownField(other.to_string())),
//!         }
//!         Ok(())
//!     }
//! }
//!
//! impl Arguments for CopyArgs {
//!     fn schema_spec() -> SchemaSpec {
//!         SchemaSpec::new()
//!             .with_name("copy")
//!             .with_field(FieldSpec::flag("force").with_options(["-f", "--force"]))
//!             .with_field(FieldSpec::counter("verbose").with_option("-v"))
//!             .with_field(FieldSpec::string("source"))
//!             .with_field(FieldSpec::string("dest"))
//!     }
//! }
//!
//! let mut sink = CollectingSink::default();
//! let outcome = parse_with::<CopyArgs, _, _>(["-fvv", "a.txt", "b.txt"], &ParserConfig::default(), &mut sink)
//!     .unwrap();
//! assert!(outcome.success);
//! assert!(outcome.value.force);
//! assert_eq!(outcome.value.verbose, 2);
//! assert_eq!(outcome.value.dest, "b.txt");
//!
//! let outcome = parse_with::<CopyArgs, _, _>(["a.txt"], &ParserConfig::default(), &mut sink).unwrap();
//! assert!(!outcome.success);
//! assert_eq!(outcome.errors, ParseErrors::MISSING_VALUE);
//! assert_eq!(sink.diagnostics, vec!["Missing mandatory argument: dest"]);
//! ```

mod coerce;
mod config;
mod dispatch;
mod help;
mod normalize;
mod outcome;
mod registry;
mod sink;

pub use argbind_core::{
    ArgEnum, Arguments, Descriptor, DynamicRecord, EnumMember, EnumSpec, FieldKind, FieldSpec,
    Record, Schema, SchemaError, SchemaInfo, SchemaSpec, Value, ValueError, ValueKind,
};
pub use coerce::{CoerceError, coerce_bool, coerce_enum, coerce_value};
pub use config::{ConfigError, ParserConfig};
pub use dispatch::TokenParser;
pub use help::render_help;
pub use normalize::normalize_tokens;
pub use outcome::{ParseErrors, ParseOutcome};
pub use registry::{SchemaRegistry, schema_for};
pub use sink::{CollectingSink, DiagnosticSink, StderrSink, TracingSink};

/// Parses `args` into `T` with the default configuration, reporting to
/// stderr.
///
/// Fails only when `T`'s declaration is invalid.
pub fn parse<T, I, S>(args: I) -> Result<ParseOutcome<T>, SchemaError>
where
    T: Arguments,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    parse_with(args, &ParserConfig::default(), &mut StderrSink)
}

/// Parses the process arguments, without the program name.
///
/// Arguments that are not valid UTF-8 are converted lossily.
pub fn parse_env<T: Arguments>() -> Result<ParseOutcome<T>, SchemaError> {
    parse(std::env::args_os().skip(1).map(|arg| arg.to_string_lossy().into_owned()))
}

/// Parses `args` into `T` using an explicit configuration and sink.
pub fn parse_with<T, I, S>(
    args: I,
    config: &ParserConfig,
    sink: &mut dyn DiagnosticSink,
) -> Result<ParseOutcome<T>, SchemaError>
where
    T: Arguments,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let schema = schema_for::<T>()?;
    Ok(parse_into(&schema, args, config, sink))
}

/// Parses `args` against a built schema into a fresh `R::default()`.
pub fn parse_into<R, I, S>(
    schema: &Schema,
    args: I,
    config: &ParserConfig,
    sink: &mut dyn DiagnosticSink,
) -> ParseOutcome<R>
where
    R: Record + Default,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    TokenParser::new(schema, args, config).run(sink)
}
