//! The dispatch loop.
//!
//! Walks normalized tokens left to right and binds each to a descriptor,
//! either through the option table or the next free positional slot.
//! Problems are recorded in a [`ParseErrors`] set and reported to the sink;
//! only a missing value at the very end of the input stops the walk early.

use std::ops::ControlFlow;

use argbind_core::{Descriptor, FieldKind, Record, Schema, Value, ValueKind};
use tracing::debug;

use crate::coerce::coerce_value;
use crate::config::ParserConfig;
use crate::normalize::normalize_tokens;
use crate::outcome::{ParseErrors, ParseOutcome};
use crate::sink::DiagnosticSink;

/// State of one parse over one token list.
///
/// # Examples
///
/// ```
/// use argbind_core::{DynamicRecord, FieldSpec, Schema, SchemaSpec, Value};
/// use argbind_parser::{CollectingSink, ParserConfig, TokenParser};
///
/// let schema = Schema::build(
///     SchemaSpec::new()
///         .with_field(FieldSpec::counter("verbose").with_option("-v"))
///         .with_field(FieldSpec::string("name")),
/// )
/// .unwrap();
/// let config = ParserConfig::default();
///
/// let parser = TokenParser::new(&schema, ["-vv", "demo"], &config);
/// assert_eq!(parser.tokens(), ["-v", "-v", "demo"]);
///
/// let mut sink = CollectingSink::default();
/// let outcome = parser.run::<DynamicRecord>(&mut sink);
/// assert!(outcome.success);
/// assert_eq!(outcome.value.get("verbose"), Some(&Value::Int(2)));
/// assert_eq!(outcome.value.get("name"), Some(&Value::Str("demo".into())));
/// ```
pub struct TokenParser<'a> {
    schema: &'a Schema,
    config: &'a ParserConfig,
    tokens: Vec<String>,
    cursor: usize,
    positional_consumed: usize,
    errors: ParseErrors,
    /// Mentions seen per counted descriptor.
    counts: Vec<u64>,
    /// Descriptors some token was bound to.
    bound: Vec<bool>,
}

impl<'a> TokenParser<'a> {
    /// Normalizes `args` and prepares a parse against `schema`.
    pub fn new<I, S>(schema: &'a Schema, args: I, config: &'a ParserConfig) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let fields = schema.descriptors().len();
        Self {
            schema,
            config,
            tokens: normalize_tokens(args, config),
            cursor: 0,
            positional_consumed: 0,
            errors: ParseErrors::empty(),
            counts: vec![0; fields],
            bound: vec![false; fields],
        }
    }

    /// The normalized tokens this parser walks.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Runs the parse into a fresh `R::default()`.
    pub fn run<R>(mut self, sink: &mut dyn DiagnosticSink) -> ParseOutcome<R>
    where
        R: Record + Default,
    {
        if self.tokens.iter().any(|t| self.config.is_help_token(t)) {
            debug!("Help token found, skipping parse");
            sink.help(self.schema);
            return ParseOutcome::help(R::default());
        }

        let mut record = R::default();
        while self.cursor < self.tokens.len() {
            if self.step(&mut record, sink).is_break() {
                break;
            }
        }
        self.check_mandatory(sink);

        debug!(
            tokens = self.tokens.len(),
            positional = self.positional_consumed,
            errors = ?self.errors,
            "Parse finished"
        );
        ParseOutcome::finished(record, self.errors)
    }

    fn step<R>(&mut self, record: &mut R, sink: &mut dyn DiagnosticSink) -> ControlFlow<()>
    where
        R: Record + ?Sized,
    {
        let schema = self.schema;
        let token = &self.tokens[self.cursor];

        // Option path: the value starts after the option. Positional path:
        // the token itself is the value.
        let (index, value_at) = if let Some(index) = schema.find_option(token) {
            (index, self.cursor + 1)
        } else if let Some(&index) = schema.positional().get(self.positional_consumed) {
            self.positional_consumed += 1;
            (index, self.cursor)
        } else {
            let message = format!("Unrecognized argument: {token}");
            report(&mut self.errors, sink, ParseErrors::WRONG_VALUE, &message);
            self.cursor += 1;
            return ControlFlow::Continue(());
        };

        let option = token.clone();
        let descriptor = &schema.descriptors()[index];
        self.bound[index] = true;

        match &descriptor.kind {
            FieldKind::Flag => {
                self.assign(record, sink, descriptor, Value::Bool(true));
                self.cursor += 1;
            }
            FieldKind::Value(kind) if descriptor.counted => {
                self.counts[index] += 1;
                let count = self.counts[index];
                let value = match kind {
                    ValueKind::UInt => Value::UInt(count),
                    _ => Value::Int(i64::try_from(count).unwrap_or(i64::MAX)),
                };
                self.assign(record, sink, descriptor, value);
                self.cursor += 1;
            }
            FieldKind::Value(kind) => {
                let at = match self.value_slot(&option, value_at, sink) {
                    Ok(at) => at,
                    Err(flow) => return flow,
                };
                match coerce_value(kind, &self.tokens[at], self.config) {
                    Ok(value) => self.assign(record, sink, descriptor, value),
                    Err(err) => {
                        let message = format!("{err} ({})", descriptor.label());
                        report(&mut self.errors, sink, ParseErrors::WRONG_VALUE, &message);
                    }
                }
                self.cursor = at + 1;
            }
            FieldKind::Array(element) => {
                let at = match self.value_slot(&option, value_at, sink) {
                    Ok(at) => at,
                    Err(flow) => return flow,
                };
                let consumed = self.bind_array(record, sink, descriptor, element, at);
                self.cursor = at + consumed;
            }
        }

        ControlFlow::Continue(())
    }

    /// Checks that a value token exists at `at` and is not an option.
    ///
    /// Running out of tokens ends the parse. Hitting another option leaves
    /// the cursor on it so the next step treats it as an option.
    fn value_slot(
        &mut self,
        option: &str,
        at: usize,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<usize, ControlFlow<()>> {
        let message = format!("Missing value for: {option}");
        match self.tokens.get(at) {
            None => {
                report(&mut self.errors, sink, ParseErrors::MISSING_VALUE, &message);
                self.cursor = self.tokens.len();
                Err(ControlFlow::Break(()))
            }
            Some(next) if self.schema.is_option(next) => {
                report(&mut self.errors, sink, ParseErrors::MISSING_VALUE, &message);
                self.cursor = at;
                Err(ControlFlow::Continue(()))
            }
            Some(_) => Ok(at),
        }
    }

    /// Coerces array elements starting at `start` and returns how many
    /// tokens were consumed.
    fn bind_array<R>(
        &mut self,
        record: &mut R,
        sink: &mut dyn DiagnosticSink,
        descriptor: &Descriptor,
        element: &ValueKind,
        start: usize,
    ) -> usize
    where
        R: Record + ?Sized,
    {
        let remaining = self.tokens.len() - start;
        let max = descriptor.length.map_or(remaining, |length| length.min(remaining));

        let mut values = Vec::new();
        let mut consumed = 0;
        for token in &self.tokens[start..start + max] {
            if self.schema.is_option(token) {
                break;
            }
            match coerce_value(element, token, self.config) {
                Ok(value) => values.push(value),
                Err(err) => {
                    let message = format!("{err} ({})", descriptor.label());
                    report(&mut self.errors, sink, ParseErrors::WRONG_VALUE, &message);
                }
            }
            consumed += 1;
        }

        if descriptor.non_empty && values.is_empty() {
            let message = format!("At least one value is required for: {}", descriptor.label());
            report(&mut self.errors, sink, ParseErrors::EMPTY_ARRAY, &message);
        } else {
            self.assign(record, sink, descriptor, Value::Array(values));
        }
        consumed
    }

    fn assign<R>(
        &mut self,
        record: &mut R,
        sink: &mut dyn DiagnosticSink,
        descriptor: &Descriptor,
        value: Value,
    ) where
        R: Record + ?Sized,
    {
        if let Err(err) = record.assign(&descriptor.name, value) {
            let message = format!("Value not accepted for {}: {err}", descriptor.label());
            report(&mut self.errors, sink, ParseErrors::WRONG_VALUE, &message);
        }
    }

    fn check_mandatory(&mut self, sink: &mut dyn DiagnosticSink) {
        let schema = self.schema;
        for (descriptor, bound) in schema.descriptors().iter().zip(&self.bound) {
            if descriptor.mandatory && !bound {
                let message = format!("Missing mandatory argument: {}", descriptor.label());
                report(&mut self.errors, sink, ParseErrors::MISSING_VALUE, &message);
            }
        }
    }
}

fn report(errors: &mut ParseErrors, sink: &mut dyn DiagnosticSink, error: ParseErrors, message: &str) {
    errors.insert(error);
    sink.diagnostic(message);
}
