//! Destinations for diagnostics and help output.
//!
//! The parser never prints. It hands each recoverable problem to a
//! [`DiagnosticSink`] as one line of text, and the schema to
//! [`DiagnosticSink::help`] when a help token is seen.

use std::io::Write;

use argbind_core::Schema;
use tracing::{info, warn};

use crate::help::render_help;

/// Receives advisory output from a parse.
pub trait DiagnosticSink {
    /// One line describing a recoverable problem.
    fn diagnostic(&mut self, message: &str);

    /// Called once when the parse switches into help mode.
    fn help(&mut self, schema: &Schema);
}

/// Diagnostics to stderr, help to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrSink;

impl DiagnosticSink for StderrSink {
    fn diagnostic(&mut self, message: &str) {
        eprintln!("{message}");
    }

    fn help(&mut self, schema: &Schema) {
        let mut stdout = std::io::stdout().lock();
        // Nothing sensible to do if stdout is gone.
        let _ = stdout.write_all(render_help(schema).as_bytes());
        let _ = stdout.flush();
    }
}

/// Diagnostics as `warn` events, help as one `info` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn diagnostic(&mut self, message: &str) {
        warn!(target: "argbind", "{message}");
    }

    fn help(&mut self, schema: &Schema) {
        info!(target: "argbind", help = %render_help(schema), "Help requested");
    }
}

/// Keeps everything in memory.
///
/// # Examples
///
/// ```
/// use argbind_parser::{CollectingSink, DiagnosticSink};
///
/// let mut sink = CollectingSink::default();
/// sink.diagnostic("Missing value for: -o");
/// assert_eq!(sink.diagnostics, vec!["Missing value for: -o"]);
/// assert!(!sink.help_requested);
/// ```
#[derive(Debug, Default, Clone)]
pub struct CollectingSink {
    pub diagnostics: Vec<String>,
    pub help_requested: bool,
    /// Rendered help text, if requested.
    pub help_text: Option<String>,
}

impl DiagnosticSink for CollectingSink {
    fn diagnostic(&mut self, message: &str) {
        self.diagnostics.push(message.to_string());
    }

    fn help(&mut self, schema: &Schema) {
        self.help_requested = true;
        self.help_text = Some(render_help(schema));
    }
}
