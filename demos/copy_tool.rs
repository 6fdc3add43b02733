//! Typed argument parsing example.
//!
//! Declares a `cp`-like tool with a flag, a mention counter, an enumeration
//! and an array, then parses the process arguments into it.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p argbind-demos --example copy_tool -- -fvv src dst --mode safe -x '*.tmp' '*.bak'
//! cargo run -p argbind-demos --example copy_tool -- --help
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use argbind_core::{
    ArgEnum, Arguments, FieldSpec, Record, SchemaSpec, Value, ValueError, ValueKind,
};
use argbind_parser::parse_env;

#[derive(Debug, Default, Clone, Copy)]
enum Mode {
    #[default]
    Fast,
    Safe,
    Paranoid,
}

impl ArgEnum for Mode {
    fn members() -> &'static [(&'static str, i64)] {
        &[("fast", 0), ("safe", 1), ("paranoid", 2)]
    }

    fn from_ordinal(ordinal: i64) -> Option<Self> {
        match ordinal {
            0 => Some(Mode::Fast),
            1 => Some(Mode::Safe),
            2 => Some(Mode::Paranoid),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct CopyArgs {
    force: bool,
    verbose: u8,
    mode: Mode,
    exclude: Vec<String>,
    source: PathBuf,
    dest: PathBuf,
}

impl Record for CopyArgs {
    fn assign(&mut self, field: &str, value: Value) -> Result<(), ValueError> {
        match field {
            "force" => self.force = value.try_into()?,
            "verbose" => self.verbose = value.try_into()?,
            "mode" => self.mode = value.into_enum()?,
            "exclude" => self.exclude = value.try_into()?,
            "source" => self.source = value.try_into()?,
            "dest" => self.dest = value.try_into()?,
            other => return Err(ValueError::UnknownField(other.to_string())),
        }
        Ok(())
    }
}

impl Arguments for CopyArgs {
    fn schema_spec() -> SchemaSpec {
        SchemaSpec::new()
            .with_name("copy_tool")
            .with_version(env!("CARGO_PKG_VERSION"))
            .with_description("Copy a file, the careful way.")
            .with_addendum("Clustered short options (-fv) and /x style options are accepted.")
            .with_field(
                FieldSpec::flag("force")
                    .with_options(["-f", "--force"])
                    .with_description("Overwrite the destination"),
            )
            .with_field(
                FieldSpec::counter("verbose")
                    .with_option("-v")
                    .with_description("More output, repeatable"),
            )
            .with_field(
                FieldSpec::choice::<Mode>("mode")
                    .with_options(["-m", "--mode"])
                    .with_description("Copy strategy"),
            )
            .with_field(
                FieldSpec::array("exclude", ValueKind::String)
                    .with_options(["-x", "--exclude"])
                    .with_display_name("glob")
                    .non_empty()
                    .with_description("Patterns to skip"),
            )
            .with_field(
                FieldSpec::path("source")
                    .with_display_name("SOURCE")
                    .with_description("File to copy"),
            )
            .with_field(
                FieldSpec::path("dest")
                    .with_display_name("DEST")
                    .with_description("Where to put it"),
            )
    }
}

fn main() -> ExitCode {
    let outcome = match parse_env::<CopyArgs>() {
        Ok(outcome) => outcome,
        Err(err) => {
            eprintln!("error: invalid argument declaration: {err}");
            return ExitCode::FAILURE;
        }
    };

    if outcome.printed_help {
        return ExitCode::SUCCESS;
    }
    if !outcome.success {
        eprintln!("error: {:?}", outcome.errors);
        return ExitCode::from(2);
    }

    let args = outcome.value;
    println!("Would copy {} -> {}", args.source.display(), args.dest.display());
    println!("  mode:     {:?}", args.mode);
    println!("  force:    {}", args.force);
    println!("  verbose:  {}", args.verbose);
    if !args.exclude.is_empty() {
        println!("  excluded: {}", args.exclude.join(", "));
    }
    ExitCode::SUCCESS
}
