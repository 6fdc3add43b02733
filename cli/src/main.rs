use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use argbind_core::{Descriptor, Schema, SchemaInfo, SchemaSpec, validate_spec};
use argbind_parser::{
    CollectingSink, DynamicRecord, ParseOutcome, ParserConfig, parse_into, render_help,
};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "argbind")]
#[command(about = "Check, inspect and try out declarative option schemas")]
#[command(version)]
#[command(disable_help_subcommand = true)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate a schema file and report every declaration error.
    Check(SchemaArgs),
    /// Parse arguments against a schema and print the outcome.
    Parse(ParseArgs),
    /// Print the help text rendered from a schema.
    Help(SchemaArgs),
    /// Print the built schema: descriptors, option table and positional queue.
    Dump(DumpArgs),
}

#[derive(Debug, Args)]
struct SchemaArgs {
    /// Schema file (.json, .yaml or .yml).
    schema: PathBuf,
}

#[derive(Debug, Args)]
struct ParseArgs {
    /// Schema file (.json, .yaml or .yml).
    schema: PathBuf,
    /// Parser configuration YAML.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
    /// Arguments to parse, after `--`.
    #[arg(last = true)]
    args: Vec<String>,
}

#[derive(Debug, Args)]
struct DumpArgs {
    /// Schema file (.json, .yaml or .yml).
    schema: PathBuf,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
}

/// Serializable view of a built schema with a sorted option table.
#[derive(Debug, Serialize)]
struct SchemaDump<'a> {
    info: &'a SchemaInfo,
    descriptors: &'a [Descriptor],
    options: BTreeMap<&'a str, usize>,
    positional: &'a [usize],
}

impl<'a> SchemaDump<'a> {
    fn new(schema: &'a Schema) -> Self {
        let options = schema
            .descriptors()
            .iter()
            .enumerate()
            .flat_map(|(index, d)| d.options.iter().map(move |o| (o.as_str(), index)))
            .collect();
        Self {
            info: schema.info(),
            descriptors: schema.descriptors(),
            options,
            positional: schema.positional(),
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Check(args) => run_check(args),
        Command::Parse(args) => run_parse(args),
        Command::Help(args) => run_help(args),
        Command::Dump(args) => run_dump(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_check(args: SchemaArgs) -> Result<(), String> {
    let spec = load_spec(&args.schema)?;
    let errors = validate_spec(&spec);
    if !errors.is_empty() {
        for err in &errors {
            eprintln!("{}: {err}", args.schema.display());
        }
        return Err(format!(
            "{} schema error(s) in '{}'",
            errors.len(),
            args.schema.display()
        ));
    }

    println!(
        "Schema '{}' is valid: {} field(s).",
        args.schema.display(),
        spec.fields.len()
    );
    Ok(())
}

fn run_parse(args: ParseArgs) -> Result<(), String> {
    let schema = build_schema(&args.schema)?;
    let config = match &args.config {
        Some(path) => ParserConfig::load(path)
            .map_err(|err| format!("Failed to load config '{}': {err}", path.display()))?,
        None => ParserConfig::default(),
    };
    debug!(?config, tokens = args.args.len(), "Parsing arguments");

    let mut sink = CollectingSink::default();
    let outcome: ParseOutcome<DynamicRecord> = parse_into(&schema, &args.args, &config, &mut sink);

    for diagnostic in &sink.diagnostics {
        eprintln!("{diagnostic}");
    }
    if let Some(help) = &sink.help_text {
        eprint!("{help}");
    }
    println!("{}", format_output(&outcome, args.format)?);

    if outcome.success {
        Ok(())
    } else {
        let names: Vec<&str> = outcome.errors.iter_names().map(|(name, _)| name).collect();
        Err(format!("Parse failed: {}", names.join(" | ")))
    }
}

fn run_help(args: SchemaArgs) -> Result<(), String> {
    let schema = build_schema(&args.schema)?;
    print!("{}", render_help(&schema));
    Ok(())
}

fn run_dump(args: DumpArgs) -> Result<(), String> {
    let schema = build_schema(&args.schema)?;
    println!("{}", format_output(&SchemaDump::new(&schema), args.format)?);
    Ok(())
}

fn load_spec(path: &Path) -> Result<SchemaSpec, String> {
    let raw = fs::read_to_string(path)
        .map_err(|err| format!("Failed to read '{}': {err}", path.display()))?;

    let spec: SchemaSpec = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str(&raw)
            .map_err(|err| format!("Failed to parse '{}': {err}", path.display()))?,
        Some("yaml" | "yml") => serde_yaml::from_str(&raw)
            .map_err(|err| format!("Failed to parse '{}': {err}", path.display()))?,
        _ => {
            return Err(format!(
                "Unsupported schema file '{}': expected .json, .yaml or .yml",
                path.display()
            ));
        }
    };

    info!(path = %path.display(), fields = spec.fields.len(), "Loaded schema file");
    Ok(spec)
}

fn build_schema(path: &Path) -> Result<Schema, String> {
    let spec = load_spec(path)?;
    Schema::build(spec).map_err(|err| format!("Invalid schema '{}': {err}", path.display()))
}

fn format_output<T: Serialize>(value: &T, format: CliOutputFormat) -> Result<String, String> {
    match format {
        CliOutputFormat::Json => serde_json::to_string_pretty(value)
            .map_err(|err| format!("Failed to serialize output: {err}")),
        CliOutputFormat::Yaml => serde_yaml::to_string(value)
            .map_err(|err| format!("Failed to serialize output: {err}")),
    }
}
