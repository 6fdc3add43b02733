//! Run-time schema example.
//!
//! Loads a schema from JSON, parses a few token lists into a
//! `DynamicRecord`, and routes diagnostics through `tracing`.
//!
//! # Usage
//!
//! ```bash
//! RUST_LOG=debug cargo run -p argbind-demos --example dynamic_schema
//! ```

use argbind_core::{Schema, SchemaSpec};
use argbind_parser::{DynamicRecord, ParseOutcome, ParserConfig, TracingSink, parse_into};
use tracing_subscriber::EnvFilter;

const SCHEMA: &str = r#"{
    "info": { "name": "fetch", "description": "Download things." },
    "fields": [
        { "name": "retries", "kind": { "value": "uint" }, "options": ["-r", "--retries"] },
        { "name": "insecure", "kind": "flag", "options": ["-k"] },
        { "name": "headers", "kind": { "array": "string" }, "options": ["-H"], "non_empty": true },
        { "name": "pair", "kind": { "array": "int" }, "options": ["--pair"], "length": 2 },
        { "name": "url", "kind": { "value": "string" }, "display_name": "URL" }
    ]
}"#;

const CONFIG: &str = "slash_prefix: false\nhelp_tokens: [\"-h\", \"--help\", \"-?\"]\n";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let spec: SchemaSpec = serde_json::from_str(SCHEMA)?;
    let schema = Schema::build(spec)?;
    let config = ParserConfig::from_yaml_str(CONFIG)?;

    let inputs: [&[&str]; 4] = [
        // `-H` reads values until the next option, so the URL goes first.
        &["-k", "-r", "3", "https://example.com", "-H", "Accept: */*", "X-Trace: 1"],
        &["--pair", "1", "2", "3"],
        &["-H", "-r", "many"],
        &["-?"],
    ];

    for args in inputs {
        let outcome: ParseOutcome<DynamicRecord> =
            parse_into(&schema, args, &config, &mut TracingSink);
        println!("{args:?}");
        println!("  success: {}, errors: {:?}", outcome.success, outcome.errors);
        for (field, value) in outcome.value.iter() {
            println!("  {field} = {}", serde_json::to_string(value)?);
        }
    }

    Ok(())
}
