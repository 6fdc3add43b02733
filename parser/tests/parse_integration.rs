use std::path::PathBuf;
use std::sync::Arc;

use argbind_parser::{
    ArgEnum, Arguments, CollectingSink, DynamicRecord, EnumSpec, FieldSpec, ParseErrors,
    ParseOutcome, ParserConfig, Record, Schema, SchemaError, SchemaSpec, Value, ValueError,
    ValueKind, parse_into, parse_with, schema_for,
};
use rayon::prelude::*;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum Level {
    #[default]
    Low,
    Medium,
    High,
}

impl ArgEnum for Level {
    fn members() -> &'static [(&'static str, i64)] {
        &[("Low", 1), ("Medium", 5), ("High", 10)]
    }

    fn from_ordinal(ordinal: i64) -> Option<Self> {
        match ordinal {
            1 => Some(Level::Low),
            5 => Some(Level::Medium),
            10 => Some(Level::High),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct Tool {
    all: bool,
    brief: bool,
    color: bool,
    verbose: u32,
    file: Option<String>,
    count: i32,
    level: Level,
    numbers: Vec<i64>,
    ports: Vec<u16>,
    pair: Vec<String>,
    small: u8,
    target: PathBuf,
}

impl Record for Tool {
    fn assign(&mut self, field: &str, value: Value) -> Result<(), ValueError> {
        match field {
            "all" => self.all = value.try_into()?,
            "brief" => self.brief = value.try_into()?,
            "color" => self.color = value.try_into()?,
            "verbose" => self.verbose = value.try_into()?,
            "file" => self.file = Some(value.try_into()?),
            "count" => self.count = value.try_into()?,
            "level" => self.level = value.into_enum()?,
            "numbers" => self.numbers = value.try_into()?,
            "ports" => self.ports = value.try_into()?,
            "pair" => self.pair = value.try_into()?,
            "small" => self.small = value.try_into()?,
            "target" => self.target = value.try_into()?,
            other => return Err(ValueError::UnknownField(other.to_string())),
        }
        Ok(())
    }
}

impl Arguments for Tool {
    fn schema_spec() -> SchemaSpec {
        SchemaSpec::new()
            .with_name("tool")
            .with_version("1.0.0")
            .with_field(FieldSpec::flag("all").with_options(["-a", "--all"]))
            .with_field(FieldSpec::flag("brief").with_option("-b"))
            .with_field(FieldSpec::boolean("color").with_options(["-c", "--color"]))
            .with_field(FieldSpec::counter("verbose").with_option("-v"))
            .with_field(FieldSpec::string("file").with_options(["-f", "--file"]))
            .with_field(FieldSpec::int("count").with_option("-g"))
            .with_field(FieldSpec::choice::<Level>("level").with_options(["-l", "--level"]))
            .with_field(FieldSpec::array("numbers", ValueKind::Int).with_option("-n"))
            .with_field(
                FieldSpec::array("ports", ValueKind::UInt)
                    .with_option("-p")
                    .non_empty(),
            )
            .with_field(
                FieldSpec::array("pair", ValueKind::String)
                    .with_option("--pair")
                    .with_length(2),
            )
            .with_field(FieldSpec::uint("small").with_option("-s"))
            .with_field(FieldSpec::path("target").with_display_name("TARGET"))
    }
}

fn run(args: &[&str]) -> (ParseOutcome<Tool>, CollectingSink) {
    let mut sink = CollectingSink::default();
    let outcome = parse_with::<Tool, _, _>(args, &ParserConfig::default(), &mut sink)
        .expect("schema should build");
    (outcome, sink)
}

#[test]
fn test_help_anywhere_wins() {
    for args in [
        vec!["-h"],
        vec!["out", "--help"],
        vec!["-g", "nope", "--unknown", "-h", "-f"],
        vec!["-abh"],
        vec!["/h"],
    ] {
        let (outcome, sink) = run(&args);
        assert!(outcome.success, "{args:?}");
        assert!(outcome.printed_help, "{args:?}");
        assert!(outcome.errors.is_empty());
        assert!(!outcome.value.all);
        assert!(outcome.value.file.is_none());
        assert!(sink.help_requested);
        assert!(sink.diagnostics.is_empty());
        let help = sink.help_text.expect("help rendered");
        assert!(help.starts_with("tool 1.0.0\n"));
        assert!(help.contains("Usage: tool [options] TARGET"));
    }
}

#[test]
fn test_cluster_equals_separate_options() {
    let (clustered, _) = run(&["out", "-abv", "-g", "4"]);
    let (separate, _) = run(&["out", "-a", "-b", "-v", "-g", "4"]);

    assert!(clustered.success);
    assert_eq!(clustered.value.all, separate.value.all);
    assert_eq!(clustered.value.brief, separate.value.brief);
    assert_eq!(clustered.value.verbose, 1);
    assert_eq!(clustered.value.count, separate.value.count);
}

#[test]
fn test_slash_prefix_equals_dash() {
    let (outcome, _) = run(&["/f", "x.txt", "out", "/ab"]);
    assert!(outcome.success);
    assert_eq!(outcome.value.file.as_deref(), Some("x.txt"));
    assert!(outcome.value.all);
    assert!(outcome.value.brief);
}

#[test]
fn test_array_stops_at_option() {
    let (outcome, _) = run(&["-n", "1", "2", "-a", "out"]);
    assert!(outcome.success);
    assert_eq!(outcome.value.numbers, vec![1, 2]);
    assert!(outcome.value.all);
    assert_eq!(outcome.value.target, PathBuf::from("out"));
}

#[test]
fn test_missing_value_at_end() {
    let (outcome, sink) = run(&["out", "-f"]);
    assert!(!outcome.success);
    assert_eq!(outcome.errors, ParseErrors::MISSING_VALUE);
    assert!(outcome.value.file.is_none());
    assert_eq!(sink.diagnostics, vec!["Missing value for: -f"]);
}

#[test]
fn test_missing_value_preempted_by_option() {
    let (outcome, _) = run(&["out", "-f", "-g", "3"]);
    assert_eq!(outcome.errors, ParseErrors::MISSING_VALUE);
    assert!(outcome.value.file.is_none());
    assert_eq!(outcome.value.count, 3);
}

#[test]
fn test_mention_counting() {
    let (outcome, _) = run(&["-v", "-v", "-v", "out"]);
    assert!(outcome.success);
    assert_eq!(outcome.value.verbose, 3);

    let (outcome, _) = run(&["-vvvv", "/v", "out"]);
    assert_eq!(outcome.value.verbose, 5);
}

#[test]
fn test_boolean_recognizers() {
    for (token, expected) in [
        ("yes", true),
        ("NO", false),
        ("1", true),
        ("0", false),
        ("On", true),
        ("off", false),
        ("TRUE", true),
        ("false", false),
        ("not", false),
    ] {
        let (outcome, _) = run(&["--color", token, "out"]);
        assert!(outcome.success, "{token}");
        assert_eq!(outcome.value.color, expected, "{token}");
    }

    let (outcome, sink) = run(&["--color", "maybe", "out"]);
    assert_eq!(outcome.errors, ParseErrors::WRONG_VALUE);
    assert!(!outcome.value.color);
    assert_eq!(sink.diagnostics.len(), 1);
    assert!(sink.diagnostics[0].contains("maybe"));
}

#[test]
fn test_enum_by_name_and_ordinal() {
    let (outcome, _) = run(&["-l", "High", "out"]);
    assert_eq!(outcome.value.level, Level::High);

    let (outcome, _) = run(&["-l", "medium", "out"]);
    assert_eq!(outcome.value.level, Level::Medium);

    let (outcome, _) = run(&["--level", "10", "out"]);
    assert_eq!(outcome.value.level, Level::High);
}

#[test]
fn test_enum_failures_leave_default() {
    let (outcome, sink) = run(&["-l", "2", "out"]);
    assert_eq!(outcome.errors, ParseErrors::WRONG_VALUE);
    assert_eq!(outcome.value.level, Level::Low);
    assert!(sink.diagnostics[0].contains("1 (Low), 5 (Medium), 10 (High)"));

    let (outcome, sink) = run(&["-l", "Extreme", "out"]);
    assert_eq!(outcome.errors, ParseErrors::WRONG_VALUE);
    assert_eq!(outcome.value.level, Level::Low);
    assert!(sink.diagnostics[0].contains("Low, Medium, High"));
}

#[test]
fn test_enum_case_sensitive_config() {
    let config = ParserConfig {
        enum_ignore_case: false,
        ..ParserConfig::default()
    };
    let mut sink = CollectingSink::default();
    let outcome = parse_with::<Tool, _, _>(["-l", "high", "out"], &config, &mut sink).unwrap();
    assert_eq!(outcome.errors, ParseErrors::WRONG_VALUE);
    assert_eq!(outcome.value.level, Level::Low);
}

#[test]
fn test_partial_array_is_kept() {
    let (outcome, sink) = run(&["-n", "1", "x", "3", "-a", "out"]);
    assert_eq!(outcome.errors, ParseErrors::WRONG_VALUE);
    assert_eq!(outcome.value.numbers, vec![1, 3]);
    assert!(outcome.value.all);
    assert_eq!(sink.diagnostics.len(), 1);
}

#[test]
fn test_non_empty_array() {
    let (outcome, _) = run(&["-p", "80", "443", "-a", "out"]);
    assert!(outcome.success);
    assert_eq!(outcome.value.ports, vec![80, 443]);

    // Every element failed: both bits, field untouched.
    let (outcome, _) = run(&["-p", "http", "-a", "out"]);
    assert_eq!(outcome.errors, ParseErrors::WRONG_VALUE | ParseErrors::EMPTY_ARRAY);
    assert!(outcome.value.ports.is_empty());

    // Nothing to consume before the next option.
    let (outcome, _) = run(&["out", "-p", "-a"]);
    assert_eq!(outcome.errors, ParseErrors::MISSING_VALUE);
}

#[test]
fn test_element_out_of_field_range() {
    // Coerces as an unsigned integer but does not fit u16.
    let (outcome, sink) = run(&["-p", "70000", "-a", "out"]);
    assert_eq!(outcome.errors, ParseErrors::WRONG_VALUE);
    assert!(outcome.value.ports.is_empty());
    assert!(sink.diagnostics[0].starts_with("Value not accepted for -p"));

    let (outcome, _) = run(&["-s", "300", "out"]);
    assert_eq!(outcome.errors, ParseErrors::WRONG_VALUE);
    assert_eq!(outcome.value.small, 0);
}

#[test]
fn test_fixed_length_array() {
    let (outcome, sink) = run(&["--pair", "left", "right", "out"]);
    assert!(outcome.success, "{:?}", sink.diagnostics);
    assert_eq!(outcome.value.pair, vec!["left", "right"]);
    assert_eq!(outcome.value.target, PathBuf::from("out"));
}

#[test]
fn test_unrecognized_tokens_continue() {
    let (outcome, sink) = run(&["out", "extra", "--nope", "-a"]);
    assert_eq!(outcome.errors, ParseErrors::WRONG_VALUE);
    assert!(outcome.value.all);
    assert_eq!(
        sink.diagnostics,
        vec!["Unrecognized argument: extra", "Unrecognized argument: --nope"]
    );
}

#[test]
fn test_missing_positional_is_reported() {
    let (outcome, sink) = run(&["-a"]);
    assert_eq!(outcome.errors, ParseErrors::MISSING_VALUE);
    assert!(outcome.value.all);
    assert_eq!(sink.diagnostics, vec!["Missing mandatory argument: TARGET"]);
}

#[test]
fn test_errors_combine() {
    let (outcome, _) = run(&["-g", "x", "-p", "-n", "-f"]);
    assert!(outcome.has(ParseErrors::WRONG_VALUE));
    assert!(outcome.has(ParseErrors::MISSING_VALUE));
    assert!(!outcome.success);
}

#[test]
fn test_schema_build_is_idempotent() {
    let first = schema_for::<Tool>().unwrap();
    let second = schema_for::<Tool>().unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    let rebuilt = Schema::build(Tool::schema_spec()).unwrap();
    assert_eq!(*first, rebuilt);
    assert_eq!(first.positional().len(), 1);
    assert_eq!(first.find_option("--level"), first.find_option("-l"));
}

#[test]
fn test_parallel_parses_share_schema() {
    let schemas: Vec<_> = (0..32)
        .into_par_iter()
        .map(|i| {
            let count = i.to_string();
            let (outcome, _) = run(&["-g", count.as_str(), "out"]);
            assert_eq!(outcome.value.count, i);
            schema_for::<Tool>().unwrap()
        })
        .collect();
    assert!(schemas.iter().all(|s| Arc::ptr_eq(s, &schemas[0])));
}

#[derive(Debug, Default)]
struct Clashing;

impl Record for Clashing {
    fn assign(&mut self, field: &str, _value: Value) -> Result<(), ValueError> {
        Err(ValueError::UnknownField(field.to_string()))
    }
}

impl Arguments for Clashing {
    fn schema_spec() -> SchemaSpec {
        SchemaSpec::new()
            .with_field(FieldSpec::flag("dry").with_option("--dry-run"))
    }
}

#[test]
fn test_invalid_declaration_is_fatal() {
    let mut sink = CollectingSink::default();
    let err = parse_with::<Clashing, _, _>(["--dry-run"], &ParserConfig::default(), &mut sink)
        .unwrap_err();
    assert!(matches!(err, SchemaError::InvalidOption { .. }));
    assert!(sink.diagnostics.is_empty());
}

#[test]
fn test_dynamic_record() {
    let schema = Schema::build(
        SchemaSpec::new()
            .with_field(FieldSpec::choice_of("mode", EnumSpec::from_names(["fast", "safe"])).with_option("-m"))
            .with_field(FieldSpec::array("tags", ValueKind::String).with_option("-t"))
            .with_field(FieldSpec::float("ratio").with_option("-r")),
    )
    .unwrap();

    let mut sink = CollectingSink::default();
    let outcome: ParseOutcome<DynamicRecord> = parse_into(
        &schema,
        ["-m", "safe", "-t", "a", "b", "-r", "0.5"],
        &ParserConfig::default(),
        &mut sink,
    );
    assert!(outcome.success);
    let record = outcome.value;
    assert_eq!(record.len(), 3);
    assert_eq!(record.get("ratio"), Some(&Value::Float(0.5)));
    assert!(matches!(record.get("mode"), Some(Value::Enum(member)) if member.name == "safe"));
    assert_eq!(
        record.get("tags"),
        Some(&Value::Array(vec![Value::Str("a".into()), Value::Str("b".into())]))
    );
}

#[test]
fn test_unbounded_array_reads_to_next_option() {
    let schema = Schema::build(
        SchemaSpec::new()
            .with_field(FieldSpec::flag("insecure").with_option("-k"))
            .with_field(FieldSpec::array("headers", ValueKind::String).with_option("-H").non_empty())
            .with_field(FieldSpec::string("url").with_display_name("URL")),
    )
    .unwrap();
    let config = ParserConfig::default();

    let mut sink = CollectingSink::default();
    let outcome: ParseOutcome<DynamicRecord> = parse_into(
        &schema,
        ["-k", "https://example.com", "-H", "Accept: */*", "X-Trace: 1"],
        &config,
        &mut sink,
    );
    assert!(outcome.success, "{:?}", sink.diagnostics);
    assert_eq!(outcome.value.get("url"), Some(&Value::Str("https://example.com".into())));
    assert_eq!(
        outcome.value.get("headers"),
        Some(&Value::Array(vec![
            Value::Str("Accept: */*".into()),
            Value::Str("X-Trace: 1".into())
        ]))
    );

    // A trailing positional after the array becomes one more element.
    let mut sink = CollectingSink::default();
    let outcome: ParseOutcome<DynamicRecord> = parse_into(
        &schema,
        ["-H", "Accept: */*", "https://example.com"],
        &config,
        &mut sink,
    );
    assert_eq!(outcome.errors, ParseErrors::MISSING_VALUE);
    assert!(outcome.value.get("url").is_none());
    assert_eq!(sink.diagnostics, vec!["Missing mandatory argument: URL"]);
}
