//! Plain-text help rendering over a built schema.

use argbind_core::{Descriptor, FieldKind, Schema};

/// Renders usage, option and argument tables for `schema`.
///
/// # Examples
///
/// ```
/// use argbind_core::{FieldSpec, Schema, SchemaSpec};
/// use argbind_parser::render_help;
///
/// let schema = Schema::build(
///     SchemaSpec::new()
///         .with_name("greet")
///         .with_field(FieldSpec::flag("loud").with_options(["-l", "--loud"]).with_description("Shout"))
///         .with_field(FieldSpec::string("name").with_display_name("NAME")),
/// )
/// .unwrap();
///
/// let help = render_help(&schema);
/// assert!(help.contains("Usage: greet [options] NAME"));
/// assert!(help.contains("-l, --loud"));
/// assert!(help.contains("Shout"));
/// ```
pub fn render_help(schema: &Schema) -> String {
    let info = schema.info();
    let mut out = String::new();

    let program = info.name.as_deref().unwrap_or("program");
    let positional_names: Vec<&str> = schema
        .positional()
        .iter()
        .filter_map(|&index| schema.descriptor(index))
        .map(|d| d.display_name.as_str())
        .collect();

    match &info.version {
        Some(version) => out.push_str(&format!("{program} {version}\n")),
        None => out.push_str(&format!("{program}\n")),
    }
    if let Some(description) = &info.description {
        out.push_str(&format!("{description}\n"));
    }
    out.push('\n');

    out.push_str(&format!("Usage: {program} [options]"));
    for name in &positional_names {
        out.push_str(&format!(" {name}"));
    }
    out.push('\n');

    let options: Vec<(String, &Descriptor)> = schema
        .descriptors()
        .iter()
        .filter(|d| !d.is_positional())
        .map(|d| (option_column(d), d))
        .collect();
    let arguments: Vec<(String, &Descriptor)> = schema
        .positional()
        .iter()
        .filter_map(|&index| schema.descriptor(index))
        .map(|d| (d.display_name.clone(), d))
        .collect();

    let width = options
        .iter()
        .chain(arguments.iter())
        .map(|(left, _)| left.chars().count())
        .max()
        .unwrap_or_default()
        + 4;

    if !arguments.is_empty() {
        out.push_str("\nArguments:\n");
        for (left, descriptor) in &arguments {
            push_row(&mut out, left, width, descriptor.description.as_deref(), false);
        }
    }

    out.push_str("\nOptions:\n");
    for (left, descriptor) in &options {
        push_row(
            &mut out,
            left,
            width,
            descriptor.description.as_deref(),
            descriptor.mandatory,
        );
    }
    push_row(&mut out, "-h, --help", width, Some("Print this help"), false);

    if let Some(addendum) = &info.addendum {
        out.push('\n');
        out.push_str(addendum);
        out.push('\n');
    }

    out
}

fn option_column(descriptor: &Descriptor) -> String {
    let names = descriptor.options.join(", ");
    let placeholder = descriptor.display_name.to_uppercase();
    match &descriptor.kind {
        FieldKind::Flag => names,
        FieldKind::Value(_) if descriptor.counted => names,
        FieldKind::Value(_) => format!("{names} <{placeholder}>"),
        FieldKind::Array(_) => match descriptor.length {
            Some(length) => format!("{names} <{placeholder}>{{{length}}}"),
            None => format!("{names} <{placeholder}>..."),
        },
    }
}

fn push_row(out: &mut String, left: &str, width: usize, description: Option<&str>, required: bool) {
    let padding = width.saturating_sub(left.chars().count());
    out.push_str("  ");
    out.push_str(left);
    out.push_str(&" ".repeat(padding));
    out.push_str(description.unwrap_or(""));
    if required {
        out.push_str(" (required)");
    }
    out.truncate(out.trim_end().len());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use argbind_core::{FieldSpec, SchemaSpec, ValueKind};

    use super::*;

    fn schema() -> Schema {
        Schema::build(
            SchemaSpec::new()
                .with_name("pack")
                .with_version("0.3.1")
                .with_description("Bundle files into an archive.")
                .with_addendum("Report bugs to the issue tracker.")
                .with_field(FieldSpec::counter("verbose").with_option("-v").with_description("More output"))
                .with_field(
                    FieldSpec::array("include", ValueKind::Path)
                        .with_options(["-i", "--include"])
                        .with_description("Extra files")
                        .mandatory(),
                )
                .with_field(FieldSpec::array("pair", ValueKind::Int).with_option("--pair").with_length(2))
                .with_field(FieldSpec::path("archive").with_description("Output archive")),
        )
        .unwrap()
    }

    #[test]
    fn test_render_header_and_usage() {
        let help = render_help(&schema());
        let mut lines = help.lines();
        assert_eq!(lines.next(), Some("pack 0.3.1"));
        assert_eq!(lines.next(), Some("Bundle files into an archive."));
        assert_eq!(lines.next(), Some(""));
        assert_eq!(lines.next(), Some("Usage: pack [options] archive"));
    }

    #[test]
    fn test_render_option_columns() {
        let help = render_help(&schema());
        assert!(help.contains("  -v "));
        assert!(help.contains("-i, --include <INCLUDE>..."));
        assert!(help.contains("Extra files (required)"));
        assert!(help.contains("--pair <PAIR>{2}"));
        assert!(help.contains("-h, --help"));
        assert!(help.contains("Arguments:\n  archive"));
        assert!(help.trim_end().ends_with("Report bugs to the issue tracker."));
    }

    #[test]
    fn test_render_without_metadata() {
        let schema = Schema::build(SchemaSpec::new()).unwrap();
        let help = render_help(&schema);
        assert!(help.starts_with("program\n"));
        assert!(help.contains("Usage: program [options]\n"));
        assert!(!help.contains("Arguments:"));
    }
}
