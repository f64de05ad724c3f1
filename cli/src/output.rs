//! Output formatting for parse reports.

use argdecl_core::{ArgReport, ParseReport};

/// Supported output formats.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
    Markdown,
    Table,
}

/// Formats a parse report in the requested output format.
pub fn format_report(report: &ParseReport, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(report)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(report).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Markdown => Ok(report_to_markdown(report)),
        OutputFormat::Table => Ok(report_to_table(report)),
    }
}

/// One flattened row; nested command arguments are named `command.arg`.
struct Row {
    name: String,
    count: i64,
    seen: bool,
    values: String,
}

fn rows(report: &ParseReport) -> Vec<Row> {
    let mut out = Vec::new();
    collect_rows(&report.args, "", &mut out);
    out
}

fn collect_rows(args: &[ArgReport], prefix: &str, out: &mut Vec<Row>) {
    for arg in args {
        let name = format!("{prefix}{}", arg.name);
        out.push(Row {
            name: name.clone(),
            count: arg.count,
            seen: arg.seen,
            values: arg.values.join(", "),
        });
        if let Some(ref nested) = arg.command {
            collect_rows(&nested.args, &format!("{name}."), out);
        }
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

fn report_to_markdown(report: &ParseReport) -> String {
    let mut out = String::new();

    if let Some(ref command) = report.command {
        out.push_str(&format!("**Command:** `{command}`\n\n"));
    }

    out.push_str("| Argument | Count | Seen | Values |\n");
    out.push_str("|----------|-------|------|--------|\n");
    for row in rows(report) {
        out.push_str(&format!(
            "| `{}` | {} | {} | {} |\n",
            row.name,
            row.count,
            yes_no(row.seen),
            row.values
        ));
    }

    if !report.alternatives.is_empty() {
        out.push_str("\n| Alternatives | Members | Claimed |\n");
        out.push_str("|--------------|---------|---------|\n");
        for alt in &report.alternatives {
            let claimed = alt.claimed.as_deref().unwrap_or("-");
            out.push_str(&format!(
                "| `{}` | {} | {claimed} |\n",
                alt.group,
                alt.members.join(", ")
            ));
        }
    }

    out
}

fn report_to_table(report: &ParseReport) -> String {
    let rows = rows(report);
    let width = rows
        .iter()
        .map(|r| r.name.len())
        .chain(std::iter::once("ARGUMENT".len()))
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    out.push_str(&format!("{:<width$}  COUNT  SEEN  VALUES\n", "ARGUMENT"));
    for row in &rows {
        let line = format!(
            "{:<width$}  {:<5}  {:<4}  {}",
            row.name,
            row.count,
            yes_no(row.seen),
            row.values
        );
        out.push_str(line.trim_end());
        out.push('\n');
    }

    for alt in &report.alternatives {
        out.push_str(&format!(
            "alternatives {} ({}): {}\n",
            alt.group,
            alt.members.join("|"),
            alt.claimed.as_deref().unwrap_or("-")
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use argdecl_core::{Arg, Specification};

    use super::*;

    fn parsed() -> ParseReport {
        let push = Specification::builder()
            .arg("remote", Arg::string(&["<remote>"]))
            .build()
            .unwrap();
        let mut spec = Specification::builder()
            .arg("verbose", Arg::counter(&["-v"]).multi())
            .arg("push", Arg::command(&["push"], push))
            .build()
            .unwrap();
        spec.parse(&["-v", "-v", "push", "origin"], "git").unwrap();
        spec.report()
    }

    #[test]
    fn test_table_flattens_nested_commands() {
        let table = format_report(&parsed(), OutputFormat::Table).unwrap();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "ARGUMENT     COUNT  SEEN  VALUES");
        assert_eq!(lines[1], "verbose      2      yes");
        assert_eq!(lines[2], "push         1      yes");
        assert_eq!(lines[3], "push.remote  1      yes   origin");
    }

    #[test]
    fn test_alternatives_list_members() {
        let mut spec = Specification::builder()
            .alternatives(
                "answer",
                vec![("yes", Arg::counter(&["-y"])), ("no", Arg::counter(&["-n"]))],
            )
            .build()
            .unwrap();
        spec.parse(&["-n"], "ask").unwrap();
        let report = spec.report();

        let table = format_report(&report, OutputFormat::Table).unwrap();
        assert!(table.ends_with("alternatives answer (yes|no): no\n"));
        let md = format_report(&report, OutputFormat::Markdown).unwrap();
        assert!(md.contains("| `answer` | yes, no | no |"));
    }

    #[test]
    fn test_markdown_lists_command() {
        let md = format_report(&parsed(), OutputFormat::Markdown).unwrap();
        assert!(md.starts_with("**Command:** `push`"));
        assert!(md.contains("| `push.remote` | 1 | yes | origin |"));
    }

    #[test]
    fn test_json_is_structured() {
        let json = format_report(&parsed(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["args"][0]["count"], 2);
        assert_eq!(value["args"][1]["command"]["args"][0]["values"][0], "origin");
    }
}
