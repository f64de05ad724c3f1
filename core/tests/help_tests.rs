//! Help rendering over whole specifications.

use argdecl_core::{Arg, HelpStyle, Specification};

fn build() -> Specification {
    let remote = Specification::builder()
        .arg("name", Arg::string(&["<name>"]))
        .arg("url", Arg::string(&["<url>"]))
        .build()
        .unwrap();
    Specification::builder()
        .prolog("Tracks remote repositories.")
        .arg("add", Arg::command(&["add"], remote).with_help("Add a remote"))
        .arg(
            "jobs",
            Arg::int(&["-j", "--jobs"])
                .with_default(4i64)
                .with_help("Parallel jobs")
                .with_group("Performance"),
        )
        .arg("trace", Arg::counter(&["--trace"]).with_help("Trace internals").with_help_level(2))
        .arg("version", Arg::message(&["--version"], "remote 0.3.0").with_help("Print version"))
        .arg("help", Arg::help_flag(&["-h", "--help"]).with_help("Show this help"))
        .epilog("Report bugs upstream.")
        .build()
        .unwrap()
}

#[test]
fn test_full_layout() {
    let help = build().render_help("remote", 0, &HelpStyle::default());
    let expected = "\
Tracks remote repositories.

Usage:
  remote add <name> <url>
  remote --version
  remote -h

Commands:
  add                Add a remote

Performance:
  -j, --jobs=<jobs>  Parallel jobs [default: 4]

Options:
  --version          Print version
  -h, --help         Show this help

Report bugs upstream.";
    assert_eq!(help, expected);
}

#[test]
fn test_show_level_reveals_hidden_entries() {
    let spec = build();
    let hidden = spec.render_help("remote", 0, &HelpStyle::default());
    let shown = spec.render_help("remote", 2, &HelpStyle::default());
    assert!(!hidden.contains("--trace"));
    assert!(shown.contains("  --trace            Trace internals"));
}

#[test]
fn test_build_is_idempotent_for_help() {
    let style = HelpStyle::default();
    assert_eq!(
        build().render_help("remote", 0, &style),
        build().render_help("remote", 0, &style)
    );
}

#[test]
fn test_help_flag_uses_its_show_level() {
    let mut spec = Specification::builder()
        .arg("debug", Arg::counter(&["--debug"]).with_help_level(1))
        .arg("help", Arg::help_flag(&["-h"]))
        .arg("help_all", Arg::help_flag(&["-H"]).shows_level(1))
        .build()
        .unwrap();
    let short = spec.clone().parse(&["-h"], "t").unwrap_err().text();
    let long = spec.parse(&["-H"], "t").unwrap_err().text();
    assert!(!short.contains("--debug"));
    assert!(long.contains("--debug"));
}

#[test]
fn test_narrow_columns_wrap_epilog() {
    let spec = Specification::builder()
        .epilog("one two three four five six seven eight nine ten eleven twelve")
        .build()
        .unwrap();
    let style = HelpStyle {
        columns: 30,
        ..HelpStyle::default()
    };
    let help = spec.render_help("t", 0, &style);
    assert!(help.lines().all(|l| l.chars().count() <= 30));
    assert!(help.ends_with("eleven\ntwelve"));
}
