//! End-to-end parsing behaviour.

use argdecl_core::{Arg, Interrupt, ParseError, Specification, distance, outcome};

fn hello() -> Specification {
    Specification::builder()
        .arg("name", Arg::string(&["<name>"]).with_help("Who to greet"))
        .arg(
            "times",
            Arg::int(&["-t", "--times"])
                .with_default(1i64)
                .with_help("How many times to greet"),
        )
        .arg("help", Arg::help_flag(&["-h", "--help"]).with_help("Show this help"))
        .build()
        .unwrap()
}

fn git() -> Specification {
    let push = Specification::builder()
        .arg("remote", Arg::string(&["<remote>"]).with_help("Where to push"))
        .arg("force", Arg::counter(&["-f", "--force"]))
        .arg("help", Arg::help_flag(&["-h", "--help"]))
        .build()
        .unwrap();
    Specification::builder()
        .arg("verbose", Arg::counter(&["-v"]).multi())
        .arg("push", Arg::command(&["push"], push).with_help("Upload changes"))
        .arg("help", Arg::help_flag(&["-h", "--help"]))
        .build()
        .unwrap()
}

#[test]
fn test_hello_values() {
    let mut spec = hello();
    spec.parse(&["-t", "2", "World"], "hello").unwrap();
    assert_eq!(spec.get("name").unwrap().value::<String>().unwrap(), "World");
    assert_eq!(spec.get("times").unwrap().value::<i64>(), Some(&2));
}

#[test]
fn test_hello_default_applies() {
    let mut spec = hello();
    spec.parse(&["World"], "hello").unwrap();
    assert_eq!(spec.get("times").unwrap().value::<i64>(), Some(&1));
    assert!(!spec.get("times").unwrap().seen());
}

#[test]
fn test_hello_help_message() {
    let err = hello().parse(&["-h"], "hello").unwrap_err();
    assert!(err.is_message());
    let text = err.text();
    assert!(text.starts_with("Usage:\n  hello <name>"));
    assert!(
        text.lines()
            .any(|l| l == "  -t, --times=<times>  How many times to greet [default: 1]")
    );
}

#[test]
fn test_hello_bad_value() {
    let err = hello().parse(&["--times", "lots", "World"], "hello").unwrap_err();
    assert_eq!(
        err.text(),
        "Invalid value for --times: expected int, got 'lots'"
    );
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn test_command_missing_positional() {
    let err = git().parse(&["push"], "git").unwrap_err();
    assert_eq!(
        err,
        Interrupt::Error(ParseError::MissingPositional("<remote>".into()))
    );
    assert!(err.text().contains("<remote>"));
}

#[test]
fn test_command_owns_remaining_tokens() {
    let mut spec = git();
    spec.parse(&["-v", "push", "origin", "-f"], "git").unwrap();
    assert_eq!(spec.get("verbose").unwrap().count(), 1);
    let push = spec.command("push").unwrap();
    assert_eq!(push.get("remote").unwrap().raw_values(), vec!["origin"]);
    assert!(push.get("force").unwrap().seen());

    // After `push`, `-v` belongs to the nested specification.
    let err = git().parse(&["push", "origin", "-v"], "git").unwrap_err();
    assert_eq!(err.text(), "Unrecognised option '-v'");
}

#[test]
fn test_help_inside_command_renders_command_help() {
    let err = git().parse(&["push", "-h"], "git").unwrap_err();
    assert!(err.is_message());
    let text = err.text();
    assert!(text.starts_with("Usage:\n  git push <remote>"));
    assert!(text.contains("Where to push"));
    assert!(!text.contains("Upload changes"));
}

#[test]
fn test_misspelled_command() {
    let mut spec = Specification::builder()
        .arg("ship", Arg::command(&["ship"], Specification::default()))
        .arg("mine", Arg::command(&["mine"], Specification::default()))
        .build()
        .unwrap();
    let err = spec.parse(&["shp"], "game").unwrap_err();
    assert!(err.text().contains("did you mean 'ship'?"));
}

#[test]
fn test_count_symmetry() {
    let template = Specification::builder()
        .arg("x", Arg::counter(&["--[no]x"]))
        .build()
        .unwrap();

    let mut up = template.clone();
    up.parse(&["--x"], "t").unwrap();
    let mut down = template.clone();
    down.parse(&["--nox"], "t").unwrap();
    assert_eq!(up.get("x").unwrap().count(), 1);
    assert_eq!(down.get("x").unwrap().count(), -1);
    assert!(up.get("x").unwrap().seen());
    assert!(down.get("x").unwrap().seen());

    let mut both = template.clone();
    both.parse(&["--x", "--nox"], "t").unwrap();
    assert_eq!(both.get("x").unwrap().count(), 0);
    assert!(!both.get("x").unwrap().seen());
}

#[test]
fn test_paired_short_and_slash_forms() {
    let mut spec = Specification::builder()
        .arg("answer", Arg::counter(&["-y/-n"]))
        .arg("color", Arg::counter(&["--color/--plain"]))
        .build()
        .unwrap();
    spec.parse(&["-n", "--plain"], "t").unwrap();
    assert_eq!(spec.get("answer").unwrap().count(), -1);
    assert_eq!(spec.get("color").unwrap().count(), -1);
}

#[test]
fn test_short_coalescing() {
    let build = || {
        Specification::builder()
            .arg("a", Arg::counter(&["-a"]))
            .arg("b", Arg::counter(&["-b"]))
            .arg("c", Arg::string(&["-c"]).with_help_var("c"))
            .build()
            .unwrap()
    };

    let mut spec = build();
    spec.parse(&["-abcVAL"], "t").unwrap();
    assert!(spec.get("a").unwrap().seen());
    assert!(spec.get("b").unwrap().seen());
    assert_eq!(spec.get("c").unwrap().value::<String>().unwrap(), "VAL");

    let mut spec = build();
    assert!(matches!(
        spec.parse(&["-abc", "val"], "t"),
        Err(Interrupt::Error(_))
    ));
}

#[test]
fn test_alternatives_exclusivity() {
    let template = Specification::builder()
        .alternatives(
            "answer",
            vec![("yes", Arg::counter(&["-y"])), ("no", Arg::counter(&["-n"]))],
        )
        .build()
        .unwrap();

    let err = template.clone().parse(&["-y", "-n"], "t").unwrap_err();
    assert_eq!(
        err,
        Interrupt::Error(ParseError::AlternativeConflict {
            first: "-y".into(),
            second: "-n".into()
        })
    );

    let mut spec = template.clone();
    spec.parse(&["-y"], "t").unwrap();
    assert_eq!(spec.claimed("answer"), Some("yes"));
    assert!(spec.get("yes").unwrap().seen());
}

#[test]
fn test_reparse_accumulates_until_reset() {
    let mut spec = Specification::builder()
        .arg("quiet", Arg::counter(&["-q"]))
        .build()
        .unwrap();
    spec.parse(&["-q"], "t").unwrap();
    assert_eq!(
        spec.parse(&["-q"], "t"),
        Err(ParseError::Duplicate("-q".into()).into())
    );

    spec.reset();
    spec.parse(&["-q"], "t").unwrap();
    assert_eq!(spec.get("quiet").unwrap().count(), 1);
}

#[test]
fn test_choices_are_enforced() {
    let mut spec = Specification::builder()
        .arg("format", Arg::string(&["--format"]).with_choices(&["json", "yaml"]))
        .build()
        .unwrap();
    let err = spec.clone().parse(&["--format=toml"], "t").unwrap_err();
    assert_eq!(
        err.text(),
        "Expected value to be one of json, yaml for --format, got 'toml'"
    );
    spec.parse(&["--format:yaml"], "t").unwrap();
    assert_eq!(spec.get("format").unwrap().value::<String>().unwrap(), "yaml");
}

#[test]
fn test_custom_value_type() {
    let mut spec = Specification::builder()
        .arg(
            "port",
            Arg::value_with(&["-p", "--port"], "port", |raw: &str| {
                raw.parse::<u16>().map_err(|e| e.to_string())
            }),
        )
        .build()
        .unwrap();
    assert!(spec.clone().parse(&["-p", "99999"], "srv").is_err());
    spec.parse(&["--port", "8080"], "srv").unwrap();
    assert_eq!(spec.get("port").unwrap().value::<u16>(), Some(&8080));
}

#[test]
fn test_round_trip_from_usage() {
    let template = Specification::builder()
        .arg("src", Arg::string(&["<src>"]))
        .arg("dst", Arg::string(&["<dst>"]))
        .build()
        .unwrap();
    let usage = template.render_usage("cp", 0);
    let line = usage.lines().nth(1).unwrap().trim();

    let tokens: Vec<String> = line
        .split_whitespace()
        .skip(1)
        .map(|word| word.trim_matches(['<', '>']).to_uppercase())
        .collect();
    let mut spec = template.clone();
    spec.parse(&tokens, "cp").unwrap();
    assert_eq!(spec.get("src").unwrap().value::<String>().unwrap(), "SRC");
    assert_eq!(spec.get("dst").unwrap().value::<String>().unwrap(), "DST");
}

#[test]
fn test_parse_str_and_outcome() {
    let mut spec = hello();
    assert_eq!(
        outcome(spec.parse_str("-t 3 'Big World'", "hello")),
        (true, String::new())
    );
    assert_eq!(spec.get("name").unwrap().value::<String>().unwrap(), "Big World");

    let (ok, text) = outcome(hello().parse_str("'unterminated", "hello"));
    assert!(!ok);
    assert_eq!(text, "Unterminated quote in ''unterminated'");
}

#[test]
fn test_edit_distance_examples() {
    assert_eq!(distance::chars("cat", "cats"), 1);
    assert_eq!(distance::chars("cat", "bat"), 1);
    assert_eq!(distance::chars("crocodile", "alligator"), 9);
    assert_eq!(distance::chars("updaet", "update"), 1);
}
