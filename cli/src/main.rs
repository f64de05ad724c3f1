use std::path::{Path, PathBuf};

use argdecl_core::completion::{directives, fish_script};
use argdecl_core::{HelpStyle, Interrupt, Specification, split_command_line};
use argdecl_document::{SpecDocument, load};
use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt};

mod output;

use output::{OutputFormat, format_report};

#[derive(Debug, Parser)]
#[command(name = "argdecl", disable_help_subcommand = true)]
#[command(version, about = "Parse command lines against declarative spec documents")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse a command line and print the resulting argument state.
    Parse(ParseArgs),
    /// Render help text for a spec document.
    Help(HelpArgs),
    /// Generate shell completions for a spec document.
    Complete(CompleteArgs),
    /// Check that spec documents load and build.
    Check(CheckArgs),
}

#[derive(Debug, Args)]
struct SpecArgs {
    /// Spec document (YAML, or JSON with a .json extension).
    #[arg(long)]
    spec: PathBuf,
    /// Command path shown in usage and help (default: the document name).
    #[arg(long)]
    label: Option<String>,
}

#[derive(Debug, Args)]
struct ParseArgs {
    #[command(flatten)]
    spec: SpecArgs,
    /// Output format for the parse report.
    #[arg(long, default_value = "json")]
    format: OutputFormat,
    /// Parse a single shell-like string instead of TOKENS.
    #[arg(long, conflicts_with = "tokens")]
    line: Option<String>,
    /// Tokens to parse; put them after `--`.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    tokens: Vec<String>,
}

#[derive(Debug, Args)]
struct HelpArgs {
    #[command(flatten)]
    spec: SpecArgs,
    /// Reveal arguments up to this help level.
    #[arg(long, default_value_t = 0)]
    level: u8,
    /// Render long help as paragraphs under each entry.
    #[arg(long)]
    paragraphs: bool,
    /// Wrap width.
    #[arg(long, default_value_t = 80)]
    columns: usize,
    /// Print only the usage block.
    #[arg(long)]
    usage: bool,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CompletionFormat {
    Fish,
    Json,
}

#[derive(Debug, Args)]
struct CompleteArgs {
    #[command(flatten)]
    spec: SpecArgs,
    /// Completion output format.
    #[arg(long, default_value = "fish")]
    format: CompletionFormat,
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// Spec documents to check.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Parse(args) => run_parse(args),
        Command::Help(args) => run_help(args),
        Command::Complete(args) => run_complete(args),
        Command::Check(args) => run_check(args),
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
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

/// Loads a document and builds its specification.
fn load_spec(path: &Path) -> Result<(SpecDocument, Specification), String> {
    let doc = load(path).map_err(|e| format!("{}: {e}", path.display()))?;
    let spec = doc
        .to_specification()
        .map_err(|e| format!("{}: {e}", path.display()))?;
    Ok((doc, spec))
}

fn label(args: &SpecArgs, doc: &SpecDocument) -> String {
    args.label.clone().unwrap_or_else(|| doc.name.clone())
}

fn run_parse(args: ParseArgs) -> Result<(), String> {
    let (doc, mut spec) = load_spec(&args.spec.spec)?;
    let label = label(&args.spec, &doc);
    let tokens = match &args.line {
        Some(line) => split_command_line(line).map_err(|e| e.to_string())?,
        None => args.tokens.clone(),
    };
    debug!(label = %label, tokens = tokens.len(), "Parsing");

    match spec.parse(&tokens, &label) {
        Ok(()) => {
            let text = format_report(&spec.report(), args.format)?;
            print!("{text}");
            if !text.ends_with('\n') {
                println!();
            }
            Ok(())
        }
        Err(Interrupt::Message(text)) => {
            println!("{text}");
            Ok(())
        }
        Err(Interrupt::Error(err)) => Err(format!("{err}\n\n{}", innermost_usage(&spec, &label))),
    }
}

/// Usage of the deepest command entered before the parse stopped.
fn innermost_usage(spec: &Specification, label: &str) -> String {
    let mut scope = spec;
    let mut path = label.to_string();
    while let Some(name) = scope.entered_command() {
        let (Some(arg), Some(nested)) = (scope.get(name), scope.command(name)) else {
            break;
        };
        if let Some(word) = arg.variants().first() {
            path = format!("{path} {word}");
        }
        scope = nested;
    }
    scope.render_usage(&path, 0)
}

fn run_help(args: HelpArgs) -> Result<(), String> {
    let (doc, spec) = load_spec(&args.spec.spec)?;
    let label = label(&args.spec, &doc);
    if args.usage {
        println!("{}", spec.render_usage(&label, args.level));
        return Ok(());
    }
    let style = HelpStyle {
        columns: args.columns,
        paragraphs: args.paragraphs,
    };
    println!("{}", spec.render_help(&label, args.level, &style));
    Ok(())
}

fn run_complete(args: CompleteArgs) -> Result<(), String> {
    let (doc, spec) = load_spec(&args.spec.spec)?;
    let label = label(&args.spec, &doc);
    match args.format {
        CompletionFormat::Fish => print!("{}", fish_script(&spec, &label)),
        CompletionFormat::Json => {
            let text = serde_json::to_string_pretty(&directives(&spec))
                .map_err(|e| format!("JSON serialization failed: {e}"))?;
            println!("{text}");
        }
    }
    Ok(())
}

fn run_check(args: CheckArgs) -> Result<(), String> {
    let mut failures = Vec::new();
    for path in &args.inputs {
        match load_spec(path) {
            Ok((doc, spec)) => {
                let count = spec.args().count();
                println!("ok: {} ({}, {count} argument(s))", path.display(), doc.name);
            }
            Err(err) => failures.push(err),
        }
    }
    if failures.is_empty() {
        println!("Checked {} spec document(s).", args.inputs.len());
        return Ok(());
    }
    for failure in &failures {
        eprintln!("  {failure}");
    }
    Err(format!(
        "{} of {} spec document(s) failed",
        failures.len(),
        args.inputs.len()
    ))
}
