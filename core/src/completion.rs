//! Shell completion directives.
//!
//! [`directives`] walks a specification and its nested commands and yields
//! one [`CompletionDirective`] per option per command scope. Renderers turn
//! them into a shell's syntax; [`fish_script`] is the built-in one.

use serde::Serialize;

use crate::arg::{Action, Arg};
use crate::spec::Specification;
use crate::value::ValueHint;
use crate::variant::{VariantShape, classify_variant};

/// What an option expects after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "choices")]
pub enum Arity {
    /// Takes no value.
    Flag,
    /// Free text.
    Text,
    /// One of a fixed list.
    Choices(Vec<String>),
    /// A filesystem path.
    Path,
}

/// One option as seen by a completion engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionDirective {
    /// Command words leading to the option's scope; empty at the top level.
    pub scope: Vec<String>,
    /// Short option letters, without the dash.
    pub shorts: Vec<String>,
    /// Long option names, without the dashes.
    pub longs: Vec<String>,
    pub description: String,
    pub arity: Arity,
}

/// Collects completion directives for every reachable command scope.
///
/// ```
/// use argdecl_core::{Arg, Specification};
/// use argdecl_core::completion::{Arity, directives};
///
/// let spec = Specification::builder()
///     .arg("format", Arg::string(&["-f", "--format"]).with_choices(&["json", "yaml"]))
///     .build()
///     .unwrap();
///
/// let found = directives(&spec);
/// assert_eq!(found[0].shorts, vec!["f"]);
/// assert_eq!(found[0].longs, vec!["format"]);
/// assert_eq!(found[0].arity, Arity::Choices(vec!["json".into(), "yaml".into()]));
/// ```
pub fn directives(spec: &Specification) -> Vec<CompletionDirective> {
    let mut out = Vec::new();
    collect(spec, &[], &mut out);
    out
}

fn collect(spec: &Specification, scope: &[String], out: &mut Vec<CompletionDirective>) {
    for &i in &spec.options {
        out.push(directive(&spec.entry(i).arg, scope));
    }
    for &i in &spec.commands {
        let arg = &spec.entry(i).arg;
        if let Some(nested) = arg.subcommand() {
            let mut inner = scope.to_vec();
            inner.push(arg.variants[0].clone());
            collect(nested, &inner, out);
        }
    }
}

fn directive(arg: &Arg, scope: &[String]) -> CompletionDirective {
    let mut shorts = Vec::new();
    let mut longs = Vec::new();
    let mut push = |token: &str| {
        if let Some(long) = token.strip_prefix("--") {
            longs.push(long.to_string());
        } else if let Some(short) = token.strip_prefix('-') {
            shorts.push(short.to_string());
        }
    };
    for variant in &arg.variants {
        match classify_variant(variant) {
            Some(VariantShape::Paired { up, down }) => {
                push(&up);
                push(&down);
            }
            Some(VariantShape::Short(token) | VariantShape::Long(token)) => push(&token),
            _ => {}
        }
    }

    let arity = match &arg.action {
        Action::Value(slot) if !slot.choices.is_empty() => Arity::Choices(slot.choices.clone()),
        Action::Value(slot) if slot.hint == ValueHint::Path => Arity::Path,
        Action::Value(_) => Arity::Text,
        _ => Arity::Flag,
    };

    CompletionDirective {
        scope: scope.to_vec(),
        shorts,
        longs,
        description: arg.help.clone(),
        arity,
    }
}

/// Renders a fish completion script.
///
/// The first word of `command_path` names the program; any further words
/// are the command scope `spec` belongs to.
///
/// ```
/// use argdecl_core::{Arg, Specification};
/// use argdecl_core::completion::fish_script;
///
/// let spec = Specification::builder()
///     .arg("verbose", Arg::counter(&["-v", "--verbose"]).with_help("More output"))
///     .build()
///     .unwrap();
/// assert_eq!(
///     fish_script(&spec, "tool"),
///     "complete -c tool -s v -l verbose -d 'More output'\n",
/// );
/// ```
pub fn fish_script(spec: &Specification, command_path: &str) -> String {
    let mut words = command_path.split_whitespace();
    let program = words.next().unwrap_or("command");
    let base: Vec<String> = words.map(str::to_string).collect();

    let mut lines = Vec::new();
    fish_commands(spec, program, &base, &mut lines);
    for d in directives(spec) {
        let mut scope = base.clone();
        scope.extend(d.scope);

        let mut line = format!("complete -c {program}");
        if let Some(last) = scope.last() {
            line.push_str(&format!(" -n '__fish_seen_subcommand_from {last}'"));
        }
        for short in &d.shorts {
            line.push_str(&format!(" -s {short}"));
        }
        for long in &d.longs {
            line.push_str(&format!(" -l {long}"));
        }
        if !d.description.is_empty() {
            line.push_str(&format!(" -d '{}'", fish_quote(&d.description)));
        }
        match &d.arity {
            Arity::Flag => {}
            Arity::Text => line.push_str(" -x"),
            Arity::Path => line.push_str(" -r -F"),
            Arity::Choices(choices) => {
                line.push_str(&format!(" -x -a '{}'", fish_quote(&choices.join(" "))));
            }
        }
        lines.push(line);
    }

    let mut script = lines.join("\n");
    script.push('\n');
    script
}

/// Command word completions, one line per command per scope.
fn fish_commands(spec: &Specification, program: &str, scope: &[String], lines: &mut Vec<String>) {
    let condition = match scope.last() {
        Some(last) => format!("__fish_seen_subcommand_from {last}"),
        None => "__fish_use_subcommand".to_string(),
    };
    for &i in &spec.commands {
        let arg = &spec.entry(i).arg;
        let mut line = format!("complete -c {program} -n '{condition}' -f -a {}", arg.variants[0]);
        if !arg.help.is_empty() {
            line.push_str(&format!(" -d '{}'", fish_quote(&arg.help)));
        }
        lines.push(line);

        if let Some(nested) = arg.subcommand() {
            let mut inner = scope.to_vec();
            inner.push(arg.variants[0].clone());
            fish_commands(nested, program, &inner, lines);
        }
    }
}

fn fish_quote(text: &str) -> String {
    text.replace('\\', "\\\\").replace('\'', "\\'")
}
