//! Usage and help text.
//!
//! Help is laid out as an optional prolog, the usage block, one section per
//! help group and an optional epilog, separated by blank lines:
//!
//! ```text
//! Usage:
//!   hello <name>
//!   hello -h
//!
//! Arguments:
//!   <name>               Who to greet
//!
//! Options:
//!   -t, --times=<times>  How many times to greet [default: 1]
//!   -h, --help           Show this help
//! ```

use crate::arg::{Action, Arg};
use crate::spec::Specification;
use crate::variant::ArgKind;

const INDENT: usize = 2;
const GAP: usize = 2;
const PARAGRAPH_INDENT: usize = 6;
/// Help text never gets squeezed narrower than this.
const MIN_TEXT_WIDTH: usize = 20;

/// Layout options for [`Specification::render_help`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpStyle {
    /// Total width to wrap to.
    pub columns: usize,
    /// Put long help in a paragraph under each entry instead of beside it.
    pub paragraphs: bool,
}

impl Default for HelpStyle {
    fn default() -> Self {
        Self {
            columns: 80,
            paragraphs: false,
        }
    }
}

impl Specification {
    /// Renders the full help text for this specification.
    ///
    /// Arguments whose help level exceeds `show_level` are left out.
    ///
    /// # Examples
    ///
    /// ```
    /// use argdecl_core::{Arg, HelpStyle, Specification};
    ///
    /// let spec = Specification::builder()
    ///     .arg("name", Arg::string(&["<name>"]).with_help("Who to greet"))
    ///     .arg("debug", Arg::counter(&["--debug"]).with_help_level(1))
    ///     .build()
    ///     .unwrap();
    ///
    /// let help = spec.render_help("hello", 0, &HelpStyle::default());
    /// assert!(help.starts_with("Usage:\n  hello <name>"));
    /// assert!(!help.contains("--debug"));
    /// assert!(spec.render_help("hello", 1, &HelpStyle::default()).contains("--debug"));
    /// ```
    pub fn render_help(&self, command_path: &str, show_level: u8, style: &HelpStyle) -> String {
        let mut sections = Vec::new();

        if !self.prolog.is_empty() {
            sections.push(wrap(&self.prolog, style.columns).join("\n"));
        }
        sections.push(self.render_usage(command_path, show_level));

        let width = self.label_width(show_level);
        for (heading, members) in &self.groups {
            let lines: Vec<String> = members
                .iter()
                .map(|&i| &self.entry(i).arg)
                .filter(|arg| arg.help_level <= show_level)
                .flat_map(|arg| render_entry(arg, width, style))
                .collect();
            if !lines.is_empty() {
                sections.push(format!("{heading}:\n{}", lines.join("\n")));
            }
        }

        if !self.epilog.is_empty() {
            sections.push(wrap(&self.epilog, style.columns).join("\n"));
        }
        sections.join("\n\n")
    }

    /// Renders only the `Usage:` block.
    ///
    /// One line per reachable command path, then one line per visible
    /// message, help or completion option.
    pub fn render_usage(&self, command_path: &str, show_level: u8) -> String {
        let mut lines = Vec::new();
        self.usage_lines(command_path, show_level, &mut lines);
        let body: Vec<String> = lines
            .iter()
            .map(|line| format!("{:INDENT$}{}", "", line.trim()))
            .collect();
        format!("Usage:\n{}", body.join("\n"))
    }

    fn usage_lines(&self, prefix: &str, show_level: u8, out: &mut Vec<String>) {
        let visible = |i: &&usize| self.entry(**i).arg.help_level <= show_level;

        let mut head = prefix.to_string();
        for &i in self.positionals.iter().filter(visible) {
            head.push(' ');
            head.push_str(&positional_usage(&self.entry(i).arg));
        }

        let commands: Vec<&Arg> = self
            .commands
            .iter()
            .filter(visible)
            .map(|&i| &self.entry(i).arg)
            .collect();
        if commands.is_empty() {
            out.push(head.clone());
        }
        for arg in commands {
            if let Some(nested) = arg.subcommand() {
                nested.usage_lines(&format!("{head} {}", arg.variants[0]), show_level, out);
            }
        }

        for &i in self.options.iter().filter(visible) {
            let arg = &self.entry(i).arg;
            if matches!(
                arg.action,
                Action::Message(_) | Action::Help { .. } | Action::Completion
            ) {
                out.push(format!("{prefix} {}", arg.variants[0]));
            }
        }
    }

    fn label_width(&self, show_level: u8) -> usize {
        self.entries
            .iter()
            .map(|e| &e.arg)
            .filter(|arg| arg.help_level <= show_level)
            .map(|arg| entry_label(arg).chars().count())
            .max()
            .unwrap_or(0)
    }
}

/// `<name>`, `[<name>]`, `(a|b)`, `[a|b]`, with `...` for multi.
fn positional_usage(arg: &Arg) -> String {
    let choices = arg.choices();
    let mut text = match (choices.is_empty(), arg.optional) {
        (true, false) => arg.variants[0].clone(),
        (true, true) => format!("[{}]", arg.variants[0]),
        (false, false) => format!("({})", choices.join("|")),
        (false, true) => format!("[{}]", choices.join("|")),
    };
    if arg.multi {
        text.push_str("...");
    }
    text
}

/// The left-hand column of a help entry.
fn entry_label(arg: &Arg) -> String {
    let choices = arg.choices();
    if arg.kind == Some(ArgKind::Positional) && !choices.is_empty() {
        let mut label = choices.join("|");
        if arg.multi {
            label.push_str("...");
        }
        return label;
    }

    let mut label = arg.variants.join(", ");
    if arg.kind == Some(ArgKind::Option) && arg.takes_value() {
        let var = if choices.is_empty() {
            format!("<{}>", arg.help_var.as_deref().unwrap_or("value"))
        } else {
            choices.join("|")
        };
        let long = arg.variants.last().is_some_and(|v| v.starts_with("--"));
        label.push(if long { '=' } else { ' ' });
        label.push_str(&var);
    }
    if arg.multi {
        label.push_str("...");
    }
    label
}

fn entry_text(arg: &Arg, paragraphs: bool) -> String {
    let mut text = if paragraphs && !arg.long_help.is_empty() {
        arg.long_help.clone()
    } else {
        arg.help.clone()
    };
    if let Some(default) = arg.default_display() {
        if !arg.required {
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(&format!("[default: {default}]"));
        }
    }
    text
}

fn render_entry(arg: &Arg, width: usize, style: &HelpStyle) -> Vec<String> {
    let label = entry_label(arg);
    let text = entry_text(arg, style.paragraphs);
    let mut lines = Vec::new();

    if style.paragraphs {
        lines.push(format!("{:INDENT$}{label}", ""));
        let text_width = style
            .columns
            .saturating_sub(PARAGRAPH_INDENT)
            .max(MIN_TEXT_WIDTH);
        for line in wrap(&text, text_width) {
            lines.push(format!("{:PARAGRAPH_INDENT$}{line}", ""));
        }
        return lines;
    }

    let column = INDENT + width + GAP;
    let text_width = style.columns.saturating_sub(column).max(MIN_TEXT_WIDTH);
    let mut wrapped = wrap(&text, text_width).into_iter();
    match wrapped.next() {
        Some(first) => {
            let pad = width - label.chars().count() + GAP;
            lines.push(format!("{:INDENT$}{label}{:pad$}{first}", "", ""));
        }
        None => lines.push(format!("{:INDENT$}{label}", "")),
    }
    lines.extend(wrapped.map(|line| format!("{:column$}{line}", "")));
    lines
}

/// Greedy word wrap. Explicit newlines in `text` are kept.
pub(crate) fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            if !line.is_empty() && line.chars().count() + 1 + word.chars().count() > width {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
        lines.push(line);
    }
    lines
}
