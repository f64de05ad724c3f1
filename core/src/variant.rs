//! Lexical shapes of argument variants and command line tokens.
//!
//! A variant is one surface spelling of an argument. Its shape decides the
//! argument's kind:
//!
//! | Shape | Example | Kind |
//! |-------|---------|------|
//! | short option | `-v` | option |
//! | long option | `--verbose` | option |
//! | paired long (`no` prefix) | `--[no]color`, `--[no-]color` | option (count only) |
//! | paired long (slash) | `--yes/--no` | option (count only) |
//! | paired short | `-y/-n` | option (count only) |
//! | positional | `<file>` | positional |
//! | command | `push` | command |

use std::sync::LazyLock;

use regex::Regex;

/// Kind of an argument, decided by the shape of its first variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    Positional,
    Option,
    Command,
}

impl ArgKind {
    /// Classifies by the leading character of a variant.
    pub fn of(variant: &str) -> Self {
        if variant.starts_with('-') {
            Self::Option
        } else if variant.starts_with('<') {
            Self::Positional
        } else {
            Self::Command
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Positional => "positional",
            Self::Option => "option",
            Self::Command => "command",
        }
    }
}

/// A recognised variant shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariantShape {
    /// `-x`; holds the full token.
    Short(String),
    /// `--word`; holds the full token.
    Long(String),
    /// Paired up/down tokens, e.g. `--color` and `--no-color`.
    Paired { up: String, down: String },
    /// `<word>`; holds the inner name.
    Positional(String),
    /// A bare command word.
    Command(String),
}

impl VariantShape {
    /// The descriptive word inside the variant, used for `<var>` display.
    pub fn fragment(&self) -> &str {
        match self {
            Self::Short(token) | Self::Long(token) => token.trim_start_matches('-'),
            Self::Paired { up, .. } => up.trim_start_matches('-'),
            Self::Positional(name) | Self::Command(name) => name,
        }
    }

    /// Whether the shape only fits count arguments.
    pub fn is_paired(&self) -> bool {
        matches!(self, Self::Paired { .. })
    }

    pub fn kind(&self) -> ArgKind {
        match self {
            Self::Short(_) | Self::Long(_) | Self::Paired { .. } => ArgKind::Option,
            Self::Positional(_) => ArgKind::Positional,
            Self::Command(_) => ArgKind::Command,
        }
    }
}

/// Regex patterns for variants and tokens.
static PATTERNS: LazyLock<VariantPatterns> = LazyLock::new(VariantPatterns::new);

struct VariantPatterns {
    short: Regex,
    long: Regex,
    paired_no: Regex,
    paired_long: Regex,
    paired_short: Regex,
    positional: Regex,
    command: Regex,

    // Token shapes seen while parsing
    attached: Regex,
    cluster: Regex,
}

impl VariantPatterns {
    fn new() -> Self {
        Self {
            // -v, -4, -?
            short: Regex::new(r"^-[A-Za-z0-9?@]$").expect("static regex must compile"),
            // --verbose, --dry-run, --log.level
            long: Regex::new(r"^--[A-Za-z0-9][-A-Za-z0-9_.]*$").expect("static regex must compile"),
            // --[no]color, --[no-]color
            paired_no: Regex::new(r"^--\[(no-?)\]([A-Za-z0-9][-A-Za-z0-9_.]*)$")
                .expect("static regex must compile"),
            // --yes/--no
            paired_long: Regex::new(
                r"^(--[A-Za-z0-9][-A-Za-z0-9_.]*)/(--[A-Za-z0-9][-A-Za-z0-9_.]*)$",
            )
            .expect("static regex must compile"),
            // -y/-n
            paired_short: Regex::new(r"^(-[A-Za-z0-9?@])/(-[A-Za-z0-9?@])$")
                .expect("static regex must compile"),
            // <file>, <output-dir>
            positional: Regex::new(r"^<([A-Za-z0-9_][-A-Za-z0-9_.]*)>$")
                .expect("static regex must compile"),
            // push, remote-add
            command: Regex::new(r"^[A-Za-z0-9_][-A-Za-z0-9_.]*$").expect("static regex must compile"),

            // --name=value, --name:value, -n=value, -n:value
            attached: Regex::new(r"(?s)^(--[A-Za-z0-9][-A-Za-z0-9_.]*|-[A-Za-z0-9?@])[=:](.*)$")
                .expect("static regex must compile"),
            // -abc, -ovalue
            cluster: Regex::new(r"(?s)^-([A-Za-z0-9?@].+)$").expect("static regex must compile"),
        }
    }
}

/// Classifies a declared variant, or `None` when it fits no known shape.
///
/// # Examples
///
/// ```
/// use argdecl_core::{VariantShape, classify_variant};
///
/// assert_eq!(classify_variant("-v"), Some(VariantShape::Short("-v".into())));
/// assert_eq!(
///     classify_variant("--[no-]color"),
///     Some(VariantShape::Paired { up: "--color".into(), down: "--no-color".into() }),
/// );
/// assert_eq!(classify_variant("<file>"), Some(VariantShape::Positional("file".into())));
/// assert_eq!(classify_variant("push"), Some(VariantShape::Command("push".into())));
/// assert_eq!(classify_variant("--bad name"), None);
/// ```
pub fn classify_variant(variant: &str) -> Option<VariantShape> {
    let p = &*PATTERNS;

    if p.short.is_match(variant) {
        return Some(VariantShape::Short(variant.to_string()));
    }
    if p.long.is_match(variant) {
        return Some(VariantShape::Long(variant.to_string()));
    }
    if let Some(caps) = p.paired_no.captures(variant) {
        let word = &caps[2];
        return Some(VariantShape::Paired {
            up: format!("--{word}"),
            down: format!("--{}{word}", &caps[1]),
        });
    }
    if let Some(caps) = p
        .paired_long
        .captures(variant)
        .or_else(|| p.paired_short.captures(variant))
    {
        return Some(VariantShape::Paired {
            up: caps[1].to_string(),
            down: caps[2].to_string(),
        });
    }
    if let Some(caps) = p.positional.captures(variant) {
        return Some(VariantShape::Positional(caps[1].to_string()));
    }
    if p.command.is_match(variant) {
        return Some(VariantShape::Command(variant.to_string()));
    }
    None
}

/// Whether a token is a well-formed single short or long option.
pub(crate) fn is_option_token(token: &str) -> bool {
    PATTERNS.short.is_match(token) || PATTERNS.long.is_match(token)
}

/// Splits `--name=value` style tokens into option and value.
pub(crate) fn split_attached(token: &str) -> Option<(&str, &str)> {
    let caps = PATTERNS.attached.captures(token)?;
    let option = caps.get(1)?.as_str();
    let value = caps.get(2)?.as_str();
    Some((option, value))
}

/// Returns the letters of a short option cluster such as `-abc`.
pub(crate) fn cluster_letters(token: &str) -> Option<&str> {
    let caps = PATTERNS.cluster.captures(token)?;
    caps.get(1).map(|m| m.as_str())
}
