//! Error types for building and parsing argument specifications.
//!
//! There are three disjoint kinds:
//!
//! - [`SpecificationError`]: the static shape of a specification is wrong.
//!   Raised only by [`SpecBuilder::build`](crate::SpecBuilder::build), never
//!   while parsing. These are defects for the author to fix.
//! - [`ParseError`]: the user's input does not fit the specification.
//! - [`Interrupt::Message`]: parsing stopped early because the user asked
//!   for help, a version string or a completion script. Not a failure.
//!
//! Every parse call returns `Result<(), Interrupt>`, so both early exits
//! travel the same way through nested command parses.

use thiserror::Error;

/// Defects in the static shape of a specification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecificationError {
    /// An argument was declared without any variants.
    #[error("argument '{0}' has no variants")]
    NoVariants(String),
    /// A variant matches none of the recognised shapes.
    #[error("argument '{name}' has invalid variant '{variant}'")]
    InvalidVariant { name: String, variant: String },
    /// A variant does not match the kind set by the first variant.
    #[error("argument '{name}' mixes variant '{variant}' into a {kind} argument")]
    MixedVariants {
        name: String,
        variant: String,
        kind: &'static str,
    },
    /// Paired up/down forms are only meaningful for counters.
    #[error("argument '{name}' uses paired variant '{variant}' but is not a count argument")]
    PairedVariantNotCount { name: String, variant: String },
    /// A command was written as `<command>` instead of `command`.
    #[error("command '{name}' must be written as '{suggested}', not '{variant}'")]
    BracketedCommand {
        name: String,
        variant: String,
        suggested: String,
    },
    /// The same surface token was registered twice.
    #[error("variant '{0}' is registered more than once")]
    DuplicateVariant(String),
    /// Two entries share a name.
    #[error("argument name '{0}' is used more than once")]
    DuplicateName(String),
    /// An argument was declared both required and optional.
    #[error("argument '{0}' cannot be both required and optional")]
    RequiredAndOptional(String),
    /// An alternatives group is malformed.
    #[error("alternatives '{group}': {reason}")]
    InvalidAlternatives { group: String, reason: String },
    /// A default value of the wrong type was supplied.
    #[error("default for '{variant}' must be of type {expected}")]
    DefaultTypeMismatch {
        variant: String,
        expected: String,
    },
    /// A textual default could not be parsed by the argument's value type.
    #[error("default '{raw}' for '{variant}' is not a valid {expected}: {reason}")]
    InvalidDefault {
        variant: String,
        raw: String,
        expected: String,
        reason: String,
    },
    /// The argument's behaviour cannot be used with its variant shape.
    #[error("argument '{name}' cannot be a {kind} argument with {action} behaviour")]
    UnsupportedKind {
        name: String,
        kind: &'static str,
        action: &'static str,
    },
}

/// Malformed or incomplete user input.
///
/// Every variant displays as one line that names the offending token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Unrecognised option '{0}'")]
    UnrecognisedOption(String),
    #[error("Unrecognised option '{option}' in '{token}'")]
    UnrecognisedInCluster { option: String, token: String },
    #[error("Option '{0}' does not take a value")]
    UnexpectedValue(String),
    #[error("Missing value for {0}")]
    MissingValue(String),
    #[error("Invalid value for {variant}: expected {expected}, got '{raw}'")]
    InvalidValue {
        variant: String,
        expected: String,
        raw: String,
    },
    #[error("Expected value to be one of {choices} for {variant}, got '{raw}'")]
    InvalidChoice {
        variant: String,
        choices: String,
        raw: String,
    },
    #[error("{0} given more than once")]
    Duplicate(String),
    #[error("Missing required option {0}")]
    MissingRequired(String),
    #[error("Missing argument {0}")]
    MissingPositional(String),
    #[error("Unconsumed argument '{0}'")]
    Unconsumed(String),
    #[error("Unexpected argument '{0}'")]
    UnexpectedArgument(String),
    #[error("Unexpected command '{0}'")]
    UnexpectedCommand(String),
    #[error("Unexpected command '{token}', did you mean '{suggestion}'?")]
    MisspelledCommand { token: String, suggestion: String },
    #[error("{second} cannot be used together with {first}")]
    AlternativeConflict { first: String, second: String },
    #[error("Could not read a value for {variant}: {reason}")]
    Prompt { variant: String, reason: String },
    #[error("Unterminated quote in '{0}'")]
    UnterminatedQuote(String),
}

/// Why a parse stopped before completing normally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Interrupt {
    /// Informational output (help, version, completion script).
    #[error("{0}")]
    Message(String),
    /// The input was rejected.
    #[error(transparent)]
    Error(#[from] ParseError),
}

impl Interrupt {
    /// The text to show the user.
    pub fn text(&self) -> String {
        self.to_string()
    }

    /// Whether this is an informational message rather than a failure.
    pub fn is_message(&self) -> bool {
        matches!(self, Self::Message(_))
    }

    /// Process exit code a wrapper should use: 0 for messages, 1 for errors.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Message(_) => 0,
            Self::Error(_) => 1,
        }
    }
}

/// Collapses a parse result into a `(success, message)` pair.
///
/// Successful parses and informational messages both count as success.
///
/// ```
/// use argdecl_core::{Interrupt, ParseError, outcome};
///
/// assert_eq!(outcome(Ok(())), (true, String::new()));
/// assert_eq!(outcome(Err(Interrupt::Message("v1.0".into()))), (true, "v1.0".to_string()));
/// let (ok, text) = outcome(Err(ParseError::UnexpectedArgument("x".into()).into()));
/// assert!(!ok);
/// assert_eq!(text, "Unexpected argument 'x'");
/// ```
pub fn outcome(result: Result<(), Interrupt>) -> (bool, String) {
    match result {
        Ok(()) => (true, String::new()),
        Err(interrupt) => (interrupt.is_message(), interrupt.text()),
    }
}
