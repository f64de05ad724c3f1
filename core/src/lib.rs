//! Declarative command line argument parsing.
//!
//! This crate turns a declared set of arguments into a parser, a help
//! renderer and "did you mean" suggestions:
//!
//! - [`Arg`]: one logical argument, with variants like `-v`/`--verbose`,
//!   `<file>` or `push`, plus behaviour (value, count, command, message,
//!   help, completion or prompt) and help metadata.
//! - [`Specification`]: a validated, indexed set of arguments, built with
//!   [`Specification::builder`]. Structural mistakes are
//!   [`SpecificationError`]s reported at build time.
//! - [`Specification::parse`]: consumes tokens, recording counts and
//!   values on the arguments. Returns [`Interrupt`] for user errors
//!   ([`ParseError`]) and for early exits such as help or version output.
//! - [`Specification::render_help`]: grouped, aligned help text.
//!
//! # Example
//!
//! ```
//! use argdecl_core::*;
//!
//! let mut spec = Specification::builder()
//!     .arg("name", Arg::string(&["<name>"]).with_help("Who to greet"))
//!     .arg(
//!         "times",
//!         Arg::int(&["-t", "--times"])
//!             .with_default(1i64)
//!             .with_help("How many times to greet"),
//!     )
//!     .arg("help", Arg::help_flag(&["-h", "--help"]).with_help("Show this help"))
//!     .build()
//!     .unwrap();
//!
//! let help = spec.clone().parse(&["-h"], "hello").unwrap_err();
//! assert!(help.is_message());
//! assert!(help.text().starts_with("Usage:\n  hello <name>"));
//!
//! spec.parse(&["-t", "2", "World"], "hello").unwrap();
//! assert_eq!(spec.get("times").unwrap().value::<i64>(), Some(&2));
//! ```

mod arg;
pub mod completion;
pub mod distance;
mod error;
mod help;
mod parser;
mod prompt;
mod report;
mod shell;
mod spec;
mod value;
mod variant;

pub use arg::{Arg, CommandHandler};
pub use error::{Interrupt, ParseError, SpecificationError, outcome};
pub use help::HelpStyle;
pub use prompt::{Prompter, StdinPrompter};
pub use report::{AlternativeReport, ArgReport, ParseReport};
pub use shell::split_command_line;
pub use spec::{SpecBuilder, Specification};
pub use value::{AnyValue, ArgValue, ValueHint};
pub use variant::{ArgKind, VariantShape, classify_variant};
