//! Argument descriptors.
//!
//! An [`Arg`] describes one logical argument: its variants, what it does
//! when recognised, and presentation metadata for help output. After a
//! parse, the same descriptor carries the observed state (count and
//! values), read back through [`Specification::get`](crate::Specification::get).
//!
//! Behaviour is a closed set, matched on by the parser and help renderer:
//!
//! - value arguments consume one token and parse it ([`Arg::typed`])
//! - count arguments consume nothing and count up or down ([`Arg::counter`])
//! - commands hand the remaining tokens to a nested specification
//!   ([`Arg::command`])
//! - message, help and completion arguments stop the parse with text
//! - prompt arguments read their value from a [`Prompter`](crate::Prompter)
//!
//! # Examples
//!
//! ```
//! use argdecl_core::Arg;
//!
//! let times = Arg::int(&["-t", "--times"])
//!     .with_default(1i64)
//!     .with_help("How many times to greet");
//! assert_eq!(times.variants(), ["-t", "--times"]);
//! assert_eq!(times.value::<i64>(), Some(&1));
//! assert!(!times.seen());
//! ```

use std::any::{Any, TypeId};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::warn;

use crate::error::{ParseError, SpecificationError};
use crate::spec::Specification;
use crate::value::{ArgValue, ValueHint, ValueSlot};
use crate::variant::ArgKind;

/// Callback run after a command's nested specification parsed successfully.
pub type CommandHandler = Arc<dyn Fn(&Specification) + Send + Sync>;

#[derive(Clone)]
pub(crate) enum Action {
    Value(ValueSlot),
    Count {
        /// Tokens that count down, filled in at build time.
        down: Vec<String>,
    },
    Command {
        spec: Box<Specification>,
        handler: Option<CommandHandler>,
    },
    Message(String),
    Help {
        show_level: u8,
    },
    Completion,
    Prompt {
        slot: ValueSlot,
        prompt: String,
    },
}

impl Action {
    pub(crate) fn label(&self) -> &'static str {
        match self {
            Self::Value(_) => "value",
            Self::Count { .. } => "count",
            Self::Command { .. } => "command",
            Self::Message(_) => "message",
            Self::Help { .. } => "help",
            Self::Completion => "completion",
            Self::Prompt { .. } => "prompt",
        }
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(slot) => f.debug_tuple("Value").field(slot).finish(),
            Self::Count { down } => f.debug_struct("Count").field("down", down).finish(),
            Self::Command { spec, handler } => f
                .debug_struct("Command")
                .field("spec", spec)
                .field("handler", &handler.is_some())
                .finish(),
            Self::Message(text) => f.debug_tuple("Message").field(text).finish(),
            Self::Help { show_level } => f
                .debug_struct("Help")
                .field("show_level", show_level)
                .finish(),
            Self::Completion => f.write_str("Completion"),
            Self::Prompt { slot, prompt } => f
                .debug_struct("Prompt")
                .field("slot", slot)
                .field("prompt", prompt)
                .finish(),
        }
    }
}

/// One logical argument.
#[derive(Debug, Clone)]
pub struct Arg {
    pub(crate) variants: Vec<String>,
    pub(crate) action: Action,
    pub(crate) kind: Option<ArgKind>,
    pub(crate) multi: bool,
    pub(crate) required: bool,
    pub(crate) optional: bool,
    pub(crate) help: String,
    pub(crate) long_help: String,
    pub(crate) help_var: Option<String>,
    pub(crate) group: Option<String>,
    pub(crate) help_level: u8,
    pub(crate) env: Option<String>,
    pub(crate) count: i64,
    /// Problem found while configuring, reported by the builder.
    pub(crate) pending: Option<SpecificationError>,
}

impl Arg {
    fn with_action(variants: &[&str], action: Action) -> Self {
        Self {
            variants: variants.iter().map(|v| v.to_string()).collect(),
            action,
            kind: None,
            multi: false,
            required: false,
            optional: false,
            help: String::new(),
            long_help: String::new(),
            help_var: None,
            group: None,
            help_level: 0,
            env: None,
            count: 0,
            pending: None,
        }
    }

    /// A value argument parsed as `T`.
    ///
    /// Works for options (`-o`, `--output`) and positionals (`<file>`).
    pub fn typed<T: ArgValue>(variants: &[&str]) -> Self {
        Self::with_action(variants, Action::Value(ValueSlot::typed::<T>()))
    }

    /// A value argument for any displayable type, parsed by `parse`.
    ///
    /// ```
    /// use argdecl_core::{Arg, Specification};
    ///
    /// let mut spec = Specification::builder()
    ///     .arg("level", Arg::value_with(&["--level"], "level", |raw: &str| match raw {
    ///         "low" => Ok(1u8),
    ///         "high" => Ok(9u8),
    ///         other => Err(format!("unknown level {other}")),
    ///     }))
    ///     .build()
    ///     .unwrap();
    ///
    /// spec.parse(&["--level", "high"], "tool").unwrap();
    /// assert_eq!(spec.get("level").unwrap().value::<u8>(), Some(&9));
    /// assert!(spec.clone().parse(&["--level", "mid"], "tool").is_err());
    /// ```
    pub fn value_with<T, F>(variants: &[&str], type_name: &str, parse: F) -> Self
    where
        T: fmt::Display + Send + Sync + 'static,
        F: Fn(&str) -> Result<T, String> + Send + Sync + 'static,
    {
        Self::with_action(variants, Action::Value(ValueSlot::custom(type_name, parse)))
    }

    pub fn string(variants: &[&str]) -> Self {
        Self::typed::<String>(variants)
    }

    pub fn int(variants: &[&str]) -> Self {
        Self::typed::<i64>(variants)
    }

    pub fn float(variants: &[&str]) -> Self {
        Self::typed::<f64>(variants)
    }

    pub fn bool(variants: &[&str]) -> Self {
        Self::typed::<bool>(variants)
    }

    pub fn path(variants: &[&str]) -> Self {
        Self::typed::<PathBuf>(variants)
    }

    /// A counter that consumes no tokens.
    ///
    /// Paired variants such as `--[no-]color`, `--yes/--no` or `-y/-n`
    /// count up for the first form and down for the second.
    pub fn counter(variants: &[&str]) -> Self {
        Self::with_action(variants, Action::Count { down: Vec::new() })
    }

    /// A subcommand owning `spec`. Once recognised, every remaining token
    /// belongs to the nested specification.
    pub fn command(variants: &[&str], spec: Specification) -> Self {
        Self::with_action(
            variants,
            Action::Command {
                spec: Box::new(spec),
                handler: None,
            },
        )
    }

    /// Stops the parse with a fixed message, e.g. a version string.
    pub fn message(variants: &[&str], text: &str) -> Self {
        Self::with_action(variants, Action::Message(text.to_string()))
    }

    /// Stops the parse with the help of the specification in scope.
    ///
    /// Entries with a help level above `0` stay hidden; see
    /// [`shows_level`](Arg::shows_level).
    pub fn help_flag(variants: &[&str]) -> Self {
        Self::with_action(variants, Action::Help { show_level: 0 })
    }

    /// Stops the parse with a fish completion script for the scope.
    pub fn completion(variants: &[&str]) -> Self {
        Self::with_action(variants, Action::Completion)
    }

    /// Reads its value from the prompter instead of the command line.
    pub fn prompt<T: ArgValue>(variants: &[&str], prompt: &str) -> Self {
        Self::with_action(
            variants,
            Action::Prompt {
                slot: ValueSlot::typed::<T>(),
                prompt: prompt.to_string(),
            },
        )
    }

    /// Sets the one-line help text.
    pub fn with_help(mut self, help: &str) -> Self {
        self.help = help.to_string();
        self
    }

    /// Sets the paragraph help text used by paragraph-style rendering.
    pub fn with_long_help(mut self, help: &str) -> Self {
        self.long_help = help.to_string();
        self
    }

    /// Overrides the metavariable shown after value options.
    pub fn with_help_var(mut self, var: &str) -> Self {
        self.help_var = Some(var.to_string());
        self
    }

    /// Places the argument under a custom help heading.
    pub fn with_group(mut self, group: &str) -> Self {
        self.group = Some(group.to_string());
        self
    }

    /// Hides the argument from help rendered below `level`.
    pub fn with_help_level(mut self, level: u8) -> Self {
        self.help_level = level;
        self
    }

    /// For help arguments, the highest help level to render.
    pub fn shows_level(mut self, level: u8) -> Self {
        if let Action::Help { show_level } = &mut self.action {
            *show_level = level;
        }
        self
    }

    /// Marks an option as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Marks a positional as optional.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Allows repeated options and greedy positionals.
    pub fn multi(mut self) -> Self {
        self.multi = true;
        self
    }

    /// Restricts values to a closed set.
    pub fn with_choices(mut self, choices: &[&str]) -> Self {
        if let Some(slot) = self.slot_mut() {
            slot.choices = choices.iter().map(|c| c.to_string()).collect();
        }
        self
    }

    /// Sets a typed default. The type must match the argument's value type.
    ///
    /// A default already taken from the environment is kept.
    pub fn with_default<T: ArgValue>(mut self, value: T) -> Self {
        let variant = self.variants.first().cloned().unwrap_or_default();
        if let Some(slot) = self.slot_mut() {
            if slot.type_id != TypeId::of::<T>() {
                let expected = slot.type_name.clone();
                self.pending = Some(SpecificationError::DefaultTypeMismatch { variant, expected });
            } else if !slot.env_seeded {
                slot.set_default(Arc::new(value));
            }
        }
        self
    }

    /// Sets a default from text, parsed by the argument's value type.
    pub fn with_default_str(mut self, raw: &str) -> Self {
        let variant = self.variants.first().cloned().unwrap_or_default();
        if let Some(slot) = self.slot_mut() {
            match slot.parse_raw(raw) {
                Ok(value) if !slot.env_seeded => slot.set_default(value),
                Ok(_) => {}
                Err(reason) => {
                    let expected = slot.type_name.clone();
                    self.pending = Some(SpecificationError::InvalidDefault {
                        variant,
                        raw: raw.to_string(),
                        expected,
                        reason,
                    });
                }
            }
        }
        self
    }

    /// Seeds the default from an environment variable, if it is set.
    ///
    /// The environment value wins over [`with_default`](Arg::with_default)
    /// regardless of call order.
    pub fn with_env(self, name: &str) -> Self {
        self.with_env_lookup(name, |key| std::env::var(key).ok())
    }

    /// Like [`with_env`](Arg::with_env) with an injectable lookup.
    ///
    /// Values that fail to parse are logged and ignored.
    pub fn with_env_lookup<F>(mut self, name: &str, lookup: F) -> Self
    where
        F: FnOnce(&str) -> Option<String>,
    {
        self.env = Some(name.to_string());
        let Some(raw) = lookup(name) else {
            return self;
        };
        if let Some(slot) = self.slot_mut() {
            match slot.parse_raw(&raw) {
                Ok(value) => {
                    slot.set_default(value);
                    slot.env_seeded = true;
                }
                Err(reason) => {
                    warn!(env = name, value = %raw, %reason, "Ignoring unparseable environment default");
                }
            }
        }
        self
    }

    /// Runs `handler` after this command's nested specification parsed.
    pub fn with_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Specification) + Send + Sync + 'static,
    {
        if let Action::Command { handler: slot, .. } = &mut self.action {
            *slot = Some(Arc::new(handler));
        }
        self
    }

    fn slot_mut(&mut self) -> Option<&mut ValueSlot> {
        match &mut self.action {
            Action::Value(slot) | Action::Prompt { slot, .. } => Some(slot),
            _ => None,
        }
    }

    pub(crate) fn slot(&self) -> Option<&ValueSlot> {
        match &self.action {
            Action::Value(slot) | Action::Prompt { slot, .. } => Some(slot),
            _ => None,
        }
    }

    /// Records one occurrence. `down` tokens of paired counters decrement.
    pub(crate) fn register(&mut self, variant: &str, down: bool) -> Result<(), ParseError> {
        self.count += if down { -1 } else { 1 };
        if !self.multi && self.count.abs() > 1 {
            return Err(ParseError::Duplicate(variant.to_string()));
        }
        Ok(())
    }

    pub(crate) fn reset(&mut self) {
        self.count = 0;
        match &mut self.action {
            Action::Value(slot) | Action::Prompt { slot, .. } => slot.clear(),
            Action::Command { spec, .. } => spec.reset(),
            _ => {}
        }
    }

    pub fn variants(&self) -> &[String] {
        &self.variants
    }

    /// The kind, known once the argument is part of a built specification.
    pub fn kind(&self) -> Option<ArgKind> {
        self.kind
    }

    /// Occurrences seen; paired counters may go negative.
    pub fn count(&self) -> i64 {
        self.count
    }

    /// Whether the argument was given (count is non-zero).
    pub fn seen(&self) -> bool {
        self.count != 0
    }

    /// The last parsed value, falling back to the default.
    ///
    /// Returns `None` when `T` is not the argument's value type.
    pub fn value<T: Any>(&self) -> Option<&T> {
        self.slot()?.current()?.downcast_ref::<T>()
    }

    /// Every parsed value in order, or the default when none was given.
    pub fn values<T: Any>(&self) -> Vec<&T> {
        self.slot()
            .map(|slot| {
                slot.effective()
                    .into_iter()
                    .filter_map(|v| v.downcast_ref::<T>())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The raw tokens accepted for this argument.
    pub fn raw_values(&self) -> Vec<&str> {
        self.slot()
            .map(|slot| slot.accepted.iter().map(|a| a.raw.as_str()).collect())
            .unwrap_or_default()
    }

    /// Effective values rendered as text (parsed values, else the default).
    pub fn display_values(&self) -> Vec<String> {
        self.slot()
            .map(|slot| {
                slot.effective()
                    .into_iter()
                    .map(|v| slot.display(v))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The nested specification of a command argument.
    pub fn subcommand(&self) -> Option<&Specification> {
        match &self.action {
            Action::Command { spec, .. } => Some(spec),
            _ => None,
        }
    }

    /// Whether the argument consumes a token from the command line.
    pub fn takes_value(&self) -> bool {
        matches!(self.action, Action::Value(_))
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    pub fn long_help(&self) -> &str {
        &self.long_help
    }

    pub fn help_var(&self) -> Option<&str> {
        self.help_var.as_deref()
    }

    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    pub fn help_level(&self) -> u8 {
        self.help_level
    }

    pub fn env(&self) -> Option<&str> {
        self.env.as_deref()
    }

    pub fn is_multi(&self) -> bool {
        self.multi
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn choices(&self) -> &[String] {
        self.slot().map(|s| s.choices.as_slice()).unwrap_or_default()
    }

    /// The default as shown in help, `None` when absent or blank.
    pub fn default_display(&self) -> Option<&str> {
        self.slot()?.default_display.as_deref()
    }

    pub fn value_hint(&self) -> Option<ValueHint> {
        self.slot().map(|s| s.hint)
    }

    /// The value type name, e.g. `int`.
    pub fn type_name(&self) -> Option<&str> {
        self.slot().map(|s| s.type_name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_rejects_repeats_unless_multi() {
        let mut single = Arg::counter(&["-v"]);
        single.register("-v", false).unwrap();
        assert_eq!(
            single.register("-v", false),
            Err(ParseError::Duplicate("-v".into()))
        );

        let mut multi = Arg::counter(&["-v"]).multi();
        for _ in 0..3 {
            multi.register("-v", false).unwrap();
        }
        assert_eq!(multi.count(), 3);
    }

    #[test]
    fn test_register_counts_down() {
        let mut flag = Arg::counter(&["--[no]x"]);
        flag.register("--x", false).unwrap();
        flag.register("--nox", true).unwrap();
        assert_eq!(flag.count(), 0);
        assert!(!flag.seen());

        flag.register("--nox", true).unwrap();
        assert_eq!(flag.count(), -1);
        assert!(flag.seen());
    }

    #[test]
    fn test_default_type_mismatch_is_recorded() {
        let arg = Arg::int(&["-t"]).with_default("one".to_string());
        assert!(matches!(
            arg.pending,
            Some(SpecificationError::DefaultTypeMismatch { .. })
        ));
        assert_eq!(arg.value::<i64>(), None);
    }

    #[test]
    fn test_env_lookup_seeds_default() {
        let arg = Arg::int(&["--jobs"]).with_env_lookup("JOBS", |_| Some("8".into()));
        assert_eq!(arg.env(), Some("JOBS"));
        assert_eq!(arg.value::<i64>(), Some(&8));
        assert_eq!(arg.default_display(), Some("8"));

        let ignored = Arg::int(&["--jobs"])
            .with_default(2i64)
            .with_env_lookup("JOBS", |_| Some("many".into()));
        assert_eq!(ignored.value::<i64>(), Some(&2));
    }

    #[test]
    fn test_env_default_outranks_authored_default() {
        let env_first = Arg::int(&["--jobs"])
            .with_env_lookup("JOBS", |_| Some("8".into()))
            .with_default(2i64);
        assert_eq!(env_first.value::<i64>(), Some(&8));

        let env_last = Arg::int(&["--jobs"])
            .with_default_str("2")
            .with_env_lookup("JOBS", |_| Some("8".into()));
        assert_eq!(env_last.value::<i64>(), Some(&8));

        let unset = Arg::int(&["--jobs"])
            .with_env_lookup("JOBS", |_| None)
            .with_default(2i64);
        assert_eq!(unset.value::<i64>(), Some(&2));

        let bad_default = Arg::int(&["--jobs"])
            .with_env_lookup("JOBS", |_| Some("8".into()))
            .with_default_str("lots");
        assert!(matches!(
            bad_default.pending,
            Some(SpecificationError::InvalidDefault { .. })
        ));
    }

    #[test]
    fn test_values_fall_back_to_default() {
        let arg = Arg::string(&["--tag"]).multi().with_default_str("latest");
        assert_eq!(arg.values::<String>(), vec!["latest"]);
        assert!(arg.raw_values().is_empty());
        assert_eq!(arg.display_values(), vec!["latest".to_string()]);
    }
}
