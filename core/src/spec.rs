//! Validated, indexed argument specifications.
//!
//! [`SpecBuilder`] collects named [`Arg`]s and alternatives groups, checks
//! their static shape and indexes them into a [`Specification`]. Every
//! structural problem is reported here as a [`SpecificationError`]; parsing
//! never raises one.
//!
//! # Reuse
//!
//! Parsing records counts and values on the specification itself. Parsing
//! the same specification again accumulates on top of the previous run, so
//! a second `-v` is a duplicate. Clone before parsing (the clone is deep,
//! nested command specifications included) or call
//! [`Specification::reset`] to parse repeatedly.
//!
//! # Examples
//!
//! ```
//! use argdecl_core::{Arg, Specification};
//!
//! let template = Specification::builder()
//!     .arg("verbose", Arg::counter(&["-v", "--verbose"]).multi())
//!     .build()
//!     .unwrap();
//!
//! let mut first = template.clone();
//! first.parse(&["-v", "-v"], "tool").unwrap();
//! assert_eq!(first.get("verbose").unwrap().count(), 2);
//! assert_eq!(template.get("verbose").unwrap().count(), 0);
//! ```

use std::collections::HashMap;

use tracing::debug;

use crate::arg::{Action, Arg};
use crate::error::SpecificationError;
use crate::variant::{ArgKind, VariantShape, classify_variant};

pub(crate) const COMMANDS_GROUP: &str = "Commands";
pub(crate) const ARGUMENTS_GROUP: &str = "Arguments";
pub(crate) const OPTIONS_GROUP: &str = "Options";

/// A named argument inside a specification.
#[derive(Debug, Clone)]
pub(crate) struct Entry {
    pub(crate) name: String,
    pub(crate) arg: Arg,
    pub(crate) alternative: Option<usize>,
}

/// Where a surface token leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Target {
    pub(crate) index: usize,
    /// The token is the "down" form of a paired counter.
    pub(crate) down: bool,
}

/// A mutually exclusive group; the first member seen claims it.
#[derive(Debug, Clone)]
pub(crate) struct Alternatives {
    pub(crate) name: String,
    pub(crate) members: Vec<usize>,
    pub(crate) claimed: Option<usize>,
}

/// The indexed form of a set of arguments.
#[derive(Debug, Clone, Default)]
pub struct Specification {
    pub(crate) entries: Vec<Entry>,
    pub(crate) by_name: HashMap<String, usize>,
    pub(crate) tokens: HashMap<String, Target>,
    pub(crate) positionals: Vec<usize>,
    pub(crate) options: Vec<usize>,
    pub(crate) commands: Vec<usize>,
    /// Help headings in first-seen order.
    pub(crate) groups: Vec<(String, Vec<usize>)>,
    pub(crate) alternatives: Vec<Alternatives>,
    pub(crate) prolog: String,
    pub(crate) epilog: String,
}

enum Item {
    Arg(String, Arg),
    Alternatives(String, Vec<(String, Arg)>),
}

/// Collects arguments for a [`Specification`].
///
/// ```
/// use argdecl_core::{Arg, Specification, SpecificationError};
///
/// let err = Specification::builder()
///     .arg("push", Arg::command(&["<push>"], Specification::default()))
///     .build()
///     .unwrap_err();
/// assert!(matches!(err, SpecificationError::BracketedCommand { .. }));
/// ```
#[derive(Default)]
pub struct SpecBuilder {
    items: Vec<Item>,
    prolog: String,
    epilog: String,
}

impl SpecBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a named argument.
    pub fn arg(mut self, name: &str, arg: Arg) -> Self {
        self.items.push(Item::Arg(name.to_string(), arg));
        self
    }

    /// Adds a group of mutually exclusive value or count options.
    pub fn alternatives(mut self, name: &str, members: Vec<(&str, Arg)>) -> Self {
        let members = members
            .into_iter()
            .map(|(member, arg)| (member.to_string(), arg))
            .collect();
        self.items.push(Item::Alternatives(name.to_string(), members));
        self
    }

    /// Text shown before the generated help.
    pub fn prolog(mut self, text: &str) -> Self {
        self.prolog = text.to_string();
        self
    }

    /// Text shown after the generated help.
    pub fn epilog(mut self, text: &str) -> Self {
        self.epilog = text.to_string();
        self
    }

    /// Validates and indexes the collected arguments.
    ///
    /// # Errors
    ///
    /// Returns the first [`SpecificationError`] found, in declaration order.
    pub fn build(self) -> Result<Specification, SpecificationError> {
        let mut spec = Specification {
            prolog: self.prolog,
            epilog: self.epilog,
            ..Specification::default()
        };

        for item in self.items {
            match item {
                Item::Arg(name, arg) => spec.register(name, arg, None)?,
                Item::Alternatives(group, members) => spec.register_alternatives(group, members)?,
            }
        }

        debug!(
            positionals = spec.positionals.len(),
            options = spec.options.len(),
            commands = spec.commands.len(),
            "Built specification"
        );
        Ok(spec)
    }
}

impl Specification {
    pub fn builder() -> SpecBuilder {
        SpecBuilder::new()
    }

    /// Builds a specification from `(name, arg)` pairs.
    pub fn build<I>(args: I, prolog: &str, epilog: &str) -> Result<Self, SpecificationError>
    where
        I: IntoIterator<Item = (String, Arg)>,
    {
        args.into_iter()
            .fold(SpecBuilder::new(), |builder, (name, arg)| builder.arg(&name, arg))
            .prolog(prolog)
            .epilog(epilog)
            .build()
    }

    fn register_alternatives(
        &mut self,
        group: String,
        members: Vec<(String, Arg)>,
    ) -> Result<(), SpecificationError> {
        if members.len() < 2 {
            return Err(SpecificationError::InvalidAlternatives {
                group,
                reason: "needs at least two members".to_string(),
            });
        }
        if self.alternatives.iter().any(|a| a.name == group) {
            return Err(SpecificationError::InvalidAlternatives {
                group,
                reason: "name is used more than once".to_string(),
            });
        }

        let group_index = self.alternatives.len();
        let mut indices = Vec::with_capacity(members.len());
        for (name, arg) in members {
            let is_option = arg
                .variants
                .first()
                .is_some_and(|v| ArgKind::of(v) == ArgKind::Option);
            let is_exclusive_kind = matches!(arg.action, Action::Value(_) | Action::Count { .. });
            if !is_option || !is_exclusive_kind {
                return Err(SpecificationError::InvalidAlternatives {
                    group,
                    reason: format!("member '{name}' must be a value or count option"),
                });
            }
            self.register(name, arg, Some(group_index))?;
            indices.push(self.entries.len() - 1);
        }

        self.alternatives.push(Alternatives {
            name: group,
            members: indices,
            claimed: None,
        });
        Ok(())
    }

    fn register(
        &mut self,
        name: String,
        mut arg: Arg,
        alternative: Option<usize>,
    ) -> Result<(), SpecificationError> {
        if self.by_name.contains_key(&name) {
            return Err(SpecificationError::DuplicateName(name));
        }
        if let Some(err) = arg.pending.take() {
            return Err(err);
        }
        let Some(first) = arg.variants.first() else {
            return Err(SpecificationError::NoVariants(name));
        };
        if arg.required && arg.optional {
            return Err(SpecificationError::RequiredAndOptional(name));
        }

        let kind = ArgKind::of(first);
        let index = self.entries.len();
        let mut shapes = Vec::with_capacity(arg.variants.len());
        for variant in &arg.variants {
            shapes.push(check_variant(&name, &arg, kind, variant)?);
        }
        check_action(&name, &arg, kind)?;

        let mut down_tokens = Vec::new();
        for (variant, shape) in arg.variants.iter().zip(&shapes) {
            match shape {
                VariantShape::Paired { up, down } => {
                    self.insert_token(up, index, false)?;
                    self.insert_token(down, index, true)?;
                    down_tokens.push(down.clone());
                }
                // Positionals are indexed by their `<name>` spelling so that
                // collisions are caught; the parser never looks them up.
                _ => self.insert_token(variant, index, false)?,
            }
        }
        if let Action::Count { down } = &mut arg.action {
            *down = down_tokens;
        }

        if arg.help_var.is_none() {
            arg.help_var = shapes
                .iter()
                .map(VariantShape::fragment)
                .max_by_key(|fragment| fragment.len())
                .map(str::to_string);
        }

        let group = arg.group.clone().unwrap_or_else(|| {
            match kind {
                ArgKind::Command => COMMANDS_GROUP,
                ArgKind::Positional => ARGUMENTS_GROUP,
                ArgKind::Option => OPTIONS_GROUP,
            }
            .to_string()
        });
        match self.groups.iter_mut().find(|(heading, _)| *heading == group) {
            Some((_, members)) => members.push(index),
            None => self.groups.push((group, vec![index])),
        }

        match kind {
            ArgKind::Positional => self.positionals.push(index),
            ArgKind::Option => self.options.push(index),
            ArgKind::Command => self.commands.push(index),
        }

        debug!(name = %name, kind = kind.label(), variants = ?arg.variants, "Registered argument");
        arg.kind = Some(kind);
        self.by_name.insert(name.clone(), index);
        self.entries.push(Entry {
            name,
            arg,
            alternative,
        });
        Ok(())
    }

    fn insert_token(&mut self, token: &str, index: usize, down: bool) -> Result<(), SpecificationError> {
        if self.tokens.contains_key(token) {
            return Err(SpecificationError::DuplicateVariant(token.to_string()));
        }
        self.tokens.insert(token.to_string(), Target { index, down });
        Ok(())
    }

    /// Clears counts, values and alternative claims, recursively.
    pub fn reset(&mut self) {
        for entry in &mut self.entries {
            entry.arg.reset();
        }
        for group in &mut self.alternatives {
            group.claimed = None;
        }
    }

    /// Looks up an argument by name.
    pub fn get(&self, name: &str) -> Option<&Arg> {
        self.by_name.get(name).map(|&i| &self.entries[i].arg)
    }

    /// The nested specification of the named command.
    pub fn command(&self, name: &str) -> Option<&Specification> {
        self.get(name).and_then(Arg::subcommand)
    }

    /// Arguments in declaration order.
    pub fn args(&self) -> impl Iterator<Item = (&str, &Arg)> {
        self.entries.iter().map(|e| (e.name.as_str(), &e.arg))
    }

    /// Name of the member that claimed an alternatives group, if any.
    pub fn claimed(&self, group: &str) -> Option<&str> {
        let group = self.alternatives.iter().find(|a| a.name == group)?;
        group.claimed.map(|i| self.entries[i].name.as_str())
    }

    /// Member names of an alternatives group, in declaration order.
    pub fn alternative_members(&self, group: &str) -> Vec<&str> {
        self.alternatives
            .iter()
            .find(|a| a.name == group)
            .map(|a| {
                a.members
                    .iter()
                    .map(|&i| self.entries[i].name.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Names of the alternatives groups, in declaration order.
    pub fn alternative_groups(&self) -> impl Iterator<Item = &str> {
        self.alternatives.iter().map(|a| a.name.as_str())
    }

    /// The name of the command that was entered at this level, if any.
    pub fn entered_command(&self) -> Option<&str> {
        self.commands
            .iter()
            .map(|&i| &self.entries[i])
            .find(|e| e.arg.seen())
            .map(|e| e.name.as_str())
    }

    pub fn prolog(&self) -> &str {
        &self.prolog
    }

    pub fn epilog(&self) -> &str {
        &self.epilog
    }

    pub(crate) fn entry(&self, index: usize) -> &Entry {
        &self.entries[index]
    }
}

fn check_variant(
    name: &str,
    arg: &Arg,
    kind: ArgKind,
    variant: &str,
) -> Result<VariantShape, SpecificationError> {
    let shape = classify_variant(variant);

    if matches!(arg.action, Action::Command { .. }) {
        if let Some(VariantShape::Positional(inner)) = &shape {
            return Err(SpecificationError::BracketedCommand {
                name: name.to_string(),
                variant: variant.to_string(),
                suggested: inner.clone(),
            });
        }
    }

    let Some(shape) = shape else {
        return Err(SpecificationError::InvalidVariant {
            name: name.to_string(),
            variant: variant.to_string(),
        });
    };
    if shape.kind() != kind {
        return Err(SpecificationError::MixedVariants {
            name: name.to_string(),
            variant: variant.to_string(),
            kind: kind.label(),
        });
    }
    if shape.is_paired() && !matches!(arg.action, Action::Count { .. }) {
        return Err(SpecificationError::PairedVariantNotCount {
            name: name.to_string(),
            variant: variant.to_string(),
        });
    }
    Ok(shape)
}

fn check_action(name: &str, arg: &Arg, kind: ArgKind) -> Result<(), SpecificationError> {
    let supported = match kind {
        ArgKind::Positional => matches!(arg.action, Action::Value(_)),
        ArgKind::Command => matches!(arg.action, Action::Command { .. }),
        ArgKind::Option => !matches!(arg.action, Action::Command { .. }),
    };
    if supported {
        return Ok(());
    }
    if kind == ArgKind::Command {
        // A bare word that is not a command is a malformed option or positional.
        return Err(SpecificationError::InvalidVariant {
            name: name.to_string(),
            variant: arg.variants[0].clone(),
        });
    }
    Err(SpecificationError::UnsupportedKind {
        name: name.to_string(),
        kind: kind.label(),
        action: arg.action.label(),
    })
}
