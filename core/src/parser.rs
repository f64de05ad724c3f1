//! The two-phase token parser.
//!
//! Phase one walks the tokens left to right, consuming options and
//! commands and collecting everything else as raw positional text. Phase
//! two hands the raw text to the positional arguments in declaration
//! order. A recognised command takes every remaining token and parses them
//! against its own specification.

use tracing::debug;

use crate::arg::Action;
use crate::completion::fish_script;
use crate::distance;
use crate::error::{Interrupt, ParseError};
use crate::help::HelpStyle;
use crate::prompt::{Prompter, StdinPrompter};
use crate::shell::split_command_line;
use crate::spec::{Specification, Target};
use crate::variant::{ArgKind, cluster_letters, is_option_token, split_attached};

impl Specification {
    /// Parses `tokens`, reading prompt-style values from stdin.
    ///
    /// `command_path` is used for display only, in help and usage text.
    /// On success the parsed state is available through [`Specification::get`].
    ///
    /// # Examples
    ///
    /// ```
    /// use argdecl_core::{Arg, Specification};
    ///
    /// let mut spec = Specification::builder()
    ///     .arg("name", Arg::string(&["<name>"]))
    ///     .arg("times", Arg::int(&["-t", "--times"]).with_default(1i64))
    ///     .build()
    ///     .unwrap();
    ///
    /// spec.parse(&["-t", "2", "World"], "hello").unwrap();
    /// assert_eq!(spec.get("name").unwrap().value::<String>().unwrap(), "World");
    /// assert_eq!(spec.get("times").unwrap().value::<i64>(), Some(&2));
    /// ```
    pub fn parse<S: AsRef<str>>(&mut self, tokens: &[S], command_path: &str) -> Result<(), Interrupt> {
        self.parse_with(tokens, command_path, &mut StdinPrompter)
    }

    /// Parses `tokens` with an explicit [`Prompter`].
    pub fn parse_with<S: AsRef<str>>(
        &mut self,
        tokens: &[S],
        command_path: &str,
        prompter: &mut dyn Prompter,
    ) -> Result<(), Interrupt> {
        let tokens: Vec<String> = tokens.iter().map(|t| t.as_ref().to_string()).collect();
        self.parse_at(&tokens, command_path, 0, prompter)
    }

    /// Splits a shell-like string into tokens and parses them.
    ///
    /// ```
    /// use argdecl_core::{Arg, Specification};
    ///
    /// let mut spec = Specification::builder()
    ///     .arg("files", Arg::path(&["<file>"]).multi())
    ///     .build()
    ///     .unwrap();
    /// spec.parse_str("a.txt 'my notes.txt'", "cat").unwrap();
    /// assert_eq!(spec.get("files").unwrap().raw_values(), vec!["a.txt", "my notes.txt"]);
    /// ```
    pub fn parse_str(&mut self, line: &str, command_path: &str) -> Result<(), Interrupt> {
        let tokens = split_command_line(line)?;
        self.parse(&tokens, command_path)
    }

    /// Parses `tokens[start..]`. Nested commands re-enter here.
    pub fn parse_at(
        &mut self,
        tokens: &[String],
        command_path: &str,
        start: usize,
        prompter: &mut dyn Prompter,
    ) -> Result<(), Interrupt> {
        let mut raw: Vec<String> = Vec::new();
        let mut pos = start;

        while pos < tokens.len() {
            let token = tokens[pos].as_str();
            pos += 1;

            if token == "--" {
                debug!(path = command_path, remaining = tokens.len() - pos, "Terminator");
                raw.extend_from_slice(&tokens[pos..]);
                break;
            }

            if let Some(target) = self.lookup(token) {
                debug!(path = command_path, token, "Registered token");
                pos += self.consume(target, tokens, token, pos, command_path, prompter)?;
                continue;
            }

            if let Some((option, value)) = split_attached(token) {
                let target = self
                    .lookup(option)
                    .ok_or_else(|| ParseError::UnrecognisedOption(option.to_string()))?;
                if !self.entries[target.index].arg.takes_value() {
                    return Err(ParseError::UnexpectedValue(option.to_string()).into());
                }
                debug!(path = command_path, option, "Attached value");
                self.consume(target, &[value.to_string()], option, 0, command_path, prompter)?;
                continue;
            }

            if is_option_token(token) {
                return Err(ParseError::UnrecognisedOption(token.to_string()).into());
            }

            if let Some(letters) = cluster_letters(token) {
                debug!(path = command_path, token, "Short option cluster");
                self.consume_cluster(token, letters, command_path, prompter)?;
                continue;
            }

            if !self.positionals.is_empty() {
                raw.push(token.to_string());
            } else if !self.commands.is_empty() {
                return Err(self.unknown_command(token).into());
            } else {
                return Err(ParseError::UnexpectedArgument(token.to_string()).into());
            }
        }

        self.check_required()?;
        self.assign_positionals(&raw, command_path, prompter)
    }

    /// Resolves a token to an option or command. Positional spellings are
    /// indexed but never matched.
    fn lookup(&self, token: &str) -> Option<Target> {
        self.tokens
            .get(token)
            .copied()
            .filter(|t| self.entries[t.index].arg.kind != Some(ArgKind::Positional))
    }

    /// Consumes the letters of `-abc`. The first value-taking letter takes
    /// the rest of the token as its value and ends the scan.
    fn consume_cluster(
        &mut self,
        token: &str,
        letters: &str,
        command_path: &str,
        prompter: &mut dyn Prompter,
    ) -> Result<(), Interrupt> {
        for (offset, letter) in letters.char_indices() {
            let option = format!("-{letter}");
            let target = self
                .lookup(&option)
                .ok_or_else(|| ParseError::UnrecognisedInCluster {
                    option: option.clone(),
                    token: token.to_string(),
                })?;

            if self.entries[target.index].arg.takes_value() {
                let rest = &letters[offset + letter.len_utf8()..];
                let value: Vec<String> = if rest.is_empty() {
                    Vec::new()
                } else {
                    vec![rest.to_string()]
                };
                self.consume(target, &value, &option, 0, command_path, prompter)?;
                return Ok(());
            }
            self.consume(target, &[], &option, 0, command_path, prompter)?;
        }
        Ok(())
    }

    fn unknown_command(&self, token: &str) -> ParseError {
        let candidates = self
            .commands
            .iter()
            .flat_map(|&i| self.entries[i].arg.variants.iter().map(String::as_str));
        match distance::closest(token, candidates) {
            Some((1, suggestion)) => ParseError::MisspelledCommand {
                token: token.to_string(),
                suggestion: suggestion.to_string(),
            },
            _ => ParseError::UnexpectedCommand(token.to_string()),
        }
    }

    fn check_required(&self) -> Result<(), ParseError> {
        let missing = self
            .options
            .iter()
            .map(|&i| &self.entries[i].arg)
            .find(|arg| arg.required && arg.count == 0);
        match missing {
            Some(arg) => Err(ParseError::MissingRequired(arg.variants.join("/"))),
            None => Ok(()),
        }
    }

    /// Hands raw text to positionals in order. Each later required
    /// positional keeps one token in reserve.
    ///
    /// An optional positional is skipped when the remaining tokens are all
    /// reserved, so `[<mode>] <dest>` given one token fills `<dest>`.
    fn assign_positionals(
        &mut self,
        raw: &[String],
        command_path: &str,
        prompter: &mut dyn Prompter,
    ) -> Result<(), Interrupt> {
        let order = self.positionals.clone();
        let mut next = 0;

        for (n, &index) in order.iter().enumerate() {
            let reserved = order[n + 1..]
                .iter()
                .filter(|&&i| !self.entries[i].arg.optional)
                .count();
            let arg = &self.entries[index].arg;
            let (optional, multi) = (arg.optional, arg.multi);
            let variant = arg.variants[0].clone();
            let available = raw.len() - next;

            if available == 0 {
                if optional {
                    continue;
                }
                return Err(ParseError::MissingPositional(variant).into());
            }
            if optional && available <= reserved {
                continue;
            }

            let target = Target { index, down: false };
            next += self.consume(target, raw, &variant, next, command_path, prompter)?;
            while multi && raw.len() - next > reserved {
                next += self.consume(target, raw, &variant, next, command_path, prompter)?;
            }
        }

        match raw.get(next) {
            Some(extra) => Err(ParseError::Unconsumed(extra.clone()).into()),
            None => Ok(()),
        }
    }

    fn claim(&mut self, index: usize, variant: &str) -> Result<(), ParseError> {
        let Some(group) = self.entries[index].alternative else {
            return Ok(());
        };
        match self.alternatives[group].claimed {
            Some(owner) if owner != index => Err(ParseError::AlternativeConflict {
                first: self.entries[owner].arg.variants[0].clone(),
                second: variant.to_string(),
            }),
            _ => {
                self.alternatives[group].claimed = Some(index);
                Ok(())
            }
        }
    }

    /// Registers one occurrence and runs the argument's action. Returns how
    /// many tokens of `args`, starting at `pos`, were used.
    fn consume(
        &mut self,
        target: Target,
        args: &[String],
        variant: &str,
        pos: usize,
        command_path: &str,
        prompter: &mut dyn Prompter,
    ) -> Result<usize, Interrupt> {
        self.claim(target.index, variant)?;
        let arg = &mut self.entries[target.index].arg;
        arg.register(variant, target.down)?;

        match &mut arg.action {
            Action::Value(slot) => {
                let raw = args
                    .get(pos)
                    .ok_or_else(|| ParseError::MissingValue(variant.to_string()))?;
                slot.accept(variant, raw)?;
                Ok(1)
            }
            Action::Prompt { slot, prompt } => {
                let line = prompter.prompt(prompt).map_err(|e| ParseError::Prompt {
                    variant: variant.to_string(),
                    reason: e.to_string(),
                })?;
                slot.accept(variant, line.trim_end_matches(['\r', '\n']))?;
                Ok(0)
            }
            Action::Count { .. } => Ok(0),
            Action::Message(text) => Err(Interrupt::Message(text.clone())),
            Action::Help { show_level } => {
                let level = *show_level;
                let help = self.render_help(command_path, level, &HelpStyle::default());
                Err(Interrupt::Message(help))
            }
            Action::Completion => Err(Interrupt::Message(fish_script(self, command_path))),
            Action::Command { spec, handler } => {
                let nested_path = join_path(command_path, variant);
                debug!(path = %nested_path, remaining = args.len() - pos, "Entering command");
                spec.parse_at(args, &nested_path, pos, prompter)?;
                if let Some(handler) = handler {
                    handler(spec);
                }
                Ok(args.len() - pos)
            }
        }
    }
}

fn join_path(command_path: &str, word: &str) -> String {
    if command_path.is_empty() {
        word.to_string()
    } else {
        format!("{command_path} {word}")
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::Arg;

    fn flags() -> Specification {
        Specification::builder()
            .arg("a", Arg::counter(&["-a"]))
            .arg("b", Arg::counter(&["-b"]))
            .arg("c", Arg::string(&["-c"]))
            .build()
            .unwrap()
    }

    #[test]
    fn test_cluster_takes_rest_of_token() {
        let mut spec = flags();
        spec.parse(&["-abcVAL"], "t").unwrap();
        assert!(spec.get("a").unwrap().seen());
        assert!(spec.get("b").unwrap().seen());
        assert_eq!(spec.get("c").unwrap().value::<String>().unwrap(), "VAL");
    }

    #[test]
    fn test_cluster_value_letter_swallows_following_letters() {
        let mut spec = flags();
        spec.parse(&["-acab"], "t").unwrap();
        assert_eq!(spec.get("c").unwrap().value::<String>().unwrap(), "ab");
        assert_eq!(spec.get("b").unwrap().count(), 0);
    }

    #[test]
    fn test_cluster_value_must_be_in_token() {
        let mut spec = flags();
        assert_eq!(
            spec.parse(&["-abc", "val"], "t"),
            Err(ParseError::MissingValue("-c".into()).into())
        );
    }

    #[test]
    fn test_cluster_unknown_letter() {
        let mut spec = flags();
        assert_eq!(
            spec.parse(&["-axb"], "t"),
            Err(ParseError::UnrecognisedInCluster {
                option: "-x".into(),
                token: "-axb".into()
            }
            .into())
        );
    }

    #[test]
    fn test_attached_values() {
        let mut spec = flags();
        spec.parse(&["-c=x=y"], "t").unwrap();
        assert_eq!(spec.get("c").unwrap().value::<String>().unwrap(), "x=y");

        let mut spec = flags();
        assert_eq!(
            spec.parse(&["-a:1"], "t"),
            Err(ParseError::UnexpectedValue("-a".into()).into())
        );
        assert_eq!(
            flags().parse(&["--nope=1"], "t"),
            Err(ParseError::UnrecognisedOption("--nope".into()).into())
        );
    }

    #[test]
    fn test_terminator_makes_everything_positional() {
        let mut spec = Specification::builder()
            .arg("verbose", Arg::counter(&["-v"]))
            .arg("rest", Arg::string(&["<rest>"]).multi())
            .build()
            .unwrap();
        spec.parse(&["-v", "--", "-v", "--", "x"], "t").unwrap();
        assert_eq!(spec.get("verbose").unwrap().count(), 1);
        assert_eq!(spec.get("rest").unwrap().raw_values(), vec!["-v", "--", "x"]);
    }

    #[test]
    fn test_missing_value_at_end() {
        let mut spec = flags();
        assert_eq!(
            spec.parse(&["-c"], "t"),
            Err(ParseError::MissingValue("-c".into()).into())
        );
    }

    #[test]
    fn test_required_option() {
        let mut spec = Specification::builder()
            .arg("out", Arg::path(&["-o", "--out"]).required())
            .build()
            .unwrap();
        assert_eq!(
            spec.parse::<&str>(&[], "t"),
            Err(ParseError::MissingRequired("-o/--out".into()).into())
        );
    }

    #[test]
    fn test_positionals_reserve_for_later_required() {
        let build = || {
            Specification::builder()
                .arg("sources", Arg::string(&["<source>"]).multi())
                .arg("mode", Arg::string(&["<mode>"]).optional())
                .arg("dest", Arg::string(&["<dest>"]))
                .build()
                .unwrap()
        };

        let mut spec = build();
        spec.parse(&["a", "b", "c"], "cp").unwrap();
        assert_eq!(spec.get("sources").unwrap().raw_values(), vec!["a", "b"]);
        assert!(!spec.get("mode").unwrap().seen());
        assert_eq!(spec.get("dest").unwrap().raw_values(), vec!["c"]);

        let mut spec = build();
        assert_eq!(
            spec.parse(&["a"], "cp"),
            Err(ParseError::MissingPositional("<dest>".into()).into())
        );
    }

    #[test]
    fn test_optional_positional_yields_to_required() {
        let build = || {
            Specification::builder()
                .arg("mode", Arg::string(&["<mode>"]).optional())
                .arg("dest", Arg::string(&["<dest>"]))
                .build()
                .unwrap()
        };

        let mut spec = build();
        spec.parse(&["c"], "cp").unwrap();
        assert!(!spec.get("mode").unwrap().seen());
        assert_eq!(spec.get("dest").unwrap().raw_values(), vec!["c"]);

        let mut spec = build();
        spec.parse(&["fast", "c"], "cp").unwrap();
        assert_eq!(spec.get("mode").unwrap().raw_values(), vec!["fast"]);
        assert_eq!(spec.get("dest").unwrap().raw_values(), vec!["c"]);
    }

    #[test]
    fn test_optional_positional_keeps_default() {
        let mut spec = Specification::builder()
            .arg("level", Arg::int(&["<level>"]).optional().with_default(3i64))
            .build()
            .unwrap();
        spec.parse::<&str>(&[], "t").unwrap();
        assert_eq!(spec.get("level").unwrap().value::<i64>(), Some(&3));

        assert_eq!(
            spec.clone().parse(&["1", "2"], "t"),
            Err(ParseError::Unconsumed("2".into()).into())
        );
    }

    #[test]
    fn test_unexpected_argument_without_positionals() {
        assert_eq!(
            flags().parse(&["stray"], "t"),
            Err(ParseError::UnexpectedArgument("stray".into()).into())
        );
    }

    #[test]
    fn test_unknown_command_suggestion() {
        let mut spec = Specification::builder()
            .arg("ship", Arg::command(&["ship"], Specification::default()))
            .arg("mine", Arg::command(&["mine"], Specification::default()))
            .build()
            .unwrap();
        let err = spec.clone().parse(&["shp"], "game").unwrap_err();
        assert_eq!(err.text(), "Unexpected command 'shp', did you mean 'ship'?");

        let err = spec.parse(&["fly"], "game").unwrap_err();
        assert_eq!(err.text(), "Unexpected command 'fly'");
    }

    #[test]
    fn test_command_handler_runs_after_nested_parse() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let push = Specification::builder()
            .arg("force", Arg::counter(&["-f"]))
            .build()
            .unwrap();
        let mut spec = Specification::builder()
            .arg(
                "push",
                Arg::command(&["push"], push).with_handler(move |nested| {
                    if nested.get("force").is_some_and(|f| f.seen()) {
                        seen.fetch_add(1, Ordering::SeqCst);
                    }
                }),
            )
            .build()
            .unwrap();

        spec.parse(&["push", "-f"], "git").unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(spec.entered_command(), Some("push"));
    }

    #[test]
    fn test_message_short_circuits() {
        let mut spec = Specification::builder()
            .arg("version", Arg::message(&["-V", "--version"], "tool 1.2.0"))
            .arg("name", Arg::string(&["<name>"]))
            .build()
            .unwrap();
        let err = spec.parse(&["--version"], "tool").unwrap_err();
        assert_eq!(err, Interrupt::Message("tool 1.2.0".into()));
        assert_eq!(err.exit_code(), 0);
    }

    #[test]
    fn test_prompt_failure_is_parse_error() {
        let mut spec = Specification::builder()
            .arg("pin", Arg::prompt::<i64>(&["--pin"], "PIN: "))
            .build()
            .unwrap();
        let mut closed = |_: &str| -> std::io::Result<String> {
            Err(std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "no input"))
        };
        let err = spec.parse_with(&["--pin"], "t", &mut closed).unwrap_err();
        assert!(matches!(err, Interrupt::Error(ParseError::Prompt { .. })));
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("", "push"), "push");
        assert_eq!(join_path("git", "push"), "git push");
    }
}
