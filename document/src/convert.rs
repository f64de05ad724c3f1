//! Conversion of documents into [`Specification`]s.

use std::path::PathBuf;

use argdecl_core::{Arg, Specification};

use crate::document::{ArgAction, ArgDocument, EntryDocument, SpecDocument, ValueType};
use crate::error::{DocumentError, Result};

impl SpecDocument {
    /// Builds the specification this document describes.
    ///
    /// # Errors
    ///
    /// [`DocumentError::InvalidDocument`] for fields that do not fit an
    /// argument's kind, [`DocumentError::Specification`] when the resulting
    /// specification fails to build.
    ///
    /// # Examples
    ///
    /// ```
    /// use argdecl_document::from_yaml_str;
    ///
    /// let doc = from_yaml_str(r#"
    /// name: hello
    /// args:
    ///   - { name: name, variants: ["<name>"] }
    ///   - { name: times, variants: ["-t", "--times"], type: int, default: 1 }
    /// "#).unwrap();
    ///
    /// let mut spec = doc.to_specification().unwrap();
    /// spec.parse(&["World"], &doc.name).unwrap();
    /// assert_eq!(spec.get("times").unwrap().value::<i64>(), Some(&1));
    /// ```
    pub fn to_specification(&self) -> Result<Specification> {
        build_spec(&self.args, &self.prolog, &self.epilog)
    }
}

fn build_spec(entries: &[EntryDocument], prolog: &str, epilog: &str) -> Result<Specification> {
    let mut builder = Specification::builder().prolog(prolog).epilog(epilog);
    for entry in entries {
        builder = match entry {
            EntryDocument::Arg(doc) => builder.arg(&doc.name, doc.to_arg()?),
            EntryDocument::Alternatives(group) => {
                let members = group
                    .members
                    .iter()
                    .map(|member| Ok((member.name.as_str(), member.to_arg()?)))
                    .collect::<Result<Vec<_>>>()?;
                builder.alternatives(&group.alternatives, members)
            }
        };
    }
    Ok(builder.build()?)
}

impl ArgDocument {
    /// Converts this entry into an [`Arg`].
    pub fn to_arg(&self) -> Result<Arg> {
        self.check_fields()?;
        let variants: Vec<&str> = self.variants.iter().map(String::as_str).collect();

        let mut arg = match self.kind {
            ArgAction::Value => value_arg(self.value_type, &variants),
            ArgAction::Count => Arg::counter(&variants),
            ArgAction::Command => {
                Arg::command(&variants, build_spec(&self.args, &self.prolog, &self.epilog)?)
            }
            ArgAction::Message => {
                let text = self.message.as_deref().ok_or_else(|| {
                    self.invalid("a message argument needs a 'message'".to_string())
                })?;
                Arg::message(&variants, text)
            }
            ArgAction::Help => Arg::help_flag(&variants).shows_level(self.show_level),
            ArgAction::Completion => Arg::completion(&variants),
            ArgAction::Prompt => {
                let prompt = self
                    .prompt
                    .clone()
                    .unwrap_or_else(|| format!("{}: ", self.name));
                prompt_arg(self.value_type, &variants, &prompt)
            }
        };

        arg = arg
            .with_help(&self.help)
            .with_long_help(&self.long_help)
            .with_help_level(self.help_level);
        if let Some(var) = &self.help_var {
            arg = arg.with_help_var(var);
        }
        if let Some(group) = &self.group {
            arg = arg.with_group(group);
        }
        if self.required {
            arg = arg.required();
        }
        if self.optional {
            arg = arg.optional();
        }
        if self.multi {
            arg = arg.multi();
        }
        if !self.choices.is_empty() {
            let choices: Vec<&str> = self.choices.iter().map(String::as_str).collect();
            arg = arg.with_choices(&choices);
        }
        if let Some(default) = &self.default {
            arg = arg.with_default_str(&self.scalar_text(default)?);
        }
        if let Some(env) = &self.env {
            arg = arg.with_env(env);
        }
        Ok(arg)
    }

    fn takes_value(&self) -> bool {
        matches!(self.kind, ArgAction::Value | ArgAction::Prompt)
    }

    fn check_fields(&self) -> Result<()> {
        if !self.takes_value() {
            let value_field = [
                ("default", self.default.is_some()),
                ("choices", !self.choices.is_empty()),
                ("env", self.env.is_some()),
                ("type", self.value_type != ValueType::String),
            ]
            .into_iter()
            .find(|(_, set)| *set);
            if let Some((field, _)) = value_field {
                return Err(self.invalid(format!("'{field}' only applies to value and prompt arguments")));
            }
        }
        if self.kind != ArgAction::Command && !self.args.is_empty() {
            return Err(self.invalid("only command arguments can have nested 'args'".to_string()));
        }
        if self.kind != ArgAction::Message && self.message.is_some() {
            return Err(self.invalid("'message' only applies to message arguments".to_string()));
        }
        Ok(())
    }

    fn scalar_text(&self, value: &serde_json::Value) -> Result<String> {
        match value {
            serde_json::Value::String(text) => Ok(text.clone()),
            serde_json::Value::Number(n) => Ok(n.to_string()),
            serde_json::Value::Bool(b) => Ok(b.to_string()),
            _ => Err(self.invalid("'default' must be a string, number or boolean".to_string())),
        }
    }

    fn invalid(&self, reason: String) -> DocumentError {
        DocumentError::InvalidDocument(format!("argument '{}': {reason}", self.name))
    }
}

fn value_arg(value_type: ValueType, variants: &[&str]) -> Arg {
    match value_type {
        ValueType::String => Arg::typed::<String>(variants),
        ValueType::Int => Arg::typed::<i64>(variants),
        ValueType::Float => Arg::typed::<f64>(variants),
        ValueType::Bool => Arg::typed::<bool>(variants),
        ValueType::Path => Arg::typed::<PathBuf>(variants),
    }
}

fn prompt_arg(value_type: ValueType, variants: &[&str], prompt: &str) -> Arg {
    match value_type {
        ValueType::String => Arg::prompt::<String>(variants, prompt),
        ValueType::Int => Arg::prompt::<i64>(variants, prompt),
        ValueType::Float => Arg::prompt::<f64>(variants, prompt),
        ValueType::Bool => Arg::prompt::<bool>(variants, prompt),
        ValueType::Path => Arg::prompt::<PathBuf>(variants, prompt),
    }
}
