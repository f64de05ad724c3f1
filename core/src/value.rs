//! Typed values for value-bearing arguments.
//!
//! [`ArgValue`] is the extension point for value types. Built-in
//! implementations cover `String`, `i64`, `f64`, `bool` and `PathBuf`;
//! other types can either implement the trait or be wired in with a parse
//! closure through [`Arg::value_with`](crate::Arg::value_with).
//!
//! Parsed values are stored type-erased and recovered with a downcast, so a
//! single [`Specification`](crate::Specification) can hold arguments of
//! many value types.

use std::any::{Any, TypeId};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// A parsed value with its concrete type erased.
pub type AnyValue = Arc<dyn Any + Send + Sync>;

pub(crate) type ParseFn = Arc<dyn Fn(&str) -> Result<AnyValue, String> + Send + Sync>;
pub(crate) type DisplayFn = Arc<dyn Fn(&AnyValue) -> String + Send + Sync>;
pub(crate) type BlankFn = Arc<dyn Fn(&AnyValue) -> bool + Send + Sync>;

/// What kind of text a value expects, used by completion generators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ValueHint {
    /// Free text (the default).
    #[default]
    Text,
    /// A filesystem path.
    Path,
}

/// A type that can be parsed from a single command line token.
///
/// # Examples
///
/// ```
/// use argdecl_core::ArgValue;
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Port(u16);
///
/// impl ArgValue for Port {
///     const TYPE_NAME: &'static str = "port";
///
///     fn parse_arg(raw: &str) -> Result<Self, String> {
///         raw.parse().map(Port).map_err(|e| format!("{e}"))
///     }
///
///     fn display_arg(&self) -> String {
///         self.0.to_string()
///     }
/// }
///
/// assert_eq!(Port::parse_arg("8080"), Ok(Port(8080)));
/// assert!(Port::parse_arg("http").is_err());
/// ```
pub trait ArgValue: Any + Send + Sync + Sized {
    /// Name shown in error messages, e.g. `int`.
    const TYPE_NAME: &'static str;
    /// Completion hint for this type.
    const HINT: ValueHint = ValueHint::Text;

    /// Parses one raw token.
    fn parse_arg(raw: &str) -> Result<Self, String>;

    /// Renders the value for help text and reports.
    fn display_arg(&self) -> String;

    /// Whether this value is "empty" and so not worth advertising as a
    /// default in help output.
    fn is_blank(&self) -> bool {
        false
    }
}

impl ArgValue for String {
    const TYPE_NAME: &'static str = "string";

    fn parse_arg(raw: &str) -> Result<Self, String> {
        Ok(raw.to_string())
    }

    fn display_arg(&self) -> String {
        self.clone()
    }

    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl ArgValue for i64 {
    const TYPE_NAME: &'static str = "int";

    fn parse_arg(raw: &str) -> Result<Self, String> {
        raw.parse().map_err(|e| format!("{e}"))
    }

    fn display_arg(&self) -> String {
        self.to_string()
    }

    fn is_blank(&self) -> bool {
        *self == 0
    }
}

impl ArgValue for f64 {
    const TYPE_NAME: &'static str = "float";

    fn parse_arg(raw: &str) -> Result<Self, String> {
        raw.parse().map_err(|e| format!("{e}"))
    }

    fn display_arg(&self) -> String {
        self.to_string()
    }

    fn is_blank(&self) -> bool {
        *self == 0.0
    }
}

impl ArgValue for bool {
    const TYPE_NAME: &'static str = "bool";

    fn parse_arg(raw: &str) -> Result<Self, String> {
        match raw.to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(true),
            "false" | "no" | "off" | "0" => Ok(false),
            _ => Err(format!("'{raw}' is not a boolean")),
        }
    }

    fn display_arg(&self) -> String {
        self.to_string()
    }

    fn is_blank(&self) -> bool {
        !*self
    }
}

impl ArgValue for PathBuf {
    const TYPE_NAME: &'static str = "path";
    const HINT: ValueHint = ValueHint::Path;

    fn parse_arg(raw: &str) -> Result<Self, String> {
        if raw.is_empty() {
            return Err("path cannot be empty".to_string());
        }
        Ok(PathBuf::from(raw))
    }

    fn display_arg(&self) -> String {
        self.display().to_string()
    }

    fn is_blank(&self) -> bool {
        self.as_os_str().is_empty()
    }
}

/// One accepted value: the parsed form plus the raw token it came from.
#[derive(Clone)]
pub(crate) struct Accepted {
    pub(crate) value: AnyValue,
    pub(crate) raw: String,
}

/// Value semantics and accumulated values of a value-bearing argument.
#[derive(Clone)]
pub(crate) struct ValueSlot {
    pub(crate) type_name: String,
    pub(crate) type_id: TypeId,
    pub(crate) hint: ValueHint,
    parse: ParseFn,
    display: DisplayFn,
    blank: BlankFn,
    pub(crate) default: Option<AnyValue>,
    /// Rendered default, `None` when absent or blank.
    pub(crate) default_display: Option<String>,
    /// The default came from the environment and outranks authored ones.
    pub(crate) env_seeded: bool,
    pub(crate) choices: Vec<String>,
    pub(crate) accepted: Vec<Accepted>,
}

impl ValueSlot {
    pub(crate) fn typed<T: ArgValue>() -> Self {
        Self {
            type_name: T::TYPE_NAME.to_string(),
            type_id: TypeId::of::<T>(),
            hint: T::HINT,
            parse: Arc::new(|raw: &str| T::parse_arg(raw).map(|v| Arc::new(v) as AnyValue)),
            display: Arc::new(|value: &AnyValue| {
                value
                    .downcast_ref::<T>()
                    .map(ArgValue::display_arg)
                    .unwrap_or_default()
            }),
            blank: Arc::new(|value: &AnyValue| value.downcast_ref::<T>().is_none_or(ArgValue::is_blank)),
            default: None,
            default_display: None,
            env_seeded: false,
            choices: Vec::new(),
            accepted: Vec::new(),
        }
    }

    pub(crate) fn custom<T, F>(type_name: &str, parse: F) -> Self
    where
        T: fmt::Display + Send + Sync + 'static,
        F: Fn(&str) -> Result<T, String> + Send + Sync + 'static,
    {
        Self {
            type_name: type_name.to_string(),
            type_id: TypeId::of::<T>(),
            hint: ValueHint::Text,
            parse: Arc::new(move |raw: &str| parse(raw).map(|v| Arc::new(v) as AnyValue)),
            display: Arc::new(|value: &AnyValue| {
                value
                    .downcast_ref::<T>()
                    .map(ToString::to_string)
                    .unwrap_or_default()
            }),
            blank: Arc::new(|_: &AnyValue| false),
            default: None,
            default_display: None,
            env_seeded: false,
            choices: Vec::new(),
            accepted: Vec::new(),
        }
    }

    pub(crate) fn set_default(&mut self, value: AnyValue) {
        let shown = (self.display)(&value);
        let blank = (self.blank)(&value) || shown.is_empty();
        self.default_display = (!blank).then_some(shown);
        self.default = Some(value);
    }

    pub(crate) fn parse_raw(&self, raw: &str) -> Result<AnyValue, String> {
        (self.parse)(raw)
    }

    /// Parses and validates one token supplied for `variant`.
    pub(crate) fn accept(&mut self, variant: &str, raw: &str) -> Result<(), ParseError> {
        if !self.choices.is_empty() && !self.choices.iter().any(|c| c == raw) {
            return Err(ParseError::InvalidChoice {
                variant: variant.to_string(),
                choices: self.choices.join(", "),
                raw: raw.to_string(),
            });
        }
        let value = (self.parse)(raw).map_err(|_| ParseError::InvalidValue {
            variant: variant.to_string(),
            expected: self.type_name.clone(),
            raw: raw.to_string(),
        })?;
        self.accepted.push(Accepted {
            value,
            raw: raw.to_string(),
        });
        Ok(())
    }

    pub(crate) fn display(&self, value: &AnyValue) -> String {
        (self.display)(value)
    }

    /// The most recent value, falling back to the default.
    pub(crate) fn current(&self) -> Option<&AnyValue> {
        self.accepted
            .last()
            .map(|a| &a.value)
            .or(self.default.as_ref())
    }

    /// All accepted values, or the default alone when nothing was accepted.
    pub(crate) fn effective(&self) -> Vec<&AnyValue> {
        if self.accepted.is_empty() {
            self.default.iter().collect()
        } else {
            self.accepted.iter().map(|a| &a.value).collect()
        }
    }

    pub(crate) fn clear(&mut self) {
        self.accepted.clear();
    }
}

impl fmt::Debug for ValueSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueSlot")
            .field("type_name", &self.type_name)
            .field("hint", &self.hint)
            .field("default", &self.default_display)
            .field("choices", &self.choices)
            .field(
                "accepted",
                &self.accepted.iter().map(|a| a.raw.as_str()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_parsers() {
        assert_eq!(i64::parse_arg("-12"), Ok(-12));
        assert!(i64::parse_arg("twelve").is_err());
        assert_eq!(f64::parse_arg("2.5"), Ok(2.5));
        assert_eq!(bool::parse_arg("Yes"), Ok(true));
        assert_eq!(bool::parse_arg("off"), Ok(false));
        assert!(bool::parse_arg("maybe").is_err());
        assert!(PathBuf::parse_arg("").is_err());
    }

    #[test]
    fn test_slot_rejects_bad_values() {
        let mut slot = ValueSlot::typed::<i64>();
        let err = slot.accept("--times", "abc").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid value for --times: expected int, got 'abc'"
        );
        assert!(slot.accepted.is_empty());
    }

    #[test]
    fn test_slot_checks_choices_before_parsing() {
        let mut slot = ValueSlot::typed::<String>();
        slot.choices = vec!["json".into(), "yaml".into()];
        let err = slot.accept("--format", "toml").unwrap_err();
        assert!(matches!(err, ParseError::InvalidChoice { .. }));
        slot.accept("--format", "yaml").unwrap();
        assert_eq!(slot.accepted[0].raw, "yaml");
    }

    #[test]
    fn test_blank_defaults_are_not_displayed() {
        let mut slot = ValueSlot::typed::<i64>();
        slot.set_default(Arc::new(0i64));
        assert!(slot.default.is_some());
        assert!(slot.default_display.is_none());

        slot.set_default(slot.parse_raw("0").unwrap());
        assert!(slot.default_display.is_none());
        slot.set_default(slot.parse_raw("3").unwrap());
        assert_eq!(slot.default_display.as_deref(), Some("3"));
    }

    #[test]
    fn test_custom_slot_uses_closure() {
        let mut slot = ValueSlot::custom("even", |raw: &str| {
            let n: u32 = raw.parse().map_err(|_| "not a number".to_string())?;
            if n % 2 == 0 { Ok(n) } else { Err("odd".to_string()) }
        });
        assert!(slot.accept("-n", "3").is_err());
        slot.accept("-n", "4").unwrap();
        let value = slot.current().unwrap();
        assert_eq!(value.downcast_ref::<u32>(), Some(&4));
        assert_eq!(slot.display(value), "4");
    }
}
