//! Serde model of a spec document.
//!
//! # Example YAML
//!
//! ```yaml
//! name: hello
//! prolog: Greets people.
//! args:
//!   - name: name
//!     variants: ["<name>"]
//!     help: Who to greet
//!   - name: times
//!     variants: ["-t", "--times"]
//!     type: int
//!     default: 1
//!     help: How many times to greet
//!   - alternatives: answer
//!     members:
//!       - { name: yes, variants: ["-y"], kind: count }
//!       - { name: no, variants: ["-n"], kind: count }
//! ```

use serde::{Deserialize, Serialize};

/// A whole program description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecDocument {
    /// Program name, used as the command path.
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub prolog: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub epilog: String,
    #[serde(default)]
    pub args: Vec<EntryDocument>,
}

/// One item of an `args` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryDocument {
    Alternatives(AlternativesDocument),
    Arg(Box<ArgDocument>),
}

/// A group of mutually exclusive options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AlternativesDocument {
    /// Group name.
    pub alternatives: String,
    pub members: Vec<ArgDocument>,
}

/// What an argument does when recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgAction {
    /// Takes one value (the default).
    #[default]
    Value,
    Count,
    Command,
    Message,
    Help,
    Completion,
    Prompt,
}

/// Value type of `value` and `prompt` arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    /// Free text (the default).
    #[default]
    String,
    Int,
    Float,
    Bool,
    Path,
}

/// One argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArgDocument {
    pub name: String,
    pub variants: Vec<String>,
    #[serde(default)]
    pub kind: ArgAction,
    #[serde(default, rename = "type")]
    pub value_type: ValueType,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub help: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub long_help: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_var: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default)]
    pub help_level: u8,

    /// Scalar default, parsed by the value type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub multi: bool,
    /// Environment variable seeding the default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<String>,

    /// Text of a `message` argument.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Prompt shown by a `prompt` argument.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// Help level revealed by a `help` argument.
    #[serde(default)]
    pub show_level: u8,

    // Nested specification of a `command` argument
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<EntryDocument>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub prolog: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub epilog: String,
}
