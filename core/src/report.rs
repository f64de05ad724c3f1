//! Serializable snapshots of parse results.

use serde::Serialize;

use crate::spec::Specification;

/// The state of every argument after a parse.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseReport {
    /// The command entered at this level, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    pub args: Vec<ArgReport>,
    /// Claimed member per alternatives group, in declaration order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<AlternativeReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArgReport {
    pub name: String,
    pub count: i64,
    pub seen: bool,
    /// Effective values as displayed text, defaults included.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
    /// Report of the nested specification, for entered commands.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<Box<ParseReport>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlternativeReport {
    pub group: String,
    pub members: Vec<String>,
    pub claimed: Option<String>,
}

impl Specification {
    /// Snapshots the current parse state.
    ///
    /// ```
    /// use argdecl_core::{Arg, Specification};
    ///
    /// let mut spec = Specification::builder()
    ///     .arg("times", Arg::int(&["-t"]).with_default(1i64))
    ///     .build()
    ///     .unwrap();
    /// spec.parse(&["-t", "3"], "tool").unwrap();
    ///
    /// let report = spec.report();
    /// assert_eq!(report.args[0].values, vec!["3"]);
    /// assert!(report.args[0].seen);
    /// ```
    pub fn report(&self) -> ParseReport {
        let args = self
            .args()
            .map(|(name, arg)| ArgReport {
                name: name.to_string(),
                count: arg.count(),
                seen: arg.seen(),
                values: arg.display_values(),
                command: arg
                    .subcommand()
                    .filter(|_| arg.seen())
                    .map(|nested| Box::new(nested.report())),
            })
            .collect();

        let alternatives = self
            .alternative_groups()
            .map(|group| AlternativeReport {
                group: group.to_string(),
                members: self
                    .alternative_members(group)
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
                claimed: self.claimed(group).map(str::to_string),
            })
            .collect();

        ParseReport {
            command: self.entered_command().map(str::to_string),
            args,
            alternatives,
        }
    }
}
