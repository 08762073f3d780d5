//! Parser result types.

use serde::{Deserialize, Serialize};

/// One recognised switch occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Switch {
    /// Canonical long name of the matched spec.
    pub option: String,

    /// The switch as typed, e.g. `--build-file` or `-b`.
    pub token: String,

    /// The value, for switches that take one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Switch {
    /// Create a switch occurrence.
    pub fn new(option: impl Into<String>, token: impl Into<String>, value: Option<String>) -> Self {
        Self {
            option: option.into(),
            token: token.into(),
            value,
        }
    }
}

/// A parsed command line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedCommandLine {
    /// Switches in the order they appeared.
    pub switches: Vec<Switch>,

    /// Bare words and everything after `--`.
    pub extra_arguments: Vec<String>,
}

impl ParsedCommandLine {
    /// Whether the option with this long name was given at all.
    pub fn has_option(&self, long: &str) -> bool {
        self.switches.iter().any(|s| s.option == long)
    }

    /// Every value given for the option, in command-line order.
    pub fn values(&self, long: &str) -> Vec<&str> {
        self.switches
            .iter()
            .filter(|s| s.option == long)
            .filter_map(|s| s.value.as_deref())
            .collect()
    }

    /// The single value given for the option.
    pub fn value(&self, long: &str) -> Option<&str> {
        self.values(long).last().copied()
    }
}

/// Command-line parse failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Unknown command-line option '{0}'.")]
    UnknownOption(String),

    #[error("No argument was provided for command-line option '{0}'.")]
    MissingArgument(String),

    #[error("Command-line option '{option}' does not take an argument (got '{value}').")]
    UnexpectedArgument { option: String, value: String },

    #[error("Multiple arguments were provided for command-line option '{0}'.")]
    MultipleValues(String),

    #[error("Command-line options '{first}' and '{second}' cannot be used together.")]
    MutuallyExclusive { first: String, second: String },
}
