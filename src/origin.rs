//! Where a resolved value came from.

use serde::{Deserialize, Serialize};

/// Provenance of a resolved option value.
///
/// Only used to explain a value: in reports, conflict records and error
/// messages. It never changes what gets applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum Origin {
    /// No source supplied a value; the target keeps its default.
    Unset,

    /// A command-line switch. `option` is the long name.
    CommandLine { option: String },

    /// An external property.
    Property { key: String },
}

impl Origin {
    pub fn command_line(option: impl Into<String>) -> Self {
        Origin::CommandLine {
            option: option.into(),
        }
    }

    pub fn property(key: impl Into<String>) -> Self {
        Origin::Property { key: key.into() }
    }

    pub fn is_command_line(&self) -> bool {
        matches!(self, Origin::CommandLine { .. })
    }

    /// Short label for reports.
    pub fn describe(&self) -> String {
        match self {
            Origin::Unset => "unset".to_string(),
            Origin::CommandLine { option } => format!("command line --{}", option),
            Origin::Property { key } => format!("property {}", key),
        }
    }

    /// Message for a value this source supplied that could not be used.
    pub fn invalid_value(&self, value: &str, hint: Option<&str>) -> String {
        let base = match self {
            Origin::Unset => format!("Value '{}' is invalid", value),
            Origin::CommandLine { option } => {
                format!("Argument value '{}' given for --{} option is invalid", value, option)
            }
            Origin::Property { key } => {
                format!("Value '{}' given for {} property is invalid", value, key)
            }
        };
        match hint {
            Some(hint) => format!("{} ({})", base, hint),
            None => base,
        }
    }
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.describe())
    }
}
