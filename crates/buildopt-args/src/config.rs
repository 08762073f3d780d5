//! Parser configuration types.

use serde::{Deserialize, Serialize};

/// A switch the parser recognises.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSpec {
    /// Long name without the leading `--`.
    pub long: String,

    /// Optional single-character alias, typed as `-c`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<char>,

    /// Whether the switch consumes a value.
    #[serde(default)]
    pub takes_argument: bool,

    /// Whether a value-taking switch may be given more than once.
    #[serde(default)]
    pub repeatable: bool,

    /// Help text.
    #[serde(default)]
    pub description: String,
}

impl OptionSpec {
    /// Create a spec for a flag with no value.
    pub fn new(long: impl Into<String>) -> Self {
        Self {
            long: long.into(),
            short: None,
            takes_argument: false,
            repeatable: false,
            description: String::new(),
        }
    }

    /// Add a short alias.
    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    /// Require a value after the switch.
    pub fn has_argument(mut self) -> Self {
        self.takes_argument = true;
        self
    }

    /// Allow the switch to occur more than once, collecting every value.
    pub fn repeatable(mut self) -> Self {
        self.takes_argument = true;
        self.repeatable = true;
        self
    }

    /// Set the help text.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// The long form as typed on the command line.
    pub fn long_token(&self) -> String {
        format!("--{}", self.long)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_spec_is_flag() {
        let spec = OptionSpec::new("offline");
        assert_eq!(spec.long, "offline");
        assert!(spec.short.is_none());
        assert!(!spec.takes_argument);
        assert!(!spec.repeatable);
    }

    #[test]
    fn test_repeatable_implies_argument() {
        let spec = OptionSpec::new("exclude-task").short('x').repeatable();
        assert!(spec.takes_argument);
        assert!(spec.repeatable);
        assert_eq!(spec.short, Some('x'));
    }

    #[test]
    fn test_spec_serialization() {
        let spec = OptionSpec::new("build-file")
            .short('b')
            .has_argument()
            .description("Specify the build file.");
        let json = serde_json::to_string(&spec).unwrap();
        let parsed: OptionSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, spec);
        assert_eq!(parsed.long_token(), "--build-file");
    }
}
