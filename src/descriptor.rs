//! Command-line exposure of a build option.

use std::sync::OnceLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Long names are lowercase kebab-case: `build-cache`, `init-script`.
const LONG_NAME_PATTERN: &str = r"^[a-z0-9]+(-[a-z0-9]+)*$";

/// Prefix of the disabling form of a boolean switch.
pub const DISABLED_PREFIX: &str = "no-";

/// How many times a switch may contribute a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Multiplicity {
    Single,
    Repeatable,
}

/// Immutable metadata for a single command-line switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandLineOptionConfiguration {
    long_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    short_name: Option<char>,

    description: String,

    /// Presence marks the switch as deprecated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    deprecation: Option<String>,

    #[serde(default)]
    incubating: bool,

    multiplicity: Multiplicity,
}

impl CommandLineOptionConfiguration {
    /// Create a single-valued descriptor.
    ///
    /// Fails with `InvalidDescriptor` when the long name is not kebab-case or
    /// the description is blank.
    pub fn new(long_name: impl Into<String>, description: impl Into<String>) -> Result<Self> {
        let descriptor = Self {
            long_name: long_name.into(),
            short_name: None,
            description: description.into(),
            deprecation: None,
            incubating: false,
            multiplicity: Multiplicity::Single,
        };
        descriptor.validate_names()?;
        Ok(descriptor)
    }

    pub fn with_short_name(mut self, short_name: char) -> Self {
        self.short_name = Some(short_name);
        self
    }

    pub fn with_deprecation(mut self, message: impl Into<String>) -> Self {
        self.deprecation = Some(message.into());
        self
    }

    pub fn with_incubating(mut self) -> Self {
        self.incubating = true;
        self
    }

    pub fn repeatable(mut self) -> Self {
        self.multiplicity = Multiplicity::Repeatable;
        self
    }

    pub fn long_name(&self) -> &str {
        &self.long_name
    }

    pub fn short_name(&self) -> Option<char> {
        self.short_name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn deprecation(&self) -> Option<&str> {
        self.deprecation.as_deref()
    }

    pub fn is_deprecated(&self) -> bool {
        self.deprecation.is_some()
    }

    pub fn is_incubating(&self) -> bool {
        self.incubating
    }

    pub fn multiplicity(&self) -> Multiplicity {
        self.multiplicity
    }

    /// `--<long>`
    pub fn long_token(&self) -> String {
        format!("--{}", self.long_name)
    }

    /// `-<short>`, when there is a short name.
    pub fn short_token(&self) -> Option<String> {
        self.short_name.map(|c| format!("-{}", c))
    }

    /// Long name of the disabling form, `no-<long>`.
    pub fn disabled_long_name(&self) -> String {
        format!("{}{}", DISABLED_PREFIX, self.long_name)
    }

    /// True if `token` is `--<long>` or `-<short>`.
    pub fn matches_token(&self, token: &str) -> bool {
        if let Some(long) = token.strip_prefix("--") {
            return long == self.long_name;
        }
        match (token.strip_prefix('-'), self.short_name) {
            (Some(short), Some(c)) => {
                let mut chars = short.chars();
                chars.next() == Some(c) && chars.next().is_none()
            }
            _ => false,
        }
    }

    /// True if `token` is `--no-<long>`.
    pub fn matches_disabled_token(&self, token: &str) -> bool {
        token
            .strip_prefix("--")
            .and_then(|t| t.strip_prefix(DISABLED_PREFIX))
            .is_some_and(|long| long == self.long_name)
    }

    /// Full check, run again when a registry is built.
    pub fn validate(&self) -> Result<()> {
        self.validate_names()?;

        if let Some(c) = self.short_name {
            if !c.is_ascii_alphanumeric() {
                return Err(Error::invalid_descriptor(
                    &self.long_name,
                    format!("short name '{}' must be an ASCII letter or digit", c),
                ));
            }
        }

        if matches!(&self.deprecation, Some(message) if message.trim().is_empty()) {
            return Err(Error::invalid_descriptor(
                &self.long_name,
                "deprecation message must not be empty",
            ));
        }

        Ok(())
    }

    fn validate_names(&self) -> Result<()> {
        if self.long_name.is_empty() {
            return Err(Error::invalid_descriptor("", "long name must not be empty"));
        }

        if !long_name_pattern()?.is_match(&self.long_name) {
            return Err(Error::invalid_descriptor(
                &self.long_name,
                "long name must be lowercase kebab-case",
            ));
        }

        if self.description.trim().is_empty() {
            return Err(Error::invalid_descriptor(
                &self.long_name,
                "description must not be empty",
            ));
        }

        Ok(())
    }
}

/// Long-name pattern, compiled on first use.
fn long_name_pattern() -> Result<&'static Regex> {
    static PATTERN: OnceLock<std::result::Result<Regex, String>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(LONG_NAME_PATTERN).map_err(|e| e.to_string()))
        .as_ref()
        .map_err(|e| Error::invalid_descriptor(LONG_NAME_PATTERN, e.clone()))
}
