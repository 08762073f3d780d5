//! Build options: a closed set of kinds, each with its own parsing and apply
//! behavior.
//!
//! Options are catalog entries built once at startup. Apply routines are
//! plain `fn` pointers over the settings type `S`, so a registry is `Send +
//! Sync` whatever `S` is.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::descriptor::{CommandLineOptionConfiguration, Multiplicity};
use crate::error::{Error, Result};
use crate::origin::Origin;
use crate::paths::PathResolver;
use crate::source::Switch;

pub type FlagApply<S> = fn(&mut S, &Origin);
pub type BooleanApply<S> = fn(&mut S, bool, &Origin);
pub type TextApply<S> = fn(&mut S, String, &Origin);
pub type PathApply<S> = fn(&mut S, PathBuf, &Origin);
pub type TextListApply<S> = fn(&mut S, Vec<String>, &Origin);
pub type PathListApply<S> = fn(&mut S, Vec<PathBuf>, &Origin);

/// Default separator for list values given as a single property.
pub const DEFAULT_LIST_DELIMITER: char = ',';

/// What a string option hands to the target.
pub enum StringApply<S> {
    Text(TextApply<S>),
    Path(PathApply<S>),
}

/// What a list option hands to the target.
pub enum ListApply<S> {
    Text(TextListApply<S>),
    Path(PathListApply<S>),
}

/// The four option kinds.
pub enum OptionKind<S> {
    /// Presence-only switch. Applying it always enables the effect.
    FlagOnly(FlagApply<S>),

    /// `--name` / `--no-name`, or a `true`/`false` property.
    Boolean(BooleanApply<S>),

    /// One value. `choices`, when set, is the closed set of accepted values
    /// (matched case-insensitively).
    String {
        apply: StringApply<S>,
        choices: Option<&'static [&'static str]>,
    },

    /// One entry per switch occurrence, or a delimited property value.
    List { apply: ListApply<S>, delimiter: char },
}

impl<S> OptionKind<S> {
    pub fn tag(&self) -> KindTag {
        match self {
            OptionKind::FlagOnly(_) => KindTag::FlagOnly,
            OptionKind::Boolean(_) => KindTag::Boolean,
            OptionKind::String { .. } => KindTag::String,
            OptionKind::List { .. } => KindTag::List,
        }
    }

    /// Whether values are filesystem locations.
    pub fn is_path(&self) -> bool {
        matches!(
            self,
            OptionKind::String {
                apply: StringApply::Path(_),
                ..
            } | OptionKind::List {
                apply: ListApply::Path(_),
                ..
            }
        )
    }

    /// Whether the switch consumes a value on the command line.
    pub fn takes_argument(&self) -> bool {
        matches!(self, OptionKind::String { .. } | OptionKind::List { .. })
    }
}

impl<S> fmt::Debug for OptionKind<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionKind::String { choices, .. } => f
                .debug_struct("String")
                .field("path", &self.is_path())
                .field("choices", choices)
                .finish(),
            OptionKind::List { delimiter, .. } => f
                .debug_struct("List")
                .field("path", &self.is_path())
                .field("delimiter", delimiter)
                .finish(),
            other => write!(f, "{}", other.tag()),
        }
    }
}

/// Kind without behavior, for help output and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KindTag {
    FlagOnly,
    Boolean,
    String,
    List,
}

impl fmt::Display for KindTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KindTag::FlagOnly => "flag",
            KindTag::Boolean => "boolean",
            KindTag::String => "string",
            KindTag::List => "list",
        };
        f.write_str(name)
    }
}

/// A parsed value, ready to apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedValue {
    Enabled,
    Bool(bool),
    Text(String),
    Path(PathBuf),
    Texts(Vec<String>),
    Paths(Vec<PathBuf>),
}

impl ResolvedValue {
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value;
        match self {
            ResolvedValue::Enabled => Value::Bool(true),
            ResolvedValue::Bool(b) => Value::Bool(*b),
            ResolvedValue::Text(s) => Value::String(s.clone()),
            ResolvedValue::Path(p) => Value::String(p.display().to_string()),
            ResolvedValue::Texts(v) => Value::Array(v.iter().cloned().map(Value::String).collect()),
            ResolvedValue::Paths(v) => Value::Array(
                v.iter()
                    .map(|p| Value::String(p.display().to_string()))
                    .collect(),
            ),
        }
    }
}

impl fmt::Display for ResolvedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedValue::Enabled => f.write_str("enabled"),
            ResolvedValue::Bool(b) => write!(f, "{}", b),
            ResolvedValue::Text(s) => f.write_str(s),
            ResolvedValue::Path(p) => write!(f, "{}", p.display()),
            ResolvedValue::Texts(v) => f.write_str(&v.join(", ")),
            ResolvedValue::Paths(v) => {
                let parts: Vec<String> = v.iter().map(|p| p.display().to_string()).collect();
                f.write_str(&parts.join(", "))
            }
        }
    }
}

/// A configurable build option.
pub struct BuildOption<S> {
    property_key: Option<String>,
    command_line: Option<CommandLineOptionConfiguration>,
    kind: OptionKind<S>,
}

impl<S> fmt::Debug for BuildOption<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildOption")
            .field("property_key", &self.property_key)
            .field("command_line", &self.command_line)
            .field("kind", &self.kind)
            .finish()
    }
}

impl<S> BuildOption<S> {
    fn new(
        property_key: Option<&str>,
        command_line: Option<CommandLineOptionConfiguration>,
        kind: OptionKind<S>,
    ) -> Self {
        Self {
            property_key: property_key.map(str::to_string),
            command_line,
            kind,
        }
    }

    /// Command-line-only switch that enables something when present.
    pub fn flag(command_line: CommandLineOptionConfiguration, apply: FlagApply<S>) -> Self {
        Self::new(None, Some(command_line), OptionKind::FlagOnly(apply))
    }

    pub fn boolean(
        property_key: Option<&str>,
        command_line: Option<CommandLineOptionConfiguration>,
        apply: BooleanApply<S>,
    ) -> Self {
        Self::new(property_key, command_line, OptionKind::Boolean(apply))
    }

    pub fn string(
        property_key: Option<&str>,
        command_line: Option<CommandLineOptionConfiguration>,
        apply: TextApply<S>,
    ) -> Self {
        let kind = OptionKind::String {
            apply: StringApply::Text(apply),
            choices: None,
        };
        Self::new(property_key, command_line, kind)
    }

    /// String option whose value is a filesystem location.
    pub fn path(
        property_key: Option<&str>,
        command_line: Option<CommandLineOptionConfiguration>,
        apply: PathApply<S>,
    ) -> Self {
        let kind = OptionKind::String {
            apply: StringApply::Path(apply),
            choices: None,
        };
        Self::new(property_key, command_line, kind)
    }

    /// Repeatable option. The descriptor is made repeatable.
    pub fn list(
        property_key: Option<&str>,
        command_line: Option<CommandLineOptionConfiguration>,
        apply: TextListApply<S>,
    ) -> Self {
        let kind = OptionKind::List {
            apply: ListApply::Text(apply),
            delimiter: DEFAULT_LIST_DELIMITER,
        };
        Self::new(property_key, command_line.map(|c| c.repeatable()), kind)
    }

    /// Repeatable option whose entries are filesystem locations.
    pub fn path_list(
        property_key: Option<&str>,
        command_line: Option<CommandLineOptionConfiguration>,
        apply: PathListApply<S>,
    ) -> Self {
        let kind = OptionKind::List {
            apply: ListApply::Path(apply),
            delimiter: DEFAULT_LIST_DELIMITER,
        };
        Self::new(property_key, command_line.map(|c| c.repeatable()), kind)
    }

    /// Restrict a string option to a closed set of values. No effect on
    /// other kinds.
    pub fn with_choices(mut self, values: &'static [&'static str]) -> Self {
        if let OptionKind::String { choices, .. } = &mut self.kind {
            *choices = Some(values);
        }
        self
    }

    /// Separator for property-sourced list values. No effect on other kinds.
    pub fn with_delimiter(mut self, separator: char) -> Self {
        if let OptionKind::List { delimiter, .. } = &mut self.kind {
            *delimiter = separator;
        }
        self
    }

    pub fn property_key(&self) -> Option<&str> {
        self.property_key.as_deref()
    }

    pub fn command_line(&self) -> Option<&CommandLineOptionConfiguration> {
        self.command_line.as_ref()
    }

    pub fn kind(&self) -> &OptionKind<S> {
        &self.kind
    }

    pub fn long_name(&self) -> Option<&str> {
        self.command_line.as_ref().map(|c| c.long_name())
    }

    /// Long name when exposed on the command line, otherwise the property key.
    pub fn name(&self) -> &str {
        self.long_name()
            .or(self.property_key.as_deref())
            .unwrap_or_default()
    }

    /// `--long` when exposed on the command line, otherwise the property key.
    pub fn display_name(&self) -> String {
        match &self.command_line {
            Some(c) => c.long_token(),
            None => self.name().to_string(),
        }
    }

    pub fn choices(&self) -> Option<&'static [&'static str]> {
        match &self.kind {
            OptionKind::String { choices, .. } => *choices,
            _ => None,
        }
    }

    /// Check the option's own invariants.
    pub fn validate(&self) -> Result<()> {
        if self.property_key.is_none() && self.command_line.is_none() {
            return Err(Error::invalid_descriptor(
                "<unnamed>",
                "option needs a property key or a command-line descriptor",
            ));
        }

        if let Some(key) = &self.property_key {
            if key.trim().is_empty() || key.chars().any(char::is_whitespace) {
                return Err(Error::invalid_descriptor(
                    self.name(),
                    format!("property key '{}' must be non-empty without whitespace", key),
                ));
            }
        }

        if let Some(command_line) = &self.command_line {
            command_line.validate()?;
        }

        match &self.kind {
            OptionKind::FlagOnly(_) => {
                if self.command_line.is_none() || self.property_key.is_some() {
                    return Err(Error::invalid_descriptor(
                        self.name(),
                        "flag options are command-line only",
                    ));
                }
            }
            OptionKind::String {
                choices: Some(values),
                ..
            } if values.is_empty() => {
                return Err(Error::invalid_descriptor(self.name(), "choices must not be empty"));
            }
            OptionKind::List { delimiter, .. } if delimiter.is_whitespace() => {
                return Err(Error::invalid_descriptor(
                    self.name(),
                    "list delimiter must not be whitespace",
                ));
            }
            _ => {}
        }

        let repeatable = self
            .command_line
            .as_ref()
            .is_some_and(|c| c.multiplicity() == Multiplicity::Repeatable);
        let is_list = matches!(self.kind, OptionKind::List { .. });
        if repeatable != is_list && self.command_line.is_some() {
            return Err(Error::invalid_descriptor(
                self.name(),
                "only list options may be repeatable",
            ));
        }

        Ok(())
    }

    /// Parse the switch occurrences that matched this option.
    ///
    /// `switches` must be non-empty and in command-line order.
    pub(crate) fn value_from_command_line(
        &self,
        switches: &[&Switch],
        origin: &Origin,
        paths: &dyn PathResolver,
    ) -> Result<ResolvedValue> {
        match &self.kind {
            OptionKind::FlagOnly(_) => Ok(ResolvedValue::Enabled),
            OptionKind::Boolean(_) => {
                let enabled = switches.last().map_or(true, |last| {
                    self.command_line
                        .as_ref()
                        .map_or(true, |c| !c.matches_disabled_token(&last.token))
                });
                Ok(ResolvedValue::Bool(enabled))
            }
            OptionKind::String { apply, choices } => {
                let raw = switches
                    .last()
                    .and_then(|s| s.value.as_deref())
                    .ok_or_else(|| self.invalid(origin, "", Some("a value is required")))?;
                self.string_value(apply, *choices, raw, origin, paths)
            }
            OptionKind::List { apply, .. } => {
                let mut raw = Vec::with_capacity(switches.len());
                for switch in switches {
                    let value = switch
                        .value
                        .as_deref()
                        .ok_or_else(|| self.invalid(origin, "", Some("a value is required")))?;
                    if value.trim().is_empty() {
                        return Err(self.invalid(origin, value, Some("entries must not be empty")));
                    }
                    raw.push(value);
                }
                Ok(Self::list_value(apply, raw, paths))
            }
        }
    }

    /// Parse the raw property value for this option.
    pub(crate) fn value_from_property(
        &self,
        raw: &str,
        origin: &Origin,
        paths: &dyn PathResolver,
    ) -> Result<ResolvedValue> {
        match &self.kind {
            // Flags have no property form; validate() keeps this unreachable
            // for registered options.
            OptionKind::FlagOnly(_) => {
                Err(self.invalid(origin, raw, Some("not settable by property")))
            }
            OptionKind::Boolean(_) => parse_boolean(raw)
                .map(ResolvedValue::Bool)
                .ok_or_else(|| self.invalid(origin, raw, Some("must be 'true' or 'false'"))),
            OptionKind::String { apply, choices } => {
                self.string_value(apply, *choices, raw, origin, paths)
            }
            OptionKind::List { apply, delimiter } => {
                let mut entries = Vec::new();
                for entry in raw.split(*delimiter) {
                    let entry = entry.trim();
                    if entry.is_empty() {
                        return Err(self.invalid(
                            origin,
                            raw,
                            Some("list entries must not be empty"),
                        ));
                    }
                    entries.push(entry);
                }
                Ok(Self::list_value(apply, entries, paths))
            }
        }
    }

    /// Hand a resolved value to the target.
    pub fn apply_to(&self, value: ResolvedValue, target: &mut S, origin: &Origin) -> Result<()> {
        match (&self.kind, value) {
            (OptionKind::FlagOnly(apply), ResolvedValue::Enabled) => apply(target, origin),
            (OptionKind::Boolean(apply), ResolvedValue::Bool(v)) => apply(target, v, origin),
            (
                OptionKind::String {
                    apply: StringApply::Text(apply),
                    ..
                },
                ResolvedValue::Text(v),
            ) => apply(target, v, origin),
            (
                OptionKind::String {
                    apply: StringApply::Path(apply),
                    ..
                },
                ResolvedValue::Path(v),
            ) => apply(target, v, origin),
            (
                OptionKind::List {
                    apply: ListApply::Text(apply),
                    ..
                },
                ResolvedValue::Texts(v),
            ) => apply(target, v, origin),
            (
                OptionKind::List {
                    apply: ListApply::Path(apply),
                    ..
                },
                ResolvedValue::Paths(v),
            ) => apply(target, v, origin),
            _ => {
                return Err(Error::ValueKindMismatch {
                    option: self.name().to_string(),
                })
            }
        }
        Ok(())
    }

    fn string_value(
        &self,
        apply: &StringApply<S>,
        choices: Option<&'static [&'static str]>,
        raw: &str,
        origin: &Origin,
        paths: &dyn PathResolver,
    ) -> Result<ResolvedValue> {
        if raw.trim().is_empty() {
            return Err(self.invalid(origin, raw, Some("value must not be empty")));
        }

        let value = match choices {
            Some(values) => values
                .iter()
                .find(|v| v.eq_ignore_ascii_case(raw.trim()))
                .map(|v| v.to_string())
                .ok_or_else(|| {
                    let hint = format!("must be one of {}", values.join(", "));
                    self.invalid(origin, raw, Some(hint.as_str()))
                })?,
            None => raw.to_string(),
        };

        Ok(match apply {
            StringApply::Text(_) => ResolvedValue::Text(value),
            StringApply::Path(_) => ResolvedValue::Path(paths.resolve(&value)),
        })
    }

    fn list_value(apply: &ListApply<S>, raw: Vec<&str>, paths: &dyn PathResolver) -> ResolvedValue {
        match apply {
            ListApply::Text(_) => {
                ResolvedValue::Texts(raw.into_iter().map(str::to_string).collect())
            }
            ListApply::Path(_) => {
                ResolvedValue::Paths(raw.into_iter().map(|r| paths.resolve(r)).collect())
            }
        }
    }

    fn invalid(&self, origin: &Origin, value: &str, hint: Option<&str>) -> Error {
        let option = match origin {
            Origin::Property { key } => key.clone(),
            _ => self.name().to_string(),
        };
        Error::InvalidValue {
            option,
            value: value.to_string(),
            message: origin.invalid_value(value, hint),
        }
    }
}

/// `true` / `false`, case-insensitive, surrounding whitespace ignored.
pub fn parse_boolean(raw: &str) -> Option<bool> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}
