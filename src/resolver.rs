//! Resolution of build options from the command line and properties.
//!
//! A pass runs in two steps. [`Resolver::plan`] parses every exercised option
//! into a [`Resolution`] without touching the target; [`Resolution::apply_to`]
//! then applies the whole plan. A value that fails to parse aborts the pass
//! before anything is applied.

use serde::{Deserialize, Serialize};

use crate::diagnostics::{DiagnosticsSink, Notice};
use crate::error::Result;
use crate::option::{BuildOption, KindTag, OptionKind, ResolvedValue};
use crate::origin::Origin;
use crate::paths::PathResolver;
use crate::registry::Registry;
use crate::source::{ArgumentSource, PropertySource, Switch};

/// One option's staged value.
#[derive(Debug)]
pub struct Resolved<'r, S> {
    option: &'r BuildOption<S>,
    value: ResolvedValue,
    origin: Origin,
}

impl<'r, S> Resolved<'r, S> {
    pub fn option(&self) -> &'r BuildOption<S> {
        self.option
    }

    pub fn value(&self) -> &ResolvedValue {
        &self.value
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }
}

/// A property value that lost to the command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Override {
    pub option: String,
    pub used: Origin,
    pub ignored: Origin,
    pub ignored_value: String,
}

/// A validated plan for one pass, in registry order.
#[derive(Debug)]
pub struct Resolution<'r, S> {
    entries: Vec<Resolved<'r, S>>,
    overrides: Vec<Override>,
}

impl<'r, S> Resolution<'r, S> {
    pub fn entries(&self) -> &[Resolved<'r, S>] {
        &self.entries
    }

    pub fn overrides(&self) -> &[Override] {
        &self.overrides
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Staged entry for an option, by long name or property key.
    pub fn get(&self, name: &str) -> Option<&Resolved<'r, S>> {
        self.entries.iter().find(|e| e.option.name() == name)
    }

    /// Where the option's value comes from in this plan.
    pub fn origin_of(&self, name: &str) -> Origin {
        self.get(name)
            .map(|e| e.origin.clone())
            .unwrap_or(Origin::Unset)
    }

    /// Apply every staged value and emit notices for exercised options.
    pub fn apply_to(
        self,
        target: &mut S,
        diagnostics: &mut dyn DiagnosticsSink,
    ) -> Result<ResolutionReport> {
        let mut report = ResolutionReport {
            applied: Vec::with_capacity(self.entries.len()),
            overrides: self.overrides,
            notices: Vec::new(),
        };

        for entry in self.entries {
            let option = entry.option;
            report.applied.push(AppliedOption {
                option: option.name().to_string(),
                kind: option.kind().tag(),
                origin: entry.origin.clone(),
                value: entry.value.to_json(),
            });
            option.apply_to(entry.value, target, &entry.origin)?;

            if let Some(command_line) = option.command_line() {
                if let Some(message) = command_line.deprecation() {
                    report
                        .notices
                        .push(Notice::deprecation(option.display_name(), message));
                }
                if command_line.is_incubating() {
                    report.notices.push(Notice::incubating(option.display_name()));
                }
            }
        }

        for notice in &report.notices {
            diagnostics.notify(notice.clone());
        }

        Ok(report)
    }
}

/// An option applied during a pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedOption {
    pub option: String,
    pub kind: KindTag,
    pub origin: Origin,
    pub value: serde_json::Value,
}

/// What a successful pass did.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolutionReport {
    pub applied: Vec<AppliedOption>,
    pub overrides: Vec<Override>,
    pub notices: Vec<Notice>,
}

impl ResolutionReport {
    pub fn origin_of(&self, name: &str) -> Origin {
        self.applied
            .iter()
            .find(|a| a.option == name)
            .map(|a| a.origin.clone())
            .unwrap_or(Origin::Unset)
    }

    pub fn is_empty(&self) -> bool {
        self.applied.is_empty()
    }
}

/// Resolves options against a path resolver and a diagnostics sink.
pub struct Resolver<'a> {
    paths: &'a dyn PathResolver,
    diagnostics: &'a mut dyn DiagnosticsSink,
}

impl<'a> Resolver<'a> {
    pub fn new(paths: &'a dyn PathResolver, diagnostics: &'a mut dyn DiagnosticsSink) -> Self {
        Self { paths, diagnostics }
    }

    /// Parse every exercised option without touching any target.
    ///
    /// When an option is given on the command line and through its property,
    /// the command line wins and the property value is not parsed.
    pub fn plan<'r, S>(
        &self,
        registry: &'r Registry<S>,
        args: &dyn ArgumentSource,
        properties: &dyn PropertySource,
    ) -> Result<Resolution<'r, S>> {
        let mut entries = Vec::new();
        let mut overrides = Vec::new();

        for option in registry.all() {
            let switches = matching_switches(option, args);
            let property = option
                .property_key()
                .and_then(|key| properties.get(key).map(|raw| (key, raw)));

            let (value, origin) = match (switches.is_empty(), property) {
                (true, None) => continue,
                (false, property) => {
                    let origin = Origin::command_line(option.name());
                    let value = option.value_from_command_line(&switches, &origin, self.paths)?;
                    if let Some((key, raw)) = property {
                        tracing::debug!(
                            option = %option.name(),
                            property = %key,
                            "command line overrides property value '{}'",
                            raw
                        );
                        overrides.push(Override {
                            option: option.name().to_string(),
                            used: origin.clone(),
                            ignored: Origin::property(key),
                            ignored_value: raw.to_string(),
                        });
                    }
                    (value, origin)
                }
                (true, Some((key, raw))) => {
                    let origin = Origin::property(key);
                    let value = option.value_from_property(raw, &origin, self.paths)?;
                    (value, origin)
                }
            };

            tracing::trace!(option = %option.name(), origin = %origin, "resolved");
            entries.push(Resolved {
                option,
                value,
                origin,
            });
        }

        Ok(Resolution { entries, overrides })
    }

    /// Resolve all options in `registry` onto `target`.
    ///
    /// On error the target is left exactly as it was.
    pub fn resolve<S>(
        &mut self,
        registry: &Registry<S>,
        args: &dyn ArgumentSource,
        properties: &dyn PropertySource,
        target: &mut S,
    ) -> Result<ResolutionReport> {
        let resolution = self.plan(registry, args, properties)?;
        resolution.apply_to(target, &mut *self.diagnostics)
    }
}

/// Switch occurrences belonging to `option`, in command-line order.
fn matching_switches<'s, S>(
    option: &BuildOption<S>,
    args: &'s dyn ArgumentSource,
) -> Vec<&'s Switch> {
    let Some(command_line) = option.command_line() else {
        return Vec::new();
    };
    let boolean = matches!(option.kind(), OptionKind::Boolean(_));

    args.switches()
        .iter()
        .filter(|s| {
            command_line.matches_token(&s.token)
                || (boolean && command_line.matches_disabled_token(&s.token))
        })
        .collect()
}
