//! Ordered catalog of build options.

use std::collections::HashSet;

use buildopt_args::{CommandLineParser, OptionSpec};

use crate::error::{DuplicateKind, Error, Result};
use crate::option::{BuildOption, OptionKind};

/// All options known for a settings type, in catalog order.
///
/// Built once; construction checks every option and the uniqueness of long
/// names, short names and property keys.
#[derive(Debug)]
pub struct Registry<S> {
    options: Vec<BuildOption<S>>,
}

impl<S> Registry<S> {
    pub fn new(options: Vec<BuildOption<S>>) -> Result<Self> {
        let mut long_names: HashSet<String> = HashSet::new();
        let mut short_names: HashSet<char> = HashSet::new();
        let mut property_keys: HashSet<String> = HashSet::new();

        for option in &options {
            option.validate()?;

            if let Some(command_line) = option.command_line() {
                let mut names = vec![command_line.long_name().to_string()];
                if matches!(option.kind(), OptionKind::Boolean(_)) {
                    names.push(command_line.disabled_long_name());
                }
                for name in names {
                    if !long_names.insert(name.clone()) {
                        return Err(Error::DuplicateOption {
                            kind: DuplicateKind::LongName,
                            name,
                        });
                    }
                }

                if let Some(short) = command_line.short_name() {
                    if !short_names.insert(short) {
                        return Err(Error::DuplicateOption {
                            kind: DuplicateKind::ShortName,
                            name: short.to_string(),
                        });
                    }
                }
            }

            if let Some(key) = option.property_key() {
                if !property_keys.insert(key.to_string()) {
                    return Err(Error::DuplicateOption {
                        kind: DuplicateKind::PropertyKey,
                        name: key.to_string(),
                    });
                }
            }
        }

        Ok(Self { options })
    }

    pub fn all(&self) -> &[BuildOption<S>] {
        &self.options
    }

    /// Look up an option by long name (without `--`).
    pub fn find(&self, long_name: &str) -> Option<&BuildOption<S>> {
        self.options
            .iter()
            .find(|o| o.long_name() == Some(long_name))
    }

    pub fn find_by_property(&self, key: &str) -> Option<&BuildOption<S>> {
        self.options
            .iter()
            .find(|o| o.property_key() == Some(key))
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Register every command-line option with `parser`.
    ///
    /// Boolean options also get their `--no-` form, mutually exclusive with
    /// the enabling form.
    pub fn configure_parser(&self, parser: &mut CommandLineParser) {
        for option in &self.options {
            let Some(command_line) = option.command_line() else {
                continue;
            };

            let mut spec = OptionSpec::new(command_line.long_name())
                .description(command_line.description());
            if let Some(short) = command_line.short_name() {
                spec = spec.short(short);
            }
            spec = match option.kind() {
                OptionKind::List { .. } => spec.repeatable(),
                kind if kind.takes_argument() => spec.has_argument(),
                _ => spec,
            };
            parser.option(spec);

            if matches!(option.kind(), OptionKind::Boolean(_)) {
                let disabled = command_line.disabled_long_name();
                parser.option(
                    OptionSpec::new(disabled.as_str())
                        .description(format!("Disables {}.", command_line.long_token())),
                );
                parser.allow_one_of(&[command_line.long_name(), disabled.as_str()]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::CommandLineOptionConfiguration;

    #[derive(Debug, Default)]
    struct Target {
        on: bool,
    }

    fn flag(long: &str) -> BuildOption<Target> {
        BuildOption::flag(
            CommandLineOptionConfiguration::new(long, "Test flag.").unwrap(),
            |t, _| t.on = true,
        )
    }

    fn boolean(property: Option<&str>, long: &str) -> BuildOption<Target> {
        BuildOption::boolean(
            property,
            Some(CommandLineOptionConfiguration::new(long, "Test boolean.").unwrap()),
            |t, v, _| t.on = v,
        )
    }

    #[test]
    fn test_keeps_insertion_order() {
        let registry =
            Registry::new(vec![flag("profile"), flag("offline"), flag("continue")]).unwrap();
        let names: Vec<&str> = registry.all().iter().map(|o| o.name()).collect();
        assert_eq!(names, vec!["profile", "offline", "continue"]);
        assert_eq!(registry.len(), 3);
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_duplicate_long_name() {
        let err = Registry::new(vec![flag("profile"), flag("profile")]).unwrap_err();
        assert_eq!(
            err,
            Error::DuplicateOption {
                kind: DuplicateKind::LongName,
                name: "profile".to_string(),
            }
        );
    }

    #[test]
    fn test_duplicate_short_name() {
        let a = BuildOption::flag(
            CommandLineOptionConfiguration::new("dry-run", "Dry run.")
                .unwrap()
                .with_short_name('m'),
            |t: &mut Target, _| t.on = true,
        );
        let b = BuildOption::flag(
            CommandLineOptionConfiguration::new("monitor", "Monitor.")
                .unwrap()
                .with_short_name('m'),
            |t: &mut Target, _| t.on = true,
        );
        let err = Registry::new(vec![a, b]).unwrap_err();
        assert!(matches!(
            err,
            Error::DuplicateOption {
                kind: DuplicateKind::ShortName,
                ..
            }
        ));
    }

    #[test]
    fn test_duplicate_property_key() {
        let err = Registry::new(vec![
            boolean(Some("org.gradle.caching"), "build-cache"),
            boolean(Some("org.gradle.caching"), "cache"),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            Error::DuplicateOption {
                kind: DuplicateKind::PropertyKey,
                name: "org.gradle.caching".to_string(),
            }
        );
    }

    #[test]
    fn test_disabled_form_collides_with_flag() {
        let err = Registry::new(vec![boolean(None, "rebuild"), flag("no-rebuild")]).unwrap_err();
        assert_eq!(
            err,
            Error::DuplicateOption {
                kind: DuplicateKind::LongName,
                name: "no-rebuild".to_string(),
            }
        );
    }

    #[test]
    fn test_invalid_option_rejected() {
        let unreachable: BuildOption<Target> = BuildOption::boolean(None, None, |t, v, _| t.on = v);
        let err = Registry::new(vec![unreachable]).unwrap_err();
        assert!(matches!(err, Error::InvalidDescriptor { .. }));
    }

    #[test]
    fn test_find() {
        let registry = Registry::new(vec![
            flag("offline"),
            boolean(Some("org.gradle.caching"), "build-cache"),
        ])
        .unwrap();
        assert!(registry.find("offline").is_some());
        assert!(registry.find("--offline").is_none());
        assert!(registry.find("no-build-cache").is_none());
        assert_eq!(
            registry.find_by_property("org.gradle.caching").and_then(|o| o.long_name()),
            Some("build-cache")
        );
    }

    #[test]
    fn test_configure_parser() {
        let registry = Registry::new(vec![
            flag("offline"),
            boolean(Some("org.gradle.caching"), "build-cache"),
        ])
        .unwrap();
        let mut parser = CommandLineParser::new();
        registry.configure_parser(&mut parser);

        let longs: Vec<&str> = parser.options().iter().map(|o| o.long.as_str()).collect();
        assert_eq!(longs, vec!["offline", "build-cache", "no-build-cache"]);

        let argv: Vec<String> = vec!["--build-cache".into(), "--no-build-cache".into()];
        assert!(parser.parse(&argv).is_err());
    }
}
