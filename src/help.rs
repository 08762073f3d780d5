//! Usage text and option summaries.

use serde::Serialize;

use crate::descriptor::CommandLineOptionConfiguration;
use crate::option::{BuildOption, KindTag, OptionKind};
use crate::registry::Registry;

/// Serializable view of one option.
#[derive(Debug, Clone, Serialize)]
pub struct OptionSummary<'a> {
    pub name: &'a str,
    pub kind: KindTag,
    pub path: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_key: Option<&'a str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub command_line: Option<&'a CommandLineOptionConfiguration>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub choices: Option<&'static [&'static str]>,
}

impl<'a> OptionSummary<'a> {
    pub fn of<S>(option: &'a BuildOption<S>) -> Self {
        Self {
            name: option.name(),
            kind: option.kind().tag(),
            path: option.kind().is_path(),
            property_key: option.property_key(),
            command_line: option.command_line(),
            choices: option.choices(),
        }
    }
}

pub fn summarize<S>(registry: &Registry<S>) -> Vec<OptionSummary<'_>> {
    registry.all().iter().map(OptionSummary::of).collect()
}

/// Aligned table of every command-line option, in registry order.
pub fn render_usage<S>(registry: &Registry<S>) -> String {
    let mut rows: Vec<(String, String)> = Vec::new();

    for option in registry.all() {
        let Some(command_line) = option.command_line() else {
            continue;
        };

        let mut description = command_line.description().to_string();
        if command_line.is_deprecated() {
            description.push_str(" [deprecated]");
        }
        if command_line.is_incubating() {
            description.push_str(" [incubating]");
        }
        rows.push((switch_column(option, command_line), description));

        if matches!(option.kind(), OptionKind::Boolean(_)) {
            rows.push((
                format!("    --{}", command_line.disabled_long_name()),
                format!("Disables option {}.", command_line.long_token()),
            ));
        }
    }

    let width = rows.iter().map(|(s, _)| s.len()).max().unwrap_or(0);
    let mut output = String::new();
    for (switches, description) in rows {
        output.push_str(&format!("{:<width$}  {}\n", switches, description, width = width));
    }
    output
}

/// Detail for one option.
pub fn render_option<S>(option: &BuildOption<S>) -> String {
    let mut output = format!("{} ({})\n", option.display_name(), option.kind().tag());

    if let Some(command_line) = option.command_line() {
        output.push_str(&format!("  {}\n", command_line.description()));
        output.push_str(&format!("  Usage: {}\n", switch_column(option, command_line).trim()));
        if matches!(option.kind(), OptionKind::Boolean(_)) {
            output.push_str(&format!("  Disable with: --{}\n", command_line.disabled_long_name()));
        }
        if let Some(message) = command_line.deprecation() {
            output.push_str(&format!("  Deprecated: {}\n", message));
        }
        if command_line.is_incubating() {
            output.push_str("  Incubating: yes\n");
        }
    }
    if let Some(key) = option.property_key() {
        output.push_str(&format!("  Property: {}\n", key));
    }
    if let Some(choices) = option.choices() {
        output.push_str(&format!("  Values: {}\n", choices.join(", ")));
    }
    if option.kind().tag() == KindTag::List {
        output.push_str("  May be given more than once.\n");
    }

    output
}

fn switch_column<S>(
    option: &BuildOption<S>,
    command_line: &CommandLineOptionConfiguration,
) -> String {
    let mut column = match command_line.short_token() {
        Some(short) => format!("{}, {}", short, command_line.long_token()),
        None => format!("    {}", command_line.long_token()),
    };
    if let Some(placeholder) = placeholder(option) {
        column.push(' ');
        column.push_str(&placeholder);
    }
    column
}

fn placeholder<S>(option: &BuildOption<S>) -> Option<String> {
    if !option.kind().takes_argument() {
        return None;
    }
    Some(match option.choices() {
        Some(choices) => format!("<{}>", choices.join("|")),
        None if option.kind().is_path() => "<path>".to_string(),
        None => "<value>".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::start_parameter_registry;

    #[test]
    fn test_usage_lists_command_line_options() {
        let registry = start_parameter_registry().unwrap();
        let usage = render_usage(&registry);

        assert!(usage.contains("-m, --dry-run"));
        assert!(usage.contains("    --offline"));
        assert!(usage.contains("-b, --build-file <path>"));
        assert!(usage.contains("-F, --dependency-verification <strict|lenient|off>"));
        assert!(usage.contains("--no-build-cache"));
        assert!(!usage.contains("--no-offline"));
    }

    #[test]
    fn test_usage_annotations() {
        let registry = start_parameter_registry().unwrap();
        let usage = render_usage(&registry);
        let line = |needle: &str| usage.lines().find(|l| l.contains(needle)).unwrap().to_string();

        assert!(line("--recompile-scripts").ends_with("[deprecated]"));
        assert!(line("--include-build").ends_with("[incubating]"));
        assert!(!line("--offline").contains('['));
    }

    #[test]
    fn test_usage_order_follows_registry() {
        let registry = start_parameter_registry().unwrap();
        let usage = render_usage(&registry);
        let first = usage.find("--project-cache-dir").unwrap();
        let last = usage.find("--dependency-verification").unwrap();
        assert!(first < last);
    }

    #[test]
    fn test_render_option() {
        let registry = start_parameter_registry().unwrap();
        let text = render_option(registry.find("build-cache").unwrap());
        assert!(text.starts_with("--build-cache (boolean)"));
        assert!(text.contains("Disable with: --no-build-cache"));
        assert!(text.contains("Property: org.gradle.caching"));
        assert!(text.contains("Incubating: yes"));

        let text = render_option(registry.find("recompile-scripts").unwrap());
        assert!(text.contains("Deprecated: Support for --recompile-scripts"));
    }

    #[test]
    fn test_summaries_serialize() {
        let registry = start_parameter_registry().unwrap();
        let json = serde_json::to_value(summarize(&registry)).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 20);
        assert_eq!(json[0]["name"], "project-cache-dir");
        assert_eq!(json[0]["path"], true);
        assert_eq!(json[19]["choices"], serde_json::json!(["strict", "lenient", "off"]));
    }
}
