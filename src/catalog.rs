//! The build options that configure a [`StartParameter`].

use crate::descriptor::CommandLineOptionConfiguration as Cli;
use crate::error::Result;
use crate::option::BuildOption;
use crate::registry::Registry;
use crate::settings::{StartParameter, VERIFICATION_MODES};

pub const CONFIGURE_ON_DEMAND_PROPERTY: &str = "org.gradle.configureondemand";
pub const BUILD_CACHE_PROPERTY: &str = "org.gradle.caching";
pub const PARALLEL_PROPERTY: &str = "org.gradle.parallel";
pub const DEPENDENCY_VERIFICATION_PROPERTY: &str = "org.gradle.dependency.verification";

type StartOption = BuildOption<StartParameter>;

pub const RECOMPILE_SCRIPTS_DEPRECATION: &str =
    "Support for --recompile-scripts was deprecated and is scheduled to be removed in Gradle 5.0.";

/// Options in help order.
pub fn start_parameter_options() -> Result<Vec<StartOption>> {
    Ok(vec![
        StartOption::path(
            None,
            Some(Cli::new(
                "project-cache-dir",
                "Specify the project-specific cache directory. Defaults to .gradle in the root project directory.",
            )?),
            |s, dir, _| s.project_cache_dir = Some(dir),
        ),
        StartOption::flag(
            Cli::new("rerun-tasks", "Ignore previously cached task results.")?,
            |s, _| s.rerun_tasks = true,
        ),
        StartOption::flag(
            Cli::new("recompile-scripts", "Force build script recompiling.")?
                .with_deprecation(RECOMPILE_SCRIPTS_DEPRECATION),
            |s, _| s.recompile_scripts = true,
        ),
        StartOption::flag(
            Cli::new(
                "profile",
                "Profile build execution time and generates a report in the <build_dir>/reports/profile directory.",
            )?,
            |s, _| s.profile = true,
        ),
        StartOption::flag(
            Cli::new("continue", "Continue task execution after a task failure.")?,
            |s, _| s.continue_on_failure = true,
        ),
        StartOption::flag(
            Cli::new("offline", "Execute the build without accessing network resources.")?,
            |s, _| s.offline = true,
        ),
        StartOption::flag(
            Cli::new("refresh-dependencies", "Refresh the state of dependencies.")?,
            |s, _| s.refresh_dependencies = true,
        ),
        StartOption::flag(
            Cli::new("dry-run", "Run the builds with all task actions disabled.")?
                .with_short_name('m'),
            |s, _| s.dry_run = true,
        ),
        StartOption::flag(
            Cli::new(
                "continuous",
                "Enables continuous build. Gradle does not exit and will re-execute tasks when task file inputs change.",
            )?
            .with_short_name('t')
            .with_incubating(),
            |s, _| s.continuous = true,
        ),
        StartOption::flag(
            Cli::new("no-rebuild", "Do not rebuild project dependencies.")?.with_short_name('a'),
            |s, _| s.build_project_dependencies = false,
        ),
        StartOption::path(
            None,
            Some(Cli::new("build-file", "Specify the build file.")?.with_short_name('b')),
            |s, file, _| s.build_file = Some(file),
        ),
        StartOption::path(
            None,
            Some(Cli::new("settings-file", "Specify the settings file.")?.with_short_name('c')),
            |s, file, _| s.settings_file = Some(file),
        ),
        StartOption::path_list(
            None,
            Some(
                Cli::new("init-script", "Specify an initialization script.")?
                    .with_short_name('I'),
            ),
            |s, scripts, _| {
                for script in scripts {
                    s.add_init_script(script);
                }
            },
        ),
        StartOption::list(
            None,
            Some(
                Cli::new("exclude-task", "Specify a task to be excluded from execution.")?
                    .with_short_name('x'),
            ),
            |s, names, _| s.set_excluded_task_names(names),
        ),
        StartOption::path_list(
            None,
            Some(
                Cli::new("include-build", "Include the specified build in the composite.")?
                    .with_incubating(),
            ),
            |s, roots, _| {
                for root in roots {
                    s.include_build(root);
                }
            },
        ),
        StartOption::boolean(
            Some(CONFIGURE_ON_DEMAND_PROPERTY),
            Some(
                Cli::new(
                    "configure-on-demand",
                    "Configure necessary projects only. Gradle will attempt to reduce configuration time for large multi-project builds.",
                )?
                .with_incubating(),
            ),
            |s, enabled, _| s.configure_on_demand = enabled,
        ),
        StartOption::boolean(
            Some(BUILD_CACHE_PROPERTY),
            Some(
                Cli::new(
                    "build-cache",
                    "Enables the Gradle build cache. Gradle will try to reuse outputs from previous builds.",
                )?
                .with_incubating(),
            ),
            |s, enabled, _| s.build_cache_enabled = enabled,
        ),
        StartOption::boolean(
            None,
            Some(
                Cli::new(
                    "scan",
                    "Creates a build scan. Gradle will emit a warning if the build scan plugin has not been applied. (https://gradle.com/build-scans)",
                )?
                .with_incubating(),
            ),
            |s, enabled, _| s.set_build_scan(enabled),
        ),
        StartOption::boolean(
            Some(PARALLEL_PROPERTY),
            Some(Cli::new(
                "parallel",
                "Build projects in parallel. Gradle will attempt to determine the optimal number of executor threads to use.",
            )?),
            |s, enabled, _| s.parallel = enabled,
        ),
        StartOption::string(
            Some(DEPENDENCY_VERIFICATION_PROPERTY),
            Some(
                Cli::new(
                    "dependency-verification",
                    "Configures the dependency verification mode. Values are 'strict', 'lenient' or 'off'.",
                )?
                .with_short_name('F')
                .with_incubating(),
            ),
            |s, mode, _| s.dependency_verification = mode,
        )
        .with_choices(VERIFICATION_MODES),
    ])
}

/// The start-parameter registry.
pub fn start_parameter_registry() -> Result<Registry<StartParameter>> {
    Registry::new(start_parameter_options()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::option::KindTag;

    #[test]
    fn test_catalog_builds() {
        let registry = start_parameter_registry().unwrap();
        assert_eq!(registry.len(), 20);
        assert_eq!(registry.all()[0].name(), "project-cache-dir");
        assert_eq!(registry.all()[19].name(), "dependency-verification");
    }

    #[test]
    fn test_short_names() {
        let registry = start_parameter_registry().unwrap();
        let short = |long: &str| {
            registry
                .find(long)
                .and_then(|o| o.command_line())
                .and_then(|c| c.short_name())
        };
        assert_eq!(short("dry-run"), Some('m'));
        assert_eq!(short("continuous"), Some('t'));
        assert_eq!(short("no-rebuild"), Some('a'));
        assert_eq!(short("build-file"), Some('b'));
        assert_eq!(short("settings-file"), Some('c'));
        assert_eq!(short("init-script"), Some('I'));
        assert_eq!(short("exclude-task"), Some('x'));
        assert_eq!(short("dependency-verification"), Some('F'));
        assert_eq!(short("offline"), None);
    }

    #[test]
    fn test_property_backed_options() {
        let registry = start_parameter_registry().unwrap();
        let keyed: Vec<&str> = registry.all().iter().filter_map(|o| o.property_key()).collect();
        assert_eq!(
            keyed,
            vec![
                CONFIGURE_ON_DEMAND_PROPERTY,
                BUILD_CACHE_PROPERTY,
                PARALLEL_PROPERTY,
                DEPENDENCY_VERIFICATION_PROPERTY,
            ]
        );
        let option = registry.find_by_property(BUILD_CACHE_PROPERTY).unwrap();
        assert_eq!(option.kind().tag(), KindTag::Boolean);
    }

    #[test]
    fn test_deprecated_and_incubating() {
        let registry = start_parameter_registry().unwrap();
        let deprecated: Vec<&str> = registry
            .all()
            .iter()
            .filter(|o| o.command_line().is_some_and(|c| c.is_deprecated()))
            .map(|o| o.name())
            .collect();
        assert_eq!(deprecated, vec!["recompile-scripts"]);

        let incubating = registry
            .all()
            .iter()
            .filter(|o| o.command_line().is_some_and(|c| c.is_incubating()))
            .count();
        assert_eq!(incubating, 6);
    }
}
