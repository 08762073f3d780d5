//! Start parameters of a build invocation.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Dependency verification modes.
pub const VERIFICATION_MODES: &[&str] = &["strict", "lenient", "off"];

/// Settings for one build invocation. Every field starts at its default and
/// is changed only by the option that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartParameter {
    pub current_dir: PathBuf,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_cache_dir: Option<PathBuf>,

    pub rerun_tasks: bool,
    pub recompile_scripts: bool,
    pub profile: bool,
    pub continue_on_failure: bool,
    pub offline: bool,
    pub refresh_dependencies: bool,
    pub dry_run: bool,
    pub continuous: bool,
    pub build_project_dependencies: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_file: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings_file: Option<PathBuf>,

    pub init_scripts: Vec<PathBuf>,
    pub excluded_task_names: Vec<String>,
    pub included_builds: Vec<PathBuf>,
    pub configure_on_demand: bool,
    pub build_cache_enabled: bool,
    pub build_scan: bool,
    pub no_build_scan: bool,
    pub parallel: bool,
    pub dependency_verification: String,
}

impl StartParameter {
    pub fn new(current_dir: impl Into<PathBuf>) -> Self {
        Self {
            current_dir: current_dir.into(),
            project_cache_dir: None,
            rerun_tasks: false,
            recompile_scripts: false,
            profile: false,
            continue_on_failure: false,
            offline: false,
            refresh_dependencies: false,
            dry_run: false,
            continuous: false,
            build_project_dependencies: true,
            build_file: None,
            settings_file: None,
            init_scripts: Vec::new(),
            excluded_task_names: Vec::new(),
            included_builds: Vec::new(),
            configure_on_demand: false,
            build_cache_enabled: false,
            build_scan: false,
            no_build_scan: false,
            parallel: false,
            dependency_verification: "strict".to_string(),
        }
    }

    pub fn current_dir(&self) -> &Path {
        &self.current_dir
    }

    pub fn add_init_script(&mut self, script: PathBuf) {
        self.init_scripts.push(script);
    }

    pub fn include_build(&mut self, root: PathBuf) {
        self.included_builds.push(root);
    }

    pub fn set_excluded_task_names(&mut self, names: Vec<String>) {
        self.excluded_task_names = names;
    }

    /// `--scan` and `--no-scan` set separate fields; the other stays false.
    pub fn set_build_scan(&mut self, enabled: bool) {
        if enabled {
            self.build_scan = true;
        } else {
            self.no_build_scan = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = StartParameter::new("/proj");
        assert_eq!(params.current_dir(), Path::new("/proj"));
        assert!(params.build_project_dependencies);
        assert!(!params.offline);
        assert!(!params.build_cache_enabled);
        assert!(params.init_scripts.is_empty());
        assert_eq!(params.dependency_verification, "strict");
    }

    #[test]
    fn test_build_scan_fields() {
        let mut params = StartParameter::new("/proj");
        params.set_build_scan(false);
        assert!(params.no_build_scan);
        assert!(!params.build_scan);
    }

    #[test]
    fn test_serialization_skips_unset_paths() {
        let params = StartParameter::new("/proj");
        let json = serde_json::to_value(&params).unwrap();
        assert!(json.get("build_file").is_none());
        assert_eq!(json["build_project_dependencies"], true);
    }
}
