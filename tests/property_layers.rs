//! Property Layer Tests
//!
//! gradle.properties files in the project directory and user home, plus
//! `-D` properties, feeding a resolution pass.

use std::collections::BTreeMap;
use std::fs;

use buildopt::properties::PROPERTIES_FILE;
use buildopt::{
    start_parameter_registry, BaseDirectoryResolver, EffectiveProperties, EffectiveSettings, Notice,
    Origin, PropertyLayer, PropertySource, Resolver, StartParameter, Switch,
};
use tempfile::TempDir;

fn write_properties(dir: &TempDir, contents: &str) {
    fs::write(dir.path().join(PROPERTIES_FILE), contents).unwrap();
}

fn system_props(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn load(project: &TempDir, home: &TempDir, cli: &BTreeMap<String, String>) -> EffectiveProperties {
    let project_file = project.path().join(PROPERTIES_FILE);
    let home_file = home.path().join(PROPERTIES_FILE);
    EffectiveProperties::build(Some(project_file.as_path()), Some(home_file.as_path()), cli)
        .unwrap()
}

// =============================================================================
// Layering
// =============================================================================

#[test]
fn test_user_home_overrides_project() {
    let project = TempDir::new().unwrap();
    let home = TempDir::new().unwrap();
    write_properties(&project, "org.gradle.parallel=false\norg.gradle.caching=true\n");
    write_properties(&home, "org.gradle.parallel=true\n");

    let props = load(&project, &home, &BTreeMap::new());
    assert_eq!(props.get("org.gradle.parallel"), Some("true"));
    assert_eq!(props.layer_of("org.gradle.parallel"), Some(PropertyLayer::UserHome));
    assert_eq!(props.get("org.gradle.caching"), Some("true"));
    assert_eq!(props.layer_of("org.gradle.caching"), Some(PropertyLayer::Project));
}

#[test]
fn test_system_property_overrides_files() {
    let project = TempDir::new().unwrap();
    let home = TempDir::new().unwrap();
    write_properties(&home, "org.gradle.caching=true\n");

    let props = load(&project, &home, &system_props(&[("org.gradle.caching", "false")]));
    assert_eq!(props.get("org.gradle.caching"), Some("false"));
    assert_eq!(props.layer_of("org.gradle.caching"), Some(PropertyLayer::CommandLine));

    let layers: Vec<PropertyLayer> = props.sources().iter().map(|s| s.layer).collect();
    assert_eq!(layers, vec![PropertyLayer::UserHome, PropertyLayer::CommandLine]);
}

// =============================================================================
// Resolution from files
// =============================================================================

#[test]
fn test_resolve_from_property_files() {
    let project = TempDir::new().unwrap();
    let home = TempDir::new().unwrap();
    write_properties(
        &project,
        "# build settings\norg.gradle.caching = true\norg.gradle.dependency.verification: lenient\n",
    );

    let props = load(&project, &home, &BTreeMap::new());
    let registry = start_parameter_registry().unwrap();
    let paths = BaseDirectoryResolver::new(project.path());
    let mut notices: Vec<Notice> = Vec::new();
    let mut params = StartParameter::new(project.path());

    let report = Resolver::new(&paths, &mut notices)
        .resolve(&registry, &Vec::<Switch>::new(), &props, &mut params)
        .unwrap();

    assert!(params.build_cache_enabled);
    assert_eq!(params.dependency_verification, "lenient");
    assert_eq!(report.origin_of("build-cache"), Origin::property("org.gradle.caching"));
    assert_eq!(notices.len(), 2);

    let settings = EffectiveSettings::new(params, Vec::new(), report, &props);
    let json: serde_json::Value = serde_json::from_str(&settings.to_json().unwrap()).unwrap();
    assert_eq!(json["settings"]["build_cache_enabled"], true);
    assert_eq!(json["property_sources"][0]["layer"], "project");
    assert_eq!(json["property_sources"][0]["digest"].as_str().map(str::len), Some(64));
}

#[test]
fn test_bad_file_value_fails_pass() {
    let project = TempDir::new().unwrap();
    let home = TempDir::new().unwrap();
    write_properties(&project, "org.gradle.configureondemand=perhaps\n");

    let props = load(&project, &home, &BTreeMap::new());
    let registry = start_parameter_registry().unwrap();
    let paths = BaseDirectoryResolver::new(project.path());
    let mut notices: Vec<Notice> = Vec::new();
    let mut params = StartParameter::new(project.path());
    let args = vec![Switch::new("offline", "--offline", None)];

    let err = Resolver::new(&paths, &mut notices)
        .resolve(&registry, &args, &props, &mut params)
        .unwrap_err();

    assert_eq!(err.option(), "org.gradle.configureondemand");
    assert!(!params.offline);
    assert!(notices.is_empty());
}

#[test]
fn test_malformed_file_reports_line() {
    let project = TempDir::new().unwrap();
    write_properties(&project, "ok=1\n\n: missing key\n");

    let project_file = project.path().join(PROPERTIES_FILE);
    let err = EffectiveProperties::build(Some(project_file.as_path()), None, &BTreeMap::new())
        .unwrap_err();
    assert!(err.to_string().contains("line 3"));
}
