//! Effective build properties with provenance.
//!
//! Layers, lowest precedence first:
//! 1. Project `gradle.properties`
//! 2. User-home `gradle.properties`
//! 3. Command-line `-D` properties

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::loader::{load_properties, PropertiesError};
use crate::source::PropertySource;

/// Keys that contain secrets and are redacted when serialized
const SECRET_KEYS: &[&str] = &[
    "password",
    "token",
    "secret",
    "private_key",
    "api_key",
    "credential",
];

const REDACTED: &str = "[REDACTED]";

/// Where a property layer comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyLayer {
    Project,
    UserHome,
    CommandLine,
}

impl fmt::Display for PropertyLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PropertyLayer::Project => "project",
            PropertyLayer::UserHome => "user home",
            PropertyLayer::CommandLine => "command line",
        };
        f.write_str(name)
    }
}

/// A contributing layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySourceInfo {
    pub layer: PropertyLayer,

    /// File path (None for command line)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// SHA-256 digest of raw file bytes (None for command line)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

/// One effective value and the layer that set it
#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    value: String,
    layer: PropertyLayer,
}

/// Merged properties. Serializes with secret-looking values redacted.
#[derive(Debug, Clone, Default)]
pub struct EffectiveProperties {
    entries: BTreeMap<String, Entry>,
    sources: Vec<PropertySourceInfo>,
}

impl EffectiveProperties {
    /// Merge the layers. Missing files are skipped.
    pub fn build(
        project_file: Option<&Path>,
        user_home_file: Option<&Path>,
        command_line: &BTreeMap<String, String>,
    ) -> Result<Self, PropertiesError> {
        let mut properties = Self::default();

        for (layer, path) in [
            (PropertyLayer::Project, project_file),
            (PropertyLayer::UserHome, user_home_file),
        ] {
            let Some(path) = path else { continue };
            if !path.exists() {
                tracing::debug!(path = %path.display(), "no properties file");
                continue;
            }
            let (values, bytes) = load_properties(path)?;
            tracing::debug!(
                path = %path.display(),
                layer = %layer,
                count = values.len(),
                "loaded properties"
            );
            properties.push_layer(
                PropertySourceInfo {
                    layer,
                    path: Some(path.display().to_string()),
                    digest: Some(digest(&bytes)),
                },
                values,
            );
        }

        if !command_line.is_empty() {
            properties.push_layer(
                PropertySourceInfo {
                    layer: PropertyLayer::CommandLine,
                    path: None,
                    digest: None,
                },
                command_line.clone(),
            );
        }

        Ok(properties)
    }

    fn push_layer(&mut self, source: PropertySourceInfo, values: BTreeMap<String, String>) {
        for (key, value) in values {
            self.entries.insert(
                key,
                Entry {
                    value,
                    layer: source.layer,
                },
            );
        }
        self.sources.push(source);
    }

    /// Contributing layers in precedence order
    pub fn sources(&self) -> &[PropertySourceInfo] {
        &self.sources
    }

    /// Layer that supplied the effective value of `key`
    pub fn layer_of(&self, key: &str) -> Option<PropertyLayer> {
        self.entries.get(key).map(|e| e.layer)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys whose values are redacted when serialized
    pub fn redactions(&self) -> Vec<String> {
        self.entries.keys().filter(|k| is_secret(k)).cloned().collect()
    }
}

impl PropertySource for EffectiveProperties {
    fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|e| e.value.as_str())
    }
}

#[derive(Serialize)]
struct PropertyView<'a> {
    value: &'a str,
    layer: PropertyLayer,
}

#[derive(Serialize)]
struct EffectivePropertiesView<'a> {
    values: BTreeMap<&'a str, PropertyView<'a>>,
    sources: &'a [PropertySourceInfo],
    redactions: Vec<String>,
}

impl Serialize for EffectiveProperties {
    fn serialize<Ser: serde::Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        let values = self
            .entries
            .iter()
            .map(|(key, entry)| {
                let value = if is_secret(key) { REDACTED } else { entry.value.as_str() };
                (
                    key.as_str(),
                    PropertyView {
                        value,
                        layer: entry.layer,
                    },
                )
            })
            .collect();

        EffectivePropertiesView {
            values,
            sources: &self.sources,
            redactions: self.redactions(),
        }
        .serialize(serializer)
    }
}

fn is_secret(key: &str) -> bool {
    let key = key.to_lowercase();
    SECRET_KEYS.iter().any(|s| key.contains(s))
}

fn digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
