//! Effective start parameters with provenance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::properties::{EffectiveProperties, PropertySourceInfo};
use crate::resolver::ResolutionReport;
use crate::settings::StartParameter;

/// Schema version for effective_settings
pub const SCHEMA_VERSION: u32 = 1;

/// Schema identifier
pub const SCHEMA_ID: &str = "buildopt/effective_settings@1";

/// Outcome of one resolve invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveSettings {
    pub schema_version: u32,
    pub schema_id: String,

    /// When the settings were resolved
    pub created_at: DateTime<Utc>,

    /// Task names left over after option parsing
    pub tasks: Vec<String>,

    pub settings: StartParameter,
    pub resolution: ResolutionReport,

    /// Property layers in precedence order
    pub property_sources: Vec<PropertySourceInfo>,
}

impl EffectiveSettings {
    pub fn new(
        settings: StartParameter,
        tasks: Vec<String>,
        resolution: ResolutionReport,
        properties: &EffectiveProperties,
    ) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            schema_id: SCHEMA_ID.to_string(),
            created_at: Utc::now(),
            tasks,
            settings,
            resolution,
            property_sources: properties.sources().to_vec(),
        }
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_human(&self) -> String {
        let mut output = String::new();

        if self.tasks.is_empty() {
            output.push_str("Tasks: (default)\n");
        } else {
            output.push_str(&format!("Tasks: {}\n", self.tasks.join(" ")));
        }

        output.push_str("\n--- Applied Options ---\n");
        if self.resolution.applied.is_empty() {
            output.push_str("(none)\n");
        }
        for applied in &self.resolution.applied {
            output.push_str(&format!(
                "{} = {} ({})\n",
                applied.option,
                human_value(&applied.value),
                applied.origin
            ));
        }

        if !self.resolution.overrides.is_empty() {
            output.push_str("\n--- Overridden Properties ---\n");
            for o in &self.resolution.overrides {
                output.push_str(&format!(
                    "{}: {} '{}' ignored, {} used\n",
                    o.option, o.ignored, o.ignored_value, o.used
                ));
            }
        }

        if !self.resolution.notices.is_empty() {
            output.push_str("\n--- Notices ---\n");
            for notice in &self.resolution.notices {
                output.push_str(&format!("{}\n", notice.message));
            }
        }

        if !self.property_sources.is_empty() {
            output.push_str("\n--- Property Sources ---\n");
            for source in &self.property_sources {
                match &source.path {
                    Some(path) => output.push_str(&format!("{}: {}\n", source.layer, path)),
                    None => output.push_str(&format!("{}\n", source.layer)),
                }
            }
        }

        output
    }
}

fn human_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Array(items) => items
            .iter()
            .map(human_value)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}
