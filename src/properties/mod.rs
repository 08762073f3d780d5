//! Build properties from `gradle.properties` files and `-D` arguments.

mod effective;
mod loader;

pub use effective::{EffectiveProperties, PropertyLayer, PropertySourceInfo};
pub use loader::{load_properties, parse_properties, PropertiesError};

/// File name looked up in the project directory and the user home.
pub const PROPERTIES_FILE: &str = "gradle.properties";
