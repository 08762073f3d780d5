//! Input sources consulted by the resolver.

use std::collections::{BTreeMap, HashMap};

pub use buildopt_args::{ParsedCommandLine, Switch};

/// An already-tokenized command line.
pub trait ArgumentSource {
    /// Recognised switches in the order they were typed.
    fn switches(&self) -> &[Switch];

    /// Whether any switch was typed exactly as `token`.
    fn contains(&self, token: &str) -> bool {
        self.switches().iter().any(|s| s.token == token)
    }
}

impl ArgumentSource for ParsedCommandLine {
    fn switches(&self) -> &[Switch] {
        &self.switches
    }
}

impl ArgumentSource for [Switch] {
    fn switches(&self) -> &[Switch] {
        self
    }
}

impl ArgumentSource for Vec<Switch> {
    fn switches(&self) -> &[Switch] {
        self
    }
}

/// String-keyed properties, already loaded.
pub trait PropertySource {
    fn get(&self, key: &str) -> Option<&str>;
}

impl PropertySource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<&str> {
        HashMap::get(self, key).map(String::as_str)
    }
}

impl PropertySource for BTreeMap<String, String> {
    fn get(&self, key: &str) -> Option<&str> {
        BTreeMap::get(self, key).map(String::as_str)
    }
}
