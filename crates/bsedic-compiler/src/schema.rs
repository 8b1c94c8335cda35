//! The lowered composition/state schema handed to execution tooling.

use std::collections::BTreeMap;

use bsedic_common::error::Result;
use serde::Serialize;

/// Section holding the initial state of every step.
pub const STATE: &str = "state";
/// Section holding the step composition.
pub const COMPOSITION: &str = "composition";
/// Section reserved for cross-node wiring.
pub const BRIDGE: &str = "bridge";
/// Section reserved for external-facing wiring.
pub const INTERFACE: &str = "interface";

/// A schema value: text, a list of names, or a nested mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SchemaValue {
    /// A scalar string.
    Text(String),
    /// An ordered list of names.
    List(Vec<String>),
    /// A nested mapping.
    Map(BTreeMap<String, SchemaValue>),
}

impl SchemaValue {
    /// Returns an empty mapping.
    #[must_use]
    pub const fn empty_map() -> Self {
        Self::Map(BTreeMap::new())
    }

    /// Returns the nested mapping, if this value is one.
    #[must_use]
    pub const fn as_map(&self) -> Option<&BTreeMap<String, Self>> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the list, if this value is one.
    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(list) => Some(list),
            _ => None,
        }
    }

    /// Returns the text, if this value is one.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Follows a path of mapping keys.
    #[must_use]
    pub fn get_path(&self, path: &[&str]) -> Option<&Self> {
        path.iter()
            .try_fold(self, |value, key| value.as_map()?.get(*key))
    }
}

/// Root of a lowered experiment: `state`, `composition`, `bridge` and
/// `interface` sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CompositionSchema {
    root: SchemaValue,
}

impl CompositionSchema {
    /// Creates a schema with the four sections, all empty.
    #[must_use]
    pub fn new() -> Self {
        let sections = [STATE, COMPOSITION, BRIDGE, INTERFACE]
            .into_iter()
            .map(|name| (name.to_string(), SchemaValue::empty_map()))
            .collect();
        Self {
            root: SchemaValue::Map(sections),
        }
    }

    /// Inserts `entry` under `key` in the named section.
    ///
    /// Unknown sections are ignored.
    pub fn insert(&mut self, section: &str, key: impl Into<String>, entry: SchemaValue) {
        if let SchemaValue::Map(sections) = &mut self.root {
            if let Some(SchemaValue::Map(entries)) = sections.get_mut(section) {
                let _ = entries.insert(key.into(), entry);
            }
        }
    }

    /// Returns the entries of a section.
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&BTreeMap<String, SchemaValue>> {
        self.root.get_path(&[name])?.as_map()
    }

    /// Follows a path of keys from the root.
    #[must_use]
    pub fn get_path(&self, path: &[&str]) -> Option<&SchemaValue> {
        self.root.get_path(path)
    }

    /// Serializes the schema as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for CompositionSchema {
    fn default() -> Self {
        Self::new()
    }
}
