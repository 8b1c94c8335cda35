//! Registry of concrete node implementations.
//!
//! Implementations are grouped by the abstract definition they fulfil and
//! kept in registration order, which the router relies on for tie-breaking.

use std::collections::BTreeMap;
use std::path::Path;

use bsedic_common::error::{BsedicError, Result};
use bsedic_common::types::Identifier;
use bsedic_model::implementation::NodeImplementation;

/// Implementations available to the router, keyed by abstract definition.
#[derive(Debug, Clone, Default)]
pub struct ImplementationRegistry {
    by_definition: BTreeMap<Identifier, Vec<NodeImplementation>>,
}

impl ImplementationRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an implementation under the definition it implements.
    ///
    /// # Errors
    ///
    /// Returns [`BsedicError::DuplicateImplementation`] if an implementation
    /// with the same id is already registered, for this or any other
    /// definition. Routed nodes are keyed by implementation id, so ids must
    /// be unique across the registry.
    pub fn register(&mut self, implementation: NodeImplementation) -> Result<()> {
        let existing = self
            .by_definition
            .iter()
            .find(|(_, candidates)| candidates.iter().any(|c| c.id == implementation.id));
        if let Some((definition, _)) = existing {
            return Err(BsedicError::DuplicateImplementation {
                definition: definition.to_string(),
                implementation: implementation.id.to_string(),
            });
        }
        tracing::debug!(
            definition = %implementation.implements,
            implementation = %implementation.id,
            "registered implementation"
        );
        self.by_definition
            .entry(implementation.implements.clone())
            .or_default()
            .push(implementation);
        Ok(())
    }

    /// Returns the implementations of `definition`, in registration order.
    #[must_use]
    pub fn candidates(&self, definition: &Identifier) -> &[NodeImplementation] {
        self.by_definition
            .get(definition)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Total number of registered implementations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_definition.values().map(Vec::len).sum()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_definition.is_empty()
    }

    /// Builds a registry from a JSON array of implementations.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed, an entry violates the
    /// identifier grammar, or an implementation is registered twice.
    pub fn from_json(text: &str) -> Result<Self> {
        let implementations: Vec<NodeImplementation> = serde_json::from_str(text)?;
        let mut registry = Self::new();
        for implementation in implementations {
            registry.register(implementation)?;
        }
        Ok(registry)
    }

    /// Loads a registry from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        tracing::info!(path = %path.display(), "loading implementation registry");
        let text = std::fs::read_to_string(path).map_err(|e| BsedicError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json(&text)
    }
}
