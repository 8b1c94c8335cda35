//! Experiment entities: definitions, nodes, wirings and the entity list.
//!
//! The same [`ExperimentEntityList`] shape carries both the abstract graph
//! (node definitions name abstract concepts) and the implementation graph
//! (node definitions name concrete implementations).

use std::collections::{BTreeMap, BTreeSet};

use bsedic_common::types::{DefinitionSource, Identifier, TypeToken};
use serde::{Deserialize, Serialize};

/// A named external implementation source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentDefinition {
    /// Definition identifier.
    pub id: Identifier,
    /// Where the definition comes from.
    pub source: DefinitionSource,
}

/// An abstract computational step with named input and output ports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentNode {
    /// Node identifier.
    pub id: Identifier,
    /// Definition this node instantiates.
    pub definition: Identifier,
    /// Input port names.
    pub inputs: BTreeSet<Identifier>,
    /// Output port names.
    pub outputs: BTreeSet<Identifier>,
}

impl ExperimentNode {
    /// Returns a copy of this node bound to another definition.
    #[must_use]
    pub fn with_definition(&self, definition: Identifier) -> Self {
        Self {
            definition,
            ..self.clone()
        }
    }
}

/// A directed edge from a producing output port to a consuming input port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentWiring {
    /// Wiring identifier.
    pub id: Identifier,
    /// Producing output port.
    pub output: Identifier,
    /// Consuming input port.
    pub input: Identifier,
    /// Protocol (type) of the port.
    pub protocol: TypeToken,
}

/// The unit passed between compiler stages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentEntityList {
    /// Definition id to source.
    pub definitions: BTreeMap<Identifier, DefinitionSource>,
    /// Nodes in document order.
    pub nodes: Vec<ExperimentNode>,
    /// Wirings in document order.
    pub wirings: Vec<ExperimentWiring>,
}

impl ExperimentEntityList {
    /// Looks up the source of a definition.
    #[must_use]
    pub fn definition_source(&self, id: &Identifier) -> Option<&DefinitionSource> {
        self.definitions.get(id)
    }

    /// Returns `true` if some node exposes `port` as an output.
    #[must_use]
    pub fn produces(&self, port: &Identifier) -> bool {
        self.nodes.iter().any(|n| n.outputs.contains(port))
    }

    /// Returns `true` if some node exposes `port` as an input.
    #[must_use]
    pub fn consumes(&self, port: &Identifier) -> bool {
        self.nodes.iter().any(|n| n.inputs.contains(port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(value: &str) -> Identifier {
        Identifier::new(value).expect("valid identifier")
    }

    fn ports(names: &[&str]) -> BTreeSet<Identifier> {
        names.iter().map(|n| id(n)).collect()
    }

    fn sample() -> ExperimentEntityList {
        let mut definitions = BTreeMap::new();
        let _ = definitions.insert(id("ode"), DefinitionSource::new("sed2").expect("valid"));
        ExperimentEntityList {
            definitions,
            nodes: vec![ExperimentNode {
                id: id("solver"),
                definition: id("ode"),
                inputs: ports(&["rates"]),
                outputs: ports(&["species"]),
            }],
            wirings: Vec::new(),
        }
    }

    #[test]
    fn port_lookups() {
        let list = sample();
        assert!(list.produces(&id("species")));
        assert!(!list.produces(&id("rates")));
        assert!(list.consumes(&id("rates")));
        assert!(!list.consumes(&id("species")));
    }

    #[test]
    fn definition_lookup() {
        let list = sample();
        assert_eq!(
            list.definition_source(&id("ode")).map(DefinitionSource::as_str),
            Some("sed2")
        );
        assert!(list.definition_source(&id("missing")).is_none());
    }

    #[test]
    fn deserialize_accepts_localized_definition_source() {
        let json = r#"{
            "definitions": {"ode": "local:basico.model_io"},
            "nodes": [],
            "wirings": []
        }"#;
        let list: ExperimentEntityList = serde_json::from_str(json).expect("deserialize");
        assert_eq!(
            list.definition_source(&id("ode")).map(DefinitionSource::as_str),
            Some("local:basico.model_io")
        );
    }

    #[test]
    fn with_definition_leaves_original_untouched() {
        let list = sample();
        let rebound = list.nodes[0].with_definition(id("copasi_ode"));
        assert_eq!(rebound.definition.as_str(), "copasi_ode");
        assert_eq!(list.nodes[0].definition.as_str(), "ode");
        assert_eq!(rebound.inputs, list.nodes[0].inputs);
    }

    #[test]
    fn deserialize_rejects_invalid_port_name() {
        let json = r#"{
            "definitions": {"ode": "sed2"},
            "nodes": [{"id": "n", "definition": "ode", "inputs": ["bad-port"], "outputs": []}],
            "wirings": []
        }"#;
        assert!(serde_json::from_str::<ExperimentEntityList>(json).is_err());
    }
}
