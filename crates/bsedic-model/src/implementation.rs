//! Concrete implementations of abstract experiment definitions.

use std::collections::BTreeSet;

use bsedic_common::types::{Identifier, SourceToken};
use serde::{Deserialize, Serialize};

use crate::entity::ExperimentDefinition;

/// A concrete implementation registered for an abstract definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeImplementation {
    /// Implementation identifier; becomes the node's definition after routing.
    pub id: Identifier,
    /// Abstract definition this implementation fulfils.
    pub implements: Identifier,
    /// Source the implementation is loaded from.
    pub source: SourceToken,
    /// Input port names.
    pub inputs: BTreeSet<Identifier>,
    /// Output port names.
    pub outputs: BTreeSet<Identifier>,
}

impl NodeImplementation {
    /// Returns `true` if the port sets equal the given ones exactly.
    #[must_use]
    pub fn has_ports(&self, inputs: &BTreeSet<Identifier>, outputs: &BTreeSet<Identifier>) -> bool {
        &self.inputs == inputs && &self.outputs == outputs
    }

    /// The definition a routed node binds to: this implementation's id and
    /// source.
    #[must_use]
    pub fn definition(&self) -> ExperimentDefinition {
        ExperimentDefinition {
            id: self.id.clone(),
            source: self.source.clone().into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ports(names: &[&str]) -> BTreeSet<Identifier> {
        names
            .iter()
            .map(|n| Identifier::new(*n).expect("valid"))
            .collect()
    }

    #[test]
    fn has_ports_requires_exact_sets() {
        let implementation = NodeImplementation {
            id: Identifier::new("impl_a").expect("valid"),
            implements: Identifier::new("concept").expect("valid"),
            source: SourceToken::new("local").expect("valid"),
            inputs: ports(&["a"]),
            outputs: ports(&["b"]),
        };
        assert!(implementation.has_ports(&ports(&["a"]), &ports(&["b"])));
        assert!(!implementation.has_ports(&ports(&["a", "c"]), &ports(&["b"])));
        assert!(!implementation.has_ports(&ports(&[]), &ports(&["b"])));
        assert!(!implementation.has_ports(&ports(&["b"]), &ports(&["a"])));

        let definition = implementation.definition();
        assert_eq!(definition.id.as_str(), "impl_a");
        assert_eq!(definition.source.as_str(), "local");
    }
}
