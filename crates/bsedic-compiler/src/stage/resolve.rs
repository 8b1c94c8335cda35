//! Stage 2: routing abstract nodes to concrete implementations.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use bsedic_common::error::{BsedicError, Result};
use bsedic_model::entity::ExperimentEntityList;

use crate::router::Router;

/// Resolves every node of an abstract entity list through `router`.
///
/// Each node's `definition` is rewritten to the chosen implementation id, and
/// `definitions` is rebuilt to map implementation ids to their sources.
/// Wirings are carried over unchanged, then re-checked against the resolved
/// ports.
///
/// # Errors
///
/// Returns the first routing error,
/// [`BsedicError::ConflictingImplementation`] if two nodes route to the same
/// implementation id with different sources, or
/// [`BsedicError::DanglingWiring`] if a wiring names a port that no resolved
/// node exposes.
pub fn resolve(
    abstract_entities: &ExperimentEntityList,
    router: &dyn Router,
) -> Result<ExperimentEntityList> {
    let mut definitions = BTreeMap::new();
    let mut nodes = Vec::with_capacity(abstract_entities.nodes.len());
    for node in &abstract_entities.nodes {
        let definition = router.resolve(node)?.definition();
        nodes.push(node.with_definition(definition.id.clone()));
        match definitions.entry(definition.id) {
            Entry::Vacant(slot) => {
                let _ = slot.insert(definition.source);
            }
            Entry::Occupied(slot) if slot.get() != &definition.source => {
                return Err(BsedicError::ConflictingImplementation {
                    implementation: slot.key().to_string(),
                    first: slot.get().to_string(),
                    second: definition.source.to_string(),
                });
            }
            Entry::Occupied(_) => {}
        }
    }

    let resolved = ExperimentEntityList {
        definitions,
        nodes,
        wirings: abstract_entities.wirings.clone(),
    };
    check_wirings(&resolved)?;

    tracing::debug!(nodes = resolved.nodes.len(), "resolved entities to implementations");
    Ok(resolved)
}

fn check_wirings(entities: &ExperimentEntityList) -> Result<()> {
    for wiring in &entities.wirings {
        if !entities.produces(&wiring.output) {
            return Err(BsedicError::DanglingWiring {
                wiring: wiring.id.to_string(),
                port: wiring.output.to_string(),
                direction: "output",
            });
        }
        if !entities.consumes(&wiring.input) {
            return Err(BsedicError::DanglingWiring {
                wiring: wiring.id.to_string(),
                port: wiring.input.to_string(),
                direction: "input",
            });
        }
    }
    Ok(())
}
