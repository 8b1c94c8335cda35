//! Stage 3: lowering the implementation graph to a composition schema.

use std::collections::{BTreeMap, BTreeSet};

use bsedic_common::types::Identifier;
use bsedic_model::entity::{ExperimentEntityList, ExperimentNode};

use crate::schema::{COMPOSITION, CompositionSchema, STATE, SchemaValue};

/// Type tag carried by every step entry.
pub const STEP_TYPE: &str = "step";

fn port_names(ports: &BTreeSet<Identifier>) -> SchemaValue {
    SchemaValue::List(ports.iter().map(ToString::to_string).collect())
}

fn step_entry(node: &ExperimentNode) -> SchemaValue {
    let entry = BTreeMap::from([
        ("_type".to_string(), SchemaValue::Text(STEP_TYPE.to_string())),
        ("config".to_string(), SchemaValue::empty_map()),
        ("inputs".to_string(), port_names(&node.inputs)),
        ("outputs".to_string(), port_names(&node.outputs)),
    ]);
    SchemaValue::Map(entry)
}

/// Lowers resolved entities into the `state`/`composition` schema.
///
/// Every node yields one step in `composition` and a mirrored entry in
/// `state`. `bridge` and `interface` are reserved and left empty.
#[must_use]
pub fn lower(entities: &ExperimentEntityList) -> CompositionSchema {
    let mut schema = CompositionSchema::new();
    for node in &entities.nodes {
        let entry = step_entry(node);
        schema.insert(STATE, node.id.as_str(), entry.clone());
        schema.insert(COMPOSITION, node.id.as_str(), entry);
    }
    tracing::debug!(steps = entities.nodes.len(), "lowered entities to composition schema");
    schema
}
