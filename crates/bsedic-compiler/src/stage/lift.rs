//! Stage 1: lifting document text to the abstract entity list.

use bsedic_common::error::{BsedicError, Result};
use bsedic_model::entity::ExperimentEntityList;

/// Deserializes a document into its abstract entity list.
///
/// Node definitions still name abstract concepts at this point. Top-level
/// keys other than `definitions`, `nodes` and `wirings` are ignored.
///
/// # Errors
///
/// Returns [`BsedicError::Document`] if the text does not fit the entity
/// shapes, violates the identifier grammar, or a node names a definition the
/// document does not declare.
pub fn lift(text: &str) -> Result<ExperimentEntityList> {
    let entities: ExperimentEntityList =
        serde_json::from_str(text).map_err(|e| BsedicError::Document {
            message: e.to_string(),
        })?;
    for node in &entities.nodes {
        if entities.definition_source(&node.definition).is_none() {
            return Err(BsedicError::Document {
                message: format!(
                    "node `{}` uses undefined definition `{}`",
                    node.id, node.definition
                ),
            });
        }
    }
    tracing::debug!(
        definitions = entities.definitions.len(),
        nodes = entities.nodes.len(),
        wirings = entities.wirings.len(),
        "lifted document to abstract entities"
    );
    Ok(entities)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifts_entities_in_document_order() {
        let text = r#"{
            "definitions": {"ode": "sed2"},
            "nodes": [
                {"id": "b", "definition": "ode", "inputs": ["y", "x"], "outputs": []},
                {"id": "a", "definition": "ode", "inputs": [], "outputs": ["y"]}
            ],
            "wirings": [{"id": "w", "output": "y", "input": "y", "protocol": "float"}],
            "title": "ignored"
        }"#;
        let entities = lift(text).expect("lift");
        let ids: Vec<&str> = entities.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        let inputs: Vec<&str> = entities.nodes[0].inputs.iter().map(|p| p.as_str()).collect();
        assert_eq!(inputs, vec!["x", "y"]);
        assert_eq!(entities.wirings[0].protocol.as_str(), "float");
    }

    #[test]
    fn grammar_violation_is_a_document_error() {
        let text = r#"{"definitions": {}, "nodes": [{"id": "1st", "definition": "ode",
                       "inputs": [], "outputs": []}], "wirings": []}"#;
        let err = lift(text).unwrap_err();
        assert!(matches!(err, BsedicError::Document { .. }), "got: {err}");
    }

    #[test]
    fn localized_definition_source_lifts() {
        let text = r#"{"definitions": {"ode": "local:basico.model_io"},
                       "nodes": [{"id": "solver", "definition": "ode", "inputs": [], "outputs": []}],
                       "wirings": []}"#;
        let entities = lift(text).expect("lift");
        let sources: Vec<&str> = entities.definitions.values().map(|s| s.as_str()).collect();
        assert_eq!(sources, vec!["local:basico.model_io"]);
    }

    #[test]
    fn undefined_definition_is_a_document_error() {
        let text = r#"{"definitions": {"ode": "sed2"},
                       "nodes": [{"id": "solver", "definition": "ssa", "inputs": [], "outputs": []}],
                       "wirings": []}"#;
        match lift(text).unwrap_err() {
            BsedicError::Document { message } => {
                assert_eq!(message, "node `solver` uses undefined definition `ssa`");
            }
            other => panic!("expected document error, got {other}"),
        }
    }

    #[test]
    fn missing_section_is_a_document_error() {
        assert!(matches!(
            lift(r#"{"definitions": {}, "nodes": []}"#),
            Err(BsedicError::Document { .. })
        ));
    }
}
