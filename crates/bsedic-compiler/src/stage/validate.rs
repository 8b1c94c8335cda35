//! Stage 0: structural validation of raw document text.
//!
//! Unlike the later stages, validation never stops at the first problem. It
//! walks the untyped JSON tree and reports every error it can detect, so a
//! user can fix a document in one pass.

use std::collections::BTreeSet;

use bsedic_common::config::CompilerSettings;
use bsedic_common::types::{DefinitionSource, Identifier, TypeToken};
use bsedic_protocol::grammar::scan_references;
use serde_json::{Map, Value};

const DEFINITIONS: &str = "definitions";
const NODES: &str = "nodes";
const WIRINGS: &str = "wirings";

#[derive(Default)]
struct Collector {
    errors: Vec<String>,
}

impl Collector {
    fn push(&mut self, message: String) {
        self.errors.push(message);
    }

    /// Reads a string field, recording an error if it is missing or mistyped.
    fn string_field<'a>(
        &mut self,
        object: &'a Map<String, Value>,
        field: &str,
        context: &str,
    ) -> Option<&'a str> {
        match object.get(field) {
            Some(Value::String(value)) => Some(value),
            Some(_) => {
                self.push(format!("{context}: field `{field}` must be a string"));
                None
            }
            None => {
                self.push(format!("{context}: missing field `{field}`"));
                None
            }
        }
    }

    /// Reads an identifier field, checking its grammar.
    fn identifier_field<'a>(
        &mut self,
        object: &'a Map<String, Value>,
        field: &str,
        context: &str,
    ) -> Option<&'a str> {
        let value = self.string_field(object, field, context)?;
        if Identifier::is_valid(value) {
            Some(value)
        } else {
            self.push(format!("{context}: invalid identifier `{value}` in `{field}`"));
            None
        }
    }

    /// Reads a list of port identifiers.
    fn port_list<'a>(
        &mut self,
        object: &'a Map<String, Value>,
        field: &str,
        context: &str,
    ) -> Vec<&'a str> {
        let Some(value) = object.get(field) else {
            self.push(format!("{context}: missing field `{field}`"));
            return Vec::new();
        };
        let Some(items) = value.as_array() else {
            self.push(format!("{context}: field `{field}` must be a list"));
            return Vec::new();
        };
        let mut ports = Vec::with_capacity(items.len());
        for item in items {
            match item.as_str() {
                Some(port) if Identifier::is_valid(port) => ports.push(port),
                Some(port) => {
                    self.push(format!("{context}: invalid port name `{port}` in `{field}`"));
                }
                None => self.push(format!("{context}: `{field}` entries must be strings")),
            }
        }
        ports
    }

    fn section<'a>(&mut self, root: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
        let section = root.get(name);
        if section.is_none() {
            self.push(format!("missing section `{name}`"));
        }
        section
    }
}

/// Ports exposed by the document's nodes.
#[derive(Default)]
struct PortIndex<'a> {
    produced: BTreeSet<&'a str>,
    consumed: BTreeSet<&'a str>,
}

/// Validates raw document text, returning every error found.
///
/// An empty result means the document can be lifted. Invalid JSON is the one
/// error that ends the walk early, since nothing further can be inspected.
#[must_use]
pub fn validate(text: &str, settings: &CompilerSettings) -> Vec<String> {
    let mut collector = Collector::default();

    if settings.reject_unresolved_references {
        for reference in scan_references(text) {
            collector.push(format!(
                "unresolved dependency reference `{}`; localize the document first",
                reference.full
            ));
        }
    }

    let root = match serde_json::from_str::<Value>(text) {
        Ok(root) => root,
        Err(e) => {
            collector.push(format!("document is not valid JSON: {e}"));
            return collector.errors;
        }
    };
    let Some(root) = root.as_object() else {
        collector.push("document root must be an object".into());
        return collector.errors;
    };

    let definitions = validate_definitions(&mut collector, root);
    let ports = validate_nodes(&mut collector, root, &definitions);
    validate_wirings(&mut collector, root, &ports);

    tracing::debug!(errors = collector.errors.len(), "validated document");
    collector.errors
}

fn validate_definitions<'a>(
    collector: &mut Collector,
    root: &'a Map<String, Value>,
) -> BTreeSet<&'a str> {
    let mut defined = BTreeSet::new();
    let Some(section) = collector.section(root, DEFINITIONS) else {
        return defined;
    };
    let Some(entries) = section.as_object() else {
        collector.push(format!("section `{DEFINITIONS}` must be an object"));
        return defined;
    };
    for (id, source) in entries {
        if !Identifier::is_valid(id) {
            collector.push(format!("definition `{id}`: invalid identifier"));
        }
        match source.as_str() {
            Some(source) if DefinitionSource::is_valid(source) => {}
            Some(source) => collector.push(format!("definition `{id}`: invalid source `{source}`")),
            None => collector.push(format!("definition `{id}`: source must be a string")),
        }
        let _ = defined.insert(id.as_str());
    }
    defined
}

fn validate_nodes<'a>(
    collector: &mut Collector,
    root: &'a Map<String, Value>,
    definitions: &BTreeSet<&str>,
) -> PortIndex<'a> {
    let mut ports = PortIndex::default();
    let Some(section) = collector.section(root, NODES) else {
        return ports;
    };
    let Some(nodes) = section.as_array() else {
        collector.push(format!("section `{NODES}` must be a list"));
        return ports;
    };

    let mut seen = BTreeSet::new();
    for (index, node) in nodes.iter().enumerate() {
        let context = format!("{NODES}[{index}]");
        let Some(node) = node.as_object() else {
            collector.push(format!("{context}: must be an object"));
            continue;
        };
        if let Some(id) = collector.identifier_field(node, "id", &context) {
            if !seen.insert(id) {
                collector.push(format!("node `{id}`: duplicate id"));
            }
        }
        if let Some(definition) = collector.identifier_field(node, "definition", &context) {
            if !definitions.contains(definition) {
                collector.push(format!("{context}: undefined definition `{definition}`"));
            }
        }
        ports.consumed.extend(collector.port_list(node, "inputs", &context));
        ports.produced.extend(collector.port_list(node, "outputs", &context));
    }
    ports
}

fn validate_wirings(collector: &mut Collector, root: &Map<String, Value>, ports: &PortIndex<'_>) {
    let Some(section) = collector.section(root, WIRINGS) else {
        return;
    };
    let Some(wirings) = section.as_array() else {
        collector.push(format!("section `{WIRINGS}` must be a list"));
        return;
    };

    let mut seen = BTreeSet::new();
    for (index, wiring) in wirings.iter().enumerate() {
        let context = format!("{WIRINGS}[{index}]");
        let Some(wiring) = wiring.as_object() else {
            collector.push(format!("{context}: must be an object"));
            continue;
        };
        if let Some(id) = collector.identifier_field(wiring, "id", &context) {
            if !seen.insert(id) {
                collector.push(format!("wiring `{id}`: duplicate id"));
            }
        }
        if let Some(output) = collector.identifier_field(wiring, "output", &context) {
            if !ports.produced.contains(output) {
                collector.push(format!("{context}: output `{output}` is produced by no node"));
            }
        }
        if let Some(input) = collector.identifier_field(wiring, "input", &context) {
            if !ports.consumed.contains(input) {
                collector.push(format!("{context}: input `{input}` is consumed by no node"));
            }
        }
        if let Some(protocol) = collector.string_field(wiring, "protocol", &context) {
            if !TypeToken::is_valid(protocol) {
                collector.push(format!("{context}: invalid protocol `{protocol}`"));
            }
        }
    }
}
