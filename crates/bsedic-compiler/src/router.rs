//! Routing of abstract nodes to concrete implementations.

use bsedic_common::error::{BsedicError, Result};
use bsedic_model::entity::ExperimentNode;
use bsedic_model::implementation::NodeImplementation;

use crate::registry::ImplementationRegistry;

/// Maps an abstract node to exactly one concrete implementation.
pub trait Router {
    /// Resolves `node` to an implementation whose ports match it.
    ///
    /// # Errors
    ///
    /// Returns [`BsedicError::NoImplementation`] if no candidate matches.
    fn resolve(&self, node: &ExperimentNode) -> Result<NodeImplementation>;
}

/// Router backed by an in-process [`ImplementationRegistry`].
///
/// A candidate is selected only if its input and output port sets equal the
/// node's exactly. When several candidates qualify, the first registered one
/// wins.
#[derive(Debug, Clone, Copy)]
pub struct LocalRouter<'r> {
    registry: &'r ImplementationRegistry,
}

impl<'r> LocalRouter<'r> {
    /// Creates a router over `registry`.
    #[must_use]
    pub const fn new(registry: &'r ImplementationRegistry) -> Self {
        Self { registry }
    }
}

impl Router for LocalRouter<'_> {
    fn resolve(&self, node: &ExperimentNode) -> Result<NodeImplementation> {
        let candidates = self.registry.candidates(&node.definition);
        let selected = candidates
            .iter()
            .find(|c| c.has_ports(&node.inputs, &node.outputs))
            .ok_or_else(|| BsedicError::NoImplementation {
                node: node.id.to_string(),
                definition: node.definition.to_string(),
            })?;
        tracing::debug!(
            node = %node.id,
            definition = %node.definition,
            implementation = %selected.id,
            candidates = candidates.len(),
            "routed node"
        );
        Ok(selected.clone())
    }
}
