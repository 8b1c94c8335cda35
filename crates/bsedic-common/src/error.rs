//! Unified error types for the bsedic workspace.
//!
//! Variants are grouped by how they surface: grammar and format errors,
//! trust errors raised against a passlist, resolution errors from the router,
//! and the collected validation errors of the compiler's first stage.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum BsedicError {
    /// An I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A value does not satisfy the identifier grammar of its kind.
    #[error("invalid {kind} `{value}`")]
    InvalidIdentifier {
        /// Kind of token that was expected (identifier, source, type).
        kind: &'static str,
        /// The rejected value.
        value: String,
    },

    /// A passlist entry is not of the form `source::package`.
    #[error("invalid whitelist entry: {entry}")]
    InvalidWhitelistEntry {
        /// The malformed entry.
        entry: String,
    },

    /// A dependency reference names a source other than `pypi` or `conda`.
    #[error("unknown source `{source_name}` used; can not determine dependencies")]
    UnknownSource {
        /// The unrecognized source.
        source_name: String,
    },

    /// A passlist was supplied but does not mention the reference's source.
    #[error("unapproved source `{source_name}` used; can not trust document")]
    UnapprovedSource {
        /// The source missing from the passlist.
        source_name: String,
    },

    /// A passlist was supplied but does not trust the referenced package.
    #[error("`{package}` from `{source_name}` is not a trusted package; can not trust document")]
    UntrustedPackage {
        /// Source the package was requested from.
        source_name: String,
        /// The untrusted package.
        package: String,
    },

    /// The document contains no dependency references at all.
    #[error("no dependencies found in document; unable to generate environment")]
    NoDependencies,

    /// The document only carries already-localized references.
    #[error("document is using the following local protocols: `{protocols}`; unable to determine needed environment")]
    UnresolvedLocalProtocol {
        /// Comma-joined `local:` tokens found in the document.
        protocols: String,
    },

    /// The recipe template names a slot that has no generator.
    #[error("unknown field in template dockerfile: {slot}")]
    UnknownTemplateSlot {
        /// The unhandled slot name.
        slot: String,
    },

    /// No registered implementation matches a node's ports exactly.
    #[error("no implementation of `{definition}` matches the ports of node `{node}`")]
    NoImplementation {
        /// Node being routed.
        node: String,
        /// Abstract definition the node refers to.
        definition: String,
    },

    /// An implementation id is already registered, under any definition.
    #[error("implementation `{implementation}` is already registered for `{definition}`")]
    DuplicateImplementation {
        /// Abstract definition the id is already registered under.
        definition: String,
        /// Offending implementation id.
        implementation: String,
    },

    /// Routing bound one implementation id to two different sources.
    #[error("implementation `{implementation}` resolved with conflicting sources `{first}` and `{second}`")]
    ConflictingImplementation {
        /// Implementation id shared by the routed nodes.
        implementation: String,
        /// Source recorded for the first node.
        first: String,
        /// Source returned for a later node.
        second: String,
    },

    /// A wiring references a port that no resolved node exposes.
    #[error("wiring `{wiring}` references port `{port}` which no resolved node exposes as {direction}")]
    DanglingWiring {
        /// Wiring identifier.
        wiring: String,
        /// Missing port name.
        port: String,
        /// Either `output` or `input`.
        direction: &'static str,
    },

    /// The experiment document could not be parsed into entities.
    #[error("invalid experiment document: {message}")]
    Document {
        /// Description of the parse failure.
        message: String,
    },

    /// Validation of the experiment document produced errors.
    #[error("experiment document failed validation:\n  {}", errors.join("\n  "))]
    Validation {
        /// Every validation message collected, in discovery order.
        errors: Vec<String>,
    },

    /// A container recipe could not be converted.
    #[error("recipe conversion failed: {message}")]
    Conversion {
        /// Description of the failure.
        message: String,
    },

    /// The requested operation is not supported.
    #[error("unsupported: {message}")]
    Unsupported {
        /// Description of the unsupported request.
        message: String,
    },

    /// Serialization or deserialization failed.
    #[error("serialization error: {source}")]
    Serialization {
        /// Underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, BsedicError>;
