//! The experiment compiler, chaining the four stages.

use bsedic_common::config::CompilerSettings;
use bsedic_common::error::{BsedicError, Result};

use crate::router::Router;
use crate::schema::CompositionSchema;
use crate::stage::{self, Stage};

/// Compiles SED2 documents into composition schemas.
///
/// The compiler carries only its settings and a router; it keeps no state
/// between documents or stages.
pub struct SedCompiler<'r> {
    settings: CompilerSettings,
    router: &'r dyn Router,
}

impl<'r> SedCompiler<'r> {
    /// Creates a compiler with fixed `settings`, resolving nodes through
    /// `router`.
    #[must_use]
    pub const fn new(settings: CompilerSettings, router: &'r dyn Router) -> Self {
        Self { settings, router }
    }

    /// The settings this compiler was built with.
    #[must_use]
    pub const fn settings(&self) -> &CompilerSettings {
        &self.settings
    }

    /// Runs every stage over `text`.
    ///
    /// # Errors
    ///
    /// Returns [`BsedicError::Validation`] carrying every message if stage 0
    /// finds problems; otherwise the first error raised by a later stage.
    pub fn compile(&self, text: &str) -> Result<CompositionSchema> {
        tracing::info!(stage = %Stage::Validate, "compiling document");
        let errors = stage::validate(text, &self.settings);
        if !errors.is_empty() {
            tracing::warn!(errors = errors.len(), "document failed validation");
            return Err(BsedicError::Validation { errors });
        }

        tracing::debug!(stage = %Stage::Lift, "entering stage");
        let abstract_entities = stage::lift(text)?;

        tracing::debug!(stage = %Stage::Resolve, "entering stage");
        let implementation_entities = stage::resolve(&abstract_entities, self.router)?;

        tracing::debug!(stage = %Stage::Lower, "entering stage");
        let schema = stage::lower(&implementation_entities);

        tracing::info!(steps = implementation_entities.nodes.len(), "document compiled");
        Ok(schema)
    }
}

impl std::fmt::Debug for SedCompiler<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SedCompiler")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
