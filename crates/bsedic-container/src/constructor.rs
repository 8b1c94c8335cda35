//! Recipe formulation for an experiment document on disk.

use std::path::Path;

use bsedic_common::config::ProgramArguments;
use bsedic_common::error::{BsedicError, Result};
use bsedic_model::dependency::ExperimentPrimaryDependencies;
use bsedic_model::recipe::ContainerRecipe;
use bsedic_protocol::determine_dependencies;

use crate::template::render_recipe;

/// Outcome of formulating a recipe for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formulation {
    /// The rendered Dockerfile.
    pub recipe: ContainerRecipe,
    /// Dependencies extracted from the document.
    pub dependencies: ExperimentPrimaryDependencies,
    /// Whether the document file was rewritten with localized references.
    pub document_rewritten: bool,
}

/// Reads a document from disk.
///
/// # Errors
///
/// Returns [`BsedicError::Io`] if the file cannot be read.
pub fn read_document(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| BsedicError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Writes a document back to disk, replacing its contents.
///
/// # Errors
///
/// Returns [`BsedicError::Io`] if the file cannot be written.
pub fn write_document(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).map_err(|e| BsedicError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Builds the Dockerfile needed to run the document at
/// `arguments.input_file_path`.
///
/// The document's dependency references are resolved against the optional
/// passlist. If localizing them changed the text, the document file is
/// rewritten in place before the recipe is rendered, and the returned
/// [`Formulation`] reports it.
///
/// # Errors
///
/// Returns an error if the document cannot be read or written, if its
/// references are invalid or untrusted, or if the template cannot be filled.
pub fn formulate_dockerfile(arguments: &ProgramArguments) -> Result<Formulation> {
    let path = arguments.input_file_path.as_path();
    tracing::info!(path = %path.display(), "formulating container recipe");

    let document = read_document(path)?;
    let (dependencies, updated_document) =
        determine_dependencies(&document, arguments.passlist())?;

    let document_rewritten = updated_document != document;
    if document_rewritten {
        tracing::info!(path = %path.display(), "rewriting document with local references");
        write_document(path, &updated_document)?;
    }

    let recipe = render_recipe(&dependencies)?;
    Ok(Formulation {
        recipe,
        dependencies,
        document_rewritten,
    })
}
