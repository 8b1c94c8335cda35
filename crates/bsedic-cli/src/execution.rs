//! Execution driver for a containerization run.
//!
//! Copies the experiment document into the output directory, localizes the
//! copy, and writes the recipe files the chosen engine needs. A document that
//! already lives in the output directory is localized in place.

use std::path::{Path, PathBuf};

use bsedic_common::config::{ContainerizationType, ProgramArguments};
use bsedic_common::constants::{ARCHIVE_EXTENSIONS, DOCKERFILE_NAME, SINGULARITY_DEFINITION_NAME};
use bsedic_common::error::{BsedicError, Result};
use bsedic_container::constructor::{formulate_dockerfile, write_document};
use bsedic_container::converter::{RecipeConverter, SingularityConverter};
use bsedic_model::dependency::ExperimentPrimaryDependencies;
use bsedic_model::recipe::ContainerRecipe;

/// Result of one containerization run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOutcome {
    /// The final recipe: the Singularity definition when one was produced,
    /// otherwise the Dockerfile.
    pub recipe: ContainerRecipe,
    /// Dependencies extracted from the document.
    pub dependencies: ExperimentPrimaryDependencies,
    /// The recipe file written last, if any was written.
    pub written: Option<PathBuf>,
}

fn is_archive(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            ARCHIVE_EXTENSIONS
                .iter()
                .any(|archive| ext.eq_ignore_ascii_case(archive))
        })
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> BsedicError + '_ {
    move |e| BsedicError::Io {
        path: path.to_path_buf(),
        source: e,
    }
}

/// Copies the document into `output_dir`, returning the copy's path.
///
/// Nothing is copied when the document already lives there.
fn stage_document(input: &Path, output_dir: &Path) -> Result<PathBuf> {
    let file_name = input.file_name().ok_or_else(|| BsedicError::Unsupported {
        message: format!("input path `{}` does not name a file", input.display()),
    })?;
    std::fs::create_dir_all(output_dir).map_err(io_err(output_dir))?;
    let destination = output_dir.join(file_name);

    let source = input.canonicalize().map_err(io_err(input))?;
    if destination.canonicalize().is_ok_and(|d| d == source) {
        return Ok(destination);
    }
    let _ = std::fs::copy(input, &destination).map_err(io_err(&destination))?;
    tracing::info!(from = %input.display(), to = %destination.display(), "copied document");
    Ok(destination)
}

/// Runs a full containerization for `arguments`.
///
/// Localization rewrites the copy placed in the output directory. When the
/// input document already lives in the output directory no copy is made and
/// the input file itself is rewritten.
///
/// # Errors
///
/// Returns [`BsedicError::Unsupported`] for archive inputs and multiple
/// containerization, and propagates I/O, dependency and conversion errors.
pub fn execute_bsedic(arguments: &ProgramArguments) -> Result<ExecutionOutcome> {
    let input = arguments.input_file_path.as_path();
    if is_archive(input) {
        return Err(BsedicError::Unsupported {
            message: format!("archive inputs are not supported: {}", input.display()),
        });
    }

    let staged = stage_document(input, &arguments.output_dir)?;
    let formulation = formulate_dockerfile(&arguments.with_input(&staged))?;

    let mut outcome = ExecutionOutcome {
        recipe: formulation.recipe,
        dependencies: formulation.dependencies,
        written: None,
    };
    match arguments.containerization_type {
        ContainerizationType::None => return Ok(outcome),
        ContainerizationType::Multiple => {
            return Err(BsedicError::Unsupported {
                message: "only single containerization is currently supported".into(),
            });
        }
        ContainerizationType::Single => {}
    }

    let engine = arguments.containerization_engine;
    let dockerfile_path = arguments.output_dir.join(DOCKERFILE_NAME);
    write_document(&dockerfile_path, outcome.recipe.as_str())?;
    outcome.written = Some(dockerfile_path.clone());

    if engine.wants_singularity() {
        let definition = SingularityConverter.convert(&outcome.recipe)?;
        let definition_path = arguments.output_dir.join(SINGULARITY_DEFINITION_NAME);
        write_document(&definition_path, definition.as_str())?;
        outcome.recipe = definition;
        outcome.written = Some(definition_path);

        if !engine.keeps_dockerfile() {
            std::fs::remove_file(&dockerfile_path).map_err(io_err(&dockerfile_path))?;
        }
    }

    tracing::info!(
        engine = %engine,
        dependencies = outcome.dependencies.len(),
        "containerization complete"
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use bsedic_common::config::ContainerizationEngine;

    use super::*;

    const DOCUMENT: &str = "`python:pypi<numpy[>=2.0.0]>@numpy.random.rand`";

    struct Workspace {
        _dir: tempfile::TempDir,
        input: PathBuf,
        output: PathBuf,
    }

    fn workspace(name: &str) -> Workspace {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let input = dir.path().join(name);
        std::fs::write(&input, DOCUMENT).expect("failed to write");
        let output = dir.path().join("out");
        Workspace {
            _dir: dir,
            input,
            output,
        }
    }

    fn arguments(
        ws: &Workspace,
        containerization_type: ContainerizationType,
        containerization_engine: ContainerizationEngine,
    ) -> ProgramArguments {
        ProgramArguments {
            containerization_type,
            containerization_engine,
            ..ProgramArguments::new(&ws.input, &ws.output)
        }
    }

    #[test]
    fn docker_engine_writes_dockerfile_only() {
        let ws = workspace("experiment.json");
        let outcome = execute_bsedic(&arguments(
            &ws,
            ContainerizationType::Single,
            ContainerizationEngine::Docker,
        ))
        .expect("execute");

        let dockerfile = ws.output.join(DOCKERFILE_NAME);
        assert_eq!(outcome.written.as_deref(), Some(dockerfile.as_path()));
        assert_eq!(
            std::fs::read_to_string(&dockerfile).expect("read"),
            outcome.recipe.as_str()
        );
        assert!(!ws.output.join(SINGULARITY_DEFINITION_NAME).exists());
    }

    #[test]
    fn copy_is_localized_and_original_untouched() {
        let ws = workspace("experiment.json");
        let _ = execute_bsedic(&arguments(
            &ws,
            ContainerizationType::None,
            ContainerizationEngine::Docker,
        ))
        .expect("execute");

        assert_eq!(std::fs::read_to_string(&ws.input).expect("read"), DOCUMENT);
        assert_eq!(
            std::fs::read_to_string(ws.output.join("experiment.json")).expect("read"),
            "`local:numpy.random.rand`"
        );
    }

    #[test]
    fn none_writes_no_recipe() {
        let ws = workspace("experiment.json");
        let outcome = execute_bsedic(&arguments(
            &ws,
            ContainerizationType::None,
            ContainerizationEngine::Both,
        ))
        .expect("execute");
        assert!(outcome.written.is_none());
        assert!(outcome.recipe.as_str().starts_with("FROM "));
        assert!(!ws.output.join(DOCKERFILE_NAME).exists());
    }

    #[test]
    fn apptainer_replaces_dockerfile_with_definition() {
        let ws = workspace("experiment.json");
        let outcome = execute_bsedic(&arguments(
            &ws,
            ContainerizationType::Single,
            ContainerizationEngine::Apptainer,
        ))
        .expect("execute");
        assert!(outcome.recipe.as_str().starts_with("Bootstrap: docker"));
        assert!(ws.output.join(SINGULARITY_DEFINITION_NAME).exists());
        assert!(!ws.output.join(DOCKERFILE_NAME).exists());
    }

    #[test]
    fn both_keeps_dockerfile_and_definition() {
        let ws = workspace("experiment.json");
        let _ = execute_bsedic(&arguments(
            &ws,
            ContainerizationType::Single,
            ContainerizationEngine::Both,
        ))
        .expect("execute");
        assert!(ws.output.join(SINGULARITY_DEFINITION_NAME).exists());
        assert!(ws.output.join(DOCKERFILE_NAME).exists());
    }

    #[test]
    fn multiple_is_unsupported() {
        let ws = workspace("experiment.json");
        let result = execute_bsedic(&arguments(
            &ws,
            ContainerizationType::Multiple,
            ContainerizationEngine::Docker,
        ));
        assert!(matches!(result, Err(BsedicError::Unsupported { .. })));
    }

    #[test]
    fn archives_are_rejected() {
        let ws = workspace("experiment.OMEX");
        let result = execute_bsedic(&arguments(
            &ws,
            ContainerizationType::Single,
            ContainerizationEngine::Docker,
        ));
        assert!(matches!(result, Err(BsedicError::Unsupported { .. })));
        assert!(!ws.output.exists());
    }

    #[test]
    fn document_in_output_dir_is_localized_in_place() {
        let ws = workspace("experiment.json");
        let parent = ws.input.parent().expect("parent").to_path_buf();
        let args = ProgramArguments::new(&ws.input, &parent);
        let outcome = execute_bsedic(&args).expect("execute");
        assert_eq!(outcome.dependencies.pypi(), ["numpy>=2.0.0"]);
        assert_eq!(
            std::fs::read_to_string(&ws.input).expect("read"),
            "`local:numpy.random.rand`"
        );
        assert!(!ws.output.exists());
    }
}
