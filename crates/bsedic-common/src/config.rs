//! Configuration models for a bsedic invocation and for the compiler.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// How the experiment should be containerized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerizationType {
    /// Resolve dependencies and render the recipe, but write nothing.
    None,
    /// One container for the whole experiment.
    #[default]
    Single,
    /// One container per process (not yet supported).
    Multiple,
}

impl fmt::Display for ContainerizationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Single => write!(f, "single"),
            Self::Multiple => write!(f, "multiple"),
        }
    }
}

/// Which container runtime the recipe targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerizationEngine {
    /// Emit a `Dockerfile` only.
    #[default]
    Docker,
    /// Emit a Singularity definition only.
    Apptainer,
    /// Emit both a `Dockerfile` and a Singularity definition.
    Both,
}

impl ContainerizationEngine {
    /// Returns `true` if a Singularity definition must be produced.
    #[must_use]
    pub const fn wants_singularity(self) -> bool {
        matches!(self, Self::Apptainer | Self::Both)
    }

    /// Returns `true` if the `Dockerfile` must be kept on disk.
    #[must_use]
    pub const fn keeps_dockerfile(self) -> bool {
        matches!(self, Self::Docker | Self::Both)
    }
}

impl fmt::Display for ContainerizationEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Docker => write!(f, "docker"),
            Self::Apptainer => write!(f, "apptainer"),
            Self::Both => write!(f, "both"),
        }
    }
}

/// Arguments of a single containerization run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramArguments {
    /// Path to the experiment document (or archive).
    pub input_file_path: PathBuf,
    /// Directory receiving the copied document and generated recipes.
    pub output_dir: PathBuf,
    /// Optional passlist of `source::package` entries.
    pub passlist_entries: Option<Vec<String>>,
    /// Containerization strategy.
    pub containerization_type: ContainerizationType,
    /// Target container runtime.
    pub containerization_engine: ContainerizationEngine,
}

impl ProgramArguments {
    /// Creates arguments for a single Docker containerization without a
    /// passlist.
    #[must_use]
    pub fn new(input_file_path: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_file_path: input_file_path.into(),
            output_dir: output_dir.into(),
            passlist_entries: None,
            containerization_type: ContainerizationType::default(),
            containerization_engine: ContainerizationEngine::default(),
        }
    }

    /// Returns a copy of these arguments pointing at another input document.
    #[must_use]
    pub fn with_input(&self, input_file_path: &Path) -> Self {
        Self {
            input_file_path: input_file_path.to_path_buf(),
            ..self.clone()
        }
    }

    /// Returns the passlist as a slice, if one was supplied.
    #[must_use]
    pub fn passlist(&self) -> Option<&[String]> {
        self.passlist_entries.as_deref()
    }
}

/// Settings injected into the experiment compiler.
///
/// The compiler keeps no state between stages other than this value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerSettings {
    /// Report embedded `python:` references that were never localized as
    /// validation errors.
    pub reject_unresolved_references: bool,
}

impl Default for CompilerSettings {
    fn default() -> Self {
        Self {
            reject_unresolved_references: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_output_matrix() {
        assert!(!ContainerizationEngine::Docker.wants_singularity());
        assert!(ContainerizationEngine::Docker.keeps_dockerfile());
        assert!(ContainerizationEngine::Apptainer.wants_singularity());
        assert!(!ContainerizationEngine::Apptainer.keeps_dockerfile());
        assert!(ContainerizationEngine::Both.wants_singularity());
        assert!(ContainerizationEngine::Both.keeps_dockerfile());
    }

    #[test]
    fn with_input_keeps_remaining_arguments() {
        let args = ProgramArguments {
            input_file_path: PathBuf::from("in.json"),
            output_dir: PathBuf::from("out"),
            passlist_entries: Some(vec!["pypi::numpy".into()]),
            containerization_type: ContainerizationType::Single,
            containerization_engine: ContainerizationEngine::Both,
        };
        let moved = args.with_input(Path::new("out/in.json"));
        assert_eq!(moved.input_file_path, PathBuf::from("out/in.json"));
        assert_eq!(moved.output_dir, args.output_dir);
        assert_eq!(moved.passlist(), Some(&["pypi::numpy".to_string()][..]));
    }

    #[test]
    fn compiler_settings_default_rejects_unresolved() {
        assert!(CompilerSettings::default().reject_unresolved_references);
    }

    #[test]
    fn containerization_type_serializes_lowercase() {
        let json = serde_json::to_string(&ContainerizationType::Multiple).expect("serialize");
        assert_eq!(json, "\"multiple\"");
    }
}
