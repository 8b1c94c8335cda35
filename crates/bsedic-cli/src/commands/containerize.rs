//! `bsedic containerize` — Resolve dependencies and write the container recipe.

use std::path::PathBuf;

use bsedic_common::config::{ContainerizationEngine, ContainerizationType, ProgramArguments};
use clap::{Args, ValueEnum};

use crate::execution::execute_bsedic;
use crate::output;

/// Containerization strategy accepted on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeArg {
    /// Print the recipe, write nothing.
    None,
    /// One container for the whole experiment.
    Single,
    /// One container per process.
    Multiple,
}

impl From<TypeArg> for ContainerizationType {
    fn from(value: TypeArg) -> Self {
        match value {
            TypeArg::None => Self::None,
            TypeArg::Single => Self::Single,
            TypeArg::Multiple => Self::Multiple,
        }
    }
}

/// Container runtime accepted on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineArg {
    /// Dockerfile only.
    Docker,
    /// Singularity definition only.
    Apptainer,
    /// Dockerfile and Singularity definition.
    Both,
}

impl From<EngineArg> for ContainerizationEngine {
    fn from(value: EngineArg) -> Self {
        match value {
            EngineArg::Docker => Self::Docker,
            EngineArg::Apptainer => Self::Apptainer,
            EngineArg::Both => Self::Both,
        }
    }
}

/// Arguments for the `containerize` command.
#[derive(Args, Debug)]
pub struct ContainerizeArgs {
    /// Path to the experiment document.
    pub file: PathBuf,

    /// Directory receiving the document copy and the recipe.
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Trusted `source::package` entry; repeat to build a passlist.
    #[arg(short, long, value_name = "SOURCE::PACKAGE")]
    pub passlist: Vec<String>,

    /// Containerization strategy.
    #[arg(long, value_enum, default_value_t = TypeArg::Single)]
    pub containerization: TypeArg,

    /// Target container runtime.
    #[arg(long, value_enum, default_value_t = EngineArg::Docker)]
    pub engine: EngineArg,
}

impl ContainerizeArgs {
    /// Converts the parsed flags into program arguments.
    ///
    /// An empty passlist means no passlist, so every package is trusted.
    pub fn into_program_arguments(self) -> ProgramArguments {
        ProgramArguments {
            input_file_path: self.file,
            output_dir: self.output_dir,
            passlist_entries: (!self.passlist.is_empty()).then_some(self.passlist),
            containerization_type: self.containerization.into(),
            containerization_engine: self.engine.into(),
        }
    }
}

/// Executes the `containerize` command.
///
/// # Errors
///
/// Returns an error if dependency resolution or recipe generation fails.
pub fn execute(args: ContainerizeArgs) -> anyhow::Result<()> {
    let arguments = args.into_program_arguments();
    tracing::info!(
        path = %arguments.input_file_path.display(),
        containerization = %arguments.containerization_type,
        engine = %arguments.containerization_engine,
        "containerizing experiment"
    );

    let run = execute_bsedic(&arguments)?;
    println!("{}", output::dependency_summary(&run.dependencies));
    match run.written {
        Some(path) => println!("Container build file located at '{}'", path.display()),
        None => println!("{}", run.recipe),
    }
    Ok(())
}
