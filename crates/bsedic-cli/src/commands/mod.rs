//! CLI command definitions and dispatch.

pub mod compile;
pub mod containerize;

use clap::{Parser, Subcommand};

/// bsedic — containerize and compile SED2 experiment documents.
#[derive(Parser, Debug)]
#[command(name = bsedic_common::constants::BIN_NAME, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve document dependencies and write the container recipe.
    Containerize(containerize::ContainerizeArgs),
    /// Compile a localized document into a composition schema.
    Compile(compile::CompileArgs),
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Containerize(args) => containerize::execute(args),
        Command::Compile(args) => compile::execute(args),
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_containerize_flags() {
        let cli = Cli::try_parse_from([
            "bsedic",
            "containerize",
            "experiment.json",
            "-o",
            "out",
            "-p",
            "pypi::numpy",
            "-p",
            "conda::readdy",
            "--containerization",
            "none",
            "--engine",
            "both",
        ])
        .expect("parse");
        let Command::Containerize(args) = cli.command else {
            panic!("expected containerize");
        };
        assert_eq!(args.passlist, vec!["pypi::numpy", "conda::readdy"]);
        assert_eq!(args.containerization, containerize::TypeArg::None);
        assert_eq!(args.engine, containerize::EngineArg::Both);
    }

    #[test]
    fn compile_requires_registry() {
        assert!(Cli::try_parse_from(["bsedic", "compile", "experiment.json"]).is_err());
    }
}
