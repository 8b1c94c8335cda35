//! # bsedic — SED2 experiment containerizer and compiler
//!
//! Resolves the dependencies embedded in an experiment document, emits the
//! container recipe needed to run it, and compiles the document into a
//! composition schema.

mod commands;
mod execution;
mod output;

use clap::Parser;

use crate::commands::Cli;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    commands::execute(cli)
}
