//! `bsedic compile` — Compile a localized document into a composition schema.

use std::path::PathBuf;

use bsedic_common::config::CompilerSettings;
use bsedic_compiler::compiler::SedCompiler;
use bsedic_compiler::registry::ImplementationRegistry;
use bsedic_compiler::router::LocalRouter;
use bsedic_container::constructor::{read_document, write_document};
use clap::Args;

/// Arguments for the `compile` command.
#[derive(Args, Debug)]
pub struct CompileArgs {
    /// Path to the (localized) experiment document.
    pub file: PathBuf,

    /// JSON file listing the available node implementations.
    #[arg(short, long)]
    pub registry: PathBuf,

    /// Write the schema to a file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Accept documents that still carry `python:` references.
    #[arg(long)]
    pub allow_unresolved: bool,
}

/// Executes the `compile` command.
///
/// # Errors
///
/// Returns an error if the document or registry cannot be read, or if any
/// compiler stage fails.
pub fn execute(args: CompileArgs) -> anyhow::Result<()> {
    tracing::info!(path = %args.file.display(), "compiling experiment document");

    let registry = ImplementationRegistry::load(&args.registry)?;
    let router = LocalRouter::new(&registry);
    let settings = CompilerSettings {
        reject_unresolved_references: !args.allow_unresolved,
    };
    let compiler = SedCompiler::new(settings, &router);

    let document = read_document(&args.file)?;
    let schema = compiler.compile(&document)?.to_json_pretty()?;

    if let Some(ref out_path) = args.output {
        write_document(out_path, &schema)?;
        println!("Compiled {} -> {}", args.file.display(), out_path.display());
    } else {
        println!("{schema}");
    }
    Ok(())
}
