//! # bsedic-protocol
//!
//! Dependency references are embedded in free document text using the form
//! `python:{source}<{package}[{version}]>@{import_path}`. This crate finds
//! them, checks them against an optional passlist, deduplicates them per
//! source, and rewrites each one to `local:{import_path}`.
//!
//! - **Grammar**: the compiled reference patterns.
//! - **Whitelist**: parsing of `source::package` passlist entries.
//! - **Parser**: [`determine_dependencies`](parser::determine_dependencies).

pub mod grammar;
pub mod parser;
pub mod whitelist;

pub use parser::determine_dependencies;
