//! # bsedic-container
//!
//! Turns the dependencies of an experiment document into a container build
//! recipe.
//!
//! - **Template**: the fixed Dockerfile skeleton and its substitution slots.
//! - **Constructor**: reads a document, resolves its dependencies, persists
//!   the localized document and renders the recipe.
//! - **Converter**: translates a Dockerfile into a Singularity definition.

pub mod constructor;
pub mod converter;
pub mod template;
