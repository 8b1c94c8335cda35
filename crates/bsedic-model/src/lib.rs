//! # bsedic-model
//!
//! Typed records exchanged between the bsedic components:
//!
//! - **Entity**: experiment definitions, abstract nodes, port wirings and the
//!   entity list passed between compiler stages.
//! - **Implementation**: concrete node implementations the router picks from.
//! - **Dependency**: embedded dependency references and the resolved
//!   per-source dependency sets.
//! - **Recipe**: the textual container build recipe.

pub mod dependency;
pub mod entity;
pub mod implementation;
pub mod recipe;
