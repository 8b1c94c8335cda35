//! # bsedic-compiler
//!
//! Compiles SED2 experiment documents into composition schemas.
//!
//! - **Registry**: concrete node implementations grouped by the abstract
//!   definition they fulfil.
//! - **Router**: picks the implementation whose ports match a node exactly.
//! - **Stage**: the four pure compiler stages (validate, lift, resolve,
//!   lower).
//! - **Schema**: the lowered composition/state document.
//! - **Compiler**: [`SedCompiler`](compiler::SedCompiler), chaining the
//!   stages under fixed settings.

pub mod compiler;
pub mod registry;
pub mod router;
pub mod schema;
pub mod stage;
