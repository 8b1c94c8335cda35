//! The four compiler stages.
//!
//! Each stage is a pure function of its input (plus the fixed
//! [`CompilerSettings`](bsedic_common::config::CompilerSettings) for
//! validation), so the stages can be driven and tested one at a time.

pub mod lift;
pub mod lower;
pub mod resolve;
pub mod validate;

use std::fmt;

pub use lift::lift;
pub use lower::lower;
pub use resolve::resolve;
pub use validate::validate;

/// Position of a stage in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    /// Raw document text checked, errors accumulated.
    Validate,
    /// Document lifted to the abstract entity list.
    Lift,
    /// Abstract nodes routed to implementations.
    Resolve,
    /// Implementation graph lowered to the composition schema.
    Lower,
}

impl Stage {
    /// Zero-based stage number.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validate => "validate",
            Self::Lift => "lift",
            Self::Resolve => "resolve",
            Self::Lower => "lower",
        };
        write!(f, "stage {} ({name})", self.index())
    }
}
