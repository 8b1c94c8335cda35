//! Textual container build recipes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A Dockerfile or Singularity definition, compared textually.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContainerRecipe {
    /// The recipe text.
    pub representation: String,
}

impl ContainerRecipe {
    /// Wraps recipe text.
    #[must_use]
    pub fn new(representation: impl Into<String>) -> Self {
        Self {
            representation: representation.into(),
        }
    }

    /// Returns the recipe text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.representation
    }
}

impl fmt::Display for ContainerRecipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.representation)
    }
}
