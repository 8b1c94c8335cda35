//! Validated token types used by the experiment entity model.
//!
//! Identifiers (`^[_a-zA-Z]+\w*$`) name definitions, nodes, ports and
//! wirings. Source and type tokens (`^[_a-zA-Z]+[\w\-]*$`) additionally
//! allow dashes. A definition source is either a source token or a
//! localized reference (`local:` followed by a dotted import path). All of
//! them are checked on construction and when deserialized, so a value of
//! these types is always well formed.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::LOCAL_PROTOCOL_PREFIX;
use crate::error::{BsedicError, Result};

const fn is_token_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    chars.next().is_some_and(is_token_start) && chars.all(is_word)
}

fn is_dashed_token(value: &str) -> bool {
    let mut chars = value.chars();
    chars.next().is_some_and(is_token_start) && chars.all(|c| is_word(c) || c == '-')
}

fn is_dotted_import(value: &str) -> bool {
    value.split('.').all(is_identifier)
}

fn is_definition_source(value: &str) -> bool {
    value
        .strip_prefix(LOCAL_PROTOCOL_PREFIX)
        .map_or_else(|| is_dashed_token(value), is_dotted_import)
}

macro_rules! validated_token {
    ($(#[$doc:meta])* $name:ident, $kind:literal, $check:path) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Validates and wraps a token.
            ///
            /// # Errors
            ///
            /// Returns [`BsedicError::InvalidIdentifier`] if the value does not
            /// satisfy the token grammar.
            pub fn new(value: impl Into<String>) -> Result<Self> {
                let value = value.into();
                if $check(&value) {
                    Ok(Self(value))
                } else {
                    Err(BsedicError::InvalidIdentifier { kind: $kind, value })
                }
            }

            /// Returns `true` if `value` would be accepted by [`Self::new`].
            #[must_use]
            pub fn is_valid(value: &str) -> bool {
                $check(value)
            }

            /// Returns the inner string representation.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = BsedicError;

            fn try_from(value: String) -> Result<Self> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

validated_token!(
    /// Name of a definition, node, port, or wiring.
    Identifier,
    "identifier",
    is_identifier
);

validated_token!(
    /// Source token attached to a definition or implementation.
    SourceToken,
    "source",
    is_dashed_token
);

validated_token!(
    /// Source of a document definition: a source token, or the localized
    /// form of a dependency reference.
    DefinitionSource,
    "definition source",
    is_definition_source
);

impl From<SourceToken> for DefinitionSource {
    fn from(token: SourceToken) -> Self {
        Self(token.0)
    }
}

validated_token!(
    /// Port protocol type carried by a wiring.
    TypeToken,
    "type",
    is_dashed_token
);
