//! System-wide constants and default file names.

/// Binary name for the CLI.
pub const BIN_NAME: &str = "bsedic";

/// File name of the generated Docker build recipe.
pub const DOCKERFILE_NAME: &str = "Dockerfile";

/// File name of the converted Singularity definition.
pub const SINGULARITY_DEFINITION_NAME: &str = "singularity.def";

/// Extensions of experiment archives (COMBINE/OMEX bundles).
pub const ARCHIVE_EXTENSIONS: [&str; 2] = ["zip", "omex"];

/// Interpreter version pinned into conda environments.
pub const PINNED_PYTHON_VERSION: &str = "3.12";

/// Separator between source and package in a passlist entry.
pub const WHITELIST_SEPARATOR: &str = "::";

/// Prefix of a localized dependency reference.
pub const LOCAL_PROTOCOL_PREFIX: &str = "local:";

/// Prefix of an embedded dependency reference.
pub const PYTHON_PROTOCOL_PREFIX: &str = "python:";
