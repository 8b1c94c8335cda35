//! Compiled patterns of the dependency reference grammar.

use std::sync::OnceLock;

use bsedic_common::constants::{LOCAL_PROTOCOL_PREFIX, PYTHON_PROTOCOL_PREFIX};
use bsedic_common::error::{BsedicError, Result};
use bsedic_model::dependency::{DependencyReference, DependencySource};
use regex::{Captures, Regex};

/// Characters allowed in a source name.
const SOURCE_SYNTAX: &str = r"[\w\-]+";

/// Characters allowed in a package name or git/http repository name.
const PACKAGE_SYNTAX: &str = r"[\w\-._\~:/?#\[\]@!$\&'()*+,;=%]+";

/// Bracketed version constraint.
const VERSION_SYNTAX: &str = r"\[(?P<version>[\w><=\~!*\-.]+)\]";

/// Legal Python module path: dotted identifiers.
const IMPORT_SYNTAX: &str = r"[A-Za-z_]\w*(?:\.[A-Za-z_]\w*)*";

#[allow(clippy::expect_used)]
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("reference grammar is a valid regular expression")
}

/// Pattern matching an embedded `python:` reference.
pub fn reference_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        compile(&format!(
            "{PYTHON_PROTOCOL_PREFIX}(?P<source>{SOURCE_SYNTAX})<(?P<package>{PACKAGE_SYNTAX})(?:{VERSION_SYNTAX})?>@(?P<import>{IMPORT_SYNTAX})"
        ))
    })
}

/// Pattern matching an already localized `local:` reference.
pub fn local_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| compile(&format!("{LOCAL_PROTOCOL_PREFIX}{IMPORT_SYNTAX}")))
}

/// One grammar match, borrowed from the scanned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceMatch<'a> {
    /// The complete matched token.
    pub full: &'a str,
    /// Source name as written.
    pub source: &'a str,
    /// Package name.
    pub package: &'a str,
    /// Version constraint, without brackets.
    pub version: Option<&'a str>,
    /// Dotted import path.
    pub import_path: &'a str,
}

impl<'a> ReferenceMatch<'a> {
    fn from_captures(caps: &Captures<'a>) -> Option<Self> {
        Some(Self {
            full: caps.get(0)?.as_str(),
            source: caps.name("source")?.as_str(),
            package: caps.name("package")?.as_str(),
            version: caps.name("version").map(|m| m.as_str()),
            import_path: caps.name("import")?.as_str(),
        })
    }

    /// Converts the match into a typed reference.
    ///
    /// # Errors
    ///
    /// Returns [`BsedicError::UnknownSource`] if the source is neither
    /// `pypi` nor `conda`.
    pub fn to_reference(&self) -> Result<DependencyReference> {
        let source =
            DependencySource::from_name(self.source).ok_or_else(|| BsedicError::UnknownSource {
                source_name: self.source.to_string(),
            })?;
        Ok(DependencyReference {
            source,
            package: self.package.to_string(),
            version_constraint: self.version.map(str::to_string),
            import_path: self.import_path.to_string(),
        })
    }
}

/// Returns every `python:` reference in `text`, in order of appearance.
pub fn scan_references(text: &str) -> Vec<ReferenceMatch<'_>> {
    reference_pattern()
        .captures_iter(text)
        .filter_map(|caps| ReferenceMatch::from_captures(&caps))
        .collect()
}

/// Returns every `local:` reference in `text`, in order of appearance.
pub fn scan_local_references(text: &str) -> Vec<&str> {
    local_pattern().find_iter(text).map(|m| m.as_str()).collect()
}
