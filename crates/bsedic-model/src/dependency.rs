//! Dependency references embedded in experiment documents.
//!
//! A reference has the wire form
//! `python:{source}<{package}[{version}]>@{import_path}` and is rewritten to
//! `local:{import_path}` once its package has been recorded.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use bsedic_common::constants::{LOCAL_PROTOCOL_PREFIX, PYTHON_PROTOCOL_PREFIX};
use serde::{Deserialize, Serialize};

/// Package index a dependency is installed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencySource {
    /// The Python Package Index, installed with `pip`.
    Pypi,
    /// conda-forge, installed with `micromamba`.
    Conda,
}

impl DependencySource {
    /// Every known source, in reporting order.
    pub const ALL: [Self; 2] = [Self::Pypi, Self::Conda];

    /// Parses a source name as written in a reference.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "pypi" => Some(Self::Pypi),
            "conda" => Some(Self::Conda),
            _ => None,
        }
    }

    /// Returns the name used in references and passlists.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pypi => "pypi",
            Self::Conda => "conda",
        }
    }
}

impl fmt::Display for DependencySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One embedded dependency reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyReference {
    /// Package index.
    pub source: DependencySource,
    /// Package name (or repository URL).
    pub package: String,
    /// Version constraint without the surrounding brackets.
    pub version_constraint: Option<String>,
    /// Dotted Python import path of the referenced object.
    pub import_path: String,
}

impl DependencyReference {
    /// Returns the install string: package immediately followed by the
    /// version constraint. This is also the deduplication key per source.
    #[must_use]
    pub fn canonical(&self) -> String {
        format!(
            "{}{}",
            self.package,
            self.version_constraint.as_deref().unwrap_or_default()
        )
        .trim()
        .to_string()
    }

    /// Returns the reference in its embedded wire form.
    #[must_use]
    pub fn full_token(&self) -> String {
        let version = self
            .version_constraint
            .as_ref()
            .map_or_else(String::new, |v| format!("[{v}]"));
        format!(
            "{PYTHON_PROTOCOL_PREFIX}{}<{}{version}>@{}",
            self.source, self.package, self.import_path
        )
    }

    /// Returns the localized form that replaces the wire form.
    #[must_use]
    pub fn local_token(&self) -> String {
        format!("{LOCAL_PROTOCOL_PREFIX}{}", self.import_path)
    }
}

/// Deduplicated dependencies of one experiment, grouped per source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentPrimaryDependencies {
    pypi: Vec<String>,
    conda: Vec<String>,
}

impl ExperimentPrimaryDependencies {
    /// Creates a dependency set from already ordered lists.
    #[must_use]
    pub const fn new(pypi: Vec<String>, conda: Vec<String>) -> Self {
        Self { pypi, conda }
    }

    /// Records a canonical dependency string.
    ///
    /// Returns `false` (and records nothing) if the string is already
    /// present for that source.
    pub fn record(&mut self, source: DependencySource, dependency: String) -> bool {
        let list = match source {
            DependencySource::Pypi => &mut self.pypi,
            DependencySource::Conda => &mut self.conda,
        };
        if list.contains(&dependency) {
            return false;
        }
        list.push(dependency);
        true
    }

    /// Returns the dependencies of one source, first-seen order.
    #[must_use]
    pub fn for_source(&self, source: DependencySource) -> &[String] {
        match source {
            DependencySource::Pypi => &self.pypi,
            DependencySource::Conda => &self.conda,
        }
    }

    /// Returns the PyPI dependencies.
    #[must_use]
    pub fn pypi(&self) -> &[String] {
        &self.pypi
    }

    /// Returns the conda dependencies.
    #[must_use]
    pub fn conda(&self) -> &[String] {
        &self.conda
    }

    /// Total number of recorded dependencies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pypi.len() + self.conda.len()
    }

    /// Returns `true` if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Passlist of trusted packages, grouped per source name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Whitelist {
    entries: BTreeMap<String, BTreeSet<String>>,
}

impl Whitelist {
    /// Adds a trusted `(source, package)` pair.
    pub fn insert(&mut self, source: impl Into<String>, package: impl Into<String>) {
        let _ = self
            .entries
            .entry(source.into())
            .or_default()
            .insert(package.into());
    }

    /// Returns `true` if any package of `source` is trusted.
    #[must_use]
    pub fn approves_source(&self, source: &str) -> bool {
        self.entries.contains_key(source)
    }

    /// Returns `true` if `package` from `source` is trusted.
    #[must_use]
    pub fn trusts(&self, source: &str, package: &str) -> bool {
        self.entries
            .get(source)
            .is_some_and(|packages| packages.contains(package))
    }
}
