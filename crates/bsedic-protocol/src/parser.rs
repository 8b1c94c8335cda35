//! Extraction and localization of embedded dependency references.

use bsedic_common::error::{BsedicError, Result};
use bsedic_model::dependency::{DependencyReference, ExperimentPrimaryDependencies, Whitelist};
use regex::Captures;

use crate::grammar::{reference_pattern, scan_local_references, scan_references};
use crate::whitelist::parse_whitelist;

/// Extracts the dependencies of a document and localizes its references.
///
/// Every `python:` reference is checked in order of appearance: its source
/// must be known, and when `whitelist_entries` is given the source and
/// package must be trusted. Dependencies are recorded per source as
/// `package + version`, first occurrence wins. Every reference is then
/// replaced by `local:{import_path}` in a new string, which is returned
/// trimmed. The input text is left untouched.
///
/// # Errors
///
/// - [`BsedicError::InvalidWhitelistEntry`] for a malformed passlist entry.
/// - [`BsedicError::UnknownSource`] for a source other than `pypi`/`conda`.
/// - [`BsedicError::UnapprovedSource`] / [`BsedicError::UntrustedPackage`]
///   when the passlist does not cover a reference.
/// - [`BsedicError::NoDependencies`] if the text holds no references at all.
/// - [`BsedicError::UnresolvedLocalProtocol`] if the text only holds
///   already-localized references.
pub fn determine_dependencies(
    text: &str,
    whitelist_entries: Option<&[String]>,
) -> Result<(ExperimentPrimaryDependencies, String)> {
    let whitelist = whitelist_entries.map(parse_whitelist).transpose()?;

    let matches = scan_references(text);
    if matches.is_empty() {
        let locals = scan_local_references(text);
        if locals.is_empty() {
            return Err(BsedicError::NoDependencies);
        }
        return Err(BsedicError::UnresolvedLocalProtocol {
            protocols: locals.join(","),
        });
    }

    let mut dependencies = ExperimentPrimaryDependencies::default();
    let mut references = Vec::with_capacity(matches.len());
    for found in &matches {
        let reference = found.to_reference()?;
        if let Some(whitelist) = &whitelist {
            check_trusted(whitelist, &reference)?;
        }
        let canonical = reference.canonical();
        if dependencies.record(reference.source, canonical.clone()) {
            tracing::debug!(source = %reference.source, dependency = %canonical, "recorded dependency");
        } else {
            tracing::debug!(
                reference = %reference.full_token(),
                dependency = %canonical,
                "skipping duplicate dependency"
            );
        }
        references.push(reference);
    }

    // Matches are visited in the same order they were scanned.
    let mut locals = references.iter().map(DependencyReference::local_token);
    let rewritten = reference_pattern()
        .replace_all(text, |_: &Captures<'_>| locals.next().unwrap_or_default());

    tracing::info!(
        references = matches.len(),
        pypi = dependencies.pypi().len(),
        conda = dependencies.conda().len(),
        "determined document dependencies"
    );
    Ok((dependencies, rewritten.trim().to_string()))
}

fn check_trusted(whitelist: &Whitelist, reference: &DependencyReference) -> Result<()> {
    let source = reference.source.as_str();
    if !whitelist.approves_source(source) {
        return Err(BsedicError::UnapprovedSource {
            source_name: source.to_string(),
        });
    }
    if !whitelist.trusts(source, &reference.package) {
        return Err(BsedicError::UntrustedPackage {
            source_name: source.to_string(),
            package: reference.package.clone(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIXED_DOCUMENT: &str = "
`python:pypi<numpy[>=2.0.0]>@numpy.random.rand`
`python:pypi<process-bigraph[<1.0]>@process_bigraph.processes.ParameterScan`
`python:pypi<importlib>@importlib.metadata.distribution`
`python:conda<readdy>@readdy.ReactionDiffusionSystem`
    ";

    fn passlist(entries: &[&str]) -> Vec<String> {
        entries.iter().map(|e| (*e).to_string()).collect()
    }

    #[test]
    fn determines_dependencies_and_rewrites_document() {
        let (deps, rewritten) = determine_dependencies(MIXED_DOCUMENT, None).expect("parse");
        assert_eq!(
            deps.pypi(),
            ["numpy>=2.0.0", "process-bigraph<1.0", "importlib"]
        );
        assert_eq!(deps.conda(), ["readdy"]);
        assert_eq!(
            rewritten,
            "`local:numpy.random.rand`\n\
             `local:process_bigraph.processes.ParameterScan`\n\
             `local:importlib.metadata.distribution`\n\
             `local:readdy.ReactionDiffusionSystem`"
        );
    }

    #[test]
    fn single_reference_end_to_end() {
        let (deps, rewritten) =
            determine_dependencies("`python:pypi<numpy[>=2.0.0]>@numpy.random.rand`", None)
                .expect("parse");
        assert_eq!(deps.pypi(), ["numpy>=2.0.0"]);
        assert!(deps.conda().is_empty());
        assert_eq!(rewritten, "`local:numpy.random.rand`");
    }

    #[test]
    fn duplicates_are_recorded_once_in_first_seen_order() {
        let text = "python:pypi<scipy>@scipy.integrate \
                    python:pypi<numpy[>=2.0.0]>@numpy.random.rand \
                    python:pypi<scipy>@scipy.optimize";
        let (deps, rewritten) = determine_dependencies(text, None).expect("parse");
        assert_eq!(deps.pypi(), ["scipy", "numpy>=2.0.0"]);
        assert_eq!(
            rewritten,
            "local:scipy.integrate local:numpy.random.rand local:scipy.optimize"
        );
    }

    #[test]
    fn same_package_with_different_versions_is_kept_twice() {
        let text = "python:pypi<numpy[<2]>@numpy.a python:pypi<numpy[>=2]>@numpy.b";
        let (deps, _) = determine_dependencies(text, None).expect("parse");
        assert_eq!(deps.pypi(), ["numpy<2", "numpy>=2"]);
    }

    #[test]
    fn input_text_is_not_modified() {
        let original = MIXED_DOCUMENT.to_string();
        let _ = determine_dependencies(&original, None).expect("parse");
        assert_eq!(original, MIXED_DOCUMENT);
    }

    #[test]
    fn rewritten_text_has_no_remaining_references() {
        let (_, rewritten) = determine_dependencies(MIXED_DOCUMENT, None).expect("parse");
        assert!(scan_references(&rewritten).is_empty());
        let err = determine_dependencies(&rewritten, None).unwrap_err();
        match err {
            BsedicError::UnresolvedLocalProtocol { protocols } => {
                assert!(protocols.contains("local:numpy.random.rand"), "got: {protocols}");
                assert!(protocols.contains("local:readdy.ReactionDiffusionSystem"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn extraction_is_deterministic() {
        let first = determine_dependencies(MIXED_DOCUMENT, None).expect("parse");
        let second = determine_dependencies(MIXED_DOCUMENT, None).expect("parse");
        assert_eq!(first, second);
    }

    #[test]
    fn empty_document_has_no_dependencies() {
        let err = determine_dependencies("no references here", None).unwrap_err();
        assert!(matches!(err, BsedicError::NoDependencies));
    }

    #[test]
    fn unknown_source_fails() {
        let err = determine_dependencies("python:github<numpy>@numpy", None).unwrap_err();
        assert!(matches!(err, BsedicError::UnknownSource { ref source_name } if source_name == "github"));
    }

    #[test]
    fn passlist_accepts_trusted_packages() {
        let entries = passlist(&[
            "pypi::numpy",
            "pypi::process-bigraph",
            "pypi::importlib",
            "conda::readdy",
        ]);
        let (deps, _) = determine_dependencies(MIXED_DOCUMENT, Some(entries.as_slice())).expect("trusted");
        assert_eq!(deps.len(), 4);
    }

    #[test]
    fn passlist_rejects_untrusted_package() {
        let entries = passlist(&["pypi::numpy", "conda::readdy"]);
        let err = determine_dependencies(MIXED_DOCUMENT, Some(entries.as_slice())).unwrap_err();
        assert!(
            matches!(err, BsedicError::UntrustedPackage { ref package, .. } if package == "process-bigraph"),
            "got: {err}"
        );
    }

    #[test]
    fn passlist_rejects_unapproved_source() {
        let entries = passlist(&["pypi::numpy"]);
        let err = determine_dependencies("python:conda<readdy>@readdy.Sim", Some(entries.as_slice()))
            .unwrap_err();
        assert!(matches!(err, BsedicError::UnapprovedSource { ref source_name } if source_name == "conda"));
    }

    #[test]
    fn malformed_passlist_fails_before_scanning() {
        let entries = passlist(&["numpy"]);
        let err = determine_dependencies(MIXED_DOCUMENT, Some(entries.as_slice())).unwrap_err();
        assert!(matches!(err, BsedicError::InvalidWhitelistEntry { .. }));
    }
}
