//! Formatted output helpers for CLI commands.

use bsedic_model::dependency::{DependencySource, ExperimentPrimaryDependencies};

/// Formats the resolved dependencies, one source per line.
///
/// Sources without dependencies show `(none)`.
#[must_use]
pub fn dependency_summary(dependencies: &ExperimentPrimaryDependencies) -> String {
    DependencySource::ALL
        .iter()
        .map(|source| {
            let listed = dependencies.for_source(*source);
            if listed.is_empty() {
                format!("{source}: (none)")
            } else {
                format!("{source}: {}", listed.join(", "))
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
