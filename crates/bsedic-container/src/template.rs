//! The Dockerfile template and its generated sections.
//!
//! Slots are written `${#SLOT_NAME}`. The set of slots is scanned from the
//! template once and every slot must have a generator here.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use bsedic_common::constants::PINNED_PYTHON_VERSION;
use bsedic_common::error::{BsedicError, Result};
use bsedic_model::dependency::ExperimentPrimaryDependencies;
use bsedic_model::recipe::ContainerRecipe;
use regex::Regex;

/// Generic single-container recipe skeleton.
pub const DOCKERFILE_TEMPLATE: &str = r#"FROM ghcr.io/astral-sh/uv:python3.12-bookworm

RUN apt update
RUN apt upgrade -y
RUN apt install -y git curl

## Dependency Installs
### Conda
${#CONDA_FORGE_DEPENDENCIES}

### PyPI
${#PYPI_DEPENDENCIES}

##
RUN mkdir /runtime
WORKDIR /runtime
RUN git clone https://github.com/biosimulators/bsew.git  /runtime
RUN python3 -m pip install -e /runtime

ENTRYPOINT ["python3", "/runtime/main.py"]"#;

const PYPI_SLOT: &str = "PYPI_DEPENDENCIES";
const CONDA_SLOT: &str = "CONDA_FORGE_DEPENDENCIES";

const NO_PYPI_PLACEHOLDER: &str = "# No PyPI dependencies!";
const NO_CONDA_PLACEHOLDER: &str = "# No conda dependencies!";

/// Returns the substitution marker of a slot.
#[must_use]
pub fn slot_marker(slot: &str) -> String {
    format!("${{#{slot}}}")
}

#[allow(clippy::expect_used)]
fn scan_slots(template: &str) -> BTreeSet<String> {
    let pattern = Regex::new(r"\$\{#(\w+)\}").expect("slot pattern is a valid regular expression");
    pattern
        .captures_iter(template)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Returns the name of every slot present in [`DOCKERFILE_TEMPLATE`].
pub fn generate_necessary_values() -> Vec<&'static str> {
    static SLOTS: OnceLock<BTreeSet<String>> = OnceLock::new();
    SLOTS
        .get_or_init(|| scan_slots(DOCKERFILE_TEMPLATE))
        .iter()
        .map(String::as_str)
        .collect()
}

/// Formats dependencies as single-quoted `pip install` arguments.
#[must_use]
pub fn installation_arguments(dependencies: &[String]) -> String {
    format!("'{}'", dependencies.join("' '"))
}

fn pypi_section(dependencies: &[String]) -> String {
    if dependencies.is_empty() {
        return NO_PYPI_PLACEHOLDER.to_string();
    }
    format!(
        "RUN python3 -m pip install {}",
        installation_arguments(dependencies)
    )
}

fn conda_section(dependencies: &[String]) -> String {
    if dependencies.is_empty() {
        return NO_CONDA_PLACEHOLDER.to_string();
    }
    [
        "RUN mkdir /micromamba".to_string(),
        "RUN curl -Ls https://micro.mamba.pm/api/micromamba/linux-64/latest | tar -xvj bin/micromamba"
            .to_string(),
        "RUN mv bin/micromamba /usr/local/bin/".to_string(),
        format!(
            "RUN micromamba create -y -p /opt/conda -c conda-forge {} python={PINNED_PYTHON_VERSION}",
            dependencies.join(" ")
        ),
        "ENV PATH=/opt/conda/bin:$PATH".to_string(),
    ]
    .join("\n")
}

fn render_slot(slot: &str, dependencies: &ExperimentPrimaryDependencies) -> Result<String> {
    match slot {
        PYPI_SLOT => Ok(pypi_section(dependencies.pypi())),
        CONDA_SLOT => Ok(conda_section(dependencies.conda())),
        other => Err(BsedicError::UnknownTemplateSlot {
            slot: other.to_string(),
        }),
    }
}

fn fill<'a>(
    template: &str,
    slots: impl IntoIterator<Item = &'a str>,
    dependencies: &ExperimentPrimaryDependencies,
) -> Result<String> {
    let mut rendered = template.to_string();
    for slot in slots {
        let section = render_slot(slot, dependencies)?;
        rendered = rendered.replace(&slot_marker(slot), &section);
    }
    Ok(rendered)
}

/// Fills every slot of `template` from the resolved dependencies.
///
/// # Errors
///
/// Returns [`BsedicError::UnknownTemplateSlot`] if the template names a slot
/// without a generator.
pub fn render_template(
    template: &str,
    dependencies: &ExperimentPrimaryDependencies,
) -> Result<String> {
    let slots = scan_slots(template);
    fill(template, slots.iter().map(String::as_str), dependencies)
}

/// Renders [`DOCKERFILE_TEMPLATE`] for the given dependencies.
///
/// # Errors
///
/// Returns [`BsedicError::UnknownTemplateSlot`] if the template and the
/// generators are out of sync.
pub fn render_recipe(dependencies: &ExperimentPrimaryDependencies) -> Result<ContainerRecipe> {
    let rendered = fill(DOCKERFILE_TEMPLATE, generate_necessary_values(), dependencies)?;
    tracing::debug!(
        pypi = dependencies.pypi().len(),
        conda = dependencies.conda().len(),
        "rendered container recipe"
    );
    Ok(ContainerRecipe::new(rendered))
}
