//! Conversion of Dockerfiles into other container definition formats.
//!
//! The conversion is a plain text-to-text transform behind
//! [`RecipeConverter`], so another backend can replace the built-in
//! [`SingularityConverter`] without touching callers.

use bsedic_common::error::{BsedicError, Result};
use bsedic_model::recipe::ContainerRecipe;

/// Translates a Dockerfile recipe into another definition format.
pub trait RecipeConverter {
    /// Converts `dockerfile` into the target format.
    ///
    /// # Errors
    ///
    /// Returns an error if the Dockerfile uses constructs the target format
    /// cannot express.
    fn convert(&self, dockerfile: &ContainerRecipe) -> Result<ContainerRecipe>;
}

/// Converts Dockerfiles into Singularity/Apptainer definition files.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingularityConverter;

#[derive(Debug, Default)]
struct Definition {
    from: Option<String>,
    files: Vec<String>,
    labels: Vec<String>,
    post: Vec<String>,
    environment: Vec<String>,
    entrypoint: Vec<String>,
    cmd: Vec<String>,
}

impl Definition {
    fn render(&self) -> Result<String> {
        let from = self
            .from
            .as_ref()
            .ok_or_else(|| conversion_err("Dockerfile has no FROM instruction".into()))?;
        let mut out = format!("Bootstrap: docker\nFrom: {from}\n");
        push_section(&mut out, "files", &self.files);
        push_section(&mut out, "labels", &self.labels);
        push_section(&mut out, "post", &self.post);
        push_section(&mut out, "environment", &self.environment);
        let run: Vec<&str> = self
            .entrypoint
            .iter()
            .chain(&self.cmd)
            .map(String::as_str)
            .collect();
        if !run.is_empty() {
            let runscript = vec![format!("exec {} \"$@\"", run.join(" "))];
            push_section(&mut out, "runscript", &runscript);
        }
        Ok(out.trim_end().to_string())
    }
}

fn push_section(out: &mut String, name: &str, lines: &[String]) {
    if lines.is_empty() {
        return;
    }
    out.push('\n');
    out.push('%');
    out.push_str(name);
    out.push('\n');
    for line in lines {
        out.push_str(line);
        out.push('\n');
    }
}

const fn conversion_err(message: String) -> BsedicError {
    BsedicError::Conversion { message }
}

/// Joins `\`-continued lines and drops blanks and comments.
fn logical_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut pending = String::new();
    for raw in text.lines() {
        let trimmed = raw.trim();
        if pending.is_empty() && (trimmed.is_empty() || trimmed.starts_with('#')) {
            continue;
        }
        if let Some(continued) = trimmed.strip_suffix('\\') {
            pending.push_str(continued.trim_end());
            pending.push(' ');
            continue;
        }
        pending.push_str(trimmed);
        lines.push(std::mem::take(&mut pending));
    }
    if !pending.trim().is_empty() {
        lines.push(pending.trim().to_string());
    }
    lines
}

/// Parses the exec form (`["a", "b"]`) or shell form of ENTRYPOINT/CMD.
fn command_words(argument: &str) -> Result<Vec<String>> {
    if argument.starts_with('[') {
        serde_json::from_str::<Vec<String>>(argument)
            .map_err(|e| conversion_err(format!("invalid exec form `{argument}`: {e}")))
    } else {
        Ok(vec![argument.to_string()])
    }
}

/// Splits on whitespace outside quotes and backslash escapes. Quotes and
/// escapes are kept so the shell sees the same value Docker would.
fn split_unquoted(argument: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for c in argument.chars() {
        if escaped {
            current.push(c);
            escaped = false;
            continue;
        }
        match c {
            '\\' if quote != Some('\'') => {
                current.push(c);
                escaped = true;
            }
            '"' | '\'' if quote.is_none() => {
                quote = Some(c);
                current.push(c);
            }
            c if quote == Some(c) => {
                quote = None;
                current.push(c);
            }
            c if quote.is_none() && c.is_whitespace() => {
                if !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Parses `ENV KEY=VALUE ...` or the legacy `ENV KEY VALUE` form.
fn environment_exports(argument: &str) -> Vec<String> {
    let is_pair_form = argument
        .split_whitespace()
        .next()
        .is_some_and(|key| key.contains('='));
    if is_pair_form {
        split_unquoted(argument)
            .into_iter()
            .map(|pair| format!("export {pair}"))
            .collect()
    } else {
        match argument.split_once(char::is_whitespace) {
            Some((key, value)) => vec![format!("export {key}={}", value.trim())],
            None => vec![format!("export {argument}=")],
        }
    }
}

impl SingularityConverter {
    fn apply(definition: &mut Definition, line: &str) -> Result<()> {
        let (instruction, argument) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(i, a)| (i, a.trim()));
        match instruction.to_ascii_uppercase().as_str() {
            "FROM" => {
                if definition.from.is_some() {
                    return Err(conversion_err(
                        "multi-stage Dockerfiles are not supported".into(),
                    ));
                }
                let image = argument.split_whitespace().next().unwrap_or_default();
                definition.from = Some(image.to_string());
            }
            "RUN" => definition.post.push(argument.to_string()),
            "WORKDIR" => {
                definition.post.push(format!("mkdir -p {argument}"));
                definition.post.push(format!("cd {argument}"));
            }
            "ENV" => {
                let exports = environment_exports(argument);
                definition.post.extend(exports.iter().cloned());
                definition.environment.extend(exports);
            }
            "LABEL" => definition.labels.push(argument.replacen('=', " ", 1)),
            "COPY" | "ADD" => definition.files.push(argument.to_string()),
            "ENTRYPOINT" => definition.entrypoint = command_words(argument)?,
            "CMD" => definition.cmd = command_words(argument)?,
            "EXPOSE" => {
                tracing::warn!(ports = argument, "EXPOSE has no Singularity equivalent; skipping");
            }
            other => {
                return Err(conversion_err(format!(
                    "unsupported Dockerfile instruction: {other}"
                )));
            }
        }
        Ok(())
    }
}

impl RecipeConverter for SingularityConverter {
    fn convert(&self, dockerfile: &ContainerRecipe) -> Result<ContainerRecipe> {
        let mut definition = Definition::default();
        for line in logical_lines(dockerfile.as_str()) {
            Self::apply(&mut definition, &line)?;
        }
        let rendered = definition.render()?;
        tracing::debug!(
            lines = rendered.lines().count(),
            "converted Dockerfile to Singularity definition"
        );
        Ok(ContainerRecipe::new(rendered))
    }
}

#[cfg(test)]
mod tests {
    use bsedic_model::dependency::ExperimentPrimaryDependencies;

    use super::*;
    use crate::template::render_recipe;

    const CONDA_DEFINITION: &str = r#"Bootstrap: docker
From: ghcr.io/astral-sh/uv:python3.12-bookworm

%post
apt update
apt upgrade -y
apt install -y git curl
mkdir /micromamba
curl -Ls https://micro.mamba.pm/api/micromamba/linux-64/latest | tar -xvj bin/micromamba
mv bin/micromamba /usr/local/bin/
micromamba create -y -p /opt/conda -c conda-forge readdy python=3.12
export PATH=/opt/conda/bin:$PATH
mkdir /runtime
mkdir -p /runtime
cd /runtime
git clone https://github.com/biosimulators/bsew.git  /runtime
python3 -m pip install -e /runtime

%environment
export PATH=/opt/conda/bin:$PATH

%runscript
exec python3 /runtime/main.py "$@""#;

    fn convert(text: &str) -> Result<String> {
        SingularityConverter
            .convert(&ContainerRecipe::new(text))
            .map(|r| r.representation)
    }

    #[test]
    fn converts_rendered_recipe() {
        let dockerfile =
            render_recipe(&ExperimentPrimaryDependencies::new(Vec::new(), vec!["readdy".into()]))
                .expect("render");
        let definition = SingularityConverter.convert(&dockerfile).expect("convert");
        assert_eq!(definition.as_str(), CONDA_DEFINITION);
    }

    #[test]
    fn joins_continued_lines() {
        let out = convert("FROM alpine\nRUN apk add \\\n    git \\\n    curl").expect("convert");
        assert!(out.ends_with("%post\napk add git curl"), "got: {out}");
    }

    #[test]
    fn entrypoint_and_cmd_are_combined() {
        let out = convert("FROM alpine\nENTRYPOINT [\"python3\"]\nCMD [\"main.py\"]").expect("convert");
        assert!(out.ends_with("%runscript\nexec python3 main.py \"$@\""), "got: {out}");
    }

    #[test]
    fn legacy_env_form_is_exported() {
        let out = convert("FROM alpine\nENV MODE fast").expect("convert");
        assert!(out.contains("%environment\nexport MODE=fast"), "got: {out}");
    }

    #[test]
    fn quoted_env_values_stay_whole() {
        let dockerfile = "FROM alpine\nENV GREETING=\"hello world\" NAME='a b' PATH_X=c\\ d MODE=fast";
        let out = convert(dockerfile).expect("convert");
        assert!(
            out.contains(
                "%environment\n\
                 export GREETING=\"hello world\"\n\
                 export NAME='a b'\n\
                 export PATH_X=c\\ d\n\
                 export MODE=fast"
            ),
            "got: {out}"
        );
    }

    #[test]
    fn legacy_env_value_may_contain_equals() {
        let out = convert("FROM alpine\nENV OPTS --level=3 --fast").expect("convert");
        assert!(out.contains("export OPTS=--level=3 --fast"), "got: {out}");
    }

    #[test]
    fn labels_and_files_get_sections() {
        let out = convert("FROM alpine\nLABEL maintainer=lab\nCOPY model.xml /data/model.xml")
            .expect("convert");
        assert!(out.contains("%files\nmodel.xml /data/model.xml"), "got: {out}");
        assert!(out.contains("%labels\nmaintainer lab"), "got: {out}");
    }

    #[test]
    fn missing_from_fails() {
        let err = convert("RUN echo hi").unwrap_err();
        assert!(err.to_string().contains("no FROM"), "got: {err}");
    }

    #[test]
    fn multi_stage_fails() {
        let err = convert("FROM a AS build\nFROM b").unwrap_err();
        assert!(err.to_string().contains("multi-stage"), "got: {err}");
    }

    #[test]
    fn unsupported_instruction_fails() {
        let err = convert("FROM alpine\nHEALTHCHECK CMD true").unwrap_err();
        assert!(err.to_string().contains("HEALTHCHECK"), "got: {err}");
    }

    #[test]
    fn malformed_exec_form_fails() {
        let err = convert("FROM alpine\nENTRYPOINT [\"python3\"").unwrap_err();
        assert!(err.to_string().contains("invalid exec form"), "got: {err}");
    }
}
