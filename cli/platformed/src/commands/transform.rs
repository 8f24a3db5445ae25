//! `platformed transform`: specialize a single file.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use platformed_core::{Rewrite, Specializer, SpecializerConfig, Transform};
use serde::Serialize;

use super::dialect_for;

/// JSON outcome printed by `--report json`.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub module: &'a str,
    pub target: &'a str,
    pub changed: bool,
    pub rewrite: Option<&'a Rewrite>,
}

pub fn run(
    config: &SpecializerConfig,
    file: &Path,
    id: Option<&str>,
    report: Option<&str>,
) -> Result<()> {
    let output = render(config, file, id, report)?;
    print!("{output}");
    Ok(())
}

/// Transform `file` and render what `run` prints.
pub(crate) fn render(
    config: &SpecializerConfig,
    file: &Path,
    id: Option<&str>,
    report: Option<&str>,
) -> Result<String> {
    if let Some(format) = report {
        if format != "json" {
            bail!("unknown report format '{format}', expected 'json'");
        }
    }

    let code = fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
    let id = id.map(str::to_string).unwrap_or_else(|| file.display().to_string());

    let mut config = config.clone();
    if let Some(dialect) = dialect_for(file) {
        config = config.with_dialect(dialect);
    }
    let specializer = Specializer::new(config);
    let outcome = specializer
        .transform(&code, &id)
        .with_context(|| format!("transforming {id}"))?;

    if report.is_none() {
        return Ok(outcome.code_or(&code).to_string());
    }
    let rewrite = match &outcome {
        Transform::Unchanged => None,
        Transform::Rewritten(rewrite) => Some(rewrite),
    };
    let report = Report {
        module: &id,
        target: specializer.registry().target(),
        changed: rewrite.is_some(),
        rewrite,
    };
    let mut json = serde_json::to_string_pretty(&report).context("serializing report")?;
    json.push('\n');
    Ok(json)
}
