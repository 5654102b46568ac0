//! Command handler functions for the covgate CLI.
//!
//! Each `cmd_*` function returns its rendered output as a `String`, making
//! them easy to test without capturing stdout.

use std::path::Path;

use anyhow::{Context, Result};

use crate::outcome::{classify_with, Policy, ResultCode};
use crate::render::{self, RenderOptions};
use crate::{diff, ingest, summary};

/// Rendered diff plus the outcome that drives the exit status.
#[derive(Debug)]
pub struct DiffOutput {
    pub body: String,
    pub result: ResultCode,
}

pub fn cmd_show(report: &Path, format: &str, opts: &RenderOptions) -> Result<String> {
    let renderer = render::lookup(format, opts)?;
    let model = ingest::load(report)
        .with_context(|| format!("Failed to load coverage report {}", report.display()))?;

    let summary = summary::analyze(&model);
    Ok(renderer.render_summary(&summary)?)
}

pub fn cmd_diff(
    baseline: &Path,
    candidate: &Path,
    format: &str,
    opts: &RenderOptions,
    policy: &Policy,
) -> Result<DiffOutput> {
    let renderer = render::lookup(format, opts)?;
    let baseline_model = ingest::load(baseline)
        .with_context(|| format!("Failed to load baseline report {}", baseline.display()))?;
    let candidate_model = ingest::load(candidate)
        .with_context(|| format!("Failed to load candidate report {}", candidate.display()))?;

    let report = diff::diff(&baseline_model, &candidate_model);
    let result = classify_with(&report, policy);
    tracing::info!(?result, "classified coverage diff");

    Ok(DiffOutput {
        body: renderer.render_diff(&report)?,
        result,
    })
}
