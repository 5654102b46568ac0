//! Reduce a [`DiffReport`] to a result code for CI gating.

use serde::Serialize;

use crate::diff::{DiffReport, LineDiffStatus};
use crate::model::LineStat;

/// Outcome of a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultCode {
    Ok,
    /// A file gained missed lines and the overall rate dropped.
    CoverageWorsened,
    /// Overall coverage held up, but some lines became uncovered.
    UncoveredChangesRemain,
}

/// Process exit codes. These values are published and must never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    Ok = 0,
    Exception = 1,
    CoverageWorsened = 2,
    NotAllChangesCovered = 3,
}

impl ExitCode {
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl From<ResultCode> for ExitCode {
    fn from(result: ResultCode) -> Self {
        match result {
            ResultCode::Ok => ExitCode::Ok,
            ResultCode::CoverageWorsened => ExitCode::CoverageWorsened,
            ResultCode::UncoveredChangesRemain => ExitCode::NotAllChangesCovered,
        }
    }
}

/// Gating policy knobs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Policy {
    /// Treat newly added statements that are uncovered as a coverage
    /// regression even when the overall rate did not drop.
    pub new_lines_worsen: bool,
}

/// Classify with the default policy.
#[must_use]
pub fn classify(report: &DiffReport) -> ResultCode {
    classify_with(report, &Policy::default())
}

/// Classify a report. Rules are evaluated in order:
///
/// 1. Some file gained missed lines and the total candidate rate is strictly
///    below the baseline rate: `CoverageWorsened`.
/// 2. Some line became uncovered: `UncoveredChangesRemain`.
/// 3. Otherwise `Ok`.
#[must_use]
pub fn classify_with(report: &DiffReport, policy: &Policy) -> ResultCode {
    let total = &report.total;
    let rate_dropped = total.candidate.coverage_rate() < total.baseline.coverage_rate();
    let more_misses = report.files_with_more_misses().next().is_some();

    if more_misses && rate_dropped {
        return ResultCode::CoverageWorsened;
    }

    if policy.new_lines_worsen && more_misses && has_uncovered_new_statement(report) {
        return ResultCode::CoverageWorsened;
    }

    if report.has_uncovered_lines() {
        return ResultCode::UncoveredChangesRemain;
    }

    ResultCode::Ok
}

fn has_uncovered_new_statement(report: &DiffReport) -> bool {
    report
        .files_with_more_misses()
        .flat_map(|e| &e.lines)
        .any(|d| d.status == LineDiffStatus::Uncovered && d.baseline == LineStat::NotTracked)
}
