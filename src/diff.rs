//! Reconcile a baseline and a candidate report into per-file, per-line
//! coverage deltas.
//!
//! All deltas are `candidate - baseline`. A file present in only one report
//! is compared against empty statistics on the other side, and a line
//! tracked on only one side is compared against `NotTracked`.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::error::Result;
use crate::model::{CoverageData, CoverageModel, LineStat, SourceFile};
use crate::ranges::{bridges, LineRange};
use crate::summary::{file_stats, FileStats, TOTAL};

/// How a single line changed between the two snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineDiffStatus {
    Unchanged,
    /// Was missed or not tracked, now hit.
    Covered,
    /// Was hit or not tracked, now missed.
    Uncovered,
    /// Missed in both snapshots.
    StillUncovered,
}

impl LineDiffStatus {
    #[must_use]
    pub fn classify(baseline: LineStat, candidate: LineStat) -> Self {
        match (baseline, candidate) {
            (LineStat::Hit(_), LineStat::Hit(_)) => LineDiffStatus::Unchanged,
            (_, LineStat::Hit(_)) => LineDiffStatus::Covered,
            (LineStat::Missed, LineStat::Missed) => LineDiffStatus::StillUncovered,
            (_, LineStat::Missed) => LineDiffStatus::Uncovered,
            (_, LineStat::NotTracked) => LineDiffStatus::Unchanged,
        }
    }
}

/// Classification of one line tracked on at least one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LineDelta {
    pub line: u32,
    pub baseline: LineStat,
    pub candidate: LineStat,
    pub status: LineDiffStatus,
}

/// A run of candidate-side missed lines sharing one status
/// (`Uncovered` or `StillUncovered`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MissingRange {
    #[serde(flatten)]
    pub range: LineRange,
    pub status: LineDiffStatus,
}

impl MissingRange {
    #[must_use]
    pub fn is_new(&self) -> bool {
        self.status == LineDiffStatus::Uncovered
    }
}

/// Coverage delta for one file, or for the whole report (`TOTAL`).
#[derive(Debug, Clone, PartialEq)]
pub struct DiffEntry {
    pub path: String,
    pub baseline: FileStats,
    pub candidate: FileStats,
    pub statements_delta: i64,
    pub missed_delta: i64,
    /// Signed change in coverage rate, in percentage points.
    pub coverage_rate_delta: f64,
    /// Every line tracked on either side, ascending.
    pub lines: Vec<LineDelta>,
    /// Candidate-side missed lines, range-collapsed and tagged new/persistent.
    pub missing: Vec<MissingRange>,
}

impl DiffEntry {
    fn from_stats(
        path: String,
        baseline: FileStats,
        candidate: FileStats,
        lines: Vec<LineDelta>,
        missing: Vec<MissingRange>,
    ) -> Self {
        let statements_delta = candidate.statements as i64 - baseline.statements as i64;
        let missed_delta = candidate.missed as i64 - baseline.missed as i64;
        let coverage_rate_delta = (candidate.coverage_rate() - baseline.coverage_rate()) * 100.0;
        Self {
            path,
            baseline,
            candidate,
            statements_delta,
            missed_delta,
            coverage_rate_delta,
            lines,
            missing,
        }
    }

    fn for_files(path: &str, baseline: Option<&SourceFile>, candidate: Option<&SourceFile>) -> Self {
        let stats = |file: Option<&SourceFile>| file.map_or_else(|| FileStats::empty(path), file_stats);
        let lookup = |file: Option<&SourceFile>, n: u32| file.map_or(LineStat::NotTracked, |f| f.line(n));

        let union: BTreeSet<u32> = baseline
            .into_iter()
            .chain(candidate)
            .flat_map(SourceFile::tracked_lines)
            .collect();

        let lines: Vec<LineDelta> = union
            .into_iter()
            .map(|line| {
                let b = lookup(baseline, line);
                let c = lookup(candidate, line);
                LineDelta {
                    line,
                    baseline: b,
                    candidate: c,
                    status: LineDiffStatus::classify(b, c),
                }
            })
            .collect();

        let tracked: Vec<u32> = candidate
            .map(|f| f.tracked_lines().collect())
            .unwrap_or_default();
        let missing = collapse_missing(&lines, &tracked);

        Self::from_stats(
            path.to_string(),
            stats(baseline),
            stats(candidate),
            lines,
            missing,
        )
    }

    /// Status of a line; lines tracked on neither side are `Unchanged`.
    #[must_use]
    pub fn status(&self, line: u32) -> LineDiffStatus {
        self.lines
            .binary_search_by_key(&line, |d| d.line)
            .map_or(LineDiffStatus::Unchanged, |i| self.lines[i].status)
    }

    /// Line numbers with the given status, ascending.
    pub fn lines_with(&self, status: LineDiffStatus) -> impl Iterator<Item = u32> + '_ {
        self.lines
            .iter()
            .filter(move |d| d.status == status)
            .map(|d| d.line)
    }

    #[must_use]
    pub fn has_uncovered(&self) -> bool {
        self.missing.iter().any(MissingRange::is_new)
    }

    /// Missing lines as "+5, 7-9": `+` marks lines that became uncovered.
    #[must_use]
    pub fn missing_description(&self) -> String {
        self.missing
            .iter()
            .map(|m| {
                if m.is_new() {
                    format!("+{}", m.range)
                } else {
                    m.range.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Group candidate-missed lines into ranges of equal status, bridging
/// lines the candidate does not track.
fn collapse_missing(lines: &[LineDelta], tracked: &[u32]) -> Vec<MissingRange> {
    let mut out: Vec<MissingRange> = Vec::new();

    for delta in lines.iter().filter(|d| d.candidate.is_missed()) {
        match out.last_mut() {
            Some(last)
                if last.status == delta.status && bridges(tracked, last.range.end, delta.line) =>
            {
                last.range.end = delta.line;
            }
            _ => out.push(MissingRange {
                range: LineRange::single(delta.line),
                status: delta.status,
            }),
        }
    }

    out
}

/// The complete comparison: one entry per file plus the total.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffReport {
    pub entries: Vec<DiffEntry>,
    pub total: DiffEntry,
}

impl DiffReport {
    pub fn entry(&self, path: &str) -> Option<&DiffEntry> {
        self.entries.iter().find(|e| e.path == path)
    }

    /// True when any line anywhere became uncovered.
    #[must_use]
    pub fn has_uncovered_lines(&self) -> bool {
        self.entries.iter().any(DiffEntry::has_uncovered)
    }

    /// Files whose candidate-side missed count grew.
    pub fn files_with_more_misses(&self) -> impl Iterator<Item = &DiffEntry> {
        self.entries.iter().filter(|e| e.missed_delta > 0)
    }
}

/// Compare two validated reports.
///
/// Files appear in baseline order, followed by candidate-only files in
/// candidate order.
#[must_use]
pub fn diff(baseline: &CoverageModel, candidate: &CoverageModel) -> DiffReport {
    let mut entries: Vec<DiffEntry> = baseline
        .files()
        .iter()
        .map(|file| DiffEntry::for_files(file.path(), Some(file), candidate.file(file.path())))
        .collect();

    entries.extend(
        candidate
            .files()
            .iter()
            .filter(|file| baseline.file(file.path()).is_none())
            .map(|file| DiffEntry::for_files(file.path(), None, Some(file))),
    );

    let total = DiffEntry::from_stats(
        TOTAL.to_string(),
        FileStats::sum(TOTAL, entries.iter().map(|e| &e.baseline)),
        FileStats::sum(TOTAL, entries.iter().map(|e| &e.candidate)),
        Vec::new(),
        Vec::new(),
    );

    tracing::debug!(
        files = entries.len(),
        statements_delta = total.statements_delta,
        missed_delta = total.missed_delta,
        "computed coverage diff"
    );

    DiffReport { entries, total }
}

/// Validate two parsed reports and compare them.
///
/// Fails with [`crate::error::CovgateError::MalformedInput`] if either side
/// is structurally invalid; no partial report is produced.
pub fn diff_data(baseline: CoverageData, candidate: CoverageData) -> Result<DiffReport> {
    let baseline = CoverageModel::new(baseline)?;
    let candidate = CoverageModel::new(candidate)?;
    Ok(diff(&baseline, &candidate))
}
