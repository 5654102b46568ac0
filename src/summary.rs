//! Per-file and total statistics for a single coverage report.

use crate::model::{rate, CoverageModel, SourceFile};
use crate::ranges::{coalesce_ranges, format_line_ranges, LineRange};

/// Path label used for the aggregate row.
pub const TOTAL: &str = "TOTAL";

/// Derived statistics for one file (or the whole report).
#[derive(Debug, Clone, PartialEq)]
pub struct FileStats {
    pub path: String,
    /// Number of tracked lines.
    pub statements: u64,
    /// Number of tracked lines never executed.
    pub missed: u64,
    /// Contiguous missed ranges, empty for the total row.
    pub missing_ranges: Vec<LineRange>,
}

impl FileStats {
    /// Statistics for a file that is absent from a report.
    pub fn empty(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            statements: 0,
            missed: 0,
            missing_ranges: Vec::new(),
        }
    }

    #[must_use]
    pub fn hits(&self) -> u64 {
        self.statements - self.missed
    }

    /// Fraction of statements hit, 1.0 for a file without statements.
    #[must_use]
    pub fn coverage_rate(&self) -> f64 {
        rate(self.hits(), self.statements)
    }

    #[must_use]
    pub fn missing_description(&self) -> String {
        format_line_ranges(&self.missing_ranges)
    }

    /// Aggregate several rows under `path`. Missing ranges are not carried.
    pub fn sum<'a>(path: impl Into<String>, rows: impl IntoIterator<Item = &'a FileStats>) -> Self {
        rows.into_iter()
            .fold(Self::empty(path), |mut acc, row| {
                acc.statements += row.statements;
                acc.missed += row.missed;
                acc
            })
    }
}

/// Statistics for every file of a report plus the total.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub files: Vec<FileStats>,
    pub total: FileStats,
}

/// Compute statistics for one file.
#[must_use]
pub fn file_stats(file: &SourceFile) -> FileStats {
    let tracked: Vec<u32> = file.tracked_lines().collect();
    let missed: Vec<u32> = file.missed_lines().collect();

    FileStats {
        path: file.path().to_string(),
        statements: tracked.len() as u64,
        missed: missed.len() as u64,
        missing_ranges: coalesce_ranges(&missed, &tracked),
    }
}

/// Compute per-file statistics in report order, plus the total.
#[must_use]
pub fn analyze(model: &CoverageModel) -> Summary {
    let files: Vec<FileStats> = model.files().iter().map(file_stats).collect();
    let total = FileStats::sum(TOTAL, &files);
    tracing::debug!(
        files = files.len(),
        statements = total.statements,
        missed = total.missed,
        "analyzed coverage report"
    );
    Summary { files, total }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CoverageData, FileCoverage};

    fn sample() -> CoverageModel {
        CoverageModel::new(CoverageData {
            files: vec![
                FileCoverage::from_hits("Main.java", &[(3, 1), (4, 1), (5, 2)]),
                FileCoverage::from_hits(
                    "search/LinearSearch.java",
                    &[(9, 1), (13, 1), (14, 1), (15, 1), (16, 1), (19, 0), (24, 0)],
                ),
                FileCoverage::new("search/ISortedArraySearch.java".to_string()),
            ],
        })
        .unwrap()
    }

    #[test]
    fn test_file_stats() {
        let summary = analyze(&sample());
        let linear = &summary.files[1];

        assert_eq!(linear.statements, 7);
        assert_eq!(linear.missed, 2);
        assert_eq!(linear.hits(), 5);
        assert_eq!(linear.missing_description(), "19-24");
        assert!((linear.coverage_rate() - 5.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_file_without_statements_is_fully_covered() {
        let summary = analyze(&sample());
        let iface = &summary.files[2];
        assert_eq!(iface.statements, 0);
        assert_eq!(iface.coverage_rate(), 1.0);
        assert_eq!(iface.missing_description(), "");
    }

    #[test]
    fn test_total_row() {
        let model = sample();
        let summary = analyze(&model);

        assert_eq!(summary.total.path, TOTAL);
        assert_eq!(summary.total.statements, model.statements());
        assert_eq!(summary.total.missed, model.missed());
        assert!(summary.total.missing_ranges.is_empty());
    }

    #[test]
    fn test_analyze_is_deterministic() {
        let model = sample();
        assert_eq!(analyze(&model), analyze(&model));
    }
}
