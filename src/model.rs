//! Uniform in-memory representation of coverage data, independent of any
//! specific format. Parsers produce a `CoverageData`, which is validated
//! into an immutable [`CoverageModel`] before any analysis happens.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::error::{CovgateError, Result};

/// Compute a coverage rate, returning 1.0 when the total is zero.
#[must_use]
pub fn rate(covered: u64, total: u64) -> f64 {
    if total == 0 {
        1.0
    } else {
        covered as f64 / total as f64
    }
}

/// A single line that was instrumentable, as delivered by a parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineCoverage {
    pub line_number: u32,
    pub hit_count: u64,
}

/// Raw coverage records for a single source file.
#[derive(Debug, Clone, Default)]
pub struct FileCoverage {
    pub path: String,
    pub lines: Vec<LineCoverage>,
}

impl FileCoverage {
    pub fn new(path: String) -> Self {
        Self {
            path,
            ..Default::default()
        }
    }

    /// Build a file from `(line_number, hit_count)` pairs.
    pub fn from_hits(path: impl Into<String>, hits: &[(u32, u64)]) -> Self {
        Self {
            path: path.into(),
            lines: hits
                .iter()
                .map(|&(line_number, hit_count)| LineCoverage {
                    line_number,
                    hit_count,
                })
                .collect(),
        }
    }
}

/// The complete result of parsing a single coverage report.
#[derive(Debug, Clone, Default)]
pub struct CoverageData {
    pub files: Vec<FileCoverage>,
}

/// State of one source line in one snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStat {
    /// Tracked and executed `n >= 1` times.
    Hit(u64),
    /// Tracked and never executed.
    Missed,
    /// Not a statement (blank, comment, or absent from the report).
    NotTracked,
}

impl LineStat {
    #[must_use]
    pub fn from_hits(hit_count: u64) -> Self {
        if hit_count == 0 {
            LineStat::Missed
        } else {
            LineStat::Hit(hit_count)
        }
    }

    #[must_use]
    pub fn is_missed(self) -> bool {
        matches!(self, LineStat::Missed)
    }
}

/// One file of a validated report. Only tracked lines are stored; any
/// other line number reads back as [`LineStat::NotTracked`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    path: String,
    lines: BTreeMap<u32, LineStat>,
}

impl SourceFile {
    fn from_coverage(file: FileCoverage) -> Result<Self> {
        let mut lines = BTreeMap::new();
        for line in file.lines {
            if line.line_number == 0 {
                return Err(CovgateError::MalformedInput(format!(
                    "'{}': line numbers must be positive, got 0",
                    file.path
                )));
            }
            if lines
                .insert(line.line_number, LineStat::from_hits(line.hit_count))
                .is_some()
            {
                return Err(CovgateError::MalformedInput(format!(
                    "'{}': line {} is listed more than once",
                    file.path, line.line_number
                )));
            }
        }
        Ok(Self {
            path: file.path,
            lines,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Look up a line; absent lines are `NotTracked`.
    #[must_use]
    pub fn line(&self, line_number: u32) -> LineStat {
        self.lines
            .get(&line_number)
            .copied()
            .unwrap_or(LineStat::NotTracked)
    }

    /// Tracked line numbers in ascending order.
    pub fn tracked_lines(&self) -> impl Iterator<Item = u32> + '_ {
        self.lines.keys().copied()
    }

    /// Missed line numbers in ascending order.
    pub fn missed_lines(&self) -> impl Iterator<Item = u32> + '_ {
        self.lines
            .iter()
            .filter(|(_, stat)| stat.is_missed())
            .map(|(&n, _)| n)
    }

    #[must_use]
    pub fn statements(&self) -> u64 {
        self.lines.len() as u64
    }

    #[must_use]
    pub fn missed(&self) -> u64 {
        self.lines.values().filter(|s| s.is_missed()).count() as u64
    }

    #[must_use]
    pub fn hits(&self) -> u64 {
        self.statements() - self.missed()
    }
}

/// A validated coverage report: files in report order, unique by path.
#[derive(Debug, Clone, Default)]
pub struct CoverageModel {
    files: Vec<SourceFile>,
    index: HashMap<String, usize>,
}

impl CoverageModel {
    /// Validate parsed coverage data.
    ///
    /// Fails with [`CovgateError::MalformedInput`] on a zero or duplicated
    /// line number within a file, or a path that appears twice.
    pub fn new(data: CoverageData) -> Result<Self> {
        let mut files = Vec::with_capacity(data.files.len());
        let mut index = HashMap::with_capacity(data.files.len());

        for file in data.files {
            if index.contains_key(&file.path) {
                return Err(CovgateError::MalformedInput(format!(
                    "path '{}' appears more than once",
                    file.path
                )));
            }
            let source = SourceFile::from_coverage(file)?;
            index.insert(source.path.clone(), files.len());
            files.push(source);
        }

        Ok(Self { files, index })
    }

    /// Files in report order.
    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    pub fn file(&self, path: &str) -> Option<&SourceFile> {
        self.index.get(path).map(|&i| &self.files[i])
    }

    /// Look up a line of a file; unknown files and lines are `NotTracked`.
    #[must_use]
    pub fn line(&self, path: &str, line_number: u32) -> LineStat {
        self.file(path)
            .map_or(LineStat::NotTracked, |f| f.line(line_number))
    }

    #[must_use]
    pub fn statements(&self) -> u64 {
        self.files.iter().map(SourceFile::statements).sum()
    }

    #[must_use]
    pub fn missed(&self) -> u64 {
        self.files.iter().map(SourceFile::missed).sum()
    }

    #[must_use]
    pub fn hits(&self) -> u64 {
        self.files.iter().map(SourceFile::hits).sum()
    }

    #[must_use]
    pub fn line_rate(&self) -> f64 {
        rate(self.hits(), self.statements())
    }
}
