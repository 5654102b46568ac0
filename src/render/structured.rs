use serde::Serialize;

use crate::diff::{DiffEntry, DiffReport};
use crate::error::{CovgateError, Result};
use crate::summary::{FileStats, Summary};

use super::{percent, signed_percent, Renderer};

/// Serialization syntax for [`StructuredRenderer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    Json,
    Yaml,
}

/// JSON or YAML document with a `files` list and a `total` record.
pub struct StructuredRenderer {
    pub syntax: Syntax,
}

#[derive(Serialize)]
struct Document<T> {
    files: Vec<T>,
    total: T,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct SummaryRecord<'a> {
    filename: &'a str,
    stmts: u64,
    miss: u64,
    cover: String,
    missing: String,
}

impl<'a> From<&'a FileStats> for SummaryRecord<'a> {
    fn from(stats: &'a FileStats) -> Self {
        Self {
            filename: &stats.path,
            stmts: stats.statements,
            miss: stats.missed,
            cover: percent(stats.coverage_rate()),
            missing: stats.missing_description(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct DiffRecord<'a> {
    filename: &'a str,
    stmts: i64,
    miss: i64,
    cover: String,
    missing: String,
}

impl<'a> From<&'a DiffEntry> for DiffRecord<'a> {
    fn from(entry: &'a DiffEntry) -> Self {
        Self {
            filename: &entry.path,
            stmts: entry.statements_delta,
            miss: entry.missed_delta,
            cover: signed_percent(entry.coverage_rate_delta),
            missing: entry.missing_description(),
        }
    }
}

impl StructuredRenderer {
    fn encode<T: Serialize>(&self, doc: &Document<T>) -> Result<String> {
        match self.syntax {
            Syntax::Json => serde_json::to_string_pretty(doc)
                .map(|mut s| {
                    s.push('\n');
                    s
                })
                .map_err(|e| CovgateError::Serialize(e.to_string())),
            Syntax::Yaml => {
                serde_yml::to_string(doc).map_err(|e| CovgateError::Serialize(e.to_string()))
            }
        }
    }
}

impl Renderer for StructuredRenderer {
    fn render_summary(&self, summary: &Summary) -> Result<String> {
        self.encode(&Document {
            files: summary.files.iter().map(SummaryRecord::from).collect(),
            total: SummaryRecord::from(&summary.total),
        })
    }

    fn render_diff(&self, report: &DiffReport) -> Result<String> {
        self.encode(&Document {
            files: report.entries.iter().map(DiffRecord::from).collect(),
            total: DiffRecord::from(&report.total),
        })
    }
}
