//! Output formatting for summaries and diffs.
//!
//! Renderers only format what the analyzer and diff engine computed; they
//! never re-derive line classification. A renderer is picked by name from
//! [`RENDERERS`].

mod annotation;
mod csv;
mod html;
mod markdown;
mod source;
mod structured;
mod text;

use clap::ValueEnum;

use crate::diff::{DiffEntry, DiffReport};
use crate::error::{CovgateError, Result};
use crate::summary::{FileStats, Summary};

pub use annotation::AnnotationRenderer;
pub use csv::CsvRenderer;
pub use html::HtmlRenderer;
pub use markdown::MarkdownRenderer;
pub use source::{SourceText, SourceTree};
pub use structured::{StructuredRenderer, Syntax};
pub use text::TextRenderer;

/// Every output format implements this trait.
pub trait Renderer {
    /// Format a single-report summary.
    fn render_summary(&self, summary: &Summary) -> Result<String>;

    /// Format a baseline/candidate comparison.
    fn render_diff(&self, report: &DiffReport) -> Result<String>;
}

/// Severity of a GitHub workflow annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum AnnotationLevel {
    #[default]
    Notice,
    Warning,
    Error,
}

impl AnnotationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnnotationLevel::Notice => "notice",
            AnnotationLevel::Warning => "warning",
            AnnotationLevel::Error => "error",
        }
    }
}

/// Format-specific settings. Renderers ignore options that do not apply.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Field separator for `csv`.
    pub delimiter: String,
    pub annotation_title: String,
    pub annotation_level: AnnotationLevel,
    pub annotation_message: String,
    /// ANSI colors in `text` diffs.
    pub color: bool,
    /// Where `html` reads the text of missing lines from; `None` omits it.
    pub source: Option<SourceTree>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            delimiter: ";".to_string(),
            annotation_title: "covgate".to_string(),
            annotation_level: AnnotationLevel::Notice,
            annotation_message: "not covered".to_string(),
            color: false,
            source: None,
        }
    }
}

type Factory = fn(&RenderOptions) -> Box<dyn Renderer>;

fn text_renderer(opts: &RenderOptions) -> Box<dyn Renderer> {
    Box::new(TextRenderer { color: opts.color })
}

fn csv_renderer(opts: &RenderOptions) -> Box<dyn Renderer> {
    Box::new(CsvRenderer {
        delimiter: opts.delimiter.clone(),
    })
}

fn markdown_renderer(_: &RenderOptions) -> Box<dyn Renderer> {
    Box::new(MarkdownRenderer)
}

fn json_renderer(_: &RenderOptions) -> Box<dyn Renderer> {
    Box::new(StructuredRenderer { syntax: Syntax::Json })
}

fn yaml_renderer(_: &RenderOptions) -> Box<dyn Renderer> {
    Box::new(StructuredRenderer { syntax: Syntax::Yaml })
}

fn html_renderer(opts: &RenderOptions) -> Box<dyn Renderer> {
    Box::new(HtmlRenderer {
        source: opts.source.clone(),
    })
}

fn annotation_renderer(opts: &RenderOptions) -> Box<dyn Renderer> {
    Box::new(AnnotationRenderer {
        title: opts.annotation_title.clone(),
        level: opts.annotation_level,
        message: opts.annotation_message.clone(),
    })
}

/// Format name to renderer constructor.
pub static RENDERERS: &[(&str, Factory)] = &[
    ("text", text_renderer),
    ("csv", csv_renderer),
    ("markdown", markdown_renderer),
    ("json", json_renderer),
    ("yaml", yaml_renderer),
    ("html", html_renderer),
    ("github-annotation", annotation_renderer),
];

/// Names accepted by [`lookup`], in registration order.
pub fn format_names() -> impl Iterator<Item = &'static str> {
    RENDERERS.iter().map(|&(name, _)| name)
}

/// Build the renderer registered under `name`.
pub fn lookup(name: &str, opts: &RenderOptions) -> Result<Box<dyn Renderer>> {
    RENDERERS
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, factory)| factory(opts))
        .ok_or_else(|| CovgateError::UnknownFormat(name.to_string()))
}

// ---------------------------------------------------------------------------
// Shared table rows
// ---------------------------------------------------------------------------

pub(crate) const HEADERS: [&str; 5] = ["Filename", "Stmts", "Miss", "Cover", "Missing"];

/// One formatted table row, shared by the tabular renderers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Row {
    pub filename: String,
    pub stmts: String,
    pub miss: String,
    pub cover: String,
    pub missing: String,
}

impl Row {
    pub fn cells(&self) -> [&str; 5] {
        [
            self.filename.as_str(),
            self.stmts.as_str(),
            self.miss.as_str(),
            self.cover.as_str(),
            self.missing.as_str(),
        ]
    }

    fn from_stats(stats: &FileStats) -> Self {
        Self {
            filename: stats.path.clone(),
            stmts: stats.statements.to_string(),
            miss: stats.missed.to_string(),
            cover: percent(stats.coverage_rate()),
            missing: stats.missing_description(),
        }
    }

    fn from_entry(entry: &DiffEntry) -> Self {
        Self {
            filename: entry.path.clone(),
            stmts: signed(entry.statements_delta),
            miss: signed(entry.missed_delta),
            cover: signed_percent(entry.coverage_rate_delta),
            missing: entry.missing_description(),
        }
    }
}

/// File rows followed by the total row.
pub(crate) fn summary_rows(summary: &Summary) -> Vec<Row> {
    summary
        .files
        .iter()
        .chain(std::iter::once(&summary.total))
        .map(Row::from_stats)
        .collect()
}

/// Entry rows followed by the total row.
pub(crate) fn diff_rows(report: &DiffReport) -> Vec<Row> {
    report
        .entries
        .iter()
        .chain(std::iter::once(&report.total))
        .map(Row::from_entry)
        .collect()
}

/// Format a 0.0–1.0 rate, e.g. "91.67%".
#[must_use]
pub fn percent(rate: f64) -> String {
    format!("{:.2}%", rate * 100.0)
}

/// Format a signed count: "+2", "-1", "0".
#[must_use]
pub fn signed(n: i64) -> String {
    if n > 0 {
        format!("+{n}")
    } else {
        n.to_string()
    }
}

/// Format a signed percentage-point delta: "+40.00%", "-25.00%", "0.00%".
#[must_use]
pub fn signed_percent(points: f64) -> String {
    if points.abs() < 0.005 {
        "0.00%".to_string()
    } else {
        format!("{points:+.2}%")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed() {
        assert_eq!(signed(2), "+2");
        assert_eq!(signed(-1), "-1");
        assert_eq!(signed(0), "0");
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(1.0), "100.00%");
        assert_eq!(percent(11.0 / 12.0), "91.67%");
    }

    #[test]
    fn test_signed_percent() {
        assert_eq!(signed_percent(40.0), "+40.00%");
        assert_eq!(signed_percent(-25.0), "-25.00%");
        assert_eq!(signed_percent(0.0), "0.00%");
        assert_eq!(signed_percent(-0.0001), "0.00%");
    }

    #[test]
    fn test_lookup_known_formats() {
        let opts = RenderOptions::default();
        for name in format_names() {
            assert!(lookup(name, &opts).is_ok(), "{name} should resolve");
        }
        assert!(lookup("JSON", &opts).is_ok());
    }

    #[test]
    fn test_lookup_unknown_format() {
        let err = lookup("pdf", &RenderOptions::default()).err().unwrap();
        assert!(matches!(err, CovgateError::UnknownFormat(ref n) if n == "pdf"));
    }
}
