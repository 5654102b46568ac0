use std::fmt::Write;

use crate::diff::DiffReport;
use crate::error::Result;
use crate::ranges::LineRange;
use crate::summary::Summary;

use super::{AnnotationLevel, Renderer};

/// GitHub Actions workflow commands, one per missing range.
///
/// In diff mode only lines that became uncovered are annotated.
pub struct AnnotationRenderer {
    pub title: String,
    pub level: AnnotationLevel,
    pub message: String,
}

impl AnnotationRenderer {
    fn push(&self, out: &mut String, path: &str, range: LineRange) {
        writeln!(
            out,
            "::{level} file={path},line={start},endLine={end},title={title}::{message}",
            level = self.level.as_str(),
            path = escape_property(path),
            start = range.start,
            end = range.end,
            title = escape_property(&self.title),
            message = escape_data(&self.message),
        )
        .unwrap();
    }
}

/// Percent-encode the message part of a workflow command.
fn escape_data(s: &str) -> String {
    s.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Property values additionally must not contain `:` or `,`.
fn escape_property(s: &str) -> String {
    escape_data(s).replace(':', "%3A").replace(',', "%2C")
}

impl Renderer for AnnotationRenderer {
    fn render_summary(&self, summary: &Summary) -> Result<String> {
        let mut out = String::new();
        for file in &summary.files {
            for &range in &file.missing_ranges {
                self.push(&mut out, &file.path, range);
            }
        }
        Ok(out)
    }

    fn render_diff(&self, report: &DiffReport) -> Result<String> {
        let mut out = String::new();
        for entry in &report.entries {
            for missing in entry.missing.iter().filter(|m| m.is_new()) {
                self.push(&mut out, &entry.path, missing.range);
            }
        }
        Ok(out)
    }
}
