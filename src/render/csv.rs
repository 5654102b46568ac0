use crate::diff::DiffReport;
use crate::error::Result;
use crate::summary::Summary;

use super::{diff_rows, summary_rows, Renderer, Row, HEADERS};

/// Delimited values with a header line.
pub struct CsvRenderer {
    pub delimiter: String,
}

impl CsvRenderer {
    fn render_rows(&self, rows: &[Row]) -> String {
        let mut out = self.record(HEADERS);
        for row in rows {
            out.push_str(&self.record(row.cells()));
        }
        out
    }

    fn record(&self, cells: [&str; 5]) -> String {
        let mut line = cells
            .iter()
            .map(|cell| self.quote(cell))
            .collect::<Vec<_>>()
            .join(&self.delimiter);
        line.push('\n');
        line
    }

    fn quote(&self, cell: &str) -> String {
        let needs_quotes = cell.contains(self.delimiter.as_str())
            || cell.contains('"')
            || cell.contains('\n');
        if needs_quotes {
            format!("\"{}\"", cell.replace('"', "\"\""))
        } else {
            cell.to_string()
        }
    }
}

impl Renderer for CsvRenderer {
    fn render_summary(&self, summary: &Summary) -> Result<String> {
        Ok(self.render_rows(&summary_rows(summary)))
    }

    fn render_diff(&self, report: &DiffReport) -> Result<String> {
        Ok(self.render_rows(&diff_rows(report)))
    }
}
