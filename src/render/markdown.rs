use std::fmt::Write;

use crate::diff::DiffReport;
use crate::error::Result;
use crate::summary::Summary;

use super::{diff_rows, summary_rows, Renderer, Row};

/// GitHub-flavored markdown table.
pub struct MarkdownRenderer;

impl Renderer for MarkdownRenderer {
    fn render_summary(&self, summary: &Summary) -> Result<String> {
        Ok(table(&summary_rows(summary)))
    }

    fn render_diff(&self, report: &DiffReport) -> Result<String> {
        Ok(table(&diff_rows(report)))
    }
}

fn table(rows: &[Row]) -> String {
    let mut md = String::new();
    md.push_str("| Filename | Stmts | Miss | Cover | Missing |\n");
    md.push_str("|:---------|------:|-----:|------:|:--------|\n");

    // The last row is always the total.
    let total = rows.len().saturating_sub(1);
    for (i, row) in rows.iter().enumerate() {
        let Row {
            filename,
            stmts,
            miss,
            cover,
            missing,
        } = row;
        if i == total {
            writeln!(
                md,
                "| **{filename}** | **{stmts}** | **{miss}** | **{cover}** | |"
            )
            .unwrap();
        } else {
            writeln!(
                md,
                "| `{}` | {stmts} | {miss} | {cover} | {} |",
                escape_pipes(filename),
                escape_pipes(missing)
            )
            .unwrap();
        }
    }

    md
}

/// A bare `|` would end the cell.
fn escape_pipes(cell: &str) -> String {
    cell.replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::diff;
    use crate::model::{CoverageData, CoverageModel, FileCoverage};

    #[test]
    fn test_markdown_diff() {
        let a = CoverageModel::new(CoverageData {
            files: vec![FileCoverage::from_hits("src/a.py", &[(1, 1), (2, 1)])],
        })
        .unwrap();
        let b = CoverageModel::new(CoverageData {
            files: vec![FileCoverage::from_hits("src/a.py", &[(1, 1), (2, 0), (3, 0)])],
        })
        .unwrap();

        let md = MarkdownRenderer.render_diff(&diff(&a, &b)).unwrap();
        assert!(md.starts_with("| Filename |"));
        assert!(md.contains("| `src/a.py` | +1 | +2 | -66.67% | +2-3 |"), "{md}");
        assert!(md.contains("| **TOTAL** | **+1** | **+2** | **-66.67%** | |"), "{md}");
    }

    #[test]
    fn test_pipe_in_filename() {
        let model = CoverageModel::new(CoverageData {
            files: vec![FileCoverage::from_hits("a|b.py", &[(1, 0)])],
        })
        .unwrap();

        let md = MarkdownRenderer
            .render_summary(&crate::summary::analyze(&model))
            .unwrap();
        assert!(md.contains("| `a\\|b.py` | 1 | 1 | 0.00% | 1 |"), "{md}");
    }
}
