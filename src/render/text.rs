use console::style;

use crate::diff::DiffReport;
use crate::error::Result;
use crate::summary::Summary;

use super::{diff_rows, summary_rows, Renderer, Row, HEADERS};

/// Plain text table.
///
/// With `color`, diff tables mark regressions red and improvements green:
/// positive miss deltas, negative cover deltas and `+` ranges are red.
pub struct TextRenderer {
    pub color: bool,
}

impl Renderer for TextRenderer {
    fn render_summary(&self, summary: &Summary) -> Result<String> {
        Ok(table(&summary_rows(summary), false))
    }

    fn render_diff(&self, report: &DiffReport) -> Result<String> {
        Ok(table(&diff_rows(report), self.color))
    }
}

/// Columns 1 and 2 (statement and miss counts) are right-aligned.
fn right_aligned(column: usize) -> bool {
    matches!(column, 1 | 2)
}

fn table(rows: &[Row], color: bool) -> String {
    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row.cells()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, HEADERS, &widths, false);
    let rule = widths.map(|w| "-".repeat(w));
    push_line(&mut out, rule.each_ref().map(String::as_str), &widths, false);
    for row in rows {
        push_line(&mut out, row.cells(), &widths, color);
    }
    out
}

fn push_line(out: &mut String, cells: [&str; 5], widths: &[usize; 5], color: bool) {
    let line = cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(i, (cell, &width))| {
            let pad = " ".repeat(width.saturating_sub(cell.chars().count()));
            let cell = if color { paint(i, cell) } else { cell.to_string() };
            if right_aligned(i) {
                format!("{pad}{cell}")
            } else {
                format!("{cell}{pad}")
            }
        })
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

/// Color one diff cell by the direction of its change.
fn paint(column: usize, cell: &str) -> String {
    let worse = match column {
        2 => cell.starts_with('+'),
        3 => cell.starts_with('-'),
        4 => {
            return cell
                .split(", ")
                .map(|range| {
                    if range.starts_with('+') {
                        style(range).red().force_styling(true).to_string()
                    } else {
                        range.to_string()
                    }
                })
                .collect::<Vec<_>>()
                .join(", ");
        }
        _ => return cell.to_string(),
    };
    let better = !worse && cell.starts_with(['+', '-']);
    if worse {
        style(cell).red().force_styling(true).to_string()
    } else if better {
        style(cell).green().force_styling(true).to_string()
    } else {
        cell.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CoverageData, CoverageModel, FileCoverage};
    use crate::summary::analyze;

    #[test]
    fn test_summary_table() {
        let model = CoverageModel::new(CoverageData {
            files: vec![
                FileCoverage::from_hits("a.py", &[(1, 1), (2, 0), (3, 0), (5, 1)]),
                FileCoverage::from_hits("long/path/b.py", &[(1, 1)]),
            ],
        })
        .unwrap();

        let out = TextRenderer { color: false }
            .render_summary(&analyze(&model))
            .unwrap();
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("Filename"));
        assert!(lines[1].starts_with("--------------"));
        assert_eq!(lines[2], "a.py                4     2  50.00%   2-3");
        assert_eq!(lines[3], "long/path/b.py      1     0  100.00%");
        assert_eq!(lines[4], "TOTAL               5     2  60.00%");
    }

    #[test]
    fn test_colored_diff() {
        let a = CoverageModel::new(CoverageData {
            files: vec![FileCoverage::from_hits("a.py", &[(1, 1), (2, 1), (3, 0)])],
        })
        .unwrap();
        let b = CoverageModel::new(CoverageData {
            files: vec![FileCoverage::from_hits("a.py", &[(1, 0), (2, 1), (3, 0)])],
        })
        .unwrap();
        let report = crate::diff::diff(&a, &b);

        let plain = TextRenderer { color: false }.render_diff(&report).unwrap();
        let colored = TextRenderer { color: true }.render_diff(&report).unwrap();

        assert!(!plain.contains('\u{1b}'));
        assert!(colored.contains(&style("+1").red().force_styling(true).to_string()));
        assert!(colored.contains(&style("-33.33%").red().force_styling(true).to_string()));
        assert_eq!(console::strip_ansi_codes(&colored), plain);
    }

    #[test]
    fn test_summary_ignores_color() {
        let model = CoverageModel::new(CoverageData {
            files: vec![FileCoverage::from_hits("a.py", &[(1, 0)])],
        })
        .unwrap();
        let summary = analyze(&model);

        assert_eq!(
            TextRenderer { color: true }.render_summary(&summary).unwrap(),
            TextRenderer { color: false }.render_summary(&summary).unwrap()
        );
    }
}
