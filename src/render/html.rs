use std::fmt::Write;

use crate::diff::DiffReport;
use crate::error::Result;
use crate::ranges::LineRange;
use crate::summary::Summary;

use super::{diff_rows, summary_rows, Renderer, Row, SourceTree, HEADERS};

/// Standalone HTML page holding the report table.
///
/// With a [`SourceTree`], each file's missing ranges are followed by the
/// source text of those lines. Files that cannot be read are listed
/// without source.
pub struct HtmlRenderer {
    pub source: Option<SourceTree>,
}

/// Missing ranges of one file, each flagged when it is newly uncovered.
struct FileGaps<'a> {
    path: &'a str,
    ranges: Vec<(LineRange, bool)>,
}

impl Renderer for HtmlRenderer {
    fn render_summary(&self, summary: &Summary) -> Result<String> {
        let gaps: Vec<FileGaps> = summary
            .files
            .iter()
            .map(|f| FileGaps {
                path: &f.path,
                ranges: f.missing_ranges.iter().map(|&r| (r, false)).collect(),
            })
            .collect();
        Ok(self.page("Coverage report", &summary_rows(summary), &gaps))
    }

    fn render_diff(&self, report: &DiffReport) -> Result<String> {
        let gaps: Vec<FileGaps> = report
            .entries
            .iter()
            .map(|e| FileGaps {
                path: &e.path,
                ranges: e.missing.iter().map(|m| (m.range, m.is_new())).collect(),
            })
            .collect();
        Ok(self.page("Coverage diff", &diff_rows(report), &gaps))
    }
}

impl HtmlRenderer {
    fn page(&self, title: &str, rows: &[Row], gaps: &[FileGaps]) -> String {
        let mut html = String::new();
        html.push_str("<html>\n<head>\n<meta charset=\"utf-8\">\n");
        writeln!(html, "<title>{title}</title>").unwrap();
        html.push_str("</head>\n<body>\n<table>\n<thead>\n<tr>");
        for header in HEADERS {
            write!(html, "<th>{header}</th>").unwrap();
        }
        html.push_str("</tr>\n</thead>\n<tbody>\n");

        let (total, files) = match rows.split_last() {
            Some((total, files)) => (Some(total), files),
            None => (None, rows),
        };
        for row in files {
            push_row(&mut html, "td", row);
        }
        html.push_str("</tbody>\n");
        if let Some(total) = total {
            html.push_str("<tfoot>\n");
            push_row(&mut html, "th", total);
            html.push_str("</tfoot>\n");
        }
        html.push_str("</table>\n");

        if let Some(source) = &self.source {
            for file in gaps.iter().filter(|f| !f.ranges.is_empty()) {
                push_source(&mut html, source, file);
            }
        }

        html.push_str("</body>\n</html>\n");
        html
    }
}

fn push_source(html: &mut String, source: &SourceTree, file: &FileGaps) {
    let Some(text) = source.read(file.path) else {
        return;
    };

    writeln!(html, "<h2>{}</h2>", escape(file.path)).unwrap();
    html.push_str("<table class=\"source\">\n");
    for &(range, new) in &file.ranges {
        let (class, label) = if new {
            ("new", format!("+{range}"))
        } else {
            ("miss", range.to_string())
        };
        write!(html, "<tr class=\"{class}\"><td>{label}</td><td><pre>").unwrap();
        for (n, line) in text.excerpt(range) {
            writeln!(html, "{n:>5}  {}", escape(line)).unwrap();
        }
        html.push_str("</pre></td></tr>\n");
    }
    html.push_str("</table>\n");
}

fn push_row(html: &mut String, cell_tag: &str, row: &Row) {
    html.push_str("<tr>");
    for cell in row.cells() {
        write!(html, "<{cell_tag}>{}</{cell_tag}>", escape(cell)).unwrap();
    }
    html.push_str("</tr>\n");
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
