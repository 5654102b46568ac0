use std::path::PathBuf;

use crate::ranges::LineRange;

/// A checkout of the covered sources, used to show the text of missing
/// lines. Report paths resolve as `root/prefix/path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceTree {
    root: PathBuf,
    prefix: String,
}

impl SourceTree {
    pub fn new(root: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            prefix: prefix.into(),
        }
    }

    pub fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(&self.prefix).join(path)
    }

    /// All lines of `path`, or `None` when the file cannot be read.
    pub fn read(&self, path: &str) -> Option<SourceText> {
        let file_path = self.resolve(path);
        match std::fs::read_to_string(&file_path) {
            Ok(content) => Some(SourceText {
                lines: content.lines().map(str::to_string).collect(),
            }),
            Err(e) => {
                tracing::debug!(path = %file_path.display(), "no source: {e}");
                None
            }
        }
    }
}

/// The lines of one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceText {
    lines: Vec<String>,
}

impl SourceText {
    /// `(line_number, text)` for each line of `range` present in the file.
    pub fn excerpt(&self, range: LineRange) -> Vec<(u32, &str)> {
        (range.start..=range.end)
            .filter_map(|n| {
                let text = self.lines.get(n as usize - 1)?;
                Some((n, text.as_str()))
            })
            .collect()
    }
}
