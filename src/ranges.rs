//! Compact line-range notation, e.g. "1, 3-5, 8".
//!
//! Ranges are collapsed over the sequence of tracked lines: two missed lines
//! belong to the same range when no tracked line lies between them, so
//! blank or comment lines never split a range.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::CovgateError;

/// An inclusive span of line numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LineRange {
    pub start: u32,
    pub end: u32,
}

impl LineRange {
    #[must_use]
    pub fn single(line: u32) -> Self {
        Self {
            start: line,
            end: line,
        }
    }

    #[must_use]
    pub fn contains(&self, line: u32) -> bool {
        (self.start..=self.end).contains(&line)
    }
}

impl fmt::Display for LineRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

impl FromStr for LineRange {
    type Err = CovgateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || CovgateError::Parse(format!("invalid line range: '{s}'"));
        let s = s.trim();
        let (start, end) = match s.split_once('-') {
            Some((a, b)) => (a.trim(), b.trim()),
            None => (s, s),
        };
        let start: u32 = start.parse().map_err(|_| bad())?;
        let end: u32 = end.parse().map_err(|_| bad())?;
        if start == 0 || end < start {
            return Err(bad());
        }
        Ok(Self { start, end })
    }
}

/// True when no tracked line lies strictly between `from` and `to`.
///
/// `tracked` must be sorted ascending.
#[must_use]
pub fn bridges(tracked: &[u32], from: u32, to: u32) -> bool {
    let next = tracked.partition_point(|&l| l <= from);
    next == tracked.len() || tracked[next] >= to
}

/// Coalesce sorted missed lines into ranges, bridging runs of untracked lines.
///
/// Both `lines` and `tracked` must be sorted and deduplicated.
#[must_use]
pub fn coalesce_ranges(lines: &[u32], tracked: &[u32]) -> Vec<LineRange> {
    let Some((&first, rest)) = lines.split_first() else {
        return Vec::new();
    };

    debug_assert!(
        lines.windows(2).all(|w| w[0] < w[1]),
        "coalesce_ranges requires sorted, deduplicated input"
    );

    let mut ranges = Vec::new();
    let mut current = LineRange::single(first);

    for &line in rest {
        if bridges(tracked, current.end, line) {
            current.end = line;
        } else {
            ranges.push(current);
            current = LineRange::single(line);
        }
    }

    ranges.push(current);
    ranges
}

/// Render ranges as a comma-separated list.
#[must_use]
pub fn format_line_ranges(ranges: &[LineRange]) -> String {
    ranges
        .iter()
        .map(LineRange::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a comma-separated list produced by [`format_line_ranges`].
pub fn parse_line_ranges(s: &str) -> Result<Vec<LineRange>, CovgateError> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::parse)
        .collect()
}

/// Expand ranges back into the tracked line numbers they cover.
#[must_use]
pub fn expand_ranges(ranges: &[LineRange], tracked: &[u32]) -> Vec<u32> {
    tracked
        .iter()
        .copied()
        .filter(|&l| ranges.iter().any(|r| r.contains(l)))
        .collect()
}
