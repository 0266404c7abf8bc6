//! # Line Reflow
//!
//! Fits raw text lines to the printer's column width.
//!
//! ## Wrap Policies
//!
//! | Policy | Over-long line becomes |
//! |--------|------------------------|
//! | [`WrapPolicy::SplitOnSpace`] | several lines, cut at the nearest space before the limit |
//! | [`WrapPolicy::HardSplit`] | several lines, cut exactly at the limit |
//! | [`WrapPolicy::Truncate`] | one line; everything past the limit is **discarded** |
//!
//! ## Example
//!
//! ```
//! use smartparallel::text::{reflow, WrapPolicy};
//!
//! let lines = reflow(&["hello world foobar"], 10, WrapPolicy::SplitOnSpace);
//! let text: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
//! assert_eq!(text, ["hello", "world", "foobar"]);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Byte at which [`WrapPolicy::SplitOnSpace`] prefers to break lines (ASCII space)
pub const BREAK_CHAR: u8 = b' ';

/// Column width used when the requested width isn't supported
pub const DEFAULT_COLUMNS: usize = 80;

/// Column widths the printer supports
pub const VALID_COLUMNS: [usize; 3] = [40, 80, 132];

// ============================================================================
// COLUMN WIDTH
// ============================================================================

/// Printer print mode implied by the column width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintMode {
    /// 40 columns
    DoubleWidth,
    /// 80 columns
    Normal,
    /// 132 columns
    Condensed,
}

impl fmt::Display for PrintMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::DoubleWidth => "double-width",
            Self::Normal => "normal",
            Self::Condensed => "condensed",
        };
        f.write_str(name)
    }
}

/// # Column Width
///
/// Number of characters per printed line. Always one of [`VALID_COLUMNS`];
/// any other requested value is normalized to [`DEFAULT_COLUMNS`].
///
/// ```
/// use smartparallel::text::ColumnWidth;
///
/// assert_eq!(ColumnWidth::new(132).get(), 132);
/// assert_eq!(ColumnWidth::new(100).get(), 80);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "usize", into = "usize")]
pub struct ColumnWidth(usize);

impl ColumnWidth {
    /// Normal print mode, 80 columns
    pub const NORMAL: Self = Self(DEFAULT_COLUMNS);

    /// Create a column width, normalizing unsupported values to 80.
    pub fn new(requested: usize) -> Self {
        if VALID_COLUMNS.contains(&requested) {
            Self(requested)
        } else {
            Self::NORMAL
        }
    }

    /// Width in characters
    #[inline]
    pub fn get(self) -> usize {
        self.0
    }

    /// Print mode the printer must be in for this width
    pub fn mode(self) -> PrintMode {
        match self.0 {
            40 => PrintMode::DoubleWidth,
            132 => PrintMode::Condensed,
            _ => PrintMode::Normal,
        }
    }
}

impl Default for ColumnWidth {
    fn default() -> Self {
        Self::NORMAL
    }
}

impl From<usize> for ColumnWidth {
    fn from(requested: usize) -> Self {
        Self::new(requested)
    }
}

impl From<ColumnWidth> for usize {
    fn from(width: ColumnWidth) -> Self {
        width.0
    }
}

// ============================================================================
// WRAP POLICY
// ============================================================================

/// How lines longer than the column width are handled
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum WrapPolicy {
    /// Keep the first `width` bytes and drop the rest of the line
    Truncate,
    /// Wrap at the nearest space, cutting mid-word only when there is none
    #[default]
    SplitOnSpace,
    /// Wrap exactly at the column limit
    HardSplit,
}

// ============================================================================
// DISPLAY LINE
// ============================================================================

/// A line that fits the column width it was reflowed to.
///
/// Only produced by [`reflow`] and [`reflow_line`].
#[derive(Clone, PartialEq, Eq)]
pub struct DisplayLine(Vec<u8>);

impl DisplayLine {
    /// Raw bytes of the line, without terminator
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Length in bytes
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the line is blank
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Take the bytes out of the line
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl AsRef<[u8]> for DisplayLine {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for DisplayLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DisplayLine({:?})", String::from_utf8_lossy(&self.0))
    }
}

impl fmt::Display for DisplayLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

// ============================================================================
// REFLOW
// ============================================================================

/// Reflow raw lines so every output line is at most `width` bytes.
///
/// Output order follows input order; each raw line produces at least one
/// display line. Lines that already fit are passed through
/// untouched, so reflowing the output again changes nothing.
///
/// A `width` of 0 is treated as 1.
pub fn reflow<L: AsRef<[u8]>>(lines: &[L], width: usize, policy: WrapPolicy) -> Vec<DisplayLine> {
    let width = width.max(1);
    let mut out = Vec::with_capacity(lines.len());
    for line in lines {
        reflow_into(line.as_ref(), width, policy, &mut out);
    }
    out
}

/// Reflow a single raw line.
pub fn reflow_line(line: &[u8], width: usize, policy: WrapPolicy) -> Vec<DisplayLine> {
    let mut out = Vec::new();
    reflow_into(line, width.max(1), policy, &mut out);
    out
}

fn reflow_into(line: &[u8], width: usize, policy: WrapPolicy, out: &mut Vec<DisplayLine>) {
    if line.len() <= width {
        out.push(DisplayLine(line.to_vec()));
        return;
    }

    if policy == WrapPolicy::Truncate {
        out.push(DisplayLine(line[..width].to_vec()));
        return;
    }

    let mut rest = line;
    while rest.len() > width {
        let (split, dropped) = match policy {
            WrapPolicy::SplitOnSpace => split_on_space(rest, width),
            _ => (width, 0),
        };
        out.push(DisplayLine(rest[..split].to_vec()));
        rest = &rest[split + dropped..];
    }

    if !rest.is_empty() {
        out.push(DisplayLine(rest.to_vec()));
    }
}

/// Pick the cut point for a line longer than `width`.
///
/// Returns `(split, dropped)`: the segment is `rest[..split]` and the next
/// one starts at `split + dropped`, so a space consumed by the cut is not
/// carried over as leading whitespace.
fn split_on_space(rest: &[u8], width: usize) -> (usize, usize) {
    // Already breaks cleanly at the boundary
    if rest[width] == BREAK_CHAR {
        return (width, 1);
    }
    if rest[width - 1] == BREAK_CHAR {
        return (width, 0);
    }

    // A space at position 0 still counts and yields an empty segment.
    match rest[..width].iter().rposition(|&b| b == BREAK_CHAR) {
        Some(pos) => (pos, 1),
        None => (width, 0),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn texts(lines: &[DisplayLine]) -> Vec<String> {
        lines.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_column_width_allow_set() {
        assert_eq!(ColumnWidth::new(40).get(), 40);
        assert_eq!(ColumnWidth::new(80).get(), 80);
        assert_eq!(ColumnWidth::new(132).get(), 132);
    }

    #[test]
    fn test_column_width_normalizes_unsupported() {
        for requested in [0, 1, 39, 41, 100, 133, usize::MAX] {
            assert_eq!(ColumnWidth::new(requested), ColumnWidth::NORMAL);
        }
    }

    #[test]
    fn test_column_width_modes() {
        assert_eq!(ColumnWidth::new(40).mode(), PrintMode::DoubleWidth);
        assert_eq!(ColumnWidth::new(80).mode(), PrintMode::Normal);
        assert_eq!(ColumnWidth::new(132).mode(), PrintMode::Condensed);
    }

    #[test]
    fn test_short_line_unchanged() {
        for policy in [WrapPolicy::Truncate, WrapPolicy::SplitOnSpace, WrapPolicy::HardSplit] {
            assert_eq!(texts(&reflow(&["short"], 10, policy)), vec!["short"]);
        }
    }

    #[test]
    fn test_empty_line_kept() {
        let out = reflow(&["", "x", ""], 5, WrapPolicy::SplitOnSpace);
        assert_eq!(texts(&out), vec!["", "x", ""]);
    }

    #[test]
    fn test_exact_width_unchanged() {
        let out = reflow(&["abcde"], 5, WrapPolicy::HardSplit);
        assert_eq!(texts(&out), vec!["abcde"]);
    }

    #[test]
    fn test_split_on_space_example() {
        let out = reflow(&["hello world foobar"], 10, WrapPolicy::SplitOnSpace);
        assert_eq!(texts(&out), vec!["hello", "world", "foobar"]);
    }

    #[test]
    fn test_truncate_discards_remainder() {
        let out = reflow(&["abcdefgh"], 5, WrapPolicy::Truncate);
        assert_eq!(texts(&out), vec!["abcde"]);
    }

    #[test]
    fn test_hard_split_example() {
        let out = reflow(&["abcdefgh"], 5, WrapPolicy::HardSplit);
        assert_eq!(texts(&out), vec!["abcde", "fgh"]);
    }

    #[test]
    fn test_hard_split_ignores_spaces() {
        let out = reflow(&["ab cdefgh ij"], 5, WrapPolicy::HardSplit);
        assert_eq!(texts(&out), vec!["ab cd", "efgh ", "ij"]);
    }

    #[test]
    fn test_natural_split_drops_boundary_space() {
        // Byte at `width` is a space: cut there, no leading space on the next line
        let out = reflow(&["abcde fgh"], 5, WrapPolicy::SplitOnSpace);
        assert_eq!(texts(&out), vec!["abcde", "fgh"]);
    }

    #[test]
    fn test_natural_split_keeps_trailing_space() {
        // Byte at `width - 1` is a space: cut at `width`, nothing dropped
        let out = reflow(&["abcd efghi"], 5, WrapPolicy::SplitOnSpace);
        assert_eq!(texts(&out), vec!["abcd ", "efghi"]);
    }

    #[test]
    fn test_no_space_falls_back_to_hard_split() {
        let out = reflow(&["abcdefghijkl"], 5, WrapPolicy::SplitOnSpace);
        assert_eq!(texts(&out), vec!["abcde", "fghij", "kl"]);
    }

    #[test]
    fn test_leading_space_breaks_to_empty_line() {
        let out = reflow(&[" abcdefgh"], 5, WrapPolicy::SplitOnSpace);
        assert_eq!(texts(&out), vec!["", "abcde", "fgh"]);
    }

    #[test]
    fn test_double_space_leaves_no_leading_space() {
        let out = reflow(&["abcde  fghijkl"], 5, WrapPolicy::SplitOnSpace);
        assert_eq!(texts(&out), vec!["abcde", "", "fghij", "kl"]);
        assert!(out.iter().all(|line| !line.as_bytes().starts_with(b" ")));
    }

    #[test]
    fn test_multiple_raw_lines_keep_order() {
        let out = reflow(&["one two three", "four"], 9, WrapPolicy::SplitOnSpace);
        assert_eq!(texts(&out), vec!["one two", "three", "four"]);
    }

    #[test]
    fn test_zero_width_treated_as_one() {
        let out = reflow(&["abc"], 0, WrapPolicy::HardSplit);
        assert_eq!(texts(&out), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_all_outputs_fit_width() {
        let text = "The quick brown fox jumps over the lazy dog while \
                    supercalifragilisticexpialidocious words   with  odd   spacing end";
        for width in 1..=30 {
            for policy in [WrapPolicy::Truncate, WrapPolicy::SplitOnSpace, WrapPolicy::HardSplit] {
                for line in reflow(&[text], width, policy) {
                    assert!(line.len() <= width, "{line:?} exceeds {width} ({policy:?})");
                }
            }
        }
    }

    #[test]
    fn test_reflow_is_idempotent() {
        let text = "lorem ipsum dolor sit amet, consectetur adipiscing elit sed do";
        for width in [4, 7, 10, 16] {
            for policy in [WrapPolicy::Truncate, WrapPolicy::SplitOnSpace, WrapPolicy::HardSplit] {
                let once = reflow(&[text], width, policy);
                for again in [WrapPolicy::Truncate, WrapPolicy::SplitOnSpace, WrapPolicy::HardSplit] {
                    assert_eq!(once, reflow(&once, width, again), "{policy:?} then {again:?}");
                }
            }
        }
    }

    #[test]
    fn test_hard_split_reconstructs_line() {
        let text = b"0123456789 abcdefghij klmnopqrstuvwxyz";
        for width in 1..=12 {
            let joined: Vec<u8> = reflow_line(text, width, WrapPolicy::HardSplit)
                .into_iter()
                .flat_map(DisplayLine::into_bytes)
                .collect();
            assert_eq!(joined, text.to_vec());
        }
    }

    #[test]
    fn test_wrap_policy_serde_names() {
        let policy: WrapPolicy = serde_json::from_str("\"hard_split\"").unwrap();
        assert_eq!(policy, WrapPolicy::HardSplit);
        assert_eq!(serde_json::to_string(&WrapPolicy::SplitOnSpace).unwrap(), "\"split_on_space\"");
    }

    #[test]
    fn test_column_width_deserialize_normalizes() {
        let width: ColumnWidth = serde_json::from_str("64").unwrap();
        assert_eq!(width, ColumnWidth::NORMAL);
    }
}
