//! Line-level diff between two page contents.
//!
//! Uses the `similar` crate (Myers diff algorithm) to produce hunks with
//! three lines of context. Lines end only at `\n` and keep their terminator,
//! so applying a patch reproduces the target bytes exactly, including a
//! missing final newline or a bare `\r` inside a line.

use std::fmt::Write as _;

use similar::{ChangeTag, TextDiff};

use crate::error::{DiffError, DiffResult};

const CONTEXT_LINES: usize = 3;

/// A single line in a hunk, including its trailing `\n` when present.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PatchLine {
    Context(String),
    Removed(String),
    Added(String),
}

impl PatchLine {
    pub fn text(&self) -> &str {
        match self {
            Self::Context(s) | Self::Removed(s) | Self::Added(s) => s,
        }
    }

    fn prefix(&self) -> char {
        match self {
            Self::Context(_) => ' ',
            Self::Removed(_) => '-',
            Self::Added(_) => '+',
        }
    }
}

/// A contiguous region of changes.
///
/// Start lines follow unified diff conventions: 1-based, except that a side
/// with zero lines records the line *after which* the hunk applies (so an
/// insertion into an empty file is `-0,0`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hunk {
    pub old_start: usize,
    pub old_count: usize,
    pub new_start: usize,
    pub new_count: usize,
    pub lines: Vec<PatchLine>,
}

impl Hunk {
    /// 0-based index of the first old line covered by this hunk.
    pub fn old_index(&self) -> usize {
        to_index(self.old_start, self.old_count)
    }

    /// 0-based index of the first new line covered by this hunk.
    pub fn new_index(&self) -> usize {
        to_index(self.new_start, self.new_count)
    }
}

fn to_index(start: usize, count: usize) -> usize {
    if count == 0 {
        start
    } else {
        start - 1
    }
}

fn to_start(index: usize, count: usize) -> usize {
    if count == 0 {
        index
    } else {
        index + 1
    }
}

/// The line-level difference between two contents.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextPatch {
    pub hunks: Vec<Hunk>,
}

impl TextPatch {
    /// Returns `true` if the two contents were identical.
    pub fn is_empty(&self) -> bool {
        self.hunks.is_empty()
    }

    pub fn additions(&self) -> usize {
        self.count(|l| matches!(l, PatchLine::Added(_)))
    }

    pub fn deletions(&self) -> usize {
        self.count(|l| matches!(l, PatchLine::Removed(_)))
    }

    fn count(&self, pred: impl Fn(&PatchLine) -> bool) -> usize {
        self.hunks
            .iter()
            .flat_map(|h| &h.lines)
            .filter(|l| pred(l))
            .count()
    }

    /// Render the hunks in unified format under `---`/`+++` headers.
    pub fn to_unified(&self, old_label: &str, new_label: &str) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "--- {old_label}");
        let _ = writeln!(out, "+++ {new_label}");
        self.write_hunks(&mut out);
        out
    }

    /// Render only the hunks (`@@` headers and lines).
    pub fn write_hunks(&self, out: &mut String) {
        for hunk in &self.hunks {
            let _ = writeln!(
                out,
                "@@ -{},{} +{},{} @@",
                hunk.old_start, hunk.old_count, hunk.new_start, hunk.new_count
            );
            for line in &hunk.lines {
                out.push(line.prefix());
                out.push_str(line.text());
                if !line.text().ends_with('\n') {
                    out.push_str("\n\\ No newline at end of file\n");
                }
            }
        }
    }
}

/// Interpret content as UTF-8 text for line diffing.
pub(crate) fn as_text(content: &[u8]) -> DiffResult<&str> {
    std::str::from_utf8(content).map_err(|_| DiffError::BinaryContent {
        len: content.len(),
    })
}

/// Split text into lines the way patches address them: at `\n` only, each
/// line keeping its terminator.
pub(crate) fn split_lines(text: &str) -> Vec<&str> {
    text.split_inclusive('\n').collect()
}

/// Compute the line diff from `old` to `new`.
///
/// Fails with [`DiffError::BinaryContent`] if either side is not UTF-8.
pub fn text_diff(old: &[u8], new: &[u8]) -> DiffResult<TextPatch> {
    let old_str = as_text(old)?;
    let new_str = as_text(new)?;
    if old_str == new_str {
        return Ok(TextPatch::default());
    }

    let old_lines = split_lines(old_str);
    let new_lines = split_lines(new_str);
    let diff = TextDiff::from_slices(&old_lines, &new_lines);
    let mut hunks = Vec::new();

    for group in diff.grouped_ops(CONTEXT_LINES) {
        let (Some(first), Some(last)) = (group.first(), group.last()) else {
            continue;
        };
        let old_index = first.old_range().start;
        let new_index = first.new_range().start;
        let old_count = last.old_range().end - old_index;
        let new_count = last.new_range().end - new_index;

        let mut lines = Vec::new();
        for op in &group {
            for change in diff.iter_changes(op) {
                let text = change.value().to_string();
                lines.push(match change.tag() {
                    ChangeTag::Equal => PatchLine::Context(text),
                    ChangeTag::Delete => PatchLine::Removed(text),
                    ChangeTag::Insert => PatchLine::Added(text),
                });
            }
        }

        hunks.push(Hunk {
            old_start: to_start(old_index, old_count),
            old_count,
            new_start: to_start(new_index, new_count),
            new_count,
            lines,
        });
    }

    Ok(TextPatch { hunks })
}
