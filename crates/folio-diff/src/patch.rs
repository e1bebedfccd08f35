//! Context-checked patch application.
//!
//! A hunk applies only where every line it expects (context plus the lines it
//! removes) matches the target content exactly. The hunk is first tried at its
//! recorded position, shifted by however far earlier hunks landed from
//! theirs; failing that, at the nearest offset in either direction that does
//! not overlap an earlier hunk. There is no fuzz: if a hunk fits nowhere the
//! whole application fails and the input is left as it was.

use tracing::debug;

use crate::error::{DiffError, DiffResult};
use crate::text_diff::{as_text, split_lines, Hunk, PatchLine, TextPatch};

/// Which way to apply a patch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Turn the old content into the new content.
    Forward,
    /// Turn the new content back into the old content.
    Inverse,
}

impl Direction {
    /// Lines the hunk expects to find, and the lines it leaves in their place.
    fn sides(self, hunk: &Hunk) -> (Vec<&str>, Vec<&str>) {
        let mut expected = Vec::with_capacity(hunk.lines.len());
        let mut replacement = Vec::with_capacity(hunk.lines.len());
        for line in &hunk.lines {
            match (self, line) {
                (_, PatchLine::Context(text)) => {
                    expected.push(text.as_str());
                    replacement.push(text.as_str());
                }
                (Self::Forward, PatchLine::Removed(text)) | (Self::Inverse, PatchLine::Added(text)) => {
                    expected.push(text.as_str())
                }
                (Self::Forward, PatchLine::Added(text)) | (Self::Inverse, PatchLine::Removed(text)) => {
                    replacement.push(text.as_str())
                }
            }
        }
        (expected, replacement)
    }

    fn index(self, hunk: &Hunk) -> usize {
        match self {
            Self::Forward => hunk.old_index(),
            Self::Inverse => hunk.new_index(),
        }
    }
}

/// Apply `patch` to `content` in the given direction.
///
/// Returns the patched bytes, or [`DiffError::PatchConflict`] naming the first
/// hunk whose expected lines could not be found.
pub fn apply_patch(content: &[u8], patch: &TextPatch, direction: Direction) -> DiffResult<Vec<u8>> {
    let text = as_text(content)?;
    let lines = split_lines(text);

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0usize;
    let mut drift = 0isize;

    for (i, hunk) in patch.hunks.iter().enumerate() {
        let (expected, replacement) = direction.sides(hunk);
        let recorded = direction.index(hunk);
        let target = (recorded as isize + drift).max(0) as usize;

        let Some(pos) = locate(&lines, &expected, cursor, target) else {
            return Err(DiffError::PatchConflict {
                hunk: i + 1,
                line: target + 1,
                expected: expected
                    .first()
                    .map(|l| l.trim_end_matches('\n').to_string())
                    .unwrap_or_default(),
            });
        };
        if pos != target {
            debug!(hunk = i + 1, offset = pos as isize - target as isize, "hunk applied at offset");
        }

        out.extend(lines[cursor..pos].iter().copied());
        out.extend(replacement);
        cursor = pos + expected.len();
        drift = pos as isize - recorded as isize;
    }
    out.extend(lines[cursor..].iter().copied());

    Ok(out.into_bytes())
}

/// Find where `expected` occurs in `lines[floor..]`, nearest to `target`.
fn locate(lines: &[&str], expected: &[&str], floor: usize, target: usize) -> Option<usize> {
    let last = lines.len().checked_sub(expected.len())?;
    if floor > last {
        return None;
    }
    let target = target.clamp(floor, last);
    let matches_at = |pos: usize| lines[pos..pos + expected.len()] == *expected;

    for distance in 0..=(last - floor) {
        let after = target + distance;
        if after <= last && matches_at(after) {
            return Some(after);
        }
        if let Some(before) = target.checked_sub(distance) {
            if distance > 0 && before >= floor && matches_at(before) {
                return Some(before);
            }
        }
        if after > last && target.saturating_sub(distance) <= floor {
            break;
        }
    }
    None
}
