//! Diff engine for Folio.
//!
//! Computes structural diffs between tree snapshots and line-level diffs
//! between page contents, and applies text patches forward or in reverse.
//!
//! # Key Types
//!
//! - [`TreeDiff`] / [`TreeChange`] -- Tree-level diff (added/deleted/modified/renamed pages)
//! - [`TextPatch`] / [`Hunk`] / [`PatchLine`] -- Line-level diff, renderable as a unified diff
//! - [`Direction`] -- Forward or inverse patch application

pub mod error;
pub mod patch;
pub mod text_diff;
pub mod tree_diff;

pub use error::{DiffError, DiffResult};
pub use patch::{apply_patch, Direction};
pub use text_diff::{text_diff, Hunk, PatchLine, TextPatch};
pub use tree_diff::{diff_tree_objects, diff_trees, TreeChange, TreeDiff};
