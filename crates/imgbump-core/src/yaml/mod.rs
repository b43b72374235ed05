//! Structure-preserving YAML editing
//!
//! Two independent views of a target file are used:
//! - [`YamlDocument`]: a read-only, line-tracked node tree used to find the
//!   current value of a logical path and the physical line backing it
//! - [`EditBatch`]: the raw line array of the same file, rewritten in place
//!
//! They are joined only by line number. The tree is never written back, so
//! template markup the YAML parser would normalise or reject survives edits.

mod document;
mod patch;

pub use document::{Node, ScalarValue, YamlDocument};
pub use patch::{apply_edits, patch_lines, EditBatch, PendingEdit};
