//! Line edit scripts.
//!
//! An [`EditScript`] lists removals as offsets into the old lines and
//! insertions as offsets into the resulting lines. Applying every removal
//! from the highest offset down, then every insertion from the lowest offset
//! up, turns the old lines into the new ones.

use crate::error::{EditError, Result};
use serde::{Deserialize, Serialize};
use similar::{Algorithm, DiffOp, capture_diff_slices};

/// One line insertion or removal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LineEdit {
    /// Insert `element` so that it ends up at `offset` in the result.
    Insert { offset: usize, element: String },

    /// Remove the line at `offset` in the original lines.
    Remove { offset: usize, element: String },
}

impl LineEdit {
    /// Offset this edit refers to.
    pub fn offset(&self) -> usize {
        match self {
            LineEdit::Insert { offset, .. } | LineEdit::Remove { offset, .. } => *offset,
        }
    }
}

/// Ordered set of line edits between two versions of a buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditScript {
    /// Removals in ascending offset order, followed by insertions in
    /// ascending offset order.
    pub edits: Vec<LineEdit>,
}

impl EditScript {
    /// Computes the edits that turn `old` into `new` with a Myers diff.
    pub fn diff_lines(old: &[String], new: &[String]) -> Self {
        let mut removals = Vec::new();
        let mut insertions = Vec::new();

        for op in capture_diff_slices(Algorithm::Myers, old, new) {
            match op {
                DiffOp::Equal { .. } => {}
                DiffOp::Delete {
                    old_index, old_len, ..
                } => push_removals(&mut removals, old, old_index, old_len),
                DiffOp::Insert {
                    new_index, new_len, ..
                } => push_insertions(&mut insertions, new, new_index, new_len),
                DiffOp::Replace {
                    old_index,
                    old_len,
                    new_index,
                    new_len,
                } => {
                    push_removals(&mut removals, old, old_index, old_len);
                    push_insertions(&mut insertions, new, new_index, new_len);
                }
            }
        }

        removals.append(&mut insertions);
        Self { edits: removals }
    }

    /// Computes the edits between two texts, split with [`crate::break_lines`].
    pub fn diff_text(old: &str, new: &str) -> Self {
        Self::diff_lines(&crate::break_lines(old), &crate::break_lines(new))
    }

    /// Returns `true` if both versions were identical.
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Number of edits.
    pub fn len(&self) -> usize {
        self.edits.len()
    }

    /// Applies the script to `lines` in place.
    ///
    /// # Errors
    ///
    /// Returns `EditError::OffsetOutOfRange` if an edit points outside the
    /// lines, or `EditError::ElementMismatch` if a removal doesn't match the
    /// line it targets. `lines` is left untouched on error.
    pub fn apply(&self, lines: &mut Vec<String>) -> Result<()> {
        let mut result = lines.clone();

        let mut removals: Vec<(usize, &str)> = self
            .edits
            .iter()
            .filter_map(|edit| match edit {
                LineEdit::Remove { offset, element } => Some((*offset, element.as_str())),
                LineEdit::Insert { .. } => None,
            })
            .collect();
        removals.sort_by(|a, b| b.0.cmp(&a.0));

        for (offset, element) in removals {
            match result.get(offset) {
                None => {
                    return Err(EditError::OffsetOutOfRange {
                        offset,
                        len: result.len(),
                    });
                }
                Some(line) if line != element => {
                    return Err(EditError::ElementMismatch { offset });
                }
                Some(_) => {
                    result.remove(offset);
                }
            }
        }

        let mut insertions: Vec<(usize, &str)> = self
            .edits
            .iter()
            .filter_map(|edit| match edit {
                LineEdit::Insert { offset, element } => Some((*offset, element.as_str())),
                LineEdit::Remove { .. } => None,
            })
            .collect();
        insertions.sort_by_key(|(offset, _)| *offset);

        for (offset, element) in insertions {
            if offset > result.len() {
                return Err(EditError::OffsetOutOfRange {
                    offset,
                    len: result.len(),
                });
            }
            result.insert(offset, element.to_string());
        }

        *lines = result;
        Ok(())
    }
}

fn push_removals(edits: &mut Vec<LineEdit>, old: &[String], start: usize, len: usize) {
    edits.extend((start..start + len).map(|offset| LineEdit::Remove {
        offset,
        element: old[offset].clone(),
    }));
}

fn push_insertions(edits: &mut Vec<LineEdit>, new: &[String], start: usize, len: usize) {
    edits.extend((start..start + len).map(|offset| LineEdit::Insert {
        offset,
        element: new[offset].clone(),
    }));
}
