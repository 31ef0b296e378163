//! Polyfmt Edit - minimal line edits between two versions of a buffer.
//!
//! Editors keep the cursor and undo history stable when a formatted buffer
//! is applied as a small set of line insertions and removals instead of a
//! full replacement. This crate computes that edit script.
//!
//! ```
//! use polyfmt_edit::{EditScript, break_lines};
//!
//! let old = break_lines("a\nb\nc\n");
//! let new = break_lines("a\nB\nc\n");
//! let script = EditScript::diff_lines(&old, &new);
//!
//! let mut lines = old.clone();
//! script.apply(&mut lines).unwrap();
//! assert_eq!(lines, new);
//! ```

pub mod error;
pub mod lines;
pub mod script;

pub use error::{EditError, Result};
pub use lines::break_lines;
pub use script::{EditScript, LineEdit};
