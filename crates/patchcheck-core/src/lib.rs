//! Unified-diff patch parsing and hunk validation.
//!
//! `patchcheck-core` parses patch files (git or plain unified diffs,
//! optionally wrapped in email framing) into a structured
//! patch → diff → hunk → edit model, then validates each edit against a
//! target source tree: is the change already applied, cleanly
//! applicable, missing, or ambiguous? With relocation enabled, lines
//! that miss at their stated position are searched for across the whole
//! file — but only when they are distinctive enough ("landmarks") for
//! the search to be meaningful.
//!
//! The crate never mutates files; it is a read-only diagnostic.
//!
//! ```
//! use patchcheck_core::{Hunk, Patch};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let lines: Vec<String> = [
//!         "diff --git a/foo.c b/foo.c",
//!         "--- a/foo.c",
//!         "+++ b/foo.c",
//!         "@@ -3,2 +3,2 @@ static int foo(void)",
//!         "-int bar;",
//!         "+int baz;",
//!     ]
//!     .iter()
//!     .map(ToString::to_string)
//!     .collect();
//!
//!     let patch = Patch::parse(&lines)?;
//!     assert_eq!(patch.diffs.len(), 1);
//!     let hunk: &Hunk = &patch.diffs[0].hunks[0];
//!     assert_eq!(hunk.old_start, 3);
//!     assert_eq!(hunk.note, "static");
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod checker;
mod diff;
mod error;
mod hunk;
mod landmark;
mod patch;
mod report;
pub mod text;

pub use checker::{CheckConfig, Checker, ScanMode};
pub use diff::{Diff, DiffKind, NULL_PATH};
pub use error::{CheckError, ParseError};
pub use hunk::{Edit, EditOp, Hunk};
pub use landmark::{is_landmark, FileKind};
pub use patch::{Patch, PatchKind};
pub use report::{Level, Message, Report};

/// Returns the semantic version of the `patchcheck-core` crate.
///
/// ```
/// assert!(!patchcheck_core::version().is_empty());
/// ```
#[must_use]
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
