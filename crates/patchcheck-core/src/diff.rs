//! Per-file diff section parsing.

use crate::error::ParseError;
use crate::hunk::Hunk;
use crate::text;

/// Whether a diff carries textual hunks or a binary payload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DiffKind {
    /// Ordinary unified-diff section with hunks.
    #[default]
    Text,
    /// `GIT binary patch` section; paths and hunks are absent.
    Binary,
}

/// One file's changes within a patch.
///
/// Path identity comes from two places: the `diff --git a/<p> b/<p>` line
/// (git format only; `spec`, `a_path`, `b_path`) and the `---`/`+++`
/// header lines (`old_path`, `new_path`). The literal value `/dev/null`
/// is preserved verbatim to signal file creation or deletion.
///
/// ```
/// # use patchcheck_core::{Diff, DiffKind};
/// let lines: Vec<String> = [
///     "diff --git a/drivers/foo.c b/drivers/foo.c",
///     "--- a/drivers/foo.c",
///     "+++ b/drivers/foo.c",
///     "@@ -1,2 +1,2 @@",
///     "-old",
///     "+new",
/// ].iter().map(ToString::to_string).collect();
/// let diff = Diff::parse(&lines).unwrap();
/// assert_eq!(diff.kind, DiffKind::Text);
/// assert_eq!(diff.old_path.as_deref(), Some("drivers/foo.c"));
/// assert_eq!(diff.hunks.len(), 1);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Diff {
    /// The raw `diff` line, when present (git format).
    pub spec: Option<String>,
    /// Path named after `a/` on the `diff` line.
    pub a_path: Option<String>,
    /// Path named after `b/` on the `diff` line.
    pub b_path: Option<String>,
    /// Path from the `---` line; `/dev/null` marks a created file.
    pub old_path: Option<String>,
    /// Path from the `+++` line; `/dev/null` marks a deleted file.
    pub new_path: Option<String>,
    /// Text or binary.
    pub kind: DiffKind,
    /// The hunks in order; empty for binary diffs.
    pub hunks: Vec<Hunk>,
}

impl Diff {
    /// Parses one diff section: everything from a `diff` line (or the
    /// `---` line of a plain diff) up to the next section.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::EmptySection`] for empty input,
    /// [`ParseError::DiffLine`] for an unsplittable `diff` line, and
    /// propagates hunk header failures.
    pub fn parse(lines: &[String]) -> Result<Self, ParseError> {
        if lines.is_empty() {
            return Err(ParseError::EmptySection);
        }

        let (head, body) = text::partition_at(lines, "@@ ");
        let mut diff = Self::default();
        diff.parse_head(head)?;
        if diff.kind == DiffKind::Text {
            if let Some(body) = body {
                for section in text::split_at(body, "@@ ") {
                    diff.hunks.push(Hunk::parse(section)?);
                }
            }
        }
        Ok(diff)
    }

    /// True when the diff creates a file (`--- /dev/null`).
    #[must_use]
    pub fn is_creation(&self) -> bool {
        self.old_path.as_deref() == Some(NULL_PATH)
    }

    /// True when the diff deletes a file (`+++ /dev/null`).
    #[must_use]
    pub fn is_deletion(&self) -> bool {
        self.new_path.as_deref() == Some(NULL_PATH)
    }

    fn parse_head(&mut self, head: &[String]) -> Result<(), ParseError> {
        let mut rest = head;
        if let Some(first) = head.first() {
            if first.starts_with("diff -") {
                self.parse_diff_line(first)?;
                rest = &head[1..];
            }
        }

        for line in rest {
            if line == "GIT binary patch" {
                self.kind = DiffKind::Binary;
                self.old_path = None;
                self.new_path = None;
                break;
            } else if let Some(named) = line.strip_prefix("--- ") {
                self.old_path = Some(strip_tree_prefix(named));
            } else if let Some(named) = line.strip_prefix("+++ ") {
                self.new_path = Some(strip_tree_prefix(named));
            }
        }
        Ok(())
    }

    /// Extracts `a_path`/`b_path` from a line like
    /// `diff --git a/<path> b/<path>`.
    fn parse_diff_line(&mut self, line: &str) -> Result<(), ParseError> {
        let bad = || ParseError::DiffLine { line: line.to_string() };

        let norm = text::normalize(line);
        let parts: Vec<&str> = norm.split(' ').collect();
        let a_token = parts.get(2).ok_or_else(bad)?;
        let b_token = parts.get(3).ok_or_else(bad)?;

        self.spec = Some(line.to_string());
        let a_path = a_token.get(2..).ok_or_else(bad)?.to_string();
        let b_path = b_token.get(2..).ok_or_else(bad)?.to_string();
        // On rare occasions the diff line is corrupted and the a side is
        // truncated to a bare directory.
        self.a_path = if a_path.ends_with('/') { Some(b_path.clone()) } else { Some(a_path) };
        self.b_path = Some(b_path);
        Ok(())
    }
}

/// The path value signalling a nonexistent file side.
pub const NULL_PATH: &str = "/dev/null";

fn strip_tree_prefix(named: &str) -> String {
    if named == NULL_PATH {
        named.to_string()
    } else {
        // Drop the leading `a/` or `b/` tree tag.
        named.get(2..).unwrap_or("").to_string()
    }
}
