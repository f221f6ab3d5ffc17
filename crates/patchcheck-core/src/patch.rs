//! Whole-patch parsing: email framing, comment fences, section splitting.

use std::collections::BTreeSet;
use std::path::Path as FsPath;

use crate::diff::{Diff, DiffKind};
use crate::error::{CheckError, ParseError};
use crate::text;

const DIFF_MARKER: &str = "diff --git ";
const SIGNATURE_MARKER: &str = "-- ";
const FENCE_MARKER: &str = "\"\"\"";

/// Whether a patch contains any binary diff section.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PatchKind {
    /// Every diff in the patch is textual.
    #[default]
    Text,
    /// At least one diff carries a binary payload.
    Binary,
}

/// A parsed patch file: an ordered sequence of per-file diffs.
///
/// Patches may arrive wrapped in an email (header preamble, trailing
/// `-- ` signature) and may contain triple-quote fenced blocks that
/// comment out whole sections; both are discarded during parsing.
///
/// ```
/// # use patchcheck_core::{Patch, PatchKind};
/// let lines: Vec<String> = [
///     "From: dev@example.org",
///     "Subject: [PATCH] fix foo",
///     "",
///     "diff --git a/foo.c b/foo.c",
///     "--- a/foo.c",
///     "+++ b/foo.c",
///     "@@ -1 +1 @@",
///     "-old",
///     "+new",
///     "-- ",
///     "2.39.0",
/// ].iter().map(ToString::to_string).collect();
/// let patch = Patch::parse(&lines).unwrap();
/// assert_eq!(patch.kind, PatchKind::Text);
/// assert_eq!(patch.diffs.len(), 1);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Patch {
    /// The diff sections in order.
    pub diffs: Vec<Diff>,
    /// Text, or binary when any section is.
    pub kind: PatchKind,
}

impl Patch {
    /// Parses the lines of a patch file.
    ///
    /// A patch with no `diff --git` marker (fully commented out, or not
    /// a git patch at all) parses to zero diffs and [`PatchKind::Text`].
    ///
    /// # Errors
    ///
    /// Propagates [`ParseError`] from malformed diff or hunk headers.
    pub fn parse(lines: &[String]) -> Result<Self, ParseError> {
        let lines = discard_fenced(lines);

        // Everything before the first diff marker is email preamble.
        let (_, body) = text::partition_at(&lines, DIFF_MARKER);
        let Some(body) = body else {
            return Ok(Self::default());
        };

        // Everything from the last signature delimiter on is email footer.
        let (trimmed, _) = text::rpartition_at(body, SIGNATURE_MARKER);
        let body = trimmed.unwrap_or(body);

        let mut patch = Self::default();
        for section in text::split_at(body, DIFF_MARKER) {
            let diff = Diff::parse(section)?;
            if diff.kind == DiffKind::Binary {
                patch.kind = PatchKind::Binary;
            }
            patch.diffs.push(diff);
        }
        Ok(patch)
    }

    /// Reads and parses the patch file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::NotFound`] when `path` is not an existing
    /// file, [`CheckError::Io`] on read failure, and wraps parse errors.
    pub fn from_file(path: &FsPath) -> Result<Self, CheckError> {
        if !path.is_file() {
            return Err(CheckError::NotFound { path: path.display().to_string() });
        }
        let lines = text::read_lines(path)?;
        Ok(Self::parse(&lines)?)
    }

    /// Lists the file paths referenced by `diff` lines, sorted and
    /// de-duplicated, without parsing the sections.
    ///
    /// Tolerates `diff -u`-style lines by skipping option words before
    /// the old-file token.
    #[must_use]
    pub fn list_files(lines: &[String]) -> Vec<String> {
        let mut files = BTreeSet::new();
        for line in lines {
            if !line.starts_with("diff -") {
                continue;
            }
            let norm = text::normalize(line);
            let mut tokens = norm.split(' ').skip(2).skip_while(|tok| tok.starts_with('-'));
            if let Some(token) = tokens.next() {
                let file = token.strip_prefix("a/").unwrap_or(token);
                files.insert(file.to_string());
            }
        }
        files.into_iter().collect()
    }
}

/// Drops triple-quote fenced blocks, used to disable diff sections on
/// purpose while keeping them in the file.
fn discard_fenced(lines: &[String]) -> Vec<String> {
    let mut kept = Vec::with_capacity(lines.len());
    let mut in_fence = false;
    for line in lines {
        if line.trim_start().starts_with(FENCE_MARKER) {
            in_fence = !in_fence;
        } else if !in_fence {
            kept.push(line.clone());
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(ToString::to_string).collect()
    }

    fn simple_patch() -> Vec<String> {
        lines(&[
            "From 1a2b3c Mon Sep 17 00:00:00 2001",
            "Subject: [PATCH 1/2] foo: rename bar",
            "",
            "diff --git a/foo.c b/foo.c",
            "--- a/foo.c",
            "+++ b/foo.c",
            "@@ -1,2 +1,2 @@",
            " int a;",
            "-int bar;",
            "+int baz;",
            "diff --git a/foo.h b/foo.h",
            "--- a/foo.h",
            "+++ b/foo.h",
            "@@ -1 +1 @@",
            "-extern int bar;",
            "+extern int baz;",
            "-- ",
            "2.39.0",
        ])
    }

    #[test]
    fn splits_sections_and_drops_email_framing() {
        let patch = Patch::parse(&simple_patch()).unwrap();
        assert_eq!(patch.diffs.len(), 2);
        assert_eq!(patch.diffs[0].old_path.as_deref(), Some("foo.c"));
        assert_eq!(patch.diffs[1].new_path.as_deref(), Some("foo.h"));
        assert_eq!(patch.kind, PatchKind::Text);
    }

    #[test]
    fn patch_without_diff_marker_is_empty_text() {
        let patch = Patch::parse(&lines(&["Subject: nothing here", "just prose"])).unwrap();
        assert!(patch.diffs.is_empty());
        assert_eq!(patch.kind, PatchKind::Text);
    }

    #[test]
    fn fenced_sections_are_discarded() {
        let mut input = lines(&["\"\"\""]);
        input.extend(lines(&[
            "diff --git a/dead.c b/dead.c",
            "--- a/dead.c",
            "+++ b/dead.c",
            "\"\"\"",
        ]));
        input.extend(simple_patch());
        let patch = Patch::parse(&input).unwrap();
        assert_eq!(patch.diffs.len(), 2);
        assert!(patch.diffs.iter().all(|d| d.old_path.as_deref() != Some("dead.c")));
    }

    #[test]
    fn binary_section_marks_whole_patch_binary() {
        let patch = Patch::parse(&lines(&[
            "diff --git a/blob.bin b/blob.bin",
            "GIT binary patch",
            "literal 12",
        ]))
        .unwrap();
        assert_eq!(patch.kind, PatchKind::Binary);
    }

    #[test]
    fn list_files_is_sorted_and_deduplicated() {
        let input = lines(&[
            "diff --git a/zzz.c b/zzz.c",
            "diff --git a/aaa.c b/aaa.c",
            "diff -u -R -n aaa.c aaa.c",
        ]);
        assert_eq!(Patch::list_files(&input), vec!["aaa.c", "zzz.c"]);
    }

    #[test]
    fn missing_file_reports_not_found() {
        let err = Patch::from_file(std::path::Path::new("/no/such/patch.diff")).unwrap_err();
        assert!(matches!(err, CheckError::NotFound { .. }));
    }
}
