//! Validation of parsed patches against a source tree.
//!
//! The checker walks each patch through a fixed pipeline: path checks,
//! hunk bounds checks, then a per-edit classification walk that compares
//! normalized patch lines against the target file. Nothing is mutated;
//! every finding is accumulated as a [`Message`](crate::Message) and the
//! per-patch outcome is tallied in the returned [`Report`].

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::diff::Diff;
use crate::error::CheckError;
use crate::hunk::{Edit, EditOp, Hunk};
use crate::landmark;
use crate::patch::{Patch, PatchKind};
use crate::report::{Level, Report};
use crate::text;

/// How much of the edit walk is reported.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScanMode {
    /// Report errors only.
    #[default]
    Full,
    /// Report the status of every edit, matched or not.
    Complete,
}

/// Checker configuration.
///
/// Roots may be empty, in which case patch and source paths are used as
/// given (relative to the caller's working directory).
///
/// ```
/// # use patchcheck_core::{CheckConfig, ScanMode};
/// let config = CheckConfig::new("", "")
///     .unwrap()
///     .with_mode(ScanMode::Complete)
///     .with_find(true);
/// assert!(config.find_enabled());
/// ```
#[derive(Clone, Debug)]
pub struct CheckConfig {
    source_root: PathBuf,
    patch_root: PathBuf,
    targets: Option<Vec<String>>,
    mode: ScanMode,
    find: bool,
    indent_unit: String,
}

impl CheckConfig {
    /// Creates a configuration rooted at the given source and patch
    /// directories.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::Parameter`] when a non-empty root is not an
    /// existing directory.
    pub fn new(
        source_root: impl Into<PathBuf>,
        patch_root: impl Into<PathBuf>,
    ) -> Result<Self, CheckError> {
        let source_root = source_root.into();
        let patch_root = patch_root.into();
        check_root("source_root", &source_root)?;
        check_root("patch_root", &patch_root)?;
        Ok(Self {
            source_root,
            patch_root,
            targets: None,
            mode: ScanMode::default(),
            find: false,
            indent_unit: "   ".to_string(),
        })
    }

    /// Restricts checking to diffs whose paths contain one of `targets`.
    #[must_use]
    pub fn with_targets<I, S>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.targets = Some(targets.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the scan mode.
    #[must_use]
    pub fn with_mode(mut self, mode: ScanMode) -> Self {
        self.mode = mode;
        self
    }

    /// Enables or disables fuzzy relocation of mismatched lines.
    #[must_use]
    pub fn with_find(mut self, find: bool) -> Self {
        self.find = find;
        self
    }

    /// Sets the indentation unit used when rendering messages.
    #[must_use]
    pub fn with_indent_unit(mut self, unit: impl Into<String>) -> Self {
        self.indent_unit = unit.into();
        self
    }

    /// The configured scan mode.
    #[must_use]
    pub fn mode(&self) -> ScanMode {
        self.mode
    }

    /// Whether fuzzy relocation is enabled.
    #[must_use]
    pub fn find_enabled(&self) -> bool {
        self.find
    }

    /// The indentation unit for rendering.
    #[must_use]
    pub fn indent_unit(&self) -> &str {
        &self.indent_unit
    }
}

fn check_root(name: &'static str, root: &Path) -> Result<(), CheckError> {
    if !root.as_os_str().is_empty() && !root.is_dir() {
        return Err(CheckError::Parameter { name, value: root.display().to_string() });
    }
    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Outcome {
    Passed,
    Skipped,
    Failed,
}

/// Validates patch files against a source tree.
///
/// A `Checker` is stateless between calls: each [`check_all`]
/// invocation builds a fresh [`Report`], and source files are reread on
/// every run so results never reflect stale content.
///
/// [`check_all`]: Checker::check_all
#[derive(Clone, Debug)]
pub struct Checker {
    config: CheckConfig,
}

impl Checker {
    /// Creates a checker with the given configuration.
    #[must_use]
    pub fn new(config: CheckConfig) -> Self {
        Self { config }
    }

    /// Checks each patch in order and returns the accumulated report.
    ///
    /// A patch that fails to parse (or to load) is reported and counted
    /// as failed; the remaining patches are still checked.
    pub fn check_all<I, P>(&self, patches: I) -> Report
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut report = Report::default();
        report.push(
            Level::Misc,
            0,
            format!("patchdir  = \"{}\":", self.config.patch_root.display()),
        );
        report.push(
            Level::Misc,
            0,
            format!("sourcedir = \"{}\":", self.config.source_root.display()),
        );

        let mut tested = 0usize;
        for patch in patches {
            tested += 1;
            match self.check_one(patch.as_ref(), &mut report) {
                Outcome::Passed => report.passed += 1,
                Outcome::Skipped => report.skipped += 1,
                Outcome::Failed => report.failed += 1,
            }
        }

        report.push(Level::Misc, 0, "");
        report.push(Level::Misc, 0, "Summary:");
        report.push(
            Level::Misc,
            1,
            format!(
                "{} passed, {} skipped, {} failed, {tested} tested",
                report.passed, report.skipped, report.failed
            ),
        );
        report
    }

    fn check_one(&self, patch_path: &Path, report: &mut Report) -> Outcome {
        debug!(patch = %patch_path.display(), "checking patch");
        report.push(Level::Misc, 0, "");
        report.push(Level::Misc, 0, format!("PATCH: \"{}\"", patch_path.display()));

        let full_path = join_root(&self.config.patch_root, patch_path);
        let patch = match Patch::from_file(&full_path) {
            Ok(patch) => patch,
            Err(err) => {
                report.push(Level::Error, 1, err.to_string());
                return Outcome::Failed;
            }
        };

        if patch.diffs.is_empty() {
            report.push(Level::Info, 1, "skipping empty/commented patch");
            return Outcome::Skipped;
        }
        if patch.kind == PatchKind::Binary {
            report.push(Level::Info, 1, "skipping binary patch");
            return Outcome::Skipped;
        }

        let mut errors = 0usize;
        for diff in &patch.diffs {
            errors += self.check_diff(diff, report);
        }

        report.push(Level::Info, 1, format!("{errors} patch errors"));
        if errors == 0 {
            Outcome::Passed
        } else {
            Outcome::Failed
        }
    }

    fn check_diff(&self, diff: &Diff, report: &mut Report) -> usize {
        let banner = diff
            .spec
            .as_deref()
            .or(diff.old_path.as_deref())
            .unwrap_or("(unnamed diff)");
        report.push(Level::Misc, 1, format!("DIFF: \"{banner}\""));
        debug!(diff = banner, hunks = diff.hunks.len(), "checking diff");

        if !self.targeted(diff) {
            return 0;
        }
        if !self.check_paths(diff, report) {
            return 1;
        }
        // Adding lines to a freshly created file cannot conflict.
        if diff.is_creation() {
            return 0;
        }

        let Some(old_path) = diff.old_path.as_deref() else {
            report.push(Level::Error, 2, "diff names no old file");
            return 1;
        };
        let old_lines = match text::read_lines(&join_root(&self.config.source_root, old_path)) {
            Ok(lines) => lines,
            Err(err) => {
                report.push(Level::Error, 2, format!("cannot read \"{old_path}\": {err}"));
                return 1;
            }
        };

        let mut errors = 0usize;
        for hunk in &diff.hunks {
            report.push(Level::Misc, 2, format!("HUNK: \"{}\"", hunk.spec));
            if !self.check_hunk_bounds(hunk, old_lines.len(), report) {
                errors += 1;
                continue;
            }
            errors += self.check_hunk_edits(old_path, hunk, &old_lines, report);
        }
        errors
    }

    fn targeted(&self, diff: &Diff) -> bool {
        let Some(targets) = &self.config.targets else {
            return true;
        };
        let named = [&diff.a_path, &diff.old_path, &diff.new_path];
        targets.iter().any(|target| {
            named
                .iter()
                .any(|path| path.as_deref().is_some_and(|path| path.contains(target)))
        })
    }

    /// Verifies that every file the diff names is consistent with the
    /// source tree: referenced files exist, created files do not already
    /// exist, deleted files still do.
    fn check_paths(&self, diff: &Diff, report: &mut Report) -> bool {
        if let Some(a_path) = diff.a_path.as_deref() {
            if !join_root(&self.config.source_root, a_path).is_file() {
                report.push(Level::Error, 2, format!("\"a\" file not found: {a_path}"));
                return false;
            }
        }

        let old_path = diff.old_path.as_deref();
        let new_path = diff.new_path.as_deref();
        if old_path.is_none() && new_path.is_none() {
            report.push(Level::Error, 2, "diff names no files");
            return false;
        }

        if diff.is_creation() {
            // Pure addition: the file must not already exist.
            if let Some(new_path) = new_path {
                if join_root(&self.config.source_root, new_path).is_file() {
                    report
                        .push(Level::Error, 2, format!("\"new\" file found in old tree: {new_path}"));
                    return false;
                }
            }
            return true;
        }

        if diff.is_deletion() {
            // Pure deletion: the file must still exist to be removed.
            if let Some(old_path) = old_path {
                if !join_root(&self.config.source_root, old_path).is_file() {
                    report.push(
                        Level::Error,
                        2,
                        format!("\"old\" file not found in old tree: {old_path}"),
                    );
                    return false;
                }
            }
            return true;
        }

        if let Some(old_path) = old_path {
            if !join_root(&self.config.source_root, old_path).is_file() {
                report.push(Level::Error, 2, format!("\"old\" file not found: {old_path}"));
                return false;
            }
        }
        if let Some(new_path) = new_path {
            if !join_root(&self.config.source_root, new_path).is_file() {
                report.push(Level::Error, 2, format!("\"new\" file not found: {new_path}"));
                return false;
            }
        }

        true
    }

    /// Checks the hunk's old-file range against the file length. Ranges
    /// go stale when other patches have already been merged into the
    /// tree, so this failure is common and reported with full numbers.
    fn check_hunk_bounds(&self, hunk: &Hunk, length: usize, report: &mut Report) -> bool {
        let in_range = hunk.old_start == 0
            || hunk.old_count == 0
            || (hunk.old_start <= length && hunk.old_start + hunk.old_count <= length);
        if !in_range {
            report.push(
                Level::Error,
                3,
                format!(
                    "invalid old start or count for file: start={}, count={}, length={length}",
                    hunk.old_start, hunk.old_count
                ),
            );
        }
        in_range
    }

    /// Walks the hunk's edits against the old file, maintaining a
    /// 1-based cursor. A delete immediately followed by an add is one
    /// change request; insert edits never advance the cursor because the
    /// inserted line has no position in the old file.
    fn check_hunk_edits(
        &self,
        file_path: &str,
        hunk: &Hunk,
        lines: &[String],
        report: &mut Report,
    ) -> usize {
        let complete = self.config.mode == ScanMode::Complete;
        let mut errors = 0usize;
        let mut current = hunk.old_start;
        let mut mismatches: Vec<(usize, EditOp)> = Vec::new();

        let edits = &hunk.edits;
        let mut index = 0;
        while index < edits.len() {
            let edit = &edits[index];
            let Some(line) = current.checked_sub(1).and_then(|i| lines.get(i)) else {
                report.push(
                    Level::Error,
                    3,
                    format!("edit walk left the file at line {current}"),
                );
                errors += 1;
                break;
            };
            let source = text::normalize(line);

            let change_pair = edit.op == EditOp::Delete
                && edits.get(index + 1).is_some_and(|next| next.op == EditOp::Add);
            if change_pair {
                let inserted = &edits[index + 1].text;
                if text::normalize(inserted) == source {
                    report.push(
                        Level::Ok,
                        3,
                        format!("\"change\" line found at {current}: \"{inserted}\""),
                    );
                } else if text::normalize(&edit.text) == source {
                    report.push(
                        Level::Info,
                        3,
                        format!("\"change\" line not found at {current}: \"{inserted}\""),
                    );
                } else {
                    report.push(
                        Level::Error,
                        3,
                        format!("\"delete\" line not found at {current}: \"{inserted}\""),
                    );
                    errors += 1;
                }
                current += 1;
                index += 2;
                continue;
            }

            match edit.op {
                EditOp::Delete => {
                    if text::normalize(&edit.text) == source {
                        if complete {
                            report.push(
                                Level::Ok,
                                3,
                                format!("\"delete\" line found at {current}: \"{}\"", edit.text),
                            );
                        }
                    } else {
                        report.push(
                            Level::Error,
                            3,
                            format!("\"delete\" line not found at {current}: \"{}\"", edit.text),
                        );
                        errors += 1;
                        mismatches.push((index, EditOp::Delete));
                    }
                    current += 1;
                }
                EditOp::Add => {
                    if text::normalize(&edit.text) == source {
                        // The line the patch wants to insert is already
                        // here: the patch was probably applied before.
                        report.push(
                            Level::Error,
                            3,
                            format!("\"add\"    line found at {current}: \"{}\"", edit.text),
                        );
                        errors += 1;
                    } else {
                        if complete {
                            report.push(
                                Level::Info,
                                3,
                                format!("\"add\"    line not found at next line: \"{}\"", edit.text),
                            );
                        }
                        mismatches.push((index, EditOp::Add));
                    }
                }
                EditOp::Context => {
                    if text::normalize(&edit.text) == source {
                        if complete {
                            report.push(
                                Level::Ok,
                                3,
                                format!("\"merge\"  line found at {current}: \"{}\"", edit.text),
                            );
                        }
                    } else {
                        report.push(
                            Level::Warning,
                            3,
                            format!("\"merge\"  line not found at {current}: \"{}\"", edit.text),
                        );
                        mismatches.push((index, EditOp::Context));
                    }
                    current += 1;
                }
            }
            index += 1;
        }

        if self.config.find && !mismatches.is_empty() {
            relocate(file_path, edits, lines, &mismatches, report);
        }
        errors
    }
}

/// Searches the whole file for mismatched edit lines that qualify as
/// landmarks, reporting every match with its 1-based line number.
fn relocate(
    file_path: &str,
    edits: &[Edit],
    lines: &[String],
    mismatches: &[(usize, EditOp)],
    report: &mut Report,
) {
    for &(index, op) in mismatches {
        let raw = &edits[index].text;
        if !landmark::is_landmark(file_path, raw) {
            continue;
        }
        let needle = text::normalize(raw);
        let kind = match op {
            EditOp::Add => "\"add\"   ",
            EditOp::Delete => "\"delete\"",
            EditOp::Context => "\"merge\" ",
        };
        for (line_index, line) in lines.iter().enumerate() {
            if text::normalize(line) == needle {
                report.push(
                    Level::Find,
                    3,
                    format!("{kind} line found at {}: \"{raw}\"", line_index + 1),
                );
            }
        }
    }
}

fn join_root(root: &Path, tail: impl AsRef<Path>) -> PathBuf {
    if root.as_os_str().is_empty() {
        tail.as_ref().to_path_buf()
    } else {
        root.join(tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_roots_are_accepted() {
        assert!(CheckConfig::new("", "").is_ok());
    }

    #[test]
    fn missing_root_is_a_parameter_error() {
        let err = CheckConfig::new("/no/such/tree", "").unwrap_err();
        assert!(matches!(err, CheckError::Parameter { name: "source_root", .. }));
    }

    #[test]
    fn join_root_with_empty_root_uses_tail() {
        assert_eq!(join_root(Path::new(""), "a/b.c"), PathBuf::from("a/b.c"));
        assert_eq!(join_root(Path::new("/src"), "a/b.c"), PathBuf::from("/src/a/b.c"));
    }
}
