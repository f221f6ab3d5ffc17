//! End-to-end checker tests against scratch source trees.

use std::fs;
use std::path::Path;

use patchcheck_core::{CheckConfig, Checker, Level, Report, ScanMode};
use tempfile::TempDir;

const FOO_C: &str = "\
int a;
int b;
int c;
int d;
old line
line six
static void bar(int x)
int f;
";

struct Tree {
    dir: TempDir,
}

impl Tree {
    fn new() -> Self {
        let dir = TempDir::new().expect("create temp tree");
        fs::create_dir(dir.path().join("source")).expect("create source root");
        fs::create_dir(dir.path().join("patches")).expect("create patch root");
        Self { dir }
    }

    fn write_source(&self, rel: &str, contents: &str) {
        let path = self.dir.path().join("source").join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create source subdir");
        }
        fs::write(path, contents).expect("write source file");
    }

    fn write_patch(&self, name: &str, contents: &str) {
        fs::write(self.dir.path().join("patches").join(name), contents).expect("write patch");
    }

    fn config(&self) -> CheckConfig {
        CheckConfig::new(self.dir.path().join("source"), self.dir.path().join("patches"))
            .expect("roots exist")
    }

    fn check(&self, config: CheckConfig, patch: &str) -> Report {
        Checker::new(config).check_all([Path::new(patch)])
    }
}

fn level_messages(report: &Report, level: Level) -> Vec<&str> {
    report
        .messages
        .iter()
        .filter(|message| message.level == level)
        .map(|message| message.text.as_str())
        .collect()
}

fn standard_tree() -> Tree {
    let tree = Tree::new();
    tree.write_source("foo.c", FOO_C);
    tree
}

#[test]
fn matching_delete_passes_in_full_mode() {
    let tree = standard_tree();
    tree.write_patch(
        "b.patch",
        "diff --git a/foo.c b/foo.c\n\
         --- a/foo.c\n\
         +++ b/foo.c\n\
         @@ -5,2 +5,1 @@\n\
         -old line\n\
         \x20line six\n",
    );
    let report = tree.check(tree.config(), "b.patch");
    assert_eq!((report.passed, report.skipped, report.failed), (1, 0, 0));
    assert!(level_messages(&report, Level::Error).is_empty());
}

#[test]
fn already_applied_change_is_ok_not_error() {
    let tree = standard_tree();
    tree.write_patch(
        "c.patch",
        "diff --git a/foo.c b/foo.c\n\
         --- a/foo.c\n\
         +++ b/foo.c\n\
         @@ -5,2 +5,2 @@\n\
         -ancient line\n\
         +old line\n\
         \x20line six\n",
    );
    let report = tree.check(tree.config(), "c.patch");
    assert_eq!(report.failed, 0);
    let oks = level_messages(&report, Level::Ok);
    assert!(oks.iter().any(|text| text.contains("\"change\" line found at 5")));
}

#[test]
fn pending_change_reports_info() {
    let tree = standard_tree();
    tree.write_patch(
        "pending.patch",
        "diff --git a/foo.c b/foo.c\n\
         --- a/foo.c\n\
         +++ b/foo.c\n\
         @@ -5,2 +5,2 @@\n\
         -old line\n\
         +new line\n\
         \x20line six\n",
    );
    let report = tree.check(tree.config(), "pending.patch");
    assert_eq!(report.failed, 0);
    let infos = level_messages(&report, Level::Info);
    assert!(infos.iter().any(|text| text.contains("\"change\" line not found at 5")));
}

#[test]
fn relocated_landmark_is_found() {
    let tree = standard_tree();
    tree.write_patch(
        "d.patch",
        "diff --git a/foo.c b/foo.c\n\
         --- a/foo.c\n\
         +++ b/foo.c\n\
         @@ -2,2 +2,1 @@\n\
         -static void bar(int x)\n\
         \x20int c;\n",
    );
    let report = tree.check(tree.config().with_find(true), "d.patch");
    assert_eq!(report.failed, 1);
    let finds = level_messages(&report, Level::Find);
    assert_eq!(
        finds,
        vec!["\"delete\" line found at 7: \"static void bar(int x)\""]
    );
}

#[test]
fn relocation_skips_non_landmark_lines() {
    let tree = standard_tree();
    tree.write_patch(
        "noisy.patch",
        "diff --git a/foo.c b/foo.c\n\
         --- a/foo.c\n\
         +++ b/foo.c\n\
         @@ -2,2 +2,1 @@\n\
         -int f;\n\
         \x20int c;\n",
    );
    let report = tree.check(tree.config().with_find(true), "noisy.patch");
    assert_eq!(report.failed, 1);
    assert!(level_messages(&report, Level::Find).is_empty());
}

#[test]
fn deleting_a_missing_file_is_a_path_error() {
    let tree = standard_tree();
    tree.write_patch(
        "e.patch",
        "diff --git a/foo.c b/foo.c\n\
         --- a/gone.c\n\
         +++ /dev/null\n\
         @@ -1,2 +1,0 @@\n\
         -int a;\n\
         -int b;\n",
    );
    let report = tree.check(tree.config(), "e.patch");
    assert_eq!(report.failed, 1);
    let errors = level_messages(&report, Level::Error);
    assert!(errors.iter().any(|text| text.contains("\"old\" file not found in old tree: gone.c")));
}

#[test]
fn creation_diff_never_reads_the_old_file() {
    let tree = standard_tree();
    tree.write_patch(
        "create.patch",
        "diff --git a/new.c b/new.c\n\
         --- /dev/null\n\
         +++ b/new.c\n\
         @@ -0,0 +1,2 @@\n\
         +int created;\n\
         +int lines;\n",
    );
    // a_path names the created file, which does not exist yet; only the
    // /dev/null rules apply.
    let report = tree.check(tree.config(), "create.patch");
    assert_eq!((report.passed, report.failed), (0, 1));
    let errors = level_messages(&report, Level::Error);
    assert!(errors.iter().any(|text| text.contains("\"a\" file not found: new.c")));
}

#[test]
fn creation_diff_skips_hunk_checks_entirely() {
    let tree = standard_tree();
    // The a side names a file that exists, so only the /dev/null creation
    // rules run: new.c must be absent and the hunks are never walked.
    tree.write_patch(
        "create-ok.patch",
        "diff --git a/foo.c b/new.c\n\
         --- /dev/null\n\
         +++ b/new.c\n\
         @@ -0,0 +1,2 @@\n\
         +int created;\n\
         +int lines;\n",
    );
    let report = tree.check(tree.config(), "create-ok.patch");
    assert_eq!((report.passed, report.skipped, report.failed), (1, 0, 0));
    assert!(level_messages(&report, Level::Error).is_empty());
    assert!(!report
        .messages
        .iter()
        .any(|message| message.level == Level::Misc && message.text.starts_with("HUNK")));
}

#[test]
fn duplicate_insert_is_an_error() {
    let tree = standard_tree();
    tree.write_patch(
        "dup.patch",
        "diff --git a/foo.c b/foo.c\n\
         --- a/foo.c\n\
         +++ b/foo.c\n\
         @@ -2,1 +2,2 @@\n\
         +int b;\n\
         \x20int b;\n",
    );
    let report = tree.check(tree.config(), "dup.patch");
    assert_eq!(report.failed, 1);
    let errors = level_messages(&report, Level::Error);
    assert!(errors.iter().any(|text| text.contains("\"add\"    line found at 2: \"int b;\"")));
}

#[test]
fn stale_hunk_range_is_a_bounds_error() {
    let tree = standard_tree();
    tree.write_patch(
        "stale.patch",
        "diff --git a/foo.c b/foo.c\n\
         --- a/foo.c\n\
         +++ b/foo.c\n\
         @@ -7,5 +7,5 @@\n\
         \x20static void bar(int x)\n",
    );
    let report = tree.check(tree.config(), "stale.patch");
    assert_eq!(report.failed, 1);
    let errors = level_messages(&report, Level::Error);
    assert!(errors
        .iter()
        .any(|text| text.contains("invalid old start or count for file: start=7, count=5, length=8")));
}

#[test]
fn complete_mode_reports_matches_too() {
    let tree = standard_tree();
    tree.write_patch(
        "b.patch",
        "diff --git a/foo.c b/foo.c\n\
         --- a/foo.c\n\
         +++ b/foo.c\n\
         @@ -5,2 +5,1 @@\n\
         -old line\n\
         \x20line six\n",
    );
    let report = tree.check(tree.config().with_mode(ScanMode::Complete), "b.patch");
    let oks = level_messages(&report, Level::Ok);
    assert!(oks.iter().any(|text| text.contains("\"delete\" line found at 5")));
    assert!(oks.iter().any(|text| text.contains("\"merge\"  line found at 6")));
}

#[test]
fn context_drift_warns_but_does_not_fail() {
    let tree = standard_tree();
    tree.write_patch(
        "drift.patch",
        "diff --git a/foo.c b/foo.c\n\
         --- a/foo.c\n\
         +++ b/foo.c\n\
         @@ -2,1 +2,1 @@\n\
         \x20int drifted;\n",
    );
    let report = tree.check(tree.config(), "drift.patch");
    assert_eq!(report.failed, 0);
    let warnings = level_messages(&report, Level::Warning);
    assert!(warnings.iter().any(|text| text.contains("\"merge\"  line not found at 2")));
}

#[test]
fn binary_and_empty_patches_are_skipped() {
    let tree = standard_tree();
    tree.write_patch(
        "binary.patch",
        "diff --git a/blob.bin b/blob.bin\n\
         GIT binary patch\n\
         literal 16\n",
    );
    tree.write_patch("empty.patch", "Subject: nothing\n\nno diffs here\n");
    let report =
        Checker::new(tree.config()).check_all([Path::new("binary.patch"), Path::new("empty.patch")]);
    assert_eq!((report.passed, report.skipped, report.failed), (0, 2, 0));
}

#[test]
fn missing_patch_file_fails_that_patch_only() {
    let tree = standard_tree();
    tree.write_patch(
        "b.patch",
        "diff --git a/foo.c b/foo.c\n\
         --- a/foo.c\n\
         +++ b/foo.c\n\
         @@ -5,2 +5,1 @@\n\
         -old line\n\
         \x20line six\n",
    );
    let report =
        Checker::new(tree.config()).check_all([Path::new("nope.patch"), Path::new("b.patch")]);
    assert_eq!((report.passed, report.failed), (1, 1));
    let errors = level_messages(&report, Level::Error);
    assert!(errors.iter().any(|text| text.contains("not found")));
}

#[test]
fn targets_filter_skips_other_diffs() {
    let tree = standard_tree();
    tree.write_patch(
        "two.patch",
        "diff --git a/foo.c b/foo.c\n\
         --- a/foo.c\n\
         +++ b/foo.c\n\
         @@ -5,2 +5,1 @@\n\
         -old line\n\
         \x20line six\n\
         diff --git a/missing.c b/missing.c\n\
         --- a/missing.c\n\
         +++ b/missing.c\n\
         @@ -1,1 +1,1 @@\n\
         \x20whatever\n",
    );
    // Unfiltered, the second diff's missing file fails the patch.
    let report = tree.check(tree.config(), "two.patch");
    assert_eq!(report.failed, 1);

    let report = tree.check(tree.config().with_targets(["foo.c"]), "two.patch");
    assert_eq!((report.passed, report.failed), (1, 0));
}

#[test]
fn checking_twice_yields_identical_reports() {
    let tree = standard_tree();
    tree.write_patch(
        "d.patch",
        "diff --git a/foo.c b/foo.c\n\
         --- a/foo.c\n\
         +++ b/foo.c\n\
         @@ -2,2 +2,1 @@\n\
         -static void bar(int x)\n\
         \x20int c;\n",
    );
    let checker = Checker::new(tree.config().with_find(true));
    let first = checker.check_all([Path::new("d.patch")]);
    let second = checker.check_all([Path::new("d.patch")]);
    assert_eq!(first, second);
}

#[test]
fn summary_line_tallies_outcomes() {
    let tree = standard_tree();
    tree.write_patch("empty.patch", "nothing\n");
    let report = tree.check(tree.config(), "empty.patch");
    let rendered: Vec<String> = report.lines("   ").collect();
    assert!(rendered.iter().any(|line| line == "   0 passed, 1 skipped, 0 failed, 1 tested"));
}
