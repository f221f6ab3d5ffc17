//! Command-line interface for the patchcheck patch validator.
//!
//! Wires clap argument parsing and an optional JSON configuration file
//! to the checker in `patchcheck-core`, prints the resulting report to
//! stdout, and maps the outcome to the process exit code: 0 when every
//! patch passed or was skipped, 1 when any failed, 2 on usage errors.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use patchcheck_core::{CheckConfig, Checker, ScanMode};
use serde::Deserialize;

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
enum ModeArg {
    /// Report edit errors only.
    Full,
    /// Report the status of every edit.
    Complete,
}

impl From<ModeArg> for ScanMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Full => Self::Full,
            ModeArg::Complete => Self::Complete,
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "patchcheck",
    version,
    about = "Validate unified-diff patch files against a source tree",
    after_help = "Exit codes: 0 all patches passed or were skipped, \
                  1 at least one patch failed, 2 usage or configuration error."
)]
struct Cli {
    /// Source tree root the patches apply to.
    #[arg(short = 's', long = "source-dir")]
    source_dir: Option<PathBuf>,

    /// Directory containing the patch files.
    #[arg(short = 'p', long = "patch-dir")]
    patch_dir: Option<PathBuf>,

    /// Only check diffs whose file paths contain TARGET (repeatable).
    #[arg(short = 't', long = "target", value_name = "TARGET")]
    targets: Vec<String>,

    /// Scanning mode.
    #[arg(long = "mode", value_enum)]
    mode: Option<ModeArg>,

    /// Search whole files for mismatched landmark lines.
    #[arg(long = "find", action = ArgAction::SetTrue)]
    find: bool,

    /// JSON configuration file supplying defaults for the flags above.
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Patch files to check, relative to the patch directory.
    #[arg(value_name = "PATCH")]
    patches: Vec<PathBuf>,
}

/// On-disk configuration, merged under the command-line flags.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    sourcedir: Option<PathBuf>,
    #[serde(default)]
    patchdir: Option<PathBuf>,
    #[serde(default)]
    targets: Option<Vec<String>>,
    #[serde(default)]
    mode: Option<String>,
    #[serde(default)]
    find: Option<bool>,
    #[serde(default)]
    patches: Option<Vec<PathBuf>>,
}

fn main() {
    match try_main() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("patchcheck: {err:#}");
            std::process::exit(2);
        }
    }
}

fn try_main() -> Result<i32> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let file = load_file_config(cli.config.as_deref())?;

    let source_dir = cli.source_dir.or(file.sourcedir).unwrap_or_default();
    let patch_dir = cli.patch_dir.or(file.patchdir).unwrap_or_default();
    let mode = resolve_mode(cli.mode, file.mode.as_deref())?;
    let find = cli.find || file.find.unwrap_or(false);
    let targets = if cli.targets.is_empty() { file.targets.unwrap_or_default() } else { cli.targets };
    let patches =
        if cli.patches.is_empty() { file.patches.unwrap_or_default() } else { cli.patches };

    if patches.is_empty() {
        bail!("no patch files given (pass PATCH arguments or a config file with \"patches\")");
    }

    let mut config = CheckConfig::new(source_dir, patch_dir)?.with_mode(mode).with_find(find);
    if !targets.is_empty() {
        config = config.with_targets(targets);
    }

    let indent = config.indent_unit().to_string();
    let report = Checker::new(config).check_all(&patches);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in report.lines(&indent) {
        writeln!(out, "{line}")?;
    }

    Ok(i32::from(report.has_failures()))
}

fn load_file_config(path: Option<&std::path::Path>) -> Result<FileConfig> {
    let Some(path) = path else {
        return Ok(FileConfig::default());
    };
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    serde_json::from_str(&data)
        .with_context(|| format!("failed to parse config file {}", path.display()))
}

fn resolve_mode(flag: Option<ModeArg>, file: Option<&str>) -> Result<ScanMode> {
    if let Some(mode) = flag {
        return Ok(mode.into());
    }
    match file {
        None => Ok(ScanMode::Full),
        Some("full") => Ok(ScanMode::Full),
        Some("complete") => Ok(ScanMode::Complete),
        Some(other) => bail!("invalid mode in config file: {other:?} (expected full or complete)"),
    }
}
