//! Byte-preserving line reading and whitespace helpers.
//!
//! Kernel source and patch corpora predate UTF-8 and routinely carry
//! legacy 8-bit bytes in author names and comments. Files are therefore
//! decoded as Latin-1 (every byte maps to the code point of the same
//! value), which round-trips arbitrary byte content through `String`
//! without loss.

use std::fs;
use std::io;
use std::path::Path;

/// Reads a file as Latin-1 text and returns its lines.
///
/// Trailing `\n` (and a preceding `\r`, if any) are stripped from each
/// line; other whitespace is preserved.
///
/// # Errors
///
/// Returns the underlying [`io::Error`] when the file cannot be read.
pub fn read_lines(path: &Path) -> io::Result<Vec<String>> {
    let bytes = fs::read(path)?;
    let text: String = bytes.iter().map(|&b| char::from(b)).collect();
    Ok(split_lines(&text))
}

/// Splits text into lines, stripping `\n` and `\r\n` terminators.
#[must_use]
pub fn split_lines(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect();
    if lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    lines
}

/// Normalizes a line for comparison: strips leading and trailing
/// whitespace, converts tabs to spaces, and collapses internal runs of
/// spaces into single spaces.
///
/// ```
/// assert_eq!(patchcheck_core::text::normalize("\tint  a =\t1;  "), "int a = 1;");
/// ```
#[must_use]
pub fn normalize(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut pending_space = false;
    for ch in line.trim().chars() {
        if ch == ' ' || ch == '\t' {
            pending_space = true;
        } else {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(ch);
        }
    }
    out
}

/// Splits a line into whitespace-delimited words, dropping empties.
#[must_use]
pub fn words(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

/// Splits words further on `_` and `-` boundaries.
///
/// Only the word-count heuristic of the landmark classifier consumes
/// sub-words; file-type rules match against the original tokens.
#[must_use]
pub fn subwords<'a>(words: &[&'a str]) -> Vec<&'a str> {
    words
        .iter()
        .flat_map(|word| word.split(['_', '-']))
        .filter(|part| !part.is_empty())
        .collect()
}

/// Splits `lines` at the first line starting with `marker` (leading
/// whitespace ignored, as in [`split_at`]), returning the part before it
/// and, when found, the part from the marker onward.
pub(crate) fn partition_at<'a>(
    lines: &'a [String],
    marker: &str,
) -> (&'a [String], Option<&'a [String]>) {
    match lines.iter().position(|line| line.trim_start().starts_with(marker)) {
        Some(index) => (&lines[..index], Some(&lines[index..])),
        None => (lines, None),
    }
}

/// Splits `lines` at the last line starting with `marker`, returning the
/// part before it when found, and the part from the marker onward.
pub(crate) fn rpartition_at<'a>(
    lines: &'a [String],
    marker: &str,
) -> (Option<&'a [String]>, &'a [String]) {
    match lines.iter().rposition(|line| line.starts_with(marker)) {
        Some(index) => (Some(&lines[..index]), &lines[index..]),
        None => (None, lines),
    }
}

/// Splits `lines` into sections, each starting at a line with `marker`.
/// A leading run of non-matching lines forms its own section.
pub(crate) fn split_at<'a>(lines: &'a [String], marker: &str) -> Vec<&'a [String]> {
    let starts: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.trim_start().starts_with(marker))
        .map(|(index, _)| index)
        .collect();
    if starts.is_empty() {
        return vec![lines];
    }

    let mut sections = Vec::with_capacity(starts.len() + 1);
    if starts[0] > 0 {
        sections.push(&lines[..starts[0]]);
    }
    for pair in starts.windows(2) {
        sections.push(&lines[pair[0]..pair[1]]);
    }
    sections.push(&lines[starts[starts.len() - 1]..]);
    sections
}
