//! Hunk parsing: one `@@` header plus the edit lines that follow.

use crate::error::ParseError;
use crate::text;

/// The operation requested by a single edit line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditOp {
    /// `+` — line inserted by the patch.
    Add,
    /// `-` — line removed by the patch.
    Delete,
    /// Leading space (or anything else) — context carried for merging.
    Context,
}

/// One line within a hunk, tagged by operation.
///
/// The operation prefix is stripped from `text`. Raw edit lines sometimes
/// arrive as empty strings; those parse as empty context.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edit {
    /// The requested operation.
    pub op: EditOp,
    /// Line content with the prefix character removed.
    pub text: String,
}

impl Edit {
    fn from_line(line: &str) -> Self {
        let mut chars = line.chars();
        let op = match chars.next() {
            Some('+') => EditOp::Add,
            Some('-') => EditOp::Delete,
            _ => EditOp::Context,
        };
        let text = if line.is_empty() { String::new() } else { chars.as_str().to_string() };
        Self { op, text }
    }
}

/// One contiguous edit region within a diff.
///
/// ```
/// # use patchcheck_core::Hunk;
/// let lines = vec![
///     "@@ -10,3 +10,4 @@ static int foo(void)".to_string(),
///     " context".to_string(),
///     "-old".to_string(),
///     "+new".to_string(),
/// ];
/// let hunk = Hunk::parse(&lines).unwrap();
/// assert_eq!(hunk.old_start, 10);
/// assert_eq!(hunk.new_count, 4);
/// assert_eq!(hunk.note, "static");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hunk {
    /// The raw header line.
    pub spec: String,
    /// 1-based first line in the old file.
    pub old_start: usize,
    /// Line count in the old file (1 when the header omits it).
    pub old_count: usize,
    /// 1-based first line in the new file.
    pub new_start: usize,
    /// Line count in the new file (1 when the header omits it).
    pub new_count: usize,
    /// First token after the second `@@` marker, or empty.
    pub note: String,
    /// The edit lines in order.
    pub edits: Vec<Edit>,
}

impl Hunk {
    /// Parses a hunk section: the `@@` header line followed by its edits.
    ///
    /// Trailing blank lines (which sometimes separate a hunk from the
    /// next diff section) are dropped before parsing.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::HunkHeader`] when the header line does not
    /// match `@@ -start[,count] +start[,count] @@ [note]`.
    pub fn parse(lines: &[String]) -> Result<Self, ParseError> {
        let mut end = lines.len();
        while end > 0 && lines[end - 1].trim().is_empty() {
            end -= 1;
        }
        let Some((header, edits)) = lines[..end].split_first() else {
            return Err(ParseError::EmptySection);
        };

        let (old_start, old_count, new_start, new_count, note) = parse_header(header)?;
        Ok(Self {
            spec: header.clone(),
            old_start,
            old_count,
            new_start,
            new_count,
            note,
            edits: edits.iter().map(|line| Edit::from_line(line)).collect(),
        })
    }
}

type HeaderFields = (usize, usize, usize, usize, String);

fn parse_header(line: &str) -> Result<HeaderFields, ParseError> {
    let bad = || ParseError::HunkHeader { line: line.to_string() };

    let norm = text::normalize(line);
    let mut fields = norm.splitn(4, ' ');
    let (Some("@@"), Some(old), Some(new), Some(tail)) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(bad());
    };

    let old = old.strip_prefix('-').ok_or_else(bad)?;
    let new = new.strip_prefix('+').ok_or_else(bad)?;
    let (old_start, old_count) = parse_range(old).ok_or_else(bad)?;
    let (new_start, new_count) = parse_range(new).ok_or_else(bad)?;

    if !tail.starts_with("@@") {
        return Err(bad());
    }
    // The note is the first token after the closing marker, typically the
    // nearest enclosing declaration copied in by diff.
    let note = tail.split(' ').nth(1).unwrap_or("").to_string();

    Ok((old_start, old_count, new_start, new_count, note))
}

fn parse_range(field: &str) -> Option<(usize, usize)> {
    match field.split_once(',') {
        Some((start, count)) => Some((start.parse().ok()?, count.parse().ok()?)),
        None => Some((field.parse().ok()?, 1)),
    }
}
