use thiserror::Error;

/// Errors raised while parsing patch text into the structured model.
///
/// Parse failures are local to the patch that produced them: a batch
/// validation run reports the failure and moves on to the next patch.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// A hunk header did not match `@@ -start[,count] +start[,count] @@`.
    #[error("malformed hunk header: {line}")]
    HunkHeader {
        /// The offending header line.
        line: String,
    },
    /// A `diff` line could not be split into old and new paths.
    #[error("malformed diff line: {line}")]
    DiffLine {
        /// The offending diff line.
        line: String,
    },
    /// A diff section contained no lines.
    #[error("empty diff section")]
    EmptySection,
}

/// Errors raised while configuring or running the [`Checker`](crate::Checker).
#[derive(Debug, Error)]
pub enum CheckError {
    /// Invalid configuration; aborts the whole run.
    #[error("invalid {name} parameter: {value}")]
    Parameter {
        /// Name of the offending parameter.
        name: &'static str,
        /// The rejected value.
        value: String,
    },
    /// A referenced file does not exist.
    #[error("not found: {path}")]
    NotFound {
        /// The missing path.
        path: String,
    },
    /// The patch could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// An underlying read failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
