//! Error types shared by the parser and the path iterator.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// What went wrong inside a glob pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    /// A `[` was never closed by `]`.
    UnterminatedClass,
    /// A character range was incomplete, reversed, or the class was empty.
    InvalidRange,
    /// A `{}` with no alternatives.
    EmptyAlternation,
    /// A `{` was never closed by `}`.
    UnterminatedAlternation,
}

impl fmt::Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            SyntaxErrorKind::UnterminatedClass => "unmatched '[' in glob pattern",
            SyntaxErrorKind::InvalidRange => "invalid character range in glob pattern",
            SyntaxErrorKind::EmptyAlternation => {
                "empty alternation in glob pattern (did you mean '\\{\\}'?)"
            }
            SyntaxErrorKind::UnterminatedAlternation => "unmatched '{' in glob pattern",
        };
        f.write_str(msg)
    }
}

/// Errors raised when compiling patterns or enumerating paths.
///
/// Matching itself is total and never fails; only pattern compilation and
/// (when requested) directory traversal produce errors.
#[derive(Debug, Error)]
pub enum GlobError {
    /// The pattern text is not a valid glob. `position` is a byte offset
    /// into the pattern.
    #[error("{kind} at offset {position}")]
    PatternSyntax {
        kind: SyntaxErrorKind,
        position: usize,
    },

    /// A directory could not be traversed. Only surfaced when
    /// `THROW_IF_ACCESS_DENIED` is set; the default is to skip.
    #[error("cannot traverse {}: {source}", path.display())]
    Traversal {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GlobError {
    pub(crate) fn syntax(kind: SyntaxErrorKind, position: usize) -> Self {
        GlobError::PatternSyntax { kind, position }
    }

    pub(crate) fn traversal(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GlobError::Traversal {
            path: path.into(),
            source,
        }
    }
}
