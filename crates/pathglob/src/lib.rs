//! pathglob: Glob matching and lazy filesystem path enumeration.
//!
//! Provides:
//! - **GlobMatcher**: Shell-style glob matching for one path component,
//!   with character sets, nestable brace alternations, and escapes
//! - **PathMatcher**: Path-aware matching with `**` (globstar) support
//! - **PathIterator**: Lazy enumeration of the paths on disk that satisfy
//!   a glob-bearing path expression
//! - **is_glob_pattern**: Detect whether a string holds unescaped glob
//!   metacharacters
//!
//! Matching is Unicode-aware: `?` and character sets count codepoints, not
//! bytes, and the case-insensitive modes compare under simple case folding.
//!
//! ```
//! use pathglob::{GlobMatcher, PathMatcher};
//!
//! let glob = GlobMatcher::new("*.{png,jp{e,}g}").unwrap();
//! assert!(glob.matches("photo.jpeg"));
//!
//! let path = PathMatcher::new("**/cde/*.txt").unwrap();
//! assert!(path.matches("abc/cde/a.txt"));
//! ```
//!
//! Enumeration is pull-based and single-threaded: `next()` blocks on
//! directory I/O and nothing else. Distinct iterators are independent.

mod error;
mod flags;
mod fold;
mod glob;
mod glob_path;
mod parse;
mod path_iter;
mod pattern;
mod walker;

pub use error::{GlobError, SyntaxErrorKind};
pub use flags::{GlobFlags, PathIteratorFlags};
pub use glob::{is_glob_pattern, GlobMatcher};
pub use glob_path::PathMatcher;
pub use path_iter::{PathIterator, Paths};
