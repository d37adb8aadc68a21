//! Lazy enumeration of filesystem paths matching a glob-bearing path.
//!
//! The path splits into part iterators (see `walker.rs`); the driver runs
//! them as a cartesian product. The last part produces candidate emissions;
//! whenever it runs dry, the rightmost earlier part that still has another
//! directory advances, and everything to its right is re-based and
//! restarted.

use std::mem;
use std::path::{Component, Path, PathBuf};

use crate::error::GlobError;
use crate::flags::{GlobFlags, PathIteratorFlags};
use crate::glob::{is_glob_pattern, GlobMatcher};
use crate::glob_path::PathMatcher;
use crate::walker::{DirOptions, GlobPart, LiteralPart, PartIter, RecursivePart};

/// Split a glob path into the ordered part-iterator chain, root to leaf.
///
/// Plain components accumulate into literal parts. A glob component becomes
/// a single-level scan. A `**` component swallows the rest of the path into
/// one recursive scan and ends the chain.
pub(crate) fn split_glob_path(
    pattern: &Path,
    flags: PathIteratorFlags,
) -> Result<Vec<PartIter>, GlobError> {
    let glob_flags = flags.glob_flags();
    let options = DirOptions {
        surface_errors: flags.contains(PathIteratorFlags::THROW_IF_ACCESS_DENIED),
    };
    let scan_literals = flags.contains(PathIteratorFlags::CASE_INSENSITIVE_PATHS);

    let mut parts: Vec<PartIter> = Vec::new();
    let mut plain = PathBuf::new();

    fn flush_plain(parts: &mut Vec<PartIter>, plain: &mut PathBuf) {
        if !plain.as_os_str().is_empty() {
            let first = parts.is_empty();
            parts.push(PartIter::Literal(LiteralPart::new(mem::take(plain), first)));
        }
    }

    let mut components = pattern.components();
    while let Some(component) = components.next() {
        let name = component.as_os_str().to_string_lossy();
        if name == "**" {
            flush_plain(&mut parts, &mut plain);
            let mut remainder = PathBuf::from("**");
            for rest in components.by_ref() {
                remainder.push(rest);
            }
            let matcher = PathMatcher::compile(&remainder, !scan_literals, glob_flags)?;
            parts.push(PartIter::Recursive(RecursivePart::new(matcher, options)));
            break;
        }

        let is_normal = matches!(component, Component::Normal(_));
        if is_normal && is_glob_pattern(&name, glob_flags) {
            flush_plain(&mut parts, &mut plain);
            let matcher = GlobMatcher::with_flags(&name, glob_flags)?;
            parts.push(PartIter::Glob(GlobPart::new(matcher, options)));
        } else if is_normal && scan_literals {
            // Compare this literal per directory entry, with folding,
            // instead of trusting the filesystem's own name lookup.
            flush_plain(&mut parts, &mut plain);
            let matcher =
                GlobMatcher::with_flags(&name, glob_flags & !GlobFlags::CASE_SENSITIVE)?;
            parts.push(PartIter::Glob(GlobPart::new(matcher, options)));
        } else {
            plain.push(component);
        }
    }
    flush_plain(&mut parts, &mut plain);

    // A relative chain that opens with a directory scan starts from the
    // working directory. Literal first parts keep an empty base so their
    // emissions stay prefix-free.
    if let Some(first) = parts.first_mut() {
        if !pattern.has_root() && !matches!(first, PartIter::Literal(_)) {
            first.set_base_path(Path::new("."))?;
        }
    }
    Ok(parts)
}

/// A lazy stream of filesystem paths matching a glob-bearing path.
///
/// # Examples
/// ```no_run
/// use pathglob::PathIterator;
///
/// let mut paths = PathIterator::new("src/**/*.rs")?;
/// while paths.next()? {
///     println!("{}", paths.path().display());
/// }
/// # Ok::<(), pathglob::GlobError>(())
/// ```
///
/// Or through the iterator adapter:
/// ```no_run
/// use pathglob::PathIterator;
///
/// for path in PathIterator::new("a/*.txt")? {
///     println!("{}", path?.display());
/// }
/// # Ok::<(), pathglob::GlobError>(())
/// ```
#[derive(Debug)]
pub struct PathIterator {
    parts: Vec<PartIter>,
    flags: PathIteratorFlags,
}

impl PathIterator {
    /// Build an iterator with default flags: files and directories are
    /// yielded, glob components match case-insensitively, and unreadable
    /// directories are skipped.
    pub fn new(glob_path: impl AsRef<Path>) -> Result<Self, GlobError> {
        Self::with_flags(glob_path, PathIteratorFlags::empty())
    }

    /// Build an iterator with explicit flags.
    pub fn with_flags(
        glob_path: impl AsRef<Path>,
        flags: PathIteratorFlags,
    ) -> Result<Self, GlobError> {
        Ok(PathIterator {
            parts: split_glob_path(glob_path.as_ref(), flags)?,
            flags,
        })
    }

    /// Advance to the next matching path. Returns `Ok(false)` when the
    /// stream is exhausted; errors are only produced under
    /// `THROW_IF_ACCESS_DENIED`.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<bool, GlobError> {
        if self.parts.is_empty() {
            return Ok(false);
        }
        let last = self.parts.len() - 1;
        if self.advance_last()? {
            return Ok(true);
        }

        let mut pivot = last;
        loop {
            // Rightmost earlier part with another directory to offer.
            loop {
                if pivot == 0 {
                    return Ok(false);
                }
                pivot -= 1;
                if self.parts[pivot].next_directory()? {
                    break;
                }
            }

            // Re-base and restart everything to its right.
            let mut index = pivot + 1;
            while index < last {
                let base = self.parts[index - 1].path().to_path_buf();
                self.parts[index].set_base_path(&base)?;
                if !self.parts[index].next_directory()? {
                    break;
                }
                index += 1;
            }

            if index == last {
                let base = self.parts[index - 1].path().to_path_buf();
                self.parts[last].set_base_path(&base)?;
                if self.advance_last()? {
                    return Ok(true);
                }
            }
            pivot = index;
        }
    }

    /// The path most recently produced by `next()`.
    pub fn path(&self) -> &Path {
        self.parts
            .last()
            .map(PartIter::path)
            .unwrap_or_else(|| Path::new(""))
    }

    /// Advance the final part until an emission passes the file-kind filter.
    fn advance_last(&mut self) -> Result<bool, GlobError> {
        let last = self.parts.len() - 1;
        while self.parts[last].next()? {
            if self.accepts_kind(self.parts[last].path()) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn accepts_kind(&self, path: &Path) -> bool {
        if self.flags.contains(PathIteratorFlags::NO_FILES) && path.is_file() {
            return false;
        }
        if self.flags.contains(PathIteratorFlags::NO_DIRECTORIES) && path.is_dir() {
            return false;
        }
        true
    }
}

impl IntoIterator for PathIterator {
    type Item = Result<PathBuf, GlobError>;
    type IntoIter = Paths;

    fn into_iter(self) -> Paths {
        Paths {
            inner: self,
            done: false,
        }
    }
}

/// Owning iterator adapter over [`PathIterator`]. Fuses after the first
/// error or exhaustion.
#[derive(Debug)]
pub struct Paths {
    inner: PathIterator,
    done: bool,
}

impl Iterator for Paths {
    type Item = Result<PathBuf, GlobError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.inner.next() {
            Ok(true) => Some(Ok(self.inner.path().to_path_buf())),
            Ok(false) => {
                self.done = true;
                None
            }
            Err(error) => {
                self.done = true;
                Some(Err(error))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(pattern: &str, flags: PathIteratorFlags) -> Vec<PartIter> {
        split_glob_path(Path::new(pattern), flags).unwrap()
    }

    fn shape(parts: &[PartIter]) -> Vec<&'static str> {
        parts
            .iter()
            .map(|part| match part {
                PartIter::Literal(_) => "literal",
                PartIter::Glob(_) => "glob",
                PartIter::Recursive(_) => "recursive",
            })
            .collect()
    }

    #[test]
    fn plain_path_is_one_literal() {
        let parts = split("a/b/c", PathIteratorFlags::empty());
        assert_eq!(shape(&parts), vec!["literal"]);
        assert_eq!(parts[0].path(), Path::new("a/b/c"));
    }

    #[test]
    fn glob_component_splits_the_chain() {
        let parts = split("a/b/*.txt/c", PathIteratorFlags::empty());
        assert_eq!(shape(&parts), vec!["literal", "glob", "literal"]);
        assert_eq!(parts[0].path(), Path::new("a/b"));
    }

    #[test]
    fn double_star_swallows_the_remainder() {
        let parts = split("a/**/b/*.txt", PathIteratorFlags::empty());
        assert_eq!(shape(&parts), vec!["literal", "recursive"]);
    }

    #[test]
    fn leading_glob_has_no_literal_prefix() {
        let parts = split("*.txt", PathIteratorFlags::empty());
        assert_eq!(shape(&parts), vec!["glob"]);
    }

    #[test]
    fn rooted_pattern_keeps_root_in_the_literal() {
        let parts = split("/abc/*.txt", PathIteratorFlags::empty());
        assert_eq!(shape(&parts), vec!["literal", "glob"]);
        assert_eq!(parts[0].path(), Path::new("/abc"));
    }

    #[test]
    fn case_insensitive_paths_scan_every_component() {
        let parts = split("a/b/c.txt", PathIteratorFlags::CASE_INSENSITIVE_PATHS);
        assert_eq!(shape(&parts), vec!["glob", "glob", "glob"]);

        // The root stays literal.
        let parts = split("/a/b", PathIteratorFlags::CASE_INSENSITIVE_PATHS);
        assert_eq!(shape(&parts), vec!["literal", "glob", "glob"]);
        assert_eq!(parts[0].path(), Path::new("/"));
    }

    #[test]
    fn empty_pattern_produces_no_parts() {
        let parts = split("", PathIteratorFlags::empty());
        assert!(parts.is_empty());

        let mut iterator = PathIterator::new("").unwrap();
        assert!(!iterator.next().unwrap());
    }

    #[test]
    fn pattern_errors_surface_at_construction() {
        assert!(PathIterator::new("a/[b-/c.txt").is_err());
        assert!(PathIterator::new("a/{b,c/d.txt").is_err());
    }
}
