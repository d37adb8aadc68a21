//! The per-component filesystem producers driven by `PathIterator`.
//!
//! A glob-bearing path splits into a chain of part iterators, one per run
//! of components. Each variant owns at most one directory cursor;
//! `set_base_path` replaces the cursor, closing the previous one.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::GlobError;
use crate::glob::GlobMatcher;
use crate::glob_path::PathMatcher;

/// Traversal error policy, shared by all parts of one iterator.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct DirOptions {
    /// Surface access errors instead of skipping the directory.
    pub surface_errors: bool,
}

/// Strip a leading `./`, left behind when a cursor was opened on `.`.
fn strip_cur_dir(path: PathBuf) -> PathBuf {
    match path.strip_prefix(".") {
        Ok(stripped) if !stripped.as_os_str().is_empty() => stripped.to_path_buf(),
        _ => path,
    }
}

/// A run of non-glob components: yields `base/relative` once, if it exists.
#[derive(Debug)]
pub(crate) struct LiteralPart {
    relative: PathBuf,
    current: PathBuf,
    has_next: bool,
}

impl LiteralPart {
    /// `has_next` starts true only for the first part of a chain; every
    /// other literal part waits for `set_base_path` from the driver.
    pub fn new(relative: PathBuf, has_next: bool) -> Self {
        LiteralPart {
            current: relative.clone(),
            relative,
            has_next,
        }
    }

    fn set_base_path(&mut self, base: &Path) {
        self.current = base.join(&self.relative);
        self.has_next = true;
    }

    fn next(&mut self) -> bool {
        if !self.has_next {
            return false;
        }
        self.has_next = false;
        self.current.exists()
    }
}

/// A single glob component: yields matching direct children of the base.
#[derive(Debug)]
pub(crate) struct GlobPart {
    matcher: GlobMatcher,
    read: Option<fs::ReadDir>,
    base: PathBuf,
    current: PathBuf,
    options: DirOptions,
}

impl GlobPart {
    pub fn new(matcher: GlobMatcher, options: DirOptions) -> Self {
        GlobPart {
            matcher,
            read: None,
            base: PathBuf::new(),
            current: PathBuf::new(),
            options,
        }
    }

    fn set_base_path(&mut self, base: &Path) -> Result<(), GlobError> {
        self.base = base.to_path_buf();
        // Drop the previous cursor before opening the next one.
        self.read = None;
        match fs::read_dir(base) {
            Ok(read) => self.read = Some(read),
            Err(source) if self.options.surface_errors => {
                return Err(GlobError::traversal(base, source));
            }
            Err(source) => {
                tracing::debug!(base = %base.display(), error = %source, "skipping unreadable directory");
            }
        }
        Ok(())
    }

    fn next(&mut self) -> Result<bool, GlobError> {
        let Some(read) = self.read.as_mut() else {
            return Ok(false);
        };
        for entry in read {
            let entry = match entry {
                Ok(entry) => entry,
                Err(source) if self.options.surface_errors => {
                    return Err(GlobError::traversal(self.base.clone(), source));
                }
                Err(source) => {
                    tracing::debug!(base = %self.base.display(), error = %source, "skipping unreadable entry");
                    continue;
                }
            };
            let name = entry.file_name();
            // Matching is defined over UTF-8 names; others cannot match.
            let Some(name) = name.to_str() else { continue };
            if self.matcher.matches(name) {
                self.current = strip_cur_dir(entry.path());
                return Ok(true);
            }
        }
        self.read = None;
        Ok(false)
    }
}

/// A `**` and everything after it: yields matching descendants of the base.
pub(crate) struct RecursivePart {
    matcher: PathMatcher,
    walk: Option<walkdir::IntoIter>,
    base: PathBuf,
    current: PathBuf,
    options: DirOptions,
}

impl fmt::Debug for RecursivePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecursivePart")
            .field("matcher", &self.matcher)
            .field("walk", &self.walk.as_ref().map(|_| "..."))
            .field("base", &self.base)
            .field("current", &self.current)
            .field("options", &self.options)
            .finish()
    }
}

impl RecursivePart {
    pub fn new(matcher: PathMatcher, options: DirOptions) -> Self {
        RecursivePart {
            matcher,
            walk: None,
            base: PathBuf::new(),
            current: PathBuf::new(),
            options,
        }
    }

    fn set_base_path(&mut self, base: &Path) {
        self.base = base.to_path_buf();
        self.walk = Some(WalkDir::new(base).min_depth(1).into_iter());
    }

    fn next(&mut self) -> Result<bool, GlobError> {
        let Some(walk) = self.walk.as_mut() else {
            return Ok(false);
        };
        loop {
            let Some(entry) = walk.next() else {
                self.walk = None;
                return Ok(false);
            };
            let entry = match entry {
                Ok(entry) => entry,
                Err(source) if self.options.surface_errors => {
                    let path = source
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| self.base.clone());
                    return Err(GlobError::traversal(path, source.into()));
                }
                Err(source) => {
                    tracing::debug!(base = %self.base.display(), error = %source, "skipping unreadable directory");
                    continue;
                }
            };
            let path = strip_cur_dir(entry.into_path());
            if self.matcher.matches(&path) {
                self.current = path;
                return Ok(true);
            }
        }
    }
}

/// One stage of a split glob path. The three variants are a closed set;
/// the driver advances whichever it holds.
#[derive(Debug)]
pub(crate) enum PartIter {
    Literal(LiteralPart),
    Glob(GlobPart),
    Recursive(RecursivePart),
}

impl PartIter {
    /// Point this part at a new parent directory, resetting its cursor.
    pub fn set_base_path(&mut self, base: &Path) -> Result<(), GlobError> {
        match self {
            PartIter::Literal(part) => {
                part.set_base_path(base);
                Ok(())
            }
            PartIter::Glob(part) => part.set_base_path(base),
            PartIter::Recursive(part) => {
                part.set_base_path(base);
                Ok(())
            }
        }
    }

    /// Advance to the next emission. `Ok(false)` means exhausted.
    pub fn next(&mut self) -> Result<bool, GlobError> {
        match self {
            PartIter::Literal(part) => Ok(part.next()),
            PartIter::Glob(part) => part.next(),
            PartIter::Recursive(part) => part.next(),
        }
    }

    /// Advance until the emission is a directory.
    pub fn next_directory(&mut self) -> Result<bool, GlobError> {
        while self.next()? {
            if self.path().is_dir() {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// The most recent emission.
    pub fn path(&self) -> &Path {
        match self {
            PartIter::Literal(part) => &part.current,
            PartIter::Glob(part) => &part.current,
            PartIter::Recursive(part) => &part.current,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::GlobFlags;
    use std::fs::File;
    use tempfile::TempDir;

    fn touch(dir: &TempDir, name: &str) {
        File::create(dir.path().join(name)).unwrap();
    }

    #[test]
    fn strip_cur_dir_only_touches_dot_prefixes() {
        assert_eq!(strip_cur_dir(PathBuf::from("./a/b")), PathBuf::from("a/b"));
        assert_eq!(strip_cur_dir(PathBuf::from("a/b")), PathBuf::from("a/b"));
        assert_eq!(strip_cur_dir(PathBuf::from(".")), PathBuf::from("."));
        assert_eq!(strip_cur_dir(PathBuf::from("/a")), PathBuf::from("/a"));
    }

    #[test]
    fn literal_part_yields_once_if_present() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "a.txt");

        let mut part = PartIter::Literal(LiteralPart::new(PathBuf::from("a.txt"), false));
        part.set_base_path(dir.path()).unwrap();
        assert!(part.next().unwrap());
        assert_eq!(part.path(), dir.path().join("a.txt"));
        assert!(!part.next().unwrap());

        // A new base re-arms it.
        part.set_base_path(dir.path()).unwrap();
        assert!(part.next().unwrap());
    }

    #[test]
    fn literal_part_skips_missing_paths() {
        let dir = TempDir::new().unwrap();
        let mut part = PartIter::Literal(LiteralPart::new(PathBuf::from("missing"), false));
        part.set_base_path(dir.path()).unwrap();
        assert!(!part.next().unwrap());
    }

    #[test]
    fn glob_part_filters_directory_children() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "a.txt");
        touch(&dir, "b.txt");
        touch(&dir, "c.log");

        let matcher = GlobMatcher::with_flags("*.txt", GlobFlags::default()).unwrap();
        let mut part = PartIter::Glob(GlobPart::new(matcher, DirOptions::default()));
        part.set_base_path(dir.path()).unwrap();

        let mut seen = Vec::new();
        while part.next().unwrap() {
            seen.push(part.path().to_path_buf());
        }
        seen.sort();
        assert_eq!(seen, vec![dir.path().join("a.txt"), dir.path().join("b.txt")]);
    }

    #[test]
    fn glob_part_on_missing_base_is_empty_by_default() {
        let dir = TempDir::new().unwrap();
        let matcher = GlobMatcher::new("*").unwrap();
        let mut part = PartIter::Glob(GlobPart::new(matcher, DirOptions::default()));
        part.set_base_path(&dir.path().join("nope")).unwrap();
        assert!(!part.next().unwrap());
    }

    #[test]
    fn glob_part_surfaces_missing_base_when_asked() {
        let dir = TempDir::new().unwrap();
        let matcher = GlobMatcher::new("*").unwrap();
        let mut part = PartIter::Glob(GlobPart::new(
            matcher,
            DirOptions {
                surface_errors: true,
            },
        ));
        let result = part.set_base_path(&dir.path().join("nope"));
        assert!(matches!(result, Err(GlobError::Traversal { .. })));
    }

    #[test]
    fn recursive_part_walks_descendants() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        touch(&dir, "top.txt");
        File::create(dir.path().join("sub/deep.txt")).unwrap();

        let matcher =
            PathMatcher::compile(Path::new("**/*.txt"), true, GlobFlags::empty()).unwrap();
        let mut part = PartIter::Recursive(RecursivePart::new(matcher, DirOptions::default()));
        part.set_base_path(dir.path()).unwrap();

        let mut seen = Vec::new();
        while part.next().unwrap() {
            seen.push(part.path().to_path_buf());
        }
        seen.sort();
        assert_eq!(
            seen,
            vec![dir.path().join("sub/deep.txt"), dir.path().join("top.txt")]
        );
    }

    #[test]
    fn next_directory_skips_files() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        touch(&dir, "a.txt");

        let matcher = GlobMatcher::with_flags("*", GlobFlags::default()).unwrap();
        let mut part = PartIter::Glob(GlobPart::new(matcher, DirOptions::default()));
        part.set_base_path(dir.path()).unwrap();

        assert!(part.next_directory().unwrap());
        assert_eq!(part.path(), dir.path().join("sub"));
        assert!(!part.next_directory().unwrap());
    }
}
