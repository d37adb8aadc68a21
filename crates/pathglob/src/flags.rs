//! Bitmask options for pattern compilation and path iteration.

use bitflags::bitflags;

bitflags! {
    /// Options for `GlobMatcher` and `PathMatcher` compilation.
    ///
    /// # Example
    ///
    /// ```
    /// use pathglob::{GlobFlags, GlobMatcher};
    ///
    /// let matcher = GlobMatcher::with_flags("*.[ch]", GlobFlags::NO_SETS).unwrap();
    /// assert!(matcher.matches("x.[ch]"));
    /// assert!(!matcher.matches("x.c"));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct GlobFlags: u32 {
        /// Compare codepoints exactly instead of with simple case folding.
        const CASE_SENSITIVE = 1;
        /// Treat `{` and `}` as ordinary characters.
        const NO_BRACES = 1 << 1;
        /// Treat `[` and `]` as ordinary characters.
        const NO_SETS = 1 << 2;
    }
}

impl Default for GlobFlags {
    /// A standalone matcher compares exactly by default; case-insensitive
    /// matching is opt-out only inside a `PathIterator`.
    fn default() -> Self {
        GlobFlags::CASE_SENSITIVE
    }
}

bitflags! {
    /// Options for `PathIterator`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PathIteratorFlags: u32 {
        /// Compile glob components case-sensitively. Without this flag glob
        /// components match with simple case folding.
        const CASE_SENSITIVE_GLOBS = 1;
        /// Compare literal path components case-insensitively too. Every
        /// non-rooted component is then matched per directory entry instead
        /// of relying on the filesystem's own lookup.
        const CASE_INSENSITIVE_PATHS = 1 << 1;
        /// Treat `{` and `}` as ordinary characters.
        const NO_BRACES = 1 << 2;
        /// Treat `[` and `]` as ordinary characters.
        const NO_SETS = 1 << 3;
        /// Do not yield regular files.
        const NO_FILES = 1 << 4;
        /// Do not yield directories.
        const NO_DIRECTORIES = 1 << 5;
        /// Surface access errors from `next()` instead of skipping the
        /// offending directory.
        const THROW_IF_ACCESS_DENIED = 1 << 6;
    }
}

impl PathIteratorFlags {
    /// The `GlobFlags` used when compiling this iterator's glob components.
    pub(crate) fn glob_flags(self) -> GlobFlags {
        let mut flags = GlobFlags::empty();
        if self.contains(PathIteratorFlags::CASE_SENSITIVE_GLOBS) {
            flags |= GlobFlags::CASE_SENSITIVE;
        }
        if self.contains(PathIteratorFlags::NO_BRACES) {
            flags |= GlobFlags::NO_BRACES;
        }
        if self.contains(PathIteratorFlags::NO_SETS) {
            flags |= GlobFlags::NO_SETS;
        }
        flags
    }
}
