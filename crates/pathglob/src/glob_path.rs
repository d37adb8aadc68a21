//! Path-aware pattern matching with `**` support.
//!
//! Extends single-component matching in `glob.rs` to patterns that span
//! directory boundaries:
//!
//! - `**/*.rs` matches `foo.rs`, `src/foo.rs`, `a/b/c/foo.rs`
//! - `a/**/z` matches `a/z`, `a/b/z`, `a/b/c/z`
//! - `/abc/*.txt` matches only rooted paths
//!
//! The pattern is stored leaf-first: matching walks the candidate from its
//! filename up through its ancestors, so a `**` can try consuming any
//! number of ancestor components without re-scanning the leaf.

use std::borrow::Cow;
use std::path::{Component, Path};

use crate::error::GlobError;
use crate::flags::GlobFlags;
use crate::fold;
use crate::glob::{is_glob_pattern, GlobMatcher};

/// One component of a path pattern, leaf-first.
#[derive(Debug, Clone)]
enum PathElement {
    /// The root (or drive prefix); must match the candidate's root exactly.
    Root(String),
    /// A verbatim component name.
    Literal(String),
    /// The `**` wildcard: zero or more whole components.
    AnyPath,
    /// A component with glob metacharacters.
    Glob(GlobMatcher),
}

/// One component of a candidate path, leaf-first.
struct Candidate<'a> {
    name: Cow<'a, str>,
    is_root: bool,
}

/// A compiled multi-component path pattern.
///
/// # Examples
/// ```
/// use pathglob::PathMatcher;
///
/// let matcher = PathMatcher::new("**/cde/*.txt").unwrap();
/// assert!(matcher.matches("abc/cde/a.txt"));
/// assert!(matcher.matches("/abc/cde/a.txt"));
/// assert!(!matcher.matches("abc/cde/deeper/a.txt"));
/// ```
#[derive(Debug, Clone)]
pub struct PathMatcher {
    /// Pattern components ordered leaf to root.
    elements: Vec<PathElement>,
    literal_case_sensitive: bool,
}

impl PathMatcher {
    /// Compile a path pattern with default flags (case-sensitive).
    pub fn new(pattern: impl AsRef<Path>) -> Result<Self, GlobError> {
        Self::with_flags(pattern, GlobFlags::default())
    }

    /// Compile a path pattern with explicit flags. The case policy applies
    /// to literal components and glob components alike.
    pub fn with_flags(pattern: impl AsRef<Path>, flags: GlobFlags) -> Result<Self, GlobError> {
        Self::compile(
            pattern.as_ref(),
            flags.contains(GlobFlags::CASE_SENSITIVE),
            flags,
        )
    }

    /// Compile with separate case policies for literal and glob components.
    /// `PathIterator` uses this to honour `CASE_INSENSITIVE_PATHS` and
    /// `CASE_SENSITIVE_GLOBS` independently.
    pub(crate) fn compile(
        pattern: &Path,
        literal_case_sensitive: bool,
        glob_flags: GlobFlags,
    ) -> Result<Self, GlobError> {
        let mut elements = Vec::new();
        for component in pattern.components().rev() {
            match component {
                Component::CurDir => {}
                Component::RootDir | Component::Prefix(_) => {
                    elements.push(PathElement::Root(
                        component.as_os_str().to_string_lossy().into_owned(),
                    ));
                }
                Component::ParentDir => {
                    elements.push(PathElement::Literal("..".to_string()));
                }
                Component::Normal(name) => {
                    let name = name.to_string_lossy();
                    if name == "**" {
                        elements.push(PathElement::AnyPath);
                    } else if is_glob_pattern(&name, glob_flags) {
                        elements.push(PathElement::Glob(GlobMatcher::with_flags(
                            &name, glob_flags,
                        )?));
                    } else {
                        elements.push(PathElement::Literal(name.into_owned()));
                    }
                }
            }
        }
        Ok(PathMatcher {
            elements,
            literal_case_sensitive,
        })
    }

    /// Does the candidate path match the pattern?
    pub fn matches(&self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        let mut candidate: Vec<Candidate<'_>> = Vec::new();
        for component in path.components().rev() {
            match component {
                Component::CurDir => {}
                Component::RootDir | Component::Prefix(_) => candidate.push(Candidate {
                    name: component.as_os_str().to_string_lossy(),
                    is_root: true,
                }),
                _ => {
                    // Matching is defined over UTF-8 names; others cannot match.
                    let Some(name) = component.as_os_str().to_str() else {
                        return false;
                    };
                    candidate.push(Candidate {
                        name: Cow::Borrowed(name),
                        is_root: false,
                    });
                }
            }
        }
        self.match_elements(&self.elements, &candidate, 0)
    }

    /// Match `elements` against the candidate starting at component `idx`,
    /// both leaf-first.
    fn match_elements(
        &self,
        elements: &[PathElement],
        candidate: &[Candidate<'_>],
        mut idx: usize,
    ) -> bool {
        for (i, element) in elements.iter().enumerate() {
            if let PathElement::AnyPath = element {
                return self.search(&elements[i + 1..], candidate, idx);
            }
            let Some(component) = candidate.get(idx) else {
                // Candidate exhausted with pattern components left over.
                return false;
            };
            let matched = match element {
                PathElement::Root(root) => component.is_root && *root == component.name,
                PathElement::Literal(literal) => {
                    !component.is_root && self.literal_eq(literal, &component.name)
                }
                PathElement::Glob(matcher) => {
                    !component.is_root && matcher.matches(&component.name)
                }
                PathElement::AnyPath => unreachable!("handled above"),
            };
            if !matched {
                return false;
            }
            if component.is_root {
                // The root has no parent; it must be the last thing asked for.
                return i == elements.len() - 1;
            }
            idx += 1;
        }
        idx >= candidate.len()
    }

    /// The `**` backtracking search: try the remaining pattern against the
    /// current position, then against each ancestor in turn.
    fn search(&self, elements: &[PathElement], candidate: &[Candidate<'_>], mut idx: usize) -> bool {
        if elements.is_empty() {
            return true;
        }
        loop {
            if self.match_elements(elements, candidate, idx) {
                return true;
            }
            match candidate.get(idx) {
                None => return false,
                Some(component) if component.is_root => return false,
                Some(_) => idx += 1,
            }
        }
    }

    fn literal_eq(&self, a: &str, b: &str) -> bool {
        if self.literal_case_sensitive {
            a == b
        } else {
            fold::eq_str_folded(a, b)
        }
    }
}
