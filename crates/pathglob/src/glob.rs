//! Glob matching for single path components.
//!
//! Implements shell-style glob patterns:
//! - `*` matches zero or more codepoints
//! - `?` matches exactly one codepoint
//! - `[abc]` matches any codepoint in the set
//! - `[a-z]` matches any codepoint in the range
//! - `[^abc]` matches any codepoint NOT in the set
//! - `{a,b,c}` matches any of the alternatives, nestable
//! - `\x` matches a literal `x`
//!
//! The compiled pattern keeps a star-free tail that is matched backwards
//! from the end of the input first; the greedy `*` search then only has to
//! cover the head. That keeps common patterns like `*.tar.gz` linear.

use std::fmt;

use crate::error::GlobError;
use crate::flags::GlobFlags;
use crate::fold;
use crate::parse::{self, ParserOptions};
use crate::pattern::{Element, Pattern};

/// Check if a string contains an unescaped glob metacharacter enabled by
/// `flags`.
///
/// ```
/// use pathglob::{is_glob_pattern, GlobFlags};
///
/// assert!(is_glob_pattern("*.rs", GlobFlags::default()));
/// assert!(is_glob_pattern("src/[ab].txt", GlobFlags::default()));
/// assert!(!is_glob_pattern("src/main.rs", GlobFlags::default()));
/// assert!(!is_glob_pattern("a\\*", GlobFlags::default()));
/// ```
pub fn is_glob_pattern(text: &str, flags: GlobFlags) -> bool {
    parse::is_glob_pattern(text, flags)
}

/// A compiled glob pattern for a single path component.
///
/// # Examples
/// ```
/// use pathglob::GlobMatcher;
///
/// let matcher = GlobMatcher::new("*.{rs,go}").unwrap();
/// assert!(matcher.matches("main.rs"));
/// assert!(matcher.matches("server.go"));
/// assert!(!matcher.matches("style.css"));
/// ```
#[derive(Debug, Clone)]
pub struct GlobMatcher {
    pattern: Pattern,
    case_sensitive: bool,
}

impl GlobMatcher {
    /// Compile a pattern with default flags (case-sensitive, braces and
    /// sets enabled).
    pub fn new(pattern: &str) -> Result<Self, GlobError> {
        Self::with_flags(pattern, GlobFlags::default())
    }

    /// Compile a pattern with explicit flags.
    pub fn with_flags(pattern: &str, flags: GlobFlags) -> Result<Self, GlobError> {
        Ok(GlobMatcher {
            case_sensitive: flags.contains(GlobFlags::CASE_SENSITIVE),
            pattern: parse::parse(pattern, ParserOptions::from_flags(flags))?,
        })
    }

    /// Does the whole input match the pattern?
    pub fn matches(&self, input: &str) -> bool {
        let split = self.pattern.elements.len() - self.pattern.tail_length;
        let (head, tail) = self.pattern.elements.split_at(split);
        let mut view = input;
        match_end(tail, &mut view, self.case_sensitive)
            && match_fwd(head, &mut view, self.case_sensitive, false)
    }
}

impl fmt::Display for GlobMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pattern)
    }
}

/// Match one element against the front of the view and consume what it
/// matched. On a set mismatch the probed codepoint stays consumed; callers
/// restore the view themselves on failure.
fn starts_with_element(view: &mut &str, element: &Element, case_sensitive: bool) -> bool {
    match element {
        Element::Literal(text) => {
            let stripped = if case_sensitive {
                view.strip_prefix(text.as_str())
            } else {
                fold::strip_prefix_folded(*view, text)
            };
            match stripped {
                Some(rest) => {
                    *view = rest;
                    true
                }
                None => false,
            }
        }
        Element::Set(set) => match fold::pop_front_codepoint(view) {
            Some(ch) => set.contains(ch, case_sensitive),
            None => false,
        },
        Element::Alternation(branches) => branches
            .iter()
            .any(|branch| match_fwd(&branch.elements, view, case_sensitive, true)),
        Element::Qmark(length) => {
            for _ in 0..*length {
                if fold::pop_front_codepoint(view).is_none() {
                    return false;
                }
            }
            true
        }
        Element::Star => {
            *view = &view[view.len()..];
            true
        }
        Element::Empty => true,
    }
}

/// Match one element against the back of the view. Stars never appear in
/// the anchored tail, so they fail here.
fn ends_with_element(view: &mut &str, element: &Element, case_sensitive: bool) -> bool {
    match element {
        Element::Literal(text) => {
            let stripped = if case_sensitive {
                view.strip_suffix(text.as_str())
            } else {
                fold::strip_suffix_folded(*view, text)
            };
            match stripped {
                Some(rest) => {
                    *view = rest;
                    true
                }
                None => false,
            }
        }
        Element::Set(set) => match fold::pop_back_codepoint(view) {
            Some(ch) => set.contains(ch, case_sensitive),
            None => false,
        },
        Element::Alternation(branches) => branches
            .iter()
            .any(|branch| match_end(&branch.elements, view, case_sensitive)),
        Element::Qmark(length) => {
            for _ in 0..*length {
                if fold::pop_back_codepoint(view).is_none() {
                    return false;
                }
            }
            true
        }
        Element::Star => false,
        Element::Empty => true,
    }
}

/// Left-to-right match of `parts` against the view. A subpattern may match
/// a prefix only; the caller continues after the alternation. Restores the
/// view on failure, leaves it past the match on success.
fn match_fwd(parts: &[Element], view: &mut &str, case_sensitive: bool, is_subpattern: bool) -> bool {
    let entry = *view;
    for (i, part) in parts.iter().enumerate() {
        if matches!(part, Element::Star)
            && search_fwd(&parts[i + 1..], view, case_sensitive, is_subpattern)
        {
            return true;
        }
        if !starts_with_element(view, part, case_sensitive) {
            *view = entry;
            return false;
        }
    }

    if view.is_empty() || is_subpattern {
        return true;
    }
    *view = entry;
    false
}

/// The greedy star: find any suffix of the view where the remaining parts
/// match, dropping one leading codepoint per attempt.
fn search_fwd(
    parts: &[Element],
    view: &mut &str,
    case_sensitive: bool,
    is_subpattern: bool,
) -> bool {
    if parts.is_empty() {
        *view = &view[view.len()..];
        return true;
    }

    while !view.is_empty() {
        if match_fwd(parts, view, case_sensitive, is_subpattern) {
            return true;
        }
        fold::pop_front_codepoint(view);
    }
    false
}

/// Right-to-left match of the star-free tail against the end of the view.
fn match_end(parts: &[Element], view: &mut &str, case_sensitive: bool) -> bool {
    let entry = *view;
    for part in parts.iter().rev() {
        if !ends_with_element(view, part, case_sensitive) {
            *view = entry;
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glob(pattern: &str) -> GlobMatcher {
        GlobMatcher::new(pattern).unwrap()
    }

    #[test]
    fn empty_pattern() {
        let matcher = glob("");
        assert!(matcher.matches(""));
        assert!(!matcher.matches("a"));
        assert!(!matcher.matches("ab"));
    }

    #[test]
    fn exact_match() {
        let matcher = glob("abc");
        assert!(matcher.matches("abc"));
        assert!(!matcher.matches(""));
        assert!(!matcher.matches("ab"));
        assert!(!matcher.matches("abcd"));
        assert!(!matcher.matches("acb"));
    }

    #[test]
    fn lone_star_matches_everything() {
        let matcher = glob("*");
        assert!(matcher.matches(""));
        assert!(matcher.matches("a"));
        assert!(matcher.matches("ac"));
        assert!(matcher.matches("axc"));
    }

    #[test]
    fn star_in_the_middle() {
        let matcher = glob("a*c");
        assert!(matcher.matches("abc"));
        assert!(matcher.matches("ab_bb_bc"));
        assert!(matcher.matches("ac"));
        assert!(matcher.matches("axc"));
        assert!(!matcher.matches("a"));
        assert!(!matcher.matches("ab"));
        assert!(!matcher.matches("abcd"));
        assert!(!matcher.matches("acb"));
    }

    #[test]
    fn qmark_needs_exactly_one_codepoint() {
        let matcher = glob("a?c");
        assert!(matcher.matches("abc"));
        assert!(matcher.matches("axc"));
        assert!(matcher.matches("aüc"));
        assert!(!matcher.matches("ac"));
        assert!(!matcher.matches("abcd"));
    }

    #[test]
    fn qmark_run_counts_codepoints_not_bytes() {
        let matcher = glob("???");
        assert!(matcher.matches("abc"));
        assert!(matcher.matches("æøå"));
        assert!(!matcher.matches("ab"));
        assert!(!matcher.matches("abcd"));
    }

    #[test]
    fn set_ranges() {
        let matcher = glob("a[b-d]e");
        assert!(matcher.matches("abe"));
        assert!(matcher.matches("ace"));
        assert!(matcher.matches("ade"));
        assert!(!matcher.matches(""));
        assert!(!matcher.matches("ae"));
        assert!(!matcher.matches("aae"));
        assert!(!matcher.matches("aee"));
    }

    #[test]
    fn negated_set() {
        let matcher = glob("a[^b-d]e");
        assert!(!matcher.matches("abe"));
        assert!(!matcher.matches("ace"));
        assert!(!matcher.matches("ade"));
        assert!(matcher.matches("aee"));
        assert!(matcher.matches("aae"));
        assert!(!matcher.matches("ae"));
    }

    #[test]
    fn set_followed_by_star() {
        let matcher = glob("a[b-d]e*");
        assert!(matcher.matches("abe"));
        assert!(matcher.matches("aceggg"));
        assert!(matcher.matches("ade123"));
        assert!(!matcher.matches("ab"));
        assert!(!matcher.matches("aae"));
    }

    #[test]
    fn alternation_with_empty_branch() {
        let matcher = glob("ab{cd,ef,}gh");
        assert!(matcher.matches("abcdgh"));
        assert!(matcher.matches("abefgh"));
        assert!(matcher.matches("abgh"));
        assert!(!matcher.matches("abcgh"));
        assert!(!matcher.matches("abdegh"));
    }

    #[test]
    fn nested_alternations() {
        let matcher = glob("ab.{{pn,jp{e,}}g,gif}");
        assert!(matcher.matches("ab.png"));
        assert!(matcher.matches("ab.jpg"));
        assert!(matcher.matches("ab.jpeg"));
        assert!(matcher.matches("ab.gif"));
        assert!(!matcher.matches("ab.pnf"));
        assert!(!matcher.matches("ab.jpe"));
    }

    #[test]
    fn escaped_metacharacters() {
        let matcher = glob("a\\[b\\]c");
        assert!(matcher.matches("a[b]c"));
        assert!(!matcher.matches("abc"));
        assert!(!matcher.matches("a\\[b\\]c"));
    }

    #[test]
    fn escaped_commas_inside_alternation() {
        let matcher = glob("ab{c\\,d,e\\,f,}gh");
        assert!(matcher.matches("abc,dgh"));
        assert!(matcher.matches("abe,fgh"));
        assert!(matcher.matches("abgh"));
        assert!(!matcher.matches("abcgh"));
        assert!(!matcher.matches("abefgh"));
    }

    #[test]
    fn escaped_hyphen_in_set() {
        let matcher = glob("a[b\\-d]e");
        assert!(matcher.matches("abe"));
        assert!(matcher.matches("a-e"));
        assert!(matcher.matches("ade"));
        assert!(!matcher.matches("a-ee"));
        assert!(!matcher.matches("ace"));
    }

    #[test]
    fn stars_and_qmarks_interleaved() {
        let matcher = glob("aaa*?b?*c?dd");
        assert!(matcher.matches("aaabbbccdd"));
        assert!(matcher.matches("aaabbbccdccdd"));
        assert!(matcher.matches("aaabbbccddccdd"));
    }

    #[test]
    fn case_insensitive_matching() {
        let matcher = GlobMatcher::with_flags("a*.TXT", GlobFlags::empty()).unwrap();
        assert!(matcher.matches("abc.txt"));
        assert!(matcher.matches("A.txt"));
        assert!(matcher.matches("a.TxT"));
        assert!(!matcher.matches("b.txt"));
    }

    #[test]
    fn case_insensitive_sets() {
        let matcher = GlobMatcher::with_flags("[a-d]x", GlobFlags::empty()).unwrap();
        assert!(matcher.matches("Bx"));
        assert!(matcher.matches("bX"));
        assert!(!matcher.matches("ex"));
    }

    #[test]
    fn default_flags_are_case_sensitive() {
        let matcher = glob("abc");
        assert!(!matcher.matches("ABC"));
    }

    #[test]
    fn sets_disabled() {
        let matcher = GlobMatcher::with_flags("a[b-d]e", GlobFlags::default() | GlobFlags::NO_SETS)
            .unwrap();
        assert!(matcher.matches("a[b-d]e"));
        assert!(!matcher.matches("abe"));
    }

    #[test]
    fn braces_disabled() {
        let matcher =
            GlobMatcher::with_flags("ab{c,d,e}f", GlobFlags::default() | GlobFlags::NO_BRACES)
                .unwrap();
        assert!(matcher.matches("ab{c,d,e}f"));
        assert!(!matcher.matches("abcf"));
    }

    #[test]
    fn unicode_inputs() {
        assert!(glob("héllo").matches("héllo"));
        assert!(glob("*ñ*").matches("español"));
        assert!(glob("?").matches("ü"));
        assert!(glob("[αβγ]").matches("β"));
        assert!(!glob("[αβγ]").matches("δ"));
    }

    #[test]
    fn backtracking_with_anchored_tail() {
        assert!(glob("a*a*a*a*a*a*a*a").matches("aaaaaaaaaaaaaaaa"));
        assert!(!glob("a*a*a*a*a*a*a*ab").matches("aaaaaaaaaaaaaaaa"));
        assert!(glob("*a*b*c").matches("XXXaYYYbZZZc"));
        assert!(!glob("*a*b*c").matches("XXXaYYYcZZZb"));
        assert!(glob("*.*.txt").matches("file.backup.txt"));
        assert!(!glob("*.*.txt").matches("file.txt"));
    }

    #[test]
    fn display_renders_the_compiled_pattern() {
        let matcher = glob("a*.{rs,go}");
        assert_eq!(matcher.to_string(), "a*.{rs,go}");
    }
}
