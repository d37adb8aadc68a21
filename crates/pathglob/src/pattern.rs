//! The compiled representation of a single-component glob pattern.
//!
//! A pattern is a flat sequence of elements; alternation is the only
//! recursive node, owning its child patterns. `tail_length` marks the
//! star-free suffix of the sequence, which the matcher anchors to the end
//! of the input before running the greedy forward search.

use std::fmt;

use crate::fold;

/// A set of codepoint ranges, optionally negated. Ranges are a union and
/// need not be sorted or disjoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CodepointSet {
    pub ranges: Vec<(char, char)>,
    pub negated: bool,
}

impl CodepointSet {
    fn in_ranges(&self, ch: char) -> bool {
        self.ranges.iter().any(|&(lo, hi)| lo <= ch && ch <= hi)
    }

    /// Membership with negation applied. Case-insensitive lookup folds the
    /// probe both ways, since ranges may be written in either case.
    pub fn contains(&self, ch: char, case_sensitive: bool) -> bool {
        let inside = if case_sensitive {
            self.in_ranges(ch)
        } else {
            self.in_ranges(ch)
                || self.in_ranges(fold::to_lower(ch))
                || self.in_ranges(fold::to_upper(ch))
        };
        inside != self.negated
    }
}

/// One element of a compiled pattern.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Element {
    /// Matches the empty string; only appears alone, for an empty pattern
    /// or an empty alternation branch.
    Empty,
    /// Matches any run of codepoints, including none.
    Star,
    /// Matches exactly this many codepoints (a run of `?`).
    Qmark(usize),
    /// Matches one codepoint from the set.
    Set(CodepointSet),
    /// Matches itself.
    Literal(String),
    /// Matches if any branch matches; branches are tried in written order.
    Alternation(Vec<Pattern>),
}

/// A compiled glob pattern for one path component.
///
/// Invariant: no element in `elements[len - tail_length..]` contains a
/// star, directly or inside a nested alternation.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Pattern {
    pub elements: Vec<Element>,
    pub tail_length: usize,
}

impl Pattern {
    /// True for the pattern an empty alternation branch compiles to.
    pub fn is_empty_only(&self) -> bool {
        matches!(self.elements[..], [Element::Empty])
    }
}

fn write_literal(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    for ch in text.chars() {
        if matches!(ch, '*' | '?' | '[' | ']' | '{' | '}' | ',' | '\\') {
            write!(f, "\\{ch}")?;
        } else {
            write!(f, "{ch}")?;
        }
    }
    Ok(())
}

fn write_set_codepoint(f: &mut fmt::Formatter<'_>, ch: char) -> fmt::Result {
    if matches!(ch, ']' | '-' | '^' | '\\') {
        write!(f, "\\{ch}")
    } else {
        write!(f, "{ch}")
    }
}

impl fmt::Display for CodepointSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        if self.negated {
            write!(f, "^")?;
        }
        for &(lo, hi) in &self.ranges {
            write_set_codepoint(f, lo)?;
            if lo != hi {
                write!(f, "-")?;
                write_set_codepoint(f, hi)?;
            }
        }
        write!(f, "]")
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Empty => Ok(()),
            Element::Star => write!(f, "*"),
            Element::Qmark(length) => {
                for _ in 0..*length {
                    write!(f, "?")?;
                }
                Ok(())
            }
            Element::Set(set) => write!(f, "{set}"),
            Element::Literal(text) => write_literal(f, text),
            Element::Alternation(branches) => {
                write!(f, "{{")?;
                for (i, branch) in branches.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{branch}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for element in &self.elements {
            write!(f, "{element}")?;
        }
        Ok(())
    }
}
