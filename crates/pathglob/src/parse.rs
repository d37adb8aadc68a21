//! Glob pattern text → compiled [`Pattern`](crate::pattern::Pattern).
//!
//! A hand-rolled cursor parser: each step classifies the next codepoint
//! into a token kind and hands off to the extractor for that kind. Inside
//! an alternation the same parser runs recursively with `is_subpattern`
//! set, which promotes `}` and `,` to tokens; at the top level they are
//! ordinary characters.

use crate::error::{GlobError, SyntaxErrorKind};
use crate::flags::GlobFlags;
use crate::fold;
use crate::pattern::{CodepointSet, Element, Pattern};

#[derive(Debug, Clone, Copy)]
pub(crate) struct ParserOptions {
    pub support_braces: bool,
    pub support_sets: bool,
    pub is_subpattern: bool,
}

impl ParserOptions {
    pub fn from_flags(flags: GlobFlags) -> Self {
        ParserOptions {
            support_braces: !flags.contains(GlobFlags::NO_BRACES),
            support_sets: !flags.contains(GlobFlags::NO_SETS),
            is_subpattern: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    Star,
    Qmark,
    OpenSet,
    OpenBrace,
    EndBrace,
    Comma,
    Char,
    None,
}

fn next_token_kind(rest: &str, options: ParserOptions) -> TokenKind {
    let Some(first) = rest.chars().next() else {
        return TokenKind::None;
    };
    match first {
        '?' => TokenKind::Qmark,
        '*' => TokenKind::Star,
        '[' if options.support_sets => TokenKind::OpenSet,
        '{' if options.support_braces => TokenKind::OpenBrace,
        '}' if options.is_subpattern => TokenKind::EndBrace,
        ',' if options.is_subpattern => TokenKind::Comma,
        _ => TokenKind::Char,
    }
}

/// Byte cursor over the pattern text. Subpattern recursion shares the one
/// cursor, so error positions are offsets into the full pattern.
struct Cursor<'a> {
    rest: &'a str,
    full_length: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Cursor {
            rest: text,
            full_length: text.len(),
        }
    }

    fn pos(&self) -> usize {
        self.full_length - self.rest.len()
    }

    fn bump(&mut self) {
        let mut chars = self.rest.chars();
        chars.next();
        self.rest = chars.as_str();
    }
}

/// Parse a whole pattern with the given options.
pub(crate) fn parse(text: &str, options: ParserOptions) -> Result<Pattern, GlobError> {
    let mut cursor = Cursor::new(text);
    parse_pattern(&mut cursor, options)
}

fn parse_pattern(cursor: &mut Cursor<'_>, options: ParserOptions) -> Result<Pattern, GlobError> {
    let mut pattern = Pattern::default();
    loop {
        match next_token_kind(cursor.rest, options) {
            TokenKind::Char => {
                let literal = extract_literal(cursor, options);
                pattern.elements.push(Element::Literal(literal));
            }
            TokenKind::Qmark => {
                let length = extract_qmarks(cursor);
                pattern.elements.push(Element::Qmark(length));
            }
            TokenKind::Star => {
                extract_stars(cursor);
                pattern.elements.push(Element::Star);
            }
            TokenKind::OpenSet => {
                let set = extract_set(cursor)?;
                pattern.elements.push(Element::Set(set));
            }
            TokenKind::OpenBrace => {
                let branches = extract_alternation(cursor, options)?;
                pattern.elements.push(Element::Alternation(branches));
            }
            TokenKind::Comma | TokenKind::EndBrace | TokenKind::None => {
                if pattern.elements.is_empty() {
                    pattern.elements.push(Element::Empty);
                }
                break;
            }
        }
    }

    if !options.is_subpattern {
        optimize(&mut pattern);
    }
    Ok(pattern)
}

/// Absorb a run of ordinary characters, resolving escapes as they appear.
fn extract_literal(cursor: &mut Cursor<'_>, options: ParserOptions) -> String {
    let mut result = String::new();
    while let Some(ch) = cursor.rest.chars().next() {
        if ch == '\\' {
            if let Some((unescaped, _)) = fold::unescape_next(&mut cursor.rest) {
                result.push(unescaped);
            }
        } else if next_token_kind(cursor.rest, options) != TokenKind::Char {
            break;
        } else {
            result.push(ch);
            cursor.bump();
        }
    }
    result
}

/// Consecutive stars collapse into one.
fn extract_stars(cursor: &mut Cursor<'_>) {
    while cursor.rest.starts_with('*') {
        cursor.bump();
    }
}

fn extract_qmarks(cursor: &mut Cursor<'_>) -> usize {
    let mut length = 0;
    while cursor.rest.starts_with('?') {
        length += 1;
        cursor.bump();
    }
    length
}

/// Parse a `[...]` class. The cursor sits on the `[`.
fn extract_set(cursor: &mut Cursor<'_>) -> Result<CodepointSet, GlobError> {
    let open_pos = cursor.pos();
    cursor.bump();

    let mut set = CodepointSet {
        ranges: Vec::new(),
        negated: false,
    };
    if cursor.rest.starts_with('^') {
        set.negated = true;
        cursor.bump();
    }

    enum State {
        AwaitingFirst,
        HasFirst,
        AwaitingLast,
    }
    let mut state = State::AwaitingFirst;

    while let Some((ch, escaped)) = fold::unescape_next(&mut cursor.rest) {
        if ch == ']' && !escaped {
            if matches!(state, State::AwaitingLast) {
                return Err(GlobError::syntax(
                    SyntaxErrorKind::InvalidRange,
                    cursor.pos(),
                ));
            }
            if set.ranges.is_empty() {
                return Err(GlobError::syntax(SyntaxErrorKind::InvalidRange, open_pos));
            }
            return Ok(set);
        } else if ch == '-' && !escaped {
            match state {
                State::HasFirst => state = State::AwaitingLast,
                // A hyphen before any other item is itself an item.
                State::AwaitingFirst if set.ranges.is_empty() => set.ranges.push(('-', '-')),
                _ => {
                    return Err(GlobError::syntax(
                        SyntaxErrorKind::InvalidRange,
                        cursor.pos(),
                    ));
                }
            }
        } else if matches!(state, State::AwaitingLast) {
            let range = set.ranges.last_mut().expect("a range opened this state");
            if range.0 <= ch {
                range.1 = ch;
                state = State::AwaitingFirst;
            } else {
                return Err(GlobError::syntax(
                    SyntaxErrorKind::InvalidRange,
                    cursor.pos(),
                ));
            }
        } else {
            set.ranges.push((ch, ch));
            state = State::HasFirst;
        }
    }
    Err(GlobError::syntax(
        SyntaxErrorKind::UnterminatedClass,
        open_pos,
    ))
}

/// Parse a `{a,b,...}` alternation. The cursor sits on the `{`.
fn extract_alternation(
    cursor: &mut Cursor<'_>,
    options: ParserOptions,
) -> Result<Vec<Pattern>, GlobError> {
    let open_pos = cursor.pos();
    let sub_options = ParserOptions {
        is_subpattern: true,
        ..options
    };

    let mut branches = Vec::new();
    loop {
        match next_token_kind(cursor.rest, sub_options) {
            TokenKind::OpenBrace | TokenKind::Comma => {
                cursor.bump();
                branches.push(parse_pattern(cursor, sub_options)?);
            }
            TokenKind::EndBrace => {
                cursor.bump();
                if branches.len() == 1 && branches[0].is_empty_only() {
                    return Err(GlobError::syntax(
                        SyntaxErrorKind::EmptyAlternation,
                        open_pos,
                    ));
                }
                return Ok(branches);
            }
            _ => {
                return Err(GlobError::syntax(
                    SyntaxErrorKind::UnterminatedAlternation,
                    open_pos,
                ));
            }
        }
    }
}

fn element_has_star(element: &Element) -> bool {
    match element {
        Element::Star => true,
        Element::Alternation(branches) => branches
            .iter()
            .any(|branch| branch.elements.iter().any(element_has_star)),
        _ => false,
    }
}

/// Partition the pattern into a head that may contain stars and a star-free
/// tail. The matcher anchors the tail to the end of the input before the
/// greedy head search.
fn optimize(pattern: &mut Pattern) {
    pattern.tail_length = pattern
        .elements
        .iter()
        .rev()
        .take_while(|element| !element_has_star(element))
        .count();
}

/// Does `text` contain at least one unescaped metacharacter enabled by
/// `flags`?
pub(crate) fn is_glob_pattern(text: &str, flags: GlobFlags) -> bool {
    let options = ParserOptions::from_flags(flags);
    let mut rest = text;
    while !rest.is_empty() {
        match next_token_kind(rest, options) {
            TokenKind::Star | TokenKind::Qmark | TokenKind::OpenSet | TokenKind::OpenBrace => {
                return true;
            }
            _ => {
                fold::unescape_next(&mut rest);
            }
        }
    }
    false
}
