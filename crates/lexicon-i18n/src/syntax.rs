//! Template parsing
//!
//! Templates use a subset of ICU message syntax:
//!
//! | Form | Meaning |
//! |------|---------|
//! | `text` | literal text |
//! | `{name}` | parameter, rendered as given |
//! | `{name, number}` | numeric parameter, rendered as given |
//! | `{n, plural, =0 {…} one {…} other {…}}` | CLDR plural selection; `#` inside a branch renders `n` |
//! | `{g, select, a {…} other {…}}` | selection on the parameter's value |
//! | `''` | a literal apostrophe |
//! | `'{…}'` | quoted literal text, braces included |
//!
//! `other` is mandatory in `plural` and `select`. Anything else inside braces
//! is a [`SyntaxError`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Plural categories accepted as branch keys.
pub const PLURAL_CATEGORIES: [&str; 6] = ["zero", "one", "two", "few", "many", "other"];

/// The branch every `plural` and `select` must provide.
pub const OTHER: &str = "other";

/// A template that failed to parse.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason} at byte {offset}")]
pub struct SyntaxError {
    /// Byte offset into the raw template
    pub offset: usize,
    /// What the parser expected or rejected
    pub reason: String,
}

impl SyntaxError {
    fn new(offset: usize, reason: impl Into<String>) -> Self {
        Self {
            offset,
            reason: reason.into(),
        }
    }
}

/// The parsed form of one template.
///
/// Serializes as a JSON array of elements, so prebuilt caches can be stored
/// next to the raw strings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParsedTemplate {
    elements: Vec<Element>,
}

impl ParsedTemplate {
    /// Wrap already parsed elements.
    pub fn new(elements: Vec<Element>) -> Self {
        Self { elements }
    }

    /// Top-level elements in source order
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }
}

/// One piece of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum Element {
    /// Literal text, quotes already resolved
    Text { value: String },
    /// `{name}`
    Argument { name: String },
    /// `{name, number}`
    Number { name: String },
    /// `#` inside a plural branch
    Pound,
    /// `{name, plural, ...}`
    Plural { name: String, branches: Vec<Branch> },
    /// `{name, select, ...}`
    Select { name: String, branches: Vec<Branch> },
}

/// One `key {body}` arm of a plural or select.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    /// What the arm matches
    pub key: BranchKey,
    /// Elements rendered when it matches
    pub body: Vec<Element>,
}

/// Selector of a [`Branch`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum BranchKey {
    /// `=N` in a plural, matched against the exact number
    Exact(String),
    /// A plural category or select value
    Named(String),
}

impl BranchKey {
    /// Whether this is the mandatory `other` arm.
    pub fn is_other(&self) -> bool {
        matches!(self, Self::Named(name) if name == OTHER)
    }
}

/// Turns raw template strings into [`ParsedTemplate`]s.
pub trait TemplateParser: Send + Sync {
    /// Parse one raw template.
    ///
    /// # Errors
    ///
    /// Returns a [`SyntaxError`] locating the first problem in `source`.
    fn parse(&self, source: &str) -> Result<ParsedTemplate, SyntaxError>;
}

/// Parser for the ICU-style syntax described in the module docs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageParser;

impl TemplateParser for MessageParser {
    fn parse(&self, source: &str) -> Result<ParsedTemplate, SyntaxError> {
        let mut cursor = Cursor { src: source, pos: 0 };
        let elements = cursor.message(0, false)?;
        Ok(ParsedTemplate::new(elements))
    }
}

struct Cursor<'s> {
    src: &'s str,
    pos: usize,
}

impl<'s> Cursor<'s> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), SyntaxError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.bump();
                Ok(())
            }
            Some(c) => Err(SyntaxError::new(self.pos, format!("expected '{expected}', found '{c}'"))),
            None => Err(SyntaxError::new(self.pos, format!("expected '{expected}', found end of template"))),
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'s str {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.bump();
        }
        &self.src[start..self.pos]
    }

    /// Parses elements until end of input or, inside a branch, until the
    /// closing `}` (left unconsumed).
    fn message(&mut self, depth: usize, in_plural: bool) -> Result<Vec<Element>, SyntaxError> {
        let mut elements = Vec::new();
        let mut text = String::new();

        while let Some(c) = self.peek() {
            match c {
                '{' => {
                    flush_text(&mut text, &mut elements);
                    elements.push(self.argument(depth, in_plural)?);
                }
                '}' if depth > 0 => break,
                '}' => return Err(SyntaxError::new(self.pos, "unmatched '}'")),
                '#' if in_plural => {
                    flush_text(&mut text, &mut elements);
                    self.bump();
                    elements.push(Element::Pound);
                }
                '\'' => self.apostrophe(in_plural, &mut text),
                _ => {
                    text.push(c);
                    self.bump();
                }
            }
        }

        flush_text(&mut text, &mut elements);
        Ok(elements)
    }

    fn apostrophe(&mut self, in_plural: bool, text: &mut String) {
        self.bump();
        match self.peek() {
            Some('\'') => {
                self.bump();
                text.push('\'');
            }
            Some('{' | '}') => self.quoted(text),
            Some('#') if in_plural => self.quoted(text),
            _ => text.push('\''),
        }
    }

    /// Literal text up to the closing apostrophe; an unterminated quote runs
    /// to the end of the template.
    fn quoted(&mut self, text: &mut String) {
        while let Some(c) = self.bump() {
            if c == '\'' {
                if self.peek() == Some('\'') {
                    self.bump();
                    text.push('\'');
                } else {
                    return;
                }
            } else {
                text.push(c);
            }
        }
    }

    fn argument(&mut self, depth: usize, in_plural: bool) -> Result<Element, SyntaxError> {
        let open = self.pos;
        self.expect('{')?;
        self.skip_whitespace();

        let name_at = self.pos;
        let name = self.take_while(|c| !c.is_whitespace() && !matches!(c, '{' | '}' | ',' | '#' | '\''));
        if name.is_empty() {
            return Err(SyntaxError::new(name_at, "expected argument name"));
        }
        let name = name.to_string();
        self.skip_whitespace();

        match self.bump() {
            Some('}') => return Ok(Element::Argument { name }),
            Some(',') => {}
            Some(c) => return Err(SyntaxError::new(self.pos - c.len_utf8(), format!("expected ',' or '}}', found '{c}'"))),
            None => return Err(SyntaxError::new(open, "unclosed argument")),
        }

        self.skip_whitespace();
        let kind_at = self.pos;
        let kind = self.take_while(|c| c.is_ascii_alphanumeric() || c == '_');
        self.skip_whitespace();

        match kind {
            "number" => {
                if self.peek() == Some(',') {
                    return Err(SyntaxError::new(self.pos, "number styles are not supported"));
                }
                self.expect('}')?;
                Ok(Element::Number { name })
            }
            "plural" => {
                self.expect(',')?;
                let branches = self.branches(open, depth, true, true)?;
                Ok(Element::Plural { name, branches })
            }
            "select" => {
                self.expect(',')?;
                let branches = self.branches(open, depth, false, in_plural)?;
                Ok(Element::Select { name, branches })
            }
            "" => Err(SyntaxError::new(kind_at, "expected argument type")),
            other => Err(SyntaxError::new(kind_at, format!("unsupported argument type '{other}'"))),
        }
    }

    /// Parses `key {body}` pairs up to and including the argument's closing
    /// brace. `plural` selects plural key rules; `in_plural` decides whether
    /// `#` is special inside the bodies.
    fn branches(
        &mut self,
        open: usize,
        depth: usize,
        plural: bool,
        in_plural: bool,
    ) -> Result<Vec<Branch>, SyntaxError> {
        let mut branches: Vec<Branch> = Vec::new();

        loop {
            self.skip_whitespace();
            let key_at = self.pos;
            match self.peek() {
                Some('}') => {
                    self.bump();
                    break;
                }
                None => return Err(SyntaxError::new(open, "unclosed argument")),
                _ => {}
            }

            let key = self.branch_key(plural)?;
            if branches.iter().any(|b| b.key == key) {
                return Err(SyntaxError::new(key_at, "duplicate selector"));
            }

            self.skip_whitespace();
            self.expect('{')?;
            let body = self.message(depth + 1, in_plural)?;
            if self.peek().is_none() {
                return Err(SyntaxError::new(key_at, "unclosed branch"));
            }
            self.expect('}')?;

            branches.push(Branch { key, body });
        }

        if !branches.iter().any(|b| b.key.is_other()) {
            return Err(SyntaxError::new(open, "missing 'other' branch"));
        }
        Ok(branches)
    }

    fn branch_key(&mut self, plural: bool) -> Result<BranchKey, SyntaxError> {
        let at = self.pos;

        if plural && self.peek() == Some('=') {
            self.bump();
            let digits = self.take_while(|c| c.is_ascii_digit());
            if digits.is_empty() {
                return Err(SyntaxError::new(at, "expected a number after '='"));
            }
            return Ok(BranchKey::Exact(digits.to_string()));
        }

        let key = self.take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | ':'));
        if key.is_empty() {
            return Err(SyntaxError::new(at, "expected selector"));
        }
        if plural {
            if key.starts_with("offset:") {
                return Err(SyntaxError::new(at, "plural offsets are not supported"));
            }
            if !PLURAL_CATEGORIES.contains(&key) {
                return Err(SyntaxError::new(at, format!("unknown plural category '{key}'")));
            }
        } else if !key.starts_with(|c: char| c.is_ascii_alphabetic()) || key.contains(':') {
            return Err(SyntaxError::new(at, format!("invalid select key '{key}'")));
        }
        Ok(BranchKey::Named(key.to_string()))
    }
}

fn flush_text(text: &mut String, elements: &mut Vec<Element>) {
    if !text.is_empty() {
        elements.push(Element::Text {
            value: std::mem::take(text),
        });
    }
}
