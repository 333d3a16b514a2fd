//! Dictionary and list parsing.
//!
//! A recursive-descent parser over the token stream produced by
//! [`Lexer`](super::lexer::Lexer):
//!
//! ```text
//! Document := 'FoamFile' Dict (Entry | List)*
//! Entry    := Key (Dict | Item* ';')
//! Dict     := '{' Entry* '}'
//! List     := Count '(' Item* ')' | Count '{' Item '}' | '(' Item* ')'
//! Item     := Word | String | '[' Item* ']' | List | Dict
//! ```
//!
//! The `FoamFile` header is always ascii. Once it is known, counted lists in
//! a binary file are read as raw bytes with a length derived from the count
//! and the element kind (a preceding `List<T>` token, or the header class).

use regex::Regex;
use log::trace;

use super::header::Header;
use super::lexer::{Lexer, Token, TokenKind};
use crate::foam::types::error::{FoamError, Result};
use crate::foam::types::models::{Dimensions, ElementKind, ListForm, StreamFormat};

/// An ordered mapping of keywords to entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dictionary {
    entries: Vec<(String, Entry)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Dict(Dictionary),
    Value(Vec<Item>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Word(String),
    Str(String),
    /// A `[ ... ]` group, e.g. a dimension set.
    Bracket(Vec<Item>),
    List(List),
    Dict(Dictionary),
}

#[derive(Debug, Clone, PartialEq)]
pub struct List {
    /// Declared element count; `None` for uncounted `( ... )` groups.
    pub count: Option<usize>,
    pub form: ListForm,
    pub body: ListBody,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListBody {
    Items(Vec<Item>),
    /// `N{value}`: one element repeated `count` times.
    Repeated(Box<Item>),
    /// Packed binary payload of `count` elements of `kind`.
    Binary { kind: ElementKind, bytes: Vec<u8> },
}

/// A fully parsed case file.
#[derive(Debug, Clone)]
pub struct Document {
    pub header: Header,
    /// Top-level keyword entries after the header.
    pub body: Dictionary,
    /// Top-level bare lists, in file order (topology files).
    pub lists: Vec<List>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entry; a repeated keyword replaces the earlier entry in place.
    pub fn insert(&mut self, key: impl Into<String>, entry: Entry) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = entry,
            None => self.entries.push((key, entry)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, e)| e)
    }

    pub fn dict(&self, key: &str) -> Option<&Dictionary> {
        self.get(key).and_then(Entry::as_dict)
    }

    pub fn items(&self, key: &str) -> Option<&[Item]> {
        self.get(key).and_then(Entry::as_items)
    }

    /// The first word of a `key value;` entry.
    pub fn word(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Entry::as_word)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries.iter().map(|(k, e)| (k.as_str(), e))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up `name`, falling back to keys written as regular expressions
    /// (`".*"`, `"(inlet|outlet)"`). Exact keys win; among patterns the last
    /// matching one wins.
    pub fn lookup_pattern(&self, name: &str) -> Option<&Entry> {
        if let Some(entry) = self.get(name) {
            return Some(entry);
        }
        self.entries.iter().rev().find_map(|(key, entry)| {
            let pattern = Regex::new(&format!("^(?:{})$", key)).ok()?;
            pattern.is_match(name).then_some(entry)
        })
    }
}

impl Entry {
    pub fn as_dict(&self) -> Option<&Dictionary> {
        match self {
            Entry::Dict(d) => Some(d),
            Entry::Value(_) => None,
        }
    }

    pub fn as_items(&self) -> Option<&[Item]> {
        match self {
            Entry::Value(items) => Some(items),
            Entry::Dict(_) => None,
        }
    }

    pub fn as_word(&self) -> Option<&str> {
        self.as_items().and_then(|items| items.first()).and_then(Item::as_word)
    }
}

impl Item {
    /// The text of a word or quoted string.
    pub fn as_word(&self) -> Option<&str> {
        match self {
            Item::Word(w) | Item::Str(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Item::Word(w) => w.parse().ok(),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Item::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&Dictionary> {
        match self {
            Item::Dict(d) => Some(d),
            _ => None,
        }
    }
}

impl Document {
    /// The `dimensions [...]` entry, if present.
    ///
    /// Seven exponents are expected; the older five-exponent form is padded
    /// with zeros for current and luminous intensity.
    pub fn dimensions(&self) -> Result<Option<Dimensions>> {
        let Some(items) = self.body.items("dimensions") else {
            return Ok(None);
        };
        let Some(Item::Bracket(group)) = items.first() else {
            return Err(FoamError::InvalidFormat("dimensions entry is not a [ ... ] group".to_string()));
        };
        let exponents = group
            .iter()
            .map(|item| {
                item.as_f64().ok_or_else(|| {
                    FoamError::InvalidFormat(format!("Non-numeric dimension exponent: {:?}", item))
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        let mut dims = [0.0; 7];
        match exponents.len() {
            5 | 7 => dims[..exponents.len()].copy_from_slice(&exponents),
            n => {
                return Err(FoamError::CountMismatch {
                    item_type: "dimension exponents",
                    expected: 7,
                    found: n as u64,
                })
            }
        }
        Ok(Some(Dimensions(dims)))
    }
}

/// Parses the raw content of a case file.
pub fn parse_document(input: &[u8]) -> Result<Document> {
    let mut parser = Parser::new(input);
    parser.parse_document()
}

/// Parses a bare dictionary body (no `FoamFile` header), always as ascii.
pub fn parse_dictionary(input: &[u8]) -> Result<Dictionary> {
    let mut parser = Parser::new(input);
    let mut dict = Dictionary::new();
    loop {
        let token = parser.bump()?;
        match token.kind {
            TokenKind::Eof => return Ok(dict),
            TokenKind::Word(key) | TokenKind::Str(key) => {
                if key.starts_with('#') {
                    parser.skip_directive()?;
                    continue;
                }
                let entry = parser.parse_entry()?;
                dict.insert(key, entry);
            }
            other => return Err(parser.unexpected(&other, token.line, "a keyword")),
        }
    }
}

/// Element kind requested by a `List<T>` token.
///
/// `Some(None)` marks a list of a non-contiguous type (`List<word>`), which is
/// written as ascii even inside binary files.
fn list_type_kind(word: &str) -> Option<Option<ElementKind>> {
    let inner = word.strip_prefix("List<")?.strip_suffix('>')?;
    Some(match inner {
        "scalar" | "sphericalTensor" => Some(ElementKind::Scalars(1)),
        "vector" => Some(ElementKind::Scalars(3)),
        "symmTensor" => Some(ElementKind::Scalars(6)),
        "tensor" => Some(ElementKind::Scalars(9)),
        "label" => Some(ElementKind::Label),
        _ => None,
    })
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    peeked: Option<Token>,
    format: StreamFormat,
    header: Option<Header>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a [u8]) -> Self {
        Self {
            lexer: Lexer::new(input),
            peeked: None,
            format: StreamFormat::Ascii,
            header: None,
        }
    }

    fn peek(&mut self) -> Result<&Token> {
        if self.peeked.is_none() {
            self.peeked = Some(self.lexer.next_token()?);
        }
        match self.peeked.as_ref() {
            Some(token) => Ok(token),
            None => Err(FoamError::Parse { line: self.lexer.line(), message: "Token stream exhausted".to_string() }),
        }
    }

    fn peek_is(&mut self, kind: &TokenKind) -> Result<bool> {
        Ok(&self.peek()?.kind == kind)
    }

    fn bump(&mut self) -> Result<Token> {
        match self.peeked.take() {
            Some(token) => Ok(token),
            None => self.lexer.next_token(),
        }
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<Token> {
        let token = self.bump()?;
        if token.kind == kind {
            Ok(token)
        } else {
            Err(self.unexpected(&token.kind, token.line, what))
        }
    }

    fn unexpected(&self, found: &TokenKind, line: usize, expected: &str) -> FoamError {
        let found = match found {
            TokenKind::Eof => "end of input".to_string(),
            TokenKind::Word(w) => format!("'{}'", w),
            TokenKind::Str(s) => format!("\"{}\"", s),
            other => format!("{:?}", other),
        };
        FoamError::Parse { line, message: format!("Expected {}, found {}", expected, found) }
    }

    /// Skips the argument of a `#directive` (`#include "file"`, `#inputMode merge`).
    fn skip_directive(&mut self) -> Result<()> {
        if matches!(self.peek()?.kind, TokenKind::Word(_) | TokenKind::Str(_)) {
            self.bump()?;
        }
        Ok(())
    }

    fn parse_document(&mut self) -> Result<Document> {
        loop {
            let token = self.bump()?;
            match token.kind {
                TokenKind::Word(ref w) if w == "FoamFile" => break,
                TokenKind::Word(ref w) if w.starts_with('#') => self.skip_directive()?,
                other => return Err(self.unexpected(&other, token.line, "the FoamFile header")),
            }
        }
        let header_dict = self.parse_dict()?;
        let header = Header::from_dict(&header_dict)?;
        trace!("Header parsed: format={}, class={}", header.format, header.class);
        self.format = header.format;
        self.header = Some(header.clone());

        let mut body = Dictionary::new();
        let mut lists = Vec::new();
        loop {
            let token = self.bump()?;
            match token.kind {
                TokenKind::Eof => break,
                TokenKind::Word(word) => {
                    if word.starts_with('#') {
                        self.skip_directive()?;
                    } else if let Ok(count) = word.parse::<usize>() {
                        lists.push(self.parse_counted_list(count, token.line, 0, None)?);
                    } else {
                        let entry = self.parse_entry()?;
                        body.insert(word, entry);
                    }
                }
                TokenKind::Str(key) => {
                    let entry = self.parse_entry()?;
                    body.insert(key, entry);
                }
                TokenKind::LParen => lists.push(self.parse_uncounted_list(token.line, 0)?),
                other => return Err(self.unexpected(&other, token.line, "a keyword or list")),
            }
        }

        Ok(Document { header, body, lists })
    }

    fn parse_entry(&mut self) -> Result<Entry> {
        if self.peek()?.kind == TokenKind::LBrace {
            return Ok(Entry::Dict(self.parse_dict()?));
        }
        let mut items = Vec::new();
        let mut pending = None;
        loop {
            if self.peek_is(&TokenKind::Semicolon)? {
                self.bump()?;
                return Ok(Entry::Value(items));
            }
            if self.peek_is(&TokenKind::Eof)? || self.peek_is(&TokenKind::RBrace)? {
                let token = self.bump()?;
                return Err(self.unexpected(&token.kind, token.line, "';'"));
            }
            items.push(self.parse_item(0, &mut pending)?);
        }
    }

    fn parse_dict(&mut self) -> Result<Dictionary> {
        let open = self.expect(TokenKind::LBrace, "'{'")?;
        let mut dict = Dictionary::new();
        loop {
            let token = self.bump()?;
            match token.kind {
                TokenKind::RBrace => return Ok(dict),
                TokenKind::Word(key) | TokenKind::Str(key) => {
                    if key.starts_with('#') {
                        self.skip_directive()?;
                        continue;
                    }
                    let entry = self.parse_entry()?;
                    dict.insert(key, entry);
                }
                TokenKind::Eof => {
                    return Err(FoamError::Parse {
                        line: token.line,
                        message: format!("Unterminated dictionary opened at line {}", open.line),
                    })
                }
                other => return Err(self.unexpected(&other, token.line, "a keyword or '}'")),
            }
        }
    }

    fn parse_item(&mut self, depth: usize, pending: &mut Option<Option<ElementKind>>) -> Result<Item> {
        let token = self.bump()?;
        match token.kind {
            TokenKind::Word(word) => {
                if let Ok(count) = word.parse::<usize>() {
                    if matches!(self.peek()?.kind, TokenKind::LParen | TokenKind::LBrace) {
                        let list = self.parse_counted_list(count, token.line, depth, pending.take())?;
                        return Ok(Item::List(list));
                    }
                }
                if let Some(kind) = list_type_kind(&word) {
                    *pending = Some(kind);
                }
                Ok(Item::Word(word))
            }
            TokenKind::Str(s) => Ok(Item::Str(s)),
            TokenKind::LParen => Ok(Item::List(self.parse_uncounted_list(token.line, depth)?)),
            TokenKind::LBracket => {
                let mut group = Vec::new();
                let mut inner = None;
                loop {
                    if self.peek()?.kind == TokenKind::RBracket {
                        self.bump()?;
                        return Ok(Item::Bracket(group));
                    }
                    if self.peek()?.kind == TokenKind::Eof {
                        return Err(FoamError::Parse {
                            line: token.line,
                            message: "Unterminated '[' group".to_string(),
                        });
                    }
                    group.push(self.parse_item(depth, &mut inner)?);
                }
            }
            TokenKind::LBrace => {
                self.peeked = Some(token);
                Ok(Item::Dict(self.parse_dict()?))
            }
            other => Err(self.unexpected(&other, token.line, "a value")),
        }
    }

    /// Element kind of a counted binary list at `depth`, if it is contiguous.
    fn binary_kind(&self, depth: usize, requested: Option<Option<ElementKind>>) -> Option<ElementKind> {
        if self.format != StreamFormat::Binary {
            return None;
        }
        match requested {
            Some(kind) => kind,
            None => self.header.as_ref().and_then(|h| h.binary_list_kind(depth)),
        }
    }

    fn parse_counted_list(
        &mut self,
        count: usize,
        count_line: usize,
        depth: usize,
        requested: Option<Option<ElementKind>>,
    ) -> Result<List> {
        let open = self.bump()?;
        let form = if open.line == count_line { ListForm::Short } else { ListForm::Long };
        match open.kind {
            TokenKind::LBrace => {
                let mut inner = None;
                let item = self.parse_item(depth + 1, &mut inner)?;
                self.expect(TokenKind::RBrace, "'}' closing a repeated list")?;
                Ok(List { count: Some(count), form, body: ListBody::Repeated(Box::new(item)) })
            }
            TokenKind::LParen => {
                if let Some(kind) = self.binary_kind(depth, requested) {
                    let arch = self.header.as_ref().map(|h| h.arch).unwrap_or_default();
                    let len = count.checked_mul(kind.byte_width(&arch)).ok_or_else(|| FoamError::Parse {
                        line: open.line,
                        message: format!("List count {} overflows", count),
                    })?;
                    trace!("Binary list at line {}: {} x {:?} = {} bytes", open.line, count, kind, len);
                    let bytes = self.lexer.take_raw(len)?.to_vec();
                    self.expect(TokenKind::RParen, "')' closing a binary list")?;
                    return Ok(List { count: Some(count), form, body: ListBody::Binary { kind, bytes } });
                }
                let mut list = self.parse_uncounted_list(open.line, depth)?;
                list.count = Some(count);
                list.form = form;
                Ok(list)
            }
            other => Err(self.unexpected(&other, open.line, "'(' or '{'")),
        }
    }

    /// Parses items up to the `)` matching an already consumed `(`.
    fn parse_uncounted_list(&mut self, open_line: usize, depth: usize) -> Result<List> {
        let mut items = Vec::new();
        let mut pending = None;
        loop {
            if self.peek_is(&TokenKind::RParen)? {
                let close = self.bump()?;
                let form = if close.line == open_line { ListForm::Short } else { ListForm::Long };
                return Ok(List { count: None, form, body: ListBody::Items(items) });
            }
            if self.peek_is(&TokenKind::Eof)? {
                return Err(FoamError::Parse {
                    line: self.lexer.line(),
                    message: format!("Unterminated list opened at line {}", open_line),
                });
            }
            items.push(self.parse_item(depth + 1, &mut pending)?);
        }
    }
}
