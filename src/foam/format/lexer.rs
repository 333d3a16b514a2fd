//! Byte-level tokenizer for case files.
//!
//! Works on raw bytes rather than text because binary files embed packed
//! payloads between ascii tokens. The parser pulls tokens one at a time and
//! uses [`Lexer::take_raw`] to consume a binary block right after its
//! opening parenthesis.

use crate::foam::types::error::{FoamError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Any run of bytes that is not whitespace, punctuation or a quote.
    Word(String),
    /// A double-quoted string, quotes removed.
    Str(String),
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Semicolon,
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// 1-based line the token starts on.
    pub line: usize,
}

pub struct Lexer<'a> {
    input: &'a [u8],
    pos: usize,
    line: usize,
}

fn is_delimiter(b: u8) -> bool {
    b.is_ascii_whitespace() || matches!(b, b'{' | b'}' | b'(' | b')' | b'[' | b']' | b';' | b'"')
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0, line: 1 }
    }

    pub fn line(&self) -> usize {
        self.line
    }

    fn error(&self, message: impl Into<String>) -> FoamError {
        FoamError::Parse { line: self.line, message: message.into() }
    }

    fn peek_byte(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    fn skip_trivia(&mut self) -> Result<()> {
        while let Some(b) = self.peek_byte(0) {
            match b {
                b'\n' => {
                    self.line += 1;
                    self.pos += 1;
                }
                _ if b.is_ascii_whitespace() => self.pos += 1,
                b'/' if self.peek_byte(1) == Some(b'/') => {
                    while let Some(c) = self.peek_byte(0) {
                        if c == b'\n' {
                            break;
                        }
                        self.pos += 1;
                    }
                }
                b'/' if self.peek_byte(1) == Some(b'*') => {
                    let start_line = self.line;
                    self.pos += 2;
                    loop {
                        match self.peek_byte(0) {
                            None => {
                                return Err(FoamError::Parse {
                                    line: start_line,
                                    message: "Unterminated block comment".to_string(),
                                })
                            }
                            Some(b'*') if self.peek_byte(1) == Some(b'/') => {
                                self.pos += 2;
                                break;
                            }
                            Some(c) => {
                                if c == b'\n' {
                                    self.line += 1;
                                }
                                self.pos += 1;
                            }
                        }
                    }
                }
                _ => break,
            }
        }
        Ok(())
    }

    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_trivia()?;
        let line = self.line;
        let Some(b) = self.peek_byte(0) else {
            return Ok(Token { kind: TokenKind::Eof, line });
        };

        let punct = match b {
            b'{' => Some(TokenKind::LBrace),
            b'}' => Some(TokenKind::RBrace),
            b'(' => Some(TokenKind::LParen),
            b')' => Some(TokenKind::RParen),
            b'[' => Some(TokenKind::LBracket),
            b']' => Some(TokenKind::RBracket),
            b';' => Some(TokenKind::Semicolon),
            _ => None,
        };
        if let Some(kind) = punct {
            self.pos += 1;
            return Ok(Token { kind, line });
        }

        if b == b'"' {
            self.pos += 1;
            let mut text = Vec::new();
            loop {
                match self.peek_byte(0) {
                    None => {
                        return Err(FoamError::Parse {
                            line,
                            message: "Unterminated string".to_string(),
                        })
                    }
                    Some(b'"') => {
                        self.pos += 1;
                        break;
                    }
                    Some(b'\\') if self.peek_byte(1) == Some(b'"') => {
                        text.push(b'"');
                        self.pos += 2;
                    }
                    Some(c) => {
                        if c == b'\n' {
                            self.line += 1;
                        }
                        text.push(c);
                        self.pos += 1;
                    }
                }
            }
            let text = String::from_utf8_lossy(&text).into_owned();
            return Ok(Token { kind: TokenKind::Str(text), line });
        }

        let start = self.pos;
        while let Some(c) = self.peek_byte(0) {
            if is_delimiter(c) {
                break;
            }
            self.pos += 1;
        }
        let word = String::from_utf8_lossy(&self.input[start..self.pos]).into_owned();
        Ok(Token { kind: TokenKind::Word(word), line })
    }

    /// Consumes exactly `len` raw bytes from the current position.
    pub fn take_raw(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self.pos.checked_add(len).filter(|&end| end <= self.input.len()).ok_or_else(|| {
            self.error(format!(
                "Binary block of {} bytes runs past end of input ({} bytes left)",
                len,
                self.input.len() - self.pos
            ))
        })?;
        let raw = &self.input[self.pos..end];
        self.pos = end;
        Ok(raw)
    }
}
