//! Hand-written lexer turning source text into the token stream consumed by
//! `tir-parser`. Out of scope for the parser core per spec §1, but a
//! complete crate needs one; kept deliberately small relative to the parser.

use tir_common::{DataType, Span};

use crate::token::{Attribute, IdentifierKind, Keyword, Opcode, Punct, Token, TokenKind};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LexError {
    pub message: String,
    pub span: Span,
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for LexError {}

pub struct Lexer<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        Lexer {
            source,
            bytes: source.as_bytes(),
            pos: 0,
        }
    }

    /// Tokenize the entire source, returning a token stream terminated by
    /// `TokenKind::Eof`.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_non_newline_whitespace_and_comments();
            let start = self.pos;
            let Some(c) = self.peek_char() else {
                tokens.push(Token::new(TokenKind::Eof, Span::at(start as u32)));
                break;
            };
            let kind = match c {
                '\n' => {
                    self.pos += 1;
                    TokenKind::Newline
                }
                '\r' => {
                    self.pos += 1;
                    if self.peek_char() == Some('\n') {
                        self.pos += 1;
                    }
                    TokenKind::Newline
                }
                ',' => self.single(Punct::Comma),
                ';' => self.single(Punct::Semicolon),
                ':' => self.single(Punct::Colon),
                '=' => self.single(Punct::Equal),
                '*' => self.single(Punct::Star),
                '(' => self.single(Punct::LParen),
                ')' => self.single(Punct::RParen),
                '[' => self.single(Punct::LBracket),
                ']' => self.single(Punct::RBracket),
                '{' => self.single(Punct::LBrace),
                '}' => self.single(Punct::RBrace),
                '<' => self.single(Punct::LAngle),
                '>' => self.single(Punct::RAngle),
                '-' if self.bytes.get(self.pos + 1) == Some(&b'>') => {
                    self.pos += 2;
                    TokenKind::Punct(Punct::Arrow)
                }
                '-' if self.bytes.get(self.pos + 1).is_some_and(u8::is_ascii_digit) => {
                    self.lex_number()?
                }
                '"' => self.lex_string()?,
                '@' => self.lex_sigil_identifier(IdentifierKind::Global, start)?,
                '\'' => self.lex_sigil_identifier(IdentifierKind::BasicBlock, start)?,
                '%' => self.lex_percent_identifier(start)?,
                '#' => self.lex_hash(start)?,
                // Always a standalone single-character token, never merged
                // into a longer word: lets `4x4xf32` tokenize as
                // `4`, `x`, `4`, `x`, `f32` without whitespace (spec §4.4).
                // No keyword, opcode, attribute, or data type begins with
                // `x`, so this never shadows a real word.
                'x' => {
                    self.pos += 1;
                    TokenKind::Keyword(Keyword::X)
                }
                c if c.is_ascii_digit() => self.lex_number()?,
                c if c.is_ascii_alphabetic() || c == '_' => self.lex_word(start)?,
                other => {
                    return Err(LexError {
                        message: format!("unexpected character '{other}'"),
                        span: Span::from_len(start as u32, other.len_utf8() as u32),
                    });
                }
            };
            let end = self.pos;
            tokens.push(Token::new(kind, Span::new(start as u32, end as u32)));
        }
        Ok(tokens)
    }

    fn single(&mut self, p: Punct) -> TokenKind {
        self.pos += 1;
        TokenKind::Punct(p)
    }

    fn peek_char(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn skip_non_newline_whitespace_and_comments(&mut self) {
        loop {
            match self.peek_char() {
                Some(' ') | Some('\t') => self.pos += 1,
                Some('/') if self.bytes.get(self.pos + 1) == Some(&b'/') => {
                    while let Some(c) = self.peek_char() {
                        if c == '\n' {
                            break;
                        }
                        self.pos += c.len_utf8();
                    }
                }
                _ => break,
            }
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek_char() {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        &self.source[start..self.pos]
    }

    fn lex_number(&mut self) -> Result<TokenKind, LexError> {
        let start = self.pos;
        if self.peek_char() == Some('-') {
            self.pos += 1;
        }
        self.take_while(|c| c.is_ascii_digit());
        let mut is_float = false;
        if self.peek_char() == Some('.')
            && self
                .bytes
                .get(self.pos + 1)
                .is_some_and(u8::is_ascii_digit)
        {
            is_float = true;
            self.pos += 1;
            self.take_while(|c| c.is_ascii_digit());
        }
        if matches!(self.peek_char(), Some('e') | Some('E')) {
            let save = self.pos;
            self.pos += 1;
            if matches!(self.peek_char(), Some('+') | Some('-')) {
                self.pos += 1;
            }
            if self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
                is_float = true;
                self.take_while(|c| c.is_ascii_digit());
            } else {
                self.pos = save;
            }
        }
        let text = &self.source[start..self.pos];
        if is_float {
            text.parse::<f64>()
                .map(TokenKind::Float)
                .map_err(|_| LexError {
                    message: format!("invalid float literal '{text}'"),
                    span: Span::new(start as u32, self.pos as u32),
                })
        } else {
            text.parse::<i64>()
                .map(TokenKind::Integer)
                .map_err(|_| LexError {
                    message: format!("invalid integer literal '{text}'"),
                    span: Span::new(start as u32, self.pos as u32),
                })
        }
    }

    fn lex_string(&mut self) -> Result<TokenKind, LexError> {
        let start = self.pos;
        self.pos += 1; // opening quote
        let mut value = String::new();
        loop {
            match self.peek_char() {
                None | Some('\n') => {
                    return Err(LexError {
                        message: "unterminated string literal".to_string(),
                        span: Span::new(start as u32, self.pos as u32),
                    });
                }
                Some('"') => {
                    self.pos += 1;
                    break;
                }
                Some('\\') => {
                    self.pos += 1;
                    match self.peek_char() {
                        Some('n') => {
                            value.push('\n');
                            self.pos += 1;
                        }
                        Some('t') => {
                            value.push('\t');
                            self.pos += 1;
                        }
                        Some('"') => {
                            value.push('"');
                            self.pos += 1;
                        }
                        Some('\\') => {
                            value.push('\\');
                            self.pos += 1;
                        }
                        Some(other) => {
                            value.push(other);
                            self.pos += other.len_utf8();
                        }
                        None => {
                            return Err(LexError {
                                message: "unterminated escape sequence".to_string(),
                                span: Span::new(start as u32, self.pos as u32),
                            });
                        }
                    }
                }
                Some(c) => {
                    value.push(c);
                    self.pos += c.len_utf8();
                }
            }
        }
        Ok(TokenKind::StringLiteral(value))
    }

    /// `@name` or `'name`: the kind is fixed by the sigil alone.
    fn lex_sigil_identifier(
        &mut self,
        kind: IdentifierKind,
        start: usize,
    ) -> Result<TokenKind, LexError> {
        self.pos += 1; // sigil
        let name = self.take_while(|c| c.is_ascii_alphanumeric() || c == '_');
        if name.is_empty() {
            return Err(LexError {
                message: "expected a name after sigil".to_string(),
                span: Span::new(start as u32, self.pos as u32),
            });
        }
        Ok(TokenKind::Identifier {
            kind,
            name: name.to_string(),
        })
    }

    /// `%name`: `Temporary` if the name starts lowercase, `Type` if it
    /// starts uppercase (see `SPEC_FULL.md` / `DESIGN.md` for this
    /// resolution of an otherwise-unspecified lexical ambiguity).
    fn lex_percent_identifier(&mut self, start: usize) -> Result<TokenKind, LexError> {
        self.pos += 1;
        let name = self.take_while(|c| c.is_ascii_alphanumeric() || c == '_');
        if name.is_empty() {
            return Err(LexError {
                message: "expected a name after '%'".to_string(),
                span: Span::new(start as u32, self.pos as u32),
            });
        }
        let kind = if name.chars().next().is_some_and(|c| c.is_ascii_uppercase()) {
            IdentifierKind::Type
        } else {
            IdentifierKind::Temporary
        };
        Ok(TokenKind::Identifier {
            kind,
            name: name.to_string(),
        })
    }

    /// `#name` (a record key) or `#bbIndex.instIndex` (an anonymous
    /// identifier), disambiguated by whether a digit follows the `#`.
    fn lex_hash(&mut self, start: usize) -> Result<TokenKind, LexError> {
        self.pos += 1;
        if self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
            let bb_text = self.take_while(|c| c.is_ascii_digit());
            let bb_index: u32 = bb_text.parse().map_err(|_| LexError {
                message: "anonymous identifier block index overflow".to_string(),
                span: Span::new(start as u32, self.pos as u32),
            })?;
            if self.peek_char() != Some('.') {
                return Err(LexError {
                    message: "expected '.' in anonymous identifier '#bb.inst'".to_string(),
                    span: Span::new(start as u32, self.pos as u32),
                });
            }
            self.pos += 1;
            let inst_start = self.pos;
            let inst_text = self.take_while(|c| c.is_ascii_digit());
            if inst_text.is_empty() {
                return Err(LexError {
                    message: "expected an instruction index after '.'".to_string(),
                    span: Span::new(inst_start as u32, self.pos as u32),
                });
            }
            let inst_index: u32 = inst_text.parse().map_err(|_| LexError {
                message: "anonymous identifier instruction index overflow".to_string(),
                span: Span::new(start as u32, self.pos as u32),
            })?;
            Ok(TokenKind::AnonymousIdentifier {
                bb_index,
                inst_index,
            })
        } else {
            let name = self.take_while(|c| c.is_ascii_alphanumeric() || c == '_');
            if name.is_empty() {
                return Err(LexError {
                    message: "expected a name or digit after '#'".to_string(),
                    span: Span::new(start as u32, self.pos as u32),
                });
            }
            Ok(TokenKind::Identifier {
                kind: IdentifierKind::Key,
                name: name.to_string(),
            })
        }
    }

    fn lex_word(&mut self, start: usize) -> Result<TokenKind, LexError> {
        let word = self.take_while(|c| c.is_ascii_alphanumeric() || c == '_');
        if let Some(kw) = Keyword::from_word(word) {
            return Ok(TokenKind::Keyword(kw));
        }
        if let Some(dt) = DataType::from_keyword(word) {
            return Ok(TokenKind::DataType(dt));
        }
        if let Some(op) = Opcode::from_word(word) {
            return Ok(TokenKind::Opcode(op));
        }
        if let Some(attr) = Attribute::from_word(word) {
            return Ok(TokenKind::Attribute(attr));
        }
        Err(LexError {
            message: format!("unrecognized word '{word}'"),
            span: Span::new(start as u32, self.pos as u32),
        })
    }
}

/// Convenience entry point.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).tokenize()
}
