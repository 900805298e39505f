//! Token cursor (spec §4.1).
//!
//! Owns an immutable token array and tracks a position into it ("rest"
//! slice per spec's wording; represented here as a plain index — cheaper
//! than a lazily-sliced `&[Token]` and avoids any aliasing concerns, per
//! the design note in spec §9).

use tir_common::Span;
use tir_scanner::{Punct, Token, TokenKind};

use crate::error::{ParseError, ParseResult};

/// An opaque snapshot of cursor position, used by `backtracking`/`preserved`
/// (spec §4.1, §5).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Mark(usize);

pub struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Cursor<'a> {
    #[must_use]
    pub fn new(tokens: &'a [Token]) -> Self {
        Cursor { tokens, pos: 0 }
    }

    fn get(&self, idx: usize) -> &'a Token {
        // The token stream is always Eof-terminated (tir_scanner::tokenize),
        // so indexing past the last real token still lands on Eof.
        self.tokens
            .get(idx)
            .unwrap_or_else(|| self.tokens.last().expect("token stream is never empty"))
    }

    #[must_use]
    pub fn peek(&self) -> &'a Token {
        self.get(self.pos)
    }

    #[must_use]
    pub fn peek_next(&self) -> &'a Token {
        self.get(self.pos + 1)
    }

    #[must_use]
    pub fn is_eof(&self) -> bool {
        self.peek().is_eof()
    }

    #[must_use]
    pub fn mark(&self) -> Mark {
        Mark(self.pos)
    }

    pub fn reset(&mut self, mark: Mark) {
        self.pos = mark.0;
    }

    /// Consumes one token unconditionally. Callers must have already
    /// checked for EOF (spec §4.1: "fails-by-contract if empty").
    pub fn advance(&mut self) -> &'a Token {
        let tok = self.get(self.pos);
        if !tok.is_eof() {
            self.pos += 1;
        }
        tok
    }

    /// Consumes and discards every immediately-following newline token.
    pub fn skip_newlines(&mut self) {
        while self.peek().is_newline() {
            self.pos += 1;
        }
    }

    #[must_use]
    pub fn peek_is_newline(&self) -> bool {
        self.peek().is_newline()
    }

    pub fn accept_kind(&mut self, kind: &TokenKind) -> Option<&'a Token> {
        if &self.peek().kind == kind {
            Some(self.advance())
        } else {
            None
        }
    }

    pub fn accept_punct(&mut self, p: Punct) -> Option<&'a Token> {
        self.accept_kind(&TokenKind::Punct(p))
    }

    pub fn expect_kind(&mut self, kind: &TokenKind, expected_desc: &str) -> ParseResult<&'a Token> {
        if self.is_eof() {
            return Err(ParseError::UnexpectedEndOfInput {
                expected: expected_desc.to_string(),
                span: self.peek().span,
            });
        }
        if &self.peek().kind == kind {
            Ok(self.advance())
        } else {
            Err(self.unexpected(expected_desc))
        }
    }

    pub fn expect_punct(&mut self, p: Punct) -> ParseResult<&'a Token> {
        self.expect_kind(&TokenKind::Punct(p), p.spelling())
    }

    /// "Consumes any newlines, expects punctuation `p`, consumes any
    /// newlines" (spec §4.1) — used wherever the grammar allows
    /// line-breaks around a token (commas, braces, arrows).
    pub fn wrap_punct(&mut self, p: Punct) -> ParseResult<&'a Token> {
        self.skip_newlines();
        let tok = self.expect_punct(p)?;
        self.skip_newlines();
        Ok(tok)
    }

    /// Same newline-wrapping as `wrap_punct`, for the one grammar keyword
    /// ('x', the shape/element-type separator) that the grammar also
    /// permits line-breaks around.
    pub fn wrap_keyword(&mut self, k: tir_scanner::Keyword) -> ParseResult<&'a Token> {
        self.skip_newlines();
        let tok = self.expect_kind(&TokenKind::Keyword(k), "'x'")?;
        self.skip_newlines();
        Ok(tok)
    }

    pub fn unexpected(&self, expected_desc: &str) -> ParseError {
        ParseError::UnexpectedToken {
            expected: expected_desc.to_string(),
            found: describe(&self.peek().kind),
            span: self.peek().span,
        }
    }

    #[must_use]
    pub fn span(&self) -> Span {
        self.peek().span
    }

    /// Runs `f`; if it returns `Ok(None)` ("absent"), restores the cursor
    /// to its pre-call position. An `Err` (hard failure) also restores the
    /// cursor before propagating, since a partially-consumed speculative
    /// parse must never leak into the caller's next attempt (spec §5: "an
    /// error propagates up unchanged"). An `Ok(Some(_))` commits.
    pub fn backtracking<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> ParseResult<Option<T>>,
    ) -> ParseResult<Option<T>> {
        let mark = self.mark();
        match f(self) {
            Ok(Some(value)) => Ok(Some(value)),
            Ok(None) => {
                self.reset(mark);
                Ok(None)
            }
            Err(e) => {
                self.reset(mark);
                Err(e)
            }
        }
    }

    /// Runs `f` for its side effects on the symbol table, then
    /// unconditionally restores the cursor position — used by the two
    /// pre-scans (spec §4.8, §4.9), which intentionally keep their symbol
    /// table inserts while always rewinding the token position.
    pub fn preserved<T>(&mut self, f: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        let mark = self.mark();
        let result = f(self);
        self.reset(mark);
        result
    }
}

fn describe(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Newline => "a newline".to_string(),
        TokenKind::Punct(p) => format!("'{}'", p.spelling()),
        TokenKind::Keyword(k) => format!("'{k:?}'"),
        TokenKind::Identifier { name, .. } => format!("identifier '{name}'"),
        TokenKind::AnonymousIdentifier {
            bb_index,
            inst_index,
        } => format!("'#{bb_index}.{inst_index}'"),
        TokenKind::Integer(i) => format!("integer '{i}'"),
        TokenKind::Float(v) => format!("float '{v}'"),
        TokenKind::StringLiteral(s) => format!("string {s:?}"),
        TokenKind::DataType(dt) => format!("data type '{dt}'"),
        TokenKind::Opcode(o) => format!("opcode '{o:?}'"),
        TokenKind::Attribute(a) => format!("attribute '{a:?}'"),
        TokenKind::Eof => "end of input".to_string(),
    }
}
