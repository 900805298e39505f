//! Literal and use parser (spec §4.5).
//!
//! ```text
//! literal := scalar_literal | 'null' | 'undefined' | 'zero'
//!          | '[' use_list ']' | '(' use_list ')' | '<' use_list '>'
//!          | '{' key '=' use (',' key '=' use)* '}'
//! use := identifier(global|temporary) type_signature
//!      | anonymous_identifier type_signature
//!      | literal type_signature
//! key := int | identifier(key) | use
//! ```
//!
//! A `use` always carries an explicit `: type` signature, checked against
//! the referent's resolved type (an identifier's symbol-table entry, or an
//! anonymous identifier's positional slot).

use tir_common::Span;
use tir_scanner::{IdentifierKind, Keyword, Punct, TokenKind};

use super::Parser;
use crate::ast::{ElementKey, Literal, ReductionCombinator, ScalarValue, Use};
use crate::error::{ParseError, ParseResult};

impl<'a> Parser<'a> {
    /// `literal` (spec §4.5), recursion-guarded the same way `parse_type`
    /// is: a literal's aggregate forms (`array`/`tuple`/`tensor`/`record`)
    /// nest through further uses, which themselves may be literals.
    pub(super) fn parse_literal(&mut self) -> ParseResult<(Literal, Span)> {
        if self.literal_depth >= tir_common::limits::MAX_LITERAL_NESTING_DEPTH {
            return Err(ParseError::UnexpectedToken {
                expected: "a less deeply nested literal".to_string(),
                found: "a literal".to_string(),
                span: self.cursor.span(),
            });
        }
        self.literal_depth += 1;
        let result = self.parse_literal_inner();
        self.literal_depth -= 1;
        result
    }

    fn parse_literal_inner(&mut self) -> ParseResult<(Literal, Span)> {
        if self.cursor.is_eof() {
            return Err(ParseError::UnexpectedEndOfInput {
                expected: "a literal".to_string(),
                span: self.cursor.span(),
            });
        }
        let start = self.cursor.span();
        match self.cursor.peek().kind.clone() {
            TokenKind::Integer(v) => {
                self.cursor.advance();
                Ok((Literal::Scalar(ScalarValue::Int(v)), start))
            }
            TokenKind::Float(v) => {
                self.cursor.advance();
                Ok((Literal::Scalar(ScalarValue::Float(v)), start))
            }
            TokenKind::Keyword(Keyword::True) => {
                self.cursor.advance();
                Ok((Literal::Scalar(ScalarValue::Bool(true)), start))
            }
            TokenKind::Keyword(Keyword::False) => {
                self.cursor.advance();
                Ok((Literal::Scalar(ScalarValue::Bool(false)), start))
            }
            TokenKind::Keyword(Keyword::Null) => {
                self.cursor.advance();
                Ok((Literal::Null, start))
            }
            TokenKind::Keyword(Keyword::Undefined) => {
                self.cursor.advance();
                Ok((Literal::Undefined, start))
            }
            TokenKind::Keyword(Keyword::Zero) => {
                self.cursor.advance();
                Ok((Literal::Zero, start))
            }
            TokenKind::Punct(Punct::LBracket) => {
                self.cursor.advance();
                let values = self.parse_use_list(|k| *k == TokenKind::Punct(Punct::RBracket))?;
                let end = self.cursor.span();
                self.cursor.wrap_punct(Punct::RBracket)?;
                Ok((Literal::Array(values), start.to(end)))
            }
            TokenKind::Punct(Punct::LParen) => {
                self.cursor.advance();
                let values = self.parse_use_list(|k| *k == TokenKind::Punct(Punct::RParen))?;
                let end = self.cursor.span();
                self.cursor.wrap_punct(Punct::RParen)?;
                Ok((Literal::Tuple(values), start.to(end)))
            }
            TokenKind::Punct(Punct::LAngle) => {
                self.cursor.advance();
                let values = self.parse_use_list(|k| *k == TokenKind::Punct(Punct::RAngle))?;
                let end = self.cursor.span();
                self.cursor.wrap_punct(Punct::RAngle)?;
                Ok((Literal::Tensor(values), start.to(end)))
            }
            TokenKind::Punct(Punct::LBrace) => {
                self.cursor.advance();
                self.cursor.skip_newlines();
                let mut fields = Vec::new();
                if self.cursor.peek().kind != TokenKind::Punct(Punct::RBrace) {
                    loop {
                        let (key, _) = self.parse_identifier(IdentifierKind::Key, false)?;
                        self.cursor.wrap_punct(Punct::Equal)?;
                        let value = self.parse_use()?;
                        fields.push((key, value));
                        self.cursor.skip_newlines();
                        if self.cursor.accept_punct(Punct::Comma).is_none() {
                            break;
                        }
                        self.cursor.skip_newlines();
                    }
                }
                let end = self.cursor.span();
                self.cursor.wrap_punct(Punct::RBrace)?;
                Ok((Literal::Record(fields), start.to(end)))
            }
            _ => Err(self.cursor.unexpected("a literal")),
        }
    }

    /// `use` (spec §4.5): an identifier, an anonymous identifier, or a
    /// literal, each followed by a mandatory `type_signature` checked
    /// against the referent's resolved type.
    pub(super) fn parse_use(&mut self) -> ParseResult<Use> {
        if self.cursor.is_eof() {
            return Err(ParseError::UnexpectedEndOfInput {
                expected: "a use of a value".to_string(),
                span: self.cursor.span(),
            });
        }
        let start = self.cursor.span();
        match self.cursor.peek().kind.clone() {
            TokenKind::Identifier {
                kind: IdentifierKind::Global,
                name,
            } => {
                self.cursor.advance();
                let entry = self.symbols.lookup_global(&name, start)?;
                let resolved = entry.ty.clone();
                let value = entry.value;
                let (written, sig_span) = self.parse_type_signature()?;
                if written != resolved {
                    return Err(ParseError::TypeMismatch {
                        expected: resolved,
                        found: written,
                        span: start.to(sig_span),
                    });
                }
                Ok(Use::definition(written, value))
            }
            TokenKind::Identifier {
                kind: IdentifierKind::Temporary,
                name,
            } => {
                self.cursor.advance();
                let entry = self.symbols.lookup_local(&name, start)?;
                let resolved = entry.ty.clone();
                let value = entry.value;
                let (written, sig_span) = self.parse_type_signature()?;
                if written != resolved {
                    return Err(ParseError::TypeMismatch {
                        expected: resolved,
                        found: written,
                        span: start.to(sig_span),
                    });
                }
                Ok(Use::definition(written, value))
            }
            TokenKind::Identifier { kind, name } => Err(ParseError::UnexpectedIdentifierKind {
                expected_kind: "a global or temporary identifier".to_string(),
                found: format!("{kind:?} identifier '{name}'"),
                span: start,
            }),
            TokenKind::AnonymousIdentifier { bb_index, inst_index } => {
                self.cursor.advance();
                let (value, resolved) =
                    self.resolve_anonymous(bb_index as usize, inst_index as usize, start)?;
                let (written, sig_span) = self.parse_type_signature()?;
                if written != resolved {
                    return Err(ParseError::TypeMismatch {
                        expected: resolved,
                        found: written,
                        span: start.to(sig_span),
                    });
                }
                Ok(Use::definition(written, value))
            }
            TokenKind::Integer(_)
            | TokenKind::Float(_)
            | TokenKind::Keyword(Keyword::True)
            | TokenKind::Keyword(Keyword::False)
            | TokenKind::Keyword(Keyword::Null)
            | TokenKind::Keyword(Keyword::Undefined)
            | TokenKind::Keyword(Keyword::Zero)
            | TokenKind::Punct(Punct::LBracket)
            | TokenKind::Punct(Punct::LParen)
            | TokenKind::Punct(Punct::LAngle)
            | TokenKind::Punct(Punct::LBrace) => {
                let (literal, _) = self.parse_literal()?;
                let (written, _) = self.parse_type_signature()?;
                Ok(Use::literal(written, literal))
            }
            _ => Err(self.cursor.unexpected("a use of a value")),
        }
    }

    /// Zero or more comma-separated uses, stopping as soon as `is_end`
    /// matches the next token (the caller's closing delimiter).
    pub(super) fn parse_use_list(&mut self, is_end: impl Fn(&TokenKind) -> bool) -> ParseResult<Vec<Use>> {
        let mut uses = Vec::new();
        self.cursor.skip_newlines();
        if is_end(&self.cursor.peek().kind) {
            return Ok(uses);
        }
        loop {
            uses.push(self.parse_use()?);
            self.cursor.skip_newlines();
            if self.cursor.accept_punct(Punct::Comma).is_none() {
                break;
            }
            self.cursor.skip_newlines();
        }
        Ok(uses)
    }

    /// `key := int | identifier(key) | use` (spec §4.5), used by
    /// `extract`/`insert`/`elementPointer`.
    pub(super) fn parse_key(&mut self) -> ParseResult<ElementKey> {
        if self.cursor.is_eof() {
            return Err(ParseError::UnexpectedEndOfInput {
                expected: "a key".to_string(),
                span: self.cursor.span(),
            });
        }
        match self.cursor.peek().kind.clone() {
            TokenKind::Integer(v) => {
                self.cursor.advance();
                Ok(ElementKey::Index(v))
            }
            TokenKind::Identifier {
                kind: IdentifierKind::Key,
                name,
            } => {
                self.cursor.advance();
                Ok(ElementKey::Name(name))
            }
            _ => Ok(ElementKey::Value(self.parse_use()?)),
        }
    }

    pub(super) fn parse_key_list(&mut self) -> ParseResult<Vec<ElementKey>> {
        let mut keys = vec![self.parse_key()?];
        while self.cursor.accept_punct(Punct::Comma).is_some() {
            self.cursor.skip_newlines();
            keys.push(self.parse_key()?);
        }
        Ok(keys)
    }

    /// `combinator := binary_op(associative) | use` (spec §4.6): an
    /// associative binary operator lexes as an `Opcode` token directly, so
    /// it is tried first; anything else falls back to a function-valued
    /// `use`.
    pub(super) fn parse_combinator(&mut self) -> ParseResult<ReductionCombinator> {
        if let TokenKind::Opcode(tir_scanner::Opcode::BinaryOp(tir_scanner::BinaryOp::Associative(op))) =
            self.cursor.peek().kind
        {
            self.cursor.advance();
            return Ok(ReductionCombinator::Op(op));
        }
        Ok(ReductionCombinator::Function(self.parse_use()?))
    }

    /// Resolves `#bbIndex.instIndex` against the positional record of
    /// instructions parsed so far (spec §3, §4.5): must be inside a basic
    /// block, must name an already-parsed slot, and that slot's instruction
    /// must be unnamed and non-void.
    pub(super) fn resolve_anonymous(
        &self,
        bb_index: usize,
        inst_index: usize,
        span: Span,
    ) -> ParseResult<(crate::ast::ValueRef, crate::ast::Type)> {
        if !self.scope.in_block {
            return Err(ParseError::AnonymousIdentifierNotInLocal { span });
        }
        let current_block = self.scope.current_block;
        if bb_index > current_block {
            return Err(ParseError::InvalidAnonymousIdentifierIndex { span });
        }
        let limit = if bb_index == current_block {
            self.scope.current_inst_count
        } else {
            self.scope
                .block_instructions
                .get(bb_index)
                .map_or(0, Vec::len)
        };
        if inst_index >= limit {
            return Err(ParseError::InvalidAnonymousIdentifierIndex { span });
        }
        let (name, ty) = &self.scope.block_instructions[bb_index][inst_index];
        if name.is_some() || ty.is_void() {
            return Err(ParseError::InvalidAnonymousIdentifierIndex { span });
        }
        Ok((
            crate::ast::ValueRef::Instruction {
                block: bb_index,
                index: inst_index,
            },
            ty.clone(),
        ))
    }
}
