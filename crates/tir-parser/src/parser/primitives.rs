//! Primitive parsers (spec §4.3): integers, data-type atoms, identifiers by
//! lexical kind, string literals, and `type_signature`.

use tir_common::{DataType, Span};
use tir_scanner::{IdentifierKind, Punct, TokenKind};

use super::Parser;
use crate::ast::Type;
use crate::error::{ParseError, ParseResult};

impl<'a> Parser<'a> {
    pub(super) fn parse_integer(&mut self) -> ParseResult<(i64, Span)> {
        if self.cursor.is_eof() {
            return Err(ParseError::UnexpectedEndOfInput {
                expected: "an integer".to_string(),
                span: self.cursor.span(),
            });
        }
        if let TokenKind::Integer(v) = self.cursor.peek().kind {
            let span = self.cursor.span();
            self.cursor.advance();
            Ok((v, span))
        } else {
            Err(self.cursor.unexpected("an integer"))
        }
    }

    pub(super) fn parse_data_type(&mut self) -> ParseResult<(DataType, Span)> {
        if self.cursor.is_eof() {
            return Err(ParseError::UnexpectedEndOfInput {
                expected: "a data type".to_string(),
                span: self.cursor.span(),
            });
        }
        if let TokenKind::DataType(dt) = self.cursor.peek().kind {
            let span = self.cursor.span();
            self.cursor.advance();
            Ok((dt, span))
        } else {
            Err(self.cursor.unexpected("a data type"))
        }
    }

    /// `identifier(kind, is_definition=false)` (spec §4.3). Validates the
    /// next token is an identifier of the requested lexical `kind` and
    /// consumes it. `is_definition` is purely documentary here: per-scope
    /// uniqueness is enforced once, by the `SymbolTable::insert_*` call the
    /// caller makes with the full entity, rather than duplicated here.
    pub(super) fn parse_identifier(
        &mut self,
        kind: IdentifierKind,
        _is_definition: bool,
    ) -> ParseResult<(String, Span)> {
        if self.cursor.is_eof() {
            return Err(ParseError::UnexpectedEndOfInput {
                expected: identifier_kind_desc(kind).to_string(),
                span: self.cursor.span(),
            });
        }
        match self.cursor.peek().kind.clone() {
            TokenKind::Identifier { kind: found, name } if found == kind => {
                let span = self.cursor.span();
                self.cursor.advance();
                Ok((name, span))
            }
            TokenKind::Identifier { kind: found, name } => Err(ParseError::UnexpectedIdentifierKind {
                expected_kind: identifier_kind_desc(kind).to_string(),
                found: format!("{} '{name}'", identifier_kind_desc(found)),
                span: self.cursor.span(),
            }),
            _ => Err(self.cursor.unexpected(identifier_kind_desc(kind))),
        }
    }

    /// `:` optional-newlines `type` (spec §4.3). Returns the written
    /// type together with the span of the whole signature (`:` through
    /// the type), used to build the "combined range" a `type_mismatch`
    /// carries (spec §4.5).
    pub(super) fn parse_type_signature(&mut self) -> ParseResult<(Type, Span)> {
        let colon = self.cursor.expect_punct(Punct::Colon)?.span;
        self.cursor.skip_newlines();
        let (ty, ty_span) = self.parse_type()?;
        Ok((ty, colon.to(ty_span)))
    }

    /// `int (',' int)*` — shared by `along`, `wrt`, and `keeping` operand
    /// lists (spec §4.6, §4.8).
    pub(super) fn parse_int_list(&mut self) -> ParseResult<Vec<i64>> {
        let mut ints = vec![self.parse_integer()?.0];
        while self.cursor.accept_punct(Punct::Comma).is_some() {
            self.cursor.skip_newlines();
            ints.push(self.parse_integer()?.0);
        }
        Ok(ints)
    }

    /// `scalar | non_scalar_shape` — `shapeCast`'s target shape (spec
    /// §4.6). Unlike the tensor-type production this is the final token
    /// of the grammar rule, so the dimension loop can be a plain greedy
    /// loop with no backtracking.
    pub(super) fn parse_shape_target(&mut self) -> ParseResult<tir_common::TensorShape> {
        if self
            .cursor
            .accept_kind(&TokenKind::Keyword(tir_scanner::Keyword::Scalar))
            .is_some()
        {
            return Ok(tir_common::TensorShape::scalar());
        }
        let mut dims = vec![u64::try_from(self.parse_integer()?.0).unwrap_or(0)];
        while self
            .cursor
            .accept_kind(&TokenKind::Keyword(tir_scanner::Keyword::X))
            .is_some()
        {
            dims.push(u64::try_from(self.parse_integer()?.0).unwrap_or(0));
        }
        Ok(tir_common::TensorShape(dims))
    }
}

fn identifier_kind_desc(kind: IdentifierKind) -> &'static str {
    match kind {
        IdentifierKind::Global => "a global ('@name')",
        IdentifierKind::Temporary => "a temporary ('%name')",
        IdentifierKind::BasicBlock => "a basic-block label (\"'name\")",
        IdentifierKind::Type => "a type name ('%Name')",
        IdentifierKind::Key => "a key ('#name')",
    }
}
