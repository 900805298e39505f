//! Type parser (spec §4.4).
//!
//! ```text
//! type := 'void'
//!       | data_type
//!       | '[' int 'x' type ']'
//!       | '<' non_scalar_shape 'x' data_type '>'
//!       | '(' type-list ')' ( '->' type )?
//!       | type_identifier
//!       | '*' type
//! non_scalar_shape := int ('x' int)*
//! ```

use tir_common::{Span, TensorShape};
use tir_scanner::{IdentifierKind, Keyword, Punct, TokenKind};

use super::Parser;
use crate::ast::Type;
use crate::error::{ParseError, ParseResult};

impl<'a> Parser<'a> {
    pub(super) fn parse_type(&mut self) -> ParseResult<(Type, Span)> {
        if self.type_depth >= tir_common::limits::MAX_TYPE_NESTING_DEPTH {
            return Err(ParseError::UnexpectedToken {
                expected: "a less deeply nested type".to_string(),
                found: "a type".to_string(),
                span: self.cursor.span(),
            });
        }
        self.type_depth += 1;
        let result = self.parse_type_inner();
        self.type_depth -= 1;
        result
    }

    fn parse_type_inner(&mut self) -> ParseResult<(Type, Span)> {
        if self.cursor.is_eof() {
            return Err(ParseError::UnexpectedEndOfInput {
                expected: "a type".to_string(),
                span: self.cursor.span(),
            });
        }
        let start = self.cursor.span();
        match self.cursor.peek().kind.clone() {
            TokenKind::Keyword(Keyword::Void) => {
                self.cursor.advance();
                Ok((Type::Void, start))
            }
            TokenKind::DataType(dt) => {
                self.cursor.advance();
                Ok((Type::scalar(dt), start))
            }
            TokenKind::Punct(Punct::LBracket) => self.parse_array_type(start),
            TokenKind::Punct(Punct::LAngle) => self.parse_tensor_type(start),
            TokenKind::Punct(Punct::LParen) => self.parse_tuple_or_function_type(start),
            TokenKind::Punct(Punct::Star) => {
                self.cursor.advance();
                let (inner, inner_span) = self.parse_type()?;
                Ok((Type::Pointer(Box::new(inner)), start.to(inner_span)))
            }
            TokenKind::Identifier {
                kind: IdentifierKind::Type,
                name,
            } => {
                self.cursor.advance();
                let ty = self.symbols.lookup_nominal_type(&name, start)?.clone();
                Ok((ty, start))
            }
            _ => Err(self.cursor.unexpected("a type")),
        }
    }

    /// `'[' int 'x' type ']'`.
    fn parse_array_type(&mut self, start: Span) -> ParseResult<(Type, Span)> {
        self.cursor.expect_punct(Punct::LBracket)?;
        let (count, _) = self.parse_integer()?;
        self.cursor.wrap_keyword(Keyword::X)?;
        let (element, _) = self.parse_type()?;
        let end = self.cursor.span();
        self.cursor.wrap_punct(Punct::RBracket)?;
        let count = u64::try_from(count).unwrap_or(0);
        Ok((Type::Array(count, Box::new(element)), start.to(end)))
    }

    /// `'<' non_scalar_shape 'x' data_type '>'`.
    fn parse_tensor_type(&mut self, start: Span) -> ParseResult<(Type, Span)> {
        self.cursor.expect_punct(Punct::LAngle)?;
        let mut dims = Vec::new();
        let (first, _) = self.parse_integer()?;
        dims.push(u64::try_from(first).unwrap_or(0));
        loop {
            // Tensor-shape dimension continuation is greedy but
            // backtracking (spec §4.4, §5): after each 'x', if the next
            // token is not an integer, restore to before the 'x' so an
            // outer 'x' (separating the shape from the element type) is
            // still visible to this same loop's final iteration.
            let matched = self.cursor.backtracking(|cursor| {
                cursor.skip_newlines();
                if cursor.expect_kind(&TokenKind::Keyword(Keyword::X), "'x'").is_err() {
                    return Ok(None);
                }
                cursor.skip_newlines();
                match cursor.peek().kind {
                    TokenKind::Integer(v) => {
                        cursor.advance();
                        Ok(Some(u64::try_from(v).unwrap_or(0)))
                    }
                    _ => Ok(None),
                }
            })?;
            match matched {
                Some(dim) => dims.push(dim),
                None => break,
            }
            if dims.len() >= tir_common::limits::MAX_TENSOR_RANK {
                return Err(ParseError::UnexpectedToken {
                    expected: "a tensor shape within the supported rank".to_string(),
                    found: "a deeper tensor shape".to_string(),
                    span: self.cursor.span(),
                });
            }
        }
        self.cursor.wrap_keyword(Keyword::X)?;
        let (dt, _) = self.parse_data_type()?;
        let end = self.cursor.span();
        self.cursor.wrap_punct(Punct::RAngle)?;
        Ok((Type::Tensor(TensorShape(dims), dt), start.to(end)))
    }

    /// `'(' type-list ')' ( '->' type )?` — a tuple unless immediately
    /// followed by `->`, in which case a function type (spec §4.4).
    fn parse_tuple_or_function_type(&mut self, start: Span) -> ParseResult<(Type, Span)> {
        self.cursor.expect_punct(Punct::LParen)?;
        let mut elements = Vec::new();
        self.cursor.skip_newlines();
        if self.cursor.peek().kind != TokenKind::Punct(Punct::RParen) {
            loop {
                let (ty, _) = self.parse_type()?;
                elements.push(ty);
                self.cursor.skip_newlines();
                if self.cursor.accept_punct(Punct::Comma).is_none() {
                    break;
                }
                self.cursor.skip_newlines();
            }
        }
        let mut end = self.cursor.span();
        self.cursor.wrap_punct(Punct::RParen)?;
        if self.cursor.accept_punct(Punct::Arrow).is_some() {
            self.cursor.skip_newlines();
            let (ret, ret_span) = self.parse_type()?;
            end = ret_span;
            return Ok((Type::Function(elements, Box::new(ret)), start.to(end)));
        }
        Ok((Type::Tuple(elements), start.to(end)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use tir_common::DataType;

    fn parse_type(src: &str) -> Type {
        let tokens = tir_scanner::tokenize(src).expect("lex");
        let mut p = Parser::from_tokens(&tokens);
        p.parse_type().expect("parse").0
    }

    #[test]
    fn void_and_scalar() {
        assert_eq!(parse_type("void"), Type::Void);
        assert_eq!(parse_type("i32"), Type::scalar(DataType::I32));
    }

    #[test]
    fn array_type() {
        assert_eq!(
            parse_type("[4 x i32]"),
            Type::Array(4, Box::new(Type::scalar(DataType::I32)))
        );
    }

    #[test]
    fn tensor_type_no_whitespace() {
        assert_eq!(
            parse_type("<4x4xf32>"),
            Type::Tensor(TensorShape(vec![4, 4]), DataType::F32)
        );
    }

    #[test]
    fn scalar_tensor_has_empty_shape() {
        assert_eq!(
            parse_type("<4xf32>"),
            Type::Tensor(TensorShape(vec![4]), DataType::F32)
        );
    }

    #[test]
    fn tuple_vs_function_type() {
        assert_eq!(
            parse_type("(i32, i32)"),
            Type::Tuple(vec![Type::scalar(DataType::I32), Type::scalar(DataType::I32)])
        );
        assert_eq!(
            parse_type("(i32) -> i32"),
            Type::Function(
                vec![Type::scalar(DataType::I32)],
                Box::new(Type::scalar(DataType::I32))
            )
        );
    }

    #[test]
    fn pointer_type() {
        assert_eq!(
            parse_type("*i32"),
            Type::Pointer(Box::new(Type::scalar(DataType::I32)))
        );
    }
}
