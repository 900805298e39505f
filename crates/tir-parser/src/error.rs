//! `ParseError` — the closed error taxonomy from spec §7.
//!
//! Plain struct/enum, hand-written `std::error::Error` impl, no derive
//! macro crate — mirrors `tsz_common::diagnostics::Diagnostic`, which is
//! likewise a plain struct rather than a `thiserror` derive.

use std::fmt;

use tir_common::Span;
use tir_scanner::Opcode;

use crate::ast::Type;

#[derive(Clone, Debug, PartialEq)]
pub enum ParseError {
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },
    UnexpectedEndOfInput {
        expected: String,
        span: Span,
    },
    UnexpectedIdentifierKind {
        expected_kind: String,
        found: String,
        span: Span,
    },
    UndefinedIdentifier {
        name: String,
        span: Span,
    },
    UndefinedNominalType {
        name: String,
        span: Span,
    },
    RedefinedIdentifier {
        name: String,
        span: Span,
    },
    TypeMismatch {
        expected: Type,
        found: Type,
        span: Span,
    },
    NotFunctionType {
        span: Span,
    },
    InvalidOperands {
        opcode: Opcode,
        span: Span,
    },
    CannotNameVoidValue {
        span: Span,
    },
    AnonymousIdentifierNotInLocal {
        span: Span,
    },
    InvalidAnonymousIdentifierIndex {
        span: Span,
    },
    DeclarationCannotHaveBody {
        declaration_span: Span,
        body_span: Span,
    },
}

impl ParseError {
    /// The primary source range to underline for this error (spec §7: "each
    /// carries a source range derived from the offending token(s)"). For
    /// the two-range `DeclarationCannotHaveBody` variant this is the body
    /// token, the more actionable of the two.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            ParseError::UnexpectedToken { span, .. }
            | ParseError::UnexpectedEndOfInput { span, .. }
            | ParseError::UnexpectedIdentifierKind { span, .. }
            | ParseError::UndefinedIdentifier { span, .. }
            | ParseError::UndefinedNominalType { span, .. }
            | ParseError::RedefinedIdentifier { span, .. }
            | ParseError::TypeMismatch { span, .. }
            | ParseError::NotFunctionType { span }
            | ParseError::InvalidOperands { span, .. }
            | ParseError::CannotNameVoidValue { span }
            | ParseError::AnonymousIdentifierNotInLocal { span }
            | ParseError::InvalidAnonymousIdentifierIndex { span } => *span,
            ParseError::DeclarationCannotHaveBody { body_span, .. } => *body_span,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnexpectedToken { expected, found, .. } => {
                write!(f, "expected {expected}, found {found}")
            }
            ParseError::UnexpectedEndOfInput { expected, .. } => {
                write!(f, "unexpected end of input, expected {expected}")
            }
            ParseError::UnexpectedIdentifierKind {
                expected_kind,
                found,
                ..
            } => write!(f, "expected {expected_kind} identifier, found {found}"),
            ParseError::UndefinedIdentifier { name, .. } => {
                write!(f, "undefined identifier '{name}'")
            }
            ParseError::UndefinedNominalType { name, .. } => {
                write!(f, "undefined type '{name}'")
            }
            ParseError::RedefinedIdentifier { name, .. } => {
                write!(f, "'{name}' is already defined in this scope")
            }
            ParseError::TypeMismatch { expected, found, .. } => write!(
                f,
                "type mismatch: expected {expected:?}, found {found:?}"
            ),
            ParseError::NotFunctionType { .. } => {
                write!(f, "function declaration's type is not a function type")
            }
            ParseError::InvalidOperands { opcode, .. } => {
                write!(f, "invalid operands for '{opcode:?}'")
            }
            ParseError::CannotNameVoidValue { .. } => {
                write!(f, "cannot name a value of type void")
            }
            ParseError::AnonymousIdentifierNotInLocal { .. } => write!(
                f,
                "an anonymous identifier may only be used inside a basic block"
            ),
            ParseError::InvalidAnonymousIdentifierIndex { .. } => {
                write!(f, "anonymous identifier does not refer to a prior instruction")
            }
            ParseError::DeclarationCannotHaveBody { .. } => {
                write!(f, "a function declaration cannot have a body")
            }
        }
    }
}

impl std::error::Error for ParseError {}

pub type ParseResult<T> = Result<T, ParseError>;
