//! A hand-written recursive-descent parser and type-checker for `tir`'s
//! textual SSA module format (spec §1–§9): tokens in, a typed `Module` AST
//! out, or the first `ParseError` the closed taxonomy names.
//!
//! ```text
//! let tokens = tir_scanner::tokenize(source)?;
//! let module = tir_parser::Parser::from_tokens(&tokens).parse_module()?;
//! ```

pub mod ast;
mod cursor;
pub mod error;
mod parser;
mod symbols;

pub use error::{ParseError, ParseResult};
pub use parser::Parser;

/// Tokenizes `source` and parses it into a `Module`, surfacing a lex error
/// (wrapped as `ParseError::UnexpectedToken` at the lexer's reported span)
/// or the first parse error encountered.
pub fn parse(source: &str) -> Result<ast::Module, ParseError> {
    let tokens = tir_scanner::tokenize(source).map_err(|e| ParseError::UnexpectedToken {
        expected: "valid source text".to_string(),
        found: e.message,
        span: e.span,
    })?;
    Parser::from_tokens(&tokens).parse_module()
}
