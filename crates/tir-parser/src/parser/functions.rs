//! Function and basic-block parser (spec §4.7, §4.8).
//!
//! ```text
//! function := attribute*  ( '[' declaration_kind ']' )?  'func' <global_id>
//!             ':' type  ( '{' basic_block+ '}' )?
//! declaration_kind := 'extern'
//!                    | 'gradient' <global_id> ('from' int)? 'wrt' int (',' int)*
//!                      ('keeping' int (',' int)*)? 'seedable'?
//! attribute := attribute_value*
//! attribute_value := attribute ( '(' string (',' string)* ')' )?
//! basic_block := <basic_block_id> ( '(' argument (',' argument)* ')' )? ':'
//!                newline+ instruction_statement*
//! ```
//!
//! The function's written type signature (after `:`) is the general type
//! grammar (spec §4.4), not a special-cased `(args) -> ret` form: a
//! function can be declared against a type alias that itself resolves to a
//! function type. Whatever is written there must be *canonically* a
//! function type (spec §4.8, §9 "is function type"); otherwise this is a
//! `not_function_type` error (spec E6).

use tir_scanner::{IdentifierKind, Keyword, Punct, TokenKind};

use super::Parser;
use crate::ast::{Argument, AttributeValue, BasicBlock, DeclarationKind, Function, Type, ValueRef};
use crate::error::{ParseError, ParseResult};
use crate::symbols::{GlobalEntry, LocalEntry};

impl<'a> Parser<'a> {
    /// `function` (spec §4.7). A function whose `declaration_kind` is
    /// present (`extern`, or a `gradient` clause) is always a declaration:
    /// a body following one is a `declaration_cannot_have_body` error.
    pub(super) fn parse_function(&mut self) -> ParseResult<()> {
        let start = self.cursor.span();
        let attributes = self.parse_attributes()?;
        let declaration_kind = self.parse_bracketed_declaration_kind()?;
        self.expect_keyword(Keyword::Func, "'func'")?;
        let (name, name_span) = self.parse_identifier(IdentifierKind::Global, true)?;

        let (written_type, type_span) = self.parse_type_signature()?;
        if !written_type.is_function(&self.module.type_aliases) {
            return Err(ParseError::NotFunctionType { span: type_span });
        }
        let Type::Function(argument_types, return_type) =
            written_type.canonical(&self.module.type_aliases).clone()
        else {
            unreachable!("is_function just confirmed this resolves to Type::Function")
        };
        let return_type = *return_type;

        // The module pre-scan (spec §4.9) already reserved this name in
        // `globals` with a placeholder `(void...) -> invalid` signature, so
        // the function's own body can refer to itself or to functions
        // declared later in the module. Fill in the real signature now.
        let index = self.module.functions.len();
        if let Some(entry) = self.symbols.globals.get_mut(&name) {
            entry.value = ValueRef::Function(index);
            entry.ty = written_type;
        } else {
            self.symbols.insert_global(
                &name,
                GlobalEntry {
                    value: ValueRef::Function(index),
                    ty: written_type,
                },
                name_span,
            )?;
        }

        self.cursor.skip_newlines();
        let body_start = self.cursor.span();
        let has_body = self.cursor.peek().kind == TokenKind::Punct(Punct::LBrace);
        if declaration_kind.is_some() && has_body {
            return Err(ParseError::DeclarationCannotHaveBody {
                declaration_span: start,
                body_span: body_start,
            });
        }

        let mut basic_blocks = Vec::new();
        if has_body {
            self.cursor.expect_punct(Punct::LBrace)?;
            self.cursor.skip_newlines();
            self.enter_function();
            self.prescan_blocks()?;
            while is_basic_block_start(&self.cursor.peek().kind) {
                let block = self.parse_basic_block(basic_blocks.len())?;
                basic_blocks.push(block);
                self.cursor.skip_newlines();
            }
            self.exit_function();
            self.cursor.wrap_punct(Punct::RBrace)?;
        }
        let end = self.cursor.span();

        self.module.functions.push(Function {
            name,
            attributes,
            declaration_kind,
            argument_types,
            return_type,
            basic_blocks,
            span: start.to(end),
        });
        Ok(())
    }

    /// `( '[' declaration_kind ']' )?` (spec §4.8): the bracketed form
    /// that distinguishes a declaration from a definition.
    fn parse_bracketed_declaration_kind(&mut self) -> ParseResult<Option<DeclarationKind>> {
        if self.cursor.accept_punct(Punct::LBracket).is_none() {
            return Ok(None);
        }
        self.cursor.skip_newlines();
        let kind = self.parse_declaration_kind()?.ok_or_else(|| self.cursor.unexpected("'extern' or 'gradient'"))?;
        self.cursor.skip_newlines();
        self.cursor.expect_punct(Punct::RBracket)?;
        self.cursor.skip_newlines();
        Ok(Some(kind))
    }

    fn parse_declaration_kind(&mut self) -> ParseResult<Option<DeclarationKind>> {
        if self
            .cursor
            .accept_kind(&TokenKind::Keyword(Keyword::Extern))
            .is_some()
        {
            self.cursor.skip_newlines();
            return Ok(Some(DeclarationKind::External));
        }
        if self
            .cursor
            .accept_kind(&TokenKind::Keyword(Keyword::Gradient))
            .is_some()
        {
            let (of_name, of_span) = self.parse_identifier(IdentifierKind::Global, false)?;
            let of = self.symbols.lookup_global(&of_name, of_span)?.value;
            let from = if self
                .cursor
                .accept_kind(&TokenKind::Keyword(Keyword::From))
                .is_some()
            {
                Some(self.parse_integer()?.0)
            } else {
                None
            };
            self.expect_keyword(Keyword::Wrt, "'wrt'")?;
            let wrt = self.parse_int_list()?;
            let keeping = if self
                .cursor
                .accept_kind(&TokenKind::Keyword(Keyword::Keeping))
                .is_some()
            {
                self.parse_int_list()?
            } else {
                Vec::new()
            };
            let seedable = self
                .cursor
                .accept_kind(&TokenKind::Keyword(Keyword::Seedable))
                .is_some();
            self.cursor.skip_newlines();
            return Ok(Some(DeclarationKind::Gradient {
                of,
                of_name,
                from,
                wrt,
                keeping,
                seedable,
            }));
        }
        Ok(None)
    }

    /// `attribute*` (spec §4.8): zero or more bare attribute tokens, each
    /// optionally carrying a parenthesized string-literal argument list
    /// (the "attribute argument lists" supplement in `SPEC_FULL.md`). Unlike
    /// `declaration_kind`, attributes are never bracket-wrapped.
    fn parse_attributes(&mut self) -> ParseResult<Vec<AttributeValue>> {
        let mut attributes = Vec::new();
        while matches!(self.cursor.peek().kind, TokenKind::Attribute(_)) {
            attributes.push(self.parse_attribute_value()?);
            self.cursor.skip_newlines();
        }
        Ok(attributes)
    }

    fn parse_attribute_value(&mut self) -> ParseResult<AttributeValue> {
        if self.cursor.is_eof() {
            return Err(ParseError::UnexpectedEndOfInput {
                expected: "an attribute".to_string(),
                span: self.cursor.span(),
            });
        }
        let start = self.cursor.span();
        let attribute = match self.cursor.peek().kind {
            TokenKind::Attribute(a) => a,
            _ => return Err(self.cursor.unexpected("an attribute")),
        };
        self.cursor.advance();
        let mut arguments = Vec::new();
        let mut end = start;
        if self.cursor.accept_punct(Punct::LParen).is_some() {
            self.cursor.skip_newlines();
            if self.cursor.peek().kind != TokenKind::Punct(Punct::RParen) {
                loop {
                    arguments.push(self.expect_string_literal("a string literal")?);
                    self.cursor.skip_newlines();
                    if self.cursor.accept_punct(Punct::Comma).is_none() {
                        break;
                    }
                    self.cursor.skip_newlines();
                }
            }
            end = self.cursor.span();
            self.cursor.wrap_punct(Punct::RParen)?;
        }
        Ok(AttributeValue {
            attribute,
            arguments,
            span: start.to(end),
        })
    }

    /// Pre-scan (spec §4.8): every basic-block label in this function's
    /// body is registered before any instruction is parsed, the same way
    /// `prescan_functions` handles forward references to functions. Called
    /// with the cursor positioned right after the body's opening `{`; bounds
    /// itself to that brace's matching `}` by tracking nesting depth, since
    /// a `{ key = use, ... }` record literal inside an instruction also
    /// introduces `{`/`}` tokens that must not be mistaken for the body's
    /// closing brace.
    fn prescan_blocks(&mut self) -> ParseResult<()> {
        self.cursor.preserved(|cursor| {
            let mut index = 0usize;
            let mut at_line_start = true;
            let mut depth = 0u32;
            loop {
                if cursor.is_eof() {
                    break;
                }
                match &cursor.peek().kind {
                    TokenKind::Punct(Punct::LBrace) => depth += 1,
                    TokenKind::Punct(Punct::RBrace) => {
                        if depth == 0 {
                            break;
                        }
                        depth -= 1;
                    }
                    _ => {}
                }
                if at_line_start && depth == 0 {
                    if let TokenKind::Identifier {
                        kind: IdentifierKind::BasicBlock,
                        name,
                    } = cursor.peek().kind.clone()
                    {
                        let span = cursor.peek().span;
                        self.symbols.insert_basic_block(&name, index, span)?;
                        index += 1;
                    }
                }
                at_line_start = cursor.peek_is_newline();
                cursor.advance();
            }
            Ok(())
        })
    }

    fn parse_basic_block(&mut self, index: usize) -> ParseResult<BasicBlock> {
        let (name, _) = self.parse_identifier(IdentifierKind::BasicBlock, true)?;
        let mut arguments = Vec::new();
        if self.cursor.accept_punct(Punct::LParen).is_some() {
            self.cursor.skip_newlines();
            if self.cursor.peek().kind != TokenKind::Punct(Punct::RParen) {
                loop {
                    let (arg_name, arg_span) = self.parse_identifier(IdentifierKind::Temporary, true)?;
                    let (ty, _) = self.parse_type_signature()?;
                    self.symbols.insert_local(
                        &arg_name,
                        LocalEntry {
                            value: ValueRef::BlockArgument {
                                block: index,
                                index: arguments.len(),
                            },
                            ty: ty.clone(),
                        },
                        arg_span,
                    )?;
                    arguments.push(Argument { name: arg_name, ty });
                    self.cursor.skip_newlines();
                    if self.cursor.accept_punct(Punct::Comma).is_none() {
                        break;
                    }
                    self.cursor.skip_newlines();
                }
            }
            self.cursor.wrap_punct(Punct::RParen)?;
        }
        self.cursor.wrap_punct(Punct::Colon)?;
        self.cursor.skip_newlines();

        self.scope.current_block = index;
        self.scope.current_inst_count = 0;
        self.scope.in_block = true;
        self.scope.block_instructions.push(Vec::new());

        let mut instructions = Vec::new();
        while is_instruction_introducer(&self.cursor.peek().kind) {
            instructions.push(self.parse_instruction_statement()?);
            self.cursor.skip_newlines();
        }
        self.scope.in_block = false;

        Ok(BasicBlock {
            name,
            arguments,
            instructions,
        })
    }

    fn enter_function(&mut self) {
        self.scope = super::FunctionScope::default();
    }

    fn exit_function(&mut self) {
        self.symbols.clear_function_scope();
        self.scope = super::FunctionScope::default();
    }
}

fn is_basic_block_start(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Identifier {
            kind: IdentifierKind::BasicBlock,
            ..
        }
    )
}

fn is_instruction_introducer(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Identifier {
            kind: IdentifierKind::Temporary,
            ..
        } | TokenKind::AnonymousIdentifier { .. }
            | TokenKind::Opcode(_)
    )
}
