//! Symbol table (spec §4.2): four name→entity mappings, consistent with
//! `tsz-binder::state`'s pervasive use of `FxHashMap` for every name→entity
//! table (see `SPEC_FULL.md`).

use rustc_hash::FxHashMap;
use tir_common::Span;

use crate::ast::{Type, ValueRef};
use crate::error::{ParseError, ParseResult};

#[derive(Clone, Debug)]
pub struct GlobalEntry {
    pub value: ValueRef,
    pub ty: Type,
}

#[derive(Clone, Debug)]
pub struct LocalEntry {
    pub value: ValueRef,
    pub ty: Type,
}

#[derive(Default)]
pub struct SymbolTable {
    pub globals: FxHashMap<String, GlobalEntry>,
    pub locals: FxHashMap<String, LocalEntry>,
    pub basic_blocks: FxHashMap<String, usize>,
    pub nominal_types: FxHashMap<String, Type>,
}

impl SymbolTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_global(&mut self, name: &str, entry: GlobalEntry, span: Span) -> ParseResult<()> {
        if self.globals.contains_key(name) {
            return Err(ParseError::RedefinedIdentifier {
                name: name.to_string(),
                span,
            });
        }
        self.globals.insert(name.to_string(), entry);
        Ok(())
    }

    pub fn lookup_global(&self, name: &str, span: Span) -> ParseResult<&GlobalEntry> {
        self.globals
            .get(name)
            .ok_or_else(|| ParseError::UndefinedIdentifier {
                name: name.to_string(),
                span,
            })
    }

    pub fn insert_local(&mut self, name: &str, entry: LocalEntry, span: Span) -> ParseResult<()> {
        if self.locals.contains_key(name) {
            return Err(ParseError::RedefinedIdentifier {
                name: name.to_string(),
                span,
            });
        }
        self.locals.insert(name.to_string(), entry);
        Ok(())
    }

    pub fn lookup_local(&self, name: &str, span: Span) -> ParseResult<&LocalEntry> {
        self.locals
            .get(name)
            .ok_or_else(|| ParseError::UndefinedIdentifier {
                name: name.to_string(),
                span,
            })
    }

    pub fn insert_basic_block(&mut self, name: &str, index: usize, span: Span) -> ParseResult<()> {
        if self.basic_blocks.contains_key(name) {
            return Err(ParseError::RedefinedIdentifier {
                name: name.to_string(),
                span,
            });
        }
        self.basic_blocks.insert(name.to_string(), index);
        Ok(())
    }

    pub fn lookup_basic_block(&self, name: &str, span: Span) -> ParseResult<usize> {
        self.basic_blocks
            .get(name)
            .copied()
            .ok_or_else(|| ParseError::UndefinedIdentifier {
                name: name.to_string(),
                span,
            })
    }

    pub fn insert_nominal_type(&mut self, name: &str, ty: Type, span: Span) -> ParseResult<()> {
        if self.nominal_types.contains_key(name) {
            return Err(ParseError::RedefinedIdentifier {
                name: name.to_string(),
                span,
            });
        }
        self.nominal_types.insert(name.to_string(), ty);
        Ok(())
    }

    pub fn lookup_nominal_type(&self, name: &str, span: Span) -> ParseResult<&Type> {
        self.nominal_types
            .get(name)
            .ok_or_else(|| ParseError::UndefinedNominalType {
                name: name.to_string(),
                span,
            })
    }

    /// Clears the function-scoped mappings (spec §4.2: "`locals` and
    /// `basic_blocks` are cleared at the end of each function").
    pub fn clear_function_scope(&mut self) {
        self.locals.clear();
        self.basic_blocks.clear();
    }
}
