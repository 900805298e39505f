//! Instruction parser (spec §4.6): one grammar production per opcode, a
//! best-effort result-type derivation per kind, and the named/anonymous/void
//! bookkeeping an instruction statement carries.
//!
//! Full tensor-algebra semantics (operand-category checking beyond arity,
//! shape broadcasting, dtype promotion) are out of scope (spec §1) — type
//! derivation here exists only to answer the two questions the grammar
//! actually needs: "can this result be named" and "what does a later `use`
//! of it resolve to". See `DESIGN.md` for which opcodes get a precise
//! derivation and which get a permissive one.

use tir_common::{DataType, TensorShape};
use tir_scanner::{BinaryOp, Keyword, NonAssociativeBinaryOp, Opcode, Punct, TokenKind};

use super::Parser;
use crate::ast::{
    BranchTarget, ElementKey, Instruction, InstructionKind, Type, Use, ValueRef,
};
use crate::error::{ParseError, ParseResult};

impl<'a> Parser<'a> {
    /// An instruction statement (spec §4.6):
    /// `<temp_id> '=' kind | <anon_slot> '=' kind | kind`.
    /// The third form is only valid when `kind`'s derived type is `void`.
    pub(super) fn parse_instruction_statement(&mut self) -> ParseResult<Instruction> {
        let start = self.cursor.span();

        enum NameForm {
            Temporary(String),
            AnonymousSlot,
            None,
        }

        let name_form = match self.cursor.peek().kind.clone() {
            TokenKind::Identifier {
                kind: tir_scanner::IdentifierKind::Temporary,
                name,
            } => {
                self.cursor.advance();
                self.cursor.wrap_punct(Punct::Equal)?;
                NameForm::Temporary(name)
            }
            TokenKind::AnonymousIdentifier { bb_index, inst_index } => {
                let slot_span = self.cursor.span();
                self.cursor.advance();
                self.cursor.wrap_punct(Punct::Equal)?;
                let current_block = self.scope.current_block as u32;
                let current_count = self.scope.current_inst_count as u32;
                if bb_index != current_block || inst_index != current_count {
                    return Err(ParseError::InvalidAnonymousIdentifierIndex { span: slot_span });
                }
                NameForm::AnonymousSlot
            }
            _ => NameForm::None,
        };

        let opcode_span = self.cursor.span();
        let kind = self.parse_instruction_kind()?;
        let ty = self.derive_type(&kind);
        if ty.is_invalid() {
            return Err(ParseError::InvalidOperands {
                opcode: instruction_opcode(&kind),
                span: opcode_span,
            });
        }

        let is_named = !matches!(name_form, NameForm::None);
        if is_named && ty.is_void() {
            return Err(ParseError::CannotNameVoidValue { span: opcode_span });
        }
        if !is_named && !ty.is_void() {
            return Err(ParseError::InvalidOperands {
                opcode: instruction_opcode(&kind),
                span: opcode_span,
            });
        }

        let name = match &name_form {
            NameForm::Temporary(n) => Some(n.clone()),
            NameForm::AnonymousSlot | NameForm::None => None,
        };

        let block = self.scope.current_block;
        let index = self.scope.current_inst_count;

        if let NameForm::Temporary(n) = &name_form {
            self.symbols.insert_local(
                n,
                crate::symbols::LocalEntry {
                    value: ValueRef::Instruction { block, index },
                    ty: ty.clone(),
                },
                start,
            )?;
        }

        self.scope.block_instructions[block].push((name.clone(), ty.clone()));
        self.scope.current_inst_count += 1;

        let end = self.cursor.span();
        Ok(Instruction {
            name,
            kind,
            ty,
            span: start.to(end),
        })
    }

    fn parse_instruction_kind(&mut self) -> ParseResult<InstructionKind> {
        if self.cursor.is_eof() {
            return Err(ParseError::UnexpectedEndOfInput {
                expected: "an opcode".to_string(),
                span: self.cursor.span(),
            });
        }
        match self.cursor.peek().kind.clone() {
            TokenKind::Opcode(opcode) => {
                self.cursor.advance();
                self.parse_opcode_body(opcode)
            }
            _ => Err(self.cursor.unexpected("an opcode")),
        }
    }

    fn parse_opcode_body(&mut self, opcode: Opcode) -> ParseResult<InstructionKind> {
        match opcode {
            Opcode::Branch => Ok(InstructionKind::Branch(self.parse_branch_target()?)),
            Opcode::Conditional => self.parse_conditional(),
            Opcode::Return => self.parse_return(),
            Opcode::DataTypeCast => self.parse_data_type_cast(),
            Opcode::Scan => {
                let (value, combinator, dims) = self.parse_scan_or_reduce()?;
                Ok(InstructionKind::Scan { value, combinator, dims })
            }
            Opcode::Reduce => {
                let (value, combinator, dims) = self.parse_scan_or_reduce()?;
                Ok(InstructionKind::Reduce { value, combinator, dims })
            }
            Opcode::MatrixMultiply => {
                let lhs = self.parse_use()?;
                self.cursor.wrap_punct(Punct::Comma)?;
                let rhs = self.parse_use()?;
                Ok(InstructionKind::MatrixMultiply { lhs, rhs })
            }
            Opcode::Concatenate => self.parse_concatenate(),
            Opcode::Transpose => Ok(InstructionKind::Transpose(self.parse_use()?)),
            Opcode::ShapeCast => {
                let value = self.parse_use()?;
                self.expect_keyword(Keyword::To, "'to'")?;
                let to = self.parse_shape_target()?;
                Ok(InstructionKind::ShapeCast { value, to })
            }
            Opcode::BitCast => {
                let value = self.parse_use()?;
                self.expect_keyword(Keyword::To, "'to'")?;
                let (to, _) = self.parse_type()?;
                Ok(InstructionKind::BitCast { value, to })
            }
            Opcode::Extract => {
                let keys = self.parse_key_list()?;
                self.expect_keyword(Keyword::From, "'from'")?;
                let from = self.parse_use()?;
                Ok(InstructionKind::Extract { keys, from })
            }
            Opcode::Insert => {
                let value = self.parse_use()?;
                self.expect_keyword(Keyword::To, "'to'")?;
                let into = self.parse_use()?;
                self.expect_keyword(Keyword::At, "'at'")?;
                let keys = self.parse_key_list()?;
                Ok(InstructionKind::Insert { value, into, keys })
            }
            Opcode::Apply => self.parse_apply(),
            Opcode::AllocateStack => {
                let (ty, _) = self.parse_type()?;
                self.expect_keyword(Keyword::Count, "'count'")?;
                let (count, _) = self.parse_integer()?;
                Ok(InstructionKind::AllocateStack { ty, count })
            }
            Opcode::AllocateHeap => {
                let (ty, _) = self.parse_type()?;
                self.expect_keyword(Keyword::Count, "'count'")?;
                let count = self.parse_use()?;
                Ok(InstructionKind::AllocateHeap { ty, count })
            }
            Opcode::AllocateBox => {
                let (ty, _) = self.parse_type()?;
                Ok(InstructionKind::AllocateBox { ty })
            }
            Opcode::ProjectBox => Ok(InstructionKind::ProjectBox(self.parse_use()?)),
            Opcode::Retain => Ok(InstructionKind::Retain(self.parse_use()?)),
            Opcode::Release => Ok(InstructionKind::Release(self.parse_use()?)),
            Opcode::Deallocate => Ok(InstructionKind::Deallocate(self.parse_use()?)),
            Opcode::Load => Ok(InstructionKind::Load(self.parse_use()?)),
            Opcode::Store => {
                let value = self.parse_use()?;
                self.expect_keyword(Keyword::To, "'to'")?;
                let to = self.parse_use()?;
                Ok(InstructionKind::Store { value, to })
            }
            Opcode::ElementPointer => {
                let base = self.parse_use()?;
                self.expect_keyword(Keyword::At, "'at'")?;
                let keys = self.parse_key_list()?;
                Ok(InstructionKind::ElementPointer { base, keys })
            }
            Opcode::Copy => {
                self.expect_keyword(Keyword::From, "'from'")?;
                let from = self.parse_use()?;
                self.expect_keyword(Keyword::To, "'to'")?;
                let to = self.parse_use()?;
                self.expect_keyword(Keyword::Count, "'count'")?;
                let count = self.parse_use()?;
                Ok(InstructionKind::Copy { from, to, count })
            }
            Opcode::Trap => Ok(InstructionKind::Trap),
            Opcode::BinaryOp(op) => {
                let lhs = self.parse_use()?;
                self.cursor.wrap_punct(Punct::Comma)?;
                let rhs = self.parse_use()?;
                Ok(InstructionKind::BinaryOp { op, lhs, rhs })
            }
            Opcode::UnaryOp(op) => Ok(InstructionKind::UnaryOp {
                op,
                value: self.parse_use()?,
            }),
        }
    }

    /// `<basic_block_id> '(' use_list ')'` (spec §4.6): shared by `branch`
    /// and both arms of `conditional`. The block name resolves through the
    /// function's own block pre-scan (spec §4.7), so forward branches work.
    fn parse_branch_target(&mut self) -> ParseResult<BranchTarget> {
        let (name, span) = self.parse_identifier(tir_scanner::IdentifierKind::BasicBlock, false)?;
        let block = self.symbols.lookup_basic_block(&name, span)?;
        self.cursor.wrap_punct(Punct::LParen)?;
        let args = self.parse_use_list(|k| *k == TokenKind::Punct(Punct::RParen))?;
        self.cursor.expect_punct(Punct::RParen)?;
        Ok(BranchTarget { block, args })
    }

    fn parse_conditional(&mut self) -> ParseResult<InstructionKind> {
        let condition = self.parse_use()?;
        self.expect_keyword(Keyword::Then, "'then'")?;
        let then_target = self.parse_branch_target()?;
        self.expect_keyword(Keyword::Else, "'else'")?;
        let else_target = self.parse_branch_target()?;
        Ok(InstructionKind::Conditional {
            condition,
            then_target,
            else_target,
        })
    }

    /// `'return' | 'return' use` (spec §4.6, §9 open question #4): the bare
    /// form is recognized by a newline immediately following `return`,
    /// checked before any further token is consumed.
    fn parse_return(&mut self) -> ParseResult<InstructionKind> {
        if self.cursor.peek_is_newline() || self.cursor.is_eof() {
            return Ok(InstructionKind::Return(None));
        }
        Ok(InstructionKind::Return(Some(self.parse_use()?)))
    }

    fn parse_data_type_cast(&mut self) -> ParseResult<InstructionKind> {
        let value = self.parse_use()?;
        self.expect_keyword(Keyword::To, "'to'")?;
        let (to, _) = self.parse_data_type()?;
        Ok(InstructionKind::DataTypeCast { value, to })
    }

    /// `use 'by' combinator 'along' int (',' int)*`, shared by `scan` and
    /// `reduce` (spec §4.6).
    fn parse_scan_or_reduce(&mut self) -> ParseResult<(Use, crate::ast::ReductionCombinator, Vec<i64>)> {
        let value = self.parse_use()?;
        self.expect_keyword(Keyword::By, "'by'")?;
        let combinator = self.parse_combinator()?;
        self.expect_keyword(Keyword::Along, "'along'")?;
        let dims = self.parse_int_list()?;
        Ok((value, combinator, dims))
    }

    fn parse_concatenate(&mut self) -> ParseResult<InstructionKind> {
        let mut values = vec![self.parse_use()?];
        while self.cursor.accept_punct(Punct::Comma).is_some() {
            self.cursor.skip_newlines();
            values.push(self.parse_use()?);
        }
        self.expect_keyword(Keyword::Along, "'along'")?;
        let (dim, _) = self.parse_integer()?;
        Ok(InstructionKind::Concatenate { values, dim })
    }

    /// `apply <global_or_temp_id> '(' use_list ')' type_signature` (spec
    /// §4.6). The callee's written type is *not* checked against its
    /// resolved prototype (spec §9 open question #1, resolved option b):
    /// `written_type` is simply carried through as the instruction's
    /// result type.
    fn parse_apply(&mut self) -> ParseResult<InstructionKind> {
        let (callee, callee_name) = self.parse_callee()?;
        self.cursor.wrap_punct(Punct::LParen)?;
        let args = self.parse_use_list(|k| *k == TokenKind::Punct(Punct::RParen))?;
        self.cursor.expect_punct(Punct::RParen)?;
        let (written_type, _) = self.parse_type_signature()?;
        Ok(InstructionKind::Apply {
            callee,
            callee_name,
            args,
            written_type,
        })
    }

    fn parse_callee(&mut self) -> ParseResult<(ValueRef, String)> {
        if self.cursor.is_eof() {
            return Err(ParseError::UnexpectedEndOfInput {
                expected: "a global or temporary identifier".to_string(),
                span: self.cursor.span(),
            });
        }
        let span = self.cursor.span();
        match self.cursor.peek().kind.clone() {
            TokenKind::Identifier {
                kind: tir_scanner::IdentifierKind::Global,
                name,
            } => {
                self.cursor.advance();
                let entry = self.symbols.lookup_global(&name, span)?;
                Ok((entry.value, name))
            }
            TokenKind::Identifier {
                kind: tir_scanner::IdentifierKind::Temporary,
                name,
            } => {
                self.cursor.advance();
                let entry = self.symbols.lookup_local(&name, span)?;
                Ok((entry.value, name))
            }
            TokenKind::Identifier { kind, name } => Err(ParseError::UnexpectedIdentifierKind {
                expected_kind: "a global or temporary identifier".to_string(),
                found: format!("{kind:?} identifier '{name}'"),
                span,
            }),
            _ => Err(self.cursor.unexpected("a global or temporary identifier")),
        }
    }

    /// Best-effort result-type derivation (see module doc comment). Returns
    /// `Type::Invalid` when the operand shapes/types rule the instruction
    /// out entirely; this surfaces as `invalid_operands` to the caller.
    fn derive_type(&self, kind: &InstructionKind) -> Type {
        match kind {
            InstructionKind::Branch(_)
            | InstructionKind::Conditional { .. }
            | InstructionKind::Return(_)
            | InstructionKind::Trap
            | InstructionKind::Store { .. }
            | InstructionKind::Copy { .. }
            | InstructionKind::Retain(_)
            | InstructionKind::Release(_)
            | InstructionKind::Deallocate(_) => Type::Void,

            InstructionKind::DataTypeCast { value, to } => match &value.ty {
                Type::Tensor(shape, _) => Type::Tensor(shape.clone(), *to),
                _ => Type::Invalid,
            },

            InstructionKind::Scan { value, .. } => value.ty.clone(),

            InstructionKind::Reduce { value, dims, .. } => match &value.ty {
                Type::Tensor(shape, dt) => {
                    let mut axes: Vec<usize> = dims.iter().filter_map(|d| usize::try_from(*d).ok()).collect();
                    axes.sort_unstable();
                    axes.dedup();
                    if axes.len() != dims.len() || axes.iter().any(|d| *d >= shape.rank()) {
                        Type::Invalid
                    } else {
                        let remaining: Vec<u64> = shape
                            .0
                            .iter()
                            .enumerate()
                            .filter(|(i, _)| !axes.contains(i))
                            .map(|(_, d)| *d)
                            .collect();
                        Type::Tensor(TensorShape(remaining), *dt)
                    }
                }
                _ => Type::Invalid,
            },

            InstructionKind::MatrixMultiply { lhs, rhs } => match (&lhs.ty, &rhs.ty) {
                (Type::Tensor(ls, ldt), Type::Tensor(rs, rdt))
                    if ls.rank() == 2 && rs.rank() == 2 && ls.0[1] == rs.0[0] && ldt == rdt =>
                {
                    Type::Tensor(TensorShape(vec![ls.0[0], rs.0[1]]), *ldt)
                }
                _ => Type::Invalid,
            },

            InstructionKind::Concatenate { values, dim } => self.concatenate_type(values, *dim),

            InstructionKind::Transpose(v) => match &v.ty {
                Type::Tensor(shape, dt) => {
                    let mut reversed = shape.0.clone();
                    reversed.reverse();
                    Type::Tensor(TensorShape(reversed), *dt)
                }
                _ => Type::Invalid,
            },

            InstructionKind::ShapeCast { value, to } => match &value.ty {
                Type::Tensor(_, dt) => Type::Tensor(to.clone(), *dt),
                _ => Type::Invalid,
            },

            InstructionKind::BitCast { to, .. } => to.clone(),

            InstructionKind::Extract { keys, from } => self.resolve_element_type(&from.ty, keys),

            InstructionKind::Insert { into, .. } => into.ty.clone(),

            InstructionKind::Apply { written_type, .. } => written_type.clone(),

            InstructionKind::AllocateStack { ty, .. }
            | InstructionKind::AllocateHeap { ty, .. }
            | InstructionKind::AllocateBox { ty } => Type::Pointer(Box::new(ty.clone())),

            InstructionKind::ProjectBox(v) => match v.ty.canonical(&self.module.type_aliases) {
                Type::Pointer(inner) => Type::Pointer(inner.clone()),
                _ => Type::Invalid,
            },

            InstructionKind::Load(v) => match v.ty.canonical(&self.module.type_aliases) {
                Type::Pointer(inner) => (**inner).clone(),
                _ => Type::Invalid,
            },

            InstructionKind::ElementPointer { base, keys } => {
                match base.ty.canonical(&self.module.type_aliases).clone() {
                    Type::Pointer(inner) => {
                        let elem = self.resolve_element_type(&inner, keys);
                        if elem.is_invalid() {
                            Type::Invalid
                        } else {
                            Type::Pointer(Box::new(elem))
                        }
                    }
                    _ => Type::Invalid,
                }
            }

            InstructionKind::BinaryOp { op, lhs, rhs } => self.binary_op_type(*op, lhs, rhs),

            InstructionKind::UnaryOp { value, .. } => value.ty.clone(),
        }
    }

    /// Walks a key chain through tuples, records and arrays, following
    /// alias indirection at each step (spec §4.6: `extract`/`insert`/
    /// `elementPointer` all index through the same aggregate structure).
    fn resolve_element_type(&self, base: &Type, keys: &[ElementKey]) -> Type {
        let mut current = base.clone();
        for key in keys {
            let canonical = current.canonical(&self.module.type_aliases).clone();
            current = match (&canonical, key) {
                (Type::Tuple(elems), ElementKey::Index(i)) => {
                    match usize::try_from(*i).ok().and_then(|i| elems.get(i)) {
                        Some(t) => t.clone(),
                        None => return Type::Invalid,
                    }
                }
                (Type::Record(id), ElementKey::Name(name)) => {
                    match self.module.records.get(id.0).and_then(|r| r.field_type(name)) {
                        Some(t) => t.clone(),
                        None => return Type::Invalid,
                    }
                }
                (Type::Array(_, elem), _) => (**elem).clone(),
                _ => return Type::Invalid,
            };
        }
        current
    }

    fn concatenate_type(&self, values: &[Use], dim: i64) -> Type {
        let Ok(dim) = usize::try_from(dim) else {
            return Type::Invalid;
        };
        let mut iter = values.iter();
        let Some(first) = iter.next() else {
            return Type::Invalid;
        };
        let Type::Tensor(first_shape, dt) = &first.ty else {
            return Type::Invalid;
        };
        if dim >= first_shape.rank() {
            return Type::Invalid;
        }
        let mut total = first_shape.0[dim];
        for v in iter {
            let Type::Tensor(shape, vdt) = &v.ty else {
                return Type::Invalid;
            };
            if vdt != dt || shape.rank() != first_shape.rank() {
                return Type::Invalid;
            }
            for (i, d) in shape.0.iter().enumerate() {
                if i != dim && *d != first_shape.0[i] {
                    return Type::Invalid;
                }
            }
            total += shape.0[dim];
        }
        let mut result_shape = first_shape.clone();
        result_shape.0[dim] = total;
        Type::Tensor(result_shape, *dt)
    }

    fn binary_op_type(&self, op: BinaryOp, lhs: &Use, rhs: &Use) -> Type {
        if lhs.ty != rhs.ty {
            return Type::Invalid;
        }
        let comparison = matches!(
            op,
            BinaryOp::NonAssociative(
                NonAssociativeBinaryOp::Equal
                    | NonAssociativeBinaryOp::NotEqual
                    | NonAssociativeBinaryOp::LessThan
                    | NonAssociativeBinaryOp::LessThanOrEqual
                    | NonAssociativeBinaryOp::GreaterThan
                    | NonAssociativeBinaryOp::GreaterThanOrEqual
            )
        );
        if comparison {
            match &lhs.ty {
                Type::Tensor(shape, _) => Type::Tensor(shape.clone(), DataType::Bool),
                _ => Type::Invalid,
            }
        } else {
            lhs.ty.clone()
        }
    }
}

fn instruction_opcode(kind: &InstructionKind) -> Opcode {
    match kind {
        InstructionKind::Branch(_) => Opcode::Branch,
        InstructionKind::Conditional { .. } => Opcode::Conditional,
        InstructionKind::Return(_) => Opcode::Return,
        InstructionKind::DataTypeCast { .. } => Opcode::DataTypeCast,
        InstructionKind::Scan { .. } => Opcode::Scan,
        InstructionKind::Reduce { .. } => Opcode::Reduce,
        InstructionKind::MatrixMultiply { .. } => Opcode::MatrixMultiply,
        InstructionKind::Concatenate { .. } => Opcode::Concatenate,
        InstructionKind::Transpose(_) => Opcode::Transpose,
        InstructionKind::ShapeCast { .. } => Opcode::ShapeCast,
        InstructionKind::BitCast { .. } => Opcode::BitCast,
        InstructionKind::Extract { .. } => Opcode::Extract,
        InstructionKind::Insert { .. } => Opcode::Insert,
        InstructionKind::Apply { .. } => Opcode::Apply,
        InstructionKind::AllocateStack { .. } => Opcode::AllocateStack,
        InstructionKind::AllocateHeap { .. } => Opcode::AllocateHeap,
        InstructionKind::AllocateBox { .. } => Opcode::AllocateBox,
        InstructionKind::ProjectBox(_) => Opcode::ProjectBox,
        InstructionKind::Retain(_) => Opcode::Retain,
        InstructionKind::Release(_) => Opcode::Release,
        InstructionKind::Deallocate(_) => Opcode::Deallocate,
        InstructionKind::Load(_) => Opcode::Load,
        InstructionKind::Store { .. } => Opcode::Store,
        InstructionKind::ElementPointer { .. } => Opcode::ElementPointer,
        InstructionKind::Copy { .. } => Opcode::Copy,
        InstructionKind::Trap => Opcode::Trap,
        InstructionKind::BinaryOp { op, .. } => Opcode::BinaryOp(*op),
        InstructionKind::UnaryOp { op, .. } => Opcode::UnaryOp(*op),
    }
}
