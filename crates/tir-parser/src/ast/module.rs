//! `Module`, `Function`, `BasicBlock`, `Argument`, `Instruction` and the
//! per-opcode `InstructionKind` (spec §3/§4.6).
//!
//! Ownership follows spec §3 exactly: the module owns its functions, type
//! aliases and records; a function owns its basic blocks; a basic block
//! owns its arguments and instructions. Parent back-references are plain
//! indices, never pointers — there is nothing here for a borrow checker to
//! fight.

use tir_common::{DataType, Span, TensorShape};

use crate::ast::types::{Record, Type, TypeAlias};
use crate::ast::value::{ElementKey, ReductionCombinator, Use, ValueRef};
use tir_scanner::{Attribute, BinaryOp, UnaryOp};

#[derive(Clone, Debug, PartialEq)]
pub struct Module {
    pub name: String,
    pub stage: Stage,
    pub type_aliases: Vec<TypeAlias>,
    pub records: Vec<Record>,
    pub functions: Vec<Function>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Raw,
    Canonical,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Function {
    pub name: String,
    pub attributes: Vec<AttributeValue>,
    pub declaration_kind: Option<DeclarationKind>,
    pub argument_types: Vec<Type>,
    pub return_type: Type,
    pub basic_blocks: Vec<BasicBlock>,
    pub span: Span,
}

impl Function {
    /// A function is a *definition* iff `declaration_kind` is absent
    /// (spec §3).
    #[must_use]
    pub fn is_definition(&self) -> bool {
        self.declaration_kind.is_none()
    }
}

/// A parsed function attribute: bare (`@inline`) or carrying a
/// parenthesized string-literal argument list (`@export("name")`), per the
/// "attribute argument lists" supplement in `SPEC_FULL.md`.
#[derive(Clone, Debug, PartialEq)]
pub struct AttributeValue {
    pub attribute: Attribute,
    pub arguments: Vec<String>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DeclarationKind {
    External,
    Gradient {
        of: ValueRef,
        of_name: String,
        from: Option<i64>,
        wrt: Vec<i64>,
        keeping: Vec<i64>,
        seedable: bool,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct BasicBlock {
    pub name: String,
    pub arguments: Vec<Argument>,
    pub instructions: Vec<Instruction>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Argument {
    pub name: String,
    pub ty: Type,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Instruction {
    pub name: Option<String>,
    pub kind: InstructionKind,
    pub ty: Type,
    pub span: Span,
}

/// A `(basic-block, instruction)` branch target together with its
/// argument list (spec §4.6 `branch`/`conditional`).
#[derive(Clone, Debug, PartialEq)]
pub struct BranchTarget {
    pub block: usize,
    pub args: Vec<Use>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum InstructionKind {
    Branch(BranchTarget),
    Conditional {
        condition: Use,
        then_target: BranchTarget,
        else_target: BranchTarget,
    },
    Return(Option<Use>),
    DataTypeCast {
        value: Use,
        to: DataType,
    },
    Scan {
        value: Use,
        combinator: ReductionCombinator,
        dims: Vec<i64>,
    },
    Reduce {
        value: Use,
        combinator: ReductionCombinator,
        dims: Vec<i64>,
    },
    MatrixMultiply {
        lhs: Use,
        rhs: Use,
    },
    Concatenate {
        values: Vec<Use>,
        dim: i64,
    },
    Transpose(Use),
    ShapeCast {
        value: Use,
        to: TensorShape,
    },
    BitCast {
        value: Use,
        to: Type,
    },
    Extract {
        keys: Vec<ElementKey>,
        from: Use,
    },
    Insert {
        value: Use,
        into: Use,
        keys: Vec<ElementKey>,
    },
    Apply {
        callee: ValueRef,
        callee_name: String,
        args: Vec<Use>,
        written_type: Type,
    },
    AllocateStack {
        ty: Type,
        count: i64,
    },
    AllocateHeap {
        ty: Type,
        count: Use,
    },
    AllocateBox {
        ty: Type,
    },
    ProjectBox(Use),
    Retain(Use),
    Release(Use),
    Deallocate(Use),
    Load(Use),
    Store {
        value: Use,
        to: Use,
    },
    ElementPointer {
        base: Use,
        keys: Vec<ElementKey>,
    },
    Copy {
        from: Use,
        to: Use,
        count: Use,
    },
    Trap,
    BinaryOp {
        op: BinaryOp,
        lhs: Use,
        rhs: Use,
    },
    UnaryOp {
        op: UnaryOp,
        value: Use,
    },
}
