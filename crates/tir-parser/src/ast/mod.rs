//! The typed in-memory IR module produced by `Parser::parse_module` (spec
//! §3).

pub mod module;
pub mod types;
pub mod value;

pub use module::{
    Argument, AttributeValue, BasicBlock, BranchTarget, DeclarationKind, Function, Instruction,
    InstructionKind, Module, Stage,
};
pub use types::{Record, RecordId, Type, TypeAlias, TypeAliasId};
pub use value::{ElementKey, Literal, ReductionCombinator, ScalarValue, Use, UseKind, ValueRef};
