//! The resolved `Type` value (spec §3) and the two nominal type entities
//! (`type_aliases`, `records`) that a `named_ref` resolves to.
//!
//! Nominal references are resolved eagerly at parse time (spec §4.4: "Nominal
//! references resolve via `nominal_types`"), so the AST never carries an
//! unresolved type name — only `Type::Alias`/`Type::Record` indices into the
//! owning `Module`.

use tir_common::{DataType, TensorShape};

/// Stable index of a type alias within `Module::type_aliases`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TypeAliasId(pub usize);

/// Stable index of a record definition within `Module::records`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RecordId(pub usize);

#[derive(Clone, Debug, PartialEq)]
pub enum Type {
    Void,
    /// A scalar is represented as a tensor with the empty shape (spec §3),
    /// never as a separate variant — `Type::scalar` is the only
    /// constructor and always builds this case.
    Tensor(TensorShape, DataType),
    Array(u64, Box<Type>),
    Tuple(Vec<Type>),
    Function(Vec<Type>, Box<Type>),
    Pointer(Box<Type>),
    Alias(TypeAliasId),
    Record(RecordId),
    /// Placeholder for a function prototype's return type before the
    /// function itself has been parsed (module pre-scan, spec §4.9), and
    /// the sentinel produced by a failed type derivation (spec §4.6:
    /// "If the derived type is `invalid` ⇒ `invalid_operands`").
    Invalid,
}

impl Type {
    #[must_use]
    pub fn scalar(dt: DataType) -> Type {
        Type::Tensor(TensorShape::scalar(), dt)
    }

    #[must_use]
    pub fn is_void(&self) -> bool {
        matches!(self, Type::Void)
    }

    #[must_use]
    pub fn is_invalid(&self) -> bool {
        matches!(self, Type::Invalid)
    }

    /// Follows alias chains to the underlying structural type, the way
    /// spec §4.8 requires for the "is this canonically a function type"
    /// check on a function header. Opaque aliases (no underlying type)
    /// and records canonicalize to themselves: neither is ever a function
    /// type.
    #[must_use]
    pub fn canonical<'a>(&'a self, aliases: &'a [TypeAlias]) -> &'a Type {
        let mut current = self;
        loop {
            match current {
                Type::Alias(TypeAliasId(idx)) => match aliases.get(*idx).and_then(|a| a.underlying.as_ref()) {
                    Some(next) => current = next,
                    None => return current,
                },
                _ => return current,
            }
        }
    }

    #[must_use]
    pub fn is_function(&self, aliases: &[TypeAlias]) -> bool {
        matches!(self.canonical(aliases), Type::Function(_, _))
    }
}

/// `type %T = <type>` or `type %T = opaque` (spec §4.9).
#[derive(Clone, Debug, PartialEq)]
pub struct TypeAlias {
    pub name: String,
    /// `None` for an `opaque` alias (spec E3).
    pub underlying: Option<Type>,
}

/// `struct %S { #key: type, ... }` (spec §4.9).
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    pub name: String,
    pub fields: Vec<(String, Type)>,
}

impl Record {
    #[must_use]
    pub fn field_type(&self, key: &str) -> Option<&Type> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, t)| t)
    }
}
