//! Token kinds produced by the lexer (spec §6).
//!
//! The lexer's job is deliberately small relative to the parser: classify
//! characters into the kinds below and attach a `Span`. All grammar-level
//! decisions (is this `x` the shape/element separator or a new dimension,
//! is this `%Foo` a type name or a temporary) are resolved once here via a
//! naming convention (see `IdentifierKind`) and never revisited by the
//! parser.

use tir_common::{DataType, Span};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Punct {
    Comma,
    Semicolon,
    Colon,
    Equal,
    Star,
    Arrow,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    LAngle,
    RAngle,
}

impl Punct {
    #[must_use]
    pub fn spelling(self) -> &'static str {
        match self {
            Punct::Comma => ",",
            Punct::Semicolon => ";",
            Punct::Colon => ":",
            Punct::Equal => "=",
            Punct::Star => "*",
            Punct::Arrow => "->",
            Punct::LParen => "(",
            Punct::RParen => ")",
            Punct::LBracket => "[",
            Punct::RBracket => "]",
            Punct::LBrace => "{",
            Punct::RBrace => "}",
            Punct::LAngle => "<",
            Punct::RAngle => ">",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Keyword {
    Module,
    Stage,
    Raw,
    Canonical,
    Func,
    Type,
    Struct,
    Extern,
    Gradient,
    From,
    Wrt,
    Keeping,
    Seedable,
    Void,
    Opaque,
    True,
    False,
    Null,
    Undefined,
    Zero,
    Then,
    Else,
    To,
    By,
    Along,
    At,
    Count,
    Scalar,
    /// The dimension/element-type separator in shape literals (`4x4xf32`,
    /// spec §4.4 `non_scalar_shape := int ('x' int)*`). Always lexed as a
    /// standalone single-character token — never merged into a longer
    /// word — since no keyword, opcode, attribute or data type in this
    /// grammar begins with `x` (see `Lexer::tokenize`'s dedicated `'x'`
    /// arm).
    X,
}

impl Keyword {
    pub const ALL: &'static [(&'static str, Keyword)] = &[
        ("module", Keyword::Module),
        ("stage", Keyword::Stage),
        ("raw", Keyword::Raw),
        ("canonical", Keyword::Canonical),
        ("func", Keyword::Func),
        ("type", Keyword::Type),
        ("struct", Keyword::Struct),
        ("extern", Keyword::Extern),
        ("gradient", Keyword::Gradient),
        ("from", Keyword::From),
        ("wrt", Keyword::Wrt),
        ("keeping", Keyword::Keeping),
        ("seedable", Keyword::Seedable),
        ("void", Keyword::Void),
        ("opaque", Keyword::Opaque),
        ("true", Keyword::True),
        ("false", Keyword::False),
        ("null", Keyword::Null),
        ("undefined", Keyword::Undefined),
        ("zero", Keyword::Zero),
        ("then", Keyword::Then),
        ("else", Keyword::Else),
        ("to", Keyword::To),
        ("by", Keyword::By),
        ("along", Keyword::Along),
        ("at", Keyword::At),
        ("count", Keyword::Count),
        ("scalar", Keyword::Scalar),
        ("x", Keyword::X),
    ];

    #[must_use]
    pub fn from_word(s: &str) -> Option<Keyword> {
        Self::ALL.iter().find(|(kw, _)| *kw == s).map(|(_, k)| *k)
    }
}

/// Associative binary operators: valid both as a general `binaryOp` opcode
/// and as a `scan`/`reduce` built-in combinator (spec §4.6).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AssociativeBinaryOp {
    Add,
    Multiply,
    And,
    Or,
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    Min,
    Max,
}

impl AssociativeBinaryOp {
    pub const ALL: &'static [(&'static str, AssociativeBinaryOp)] = &[
        ("add", AssociativeBinaryOp::Add),
        ("multiply", AssociativeBinaryOp::Multiply),
        ("and", AssociativeBinaryOp::And),
        ("or", AssociativeBinaryOp::Or),
        ("bitwiseAnd", AssociativeBinaryOp::BitwiseAnd),
        ("bitwiseOr", AssociativeBinaryOp::BitwiseOr),
        ("bitwiseXor", AssociativeBinaryOp::BitwiseXor),
        ("min", AssociativeBinaryOp::Min),
        ("max", AssociativeBinaryOp::Max),
    ];
}

/// Non-associative binary operators: valid only as a general `binaryOp`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NonAssociativeBinaryOp {
    Subtract,
    Divide,
    Modulo,
    Power,
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    ShiftLeft,
    ShiftRight,
}

impl NonAssociativeBinaryOp {
    pub const ALL: &'static [(&'static str, NonAssociativeBinaryOp)] = &[
        ("subtract", NonAssociativeBinaryOp::Subtract),
        ("divide", NonAssociativeBinaryOp::Divide),
        ("modulo", NonAssociativeBinaryOp::Modulo),
        ("power", NonAssociativeBinaryOp::Power),
        ("equal", NonAssociativeBinaryOp::Equal),
        ("notEqual", NonAssociativeBinaryOp::NotEqual),
        ("lessThan", NonAssociativeBinaryOp::LessThan),
        (
            "lessThanOrEqual",
            NonAssociativeBinaryOp::LessThanOrEqual,
        ),
        ("greaterThan", NonAssociativeBinaryOp::GreaterThan),
        (
            "greaterThanOrEqual",
            NonAssociativeBinaryOp::GreaterThanOrEqual,
        ),
        ("shiftLeft", NonAssociativeBinaryOp::ShiftLeft),
        ("shiftRight", NonAssociativeBinaryOp::ShiftRight),
    ];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Associative(AssociativeBinaryOp),
    NonAssociative(NonAssociativeBinaryOp),
}

impl BinaryOp {
    #[must_use]
    pub fn from_word(s: &str) -> Option<BinaryOp> {
        if let Some((_, op)) = AssociativeBinaryOp::ALL.iter().find(|(kw, _)| *kw == s) {
            return Some(BinaryOp::Associative(*op));
        }
        if let Some((_, op)) = NonAssociativeBinaryOp::ALL.iter().find(|(kw, _)| *kw == s) {
            return Some(BinaryOp::NonAssociative(*op));
        }
        None
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Negate,
    LogicalNot,
    BitwiseNot,
    Absolute,
    Exp,
    Log,
    Sqrt,
    Sin,
    Cos,
    Tanh,
    Sigmoid,
    Relu,
    Floor,
    Ceil,
    Round,
}

impl UnaryOp {
    pub const ALL: &'static [(&'static str, UnaryOp)] = &[
        ("negate", UnaryOp::Negate),
        ("logicalNot", UnaryOp::LogicalNot),
        ("bitwiseNot", UnaryOp::BitwiseNot),
        ("absolute", UnaryOp::Absolute),
        ("exp", UnaryOp::Exp),
        ("log", UnaryOp::Log),
        ("sqrt", UnaryOp::Sqrt),
        ("sin", UnaryOp::Sin),
        ("cos", UnaryOp::Cos),
        ("tanh", UnaryOp::Tanh),
        ("sigmoid", UnaryOp::Sigmoid),
        ("relu", UnaryOp::Relu),
        ("floor", UnaryOp::Floor),
        ("ceil", UnaryOp::Ceil),
        ("round", UnaryOp::Round),
    ];

    #[must_use]
    pub fn from_word(s: &str) -> Option<UnaryOp> {
        Self::ALL.iter().find(|(kw, _)| *kw == s).map(|(_, op)| *op)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Opcode {
    Branch,
    Conditional,
    Return,
    DataTypeCast,
    Scan,
    Reduce,
    MatrixMultiply,
    Concatenate,
    Transpose,
    ShapeCast,
    BitCast,
    Extract,
    Insert,
    Apply,
    AllocateStack,
    AllocateHeap,
    AllocateBox,
    ProjectBox,
    Retain,
    Release,
    Deallocate,
    Load,
    Store,
    ElementPointer,
    Copy,
    Trap,
    BinaryOp(BinaryOp),
    UnaryOp(UnaryOp),
}

impl Opcode {
    #[must_use]
    pub fn from_word(s: &str) -> Option<Opcode> {
        let simple = match s {
            "branch" => Opcode::Branch,
            "conditional" => Opcode::Conditional,
            "return" => Opcode::Return,
            "dataTypeCast" => Opcode::DataTypeCast,
            "scan" => Opcode::Scan,
            "reduce" => Opcode::Reduce,
            "matrixMultiply" => Opcode::MatrixMultiply,
            "concatenate" => Opcode::Concatenate,
            "transpose" => Opcode::Transpose,
            "shapeCast" => Opcode::ShapeCast,
            "bitCast" => Opcode::BitCast,
            "extract" => Opcode::Extract,
            "insert" => Opcode::Insert,
            "apply" => Opcode::Apply,
            "allocateStack" => Opcode::AllocateStack,
            "allocateHeap" => Opcode::AllocateHeap,
            "allocateBox" => Opcode::AllocateBox,
            "projectBox" => Opcode::ProjectBox,
            "retain" => Opcode::Retain,
            "release" => Opcode::Release,
            "deallocate" => Opcode::Deallocate,
            "load" => Opcode::Load,
            "store" => Opcode::Store,
            "elementPointer" => Opcode::ElementPointer,
            "copy" => Opcode::Copy,
            "trap" => Opcode::Trap,
            _ => {
                if let Some(op) = BinaryOp::from_word(s) {
                    return Some(Opcode::BinaryOp(op));
                }
                if let Some(op) = UnaryOp::from_word(s) {
                    return Some(Opcode::UnaryOp(op));
                }
                return None;
            }
        };
        Some(simple)
    }
}

/// Function attributes (spec §6: "attribute(a) — function attribute
/// tokens carrying distinct attribute identities"). The exact set is not
/// specified by the grammar beyond that; this is the reasonable closed set
/// this implementation supports (see `DESIGN.md`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Attribute {
    Inline,
    NoInline,
    Differentiable,
    ReadOnly,
    Export,
}

impl Attribute {
    pub const ALL: &'static [(&'static str, Attribute)] = &[
        ("inline", Attribute::Inline),
        ("noinline", Attribute::NoInline),
        ("differentiable", Attribute::Differentiable),
        ("readonly", Attribute::ReadOnly),
        ("export", Attribute::Export),
    ];

    #[must_use]
    pub fn from_word(s: &str) -> Option<Attribute> {
        Self::ALL.iter().find(|(kw, _)| *kw == s).map(|(_, a)| *a)
    }
}

/// Lexical kind of an `identifier` token (spec §3/§4.3/§6).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IdentifierKind {
    /// `@name` — a module-global function name.
    Global,
    /// `%name` (lowercase-leading) — a local temporary value name.
    Temporary,
    /// `'name` — a basic-block label.
    BasicBlock,
    /// `%Name` (uppercase-leading) — a nominal type or type-alias name.
    Type,
    /// `#name` (letter-leading) — a record field key.
    Key,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    Newline,
    Punct(Punct),
    Keyword(Keyword),
    Identifier { kind: IdentifierKind, name: String },
    /// `#bbIndex.instIndex`
    AnonymousIdentifier { bb_index: u32, inst_index: u32 },
    Integer(i64),
    Float(f64),
    StringLiteral(String),
    DataType(DataType),
    Opcode(Opcode),
    Attribute(Attribute),
    Eof,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    #[must_use]
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }

    #[must_use]
    pub fn is_newline(&self) -> bool {
        matches!(self.kind, TokenKind::Newline)
    }

    #[must_use]
    pub fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }
}
