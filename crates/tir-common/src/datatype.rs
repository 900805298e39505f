//! Primitive scalar data types and tensor shapes.
//!
//! `DataType` values are produced by the lexer as `dataType(dt)` tokens
//! (spec §6) and consumed throughout the type and literal parsers.

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DataType {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F16,
    F32,
    F64,
}

impl DataType {
    /// The keyword spelling used by the scanner and recognized by
    /// `Parser::parse_data_type`.
    pub const ALL: &'static [(&'static str, DataType)] = &[
        ("bool", DataType::Bool),
        ("i8", DataType::I8),
        ("i16", DataType::I16),
        ("i32", DataType::I32),
        ("i64", DataType::I64),
        ("u8", DataType::U8),
        ("u16", DataType::U16),
        ("u32", DataType::U32),
        ("u64", DataType::U64),
        ("f16", DataType::F16),
        ("f32", DataType::F32),
        ("f64", DataType::F64),
    ];

    #[must_use]
    pub fn from_keyword(s: &str) -> Option<DataType> {
        Self::ALL.iter().find(|(kw, _)| *kw == s).map(|(_, dt)| *dt)
    }

    #[must_use]
    pub fn is_float(self) -> bool {
        matches!(self, DataType::F16 | DataType::F32 | DataType::F64)
    }

    #[must_use]
    pub fn is_bool(self) -> bool {
        matches!(self, DataType::Bool)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (kw, _) = Self::ALL.iter().find(|(_, dt)| *dt == *self).unwrap();
        f.write_str(kw)
    }
}

/// An ordered sequence of non-negative dimensions. The empty shape denotes a
/// scalar (spec §3).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct TensorShape(pub Vec<u64>);

impl TensorShape {
    #[must_use]
    pub fn scalar() -> Self {
        TensorShape(Vec::new())
    }

    #[must_use]
    pub fn is_scalar(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn rank(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for TensorShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, dim) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "x")?;
            }
            write!(f, "{dim}")?;
        }
        Ok(())
    }
}
