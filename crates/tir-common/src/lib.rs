//! Common types shared by the tir scanner and parser.
//!
//! - Source spans (`Span`)
//! - Line/column rendering (`Position`, `Range`, `LineMap`) for diagnostics
//! - Primitive data types and tensor shapes (`DataType`, `TensorShape`)
//! - Centralized recursion/capacity limits

pub mod datatype;
pub mod limits;
pub mod position;
pub mod span;

pub use datatype::{DataType, TensorShape};
pub use position::{LineMap, Position, Range};
pub use span::Span;
