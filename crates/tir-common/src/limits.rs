//! Centralized recursion/capacity limits for the tir compiler.
//!
//! Mirrors the teacher crate's `limits.rs` in spirit: a single place to tune
//! thresholds that would otherwise be duplicated (and drift) across the
//! scanner and parser.

/// Maximum nesting depth for recursive-descent type parsing
/// (`type := ... | '(' type-list ')' ...`, `'[' int 'x' type ']'`, `'*' type`).
///
/// Each nested `type` production adds one recursive call to
/// `Parser::parse_type`; deeply nested pointer/array/tuple types would
/// otherwise overflow the stack before any other diagnostic fires.
pub const MAX_TYPE_NESTING_DEPTH: u32 = 256;

/// Maximum nesting depth for recursive-descent literal parsing
/// (`array`, `tuple`, `tensor`, `record` literals can all nest).
pub const MAX_LITERAL_NESTING_DEPTH: u32 = 256;

/// Maximum number of dimensions a tensor shape may declare.
///
/// Not a correctness requirement of the grammar itself, but a sane ceiling
/// that keeps pathological inputs (`<1x1x1x ... x1 x i32>`) from allocating
/// unbounded `Vec<u64>` shapes.
pub const MAX_TENSOR_RANK: usize = 64;
