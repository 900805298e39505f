//! Byte-offset <-> line/column conversion, used only by diagnostic rendering.
//!
//! The parser itself works exclusively in byte offsets (`Span`); converting
//! to human-readable positions is a presentation concern that lives in the
//! CLI, not the parser core.

use crate::span::Span;

/// A 1-indexed line/column position in a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

/// Maps byte offsets to line/column positions for a single source file.
#[derive(Debug, Clone)]
pub struct LineMap {
    line_starts: Vec<u32>,
}

impl LineMap {
    #[must_use]
    pub fn build(source: &str) -> Self {
        let mut line_starts = vec![0u32];
        for (i, ch) in source.char_indices() {
            if ch == '\n' {
                line_starts.push(u32::try_from(i + 1).unwrap_or(u32::MAX));
            }
        }
        Self { line_starts }
    }

    #[must_use]
    pub fn offset_to_position(&self, offset: u32) -> Position {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert_point) => insert_point.saturating_sub(1),
        };
        let line_start = self.line_starts.get(line).copied().unwrap_or(0);
        Position {
            line: u32::try_from(line).unwrap_or(u32::MAX) + 1,
            column: offset.saturating_sub(line_start) + 1,
        }
    }

    #[must_use]
    pub fn span_to_range(&self, span: Span) -> Range {
        Range {
            start: self.offset_to_position(span.start),
            end: self.offset_to_position(span.end),
        }
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// The full text of the given 0-indexed line, not including its terminator.
    #[must_use]
    pub fn line_text<'a>(&self, source: &'a str, line_index: usize) -> &'a str {
        let start = self.line_starts.get(line_index).copied().unwrap_or(0) as usize;
        let end = self
            .line_starts
            .get(line_index + 1)
            .map(|&e| e as usize - 1)
            .unwrap_or(source.len());
        source.get(start..end.max(start)).unwrap_or("")
    }
}

#[cfg(test)]
#[path = "../tests/position_tests.rs"]
mod tests;
