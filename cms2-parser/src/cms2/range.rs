//! Position and range tracking for CMS-2 sources.
//!
//! CMS-2 tooling reports everything in line/column coordinates (the language
//! predates byte-offset conventions by decades), so [`Position`] and [`Range`]
//! carry only those. Lines and columns are zero-based, matching the LSP wire
//! representation.

use std::fmt;

use serde::Serialize;

/// A line:column position in source code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A source range with start and end positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// A range covering `columns` on a single `line`.
    pub fn on_line(line: usize, start_column: usize, end_column: usize) -> Self {
        Self::new(
            Position::new(line, start_column),
            Position::new(line, end_column),
        )
    }

    /// Check if a position falls within this range (boundaries included).
    pub fn contains(&self, pos: Position) -> bool {
        (self.start.line < pos.line
            || (self.start.line == pos.line && self.start.column <= pos.column))
            && (self.end.line > pos.line
                || (self.end.line == pos.line && self.end.column >= pos.column))
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_ordering_is_line_major() {
        assert!(Position::new(1, 9) < Position::new(2, 0));
        assert!(Position::new(1, 3) < Position::new(1, 4));
    }

    #[test]
    fn range_contains_boundaries() {
        let range = Range::on_line(2, 4, 10);
        assert!(range.contains(Position::new(2, 4)));
        assert!(range.contains(Position::new(2, 10)));
        assert!(!range.contains(Position::new(2, 11)));
        assert!(!range.contains(Position::new(1, 6)));
    }

    #[test]
    fn range_contains_multiline() {
        let range = Range::new(Position::new(1, 5), Position::new(3, 2));
        assert!(range.contains(Position::new(2, 0)));
        assert!(range.contains(Position::new(2, 80)));
        assert!(!range.contains(Position::new(3, 3)));
    }

    #[test]
    fn display_formats() {
        assert_eq!(Position::new(5, 10).to_string(), "5:10");
        assert_eq!(Range::on_line(1, 0, 5).to_string(), "1:0..1:5");
    }
}
