//  SPEC.rs
//    by Kite developers
//
//  Created:
//    19 Oct 2026, 09:41:12
//  Last edited:
//    19 Oct 2026, 16:02:37
//  Auto updated?
//    Yes
//
//  Description:
//!   Defines non-tree things for the tree, such as positions in the
//!   source text ([`TextPos`]) and ranges thereof ([`TextRange`]).
//

use std::fmt::{Display, Formatter, Result as FResult};

use nom::AsBytes;
use nom_locate::LocatedSpan;
use num_traits::AsPrimitive;
use unicode_segmentation::UnicodeSegmentation as _;


/***** LIBRARY *****/
/// Defines a TextPos, which is a singular position within the source text.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TextPos {
    /// The line number of this position (i.e., the Y-coordinate). Stored as a zero-indexed number.
    pub line : usize,
    /// The column number of this position (i.e., the X-coordinate). Stored as a zero-indexed number.
    pub col  : usize,
}

impl TextPos {
    /// Constructor for the TextPos that takes a zero-indexed position.
    ///
    /// # Arguments
    /// - `line`: The line number for this position (zero-indexed).
    /// - `col`: The column number for this position (zero-indexed).
    ///
    /// # Returns
    /// A new TextPos instance that points to the given position.
    #[inline]
    pub fn new0(line: impl AsPrimitive<usize>, col: impl AsPrimitive<usize>) -> Self { Self { line: line.as_(), col: col.as_() } }

    /// Constructor for the TextPos that takes a one-indexed position.
    ///
    /// # Arguments
    /// - `line`: The line number for this position (one-indexed).
    /// - `col`: The column number for this position (one-indexed).
    ///
    /// # Returns
    /// A new TextPos instance that points to the given position.
    ///
    /// # Panics
    /// This function panics if the given `line` or `col` are `0`.
    #[inline]
    pub fn new1(line: impl AsPrimitive<usize>, col: impl AsPrimitive<usize>) -> Self { Self { line: line.as_() - 1, col: col.as_() - 1 } }

    /// Returns a TextPos that points to the beginning of the given LocatedSpan.
    ///
    /// # Arguments
    /// - `span`: The Span to take the start position of.
    ///
    /// # Returns
    /// A new TextPos that points to the start of the given span.
    #[inline]
    pub fn start_of<T: AsBytes, X>(span: &LocatedSpan<T, X>) -> Self {
        Self { line: span.location_line() as usize - 1, col: span.get_utf8_column() - 1 }
    }

    /// Returns a TextPos that points to the end of the given LocatedSpan, inclusive.
    ///
    /// Empty spans end where they start.
    ///
    /// # Arguments
    /// - `span`: The Span to take the end position of.
    ///
    /// # Returns
    /// A new TextPos that points to the last character of the given span.
    pub fn end_of<T: AsBytes, X>(span: &LocatedSpan<T, X>) -> Self {
        let mut pos: Self = Self::start_of(span);
        for c in String::from_utf8_lossy(span.fragment().as_bytes()).graphemes(true).skip(1) {
            if c == "\n" {
                pos.line += 1;
                pos.col = 0;
            } else {
                pos.col += 1;
            }
        }
        pos
    }

    /// Returns the internal line as a zero-indexed value.
    #[inline]
    pub const fn line0(&self) -> usize { self.line }
    /// Returns the internal column as a zero-indexed value.
    #[inline]
    pub const fn col0(&self) -> usize { self.col }

    /// Returns the internal line as a one-indexed value.
    #[inline]
    pub const fn line1(&self) -> usize { self.line + 1 }
    /// Returns the internal column as a one-indexed value.
    #[inline]
    pub const fn col1(&self) -> usize { self.col + 1 }
}

impl Display for TextPos {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult { write!(f, "{}:{}", self.line + 1, self.col + 1) }
}

impl<T: AsPrimitive<usize>, U: AsPrimitive<usize>> From<(T, U)> for TextPos {
    #[inline]
    fn from(value: (T, U)) -> Self { Self::new0(value.0, value.1) }
}



/// Defines TextRange, which is a continious range within the source text.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct TextRange {
    /// The start of the range, inclusive.
    pub start : TextPos,
    /// The end of the range, inclusive.
    pub end   : TextPos,
}

impl TextRange {
    /// Constructor for the TextRange.
    ///
    /// # Arguments
    /// - `start`: The start of the range, inclusive.
    /// - `end`: the end of the range, inclusive.
    ///
    /// # Returns
    /// A new TextRange that represents the range between the given positions.
    #[inline]
    pub fn new(start: impl Into<TextPos>, end: impl Into<TextPos>) -> Self { Self { start: start.into(), end: end.into() } }

    /// Constructor for a TextRange that spans exactly one character.
    ///
    /// # Arguments
    /// - `pos`: The position of the character.
    #[inline]
    pub fn single(pos: impl Into<TextPos>) -> Self {
        let pos: TextPos = pos.into();
        Self { start: pos, end: pos }
    }
}

impl Display for TextRange {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult { write!(f, "{}-{}", self.start, self.end) }
}

impl<T: AsBytes, X> From<&LocatedSpan<T, X>> for TextRange {
    #[inline]
    fn from(value: &LocatedSpan<T, X>) -> Self { Self { start: TextPos::start_of(value), end: TextPos::end_of(value) } }
}
impl<T: AsBytes, X> From<LocatedSpan<T, X>> for TextRange {
    #[inline]
    fn from(value: LocatedSpan<T, X>) -> Self { Self::from(&value) }
}
impl From<TextPos> for TextRange {
    #[inline]
    fn from(value: TextPos) -> Self { Self::single(value) }
}



/***** TESTS *****/
#[cfg(test)]
mod tests {
    use nom_locate::LocatedSpan;

    use super::*;

    #[test]
    fn test_positions_of_spans() {
        let span: LocatedSpan<&str, ()> = LocatedSpan::new("ab\ncd");
        assert_eq!(TextPos::start_of(&span), TextPos::new0(0, 0));
        assert_eq!(TextPos::end_of(&span), TextPos::new0(1, 1));
        assert_eq!(TextPos::new1(2, 2).to_string(), "2:2");
        assert_eq!(TextRange::from(&span).to_string(), "1:1-2:2");
    }
}
