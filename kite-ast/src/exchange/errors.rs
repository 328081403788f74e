//  ERRORS.rs
//    by Kite developers
//
//  Created:
//    19 Oct 2026, 11:33:47
//  Last edited:
//    19 Oct 2026, 14:12:09
//  Auto updated?
//    Yes
//
//  Description:
//!   Defines the errors that may occur when reading the exchange format.
//

use thiserror::Error;

use crate::errors::PrettyError;
use crate::spec::{TextPos, TextRange};


/***** LIBRARY *****/
/// Defines errors that occur when reading the exchange format.
#[derive(Debug, Error)]
pub enum FormatError {
    /// A character that starts no lexeme.
    #[error("Unexpected character '{ch}'")]
    UnexpectedCharacter { ch: char, pos: TextPos },
    /// A quoted name or string that is never closed.
    #[error("Unterminated {what}")]
    Unterminated { what: &'static str, pos: TextPos },
    /// Some lexeme we did not expect here.
    #[error("Expected {expected}, found '{found}'")]
    UnexpectedToken { expected: &'static str, found: String, pos: TextPos },
    /// The text ended before the tree did.
    #[error("Expected {expected}, found end of input")]
    UnexpectedEnd { expected: &'static str, pos: TextPos },
    /// A head that is neither a known tag nor a number.
    #[error("Unknown tag '{tag}'")]
    UnknownTag { tag: String, pos: TextPos },
    /// There is text after the root group.
    #[error("Unexpected '{found}' after the end of the tree")]
    TrailingInput { found: String, pos: TextPos },
    /// The tree does not have the shape of a program.
    #[error("Malformed program: {what}")]
    Malformed { what: String, pos: TextPos },
    /// Two toplevel variables share a name.
    #[error("Redeclared global variable '{name}'")]
    DuplicateGlobal { name: String, pos: TextPos },
    /// Two functions share a name.
    #[error("Redeclared function '{name}'")]
    DuplicateFunction { name: String, pos: TextPos },
}

impl FormatError {
    /// Returns the position in the exchange text (or, for shape errors, in the original source) that this error concerns.
    pub fn pos(&self) -> TextPos {
        use FormatError::*;
        match self {
            UnexpectedCharacter { pos, .. }
            | Unterminated { pos, .. }
            | UnexpectedToken { pos, .. }
            | UnexpectedEnd { pos, .. }
            | UnknownTag { pos, .. }
            | TrailingInput { pos, .. }
            | Malformed { pos, .. }
            | DuplicateGlobal { pos, .. }
            | DuplicateFunction { pos, .. } => *pos,
        }
    }
}

impl PrettyError for FormatError {
    #[inline]
    fn ranges(&self) -> ((String, Option<TextRange>), Vec<(String, TextRange)>) { ((self.to_string(), Some(TextRange::single(self.pos()))), vec![]) }
}
