//  ERRORS.rs
//    by Kite developers
//
//  Created:
//    19 Oct 2026, 20:31:07
//  Last edited:
//    19 Oct 2026, 21:02:45
//  Auto updated?
//    Yes
//
//  Description:
//!   Defines errors originating from the `kite-gen` crate.
//!
//!   None of these should occur for a tree produced by the parser; they
//!   guard against trees read from the exchange format.
//

use kite_ast::errors::PrettyError;
use kite_ast::spec::{TextPos, TextRange};
use thiserror::Error;


/***** LIBRARY *****/
/// Defines errors that occur while generating assembly or source text from a tree.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// A name that is not a variable in scope.
    #[error("Unknown variable '{name}'")]
    UnknownVariable { name: String, pos: TextPos },
    /// A call to a function that does not exist.
    #[error("Unknown function '{name}'")]
    UnknownFunction { name: String, pos: TextPos },
    /// A call with a different number of arguments than the function has parameters.
    #[error("Function '{name}' takes {expected} arguments, but the call passes {given}")]
    ArityMismatch { name: String, expected: usize, given: usize, pos: TextPos },
    /// The value of a `Void` function is used.
    #[error("Function '{name}' returns Void, but its value is used")]
    VoidValue { name: String, pos: TextPos },
    /// A node without a child it needs.
    #[error("Expected {what} to have {expected}")]
    MissingChild { what: &'static str, expected: &'static str, pos: TextPos },
    /// A `diff` that was never simplified away.
    #[error("Cannot generate code for 'diff'; simplify the tree first")]
    UnsimplifiedDiff { pos: TextPos },
    /// A string that does not fit in the video region.
    #[error("String of {len} characters does not fit in the video region of {max} characters")]
    StringTooLong { len: usize, max: usize, pos: TextPos },
    /// A node that may not appear where it does.
    #[error("Unexpected {what} {place}")]
    Malformed { what: String, place: &'static str, pos: TextPos },
    /// There is no `main` to call.
    #[error("Program has no function called 'main'")]
    MissingMain,

    /// Failed to write to the output buffer.
    #[error("Failed to write output")]
    Write(#[from] std::fmt::Error),
}

impl CodegenError {
    /// Returns the source position of the node this error concerns, if any.
    #[inline]
    pub fn pos(&self) -> Option<TextPos> {
        use CodegenError::*;
        match self {
            UnknownVariable { pos, .. }
            | UnknownFunction { pos, .. }
            | ArityMismatch { pos, .. }
            | VoidValue { pos, .. }
            | MissingChild { pos, .. }
            | UnsimplifiedDiff { pos }
            | StringTooLong { pos, .. }
            | Malformed { pos, .. } => Some(*pos),

            MissingMain | Write(_) => None,
        }
    }
}

impl PrettyError for CodegenError {
    #[inline]
    fn ranges(&self) -> ((String, Option<TextRange>), Vec<(String, TextRange)>) { ((self.to_string(), self.pos().map(TextRange::single)), vec![]) }
}
