//  ERRORS.rs
//    by Kite developers
//
//  Created:
//    19 Oct 2026, 19:24:10
//  Last edited:
//    19 Oct 2026, 19:31:58
//  Auto updated?
//    Yes
//
//  Description:
//!   Defines errors originating from the `kite-opt` crate.
//

use kite_ast::errors::PrettyError;
use kite_ast::spec::{TextPos, TextRange};
use thiserror::Error;


/***** LIBRARY *****/
/// Defines errors that occur while simplifying a tree.
#[derive(Debug, Error)]
pub enum SimplifyError {
    /// Differentiating something we have no rule for.
    #[error("Cannot differentiate {what}")]
    UnsupportedDiff { what: String, pos: TextPos },
    /// An operator node without the operands it needs.
    #[error("Expected that {op} has {expected}")]
    MissingOperand { op: &'static str, expected: &'static str, pos: TextPos },
}

impl SimplifyError {
    /// Returns the source position of the node this error concerns.
    #[inline]
    pub fn pos(&self) -> TextPos {
        match self {
            Self::UnsupportedDiff { pos, .. } | Self::MissingOperand { pos, .. } => *pos,
        }
    }
}

impl PrettyError for SimplifyError {
    #[inline]
    fn ranges(&self) -> ((String, Option<TextRange>), Vec<(String, TextRange)>) { ((self.to_string(), Some(TextRange::single(self.pos()))), vec![]) }
}
