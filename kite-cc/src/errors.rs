//  ERRORS.rs
//    by Kite developers
//
//  Created:
//    19 Oct 2026, 22:20:13
//  Last edited:
//    19 Oct 2026, 22:44:29
//  Auto updated?
//    Yes
//
//  Description:
//!   Defines the errors of the `kitec` stages.
//

use std::io;

use kite_ast::errors::PrettyError as _;
use kite_ast::exchange::FormatError;
use thiserror::Error;


/***** LIBRARY *****/
/// Defines errors that make a stage fail.
///
/// Errors from the compiler keep the text that was compiled, so they can be shown with the line they concern.
#[derive(Debug, Error)]
pub enum StageError {
    /// Failed to read the input.
    #[error("Failed to read input from {what}")]
    InputRead { what: String, source: io::Error },
    /// Failed to write the output.
    #[error("Failed to write output to {what}")]
    OutputWrite { what: String, source: io::Error },

    /// The input is not a valid Kite program.
    #[error("Failed to compile {what}")]
    Compile { what: String, raw: String, source: kite_dsl::Error },
    /// The input is not a valid tree.
    #[error("Failed to read tree from {what}")]
    Exchange { what: String, raw: String, source: FormatError },
    /// The tree could not be simplified.
    #[error("Failed to simplify {what}")]
    Simplify { what: String, raw: String, source: kite_opt::Error },
    /// The tree could not be turned into assembly or source text.
    #[error("Failed to generate output for {what}")]
    Codegen { what: String, raw: String, source: kite_gen::Error },
}

impl StageError {
    /// Renders the error with the line of input it concerns.
    ///
    /// # Returns
    /// The rendered error, or [`None`] if the error does not concern a line of input.
    pub fn display_pretty(&self) -> Option<String> {
        use StageError::*;
        match self {
            InputRead { .. } | OutputWrite { .. } => None,
            Compile { what, raw, source } => Some(source.display_with_source(what, raw).to_string()),
            Exchange { what, raw, source } => Some(source.display_with_source(what, raw).to_string()),
            Simplify { what, raw, source } => Some(source.display_with_source(what, raw).to_string()),
            Codegen { what, raw, source } => Some(source.display_with_source(what, raw).to_string()),
        }
    }
}
