//  MOD.rs
//    by Kite developers
//
//  Created:
//    19 Oct 2026, 13:44:20
//  Last edited:
//    19 Oct 2026, 17:21:36
//  Auto updated?
//    Yes
//
//  Description:
//!   Defines the parser for Kite, a recursive descent over the scanned
//!   tokens that checks names, scopes and calls while it builds the
//!   tree.
//

// Declare submodules
mod expressions;
#[allow(clippy::module_inception)]
mod parser;
mod statements;
mod statics;
mod toplevel;

// Bring some part of it into the this module's scope
pub use parser::parse_tokens;

use crate::errors::DslError;


/***** LIBRARY *****/
/// The result of a single production of the parser.
#[derive(Debug)]
pub(crate) enum Parsed<T> {
    /// The production matched and produced this.
    Matched(T),
    /// The production does not apply at this position; another alternative may.
    NotApplicable,
    /// The production applied but the input is wrong; parsing must stop.
    Fatal(DslError),
}

impl<T> From<Result<T, DslError>> for Parsed<T> {
    #[inline]
    fn from(value: Result<T, DslError>) -> Self {
        match value {
            Ok(value) => Self::Matched(value),
            Err(err) => Self::Fatal(err),
        }
    }
}



/// Unwraps a [`Parsed::Matched`], returning any other result from the surrounding production as-is.
macro_rules! matched {
    ($parsed:expr) => {
        match $parsed {
            crate::parser::Parsed::Matched(value) => value,
            crate::parser::Parsed::NotApplicable => return crate::parser::Parsed::NotApplicable,
            crate::parser::Parsed::Fatal(err) => return crate::parser::Parsed::Fatal(err),
        }
    };
}
pub(crate) use matched;

/// Unwraps an `Ok`, returning an `Err` as [`Parsed::Fatal`] from the surrounding production.
macro_rules! fatal {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(err) => return crate::parser::Parsed::Fatal(err.into()),
        }
    };
}
pub(crate) use fatal;
