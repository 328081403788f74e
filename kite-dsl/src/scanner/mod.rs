//  MOD.rs
//    by Kite developers
//
//  Created:
//    19 Oct 2026, 13:02:11
//  Last edited:
//    19 Oct 2026, 13:40:57
//  Auto updated?
//    Yes
//
//  Description:
//!   Defines the scanner for Kite source text.
//

// Declare submodules
mod keywords;
mod literals;
mod operators;
mod punctuation;
mod scanner;
mod trivia;
pub mod tokens;

// Bring some part of it into the this module's scope
pub use scanner::scan_tokens;
pub use tokens::Token;


// Type aliases for this module
/// Defines the common input to every function.
pub type Input<'s> = nom_locate::LocatedSpan<&'s str, ()>;

// Trait aliases for this module
/// Defines a common error trait for the nom errors we are interested in.
pub(crate) trait Error<'s>: nom::error::ContextError<Input<'s>> + nom::error::ParseError<Input<'s>> {}
impl<'s, T> Error<'s> for T where T: nom::error::ContextError<Input<'s>> + nom::error::ParseError<Input<'s>> {}
