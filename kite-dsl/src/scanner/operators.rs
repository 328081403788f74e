//  OPERATORS.rs
//    by Kite developers
//
//  Created:
//    19 Oct 2026, 13:11:52
//  Last edited:
//    19 Oct 2026, 13:11:52
//  Auto updated?
//    Yes
//
//  Description:
//!   Parses operators in Kite.
//

use nom::IResult;
use nom::{branch, bytes::complete as bc, combinator as comb};

use super::tokens::Token;
use super::{Error, Input};


/***** LIBRARY *****/
/// Attempts to parse an operator from the head of the given input.
///
/// Multi-character operators are tried before the single-character ones they start with.
///
/// # Arguments
/// - `input`: The input to parse off of.
///
/// # Returns
/// A tuple of the remaining input we did not parse and a token representing the parsed operator.
///
/// # Errors
/// This function errors if the input does not start with an operator.
pub(crate) fn parse<'s, E: Error<'s>>(input: Input<'s>) -> IResult<Input<'s>, Token<'s>, E> {
    branch::alt((
        // Multi-character
        branch::alt((
            comb::map(bc::tag("->"), Token::Arrow),
            comb::map(bc::tag("::"), Token::Scope),
            comb::map(bc::tag("=="), Token::Eq),
            comb::map(bc::tag("!="), Token::Ne),
            comb::map(bc::tag("<="), Token::Le),
            comb::map(bc::tag(">="), Token::Ge),
            comb::map(bc::tag("&&"), Token::And),
            comb::map(bc::tag("||"), Token::Or),
            comb::map(bc::tag("<<"), Token::ShiftLeft),
            comb::map(bc::tag(">>"), Token::ShiftRight),
        )),
        // Single-character
        branch::alt((
            comb::map(bc::tag("<"), Token::Lt),
            comb::map(bc::tag(">"), Token::Gt),
            comb::map(bc::tag("!"), Token::Not),
            comb::map(bc::tag("&"), Token::Ampersand),
            comb::map(bc::tag("|"), Token::Pipe),
            comb::map(bc::tag("+"), Token::Add),
            comb::map(bc::tag("-"), Token::Min),
            comb::map(bc::tag("*"), Token::Mul),
            comb::map(bc::tag("/"), Token::Div),
            comb::map(bc::tag("^"), Token::Pow),
            comb::map(bc::tag("="), Token::Assign),
        )),
    ))(input)
}
