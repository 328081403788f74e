//  PUNCTUATION.rs
//    by Kite developers
//
//  Created:
//    19 Oct 2026, 13:13:07
//  Last edited:
//    19 Oct 2026, 13:13:07
//  Auto updated?
//    Yes
//
//  Description:
//!   Parses punctiation characters for Kite.
//

use nom::IResult;
use nom::{branch, bytes::complete as bc, combinator as comb};

use super::tokens::Token;
use super::{Error, Input};


/***** LIBRARY *****/
/// Attempts to parse a punctuation character from the head of the given input.
///
/// # Arguments
/// - `input`: The input to parse off of.
///
/// # Returns
/// A tuple of the remaining input we did not parse and a token representing the parsed punctuation.
///
/// # Errors
/// This function errors if the input does not start with punctuation.
pub(crate) fn parse<'s, E: Error<'s>>(input: Input<'s>) -> IResult<Input<'s>, Token<'s>, E> {
    branch::alt((
        // Separators
        comb::map(bc::tag(","), Token::Comma),
        comb::map(bc::tag(":"), Token::Colon),
        comb::map(bc::tag(";"), Token::Semicolon),
        // Brackets
        comb::map(bc::tag("("), Token::LeftParen),
        comb::map(bc::tag(")"), Token::RightParen),
        comb::map(bc::tag("["), Token::LeftBracket),
        comb::map(bc::tag("]"), Token::RightBracket),
        comb::map(bc::tag("{"), Token::LeftBrace),
        comb::map(bc::tag("}"), Token::RightBrace),
    ))(input)
}
