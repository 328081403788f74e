//  KEYWORDS.rs
//    by Kite developers
//
//  Created:
//    19 Oct 2026, 13:08:14
//  Last edited:
//    19 Oct 2026, 14:25:39
//  Auto updated?
//    Yes
//
//  Description:
//!   Parses the keywords of Kite.
//

use nom::IResult;
use nom::{branch, bytes::complete as bc, character::complete as cc, combinator as comb, sequence as seq};

use super::tokens::Token;
use super::{Error, Input};


/***** HELPER FUNCTIONS *****/
/// Matches a separator for keywords, i.e., anything that cannot continue an identifier.
///
/// # Returns
/// A tuple of the remaining input we did not parse and nothing.
///
/// # Errors
/// This function errors if the head of the input continues an identifier.
#[inline]
pub(crate) fn separator<'s, E: Error<'s>>(input: Input<'s>) -> IResult<Input<'s>, (), E> {
    comb::not(branch::alt((cc::alphanumeric1, bc::tag("_"), bc::tag("$"))))(input)
}





/***** LIBRARY *****/
/// Attempts to parse a keyword from the head of the given input.
///
/// # Arguments
/// - `input`: The input to parse off of.
///
/// # Returns
/// A tuple of the remaining input we did not parse and a token representing the parsed keyword.
///
/// # Errors
/// This function errors if the input does not start with a keyword.
pub(crate) fn parse<'s, E: Error<'s>>(input: Input<'s>) -> IResult<Input<'s>, Token<'s>, E> {
    branch::alt((
        // Declarations
        comb::map(seq::terminated(bc::tag("fun"), comb::peek(separator)), Token::Fun),
        comb::map(seq::terminated(bc::tag("val"), comb::peek(separator)), Token::Val),
        comb::map(seq::terminated(bc::tag("var"), comb::peek(separator)), Token::Var),
        comb::map(seq::terminated(bc::tag("static"), comb::peek(separator)), Token::Static),
        comb::map(seq::terminated(bc::tag("Void"), comb::peek(separator)), Token::Void),
        comb::map(seq::terminated(bc::tag("Double"), comb::peek(separator)), Token::Double),
        // Control flow
        comb::map(seq::terminated(bc::tag("if"), comb::peek(separator)), Token::If),
        comb::map(seq::terminated(bc::tag("else"), comb::peek(separator)), Token::Else),
        comb::map(seq::terminated(bc::tag("while"), comb::peek(separator)), Token::While),
        comb::map(seq::terminated(bc::tag("return"), comb::peek(separator)), Token::Return),
        // I/O
        comb::map(seq::terminated(bc::tag("endl"), comb::peek(separator)), Token::Endl),
        comb::map(seq::terminated(bc::tag("out"), comb::peek(separator)), Token::Out),
        comb::map(seq::terminated(bc::tag("in"), comb::peek(separator)), Token::In),
        // Builtins
        comb::map(seq::terminated(bc::tag("sqrt"), comb::peek(separator)), Token::Sqrt),
        comb::map(seq::terminated(bc::tag("sin"), comb::peek(separator)), Token::Sin),
        comb::map(seq::terminated(bc::tag("cos"), comb::peek(separator)), Token::Cos),
        comb::map(seq::terminated(bc::tag("tan"), comb::peek(separator)), Token::Tan),
        comb::map(seq::terminated(bc::tag("int"), comb::peek(separator)), Token::Int),
        comb::map(seq::terminated(bc::tag("diff"), comb::peek(separator)), Token::Diff),
    ))(input)
}
