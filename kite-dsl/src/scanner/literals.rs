//  LITERALS.rs
//    by Kite developers
//
//  Created:
//    19 Oct 2026, 13:15:40
//  Last edited:
//    19 Oct 2026, 15:02:26
//  Auto updated?
//    Yes
//
//  Description:
//!   Scans literals and identifiers from the input.
//

use nom::IResult;
use nom::{branch, bytes::complete as bc, character::complete as cc, combinator as comb, multi, sequence as seq};

use super::tokens::Token;
use super::{Error, Input};


/***** SCANNING FUNCTIONS *****/
/// Parses a number off the head of the given input.
///
/// Accepts `digits[.digits][(e|E)[+-]digits]` and `.digits[(e|E)[+-]digits]`. Signs are left to the parser.
///
/// # Arguments
/// - `input`: The input to parse off of.
///
/// # Returns
/// A tuple of the remaining input we did not parse and a [`Token::Number`].
///
/// # Errors
/// This function errors if the input does not start with a number.
fn number<'s, E: Error<'s>>(input: Input<'s>) -> IResult<Input<'s>, Token<'s>, E> {
    let exponent = || comb::opt(seq::tuple((cc::one_of("eE"), comb::opt(cc::one_of("+-")), cc::digit1)));
    nom::error::context(
        "a number",
        comb::map(
            branch::alt((
                comb::recognize(seq::tuple((cc::digit1, comb::opt(seq::pair(cc::char('.'), cc::digit1)), exponent()))),
                comb::recognize(seq::tuple((cc::char('.'), cc::digit1, exponent()))),
            )),
            Token::Number,
        ),
    )(input)
}

/// Parses a string literal off the head of the given input.
///
/// Strings have no escapes; everything up to the next double quote is part of it.
///
/// # Arguments
/// - `input`: The input to parse off of.
///
/// # Returns
/// A tuple of the remaining input we did not parse and a [`Token::String`] spanning the quotes too.
///
/// # Errors
/// This function errors if the input does not start with a string. A `nom::Err::Failure` means that it is never closed.
fn string<'s, E: Error<'s>>(input: Input<'s>) -> IResult<Input<'s>, Token<'s>, E> {
    nom::error::context(
        "a string literal",
        comb::map(comb::recognize(seq::preceded(cc::char('"'), comb::cut(seq::terminated(comb::opt(bc::is_not("\"")), cc::char('"'))))), Token::String),
    )(input)
}





/***** LIBRARY *****/
/// Attempts to parse a literal from the head of the given input.
///
/// # Arguments
/// - `input`: The input to parse off of.
///
/// # Returns
/// A tuple of the remaining input we did not parse and a token representing the parsed literal.
///
/// # Errors
/// This function errors if we failed to parse a literal for whatever reason. A `nom::Err::Error` means that it may be something else on top of there, but `nom::Err::Failure` means that the stream will never be valid.
pub(crate) fn parse<'s, E: Error<'s>>(input: Input<'s>) -> IResult<Input<'s>, Token<'s>, E> { branch::alt((number, string))(input) }

/// Attempts to parse an identifier (`[A-Za-z_$][A-Za-z0-9_$]*`) from the head of the given input.
///
/// # Arguments
/// - `input`: The input to parse off of.
///
/// # Returns
/// A tuple of the remaining input we did not parse and a [`Token::Identifier`].
///
/// # Errors
/// This function errors if the input does not start with an identifier.
pub(crate) fn parse_ident<'s, E: Error<'s>>(input: Input<'s>) -> IResult<Input<'s>, Token<'s>, E> {
    nom::error::context(
        "an identifier",
        comb::map(
            comb::recognize(seq::pair(
                branch::alt((cc::alpha1, bc::tag("_"), bc::tag("$"))),
                multi::many0(branch::alt((cc::alphanumeric1, bc::tag("_"), bc::tag("$")))),
            )),
            Token::Identifier,
        ),
    )(input)
}
