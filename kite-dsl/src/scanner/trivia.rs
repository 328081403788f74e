//  TRIVIA.rs
//    by Kite developers
//
//  Created:
//    20 Oct 2026, 10:12:44
//  Last edited:
//    20 Oct 2026, 10:31:09
//  Auto updated?
//    Yes
//
//  Description:
//!   Skips the text between tokens: whitespace, `//`-comments that run
//!   to the end of their line and `/* */`-comments that do not nest.
//

use nom::IResult;
use nom::{branch, bytes::complete as bc, character::complete as cc, combinator as comb, sequence as seq};

use super::{Error, Input};


/***** SCANNING FUNCTIONS *****/
/// Skips a `//`-comment, including the newline that ends it (if any).
fn line_comment<'s, E: Error<'s>>(input: Input<'s>) -> IResult<Input<'s>, (), E> {
    comb::value((), seq::tuple((bc::tag("//"), bc::take_till(|c: char| c == '\n'), comb::opt(cc::char('\n')))))(input)
}

/// Skips a `/* */`-comment.
///
/// Once the opening `/*` is seen, a missing `*/` is a `nom::Err::Failure`.
fn block_comment<'s, E: Error<'s>>(input: Input<'s>) -> IResult<Input<'s>, (), E> {
    comb::value((), seq::preceded(bc::tag("/*"), comb::cut(seq::terminated(bc::take_until("*/"), bc::tag("*/")))))(input)
}





/***** LIBRARY *****/
/// Skips one run of whitespace or one comment at the head of the given input.
///
/// Only one is skipped at a time, so that the scanner can halt right at a comment that is never closed.
///
/// # Returns
/// A tuple of the remaining input and nothing.
///
/// # Errors
/// This function errors with a `nom::Err::Error` if the input does not start with whitespace or a comment, and with a `nom::Err::Failure` if it starts a comment that is never closed.
pub(crate) fn skip<'s, E: Error<'s>>(input: Input<'s>) -> IResult<Input<'s>, (), E> {
    branch::alt((comb::value((), cc::multispace1), line_comment, block_comment))(input)
}



/***** TESTS *****/
#[cfg(test)]
mod tests {
    use super::*;

    /// Skips trivia and returns what remains.
    fn rest(text: &str) -> Result<&str, nom::Err<nom::error::Error<Input>>> { skip::<nom::error::Error<Input>>(Input::new(text)).map(|(rem, _)| *rem.fragment()) }

    #[test]
    fn test_skip() {
        assert_eq!(rest("  \n\t// one").ok(), Some("// one"));
        assert_eq!(rest("// one\n\t/* two */").ok(), Some("\t/* two */"));
        assert_eq!(rest("/* two\n three */  x").ok(), Some("  x"));
        assert_eq!(rest("// last line").ok(), Some(""));
        assert_eq!(rest("/**/*").ok(), Some("*"));
        assert!(matches!(rest("x"), Err(nom::Err::Error(_))));
        assert!(matches!(rest("/ 2"), Err(nom::Err::Error(_))));
        assert!(matches!(rest("/* open"), Err(nom::Err::Failure(_))));
    }
}
