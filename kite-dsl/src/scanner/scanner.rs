//  SCANNER.rs
//    by Kite developers
//
//  Created:
//    19 Oct 2026, 13:20:33
//  Last edited:
//    19 Oct 2026, 16:48:01
//  Auto updated?
//    Yes
//
//  Description:
//!   Implements the main scanner logic.
//

use nom::IResult;
use nom::{branch, bytes::complete as bc, combinator as comb};
use tracing::trace;

use super::tokens::Token;
use super::{Error, Input};
use super::{keywords, literals, operators, punctuation, trivia};


/***** TESTS *****/
#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use enum_debug::EnumDebug as _;
    use kite_shr::utilities::test_on_kite_files;

    use super::*;

    /// Scans the given text and returns the variant names of its tokens.
    fn variants(text: &str) -> Vec<String> { scan_tokens(Input::new(text)).into_iter().map(|t| t.variant().to_string()).collect() }

    #[test]
    fn test_scanner() {
        test_on_kite_files(|path: PathBuf, raw: String| {
            println!("{}", (0..80).map(|_| '-').collect::<String>());
            println!("File '{}' gave us:", path.display());

            // Scan the tokens
            let tokens: Vec<Token> = scan_tokens(Input::new(&raw));
            if let Some(Token::Error(span)) = tokens.last() {
                panic!("Scanning failed at {}:{}", span.location_line(), span.get_utf8_column());
            }

            // Show the tokens
            println!("{}", tokens.into_iter().map(|t| format!("{}", t.variant())).collect::<Vec<String>>().join(" "));
            println!("{}\n\n", (0..80).map(|_| '-').collect::<String>());
        });
    }

    #[test]
    fn test_keywords_need_separators() {
        assert_eq!(variants("in int inside"), ["In", "Int", "Identifier", "End"]);
        assert_eq!(variants("var $v var_1"), ["Var", "Identifier", "Identifier", "End"]);
        assert_eq!(variants("Void Double double"), ["Void", "Double", "Identifier", "End"]);
    }

    #[test]
    fn test_operators_and_literals() {
        assert_eq!(variants("x<<y>>=<=-> ::"), ["Identifier", "ShiftLeft", "Identifier", "ShiftRight", "Assign", "Le", "Arrow", "Scope", "End"]);
        assert_eq!(variants("1 2.5 .5 1e3 \"a // b\""), ["Number", "Number", "Number", "Number", "String", "End"]);
        assert_eq!(variants("a // comment\n/* multi\nline */ b"), ["Identifier", "Identifier", "End"]);
    }

    #[test]
    fn test_error_token_halts() {
        let tokens: Vec<Token> = scan_tokens(Input::new("x = 1;\n  # y"));
        assert_eq!(tokens.len(), 5);
        let Some(Token::Error(span)) = tokens.last() else { panic!("Expected an error token, got {:?}", tokens.last()) };
        assert_eq!(*span.fragment(), "#");
        assert_eq!((span.location_line(), span.get_utf8_column()), (2, 3));

        // Unterminated strings and comments halt at their start
        let tokens: Vec<Token> = scan_tokens(Input::new("out << \"abc"));
        assert!(matches!(tokens.last(), Some(Token::Error(span)) if *span.fragment() == "\""));
        let tokens: Vec<Token> = scan_tokens(Input::new("/* abc"));
        assert!(matches!(tokens.last(), Some(Token::Error(span)) if *span.fragment() == "/"));
    }
}





/***** SCANNING FUNCTIONS *****/
/// Attempts to parse a single token from the head of the given input.
///
/// # Arguments
/// - `input`: The input to parse off of.
///
/// # Returns
/// A tuple of the remaining input we did not parse and the token that we parsed, or [`None`] if we parsed whitespace or a comment.
///
/// # Errors
/// This function errors if the head of the input starts no token. A `nom::Err::Error` means that it may be something else on top of there, but `nom::Err::Failure` means that the stream will never be valid.
fn scan_token<'s, E: Error<'s>>(input: Input<'s>) -> IResult<Input<'s>, Option<Token<'s>>, E> {
    branch::alt((
        comb::value(None, trivia::skip),
        comb::map(operators::parse, Some),
        comb::map(punctuation::parse, Some),
        comb::map(keywords::parse, Some),
        comb::map(literals::parse, Some),
        comb::map(literals::parse_ident, Some),
    ))(input)
}





/***** LIBRARY *****/
/// Scans all of the tokens in the given input to a serial list of tokens.
///
/// The list always ends in a sentinel: either a [`Token::End`] with an empty span at the end of the input, or a [`Token::Error`] spanning the first character of whatever could not be scanned.
///
/// # Arguments
/// - `input`: The input to tokenize.
///
/// # Returns
/// A vector with the scanned tokens.
pub fn scan_tokens(input: Input) -> Vec<Token> {
    let mut tokens: Vec<Token> = Vec::new();
    let mut rem: Input = input;
    loop {
        if rem.fragment().is_empty() {
            tokens.push(Token::End(rem));
            break;
        }
        match scan_token::<nom::error::Error<Input>>(rem) {
            Ok((next, token)) => {
                if let Some(token) = token {
                    tokens.push(token);
                }
                rem = next;
            },
            Err(_) => {
                // Halt on a span of the offending character
                let bad: Input = match bc::take::<usize, Input, nom::error::Error<Input>>(1)(rem) {
                    Ok((_, bad)) => bad,
                    Err(_) => rem,
                };
                trace!("Scanning halted at {}:{}", bad.location_line(), bad.get_utf8_column());
                tokens.push(Token::Error(bad));
                break;
            },
        }
    }
    tokens
}
