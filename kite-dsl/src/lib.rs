//  LIB.rs
//    by Kite developers
//
//  Created:
//    19 Oct 2026, 12:58:40
//  Last edited:
//    19 Oct 2026, 19:16:52
//  Auto updated?
//    Yes
//
//  Description:
//!   The `kite-dsl` crate provides the front end of the Kite compiler:
//!   it scans Kite source text and parses it to the tree defined in
//!   `kite-ast`, checking names, scopes and calls on the way.
//

// Declare modules
pub mod errors;
mod parser;
pub mod scanner;

use kite_ast::pool::StringPool;
use kite_ast::program::Program;
use kite_ast::spec::TextRange;
use tracing::debug;

// Define some useful abstraction over a DslError
pub use errors::DslError as Error;
use errors::LexError;
pub use scanner::Token;


/***** LIBRARY *****/
/// Scans the given source text to tokens.
///
/// # Arguments
/// - `source`: The source text to scan.
/// - `pool`: A [`StringPool`] to intern the identifiers and strings in.
///
/// # Returns
/// The tokens, always ending in [`Token::End`].
///
/// # Errors
/// This function errors if the source contains text that is not a token, like an unknown character or a string that is never closed.
pub fn tokenize<'s>(source: &'s str, pool: &mut StringPool) -> Result<Vec<Token<'s>>, Error> {
    let tokens: Vec<Token> = scanner::scan_tokens(scanner::Input::new(source));
    if let Some(Token::Error(span)) = tokens.last() {
        let range: TextRange = TextRange::from(span);
        return Err(match span.fragment().chars().next() {
            Some('"') => LexError::UnterminatedString { range },
            Some('/') => LexError::UnterminatedComment { range },
            Some(ch) => LexError::UnexpectedCharacter { ch, range },
            None => LexError::UnexpectedCharacter { ch: '\0', range },
        }
        .into());
    }

    for token in &tokens {
        match token {
            Token::Identifier(span) => {
                pool.intern(span.fragment());
            },
            Token::String(span) => {
                let raw: &str = span.fragment();
                pool.intern(raw.strip_prefix('"').and_then(|r| r.strip_suffix('"')).unwrap_or(raw));
            },
            _ => {},
        }
    }
    debug!("Scanned {} tokens ({} unique strings)", tokens.len(), pool.len());
    Ok(tokens)
}

/// Parses the given tokens to a [`Program`].
///
/// # Arguments
/// - `tokens`: The tokens to parse, as returned by [`tokenize()`].
/// - `pool`: The [`StringPool`] the tokens were interned in.
///
/// # Errors
/// This function errors if the tokens are not a valid Kite program.
#[inline]
pub fn parse(tokens: &[Token], pool: StringPool) -> Result<Program, Error> { parser::parse_tokens(tokens, pool) }

/// Toplevel function that runs the whole front end on the given source text.
///
/// # Arguments
/// - `source`: The Kite source text to compile.
///
/// # Returns
/// The [`Program`] it defines, with `main` rewritten to run the static blocks.
///
/// # Errors
/// This function errors if the source is not a valid Kite program.
pub fn compile(source: &str) -> Result<Program, Error> {
    let mut pool: StringPool = StringPool::new();
    let tokens: Vec<Token> = tokenize(source, &mut pool)?;
    parse(&tokens, pool)
}



/***** TESTS *****/
#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use kite_ast::exchange::{read_tree, write_tree};
    use kite_ast::spec::TextPos;
    use kite_ast::tree::Tree;
    use kite_shr::utilities::test_on_kite_files;

    use super::*;

    #[test]
    fn test_lex_errors() {
        let err: Error = compile("fun main(): Void {\n  out << \"hi;\n}").unwrap_err();
        assert!(matches!(err, Error::Lex(LexError::UnterminatedString { .. })), "{err}");
        assert_eq!(err.range().start, TextPos::new1(2, 10));

        let err: Error = compile("fun main(): Void { } /* never closed").unwrap_err();
        assert!(matches!(err, Error::Lex(LexError::UnterminatedComment { .. })), "{err}");

        let err: Error = compile("fun main(): Void { var x = 1 # 2; }").unwrap_err();
        assert!(matches!(err, Error::Lex(LexError::UnexpectedCharacter { ch: '#', .. })), "{err}");
        assert_eq!(err.range().start, TextPos::new1(1, 30));
    }

    #[test]
    fn test_tokenize_interns() {
        let mut pool: StringPool = StringPool::new();
        let tokens: Vec<Token> = tokenize("var abc = 1; out << \"abc\" << abc;", &mut pool).unwrap();
        assert!(matches!(tokens.last(), Some(Token::End(_))));
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_exchange_roundtrip() {
        test_on_kite_files(|path: PathBuf, raw: String| {
            let program: Program = compile(&raw).unwrap_or_else(|err| panic!("Failed to compile '{}': {err}", path.display()));
            let text: String = write_tree(&program.tree, true);
            let mut pool: StringPool = StringPool::new();
            let tree: Tree = read_tree(&text, &mut pool).unwrap_or_else(|err| panic!("Failed to read back '{}': {err}\n{text}", path.display()));
            assert!(tree == program.tree, "Tree of '{}' changed in the exchange format:\n{text}", path.display());
        });
    }
}
