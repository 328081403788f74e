//  PARSER.rs
//    by Kite developers
//
//  Created:
//    19 Oct 2026, 13:47:02
//  Last edited:
//    19 Oct 2026, 18:11:49
//  Auto updated?
//    Yes
//
//  Description:
//!   Implements the state shared by all productions, and the main
//!   parser entrypoint.
//

use std::rc::Rc;

use kite_ast::pool::StringPool;
use kite_ast::program::{Program, StaticBlocks};
use kite_ast::spec::TextRange;
use kite_ast::symbols::{FunctionTable, ReturnType, ScopeStack};
use kite_ast::tree::Tree;
use tracing::{debug, trace};

use super::Parsed;
use crate::errors::{DslError, SyntaxError};
use crate::scanner::{Input, Token};


/***** TESTS *****/
#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use kite_ast::errors::PrettyError as _;
    use kite_ast::exchange::write_tree;
    use kite_shr::utilities::{FAIL_TESTS_DIR, test_on_kite_files, test_on_kite_files_in};

    use crate::compile;

    #[test]
    fn test_parser() {
        test_on_kite_files(|path: PathBuf, raw: String| {
            println!("{}", (0..80).map(|_| '-').collect::<String>());
            println!("File '{}' gave us:", path.display());

            let program = match compile(&raw) {
                Ok(program) => program,
                Err(err) => {
                    eprintln!("{}", err.display_with_source(&path.display().to_string(), &raw));
                    panic!("Parsing failed (see above)");
                },
            };

            // Show the tree
            println!("{}", write_tree(&program.tree, true));
            println!("{}\n\n", (0..80).map(|_| '-').collect::<String>());
        });
    }

    #[test]
    fn test_parser_rejects() {
        test_on_kite_files_in(FAIL_TESTS_DIR, |path: PathBuf, raw: String| {
            println!("{}", (0..80).map(|_| '-').collect::<String>());
            println!("File '{}' gave us:", path.display());

            match compile(&raw) {
                Ok(_) => panic!("Parsing '{}' succeeded, but it should have failed", path.display()),
                Err(err) => println!("{}", err.display_with_source(&path.display().to_string(), &raw)),
            }
            println!("{}\n\n", (0..80).map(|_| '-').collect::<String>());
        });
    }
}





/***** AUXILLARY *****/
/// Remembers where the parser was, to undo a production that turned out not to apply.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Checkpoint {
    /// The token cursor.
    cursor : usize,
    /// The number of nodes in the arena.
    nodes  : usize,
}



/// The function whose body is being parsed.
#[derive(Clone, Debug)]
pub(crate) struct CurrentFunction {
    /// Its name.
    pub name    : Rc<str>,
    /// What it returns.
    pub returns : ReturnType,
}





/***** LIBRARY *****/
/// The state of one parse.
///
/// Productions are implemented as methods on this struct, spread over the modules of the parser.
#[derive(Debug)]
pub(crate) struct Parser<'t, 's> {
    /// The tokens to parse. Always ends in [`Token::End`].
    pub tokens    : &'t [Token<'s>],
    /// The next token to parse.
    pub cursor    : usize,
    /// The tree we are building.
    pub tree      : Tree,
    /// The strings of the tree.
    pub pool      : StringPool,
    /// The lexical scopes currently open. The bottom one is the global scope.
    pub scopes    : ScopeStack,
    /// The functions declared so far.
    pub functions : FunctionTable,
    /// The static blocks declared so far.
    pub statics   : StaticBlocks,
    /// The function whose body we are in, if any.
    pub current   : Option<CurrentFunction>,
    /// The next local slot in the current function.
    pub n_locals  : usize,
    /// Whether we have seen `main` yet.
    pub seen_main : bool,
}

impl<'t, 's> Parser<'t, 's> {
    /// Constructor for the Parser.
    ///
    /// # Arguments
    /// - `tokens`: The tokens to parse.
    /// - `pool`: The [`StringPool`] that the scanner interned the tokens' text in.
    ///
    /// # Returns
    /// A new Parser at the start of the tokens.
    #[inline]
    pub fn new(tokens: &'t [Token<'s>], pool: StringPool) -> Self {
        Self {
            tokens,
            cursor: 0,
            tree: Tree::new(),
            pool,
            scopes: ScopeStack::new(),
            functions: FunctionTable::new(),
            statics: StaticBlocks::default(),
            current: None,
            n_locals: 0,
            seen_main: false,
        }
    }



    /// Returns the token `n` positions ahead of the cursor.
    ///
    /// Looking past the end keeps returning the last token.
    #[inline]
    pub fn peek_at(&self, n: usize) -> Token<'s> {
        self.tokens.get(self.cursor + n).or_else(|| self.tokens.last()).copied().unwrap_or(Token::End(Input::new("")))
    }

    /// Returns the token at the cursor.
    #[inline]
    pub fn peek(&self) -> Token<'s> { self.peek_at(0) }

    /// Returns the token at the cursor and moves past it. Never moves past the end.
    #[inline]
    pub fn advance(&mut self) -> Token<'s> {
        let token: Token<'s> = self.peek();
        if self.cursor < self.tokens.len().saturating_sub(1) {
            self.cursor += 1;
        }
        token
    }

    /// Consumes the token at the cursor if it matches the given predicate.
    #[inline]
    pub fn eat(&mut self, pred: impl FnOnce(&Token<'s>) -> bool) -> Option<Token<'s>> { if pred(&self.peek()) { Some(self.advance()) } else { None } }

    /// Consumes the token at the cursor if it matches the given predicate, or errors.
    ///
    /// # Arguments
    /// - `pred`: The predicate to match.
    /// - `expected`: A description of what we expected, for the error.
    ///
    /// # Errors
    /// This function errors with a [`SyntaxError::Expected`] if the token does not match.
    #[inline]
    pub fn expect(&mut self, pred: impl FnOnce(&Token<'s>) -> bool, expected: &'static str) -> Result<Token<'s>, DslError> {
        match self.eat(pred) {
            Some(token) => Ok(token),
            None => Err(self.unexpected(expected)),
        }
    }

    /// Returns an error reporting that the token at the cursor is not what we expected.
    #[inline]
    pub fn unexpected(&self, expected: &'static str) -> DslError {
        let token: Token = self.peek();
        SyntaxError::Expected { expected, found: token.describe(), range: token.range() }.into()
    }

    /// Runs the given production, which must match.
    ///
    /// # Errors
    /// This function errors if the production does not apply, or if it failed.
    #[inline]
    pub fn require<T>(&mut self, prod: fn(&mut Self) -> Parsed<T>, expected: &'static str) -> Result<T, DslError> {
        match prod(self) {
            Parsed::Matched(value) => Ok(value),
            Parsed::NotApplicable => Err(self.unexpected(expected)),
            Parsed::Fatal(err) => Err(err),
        }
    }

    /// Runs the given production, undoing anything it consumed or built if it turns out not to apply.
    pub fn attempt<T>(&mut self, prod: fn(&mut Self) -> Parsed<T>) -> Parsed<T> {
        let checkpoint: Checkpoint = self.checkpoint();
        let res: Parsed<T> = prod(self);
        if matches!(res, Parsed::NotApplicable) {
            self.rollback(checkpoint);
        }
        res
    }

    /// Returns a checkpoint of the current position.
    #[inline]
    pub fn checkpoint(&self) -> Checkpoint { Checkpoint { cursor: self.cursor, nodes: self.tree.len() } }

    /// Returns to the given checkpoint.
    #[inline]
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        if checkpoint.cursor != self.cursor || checkpoint.nodes != self.tree.len() {
            trace!("Rolling back to token {} and {} nodes", checkpoint.cursor, checkpoint.nodes);
        }
        self.cursor = checkpoint.cursor;
        self.tree.truncate(checkpoint.nodes);
    }



    /// Interns the text of the given token.
    #[inline]
    pub fn intern(&mut self, token: &Token<'s>) -> Rc<str> { self.pool.intern(token.span().fragment()) }

    /// Returns the range of the first token, which is where whole-unit errors are reported.
    #[inline]
    pub fn first_range(&self) -> TextRange { self.tokens.first().map(Token::range).unwrap_or_else(|| TextRange::single((0, 0))) }
}



/// Builds a [`Program`] from the given tokens.
///
/// # Arguments
/// - `tokens`: The tokens to parse, ending in [`Token::End`].
/// - `pool`: The [`StringPool`] the tokens' text was interned in. It becomes the pool of the program.
///
/// # Returns
/// The parsed [`Program`], with `main` rewritten to run the static blocks.
///
/// # Errors
/// This function errors if the tokens do not form a valid program. No partial program is returned.
pub fn parse_tokens(tokens: &[Token], pool: StringPool) -> Result<Program, DslError> {
    debug!("Parsing {} tokens", tokens.len());
    let mut parser: Parser = Parser::new(tokens, pool);
    parser.program()?;

    let Parser { tree, pool, scopes, functions, statics, .. } = parser;
    debug!("Parsed {} globals and {} functions into {} nodes", scopes.globals().len(), functions.len(), tree.count_reachable());
    Ok(Program { tree, pool, globals: scopes.into_globals(), functions, statics })
}
