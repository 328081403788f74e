//  ERRORS.rs
//    by Kite developers
//
//  Created:
//    19 Oct 2026, 13:28:44
//  Last edited:
//    19 Oct 2026, 18:03:12
//  Auto updated?
//    Yes
//
//  Description:
//!   Defines errors originating from the `kite-dsl` crate.
//

use kite_ast::errors::PrettyError;
use kite_ast::spec::TextRange;
use thiserror::Error;


/***** LIBRARY *****/
/// Errors that occur while scanning source text.
#[derive(Debug, Error)]
pub enum LexError {
    /// A character that starts no token.
    #[error("Unexpected character '{ch}'")]
    UnexpectedCharacter { ch: char, range: TextRange },
    /// A string literal that is never closed.
    #[error("Unterminated string literal")]
    UnterminatedString { range: TextRange },
    /// A `/*`-comment that is never closed.
    #[error("Unterminated comment")]
    UnterminatedComment { range: TextRange },
}

impl LexError {
    /// Returns the range in the source text that this error concerns.
    #[inline]
    pub fn range(&self) -> TextRange {
        match self {
            Self::UnexpectedCharacter { range, .. } | Self::UnterminatedString { range } | Self::UnterminatedComment { range } => *range,
        }
    }
}



/// Errors about the structure of the source text.
#[derive(Debug, Error)]
pub enum SyntaxError {
    /// Some token we did not expect.
    #[error("Expected {expected}, found {found}")]
    Expected { expected: &'static str, found: String, range: TextRange },
    /// An expression statement that does not assign anything.
    #[error("Expected an assignment or a call; expressions cannot be used as statements")]
    NotAStatement { range: TextRange },
    /// There is no `main` function.
    #[error("Missing function 'main'")]
    MissingMain { range: TextRange },
}

impl SyntaxError {
    /// Returns the range in the source text that this error concerns.
    #[inline]
    pub fn range(&self) -> TextRange {
        match self {
            Self::Expected { range, .. } | Self::NotAStatement { range } | Self::MissingMain { range } => *range,
        }
    }
}



/// Errors about the meaning of otherwise well-formed source text.
#[derive(Debug, Error)]
pub enum SemanticError {
    /// A variable that is declared twice in the same scope.
    #[error("Redeclared variable '{name}'")]
    RedeclaredVariable { name: String, range: TextRange },
    /// A function that is declared twice.
    #[error("Redeclared function '{name}'")]
    RedeclaredFunction { name: String, range: TextRange },
    /// A variable that is used but not declared in any visible scope.
    #[error("Undeclared variable '{name}'")]
    UndeclaredVariable { name: String, range: TextRange },
    /// A function that is called before it is declared.
    #[error("Undeclared function '{name}'")]
    UndeclaredFunction { name: String, range: TextRange },
    /// A `val` on the left of an assignment or in an `in`-statement.
    #[error("Cannot assign to '{name}', which is declared as val")]
    AssignToConst { name: String, range: TextRange },
    /// A call with a number of arguments the callee does not accept.
    #[error("Incorrect call of function '{name}': expected {expected} argument(s), got {given}")]
    IncorrectCall { name: String, expected: usize, given: usize, range: TextRange },
    /// A call that omits an argument whose default uses a global the caller shadows.
    #[error("Default argument of function '{func}' uses global '{name}', which is shadowed at this call")]
    ShadowedDefault { func: String, name: String, range: TextRange },
    /// A call to a `Void`-function whose value is used.
    #[error("Use Void-type value in expression (function '{name}' returns Void)")]
    VoidInExpression { name: String, range: TextRange },
    /// A `return e;` in a `Void`-function.
    #[error("Function '{name}' returns Void and cannot return a value")]
    ReturnValueInVoid { name: String, range: TextRange },
    /// A `return;` in a `Double`-function.
    #[error("Function '{name}' returns Double and must return a value")]
    MissingReturnValue { name: String, range: TextRange },
    /// A `main` that takes parameters, which nothing can pass.
    #[error("Function 'main' cannot have parameters")]
    MainWithParameters { range: TextRange },
}

impl SemanticError {
    /// Returns the range in the source text that this error concerns.
    pub fn range(&self) -> TextRange {
        use SemanticError::*;
        match self {
            RedeclaredVariable { range, .. }
            | RedeclaredFunction { range, .. }
            | UndeclaredVariable { range, .. }
            | UndeclaredFunction { range, .. }
            | AssignToConst { range, .. }
            | IncorrectCall { range, .. }
            | ShadowedDefault { range, .. }
            | VoidInExpression { range, .. }
            | ReturnValueInVoid { range, .. }
            | MissingReturnValue { range, .. }
            | MainWithParameters { range } => *range,
        }
    }
}



/// Defines the toplevel errors for this crate.
#[derive(Debug, Error)]
pub enum DslError {
    /// Failed to scan the input.
    #[error("Lexical error: {0}")]
    Lex(#[from] LexError),
    /// Failed to parse the input.
    #[error("Syntax error: {0}")]
    Syntax(#[from] SyntaxError),
    /// The input parsed but does not make sense.
    #[error("Semantic error: {0}")]
    Semantic(#[from] SemanticError),
}

impl DslError {
    /// Returns the range in the source text that this error concerns.
    #[inline]
    pub fn range(&self) -> TextRange {
        match self {
            Self::Lex(err) => err.range(),
            Self::Syntax(err) => err.range(),
            Self::Semantic(err) => err.range(),
        }
    }
}

impl PrettyError for DslError {
    #[inline]
    fn ranges(&self) -> ((String, Option<TextRange>), Vec<(String, TextRange)>) { ((self.to_string(), Some(self.range())), vec![]) }
}
