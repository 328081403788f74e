//  TOKENS.rs
//    by Kite developers
//
//  Created:
//    19 Oct 2026, 13:04:45
//  Last edited:
//    19 Oct 2026, 16:52:18
//  Auto updated?
//    Yes
//
//  Description:
//!   Defines the tokens to which Kite is scanned, and from which the
//!   tree is built.
//

use enum_debug::EnumDebug;
use kite_ast::spec::{TextPos, TextRange};

use super::Input;


/***** LIBRARY *****/
/// Defines the tokens of Kite.
#[derive(Clone, Copy, Debug, EnumDebug)]
pub enum Token<'s> {
    // Identifiers
    /// Represents an identifier.
    Identifier(Input<'s>),

    // Literals
    /// A decimal number.
    Number(Input<'s>),
    /// A string value, including its quotes.
    String(Input<'s>),

    // Keywords
    /// 'endl'
    Endl(Input<'s>),
    /// 'out'
    Out(Input<'s>),
    /// 'in'
    In(Input<'s>),
    /// 'val'
    Val(Input<'s>),
    /// 'var'
    Var(Input<'s>),
    /// 'sqrt'
    Sqrt(Input<'s>),
    /// 'sin'
    Sin(Input<'s>),
    /// 'cos'
    Cos(Input<'s>),
    /// 'tan'
    Tan(Input<'s>),
    /// 'int'
    Int(Input<'s>),
    /// 'diff'
    Diff(Input<'s>),
    /// 'fun'
    Fun(Input<'s>),
    /// 'Void'
    Void(Input<'s>),
    /// 'Double'
    Double(Input<'s>),
    /// 'return'
    Return(Input<'s>),
    /// 'if'
    If(Input<'s>),
    /// 'else'
    Else(Input<'s>),
    /// 'while'
    While(Input<'s>),
    /// 'static'
    Static(Input<'s>),

    // Operators
    /// `->`
    Arrow(Input<'s>),
    /// `::`
    Scope(Input<'s>),
    /// `==`
    Eq(Input<'s>),
    /// `!=`
    Ne(Input<'s>),
    /// `<`
    Lt(Input<'s>),
    /// `<=`
    Le(Input<'s>),
    /// `>`
    Gt(Input<'s>),
    /// `>=`
    Ge(Input<'s>),
    /// `&&`
    And(Input<'s>),
    /// `||`
    Or(Input<'s>),
    /// `<<`
    ShiftLeft(Input<'s>),
    /// `>>`
    ShiftRight(Input<'s>),
    /// `!`
    Not(Input<'s>),
    /// `&`
    Ampersand(Input<'s>),
    /// `|`
    Pipe(Input<'s>),
    /// `+`
    Add(Input<'s>),
    /// `-`
    Min(Input<'s>),
    /// `*`
    Mul(Input<'s>),
    /// `/`
    Div(Input<'s>),
    /// `^`
    Pow(Input<'s>),
    /// `=`
    Assign(Input<'s>),

    // Punctuation
    /// `,`
    Comma(Input<'s>),
    /// `:`
    Colon(Input<'s>),
    /// `;`
    Semicolon(Input<'s>),
    /// `(`
    LeftParen(Input<'s>),
    /// `)`
    RightParen(Input<'s>),
    /// `[`
    LeftBracket(Input<'s>),
    /// `]`
    RightBracket(Input<'s>),
    /// `{`
    LeftBrace(Input<'s>),
    /// `}`
    RightBrace(Input<'s>),

    // Sentinels
    /// The end of the input. Its span is empty.
    End(Input<'s>),
    /// A character that starts no token. Scanning halts on it.
    Error(Input<'s>),
}

impl<'s> Token<'s> {
    /// Returns the span for this token.
    pub fn span(&self) -> &Input<'s> {
        use Token::*;
        match self {
            Identifier(span) |

            Number(span) |
            String(span) |

            Endl(span)   |
            Out(span)    |
            In(span)     |
            Val(span)    |
            Var(span)    |
            Sqrt(span)   |
            Sin(span)    |
            Cos(span)    |
            Tan(span)    |
            Int(span)    |
            Diff(span)   |
            Fun(span)    |
            Void(span)   |
            Double(span) |
            Return(span) |
            If(span)     |
            Else(span)   |
            While(span)  |
            Static(span) |

            Arrow(span)      |
            Scope(span)      |
            Eq(span)         |
            Ne(span)         |
            Lt(span)         |
            Le(span)         |
            Gt(span)         |
            Ge(span)         |
            And(span)        |
            Or(span)         |
            ShiftLeft(span)  |
            ShiftRight(span) |
            Not(span)        |
            Ampersand(span)  |
            Pipe(span)       |
            Add(span)        |
            Min(span)        |
            Mul(span)        |
            Div(span)        |
            Pow(span)        |
            Assign(span)     |

            Comma(span)        |
            Colon(span)        |
            Semicolon(span)    |
            LeftParen(span)    |
            RightParen(span)   |
            LeftBracket(span)  |
            RightBracket(span) |
            LeftBrace(span)    |
            RightBrace(span)   |

            End(span)   |
            Error(span) => span,
        }
    }

    /// Returns the start position for this token.
    #[inline]
    pub fn start_of(&self) -> TextPos { TextPos::start_of(self.span()) }

    /// Returns the end position (inclusive) for this token.
    #[inline]
    pub fn end_of(&self) -> TextPos { TextPos::end_of(self.span()) }

    /// Returns the range for this token.
    #[inline]
    pub fn range(&self) -> TextRange { TextRange::from(self.span()) }

    /// Returns how to refer to this token in error messages.
    pub fn describe(&self) -> std::string::String {
        match self {
            Self::End(_) => "end of input".into(),
            Self::Identifier(span) => format!("identifier '{}'", span.fragment()),
            Self::Number(span) => format!("number '{}'", span.fragment()),
            Self::String(span) => format!("string {}", span.fragment()),
            other => format!("'{}'", other.span().fragment()),
        }
    }
}
