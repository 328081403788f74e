//  OPS.rs
//    by Kite developers
//
//  Created:
//    19 Oct 2026, 09:55:03
//  Last edited:
//    19 Oct 2026, 15:48:50
//  Auto updated?
//    Yes
//
//  Description:
//!   Defines the statement opcodes that interior tree nodes carry.
//!
//!   The serialized name of every opcode (its tag in the exchange format)
//!   is part of the compatibility boundary between the compiler stages, and
//!   is therefore fixed here rather than derived from the variant order.
//

use enum_debug::EnumDebug;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};


/***** LIBRARY *****/
/// The kind of statement stored in an interior node of the tree.
#[derive(Clone, Copy, Debug, Display, EnumDebug, EnumIter, EnumString, Eq, Hash, IntoStaticStr, PartialEq)]
#[strum(ascii_case_insensitive)]
pub enum Op {
    // Structure
    /// A link in a list of instructions (`item`, `rest`).
    #[strum(serialize = "ST")]
    Compound,
    /// A function definition (`name`, `body`).
    #[strum(serialize = "FUNC")]
    Fun,
    /// A link in a list of parameters or arguments (`item`, `rest`).
    #[strum(serialize = "PARAM")]
    Param,
    /// A `Double` return type marker.
    #[strum(serialize = "TYPE")]
    Type,
    /// A `Void` return type marker.
    #[strum(serialize = "VOID")]
    Void,

    // Declarations
    /// A mutable variable declaration (`name`, `value`).
    #[strum(serialize = "VAR")]
    Var,
    /// A constant declaration (`name`, `value`).
    #[strum(serialize = "VAL")]
    Val,
    /// Assignment to an existing variable (`name`, `value`).
    #[strum(serialize = "EQ")]
    Assign,

    // Control flow
    /// A conditional (`cond`, `body` or `ELSE`).
    #[strum(serialize = "IF")]
    If,
    /// The two arms of a conditional (`then`, `otherwise`).
    #[strum(serialize = "ELSE")]
    Else,
    /// A loop (`cond`, `body`).
    #[strum(serialize = "WHILE")]
    While,
    /// Returns from a function (`value`, nothing).
    #[strum(serialize = "RET")]
    Return,
    /// Calls a function (`name` with the arguments as its left child, nothing).
    #[strum(serialize = "CALL")]
    Call,

    // I/O
    /// Writes every item of a list to the screen.
    #[strum(serialize = "OUT")]
    Out,
    /// Reads every variable of a list from the keyboard.
    #[strum(serialize = "IN")]
    In,
    /// A newline in an output list.
    #[strum(serialize = "ENDL")]
    NewLine,

    // Arithmetic
    /// `+`, binary or unary.
    #[strum(serialize = "ADD")]
    Add,
    /// `-`, binary or unary.
    #[strum(serialize = "SUB")]
    Sub,
    /// `*`
    #[strum(serialize = "MUL")]
    Mul,
    /// `/`
    #[strum(serialize = "DIV")]
    Div,
    /// `^`
    #[strum(serialize = "POW")]
    Pow,
    /// `sin(...)`
    #[strum(serialize = "SIN")]
    Sin,
    /// `cos(...)`
    #[strum(serialize = "COS")]
    Cos,
    /// `tan(...)`
    #[strum(serialize = "TAN")]
    Tan,
    /// `sqrt(...)`
    #[strum(serialize = "SQRT")]
    Sqrt,
    /// Cast to an integer, `[...]` or `int(...)`.
    #[strum(serialize = "MOD")]
    Int,
    /// Symbolic differentiation, `diff(...)`.
    #[strum(serialize = "DIFF")]
    Diff,

    // Relations & logic
    /// `==`
    #[strum(serialize = "IS_EE")]
    Equal,
    /// `!=`
    #[strum(serialize = "IS_NE")]
    NotEqual,
    /// `<`
    #[strum(serialize = "IS_BT")]
    Less,
    /// `>`
    #[strum(serialize = "IS_GT")]
    Greater,
    /// `<=`
    #[strum(serialize = "IS_BE")]
    LessEq,
    /// `>=`
    #[strum(serialize = "IS_GE")]
    GreaterEq,
    /// `&&`
    #[strum(serialize = "AND")]
    And,
    /// `||`
    #[strum(serialize = "OR")]
    Or,
}

impl Op {
    /// Returns the serialized name of this opcode as used in the exchange format.
    #[inline]
    pub fn tag(&self) -> &'static str { self.into() }

    /// Returns the operator as it is written in source text, if it is an infix operator.
    pub fn infix_symbol(&self) -> Option<&'static str> {
        use Op::*;
        match self {
            Add => Some("+"),
            Sub => Some("-"),
            Mul => Some("*"),
            Div => Some("/"),
            Pow => Some("^"),
            Equal => Some("=="),
            NotEqual => Some("!="),
            Less => Some("<"),
            Greater => Some(">"),
            LessEq => Some("<="),
            GreaterEq => Some(">="),
            And => Some("&&"),
            Or => Some("||"),
            Assign => Some("="),
            _ => None,
        }
    }

    /// Returns the name of the builtin function this opcode represents, if any.
    pub fn builtin_name(&self) -> Option<&'static str> {
        use Op::*;
        match self {
            Sin => Some("sin"),
            Cos => Some("cos"),
            Tan => Some("tan"),
            Sqrt => Some("sqrt"),
            Int => Some("int"),
            Diff => Some("diff"),
            _ => None,
        }
    }

    /// Returns whether this opcode is a builtin function of one operand.
    #[inline]
    pub fn is_unary_function(&self) -> bool { self.builtin_name().is_some() }

    /// Returns whether this opcode is a relation (comparison).
    #[inline]
    pub fn is_relation(&self) -> bool { matches!(self, Self::Equal | Self::NotEqual | Self::Less | Self::Greater | Self::LessEq | Self::GreaterEq) }

    /// Returns whether this opcode is a logical connective.
    #[inline]
    pub fn is_logic(&self) -> bool { matches!(self, Self::And | Self::Or) }
}



/***** TESTS *****/
#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use strum::IntoEnumIterator as _;

    use super::*;

    #[test]
    fn test_tags_are_unique_and_parse_back() {
        let tags: Vec<&'static str> = Op::iter().map(|op| op.tag()).collect();
        for (i, tag) in tags.iter().enumerate() {
            assert!(!tags[i + 1..].contains(tag), "Tag '{tag}' occurs twice");
        }
        for op in Op::iter() {
            assert_eq!(Op::from_str(op.tag()), Ok(op));
            assert_eq!(Op::from_str(&op.tag().to_lowercase()), Ok(op));
        }
        assert_eq!(Op::Compound.to_string(), "ST");
        assert!(Op::from_str("NIL").is_err());
    }
}
