//  STATEMENTS.rs
//    by Kite developers
//
//  Created:
//    19 Oct 2026, 14:40:51
//  Last edited:
//    19 Oct 2026, 18:34:02
//  Auto updated?
//    Yes
//
//  Description:
//!   Defines the productions for instructions (statements) and blocks.
//

use std::rc::Rc;

use kite_ast::ops::Op;
use kite_ast::spec::TextPos;
use kite_ast::symbols::{ReturnType, Variable};
use kite_ast::tree::NodeId;
use tracing::trace;

use super::parser::Parser;
use super::{Parsed, fatal, matched};
use crate::errors::{DslError, SemanticError, SyntaxError};
use crate::scanner::Token;


/***** TYPES *****/
/// A production that parses one kind of instruction.
type Production<'t, 's> = fn(&mut Parser<'t, 's>) -> Parsed<NodeId>;





/***** LIBRARY *****/
impl<'t, 's> Parser<'t, 's> {
    /// Parses a single instruction, trying every kind of instruction in turn.
    ///
    /// # Returns
    /// The instruction, or [`Parsed::NotApplicable`] if none starts here.
    pub fn instruction(&mut self) -> Parsed<NodeId> {
        let prods: [Production<'t, 's>; 8] =
            [Self::block, Self::if_stmt, Self::while_stmt, Self::call_stmt, Self::expr_stmt, Self::return_stmt, Self::io_stmt, Self::declaration];
        for prod in prods {
            match self.attempt(prod) {
                Parsed::NotApplicable => continue,
                res => return res,
            }
        }
        Parsed::NotApplicable
    }

    /// Parses instructions until the closing `}` of a block, which is consumed too.
    ///
    /// Does not open a scope; the caller decides that.
    ///
    /// # Returns
    /// The list of instructions, which is `ST(NIL, NIL)` if there are none.
    pub fn block_body(&mut self, open: &Token<'s>) -> Result<NodeId, DslError> {
        let mut items: Vec<(NodeId, TextPos)> = Vec::new();
        while self.eat(|t| matches!(t, Token::RightBrace(_))).is_none() {
            let instr: NodeId = self.require(Self::instruction, "a statement or '}'")?;
            items.push((instr, self.tree.pos(instr)));
        }
        Ok(match self.tree.list(Op::Compound, &items) {
            Some(list) => list,
            None => self.tree.stmt(Op::Compound, open.start_of(), None, None),
        })
    }

    /// Parses `{ ... }` in its own scope.
    fn block(&mut self) -> Parsed<NodeId> {
        let Some(open) = self.eat(|t| matches!(t, Token::LeftBrace(_))) else { return Parsed::NotApplicable };
        self.scopes.push();
        let body: Result<NodeId, DslError> = self.block_body(&open);
        self.scopes.pop();
        body.into()
    }

    /// Parses the instruction of an `if`-, `else`- or `while`-arm in its own scope.
    fn arm(&mut self) -> Result<NodeId, DslError> {
        self.scopes.push();
        let instr: Result<NodeId, DslError> = self.require(Self::instruction, "a statement");
        self.scopes.pop();
        instr
    }

    /// Parses a parenthesized condition.
    fn condition(&mut self) -> Result<NodeId, DslError> {
        self.expect(|t| matches!(t, Token::LeftParen(_)), "'('")?;
        let cond: NodeId = self.require(Self::expression, "a condition")?;
        self.expect(|t| matches!(t, Token::RightParen(_)), "')'")?;
        Ok(cond)
    }

    /// Parses `if (c) i` and `if (c) i else j`.
    fn if_stmt(&mut self) -> Parsed<NodeId> {
        let Some(token) = self.eat(|t| matches!(t, Token::If(_))) else { return Parsed::NotApplicable };
        let cond: NodeId = fatal!(self.condition());
        let then: NodeId = fatal!(self.arm());
        let body: NodeId = match self.eat(|t| matches!(t, Token::Else(_))) {
            Some(els) => {
                let other: NodeId = fatal!(self.arm());
                self.tree.stmt(Op::Else, els.start_of(), Some(then), Some(other))
            },
            None => then,
        };
        Parsed::Matched(self.tree.stmt(Op::If, token.start_of(), Some(cond), Some(body)))
    }

    /// Parses `while (c) i`.
    fn while_stmt(&mut self) -> Parsed<NodeId> {
        let Some(token) = self.eat(|t| matches!(t, Token::While(_))) else { return Parsed::NotApplicable };
        let cond: NodeId = fatal!(self.condition());
        let body: NodeId = fatal!(self.arm());
        Parsed::Matched(self.tree.stmt(Op::While, token.start_of(), Some(cond), Some(body)))
    }

    /// Parses `f(...);`, which may call `Void`-functions.
    fn call_stmt(&mut self) -> Parsed<NodeId> {
        if !matches!((self.peek(), self.peek_at(1)), (Token::Identifier(_), Token::LeftParen(_))) {
            return Parsed::NotApplicable;
        }
        let call: NodeId = fatal!(self.call(false));
        fatal!(self.expect(|t| matches!(t, Token::Semicolon(_)), "';'"));
        Parsed::Matched(call)
    }

    /// Parses an expression used as a statement, which must be an assignment.
    fn expr_stmt(&mut self) -> Parsed<NodeId> {
        let expr: NodeId = matched!(self.expression());
        if self.tree.op(expr) != Some(Op::Assign) {
            return Parsed::Fatal(SyntaxError::NotAStatement { range: self.tree.pos(expr).into() }.into());
        }
        fatal!(self.expect(|t| matches!(t, Token::Semicolon(_)), "';'"));
        Parsed::Matched(expr)
    }

    /// Parses `return;` and `return e;`.
    fn return_stmt(&mut self) -> Parsed<NodeId> {
        let Some(token) = self.eat(|t| matches!(t, Token::Return(_))) else { return Parsed::NotApplicable };
        let (name, returns): (Rc<str>, ReturnType) = match &self.current {
            Some(current) => (current.name.clone(), current.returns),
            None => (Rc::from(""), ReturnType::Void),
        };

        let value: Option<NodeId> = match self.peek() {
            Token::Semicolon(_) => None,
            _ => Some(fatal!(self.require(Self::expression, "an expression or ';'"))),
        };
        match (value.is_some(), returns) {
            (true, ReturnType::Void) => return Parsed::Fatal(SemanticError::ReturnValueInVoid { name: name.to_string(), range: token.range() }.into()),
            (false, ReturnType::Double) => return Parsed::Fatal(SemanticError::MissingReturnValue { name: name.to_string(), range: token.range() }.into()),
            _ => {},
        }
        fatal!(self.expect(|t| matches!(t, Token::Semicolon(_)), "';'"));
        Parsed::Matched(self.tree.stmt(Op::Return, token.start_of(), value, None))
    }

    /// Parses `in >> x >> ...;` and `out << e << "..." << endl ...;`.
    fn io_stmt(&mut self) -> Parsed<NodeId> {
        let Some(token) = self.eat(|t| matches!(t, Token::In(_) | Token::Out(_))) else { return Parsed::NotApplicable };
        let is_in: bool = matches!(token, Token::In(_));

        let mut items: Vec<(NodeId, TextPos)> = Vec::new();
        loop {
            let sep: Token = if is_in {
                fatal!(self.expect(|t| matches!(t, Token::ShiftRight(_)), "'>>'"))
            } else {
                fatal!(self.expect(|t| matches!(t, Token::ShiftLeft(_)), "'<<'"))
            };

            let item: NodeId = if is_in {
                let var: Token = fatal!(self.expect(|t| matches!(t, Token::Identifier(_)), "a variable"));
                let name: Rc<str> = self.intern(&var);
                fatal!(self.assignable(&name, &var));
                self.tree.name(name, var.start_of())
            } else {
                match self.peek() {
                    Token::Endl(_) => {
                        let endl: Token = self.advance();
                        self.tree.stmt(Op::NewLine, endl.start_of(), None, None)
                    },
                    Token::String(span) => {
                        let quoted: Token = self.advance();
                        let raw: &str = span.fragment();
                        let text: Rc<str> = self.pool.intern(raw.strip_prefix('"').and_then(|r| r.strip_suffix('"')).unwrap_or(raw));
                        self.tree.string(text, quoted.start_of())
                    },
                    _ => fatal!(self.require(Self::expression, "an expression, a string or 'endl'")),
                }
            };
            items.push((item, sep.start_of()));

            if matches!(self.peek(), Token::Semicolon(_)) {
                break;
            }
        }
        self.advance();

        let op: Op = if is_in { Op::In } else { Op::Out };
        let list: Option<NodeId> = self.tree.list(Op::Param, &items);
        Parsed::Matched(self.tree.stmt(op, token.start_of(), list, None))
    }

    /// Parses `var x = e;` and `val x = e;`, optionally with a `: Double` annotation.
    ///
    /// Declares the variable in the innermost scope, as a global if that is the global scope.
    pub fn declaration(&mut self) -> Parsed<NodeId> {
        let Some(token) = self.eat(|t| matches!(t, Token::Var(_) | Token::Val(_))) else { return Parsed::NotApplicable };
        let is_const: bool = matches!(token, Token::Val(_));
        let var: Token = fatal!(self.expect(|t| matches!(t, Token::Identifier(_)), "a variable name"));
        if self.eat(|t| matches!(t, Token::Colon(_))).is_some() {
            fatal!(self.expect(|t| matches!(t, Token::Double(_)), "'Double'"));
        }
        fatal!(self.expect(|t| matches!(t, Token::Assign(_)), "'='"));

        // The initializer cannot see the variable it initializes
        let value: NodeId = fatal!(self.require(Self::expression, "an initializer"));
        fatal!(self.expect(|t| matches!(t, Token::Semicolon(_)), "';'"));

        let name: Rc<str> = self.intern(&var);
        let is_global: bool = self.scopes.is_global();
        let slot: usize = if is_global {
            self.scopes.globals().len()
        } else {
            self.n_locals += 1;
            self.n_locals - 1
        };
        if !self.scopes.declare(Variable { name: name.clone(), slot, is_const, is_global }) {
            return Parsed::Fatal(SemanticError::RedeclaredVariable { name: name.to_string(), range: var.range() }.into());
        }
        trace!("Declared {} '{}' in slot {} (depth {})", if is_const { "val" } else { "var" }, name, slot, self.scopes.depth());

        let target: NodeId = self.tree.name(name, var.start_of());
        let op: Op = if is_const { Op::Val } else { Op::Var };
        Parsed::Matched(self.tree.stmt(op, token.start_of(), Some(target), Some(value)))
    }
}



/***** TESTS *****/
#[cfg(test)]
mod tests {
    use kite_ast::program::Program;

    use crate::compile;
    use crate::errors::{DslError, SemanticError, SyntaxError};

    /// Wraps the given statements in a `main` and compiles it.
    fn main_with(body: &str) -> Result<Program, DslError> { compile(&format!("fun main(): Void {{\n{body}\n}}\n")) }

    #[test]
    fn test_shadowing() {
        // The inner `x` is writable, while the outer one is a val again after the block
        assert!(main_with("val x = 1; { var x = 2; x = 3; }").is_ok());
        let err: DslError = main_with("val x = 1; { var x = 2; x = 3; } x = 4;").unwrap_err();
        assert!(matches!(err, DslError::Semantic(SemanticError::AssignToConst { .. })), "{err}");

        // Names declared in a block are gone after it
        let err: DslError = main_with("{ var y = 2; } out << y;").unwrap_err();
        assert!(matches!(err, DslError::Semantic(SemanticError::UndeclaredVariable { ref name, .. }) if name == "y"), "{err}");

        // Arms have their own scope too
        let err: DslError = main_with("if (1) var z = 2; out << z;").unwrap_err();
        assert!(matches!(err, DslError::Semantic(SemanticError::UndeclaredVariable { .. })), "{err}");
    }

    #[test]
    fn test_redeclaration() {
        let err: DslError = main_with("var x = 1; var x = 2;").unwrap_err();
        assert!(matches!(err, DslError::Semantic(SemanticError::RedeclaredVariable { .. })), "{err}");
        assert!(main_with("var x = 1; { var x = 2; }").is_ok());
        let err: DslError = compile("fun f(a: Double): Void { var a = 1; } fun main(): Void { }").unwrap_err();
        assert!(matches!(err, DslError::Semantic(SemanticError::RedeclaredVariable { .. })), "{err}");
    }

    #[test]
    fn test_val_assignment() {
        for body in ["val x = 1; x = 2;", "val x = 1; in >> x;", "val x = 1; var y = 0; y = x = 2;"] {
            let err: DslError = main_with(body).unwrap_err();
            assert!(matches!(err, DslError::Semantic(SemanticError::AssignToConst { .. })), "{body}: {err}");
        }
    }

    #[test]
    fn test_statement_forms() {
        assert!(main_with("var x = 0; in >> x; while (x < 10) { x = x + 1; } if (x == 10) out << \"done\" << endl; else out << x;").is_ok());
        let err: DslError = main_with("var x = 0; x + 1;").unwrap_err();
        assert!(matches!(err, DslError::Syntax(SyntaxError::NotAStatement { .. })), "{err}");
        let err: DslError = main_with("return 1;").unwrap_err();
        assert!(matches!(err, DslError::Semantic(SemanticError::ReturnValueInVoid { .. })), "{err}");
        let err: DslError = compile("fun f(): Double { return; } fun main(): Void { }").unwrap_err();
        assert!(matches!(err, DslError::Semantic(SemanticError::MissingReturnValue { .. })), "{err}");
        let err: DslError = main_with("out << 1").unwrap_err();
        assert!(matches!(err, DslError::Syntax(SyntaxError::Expected { expected: "'<<'", .. })), "{err}");
    }
}
