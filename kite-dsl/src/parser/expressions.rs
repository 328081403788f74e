//  EXPRESSIONS.rs
//    by Kite developers
//
//  Created:
//    19 Oct 2026, 14:02:38
//  Last edited:
//    19 Oct 2026, 18:20:15
//  Auto updated?
//    Yes
//
//  Description:
//!   Implements the expression productions, from assignment down to
//!   the primary expressions.
//!
//!   Precedence, from loosest to tightest: `=` (right-associative),
//!   `||`, `&&`, `==`/`!=`, `<`/`>`/`<=`/`>=`, `+`/`-`, `*`/`/`, `^`
//!   (right-associative), unary `+`/`-` and the builtin functions,
//!   calls, and finally parentheses, casts, numbers and variables.
//

use std::rc::Rc;

use kite_ast::ops::Op;
use kite_ast::spec::TextPos;
use kite_ast::symbols::{Function, ReturnType, Variable};
use kite_ast::tree::{NodeId, Value};

use super::parser::Parser;
use super::{Parsed, fatal, matched};
use crate::errors::{DslError, SemanticError, SyntaxError};
use crate::scanner::Token;


/***** HELPER FUNCTIONS *****/
/// Maps a token to the binary operator it represents at the given precedence level.
type OpMap = fn(&Token) -> Option<Op>;

/// `||`
fn logic_or_ops(token: &Token) -> Option<Op> { matches!(token, Token::Or(_)).then_some(Op::Or) }
/// `&&`
fn logic_and_ops(token: &Token) -> Option<Op> { matches!(token, Token::And(_)).then_some(Op::And) }
/// `==` and `!=`
fn equality_ops(token: &Token) -> Option<Op> {
    match token {
        Token::Eq(_) => Some(Op::Equal),
        Token::Ne(_) => Some(Op::NotEqual),
        _ => None,
    }
}
/// `<`, `>`, `<=` and `>=`
fn relational_ops(token: &Token) -> Option<Op> {
    match token {
        Token::Lt(_) => Some(Op::Less),
        Token::Gt(_) => Some(Op::Greater),
        Token::Le(_) => Some(Op::LessEq),
        Token::Ge(_) => Some(Op::GreaterEq),
        _ => None,
    }
}
/// `+` and `-`
fn additive_ops(token: &Token) -> Option<Op> {
    match token {
        Token::Add(_) => Some(Op::Add),
        Token::Min(_) => Some(Op::Sub),
        _ => None,
    }
}
/// `*` and `/`
fn multiplicative_ops(token: &Token) -> Option<Op> {
    match token {
        Token::Mul(_) => Some(Op::Mul),
        Token::Div(_) => Some(Op::Div),
        _ => None,
    }
}

/// Returns the builtin unary function a keyword token calls, if any.
fn builtin_of(token: &Token) -> Option<Op> {
    match token {
        Token::Sin(_) => Some(Op::Sin),
        Token::Cos(_) => Some(Op::Cos),
        Token::Tan(_) => Some(Op::Tan),
        Token::Sqrt(_) => Some(Op::Sqrt),
        Token::Int(_) => Some(Op::Int),
        Token::Diff(_) => Some(Op::Diff),
        _ => None,
    }
}





/***** LIBRARY *****/
impl Parser<'_, '_> {
    /// Parses an expression.
    ///
    /// # Returns
    /// The root of the expression, or [`Parsed::NotApplicable`] if no expression starts here.
    #[inline]
    pub fn expression(&mut self) -> Parsed<NodeId> { self.assignment() }

    /// Parses an assignment, or anything binding tighter.
    fn assignment(&mut self) -> Parsed<NodeId> {
        let (target, Token::Assign(_)) = (self.peek(), self.peek_at(1)) else { return self.logic_or() };
        if !matches!(target, Token::Identifier(_)) {
            return self.logic_or();
        }
        self.advance();
        let eq: Token = self.advance();

        // The target must be a variable we may write to
        let name: Rc<str> = self.intern(&target);
        fatal!(self.assignable(&name, &target));
        let value: NodeId = fatal!(self.require(Self::assignment, "an expression"));

        let target: NodeId = self.tree.name(name, target.start_of());
        Parsed::Matched(self.tree.stmt(Op::Assign, eq.start_of(), Some(target), Some(value)))
    }

    /// Parses a left-associative chain of binary operators.
    ///
    /// # Arguments
    /// - `operand`: The production for the operands, which binds tighter.
    /// - `ops`: Decides which tokens are operators at this level.
    fn binary(&mut self, operand: fn(&mut Self) -> Parsed<NodeId>, ops: OpMap) -> Parsed<NodeId> {
        let mut lhs: NodeId = matched!(operand(self));
        while let Some(op) = ops(&self.peek()) {
            let token: Token = self.advance();
            let rhs: NodeId = fatal!(self.require(operand, "an expression"));
            lhs = self.tree.stmt(op, token.start_of(), Some(lhs), Some(rhs));
        }
        Parsed::Matched(lhs)
    }

    fn logic_or(&mut self) -> Parsed<NodeId> { self.binary(Self::logic_and, logic_or_ops) }

    fn logic_and(&mut self) -> Parsed<NodeId> { self.binary(Self::equality, logic_and_ops) }

    fn equality(&mut self) -> Parsed<NodeId> { self.binary(Self::relational, equality_ops) }

    fn relational(&mut self) -> Parsed<NodeId> { self.binary(Self::additive, relational_ops) }

    fn additive(&mut self) -> Parsed<NodeId> { self.binary(Self::multiplicative, additive_ops) }

    fn multiplicative(&mut self) -> Parsed<NodeId> { self.binary(Self::power, multiplicative_ops) }

    /// Parses `a ^ b`, which associates to the right.
    fn power(&mut self) -> Parsed<NodeId> {
        let base: NodeId = matched!(self.unary());
        let Some(token) = self.eat(|t| matches!(t, Token::Pow(_))) else { return Parsed::Matched(base) };
        let exponent: NodeId = fatal!(self.require(Self::power, "an exponent"));
        Parsed::Matched(self.tree.stmt(Op::Pow, token.start_of(), Some(base), Some(exponent)))
    }

    /// Parses unary `+`/`-` and the builtin functions.
    fn unary(&mut self) -> Parsed<NodeId> {
        let token: Token = self.peek();
        match token {
            Token::Add(_) | Token::Min(_) => {
                self.advance();
                let operand: NodeId = fatal!(self.require(Self::power, "an expression"));
                let op: Op = if matches!(token, Token::Add(_)) { Op::Add } else { Op::Sub };
                Parsed::Matched(self.tree.stmt(op, token.start_of(), Some(operand), None))
            },

            token => match builtin_of(&token) {
                Some(op) => {
                    self.advance();
                    fatal!(self.expect(|t| matches!(t, Token::LeftParen(_)), "'('"));
                    let operand: NodeId = fatal!(self.require(Self::expression, "an expression"));
                    fatal!(self.expect(|t| matches!(t, Token::RightParen(_)), "')'"));
                    Parsed::Matched(self.tree.stmt(op, token.start_of(), Some(operand), None))
                },
                None => self.postfix(),
            },
        }
    }

    /// Parses a call whose value is used, or a primary expression.
    fn postfix(&mut self) -> Parsed<NodeId> {
        if matches!((self.peek(), self.peek_at(1)), (Token::Identifier(_), Token::LeftParen(_))) {
            return self.call(true).into();
        }
        self.primary()
    }

    /// Parses parentheses, `[...]`-casts, numbers and variables.
    fn primary(&mut self) -> Parsed<NodeId> {
        let token: Token = self.peek();
        match token {
            Token::LeftParen(_) => {
                self.advance();
                let expr: NodeId = fatal!(self.require(Self::expression, "an expression"));
                fatal!(self.expect(|t| matches!(t, Token::RightParen(_)), "')'"));
                Parsed::Matched(expr)
            },

            Token::LeftBracket(_) => {
                self.advance();
                let expr: NodeId = fatal!(self.require(Self::expression, "an expression"));
                fatal!(self.expect(|t| matches!(t, Token::RightBracket(_)), "']'"));
                Parsed::Matched(self.tree.stmt(Op::Int, token.start_of(), Some(expr), None))
            },

            Token::Number(span) => {
                self.advance();
                match span.fragment().parse::<f64>() {
                    Ok(value) => Parsed::Matched(self.tree.number(value, token.start_of())),
                    Err(_) => Parsed::Fatal(SyntaxError::Expected { expected: "a number", found: token.describe(), range: token.range() }.into()),
                }
            },

            Token::Identifier(_) => {
                self.advance();
                let name: Rc<str> = self.intern(&token);
                if self.scopes.lookup(&name).is_none() {
                    return Parsed::Fatal(SemanticError::UndeclaredVariable { name: name.to_string(), range: token.range() }.into());
                }
                Parsed::Matched(self.tree.name(name, token.start_of()))
            },

            _ => Parsed::NotApplicable,
        }
    }



    /// Checks that the variable with the given name may be assigned.
    ///
    /// # Errors
    /// This function errors if it is not declared or declared as `val`.
    pub fn assignable(&self, name: &Rc<str>, token: &Token) -> Result<(), DslError> {
        match self.scopes.lookup(name) {
            Some(Variable { is_const: false, .. }) => Ok(()),
            Some(_) => Err(SemanticError::AssignToConst { name: name.to_string(), range: token.range() }.into()),
            None => Err(SemanticError::UndeclaredVariable { name: name.to_string(), range: token.range() }.into()),
        }
    }

    /// Parses a call `f(a, b, ...)`. The cursor must be at the function's name.
    ///
    /// Omitted trailing arguments are filled in with copies of the parameters' defaults.
    ///
    /// # Arguments
    /// - `as_value`: Whether the value of the call is used, which `Void`-functions do not have.
    ///
    /// # Returns
    /// The `CALL` node.
    ///
    /// # Errors
    /// This function errors if the function is not declared, if the arguments do not fit it, or if `as_value` is given for a `Void`-function.
    pub fn call(&mut self, as_value: bool) -> Result<NodeId, DslError> {
        let token: Token = self.expect(|t| matches!(t, Token::Identifier(_)), "a function name")?;
        let name: Rc<str> = self.intern(&token);
        let Some(func) = self.functions.get(&name).cloned() else {
            return Err(SemanticError::UndeclaredFunction { name: name.to_string(), range: token.range() }.into());
        };
        if as_value && func.returns == ReturnType::Void {
            return Err(SemanticError::VoidInExpression { name: name.to_string(), range: token.range() }.into());
        }

        // Parse the arguments
        self.expect(|t| matches!(t, Token::LeftParen(_)), "'('")?;
        let mut args: Vec<(NodeId, TextPos)> = Vec::new();
        if self.eat(|t| matches!(t, Token::RightParen(_))).is_none() {
            loop {
                let arg: NodeId = self.require(Self::expression, "an argument")?;
                args.push((arg, self.tree.pos(arg)));
                if self.eat(|t| matches!(t, Token::Comma(_))).is_none() {
                    break;
                }
            }
            self.expect(|t| matches!(t, Token::RightParen(_)), "',' or ')'")?;
        }

        // Match them with the parameters
        let defaults: Vec<Option<NodeId>> = self.defaults_of(&func);
        let given: usize = args.len();
        if given > func.arity || defaults[given.min(defaults.len())..].iter().any(Option::is_none) {
            return Err(SemanticError::IncorrectCall { name: name.to_string(), expected: func.arity, given, range: token.range() }.into());
        }
        for default in defaults[given..].iter().flatten() {
            if let Some(shadowed) = self.shadowed_in(*default) {
                return Err(SemanticError::ShadowedDefault { func: name.to_string(), name: shadowed.to_string(), range: token.range() }.into());
            }
            let copy: NodeId = self.tree.deep_copy(*default);
            args.push((copy, token.start_of()));
        }

        let args: Option<NodeId> = self.tree.list(Op::Param, &args);
        let callee: NodeId = self.tree.add(Value::Name(name), token.start_of(), args, None);
        Ok(self.tree.stmt(Op::Call, token.start_of(), Some(callee), None))
    }

    /// Finds a variable in a default expression that no longer refers to its global at the current position.
    ///
    /// Defaults only see globals, so any variable in one that resolves to a local here is shadowed.
    fn shadowed_in(&self, id: NodeId) -> Option<Rc<str>> {
        match self.tree.value(id) {
            Value::Name(name) => self.scopes.lookup(name).is_some_and(|var| !var.is_global).then(|| name.clone()),
            // Only the arguments of a call are variables
            Value::Statement(Op::Call) => self.tree.left(id).and_then(|callee| self.tree.left(callee)).and_then(|args| self.shadowed_in(args)),
            _ => self.tree.left(id).and_then(|lhs| self.shadowed_in(lhs)).or_else(|| self.tree.right(id).and_then(|rhs| self.shadowed_in(rhs))),
        }
    }

    /// Returns the default expressions of the parameters of the given function, in order.
    fn defaults_of(&self, func: &Function) -> Vec<Option<NodeId>> {
        let params: Option<NodeId> = self.tree.left(func.node).and_then(|name| self.tree.left(name));
        self.tree.list_items(params).map(|(_, var)| var.and_then(|var| self.tree.right(var))).collect()
    }
}



/***** TESTS *****/
#[cfg(test)]
mod tests {
    use kite_ast::tree::Tree;

    use crate::compile;
    use crate::errors::{DslError, SemanticError};

    use super::*;

    /// Compiles a `main` that outputs the given expression, and returns the tree and the expression's root.
    fn expr_of(globals: &str, expr: &str) -> (Tree, NodeId) {
        let source: String = format!("{globals}\nfun main(): Void {{ out << {expr}; }}");
        let program = compile(&source).unwrap_or_else(|err| panic!("Failed to compile '{source}': {err}"));
        let main: NodeId = program.functions.get_str("main").unwrap().node;
        let body: NodeId = program.tree.right(main).unwrap();
        let out: NodeId = program.tree.left(body).unwrap();
        let first: NodeId = program.tree.left(program.tree.left(out).unwrap()).unwrap();
        (program.tree, first)
    }

    #[test]
    fn test_precedence() {
        // 1 + 2 * 3 ^ 2 ^ 1
        let (tree, root) = expr_of("", "1 + 2 * 3 ^ 2 ^ 1");
        assert_eq!(tree.op(root), Some(Op::Add));
        let mul: NodeId = tree.right(root).unwrap();
        assert_eq!(tree.op(mul), Some(Op::Mul));
        let pow: NodeId = tree.right(mul).unwrap();
        assert_eq!(tree.op(pow), Some(Op::Pow));
        assert_eq!(tree.op(tree.right(pow).unwrap()), Some(Op::Pow));

        // -x ^ 2 negates the power, and unary operands live on the left
        let (tree, root) = expr_of("var x = 2;", "-x ^ 2");
        assert_eq!(tree.op(root), Some(Op::Sub));
        assert!(tree.right(root).is_none());
        assert_eq!(tree.op(tree.left(root).unwrap()), Some(Op::Pow));

        // Relations bind looser than arithmetic, logic looser still
        let (tree, root) = expr_of("var x = 2;", "x < 1 + 2 && x != 3 || [x] == sin(x)");
        assert_eq!(tree.op(root), Some(Op::Or));
        assert_eq!(tree.op(tree.left(root).unwrap()), Some(Op::And));
        let eq: NodeId = tree.right(root).unwrap();
        assert_eq!(tree.op(eq), Some(Op::Equal));
        assert_eq!(tree.op(tree.left(eq).unwrap()), Some(Op::Int));
        assert_eq!(tree.op(tree.right(eq).unwrap()), Some(Op::Sin));
    }

    #[test]
    fn test_assignment_is_right_associative() {
        let (tree, root) = expr_of("var x = 1; var y = 2;", "x = y = 3");
        assert_eq!(tree.op(root), Some(Op::Assign));
        assert_eq!(tree.value(tree.left(root).unwrap()), &Value::Name("x".into()));
        assert_eq!(tree.op(tree.right(root).unwrap()), Some(Op::Assign));
    }

    #[test]
    fn test_calls_and_defaults() {
        let (tree, root) = expr_of("fun f(a: Double, b: Double = 2 * 3): Double { return a + b; }", "f(1)");
        assert_eq!(tree.op(root), Some(Op::Call));
        let callee: NodeId = tree.left(root).unwrap();
        assert_eq!(tree.value(callee), &Value::Name("f".into()));
        let args: Vec<NodeId> = tree.list_items(tree.left(callee)).filter_map(|(_, arg)| arg).collect();
        assert_eq!(args.len(), 2);
        assert_eq!(tree.number_of(args[0]), Some(1.0));
        assert_eq!(tree.op(args[1]), Some(Op::Mul));

        // Missing non-default arguments, too many arguments and void values are rejected
        let fun: &str = "fun f(a: Double, b: Double = 1): Double { return a; } fun g(): Void { }";
        for (expr, given) in [("f()", 0), ("f(1, 2, 3)", 3)] {
            let err = compile(&format!("{fun} fun main(): Void {{ out << {expr}; }}")).unwrap_err();
            assert!(matches!(err, DslError::Semantic(SemanticError::IncorrectCall { expected: 2, given: g, .. }) if g == given), "{err}");
        }
        let err = compile(&format!("{fun} fun main(): Void {{ out << g(); }}")).unwrap_err();
        assert!(matches!(err, DslError::Semantic(SemanticError::VoidInExpression { .. })), "{err}");
        assert!(compile(&format!("{fun} fun main(): Void {{ g(); f(1); }}")).is_ok());
    }

    #[test]
    fn test_defaults_keep_their_globals() {
        let fun: &str = "var g = 1;\nfun f(b: Double = g + sin(g)): Double { return b; }\n";

        // A local with the same name would capture the copied default
        for body in ["var g = 5;\n    out << f();", "if (1) {\n        val g = 5;\n        out << f();\n    }"] {
            let source: String = format!("{fun}fun main(): Void {{\n    {body}\n}}\n");
            let err: DslError = compile(&source).unwrap_err();
            assert!(
                matches!(&err, DslError::Semantic(SemanticError::ShadowedDefault { func, name, .. }) if func == "f" && name == "g"),
                "{source}: {err}"
            );
        }
        let err: DslError = compile(&format!("{fun}fun main(): Void {{\n    var g = 5;\n    out << f();\n}}\n")).unwrap_err();
        assert_eq!(err.range().start, TextPos::new1(5, 12));

        // Passing the argument, or shadowing after the scope ended, is fine
        assert!(compile(&format!("{fun}fun main(): Void {{ var g = 5; out << f(g); }}")).is_ok());
        assert!(compile(&format!("{fun}fun main(): Void {{ {{ var g = 5; }} out << f(); }}")).is_ok());
        // So is a parameter of the same name as a function called in the default
        let fun: &str = "fun h(x: Double): Double { return x; } var g = 1; fun f(b: Double = h(g)): Double { return b; }";
        assert!(compile(&format!("{fun} fun main(): Void {{ var h = 2; out << f(); }}")).is_ok());
    }

    #[test]
    fn test_arity_mismatch_reports_call_position() {
        let source: &str = "fun f(a: Double): Double { return a; }\nfun main(): Void {\n    out << f(1, 2);\n}\n";
        let err: DslError = compile(source).unwrap_err();
        assert!(matches!(err, DslError::Semantic(SemanticError::IncorrectCall { .. })));
        assert_eq!(err.range().start, TextPos::new1(3, 12));
    }
}
