//  TOPLEVEL.rs
//    by Kite developers
//
//  Created:
//    19 Oct 2026, 15:12:27
//  Last edited:
//    19 Oct 2026, 18:52:40
//  Auto updated?
//    Yes
//
//  Description:
//!   Implements the productions for a whole translation unit: functions,
//!   static blocks and global declarations.
//

use std::rc::Rc;

use kite_ast::ops::Op;
use kite_ast::program::{MAIN_NAME, STATIC_PREFIX};
use kite_ast::spec::TextPos;
use kite_ast::symbols::{Function, ReturnType, Variable};
use kite_ast::tree::{NodeId, Value};
use tracing::debug;

use super::Parsed;
use super::parser::{CurrentFunction, Parser};
use crate::errors::{DslError, SemanticError, SyntaxError};
use crate::scanner::Token;


/***** AUXILLARY *****/
/// A parameter as written in a function header.
struct Param<'s> {
    /// The token naming the parameter.
    token   : Token<'s>,
    /// The name of the parameter.
    name    : Rc<str>,
    /// The default expression, if any.
    default : Option<NodeId>,
}





/***** LIBRARY *****/
impl<'t, 's> Parser<'t, 's> {
    /// Parses a whole translation unit and makes it the root of the tree.
    ///
    /// Afterwards, `main` has been rewritten to run the static blocks and the function table follows the order of the toplevel.
    ///
    /// # Errors
    /// This function errors if the tokens do not form a valid program, including when there is no `main`.
    pub fn program(&mut self) -> Result<(), DslError> {
        let mut items: Vec<(NodeId, TextPos)> = Vec::new();
        loop {
            let item: NodeId = match self.peek() {
                Token::End(_) => break,
                Token::Fun(_) => self.function()?,
                Token::Static(_) => self.static_block()?,
                Token::Var(_) | Token::Val(_) => match self.declaration() {
                    Parsed::Matched(decl) => decl,
                    Parsed::NotApplicable => return Err(self.unexpected("a declaration")),
                    Parsed::Fatal(err) => return Err(err),
                },
                _ => return Err(self.unexpected("a function, a static block or a declaration")),
            };
            items.push((item, self.tree.pos(item)));
        }
        if self.functions.get_str(MAIN_NAME).is_none() {
            return Err(SyntaxError::MissingMain { range: self.first_range() }.into());
        }

        self.rewrite_statics(&mut items);
        self.functions.sort_by_key(|f| items.iter().position(|(item, _)| *item == f.node));
        let root: Option<NodeId> = self.tree.list(Op::Compound, &items);
        self.tree.set_root(root);
        Ok(())
    }

    /// Parses `fun name(p: Double = default, ...): Double { ... }`.
    ///
    /// The function is declared before its body is parsed, so it may call itself.
    fn function(&mut self) -> Result<NodeId, DslError> {
        let fun: Token = self.expect(|t| matches!(t, Token::Fun(_)), "'fun'")?;
        let token: Token = self.expect(|t| matches!(t, Token::Identifier(_)), "a function name")?;
        let name: Rc<str> = self.intern(&token);
        if self.functions.get(&name).is_some() {
            return Err(SemanticError::RedeclaredFunction { name: name.to_string(), range: token.range() }.into());
        }

        // Defaults see the globals only
        self.expect(|t| matches!(t, Token::LeftParen(_)), "'('")?;
        let mut params: Vec<Param<'s>> = Vec::new();
        if self.eat(|t| matches!(t, Token::RightParen(_))).is_none() {
            loop {
                params.push(self.param()?);
                if self.eat(|t| matches!(t, Token::Comma(_))).is_none() {
                    break;
                }
            }
            self.expect(|t| matches!(t, Token::RightParen(_)), "',' or ')'")?;
        }
        let returns: ReturnType = if self.eat(|t| matches!(t, Token::Colon(_))).is_some() {
            match self.advance() {
                Token::Double(_) => ReturnType::Double,
                Token::Void(_) => ReturnType::Void,
                other => {
                    return Err(SyntaxError::Expected { expected: "'Double' or 'Void'", found: other.describe(), range: other.range() }.into());
                },
            }
        } else {
            ReturnType::Void
        };
        if &*name == MAIN_NAME && !params.is_empty() {
            return Err(SemanticError::MainWithParameters { range: token.range() }.into());
        }

        // Build the header and register the function
        let mut links: Vec<(NodeId, TextPos)> = Vec::with_capacity(params.len());
        for param in &params {
            let pname: NodeId = self.tree.name(param.name.clone(), param.token.start_of());
            let var: NodeId = self.tree.stmt(Op::Var, param.token.start_of(), Some(pname), param.default);
            links.push((var, param.token.start_of()));
        }
        let list: Option<NodeId> = self.tree.list(Op::Param, &links);
        let node: NodeId = self.header(fun.start_of(), token.start_of(), name.clone(), list, returns);
        self.functions.declare(Function { name: name.clone(), returns, arity: params.len(), node });
        if &*name == MAIN_NAME {
            self.seen_main = true;
        }

        // Parameters go first in the function's scope, which the body shares
        self.scopes.push();
        self.n_locals = 0;
        let mut res: Result<(), DslError> = Ok(());
        for param in &params {
            let slot: usize = self.n_locals;
            if !self.scopes.declare(Variable { name: param.name.clone(), slot, is_const: false, is_global: false }) {
                res = Err(SemanticError::RedeclaredVariable { name: param.name.to_string(), range: param.token.range() }.into());
                break;
            }
            self.n_locals += 1;
        }
        let body: Result<NodeId, DslError> = res.and_then(|_| self.body(name.clone(), returns));
        self.scopes.pop();
        let body: NodeId = body?;

        self.tree.set_right(node, Some(body));
        debug!("Parsed function '{}' with {} parameter(s) and {} slot(s)", name, params.len(), self.n_locals);
        Ok(node)
    }

    /// Parses `name: Double` and `name: Double = default`.
    fn param(&mut self) -> Result<Param<'s>, DslError> {
        let token: Token = self.expect(|t| matches!(t, Token::Identifier(_)), "a parameter name")?;
        self.expect(|t| matches!(t, Token::Colon(_)), "':'")?;
        self.expect(|t| matches!(t, Token::Double(_)), "'Double'")?;
        let default: Option<NodeId> =
            if self.eat(|t| matches!(t, Token::Assign(_))).is_some() { Some(self.require(Self::expression, "a default value")?) } else { None };
        Ok(Param { name: self.intern(&token), token, default })
    }

    /// Parses `static { ... }` into a `Void`-function without parameters.
    fn static_block(&mut self) -> Result<NodeId, DslError> {
        let token: Token = self.expect(|t| matches!(t, Token::Static(_)), "'static'")?;
        let index: usize = self.statics.before.len() + self.statics.after.len();
        let name: Rc<str> = self.pool.intern(&format!("{STATIC_PREFIX}{index}"));

        let node: NodeId = self.header(token.start_of(), token.start_of(), name.clone(), None, ReturnType::Void);
        if !self.functions.declare(Function { name: name.clone(), returns: ReturnType::Void, arity: 0, node }) {
            return Err(SemanticError::RedeclaredFunction { name: name.to_string(), range: token.range() }.into());
        }
        if self.seen_main {
            self.statics.after.push(name.clone());
        } else {
            self.statics.before.push(name.clone());
        }

        self.scopes.push();
        self.n_locals = 0;
        let body: Result<NodeId, DslError> = self.body(name, ReturnType::Void);
        self.scopes.pop();
        self.tree.set_right(node, Some(body?));
        Ok(node)
    }

    /// Builds `FUNC(NAME name{params, TYPE|VOID}, NIL)`; the body is set later.
    fn header(&mut self, at: TextPos, name_at: TextPos, name: Rc<str>, params: Option<NodeId>, returns: ReturnType) -> NodeId {
        let ty: NodeId = self.tree.stmt(if returns == ReturnType::Double { Op::Type } else { Op::Void }, name_at, None, None);
        let name: NodeId = self.tree.add(Value::Name(name), name_at, params, Some(ty));
        self.tree.stmt(Op::Fun, at, Some(name), None)
    }

    /// Parses the `{ ... }` body of the given function in the current scope.
    fn body(&mut self, name: Rc<str>, returns: ReturnType) -> Result<NodeId, DslError> {
        let open: Token = self.expect(|t| matches!(t, Token::LeftBrace(_)), "'{'")?;
        self.current = Some(CurrentFunction { name, returns });
        let body: Result<NodeId, DslError> = self.block_body(&open);
        self.current = None;
        body
    }
}



/***** TESTS *****/
