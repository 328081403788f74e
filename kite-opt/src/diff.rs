//  DIFF.rs
//    by Kite developers
//
//  Created:
//    19 Oct 2026, 19:41:19
//  Last edited:
//    19 Oct 2026, 20:05:33
//  Auto updated?
//    Yes
//
//  Description:
//!   Implements symbolic differentiation of expression trees.
//!
//!   Every variable is taken to be the variable of differentiation.
//

use kite_ast::ops::Op;
use kite_ast::spec::TextPos;
use kite_ast::tree::{NodeId, Tree, Value};

use crate::errors::SimplifyError;


/***** HELPER FUNCTIONS *****/
/// Builds a binary node.
#[inline]
fn binary(tree: &mut Tree, op: Op, pos: TextPos, lhs: NodeId, rhs: NodeId) -> NodeId { tree.stmt(op, pos, Some(lhs), Some(rhs)) }

/// Builds a unary node, which keeps its operand on the left.
#[inline]
fn unary(tree: &mut Tree, op: Op, pos: TextPos, operand: NodeId) -> NodeId { tree.stmt(op, pos, Some(operand), None) }

/// Returns the operand of a unary node.
fn operand(tree: &Tree, id: NodeId, op: Op) -> Result<NodeId, SimplifyError> {
    tree.left(id).ok_or(SimplifyError::MissingOperand { op: op.tag(), expected: "an operand", pos: tree.pos(id) })
}

/// Returns both operands of a binary node.
fn operands(tree: &Tree, id: NodeId, op: Op) -> Result<(NodeId, NodeId), SimplifyError> {
    match (tree.left(id), tree.right(id)) {
        (Some(lhs), Some(rhs)) => Ok((lhs, rhs)),
        _ => Err(SimplifyError::MissingOperand { op: op.tag(), expected: "two operands", pos: tree.pos(id) }),
    }
}





/***** LIBRARY *****/
/// Builds the derivative of the given expression.
///
/// The expression itself is left untouched; wherever the derivative needs it, a copy is made.
///
/// # Arguments
/// - `tree`: The [`Tree`] containing the expression and in which to build the derivative.
/// - `id`: The root of the expression.
///
/// # Returns
/// The root of the derivative, which has no parent yet.
///
/// # Errors
/// This function errors if the expression contains something we have no rule for, like `sqrt` or `^`.
pub fn derive(tree: &mut Tree, id: NodeId) -> Result<NodeId, SimplifyError> {
    let pos: TextPos = tree.pos(id);
    let op: Op = match tree.value(id) {
        Value::Number(_) => return Ok(tree.number(0.0, pos)),
        Value::Name(_) => return Ok(tree.number(1.0, pos)),
        Value::String(_) => return Err(SimplifyError::UnsupportedDiff { what: "a string".into(), pos }),
        Value::Statement(op) => *op,
    };

    match op {
        // (u ± v)' = u' ± v'
        Op::Add | Op::Sub => match tree.right(id) {
            Some(rhs) => {
                let lhs: NodeId = operand(tree, id, op)?;
                let (dl, dr): (NodeId, NodeId) = (derive(tree, lhs)?, derive(tree, rhs)?);
                Ok(binary(tree, op, pos, dl, dr))
            },
            None => {
                let u: NodeId = operand(tree, id, op)?;
                let du: NodeId = derive(tree, u)?;
                Ok(unary(tree, op, pos, du))
            },
        },

        // (u·v)' = u'·v + u·v'
        Op::Mul => {
            let (u, v): (NodeId, NodeId) = operands(tree, id, op)?;
            let (du, dv): (NodeId, NodeId) = (derive(tree, u)?, derive(tree, v)?);
            let (u, v): (NodeId, NodeId) = (tree.deep_copy(u), tree.deep_copy(v));
            let lhs: NodeId = binary(tree, Op::Mul, pos, du, v);
            let rhs: NodeId = binary(tree, Op::Mul, pos, u, dv);
            Ok(binary(tree, Op::Add, pos, lhs, rhs))
        },

        // (u/v)' = (u'·v - u·v') / (v·v)
        Op::Div => {
            let (u, v): (NodeId, NodeId) = operands(tree, id, op)?;
            let (du, dv): (NodeId, NodeId) = (derive(tree, u)?, derive(tree, v)?);
            let (u, v1, v2, v3): (NodeId, NodeId, NodeId, NodeId) = (tree.deep_copy(u), tree.deep_copy(v), tree.deep_copy(v), tree.deep_copy(v));
            let lhs: NodeId = binary(tree, Op::Mul, pos, du, v1);
            let rhs: NodeId = binary(tree, Op::Mul, pos, u, dv);
            let num: NodeId = binary(tree, Op::Sub, pos, lhs, rhs);
            let den: NodeId = binary(tree, Op::Mul, pos, v2, v3);
            Ok(binary(tree, Op::Div, pos, num, den))
        },

        // sin(u)' = cos(u)·u'
        Op::Sin => {
            let u: NodeId = operand(tree, id, op)?;
            let du: NodeId = derive(tree, u)?;
            let u: NodeId = tree.deep_copy(u);
            let cos: NodeId = unary(tree, Op::Cos, pos, u);
            Ok(binary(tree, Op::Mul, pos, cos, du))
        },

        // cos(u)' = -sin(u)·u'
        Op::Cos => {
            let u: NodeId = operand(tree, id, op)?;
            let du: NodeId = derive(tree, u)?;
            let u: NodeId = tree.deep_copy(u);
            let sin: NodeId = unary(tree, Op::Sin, pos, u);
            let neg: NodeId = unary(tree, Op::Sub, pos, sin);
            Ok(binary(tree, Op::Mul, pos, neg, du))
        },

        // tan(u)' = u' / (cos(u)·cos(u))
        Op::Tan => {
            let u: NodeId = operand(tree, id, op)?;
            let du: NodeId = derive(tree, u)?;
            let (u1, u2): (NodeId, NodeId) = (tree.deep_copy(u), tree.deep_copy(u));
            let (cos1, cos2): (NodeId, NodeId) = (unary(tree, Op::Cos, pos, u1), unary(tree, Op::Cos, pos, u2));
            let den: NodeId = binary(tree, Op::Mul, pos, cos1, cos2);
            Ok(binary(tree, Op::Div, pos, du, den))
        },

        // Calls are passed through
        Op::Call => Ok(tree.deep_copy(id)),

        op => Err(SimplifyError::UnsupportedDiff { what: format!("'{}'", op.builtin_name().or(op.infix_symbol()).unwrap_or(op.tag())), pos }),
    }
}



/***** TESTS *****/
#[cfg(test)]
mod tests {
    use kite_ast::program::Program;
    use kite_dsl::compile;

    use super::*;
    use crate::fold::simplify_tree;

    /// Evaluates an expression with every variable set to `x`.
    fn eval(tree: &Tree, id: NodeId, x: f64) -> f64 {
        let arg = |side: Option<NodeId>| eval(tree, side.unwrap(), x);
        match tree.value(id) {
            Value::Number(n) => *n,
            Value::Name(_) => x,
            Value::Statement(op) => match (op, tree.right(id)) {
                (Op::Add, None) => arg(tree.left(id)),
                (Op::Sub, None) => -arg(tree.left(id)),
                (Op::Add, r) => arg(tree.left(id)) + arg(r),
                (Op::Sub, r) => arg(tree.left(id)) - arg(r),
                (Op::Mul, r) => arg(tree.left(id)) * arg(r),
                (Op::Div, r) => arg(tree.left(id)) / arg(r),
                (Op::Pow, r) => arg(tree.left(id)).powf(arg(r)),
                (Op::Sin, _) => arg(tree.left(id)).sin(),
                (Op::Cos, _) => arg(tree.left(id)).cos(),
                (Op::Tan, _) => arg(tree.left(id)).tan(),
                (op, _) => panic!("Cannot evaluate {op}"),
            },
            Value::String(_) => panic!("Cannot evaluate a string"),
        }
    }

    /// Compiles `main` writing the given expression, and returns the program and the expression.
    fn expr_of(expr: &str) -> (Program, NodeId) {
        let program: Program = compile(&format!("var x = 1;\nfun main(): Void {{ out << {expr}; }}")).unwrap();
        let tree: &Tree = &program.tree;
        let body: NodeId = tree.right(program.functions.get_str("main").unwrap().node).unwrap();
        let item: NodeId = tree.left(tree.left(tree.left(body).unwrap()).unwrap()).unwrap();
        (program, item)
    }

    #[test]
    fn test_product_rule() {
        let (mut program, diff) = expr_of("diff(x * x)");
        let square: NodeId = program.tree.left(diff).unwrap();

        // Before folding: x' * x + x * x'
        let tree: &mut Tree = &mut program.tree;
        let derived: NodeId = derive(tree, square).unwrap();
        assert_eq!(tree.op(derived), Some(Op::Add));
        let (lhs, rhs): (NodeId, NodeId) = (tree.left(derived).unwrap(), tree.right(derived).unwrap());
        assert_eq!((tree.op(lhs), tree.op(rhs)), (Some(Op::Mul), Some(Op::Mul)));
        assert_eq!(tree.number_of(tree.left(lhs).unwrap()), Some(1.0));
        assert!(matches!(tree.value(tree.right(lhs).unwrap()), Value::Name(_)));
        assert!(matches!(tree.value(tree.left(rhs).unwrap()), Value::Name(_)));
        assert_eq!(tree.number_of(tree.right(rhs).unwrap()), Some(1.0));

        // After simplifying: 2x
        simplify_tree(&mut program.tree).unwrap();
        for x in [-3.0, 0.0, 0.5, 7.0] {
            assert!((eval(&program.tree, diff, x) - 2.0 * x).abs() < 1e-9, "diff(x * x) at {x}");
        }
    }

    #[test]
    fn test_rules_numerically() {
        type Derivative = fn(f64) -> f64;
        let cases: [(&str, Derivative); 6] = [
            ("diff(3 * x + 2)", |_| 3.0),
            ("diff(-x - 5)", |_| -1.0),
            ("diff(1 / x)", |x| -1.0 / (x * x)),
            ("diff(sin(x * x))", |x| (x * x).cos() * 2.0 * x),
            ("diff(cos(x))", |x| -x.sin()),
            ("diff(tan(x))", |x| 1.0 / (x.cos() * x.cos())),
        ];
        for (expr, expected) in cases {
            let (mut program, id) = expr_of(expr);
            simplify_tree(&mut program.tree).unwrap();
            for x in [-1.3, 0.4, 2.0] {
                let got: f64 = eval(&program.tree, id, x);
                assert!((got - expected(x)).abs() < 1e-9, "{expr} at {x}: got {got}, expected {}", expected(x));
            }
        }
    }

    #[test]
    fn test_unsupported() {
        for expr in ["diff(sqrt(x))", "diff(x ^ 2)", "diff([x])"] {
            let (mut program, _) = expr_of(expr);
            let err: SimplifyError = simplify_tree(&mut program.tree).unwrap_err();
            assert!(matches!(err, SimplifyError::UnsupportedDiff { .. }), "{expr}: {err}");
        }
    }
}
