//  FOLD.rs
//    by Kite developers
//
//  Created:
//    19 Oct 2026, 19:33:45
//  Last edited:
//    19 Oct 2026, 20:12:08
//  Auto updated?
//    Yes
//
//  Description:
//!   Implements the simplifier traversal: constant folding, a handful of
//!   algebraic identities and the rewriting of `diff(...)` to the
//!   derivative of its operand.
//

use kite_ast::ops::Op;
use kite_ast::tree::{NodeId, Tree, Value};
use tracing::trace;

use crate::diff::derive;
use crate::errors::SimplifyError;


/***** HELPER FUNCTIONS *****/
/// Computes the given binary operator on constants.
///
/// # Returns
/// The result, or [`None`] if it is not a finite number (or a division by zero) and must thus be left to the machine.
fn apply_binary(op: Op, lhs: f64, rhs: f64) -> Option<f64> {
    let res: f64 = match op {
        Op::Add => lhs + rhs,
        Op::Sub => lhs - rhs,
        Op::Mul => lhs * rhs,
        Op::Div if rhs == 0.0 => return None,
        Op::Div => lhs / rhs,
        Op::Pow => lhs.powf(rhs),
        _ => return None,
    };
    res.is_finite().then_some(res)
}

/// Computes the given unary operator or builtin on a constant.
fn apply_unary(op: Op, value: f64) -> Option<f64> {
    let res: f64 = match op {
        Op::Add => value,
        Op::Sub => -value,
        Op::Sin => value.sin(),
        Op::Cos => value.cos(),
        Op::Tan => value.tan(),
        Op::Sqrt => value.sqrt(),
        Op::Int => value.trunc(),
        _ => return None,
    };
    res.is_finite().then_some(res)
}

/// Returns whether evaluating the given subtree has no effects besides computing its value.
fn is_pure(tree: &Tree, id: NodeId) -> bool {
    if matches!(tree.op(id), Some(Op::Call | Op::Assign)) {
        return false;
    }
    tree.left(id).map_or(true, |l| is_pure(tree, l)) && tree.right(id).map_or(true, |r| is_pure(tree, r))
}

/// Turns the given node into a number literal, dropping its operands.
fn fold_to(tree: &mut Tree, id: NodeId, value: f64) {
    trace!("Folding node {} at {} to {}", id, tree.pos(id), value);
    tree.set_value(id, Value::Number(value));
    tree.set_left(id, None);
    tree.set_right(id, None);
}

/// Replaces the given node by one of its operands.
fn collapse_to(tree: &mut Tree, id: NodeId, operand: NodeId) {
    trace!("Collapsing node {} at {} to its operand {}", id, tree.pos(id), operand);
    tree.replace_with(id, operand);
}





/***** TRAVERSAL FUNCTIONS *****/
/// Simplifies the subtree at the given node, in post-order.
///
/// # Arguments
/// - `tree`: The [`Tree`] to simplify in.
/// - `id`: The root of the subtree to simplify.
/// - `rewrites`: Counts the rewrites we have done.
///
/// # Errors
/// This function errors if an operator lacks operands, or if a `diff` cannot be computed.
fn trav_node(tree: &mut Tree, id: NodeId, rewrites: &mut usize) -> Result<(), SimplifyError> {
    // Only statements are simplified; names may carry call arguments
    let op: Op = match tree.value(id) {
        Value::Statement(op) => *op,
        Value::Name(_) => {
            if let Some(args) = tree.left(id) {
                trav_node(tree, args, rewrites)?;
            }
            return Ok(());
        },
        Value::Number(_) | Value::String(_) => return Ok(()),
    };
    if op == Op::Diff {
        return trav_diff(tree, id, rewrites);
    }

    // Do the children first
    let (left, right): (Option<NodeId>, Option<NodeId>) = (tree.left(id), tree.right(id));
    if let Some(left) = left {
        trav_node(tree, left, rewrites)?;
    }
    if let Some(right) = right {
        trav_node(tree, right, rewrites)?;
    }

    use Op::*;
    match op {
        // Unary plus and minus
        Add | Sub if right.is_none() => {
            let Some(operand) = left else { return Err(SimplifyError::MissingOperand { op: op.tag(), expected: "an operand", pos: tree.pos(id) }) };
            if let Some(value) = tree.number_of(operand).and_then(|v| apply_unary(op, v)) {
                fold_to(tree, id, value);
                *rewrites += 1;
            } else if op == Add {
                collapse_to(tree, id, operand);
                *rewrites += 1;
            }
        },

        // Binary arithmetic
        Add | Sub | Mul | Div | Pow => {
            let (Some(lhs), Some(rhs)) = (left, right) else {
                return Err(SimplifyError::MissingOperand { op: op.tag(), expected: "two operands", pos: tree.pos(id) });
            };
            if trav_binary(tree, id, op, lhs, rhs) {
                *rewrites += 1;
            }
        },

        // Builtins
        Sin | Cos | Tan | Sqrt | Int => {
            let Some(operand) = left else { return Err(SimplifyError::MissingOperand { op: op.tag(), expected: "an operand", pos: tree.pos(id) }) };
            if let Some(value) = tree.number_of(operand).and_then(|v| apply_unary(op, v)) {
                fold_to(tree, id, value);
                *rewrites += 1;
            }
        },

        // The rest is left as-is
        Compound | Fun | Param | Type | Void | Var | Val | Assign | If | Else | While | Return | Call | Out | In | NewLine | Diff | Equal | NotEqual
        | Less | Greater | LessEq | GreaterEq | And | Or => {},
    }
    Ok(())
}

/// Folds or rewrites a binary arithmetic node whose operands have been simplified already.
///
/// # Returns
/// Whether the node was rewritten.
fn trav_binary(tree: &mut Tree, id: NodeId, op: Op, lhs: NodeId, rhs: NodeId) -> bool {
    let (l, r): (Option<f64>, Option<f64>) = (tree.number_of(lhs), tree.number_of(rhs));
    if let (Some(l), Some(r)) = (l, r) {
        return match apply_binary(op, l, r) {
            Some(value) => {
                fold_to(tree, id, value);
                true
            },
            None => false,
        };
    }

    // Identities
    match (op, l, r) {
        (Op::Add, _, Some(r)) | (Op::Sub, _, Some(r)) if r == 0.0 => collapse_to(tree, id, lhs),
        (Op::Add, Some(l), _) if l == 0.0 => collapse_to(tree, id, rhs),
        (Op::Mul, _, Some(r)) | (Op::Div, _, Some(r)) | (Op::Pow, _, Some(r)) if r == 1.0 => collapse_to(tree, id, lhs),
        (Op::Mul, Some(l), _) if l == 1.0 => collapse_to(tree, id, rhs),
        (Op::Mul, _, Some(r)) if r == 0.0 && is_pure(tree, lhs) => fold_to(tree, id, 0.0),
        (Op::Mul, Some(l), _) if l == 0.0 && is_pure(tree, rhs) => fold_to(tree, id, 0.0),
        (Op::Pow, _, Some(r)) if r == 0.0 && is_pure(tree, lhs) => fold_to(tree, id, 1.0),
        _ => return false,
    }
    true
}

/// Replaces a `diff(u)` node by the simplified derivative of its simplified operand.
fn trav_diff(tree: &mut Tree, id: NodeId, rewrites: &mut usize) -> Result<(), SimplifyError> {
    let Some(operand) = tree.left(id) else {
        return Err(SimplifyError::MissingOperand { op: Op::Diff.tag(), expected: "an operand", pos: tree.pos(id) });
    };
    trav_node(tree, operand, rewrites)?;
    let derived: NodeId = derive(tree, operand)?;
    trav_node(tree, derived, rewrites)?;

    trace!("Replacing diff at {} by its derivative", tree.pos(id));
    tree.replace_with(id, derived);
    *rewrites += 1;
    Ok(())
}





/***** LIBRARY *****/
/// Simplifies the whole given tree in-place.
///
/// # Arguments
/// - `tree`: The [`Tree`] to simplify.
///
/// # Returns
/// The number of nodes that were rewritten.
///
/// # Errors
/// This function errors if the tree contains a `diff` we cannot compute, or operators without their operands.
pub fn simplify_tree(tree: &mut Tree) -> Result<usize, SimplifyError> {
    let mut rewrites: usize = 0;
    if let Some(root) = tree.root() {
        trav_node(tree, root, &mut rewrites)?;
    }
    Ok(rewrites)
}



/***** TESTS *****/
#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use kite_ast::exchange::{read_tree, write_tree};
    use kite_ast::pool::StringPool;
    use kite_ast::program::Program;
    use kite_dsl::compile;
    use kite_shr::utilities::test_on_kite_files;

    use super::*;

    /// Returns the first expression written by the first statement of `main`.
    fn first_out(program: &Program) -> NodeId {
        let tree: &Tree = &program.tree;
        let body: NodeId = tree.right(program.functions.get_str("main").unwrap().node).unwrap();
        let out: NodeId = tree.left(body).unwrap();
        tree.left(tree.left(out).unwrap()).unwrap()
    }

    /// Compiles `main` writing the given expression, simplifies it and returns the tree and the expression.
    fn simplified(globals: &str, expr: &str) -> (Tree, NodeId) {
        let mut program: Program = compile(&format!("{globals}\nfun main(): Void {{ out << {expr}; }}")).unwrap();
        let id: NodeId = first_out(&program);
        simplify_tree(&mut program.tree).unwrap();
        (program.tree, id)
    }

    #[test]
    fn test_fold_declaration() {
        let mut program: Program = compile("fun main(): Void { var x: Double = 2.0 + 3.0 * 4.0; out << x; }").unwrap();
        assert!(simplify_tree(&mut program.tree).unwrap() >= 2);
        let tree: &Tree = &program.tree;
        let body: NodeId = tree.right(program.functions.get_str("main").unwrap().node).unwrap();
        let var: NodeId = tree.left(body).unwrap();
        assert_eq!(tree.op(var), Some(Op::Var));
        assert_eq!(tree.number_of(tree.right(var).unwrap()), Some(14.0));
    }

    #[test]
    fn test_fold_builtins() {
        let (tree, id) = simplified("", "-(1 + 1) * [2.75] + sin(0) + 2 ^ 3");
        assert_eq!(tree.number_of(id), Some(4.0));
        let (tree, id) = simplified("", "sqrt(16) / 4");
        assert_eq!(tree.number_of(id), Some(1.0));
    }

    #[test]
    fn test_no_fold_on_errors() {
        // Division by zero and non-finite results are left to the machine
        let (tree, id) = simplified("", "1 / 0");
        assert_eq!(tree.op(id), Some(Op::Div));
        let (tree, id) = simplified("", "sqrt(0 - 1)");
        assert_eq!(tree.op(id), Some(Op::Sqrt));
        assert_eq!(tree.number_of(tree.left(id).unwrap()), Some(-1.0));
    }

    #[test]
    fn test_identities() {
        for expr in ["x + 0", "0 + x", "x - 0", "x * 1", "1 * x", "x / 1", "x ^ 1", "+x", "(x * 1) + (0 * 5)"] {
            let (tree, id) = simplified("var x = 2;", expr);
            assert!(matches!(tree.value(id), Value::Name(name) if &**name == "x"), "{expr} gave {}", tree.value(id));
        }
        for (expr, value) in [("x * 0", 0.0), ("0 * x", 0.0), ("x ^ 0", 1.0)] {
            let (tree, id) = simplified("var x = 2;", expr);
            assert_eq!(tree.number_of(id), Some(value), "{expr}");
        }

        // Calls are not dropped
        let (tree, id) = simplified("fun f(): Double { return 1; }", "f() * 0");
        assert_eq!(tree.op(id), Some(Op::Mul));
    }

    /// Asserts that the given tree reads back from the exchange format unchanged.
    fn assert_exchanges(tree: &Tree, what: &str) {
        for annotate in [true, false] {
            let text: String = write_tree(tree, annotate);
            let read: Tree = read_tree(&text, &mut StringPool::new()).unwrap_or_else(|err| panic!("Failed to read back {what}: {err}\n{text}"));
            assert!(read == *tree, "Simplified tree of {what} changed in the exchange format:\n{text}");
        }
    }

    #[test]
    fn test_simplified_exchange() {
        // Folded values that source text cannot spell directly
        for expr in ["-(0)", "0.1 + 0.2", "1 / 3", "-(2 / 7) * 1000000", "sqrt(2) * 0.000001", "diff(x * x) + diff(sin(x) / x)", "x * 1 + 0 * 5"] {
            let (tree, _) = simplified("var x = 2;", expr);
            assert_exchanges(&tree, &format!("'{expr}'"));
        }

        test_on_kite_files(|path: PathBuf, raw: String| {
            let mut program: Program = compile(&raw).unwrap_or_else(|err| panic!("Failed to compile '{}': {err}", path.display()));
            if let Err(err) = simplify_tree(&mut program.tree) {
                println!("Not simplifying '{}': {err}", path.display());
                return;
            }
            assert_exchanges(&program.tree, &format!("'{}'", path.display()));
        });
    }

    #[test]
    fn test_simplify_idempotent() {
        test_on_kite_files(|path: PathBuf, raw: String| {
            let mut program: Program = compile(&raw).unwrap_or_else(|err| panic!("Failed to compile '{}': {err}", path.display()));
            if let Err(err) = simplify_tree(&mut program.tree) {
                println!("Not simplifying '{}': {err}", path.display());
                return;
            }
            let once: Tree = program.tree.clone();
            assert_eq!(simplify_tree(&mut program.tree).unwrap(), 0, "Second pass over '{}' still rewrote nodes", path.display());
            assert!(program.tree == once, "Second pass over '{}' changed the tree", path.display());
        });
    }
}
