//  TABLES.rs
//    by Kite developers
//
//  Created:
//    19 Oct 2026, 12:44:51
//  Last edited:
//    19 Oct 2026, 16:20:03
//  Auto updated?
//    Yes
//
//  Description:
//!   Derives the global-variable and function tables from a tree that
//!   was read from the exchange format.
//

use std::rc::Rc;

use super::errors::FormatError;
use crate::ops::Op;
use crate::symbols::{Function, FunctionTable, ReturnType, VarTable, Variable};
use crate::tree::{NodeId, Tree, Value};


/***** HELPER FUNCTIONS *****/
/// Returns the name stored in the given node, or errors with `what`.
fn name_of(tree: &Tree, id: Option<NodeId>, parent: NodeId, what: &str) -> Result<(NodeId, Rc<str>), FormatError> {
    match id.map(|id| (id, tree.value(id))) {
        Some((id, Value::Name(name))) => Ok((id, name.clone())),
        Some((id, _)) => Err(FormatError::Malformed { what: format!("expected {what}"), pos: tree.pos(id) }),
        None => Err(FormatError::Malformed { what: format!("missing {what}"), pos: tree.pos(parent) }),
    }
}

/// Reads the signature of a `FUNC` node.
fn function_of(tree: &Tree, func: NodeId) -> Result<Function, FormatError> {
    let (name_id, name): (NodeId, Rc<str>) = name_of(tree, tree.left(func), func, "a function name")?;

    // Every parameter must be a `VAR` with a name
    let mut arity: usize = 0;
    for (link, param) in tree.list_items(tree.left(name_id)) {
        if tree.op(link) != Some(Op::Param) || !tree.is_op(param, Op::Var) {
            return Err(FormatError::Malformed { what: format!("malformed parameter list of function '{name}'"), pos: tree.pos(link) });
        }
        if let Some(param) = param {
            name_of(tree, tree.left(param), param, "a parameter name")?;
        }
        arity += 1;
    }

    let returns: ReturnType = match tree.right(name_id).and_then(|r| tree.op(r)) {
        Some(Op::Type) => ReturnType::Double,
        Some(Op::Void) => ReturnType::Void,
        _ => return Err(FormatError::Malformed { what: format!("missing return type of function '{name}'"), pos: tree.pos(name_id) }),
    };
    Ok(Function { name, returns, arity, node: func })
}





/***** LIBRARY *****/
/// Derives the symbol tables of a loaded tree.
///
/// Globals are the toplevel `VAR`/`VAL` items in order, and functions are the toplevel `FUNC` items in order.
///
/// # Arguments
/// - `tree`: The [`Tree`] to derive the tables of.
///
/// # Returns
/// A tuple of the global [`VarTable`] and the [`FunctionTable`].
///
/// # Errors
/// This function errors if the root is not a `ST` list, if a toplevel item has an unexpected shape, or if a name is declared twice.
pub fn derive_tables(tree: &Tree) -> Result<(VarTable, FunctionTable), FormatError> {
    let mut globals: VarTable = VarTable::new();
    let mut functions: FunctionTable = FunctionTable::new();
    let Some(root) = tree.root() else { return Ok((globals, functions)) };
    if tree.op(root) != Some(Op::Compound) {
        return Err(FormatError::Malformed { what: "the root is not a statement list".into(), pos: tree.pos(root) });
    }

    for (link, item) in tree.list_items(Some(root)) {
        if tree.op(link) != Some(Op::Compound) {
            return Err(FormatError::Malformed { what: "broken toplevel list".into(), pos: tree.pos(link) });
        }
        let Some(item) = item else { continue };
        match tree.op(item) {
            Some(op @ (Op::Var | Op::Val)) => {
                let (_, name): (NodeId, Rc<str>) = name_of(tree, tree.left(item), item, "a variable name")?;
                let var: Variable = Variable { name: name.clone(), slot: globals.len(), is_const: op == Op::Val, is_global: true };
                if !globals.declare(var) {
                    return Err(FormatError::DuplicateGlobal { name: name.to_string(), pos: tree.pos(item) });
                }
            },
            Some(Op::Fun) => {
                let func: Function = function_of(tree, item)?;
                let name: String = func.name.to_string();
                if !functions.declare(func) {
                    return Err(FormatError::DuplicateFunction { name, pos: tree.pos(item) });
                }
            },
            _ => return Err(FormatError::Malformed { what: format!("unexpected toplevel item '{}'", tree.value(item)), pos: tree.pos(item) }),
        }
    }
    Ok((globals, functions))
}



/***** TESTS *****/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::read_tree;
    use crate::pool::StringPool;

    #[test]
    fn test_derive_tables() {
        let text: &str = r#"{ ST
            { VAL { "g" } { 2 } }
            { ST
                { FUNC
                    { "f" { PARAM { VAR { "a" } NIL } { PARAM { VAR { "b" } { 1 } } NIL } } { TYPE } }
                    { ST NIL NIL }
                }
                { ST { FUNC { "main" NIL { VOID } } { ST NIL NIL } } NIL }
            }
        }"#;
        let mut pool: StringPool = StringPool::new();
        let tree: Tree = read_tree(text, &mut pool).unwrap();
        let (globals, functions): (VarTable, FunctionTable) = derive_tables(&tree).unwrap();

        assert_eq!(globals.len(), 1);
        let g: &Variable = globals.get_str("g").unwrap();
        assert!(g.is_const && g.is_global);

        let names: Vec<&str> = functions.iter().map(|f| &*f.name).collect();
        assert_eq!(names, ["f", "main"]);
        assert_eq!(functions.get_str("f").unwrap().arity, 2);
        assert_eq!(functions.get_str("f").unwrap().returns, ReturnType::Double);
        assert_eq!(functions.get_str("main").unwrap().returns, ReturnType::Void);
    }

    #[test]
    fn test_derive_tables_rejects() {
        let mut pool: StringPool = StringPool::new();
        let dup: Tree = read_tree(r#"{ ST { VAR { "x" } { 1 } } { ST { VAR { "x" } { 2 } } NIL } }"#, &mut pool).unwrap();
        assert!(matches!(derive_tables(&dup), Err(FormatError::DuplicateGlobal { name, .. }) if name == "x"));

        let not_st: Tree = read_tree("{ ADD { 1 } { 2 } }", &mut pool).unwrap();
        assert!(matches!(derive_tables(&not_st), Err(FormatError::Malformed { .. })));
    }
}
