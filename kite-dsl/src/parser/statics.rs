//  STATICS.rs
//    by Kite developers
//
//  Created:
//    19 Oct 2026, 15:48:03
//  Last edited:
//    19 Oct 2026, 19:05:17
//  Auto updated?
//    Yes
//
//  Description:
//!   Rewrites `main` such that it runs the static blocks: the ones
//!   declared before `main` when it starts, the ones declared after it
//!   whenever it returns.
//

use std::rc::Rc;

use kite_ast::ops::Op;
use kite_ast::program::MAIN_NAME;
use kite_ast::spec::TextPos;
use kite_ast::tree::{NodeId, Value};
use tracing::debug;

use super::parser::Parser;


/***** LIBRARY *****/
impl Parser<'_, '_> {
    /// Rewrites `main` to call the static blocks.
    ///
    /// If any blocks follow `main`, `main` is also moved to right after the last of them, so that every function it calls is
    /// declared before it.
    ///
    /// # Arguments
    /// - `items`: The toplevel items, which may be reordered.
    pub fn rewrite_statics(&mut self, items: &mut Vec<(NodeId, TextPos)>) {
        if self.statics.before.is_empty() && self.statics.after.is_empty() {
            return;
        }
        let Some(main) = self.functions.get_str(MAIN_NAME).map(|f| f.node) else { return };
        debug!("Rewriting '{MAIN_NAME}' for {} static block(s) before and {} after it", self.statics.before.len(), self.statics.after.len());

        // Move main after the last static block
        if let Some(last) = self.statics.after.last().and_then(|name| self.functions.get(name)).map(|f| f.node) {
            let main_idx: Option<usize> = items.iter().position(|(item, _)| *item == main);
            let last_idx: Option<usize> = items.iter().position(|(item, _)| *item == last);
            if let (Some(main_idx), Some(last_idx)) = (main_idx, last_idx) {
                if main_idx < last_idx {
                    let entry: (NodeId, TextPos) = items.remove(main_idx);
                    items.insert(last_idx, entry);
                }
            }
        }

        // Rebuild the body
        let pos: TextPos = self.tree.pos(main);
        let body: Option<NodeId> = self.tree.right(main);
        let mut stmts: Vec<(NodeId, TextPos)> = self.static_calls(&self.statics.before.clone(), pos);
        stmts.extend(self.splice_list(body));
        if !stmts.last().is_some_and(|(stmt, _)| self.tree.op(*stmt) == Some(Op::Return)) {
            stmts.extend(self.static_calls(&self.statics.after.clone(), pos));
        }
        if let Some(body) = self.tree.list(Op::Compound, &stmts) {
            self.tree.set_right(main, Some(body));
        }
    }

    /// Builds `CALL(NAME name, NIL)` statements for the given static blocks.
    fn static_calls(&mut self, names: &[Rc<str>], pos: TextPos) -> Vec<(NodeId, TextPos)> {
        names
            .iter()
            .map(|name| {
                let callee: NodeId = self.tree.add(Value::Name(name.clone()), pos, None, None);
                (self.tree.stmt(Op::Call, pos, Some(callee), None), pos)
            })
            .collect()
    }

    /// Returns the statements of the given list, with calls to the after-main blocks before every return.
    fn splice_list(&mut self, head: Option<NodeId>) -> Vec<(NodeId, TextPos)> {
        let stmts: Vec<NodeId> = self.tree.list_items(head).filter_map(|(_, stmt)| stmt).collect();
        let mut res: Vec<(NodeId, TextPos)> = Vec::with_capacity(stmts.len());
        for stmt in stmts {
            let pos: TextPos = self.tree.pos(stmt);
            if self.tree.op(stmt) == Some(Op::Return) {
                res.extend(self.static_calls(&self.statics.after.clone(), pos));
            } else {
                self.splice_nested(stmt);
            }
            res.push((stmt, pos));
        }
        res
    }

    /// Splices calls before the returns nested in the given statement.
    fn splice_nested(&mut self, stmt: NodeId) {
        match self.tree.op(stmt) {
            Some(Op::Compound) => {
                let stmts: Vec<(NodeId, TextPos)> = self.splice_list(Some(stmt));
                if let Some(block) = self.tree.list(Op::Compound, &stmts) {
                    self.tree.replace_with(stmt, block);
                }
            },
            Some(Op::If) => {
                let Some(body) = self.tree.right(stmt) else { return };
                if self.tree.op(body) == Some(Op::Else) {
                    if let Some(then) = self.tree.left(body) {
                        self.splice_arm(then);
                    }
                    if let Some(other) = self.tree.right(body) {
                        self.splice_arm(other);
                    }
                } else {
                    self.splice_arm(body);
                }
            },
            Some(Op::While) => {
                if let Some(body) = self.tree.right(stmt) {
                    self.splice_arm(body);
                }
            },
            _ => {},
        }
    }

    /// Splices calls into the single statement of an arm, which becomes a block if it is a return itself.
    fn splice_arm(&mut self, arm: NodeId) {
        if self.tree.op(arm) != Some(Op::Return) {
            self.splice_nested(arm);
            return;
        }

        let pos: TextPos = self.tree.pos(arm);
        let value: Option<NodeId> = self.tree.left(arm);
        let ret: NodeId = self.tree.stmt(Op::Return, pos, value, None);
        let mut stmts: Vec<(NodeId, TextPos)> = self.static_calls(&self.statics.after.clone(), pos);
        if stmts.is_empty() {
            return;
        }
        stmts.push((ret, pos));
        if let Some(block) = self.tree.list(Op::Compound, &stmts) {
            self.tree.replace_with(arm, block);
        }
    }
}



/***** TESTS *****/
#[cfg(test)]
mod tests {
    use kite_ast::program::Program;

    use super::*;
    use crate::compile;

    /// Describes the statements of the given list: the callee for calls, the tag otherwise.
    fn describe(program: &Program, head: Option<NodeId>) -> Vec<String> {
        let tree = &program.tree;
        tree.list_items(head)
            .filter_map(|(_, stmt)| stmt)
            .map(|stmt| match tree.op(stmt) {
                Some(Op::Call) => tree.value(tree.left(stmt).unwrap()).to_string(),
                Some(op) => op.tag().to_string(),
                None => tree.value(stmt).to_string(),
            })
            .collect()
    }

    /// Returns the body of `main`.
    fn main_body(program: &Program) -> Option<NodeId> { program.tree.right(program.functions.get_str(MAIN_NAME).unwrap().node) }

    #[test]
    fn test_without_statics() {
        let program: Program = compile("fun main(): Void { out << 1; return; }").unwrap();
        assert_eq!(describe(&program, main_body(&program)), vec!["OUT", "RET"]);
        assert!(program.statics.before.is_empty() && program.statics.after.is_empty());
    }

    #[test]
    fn test_before_and_after() {
        let program: Program = compile("static { out << 1; }\nfun main(): Void { out << 2; return; }\nstatic { out << 3; }\nvar x = 1;").unwrap();
        assert_eq!(program.statics.before.iter().map(|s| s.to_string()).collect::<Vec<_>>(), vec!["$static_0"]);
        assert_eq!(program.statics.after.iter().map(|s| s.to_string()).collect::<Vec<_>>(), vec!["$static_1"]);
        assert_eq!(describe(&program, main_body(&program)), vec!["$static_0", "OUT", "$static_1", "RET"]);

        // Main moved after the last static block, the declaration stays last
        assert_eq!(describe(&program, program.tree.root()), vec!["FUNC", "FUNC", "FUNC", "VAR"]);
        let order: Vec<String> = program.functions.iter().map(|f| f.name.to_string()).collect();
        assert_eq!(order, vec!["$static_0", "$static_1", "main"]);
    }

    #[test]
    fn test_falling_off_main() {
        let program: Program = compile("fun main(): Void { out << 2; }\nstatic { out << 3; }").unwrap();
        assert_eq!(describe(&program, main_body(&program)), vec!["OUT", "$static_0"]);
        let program: Program = compile("fun main(): Void { }\nstatic { }").unwrap();
        assert_eq!(describe(&program, main_body(&program)), vec!["$static_0"]);
    }

    #[test]
    fn test_nested_returns() {
        let program: Program =
            compile("fun main(): Void {\n  var x = 0;\n  if (x) return; else { x = 1; return; }\n  while (x) return;\n}\nstatic { out << 3; }").unwrap();
        let body: Option<NodeId> = main_body(&program);
        assert_eq!(describe(&program, body), vec!["VAR", "IF", "WHILE", "$static_0"]);

        let tree = &program.tree;
        let stmts: Vec<NodeId> = tree.list_items(body).filter_map(|(_, s)| s).collect();
        let arms: NodeId = tree.right(stmts[1]).unwrap();
        assert_eq!(describe(&program, tree.left(arms)), vec!["$static_0", "RET"]);
        assert_eq!(describe(&program, tree.right(arms)), vec!["EQ", "$static_0", "RET"]);
        assert_eq!(describe(&program, tree.right(stmts[2])), vec!["$static_0", "RET"]);
    }
}
