//  WRITER.rs
//    by Kite developers
//
//  Created:
//    19 Oct 2026, 11:40:26
//  Last edited:
//    19 Oct 2026, 15:31:55
//  Auto updated?
//    Yes
//
//  Description:
//!   Writes a [`Tree`] in the exchange format.
//

use std::fmt::{Display, Formatter, Result as FResult};

use crate::ops::Op;
use crate::tree::{NodeId, Tree, Value};


/***** HELPER FUNCTIONS *****/
/// Returns the annotation to write in front of the given node, if any.
fn annotation_of(value: &Value) -> Option<&'static str> {
    match value {
        Value::String(_) | Value::Statement(Op::NewLine) => Some("$kite::str$"),
        Value::Statement(op) if op.is_relation() => Some("$kite::relation$"),
        Value::Statement(op) if op.is_logic() => Some("$kite::logic$"),
        Value::Statement(Op::Sqrt | Op::Int) => Some("$kite::math$"),
        _ => None,
    }
}

/// Writes the head of a group.
fn write_head(f: &mut Formatter<'_>, value: &Value) -> FResult {
    match value {
        Value::Statement(op) => write!(f, "{}", op.tag()),
        Value::Name(name) => write!(f, "\"{name}\""),
        Value::Number(num) => write!(f, "{num}"),
        Value::String(text) => {
            write!(f, "'")?;
            for c in text.chars() {
                if c == '\'' || c == '\\' {
                    write!(f, "\\")?;
                }
                write!(f, "{c}")?;
            }
            write!(f, "'")
        },
    }
}





/***** FORMATTERS *****/
/// Implements Display for a [`Tree`] by writing it in the exchange format.
#[derive(Debug)]
pub struct TreeFormatter<'t> {
    /// The tree to write.
    tree     : &'t Tree,
    /// Whether to write annotations.
    annotate : bool,
}

impl<'t> TreeFormatter<'t> {
    /// Constructor for the TreeFormatter.
    ///
    /// # Arguments
    /// - `tree`: The [`Tree`] to write.
    /// - `annotate`: Whether to write `$kite::...$` annotations in front of strings, relations, logic and math groups.
    #[inline]
    pub fn new(tree: &'t Tree, annotate: bool) -> Self { Self { tree, annotate } }

    /// Writes the group of a single node and, recursively, its children.
    fn write_group(&self, f: &mut Formatter<'_>, id: NodeId, depth: usize) -> FResult {
        let indent: String = "  ".repeat(depth);
        let (left, right): (Option<NodeId>, Option<NodeId>) = (self.tree.left(id), self.tree.right(id));
        let value: &Value = self.tree.value(id);

        write!(f, "{indent}")?;
        if self.annotate {
            if let Some(annot) = annotation_of(value) {
                write!(f, "{annot} ")?;
            }
        }
        write!(f, "{{ ")?;
        write_head(f, value)?;

        // Leaves fit on one line
        if left.is_none() && right.is_none() {
            return writeln!(f, " }}");
        }
        writeln!(f)?;
        for child in [left, right] {
            match child {
                Some(child) => self.write_group(f, child, depth + 1)?,
                None => writeln!(f, "{indent}  NIL")?,
            }
        }
        writeln!(f, "{indent}}}")
    }
}

impl Display for TreeFormatter<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult {
        match self.tree.root() {
            Some(root) => self.write_group(f, root, 0),
            None => writeln!(f, "NIL"),
        }
    }
}





/***** LIBRARY *****/
/// Writes the given tree in the exchange format.
///
/// # Arguments
/// - `tree`: The [`Tree`] to write.
/// - `annotate`: Whether to write `$kite::...$` annotations.
///
/// # Returns
/// The tree as exchange-format text.
#[inline]
pub fn write_tree(tree: &Tree, annotate: bool) -> String { TreeFormatter::new(tree, annotate).to_string() }



/***** TESTS *****/
#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::spec::TextPos;

    #[test]
    fn test_write_shapes() {
        let mut tree: Tree = Tree::new();
        let x: NodeId = tree.name(Rc::from("x"), TextPos::default());
        let one: NodeId = tree.number(1.5, TextPos::default());
        let less: NodeId = tree.stmt(Op::Less, TextPos::default(), Some(x), Some(one));
        let text: NodeId = tree.string(Rc::from("it's"), TextPos::default());
        let out: NodeId = tree.stmt(Op::Out, TextPos::default(), Some(text), None);
        let root: Option<NodeId> = tree.list(Op::Compound, &[(less, TextPos::default()), (out, TextPos::default())]);
        tree.set_root(root);

        let expected: &str = "{ ST\n  $kite::relation$ { IS_BT\n    { \"x\" }\n    { 1.5 }\n  }\n  { ST\n    { OUT\n      $kite::str$ { 'it\\'s' }\n      NIL\n    }\n    NIL\n  }\n}\n";
        assert_eq!(write_tree(&tree, true), expected);
        assert!(!write_tree(&tree, false).contains('$'));
    }
}
