//  TREE.rs
//    by Kite developers
//
//  Created:
//    19 Oct 2026, 10:11:38
//  Last edited:
//    19 Oct 2026, 17:25:09
//  Auto updated?
//    Yes
//
//  Description:
//!   Defines the [`Tree`], the binary-tree representation of one
//!   translation unit on which every compiler pass operates.
//!
//!   Nodes live in an arena owned by the tree and refer to each other by
//!   [`NodeId`]. A node is owned by exactly one parent; the parent link
//!   is a back-reference that is only used for diagnostics and rewrites.
//

use std::fmt::{Display, Formatter, Result as FResult};
use std::rc::Rc;

use enum_debug::EnumDebug;

use crate::ops::Op;
use crate::pool::same_str;
use crate::spec::TextPos;


/***** CONSTANTS *****/
/// The tolerance within which two numbers are considered equal.
pub const NUMBER_EPSILON: f64 = 1e-10;





/***** LIBRARY *****/
/// Refers to a node in a [`Tree`].
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct NodeId(usize);

impl NodeId {
    /// Returns the index of this node in its tree's arena.
    #[inline]
    pub fn index(&self) -> usize { self.0 }
}

impl Display for NodeId {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult { write!(f, "#{}", self.0) }
}



/// The payload of a node.
#[derive(Clone, Debug, EnumDebug)]
pub enum Value {
    /// An interior node with some statement semantics.
    Statement(Op),
    /// An identifier (variable or function name).
    Name(Rc<str>),
    /// A number literal.
    Number(f64),
    /// A string literal.
    String(Rc<str>),
}

impl Value {
    /// Returns the opcode of this value if it is a statement.
    #[inline]
    pub fn op(&self) -> Option<Op> { if let Self::Statement(op) = self { Some(*op) } else { None } }

    /// Returns the number of this value if it is a number.
    #[inline]
    pub fn number(&self) -> Option<f64> { if let Self::Number(n) = self { Some(*n) } else { None } }

    /// Returns the identifier of this value if it is a name.
    #[inline]
    pub fn name(&self) -> Option<&Rc<str>> { if let Self::Name(n) = self { Some(n) } else { None } }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        use Value::*;
        match (self, other) {
            (Statement(lhs), Statement(rhs)) => lhs == rhs,
            (Name(lhs), Name(rhs)) | (String(lhs), String(rhs)) => same_str(lhs, rhs),
            (Number(lhs), Number(rhs)) => (lhs - rhs).abs() < NUMBER_EPSILON || lhs == rhs,
            _ => false,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult {
        match self {
            Self::Statement(op) => write!(f, "{op}"),
            Self::Name(name) => write!(f, "{name}"),
            Self::Number(num) => write!(f, "{num}"),
            Self::String(text) => write!(f, "\"{text}\""),
        }
    }
}



/// A single node in the [`Tree`].
#[derive(Clone, Debug)]
pub struct Node {
    /// The payload of this node.
    pub value  : Value,
    /// Where in the source this node originates.
    pub pos    : TextPos,
    /// The first child, if any.
    pub left   : Option<NodeId>,
    /// The second child, if any.
    pub right  : Option<NodeId>,
    /// The node owning this one, if any.
    pub parent : Option<NodeId>,
}



/// The tree of one translation unit.
#[derive(Clone, Debug, Default)]
pub struct Tree {
    /// The arena of all nodes ever created for this tree.
    nodes : Vec<Node>,
    /// The root of the tree, if it has one.
    root  : Option<NodeId>,
}

impl Tree {
    /// Constructor for the Tree that creates an empty one.
    #[inline]
    pub fn new() -> Self { Self::default() }

    /// Returns the root of the tree, if any.
    #[inline]
    pub fn root(&self) -> Option<NodeId> { self.root }

    /// Sets the root of the tree.
    #[inline]
    pub fn set_root(&mut self, root: Option<NodeId>) {
        if let Some(root) = root {
            self.nodes[root.0].parent = None;
        }
        self.root = root;
    }

    /// Returns the number of nodes in the arena, including any that have been detached by rewrites.
    #[inline]
    pub fn len(&self) -> usize { self.nodes.len() }

    /// Returns whether no node was ever added to this tree.
    #[inline]
    pub fn is_empty(&self) -> bool { self.nodes.is_empty() }

    /// Drops every node created after the arena had the given length.
    ///
    /// Used to undo speculative work; the dropped nodes must not be referenced by any remaining node.
    pub fn truncate(&mut self, len: usize) {
        self.nodes.truncate(len);
        if self.root.is_some_and(|r| r.0 >= len) {
            self.root = None;
        }
    }

    /// Counts the nodes reachable from the root.
    pub fn count_reachable(&self) -> usize { self.root.map(|r| self.count_from(r)).unwrap_or(0) }

    /// Counts the nodes in the subtree of the given node, including itself.
    pub fn count_from(&self, id: NodeId) -> usize {
        let node: &Node = &self.nodes[id.0];
        1 + node.left.map(|l| self.count_from(l)).unwrap_or(0) + node.right.map(|r| self.count_from(r)).unwrap_or(0)
    }



    /// Adds a new node to the arena.
    ///
    /// # Arguments
    /// - `value`: The payload of the new node.
    /// - `pos`: The source position of the new node.
    /// - `left`: The first child of the new node, if any.
    /// - `right`: The second child of the new node, if any.
    ///
    /// # Returns
    /// The identifier of the new node. Its children will have it as their parent.
    pub fn add(&mut self, value: Value, pos: TextPos, left: Option<NodeId>, right: Option<NodeId>) -> NodeId {
        let id: NodeId = NodeId(self.nodes.len());
        self.nodes.push(Node { value, pos, left, right, parent: None });
        for child in [left, right].into_iter().flatten() {
            self.nodes[child.0].parent = Some(id);
        }
        id
    }

    /// Adds a new statement node.
    #[inline]
    pub fn stmt(&mut self, op: Op, pos: TextPos, left: Option<NodeId>, right: Option<NodeId>) -> NodeId {
        self.add(Value::Statement(op), pos, left, right)
    }

    /// Adds a new name leaf.
    #[inline]
    pub fn name(&mut self, name: Rc<str>, pos: TextPos) -> NodeId { self.add(Value::Name(name), pos, None, None) }

    /// Adds a new number leaf.
    #[inline]
    pub fn number(&mut self, value: f64, pos: TextPos) -> NodeId { self.add(Value::Number(value), pos, None, None) }

    /// Adds a new string leaf.
    #[inline]
    pub fn string(&mut self, text: Rc<str>, pos: TextPos) -> NodeId { self.add(Value::String(text), pos, None, None) }

    /// Builds a right-linked list (`op(item, op(item, ...))`) of the given items.
    ///
    /// # Returns
    /// The head of the list, or [`None`] if `items` was empty.
    pub fn list(&mut self, op: Op, items: &[(NodeId, TextPos)]) -> Option<NodeId> {
        let mut head: Option<NodeId> = None;
        for (item, pos) in items.iter().rev() {
            head = Some(self.stmt(op, *pos, Some(*item), head));
        }
        head
    }



    /// Returns the node with the given identifier.
    #[inline]
    pub fn node(&self, id: NodeId) -> &Node { &self.nodes[id.0] }

    /// Returns the node with the given identifier, mutably.
    ///
    /// Prefer [`Self::set_left()`] and [`Self::set_right()`] to change children, since those keep the parent links intact.
    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node { &mut self.nodes[id.0] }

    /// Returns the payload of the given node.
    #[inline]
    pub fn value(&self, id: NodeId) -> &Value { &self.nodes[id.0].value }

    /// Returns the opcode of the given node, if it is a statement.
    #[inline]
    pub fn op(&self, id: NodeId) -> Option<Op> { self.nodes[id.0].value.op() }

    /// Returns whether the given (optional) node is a statement with the given opcode.
    #[inline]
    pub fn is_op(&self, id: Option<NodeId>, op: Op) -> bool { id.is_some_and(|id| self.op(id) == Some(op)) }

    /// Returns the number of the given node if it is a number literal.
    #[inline]
    pub fn number_of(&self, id: NodeId) -> Option<f64> { self.nodes[id.0].value.number() }

    /// Returns the first child of the given node.
    #[inline]
    pub fn left(&self, id: NodeId) -> Option<NodeId> { self.nodes[id.0].left }

    /// Returns the second child of the given node.
    #[inline]
    pub fn right(&self, id: NodeId) -> Option<NodeId> { self.nodes[id.0].right }

    /// Returns the source position of the given node.
    #[inline]
    pub fn pos(&self, id: NodeId) -> TextPos { self.nodes[id.0].pos }

    /// Replaces the first child of `id`, updating the parent link of the new child.
    pub fn set_left(&mut self, id: NodeId, child: Option<NodeId>) {
        self.nodes[id.0].left = child;
        if let Some(child) = child {
            self.nodes[child.0].parent = Some(id);
        }
    }

    /// Replaces the second child of `id`, updating the parent link of the new child.
    pub fn set_right(&mut self, id: NodeId, child: Option<NodeId>) {
        self.nodes[id.0].right = child;
        if let Some(child) = child {
            self.nodes[child.0].parent = Some(id);
        }
    }

    /// Replaces the payload of a node in-place.
    #[inline]
    pub fn set_value(&mut self, id: NodeId, value: Value) { self.nodes[id.0].value = value; }

    /// Makes `target` take over the payload and children of `source`.
    ///
    /// The target keeps its position in the tree (and its parent), while `source` becomes detached. Useful to replace a node by one of its own children.
    pub fn replace_with(&mut self, target: NodeId, source: NodeId) {
        if target == source {
            return;
        }
        let Node { value, pos, left, right, .. } = self.nodes[source.0].clone();
        self.nodes[target.0].value = value;
        self.nodes[target.0].pos = pos;
        self.set_left(target, left);
        self.set_right(target, right);
        let detached: &mut Node = &mut self.nodes[source.0];
        detached.left = None;
        detached.right = None;
        detached.parent = None;
    }

    /// Copies the subtree at `id` into fresh nodes.
    ///
    /// # Returns
    /// The root of the copy, which has no parent.
    pub fn deep_copy(&mut self, id: NodeId) -> NodeId {
        let (value, pos, left, right) = {
            let node: &Node = &self.nodes[id.0];
            (node.value.clone(), node.pos, node.left, node.right)
        };
        let left: Option<NodeId> = left.map(|l| self.deep_copy(l));
        let right: Option<NodeId> = right.map(|r| self.deep_copy(r));
        self.add(value, pos, left, right)
    }

    /// Iterates over the items of a right-linked list.
    ///
    /// # Arguments
    /// - `head`: The first link of the list.
    ///
    /// # Returns
    /// An iterator yielding `(link, item)` pairs, where `item` is the left child of the `link`.
    #[inline]
    pub fn list_items(&self, head: Option<NodeId>) -> ListItems<'_> { ListItems { tree: self, next: head } }



    /// Compares the subtree at `lhs` in this tree with the subtree at `rhs` in `other`.
    ///
    /// Positions and parent links are ignored; numbers are compared with a tolerance of [`NUMBER_EPSILON`].
    pub fn subtree_eq(&self, lhs: NodeId, other: &Tree, rhs: NodeId) -> bool {
        let (a, b): (&Node, &Node) = (&self.nodes[lhs.0], &other.nodes[rhs.0]);
        if a.value != b.value {
            return false;
        }
        let children_eq = |x: Option<NodeId>, y: Option<NodeId>| -> bool {
            match (x, y) {
                (Some(x), Some(y)) => self.subtree_eq(x, other, y),
                (None, None) => true,
                _ => false,
            }
        };
        children_eq(a.left, b.left) && children_eq(a.right, b.right)
    }
}

impl PartialEq for Tree {
    /// Two trees are equal if their reachable structure is equal, regardless of how their arenas are laid out.
    fn eq(&self, other: &Self) -> bool {
        match (self.root, other.root) {
            (Some(lhs), Some(rhs)) => self.subtree_eq(lhs, other, rhs),
            (None, None) => true,
            _ => false,
        }
    }
}



/// Iterates over the items of a right-linked list in a [`Tree`].
#[derive(Debug)]
pub struct ListItems<'t> {
    /// The tree to iterate in.
    tree : &'t Tree,
    /// The next link to visit.
    next : Option<NodeId>,
}
impl Iterator for ListItems<'_> {
    type Item = (NodeId, Option<NodeId>);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let link: NodeId = self.next?;
        self.next = self.tree.right(link);
        Some((link, self.tree.left(link)))
    }
}



/***** TESTS *****/
#[cfg(test)]
mod tests {
    use super::*;

    fn sum(tree: &mut Tree, l: f64, r: f64) -> NodeId {
        let l: NodeId = tree.number(l, TextPos::default());
        let r: NodeId = tree.number(r, TextPos::default());
        tree.stmt(Op::Add, TextPos::default(), Some(l), Some(r))
    }

    #[test]
    fn test_parent_links() {
        let mut tree: Tree = Tree::new();
        let add: NodeId = sum(&mut tree, 1.0, 2.0);
        tree.set_root(Some(add));
        let left: NodeId = tree.left(add).unwrap();
        assert_eq!(tree.node(left).parent, Some(add));
        assert_eq!(tree.count_reachable(), 3);

        // Replacing a node by its child keeps the node's own identity
        tree.replace_with(add, left);
        assert_eq!(tree.number_of(add), Some(1.0));
        assert_eq!(tree.count_reachable(), 1);
    }

    #[test]
    fn test_structural_equality() {
        let mut a: Tree = Tree::new();
        let root: NodeId = sum(&mut a, 1.0, 2.0);
        a.set_root(Some(root));

        // Layout in the arena does not matter, and numbers are compared with a tolerance
        let mut b: Tree = Tree::new();
        b.number(42.0, TextPos::default());
        let root: NodeId = sum(&mut b, 1.0 + 1e-12, 2.0);
        b.set_root(Some(root));
        assert_eq!(a, b);

        let copy: NodeId = b.deep_copy(root);
        assert!(b.subtree_eq(copy, &a, a.root().unwrap()));
        b.set_value(copy, Value::Number(3.0));
        assert!(!b.subtree_eq(copy, &a, a.root().unwrap()));
    }

    #[test]
    fn test_lists() {
        let mut tree: Tree = Tree::new();
        let items: Vec<(NodeId, TextPos)> = (0..3).map(|i| (tree.number(i as f64, TextPos::default()), TextPos::default())).collect();
        let head: Option<NodeId> = tree.list(Op::Compound, &items);
        let values: Vec<f64> = tree.list_items(head).filter_map(|(_, item)| item.and_then(|i| tree.number_of(i))).collect();
        assert_eq!(values, vec![0.0, 1.0, 2.0]);
        assert_eq!(tree.list(Op::Param, &[]), None);
    }
}
