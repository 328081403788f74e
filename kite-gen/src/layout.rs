//  LAYOUT.rs
//    by Kite developers
//
//  Created:
//    19 Oct 2026, 20:38:19
//  Last edited:
//    19 Oct 2026, 21:10:03
//  Auto updated?
//    Yes
//
//  Description:
//!   Implements the pre-pass that decides where the parameters and local
//!   variables of a function live in its frame, and the memory map of
//!   the VM that the addresses follow from.
//!
//!   Every value takes two cells: an integer part and a fractional part.
//!   Slots are never reused, so a frame holds every declaration of the
//!   function at once, even those in sibling blocks.
//

use std::collections::HashMap;
use std::rc::Rc;

use kite_ast::ops::Op;
use kite_ast::tree::{NodeId, Tree};
use tracing::trace;

use crate::errors::CodegenError;


/***** CONSTANTS *****/
/// The first cell of the video region, which `SHOW` prints.
pub const VIDEO_START: usize = 0;
/// The number of cells in the video region.
pub const VIDEO_SIZE: usize = 128;
/// The first cell of the global variables.
pub const GLOBAL_START: usize = 128;
/// The first cell of the stack region; frames are relative to it.
pub const STACK_START: usize = 256;





/***** LIBRARY *****/
/// Returns the (integer, fraction) cells of the global variable in the given slot.
#[inline]
pub const fn global_cells(slot: usize) -> (usize, usize) { (GLOBAL_START + 2 * slot, GLOBAL_START + 2 * slot + 1) }

/// Returns the (integer, fraction) cells of the frame slot with the given index, relative to the frame bottom.
///
/// The cell at [`STACK_START`] itself holds the return address.
#[inline]
pub const fn frame_cells(slot: usize) -> (usize, usize) { (STACK_START + 2 * slot + 1, STACK_START + 2 * slot + 2) }



/// The frame of one function.
#[derive(Clone, Debug, Default)]
pub struct FrameLayout {
    /// The names of the parameters, which take the first slots.
    params : Vec<Rc<str>>,
    /// Maps every `VAR`/`VAL` node in the body to its slot.
    locals : HashMap<NodeId, usize>,
}

impl FrameLayout {
    /// Computes the layout of the given function.
    ///
    /// # Arguments
    /// - `tree`: The [`Tree`] that contains the function.
    /// - `func`: The `FUNC` node of the function.
    ///
    /// # Errors
    /// This function errors if the function is missing its name, or a parameter is not a named `VAR`.
    pub fn of(tree: &Tree, func: NodeId) -> Result<Self, CodegenError> {
        let header: NodeId = tree.left(func).ok_or(CodegenError::MissingChild { what: "a function", expected: "a name", pos: tree.pos(func) })?;

        let mut layout: Self = Self::default();
        for (link, param) in tree.list_items(tree.left(header)) {
            let name: Option<&Rc<str>> = param.filter(|p| tree.is_op(Some(*p), Op::Var)).and_then(|p| tree.left(p)).and_then(|n| tree.value(n).name());
            match name {
                Some(name) => layout.params.push(name.clone()),
                None => return Err(CodegenError::MissingChild { what: "a parameter", expected: "a name", pos: tree.pos(link) }),
            }
        }

        if let Some(body) = tree.right(func) {
            trav_stmt(tree, body, &mut layout);
        }
        trace!("Function {} has {} parameters and {} locals", tree.value(header), layout.params.len(), layout.locals.len());
        Ok(layout)
    }



    /// Returns the names of the parameters, in order.
    #[inline]
    pub fn params(&self) -> &[Rc<str>] { &self.params }

    /// Returns the slot of the given declaration, if it is in this function.
    #[inline]
    pub fn slot_of(&self, decl: NodeId) -> Option<usize> { self.locals.get(&decl).copied() }

    /// Returns the number of local variables.
    #[inline]
    pub fn n_locals(&self) -> usize { self.locals.len() }

    /// Returns the number of cells the frame takes, including the return address.
    #[inline]
    pub fn size(&self) -> usize { 1 + 2 * (self.params.len() + self.locals.len()) }
}





/***** TRAVERSAL FUNCTIONS *****/
/// Assigns slots to the declarations in the given statement, in the order in which they appear.
fn trav_stmt(tree: &Tree, id: NodeId, layout: &mut FrameLayout) {
    use Op::*;
    match tree.op(id) {
        Some(Compound) => {
            let items: Vec<NodeId> = tree.list_items(Some(id)).filter_map(|(_, item)| item).collect();
            for item in items {
                trav_stmt(tree, item, layout);
            }
        },
        Some(Var | Val) => {
            let slot: usize = layout.params.len() + layout.locals.len();
            layout.locals.insert(id, slot);
        },
        Some(If) => match tree.right(id) {
            Some(arms) if tree.op(arms) == Some(Else) => {
                for arm in [tree.left(arms), tree.right(arms)].into_iter().flatten() {
                    trav_stmt(tree, arm, layout);
                }
            },
            Some(arm) => trav_stmt(tree, arm, layout),
            None => {},
        },
        Some(While) => {
            if let Some(body) = tree.right(id) {
                trav_stmt(tree, body, layout);
            }
        },

        // Nothing else declares variables
        _ => {},
    }
}





/***** TESTS *****/
#[cfg(test)]
mod tests {
    use kite_ast::program::Program;
    use kite_dsl::compile;

    use super::*;

    fn layout_of(source: &str, name: &str) -> (Program, FrameLayout) {
        let program: Program = compile(source).unwrap_or_else(|err| panic!("Failed to compile '{source}': {err}"));
        let node: NodeId = program.functions.get_str(name).unwrap().node;
        let layout: FrameLayout = FrameLayout::of(&program.tree, node).unwrap();
        (program, layout)
    }

    #[test]
    fn test_cells() {
        assert_eq!(global_cells(0), (128, 129));
        assert_eq!(global_cells(3), (134, 135));
        assert_eq!(frame_cells(0), (257, 258));
        assert_eq!(frame_cells(2), (261, 262));
    }

    #[test]
    fn test_params_come_first() {
        let (_, layout) = layout_of("fun f(a: Double, b: Double = 2): Double { var c = a * b; return c; }\nfun main(): Void { }", "f");
        assert_eq!(layout.params().iter().map(|p| &**p).collect::<Vec<&str>>(), vec!["a", "b"]);
        assert_eq!(layout.n_locals(), 1);
        assert_eq!(layout.size(), 7);
    }

    #[test]
    fn test_nested_blocks_get_unique_slots() {
        let source: &str = "fun main(): Void {
            var a = 1;
            { var b = 2; }
            if (a) { var c = 3; } else var d = 4;
            while (a) { var e = 5; a = 0; }
            { var b = 6; }
        }";
        let (program, layout) = layout_of(source, "main");
        assert_eq!(layout.n_locals(), 6);

        let mut slots: Vec<usize> = layout.locals.values().copied().collect();
        slots.sort_unstable();
        assert_eq!(slots, (0..6).collect::<Vec<usize>>());

        // The first declaration of the body gets the first slot
        let body: NodeId = program.tree.right(program.functions.get_str("main").unwrap().node).unwrap();
        let first: NodeId = program.tree.left(body).unwrap();
        assert_eq!(layout.slot_of(first), Some(0));
    }
}
