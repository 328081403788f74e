//  PROGRAM.rs
//    by Kite developers
//
//  Created:
//    19 Oct 2026, 11:07:45
//  Last edited:
//    19 Oct 2026, 16:58:02
//  Auto updated?
//    Yes
//
//  Description:
//!   Defines the [`Program`], which bundles the tree of one translation
//!   unit with the symbol tables that the later stages need.
//

use std::rc::Rc;

use crate::pool::StringPool;
use crate::symbols::{FunctionTable, VarTable};
use crate::tree::Tree;


/***** CONSTANTS *****/
/// The name of the function that is called when the program starts.
pub const MAIN_NAME: &str = "main";
/// The prefix given to the functions that a `static { ... }` block is turned into.
pub const STATIC_PREFIX: &str = "$static_";





/***** LIBRARY *****/
/// The `static { ... }` blocks of a translation unit, by the function names they were given.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StaticBlocks {
    /// The blocks declared before `main`, which run before `main`'s own statements.
    pub before : Vec<Rc<str>>,
    /// The blocks declared after `main`, which run whenever `main` returns.
    pub after  : Vec<Rc<str>>,
}



/// One translation unit, as produced by the parser or by reading the exchange format.
#[derive(Clone, Debug, Default)]
pub struct Program {
    /// The tree of the unit. Its root is a list of toplevel items.
    pub tree      : Tree,
    /// The strings used by the tree.
    pub pool      : StringPool,
    /// The global variables, in declaration order.
    pub globals   : VarTable,
    /// The functions, in the order in which they are generated.
    pub functions : FunctionTable,
    /// The static blocks. Only known right after parsing; the exchange format keeps them as ordinary functions.
    pub statics   : StaticBlocks,
}

impl Program {
    /// Returns whether the given function name was generated for a static block.
    #[inline]
    pub fn is_static_name(name: &str) -> bool { name.starts_with(STATIC_PREFIX) }
}
