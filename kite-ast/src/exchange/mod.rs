//  MOD.rs
//    by Kite developers
//
//  Created:
//    19 Oct 2026, 11:31:02
//  Last edited:
//    19 Oct 2026, 17:02:44
//  Auto updated?
//    Yes
//
//  Description:
//!   Implements the exchange format, a parenthesized prefix notation of
//!   the tree that lets the compiler stages run as separate processes.
//!
//!   Every node is written as a `{ HEAD LEFT RIGHT }` group, where `HEAD`
//!   is an opcode tag, a number, a `"name"` or a `'string'`, and an
//!   absent child is written as `NIL`. An annotation `$ns::token$` may
//!   precede any group; readers skip annotations they do not understand.
//

// Declare submodules
mod errors;
mod reader;
mod tables;
mod writer;

// Bring some of it into this module's scope
pub use errors::FormatError;
pub use reader::read_tree;
pub use tables::derive_tables;
pub use writer::{TreeFormatter, write_tree};

use crate::pool::StringPool;
use crate::program::Program;


/***** LIBRARY *****/
/// Serializes the given program to the exchange format.
///
/// # Arguments
/// - `program`: The [`Program`] to serialize.
/// - `annotate`: Whether to emit `$kite::...$` annotations in front of some groups.
///
/// # Returns
/// The serialized text. Only the tree is written; the symbol tables are derived again when reading.
#[inline]
pub fn serialize(program: &Program, annotate: bool) -> String { write_tree(&program.tree, annotate) }

/// Deserializes a program from the exchange format.
///
/// # Arguments
/// - `text`: The text to read.
///
/// # Returns
/// A new [`Program`] with its global-variable and function tables derived from the loaded tree.
///
/// # Errors
/// This function errors if the text is not valid exchange format, or if the tree it describes is not a well-formed program.
pub fn deserialize(text: &str) -> Result<Program, FormatError> {
    let mut pool: StringPool = StringPool::new();
    let tree = read_tree(text, &mut pool)?;
    let (globals, functions) = derive_tables(&tree)?;
    Ok(Program { tree, pool, globals, functions, statics: Default::default() })
}
