//  LIB.rs
//    by Kite developers
//
//  Created:
//    19 Oct 2026, 10:58:12
//  Last edited:
//    19 Oct 2026, 17:44:30
//  Auto updated?
//    Yes
//
//  Description:
//!   The `kite-ast` crate defines the representation of a Kite program
//!   that every compiler stage works on: the node tree, its symbol
//!   tables and the textual exchange format that lets the stages run
//!   as separate processes.
//

// Declare the modules
pub mod errors;
pub mod exchange;
pub mod ops;
pub mod pool;
pub mod program;
pub mod spec;
pub mod symbols;
pub mod tree;

// Bring some stuff into the global namespace.
pub use errors::PrettyError;
pub use exchange::FormatError;
pub use ops::Op;
pub use program::Program;
pub use spec::{TextPos, TextRange};
pub use tree::{NodeId, Tree, Value};
