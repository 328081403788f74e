//  LIB.rs
//    by Kite developers
//
//  Created:
//    19 Oct 2026, 20:29:44
//  Last edited:
//    19 Oct 2026, 21:53:20
//  Auto updated?
//    Yes
//
//  Description:
//!   The `kite-gen` crate implements the back end of the Kite compiler.
//!   It turns a (simplified) tree into assembly for the stack VM, or
//!   back into Kite source text.
//

// Declare modules
pub mod context;
pub mod errors;
pub mod generate;
pub mod layout;
pub mod reverse;

// Bring some stuff into the crate namespace
pub use context::CodegenContext;
pub use errors::CodegenError as Error;
pub use generate::generate;
pub use reverse::reverse;
