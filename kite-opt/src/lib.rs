//  LIB.rs
//    by Kite developers
//
//  Created:
//    19 Oct 2026, 19:20:02
//  Last edited:
//    19 Oct 2026, 20:14:41
//  Auto updated?
//    Yes
//
//  Description:
//!   The `kite-opt` crate implements the middle end of the Kite
//!   compiler, which simplifies a tree by folding constants and by
//!   computing symbolic derivatives.
//

// Declare modules
pub mod diff;
pub mod errors;
pub mod fold;

use kite_ast::program::Program;
use tracing::debug;

// Bring some stuff into the crate namespace
pub use errors::SimplifyError as Error;


/***** LIBRARY *****/
/// Simplifies the given program in-place.
///
/// # Arguments
/// - `program`: The [`Program`] to simplify. Its symbol tables are unaffected.
///
/// # Errors
/// This function errors if the program differentiates something we cannot differentiate.
pub fn simplify(program: &mut Program) -> Result<(), Error> {
    let before: usize = program.tree.count_reachable();
    let rewrites: usize = fold::simplify_tree(&mut program.tree)?;
    debug!("Simplified tree from {} to {} nodes ({} rewrites)", before, program.tree.count_reachable(), rewrites);
    Ok(())
}
