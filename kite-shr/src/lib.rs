//  LIB.rs
//    by Kite developers
//
//  Created:
//    19 Oct 2026, 22:01:12
//  Last edited:
//    19 Oct 2026, 22:09:47
//  Auto updated?
//    Yes
//
//  Description:
//!   The `kite-shr` crate bundles things shared by the other crates:
//!   logging setup, common command-line arguments and test utilities.
//

// Declare modules
pub mod cli;
pub mod tracing;
pub mod utilities;
