//  CONTEXT.rs
//    by Kite developers
//
//  Created:
//    19 Oct 2026, 20:35:52
//  Last edited:
//    19 Oct 2026, 20:36:40
//  Auto updated?
//    Yes
//
//  Description:
//!   Defines the [`CodegenContext`], which hands out the numbers of the
//!   jump labels.
//


/***** LIBRARY *****/
/// Numbers the labels of `if`s and `while`s.
///
/// Labels must be unique in one assembly file, so every file generated with the same context gets distinct labels.
#[derive(Clone, Debug, Default)]
pub struct CodegenContext {
    /// The number of the next `if`.
    ifs    : usize,
    /// The number of the next `while`.
    whiles : usize,
}

impl CodegenContext {
    /// Constructor for the CodegenContext that starts numbering at zero.
    #[inline]
    pub fn new() -> Self { Self::default() }

    /// Returns the number for the next `if`.
    #[inline]
    pub fn next_if(&mut self) -> usize {
        self.ifs += 1;
        self.ifs - 1
    }

    /// Returns the number for the next `while`.
    #[inline]
    pub fn next_while(&mut self) -> usize {
        self.whiles += 1;
        self.whiles - 1
    }
}
