//  POOL.rs
//    by Kite developers
//
//  Created:
//    19 Oct 2026, 10:02:51
//  Last edited:
//    19 Oct 2026, 10:20:16
//  Auto updated?
//    Yes
//
//  Description:
//!   Defines the [`StringPool`], which deduplicates identifiers and string
//!   literals so that equal lexemes share the same storage.
//

use std::collections::HashSet;
use std::rc::Rc;


/***** LIBRARY *****/
/// A deduplicating store of strings.
///
/// Every string is stored once; interning an equal string again returns the same allocation. This allows a pointer comparison as a fast path before a content comparison (see [`same_str()`]).
#[derive(Clone, Debug, Default)]
pub struct StringPool {
    /// The strings in the pool.
    strings : HashSet<Rc<str>>,
}

impl StringPool {
    /// Constructor for the StringPool that creates an empty one.
    #[inline]
    pub fn new() -> Self { Self::default() }

    /// Interns the given text in the pool.
    ///
    /// # Arguments
    /// - `text`: The text to intern.
    ///
    /// # Returns
    /// A shared handle to the pooled copy of `text`.
    pub fn intern(&mut self, text: &str) -> Rc<str> {
        if let Some(pooled) = self.strings.get(text) {
            return pooled.clone();
        }
        let pooled: Rc<str> = Rc::from(text);
        self.strings.insert(pooled.clone());
        pooled
    }

    /// Returns the number of unique strings in the pool.
    #[inline]
    pub fn len(&self) -> usize { self.strings.len() }

    /// Returns whether the pool holds no strings.
    #[inline]
    pub fn is_empty(&self) -> bool { self.strings.is_empty() }
}



/// Compares two pooled strings, first by identity and then by content.
///
/// # Returns
/// True if both refer to equal text.
#[inline]
pub fn same_str(lhs: &Rc<str>, rhs: &Rc<str>) -> bool { Rc::ptr_eq(lhs, rhs) || lhs == rhs }



/***** TESTS *****/
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_shares_storage() {
        let mut pool: StringPool = StringPool::new();
        let a: Rc<str> = pool.intern("main");
        let b: Rc<str> = pool.intern(&String::from("main"));
        let c: Rc<str> = pool.intern("x");
        assert!(Rc::ptr_eq(&a, &b));
        assert!(same_str(&a, &b));
        assert!(!same_str(&a, &c));
        assert!(same_str(&a, &Rc::from("main")));
        assert_eq!(pool.len(), 2);
    }
}
