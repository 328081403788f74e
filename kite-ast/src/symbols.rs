//  SYMBOLS.rs
//    by Kite developers
//
//  Created:
//    19 Oct 2026, 10:49:20
//  Last edited:
//    19 Oct 2026, 16:55:41
//  Auto updated?
//    Yes
//
//  Description:
//!   Defines the symbol tables, which are not nodes in the tree but rather
//!   a separate data structure for keeping track of definitions.
//!
//!   A [`VarTable`] holds the variables of one lexical level, and a
//!   [`ScopeStack`] nests them with the global scope at the bottom. The
//!   [`FunctionTable`] holds every declared function in declaration order.
//

use std::fmt::{Display, Formatter, Result as FResult};
use std::rc::Rc;

use enum_debug::EnumDebug;

use crate::pool::same_str;
use crate::tree::NodeId;


/***** AUXILLARY *****/
/// The type a function returns.
#[derive(Clone, Copy, Debug, EnumDebug, Eq, Hash, PartialEq)]
pub enum ReturnType {
    /// The function returns a `Double`.
    Double,
    /// The function does not return a value.
    Void,
}

impl Display for ReturnType {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult {
        match self {
            Self::Double => write!(f, "Double"),
            Self::Void => write!(f, "Void"),
        }
    }
}





/***** LIBRARY *****/
/// A single variable binding.
#[derive(Clone, Debug, PartialEq)]
pub struct Variable {
    /// The name of the variable.
    pub name      : Rc<str>,
    /// The slot of the variable; global slots are counted separately from local ones.
    pub slot      : usize,
    /// Whether the variable is a `val` and may thus not be assigned.
    pub is_const  : bool,
    /// Whether the variable lives in the global region.
    pub is_global : bool,
}



/// The variables declared at one lexical level, unique by name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VarTable {
    /// The variables, in declaration order.
    vars : Vec<Variable>,
}

impl VarTable {
    /// Constructor for the VarTable that creates an empty one.
    #[inline]
    pub fn new() -> Self { Self::default() }

    /// Adds a variable to this table.
    ///
    /// # Returns
    /// False if a variable with the same name already exists in this table, in which case nothing is added.
    pub fn declare(&mut self, var: Variable) -> bool {
        if self.get(&var.name).is_some() {
            return false;
        }
        self.vars.push(var);
        true
    }

    /// Finds a variable in this table by name.
    #[inline]
    pub fn get(&self, name: &Rc<str>) -> Option<&Variable> { self.vars.iter().find(|v| same_str(&v.name, name)) }

    /// Finds a variable in this table by its textual name.
    #[inline]
    pub fn get_str(&self, name: &str) -> Option<&Variable> { self.vars.iter().find(|v| &*v.name == name) }

    /// Iterates over the variables in declaration order.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Variable> { self.vars.iter() }

    /// Returns the number of variables in this table.
    #[inline]
    pub fn len(&self) -> usize { self.vars.len() }

    /// Returns whether this table has no variables.
    #[inline]
    pub fn is_empty(&self) -> bool { self.vars.is_empty() }
}



/// A stack of [`VarTable`]s modelling nested lexical blocks.
///
/// The bottom-most table is the global scope and is never popped.
#[derive(Clone, Debug)]
pub struct ScopeStack {
    /// The scopes, outermost first.
    scopes : Vec<VarTable>,
}

impl Default for ScopeStack {
    #[inline]
    fn default() -> Self { Self::new() }
}

impl ScopeStack {
    /// Constructor for the ScopeStack that holds only an empty global scope.
    #[inline]
    pub fn new() -> Self { Self { scopes: vec![VarTable::new()] } }

    /// Enters a new, empty scope.
    #[inline]
    pub fn push(&mut self) { self.scopes.push(VarTable::new()); }

    /// Leaves the innermost scope, discarding its bindings.
    ///
    /// The global scope is never popped.
    #[inline]
    pub fn pop(&mut self) -> Option<VarTable> { if self.scopes.len() > 1 { self.scopes.pop() } else { None } }

    /// Returns how many scopes are on the stack, including the global one.
    #[inline]
    pub fn depth(&self) -> usize { self.scopes.len() }

    /// Returns whether the innermost scope is the global one.
    #[inline]
    pub fn is_global(&self) -> bool { self.scopes.len() == 1 }

    /// Declares a variable in the innermost scope.
    ///
    /// # Returns
    /// False if the innermost scope already declares a variable with the same name.
    #[inline]
    pub fn declare(&mut self, var: Variable) -> bool {
        match self.scopes.last_mut() {
            Some(scope) => scope.declare(var),
            None => false,
        }
    }

    /// Looks up a variable, walking from the innermost to the outermost scope.
    #[inline]
    pub fn lookup(&self, name: &Rc<str>) -> Option<&Variable> { self.scopes.iter().rev().find_map(|s| s.get(name)) }

    /// Returns the global scope.
    #[inline]
    pub fn globals(&self) -> &VarTable { &self.scopes[0] }

    /// Consumes the stack and returns the global scope.
    #[inline]
    pub fn into_globals(mut self) -> VarTable { self.scopes.swap_remove(0) }
}



/// A declared function.
#[derive(Clone, Debug, PartialEq)]
pub struct Function {
    /// The name of the function.
    pub name    : Rc<str>,
    /// What the function returns.
    pub returns : ReturnType,
    /// The number of parameters of the function.
    pub arity   : usize,
    /// The `FUNC` node defining this function.
    pub node    : NodeId,
}



/// Every function of a translation unit, unique by name and in declaration order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FunctionTable {
    /// The functions.
    funcs : Vec<Function>,
}

impl FunctionTable {
    /// Constructor for the FunctionTable that creates an empty one.
    #[inline]
    pub fn new() -> Self { Self::default() }

    /// Adds a function to this table.
    ///
    /// # Returns
    /// False if a function with the same name already exists, in which case nothing is added.
    pub fn declare(&mut self, func: Function) -> bool {
        if self.get(&func.name).is_some() {
            return false;
        }
        self.funcs.push(func);
        true
    }

    /// Finds a function by name.
    #[inline]
    pub fn get(&self, name: &Rc<str>) -> Option<&Function> { self.funcs.iter().find(|f| same_str(&f.name, name)) }

    /// Finds a function by its textual name.
    #[inline]
    pub fn get_str(&self, name: &str) -> Option<&Function> { self.funcs.iter().find(|f| &*f.name == name) }

    /// Reorders the functions by the given key. Functions with equal keys keep their relative order.
    #[inline]
    pub fn sort_by_key<K: Ord>(&mut self, key: impl FnMut(&Function) -> K) { self.funcs.sort_by_key(key); }

    /// Iterates over the functions in order.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Function> { self.funcs.iter() }

    /// Returns the number of functions.
    #[inline]
    pub fn len(&self) -> usize { self.funcs.len() }

    /// Returns whether there are no functions.
    #[inline]
    pub fn is_empty(&self) -> bool { self.funcs.is_empty() }
}



/***** TESTS *****/
#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str, slot: usize) -> Variable { Variable { name: Rc::from(name), slot, is_const: false, is_global: false } }

    #[test]
    fn test_shadowing_and_restoring() {
        let mut scopes: ScopeStack = ScopeStack::new();
        assert!(scopes.declare(Variable { is_global: true, ..var("x", 0) }));
        assert!(!scopes.declare(var("x", 1)));

        scopes.push();
        assert!(scopes.declare(var("x", 7)));
        assert_eq!(scopes.lookup(&Rc::from("x")).map(|v| v.slot), Some(7));
        scopes.pop();

        assert_eq!(scopes.lookup(&Rc::from("x")).map(|v| v.slot), Some(0));
        assert!(scopes.pop().is_none());
        assert_eq!(scopes.into_globals().len(), 1);
    }

    #[test]
    fn test_function_reorder() {
        let mut table: FunctionTable = FunctionTable::new();
        for (i, name) in ["f", "$static_0", "main", "$static_1"].into_iter().enumerate() {
            assert!(table.declare(Function { name: Rc::from(name), returns: ReturnType::Void, arity: 0, node: crate::tree::Tree::new().number(i as f64, Default::default()) }));
        }
        assert!(!table.declare(table.funcs[0].clone()));
        table.sort_by_key(|f| !f.name.starts_with("$static_"));
        let names: Vec<&str> = table.iter().map(|f| &*f.name).collect();
        assert_eq!(names, vec!["$static_0", "$static_1", "f", "main"]);
    }
}
