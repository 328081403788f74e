//  REVERSE.rs
//    by Kite developers
//
//  Created:
//    19 Oct 2026, 21:14:26
//  Last edited:
//    19 Oct 2026, 21:51:09
//  Auto updated?
//    Yes
//
//  Description:
//!   Implements the traversal that prints a tree back to Kite source
//!   text.
//!
//!   Parentheses are only written where the precedence of the operators
//!   requires them, so parsing the output yields the same tree. Static
//!   blocks come out as the ordinary functions they were turned into.
//

use std::fmt::{Display, Formatter, Result as FResult, Write as _};

use kite_ast::ops::Op;
use kite_ast::program::Program;
use kite_ast::spec::TextPos;
use kite_ast::tree::{NodeId, Tree, Value};
use tracing::debug;

use crate::errors::CodegenError;


/***** CONSTANTS *****/
/// The width of one level of indentation.
const INDENT_SIZE: usize = 4;

/// Binds tightest: literals, names, calls and builtins.
const PREC_ATOM: u8 = 10;
/// `^`
const PREC_POW: u8 = 9;
/// Unary `+` and `-`.
const PREC_UNARY: u8 = 8;
/// `*` and `/`
const PREC_MUL: u8 = 7;
/// Binary `+` and `-`.
const PREC_ADD: u8 = 6;
/// `<`, `>`, `<=` and `>=`
const PREC_REL: u8 = 5;
/// `==` and `!=`
const PREC_EQ: u8 = 4;
/// `&&`
const PREC_AND: u8 = 3;
/// `||`
const PREC_OR: u8 = 2;
/// `=`, which binds loosest.
const PREC_ASSIGN: u8 = 1;





/***** HELPER FUNCTIONS *****/
/// Writes the indentation of the given depth.
#[derive(Clone, Copy, Debug)]
struct Indent(usize);
impl Display for Indent {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult { write!(f, "{:width$}", "", width = self.0 * INDENT_SIZE) }
}

/// Returns how tightly the given expression binds.
fn prec_of(tree: &Tree, id: NodeId) -> u8 {
    use Op::*;
    match tree.value(id) {
        Value::Number(n) if n.is_sign_negative() => PREC_UNARY,
        Value::Number(_) | Value::Name(_) | Value::String(_) => PREC_ATOM,
        Value::Statement(op) => match op {
            Add | Sub if tree.right(id).is_none() => PREC_UNARY,
            Add | Sub => PREC_ADD,
            Mul | Div => PREC_MUL,
            Pow => PREC_POW,
            Less | Greater | LessEq | GreaterEq => PREC_REL,
            Equal | NotEqual => PREC_EQ,
            And => PREC_AND,
            Or => PREC_OR,
            Assign => PREC_ASSIGN,
            _ => PREC_ATOM,
        },
    }
}





/***** AUXILLARY *****/
/// Collects the source text of a tree.
struct Printer<'t> {
    /// The tree to print.
    tree : &'t Tree,
    /// The text written so far.
    out  : String,
}

impl<'t> Printer<'t> {
    /// Returns the given child, or errors that it is missing.
    #[inline]
    fn child(&self, child: Option<NodeId>, what: &'static str, expected: &'static str, pos: TextPos) -> Result<NodeId, CodegenError> {
        child.ok_or(CodegenError::MissingChild { what, expected, pos })
    }

    /// Returns the name stored in the given node.
    fn name_of(&self, id: NodeId) -> Result<&'t str, CodegenError> {
        let tree: &'t Tree = self.tree;
        match tree.value(id) {
            Value::Name(name) => Ok(name),
            other => Err(CodegenError::Malformed { what: other.to_string(), place: "where a name is expected", pos: tree.pos(id) }),
        }
    }



    /// Prints a function, including its trailing newline.
    fn function(&mut self, id: NodeId) -> Result<(), CodegenError> {
        let tree: &Tree = self.tree;
        let pos: TextPos = tree.pos(id);
        let header: NodeId = self.child(tree.left(id), "a function", "a name", pos)?;
        write!(self.out, "fun {}(", self.name_of(header)?)?;

        for (i, (link, param)) in tree.list_items(tree.left(header)).enumerate() {
            let param: NodeId = self.child(param, "a parameter list", "a parameter", tree.pos(link))?;
            let name: NodeId = self.child(tree.left(param), "a parameter", "a name", tree.pos(param))?;
            write!(self.out, "{}{}: Double", if i > 0 { ", " } else { "" }, self.name_of(name)?)?;
            if let Some(default) = tree.right(param) {
                self.out.push_str(" = ");
                self.expr(default, PREC_ASSIGN)?;
            }
        }

        let returns: &str = if tree.is_op(tree.right(header), Op::Type) { "Double" } else { "Void" };
        writeln!(self.out, "): {returns} {{")?;
        if let Some(body) = tree.right(id) {
            self.items(body, 1)?;
        }
        self.out.push_str("}\n");
        Ok(())
    }

    /// Prints every statement of the given list.
    fn items(&mut self, head: NodeId, depth: usize) -> Result<(), CodegenError> {
        let tree: &Tree = self.tree;
        if tree.op(head) != Some(Op::Compound) {
            return self.stmt(head, depth);
        }
        for (_, item) in tree.list_items(Some(head)) {
            if let Some(item) = item {
                self.stmt(item, depth)?;
            }
        }
        Ok(())
    }

    /// Prints the body of an `if`, `else` or `while` that follows its header on the same line.
    fn arm(&mut self, id: NodeId, depth: usize) -> Result<(), CodegenError> {
        if self.tree.op(id) == Some(Op::Compound) {
            self.out.push_str(" {\n");
            self.items(id, depth + 1)?;
            writeln!(self.out, "{}}}", Indent(depth))?;
            Ok(())
        } else {
            self.out.push('\n');
            self.stmt(id, depth + 1)
        }
    }

    /// Prints a statement on its own line(s).
    fn stmt(&mut self, id: NodeId, depth: usize) -> Result<(), CodegenError> {
        let tree: &Tree = self.tree;
        let pos: TextPos = tree.pos(id);
        let op: Op = match tree.value(id) {
            Value::Statement(op) => *op,
            other => return Err(CodegenError::Malformed { what: other.to_string(), place: "as a statement", pos }),
        };

        write!(self.out, "{}", Indent(depth))?;
        use Op::*;
        match op {
            Compound => {
                self.out.push_str("{\n");
                self.items(id, depth + 1)?;
                writeln!(self.out, "{}}}", Indent(depth))?;
            },

            Var | Val => {
                let name: NodeId = self.child(tree.left(id), "a declaration", "a name", pos)?;
                let value: NodeId = self.child(tree.right(id), "a declaration", "a value", pos)?;
                write!(self.out, "{} {} = ", if op == Val { "val" } else { "var" }, self.name_of(name)?)?;
                self.expr(value, PREC_ASSIGN)?;
                self.out.push_str(";\n");
            },

            Assign | Call => {
                self.expr(id, PREC_ASSIGN)?;
                self.out.push_str(";\n");
            },

            If => {
                let cond: NodeId = self.child(tree.left(id), "an if", "a condition", pos)?;
                let arms: NodeId = self.child(tree.right(id), "an if", "a body", pos)?;
                self.out.push_str("if (");
                self.expr(cond, PREC_ASSIGN)?;
                self.out.push(')');
                if tree.op(arms) == Some(Else) {
                    let then: NodeId = self.child(tree.left(arms), "an else", "a body", tree.pos(arms))?;
                    let other: NodeId = self.child(tree.right(arms), "an else", "a body", tree.pos(arms))?;
                    self.arm(then, depth)?;
                    write!(self.out, "{}else", Indent(depth))?;
                    self.arm(other, depth)?;
                } else {
                    self.arm(arms, depth)?;
                }
            },

            While => {
                let cond: NodeId = self.child(tree.left(id), "a while", "a condition", pos)?;
                let body: NodeId = self.child(tree.right(id), "a while", "a body", pos)?;
                self.out.push_str("while (");
                self.expr(cond, PREC_ASSIGN)?;
                self.out.push(')');
                self.arm(body, depth)?;
            },

            Return => match tree.left(id) {
                Some(value) => {
                    self.out.push_str("return ");
                    self.expr(value, PREC_ASSIGN)?;
                    self.out.push_str(";\n");
                },
                None => self.out.push_str("return;\n"),
            },

            Out => {
                self.out.push_str("out");
                for (link, item) in tree.list_items(tree.left(id)) {
                    let item: NodeId = self.child(item, "an out", "an item", tree.pos(link))?;
                    self.out.push_str(" << ");
                    match tree.value(item) {
                        Value::String(text) => {
                            if text.contains(['"', '\n']) {
                                return Err(CodegenError::Malformed { what: format!("string {text:?}"), place: "in source text", pos: tree.pos(item) });
                            }
                            write!(self.out, "\"{text}\"")?;
                        },
                        Value::Statement(NewLine) => self.out.push_str("endl"),
                        _ => self.expr(item, PREC_ASSIGN)?,
                    }
                }
                self.out.push_str(";\n");
            },

            In => {
                self.out.push_str("in");
                for (link, item) in tree.list_items(tree.left(id)) {
                    let item: NodeId = self.child(item, "an in", "a variable", tree.pos(link))?;
                    write!(self.out, " >> {}", self.name_of(item)?)?;
                }
                self.out.push_str(";\n");
            },

            op => return Err(CodegenError::Malformed { what: format!("'{}'", op.tag()), place: "as a statement", pos }),
        }
        Ok(())
    }

    /// Prints an expression, in parentheses if it binds looser than `min`.
    fn expr(&mut self, id: NodeId, min: u8) -> Result<(), CodegenError> {
        let prec: u8 = prec_of(self.tree, id);
        if prec < min {
            self.out.push('(');
            self.expr_bare(id)?;
            self.out.push(')');
            Ok(())
        } else {
            self.expr_bare(id)
        }
    }

    /// Prints an expression without surrounding parentheses.
    fn expr_bare(&mut self, id: NodeId) -> Result<(), CodegenError> {
        let tree: &Tree = self.tree;
        let pos: TextPos = tree.pos(id);
        let op: Op = match tree.value(id) {
            Value::Number(n) if !n.is_finite() => {
                return Err(CodegenError::Malformed { what: format!("number {n}"), place: "in source text", pos });
            },
            Value::Number(n) => {
                write!(self.out, "{n}")?;
                return Ok(());
            },
            Value::Name(name) => {
                self.out.push_str(name);
                return Ok(());
            },
            Value::String(_) => return Err(CodegenError::Malformed { what: "string".into(), place: "in an expression", pos }),
            Value::Statement(op) => *op,
        };
        let lhs: NodeId = self.child(tree.left(id), op.tag(), "an operand", pos)?;

        use Op::*;
        match op {
            // Nested unary operators get parentheses, as `--` is not a token
            Add | Sub if tree.right(id).is_none() => {
                self.out.push_str(if op == Add { "+" } else { "-" });
                self.expr(lhs, PREC_POW)
            },

            // Right-associative
            Pow | Assign => {
                let rhs: NodeId = self.child(tree.right(id), op.tag(), "two operands", pos)?;
                if op == Pow {
                    self.expr(lhs, PREC_ATOM)?;
                    self.out.push_str(" ^ ");
                    self.expr(rhs, PREC_UNARY)
                } else {
                    write!(self.out, "{} = ", self.name_of(lhs)?)?;
                    self.expr(rhs, PREC_ASSIGN)
                }
            },

            // Left-associative
            Add | Sub | Mul | Div | Equal | NotEqual | Less | Greater | LessEq | GreaterEq | And | Or => {
                let rhs: NodeId = self.child(tree.right(id), op.tag(), "two operands", pos)?;
                let prec: u8 = prec_of(tree, id);
                self.expr(lhs, prec)?;
                write!(self.out, " {} ", op.infix_symbol().unwrap_or_default())?;
                self.expr(rhs, prec + 1)
            },

            Sin | Cos | Tan | Sqrt | Int | Diff => {
                write!(self.out, "{}(", op.builtin_name().unwrap_or_default())?;
                self.expr(lhs, PREC_ASSIGN)?;
                self.out.push(')');
                Ok(())
            },

            Call => {
                write!(self.out, "{}(", self.name_of(lhs)?)?;
                for (i, (link, arg)) in tree.list_items(tree.left(lhs)).enumerate() {
                    let arg: NodeId = self.child(arg, "an argument list", "an argument", tree.pos(link))?;
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.expr(arg, PREC_ASSIGN)?;
                }
                self.out.push(')');
                Ok(())
            },

            op => Err(CodegenError::Malformed { what: format!("'{}'", op.tag()), place: "in an expression", pos }),
        }
    }
}





/***** LIBRARY *****/
/// Prints the given program as Kite source text.
///
/// # Arguments
/// - `program`: The [`Program`] to print.
///
/// # Returns
/// Source text that parses to the same tree.
///
/// # Errors
/// This function errors if the tree has a shape the parser never produces, or contains strings or numbers that cannot be written in source text.
pub fn reverse(program: &Program) -> Result<String, CodegenError> {
    let tree: &Tree = &program.tree;
    let mut printer: Printer = Printer { tree, out: String::new() };

    let mut prev: Option<Op> = None;
    for (link, item) in tree.list_items(tree.root()) {
        let item: NodeId = printer.child(item, "the program", "an item", tree.pos(link))?;
        let op: Option<Op> = tree.op(item);
        // Functions are separated by an empty line
        if prev.is_some() && (op == Some(Op::Fun) || prev == Some(Op::Fun)) {
            printer.out.push('\n');
        }
        match op {
            Some(Op::Fun) => printer.function(item)?,
            Some(Op::Var | Op::Val) => printer.stmt(item, 0)?,
            _ => return Err(CodegenError::Malformed { what: tree.value(item).to_string(), place: "at the toplevel", pos: tree.pos(item) }),
        }
        prev = op;
    }

    debug!("Reversed {} nodes to {} lines of source", tree.count_reachable(), printer.out.lines().count());
    Ok(printer.out)
}





/***** TESTS *****/
#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use kite_dsl::compile;
    use kite_shr::utilities::test_on_kite_files;

    use super::*;

    /// Asserts that printing the given source and parsing it again gives the same tree, and returns the printed text.
    fn roundtrip(source: &str) -> String {
        let program: Program = compile(source).unwrap_or_else(|err| panic!("Failed to compile '{source}': {err}"));
        let text: String = reverse(&program).unwrap_or_else(|err| panic!("Failed to reverse '{source}': {err}"));
        let again: Program = compile(&text).unwrap_or_else(|err| panic!("Failed to compile reversed '{source}': {err}\n{text}"));
        assert!(again.tree == program.tree, "Reversing '{source}' changed its tree:\n{text}");
        text
    }

    #[test]
    fn test_layout() {
        let text: String = roundtrip("var g = 1;\nval h = 2;\nfun f(a: Double, b: Double = g): Double { if (a < b) return a; else { return b; } }\nfun main(): Void { while (g) g = g - 1; out << \"x\" << f(1) << endl; }");
        assert_eq!(
            text,
            "var g = 1;
val h = 2;

fun f(a: Double, b: Double = g): Double {
    if (a < b)
        return a;
    else {
        return b;
    }
}

fun main(): Void {
    while (g)
        g = g - 1;
    out << \"x\" << f(1, g) << endl;
}
"
        );
    }

    #[test]
    fn test_parentheses() {
        for expr in [
            "(a + b) * c",
            "a - (b - c)",
            "a - b - c",
            "a / (b * c)",
            "-x ^ 2",
            "(-x) ^ 2",
            "2 ^ 3 ^ 2",
            "(2 ^ 3) ^ 2",
            "2 ^ -x",
            "-(-x)",
            "a < b == b < c",
            "a == (b == c)",
            "a || b && c",
            "(a || b) && c",
            "a = b = 3",
            "(a = 2) + 1",
            "sin(a + b) * [c] - diff(x * x)",
        ] {
            let text: String = roundtrip(&format!("var a = 1;\nvar b = 2;\nvar c = 3;\nvar x = 4;\nfun main(): Void {{ out << {expr}; }}"));
            assert!(text.contains(&format!("out << {};", expr.replace("[c]", "int(c)"))), "'{expr}' printed differently:\n{text}");
        }
    }

    #[test]
    fn test_simplified_numbers() {
        let mut program: Program = compile("fun main(): Void { out << 2 - 5 << 0.25 * 2; }").unwrap();
        kite_opt::simplify(&mut program).unwrap();
        let text: String = reverse(&program).unwrap();
        assert!(text.contains("out << -3 << 0.5;"), "{text}");
    }

    #[test]
    fn test_reverse_kite_files() {
        test_on_kite_files(|path: PathBuf, raw: String| {
            let program: Program = compile(&raw).unwrap_or_else(|err| panic!("Failed to compile '{}': {err}", path.display()));
            let text: String = reverse(&program).unwrap_or_else(|err| panic!("Failed to reverse '{}': {err}", path.display()));
            let again: Program = compile(&text).unwrap_or_else(|err| panic!("Failed to compile reversed '{}': {err}\n{text}", path.display()));
            assert!(again.tree == program.tree, "Reversing '{}' changed its tree:\n{text}", path.display());
            assert_eq!(again.functions.iter().map(|f| f.name.to_string()).collect::<Vec<String>>(), program.functions.iter().map(|f| f.name.to_string()).collect::<Vec<String>>());
        });
    }
}
