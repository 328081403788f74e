//  GENERATE.rs
//    by Kite developers
//
//  Created:
//    19 Oct 2026, 20:44:31
//  Last edited:
//    19 Oct 2026, 21:38:56
//  Auto updated?
//    Yes
//
//  Description:
//!   Implements the traversal that writes the assembly of a
//!   [`Program`] for the stack VM.
//!
//!   Every value is pushed as two cells, fraction first and integer on
//!   top. Binary operators get their right operand pushed before their
//!   left one.
//

use std::fmt::Write as _;
use std::rc::Rc;

use kite_ast::ops::Op;
use kite_ast::program::{MAIN_NAME, Program};
use kite_ast::spec::TextPos;
use kite_ast::symbols::{Function, FunctionTable, ReturnType, ScopeStack, Variable};
use kite_ast::tree::{NodeId, Tree, Value};
use tracing::{debug, trace};

use crate::context::CodegenContext;
use crate::errors::CodegenError;
use crate::layout::{FrameLayout, STACK_START, VIDEO_SIZE, VIDEO_START, frame_cells, global_cells};


/***** HELPER FUNCTIONS *****/
/// Returns the instruction computing the given operator, if it is computed by one.
fn mnemonic(op: Op) -> Option<&'static str> {
    use Op::*;
    match op {
        Add => Some("ADD"),
        Sub => Some("SUB"),
        Mul => Some("MUL"),
        Div => Some("DIV"),
        Pow => Some("POW"),
        Sin => Some("SIN"),
        Cos => Some("COS"),
        Sqrt => Some("SQRT"),
        Equal => Some("EQL"),
        NotEqual => Some("NEQL"),
        Less => Some("LESS"),
        Greater => Some("GREATER"),
        LessEq => Some("LEQ"),
        GreaterEq => Some("GEQ"),
        And => Some("AND"),
        Or => Some("OR"),
        _ => None,
    }
}

/// Splits a value into the integer and fractional cells the VM stores it in.
#[inline]
fn value_cells(value: f64) -> (i64, i64) {
    let int: f64 = value.trunc();
    (int as i64, ((value - int) * 10000.0).trunc() as i64)
}

/// Returns the (integer, fraction) operands addressing the given variable.
///
/// # Arguments
/// - `var`: The [`Variable`] to address.
/// - `base`: The register holding the frame bottom, used for locals only.
fn operands_of(var: &Variable, base: &str) -> (String, String) {
    if var.is_global {
        let (int, fract): (usize, usize) = global_cells(var.slot);
        (format!("[{int}]"), format!("[{fract}]"))
    } else {
        let (int, fract): (usize, usize) = frame_cells(var.slot);
        (format!("[{int}+{base}]"), format!("[{fract}+{base}]"))
    }
}





/***** AUXILLARY *****/
/// Walks a [`Program`] and collects its assembly.
struct Generator<'p, 'c> {
    /// The tree to generate.
    tree      : &'p Tree,
    /// The functions that may be called.
    functions : &'p FunctionTable,
    /// Numbers the labels.
    ctx       : &'c mut CodegenContext,
    /// The variables in scope; the bottom scope holds the globals.
    scopes    : ScopeStack,
    /// The frame of the function being generated.
    layout    : FrameLayout,
    /// The assembly written so far.
    out       : String,
}

impl<'p, 'c> Generator<'p, 'c> {
    /// Constructor for the Generator that has every global in scope.
    fn new(program: &'p Program, ctx: &'c mut CodegenContext) -> Self {
        let mut scopes: ScopeStack = ScopeStack::new();
        for var in program.globals.iter() {
            scopes.declare(var.clone());
        }
        Self { tree: &program.tree, functions: &program.functions, ctx, scopes, layout: FrameLayout::default(), out: String::new() }
    }

    /// Writes one line of output.
    #[inline]
    fn line(&mut self, text: impl AsRef<str>) -> Result<(), CodegenError> {
        writeln!(self.out, "{}", text.as_ref())?;
        Ok(())
    }

    /// Finds a variable that is in scope.
    fn variable(&self, name_node: NodeId) -> Result<Variable, CodegenError> {
        let pos: TextPos = self.tree.pos(name_node);
        let Some(name) = self.tree.value(name_node).name() else {
            return Err(CodegenError::Malformed { what: self.tree.value(name_node).to_string(), place: "where a variable is expected", pos });
        };
        self.scopes.lookup(name).cloned().ok_or_else(|| CodegenError::UnknownVariable { name: name.to_string(), pos })
    }

    /// Pushes the value of the given variable.
    fn load(&mut self, var: &Variable) -> Result<(), CodegenError> {
        let (int, fract): (String, String) = operands_of(var, "rdx");
        writeln!(self.out, "PUSH {fract}\nPUSH {int}")?;
        Ok(())
    }

    /// Pops a value into the given variable.
    fn store(&mut self, var: &Variable) -> Result<(), CodegenError> {
        let (int, fract): (String, String) = operands_of(var, "rdx");
        writeln!(self.out, "POP {int}\nPOP {fract}")?;
        Ok(())
    }

    /// Switches the VM between computing on two-cell values and on single cells.
    fn real_calc(&mut self, on: bool) -> Result<(), CodegenError> {
        writeln!(self.out, ";Turn {} real-calc\nPUSH {}\nPOP rex", if on { "on" } else { "off" }, on as u8)?;
        Ok(())
    }

    /// Leaves the current function, resetting the stack pointer to its frame bottom.
    fn epilogue(&mut self) -> Result<(), CodegenError> {
        writeln!(self.out, ";Restore stack pointer\nPUSH rdx\nPOP rcx\n;Jump to return address\nPUSH [{STACK_START}+rcx]\nRET")?;
        Ok(())
    }



    /// Writes the code that runs before `main`, and the call to `main` itself.
    fn preamble(&mut self) -> Result<(), CodegenError> {
        self.real_calc(true)?;
        self.line(";Reset stack pointers")?;
        for reg in ["rcx", "rdx", "rfx"] {
            writeln!(self.out, "PUSH 0\nPOP {reg}")?;
        }
        self.line(";End")?;

        // Globals are initialized in declaration order
        let tree: &Tree = self.tree;
        for (_, item) in tree.list_items(tree.root()) {
            let Some(item) = item else { continue };
            match tree.op(item) {
                Some(op @ (Op::Var | Op::Val)) => self.trav_global(item, op)?,
                Some(Op::Fun) => {},
                _ => {
                    return Err(CodegenError::Malformed { what: tree.value(item).to_string(), place: "at the toplevel", pos: tree.pos(item) });
                },
            }
        }

        writeln!(self.out, ";Call {MAIN_NAME}\nCALL FUN_{MAIN_NAME}\nHLT\n;End\n")?;
        Ok(())
    }

    /// Writes the initializer of a global variable.
    fn trav_global(&mut self, id: NodeId, op: Op) -> Result<(), CodegenError> {
        let (name_node, value): (NodeId, NodeId) = self.declaration_parts(id)?;
        let var: Variable = self.variable(name_node)?;
        if !var.is_global {
            return Err(CodegenError::Malformed { what: format!("global '{}'", var.name), place: "without a global slot", pos: self.tree.pos(id) });
        }

        writeln!(self.out, ";{} {}", if op == Op::Val { "Val" } else { "Var" }, var.name)?;
        self.trav_expr(value)?;
        self.store(&var)?;
        self.line(";End")
    }

    /// Writes one function.
    fn function(&mut self, func: &Function) -> Result<(), CodegenError> {
        let tree: &Tree = self.tree;
        self.layout = FrameLayout::of(tree, func.node)?;
        trace!("Generating function '{}' with a frame of {} cells", func.name, self.layout.size());

        // Take the return address and the arguments off the stack
        writeln!(self.out, ";Function {0}\nFUN_{0}:\n;Save return address\nPOP [{STACK_START}+rcx]", func.name)?;
        self.scopes.push();
        let params: Vec<Rc<str>> = self.layout.params().to_vec();
        for (slot, name) in params.into_iter().enumerate() {
            let var: Variable = Variable { name, slot, is_const: false, is_global: false };
            let (int, fract): (String, String) = operands_of(&var, "rcx");
            writeln!(self.out, ";Get parameter {}\nPOP {int}\nPOP {fract}", var.name)?;
            if !self.scopes.declare(var.clone()) {
                return Err(CodegenError::Malformed { what: format!("parameter '{}'", var.name), place: "twice", pos: tree.pos(func.node) });
            }
        }

        // Move the stack pointer past the frame
        writeln!(self.out, ";Set frame bottom\nPUSH rcx\nPOP rdx\nPUSH rcx\nPOP rfx")?;
        self.real_calc(false)?;
        writeln!(self.out, ";Reserve frame\nPUSH {}\nPUSH rcx\nADD\nPOP rcx", self.layout.size())?;
        self.real_calc(true)?;

        // The body shares the scope of the parameters
        if let Some(body) = tree.right(func.node) {
            match tree.op(body) {
                Some(Op::Compound) => self.trav_list(body)?,
                _ => self.trav_stmt(body)?,
            }
        }
        self.scopes.pop();

        self.epilogue()?;
        self.line(";End\n")
    }
}





/***** TRAVERSAL FUNCTIONS *****/
impl Generator<'_, '_> {
    /// Generates every statement in the given list.
    fn trav_list(&mut self, head: NodeId) -> Result<(), CodegenError> {
        let tree: &Tree = self.tree;
        for (_, item) in tree.list_items(Some(head)) {
            if let Some(item) = item {
                self.trav_stmt(item)?;
            }
        }
        Ok(())
    }

    /// Generates a statement in a scope of its own.
    fn trav_arm(&mut self, id: NodeId) -> Result<(), CodegenError> {
        self.scopes.push();
        let res: Result<(), CodegenError> = self.trav_stmt(id);
        self.scopes.pop();
        res
    }

    /// Generates a statement.
    fn trav_stmt(&mut self, id: NodeId) -> Result<(), CodegenError> {
        let pos: TextPos = self.tree.pos(id);
        let op: Op = match self.tree.value(id) {
            Value::Statement(op) => *op,
            other => return Err(CodegenError::Malformed { what: other.to_string(), place: "as a statement", pos }),
        };

        use Op::*;
        match op {
            Compound => {
                self.scopes.push();
                let res: Result<(), CodegenError> = self.trav_list(id);
                self.scopes.pop();
                res
            },
            Var | Val => self.trav_decl(id, op),
            Assign => self.trav_assign(id, false),
            If => self.trav_if(id),
            While => self.trav_while(id),
            Return => self.trav_return(id),
            Call => self.trav_call(id, false),
            Out => self.trav_out(id),
            In => self.trav_in(id),

            op => Err(CodegenError::Malformed { what: format!("'{}'", op.tag()), place: "as a statement", pos }),
        }
    }

    /// Returns the name and value of a `VAR`/`VAL` node.
    fn declaration_parts(&self, id: NodeId) -> Result<(NodeId, NodeId), CodegenError> {
        let pos: TextPos = self.tree.pos(id);
        let name: NodeId = self.tree.left(id).ok_or(CodegenError::MissingChild { what: "a declaration", expected: "a name", pos })?;
        let value: NodeId = self.tree.right(id).ok_or(CodegenError::MissingChild { what: "a declaration", expected: "a value", pos })?;
        Ok((name, value))
    }

    /// Generates the declaration of a local variable.
    fn trav_decl(&mut self, id: NodeId, op: Op) -> Result<(), CodegenError> {
        let pos: TextPos = self.tree.pos(id);
        let (name_node, value): (NodeId, NodeId) = self.declaration_parts(id)?;
        let Some(name) = self.tree.value(name_node).name().cloned() else {
            return Err(CodegenError::Malformed { what: self.tree.value(name_node).to_string(), place: "as the name of a variable", pos });
        };
        let slot: usize = self.layout.slot_of(id).ok_or_else(|| CodegenError::Malformed { what: format!("declaration of '{name}'"), place: "outside of a function body", pos })?;

        // The initializer still sees any variable this one shadows
        writeln!(self.out, ";{} {name}", if op == Op::Val { "Val" } else { "Var" })?;
        self.trav_expr(value)?;
        let var: Variable = Variable { name, slot, is_const: op == Op::Val, is_global: false };
        if !self.scopes.declare(var.clone()) {
            return Err(CodegenError::Malformed { what: format!("variable '{}'", var.name), place: "declared twice in one scope", pos });
        }
        self.store(&var)?;
        self.line(";End")
    }

    /// Generates an assignment, which leaves the assigned value on the stack if `as_value` is true.
    fn trav_assign(&mut self, id: NodeId, as_value: bool) -> Result<(), CodegenError> {
        let pos: TextPos = self.tree.pos(id);
        let target: NodeId = self.tree.left(id).ok_or(CodegenError::MissingChild { what: "an assignment", expected: "a target", pos })?;
        let value: NodeId = self.tree.right(id).ok_or(CodegenError::MissingChild { what: "an assignment", expected: "a value", pos })?;
        let var: Variable = self.variable(target)?;
        if var.is_const {
            return Err(CodegenError::Malformed { what: format!("assignment to '{}'", var.name), place: "which is a val", pos });
        }

        writeln!(self.out, ";Assign {}", var.name)?;
        self.trav_expr(value)?;
        self.store(&var)?;
        if as_value {
            self.load(&var)?;
        }
        self.line(";End")
    }

    /// Generates an `if`, with or without an `else`.
    fn trav_if(&mut self, id: NodeId) -> Result<(), CodegenError> {
        let pos: TextPos = self.tree.pos(id);
        let cond: NodeId = self.tree.left(id).ok_or(CodegenError::MissingChild { what: "an if", expected: "a condition", pos })?;
        let arms: NodeId = self.tree.right(id).ok_or(CodegenError::MissingChild { what: "an if", expected: "a body", pos })?;
        let (then, other): (NodeId, Option<NodeId>) = if self.tree.op(arms) == Some(Op::Else) {
            (self.tree.left(arms).ok_or(CodegenError::MissingChild { what: "an else", expected: "a body", pos: self.tree.pos(arms) })?, self.tree.right(arms))
        } else {
            (arms, None)
        };

        let n: usize = self.ctx.next_if();
        self.line(";If")?;
        self.trav_expr(cond)?;
        writeln!(self.out, "PUSH 0\nPUSH 0\nJE ELSE_{n:06}")?;
        self.trav_arm(then)?;
        writeln!(self.out, "JMP END_IF_{n:06}\nELSE_{n:06}:")?;
        if let Some(other) = other {
            self.trav_arm(other)?;
        }
        writeln!(self.out, "END_IF_{n:06}:\n;End")?;
        Ok(())
    }

    /// Generates a `while`.
    fn trav_while(&mut self, id: NodeId) -> Result<(), CodegenError> {
        let pos: TextPos = self.tree.pos(id);
        let cond: NodeId = self.tree.left(id).ok_or(CodegenError::MissingChild { what: "a while", expected: "a condition", pos })?;
        let body: NodeId = self.tree.right(id).ok_or(CodegenError::MissingChild { what: "a while", expected: "a body", pos })?;

        let n: usize = self.ctx.next_while();
        writeln!(self.out, ";While\nWHILE_{n:06}:")?;
        self.trav_expr(cond)?;
        writeln!(self.out, "PUSH 0\nPUSH 0\nJE END_WHILE_{n:06}")?;
        self.trav_arm(body)?;
        writeln!(self.out, "JMP WHILE_{n:06}\nEND_WHILE_{n:06}:\n;End")?;
        Ok(())
    }

    /// Generates a `return`, with or without a value.
    fn trav_return(&mut self, id: NodeId) -> Result<(), CodegenError> {
        self.line(";Return")?;
        if let Some(value) = self.tree.left(id) {
            self.trav_expr(value)?;
            self.line("POP rax\nPOP rbx")?;
        }
        self.epilogue()?;
        self.line(";End")
    }

    /// Generates a call, which leaves the returned value on the stack if `as_value` is true.
    fn trav_call(&mut self, id: NodeId, as_value: bool) -> Result<(), CodegenError> {
        let tree: &Tree = self.tree;
        let pos: TextPos = tree.pos(id);
        let callee: NodeId = tree.left(id).ok_or(CodegenError::MissingChild { what: "a call", expected: "a function name", pos })?;
        let Some(name) = tree.value(callee).name() else {
            return Err(CodegenError::Malformed { what: tree.value(callee).to_string(), place: "as the name of a function", pos });
        };
        let func: &Function = self.functions.get(name).ok_or_else(|| CodegenError::UnknownFunction { name: name.to_string(), pos })?;

        let mut args: Vec<NodeId> = Vec::with_capacity(func.arity);
        for (link, arg) in tree.list_items(tree.left(callee)) {
            args.push(arg.ok_or(CodegenError::MissingChild { what: "an argument list", expected: "an argument", pos: tree.pos(link) })?);
        }
        if args.len() != func.arity {
            return Err(CodegenError::ArityMismatch { name: name.to_string(), expected: func.arity, given: args.len(), pos });
        }
        if as_value && func.returns == ReturnType::Void {
            return Err(CodegenError::VoidValue { name: name.to_string(), pos });
        }

        writeln!(self.out, ";Call {name}\n;Save frame bottom\nPUSH rdx")?;
        for arg in args.into_iter().rev() {
            self.trav_expr(arg)?;
        }
        writeln!(self.out, "CALL FUN_{name}\n;Restore frame bottom\nPOP rdx")?;
        if as_value {
            self.line("PUSH rbx\nPUSH rax")?;
        }
        self.line(";End")
    }

    /// Generates an `out`, which writes its items one by one.
    fn trav_out(&mut self, id: NodeId) -> Result<(), CodegenError> {
        let tree: &Tree = self.tree;
        self.line(";Out")?;
        for (link, item) in tree.list_items(tree.left(id)) {
            let item: NodeId = item.ok_or(CodegenError::MissingChild { what: "an out", expected: "an item", pos: tree.pos(link) })?;
            match tree.value(item) {
                Value::String(text) => self.trav_string(text, tree.pos(item))?,
                Value::Statement(Op::NewLine) => self.line("PUSH 10\nPOP [0]\nPUSH 0\nPOP [1]\nSHOW")?,
                _ => {
                    self.trav_expr(item)?;
                    self.line("OUT")?;
                },
            }
        }
        self.line(";End")
    }

    /// Writes a string to the video region and shows it.
    fn trav_string(&mut self, text: &str, pos: TextPos) -> Result<(), CodegenError> {
        let len: usize = text.chars().count();
        if len >= VIDEO_SIZE {
            return Err(CodegenError::StringTooLong { len, max: VIDEO_SIZE - 1, pos });
        }
        for (i, ch) in text.chars().enumerate() {
            writeln!(self.out, "PUSH {} ;'{}'\nPOP [{}]", ch as u32, ch.escape_debug(), VIDEO_START + i)?;
        }
        writeln!(self.out, "PUSH 0\nPOP [{}]\nSHOW", VIDEO_START + len)?;
        Ok(())
    }

    /// Generates an `in`, which reads every variable in order.
    fn trav_in(&mut self, id: NodeId) -> Result<(), CodegenError> {
        let tree: &Tree = self.tree;
        self.line(";In")?;
        for (link, item) in tree.list_items(tree.left(id)) {
            let item: NodeId = item.ok_or(CodegenError::MissingChild { what: "an in", expected: "a variable", pos: tree.pos(link) })?;
            let var: Variable = self.variable(item)?;
            if var.is_const {
                return Err(CodegenError::Malformed { what: format!("read into '{}'", var.name), place: "which is a val", pos: tree.pos(item) });
            }
            self.line("IN")?;
            self.store(&var)?;
        }
        self.line(";End")
    }

    /// Generates an expression, which leaves its value on the stack.
    fn trav_expr(&mut self, id: NodeId) -> Result<(), CodegenError> {
        let tree: &Tree = self.tree;
        let pos: TextPos = tree.pos(id);
        let op: Op = match tree.value(id) {
            Value::Number(value) => {
                let (int, fract): (i64, i64) = value_cells(*value);
                writeln!(self.out, "PUSH {fract}\nPUSH {int}")?;
                return Ok(());
            },
            Value::Name(_) => {
                let var: Variable = self.variable(id)?;
                return self.load(&var);
            },
            Value::String(_) => return Err(CodegenError::Malformed { what: "string".into(), place: "in an expression", pos }),
            Value::Statement(op) => *op,
        };
        let operand = || tree.left(id).ok_or(CodegenError::MissingChild { what: op.tag(), expected: "an operand", pos });

        use Op::*;
        match op {
            // Unary plus and minus compute 0 ± x
            Add | Sub if tree.right(id).is_none() => {
                self.trav_expr(operand()?)?;
                writeln!(self.out, "PUSH 0\nPUSH 0\n{}", if op == Add { "ADD" } else { "SUB" })?;
                Ok(())
            },
            Add | Sub | Mul | Div | Pow | Equal | NotEqual | Less | Greater | LessEq | GreaterEq | And | Or => {
                let rhs: NodeId = tree.right(id).ok_or(CodegenError::MissingChild { what: op.tag(), expected: "two operands", pos })?;
                self.trav_expr(rhs)?;
                self.trav_expr(operand()?)?;
                self.line(mnemonic(op).unwrap_or_default())
            },
            Sin | Cos | Sqrt => {
                self.trav_expr(operand()?)?;
                self.line(mnemonic(op).unwrap_or_default())
            },
            // The VM has no tangent, so we compute sin(u) / cos(u)
            Tan => {
                let u: NodeId = operand()?;
                self.trav_expr(u)?;
                self.line("COS")?;
                self.trav_expr(u)?;
                self.line("SIN\nDIV")
            },
            // Drops the fraction by overwriting its cell with zero
            Int => {
                self.trav_expr(operand()?)?;
                self.real_calc(false)?;
                self.line("SWAP\nPOP [0]\nPUSH 0\nSWAP")?;
                self.real_calc(true)
            },
            Call => self.trav_call(id, true),
            Assign => self.trav_assign(id, true),
            Diff => Err(CodegenError::UnsimplifiedDiff { pos }),

            op => Err(CodegenError::Malformed { what: format!("'{}'", op.tag()), place: "in an expression", pos }),
        }
    }
}





/***** LIBRARY *****/
/// Generates the assembly of the given program.
///
/// # Arguments
/// - `program`: The [`Program`] to generate. It must be simplified, as `diff` cannot be generated.
/// - `ctx`: The [`CodegenContext`] that numbers the labels. Reuse it to give every file generated with it distinct labels.
///
/// # Returns
/// The assembly, as text.
///
/// # Errors
/// This function errors if the program is inconsistent, e.g., uses a variable that is not in scope. This never happens for programs fresh from the parser, but may for programs read from the exchange format.
pub fn generate(program: &Program, ctx: &mut CodegenContext) -> Result<String, CodegenError> {
    if program.functions.get_str(MAIN_NAME).is_none() {
        return Err(CodegenError::MissingMain);
    }

    let mut generator: Generator = Generator::new(program, ctx);
    generator.preamble()?;
    for func in program.functions.iter() {
        generator.function(func)?;
    }

    debug!("Generated {} lines of assembly for {} functions", generator.out.lines().count(), program.functions.len());
    Ok(generator.out)
}





/***** TESTS *****/
#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use kite_dsl::compile;
    use kite_shr::utilities::test_on_kite_files;

    use super::*;

    /// Compiles, simplifies and generates the given source with a fresh context.
    fn assemble(source: &str) -> String {
        let mut program: Program = compile(source).unwrap_or_else(|err| panic!("Failed to compile '{source}': {err}"));
        kite_opt::simplify(&mut program).unwrap_or_else(|err| panic!("Failed to simplify '{source}': {err}"));
        generate(&program, &mut CodegenContext::new()).unwrap_or_else(|err| panic!("Failed to generate '{source}': {err}"))
    }

    /// Returns the lines of the first section starting with the given header, up to and including its `;End`.
    fn section<'a>(asm: &'a str, header: &str) -> Vec<&'a str> {
        let mut lines = asm.lines().skip_while(|l| *l != header);
        let mut res: Vec<&str> = vec![];
        for line in lines.by_ref() {
            res.push(line);
            if line == ";End" {
                break;
            }
        }
        res
    }

    #[test]
    fn test_folded_declaration() {
        let asm: String = assemble("fun main(): Void { var x = 2 + 3 * 4; }");
        assert_eq!(section(&asm, ";Var x"), vec![";Var x", "PUSH 0", "PUSH 14", "POP [257+rdx]", "POP [258+rdx]", ";End"]);
    }

    #[test]
    fn test_value_cells() {
        assert_eq!(value_cells(14.0), (14, 0));
        assert_eq!(value_cells(2.5), (2, 5000));
        assert_eq!(value_cells(-2.5), (-2, -5000));
    }

    #[test]
    fn test_preamble() {
        let asm: String = assemble("var g = 1;\nfun main(): Void { g = g + 1; }");
        assert!(asm.starts_with(";Turn on real-calc\nPUSH 1\nPOP rex\n;Reset stack pointers\nPUSH 0\nPOP rcx\nPUSH 0\nPOP rdx\nPUSH 0\nPOP rfx\n;End\n"), "{asm}");
        assert_eq!(section(&asm, ";Var g"), vec![";Var g", "PUSH 0", "PUSH 1", "POP [128]", "POP [129]", ";End"]);
        assert!(asm.find("CALL FUN_main\nHLT").unwrap() < asm.find("FUN_main:").unwrap(), "{asm}");

        // Right operand first, then the global itself
        assert_eq!(section(&asm, ";Assign g"), vec![
            ";Assign g",
            "PUSH 0",
            "PUSH 1",
            "PUSH [129]",
            "PUSH [128]",
            "ADD",
            "POP [128]",
            "POP [129]",
            ";End"
        ]);
    }

    #[test]
    fn test_function_frame() {
        let asm: String = assemble("fun f(a: Double): Double { return a; }\nfun main(): Void { out << f(5); }");
        assert!(asm.contains("FUN_f:\n;Save return address\nPOP [256+rcx]\n;Get parameter a\nPOP [257+rcx]\nPOP [258+rcx]\n"), "{asm}");
        assert!(asm.contains(";Reserve frame\nPUSH 3\nPUSH rcx\nADD\nPOP rcx\n"), "{asm}");
        assert!(asm.contains(";Return\nPUSH [258+rdx]\nPUSH [257+rdx]\nPOP rax\nPOP rbx\n;Restore stack pointer\nPUSH rdx\nPOP rcx\n"), "{asm}");
        assert_eq!(section(&asm, ";Call f"), vec![
            ";Call f",
            ";Save frame bottom",
            "PUSH rdx",
            "PUSH 0",
            "PUSH 5",
            "CALL FUN_f",
            ";Restore frame bottom",
            "POP rdx",
            "PUSH rbx",
            "PUSH rax",
            ";End"
        ]);
    }

    #[test]
    fn test_call_statement_drops_value() {
        let asm: String = assemble("fun f(): Double { return 1; }\nfun main(): Void { f(); }");
        assert_eq!(section(&asm, ";Call f"), vec![";Call f", ";Save frame bottom", "PUSH rdx", "CALL FUN_f", ";Restore frame bottom", "POP rdx", ";End"]);
    }

    #[test]
    fn test_labels() {
        let source: &str = "var x = 0;\nfun main(): Void { if (x) x = 1; else x = 2; while (x < 3) x = x + 1; }";
        let asm: String = assemble(source);
        for label in ["ELSE_000000:", "END_IF_000000:", "WHILE_000000:", "END_WHILE_000000:", "JE ELSE_000000", "JE END_WHILE_000000"] {
            assert!(asm.contains(label), "Missing '{label}' in:\n{asm}");
        }

        // A shared context continues numbering
        let program: Program = compile(source).unwrap();
        let mut ctx: CodegenContext = CodegenContext::new();
        generate(&program, &mut ctx).unwrap();
        let second: String = generate(&program, &mut ctx).unwrap();
        assert!(second.contains("ELSE_000001:") && !second.contains("ELSE_000000:"), "{second}");
    }

    #[test]
    fn test_out() {
        let asm: String = assemble("fun main(): Void { out << \"hi\" << endl; }");
        assert_eq!(section(&asm, ";Out"), vec![
            ";Out",
            "PUSH 104 ;'h'",
            "POP [0]",
            "PUSH 105 ;'i'",
            "POP [1]",
            "PUSH 0",
            "POP [2]",
            "SHOW",
            "PUSH 10",
            "POP [0]",
            "PUSH 0",
            "POP [1]",
            "SHOW",
            ";End"
        ]);

        let long: String = "a".repeat(VIDEO_SIZE);
        let program: Program = compile(&format!("fun main(): Void {{ out << \"{long}\"; }}")).unwrap();
        assert!(matches!(generate(&program, &mut CodegenContext::new()), Err(CodegenError::StringTooLong { len: 128, .. })));
    }

    #[test]
    fn test_shadowing() {
        let asm: String = assemble("var x = 1;\nfun main(): Void { var x = x; { var x = 3; out << x; } out << x; }");
        // The local initializer reads the global, then both outs read their own local
        let main: &str = &asm[asm.find("FUN_main:").unwrap()..];
        assert_eq!(section(main, ";Var x").get(1..3), Some(&["PUSH [129]", "PUSH [128]"][..]));
        let outs: Vec<&str> = asm.lines().filter(|l| l.starts_with("PUSH [") && l.ends_with("+rdx]")).collect();
        assert_eq!(outs, vec!["PUSH [260+rdx]", "PUSH [259+rdx]", "PUSH [258+rdx]", "PUSH [257+rdx]"]);
    }

    #[test]
    fn test_inconsistent_trees() {
        let program: Program = compile("var x = 1;\nfun main(): Void { out << diff(x); }").unwrap();
        assert!(matches!(generate(&program, &mut CodegenContext::new()), Err(CodegenError::UnsimplifiedDiff { .. })));

        // Rename the variable to something not in scope
        let mut program: Program = compile("var x = 1;\nfun main(): Void { out << x; }").unwrap();
        let body: NodeId = program.tree.right(program.functions.get_str("main").unwrap().node).unwrap();
        let item: NodeId = program.tree.left(program.tree.left(program.tree.left(body).unwrap()).unwrap()).unwrap();
        program.tree.set_value(item, Value::Name(Rc::from("y")));
        assert!(matches!(generate(&program, &mut CodegenContext::new()), Err(CodegenError::UnknownVariable { .. })));

        assert!(matches!(generate(&Program::default(), &mut CodegenContext::new()), Err(CodegenError::MissingMain)));
    }

    #[test]
    fn test_generate_kite_files() {
        test_on_kite_files(|path: PathBuf, raw: String| {
            let mut program: Program = compile(&raw).unwrap_or_else(|err| panic!("Failed to compile '{}': {err}", path.display()));
            kite_opt::simplify(&mut program).unwrap_or_else(|err| panic!("Failed to simplify '{}': {err}", path.display()));
            let asm: String = generate(&program, &mut CodegenContext::new()).unwrap_or_else(|err| panic!("Failed to generate '{}': {err}", path.display()));
            assert_eq!(asm.matches("\nFUN_main:\n").count(), 1, "{}", path.display());
            assert_eq!(asm.matches("FUN_").count() - asm.matches("CALL FUN_").count(), program.functions.len(), "{}", path.display());
        });
    }
}
