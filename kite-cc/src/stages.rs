//  STAGES.rs
//    by Kite developers
//
//  Created:
//    19 Oct 2026, 22:23:17
//  Last edited:
//    19 Oct 2026, 22:58:12
//  Auto updated?
//    Yes
//
//  Description:
//!   Implements the stages that `kitec` runs. Each stage reads its whole
//!   input, and only writes its output once it has fully succeeded.
//

use kite_ast::exchange::{deserialize, serialize};
use kite_ast::program::Program;
use kite_gen::CodegenContext;
use tracing::{debug, info};

use crate::cli::KitecSubcommand;
use crate::errors::StageError;


/***** LIBRARY *****/
/// Parses source text to a tree in the exchange format.
///
/// # Arguments
/// - `what`: A name for the input, used in errors.
/// - `raw`: The source text.
/// - `annotate`: Whether to write `$kite::...$` annotations.
///
/// # Errors
/// This function errors if the source is not a valid Kite program.
pub fn front(what: &str, raw: &str, annotate: bool) -> Result<String, StageError> {
    let program: Program = compile(what, raw)?;
    Ok(serialize(&program, annotate))
}

/// Simplifies a tree in the exchange format.
///
/// # Errors
/// This function errors if the input is not a valid tree, or if it differentiates something we cannot differentiate.
pub fn middle(what: &str, raw: &str, annotate: bool) -> Result<String, StageError> {
    let mut program: Program = load(what, raw)?;
    kite_opt::simplify(&mut program).map_err(|source| StageError::Simplify { what: what.into(), raw: raw.into(), source })?;
    Ok(serialize(&program, annotate))
}

/// Generates assembly from a tree in the exchange format.
///
/// # Errors
/// This function errors if the input is not a valid tree, or if the tree is inconsistent (e.g., still has a `diff`).
pub fn back(what: &str, raw: &str) -> Result<String, StageError> {
    let program: Program = load(what, raw)?;
    kite_gen::generate(&program, &mut CodegenContext::new()).map_err(|source| StageError::Codegen { what: what.into(), raw: raw.into(), source })
}

/// Prints a tree in the exchange format as Kite source text.
///
/// # Errors
/// This function errors if the input is not a valid tree, or if it cannot be written as source text.
pub fn reverse(what: &str, raw: &str) -> Result<String, StageError> {
    let program: Program = load(what, raw)?;
    kite_gen::reverse(&program).map_err(|source| StageError::Codegen { what: what.into(), raw: raw.into(), source })
}

/// Compiles source text to assembly.
///
/// # Arguments
/// - `what`: A name for the input, used in errors.
/// - `raw`: The source text.
/// - `simplify`: Whether to simplify the tree before generating it.
/// - `annotate`: Whether to write `$kite::...$` annotations in the tree.
///
/// # Returns
/// The assembly, and the tree as parsed in the exchange format.
///
/// # Errors
/// This function errors if any of the stages fails.
pub fn build(what: &str, raw: &str, simplify: bool, annotate: bool) -> Result<(String, String), StageError> {
    let mut program: Program = compile(what, raw)?;
    let tree: String = serialize(&program, annotate);
    if simplify {
        kite_opt::simplify(&mut program).map_err(|source| StageError::Simplify { what: what.into(), raw: raw.into(), source })?;
    }
    let asm: String = kite_gen::generate(&program, &mut CodegenContext::new()).map_err(|source| StageError::Codegen { what: what.into(), raw: raw.into(), source })?;
    Ok((asm, tree))
}



/// Runs the stage selected on the command line.
///
/// # Errors
/// This function errors if the input cannot be read, the stage fails or the output cannot be written. Nothing is written in the first two cases.
pub(crate) fn run(subcommand: KitecSubcommand) -> Result<(), StageError> {
    use KitecSubcommand::*;
    match subcommand {
        Front { input, output, exchange } => {
            info!("Parsing {input}...");
            output.write(&front(&input.to_string(), &input.read()?, !exchange.no_annotate)?)
        },
        Middle { input, output, exchange } => {
            info!("Simplifying {input}...");
            output.write(&middle(&input.to_string(), &input.read()?, !exchange.no_annotate)?)
        },
        Back { input, output } => {
            info!("Generating assembly for {input}...");
            output.write(&back(&input.to_string(), &input.read()?)?)
        },
        Reverse { input, output } => {
            info!("Printing {input} as source...");
            output.write(&reverse(&input.to_string(), &input.read()?)?)
        },
        Build { input, output, tree, no_simplify, exchange } => {
            info!("Compiling {input}...");
            let (asm, text): (String, String) = build(&input.to_string(), &input.read()?, !no_simplify, !exchange.no_annotate)?;
            if let Some(tree) = tree {
                tree.write(&text)?;
            }
            output.write(&asm)
        },
    }
}





/***** HELPER FUNCTIONS *****/
/// Runs the front end on the given source text.
fn compile(what: &str, raw: &str) -> Result<Program, StageError> {
    let program: Program = kite_dsl::compile(raw).map_err(|source| StageError::Compile { what: what.into(), raw: raw.into(), source })?;
    debug!("Parsed {} to {} nodes, {} globals and {} functions", what, program.tree.count_reachable(), program.globals.len(), program.functions.len());
    Ok(program)
}

/// Reads a program from the exchange format.
fn load(what: &str, raw: &str) -> Result<Program, StageError> {
    let program: Program = deserialize(raw).map_err(|source| StageError::Exchange { what: what.into(), raw: raw.into(), source })?;
    debug!("Loaded {} nodes, {} globals and {} functions from {}", program.tree.count_reachable(), program.globals.len(), program.functions.len(), what);
    Ok(program)
}





/***** TESTS *****/
#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::{Path, PathBuf};

    use kite_shr::utilities::{FAIL_TESTS_DIR, test_on_kite_files, test_on_kite_files_in};
    use tempfile::TempDir;

    use super::*;
    use crate::cli::ExchangeOpts;
    use crate::spec::{Input, Output};

    fn file(dir: &Path, name: &str) -> PathBuf { dir.join(name) }

    #[test]
    fn test_stages_match_build() {
        test_on_kite_files(|path: PathBuf, raw: String| {
            let what: String = path.display().to_string();
            let (asm, tree): (String, String) = build(&what, &raw, true, true).unwrap_or_else(|err| panic!("{}", err.display_pretty().unwrap_or(err.to_string())));

            // The same, but one stage at a time and without annotations in between
            let front_tree: String = front(&what, &raw, true).unwrap();
            assert_eq!(front_tree, tree);
            let simplified: String = middle(&what, &front(&what, &raw, false).unwrap(), false).unwrap();
            assert_eq!(back(&what, &simplified).unwrap(), asm, "Staged assembly of '{what}' differs");

            // Reversing parses again
            let source: String = reverse(&what, &front_tree).unwrap();
            assert!(kite_dsl::compile(&source).is_ok(), "Reversed '{what}' does not parse:\n{source}");
        });
    }

    #[test]
    fn test_run_on_files() {
        let dir: TempDir = tempfile::tempdir().unwrap();
        let (src, tree, asm): (PathBuf, PathBuf, PathBuf) = (file(dir.path(), "main.kite"), file(dir.path(), "main.tree"), file(dir.path(), "main.asm"));
        fs::write(&src, "var x = 2;\nfun main(): Void { out << diff(x * x) << endl; }\n").unwrap();

        run(KitecSubcommand::Build {
            input:       Input::File(src.clone()),
            output:      Output::File(asm.clone()),
            tree:        Some(Output::File(tree.clone())),
            no_simplify: false,
            exchange:    ExchangeOpts::default(),
        })
        .unwrap();
        assert!(fs::read_to_string(&asm).unwrap().contains("CALL FUN_main"));
        assert!(fs::read_to_string(&tree).unwrap().contains("DIFF"));

        // Without simplifying, the diff reaches the generator
        let err: StageError = run(KitecSubcommand::Build {
            input:       Input::File(src),
            output:      Output::File(file(dir.path(), "raw.asm")),
            tree:        None,
            no_simplify: true,
            exchange:    ExchangeOpts::default(),
        })
        .unwrap_err();
        assert!(matches!(err, StageError::Codegen { source: kite_gen::Error::UnsimplifiedDiff { .. }, .. }), "{err}");
        assert!(!file(dir.path(), "raw.asm").exists());
    }

    #[test]
    fn test_failures_write_nothing() {
        let dir: TempDir = tempfile::tempdir().unwrap();
        test_on_kite_files_in(FAIL_TESTS_DIR, |path: PathBuf, _| {
            let out: PathBuf = file(dir.path(), "out.asm");
            let err: StageError =
                run(KitecSubcommand::Build { input: Input::File(path.clone()), output: Output::File(out.clone()), tree: None, no_simplify: false, exchange: ExchangeOpts::default() })
                    .expect_err(&format!("'{}' compiled", path.display()));
            assert!(!out.exists(), "'{}' wrote output", path.display());

            // Errors in source text come with the line they concern
            if let StageError::Compile { .. } = err {
                let pretty: String = err.display_pretty().unwrap();
                assert!(pretty.contains("error"), "{pretty}");
            }
        });

        let err: StageError = run(KitecSubcommand::Back { input: Input::File(file(dir.path(), "missing.tree")), output: Output::Stdout }).unwrap_err();
        assert!(matches!(err, StageError::InputRead { .. }));
    }

    #[test]
    fn test_exchange_errors() {
        let err: StageError = back("bad.tree", "{ ST { FUNC NIL } ").unwrap_err();
        assert!(matches!(err, StageError::Exchange { .. }), "{err}");
        assert!(err.display_pretty().unwrap().contains("bad.tree:"));
    }

    #[test]
    fn test_dash_is_standard_stream() {
        assert_eq!("-".parse::<Input>(), Ok(Input::Stdin));
        assert_eq!("a.kite".parse::<Input>(), Ok(Input::File("a.kite".into())));
        assert_eq!("-".parse::<Output>(), Ok(Output::Stdout));
    }
}
