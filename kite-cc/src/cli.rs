//  CLI.rs
//    by Kite developers
//
//  Created:
//    19 Oct 2026, 22:15:38
//  Last edited:
//    19 Oct 2026, 22:40:51
//  Auto updated?
//    Yes
//
//  Description:
//!   Defines the command-line interface of `kitec`.
//

use clap::{Args, Parser, Subcommand};
use enum_debug::EnumDebug;
use kite_shr::cli::Tracing;

use crate::spec::{Input, Output};


/***** ARGUMENTS *****/
#[derive(Debug, Parser)]
#[clap(name = "kitec", version, about = "Compiles Kite programs to assembly for the Kite stack VM, one stage at a time or all at once.")]
pub(crate) struct Cli {
    #[clap(flatten)]
    pub(crate) logging    : Tracing,
    #[clap(subcommand)]
    pub(crate) subcommand : KitecSubcommand,
}

/// Options for stages that write the exchange format.
#[derive(Args, Clone, Debug, Default)]
pub(crate) struct ExchangeOpts {
    /// Leaves out the `$kite::...$` annotations.
    #[clap(long, help = "If given, does not write '$kite::...$' annotations in the tree.", env = "KITEC_NO_ANNOTATE")]
    pub(crate) no_annotate : bool,
}

/// The stages that `kitec` can run.
#[derive(Debug, EnumDebug, Subcommand)]
pub(crate) enum KitecSubcommand {
    #[clap(name = "front", about = "Parses Kite source text to a tree in the exchange format.")]
    Front {
        #[clap(name = "INPUT", default_value = "-", help = "The Kite source file to parse. Use '-' to read from stdin.")]
        input    : Input,
        #[clap(short, long, default_value = "-", help = "The file to write the tree to. Use '-' to write to stdout.", env = "KITEC_OUTPUT")]
        output   : Output,
        #[clap(flatten)]
        exchange : ExchangeOpts,
    },

    #[clap(name = "middle", about = "Simplifies a tree in the exchange format, folding constants and computing derivatives.")]
    Middle {
        #[clap(name = "INPUT", default_value = "-", help = "The tree to simplify. Use '-' to read from stdin.")]
        input    : Input,
        #[clap(short, long, default_value = "-", help = "The file to write the simplified tree to. Use '-' to write to stdout.", env = "KITEC_OUTPUT")]
        output   : Output,
        #[clap(flatten)]
        exchange : ExchangeOpts,
    },

    #[clap(name = "back", about = "Generates assembly from a simplified tree in the exchange format.")]
    Back {
        #[clap(name = "INPUT", default_value = "-", help = "The tree to generate. Use '-' to read from stdin.")]
        input  : Input,
        #[clap(short, long, default_value = "-", help = "The file to write the assembly to. Use '-' to write to stdout.", env = "KITEC_OUTPUT")]
        output : Output,
    },

    #[clap(name = "reverse", about = "Prints a tree in the exchange format back to Kite source text.")]
    Reverse {
        #[clap(name = "INPUT", default_value = "-", help = "The tree to print. Use '-' to read from stdin.")]
        input  : Input,
        #[clap(short, long, default_value = "-", help = "The file to write the source text to. Use '-' to write to stdout.", env = "KITEC_OUTPUT")]
        output : Output,
    },

    #[clap(name = "build", about = "Compiles Kite source text to assembly in one go.")]
    Build {
        #[clap(name = "INPUT", default_value = "-", help = "The Kite source file to compile. Use '-' to read from stdin.")]
        input       : Input,
        #[clap(short, long, default_value = "-", help = "The file to write the assembly to. Use '-' to write to stdout.", env = "KITEC_OUTPUT")]
        output      : Output,
        #[clap(long, help = "If given, also writes the tree as parsed (before simplifying) to the given file.", env = "KITEC_TREE")]
        tree        : Option<Output>,
        #[clap(long, help = "If given, does not simplify the tree. Fails if the program uses 'diff'.", env = "KITEC_NO_SIMPLIFY")]
        no_simplify : bool,
        #[clap(flatten)]
        exchange    : ExchangeOpts,
    },
}
