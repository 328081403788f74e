//  MAIN.rs
//    by Kite developers
//
//  Created:
//    19 Oct 2026, 22:12:04
//  Last edited:
//    19 Oct 2026, 22:47:36
//  Auto updated?
//    Yes
//
//  Description:
//!   Entrypoint to `kitec`, the Kite compiler.
//

// Declare modules
mod cli;
mod errors;
mod spec;
mod stages;

use clap::Parser;
use dotenvy::dotenv;
use enum_debug::EnumDebug as _;
use error_trace::trace;
use kite_shr::tracing::setup_subscriber;
use tracing::level_filters::LevelFilter;
use tracing::{debug, error, info};


/***** CONSTANTS *****/
/// The log level when no verbosity flags are given.
const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::WARN;
/// The environment variable with filter directives for the logger.
const LOG_LEVEL_ENV_VAR: &str = "KITEC_LOG";





/***** ENTRYPOINT *****/
fn main() {
    dotenv().ok();
    human_panic::setup_panic!();
    let args = cli::Cli::parse();

    setup_subscriber(LOG_LEVEL_ENV_VAR, args.logging.log_level(DEFAULT_LOG_LEVEL));
    info!("{} - v{}", env!("CARGO_BIN_NAME"), env!("CARGO_PKG_VERSION"));

    let stage: String = args.subcommand.variant().to_string().to_lowercase();
    debug!("Running stage '{stage}'");
    if let Err(err) = stages::run(args.subcommand) {
        if let Some(pretty) = err.display_pretty() {
            eprint!("{pretty}");
        }
        error!("{}", trace!(("Stage '{}' failed", stage), err));
        std::process::exit(1);
    }
}
