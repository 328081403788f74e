//  CLI.rs
//    by Kite developers
//
//  Created:
//    19 Oct 2026, 22:03:41
//  Last edited:
//    19 Oct 2026, 22:08:15
//  Auto updated?
//    Yes
//
//  Description:
//!   Defines command-line arguments that every Kite binary shares.
//

use clap::Args;
use tracing::Level;
use tracing::level_filters::LevelFilter;


/***** LIBRARY *****/
/// Arguments that choose how much is logged.
#[derive(Args, Debug, Default)]
pub struct Tracing {
    /// Logs at the `debug` level.
    #[clap(long, global = true, help = "If given, logs what every stage of the compiler does.", group = "verbosity", env = "KITEC_DEBUG")]
    pub debug   : bool,
    /// Logs at the `trace` level.
    #[clap(long, global = true, help = "If given, logs everything there is to log.", group = "verbosity", env = "KITEC_TRACE")]
    pub trace   : bool,
    /// Raises the level by one step per occurrence.
    #[clap(short, long, global = true, help = "Raises the log level by one step. Repeat to raise it further.", action = clap::ArgAction::Count, group = "verbosity")]
    pub verbose : u8,
    /// Lowers the level by one step per occurrence.
    #[clap(short, long, global = true, help = "Lowers the log level by one step. Repeat to lower it further.", action = clap::ArgAction::Count, group = "verbosity")]
    pub quiet   : u8,
}

impl Tracing {
    /// Computes the level to log at.
    ///
    /// # Arguments
    /// - `default_level`: The level when no flags are given.
    pub fn log_level(&self, default_level: LevelFilter) -> LevelFilter {
        if self.trace {
            return LevelFilter::TRACE;
        } else if self.debug {
            return LevelFilter::DEBUG;
        }

        // Count OFF as 0 and TRACE as 5, then step through them
        let step: i16 = match default_level.into_level() {
            Some(Level::TRACE) => 5,
            Some(Level::DEBUG) => 4,
            Some(Level::INFO) => 3,
            Some(Level::WARN) => 2,
            Some(Level::ERROR) => 1,
            None => 0,
        };
        match step.saturating_add(self.verbose.into()).saturating_sub(self.quiet.into()) {
            ..=0 => LevelFilter::OFF,
            1 => LevelFilter::ERROR,
            2 => LevelFilter::WARN,
            3 => LevelFilter::INFO,
            4 => LevelFilter::DEBUG,
            5.. => LevelFilter::TRACE,
        }
    }
}



/***** TESTS *****/
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level() {
        let flags = |debug: bool, trace: bool, verbose: u8, quiet: u8| Tracing { debug, trace, verbose, quiet };
        assert_eq!(flags(false, false, 0, 0).log_level(LevelFilter::WARN), LevelFilter::WARN);
        assert_eq!(flags(false, false, 1, 0).log_level(LevelFilter::WARN), LevelFilter::INFO);
        assert_eq!(flags(false, false, 9, 0).log_level(LevelFilter::WARN), LevelFilter::TRACE);
        assert_eq!(flags(false, false, 0, 2).log_level(LevelFilter::WARN), LevelFilter::OFF);
        assert_eq!(flags(true, false, 0, 3).log_level(LevelFilter::WARN), LevelFilter::DEBUG);
        assert_eq!(flags(true, true, 0, 0).log_level(LevelFilter::OFF), LevelFilter::TRACE);
    }
}
