//  TRACING.rs
//    by Kite developers
//
//  Created:
//    19 Oct 2026, 22:02:30
//  Last edited:
//    19 Oct 2026, 22:02:58
//  Auto updated?
//    Yes
//
//  Description:
//!   Sets up the global `tracing` subscriber.
//

use tracing::debug;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;


/***** LIBRARY *****/
/// Installs a subscriber that writes to stderr.
///
/// # Arguments
/// - `env_var`: The environment variable that may hold filter directives (e.g., `kite_dsl=trace`). Overrides `default_level` where it is set.
/// - `default_level`: The level to log at where `env_var` says nothing.
pub fn setup_subscriber(env_var: &str, default_level: LevelFilter) {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::builder().with_env_var(env_var).with_default_directive(default_level.into()).from_env_lossy())
        .init();

    debug!("Logging at level {} ({} may override it)", default_level, env_var);
}
