//! Tracing setup for hosts embedding the humanizer

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_DIRECTIVES: [&str; 2] = ["humanizer_core=debug", "humanizer_host=debug"];

/// Install a fmt subscriber filtered by `RUST_LOG` plus the humanizer
/// crates at debug. Returns `false` if a global subscriber already exists.
pub fn init() -> bool {
    let filter = DEFAULT_DIRECTIVES
        .iter()
        .filter_map(|directive| directive.parse().ok())
        .fold(EnvFilter::from_default_env(), EnvFilter::add_directive);

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .try_init()
        .is_ok()
}
