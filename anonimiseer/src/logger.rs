// anonimiseer/src/logger.rs
//! Logger initialization for the anonimiseer CLI.
//!
//! License: MIT OR APACHE 2.0

use log::LevelFilter;

/// Initializes `env_logger`, honoring `RUST_LOG` unless an explicit level is
/// given. Safe to call more than once; later calls are no-ops.
pub fn init_logger(level: Option<LevelFilter>) {
    let mut builder = env_logger::Builder::from_default_env();
    if let Some(level) = level {
        builder.filter_level(level);
    }
    builder.format_timestamp(None);
    let _ = builder.try_init();
}
