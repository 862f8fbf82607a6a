//! Logging setup for the declaration checker
//!
//! Thin wrappers over `env_logger` so binaries, benches and tests all
//! initialize logging the same way.
//!
//! # Log Levels
//!
//! - `error!` - internal inconsistencies that should never happen
//! - `warn!` - recoverable oddities in the input graph
//! - `info!` - phases (loading, checking a module, synthesizing members)
//! - `debug!` - per declaration (validated, override recorded, init synthesized)
//! - `trace!` - type resolution, member lookup and cycle walks
//!
//! # Environment Variable
//!
//! ```bash
//! RUST_LOG=info declcheck check app.json
//! RUST_LOG=sema::check::overrides=debug declcheck check app.json
//! ```

use env_logger::Builder;
use log::LevelFilter;
use std::io::Write;
use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize logging at Warn level. Subsequent calls are no-ops.
pub fn init() {
    init_with_level(LevelFilter::Warn);
}

/// Initialize logging with a specific level. Subsequent calls are no-ops.
pub fn init_with_level(level: LevelFilter) {
    INIT.call_once(|| {
        Builder::new()
            .filter_level(level)
            .format(|buf, record| {
                writeln!(
                    buf,
                    "[{:5}] {} - {}",
                    record.level(),
                    record.module_path().unwrap_or("sema"),
                    record.args()
                )
            })
            .init();
    });
}

/// Initialize logging from `RUST_LOG`, defaulting to Warn.
pub fn init_from_env() {
    INIT.call_once(|| {
        Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    });
}

/// Initialize logging for tests; safe to call from every test.
pub fn init_test() {
    let _ = env_logger::builder()
        .filter_level(LevelFilter::Warn)
        .is_test(true)
        .try_init();
}

pub fn is_initialized() -> bool {
    INIT.is_completed()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_test_is_idempotent() {
        init_test();
        init_test();
        log::debug!("still fine after repeated init");
    }
}
