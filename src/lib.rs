pub mod config;
pub mod core;
pub mod sync;

use std::sync::atomic::{AtomicBool, Ordering};

/// Mirrors `AppConfig::debug_logging`. The journal filter in the binary reads it
/// to let `smart_todo` debug records through.
static DEBUG_LOGGING: AtomicBool = AtomicBool::new(false);

pub fn set_debug_logging(enabled: bool) {
    DEBUG_LOGGING.store(enabled, Ordering::Relaxed);
}

pub fn debug_logging() -> bool {
    DEBUG_LOGGING.load(Ordering::Relaxed)
}
