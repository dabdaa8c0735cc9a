// ============================================================================
// Utilities Module
// Concurrency and logging helpers
// ============================================================================

mod keyed_lock;
#[cfg(feature = "logging")]
mod logging;

pub use keyed_lock::KeyedLocks;
#[cfg(feature = "logging")]
pub use logging::init_tracing;
