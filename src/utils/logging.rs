// ============================================================================
// Logging Setup
// Optional tracing subscriber for binaries, demos and benchmarks
// ============================================================================

use tracing::Level;

/// Install a formatted stdout subscriber at `level`.
///
/// Libraries should not call this; it is for the host binary. Fails if a
/// global subscriber is already set.
pub fn init_tracing(level: Level) -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .try_init()
        .map_err(|e| e.to_string())
}
