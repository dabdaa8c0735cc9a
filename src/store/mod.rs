// ============================================================================
// Store Module
// Chart store implementations
// ============================================================================

mod memory;

pub use memory::InMemoryChartStore;
