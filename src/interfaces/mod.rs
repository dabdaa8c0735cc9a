// ============================================================================
// Interfaces Module
// Contains all trait definitions and contracts
// ============================================================================

mod actor_directory;
mod chart_store;
mod control_rule;
mod event_handler;

pub use actor_directory::{ActorDirectory, NoActorDirectory};
pub use chart_store::ChartStore;
pub use control_rule::ControlRule;
pub use event_handler::{
    EventHandler, LoggingEventHandler, NoOpEventHandler, QcEvent, RecordingEventHandler,
};
