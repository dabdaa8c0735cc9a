// ============================================================================
// Actor Directory Interface
// Display names for the people and systems behind measurements
// ============================================================================

use std::collections::HashMap;

use crate::domain::ActorId;

/// Resolves actor ids to display names for reports.
///
/// Only used for presentation; an unknown actor simply has no name.
pub trait ActorDirectory: Send + Sync {
    fn display_name(&self, actor: ActorId) -> Option<String>;
}

/// Directory that knows nobody.
pub struct NoActorDirectory;

impl ActorDirectory for NoActorDirectory {
    fn display_name(&self, _actor: ActorId) -> Option<String> {
        None
    }
}

impl ActorDirectory for HashMap<ActorId, String> {
    fn display_name(&self, actor: ActorId) -> Option<String> {
        self.get(&actor).cloned()
    }
}
