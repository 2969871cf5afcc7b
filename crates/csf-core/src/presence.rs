use std::sync::Arc;

use crate::{
    domain::{PresenceAction, PresenceEvent},
    ports::KeyValueStore,
    Result,
};

/// Keeps the persisted destination set consistent with the presence
/// transitions observed for each participant.
///
/// `join` and `leave` clear a participant's unreachable-marker (a join means
/// the participant is reachable again; an explicit leave means no further SMS
/// should go to them). `timeout` appends unconditionally — repeated timeouts
/// without an intervening join/leave produce duplicate entries, and later
/// duplicate SMS sends. That is inherited behavior; tests pin it down.
pub struct DestinationSetManager {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl DestinationSetManager {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Apply one presence transition to the persisted set.
    ///
    /// Read-modify-write over the store port: the current value is read
    /// (absent reads as empty), mutated, and written back unconditionally —
    /// including for unrecognized actions, which round-trip the set unchanged.
    pub async fn apply(&self, event: &PresenceEvent) -> Result<()> {
        let mut destinations = self.store.get(&self.key).await?.unwrap_or_default();

        match event.action {
            PresenceAction::Join | PresenceAction::Leave => {
                if let Some(at) = destinations.iter().position(|d| d == event.uuid.as_str()) {
                    destinations.remove(at);
                }
            }
            PresenceAction::Timeout => destinations.push(event.uuid.as_str().to_string()),
            PresenceAction::Other => {}
        }

        tracing::debug!(key = %self.key, destinations = ?destinations, "presence update applied");
        self.store.set(&self.key, destinations).await
    }
}
