use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::feed::EntityId;

/// Source of the local player's entity id.
pub trait IdentityProvider: Send + Sync {
    fn local_player_id(&self) -> Option<EntityId>;

    /// Accept an identity reported by the event feed. Returns false when the
    /// provider is fixed and keeps its own id.
    fn update(&self, _player_id: Option<EntityId>) -> bool {
        false
    }
}

/// Fixed identity.
impl IdentityProvider for Option<EntityId> {
    fn local_player_id(&self) -> Option<EntityId> {
        *self
    }
}

/// Identity the host updates as the player logs in or switches characters.
/// Entity id 0 is never assigned by the server and stands for "unknown".
#[derive(Debug, Clone, Default)]
pub struct SharedIdentity(Arc<AtomicU32>);

impl SharedIdentity {
    pub fn new(player_id: Option<EntityId>) -> Self {
        let identity = Self::default();
        identity.set(player_id);
        identity
    }

    pub fn set(&self, player_id: Option<EntityId>) {
        self.0.store(player_id.unwrap_or(0), Ordering::SeqCst);
    }
}

impl IdentityProvider for SharedIdentity {
    fn local_player_id(&self) -> Option<EntityId> {
        match self.0.load(Ordering::SeqCst) {
            0 => None,
            id => Some(id),
        }
    }

    fn update(&self, player_id: Option<EntityId>) -> bool {
        self.set(player_id);
        true
    }
}
