//! Decoded packets consumed by the meter.
//!
//! Wire decoding happens in the host; these are the structured forms the
//! engine reads. All types deserialize from JSON so recorded feeds can be
//! replayed (see [`replay`]).

pub mod error;
pub mod replay;

use serde::{Deserialize, Serialize};

pub use error::FeedError;
pub use replay::{read_feed, read_feed_from};

/// Server-side entity identifier (players, monsters, placed effects).
pub type EntityId = u32;

/// Numeric skill identifier.
pub type SkillId = u32;

/// Which notification family carried a damage event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageKind {
    /// Auto-attack notifications
    #[default]
    Attack,
    /// Skill and positional skill notifications
    Skill,
}

/// Damage notification broadcast by the server.
///
/// Packet variants disagree on which field carries the attacker, so both the
/// primary and the alternate source id are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DamageEvent {
    #[serde(default)]
    pub kind: DamageKind,
    #[serde(default)]
    pub skill_id: Option<SkillId>,
    #[serde(default)]
    pub source_id: Option<EntityId>,
    #[serde(default)]
    pub alt_source_id: Option<EntityId>,
    #[serde(default)]
    pub target_id: Option<EntityId>,
    #[serde(default)]
    pub amount: Option<i64>,
    #[serde(default)]
    pub action: Option<u8>,
}

impl DamageEvent {
    pub fn attack(source_id: EntityId, amount: i64) -> Self {
        Self {
            kind: DamageKind::Attack,
            source_id: Some(source_id),
            amount: Some(amount),
            ..Default::default()
        }
    }

    pub fn skill(skill_id: SkillId, source_id: EntityId, amount: i64) -> Self {
        Self {
            kind: DamageKind::Skill,
            skill_id: Some(skill_id),
            source_id: Some(source_id),
            amount: Some(amount),
            ..Default::default()
        }
    }

    pub fn with_action(mut self, action: u8) -> Self {
        self.action = Some(action);
        self
    }

    pub fn with_target(mut self, target_id: EntityId) -> Self {
        self.target_id = Some(target_id);
        self
    }

    /// Attacker id, preferring the primary source field.
    /// A zero id means the field was present but unset.
    pub fn attacker_id(&self) -> Option<EntityId> {
        self.source_id
            .filter(|&id| id != 0)
            .or(self.alt_source_id.filter(|&id| id != 0))
    }

    /// Skill id, treating zero as absent.
    pub fn skill_id(&self) -> Option<SkillId> {
        self.skill_id.filter(|&id| id != 0)
    }
}

/// A ground effect (persistent area skill) was placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundSkillPlaced {
    pub skill_id: SkillId,
    pub owner_id: EntityId,
    #[serde(default)]
    pub level: u16,
    #[serde(default)]
    pub x: u16,
    #[serde(default)]
    pub y: u16,
}

/// Action request the local client is about to send.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutgoingIntent {
    #[serde(default)]
    pub skill_id: Option<SkillId>,
    #[serde(default)]
    pub action: Option<u8>,
    #[serde(default)]
    pub target_id: Option<EntityId>,
}

/// Classification of an outgoing intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentKind {
    Skill(SkillId),
    NormalAttack,
    Other,
}

impl OutgoingIntent {
    pub fn skill(skill_id: SkillId) -> Self {
        Self {
            skill_id: Some(skill_id),
            ..Default::default()
        }
    }

    pub fn attack(action: u8, target_id: EntityId) -> Self {
        Self {
            skill_id: None,
            action: Some(action),
            target_id: Some(target_id),
        }
    }

    /// Classify the intent. Skill use wins over an action code; an action only
    /// counts as a normal attack when it names a target and its code is one of
    /// `attack_actions`.
    pub fn classify(&self, attack_actions: &[u8]) -> IntentKind {
        if let Some(skill_id) = self.skill_id.filter(|&id| id > 0) {
            return IntentKind::Skill(skill_id);
        }
        match (self.action, self.target_id) {
            (Some(action), Some(target)) if target != 0 && attack_actions.contains(&action) => {
                IntentKind::NormalAttack
            }
            _ => IntentKind::Other,
        }
    }
}

/// Any event the meter consumes, as recorded in a replay feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeedEvent {
    Damage(DamageEvent),
    GroundSkill(GroundSkillPlaced),
    Intent(OutgoingIntent),
    /// The host's identity changed (login, character switch)
    Identity { player_id: EntityId },
}

/// A feed event with its offset from the start of the recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedRecord {
    pub at_ms: u64,
    #[serde(flatten)]
    pub event: FeedEvent,
}
