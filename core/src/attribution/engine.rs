use std::sync::Arc;
use std::time::Instant;

use dpsmeter_types::{CRIT_SUFFIX, CRITICAL_LABEL, NORMAL_ATTACK_LABEL};

use crate::correlation::{CorrelationStore, SkillUsageClaim};
use crate::feed::{DamageEvent, DamageKind, EntityId};
use crate::game_data::{SkillCatalog, skill_label};

/// Action flag the server sets on critical hits.
pub const DEFAULT_CRITICAL_ACTION: u8 = 10;

/// Damage resolved to the local player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribution {
    pub label: String,
    pub amount: i64,
}

/// Resolves damage events against the local player's identity and claims.
#[derive(Clone)]
pub struct AttributionEngine {
    catalog: Arc<dyn SkillCatalog>,
    critical_action: u8,
}

impl std::fmt::Debug for AttributionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttributionEngine")
            .field("critical_action", &self.critical_action)
            .finish_non_exhaustive()
    }
}

impl AttributionEngine {
    pub fn new(catalog: Arc<dyn SkillCatalog>) -> Self {
        Self {
            catalog,
            critical_action: DEFAULT_CRITICAL_ACTION,
        }
    }

    pub fn with_critical_action(mut self, action: u8) -> Self {
        self.critical_action = action;
        self
    }

    pub fn catalog(&self) -> &dyn SkillCatalog {
        self.catalog.as_ref()
    }

    /// Attribute `event` to `local_player`, or `None` if it is not theirs or
    /// carries no damage.
    pub fn attribute(
        &self,
        event: &DamageEvent,
        claims: &CorrelationStore,
        local_player: Option<EntityId>,
        now: Instant,
    ) -> Option<Attribution> {
        let Some(amount) = event.amount.filter(|&amount| amount > 0) else {
            tracing::trace!(amount = ?event.amount, "damage dropped: no damage");
            return None;
        };
        let Some(local_player) = local_player else {
            tracing::trace!("damage dropped: local player unknown");
            return None;
        };

        let mut own_damage = event.attacker_id() == Some(local_player);
        let mut claim: Option<&SkillUsageClaim> = None;

        if !own_damage
            && let Some(skill_id) = event.skill_id()
            && let Some(found) = claims.lookup(skill_id, now)
            && found.owner_id == local_player
        {
            own_damage = true;
            claim = Some(found);
        }

        if !own_damage {
            tracing::trace!(attacker = ?event.attacker_id(), skill_id = ?event.skill_id(), "damage dropped: not local player");
            return None;
        }

        let label = self.resolve_label(event, claim);
        Some(Attribution { label, amount })
    }

    fn resolve_label(&self, event: &DamageEvent, claim: Option<&SkillUsageClaim>) -> String {
        let critical = event.action == Some(self.critical_action);

        match (event.kind, event.skill_id()) {
            (DamageKind::Skill, Some(skill_id)) => {
                let mut label = match claim {
                    Some(claim) => claim.skill_name.clone(),
                    None => skill_label(self.catalog(), skill_id),
                };
                if critical {
                    label.push_str(CRIT_SUFFIX);
                }
                label
            }
            _ if critical => CRITICAL_LABEL.to_string(),
            _ => NORMAL_ATTACK_LABEL.to_string(),
        }
    }
}
