use std::time::{Duration, Instant};

use hashbrown::HashMap;

use crate::feed::{EntityId, SkillId};

/// Ground effects can keep dealing damage for tens of seconds after the cast.
pub const DEFAULT_RETENTION: Duration = Duration::from_millis(60_000);

/// Most recent caster of a skill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillUsageClaim {
    pub skill_id: SkillId,
    pub owner_id: EntityId,
    pub skill_name: String,
    pub claimed_at: Instant,
}

impl SkillUsageClaim {
    /// Age at `now`. Clock readings earlier than the claim count as zero age.
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.claimed_at)
    }
}

/// Time-windowed map of skill id to its latest claim.
///
/// Expired claims are evicted on every write. Reads also check age, so a
/// claim that outlived the window is never returned even if no write has
/// happened since.
#[derive(Debug, Clone)]
pub struct CorrelationStore {
    claims: HashMap<SkillId, SkillUsageClaim>,
    retention: Duration,
}

impl Default for CorrelationStore {
    fn default() -> Self {
        Self::new(DEFAULT_RETENTION)
    }
}

impl CorrelationStore {
    pub fn new(retention: Duration) -> Self {
        Self {
            claims: HashMap::new(),
            retention,
        }
    }

    pub fn retention(&self) -> Duration {
        self.retention
    }

    /// Record (or replace) the claim for `skill_id`, evicting expired claims.
    pub fn record_claim(
        &mut self,
        skill_id: SkillId,
        owner_id: EntityId,
        skill_name: impl Into<String>,
        now: Instant,
    ) {
        let skill_name = skill_name.into();
        tracing::debug!(skill_id, owner_id, skill = %skill_name, "skill claim recorded");
        self.claims.insert(
            skill_id,
            SkillUsageClaim {
                skill_id,
                owner_id,
                skill_name,
                claimed_at: now,
            },
        );
        self.evict_expired(now);
    }

    /// Claim for `skill_id` if it is still within the retention window.
    pub fn lookup(&self, skill_id: SkillId, now: Instant) -> Option<&SkillUsageClaim> {
        self.claims
            .get(&skill_id)
            .filter(|claim| !self.is_expired(claim, now))
    }

    /// Drop every claim older than the retention window. Returns how many were removed.
    pub fn evict_expired(&mut self, now: Instant) -> usize {
        let before = self.claims.len();
        let retention = self.retention;
        self.claims
            .retain(|_, claim| claim.age(now) <= retention);
        let evicted = before - self.claims.len();
        if evicted > 0 {
            tracing::trace!(evicted, remaining = self.claims.len(), "expired skill claims evicted");
        }
        evicted
    }

    pub fn clear(&mut self) {
        self.claims.clear();
    }

    /// Number of stored claims, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    #[inline]
    fn is_expired(&self, claim: &SkillUsageClaim, now: Instant) -> bool {
        claim.age(now) > self.retention
    }
}
