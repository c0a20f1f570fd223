use std::sync::Arc;
use std::time::{Duration, Instant};

use dpsmeter_types::{MeterConfig, MeterSnapshot, NORMAL_ATTACK_LABEL};

use crate::attribution::{Attribution, AttributionEngine};
use crate::correlation::CorrelationStore;
use crate::feed::{
    DamageEvent, EntityId, FeedEvent, FeedRecord, GroundSkillPlaced, IntentKind, OutgoingIntent,
};
use crate::game_data::{SkillCatalog, skill_label};
use crate::ledger::AggregationLedger;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Idle,
    Active,
}

/// One meter's worth of tracking state.
///
/// `Idle -> Active` on [`start`](Self::start), `Active -> Idle` on
/// [`stop`](Self::stop). Stopping freezes the ledger and the clock; starting
/// again resumes into the same ledger with the original start time, so time
/// spent stopped counts against DPS. [`reset`](Self::reset) clears the ledger
/// and, if the session was active, restarts it from `now`.
#[derive(Debug)]
pub struct TrackingSession {
    state: SessionState,
    started_at: Option<Instant>,
    stopped_at: Option<Instant>,
    local_player: Option<EntityId>,
    normal_attack_actions: Vec<u8>,
    claims: CorrelationStore,
    engine: AttributionEngine,
    ledger: AggregationLedger,
}

impl TrackingSession {
    pub fn new(catalog: Arc<dyn SkillCatalog>) -> Self {
        Self::from_config(&MeterConfig::default(), catalog)
    }

    pub fn from_config(config: &MeterConfig, catalog: Arc<dyn SkillCatalog>) -> Self {
        Self {
            state: SessionState::Idle,
            started_at: None,
            stopped_at: None,
            local_player: config.local_player_id,
            normal_attack_actions: config.normal_attack_actions.clone(),
            claims: CorrelationStore::new(Duration::from_millis(config.retention_ms)),
            engine: AttributionEngine::new(catalog).with_critical_action(config.critical_action),
            ledger: AggregationLedger::new(),
        }
    }

    // --- Identity ---

    pub fn set_local_player(&mut self, player_id: Option<EntityId>) {
        if self.local_player != player_id {
            tracing::info!(player_id = ?player_id, "local player changed");
        }
        self.local_player = player_id;
    }

    pub fn local_player(&self) -> Option<EntityId> {
        self.local_player
    }

    // --- Lifecycle ---

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    /// Begin or resume tracking. Returns false if already active.
    pub fn start(&mut self, now: Instant) -> bool {
        if self.is_active() {
            return false;
        }
        let resumed = self.started_at.is_some();
        self.started_at.get_or_insert(now);
        self.stopped_at = None;
        self.state = SessionState::Active;
        tracing::info!(resumed, "tracking started");
        true
    }

    /// Stop tracking and freeze the ledger. Returns false if already idle.
    pub fn stop(&mut self, now: Instant) -> bool {
        if !self.is_active() {
            return false;
        }
        self.state = SessionState::Idle;
        self.stopped_at = Some(now);
        tracing::info!(
            total_damage = self.ledger.total_damage(),
            elapsed_secs = self.elapsed(now).as_secs_f64(),
            "tracking stopped"
        );
        true
    }

    /// Clear all stats. An active session restarts immediately with a fresh clock.
    pub fn reset(&mut self, now: Instant) {
        let was_active = self.is_active();
        if was_active {
            self.stop(now);
        }
        self.ledger.clear();
        self.started_at = None;
        self.stopped_at = None;
        tracing::info!(restarted = was_active, "tracking reset");
        if was_active {
            self.start(now);
        }
    }

    /// Time counted against DPS: from the first start until `now`, or until
    /// the last stop while idle.
    pub fn elapsed(&self, now: Instant) -> Duration {
        let Some(started_at) = self.started_at else {
            return Duration::ZERO;
        };
        let end = match self.state {
            SessionState::Active => now,
            SessionState::Idle => self.stopped_at.unwrap_or(now),
        };
        end.saturating_duration_since(started_at)
    }

    // --- Event Handling ---

    /// Attribute a damage notification and record it if it is the local player's.
    pub fn handle_damage(&mut self, event: &DamageEvent, now: Instant) -> Option<Attribution> {
        if !self.is_active() {
            tracing::trace!("damage dropped: not tracking");
            return None;
        }
        let attribution = self
            .engine
            .attribute(event, &self.claims, self.local_player, now)?;
        self.ledger
            .record_damage(&attribution.label, attribution.amount);
        Some(attribution)
    }

    /// Observe an outgoing intent. Skill casts are claimed even while idle so
    /// damage from a skill cast just before starting is still attributed.
    pub fn observe_intent(&mut self, intent: &OutgoingIntent, now: Instant) {
        match intent.classify(&self.normal_attack_actions) {
            IntentKind::Skill(skill_id) => {
                let name = skill_label(self.engine.catalog(), skill_id);
                if self.is_active() {
                    self.ledger.record_cast(&name);
                }
                if let Some(player_id) = self.local_player {
                    self.claims.record_claim(skill_id, player_id, name, now);
                }
            }
            IntentKind::NormalAttack => {
                if self.is_active() {
                    self.ledger.record_cast(NORMAL_ATTACK_LABEL);
                }
            }
            IntentKind::Other => {}
        }
    }

    /// Claim a ground effect placed by the local player.
    pub fn observe_ground_skill(&mut self, placed: &GroundSkillPlaced, now: Instant) {
        if self.local_player != Some(placed.owner_id) {
            tracing::trace!(
                skill_id = placed.skill_id,
                owner_id = placed.owner_id,
                "ground skill ignored: not local player"
            );
            return;
        }
        let name = skill_label(self.engine.catalog(), placed.skill_id);
        self.claims
            .record_claim(placed.skill_id, placed.owner_id, name, now);
    }

    pub fn handle_feed_event(&mut self, event: &FeedEvent, now: Instant) {
        match event {
            FeedEvent::Damage(damage) => {
                self.handle_damage(damage, now);
            }
            FeedEvent::GroundSkill(placed) => self.observe_ground_skill(placed, now),
            FeedEvent::Intent(intent) => self.observe_intent(intent, now),
            FeedEvent::Identity { player_id } => self.set_local_player(Some(*player_id)),
        }
    }

    /// Feed recorded events, timestamped relative to `base`. Returns the time
    /// of the last record (or `base` for an empty feed).
    pub fn replay(&mut self, records: &[FeedRecord], base: Instant) -> Instant {
        let mut last = base;
        for record in records {
            let now = base + Duration::from_millis(record.at_ms);
            self.handle_feed_event(&record.event, now);
            last = last.max(now);
        }
        last
    }

    // --- Read Model ---

    pub fn snapshot(&self, now: Instant) -> MeterSnapshot {
        let mut snapshot = self.ledger.snapshot(self.elapsed(now).as_secs_f64());
        snapshot.active = self.is_active();
        snapshot
    }

    pub fn ledger(&self) -> &AggregationLedger {
        &self.ledger
    }

    pub fn claims(&self) -> &CorrelationStore {
        &self.claims
    }
}
