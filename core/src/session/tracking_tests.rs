//! Tests for the tracking session lifecycle and end-to-end attribution
//!
//! Verifies that:
//! - start/stop/reset follow the Idle/Active state machine
//! - casts, claims and damage flow into the ledger
//! - the reference scenarios produce the expected ledger

use std::sync::Arc;
use std::time::{Duration, Instant};

use dpsmeter_types::MeterConfig;

use crate::feed::{DamageEvent, FeedEvent, FeedRecord, GroundSkillPlaced, OutgoingIntent};
use crate::game_data::{BuiltinSkills, SkillTable};
use crate::ledger::SkillStat;

use super::{SessionState, TrackingSession};

// ═══════════════════════════════════════════════════════════════════════════
// Test Helpers
// ═══════════════════════════════════════════════════════════════════════════

const PLAYER: u32 = 150_001;
const MONSTER: u32 = 110_000_432;

fn at(base: Instant, ms: u64) -> Instant {
    base + Duration::from_millis(ms)
}

/// Session with the builtin catalog and the local player set
fn make_session() -> TrackingSession {
    let mut session = TrackingSession::new(Arc::new(BuiltinSkills));
    session.set_local_player(Some(PLAYER));
    session
}

fn stat(damage: i64, hits: u32, casts: u32) -> SkillStat {
    SkillStat { damage, hits, casts }
}

// ═══════════════════════════════════════════════════════════════════════════
// Lifecycle
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_new_session_is_idle_and_empty() {
    let session = make_session();
    assert_eq!(session.state(), SessionState::Idle);
    assert!(session.started_at().is_none());
    assert!(session.ledger().is_empty());

    let snap = session.snapshot(Instant::now());
    assert!(!snap.active);
    assert_eq!(snap.elapsed_secs, 0.0);
    assert_eq!(snap.total_dps, 0);
}

#[test]
fn test_double_start_and_double_stop_are_noops() {
    let t0 = Instant::now();
    let mut session = make_session();

    assert!(session.start(t0));
    assert!(!session.start(at(t0, 1_000)));
    assert_eq!(session.started_at(), Some(t0));

    assert!(session.stop(at(t0, 2_000)));
    assert!(!session.stop(at(t0, 3_000)));
    assert_eq!(session.state(), SessionState::Idle);
    assert_eq!(session.elapsed(at(t0, 9_000)), Duration::from_secs(2));
}

#[test]
fn test_damage_ignored_while_idle() {
    let t0 = Instant::now();
    let mut session = make_session();

    assert!(session.handle_damage(&DamageEvent::attack(PLAYER, 100), t0).is_none());
    assert!(session.ledger().is_empty());

    session.start(t0);
    session.stop(at(t0, 100));
    assert!(session.handle_damage(&DamageEvent::attack(PLAYER, 100), at(t0, 200)).is_none());
    assert_eq!(session.ledger().total_damage(), 0);
}

#[test]
fn test_stop_freezes_values_and_clock() {
    let t0 = Instant::now();
    let mut session = make_session();
    session.start(t0);
    session.handle_damage(&DamageEvent::attack(PLAYER, 1_000), at(t0, 500));
    session.stop(at(t0, 2_000));

    let later = session.snapshot(at(t0, 60_000));
    assert_eq!(later.elapsed_secs, 2.0);
    assert_eq!(later.total_damage, 1_000);
    assert_eq!(later.total_dps, 500);
}

#[test]
fn test_restart_keeps_ledger_and_start_time() {
    let t0 = Instant::now();
    let mut session = make_session();
    session.start(t0);
    session.handle_damage(&DamageEvent::attack(PLAYER, 400), at(t0, 100));
    session.stop(at(t0, 1_000));
    session.start(at(t0, 5_000));

    assert_eq!(session.ledger().total_damage(), 400);
    assert_eq!(session.ledger().get("Normal Attack"), Some(&stat(400, 1, 0)));
    assert_eq!(session.started_at(), Some(t0));

    // Stopped time counts against DPS
    session.handle_damage(&DamageEvent::attack(PLAYER, 400), at(t0, 6_000));
    let snap = session.snapshot(at(t0, 8_000));
    assert_eq!(snap.elapsed_secs, 8.0);
    assert_eq!(snap.total_dps, 100);
}

#[test]
fn test_reset_while_idle_is_noop_on_empty_session() {
    let t0 = Instant::now();
    let mut session = make_session();
    let before = session.snapshot(t0);

    session.reset(t0);

    assert_eq!(session.state(), SessionState::Idle);
    assert!(session.started_at().is_none());
    assert!(session.ledger().is_empty());
    assert_eq!(session.snapshot(t0), before);
}

#[test]
fn test_reset_while_idle_clears_stats() {
    let t0 = Instant::now();
    let mut session = make_session();
    session.start(t0);
    session.handle_damage(&DamageEvent::attack(PLAYER, 50), at(t0, 10));
    session.stop(at(t0, 20));

    session.reset(at(t0, 30));

    assert_eq!(session.state(), SessionState::Idle);
    assert!(session.ledger().is_empty());
    assert!(session.started_at().is_none());
    assert_eq!(session.snapshot(at(t0, 40)).elapsed_secs, 0.0);
}

#[test]
fn test_reset_while_active_restarts_fresh() {
    let t0 = Instant::now();
    let mut session = make_session();
    session.start(t0);
    session.handle_damage(&DamageEvent::attack(PLAYER, 50), at(t0, 10));

    session.reset(at(t0, 5_000));

    assert_eq!(session.state(), SessionState::Active);
    assert_eq!(session.started_at(), Some(at(t0, 5_000)));
    assert!(session.ledger().is_empty());
    assert_eq!(session.snapshot(at(t0, 5_000)).elapsed_secs, 0.0);

    session.handle_damage(&DamageEvent::attack(PLAYER, 70), at(t0, 6_000));
    assert_eq!(session.ledger().total_damage(), 70);
}

#[test]
fn test_reset_keeps_claims() {
    let t0 = Instant::now();
    let mut session = make_session();
    session.start(t0);
    session.observe_intent(&OutgoingIntent::skill(18), t0);
    session.reset(at(t0, 1_000));

    let hit = session.handle_damage(&DamageEvent::skill(18, MONSTER, 90), at(t0, 2_000));
    assert_eq!(hit.map(|a| a.label), Some("Fire Wall".to_string()));
}

// ═══════════════════════════════════════════════════════════════════════════
// Intents and ground skills
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_skill_intent_counts_cast_and_claims() {
    let t0 = Instant::now();
    let mut session = make_session();
    session.start(t0);

    session.observe_intent(&OutgoingIntent::skill(19), t0);

    assert_eq!(session.ledger().get("Fire Bolt"), Some(&stat(0, 0, 1)));
    let claim = session.claims().lookup(19, t0).unwrap();
    assert_eq!(claim.owner_id, PLAYER);
    assert_eq!(claim.skill_name, "Fire Bolt");
}

#[test]
fn test_idle_intent_claims_without_counting() {
    let t0 = Instant::now();
    let mut session = make_session();

    session.observe_intent(&OutgoingIntent::skill(19), t0);
    assert!(session.ledger().is_empty());
    assert!(session.claims().lookup(19, t0).is_some());

    // Cast just before start still attributes its damage
    session.start(at(t0, 100));
    let hit = session.handle_damage(&DamageEvent::skill(19, 0, 250), at(t0, 600));
    assert_eq!(hit.map(|a| a.label), Some("Fire Bolt".to_string()));
    assert_eq!(session.ledger().get("Fire Bolt"), Some(&stat(250, 1, 0)));
}

#[test]
fn test_intent_without_identity_counts_but_does_not_claim() {
    let t0 = Instant::now();
    let mut session = TrackingSession::new(Arc::new(BuiltinSkills));
    session.start(t0);

    session.observe_intent(&OutgoingIntent::skill(5), t0);
    assert_eq!(session.ledger().get("Bash"), Some(&stat(0, 0, 1)));
    assert!(session.claims().is_empty());
}

#[test]
fn test_normal_attack_intents() {
    let t0 = Instant::now();
    let mut session = make_session();
    session.start(t0);

    session.observe_intent(&OutgoingIntent::attack(0, MONSTER), t0);
    session.observe_intent(&OutgoingIntent::attack(7, MONSTER), t0);
    session.observe_intent(&OutgoingIntent::attack(2, MONSTER), t0);
    session.observe_intent(&OutgoingIntent::default(), t0);

    assert_eq!(session.ledger().get("Normal Attack"), Some(&stat(0, 0, 2)));
    assert_eq!(session.ledger().len(), 1);
}

#[test]
fn test_ground_skill_claims_only_local_placements() {
    let t0 = Instant::now();
    let mut session = make_session();
    session.start(t0);

    let theirs = GroundSkillPlaced {
        skill_id: 89,
        owner_id: 150_999,
        level: 10,
        x: 100,
        y: 120,
    };
    session.observe_ground_skill(&theirs, t0);
    assert!(session.claims().lookup(89, t0).is_none());

    let mine = GroundSkillPlaced {
        owner_id: PLAYER,
        ..theirs
    };
    session.observe_ground_skill(&mine, t0);

    // Storm Gust ticks long after placement, from an effect entity
    let tick = session.handle_damage(&DamageEvent::skill(89, 0, 1_800), at(t0, 40_000));
    assert_eq!(tick.map(|a| a.label), Some("Storm Gust".to_string()));
    // Placement is not a cast
    assert_eq!(session.ledger().get("Storm Gust"), Some(&stat(1_800, 1, 0)));
}

#[test]
fn test_config_drives_retention_and_actions() {
    let t0 = Instant::now();
    let config = MeterConfig {
        retention_ms: 1_000,
        critical_action: 4,
        normal_attack_actions: vec![1],
        local_player_id: Some(PLAYER),
        ..MeterConfig::default()
    };
    let mut table = SkillTable::new();
    table.insert(19, "Firebolt");
    let mut session = TrackingSession::from_config(&config, Arc::new(table));
    assert_eq!(session.local_player(), Some(PLAYER));
    session.start(t0);

    session.observe_intent(&OutgoingIntent::skill(19), t0);
    assert!(session.handle_damage(&DamageEvent::skill(19, 0, 10), at(t0, 1_001)).is_none());

    session.observe_intent(&OutgoingIntent::attack(0, MONSTER), t0);
    session.observe_intent(&OutgoingIntent::attack(1, MONSTER), t0);
    assert_eq!(session.ledger().get("Normal Attack"), Some(&stat(0, 0, 1)));

    let crit = session.handle_damage(&DamageEvent::attack(PLAYER, 5).with_action(4), t0);
    assert_eq!(crit.map(|a| a.label), Some("Critical".to_string()));
}

#[test]
fn test_replay_feeds_records_in_order() {
    let base = Instant::now();
    let mut session = TrackingSession::new(Arc::new(BuiltinSkills));
    session.start(base);
    let records = vec![
        FeedRecord {
            at_ms: 0,
            event: FeedEvent::Identity { player_id: PLAYER },
        },
        FeedRecord {
            at_ms: 100,
            event: FeedEvent::Intent(OutgoingIntent::skill(19)),
        },
        FeedRecord {
            at_ms: 600,
            event: FeedEvent::Damage(DamageEvent::skill(19, MONSTER, 500)),
        },
        FeedRecord {
            at_ms: 2_000,
            event: FeedEvent::Damage(DamageEvent::attack(PLAYER, 100)),
        },
    ];

    let end = session.replay(&records, base);

    assert_eq!(end, at(base, 2_000));
    let snap = session.snapshot(end);
    assert_eq!(snap.total_damage, 600);
    assert_eq!(snap.total_dps, 300);
    assert_eq!(snap.rows[0].label, "Fire Bolt");
    assert_eq!(snap.rows[0].casts, 1);
}

// ═══════════════════════════════════════════════════════════════════════════
// Reference scenarios
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_scenario_claimed_skill_damage() {
    let t0 = Instant::now();
    let mut table = SkillTable::new();
    table.insert(5, "Fireball");
    let mut session = TrackingSession::new(Arc::new(table));
    session.set_local_player(Some(PLAYER));
    session.start(t0);

    session.observe_intent(&OutgoingIntent::skill(5), t0);
    let event = DamageEvent::skill(5, 999, 300);
    let hit = session.handle_damage(&event, at(t0, 500)).unwrap();

    assert_eq!(hit.label, "Fireball");
    assert_eq!(session.ledger().get("Fireball"), Some(&stat(300, 1, 1)));
}

#[test]
fn test_scenario_critical_normal_attack() {
    let t0 = Instant::now();
    let mut session = make_session();
    session.start(t0);

    let hit = session
        .handle_damage(&DamageEvent::attack(PLAYER, 150).with_action(10), t0)
        .unwrap();

    assert_eq!(hit.label, "Critical");
    assert_eq!(session.ledger().get("Critical"), Some(&stat(150, 1, 1)));
}

#[test]
fn test_scenario_zero_damage_changes_nothing() {
    let t0 = Instant::now();
    let mut session = make_session();
    session.start(t0);

    assert!(session.handle_damage(&DamageEvent::attack(PLAYER, 0), t0).is_none());
    assert!(session.ledger().is_empty());
    assert_eq!(session.ledger().total_damage(), 0);
}

#[test]
fn test_scenario_expired_claim() {
    let t0 = Instant::now();
    let mut session = make_session();
    session.start(t0);
    session.observe_intent(&OutgoingIntent::skill(7), t0);

    let late = at(t0, 61_000);
    assert!(session.handle_damage(&DamageEvent::skill(7, 999, 200), late).is_none());

    let direct = session.handle_damage(&DamageEvent::skill(7, PLAYER, 200), late);
    assert_eq!(direct.map(|a| a.label), Some("Magnum Break".to_string()));
    assert_eq!(session.ledger().total_damage(), 200);
}

#[test]
fn test_scenario_snapshot_right_after_start() {
    let t0 = Instant::now();
    let mut session = make_session();
    session.start(t0);
    session.handle_damage(&DamageEvent::attack(PLAYER, 500), t0);

    let snap = session.snapshot(t0);
    assert!(snap.active);
    assert_eq!(snap.elapsed_secs, 0.0);
    assert_eq!(snap.total_dps, 0);
    assert_eq!(snap.rows[0].dps, 0.0);
}
