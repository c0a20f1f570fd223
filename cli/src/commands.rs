use std::io::Write;
use std::path::Path;
use std::time::Instant;

use dpsmeter_core::feed::read_feed;
use dpsmeter_core::{
    DamageEvent, DamageKind, GroundSkillPlaced, MeterConfigExt, MeterSnapshot, OutgoingIntent,
    TrackingSession,
};
use dpsmeter_types::formatting::{format_clock, format_percent, format_rate, format_thousands};

use crate::CliContext;

pub async fn start(ctx: &CliContext) {
    if ctx.meter.lock().await.start() {
        println!("Tracking started");
    } else {
        println!("Already tracking");
    }
}

pub async fn stop(ctx: &CliContext) {
    let mut meter = ctx.meter.lock().await;
    if meter.stop().await {
        println!("Tracking stopped");
        print_snapshot(&meter.snapshot());
    } else {
        println!("Not tracking");
    }
}

pub async fn reset(ctx: &CliContext) {
    let mut meter = ctx.meter.lock().await;
    meter.reset();
    if meter.is_active() {
        println!("Stats cleared, tracking restarted");
    } else {
        println!("Stats cleared");
    }
}

pub async fn toggle(ctx: &CliContext) {
    let visible = ctx.meter.lock().await.toggle_visibility();
    println!("Meter {}", if visible { "shown" } else { "hidden" });
}

pub async fn show_stats(ctx: &CliContext) {
    let snapshot = ctx.meter.lock().await.snapshot();
    print_snapshot(&snapshot);
}

pub async fn set_player(ctx: &CliContext, id: u32) {
    ctx.identity.set(Some(id));
    ctx.config.write().await.local_player_id = Some(id);
    println!("Local player set to {}", id);
}

pub async fn cast(ctx: &CliContext, skill: Option<u32>, attack: Option<u32>) {
    let intent = match (skill, attack) {
        (Some(skill_id), _) => OutgoingIntent::skill(skill_id),
        (None, Some(target_id)) => OutgoingIntent::attack(0, target_id),
        (None, None) => {
            println!("Give --skill <id> or --attack <target id>");
            return;
        }
    };
    // Goes through the same before-send hooks a host would call
    let sent = ctx.send_hooks.lock().await.dispatch(intent);
    tracing::debug!(?sent, "intent sent");
}

pub async fn ground(ctx: &CliContext, skill: u32, owner: Option<u32>) {
    let Some(owner_id) = owner.or(ctx.identity_id()) else {
        println!("No local player set, use `player --id <id>` or pass --owner");
        return;
    };
    let placed = GroundSkillPlaced {
        skill_id: skill,
        owner_id,
        level: 0,
        x: 0,
        y: 0,
    };
    ctx.meter.lock().await.handle_ground_skill(&placed);
}

pub async fn hit(
    ctx: &CliContext,
    amount: i64,
    skill: Option<u32>,
    source: Option<u32>,
    crit: bool,
) {
    let critical_action = ctx.config.read().await.critical_action;
    let event = DamageEvent {
        kind: if skill.is_some() {
            DamageKind::Skill
        } else {
            DamageKind::Attack
        },
        skill_id: skill,
        source_id: source.or(ctx.identity_id()),
        amount: Some(amount),
        action: crit.then_some(critical_action),
        ..Default::default()
    };

    match ctx.meter.lock().await.handle_damage(&event) {
        Some(attribution) => println!(
            "{} +{}",
            attribution.label,
            format_thousands(attribution.amount)
        ),
        None => println!("Not attributed"),
    }
}

/// Run a recorded feed through a fresh session and print the result.
pub async fn replay(ctx: &CliContext, path: &str) {
    let config = ctx.config.read().await.clone();
    let records = match read_feed(Path::new(path)) {
        Ok(records) => records,
        Err(e) => {
            println!("Failed to read feed {}: {}", path, e);
            return;
        }
    };

    let timer = Instant::now();
    let mut session = TrackingSession::from_config(&config, config.skill_catalog());
    let base = Instant::now();
    session.start(base);
    let end = session.replay(&records, base);
    session.stop(end);

    println!(
        "replayed {} events in {}ms",
        records.len(),
        timer.elapsed().as_millis()
    );
    print_snapshot(&session.snapshot(end));
}

pub async fn show_config(ctx: &CliContext) {
    let config = ctx.config.read().await;
    if let Some(path) = dpsmeter_core::MeterConfig::config_path() {
        println!("Config file: {}", path.display());
    }
    println!("Retention:        {}ms", config.retention_ms);
    println!("Refresh interval: {}ms", config.refresh_interval_ms);
    println!("Critical action:  {}", config.critical_action);
    println!("Attack actions:   {:?}", config.normal_attack_actions);
    println!(
        "Skill table:      {}",
        config
            .skill_table
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(builtin)".to_string())
    );
    println!(
        "Local player:     {}",
        ctx.identity_id()
            .map(|id| id.to_string())
            .unwrap_or_else(|| "(unknown)".to_string())
    );
}

pub async fn save_config(ctx: &CliContext) {
    let config = ctx.config.read().await;
    match config.save() {
        Ok(()) => println!("Configuration saved"),
        Err(e) => println!("Failed to save configuration: {}", e),
    }
}

pub fn exit() {
    let mut stdout = std::io::stdout();
    let _ = writeln!(stdout, "quitting...");
    let _ = stdout.flush();
}

pub fn print_snapshot(snapshot: &MeterSnapshot) {
    println!(
        "Time {}   DPS {}   Damage {}",
        format_clock(snapshot.elapsed_secs),
        format_thousands(snapshot.total_dps),
        format_thousands(snapshot.total_damage)
    );
    if snapshot.is_empty() {
        println!("No damage recorded");
        return;
    }

    println!(
        "{:<28} {:>6} {:>6} {:>12} {:>10} {:>7}",
        "Skill", "Casts", "Hits", "Damage", "DPS", "Share"
    );
    println!("{}", "-".repeat(74));
    for row in &snapshot.rows {
        println!(
            "{:<28} {:>6} {:>6} {:>12} {:>10} {:>7}",
            row.label,
            row.casts_display(),
            row.hits,
            format_thousands(row.damage),
            format_rate(row.dps),
            format_percent(row.percentage)
        );
    }
}

/// Print the last frame the refresh task rendered.
pub fn show_frame(ctx: &CliContext) {
    match ctx.latest.get() {
        Some(frame) => print_snapshot(&frame),
        None => println!("Nothing rendered yet (meter hidden or never started)"),
    }
}
