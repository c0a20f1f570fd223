//! Shared types for the DPS meter
//!
//! This crate contains serializable configuration and read-model types that are
//! shared between the engine (dpsmeter-core) and its hosts (CLI, overlays).

pub mod formatting;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Labels
// ─────────────────────────────────────────────────────────────────────────────

/// Label for plain (non-critical) auto attacks.
pub const NORMAL_ATTACK_LABEL: &str = "Normal Attack";

/// Label for critical auto attacks. Critical hits have no cast intent of their
/// own, so each hit under this label also counts as a cast.
pub const CRITICAL_LABEL: &str = "Critical";

/// Suffix appended to a skill label when the hit was critical.
pub const CRIT_SUFFIX: &str = " (Crit)";

/// Suffix used by lucky-hit sub-labels.
pub const LUCKY_SUFFIX: &str = " (Lucky)";

/// Sub-label suffixes that piggyback on another label's casts.
pub const DAMAGE_MODIFIER_SUFFIXES: [&str; 2] = [CRIT_SUFFIX, LUCKY_SUFFIX];

/// Returns true if the label is a damage-modifier sub-label like `"Bash (Crit)"`.
pub fn is_damage_modifier(label: &str) -> bool {
    DAMAGE_MODIFIER_SUFFIXES
        .iter()
        .any(|suffix| label.ends_with(suffix))
}

/// Fallback label for a skill id the catalog does not know.
pub fn unknown_skill_label(skill_id: u32) -> String {
    format!("Skill #{}", skill_id)
}

// ─────────────────────────────────────────────────────────────────────────────
// Snapshot Types (read model for renderers)
// ─────────────────────────────────────────────────────────────────────────────

/// One row of the per-label breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillRow {
    pub label: String,
    pub damage: i64,
    pub hits: u32,
    pub casts: u32,
    pub dps: f64,
    pub percentage: f64,
}

impl SkillRow {
    /// Cast count as rendered: modifier sub-labels and labels without casts
    /// show a dash instead of a number.
    pub fn casts_display(&self) -> String {
        if self.casts == 0 || is_damage_modifier(&self.label) {
            "-".to_string()
        } else {
            self.casts.to_string()
        }
    }
}

/// Point-in-time view of a tracking session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeterSnapshot {
    pub active: bool,
    pub elapsed_secs: f64,
    pub total_damage: i64,
    pub total_dps: i64,
    /// Sorted by damage share, highest first
    pub rows: Vec<SkillRow>,
}

impl MeterSnapshot {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, label: &str) -> Option<&SkillRow> {
        self.rows.iter().find(|r| r.label == label)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

fn default_retention_ms() -> u64 {
    60_000
}

fn default_refresh_interval_ms() -> u64 {
    100
}

fn default_critical_action() -> u8 {
    10
}

fn default_normal_attack_actions() -> Vec<u8> {
    vec![0, 7]
}

/// Meter configuration, persisted by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeterConfig {
    /// How long a skill cast stays attributable to its caster
    #[serde(default = "default_retention_ms")]
    pub retention_ms: u64,
    /// Render cadence while tracking
    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,
    /// Action flag value the server uses for critical hits
    #[serde(default = "default_critical_action")]
    pub critical_action: u8,
    /// Outgoing action codes that count as a normal attack cast
    #[serde(default = "default_normal_attack_actions")]
    pub normal_attack_actions: Vec<u8>,
    #[serde(default)]
    pub show_on_start: bool,
    /// Optional TOML file with additional skill names
    #[serde(default)]
    pub skill_table: Option<PathBuf>,
    #[serde(default)]
    pub local_player_id: Option<u32>,
}

impl Default for MeterConfig {
    fn default() -> Self {
        Self {
            retention_ms: default_retention_ms(),
            refresh_interval_ms: default_refresh_interval_ms(),
            critical_action: default_critical_action(),
            normal_attack_actions: default_normal_attack_actions(),
            show_on_start: false,
            skill_table: None,
            local_player_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(label: &str, casts: u32) -> SkillRow {
        SkillRow {
            label: label.to_string(),
            damage: 100,
            hits: 1,
            casts,
            dps: 0.0,
            percentage: 0.0,
        }
    }

    #[test]
    fn casts_display_uses_dash_for_modifiers_and_zero() {
        assert_eq!(row("Bash", 3).casts_display(), "3");
        assert_eq!(row("Bash", 0).casts_display(), "-");
        assert_eq!(row("Bash (Crit)", 2).casts_display(), "-");
        assert_eq!(row("Bash (Lucky)", 1).casts_display(), "-");
        assert_eq!(row(CRITICAL_LABEL, 4).casts_display(), "4");
    }

    #[test]
    fn missing_config_fields_fall_back_to_defaults() {
        let config: MeterConfig = toml::from_str("show_on_start = true").unwrap();
        assert!(config.show_on_start);
        assert_eq!(config.retention_ms, 60_000);
        assert_eq!(config.refresh_interval_ms, 100);
        assert_eq!(config.critical_action, 10);
        assert_eq!(config.normal_attack_actions, vec![0, 7]);
        assert!(config.skill_table.is_none());
    }

    #[test]
    fn unknown_skill_label_uses_id() {
        assert_eq!(unknown_skill_label(42), "Skill #42");
    }
}
