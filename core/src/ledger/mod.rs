//! Per-label damage accumulation.
//!
//! The ledger keeps labels in first-seen order so that snapshot rows with an
//! equal damage share keep a stable order between refreshes.


use dpsmeter_types::{CRITICAL_LABEL, MeterSnapshot, SkillRow};
use hashbrown::HashMap;

/// Accumulated numbers for one label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkillStat {
    pub damage: i64,
    pub hits: u32,
    pub casts: u32,
}

#[derive(Debug, Clone, Default)]
pub struct AggregationLedger {
    total_damage: i64,
    labels: Vec<String>,
    stats: Vec<SkillStat>,
    index: HashMap<String, usize>,
}

impl AggregationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one hit of `amount` under `label`.
    ///
    /// Critical auto attacks have no cast intent of their own, so each hit
    /// under [`CRITICAL_LABEL`] also counts as a cast. Counters saturate
    /// instead of overflowing on hostile feed values.
    pub fn record_damage(&mut self, label: &str, amount: i64) {
        self.total_damage = self.total_damage.saturating_add(amount);
        let stat = self.entry(label);
        stat.damage = stat.damage.saturating_add(amount);
        stat.hits = stat.hits.saturating_add(1);
        if label == CRITICAL_LABEL {
            stat.casts = stat.casts.saturating_add(1);
        }
        let stat = *stat;
        tracing::debug!(label, amount, damage = stat.damage, hits = stat.hits, "damage recorded");
    }

    /// Count one cast of `label`, whether or not it ever lands.
    pub fn record_cast(&mut self, label: &str) {
        let stat = self.entry(label);
        stat.casts = stat.casts.saturating_add(1);
        let casts = stat.casts;
        tracing::debug!(label, casts, "cast recorded");
    }

    pub fn total_damage(&self) -> i64 {
        self.total_damage
    }

    pub fn get(&self, label: &str) -> Option<&SkillStat> {
        self.index.get(label).map(|&idx| &self.stats[idx])
    }

    /// Labels and their stats in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SkillStat)> {
        self.labels.iter().map(String::as_str).zip(self.stats.iter())
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn clear(&mut self) {
        self.total_damage = 0;
        self.labels.clear();
        self.stats.clear();
        self.index.clear();
    }

    /// Build the display rows for `elapsed_secs` of tracking.
    ///
    /// Rates are zero until time has elapsed; shares are zero while there is
    /// no damage. Rows are sorted by share, highest first.
    pub fn snapshot(&self, elapsed_secs: f64) -> MeterSnapshot {
        let elapsed_secs = elapsed_secs.max(0.0);
        let total_dps = if elapsed_secs > 0.0 {
            (self.total_damage as f64 / elapsed_secs).floor() as i64
        } else {
            0
        };

        let mut rows: Vec<SkillRow> = self
            .iter()
            .map(|(label, stat)| SkillRow {
                label: label.to_string(),
                damage: stat.damage,
                hits: stat.hits,
                casts: stat.casts,
                dps: if elapsed_secs > 0.0 {
                    stat.damage as f64 / elapsed_secs
                } else {
                    0.0
                },
                percentage: if self.total_damage > 0 {
                    stat.damage as f64 / self.total_damage as f64 * 100.0
                } else {
                    0.0
                },
            })
            .collect();
        // Stable: equal shares keep first-seen order
        rows.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));

        MeterSnapshot {
            active: false,
            elapsed_secs,
            total_damage: self.total_damage,
            total_dps,
            rows,
        }
    }

    fn entry(&mut self, label: &str) -> &mut SkillStat {
        let idx = match self.index.get(label) {
            Some(&idx) => idx,
            None => {
                let idx = self.labels.len();
                self.labels.push(label.to_string());
                self.stats.push(SkillStat::default());
                self.index.insert(label.to_string(), idx);
                idx
            }
        };
        &mut self.stats[idx]
    }
}
