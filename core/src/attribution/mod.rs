//! Damage attribution.
//!
//! Decides whether a damage notification belongs to the local player and
//! which label it is aggregated under:
//!
//! ```text
//!   DamageEvent ──► amount > 0? ──► attacker == local player? ──┐
//!                                        │ no                   │ yes
//!                                        ▼                      │
//!                         claim(skill_id).owner == local? ──────┤
//!                                        │ no                   ▼
//!                                        ▼               resolve label
//!                                      drop             (claim name, catalog,
//!                                                        "Normal Attack", crit)
//! ```

mod engine;


pub use engine::{Attribution, AttributionEngine};
