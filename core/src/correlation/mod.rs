//! Skill ownership claims.
//!
//! Skill damage notifications name the skill but not always its caster. When
//! the local player casts a skill (or places a ground effect) a claim is
//! recorded under the skill id; later damage carrying that id is matched back
//! to the claim's owner for as long as the claim is retained.

mod store;


pub use store::{CorrelationStore, DEFAULT_RETENTION, SkillUsageClaim};
