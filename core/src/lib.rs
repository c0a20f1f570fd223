pub mod attribution;
pub mod context;
pub mod correlation;
pub mod feed;
pub mod game_data;
pub mod hooks;
pub mod ledger;
pub mod meter;
pub mod session;

// Re-exports for convenience
pub use attribution::{Attribution, AttributionEngine};
pub use context::{ConfigError, MeterConfig, MeterConfigExt};
pub use correlation::{CorrelationStore, SkillUsageClaim};
pub use feed::{
    DamageEvent, DamageKind, EntityId, FeedEvent, FeedRecord, GroundSkillPlaced, IntentKind,
    OutgoingIntent, SkillId,
};
pub use game_data::{BuiltinSkills, CatalogError, SkillCatalog, SkillTable};
pub use hooks::{HookId, HookList};
pub use ledger::{AggregationLedger, SkillStat};
pub use meter::{IdentityProvider, LatestSnapshot, LiveMeter, SharedIdentity, SnapshotSink};
pub use session::{SessionState, TrackingSession};
pub use dpsmeter_types::{MeterSnapshot, SkillRow};
