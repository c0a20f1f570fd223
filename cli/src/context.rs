use std::sync::Arc;

use dpsmeter_core::{
    HookList, IdentityProvider, LatestSnapshot, LiveMeter, MeterConfig, MeterConfigExt, OutgoingIntent,
    SharedIdentity, TrackingSession,
};
use tokio::sync::{Mutex, RwLock};

/// Holds all shared state for the CLI application.
/// This is a lightweight container - logic lives in the meter and session types.
#[derive(Clone)]
pub struct CliContext {
    pub config: Arc<RwLock<MeterConfig>>,
    pub meter: Arc<Mutex<LiveMeter>>,
    /// Before-send hooks for locally issued intents
    pub send_hooks: Arc<Mutex<HookList<OutgoingIntent>>>,
    pub identity: SharedIdentity,
    pub latest: Arc<LatestSnapshot>,
}

impl CliContext {
    pub fn new() -> Self {
        let config = MeterConfig::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to load config, using defaults");
            MeterConfig::default()
        });
        Self::with_config(config)
    }

    pub fn with_config(config: MeterConfig) -> Self {
        let identity = SharedIdentity::new(config.local_player_id);
        let latest = Arc::new(LatestSnapshot::new());
        let session = TrackingSession::from_config(&config, config.skill_catalog());
        let meter = LiveMeter::new(
            session,
            Arc::new(identity.clone()),
            Arc::clone(&latest) as _,
            &config,
        );

        let mut send_hooks = HookList::new();
        send_hooks.register(meter.send_hook());

        Self {
            config: Arc::new(RwLock::new(config)),
            meter: Arc::new(Mutex::new(meter)),
            send_hooks: Arc::new(Mutex::new(send_hooks)),
            identity,
            latest,
        }
    }

    /// Local player id as the meter currently sees it.
    pub fn identity_id(&self) -> Option<u32> {
        self.identity.local_player_id()
    }
}

impl Default for CliContext {
    fn default() -> Self {
        Self::new()
    }
}
