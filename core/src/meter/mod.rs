//! Live meter wiring.
//!
//! [`LiveMeter`] connects a [`TrackingSession`] to a running host: it refreshes
//! the local player identity before each event, hands out a before-send
//! observer for outgoing intents, and owns the refresh task that renders
//! snapshots while tracking.
//!
//! The session sits behind a mutex shared by the event path and the refresh
//! task. The lock is only held for one synchronous session call at a time and
//! never across an `.await`.

mod identity;
mod sink;


pub use identity::{IdentityProvider, SharedIdentity};
pub use sink::{LatestSnapshot, SnapshotSink};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use dpsmeter_types::{MeterConfig, MeterSnapshot};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::attribution::Attribution;
use crate::feed::{DamageEvent, FeedEvent, GroundSkillPlaced, OutgoingIntent};
use crate::session::TrackingSession;

type SessionHandle = Arc<Mutex<TrackingSession>>;

fn lock(session: &SessionHandle) -> MutexGuard<'_, TrackingSession> {
    // A panic mid-update leaves at worst a partially counted hit
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Current time on the runtime clock (follows tokio's paused clock in tests).
fn now() -> std::time::Instant {
    tokio::time::Instant::now().into_std()
}

pub struct LiveMeter {
    session: SessionHandle,
    identity: Arc<dyn IdentityProvider>,
    sink: Arc<dyn SnapshotSink>,
    visible: Arc<AtomicBool>,
    refresh_interval: Duration,
    refresh_task: Option<JoinHandle<()>>,
}

impl LiveMeter {
    pub fn new(
        session: TrackingSession,
        identity: Arc<dyn IdentityProvider>,
        sink: Arc<dyn SnapshotSink>,
        config: &MeterConfig,
    ) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            identity,
            sink,
            visible: Arc::new(AtomicBool::new(config.show_on_start)),
            refresh_interval: Duration::from_millis(config.refresh_interval_ms.max(1)),
            refresh_task: None,
        }
    }

    pub fn is_active(&self) -> bool {
        lock(&self.session).is_active()
    }

    // --- Lifecycle ---

    /// Start tracking and the refresh task. Returns false if already tracking.
    pub fn start(&mut self) -> bool {
        let started = lock(&self.session).start(now());
        if started {
            self.abort_refresh();
            self.refresh_task = Some(self.spawn_refresh());
        }
        started
    }

    /// Stop tracking, cancel the refresh task and render the final values.
    pub async fn stop(&mut self) -> bool {
        let stopped = lock(&self.session).stop(now());
        if let Some(handle) = self.refresh_task.take() {
            handle.abort();
            let _ = handle.await;
        }
        if stopped {
            self.render_now();
        }
        stopped
    }

    /// Clear stats. An active session renders its final values, then keeps
    /// its refresh task and restarts its clock. An idle one renders the
    /// cleared values once.
    pub fn reset(&mut self) {
        if self.is_active() {
            self.render_now();
        }
        let active = {
            let mut session = lock(&self.session);
            session.reset(now());
            session.is_active()
        };
        if !active {
            self.render_now();
        }
    }

    /// Flip meter visibility. Returns the new visibility.
    pub fn toggle_visibility(&self) -> bool {
        let visible = !self.visible.fetch_xor(true, Ordering::SeqCst);
        tracing::debug!(visible, "meter visibility toggled");
        if visible {
            self.render_now();
        }
        visible
    }

    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }

    // --- Event Path ---

    pub fn handle_damage(&self, event: &DamageEvent) -> Option<Attribution> {
        let mut session = lock(&self.session);
        session.set_local_player(self.identity.local_player_id());
        session.handle_damage(event, now())
    }

    pub fn handle_ground_skill(&self, placed: &GroundSkillPlaced) {
        let mut session = lock(&self.session);
        session.set_local_player(self.identity.local_player_id());
        session.observe_ground_skill(placed, now());
    }

    pub fn observe_intent(&self, intent: &OutgoingIntent) {
        let mut session = lock(&self.session);
        session.set_local_player(self.identity.local_player_id());
        session.observe_intent(intent, now());
    }

    /// Route a feed event. Identity events go through the provider, so they
    /// stick only when the provider accepts updates.
    pub fn handle_feed_event(&self, event: &FeedEvent) {
        if let FeedEvent::Identity { player_id } = event
            && !self.identity.update(Some(*player_id))
        {
            tracing::warn!(player_id = *player_id, "identity event ignored: identity provider is fixed");
            return;
        }
        let mut session = lock(&self.session);
        session.set_local_player(self.identity.local_player_id());
        if !matches!(event, FeedEvent::Identity { .. }) {
            session.handle_feed_event(event, now());
        }
    }

    /// Observer for the host's before-send [`HookList`](crate::hooks::HookList).
    pub fn send_hook(&self) -> impl FnMut(&OutgoingIntent) + Send + 'static {
        let session = Arc::clone(&self.session);
        let identity = Arc::clone(&self.identity);
        move |intent: &OutgoingIntent| {
            let mut session = lock(&session);
            session.set_local_player(identity.local_player_id());
            session.observe_intent(intent, now());
        }
    }

    // --- Rendering ---

    pub fn snapshot(&self) -> MeterSnapshot {
        lock(&self.session).snapshot(now())
    }

    fn render_now(&self) {
        if self.is_visible() {
            self.sink.render(&self.snapshot());
        }
    }

    fn spawn_refresh(&self) -> JoinHandle<()> {
        let session = Arc::clone(&self.session);
        let sink = Arc::clone(&self.sink);
        let visible = Arc::clone(&self.visible);
        let period = self.refresh_interval;

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                if !visible.load(Ordering::SeqCst) {
                    continue;
                }
                let snapshot = lock(&session).snapshot(now());
                sink.render(&snapshot);
            }
        })
    }

    fn abort_refresh(&mut self) {
        if let Some(handle) = self.refresh_task.take() {
            handle.abort();
        }
    }
}

impl Drop for LiveMeter {
    fn drop(&mut self) {
        self.abort_refresh();
    }
}
