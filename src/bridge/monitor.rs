//! Lifecycle of the polling loops.
//!
//! Each loop is a tokio task driven by its own interval and stopped through
//! its own cancellation token. Stopping is fire-and-forget: the loop exits
//! between ticks and nobody waits for it.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::{
    BridgeEvent, EventDispatcher, GhostPoller, KeyStateReceiver, PointerPoller, Poller,
    ShortcutPoller, StateSampler,
};
use crate::core::MonitorConfig;

/// A running loop and the token that stops it.
#[derive(Debug)]
struct LoopHandle {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl LoopHandle {
    fn is_running(&self) -> bool {
        !self.token.is_cancelled() && !self.handle.is_finished()
    }

    fn stop(self) {
        self.token.cancel();
    }
}

/// Owns the pointer, shortcut, key-state and ghost-selection loops.
///
/// All `start_*` methods must be called from within a tokio runtime.
pub struct MonitorSupervisor {
    sampler: Arc<dyn StateSampler>,
    dispatcher: Arc<EventDispatcher>,
    config: MonitorConfig,
    pointer: Option<LoopHandle>,
    shortcuts: Option<LoopHandle>,
    keys: Option<LoopHandle>,
    ghost_watch: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for MonitorSupervisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonitorSupervisor")
            .field("pointer", &self.is_pointer_running())
            .field("shortcuts", &self.is_shortcut_running())
            .field("keys", &self.is_key_monitoring_running())
            .field("ghost_watch", &self.ghost_watch.is_some())
            .finish()
    }
}

impl MonitorSupervisor {
    pub fn new(
        sampler: Arc<dyn StateSampler>,
        dispatcher: Arc<EventDispatcher>,
        config: MonitorConfig,
    ) -> Self {
        Self {
            sampler,
            dispatcher,
            config,
            pointer: None,
            shortcuts: None,
            keys: None,
            ghost_watch: None,
        }
    }

    pub fn dispatcher(&self) -> &Arc<EventDispatcher> {
        &self.dispatcher
    }

    /// Start sampling the pointer. No-op while already running.
    pub fn start_pointer_monitoring(&mut self) {
        if self.pointer.as_ref().is_some_and(LoopHandle::is_running) {
            return;
        }
        let poller = PointerPoller::new(self.config.pointer_y_offset);
        self.pointer = Some(self.spawn(poller, self.config.pointer_interval()));
    }

    pub fn stop_pointer_monitoring(&mut self) {
        if let Some(handle) = self.pointer.take() {
            handle.stop();
        }
    }

    pub fn is_pointer_running(&self) -> bool {
        self.pointer.as_ref().is_some_and(LoopHandle::is_running)
    }

    /// Start sampling shortcuts and the double-tap flag. No-op while already running.
    pub fn start_shortcut_monitoring(&mut self) {
        if self.shortcuts.as_ref().is_some_and(LoopHandle::is_running) {
            return;
        }
        self.shortcuts = Some(self.spawn(ShortcutPoller::new(), self.config.shortcut_interval()));
    }

    pub fn stop_shortcut_monitoring(&mut self) {
        if let Some(handle) = self.shortcuts.take() {
            handle.stop();
        }
    }

    pub fn is_shortcut_running(&self) -> bool {
        self.shortcuts.as_ref().is_some_and(LoopHandle::is_running)
    }

    /// Start watching the externally selected ghost. The watch runs for the
    /// rest of the process and cannot be stopped; later calls are no-ops.
    pub fn start_ghost_watch(&mut self) {
        if self.ghost_watch.is_some() {
            return;
        }
        // Nobody else holds this token, so the loop is never cancelled.
        let LoopHandle { handle, .. } = self.spawn(GhostPoller::new(), self.config.ghost_interval());
        self.ghost_watch = Some(handle);
    }

    /// Forward pushed key states as `key-state-changed` events.
    ///
    /// Returns `false` (dropping `receiver`) when key monitoring is already running.
    pub fn start_key_monitoring(&mut self, mut receiver: KeyStateReceiver) -> bool {
        if self.keys.as_ref().is_some_and(LoopHandle::is_running) {
            debug!("Key monitoring already running");
            return false;
        }

        let token = CancellationToken::new();
        let stop = token.clone();
        let dispatcher = Arc::clone(&self.dispatcher);

        let handle = tokio::spawn(async move {
            info!("Key monitoring started");
            loop {
                tokio::select! {
                    biased;
                    () = stop.cancelled() => break,
                    keys = receiver.recv() => match keys {
                        Some(keys) => {
                            dispatcher.emit(&BridgeEvent::KeyStateChanged(keys));
                        }
                        None => break,
                    },
                }
            }
            info!("Key monitoring stopped");
        });

        self.keys = Some(LoopHandle { token, handle });
        true
    }

    pub fn stop_key_monitoring(&mut self) {
        if let Some(handle) = self.keys.take() {
            handle.stop();
        }
    }

    pub fn is_key_monitoring_running(&self) -> bool {
        self.keys.as_ref().is_some_and(LoopHandle::is_running)
    }

    /// Explicit ghost switch requested by the presentation layer.
    pub fn switch_ghost(&self, ghost_id: &str) {
        self.dispatcher.emit(&BridgeEvent::SwitchGhost(ghost_id.to_string()));
    }

    /// Stop every stoppable loop. The ghost watch keeps running.
    pub fn shutdown(&mut self) {
        self.stop_shortcut_monitoring();
        self.stop_key_monitoring();
        self.stop_pointer_monitoring();
    }

    fn spawn<P>(&self, poller: P, period: Duration) -> LoopHandle
    where
        P: Poller + 'static,
    {
        let token = CancellationToken::new();
        let handle = tokio::spawn(run_polling(
            poller,
            period,
            token.clone(),
            Arc::clone(&self.sampler),
            Arc::clone(&self.dispatcher),
        ));
        LoopHandle { token, handle }
    }
}

async fn run_polling<P: Poller>(
    mut poller: P,
    period: Duration,
    token: CancellationToken,
    sampler: Arc<dyn StateSampler>,
    dispatcher: Arc<EventDispatcher>,
) {
    let name = poller.name();
    info!(monitor = name, period_ms = period.as_millis() as u64, "Monitoring started");

    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            () = token.cancelled() => break,
            _ = ticker.tick() => {}
        }
        poller.poll(sampler.as_ref(), &mut |event| {
            dispatcher.emit(&event);
        });
    }

    info!(monitor = name, "Monitoring stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::{key_state_channel, ChannelSink, EmittedEvent, SharedSampler};
    use tokio::sync::mpsc::Receiver;
    use tokio::time::timeout;

    const WAIT: Duration = Duration::from_secs(2);

    fn fast_config() -> MonitorConfig {
        MonitorConfig {
            pointer_interval_ms: 5,
            shortcut_interval_ms: 5,
            ghost_interval_ms: 5,
            pointer_y_offset: 40.0,
        }
    }

    fn supervisor(
        sampler: Arc<SharedSampler>,
    ) -> (MonitorSupervisor, Receiver<EmittedEvent>) {
        let (sink, rx) = ChannelSink::channel(1024);
        let dispatcher = Arc::new(EventDispatcher::with_sink(Arc::new(sink)));
        (MonitorSupervisor::new(sampler, dispatcher, fast_config()), rx)
    }

    async fn next(rx: &mut Receiver<EmittedEvent>) -> EmittedEvent {
        timeout(WAIT, rx.recv()).await.unwrap().unwrap()
    }

    #[tokio::test]
    async fn test_pointer_loop_emits_offset_position() {
        let sampler = Arc::new(SharedSampler::new());
        sampler.set_pointer(300.0, 500.0);
        let (mut supervisor, mut rx) = supervisor(Arc::clone(&sampler));

        supervisor.start_pointer_monitoring();
        let event = next(&mut rx).await;

        assert_eq!(event.name, "mouse-move");
        assert_eq!(event.payload, serde_json::json!({"x": 300.0, "y": 460.0}));
        supervisor.shutdown();
    }

    #[tokio::test]
    async fn test_start_is_idempotent() {
        let sampler = Arc::new(SharedSampler::new());
        let (mut supervisor, mut rx) = supervisor(Arc::clone(&sampler));

        supervisor.start_pointer_monitoring();
        supervisor.start_pointer_monitoring();
        assert!(supervisor.is_pointer_running());

        // One loop means one first-sample report for an unchanged pointer.
        next(&mut rx).await;
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(rx.try_recv().is_err());
        supervisor.shutdown();
    }

    #[tokio::test]
    async fn test_stop_then_restart() {
        let sampler = Arc::new(SharedSampler::new());
        let (mut supervisor, mut rx) = supervisor(Arc::clone(&sampler));

        supervisor.start_pointer_monitoring();
        next(&mut rx).await;
        supervisor.stop_pointer_monitoring();
        assert!(!supervisor.is_pointer_running());

        tokio::time::sleep(Duration::from_millis(30)).await;
        sampler.set_pointer(1.0, 1.0);
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(rx.try_recv().is_err());

        supervisor.start_pointer_monitoring();
        assert_eq!(next(&mut rx).await.name, "mouse-move");
        supervisor.shutdown();
    }

    #[tokio::test]
    async fn test_shortcut_loop() {
        let sampler = Arc::new(SharedSampler::new());
        let (mut supervisor, mut rx) = supervisor(Arc::clone(&sampler));

        supervisor.start_shortcut_monitoring();
        sampler.trigger_shortcut(4);
        assert_eq!(next(&mut rx).await.payload, serde_json::json!("pushSC4"));

        sampler.trigger_double_tap();
        assert_eq!(next(&mut rx).await.payload, serde_json::json!("pushSub"));

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(rx.try_recv().is_err());
        supervisor.shutdown();
        assert!(!supervisor.is_shortcut_running());
    }

    #[tokio::test]
    async fn test_ghost_watch() {
        let sampler = Arc::new(SharedSampler::new());
        sampler.select_ghost("cat");
        let (mut supervisor, mut rx) = supervisor(Arc::clone(&sampler));

        supervisor.start_ghost_watch();
        supervisor.start_ghost_watch();
        let event = next(&mut rx).await;
        assert_eq!(event.name, "switch-ghost");
        assert_eq!(event.payload, serde_json::json!("cat"));

        sampler.select_ghost("dog");
        assert_eq!(next(&mut rx).await.payload, serde_json::json!("dog"));
    }

    #[tokio::test]
    async fn test_key_monitoring_forwards_pushes() {
        let sampler = Arc::new(SharedSampler::new());
        let (mut supervisor, mut rx) = supervisor(sampler);
        let (keys, receiver) = key_state_channel();

        assert!(supervisor.start_key_monitoring(receiver));
        let (_, second) = key_state_channel();
        assert!(!supervisor.start_key_monitoring(second));

        keys.push_keys(["lshift", "a"]);
        let event = next(&mut rx).await;
        assert_eq!(event.name, "key-state-changed");
        assert_eq!(event.payload, serde_json::json!("lshift,a"));

        supervisor.stop_key_monitoring();
        assert!(!supervisor.is_key_monitoring_running());
    }

    #[tokio::test]
    async fn test_switch_ghost_request() {
        let sampler = Arc::new(SharedSampler::new());
        let (supervisor, mut rx) = supervisor(sampler);

        supervisor.switch_ghost("owl");
        let event = next(&mut rx).await;
        assert_eq!(event.name, "switch-ghost");
        assert_eq!(event.payload, serde_json::json!("owl"));
    }
}
