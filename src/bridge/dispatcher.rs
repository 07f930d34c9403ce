//! Single funnel from the polling loops to the presentation layer.
//!
//! Delivery is at-most-once and best-effort. When no presentation layer is
//! attached, or it refuses an event, the event is dropped: every signal is
//! sampled again on the next tick, so state rather than any single event is
//! the source of truth.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use super::BridgeEvent;

/// Why a sink refused an event.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("presentation layer is not ready")]
    NotReady,
    #[error("presentation layer disconnected")]
    Disconnected,
}

/// The presentation layer's receiving end.
pub trait EventSink: Send + Sync {
    /// Take one event. Must not block.
    fn deliver(&self, name: &str, payload: Value) -> Result<(), DeliveryError>;
}

/// An event as it crossed the bridge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmittedEvent {
    pub name: String,
    pub payload: Value,
}

/// Sink that forwards into a bounded tokio channel.
///
/// A full channel means the consumer is behind; the event is refused rather
/// than queued.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<EmittedEvent>,
}

impl ChannelSink {
    /// Sink and receiver holding at most `capacity` undelivered events.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<EmittedEvent>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }
}

impl EventSink for ChannelSink {
    fn deliver(&self, name: &str, payload: Value) -> Result<(), DeliveryError> {
        self.tx.try_send(EmittedEvent { name: name.to_string(), payload }).map_err(|e| match e {
            TrySendError::Full(_) => DeliveryError::NotReady,
            TrySendError::Closed(_) => DeliveryError::Disconnected,
        })
    }
}

/// Forwards events to at most one attached sink.
#[derive(Default)]
pub struct EventDispatcher {
    sink: RwLock<Option<Arc<dyn EventSink>>>,
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher").field("attached", &self.is_attached()).finish()
    }
}

impl EventDispatcher {
    /// Dispatcher with nothing attached; events are dropped until
    /// [`EventDispatcher::attach`] is called.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sink(sink: Arc<dyn EventSink>) -> Self {
        Self { sink: RwLock::new(Some(sink)) }
    }

    /// Attach the presentation layer, replacing any previous sink.
    pub fn attach(&self, sink: Arc<dyn EventSink>) {
        *self.sink.write() = Some(sink);
    }

    pub fn detach(&self) {
        *self.sink.write() = None;
    }

    pub fn is_attached(&self) -> bool {
        self.sink.read().is_some()
    }

    /// Fire and forget. Returns whether the sink accepted the event.
    pub fn emit(&self, event: &BridgeEvent) -> bool {
        self.emit_raw(event.name(), event.payload())
    }

    /// Fire and forget a named payload.
    pub fn emit_raw(&self, name: &str, payload: Value) -> bool {
        let sink = self.sink.read().clone();
        let Some(sink) = sink else {
            tracing::trace!(event = name, "No presentation layer attached, dropping event");
            return false;
        };

        match sink.deliver(name, payload) {
            Ok(()) => true,
            Err(e) => {
                tracing::trace!(event = name, error = %e, "Dropping event");
                false
            }
        }
    }
}
