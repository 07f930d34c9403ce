//! One tick of each polling loop.
//!
//! A poller samples its signals, runs them through its own detectors, and
//! emits whatever changed. It owns all of its state, so loops never share
//! anything but the sampler.

use tracing::{debug, info};

use super::{BridgeEvent, ChangeDetector, MousePosition, ShortcutEvent, StateSampler};

/// A single loop's per-tick work.
pub trait Poller: Send {
    /// Loop name for logging.
    fn name(&self) -> &'static str;

    /// Sample once, calling `emit` for each detected change in order.
    fn poll(&mut self, sampler: &dyn StateSampler, emit: &mut dyn FnMut(BridgeEvent));
}

/// Pointer position, reported when it moves.
#[derive(Debug)]
pub struct PointerPoller {
    y_offset: f64,
    detector: ChangeDetector<MousePosition>,
}

impl PointerPoller {
    pub fn new(y_offset: f64) -> Self {
        Self { y_offset, detector: ChangeDetector::new() }
    }
}

impl Poller for PointerPoller {
    fn name(&self) -> &'static str {
        "pointer"
    }

    fn poll(&mut self, sampler: &dyn StateSampler, emit: &mut dyn FnMut(BridgeEvent)) {
        let position =
            MousePosition { x: sampler.pointer_x(), y: sampler.pointer_y() - self.y_offset };
        if self.detector.observe(position) {
            emit(BridgeEvent::MouseMove(position));
        }
    }
}

/// Shortcut presses and the modifier double-tap.
#[derive(Debug)]
pub struct ShortcutPoller {
    shortcut: ChangeDetector<i32>,
    double_tap: ChangeDetector<bool>,
}

impl Default for ShortcutPoller {
    fn default() -> Self {
        Self::new()
    }
}

impl ShortcutPoller {
    pub fn new() -> Self {
        Self { shortcut: ChangeDetector::shortcut(), double_tap: ChangeDetector::double_tap() }
    }
}

impl Poller for ShortcutPoller {
    fn name(&self) -> &'static str {
        "shortcut"
    }

    fn poll(&mut self, sampler: &dyn StateSampler, emit: &mut dyn FnMut(BridgeEvent)) {
        let id = sampler.last_shortcut_id();
        if self.shortcut.observe(id) {
            let tag = ShortcutEvent::classify(id);
            debug!(id, tag = %tag, "Shortcut detected");
            emit(BridgeEvent::Shortcut(tag));
        }

        if self.double_tap.observe(sampler.double_tap_pressed()) {
            debug!("Double-tap detected");
            emit(BridgeEvent::Shortcut(ShortcutEvent::PushSub));
            sampler.reset_double_tap();
        }
    }
}

/// Externally selected ghost, reported when it changes.
#[derive(Debug, Default)]
pub struct GhostPoller {
    detector: ChangeDetector<String>,
}

impl GhostPoller {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Poller for GhostPoller {
    fn name(&self) -> &'static str {
        "ghost-selection"
    }

    fn poll(&mut self, sampler: &dyn StateSampler, emit: &mut dyn FnMut(BridgeEvent)) {
        let id = sampler.selected_ghost_id();
        if self.detector.observe(id.clone()) {
            info!(ghost = %id, "Ghost changed");
            emit(BridgeEvent::SwitchGhost(id));
        }
    }
}
