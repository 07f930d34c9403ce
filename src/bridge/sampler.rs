//! Access to volatile native input state.

use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

use parking_lot::Mutex;

/// Synchronous, non-blocking reads of native input state.
///
/// Implementations never fail: when the underlying capability is missing
/// they return neutral values (`0.0`, `0`, `false`, empty string).
///
/// The shortcut id is expected to be reset to `0` by the native layer once
/// it has been read, so every positive read is a fresh shortcut press. The
/// double-tap flag is not self-resetting; callers acknowledge it with
/// [`StateSampler::reset_double_tap`].
pub trait StateSampler: Send + Sync {
    /// Pointer x in screen coordinates.
    fn pointer_x(&self) -> f64;

    /// Pointer y in screen coordinates.
    fn pointer_y(&self) -> f64;

    /// Id of the last triggered shortcut, `0` when none.
    fn last_shortcut_id(&self) -> i32;

    /// Whether the modifier double-tap has fired since the last reset.
    fn double_tap_pressed(&self) -> bool;

    /// Acknowledge a double-tap so it is reported once.
    fn reset_double_tap(&self);

    /// Id of the ghost selected outside the application, empty when none.
    fn selected_ghost_id(&self) -> String;
}

/// Sampler for platforms without native input support.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSampler;

impl StateSampler for NullSampler {
    fn pointer_x(&self) -> f64 {
        0.0
    }

    fn pointer_y(&self) -> f64 {
        0.0
    }

    fn last_shortcut_id(&self) -> i32 {
        0
    }

    fn double_tap_pressed(&self) -> bool {
        false
    }

    fn reset_double_tap(&self) {}

    fn selected_ghost_id(&self) -> String {
        String::new()
    }
}

/// In-process state cell written by a native input layer and read by the
/// bridge's polling loops.
///
/// Reading the shortcut id consumes it, matching the native layer's
/// reset-after-read behaviour.
#[derive(Debug, Default)]
pub struct SharedSampler {
    pointer: Mutex<(f64, f64)>,
    shortcut_id: AtomicI32,
    double_tap: AtomicBool,
    ghost_id: Mutex<String>,
}

impl SharedSampler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_pointer(&self, x: f64, y: f64) {
        *self.pointer.lock() = (x, y);
    }

    pub fn trigger_shortcut(&self, id: i32) {
        self.shortcut_id.store(id, Ordering::SeqCst);
    }

    pub fn trigger_double_tap(&self) {
        self.double_tap.store(true, Ordering::SeqCst);
    }

    pub fn select_ghost(&self, id: impl Into<String>) {
        *self.ghost_id.lock() = id.into();
    }
}

impl StateSampler for SharedSampler {
    fn pointer_x(&self) -> f64 {
        self.pointer.lock().0
    }

    fn pointer_y(&self) -> f64 {
        self.pointer.lock().1
    }

    fn last_shortcut_id(&self) -> i32 {
        self.shortcut_id.swap(0, Ordering::SeqCst)
    }

    fn double_tap_pressed(&self) -> bool {
        self.double_tap.load(Ordering::SeqCst)
    }

    fn reset_double_tap(&self) {
        self.double_tap.store(false, Ordering::SeqCst);
    }

    fn selected_ghost_id(&self) -> String {
        self.ghost_id.lock().clone()
    }
}
