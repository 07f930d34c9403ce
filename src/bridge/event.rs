//! Events delivered to the presentation layer.
//!
//! Event names and payload shapes are the wire contract with the front end.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Pointer moved.
pub const MOUSE_MOVE: &str = "mouse-move";
/// Shortcut or double-tap fired.
pub const SHORTCUT_EVENT: &str = "shortcut-event";
/// Selected ghost changed.
pub const SWITCH_GHOST: &str = "switch-ghost";
/// Pressed-key set changed.
pub const KEY_STATE_CHANGED: &str = "key-state-changed";

/// Screen position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MousePosition {
    pub x: f64,
    pub y: f64,
}

/// Semantic tag for a shortcut press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShortcutEvent {
    #[serde(rename = "pushSC1")]
    PushSc1,
    #[serde(rename = "pushSC2")]
    PushSc2,
    #[serde(rename = "pushSC3")]
    PushSc3,
    #[serde(rename = "pushSC4")]
    PushSc4,
    #[serde(rename = "unknown")]
    Unknown,
    /// Modifier double-tap.
    #[serde(rename = "pushSub")]
    PushSub,
}

impl ShortcutEvent {
    /// Map a positive native shortcut id to its tag. Ids outside 1..=4
    /// become [`ShortcutEvent::Unknown`].
    pub fn classify(id: i32) -> Self {
        match id {
            1 => Self::PushSc1,
            2 => Self::PushSc2,
            3 => Self::PushSc3,
            4 => Self::PushSc4,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PushSc1 => "pushSC1",
            Self::PushSc2 => "pushSC2",
            Self::PushSc3 => "pushSC3",
            Self::PushSc4 => "pushSC4",
            Self::Unknown => "unknown",
            Self::PushSub => "pushSub",
        }
    }
}

impl std::fmt::Display for ShortcutEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A detected state change.
#[derive(Debug, Clone, PartialEq)]
pub enum BridgeEvent {
    /// Pointer position, y already offset.
    MouseMove(MousePosition),
    Shortcut(ShortcutEvent),
    SwitchGhost(String),
    /// Comma-joined names of the pressed keys.
    KeyStateChanged(String),
}

impl BridgeEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::MouseMove(_) => MOUSE_MOVE,
            Self::Shortcut(_) => SHORTCUT_EVENT,
            Self::SwitchGhost(_) => SWITCH_GHOST,
            Self::KeyStateChanged(_) => KEY_STATE_CHANGED,
        }
    }

    pub fn payload(&self) -> Value {
        match self {
            Self::MouseMove(pos) => json!({ "x": pos.x, "y": pos.y }),
            Self::Shortcut(tag) => Value::from(tag.as_str()),
            Self::SwitchGhost(id) => Value::from(id.as_str()),
            Self::KeyStateChanged(keys) => Value::from(keys.as_str()),
        }
    }
}
