//! Native-state event bridge.
//!
//! Independent, differently paced polling loops sample volatile native
//! state (pointer, shortcut id, double-tap flag, selected ghost) and turn
//! changes into a one-way, best-effort event stream for the presentation
//! layer. Key-state changes arrive push-style through [`key_state_channel`].
//!
//! ```text
//! StateSampler -> Poller (ChangeDetector) -> EventDispatcher -> EventSink
//! ```
//!
//! Loops never share state. Emissions from one loop keep their order;
//! emissions from different loops may interleave.

mod detector;
mod dispatcher;
mod event;
mod keys;
mod monitor;
mod poller;
mod position;
mod sampler;

pub use detector::{ChangeDetector, ChangeRule};
pub use dispatcher::{ChannelSink, DeliveryError, EmittedEvent, EventDispatcher, EventSink};
pub use event::{
    BridgeEvent, MousePosition, ShortcutEvent, KEY_STATE_CHANGED, MOUSE_MOVE, SHORTCUT_EVENT,
    SWITCH_GHOST,
};
pub use keys::{key_state_channel, KeyStateReceiver, KeyStateSender};
pub use monitor::MonitorSupervisor;
pub use poller::{GhostPoller, PointerPoller, Poller, ShortcutPoller};
pub use position::{ghost_position, GhostPositionReader, GhostPositionWriter};
pub use sampler::{NullSampler, SharedSampler, StateSampler};
