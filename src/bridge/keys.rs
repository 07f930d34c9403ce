//! Push-driven key state.
//!
//! The native key monitor invokes a callback on its own thread whenever the
//! pressed-key set changes. The callback only pushes into this channel; the
//! supervisor drains it into `key-state-changed` events.

use tokio::sync::mpsc;

/// Producer half held by the native callback.
#[derive(Debug, Clone)]
pub struct KeyStateSender {
    tx: mpsc::UnboundedSender<String>,
}

/// Consumer half handed to the supervisor.
#[derive(Debug)]
pub struct KeyStateReceiver {
    pub(crate) rx: mpsc::UnboundedReceiver<String>,
}

/// Create a connected sender/receiver pair.
pub fn key_state_channel() -> (KeyStateSender, KeyStateReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (KeyStateSender { tx }, KeyStateReceiver { rx })
}

impl KeyStateSender {
    /// Push an already comma-joined key list (e.g. `"lcommand,space"`).
    /// Never blocks; returns `false` once the receiver is gone.
    pub fn push(&self, joined: impl Into<String>) -> bool {
        self.tx.send(joined.into()).is_ok()
    }

    /// Push individual key names.
    pub fn push_keys<I, S>(&self, keys: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined: Vec<String> = keys.into_iter().map(|k| k.as_ref().to_string()).collect();
        self.push(joined.join(","))
    }
}

impl KeyStateReceiver {
    /// Next pushed key list, `None` once every sender is dropped.
    pub async fn recv(&mut self) -> Option<String> {
        self.rx.recv().await
    }
}
