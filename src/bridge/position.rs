//! Last known ghost position.
//!
//! One writer (whoever moves the ghost) and any number of readers. The
//! writer half is not `Clone`, so ownership of updates stays explicit.

use std::sync::Arc;

use parking_lot::RwLock;

use super::MousePosition;

/// Create a position cell, returning its single writer and a reader.
pub fn ghost_position() -> (GhostPositionWriter, GhostPositionReader) {
    let cell = Arc::new(RwLock::new(MousePosition::default()));
    (GhostPositionWriter { cell: Arc::clone(&cell) }, GhostPositionReader { cell })
}

/// The only handle allowed to move the ghost.
#[derive(Debug)]
pub struct GhostPositionWriter {
    cell: Arc<RwLock<MousePosition>>,
}

impl GhostPositionWriter {
    pub fn set(&self, x: f64, y: f64) {
        *self.cell.write() = MousePosition { x, y };
    }

    pub fn reader(&self) -> GhostPositionReader {
        GhostPositionReader { cell: Arc::clone(&self.cell) }
    }
}

/// Read access to the ghost position.
#[derive(Debug, Clone)]
pub struct GhostPositionReader {
    cell: Arc<RwLock<MousePosition>>,
}

impl GhostPositionReader {
    pub fn get(&self) -> MousePosition {
        *self.cell.read()
    }

    pub fn x(&self) -> f64 {
        self.get().x
    }

    pub fn y(&self) -> f64 {
        self.get().y
    }
}
