use std::sync::{Arc, Mutex};

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// One arrow-key press. Each command adjusts a single velocity axis by the
/// scenario's input step; up is negative y (screen coordinates grow downward).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputCommand {
    Up,
    Down,
    Left,
    Right,
}

impl InputCommand {
    pub fn delta(self, step: f32) -> Vec2 {
        match self {
            InputCommand::Up => Vec2::new(0.0, -step),
            InputCommand::Down => Vec2::new(0.0, step),
            InputCommand::Left => Vec2::new(-step, 0.0),
            InputCommand::Right => Vec2::new(step, 0.0),
        }
    }
}

/// Commands arrive asynchronously (web handlers) and are drained by the frame
/// loop at the top of the next frame, so a press between two integration steps
/// lands entirely in the frame it precedes.
#[derive(Clone, Default)]
pub struct InputQueue {
    pending: Arc<Mutex<Vec<InputCommand>>>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, command: InputCommand) {
        let mut guard = self.pending.lock().expect("input queue lock poisoned");
        guard.push(command);
    }

    pub fn drain(&self) -> Vec<InputCommand> {
        let mut guard = self.pending.lock().expect("input queue lock poisoned");
        std::mem::take(&mut *guard)
    }
}
