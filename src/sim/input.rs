//! Discrete input events
//!
//! The platform layer pushes press events as they arrive; the loop drains
//! the queue between ticks so nothing mutates the world mid-step.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// A single press event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Space bar / left mouse button
    Jump,
    /// Escape / window close
    Quit,
}

/// FIFO of events collected between ticks
#[derive(Debug, Clone, Default)]
pub struct InputQueue {
    pending: VecDeque<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        self.pending.push_back(event);
    }

    /// Take every queued event, oldest first
    pub fn drain(&mut self) -> impl Iterator<Item = InputEvent> + '_ {
        self.pending.drain(..)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
