use crate::api::types::GameEvent;

/// Double-buffered event queue.
///
/// Events emitted during a tick are held back until the scheduler publishes
/// them after the reap phase; readers see them for the whole next tick. This
/// keeps delivery order independent of which entity happened to update first.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    pending: Vec<GameEvent>,
    published: Vec<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.pending.push(event);
    }

    /// Make everything emitted since the last publish visible, replacing the
    /// previously published batch.
    pub fn publish(&mut self) {
        self.published = std::mem::take(&mut self.pending);
    }

    /// Events published at the end of the previous tick.
    pub fn published(&self) -> &[GameEvent] {
        &self.published
    }

    /// Events emitted this tick, not yet visible to readers.
    pub fn pending(&self) -> &[GameEvent] {
        &self.pending
    }

    pub fn clear(&mut self) {
        self.pending.clear();
        self.published.clear();
    }
}
