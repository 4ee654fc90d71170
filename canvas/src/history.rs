//! Snapshot-based undo/redo.
//!
//! A [`Snapshot`] is a deep copy of the scene's entities plus its selection.
//! Mutating commands capture one before they change anything and push it;
//! undo swaps the current state for the newest snapshot and parks the
//! current state on the redo stack.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use std::collections::{HashSet, VecDeque};

use crate::doc::{Card, Connection, EntityId, Frame, Scene};

/// Deep copy of a scene with its selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub cards: Vec<Card>,
    pub selected_card_ids: HashSet<EntityId>,
    pub frames: Vec<Frame>,
    pub selected_frame_ids: HashSet<EntityId>,
    pub connections: Vec<Connection>,
    pub selected_connection_ids: HashSet<EntityId>,
}

impl Snapshot {
    #[must_use]
    pub fn capture(scene: &Scene) -> Self {
        Self {
            cards: scene.cards.clone(),
            selected_card_ids: scene.selection.cards.clone(),
            frames: scene.frames.clone(),
            selected_frame_ids: scene.selection.frames.clone(),
            connections: scene.connections.clone(),
            selected_connection_ids: scene.selection.connections.clone(),
        }
    }

    /// Overwrite `scene` with this snapshot.
    pub fn restore(self, scene: &mut Scene) {
        scene.cards = self.cards;
        scene.frames = self.frames;
        scene.connections = self.connections;
        scene.selection.cards = self.selected_card_ids;
        scene.selection.frames = self.selected_frame_ids;
        scene.selection.connections = self.selected_connection_ids;
    }

    /// Whether the entities (not the selection) of `scene` differ from this
    /// snapshot. Z-order changes count.
    #[must_use]
    pub fn differs_from(&self, scene: &Scene) -> bool {
        self.cards != scene.cards || self.frames != scene.frames || self.connections != scene.connections
    }
}

/// Bounded undo and redo stacks.
#[derive(Debug, Clone)]
pub struct History {
    undo: VecDeque<Snapshot>,
    redo: Vec<Snapshot>,
    limit: usize,
}

impl History {
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self { undo: VecDeque::new(), redo: Vec::new(), limit: limit.max(1) }
    }

    /// Record a pre-mutation state. Evicts the oldest entry past the limit
    /// and invalidates the redo stack.
    pub fn push(&mut self, snapshot: Snapshot) {
        self.undo.push_back(snapshot);
        while self.undo.len() > self.limit {
            self.undo.pop_front();
        }
        self.redo.clear();
    }

    /// Step back: `current` goes to the redo stack, the newest snapshot comes
    /// out. `None` when there is nothing to undo.
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let previous = self.undo.pop_back()?;
        self.redo.push(current);
        Some(previous)
    }

    /// Step forward, the mirror of [`History::undo`].
    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.redo.pop()?;
        self.undo.push_back(current);
        while self.undo.len() > self.limit {
            self.undo.pop_front();
        }
        Some(next)
    }

    /// Drop the newest undo entry without touching redo.
    pub fn discard_latest(&mut self) -> Option<Snapshot> {
        self.undo.pop_back()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Number of undo entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.undo.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.undo.is_empty()
    }

    #[must_use]
    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }
}
