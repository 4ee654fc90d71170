//! Scene model: cards, frames, connections, selection, and grid records.
//!
//! This module defines the entities that live on the canvas, the
//! [`Selection`] sets, and the [`Scene`] that owns them together with the
//! insert/remove/find primitives every higher layer uses. Draw order is
//! storage order: the last card in `cards` is drawn on top and hit first.
//!
//! Removal always purges selection membership, so a selection set never
//! names an entity that is not in the scene. Connections may outlive their
//! endpoint cards when loaded from storage; iteration helpers skip them
//! instead of repairing them.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::camera::{Camera, Point};
use crate::error::CanvasError;
use crate::geometry::{Rect, union_all};

pub use crate::geometry::Anchor;

/// Unique identifier for a card, frame, connection or grid.
pub type EntityId = Uuid;

// =============================================================
// Entities
// =============================================================

/// A rectangular text note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: EntityId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub text: String,
    pub color: String,
}

impl Card {
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn set_rect(&mut self, r: Rect) {
        self.x = r.x;
        self.y = r.y;
        self.width = r.width;
        self.height = r.height;
    }

    pub fn set_origin(&mut self, p: Point) {
        self.x = p.x;
        self.y = p.y;
    }
}

/// A rectangular grouping region, also a presentation step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub id: EntityId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub label: String,
    pub order: i64,
}

impl Frame {
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn set_rect(&mut self, r: Rect) {
        self.x = r.x;
        self.y = r.y;
        self.width = r.width;
        self.height = r.height;
    }

    pub fn set_origin(&mut self, p: Point) {
        self.x = p.x;
        self.y = p.y;
    }
}

/// A directed link between two card anchors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub id: EntityId,
    pub from_card_id: EntityId,
    pub to_card_id: EntityId,
    pub from_anchor: Anchor,
    pub to_anchor: Anchor,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Connection {
    /// Whether this connection links `a` and `b` in either direction.
    #[must_use]
    pub fn links(&self, a: EntityId, b: EntityId) -> bool {
        (self.from_card_id == a && self.to_card_id == b) || (self.from_card_id == b && self.to_card_id == a)
    }

    /// Whether `card` is either endpoint.
    #[must_use]
    pub fn touches(&self, card: EntityId) -> bool {
        self.from_card_id == card || self.to_card_id == card
    }
}

/// Which kind of rectangular entity a gesture targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityRef {
    Card(EntityId),
    Frame(EntityId),
}

// =============================================================
// Selection
// =============================================================

/// Three independent selection sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub cards: HashSet<EntityId>,
    pub frames: HashSet<EntityId>,
    pub connections: HashSet<EntityId>,
}

impl Selection {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty() && self.frames.is_empty() && self.connections.is_empty()
    }

    pub fn clear(&mut self) {
        self.cards.clear();
        self.frames.clear();
        self.connections.clear();
    }

    /// Select exactly one card.
    pub fn select_card(&mut self, id: EntityId) {
        self.clear();
        self.cards.insert(id);
    }

    /// Select exactly one frame.
    pub fn select_frame(&mut self, id: EntityId) {
        self.clear();
        self.frames.insert(id);
    }

    /// Select exactly one connection.
    pub fn select_connection(&mut self, id: EntityId) {
        self.clear();
        self.connections.insert(id);
    }

    /// Shift-click on a card: toggle it within the card set and drop the
    /// other kinds.
    pub fn toggle_card(&mut self, id: EntityId) {
        self.frames.clear();
        self.connections.clear();
        if !self.cards.remove(&id) {
            self.cards.insert(id);
        }
    }

    /// Shift-click on a frame.
    pub fn toggle_frame(&mut self, id: EntityId) {
        self.cards.clear();
        self.connections.clear();
        if !self.frames.remove(&id) {
            self.frames.insert(id);
        }
    }

    /// Shift-click on a connection.
    pub fn toggle_connection(&mut self, id: EntityId) {
        self.cards.clear();
        self.frames.clear();
        if !self.connections.remove(&id) {
            self.connections.insert(id);
        }
    }

    /// Remove `id` from every set.
    pub fn forget(&mut self, id: EntityId) {
        self.cards.remove(&id);
        self.frames.remove(&id);
        self.connections.remove(&id);
    }

    /// Total number of selected entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len() + self.frames.len() + self.connections.len()
    }
}

// =============================================================
// Scene
// =============================================================

/// In-memory entity graph of one grid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Cards in draw order (last is topmost).
    pub cards: Vec<Card>,
    /// Frames in draw order.
    pub frames: Vec<Frame>,
    /// Connections in draw order.
    pub connections: Vec<Connection>,
    /// Current selection; never persisted.
    #[serde(skip)]
    pub selection: Selection,
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Cards ---

    /// Append a card on top of the z-order. An existing card with the same id
    /// is replaced in place.
    pub fn insert_card(&mut self, card: Card) {
        if let Some(existing) = self.card_mut(card.id) {
            *existing = card;
        } else {
            self.cards.push(card);
        }
    }

    #[must_use]
    pub fn card(&self, id: EntityId) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    pub fn card_mut(&mut self, id: EntityId) -> Option<&mut Card> {
        self.cards.iter_mut().find(|c| c.id == id)
    }

    /// Remove a card and purge it from the selection. Connections attached to
    /// it are left alone; see [`Scene::remove_cards_cascade`].
    pub fn remove_card(&mut self, id: EntityId) -> Option<Card> {
        let idx = self.cards.iter().position(|c| c.id == id)?;
        self.selection.forget(id);
        Some(self.cards.remove(idx))
    }

    /// Remove cards together with every connection touching them.
    pub fn remove_cards_cascade(&mut self, ids: &HashSet<EntityId>) -> usize {
        let before = self.cards.len();
        self.cards.retain(|c| !ids.contains(&c.id));
        let dropped: Vec<EntityId> = self
            .connections
            .iter()
            .filter(|conn| ids.iter().any(|id| conn.touches(*id)))
            .map(|conn| conn.id)
            .collect();
        for id in &dropped {
            self.remove_connection(*id);
        }
        for id in ids {
            self.selection.forget(*id);
        }
        before - self.cards.len()
    }

    /// Move the given cards to the top of the z-order, keeping their
    /// relative order.
    pub fn bring_cards_to_front(&mut self, ids: &HashSet<EntityId>) {
        let (mut raised, kept): (Vec<Card>, Vec<Card>) = self.cards.drain(..).partition(|c| ids.contains(&c.id));
        self.cards = kept;
        self.cards.append(&mut raised);
    }

    // --- Frames ---

    pub fn insert_frame(&mut self, frame: Frame) {
        if let Some(existing) = self.frame_mut(frame.id) {
            *existing = frame;
        } else {
            self.frames.push(frame);
        }
    }

    #[must_use]
    pub fn frame(&self, id: EntityId) -> Option<&Frame> {
        self.frames.iter().find(|f| f.id == id)
    }

    pub fn frame_mut(&mut self, id: EntityId) -> Option<&mut Frame> {
        self.frames.iter_mut().find(|f| f.id == id)
    }

    pub fn remove_frame(&mut self, id: EntityId) -> Option<Frame> {
        let idx = self.frames.iter().position(|f| f.id == id)?;
        self.selection.forget(id);
        Some(self.frames.remove(idx))
    }

    /// Ids of the cards lying entirely inside `frame`.
    #[must_use]
    pub fn cards_in_frame(&self, frame: &Frame) -> Vec<EntityId> {
        let r = frame.rect();
        self.cards.iter().filter(|c| r.contains_rect(&c.rect())).map(|c| c.id).collect()
    }

    /// Frames in presentation order: ascending `order`, ties by z-order.
    #[must_use]
    pub fn frames_in_order(&self) -> Vec<&Frame> {
        let mut frames: Vec<&Frame> = self.frames.iter().collect();
        frames.sort_by_key(|f| f.order);
        frames
    }

    /// One past the highest frame order in use.
    #[must_use]
    pub fn next_frame_order(&self) -> i64 {
        self.frames.iter().map(|f| f.order).max().map_or(1, |o| o + 1)
    }

    // --- Connections ---

    /// Validate and insert a new connection.
    ///
    /// # Errors
    ///
    /// Rejects self-links, links to missing cards, and a second link between
    /// the same two cards in either direction.
    pub fn connect(&mut self, conn: Connection) -> Result<EntityId, CanvasError> {
        if conn.from_card_id == conn.to_card_id {
            return Err(CanvasError::SelfConnection(conn.from_card_id));
        }
        for id in [conn.from_card_id, conn.to_card_id] {
            if self.card(id).is_none() {
                return Err(CanvasError::CardNotFound(id));
            }
        }
        if self.connection_between(conn.from_card_id, conn.to_card_id).is_some() {
            return Err(CanvasError::DuplicateConnection { from: conn.from_card_id, to: conn.to_card_id });
        }
        let id = conn.id;
        self.connections.push(conn);
        Ok(id)
    }

    #[must_use]
    pub fn connection(&self, id: EntityId) -> Option<&Connection> {
        self.connections.iter().find(|c| c.id == id)
    }

    pub fn connection_mut(&mut self, id: EntityId) -> Option<&mut Connection> {
        self.connections.iter_mut().find(|c| c.id == id)
    }

    pub fn remove_connection(&mut self, id: EntityId) -> Option<Connection> {
        let idx = self.connections.iter().position(|c| c.id == id)?;
        self.selection.forget(id);
        Some(self.connections.remove(idx))
    }

    /// The connection linking `a` and `b` in either direction, if any.
    #[must_use]
    pub fn connection_between(&self, a: EntityId, b: EntityId) -> Option<&Connection> {
        self.connections.iter().find(|c| c.links(a, b))
    }

    /// Connections whose endpoint cards both exist, paired with their
    /// endpoint rectangles. Dangling connections are skipped.
    #[must_use]
    pub fn live_connections(&self) -> Vec<(&Connection, Rect, Rect)> {
        self.connections
            .iter()
            .filter_map(|conn| {
                let from = self.card(conn.from_card_id)?;
                let to = self.card(conn.to_card_id)?;
                Some((conn, from.rect(), to.rect()))
            })
            .collect()
    }

    // --- Whole scene ---

    /// Union bounds of every card and frame.
    #[must_use]
    pub fn content_bounds(&self) -> Option<Rect> {
        union_all(self.cards.iter().map(Card::rect).chain(self.frames.iter().map(Frame::rect)))
    }

    /// Bounds of a card or frame by id.
    #[must_use]
    pub fn entity_rect(&self, entity: EntityRef) -> Option<Rect> {
        match entity {
            EntityRef::Card(id) => self.card(id).map(Card::rect),
            EntityRef::Frame(id) => self.frame(id).map(Frame::rect),
        }
    }

    /// Drop selection entries whose entity no longer exists.
    pub fn prune_selection(&mut self) {
        let cards: HashSet<EntityId> = self.cards.iter().map(|c| c.id).collect();
        let frames: HashSet<EntityId> = self.frames.iter().map(|f| f.id).collect();
        let conns: HashSet<EntityId> = self.connections.iter().map(|c| c.id).collect();
        self.selection.cards.retain(|id| cards.contains(id));
        self.selection.frames.retain(|id| frames.contains(id));
        self.selection.connections.retain(|id| conns.contains(id));
    }
}

// =============================================================
// Grids & workspace
// =============================================================

/// One canvas page: its scene and its camera.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    pub id: EntityId,
    pub name: String,
    #[serde(flatten)]
    pub scene: Scene,
    #[serde(default)]
    pub camera: Camera,
}

impl Grid {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self { id: Uuid::new_v4(), name: name.to_string(), scene: Scene::new(), camera: Camera::default() }
    }
}

/// The unit of persistence: all grids plus which one is active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    pub grids: Vec<Grid>,
    pub active_grid_id: EntityId,
}

impl Default for Workspace {
    fn default() -> Self {
        let grid = Grid::new("Main");
        Self { active_grid_id: grid.id, grids: vec![grid] }
    }
}

impl Workspace {
    #[must_use]
    pub fn grid(&self, id: EntityId) -> Option<&Grid> {
        self.grids.iter().find(|g| g.id == id)
    }

    pub fn grid_mut(&mut self, id: EntityId) -> Option<&mut Grid> {
        self.grids.iter_mut().find(|g| g.id == id)
    }
}
