//! Commands that are not pointer gestures.
//!
//! Card and frame editing, deletion, clipboard, nudging, undo/redo, camera
//! jumps, presentation and grid management. Every mutating command follows
//! the same sequence: capture a [`Snapshot`], mutate the scene, push the
//! snapshot, then report [`Action::WorkspaceChanged`] and request a redraw.
//! Commands that find nothing to act on leave history untouched.

#[cfg(test)]
#[path = "commands_test.rs"]
mod commands_test;

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::camera::{Camera, Point};
use crate::doc::{Card, Connection, EntityId, EntityRef, Frame, Grid, Scene, Workspace};
use crate::engine::{Action, EngineCore};
use crate::error::CanvasError;
use crate::geometry::{Rect, snap_point, snap_up, union_all};
use crate::history::Snapshot;
use crate::input::InputState;
use crate::layout::card_height;

/// Copied entities waiting to be pasted.
#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    pub cards: Vec<Card>,
    pub frames: Vec<Frame>,
    /// Only connections whose two endpoints were copied.
    pub connections: Vec<Connection>,
}

impl Clipboard {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty() && self.frames.is_empty()
    }

    /// Union bounds of the copied cards and frames.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        union_all(self.cards.iter().map(Card::rect).chain(self.frames.iter().map(Frame::rect)))
    }
}

impl EngineCore {
    // =============================================================
    // Cards
    // =============================================================

    /// Create an empty card with its top-left corner at the snapped `world`
    /// point and select it.
    pub fn create_card_at(&mut self, world: Point, actions: &mut Vec<Action>) -> EntityId {
        let before = Snapshot::capture(&self.scene);
        let origin = snap_point(world, self.config.grid_spacing);
        let width = self.config.default_card_width;
        let card = Card {
            id: Uuid::new_v4(),
            x: origin.x,
            y: origin.y,
            width,
            height: card_height("", width, &self.config),
            text: String::new(),
            color: self.config.default_card_color.clone(),
        };
        let id = card.id;
        self.scene.insert_card(card);
        self.scene.selection.select_card(id);
        self.history.push(before);
        tracing::debug!(%id, x = origin.x, y = origin.y, "card created");
        actions.push(Action::SelectionChanged);
        self.mark_changed(actions);
        id
    }

    /// Commit edited text into a card and re-derive its height.
    ///
    /// A card created by double-click and committed with blank text is
    /// removed, and its creation entry is dropped from history.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::CardNotFound`] for an unknown id.
    pub fn commit_card_text(&mut self, id: EntityId, text: &str, actions: &mut Vec<Action>) -> Result<(), CanvasError> {
        let Some(card) = self.scene.card(id) else {
            return Err(CanvasError::CardNotFound(id));
        };
        let unchanged = card.text == text;
        let width = card.width;
        if self.ui.editing == Some(EntityRef::Card(id)) {
            self.ui.editing = None;
        }
        let fresh = self.ui.fresh_card == Some(id);
        if fresh {
            self.ui.fresh_card = None;
        }

        if fresh && text.trim().is_empty() {
            self.discard_fresh_card(id, actions);
            return Ok(());
        }
        if unchanged {
            self.request_redraw(actions);
            return Ok(());
        }

        // A fresh card's first title folds into its creation entry.
        let before = (!fresh).then(|| Snapshot::capture(&self.scene));
        let height = card_height(text, width, &self.config);
        if let Some(card) = self.scene.card_mut(id) {
            card.text = text.to_string();
            card.height = height;
        }
        if let Some(before) = before {
            self.history.push(before);
        }
        self.mark_changed(actions);
        Ok(())
    }

    /// The host closed its editor without committing.
    pub fn end_editing(&mut self, actions: &mut Vec<Action>) {
        self.ui.editing = None;
        let Some(id) = self.ui.fresh_card.take() else {
            self.request_redraw(actions);
            return;
        };
        if self.scene.card(id).is_some_and(|c| c.text.trim().is_empty()) {
            self.discard_fresh_card(id, actions);
        } else {
            self.request_redraw(actions);
        }
    }

    fn discard_fresh_card(&mut self, id: EntityId, actions: &mut Vec<Action>) {
        self.scene.remove_cards_cascade(&HashSet::from([id]));
        self.history.discard_latest();
        tracing::debug!(%id, "discarded empty new card");
        actions.push(Action::SelectionChanged);
        self.mark_changed(actions);
    }

    /// Set the color of the selected cards and connections.
    pub fn recolor_selection(&mut self, color: &str, actions: &mut Vec<Action>) {
        let sel = self.scene.selection.clone();
        if sel.cards.is_empty() && sel.connections.is_empty() {
            return;
        }
        let before = Snapshot::capture(&self.scene);
        for card in self.scene.cards.iter_mut().filter(|c| sel.cards.contains(&c.id)) {
            card.color = color.to_string();
        }
        for conn in self.scene.connections.iter_mut().filter(|c| sel.connections.contains(&c.id)) {
            conn.color = color.to_string();
        }
        self.push_if_changed(before, actions);
    }

    // =============================================================
    // Frames
    // =============================================================

    /// Create a frame wrapping the selected cards and frames, or a default
    /// sized frame centered in the viewport when nothing is selected.
    pub fn create_frame(&mut self, actions: &mut Vec<Action>) -> EntityId {
        let grid = self.config.grid_spacing;
        let selected = union_all(
            self.scene
                .cards
                .iter()
                .filter(|c| self.scene.selection.cards.contains(&c.id))
                .map(Card::rect)
                .chain(self.scene.frames.iter().filter(|f| self.scene.selection.frames.contains(&f.id)).map(Frame::rect)),
        );
        let wanted = selected.map_or_else(
            || {
                let c = self.camera.screen_to_world(self.pivot());
                let (w, h) = (self.config.default_frame_width, self.config.default_frame_height);
                Rect::new(c.x - w * 0.5, c.y - h * 0.5, w, h)
            },
            |b| b.expand(self.config.frame_wrap_margin),
        );
        let origin = snap_point(wanted.origin(), grid);
        let width = self.config.frame_bounds.clamp_width(snap_up(wanted.right() - origin.x, grid));
        let height = self.config.frame_bounds.clamp_height(snap_up(wanted.bottom() - origin.y, grid));

        let before = Snapshot::capture(&self.scene);
        let order = self.scene.next_frame_order();
        let frame = Frame {
            id: Uuid::new_v4(),
            x: origin.x,
            y: origin.y,
            width,
            height,
            label: format!("Frame {order}"),
            order,
        };
        let id = frame.id;
        self.scene.insert_frame(frame);
        self.scene.selection.select_frame(id);
        self.history.push(before);
        tracing::debug!(%id, order, "frame created");
        actions.push(Action::SelectionChanged);
        self.mark_changed(actions);
        id
    }

    /// Commit an edited frame label.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::FrameNotFound`] for an unknown id.
    pub fn commit_frame_label(&mut self, id: EntityId, label: &str, actions: &mut Vec<Action>) -> Result<(), CanvasError> {
        if self.scene.frame(id).is_none() {
            return Err(CanvasError::FrameNotFound(id));
        }
        if self.ui.editing == Some(EntityRef::Frame(id)) {
            self.ui.editing = None;
        }
        let before = Snapshot::capture(&self.scene);
        if let Some(frame) = self.scene.frame_mut(id) {
            frame.label = label.to_string();
        }
        self.push_if_changed(before, actions);
        Ok(())
    }

    /// Change a frame's presentation order.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::FrameNotFound`] for an unknown id.
    pub fn set_frame_order(&mut self, id: EntityId, order: i64, actions: &mut Vec<Action>) -> Result<(), CanvasError> {
        if self.scene.frame(id).is_none() {
            return Err(CanvasError::FrameNotFound(id));
        }
        let before = Snapshot::capture(&self.scene);
        if let Some(frame) = self.scene.frame_mut(id) {
            frame.order = order;
        }
        self.push_if_changed(before, actions);
        Ok(())
    }

    // =============================================================
    // Connections
    // =============================================================

    /// Set or clear a connection label.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::ConnectionNotFound`] for an unknown id.
    pub fn relabel_connection(
        &mut self,
        id: EntityId,
        label: Option<&str>,
        actions: &mut Vec<Action>,
    ) -> Result<(), CanvasError> {
        if self.scene.connection(id).is_none() {
            return Err(CanvasError::ConnectionNotFound(id));
        }
        let before = Snapshot::capture(&self.scene);
        if let Some(conn) = self.scene.connection_mut(id) {
            conn.label = label.filter(|l| !l.is_empty()).map(str::to_string);
        }
        self.push_if_changed(before, actions);
        Ok(())
    }

    // =============================================================
    // Selection editing
    // =============================================================

    /// Delete every selected entity. Connections attached to deleted cards
    /// go in the same undo step.
    pub fn delete_selection(&mut self, actions: &mut Vec<Action>) {
        if self.scene.selection.is_empty() {
            return;
        }
        let sel = self.scene.selection.clone();
        let before = Snapshot::capture(&self.scene);
        self.scene.remove_cards_cascade(&sel.cards);
        for id in &sel.frames {
            self.scene.remove_frame(*id);
        }
        for id in &sel.connections {
            self.scene.remove_connection(*id);
        }
        self.scene.selection.clear();
        tracing::debug!(cards = sel.cards.len(), frames = sel.frames.len(), connections = sel.connections.len(), "deleted selection");
        actions.push(Action::SelectionChanged);
        self.push_if_changed(before, actions);
    }

    /// Select every card.
    pub fn select_all(&mut self, actions: &mut Vec<Action>) {
        self.scene.selection.clear();
        self.scene.selection.cards = self.scene.cards.iter().map(|c| c.id).collect();
        actions.push(Action::SelectionChanged);
        self.request_redraw(actions);
    }

    /// Move the selected cards and frames by whole grid steps. Cards inside a
    /// selected frame travel with it.
    pub fn nudge(&mut self, dx_steps: f64, dy_steps: f64, actions: &mut Vec<Action>) {
        let grid = self.config.grid_spacing;
        let delta = Point::new(dx_steps * grid, dy_steps * grid);
        let frames: Vec<EntityId> =
            self.scene.frames.iter().filter(|f| self.scene.selection.frames.contains(&f.id)).map(|f| f.id).collect();
        let mut cards: HashSet<EntityId> = self.scene.selection.cards.clone();
        for id in &frames {
            if let Some(frame) = self.scene.frame(*id) {
                cards.extend(self.scene.cards_in_frame(frame));
            }
        }
        if frames.is_empty() && cards.is_empty() {
            return;
        }

        let before = Snapshot::capture(&self.scene);
        for frame in self.scene.frames.iter_mut().filter(|f| frames.contains(&f.id)) {
            let to = snap_point(frame.rect().origin() + delta, grid);
            frame.set_origin(to);
        }
        for card in self.scene.cards.iter_mut().filter(|c| cards.contains(&c.id)) {
            let to = snap_point(card.rect().origin() + delta, grid);
            card.set_origin(to);
        }
        self.push_if_changed(before, actions);
    }

    // =============================================================
    // Clipboard
    // =============================================================

    fn clipboard_from_selection(&self) -> Clipboard {
        let sel = &self.scene.selection;
        let cards: Vec<Card> = self.scene.cards.iter().filter(|c| sel.cards.contains(&c.id)).cloned().collect();
        let frames: Vec<Frame> = self.scene.frames.iter().filter(|f| sel.frames.contains(&f.id)).cloned().collect();
        let connections = self
            .scene
            .connections
            .iter()
            .filter(|conn| sel.cards.contains(&conn.from_card_id) && sel.cards.contains(&conn.to_card_id))
            .cloned()
            .collect();
        Clipboard { cards, frames, connections }
    }

    /// Copy the selected cards and frames. An empty selection keeps the
    /// previous clipboard.
    pub fn copy_selection(&mut self) {
        let clip = self.clipboard_from_selection();
        if !clip.is_empty() {
            tracing::debug!(cards = clip.cards.len(), frames = clip.frames.len(), "copied");
            self.clipboard = Some(clip);
        }
    }

    /// Copy then delete.
    pub fn cut_selection(&mut self, actions: &mut Vec<Action>) {
        self.copy_selection();
        self.delete_selection(actions);
    }

    /// Paste the clipboard at the pointer, or offset from the originals when
    /// the pointer position is unknown. Returns the new card and frame ids.
    pub fn paste(&mut self, actions: &mut Vec<Action>) -> Vec<EntityId> {
        let Some(clip) = self.clipboard.clone() else {
            return Vec::new();
        };
        let Some(bounds) = clip.bounds() else {
            return Vec::new();
        };
        let offset = match self.last_pointer {
            Some(screen) => {
                snap_point(self.camera.screen_to_world(screen), self.config.grid_spacing) - bounds.origin()
            }
            None => Point::new(self.config.paste_offset, self.config.paste_offset),
        };
        self.insert_copies(&clip, offset, actions)
    }

    /// Copy the selection in place, shifted by the paste offset. The
    /// clipboard is left alone.
    pub fn duplicate_selection(&mut self, actions: &mut Vec<Action>) -> Vec<EntityId> {
        let clip = self.clipboard_from_selection();
        if clip.is_empty() {
            return Vec::new();
        }
        let offset = Point::new(self.config.paste_offset, self.config.paste_offset);
        self.insert_copies(&clip, offset, actions)
    }

    fn insert_copies(&mut self, clip: &Clipboard, offset: Point, actions: &mut Vec<Action>) -> Vec<EntityId> {
        let before = Snapshot::capture(&self.scene);
        let mut remap: HashMap<EntityId, EntityId> = HashMap::new();
        let mut created = Vec::new();
        self.scene.selection.clear();

        for card in &clip.cards {
            let id = Uuid::new_v4();
            remap.insert(card.id, id);
            let mut copy = card.clone();
            copy.id = id;
            copy.set_origin(copy.rect().origin() + offset);
            self.scene.insert_card(copy);
            self.scene.selection.cards.insert(id);
            created.push(id);
        }
        let mut order = self.scene.next_frame_order();
        for frame in &clip.frames {
            let id = Uuid::new_v4();
            let mut copy = frame.clone();
            copy.id = id;
            copy.order = order;
            order += 1;
            copy.set_origin(copy.rect().origin() + offset);
            self.scene.insert_frame(copy);
            self.scene.selection.frames.insert(id);
            created.push(id);
        }
        for conn in &clip.connections {
            let (Some(from), Some(to)) = (remap.get(&conn.from_card_id), remap.get(&conn.to_card_id)) else {
                continue;
            };
            self.scene.connections.push(Connection { id: Uuid::new_v4(), from_card_id: *from, to_card_id: *to, ..conn.clone() });
        }

        tracing::debug!(count = created.len(), "pasted");
        actions.push(Action::SelectionChanged);
        self.push_if_changed(before, actions);
        created
    }

    // =============================================================
    // History
    // =============================================================

    /// Restore the state before the last mutation. No-op on an empty stack
    /// or during a gesture.
    pub fn undo(&mut self, actions: &mut Vec<Action>) {
        if self.input.is_active() {
            return;
        }
        let current = Snapshot::capture(&self.scene);
        let Some(previous) = self.history.undo(current) else {
            return;
        };
        previous.restore(&mut self.scene);
        self.scene.prune_selection();
        tracing::debug!(remaining = self.history.len(), "undo");
        actions.push(Action::SelectionChanged);
        self.mark_changed(actions);
    }

    /// Re-apply the last undone mutation.
    pub fn redo(&mut self, actions: &mut Vec<Action>) {
        if self.input.is_active() {
            return;
        }
        let current = Snapshot::capture(&self.scene);
        let Some(next) = self.history.redo(current) else {
            return;
        };
        next.restore(&mut self.scene);
        self.scene.prune_selection();
        tracing::debug!(remaining = self.history.redo_len(), "redo");
        actions.push(Action::SelectionChanged);
        self.mark_changed(actions);
    }

    fn push_if_changed(&mut self, before: Snapshot, actions: &mut Vec<Action>) {
        if before.differs_from(&self.scene) {
            self.history.push(before);
            self.mark_changed(actions);
        } else {
            self.request_redraw(actions);
        }
    }

    // =============================================================
    // Camera
    // =============================================================

    /// Animate the camera to show every card and frame. No-op on an empty
    /// scene.
    pub fn fit_to_content(&mut self, actions: &mut Vec<Action>) {
        if let Some(bounds) = self.scene.content_bounds() {
            let pose = self.fit_pose_for(bounds);
            self.animate_camera_to(pose, actions);
        }
    }

    /// Select a card and animate the camera onto it.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::CardNotFound`] for an unknown id.
    pub fn jump_to_card(&mut self, id: EntityId, actions: &mut Vec<Action>) -> Result<(), CanvasError> {
        let rect = self.scene.card(id).map(Card::rect).ok_or(CanvasError::CardNotFound(id))?;
        self.scene.selection.select_card(id);
        actions.push(Action::SelectionChanged);
        let pose = self.fit_pose_for(rect);
        self.animate_camera_to(pose, actions);
        Ok(())
    }

    /// Select a frame and animate the camera onto it.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::FrameNotFound`] for an unknown id.
    pub fn jump_to_frame(&mut self, id: EntityId, actions: &mut Vec<Action>) -> Result<(), CanvasError> {
        let rect = self.scene.frame(id).map(Frame::rect).ok_or(CanvasError::FrameNotFound(id))?;
        self.scene.selection.select_frame(id);
        actions.push(Action::SelectionChanged);
        let pose = self.fit_pose_for(rect);
        self.animate_camera_to(pose, actions);
        Ok(())
    }

    // =============================================================
    // Presentation
    // =============================================================

    /// Enter presentation mode on the first frame. Returns `false` when the
    /// scene has no frames.
    pub fn start_presentation(&mut self, actions: &mut Vec<Action>) -> bool {
        if self.scene.frames.is_empty() {
            return false;
        }
        if self.input.is_active() {
            self.cancel_gesture(actions);
        }
        self.ui.presentation = Some(0);
        self.show_slide(0, actions);
        true
    }

    pub fn next_slide(&mut self, actions: &mut Vec<Action>) {
        if let Some(idx) = self.ui.presentation {
            if idx + 1 < self.scene.frames.len() {
                self.ui.presentation = Some(idx + 1);
                self.show_slide(idx + 1, actions);
            }
        }
    }

    pub fn previous_slide(&mut self, actions: &mut Vec<Action>) {
        if let Some(idx) = self.ui.presentation {
            if idx > 0 {
                self.ui.presentation = Some(idx - 1);
                self.show_slide(idx - 1, actions);
            }
        }
    }

    pub fn stop_presentation(&mut self, actions: &mut Vec<Action>) {
        if self.ui.presentation.take().is_some() {
            self.request_redraw(actions);
        }
    }

    /// The frame shown by the current presentation step.
    #[must_use]
    pub fn presentation_frame(&self) -> Option<&Frame> {
        let idx = self.ui.presentation?;
        self.scene.frames_in_order().get(idx).copied()
    }

    fn show_slide(&mut self, idx: usize, actions: &mut Vec<Action>) {
        let Some(rect) = self.scene.frames_in_order().get(idx).map(|f| f.rect()) else {
            return;
        };
        let pose = self.fit_pose_for(rect);
        self.animate_camera_to(pose, actions);
    }

    // =============================================================
    // Grids & persistence
    // =============================================================

    /// Id and name of every grid, in workspace order.
    #[must_use]
    pub fn grids(&self) -> Vec<(EntityId, String)> {
        self.workspace.grids.iter().map(|g| (g.id, g.name.clone())).collect()
    }

    #[must_use]
    pub fn active_grid_id(&self) -> EntityId {
        self.workspace.active_grid_id
    }

    /// Append an empty grid. The active grid does not change.
    pub fn add_grid(&mut self, name: &str, actions: &mut Vec<Action>) -> EntityId {
        let grid = Grid::new(name);
        let id = grid.id;
        self.workspace.grids.push(grid);
        tracing::debug!(%id, name, "grid added");
        self.mark_changed(actions);
        id
    }

    /// # Errors
    ///
    /// Returns [`CanvasError::GridNotFound`] for an unknown id.
    pub fn rename_grid(&mut self, id: EntityId, name: &str, actions: &mut Vec<Action>) -> Result<(), CanvasError> {
        let grid = self.workspace.grid_mut(id).ok_or(CanvasError::GridNotFound(id))?;
        grid.name = name.to_string();
        self.mark_changed(actions);
        Ok(())
    }

    /// Delete a grid. Deleting the active grid switches to its neighbor.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::LastGrid`] when only one grid remains and
    /// [`CanvasError::GridNotFound`] for an unknown id.
    pub fn delete_grid(&mut self, id: EntityId, actions: &mut Vec<Action>) -> Result<(), CanvasError> {
        let idx = self.workspace.grids.iter().position(|g| g.id == id).ok_or(CanvasError::GridNotFound(id))?;
        if self.workspace.grids.len() <= 1 {
            return Err(CanvasError::LastGrid);
        }
        if id == self.workspace.active_grid_id {
            let neighbor = if idx == 0 { 1 } else { idx - 1 };
            let neighbor_id = self.workspace.grids[neighbor].id;
            self.switch_grid(neighbor_id, actions)?;
        }
        self.workspace.grids.retain(|g| g.id != id);
        tracing::debug!(%id, "grid deleted");
        self.mark_changed(actions);
        Ok(())
    }

    /// Make another grid active. The current scene and camera are written
    /// back to their record; history, gestures and animations are reset.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::GridNotFound`] for an unknown id.
    pub fn switch_grid(&mut self, id: EntityId, actions: &mut Vec<Action>) -> Result<(), CanvasError> {
        if id == self.workspace.active_grid_id {
            return Ok(());
        }
        let (scene, camera) = {
            let grid = self.workspace.grid(id).ok_or(CanvasError::GridNotFound(id))?;
            (grid.scene.clone(), grid.camera)
        };
        self.checkpoint();
        self.workspace.active_grid_id = id;
        self.enter_grid(scene, camera);
        tracing::debug!(%id, "switched grid");
        actions.push(Action::SelectionChanged);
        self.mark_changed(actions);
        Ok(())
    }

    /// Write the live scene and camera into the active grid record.
    fn checkpoint(&mut self) {
        let active = self.workspace.active_grid_id;
        let mut scene = self.scene.clone();
        scene.selection.clear();
        let camera = self.camera;
        if let Some(grid) = self.workspace.grid_mut(active) {
            grid.scene = scene;
            grid.camera = camera;
        }
    }

    fn enter_grid(&mut self, scene: Scene, camera: Camera) {
        self.scene = scene;
        self.scene.selection.clear();
        self.camera = self.usable_camera(camera);
        self.history.clear();
        self.input = InputState::Idle;
        self.animations.cancel_all();
        self.ui.editing = None;
        self.ui.fresh_card = None;
        self.ui.presentation = None;
    }

    /// Stored cameras may carry a zoom of 0 or non-finite coordinates; those
    /// fall back to the default before the clamp.
    fn usable_camera(&self, camera: Camera) -> Camera {
        let defaults = Camera::default();
        let zoom = if camera.zoom.is_finite() && camera.zoom > 0.0 { camera.zoom } else { defaults.zoom };
        let x = if camera.x.is_finite() { camera.x } else { defaults.x };
        let y = if camera.y.is_finite() { camera.y } else { defaults.y };
        Camera { x, y, zoom: self.config.clamp_zoom(zoom) }
    }

    /// The full workspace with the live grid checkpointed.
    #[must_use]
    pub fn export_workspace(&self) -> Workspace {
        let mut ws = self.workspace.clone();
        let mut scene = self.scene.clone();
        scene.selection.clear();
        if let Some(grid) = ws.grid_mut(ws.active_grid_id) {
            grid.scene = scene;
            grid.camera = self.camera;
        }
        ws
    }

    /// Replace everything with a loaded workspace. An empty workspace gets a
    /// fresh grid; an unknown active id falls back to the first grid.
    pub fn load_workspace(&mut self, mut workspace: Workspace, actions: &mut Vec<Action>) {
        if workspace.grids.is_empty() {
            workspace = Workspace::default();
        }
        if workspace.grid(workspace.active_grid_id).is_none() {
            workspace.active_grid_id = workspace.grids[0].id;
        }
        let (scene, camera) = workspace
            .grid(workspace.active_grid_id)
            .map(|g| (g.scene.clone(), g.camera))
            .unwrap_or_default();
        tracing::debug!(grids = workspace.grids.len(), cards = scene.cards.len(), "workspace loaded");
        self.workspace = workspace;
        self.enter_grid(scene, camera);
        self.dirty = false;
        actions.push(Action::SelectionChanged);
        self.request_redraw(actions);
    }
}
