//! Interaction engine: pointer, wheel and keyboard handling.
//!
//! DESIGN
//! ======
//! [`EngineCore`] holds every piece of mutable state (scene, camera,
//! history, gesture, animations) and has no browser dependency, so the whole
//! interaction model is testable natively. [`Engine`] wraps it together with
//! the canvas element and adds rendering.
//!
//! Handlers return a list of [`Action`]s for the host. Redraw requests are
//! coalesced: at most one [`Action::RenderNeeded`] is emitted between two
//! calls to [`EngineCore::frame`], which the host drives once per animation
//! tick.
//!
//! Gestures never mutate the scene while the pointer moves. Each gesture
//! keeps its start geometry and a snapshot in [`InputState`]; pointer-up
//! writes the exact snapped result and pushes the snapshot to history only
//! if the scene actually changed. `Escape` restores the snapshot.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::camera::{Camera, CameraPose, Point};
use crate::commands::Clipboard;
use crate::config::{CanvasConfig, SizeBounds};
use crate::doc::{Connection, EntityId, EntityRef, Scene, Selection, Workspace};
use crate::error::CanvasError;
use crate::geometry::{Anchor, Corner, Rect, best_anchor_for_point, snap_point};
use crate::history::{History, Snapshot};
use crate::hit;
use crate::input::{Button, InputState, Key, Modifiers, Tool, UiState, WheelDelta};
use crate::motion::Animations;
use crate::render;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The scene or camera changed; draw on the next frame.
    RenderNeeded,
    /// Pointer cursor changed (CSS cursor name).
    SetCursor(String),
    /// Open the text editor over a card.
    EditTextRequested { id: EntityId },
    /// Open the label editor over a frame.
    EditFrameLabelRequested { id: EntityId },
    /// Persisted content changed; the workspace is dirty.
    WorkspaceChanged,
    /// Selection membership changed.
    SelectionChanged,
}

/// Coalesces redraw requests to one per frame.
#[derive(Debug, Clone, Default)]
pub struct RedrawScheduler {
    pending: bool,
}

impl RedrawScheduler {
    /// Request a redraw. Returns `true` only for the first request since the
    /// last [`RedrawScheduler::take`].
    pub fn request(&mut self) -> bool {
        !std::mem::replace(&mut self.pending, true)
    }

    /// Consume the pending request.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

/// Core engine state: all logic that does not depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
pub struct EngineCore {
    pub config: CanvasConfig,
    pub scene: Scene,
    pub camera: Camera,
    pub history: History,
    pub ui: UiState,
    pub input: InputState,
    pub animations: Animations,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub dpr: f64,
    /// Width of a panel docked over the left edge of the viewport.
    pub side_panel_width: f64,
    pub(crate) redraw: RedrawScheduler,
    pub(crate) dirty: bool,
    pub(crate) clipboard: Option<Clipboard>,
    /// Grid records; the active grid's scene and camera live in `scene` and
    /// `camera` and are written back on switch and export.
    pub(crate) workspace: Workspace,
    /// Last pointer position in screen space.
    pub(crate) last_pointer: Option<Point>,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::build(CanvasConfig::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an engine with a custom configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidConfig`] if the configuration is unusable.
    pub fn with_config(config: CanvasConfig) -> Result<Self, CanvasError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: CanvasConfig) -> Self {
        Self {
            history: History::new(config.history_limit),
            config,
            scene: Scene::new(),
            camera: Camera::default(),
            ui: UiState { cursor: "default".to_string(), ..UiState::default() },
            input: InputState::Idle,
            animations: Animations::default(),
            viewport_width: 0.0,
            viewport_height: 0.0,
            dpr: 1.0,
            side_panel_width: 0.0,
            redraw: RedrawScheduler::default(),
            dirty: false,
            clipboard: None,
            workspace: Workspace::default(),
            last_pointer: None,
        }
    }

    // --- Viewport / tool ---

    /// Update viewport dimensions (CSS pixels) and device pixel ratio.
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) -> Vec<Action> {
        self.viewport_width = width_css;
        self.viewport_height = height_css;
        self.dpr = dpr;
        let mut actions = Vec::new();
        self.request_redraw(&mut actions);
        actions
    }

    /// Reserve `width` CSS pixels on the left for a docked panel. Camera moves
    /// center content in the remaining area.
    pub fn set_side_panel_width(&mut self, width: f64) {
        self.side_panel_width = width.max(0.0);
    }

    /// Set the active tool.
    pub fn set_tool(&mut self, tool: Tool) {
        self.ui.tool = tool;
    }

    /// Tell the engine a host overlay has (or lost) focus.
    pub fn set_overlay_active(&mut self, active: bool) {
        self.ui.overlay_active = active;
    }

    /// Screen point at the center of the usable viewport.
    #[must_use]
    pub fn pivot(&self) -> Point {
        let usable = (self.viewport_width - self.side_panel_width).max(0.0);
        Point::new(self.side_panel_width + usable * 0.5, self.viewport_height * 0.5)
    }

    // --- Queries ---

    /// The current camera state.
    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.scene.selection
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Acknowledge that the host persisted the workspace.
    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    // --- Frame loop ---

    /// Advance animations by one tick. Returns `true` if the host should draw.
    pub fn frame(&mut self) -> bool {
        let mut moved = false;
        for slot in [&mut self.animations.drag, &mut self.animations.frame_drag] {
            if slot.is_moving() {
                slot.step();
                moved = true;
            }
        }
        if self.animations.resize.is_moving() {
            self.animations.resize.step();
            moved = true;
        }
        if let Some(pose) = self.animations.camera.step().copied() {
            self.camera = Camera::from_pose(pose, self.pivot());
            moved = true;
            if !self.animations.camera.is_moving() {
                self.animations.camera.cancel();
            }
        }
        self.redraw.take() || moved
    }

    /// Run frames until every animation has settled, up to `max_frames`.
    /// Returns the number of frames run.
    pub fn settle(&mut self, max_frames: usize) -> usize {
        let mut frames = 0;
        while frames < max_frames && (self.animations.is_moving() || self.redraw.is_pending()) {
            self.frame();
            frames += 1;
        }
        frames
    }

    // --- Input events ---

    /// Handle pointer-down.
    pub fn on_pointer_down(&mut self, screen: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        let mut actions = Vec::new();
        self.last_pointer = Some(screen);
        if self.ui.editing.is_some() || self.input.is_active() {
            return actions;
        }

        if button == Button::Middle || (button == Button::Primary && self.ui.space_held) {
            self.animations.camera.cancel();
            self.input = InputState::Panning { last_screen: screen };
            self.set_cursor("grabbing", &mut actions);
            return actions;
        }
        if button != Button::Primary || self.ui.is_modal() {
            return actions;
        }

        let world = self.camera.screen_to_world(screen);

        if let Some((target, corner)) = hit::hit_test_resize_handle(&self.scene, &self.camera, screen, &self.config) {
            self.begin_resize(target, corner, &mut actions);
            return actions;
        }

        if self.ui.tool == Tool::Connect {
            let start = hit::hit_test_anchor(&self.scene, world, self.camera.zoom, &self.config).or_else(|| {
                let id = hit::hit_test_cards(&self.scene, world)?;
                let card = self.scene.card(id)?;
                Some((id, best_anchor_for_point(&card.rect(), world)))
            });
            if let Some((from_card, from_anchor)) = start {
                self.input = InputState::ConnectingDrag { from_card, from_anchor, current: world };
                self.set_cursor("crosshair", &mut actions);
                self.request_redraw(&mut actions);
                return actions;
            }
        }

        if let Some(id) = hit::hit_test_cards(&self.scene, world) {
            self.press_card(id, world, modifiers, &mut actions);
            return actions;
        }

        if let Some(id) = hit::hit_test_connections(&self.scene, world, self.camera.zoom, &self.config) {
            if modifiers.shift {
                self.scene.selection.toggle_connection(id);
            } else {
                self.scene.selection.select_connection(id);
            }
            actions.push(Action::SelectionChanged);
            self.request_redraw(&mut actions);
            return actions;
        }

        if let Some(id) = hit::hit_test_frames(&self.scene, world, &self.config) {
            self.press_frame(id, world, modifiers, &mut actions);
            return actions;
        }

        if !modifiers.shift && !self.scene.selection.is_empty() {
            self.scene.selection.clear();
            actions.push(Action::SelectionChanged);
        }
        self.input = InputState::BoxSelecting { start: world, current: world, additive: modifiers.shift };
        self.request_redraw(&mut actions);
        actions
    }

    /// Handle pointer-move.
    pub fn on_pointer_move(&mut self, screen: Point, _modifiers: Modifiers) -> Vec<Action> {
        let mut actions = Vec::new();
        self.last_pointer = Some(screen);
        if self.ui.editing.is_some() {
            return actions;
        }
        let world = self.camera.screen_to_world(screen);
        let grid = self.config.grid_spacing;
        let mut redraw = true;

        match &mut self.input {
            InputState::Idle => {
                redraw = false;
            }
            InputState::Panning { last_screen } => {
                self.camera.pan_by_screen(screen.x - last_screen.x, screen.y - last_screen.y);
                *last_screen = screen;
            }
            InputState::BoxSelecting { current, .. } => {
                *current = world;
            }
            InputState::DraggingCards { offsets, origins, targets, .. } => {
                let next: Vec<Point> = offsets.iter().map(|off| snap_point(world - *off, grid)).collect();
                if next == *targets {
                    redraw = false;
                } else {
                    *targets = next;
                    self.animations.drag.steer(origins.clone(), targets.clone(), self.config.entity_motion);
                }
            }
            InputState::DraggingFrame { offset, origin, card_origins, target, .. } => {
                let next = snap_point(world - *offset, grid);
                if next == *target {
                    redraw = false;
                } else {
                    *target = next;
                    let delta = next - *origin;
                    let from: Vec<Point> = std::iter::once(*origin).chain(card_origins.iter().copied()).collect();
                    let to: Vec<Point> = std::iter::once(next).chain(card_origins.iter().map(|p| *p + delta)).collect();
                    self.animations.frame_drag.steer(from, to, self.config.entity_motion);
                }
            }
            InputState::Resizing { target, corner, origin, current, .. } => {
                let bounds = bounds_for(*target, &self.config);
                *current = resize_rect(origin, *corner, world, &bounds);
                let snapped = snapped_resize(origin, *corner, current, &bounds, grid);
                self.animations.resize.steer(*origin, snapped, self.config.entity_motion);
            }
            InputState::ConnectingDrag { current, .. } => {
                *current = world;
            }
        }

        if redraw {
            self.request_redraw(&mut actions);
        }
        if matches!(self.input, InputState::Idle) {
            self.update_hover_cursor(screen, &mut actions);
        }
        actions
    }

    /// Handle pointer-up: commit the active gesture.
    pub fn on_pointer_up(&mut self, screen: Point, _button: Button, _modifiers: Modifiers) -> Vec<Action> {
        let mut actions = Vec::new();
        self.last_pointer = Some(screen);
        let world = self.camera.screen_to_world(screen);

        match std::mem::take(&mut self.input) {
            InputState::Idle | InputState::Panning { .. } => {}
            InputState::BoxSelecting { start, current, additive } => {
                self.commit_box_select(Rect::from_corners(start, current), additive, &mut actions);
            }
            InputState::DraggingCards { ids, targets, pending, .. } => {
                self.animations.drag.cancel();
                for (id, target) in ids.iter().zip(&targets) {
                    if let Some(card) = self.scene.card_mut(*id) {
                        card.set_origin(*target);
                    }
                }
                tracing::debug!(count = ids.len(), "card drag committed");
                self.commit_gesture(*pending, &mut actions);
            }
            InputState::DraggingFrame { frame_id, origin, card_ids, card_origins, target, pending, .. } => {
                self.animations.frame_drag.cancel();
                let delta = target - origin;
                if let Some(frame) = self.scene.frame_mut(frame_id) {
                    frame.set_origin(target);
                }
                for (id, start) in card_ids.iter().zip(&card_origins) {
                    if let Some(card) = self.scene.card_mut(*id) {
                        card.set_origin(*start + delta);
                    }
                }
                tracing::debug!(%frame_id, cards = card_ids.len(), "frame drag committed");
                self.commit_gesture(*pending, &mut actions);
            }
            InputState::Resizing { target, corner, origin, current, pending } => {
                self.animations.resize.cancel();
                let bounds = bounds_for(target, &self.config);
                let rect = snapped_resize(&origin, corner, &current, &bounds, self.config.grid_spacing);
                match target {
                    EntityRef::Card(id) => {
                        if let Some(card) = self.scene.card_mut(id) {
                            card.set_rect(rect);
                        }
                    }
                    EntityRef::Frame(id) => {
                        if let Some(frame) = self.scene.frame_mut(id) {
                            frame.set_rect(rect);
                        }
                    }
                }
                tracing::debug!(?target, ?rect, "resize committed");
                self.commit_gesture(*pending, &mut actions);
            }
            InputState::ConnectingDrag { from_card, from_anchor, .. } => {
                self.finish_connection(from_card, from_anchor, world, &mut actions);
                self.request_redraw(&mut actions);
            }
        }

        self.update_hover_cursor(screen, &mut actions);
        actions
    }

    /// Handle a double-click.
    pub fn on_double_click(&mut self, screen: Point, _modifiers: Modifiers) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.ui.editing.is_some() || self.ui.is_modal() || self.input.is_active() {
            return actions;
        }
        let world = self.camera.screen_to_world(screen);

        if let Some(id) = hit::hit_test_cards(&self.scene, world) {
            self.ui.editing = Some(EntityRef::Card(id));
            actions.push(Action::EditTextRequested { id });
        } else if let Some(id) = hit::hit_test_frames(&self.scene, world, &self.config) {
            self.ui.editing = Some(EntityRef::Frame(id));
            actions.push(Action::EditFrameLabelRequested { id });
        } else {
            let id = self.create_card_at(world, &mut actions);
            self.ui.fresh_card = Some(id);
            self.ui.editing = Some(EntityRef::Card(id));
            actions.push(Action::EditTextRequested { id });
        }
        self.request_redraw(&mut actions);
        actions
    }

    /// Handle a wheel event: plain pans, shift pans horizontally, ctrl/meta
    /// zooms around the pointer.
    pub fn on_wheel(&mut self, screen: Point, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.ui.editing.is_some() || self.ui.is_modal() {
            return actions;
        }
        self.animations.camera.cancel();
        if modifiers.command() {
            let factor = (-delta.dy * self.config.wheel_zoom_sensitivity).exp();
            let zoom = self.config.clamp_zoom(self.camera.zoom * factor);
            self.camera.zoom_at(screen, zoom);
        } else if modifiers.shift {
            let dx = if delta.dx == 0.0 { delta.dy } else { delta.dx };
            self.camera.pan_by_screen(-dx, 0.0);
        } else {
            self.camera.pan_by_screen(-delta.dx, -delta.dy);
        }
        self.request_redraw(&mut actions);
        actions
    }

    /// Handle key-down.
    pub fn on_key_down(&mut self, key: Key, modifiers: Modifiers) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.ui.editing.is_some() || self.ui.overlay_active {
            return actions;
        }
        if self.ui.presentation.is_some() {
            self.presentation_key(&key, &mut actions);
            return actions;
        }
        if key.0 == "Escape" {
            if self.input.is_active() {
                self.cancel_gesture(&mut actions);
            } else if !self.scene.selection.is_empty() {
                self.scene.selection.clear();
                actions.push(Action::SelectionChanged);
                self.request_redraw(&mut actions);
            }
            return actions;
        }
        if key.0 == " " {
            self.ui.space_held = true;
            if !self.input.is_active() {
                self.set_cursor("grab", &mut actions);
            }
            return actions;
        }
        if self.input.is_active() {
            return actions;
        }

        let step = if modifiers.shift { self.config.nudge_fast_steps } else { 1.0 };
        match key.0.as_str() {
            "Delete" | "Backspace" => self.delete_selection(&mut actions),
            "ArrowLeft" => self.nudge(-step, 0.0, &mut actions),
            "ArrowRight" => self.nudge(step, 0.0, &mut actions),
            "ArrowUp" => self.nudge(0.0, -step, &mut actions),
            "ArrowDown" => self.nudge(0.0, step, &mut actions),
            _ if modifiers.command() => self.command_shortcut(&key, modifiers, &mut actions),
            "!" | "1" if modifiers.shift => self.fit_to_content(&mut actions),
            _ if key.is("v") => self.set_tool(Tool::Select),
            _ if key.is("c") => self.set_tool(Tool::Connect),
            _ => {}
        }
        actions
    }

    /// Handle key-up.
    pub fn on_key_up(&mut self, key: Key, _modifiers: Modifiers) -> Vec<Action> {
        let mut actions = Vec::new();
        if key.0 == " " {
            self.ui.space_held = false;
            if !self.input.is_active() {
                self.set_cursor("default", &mut actions);
            }
        }
        actions
    }

    fn command_shortcut(&mut self, key: &Key, modifiers: Modifiers, actions: &mut Vec<Action>) {
        if key.is("z") {
            if modifiers.shift {
                self.redo(actions);
            } else {
                self.undo(actions);
            }
        } else if key.is("y") {
            self.redo(actions);
        } else if key.is("a") {
            self.select_all(actions);
        } else if key.is("c") {
            self.copy_selection();
        } else if key.is("x") {
            self.cut_selection(actions);
        } else if key.is("v") {
            self.paste(actions);
        } else if key.is("d") {
            self.duplicate_selection(actions);
        }
    }

    fn presentation_key(&mut self, key: &Key, actions: &mut Vec<Action>) {
        match key.0.as_str() {
            "ArrowRight" | "ArrowDown" | " " | "PageDown" => self.next_slide(actions),
            "ArrowLeft" | "ArrowUp" | "PageUp" => self.previous_slide(actions),
            "Escape" => self.stop_presentation(actions),
            _ => {}
        }
    }

    // --- Gesture helpers ---

    fn press_card(&mut self, id: EntityId, world: Point, modifiers: Modifiers, actions: &mut Vec<Action>) {
        if modifiers.shift {
            self.scene.selection.toggle_card(id);
            actions.push(Action::SelectionChanged);
            self.request_redraw(actions);
            return;
        }
        if self.scene.selection.cards.contains(&id) {
            self.scene.selection.frames.clear();
            self.scene.selection.connections.clear();
        } else {
            self.scene.selection.select_card(id);
            actions.push(Action::SelectionChanged);
        }

        let pending = Snapshot::capture(&self.scene);
        let selected = self.scene.selection.cards.clone();
        self.scene.bring_cards_to_front(&selected);

        let dragged: Vec<(EntityId, Point)> =
            self.scene.cards.iter().filter(|c| selected.contains(&c.id)).map(|c| (c.id, c.rect().origin())).collect();
        let origins: Vec<Point> = dragged.iter().map(|(_, p)| *p).collect();
        self.animations.drag.cancel();
        self.input = InputState::DraggingCards {
            ids: dragged.iter().map(|(id, _)| *id).collect(),
            offsets: origins.iter().map(|o| world - *o).collect(),
            targets: origins.clone(),
            origins,
            pending: Box::new(pending),
        };
        self.set_cursor("grabbing", actions);
        self.request_redraw(actions);
    }

    fn press_frame(&mut self, id: EntityId, world: Point, modifiers: Modifiers, actions: &mut Vec<Action>) {
        if modifiers.shift {
            self.scene.selection.toggle_frame(id);
            actions.push(Action::SelectionChanged);
            self.request_redraw(actions);
            return;
        }
        if self.scene.selection.frames.contains(&id) {
            self.scene.selection.cards.clear();
            self.scene.selection.connections.clear();
        } else {
            self.scene.selection.select_frame(id);
            actions.push(Action::SelectionChanged);
        }
        let Some(frame) = self.scene.frame(id) else {
            return;
        };
        let origin = frame.rect().origin();
        let card_ids = self.scene.cards_in_frame(frame);
        let card_origins: Vec<Point> =
            card_ids.iter().filter_map(|cid| self.scene.card(*cid)).map(|c| c.rect().origin()).collect();
        self.animations.frame_drag.cancel();
        self.input = InputState::DraggingFrame {
            frame_id: id,
            offset: world - origin,
            origin,
            card_ids,
            card_origins,
            target: origin,
            pending: Box::new(Snapshot::capture(&self.scene)),
        };
        self.set_cursor("grabbing", actions);
        self.request_redraw(actions);
    }

    fn begin_resize(&mut self, target: EntityRef, corner: Corner, actions: &mut Vec<Action>) {
        let Some(origin) = self.scene.entity_rect(target) else {
            return;
        };
        self.animations.resize.cancel();
        self.input = InputState::Resizing {
            target,
            corner,
            origin,
            current: origin,
            pending: Box::new(Snapshot::capture(&self.scene)),
        };
        self.set_cursor(corner.cursor(), actions);
        self.request_redraw(actions);
    }

    fn commit_box_select(&mut self, rect: Rect, additive: bool, actions: &mut Vec<Action>) {
        let cards = hit::cards_in_rect(&self.scene, &rect);
        let frames = hit::frames_in_rect(&self.scene, &rect);
        let before = self.scene.selection.clone();
        if !additive {
            self.scene.selection.clear();
        }
        self.scene.selection.connections.clear();
        self.scene.selection.cards.extend(cards);
        self.scene.selection.frames.extend(frames);
        if self.scene.selection != before {
            actions.push(Action::SelectionChanged);
        }
        self.request_redraw(actions);
    }

    fn finish_connection(&mut self, from_card: EntityId, from_anchor: Anchor, world: Point, actions: &mut Vec<Action>) {
        let target = hit::hit_test_anchor(&self.scene, world, self.camera.zoom, &self.config)
            .filter(|(id, _)| *id != from_card)
            .or_else(|| {
                let id = hit::hit_test_cards(&self.scene, world)?;
                let to_rect = self.scene.card(id)?.rect();
                Some((id, best_anchor_for_point(&to_rect, world)))
            });
        let Some((to_card, to_anchor)) = target else {
            return;
        };
        let conn = Connection {
            id: uuid::Uuid::new_v4(),
            from_card_id: from_card,
            to_card_id: to_card,
            from_anchor,
            to_anchor,
            color: self.config.default_connection_color.clone(),
            label: None,
        };
        if let Err(err) = self.add_connection(conn, actions) {
            tracing::debug!(%err, "connection rejected");
        }
    }

    /// Validate and insert a connection as one undo step.
    ///
    /// # Errors
    ///
    /// Propagates the rejection from [`Scene::connect`].
    pub fn add_connection(&mut self, conn: Connection, actions: &mut Vec<Action>) -> Result<EntityId, CanvasError> {
        let before = Snapshot::capture(&self.scene);
        let id = self.scene.connect(conn)?;
        self.history.push(before);
        tracing::debug!(%id, "connection created");
        self.mark_changed(actions);
        Ok(id)
    }

    /// Abort the running gesture and restore the scene it started from.
    pub fn cancel_gesture(&mut self, actions: &mut Vec<Action>) {
        match std::mem::take(&mut self.input) {
            InputState::DraggingCards { pending, .. }
            | InputState::DraggingFrame { pending, .. }
            | InputState::Resizing { pending, .. } => {
                pending.restore(&mut self.scene);
            }
            InputState::Idle
            | InputState::Panning { .. }
            | InputState::BoxSelecting { .. }
            | InputState::ConnectingDrag { .. } => {}
        }
        self.animations.cancel_gestures();
        self.set_cursor(if self.ui.space_held { "grab" } else { "default" }, actions);
        self.request_redraw(actions);
    }

    fn commit_gesture(&mut self, pending: Snapshot, actions: &mut Vec<Action>) {
        if pending.differs_from(&self.scene) {
            self.history.push(pending);
            self.mark_changed(actions);
        } else {
            self.request_redraw(actions);
        }
    }

    // --- Notifications ---

    /// Mark the workspace dirty and ask for a redraw.
    pub(crate) fn mark_changed(&mut self, actions: &mut Vec<Action>) {
        self.dirty = true;
        actions.push(Action::WorkspaceChanged);
        self.request_redraw(actions);
    }

    pub(crate) fn request_redraw(&mut self, actions: &mut Vec<Action>) {
        if self.redraw.request() {
            actions.push(Action::RenderNeeded);
        }
    }

    fn set_cursor(&mut self, cursor: &str, actions: &mut Vec<Action>) {
        if self.ui.cursor != cursor {
            self.ui.cursor = cursor.to_string();
            actions.push(Action::SetCursor(cursor.to_string()));
        }
    }

    fn update_hover_cursor(&mut self, screen: Point, actions: &mut Vec<Action>) {
        let cursor = self.hover_cursor(screen);
        self.set_cursor(cursor, actions);
    }

    /// Cursor for the idle pointer at `screen`.
    #[must_use]
    pub fn hover_cursor(&self, screen: Point) -> &'static str {
        if self.ui.space_held {
            return "grab";
        }
        if self.ui.is_modal() {
            return "default";
        }
        let world = self.camera.screen_to_world(screen);
        if let Some((_, corner)) = hit::hit_test_resize_handle(&self.scene, &self.camera, screen, &self.config) {
            return corner.cursor();
        }
        if hit::hit_test_cards(&self.scene, world).is_some() {
            return if self.ui.tool == Tool::Connect { "crosshair" } else { "move" };
        }
        if hit::hit_test_connections(&self.scene, world, self.camera.zoom, &self.config).is_some() {
            return "pointer";
        }
        if hit::hit_test_frames(&self.scene, world, &self.config).is_some() {
            return "move";
        }
        "default"
    }

    // --- Camera ---

    /// Animate the camera toward `pose` with the camera motion parameters.
    pub fn animate_camera_to(&mut self, pose: CameraPose, actions: &mut Vec<Action>) {
        let from = self.camera.pose(self.pivot());
        self.animations.camera.start(from, pose, self.config.camera_motion);
        self.request_redraw(actions);
    }

    /// The pose that fits `bounds` into the usable viewport.
    #[must_use]
    pub fn fit_pose_for(&self, bounds: Rect) -> CameraPose {
        crate::camera::fit_pose(
            bounds,
            (self.viewport_width - self.side_panel_width).max(0.0),
            self.viewport_height,
            self.config.fit_padding_px,
            self.config.min_zoom,
            self.config.max_zoom,
        )
    }
}

// =============================================================
// Resize arithmetic
// =============================================================

fn bounds_for(target: EntityRef, config: &CanvasConfig) -> SizeBounds {
    match target {
        EntityRef::Card(_) => config.card_bounds,
        EntityRef::Frame(_) => config.frame_bounds,
    }
}

/// Move `corner` of `origin` to `pointer`, keeping the opposite corner fixed
/// and clamping the size to `bounds`. The rectangle never flips.
#[must_use]
pub fn resize_rect(origin: &Rect, corner: Corner, pointer: Point, bounds: &SizeBounds) -> Rect {
    let (x, width) = match corner {
        Corner::Nw | Corner::Sw => {
            let w = bounds.clamp_width(origin.right() - pointer.x);
            (origin.right() - w, w)
        }
        Corner::Ne | Corner::Se => (origin.x, bounds.clamp_width(pointer.x - origin.x)),
    };
    let (y, height) = match corner {
        Corner::Nw | Corner::Ne => {
            let h = bounds.clamp_height(origin.bottom() - pointer.y);
            (origin.bottom() - h, h)
        }
        Corner::Sw | Corner::Se => (origin.y, bounds.clamp_height(pointer.y - origin.y)),
    };
    Rect::new(x, y, width, height)
}

/// Resize result with the moving corner snapped to the grid.
fn snapped_resize(origin: &Rect, corner: Corner, current: &Rect, bounds: &SizeBounds, grid: f64) -> Rect {
    resize_rect(origin, corner, snap_point(current.corner(corner), grid), bounds)
}

/// The full canvas engine. Wraps `EngineCore` and owns the browser canvas element.
pub struct Engine {
    canvas: HtmlCanvasElement,
    pub core: EngineCore,
}

impl Engine {
    /// Create a new engine bound to the given canvas element.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        Self { canvas, core: EngineCore::new() }
    }

    /// Create an engine with a custom configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidConfig`] if the configuration is unusable.
    pub fn with_config(canvas: HtmlCanvasElement, config: CanvasConfig) -> Result<Self, CanvasError> {
        Ok(Self { canvas, core: EngineCore::with_config(config)? })
    }

    /// Resize the backing store to match the CSS size and pixel ratio.
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) -> Vec<Action> {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            self.canvas.set_width((width_css * dpr).round() as u32);
            self.canvas.set_height((height_css * dpr).round() as u32);
        }
        self.core.set_viewport(width_css, height_css, dpr)
    }

    // --- Delegated input events ---

    pub fn on_pointer_down(&mut self, screen: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_pointer_down(screen, button, modifiers)
    }

    pub fn on_pointer_move(&mut self, screen: Point, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_pointer_move(screen, modifiers)
    }

    pub fn on_pointer_up(&mut self, screen: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_pointer_up(screen, button, modifiers)
    }

    pub fn on_double_click(&mut self, screen: Point, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_double_click(screen, modifiers)
    }

    pub fn on_wheel(&mut self, screen: Point, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_wheel(screen, delta, modifiers)
    }

    pub fn on_key_down(&mut self, key: Key, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_key_down(key, modifiers)
    }

    pub fn on_key_up(&mut self, key: Key, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_key_up(key, modifiers)
    }

    // --- Render ---

    /// Advance one animation tick and draw if anything changed.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the 2D context is unavailable or a draw call fails.
    pub fn tick(&mut self) -> Result<(), JsValue> {
        if self.core.frame() {
            self.render()?;
        }
        Ok(())
    }

    /// Draw the current state to the canvas.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the 2D context is unavailable or a draw call fails.
    pub fn render(&self) -> Result<(), JsValue> {
        let ctx = self
            .canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        let scene = render::RenderScene::from_core(&self.core);
        render::draw(&ctx, &scene, self.core.viewport_width, self.core.viewport_height, self.core.dpr)
    }
}
