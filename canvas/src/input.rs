//! Input model: tools, modifier keys, mouse buttons, and the gesture state machine.
//!
//! This module defines the types consumed by the interaction controller.
//! `Tool` and `Modifiers` capture the user's intent at the time of a pointer
//! event. `InputState` is the active gesture tracked between pointer-down and
//! pointer-up. Gestures never touch the scene while they run: each variant
//! carries the gesture-start geometry, the live target, and the snapshot that
//! becomes the undo entry if the release changes anything.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::Point;
use crate::doc::{EntityId, EntityRef};
use crate::geometry::{Anchor, Corner, Rect};
use crate::history::Snapshot;

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Select, move and resize (default).
    #[default]
    Select,
    /// Drag from a card to another card to link them.
    Connect,
}

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Command on macOS.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// A keyboard key as reported by the browser (e.g. `"Delete"`, `"Escape"`, `"a"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self(name.to_string())
    }

    /// Case-insensitive comparison for single-letter shortcuts.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.0.eq_ignore_ascii_case(name)
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// UI state owned by the engine and visible to the renderer.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Currently active tool.
    pub tool: Tool,
    /// Card or frame whose text the host is editing. Suppresses all input.
    pub editing: Option<EntityRef>,
    /// A host overlay (context menu, palette) has focus.
    pub overlay_active: bool,
    /// Index into the ordered frame list while presenting.
    pub presentation: Option<usize>,
    /// Last cursor reported to the host.
    pub cursor: String,
    /// Space bar is held.
    pub space_held: bool,
    /// Card created by double-click whose text has not been committed yet.
    pub fresh_card: Option<EntityId>,
}

impl UiState {
    /// Whether pointer input other than middle-button pan is suppressed.
    #[must_use]
    pub fn is_modal(&self) -> bool {
        self.overlay_active || self.presentation.is_some()
    }
}

/// Internal state for the input state machine.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// Camera pan by pointer drag.
    Panning {
        /// Screen-space position of the previous pointer event.
        last_screen: Point,
    },
    /// Rubber-band selection.
    BoxSelecting {
        /// World-space corner where the drag started.
        start: Point,
        /// World-space pointer position.
        current: Point,
        /// Shift held at pointer-down: add to the existing selection.
        additive: bool,
    },
    /// Moving one or more selected cards.
    DraggingCards {
        ids: Vec<EntityId>,
        /// Pointer minus card origin, per card, in world units.
        offsets: Vec<Point>,
        /// Card origins at gesture start.
        origins: Vec<Point>,
        /// Snapped destination origins.
        targets: Vec<Point>,
        pending: Box<Snapshot>,
    },
    /// Moving a frame and the cards fully inside it.
    DraggingFrame {
        frame_id: EntityId,
        /// Pointer minus frame origin.
        offset: Point,
        /// Frame origin at gesture start.
        origin: Point,
        card_ids: Vec<EntityId>,
        card_origins: Vec<Point>,
        /// Snapped destination of the frame origin.
        target: Point,
        pending: Box<Snapshot>,
    },
    /// Dragging a resize handle of a card or frame.
    Resizing {
        target: EntityRef,
        corner: Corner,
        /// Rectangle at gesture start.
        origin: Rect,
        /// Clamped, unsnapped live rectangle.
        current: Rect,
        pending: Box<Snapshot>,
    },
    /// Dragging out a new connection.
    ConnectingDrag {
        from_card: EntityId,
        from_anchor: Anchor,
        /// World-space pointer position.
        current: Point,
    },
}

impl InputState {
    /// Whether a gesture is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }
}
