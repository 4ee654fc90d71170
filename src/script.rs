//! Replay scripts: JSON-lines input events driven through the engine.
//!
//! Each non-blank line is one JSON object tagged by `"type"`, for example
//!
//! ```text
//! {"type":"viewport","width":1000,"height":800}
//! {"type":"double_click","x":120,"y":80}
//! {"type":"text","text":"Plan the launch"}
//! {"type":"pointer_down","x":130,"y":90}
//! {"type":"pointer_move","x":330,"y":90}
//! {"type":"pointer_up","x":330,"y":90}
//! {"type":"key_down","key":"z","modifiers":{"ctrl":true}}
//! {"type":"frames","count":30}
//! ```
//!
//! Pointer coordinates are screen pixels, exactly as the browser host would
//! report them.

#[cfg(test)]
#[path = "script_test.rs"]
mod script_test;

use canvas::camera::Point;
use canvas::doc::{EntityId, EntityRef};
use canvas::engine::{Action, EngineCore};
use canvas::error::CanvasError;
use canvas::input::{Button, Key, Modifiers, Tool, WheelDelta};
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("line {line}: invalid event: {source}")]
    Parse { line: usize, source: serde_json::Error },
    #[error("line {line}: {source}")]
    Engine { line: usize, source: CanvasError },
    #[error("line {line}: `text` event with no open editor")]
    NotEditing { line: usize },
    #[error("line {line}: grid index {index} out of range")]
    NoSuchGrid { line: usize, index: usize },
}

// =============================================================
// Event model
// =============================================================

/// Modifier keys as written in a script.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScriptModifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl From<ScriptModifiers> for Modifiers {
    fn from(m: ScriptModifiers) -> Self {
        Modifiers { shift: m.shift, ctrl: m.ctrl, alt: m.alt, meta: m.meta }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptButton {
    #[default]
    Primary,
    Middle,
    Secondary,
}

impl From<ScriptButton> for Button {
    fn from(b: ScriptButton) -> Self {
        match b {
            ScriptButton::Primary => Button::Primary,
            ScriptButton::Middle => Button::Middle,
            ScriptButton::Secondary => Button::Secondary,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptTool {
    Select,
    Connect,
}

impl From<ScriptTool> for Tool {
    fn from(t: ScriptTool) -> Self {
        match t {
            ScriptTool::Select => Tool::Select,
            ScriptTool::Connect => Tool::Connect,
        }
    }
}

fn default_dpr() -> f64 {
    1.0
}

/// One scripted host event.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptEvent {
    Viewport {
        width: f64,
        height: f64,
        #[serde(default = "default_dpr")]
        dpr: f64,
    },
    SidePanel {
        width: f64,
    },
    PointerDown {
        x: f64,
        y: f64,
        #[serde(default)]
        button: ScriptButton,
        #[serde(default)]
        modifiers: ScriptModifiers,
    },
    PointerMove {
        x: f64,
        y: f64,
        #[serde(default)]
        modifiers: ScriptModifiers,
    },
    PointerUp {
        x: f64,
        y: f64,
        #[serde(default)]
        button: ScriptButton,
        #[serde(default)]
        modifiers: ScriptModifiers,
    },
    DoubleClick {
        x: f64,
        y: f64,
    },
    Wheel {
        x: f64,
        y: f64,
        #[serde(default)]
        dx: f64,
        #[serde(default)]
        dy: f64,
        #[serde(default)]
        modifiers: ScriptModifiers,
    },
    KeyDown {
        key: String,
        #[serde(default)]
        modifiers: ScriptModifiers,
    },
    KeyUp {
        key: String,
    },
    Tool {
        tool: ScriptTool,
    },
    /// Commit text into whatever the host editor is open on.
    Text {
        text: String,
    },
    /// Close the editor without committing.
    CancelEdit,
    /// Run animation ticks.
    Frames {
        count: usize,
    },
    CreateFrame,
    Recolor {
        color: String,
    },
    FitToContent,
    JumpToCard {
        id: EntityId,
    },
    StartPresentation,
    StopPresentation,
    AddGrid {
        name: String,
    },
    SwitchGrid {
        index: usize,
    },
}

/// Parse a whole script. Blank lines are skipped; line numbers in errors
/// are one-based.
///
/// # Errors
///
/// Returns [`ScriptError::Parse`] for the first malformed line.
pub fn parse_script(input: &str) -> Result<Vec<(usize, ScriptEvent)>, ScriptError> {
    input
        .lines()
        .enumerate()
        .filter(|(_, raw)| !raw.trim().is_empty())
        .map(|(idx, raw)| {
            let line = idx + 1;
            serde_json::from_str(raw.trim())
                .map(|event| (line, event))
                .map_err(|source| ScriptError::Parse { line, source })
        })
        .collect()
}

// =============================================================
// Replay
// =============================================================

/// Counters collected while replaying.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub events: usize,
    pub frames: usize,
    pub draws: usize,
    pub workspace_changes: usize,
}

impl ReplaySummary {
    fn absorb(&mut self, actions: &[Action]) {
        self.workspace_changes += actions.iter().filter(|a| matches!(a, Action::WorkspaceChanged)).count();
    }

    fn tick(&mut self, core: &mut EngineCore) {
        self.frames += 1;
        if core.frame() {
            self.draws += 1;
        }
    }
}

/// Drive every event through `core`, then run frames until animations
/// settle (at most `max_settle_frames`).
///
/// # Errors
///
/// Returns the first engine rejection or script misuse, tagged with its line.
pub fn replay(
    core: &mut EngineCore,
    events: &[(usize, ScriptEvent)],
    max_settle_frames: usize,
) -> Result<ReplaySummary, ScriptError> {
    let mut summary = ReplaySummary::default();
    for (line, event) in events {
        let actions = apply(core, *line, event, &mut summary)?;
        summary.absorb(&actions);
        summary.events += 1;
    }
    let settled = core.settle(max_settle_frames);
    summary.frames += settled;
    tracing::debug!(settled, "replay settled");
    Ok(summary)
}

fn apply(
    core: &mut EngineCore,
    line: usize,
    event: &ScriptEvent,
    summary: &mut ReplaySummary,
) -> Result<Vec<Action>, ScriptError> {
    let engine = |source| ScriptError::Engine { line, source };
    let mut actions = Vec::new();
    match event {
        ScriptEvent::Viewport { width, height, dpr } => {
            actions = core.set_viewport(*width, *height, *dpr);
        }
        ScriptEvent::SidePanel { width } => core.set_side_panel_width(*width),
        ScriptEvent::PointerDown { x, y, button, modifiers } => {
            actions = core.on_pointer_down(Point::new(*x, *y), (*button).into(), (*modifiers).into());
        }
        ScriptEvent::PointerMove { x, y, modifiers } => {
            actions = core.on_pointer_move(Point::new(*x, *y), (*modifiers).into());
        }
        ScriptEvent::PointerUp { x, y, button, modifiers } => {
            actions = core.on_pointer_up(Point::new(*x, *y), (*button).into(), (*modifiers).into());
        }
        ScriptEvent::DoubleClick { x, y } => {
            actions = core.on_double_click(Point::new(*x, *y), Modifiers::default());
        }
        ScriptEvent::Wheel { x, y, dx, dy, modifiers } => {
            actions = core.on_wheel(Point::new(*x, *y), WheelDelta { dx: *dx, dy: *dy }, (*modifiers).into());
        }
        ScriptEvent::KeyDown { key, modifiers } => {
            actions = core.on_key_down(Key::new(key), (*modifiers).into());
        }
        ScriptEvent::KeyUp { key } => {
            actions = core.on_key_up(Key::new(key), Modifiers::default());
        }
        ScriptEvent::Tool { tool } => core.set_tool((*tool).into()),
        ScriptEvent::Text { text } => match core.ui.editing {
            Some(EntityRef::Card(id)) => core.commit_card_text(id, text, &mut actions).map_err(engine)?,
            Some(EntityRef::Frame(id)) => core.commit_frame_label(id, text, &mut actions).map_err(engine)?,
            None => return Err(ScriptError::NotEditing { line }),
        },
        ScriptEvent::CancelEdit => core.end_editing(&mut actions),
        ScriptEvent::Frames { count } => {
            for _ in 0..*count {
                summary.tick(core);
            }
        }
        ScriptEvent::CreateFrame => {
            core.create_frame(&mut actions);
        }
        ScriptEvent::Recolor { color } => core.recolor_selection(color, &mut actions),
        ScriptEvent::FitToContent => core.fit_to_content(&mut actions),
        ScriptEvent::JumpToCard { id } => core.jump_to_card(*id, &mut actions).map_err(engine)?,
        ScriptEvent::StartPresentation => {
            if !core.start_presentation(&mut actions) {
                tracing::warn!(line, "presentation requested on a grid without frames");
            }
        }
        ScriptEvent::StopPresentation => core.stop_presentation(&mut actions),
        ScriptEvent::AddGrid { name } => {
            core.add_grid(name, &mut actions);
        }
        ScriptEvent::SwitchGrid { index } => {
            let id = core.grids().get(*index).map(|(id, _)| *id).ok_or(ScriptError::NoSuchGrid { line, index: *index })?;
            core.switch_grid(id, &mut actions).map_err(engine)?;
        }
    }
    Ok(actions)
}
