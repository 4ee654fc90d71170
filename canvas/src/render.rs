//! Rendering: the render contract and its Canvas2D implementation.
//!
//! [`RenderScene`] is the read-only view the renderer consumes: the scene,
//! the camera, the selection, the gesture preview and the live rectangles of
//! entities being dragged or resized. [`draw`] is the only place that
//! touches [`web_sys::CanvasRenderingContext2d`]; it paints the layers in
//! [`Layer::ORDER`] and mutates nothing.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.
//! The top-level caller ([`crate::engine::Engine::render`]) handles the result.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::collections::HashMap;
use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::camera::{Camera, Point};
use crate::config::CanvasConfig;
use crate::doc::{Card, Connection, EntityId, EntityRef, Frame, Scene, Selection};
use crate::engine::EngineCore;
use crate::geometry::{Anchor, Corner, Rect, connection_curve};
use crate::hit;
use crate::input::{InputState, Tool};
use crate::layout::{chars_per_line, wrap_lines};

/// Selection accent color.
const ACCENT: &str = "#1E90FF";
/// Selection dash segment length in screen pixels.
const SELECTION_DASH_PX: f64 = 4.0;
/// Grid dots are hidden when closer than this on screen.
const MIN_DOT_SPACING_PX: f64 = 8.0;
/// Card text font size in world units.
const CARD_FONT_PX: f64 = 14.0;

/// Paint layers, bottom to top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Background,
    Frames,
    Connections,
    Cards,
    SelectionHandles,
    BoxSelect,
}

impl Layer {
    pub const ORDER: [Layer; 6] =
        [Layer::Background, Layer::Frames, Layer::Connections, Layer::Cards, Layer::SelectionHandles, Layer::BoxSelect];
}

/// Transient overlay drawn for the active gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GesturePreview {
    None,
    /// Rubber band in world space.
    BoxSelect(Rect),
    /// Connection being dragged out from an anchor.
    Connecting { from: Point, from_anchor: Anchor, to: Point },
}

/// Everything the renderer reads for one frame.
pub struct RenderScene<'a> {
    pub camera: Camera,
    pub config: &'a CanvasConfig,
    pub scene: &'a Scene,
    pub preview: GesturePreview,
    pub editing: Option<EntityRef>,
    pub presentation_frame: Option<EntityId>,
    pub show_anchors: bool,
    live: HashMap<EntityId, Rect>,
}

impl<'a> RenderScene<'a> {
    /// Build the view of the engine's current state, resolving in-flight
    /// gestures to the rectangles currently on screen.
    #[must_use]
    pub fn from_core(core: &'a EngineCore) -> Self {
        let mut live = HashMap::new();
        let mut preview = GesturePreview::None;
        let scene = &core.scene;

        match &core.input {
            InputState::Idle | InputState::Panning { .. } => {}
            InputState::BoxSelecting { start, current, .. } => {
                preview = GesturePreview::BoxSelect(Rect::from_corners(*start, *current));
            }
            InputState::DraggingCards { ids, targets, .. } => {
                let shown = core.animations.drag.value().unwrap_or(targets);
                for (id, origin) in ids.iter().zip(shown) {
                    if let Some(card) = scene.card(*id) {
                        live.insert(*id, card.rect().moved_to(*origin));
                    }
                }
            }
            InputState::DraggingFrame { frame_id, origin, card_ids, card_origins, target, .. } => {
                let delta = *target - *origin;
                let fallback: Vec<Point> =
                    std::iter::once(*target).chain(card_origins.iter().map(|p| *p + delta)).collect();
                let shown = core.animations.frame_drag.value().unwrap_or(&fallback);
                if let (Some(frame), Some(at)) = (scene.frame(*frame_id), shown.first()) {
                    live.insert(*frame_id, frame.rect().moved_to(*at));
                }
                for (id, at) in card_ids.iter().zip(shown.iter().skip(1)) {
                    if let Some(card) = scene.card(*id) {
                        live.insert(*id, card.rect().moved_to(*at));
                    }
                }
            }
            InputState::Resizing { target, current, .. } => {
                let shown = core.animations.resize.value().copied().unwrap_or(*current);
                let id = match target {
                    EntityRef::Card(id) | EntityRef::Frame(id) => *id,
                };
                live.insert(id, shown);
            }
            InputState::ConnectingDrag { from_card, from_anchor, current } => {
                if let Some(card) = scene.card(*from_card) {
                    preview = GesturePreview::Connecting {
                        from: from_anchor.point(&card.rect()),
                        from_anchor: *from_anchor,
                        to: *current,
                    };
                }
            }
        }

        Self {
            camera: core.camera,
            config: &core.config,
            scene,
            preview,
            editing: core.ui.editing,
            presentation_frame: core.presentation_frame().map(|f| f.id),
            show_anchors: core.ui.tool == Tool::Connect,
            live,
        }
    }

    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.scene.selection
    }

    /// On-screen rectangle of a card, following any gesture in progress.
    #[must_use]
    pub fn card_rect(&self, card: &Card) -> Rect {
        self.live.get(&card.id).copied().unwrap_or_else(|| card.rect())
    }

    /// On-screen rectangle of a frame.
    #[must_use]
    pub fn frame_rect(&self, frame: &Frame) -> Rect {
        self.live.get(&frame.id).copied().unwrap_or_else(|| frame.rect())
    }

    /// Connections with both endpoints present, with their live endpoint
    /// rectangles.
    #[must_use]
    pub fn connections(&self) -> Vec<(&'a Connection, Rect, Rect)> {
        let scene: &'a Scene = self.scene;
        scene
            .connections
            .iter()
            .filter_map(|conn| {
                let from = scene.card(conn.from_card_id)?;
                let to = scene.card(conn.to_card_id)?;
                Some((conn, self.card_rect(from), self.card_rect(to)))
            })
            .collect()
    }
}

/// Draw every layer in order.
///
/// `viewport_w` and `viewport_h` are in CSS pixels. `dpr` is the device pixel ratio.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
pub fn draw(
    ctx: &CanvasRenderingContext2d,
    view: &RenderScene<'_>,
    viewport_w: f64,
    viewport_h: f64,
    dpr: f64,
) -> Result<(), JsValue> {
    ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, viewport_w, viewport_h);
    ctx.scale(view.camera.zoom, view.camera.zoom)?;
    ctx.translate(view.camera.x, view.camera.y)?;

    for layer in Layer::ORDER {
        match layer {
            Layer::Background => draw_background(ctx, view, viewport_w, viewport_h),
            Layer::Frames => draw_frames(ctx, view)?,
            Layer::Connections => draw_connections(ctx, view)?,
            Layer::Cards => draw_cards(ctx, view)?,
            Layer::SelectionHandles => draw_selection(ctx, view)?,
            Layer::BoxSelect => draw_box_select(ctx, view)?,
        }
    }
    Ok(())
}

// =============================================================
// Layers
// =============================================================

fn draw_background(ctx: &CanvasRenderingContext2d, view: &RenderScene<'_>, viewport_w: f64, viewport_h: f64) {
    let spacing = view.config.grid_spacing;
    let zoom = view.camera.zoom;
    if spacing * zoom < MIN_DOT_SPACING_PX {
        return;
    }
    let top_left = view.camera.screen_to_world(Point::new(0.0, 0.0));
    let bottom_right = view.camera.screen_to_world(Point::new(viewport_w, viewport_h));
    let dot = view.camera.screen_dist_to_world(1.5);

    ctx.set_fill_style_str("#D1D5DB");
    let mut y = (top_left.y / spacing).floor() * spacing;
    while y <= bottom_right.y {
        let mut x = (top_left.x / spacing).floor() * spacing;
        while x <= bottom_right.x {
            ctx.fill_rect(x - dot * 0.5, y - dot * 0.5, dot, dot);
            x += spacing;
        }
        y += spacing;
    }
}

fn draw_frames(ctx: &CanvasRenderingContext2d, view: &RenderScene<'_>) -> Result<(), JsValue> {
    let zoom = view.camera.zoom;
    for frame in &view.scene.frames {
        let r = view.frame_rect(frame);
        let presenting = view.presentation_frame == Some(frame.id);

        ctx.set_fill_style_str("rgba(243, 244, 246, 0.6)");
        ctx.fill_rect(r.x, r.y, r.width, r.height);
        ctx.set_stroke_style_str(if presenting { ACCENT } else { "#9CA3AF" });
        ctx.set_line_width((if presenting { 3.0 } else { 2.0 }) / zoom);
        ctx.stroke_rect(r.x, r.y, r.width, r.height);

        if view.editing == Some(EntityRef::Frame(frame.id)) {
            continue;
        }
        let label = hit::frame_label_rect(frame, view.config).moved_to(Point::new(r.x, r.y - view.config.frame_label_height));
        ctx.set_fill_style_str("#374151");
        ctx.set_font("12px sans-serif");
        ctx.set_text_baseline("middle");
        ctx.fill_text(
            &format!("{} · {}", frame.order, frame.label),
            label.x + view.config.label_padding,
            label.y + label.height * 0.5,
        )?;
    }
    Ok(())
}

fn draw_connections(ctx: &CanvasRenderingContext2d, view: &RenderScene<'_>) -> Result<(), JsValue> {
    let zoom = view.camera.zoom;
    for (conn, from, to) in view.connections() {
        let selected = view.selection().connections.contains(&conn.id);
        let curve = hit::connection_geometry(conn, &from, &to, view.config);

        ctx.set_stroke_style_str(if selected { ACCENT } else { conn.color.as_str() });
        ctx.set_line_width((if selected { 3.0 } else { 2.0 }) / zoom);
        ctx.begin_path();
        ctx.move_to(curve.start.x, curve.start.y);
        ctx.bezier_curve_to(curve.ctrl1.x, curve.ctrl1.y, curve.ctrl2.x, curve.ctrl2.y, curve.end.x, curve.end.y);
        ctx.stroke();
        ctx.set_fill_style_str(if selected { ACCENT } else { conn.color.as_str() });
        draw_arrowhead(ctx, curve.end, conn.to_anchor, 8.0 / zoom.sqrt());

        if let (Some(label), Some(rect)) = (conn.label.as_deref(), hit::connection_label_rect(conn, &curve, view.config)) {
            ctx.set_fill_style_str("#FFFFFF");
            ctx.fill_rect(rect.x, rect.y, rect.width, rect.height);
            ctx.set_stroke_style_str(&conn.color);
            ctx.set_line_width(1.0 / zoom);
            ctx.stroke_rect(rect.x, rect.y, rect.width, rect.height);
            ctx.set_fill_style_str("#111827");
            ctx.set_font("12px sans-serif");
            ctx.set_text_baseline("middle");
            ctx.fill_text(label, rect.x + view.config.label_padding, rect.y + rect.height * 0.5)?;
        }
    }

    if let GesturePreview::Connecting { from, from_anchor, to } = view.preview {
        let curve = connection_curve(
            from,
            from_anchor,
            to,
            opposite(from_anchor),
            view.config.connection_min_offset,
            view.config.connection_offset_ratio,
        );
        ctx.save();
        set_dash(ctx, SELECTION_DASH_PX / zoom)?;
        ctx.set_stroke_style_str(ACCENT);
        ctx.set_line_width(2.0 / zoom);
        ctx.begin_path();
        ctx.move_to(curve.start.x, curve.start.y);
        ctx.bezier_curve_to(curve.ctrl1.x, curve.ctrl1.y, curve.ctrl2.x, curve.ctrl2.y, curve.end.x, curve.end.y);
        ctx.stroke();
        ctx.set_line_dash(&js_sys::Array::new())?;
        ctx.restore();
    }
    Ok(())
}

fn draw_cards(ctx: &CanvasRenderingContext2d, view: &RenderScene<'_>) -> Result<(), JsValue> {
    let zoom = view.camera.zoom;
    let cfg = view.config;
    for card in &view.scene.cards {
        let r = view.card_rect(card);
        ctx.set_fill_style_str(&card.color);
        ctx.fill_rect(r.x, r.y, r.width, r.height);
        ctx.set_stroke_style_str("#D1D5DB");
        ctx.set_line_width(1.0 / zoom);
        ctx.stroke_rect(r.x, r.y, r.width, r.height);

        if view.editing == Some(EntityRef::Card(card.id)) {
            continue;
        }
        ctx.set_fill_style_str("#111827");
        ctx.set_font(&format!("{CARD_FONT_PX}px sans-serif"));
        ctx.set_text_baseline("top");
        let mut y = r.y + cfg.card_padding;
        for line in wrap_lines(&card.text, chars_per_line(r.width, cfg)) {
            if y + cfg.card_line_height > r.bottom() {
                break;
            }
            ctx.fill_text(&line, r.x + cfg.card_padding, y)?;
            y += cfg.card_line_height;
        }
    }

    if view.show_anchors {
        let radius = 3.0 / zoom;
        ctx.set_fill_style_str(ACCENT);
        for card in &view.scene.cards {
            let r = view.card_rect(card);
            for anchor in Anchor::ALL {
                let p = anchor.point(&r);
                ctx.begin_path();
                ctx.arc(p.x, p.y, radius, 0.0, 2.0 * PI)?;
                ctx.fill();
            }
        }
    }
    Ok(())
}

fn draw_selection(ctx: &CanvasRenderingContext2d, view: &RenderScene<'_>) -> Result<(), JsValue> {
    let sel = view.selection();
    let cards = view.scene.cards.iter().filter(|c| sel.cards.contains(&c.id)).map(|c| view.card_rect(c));
    let frames = view.scene.frames.iter().filter(|f| sel.frames.contains(&f.id)).map(|f| view.frame_rect(f));
    for rect in cards.chain(frames) {
        draw_rect_selection(ctx, rect, view.camera.zoom, view.config.handle_size_px)?;
    }
    Ok(())
}

fn draw_rect_selection(ctx: &CanvasRenderingContext2d, r: Rect, zoom: f64, handle_px: f64) -> Result<(), JsValue> {
    ctx.save();
    ctx.set_stroke_style_str(ACCENT);
    ctx.set_line_width(1.0 / zoom);
    set_dash(ctx, SELECTION_DASH_PX / zoom)?;
    ctx.stroke_rect(r.x, r.y, r.width, r.height);
    ctx.set_line_dash(&js_sys::Array::new())?;

    let size = handle_px / zoom;
    ctx.set_fill_style_str("#fff");
    for corner in Corner::ALL {
        let c = r.corner(corner);
        ctx.fill_rect(c.x - size * 0.5, c.y - size * 0.5, size, size);
        ctx.stroke_rect(c.x - size * 0.5, c.y - size * 0.5, size, size);
    }
    ctx.restore();
    Ok(())
}

fn draw_box_select(ctx: &CanvasRenderingContext2d, view: &RenderScene<'_>) -> Result<(), JsValue> {
    let GesturePreview::BoxSelect(r) = view.preview else {
        return Ok(());
    };
    let zoom = view.camera.zoom;
    ctx.save();
    set_dash(ctx, SELECTION_DASH_PX / zoom)?;
    ctx.set_stroke_style_str(ACCENT);
    ctx.set_fill_style_str("rgba(30, 144, 255, 0.12)");
    ctx.set_line_width(1.0 / zoom);
    ctx.fill_rect(r.x, r.y, r.width, r.height);
    ctx.stroke_rect(r.x, r.y, r.width, r.height);
    ctx.set_line_dash(&js_sys::Array::new())?;
    ctx.restore();
    Ok(())
}

// =============================================================
// Helpers
// =============================================================

fn set_dash(ctx: &CanvasRenderingContext2d, dash: f64) -> Result<(), JsValue> {
    let dash_array = js_sys::Array::new();
    dash_array.push(&dash.into());
    dash_array.push(&dash.into());
    ctx.set_line_dash(&dash_array)
}

/// Filled triangle at `tip` pointing into the card through `anchor`.
fn draw_arrowhead(ctx: &CanvasRenderingContext2d, tip: Point, anchor: Anchor, size: f64) {
    let n = anchor.normal();
    let back = tip + n * size;
    let side = Point::new(-n.y, n.x) * (size * 0.5);
    ctx.begin_path();
    ctx.move_to(tip.x, tip.y);
    ctx.line_to(back.x + side.x, back.y + side.y);
    ctx.line_to(back.x - side.x, back.y - side.y);
    ctx.close_path();
    ctx.fill();
}

/// Anchor facing `anchor`, used for the free end of a connection preview.
#[must_use]
pub fn opposite(anchor: Anchor) -> Anchor {
    match anchor {
        Anchor::Top => Anchor::Bottom,
        Anchor::Bottom => Anchor::Top,
        Anchor::Left => Anchor::Right,
        Anchor::Right => Anchor::Left,
    }
}
