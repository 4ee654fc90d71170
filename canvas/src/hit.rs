//! Hit-testing against the scene.
//!
//! All tests iterate back to front so the topmost entity wins. World-space
//! inputs are used for bodies, strips and curves; resize handles and anchor
//! dots have a fixed on-screen size, so their tolerances are divided by the
//! camera zoom (or tested directly in screen space).

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::{Camera, Point};
use crate::config::CanvasConfig;
use crate::doc::{Connection, EntityId, EntityRef, Frame, Scene};
use crate::geometry::{Anchor, Corner, CubicBezier, Rect, connection_curve, label_rect};

// =============================================================
// Cards
// =============================================================

/// The topmost card containing `world`.
#[must_use]
pub fn hit_test_cards(scene: &Scene, world: Point) -> Option<EntityId> {
    scene.cards.iter().rev().find(|c| c.rect().contains(world)).map(|c| c.id)
}

/// Resize handle of a selected card or frame under `screen`.
///
/// Handles are squares of `handle_size_px` screen pixels centered on the
/// projected corners. Selected cards are tested before selected frames.
#[must_use]
pub fn hit_test_resize_handle(
    scene: &Scene,
    camera: &Camera,
    screen: Point,
    config: &CanvasConfig,
) -> Option<(EntityRef, Corner)> {
    let half = config.handle_size_px * 0.5;
    let on_handle = |rect: Rect| {
        Corner::ALL.into_iter().find(|corner| {
            let c = camera.world_to_screen(rect.corner(*corner));
            (screen.x - c.x).abs() <= half && (screen.y - c.y).abs() <= half
        })
    };

    let cards = scene.cards.iter().rev().filter(|c| scene.selection.cards.contains(&c.id));
    for card in cards {
        if let Some(corner) = on_handle(card.rect()) {
            return Some((EntityRef::Card(card.id), corner));
        }
    }
    let frames = scene.frames.iter().rev().filter(|f| scene.selection.frames.contains(&f.id));
    for frame in frames {
        if let Some(corner) = on_handle(frame.rect()) {
            return Some((EntityRef::Frame(frame.id), corner));
        }
    }
    None
}

// =============================================================
// Frames
// =============================================================

/// The label strip drawn above a frame's top-left corner.
#[must_use]
pub fn frame_label_rect(frame: &Frame, config: &CanvasConfig) -> Rect {
    #[allow(clippy::cast_precision_loss)]
    let text_w = frame.label.chars().count() as f64 * config.label_char_width;
    let width = (config.label_padding * 2.0 + text_w).max(config.frame_label_min_width);
    Rect::new(frame.x, frame.y - config.frame_label_height, width, config.frame_label_height)
}

/// Whether `world` lies on the frame's border strip or its label strip.
/// The frame interior is not a hit, so cards and empty space inside a frame
/// stay reachable.
#[must_use]
pub fn frame_hit(frame: &Frame, world: Point, config: &CanvasConfig) -> bool {
    let outer = frame.rect();
    let inner = outer.inset(config.frame_border_width);
    let on_border = outer.contains(world) && !(inner.has_area() && inner.contains(world));
    on_border || frame_label_rect(frame, config).contains(world)
}

/// The topmost frame whose border or label is under `world`.
#[must_use]
pub fn hit_test_frames(scene: &Scene, world: Point, config: &CanvasConfig) -> Option<EntityId> {
    scene.frames.iter().rev().find(|f| frame_hit(f, world, config)).map(|f| f.id)
}

// =============================================================
// Connections
// =============================================================

/// Bezier for a connection between two card rectangles.
#[must_use]
pub fn connection_geometry(conn: &Connection, from: &Rect, to: &Rect, config: &CanvasConfig) -> CubicBezier {
    connection_curve(
        conn.from_anchor.point(from),
        conn.from_anchor,
        conn.to_anchor.point(to),
        conn.to_anchor,
        config.connection_min_offset,
        config.connection_offset_ratio,
    )
}

/// Label box centered on the curve midpoint, or `None` for an unlabeled
/// connection.
#[must_use]
pub fn connection_label_rect(conn: &Connection, curve: &CubicBezier, config: &CanvasConfig) -> Option<Rect> {
    let label = conn.label.as_deref().filter(|l| !l.is_empty())?;
    Some(label_rect(
        curve.midpoint(),
        label.chars().count(),
        config.label_char_width,
        config.label_padding,
        config.connection_label_height,
    ))
}

/// Whether any of the `samples + 1` parametric samples of the curve lies
/// within `tolerance` of `world`.
///
/// This is an approximation, not the exact distance to the bezier: on long
/// curves a point between two samples can miss even when it is on the curve.
#[must_use]
pub fn curve_hit(curve: &CubicBezier, world: Point, tolerance: f64, samples: usize) -> bool {
    curve.sample(samples).into_iter().any(|s| s.distance(world) <= tolerance)
}

/// The topmost connection whose curve or label is under `world`. Connections
/// with a missing endpoint card are skipped.
#[must_use]
pub fn hit_test_connections(scene: &Scene, world: Point, zoom: f64, config: &CanvasConfig) -> Option<EntityId> {
    let tolerance = config.connection_hit_tolerance_px / zoom;
    scene
        .live_connections()
        .into_iter()
        .rev()
        .find(|(conn, from, to)| {
            let curve = connection_geometry(conn, from, to, config);
            connection_label_rect(conn, &curve, config).is_some_and(|r| r.contains(world))
                || curve_hit(&curve, world, tolerance, config.connection_samples)
        })
        .map(|(conn, _, _)| conn.id)
}

// =============================================================
// Anchors
// =============================================================

/// The anchor of `rect` whose dot is within `radius` of `world`.
#[must_use]
pub fn anchor_at(rect: &Rect, world: Point, radius: f64) -> Option<Anchor> {
    Anchor::ALL.into_iter().find(|a| a.point(rect).distance(world) <= radius)
}

/// The topmost card with an anchor dot under `world`.
#[must_use]
pub fn hit_test_anchor(scene: &Scene, world: Point, zoom: f64, config: &CanvasConfig) -> Option<(EntityId, Anchor)> {
    let radius = config.anchor_hit_radius_px / zoom;
    scene
        .cards
        .iter()
        .rev()
        .find_map(|c| anchor_at(&c.rect(), world, radius).map(|a| (c.id, a)))
}

// =============================================================
// Box selection
// =============================================================

/// Cards with a strict, non-empty overlap with `rect`.
#[must_use]
pub fn cards_in_rect(scene: &Scene, rect: &Rect) -> Vec<EntityId> {
    scene.cards.iter().filter(|c| c.rect().intersects(rect)).map(|c| c.id).collect()
}

/// Frames with a strict, non-empty overlap with `rect`.
#[must_use]
pub fn frames_in_rect(scene: &Scene, rect: &Rect) -> Vec<EntityId> {
    scene.frames.iter().filter(|f| f.rect().intersects(rect)).map(|f| f.id).collect()
}
