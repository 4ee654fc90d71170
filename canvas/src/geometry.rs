//! Geometry kernel: rectangles, grid snapping, anchors and connection curves.
//!
//! Everything here is a pure function of its arguments. World-space values
//! are `f64`; screen-space conversions live on [`crate::camera::Camera`].

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use serde::{Deserialize, Serialize};

use crate::camera::Point;

// =============================================================
// Rect
// =============================================================

/// Axis-aligned rectangle in world space, anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Normalized rectangle spanning two arbitrary corners.
    #[must_use]
    pub fn from_corners(a: Point, b: Point) -> Self {
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        Self { x, y, width: (a.x - b.x).abs(), height: (a.y - b.y).abs() }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Whether the rectangle encloses a non-zero area.
    #[must_use]
    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Point containment, edges inclusive.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Whether `other` lies entirely inside `self`, edges inclusive.
    #[must_use]
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x && other.y >= self.y && other.right() <= self.right() && other.bottom() <= self.bottom()
    }

    /// Non-empty overlap. Touching edges do not intersect, and a rectangle
    /// without area intersects nothing.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.has_area()
            && other.has_area()
            && self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Smallest rectangle covering both.
    #[must_use]
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(x, y, right - x, bottom - y)
    }

    /// Shrink by `amount` on every side. Width and height never go below zero.
    #[must_use]
    pub fn inset(&self, amount: f64) -> Rect {
        Rect::new(
            self.x + amount,
            self.y + amount,
            (self.width - amount * 2.0).max(0.0),
            (self.height - amount * 2.0).max(0.0),
        )
    }

    /// Grow by `amount` on every side.
    #[must_use]
    pub fn expand(&self, amount: f64) -> Rect {
        Rect::new(self.x - amount, self.y - amount, self.width + amount * 2.0, self.height + amount * 2.0)
    }

    /// Same size, new top-left corner.
    #[must_use]
    pub fn moved_to(&self, origin: Point) -> Rect {
        Rect::new(origin.x, origin.y, self.width, self.height)
    }

    /// World position of one corner.
    #[must_use]
    pub fn corner(&self, corner: Corner) -> Point {
        match corner {
            Corner::Nw => Point::new(self.x, self.y),
            Corner::Ne => Point::new(self.right(), self.y),
            Corner::Sw => Point::new(self.x, self.bottom()),
            Corner::Se => Point::new(self.right(), self.bottom()),
        }
    }
}

/// Union of every rectangle in `rects`, or `None` when empty.
pub fn union_all<I>(rects: I) -> Option<Rect>
where
    I: IntoIterator<Item = Rect>,
{
    rects.into_iter().reduce(|acc, r| acc.union(&r))
}

// =============================================================
// Grid
// =============================================================

/// Round `v` to the nearest multiple of `spacing`.
#[must_use]
pub fn snap_to_grid(v: f64, spacing: f64) -> f64 {
    (v / spacing).round() * spacing
}

/// Snap both coordinates of a point.
#[must_use]
pub fn snap_point(p: Point, spacing: f64) -> Point {
    Point::new(snap_to_grid(p.x, spacing), snap_to_grid(p.y, spacing))
}

/// Round `v` up to the next multiple of `spacing`.
#[must_use]
pub fn snap_up(v: f64, spacing: f64) -> f64 {
    (v / spacing).ceil() * spacing
}

// =============================================================
// Corners & anchors
// =============================================================

/// Rectangle corner, used for resize handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    Nw,
    Ne,
    Sw,
    Se,
}

impl Corner {
    pub const ALL: [Corner; 4] = [Corner::Nw, Corner::Ne, Corner::Sw, Corner::Se];

    /// The corner diagonally across, which stays fixed during a resize.
    #[must_use]
    pub fn opposite(self) -> Corner {
        match self {
            Corner::Nw => Corner::Se,
            Corner::Ne => Corner::Sw,
            Corner::Sw => Corner::Ne,
            Corner::Se => Corner::Nw,
        }
    }

    /// CSS cursor shown while hovering or dragging this corner.
    #[must_use]
    pub fn cursor(self) -> &'static str {
        match self {
            Corner::Nw | Corner::Se => "nwse-resize",
            Corner::Ne | Corner::Sw => "nesw-resize",
        }
    }
}

/// Attachment point on a card edge midpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    Top,
    Bottom,
    Left,
    Right,
}

impl Anchor {
    pub const ALL: [Anchor; 4] = [Anchor::Top, Anchor::Bottom, Anchor::Left, Anchor::Right];

    /// World position of this anchor on `rect`.
    #[must_use]
    pub fn point(self, rect: &Rect) -> Point {
        let c = rect.center();
        match self {
            Anchor::Top => Point::new(c.x, rect.y),
            Anchor::Bottom => Point::new(c.x, rect.bottom()),
            Anchor::Left => Point::new(rect.x, c.y),
            Anchor::Right => Point::new(rect.right(), c.y),
        }
    }

    /// Unit vector pointing out of the card at this anchor.
    #[must_use]
    pub fn normal(self) -> Point {
        match self {
            Anchor::Top => Point::new(0.0, -1.0),
            Anchor::Bottom => Point::new(0.0, 1.0),
            Anchor::Left => Point::new(-1.0, 0.0),
            Anchor::Right => Point::new(1.0, 0.0),
        }
    }
}

/// The anchor of `rect` nearest to `p`. Ties resolve in [`Anchor::ALL`] order.
#[must_use]
pub fn best_anchor_for_point(rect: &Rect, p: Point) -> Anchor {
    let mut best = Anchor::Top;
    let mut best_dist = f64::INFINITY;
    for anchor in Anchor::ALL {
        let d = anchor.point(rect).distance(p);
        if d < best_dist {
            best = anchor;
            best_dist = d;
        }
    }
    best
}

// =============================================================
// Connection curves
// =============================================================

/// Cubic bezier with explicit control points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub start: Point,
    pub ctrl1: Point,
    pub ctrl2: Point,
    pub end: Point,
}

impl CubicBezier {
    /// Evaluate the curve at parameter `t` in `[0, 1]`.
    #[must_use]
    pub fn at(&self, t: f64) -> Point {
        let u = 1.0 - t;
        let a = u * u * u;
        let b = 3.0 * u * u * t;
        let c = 3.0 * u * t * t;
        let d = t * t * t;
        Point::new(
            a * self.start.x + b * self.ctrl1.x + c * self.ctrl2.x + d * self.end.x,
            a * self.start.y + b * self.ctrl1.y + c * self.ctrl2.y + d * self.end.y,
        )
    }

    /// `steps + 1` evenly spaced parametric samples, endpoints included.
    #[must_use]
    pub fn sample(&self, steps: usize) -> Vec<Point> {
        let steps = steps.max(1);
        #[allow(clippy::cast_precision_loss)]
        let n = steps as f64;
        (0..=steps)
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let t = i as f64 / n;
                self.at(t)
            })
            .collect()
    }

    /// Parametric midpoint (t = 0.5), where connection labels sit.
    #[must_use]
    pub fn midpoint(&self) -> Point {
        self.at(0.5)
    }
}

/// Build the curve between two anchor points.
///
/// Control points sit on each anchor's outward normal at
/// `max(min_offset, ratio * distance)`, which keeps short links
/// perpendicular to the card edge and long links gently curved.
#[must_use]
pub fn connection_curve(
    start: Point,
    start_anchor: Anchor,
    end: Point,
    end_anchor: Anchor,
    min_offset: f64,
    ratio: f64,
) -> CubicBezier {
    let offset = min_offset.max(ratio * start.distance(end));
    CubicBezier {
        start,
        ctrl1: start + start_anchor.normal() * offset,
        ctrl2: end + end_anchor.normal() * offset,
        end,
    }
}

/// Label box of `chars` characters centered on `center`.
#[must_use]
pub fn label_rect(center: Point, chars: usize, char_width: f64, padding: f64, height: f64) -> Rect {
    #[allow(clippy::cast_precision_loss)]
    let width = chars as f64 * char_width + padding * 2.0;
    Rect::new(center.x - width * 0.5, center.y - height * 0.5, width, height)
}
