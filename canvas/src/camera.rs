#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

/// A point in either screen or world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

/// Camera state for pan/zoom on the infinite canvas.
///
/// `x` / `y` are a world-space translation: `screen = (world + xy) * zoom`.
/// `zoom` is a scale factor (1.0 = no zoom).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0, zoom: 1.0 }
    }
}

impl Camera {
    /// Convert a screen-space point (CSS pixels) to world coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point {
            x: screen.x / self.zoom - self.x,
            y: screen.y / self.zoom - self.y,
        }
    }

    /// Convert a world-space point to screen coordinates (CSS pixels).
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        Point {
            x: (world.x + self.x) * self.zoom,
            y: (world.y + self.y) * self.zoom,
        }
    }

    /// Convert a screen-space distance (pixels) to world-space distance.
    #[must_use]
    pub fn screen_dist_to_world(&self, screen_dist: f64) -> f64 {
        screen_dist / self.zoom
    }

    /// Pan by a screen-space delta; the content follows the pointer.
    pub fn pan_by_screen(&mut self, dx: f64, dy: f64) {
        self.x += dx / self.zoom;
        self.y += dy / self.zoom;
    }

    /// Change zoom while keeping the world point under `screen` fixed.
    pub fn zoom_at(&mut self, screen: Point, new_zoom: f64) {
        let old_zoom = self.zoom;
        self.x += screen.x / new_zoom - screen.x / old_zoom;
        self.y += screen.y / new_zoom - screen.y / old_zoom;
        self.zoom = new_zoom;
    }

    /// The world point shown at `pivot` together with the current zoom.
    #[must_use]
    pub fn pose(&self, pivot: Point) -> CameraPose {
        CameraPose { focal: self.screen_to_world(pivot), zoom: self.zoom }
    }

    /// Build the camera that shows `pose.focal` at screen position `pivot`.
    #[must_use]
    pub fn from_pose(pose: CameraPose, pivot: Point) -> Self {
        Self {
            x: pivot.x / pose.zoom - pose.focal.x,
            y: pivot.y / pose.zoom - pose.focal.y,
            zoom: pose.zoom,
        }
    }
}

/// Camera expressed as "which world point sits at the pivot, at what zoom".
///
/// This is the quantity camera animations interpolate, so that a move toward
/// a target keeps the pivot stable while zoom changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub focal: Point,
    pub zoom: f64,
}

/// Compute the pose that frames `bounds` inside a `width` × `height` viewport.
///
/// Zoom is the smaller of the two axis ratios after removing `padding` on
/// every side, clamped to `[min_zoom, max_zoom]`. Degenerate axes impose no
/// constraint.
#[must_use]
pub fn fit_pose(bounds: Rect, width: f64, height: f64, padding: f64, min_zoom: f64, max_zoom: f64) -> CameraPose {
    let avail_w = width - padding * 2.0;
    let avail_h = height - padding * 2.0;
    let ratio_w = if bounds.width > 0.0 { avail_w / bounds.width } else { f64::INFINITY };
    let ratio_h = if bounds.height > 0.0 { avail_h / bounds.height } else { f64::INFINITY };
    let zoom = max_zoom.min(min_zoom.max(ratio_w.min(ratio_h)));
    CameraPose { focal: bounds.center(), zoom }
}
