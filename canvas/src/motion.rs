//! Smooth motion: lerp-with-epsilon tweens and cancelable animation slots.
//!
//! DESIGN
//! ======
//! Every animated quantity moves by `current += (target - current) * factor`
//! once per frame and lands exactly on its target when the remaining delta
//! is below `snap_epsilon`. The rule is written once as [`Tween`] over any
//! [`Interpolate`] value and reused for card drags, frame drags, resizes and
//! camera moves. Each of those owns one [`AnimationSlot`]; starting a new
//! animation in a slot replaces the old one.

#[cfg(test)]
#[path = "motion_test.rs"]
mod motion_test;

use serde::{Deserialize, Serialize};

use crate::camera::{CameraPose, Point};
use crate::geometry::Rect;

/// Lerp factor and snap threshold for one family of animations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Motion {
    /// Fraction of the remaining delta covered per frame, in `(0, 1]`.
    pub lerp_factor: f64,
    /// Remaining delta below which the value snaps to its target.
    pub snap_epsilon: f64,
}

// =============================================================
// Interpolate
// =============================================================

/// A value that can step toward a target.
pub trait Interpolate: Clone {
    /// One lerp step from `self` toward `target`.
    #[must_use]
    fn lerp_toward(&self, target: &Self, factor: f64) -> Self;

    /// Whether every component is within `epsilon` of `target`.
    fn within(&self, target: &Self, epsilon: f64) -> bool;
}

impl Interpolate for f64 {
    fn lerp_toward(&self, target: &Self, factor: f64) -> Self {
        self + (target - self) * factor
    }

    fn within(&self, target: &Self, epsilon: f64) -> bool {
        (target - self).abs() < epsilon
    }
}

impl Interpolate for Point {
    fn lerp_toward(&self, target: &Self, factor: f64) -> Self {
        Point::new(self.x.lerp_toward(&target.x, factor), self.y.lerp_toward(&target.y, factor))
    }

    fn within(&self, target: &Self, epsilon: f64) -> bool {
        self.x.within(&target.x, epsilon) && self.y.within(&target.y, epsilon)
    }
}

impl Interpolate for Rect {
    fn lerp_toward(&self, target: &Self, factor: f64) -> Self {
        Rect::new(
            self.x.lerp_toward(&target.x, factor),
            self.y.lerp_toward(&target.y, factor),
            self.width.lerp_toward(&target.width, factor),
            self.height.lerp_toward(&target.height, factor),
        )
    }

    fn within(&self, target: &Self, epsilon: f64) -> bool {
        self.x.within(&target.x, epsilon)
            && self.y.within(&target.y, epsilon)
            && self.width.within(&target.width, epsilon)
            && self.height.within(&target.height, epsilon)
    }
}

impl Interpolate for CameraPose {
    fn lerp_toward(&self, target: &Self, factor: f64) -> Self {
        CameraPose {
            focal: self.focal.lerp_toward(&target.focal, factor),
            zoom: self.zoom.lerp_toward(&target.zoom, factor),
        }
    }

    fn within(&self, target: &Self, epsilon: f64) -> bool {
        self.focal.within(&target.focal, epsilon) && self.zoom.within(&target.zoom, epsilon)
    }
}

/// Element-wise; vectors of different length jump straight to the target.
impl<T: Interpolate> Interpolate for Vec<T> {
    fn lerp_toward(&self, target: &Self, factor: f64) -> Self {
        if self.len() != target.len() {
            return target.clone();
        }
        self.iter().zip(target).map(|(c, t)| c.lerp_toward(t, factor)).collect()
    }

    fn within(&self, target: &Self, epsilon: f64) -> bool {
        self.len() == target.len() && self.iter().zip(target).all(|(c, t)| c.within(t, epsilon))
    }
}

// =============================================================
// Tween
// =============================================================

/// A value easing toward a target.
#[derive(Debug, Clone)]
pub struct Tween<T> {
    current: T,
    target: T,
    motion: Motion,
}

impl<T: Interpolate> Tween<T> {
    #[must_use]
    pub fn new(from: T, to: T, motion: Motion) -> Self {
        Self { current: from, target: to, motion }
    }

    /// Change the destination without resetting progress.
    pub fn retarget(&mut self, target: T) {
        self.target = target;
    }

    /// Advance one frame. Returns `true` once the value sits on the target.
    pub fn step(&mut self) -> bool {
        if self.is_settled() {
            self.current = self.target.clone();
            return true;
        }
        let next = self.current.lerp_toward(&self.target, self.motion.lerp_factor);
        if next.within(&self.target, self.motion.snap_epsilon) {
            self.current = self.target.clone();
            true
        } else {
            self.current = next;
            false
        }
    }

    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.current.within(&self.target, self.motion.snap_epsilon)
    }

    #[must_use]
    pub fn current(&self) -> &T {
        &self.current
    }

    #[must_use]
    pub fn target(&self) -> &T {
        &self.target
    }
}

// =============================================================
// Slots
// =============================================================

/// Holds at most one running tween of a kind.
#[derive(Debug, Clone)]
pub struct AnimationSlot<T> {
    tween: Option<Tween<T>>,
}

impl<T> Default for AnimationSlot<T> {
    fn default() -> Self {
        Self { tween: None }
    }
}

impl<T: Interpolate> AnimationSlot<T> {
    /// Start a tween, replacing any running one.
    pub fn start(&mut self, from: T, to: T, motion: Motion) {
        self.tween = Some(Tween::new(from, to, motion));
    }

    /// Retarget the running tween, or start one from `from` if idle.
    pub fn steer(&mut self, from: T, to: T, motion: Motion) {
        match self.tween.as_mut() {
            Some(tween) => tween.retarget(to),
            None => self.start(from, to, motion),
        }
    }

    /// Stop the running tween, returning its last displayed value.
    pub fn cancel(&mut self) -> Option<T> {
        self.tween.take().map(|t| t.current)
    }

    /// Advance one frame. Returns the new value while a tween runs. A tween
    /// that reaches its target stays in the slot so the value remains
    /// readable until the owner cancels it.
    pub fn step(&mut self) -> Option<&T> {
        let tween = self.tween.as_mut()?;
        tween.step();
        Some(tween.current())
    }

    #[must_use]
    pub fn value(&self) -> Option<&T> {
        self.tween.as_ref().map(Tween::current)
    }

    /// Whether a tween is present and not yet at its target.
    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.tween.as_ref().is_some_and(|t| !t.is_settled())
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.tween.is_some()
    }
}

/// The four independent animation slots of the engine.
#[derive(Debug, Clone, Default)]
pub struct Animations {
    /// Card drag: one origin per dragged card.
    pub drag: AnimationSlot<Vec<Point>>,
    /// Frame drag: frame origin first, then contained card origins.
    pub frame_drag: AnimationSlot<Vec<Point>>,
    /// Resize of one card or frame.
    pub resize: AnimationSlot<Rect>,
    /// Camera move toward a fitted pose.
    pub camera: AnimationSlot<CameraPose>,
}

impl Animations {
    /// Whether any slot still has distance to cover.
    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.drag.is_moving() || self.frame_drag.is_moving() || self.resize.is_moving() || self.camera.is_moving()
    }

    /// Drop every gesture animation. The camera slot is left alone.
    pub fn cancel_gestures(&mut self) {
        self.drag.cancel();
        self.frame_drag.cancel();
        self.resize.cancel();
    }

    pub fn cancel_all(&mut self) {
        self.cancel_gestures();
        self.camera.cancel();
    }
}
