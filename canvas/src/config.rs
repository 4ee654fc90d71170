//! Engine configuration.
//!
//! DESIGN
//! ======
//! Every tunable number the geometry kernel and interaction controller read
//! lives in one immutable [`CanvasConfig`], handed to
//! [`crate::engine::EngineCore::with_config`] at construction. Hosts may
//! deserialize it from JSON; missing keys fall back to [`crate::consts`].

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::CanvasError;
use crate::motion::Motion;

/// Inclusive size limits applied to a resize target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeBounds {
    pub min_width: f64,
    pub min_height: f64,
    pub max_width: f64,
    pub max_height: f64,
}

impl SizeBounds {
    /// Clamp a width into range.
    #[must_use]
    pub fn clamp_width(&self, w: f64) -> f64 {
        w.clamp(self.min_width, self.max_width)
    }

    /// Clamp a height into range.
    #[must_use]
    pub fn clamp_height(&self, h: f64) -> f64 {
        h.clamp(self.min_height, self.max_height)
    }
}

/// Tunables for the geometry kernel and interaction controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Grid dot spacing in world units.
    pub grid_spacing: f64,
    /// Lowest camera zoom.
    pub min_zoom: f64,
    /// Highest camera zoom.
    pub max_zoom: f64,
    /// Zoom exponent per wheel pixel.
    pub wheel_zoom_sensitivity: f64,
    /// Screen padding around fitted content.
    pub fit_padding_px: f64,
    /// Resize handle side length in screen pixels.
    pub handle_size_px: f64,
    /// Frame border strip thickness in world units.
    pub frame_border_width: f64,
    /// Frame label strip height in world units.
    pub frame_label_height: f64,
    /// Minimum frame label strip width in world units.
    pub frame_label_min_width: f64,
    /// Width of one label character in world units.
    pub label_char_width: f64,
    /// Horizontal label padding in world units.
    pub label_padding: f64,
    /// Connection label box height in world units.
    pub connection_label_height: f64,
    /// Connection pick tolerance in screen pixels.
    pub connection_hit_tolerance_px: f64,
    /// Anchor dot pick radius in screen pixels.
    pub anchor_hit_radius_px: f64,
    /// Minimum bezier control offset in world units.
    pub connection_min_offset: f64,
    /// Bezier control offset as a fraction of endpoint distance.
    pub connection_offset_ratio: f64,
    /// Parametric samples used for connection hit-testing.
    pub connection_samples: usize,
    /// Color for connections created without one.
    pub default_connection_color: String,
    /// Width of new cards.
    pub default_card_width: f64,
    /// Fill color of new cards.
    pub default_card_color: String,
    /// Resize limits for cards.
    pub card_bounds: SizeBounds,
    /// Resize limits for frames.
    pub frame_bounds: SizeBounds,
    /// Card text padding in world units.
    pub card_padding: f64,
    /// Card character width in world units.
    pub card_char_width: f64,
    /// Card line height in world units.
    pub card_line_height: f64,
    /// Margin between a new frame and the selection it wraps.
    pub frame_wrap_margin: f64,
    /// Size of a frame created with nothing selected.
    pub default_frame_width: f64,
    /// Height of a frame created with nothing selected.
    pub default_frame_height: f64,
    /// Motion parameters for drag, resize and frame-drag.
    pub entity_motion: Motion,
    /// Motion parameters for camera moves.
    pub camera_motion: Motion,
    /// Maximum undo entries per grid.
    pub history_limit: usize,
    /// Offset applied to pasted entities without a pointer position.
    pub paste_offset: f64,
    /// Grid steps per arrow press with shift held.
    pub nudge_fast_steps: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            grid_spacing: GRID_SPACING,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            wheel_zoom_sensitivity: WHEEL_ZOOM_SENSITIVITY,
            fit_padding_px: FIT_PADDING_PX,
            handle_size_px: HANDLE_SIZE_PX,
            frame_border_width: FRAME_BORDER_WIDTH,
            frame_label_height: FRAME_LABEL_HEIGHT,
            frame_label_min_width: FRAME_LABEL_MIN_WIDTH,
            label_char_width: LABEL_CHAR_WIDTH,
            label_padding: LABEL_PADDING,
            connection_label_height: CONNECTION_LABEL_HEIGHT,
            connection_hit_tolerance_px: CONNECTION_HIT_TOLERANCE_PX,
            anchor_hit_radius_px: ANCHOR_HIT_RADIUS_PX,
            connection_min_offset: CONNECTION_MIN_OFFSET,
            connection_offset_ratio: CONNECTION_OFFSET_RATIO,
            connection_samples: CONNECTION_SAMPLES,
            default_connection_color: DEFAULT_CONNECTION_COLOR.to_string(),
            default_card_width: DEFAULT_CARD_WIDTH,
            default_card_color: DEFAULT_CARD_COLOR.to_string(),
            card_bounds: SizeBounds {
                min_width: MIN_CARD_WIDTH,
                min_height: MIN_CARD_HEIGHT,
                max_width: MAX_CARD_WIDTH,
                max_height: MAX_CARD_HEIGHT,
            },
            frame_bounds: SizeBounds {
                min_width: MIN_FRAME_WIDTH,
                min_height: MIN_FRAME_HEIGHT,
                max_width: MAX_FRAME_SIZE,
                max_height: MAX_FRAME_SIZE,
            },
            card_padding: CARD_PADDING,
            card_char_width: CARD_CHAR_WIDTH,
            card_line_height: CARD_LINE_HEIGHT,
            frame_wrap_margin: FRAME_WRAP_MARGIN,
            default_frame_width: DEFAULT_FRAME_WIDTH,
            default_frame_height: DEFAULT_FRAME_HEIGHT,
            entity_motion: Motion { lerp_factor: LERP_FACTOR, snap_epsilon: SNAP_EPSILON },
            camera_motion: Motion { lerp_factor: CAMERA_LERP_FACTOR, snap_epsilon: CAMERA_SNAP_EPSILON },
            history_limit: MAX_UNDO,
            paste_offset: PASTE_OFFSET,
            nudge_fast_steps: NUDGE_FAST_STEPS,
        }
    }
}

impl CanvasConfig {
    /// Check that every value is usable by the engine.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<(), CanvasError> {
        if !positive(self.grid_spacing) {
            return Err(invalid("grid_spacing must be positive"));
        }
        if !positive(self.min_zoom) || !positive(self.max_zoom) || self.min_zoom > self.max_zoom {
            return Err(invalid("zoom bounds must satisfy 0 < min_zoom <= max_zoom"));
        }
        if !positive(self.handle_size_px) || !positive(self.connection_hit_tolerance_px) {
            return Err(invalid("hit tolerances must be positive"));
        }
        for (name, value) in self.metrics() {
            if !value.is_finite() {
                return Err(invalid(&format!("{name} must be finite")));
            }
        }
        if self.connection_samples == 0 {
            return Err(invalid("connection_samples must be at least 1"));
        }
        for (name, bounds) in [("card_bounds", &self.card_bounds), ("frame_bounds", &self.frame_bounds)] {
            if !positive(bounds.min_width)
                || !positive(bounds.min_height)
                || !positive(bounds.max_width)
                || !positive(bounds.max_height)
                || bounds.min_width > bounds.max_width
                || bounds.min_height > bounds.max_height
            {
                return Err(invalid(&format!("{name} must be positive with min <= max")));
            }
        }
        for (name, motion) in [("entity_motion", &self.entity_motion), ("camera_motion", &self.camera_motion)] {
            if !positive(motion.lerp_factor) || motion.lerp_factor > 1.0 || !positive(motion.snap_epsilon) {
                return Err(invalid(&format!("{name} needs 0 < lerp_factor <= 1 and snap_epsilon > 0")));
            }
        }
        if self.history_limit == 0 {
            return Err(invalid("history_limit must be at least 1"));
        }
        Ok(())
    }

    /// Every remaining float tunable, by field name.
    fn metrics(&self) -> [(&'static str, f64); 20] {
        [
            ("wheel_zoom_sensitivity", self.wheel_zoom_sensitivity),
            ("fit_padding_px", self.fit_padding_px),
            ("frame_border_width", self.frame_border_width),
            ("frame_label_height", self.frame_label_height),
            ("frame_label_min_width", self.frame_label_min_width),
            ("label_char_width", self.label_char_width),
            ("label_padding", self.label_padding),
            ("connection_label_height", self.connection_label_height),
            ("anchor_hit_radius_px", self.anchor_hit_radius_px),
            ("connection_min_offset", self.connection_min_offset),
            ("connection_offset_ratio", self.connection_offset_ratio),
            ("default_card_width", self.default_card_width),
            ("card_padding", self.card_padding),
            ("card_char_width", self.card_char_width),
            ("card_line_height", self.card_line_height),
            ("frame_wrap_margin", self.frame_wrap_margin),
            ("default_frame_width", self.default_frame_width),
            ("default_frame_height", self.default_frame_height),
            ("paste_offset", self.paste_offset),
            ("nudge_fast_steps", self.nudge_fast_steps),
        ]
    }

    /// Clamp a zoom value into the configured range.
    #[must_use]
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.clamp(self.min_zoom, self.max_zoom)
    }
}

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn invalid(msg: &str) -> CanvasError {
    CanvasError::InvalidConfig(msg.to_string())
}
