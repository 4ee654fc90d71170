#![allow(clippy::float_cmp)]

use super::*;

#[test]
fn default_config_is_valid() {
    assert_eq!(CanvasConfig::default().validate(), Ok(()));
}

#[test]
fn defaults_come_from_consts() {
    let cfg = CanvasConfig::default();
    assert_eq!(cfg.grid_spacing, GRID_SPACING);
    assert_eq!(cfg.history_limit, 100);
    assert_eq!(cfg.connection_samples, 32);
    assert_eq!(cfg.entity_motion.lerp_factor, LERP_FACTOR);
}

#[test]
fn rejects_non_positive_grid() {
    let cfg = CanvasConfig { grid_spacing: 0.0, ..CanvasConfig::default() };
    assert!(matches!(cfg.validate(), Err(CanvasError::InvalidConfig(msg)) if msg.contains("grid_spacing")));
}

#[test]
fn rejects_inverted_zoom_bounds() {
    let cfg = CanvasConfig { min_zoom: 4.0, max_zoom: 2.0, ..CanvasConfig::default() };
    assert!(cfg.validate().is_err());
}

#[test]
fn rejects_inverted_size_bounds() {
    let mut cfg = CanvasConfig::default();
    cfg.card_bounds.min_width = 900.0;
    assert!(matches!(cfg.validate(), Err(CanvasError::InvalidConfig(msg)) if msg.contains("card_bounds")));
}

#[test]
fn rejects_lerp_factor_out_of_range() {
    let mut cfg = CanvasConfig::default();
    cfg.camera_motion.lerp_factor = 1.5;
    assert!(matches!(cfg.validate(), Err(CanvasError::InvalidConfig(msg)) if msg.contains("camera_motion")));
    cfg.camera_motion.lerp_factor = 0.0;
    assert!(cfg.validate().is_err());
}

#[test]
fn rejects_nan_and_infinite_values() {
    let cfg = CanvasConfig { grid_spacing: f64::NAN, ..CanvasConfig::default() };
    assert!(matches!(cfg.validate(), Err(CanvasError::InvalidConfig(msg)) if msg.contains("grid_spacing")));
    let cfg = CanvasConfig { max_zoom: f64::INFINITY, ..CanvasConfig::default() };
    assert!(cfg.validate().is_err());
    let cfg = CanvasConfig { min_zoom: f64::NAN, ..CanvasConfig::default() };
    assert!(cfg.validate().is_err());
    let mut cfg = CanvasConfig::default();
    cfg.entity_motion.lerp_factor = f64::NAN;
    assert!(matches!(cfg.validate(), Err(CanvasError::InvalidConfig(msg)) if msg.contains("entity_motion")));
    let cfg = CanvasConfig { paste_offset: f64::NAN, ..CanvasConfig::default() };
    assert!(matches!(cfg.validate(), Err(CanvasError::InvalidConfig(msg)) if msg.contains("paste_offset")));
}

#[test]
fn rejects_zero_history() {
    let cfg = CanvasConfig { history_limit: 0, ..CanvasConfig::default() };
    assert!(cfg.validate().is_err());
}

#[test]
fn clamp_zoom() {
    let cfg = CanvasConfig::default();
    assert_eq!(cfg.clamp_zoom(10.0), cfg.max_zoom);
    assert_eq!(cfg.clamp_zoom(0.01), cfg.min_zoom);
    assert_eq!(cfg.clamp_zoom(1.0), 1.0);
}

#[test]
fn size_bounds_clamp() {
    let b = SizeBounds { min_width: 80.0, min_height: 40.0, max_width: 800.0, max_height: 1200.0 };
    assert_eq!(b.clamp_width(10.0), 80.0);
    assert_eq!(b.clamp_width(900.0), 800.0);
    assert_eq!(b.clamp_height(100.0), 100.0);
}

#[test]
fn partial_json_falls_back_to_defaults() {
    let cfg: CanvasConfig = serde_json::from_str(r#"{ "grid_spacing": 25.0, "history_limit": 10 }"#)
        .unwrap_or_else(|e| panic!("parse failed: {e}"));
    assert_eq!(cfg.grid_spacing, 25.0);
    assert_eq!(cfg.history_limit, 10);
    assert_eq!(cfg.max_zoom, MAX_ZOOM);
    assert_eq!(cfg.default_card_color, DEFAULT_CARD_COLOR);
}
