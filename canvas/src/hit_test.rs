use uuid::Uuid;

use super::*;
use crate::doc::Card;

// =============================================================
// Helpers
// =============================================================

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn add_card(scene: &mut Scene, x: f64, y: f64, w: f64, h: f64) -> EntityId {
    let card = Card { id: Uuid::new_v4(), x, y, width: w, height: h, text: String::new(), color: "#fff".into() };
    let id = card.id;
    scene.insert_card(card);
    id
}

fn add_frame(scene: &mut Scene, x: f64, y: f64, w: f64, h: f64, label: &str) -> EntityId {
    let frame = Frame { id: Uuid::new_v4(), x, y, width: w, height: h, label: label.into(), order: 1 };
    let id = frame.id;
    scene.insert_frame(frame);
    id
}

fn add_link(scene: &mut Scene, from: EntityId, to: EntityId, label: Option<&str>) -> EntityId {
    let conn = Connection {
        id: Uuid::new_v4(),
        from_card_id: from,
        to_card_id: to,
        from_anchor: Anchor::Right,
        to_anchor: Anchor::Left,
        color: "#000".into(),
        label: label.map(str::to_string),
    };
    scene.connect(conn).unwrap_or_else(|e| panic!("{e}"))
}

fn cfg() -> CanvasConfig {
    CanvasConfig::default()
}

// =============================================================
// Cards
// =============================================================

#[test]
fn card_hit_returns_topmost() {
    let mut scene = Scene::new();
    let _bottom = add_card(&mut scene, 0.0, 0.0, 100.0, 100.0);
    let top = add_card(&mut scene, 50.0, 50.0, 100.0, 100.0);
    assert_eq!(hit_test_cards(&scene, pt(75.0, 75.0)), Some(top));
}

#[test]
fn card_hit_misses_empty_space() {
    let mut scene = Scene::new();
    add_card(&mut scene, 0.0, 0.0, 100.0, 100.0);
    assert_eq!(hit_test_cards(&scene, pt(150.0, 150.0)), None);
}

#[test]
fn card_hit_follows_z_order_after_promotion() {
    let mut scene = Scene::new();
    let a = add_card(&mut scene, 0.0, 0.0, 100.0, 100.0);
    let _b = add_card(&mut scene, 0.0, 0.0, 100.0, 100.0);
    scene.bring_cards_to_front(&std::collections::HashSet::from([a]));
    assert_eq!(hit_test_cards(&scene, pt(10.0, 10.0)), Some(a));
}

// =============================================================
// Resize handles
// =============================================================

#[test]
fn handles_only_on_selected_entities() {
    let mut scene = Scene::new();
    let id = add_card(&mut scene, 0.0, 0.0, 100.0, 100.0);
    let cam = Camera::default();
    assert!(hit_test_resize_handle(&scene, &cam, pt(100.0, 100.0), &cfg()).is_none());
    scene.selection.select_card(id);
    assert_eq!(hit_test_resize_handle(&scene, &cam, pt(100.0, 100.0), &cfg()), Some((EntityRef::Card(id), Corner::Se)));
    assert_eq!(hit_test_resize_handle(&scene, &cam, pt(-3.0, 2.0), &cfg()), Some((EntityRef::Card(id), Corner::Nw)));
}

#[test]
fn handle_size_is_screen_space() {
    let mut scene = Scene::new();
    let id = add_card(&mut scene, 0.0, 0.0, 100.0, 100.0);
    scene.selection.select_card(id);
    let cam = Camera { x: 0.0, y: 0.0, zoom: 0.5 };
    // The NE corner projects to (50, 0); the handle is 10 px wide on screen
    // regardless of zoom.
    assert!(hit_test_resize_handle(&scene, &cam, pt(54.0, 4.0), &cfg()).is_some());
    assert!(hit_test_resize_handle(&scene, &cam, pt(57.0, 0.0), &cfg()).is_none());
}

#[test]
fn selected_frame_handles() {
    let mut scene = Scene::new();
    let id = add_frame(&mut scene, 0.0, 0.0, 400.0, 200.0, "F");
    scene.selection.select_frame(id);
    let hit = hit_test_resize_handle(&scene, &Camera::default(), pt(400.0, 0.0), &cfg());
    assert_eq!(hit, Some((EntityRef::Frame(id), Corner::Ne)));
}

// =============================================================
// Frames
// =============================================================

#[test]
fn frame_border_hits_but_interior_does_not() {
    let mut scene = Scene::new();
    let id = add_frame(&mut scene, 0.0, 0.0, 400.0, 200.0, "Plan");
    assert_eq!(hit_test_frames(&scene, pt(5.0, 100.0), &cfg()), Some(id));
    assert_eq!(hit_test_frames(&scene, pt(395.0, 100.0), &cfg()), Some(id));
    assert_eq!(hit_test_frames(&scene, pt(200.0, 100.0), &cfg()), None);
    assert_eq!(hit_test_frames(&scene, pt(500.0, 100.0), &cfg()), None);
}

#[test]
fn frame_label_strip_hits_above_top_left() {
    let mut scene = Scene::new();
    let id = add_frame(&mut scene, 0.0, 0.0, 400.0, 200.0, "Plan");
    assert_eq!(hit_test_frames(&scene, pt(20.0, -10.0), &cfg()), Some(id));
    // Label width: max(48, 16 + 4 * 7.5) = 48.
    assert_eq!(hit_test_frames(&scene, pt(60.0, -10.0), &cfg()), None);
}

#[test]
fn frame_label_width_grows_with_text() {
    let frame = Frame { id: Uuid::new_v4(), x: 10.0, y: 50.0, width: 400.0, height: 200.0, label: "Roadmap 2026".into(), order: 1 };
    let r = frame_label_rect(&frame, &cfg());
    assert!((r.width - (16.0 + 12.0 * 7.5)).abs() < 1e-9);
    assert!((r.y - 26.0).abs() < 1e-9);
}

// =============================================================
// Connections
// =============================================================

#[test]
fn connection_hit_near_curve() {
    let mut scene = Scene::new();
    let a = add_card(&mut scene, 0.0, 0.0, 180.0, 48.0);
    let b = add_card(&mut scene, 300.0, 0.0, 180.0, 48.0);
    let id = add_link(&mut scene, a, b, None);
    assert_eq!(hit_test_connections(&scene, pt(240.0, 26.0), 1.0, &cfg()), Some(id));
    assert_eq!(hit_test_connections(&scene, pt(240.0, 60.0), 1.0, &cfg()), None);
}

#[test]
fn connection_tolerance_scales_with_zoom() {
    let mut scene = Scene::new();
    let a = add_card(&mut scene, 0.0, 0.0, 180.0, 48.0);
    let b = add_card(&mut scene, 300.0, 0.0, 180.0, 48.0);
    add_link(&mut scene, a, b, None);
    // 10 world units off the line: outside 6px at zoom 1, inside at zoom 0.5.
    assert!(hit_test_connections(&scene, pt(240.0, 34.0), 1.0, &cfg()).is_none());
    assert!(hit_test_connections(&scene, pt(240.0, 34.0), 0.5, &cfg()).is_some());
}

#[test]
fn connection_label_box_hits() {
    let mut scene = Scene::new();
    let a = add_card(&mut scene, 0.0, 0.0, 180.0, 48.0);
    let b = add_card(&mut scene, 300.0, 0.0, 180.0, 48.0);
    let id = add_link(&mut scene, a, b, Some("depends on"));
    // Label is 16 + 10 * 7.5 = 91 wide and 20 tall, centered on (240, 24).
    assert_eq!(hit_test_connections(&scene, pt(200.0, 32.0), 1.0, &cfg()), Some(id));
}

#[test]
fn dangling_connection_is_skipped() {
    let mut scene = Scene::new();
    let a = add_card(&mut scene, 0.0, 0.0, 180.0, 48.0);
    let b = add_card(&mut scene, 300.0, 0.0, 180.0, 48.0);
    add_link(&mut scene, a, b, None);
    scene.remove_card(b);
    assert!(hit_test_connections(&scene, pt(240.0, 24.0), 1.0, &cfg()).is_none());
}

#[test]
fn curve_hit_checks_sample_points() {
    let curve = connection_curve(pt(0.0, 0.0), Anchor::Bottom, pt(0.0, 400.0), Anchor::Top, 40.0, 0.3);
    assert!(curve_hit(&curve, pt(2.0, 200.0), 6.0, 32));
    assert!(!curve_hit(&curve, pt(20.0, 200.0), 6.0, 32));
}

#[test]
fn curve_hit_misses_between_distant_samples() {
    // Control offset 600: sample 16 sits at x = 1000, sample 17 near x = 1065.6.
    let curve = connection_curve(pt(0.0, 0.0), Anchor::Right, pt(2000.0, 0.0), Anchor::Left, 40.0, 0.3);
    assert!(curve_hit(&curve, pt(1000.0, 3.0), 6.0, 32));
    assert!(!curve_hit(&curve, pt(1032.8, 0.0), 6.0, 32));
}

// =============================================================
// Anchors
// =============================================================

#[test]
fn anchor_hit_within_radius() {
    let mut scene = Scene::new();
    let a = add_card(&mut scene, 0.0, 0.0, 180.0, 48.0);
    assert_eq!(hit_test_anchor(&scene, pt(183.0, 26.0), 1.0, &cfg()), Some((a, Anchor::Right)));
    assert_eq!(hit_test_anchor(&scene, pt(90.0, 24.0), 1.0, &cfg()), None);
}

#[test]
fn anchor_radius_is_screen_space() {
    let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
    assert_eq!(anchor_at(&rect, pt(50.0, -12.0), 8.0), None);
    assert_eq!(anchor_at(&rect, pt(50.0, -12.0), 16.0), Some(Anchor::Top));
}

// =============================================================
// Box selection
// =============================================================

#[test]
fn box_select_is_strict_intersection() {
    let mut scene = Scene::new();
    let a = add_card(&mut scene, 0.0, 0.0, 100.0, 100.0);
    let _touching = add_card(&mut scene, 200.0, 0.0, 100.0, 100.0);
    let f = add_frame(&mut scene, 50.0, 50.0, 100.0, 100.0, "F");
    let rect = Rect::new(-10.0, -10.0, 210.0, 80.0);
    assert_eq!(cards_in_rect(&scene, &rect), vec![a]);
    assert_eq!(frames_in_rect(&scene, &rect), vec![f]);
}

#[test]
fn zero_area_box_selects_nothing() {
    let mut scene = Scene::new();
    add_card(&mut scene, 0.0, 0.0, 100.0, 100.0);
    assert!(cards_in_rect(&scene, &Rect::new(50.0, 50.0, 0.0, 0.0)).is_empty());
}
