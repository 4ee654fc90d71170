#![allow(clippy::float_cmp)]

use super::*;

// =============================================================
// Helpers
// =============================================================

fn card_at(x: f64, y: f64, w: f64, h: f64) -> Card {
    Card { id: Uuid::new_v4(), x, y, width: w, height: h, text: String::new(), color: "#fff".into() }
}

fn frame_at(x: f64, y: f64, w: f64, h: f64, order: i64) -> Frame {
    Frame { id: Uuid::new_v4(), x, y, width: w, height: h, label: "F".into(), order }
}

fn link(from: EntityId, to: EntityId) -> Connection {
    Connection {
        id: Uuid::new_v4(),
        from_card_id: from,
        to_card_id: to,
        from_anchor: Anchor::Right,
        to_anchor: Anchor::Left,
        color: "#000".into(),
        label: None,
    }
}

fn scene_with_two_cards() -> (Scene, EntityId, EntityId) {
    let mut scene = Scene::new();
    let a = card_at(0.0, 0.0, 180.0, 48.0);
    let b = card_at(300.0, 0.0, 180.0, 48.0);
    let (ia, ib) = (a.id, b.id);
    scene.insert_card(a);
    scene.insert_card(b);
    (scene, ia, ib)
}

// =============================================================
// Selection
// =============================================================

#[test]
fn selecting_one_kind_clears_others() {
    let mut sel = Selection::default();
    let (c, f) = (Uuid::new_v4(), Uuid::new_v4());
    sel.select_card(c);
    sel.select_frame(f);
    assert!(sel.cards.is_empty());
    assert!(sel.frames.contains(&f));
}

#[test]
fn toggle_card_is_scoped_to_cards() {
    let mut sel = Selection::default();
    let (a, b, f) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
    sel.frames.insert(f);
    sel.toggle_card(a);
    sel.toggle_card(b);
    assert_eq!(sel.cards.len(), 2);
    assert!(sel.frames.is_empty());
    sel.toggle_card(a);
    assert!(!sel.cards.contains(&a));
    assert!(sel.cards.contains(&b));
}

#[test]
fn selection_len_and_forget() {
    let mut sel = Selection::default();
    let id = Uuid::new_v4();
    sel.cards.insert(id);
    sel.connections.insert(Uuid::new_v4());
    assert_eq!(sel.len(), 2);
    sel.forget(id);
    assert_eq!(sel.len(), 1);
}

// =============================================================
// Cards
// =============================================================

#[test]
fn insert_appends_on_top() {
    let (scene, a, b) = scene_with_two_cards();
    assert_eq!(scene.cards[0].id, a);
    assert_eq!(scene.cards[1].id, b);
}

#[test]
fn insert_existing_id_replaces_in_place() {
    let (mut scene, a, _) = scene_with_two_cards();
    let mut updated = scene.card(a).cloned().unwrap_or_else(|| panic!("missing card"));
    updated.text = "changed".into();
    scene.insert_card(updated);
    assert_eq!(scene.cards.len(), 2);
    assert_eq!(scene.cards[0].text, "changed");
}

#[test]
fn remove_card_purges_selection() {
    let (mut scene, a, _) = scene_with_two_cards();
    scene.selection.select_card(a);
    assert!(scene.remove_card(a).is_some());
    assert!(scene.selection.cards.is_empty());
    assert!(scene.remove_card(a).is_none());
}

#[test]
fn cascade_removes_attached_connections() {
    let (mut scene, a, b) = scene_with_two_cards();
    let c = card_at(0.0, 300.0, 100.0, 40.0);
    let ic = c.id;
    scene.insert_card(c);
    let ab = scene.connect(link(a, b)).unwrap_or_else(|e| panic!("{e}"));
    let bc = scene.connect(link(b, ic)).unwrap_or_else(|e| panic!("{e}"));
    scene.selection.connections.insert(ab);

    let removed = scene.remove_cards_cascade(&HashSet::from([a]));
    assert_eq!(removed, 1);
    assert!(scene.connection(ab).is_none());
    assert!(scene.connection(bc).is_some());
    assert!(scene.selection.connections.is_empty());
}

#[test]
fn bring_to_front_keeps_relative_order() {
    let mut scene = Scene::new();
    let cards: Vec<Card> = (0..4).map(|i| card_at(f64::from(i) * 10.0, 0.0, 50.0, 50.0)).collect();
    let ids: Vec<EntityId> = cards.iter().map(|c| c.id).collect();
    for c in cards {
        scene.insert_card(c);
    }
    scene.bring_cards_to_front(&HashSet::from([ids[0], ids[2]]));
    let order: Vec<EntityId> = scene.cards.iter().map(|c| c.id).collect();
    assert_eq!(order, vec![ids[1], ids[3], ids[0], ids[2]]);
}

// =============================================================
// Connections
// =============================================================

#[test]
fn connect_rejects_self_link() {
    let (mut scene, a, _) = scene_with_two_cards();
    assert_eq!(scene.connect(link(a, a)), Err(CanvasError::SelfConnection(a)));
    assert!(scene.connections.is_empty());
}

#[test]
fn connect_rejects_duplicate_in_either_direction() {
    let (mut scene, a, b) = scene_with_two_cards();
    assert!(scene.connect(link(a, b)).is_ok());
    assert!(matches!(scene.connect(link(a, b)), Err(CanvasError::DuplicateConnection { .. })));
    assert!(matches!(scene.connect(link(b, a)), Err(CanvasError::DuplicateConnection { .. })));
    assert_eq!(scene.connections.len(), 1);
}

#[test]
fn connect_rejects_missing_card() {
    let (mut scene, a, _) = scene_with_two_cards();
    let ghost = Uuid::new_v4();
    assert_eq!(scene.connect(link(a, ghost)), Err(CanvasError::CardNotFound(ghost)));
}

#[test]
fn live_connections_skip_dangling() {
    let (mut scene, a, b) = scene_with_two_cards();
    assert!(scene.connect(link(a, b)).is_ok());
    scene.connections.push(link(a, Uuid::new_v4()));
    assert_eq!(scene.connections.len(), 2);
    assert_eq!(scene.live_connections().len(), 1);
}

// =============================================================
// Frames
// =============================================================

#[test]
fn cards_in_frame_requires_full_containment() {
    let mut scene = Scene::new();
    let inside = card_at(20.0, 40.0, 100.0, 40.0);
    let straddling = card_at(380.0, 40.0, 100.0, 40.0);
    let (i, s) = (inside.id, straddling.id);
    scene.insert_card(inside);
    scene.insert_card(straddling);
    let frame = frame_at(0.0, 0.0, 400.0, 200.0, 1);
    let contained = scene.cards_in_frame(&frame);
    assert!(contained.contains(&i));
    assert!(!contained.contains(&s));
}

#[test]
fn frames_in_order_sorts_ascending_with_stable_ties() {
    let mut scene = Scene::new();
    let f3 = frame_at(0.0, 0.0, 100.0, 100.0, 3);
    let f1 = frame_at(0.0, 0.0, 100.0, 100.0, 1);
    let f1b = frame_at(0.0, 0.0, 100.0, 100.0, 1);
    let ids = (f3.id, f1.id, f1b.id);
    scene.insert_frame(f3);
    scene.insert_frame(f1);
    scene.insert_frame(f1b);
    let order: Vec<EntityId> = scene.frames_in_order().iter().map(|f| f.id).collect();
    assert_eq!(order, vec![ids.1, ids.2, ids.0]);
    assert_eq!(scene.next_frame_order(), 4);
}

#[test]
fn next_frame_order_starts_at_one() {
    assert_eq!(Scene::new().next_frame_order(), 1);
}

// =============================================================
// Whole scene
// =============================================================

#[test]
fn content_bounds_covers_cards_and_frames() {
    let (mut scene, _, _) = scene_with_two_cards();
    scene.insert_frame(frame_at(-100.0, -50.0, 50.0, 50.0, 1));
    assert_eq!(scene.content_bounds(), Some(Rect::new(-100.0, -50.0, 580.0, 98.0)));
    assert!(Scene::new().content_bounds().is_none());
}

#[test]
fn prune_selection_drops_missing_ids() {
    let (mut scene, a, _) = scene_with_two_cards();
    scene.selection.cards.insert(a);
    scene.selection.cards.insert(Uuid::new_v4());
    scene.selection.frames.insert(Uuid::new_v4());
    scene.prune_selection();
    assert_eq!(scene.selection.cards.len(), 1);
    assert!(scene.selection.frames.is_empty());
}

#[test]
fn selection_is_not_serialized() {
    let (mut scene, a, _) = scene_with_two_cards();
    scene.selection.select_card(a);
    let json = serde_json::to_string(&scene).unwrap_or_else(|e| panic!("{e}"));
    assert!(!json.contains("selection"));
    let back: Scene = serde_json::from_str(&json).unwrap_or_else(|e| panic!("{e}"));
    assert!(back.selection.is_empty());
    assert_eq!(back.cards, scene.cards);
}

// =============================================================
// Workspace
// =============================================================

#[test]
fn default_workspace_has_one_active_grid() {
    let ws = Workspace::default();
    assert_eq!(ws.grids.len(), 1);
    assert!(ws.grid(ws.active_grid_id).is_some());
}

#[test]
fn grid_serializes_entities_inline() {
    let mut grid = Grid::new("Main");
    grid.scene.insert_card(card_at(0.0, 0.0, 100.0, 40.0));
    let value = serde_json::to_value(&grid).unwrap_or_else(|e| panic!("{e}"));
    assert!(value.get("cards").is_some_and(serde_json::Value::is_array));
    assert!(value.get("camera").is_some());
    assert_eq!(value.get("name").and_then(serde_json::Value::as_str), Some("Main"));
}

#[test]
fn connection_label_is_optional_in_json() {
    let json = format!(
        r#"{{"id":"{}","from_card_id":"{}","to_card_id":"{}","from_anchor":"top","to_anchor":"bottom","color":"red"}}"#,
        Uuid::new_v4(),
        Uuid::new_v4(),
        Uuid::new_v4()
    );
    let conn: Connection = serde_json::from_str(&json).unwrap_or_else(|e| panic!("{e}"));
    assert!(conn.label.is_none());
    assert_eq!(conn.from_anchor, Anchor::Top);
}
