//! Interaction engine for the spatial note canvas.
//!
//! This crate is compiled to WebAssembly for the browser host and natively for
//! the headless `noteboard` tool. It owns the full lifecycle of the canvas:
//! translating raw pointer and keyboard events into scene mutations,
//! maintaining camera state for pan/zoom, hit-testing cards, frames and
//! connections, animating snapped motion, keeping undo history, and drawing
//! the scene. The host is responsible only for wiring DOM events to the
//! engine, calling [`engine::EngineCore::frame`] once per animation tick, and
//! persisting the workspace when it reports changes.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine, testable [`engine::EngineCore`] and the gesture state machine |
//! | [`commands`] | Non-gesture commands: clipboard, editing, frames, grids, presentation |
//! | [`doc`] | Scene model: cards, frames, connections, selection, grids |
//! | [`history`] | Snapshot-based undo/redo |
//! | [`camera`] | Points, pan/zoom camera, fit-to-content |
//! | [`geometry`] | Rectangles, grid snapping, anchors and connection curves |
//! | [`layout`] | Card text wrapping and derived card height |
//! | [`hit`] | Hit-testing against the scene |
//! | [`input`] | Input event types and gesture states |
//! | [`motion`] | Lerp-with-epsilon tweens and cancelable animation slots |
//! | [`render`] | Render contract and the Canvas2D renderer |
//! | [`config`] | Immutable engine configuration |
//! | [`consts`] | Default numeric constants |
//! | [`error`] | Engine error type |

pub mod camera;
pub mod commands;
pub mod config;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod history;
pub mod hit;
pub mod input;
pub mod layout;
pub mod motion;
pub mod render;
