//! Default numeric constants for the canvas crate.
//!
//! These seed [`crate::config::CanvasConfig::default`]. Engine code reads the
//! config, never these constants directly.

// ── Grid & zoom ─────────────────────────────────────────────────

/// World-space distance between grid dots; every placement snaps to it.
pub const GRID_SPACING: f64 = 20.0;

/// Smallest allowed camera zoom.
pub const MIN_ZOOM: f64 = 0.2;

/// Largest allowed camera zoom.
pub const MAX_ZOOM: f64 = 3.0;

/// Exponent applied per wheel pixel when zooming with ctrl/meta held.
pub const WHEEL_ZOOM_SENSITIVITY: f64 = 0.002;

/// Screen padding kept around content when fitting the camera to it.
pub const FIT_PADDING_PX: f64 = 40.0;

// ── Hit-testing ─────────────────────────────────────────────────

/// Side length of a resize handle square in screen pixels.
pub const HANDLE_SIZE_PX: f64 = 10.0;

/// Thickness of the clickable frame border strip in world units.
pub const FRAME_BORDER_WIDTH: f64 = 10.0;

/// Height of the frame label strip above the frame, in world units.
pub const FRAME_LABEL_HEIGHT: f64 = 24.0;

/// Approximate width of one label character in world units.
pub const LABEL_CHAR_WIDTH: f64 = 7.5;

/// Horizontal padding on each side of a label, in world units.
pub const LABEL_PADDING: f64 = 8.0;

/// Minimum width of a frame label strip in world units.
pub const FRAME_LABEL_MIN_WIDTH: f64 = 48.0;

/// Height of a connection label box in world units.
pub const CONNECTION_LABEL_HEIGHT: f64 = 20.0;

/// Screen-space tolerance for picking a connection curve.
pub const CONNECTION_HIT_TOLERANCE_PX: f64 = 6.0;

/// Screen-space radius of a connection anchor dot.
pub const ANCHOR_HIT_RADIUS_PX: f64 = 8.0;

// ── Connections ─────────────────────────────────────────────────

/// Minimum control-point offset along an anchor normal, in world units.
pub const CONNECTION_MIN_OFFSET: f64 = 40.0;

/// Control-point offset as a fraction of the endpoint distance.
pub const CONNECTION_OFFSET_RATIO: f64 = 0.3;

/// Number of parametric steps sampled when hit-testing a connection.
pub const CONNECTION_SAMPLES: usize = 32;

/// Color given to new connections when the caller supplies none.
pub const DEFAULT_CONNECTION_COLOR: &str = "#6B7280";

// ── Cards & frames ──────────────────────────────────────────────

/// Width of a newly created card.
pub const DEFAULT_CARD_WIDTH: f64 = 180.0;

/// Minimum card width reachable by resize.
pub const MIN_CARD_WIDTH: f64 = 80.0;

/// Maximum card width reachable by resize.
pub const MAX_CARD_WIDTH: f64 = 800.0;

/// Minimum card height; also the height of an empty card.
pub const MIN_CARD_HEIGHT: f64 = 40.0;

/// Maximum card height reachable by resize.
pub const MAX_CARD_HEIGHT: f64 = 1200.0;

/// Inner padding between the card border and its text.
pub const CARD_PADDING: f64 = 12.0;

/// Approximate width of one card text character in world units.
pub const CARD_CHAR_WIDTH: f64 = 7.5;

/// Line height of card text in world units.
pub const CARD_LINE_HEIGHT: f64 = 20.0;

/// Fill color of a newly created card.
pub const DEFAULT_CARD_COLOR: &str = "#FEF3C7";

/// Minimum frame width reachable by resize.
pub const MIN_FRAME_WIDTH: f64 = 120.0;

/// Minimum frame height reachable by resize.
pub const MIN_FRAME_HEIGHT: f64 = 80.0;

/// Maximum frame side length reachable by resize.
pub const MAX_FRAME_SIZE: f64 = 20_000.0;

/// Margin kept between a new frame and the selection it wraps.
pub const FRAME_WRAP_MARGIN: f64 = 40.0;

/// Size of a frame created at a point with nothing selected.
pub const DEFAULT_FRAME_WIDTH: f64 = 480.0;

/// Height of a frame created at a point with nothing selected.
pub const DEFAULT_FRAME_HEIGHT: f64 = 320.0;

// ── Motion & history ────────────────────────────────────────────

/// Fraction of the remaining distance covered per tick by entity animations.
pub const LERP_FACTOR: f64 = 0.35;

/// Remaining distance below which an entity animation snaps to its target.
pub const SNAP_EPSILON: f64 = 0.5;

/// Fraction of the remaining distance covered per tick by camera animations.
pub const CAMERA_LERP_FACTOR: f64 = 0.18;

/// Remaining distance below which a camera animation snaps to its target.
pub const CAMERA_SNAP_EPSILON: f64 = 0.001;

/// Maximum number of undo snapshots kept per grid.
pub const MAX_UNDO: usize = 100;

/// World offset applied to pasted entities when there is no pointer position.
pub const PASTE_OFFSET: f64 = 40.0;

/// Grid steps moved per arrow key press with shift held.
pub const NUDGE_FAST_STEPS: f64 = 5.0;
