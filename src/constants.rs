use crate::scene::Rgb;
use std::time::Duration;

// Hold interaction
pub const HOLD_DURATION: Duration = Duration::from_millis(1000);
pub const HOLD_CANCEL_REVERT: Duration = Duration::from_millis(200);

// Unlock sequence
pub const EXPLOSION_GROW: Duration = Duration::from_millis(400);
pub const EXPLOSION_FADE: Duration = Duration::from_millis(300);
pub const EXPLOSION_SCALE: f64 = 1.3;
pub const EXPLOSION_OPACITY: f64 = 0.8;
pub const FINAL_FILL: Duration = Duration::from_millis(500);

// Cascade
pub const FLOW_REVEAL: Duration = Duration::from_millis(1500);
pub const FLOW_STROKE_WIDTH: f64 = 3.0;
pub const CHILD_RECOLOR: Duration = Duration::from_millis(300);

// Full recolor of every node and edge
pub const GLOBAL_REFRESH: Duration = Duration::from_millis(1000);

// Selection ring
pub const SELECTION_MARGIN: f64 = 4.0;
pub const SELECTION_PULSE: f64 = 2.0;
pub const SELECTION_PULSE_HALF: Duration = Duration::from_millis(700);
pub const SELECTION_STROKE_WIDTH: f64 = 2.5;

// Geometry
pub const ROOT_RADIUS: f64 = 30.0;
pub const NODE_RADIUS: f64 = 20.0;
pub const NODE_STROKE_WIDTH: f64 = 2.0;
pub const EDGE_STROKE_WIDTH: f64 = 2.0;

// Palette
pub const COLOR_NODE_START: Rgb = Rgb::new(0xFF, 0xA5, 0x00);
pub const COLOR_NODE_UNLOCKED: Rgb = Rgb::new(0xFF, 0xFF, 0xFF);
pub const COLOR_NODE_LOCKED: Rgb = Rgb::new(0x66, 0x66, 0x66);
pub const COLOR_NODE_UNLOCKABLE: Rgb = Rgb::new(0x66, 0x66, 0xFF);
pub const COLOR_NODE_STROKE: Rgb = Rgb::new(0x22, 0x22, 0x22);
pub const COLOR_LINK: Rgb = Rgb::new(0x55, 0x55, 0x55);
pub const COLOR_HOLD_FILL: Rgb = Rgb::new(0x66, 0x66, 0x66);
pub const COLOR_SELECTION: Rgb = Rgb::new(0xFF, 0xFF, 0x00);

// Persistence keys
pub const KEY_UNLOCKED: &str = "unlocked";
pub const KEY_LEVEL: &str = "level";
pub const PROGRESS_FILE_NAME: &str = "progress.json";
pub const LOG_FILE_NAME: &str = "unlocktree.log";

// Presentation shell
pub const FRAME_POLL_MS: u64 = 16;
pub const MIN_ZOOM: f64 = 0.05;
pub const MAX_ZOOM: f64 = 2.0;
pub const DEFAULT_ZOOM: f64 = 0.35;
pub const ZOOM_STEP: f64 = 1.25;
pub const PAN_STEP_CELLS: f64 = 4.0;
/// Nominal pixel size of one terminal cell, used to map zoom to cells.
pub const CELL_WIDTH_PX: f64 = 8.0;
pub const CELL_HEIGHT_PX: f64 = 16.0;
pub const SIDEBAR_WIDTH: u16 = 36;
