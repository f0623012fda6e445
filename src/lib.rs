//! Inkly client core crate.
//!
//! A drawing-and-guessing game client: the player sketches a prompted
//! subject on a canvas against a countdown, and the finished raster is sent
//! to a scoring service that guesses what was drawn. Game logic (brush
//! planning, the round state machine, result view-models) is pure Rust and
//! tests natively; DOM and canvas access is confined to the glue modules.

use serde::Deserialize;
use wasm_bindgen::prelude::*;

mod app;
pub mod api;
pub mod brush;
pub mod color;
pub mod geometry;
pub mod render;
pub mod session;
pub mod timer;
pub mod view;

pub use app::{CANVAS_HEIGHT, CANVAS_WIDTH};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

// -----------------------------------------------------------------------------
// Brush progression ladder
// Levels at which the earnable brushes unlock; the free brushes are part of
// the default config and never appear here.
// -----------------------------------------------------------------------------

pub const BRUSH_UNLOCK_LEVELS: &[(u32, &str)] = &[
    (3, "neon"),
    (5, "spray"),
    (7, "marker"),
    (10, "sparkle"),
];

/// Earnable brushes a player of the given level has reached.
pub fn brushes_for_level(level: u32) -> Vec<brush::Brush> {
    BRUSH_UNLOCK_LEVELS
        .iter()
        .filter(|(at, _)| level >= *at)
        .filter_map(|(_, id)| brush::Brush::from_id(id))
        .collect()
}

// -----------------------------------------------------------------------------
// Configuration
// -----------------------------------------------------------------------------

/// Host-page configuration, passed to `start_game` as JSON.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Log state transitions and network outcomes to the console.
    pub debug_logging: bool,
    /// Brushes available before any profile is loaded.
    pub unlocked_brushes: Vec<String>,
}

impl Default for GameConfig {
    fn default() -> GameConfig {
        GameConfig {
            debug_logging: false,
            unlocked_brushes: vec![
                "normal".to_string(),
                "thick".to_string(),
                "dotted".to_string(),
                "eraser".to_string(),
            ],
        }
    }
}

// -----------------------------------------------------------------------------
// Unified entrypoint
// -----------------------------------------------------------------------------

#[wasm_bindgen]
pub fn start_game(config_json: Option<String>) -> Result<(), JsValue> {
    let config = match config_json {
        Some(json) => serde_json::from_str(&json)
            .map_err(|e| JsValue::from_str(&format!("bad game config: {e}")))?,
        None => GameConfig::default(),
    };
    app::start(config)
}
