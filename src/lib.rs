//! Grace Quest core crate.
//!
//! A browser 2D action RPG in the top-down SNES mold: a tile-map town, a
//! controllable avatar, patrolling enemies, melee combat, item pickups and a
//! checkpoint that hands off to a narrative interlude. The simulation itself
//! (`game::session` and the modules it draws on) is pure frame-counter
//! arithmetic with no DOM access, so it compiles and tests natively; only the
//! shell in `game` touches wasm-bindgen / web-sys.

use wasm_bindgen::prelude::*;

pub mod game;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Boot the game into the host page: creates the canvas and HUD overlays,
/// installs key listeners and starts the animation-frame loop.
#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    game::start_game_view()
}

/// Reinstall a fresh run of the current level (player at spawn, items
/// uncollected, enemies at full health, checkpoint latch cleared).
#[wasm_bindgen]
pub fn reset_level() {
    game::reset_level_view();
}

/// Switch the game phase from the host ("menu", "playing", "interlude").
/// Unknown strings are ignored. Simulation only advances while "playing".
#[wasm_bindgen]
pub fn set_phase(phase: &str) {
    game::set_phase_view(phase);
}
