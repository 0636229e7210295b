//! Browser shell around the simulation core.
//!
//! Everything DOM-flavored lives here: canvas and HUD overlay creation, the
//! key listeners that maintain the held-key snapshot, the animation-frame
//! loop, and the translation of core events into the score/health overlays.
//! The shell owns exactly one `GameSession` at a time; a generation counter
//! guarantees at most one live tick subscription per game view, so restarts
//! never leave an orphaned loop mutating a stale session.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, window};

pub mod combat;
pub mod enemy;
pub mod item;
pub mod level;
pub mod level_town;
pub mod map;
pub mod player;
pub mod render;
pub mod session;

use self::player::InputSnapshot;
use self::session::{GameEvent, GamePhase, GameSession, VIEWPORT_HEIGHT, VIEWPORT_WIDTH};

/// CSS upscale factor for the logical 256x224 surface.
const SCALE: f64 = 3.0;
/// Score awarded for a beneficial pickup.
const SCORE_COLLECT: i64 = 10;
/// Score lost when the player takes a hit.
const SCORE_HIT_PENALTY: i64 = 20;
/// Starting health shown in the HUD.
const MAX_HEALTH: i32 = 100;
/// Health lost per hit.
const HIT_DAMAGE: i32 = 10;

/// Thin sink for core events; the real reducer-style store lives outside
/// the crate, this just keeps the built-in overlays honest.
struct HudModel {
    score: i64,
    health: i32,
}

impl HudModel {
    fn fresh() -> Self {
        Self {
            score: 0,
            health: MAX_HEALTH,
        }
    }
}

/// Per-view shell state behind the thread-local cell.
struct ShellState {
    ctx: CanvasRenderingContext2d,
    session: GameSession,
    input: InputSnapshot,
    hud: HudModel,
    last_ts: f64,
}

thread_local! {
    static STATE: RefCell<Option<ShellState>> = const { RefCell::new(None) };
    /// Bumped on every boot/teardown; stale loop closures see a mismatch and
    /// stop rescheduling themselves.
    static GENERATION: Cell<u32> = const { Cell::new(0) };
    static LISTENERS_INSTALLED: Cell<bool> = const { Cell::new(false) };
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Boot the game view: canvas, overlays, listeners, loop.
pub fn start_game_view() -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    // Create / reuse the game canvas.
    let canvas: HtmlCanvasElement = if let Some(el) = doc.get_element_by_id("gq-canvas") {
        el.dyn_into()?
    } else {
        let c: HtmlCanvasElement = doc.create_element("canvas")?.dyn_into()?;
        c.set_id("gq-canvas");
        c.set_width(VIEWPORT_WIDTH as u32);
        c.set_height(VIEWPORT_HEIGHT as u32);
        c.set_attribute(
            "style",
            &format!(
                "position:fixed; left:50%; top:50%; transform:translate(-50%,-50%); \
                 width:{}px; height:{}px; image-rendering:pixelated; background:#000; \
                 border:2px solid #222; z-index:20;",
                VIEWPORT_WIDTH * SCALE,
                VIEWPORT_HEIGHT * SCALE
            ),
        )
        .ok();
        doc.body()
            .ok_or_else(|| JsValue::from_str("no body"))?
            .append_child(&c)?;
        c
    };
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into()?;

    ensure_overlay(&doc, "gq-score", "Score: 0", "top:10px; left:12px;")?;
    ensure_overlay(
        &doc,
        "gq-health",
        &format!("Health: {MAX_HEALTH}"),
        "top:10px; left:130px;",
    )?;
    ensure_overlay(
        &doc,
        "gq-message",
        "",
        "top:50%; left:50%; transform:translate(-50%,-50%); font-size:22px; display:none;",
    )?;

    install_key_listeners(&doc)?;

    let session = GameSession::new(level_town::town().clone());
    let state = ShellState {
        ctx,
        session,
        input: InputSnapshot::default(),
        hud: HudModel::fresh(),
        last_ts: 0.0,
    };
    STATE.with(|cell| cell.replace(Some(state)));

    let generation = GENERATION.with(|g| {
        let next = g.get().wrapping_add(1);
        g.set(next);
        next
    });
    start_frame_loop(generation);
    Ok(())
}

/// Restart the current run (exported through `crate::reset_level`).
pub fn reset_level_view() {
    STATE.with(|cell| {
        if let Some(state) = cell.borrow_mut().as_mut() {
            state.session.reset();
            state.session.phase = GamePhase::Playing;
            state.hud = HudModel::fresh();
        }
    });
    set_message("", false);
}

/// Phase switch from the host (exported through `crate::set_phase`).
pub fn set_phase_view(phase: &str) {
    let Some(next) = (match phase {
        "menu" => Some(GamePhase::Menu),
        "playing" => Some(GamePhase::Playing),
        "interlude" => Some(GamePhase::Interlude),
        _ => None,
    }) else {
        return;
    };
    STATE.with(|cell| {
        if let Some(state) = cell.borrow_mut().as_mut() {
            // Leaving the menu starts a fresh run.
            if state.session.phase == GamePhase::Menu && next == GamePhase::Playing {
                state.session.reset();
                state.hud = HudModel::fresh();
            }
            state.session.phase = next;
        }
    });
    if phase == "playing" {
        set_message("", false);
    }
}

fn ensure_overlay(
    doc: &web_sys::Document,
    id: &str,
    text: &str,
    placement: &str,
) -> Result<(), JsValue> {
    if doc.get_element_by_id(id).is_some() {
        return Ok(());
    }
    let Some(body) = doc.body() else {
        return Ok(());
    };
    let div = doc.create_element("div")?;
    div.set_id(id);
    div.set_text_content(Some(text));
    div.set_attribute(
        "style",
        &format!(
            "position:fixed; {placement} font-family:monospace; font-size:15px; \
             padding:4px 8px; background:rgba(0,0,0,0.42); border:1px solid #333; \
             border-radius:6px; color:#ffd166; z-index:45; letter-spacing:0.5px;"
        ),
    )
    .ok();
    body.append_child(&div)?;
    Ok(())
}

/// Keyboard listeners maintaining the held-key snapshot. Installed once per
/// page; the handlers write through the thread-local so restarts keep them.
fn install_key_listeners(doc: &web_sys::Document) -> Result<(), JsValue> {
    if LISTENERS_INSTALLED.with(Cell::get) {
        return Ok(());
    }

    let down = Closure::wrap(Box::new(move |evt: KeyboardEvent| {
        if apply_key(&evt.key(), true) {
            evt.prevent_default();
        }
    }) as Box<dyn FnMut(_)>);
    doc.add_event_listener_with_callback("keydown", down.as_ref().unchecked_ref())?;
    down.forget();

    let up = Closure::wrap(Box::new(move |evt: KeyboardEvent| {
        apply_key(&evt.key(), false);
    }) as Box<dyn FnMut(_)>);
    doc.add_event_listener_with_callback("keyup", up.as_ref().unchecked_ref())?;
    up.forget();

    LISTENERS_INSTALLED.with(|f| f.set(true));
    Ok(())
}

/// Route one key event into the input snapshot. Returns true when handled.
fn apply_key(key: &str, held: bool) -> bool {
    STATE.with(|cell| {
        let mut state = cell.borrow_mut();
        let Some(state) = state.as_mut() else {
            return false;
        };
        match key {
            "ArrowUp" | "w" | "W" => state.input.up = held,
            "ArrowDown" | "s" | "S" => state.input.down = held,
            "ArrowLeft" | "a" | "A" => state.input.left = held,
            "ArrowRight" | "d" | "D" => state.input.right = held,
            " " => state.input.attack = held,
            _ => return false,
        }
        true
    })
}

/// Self-rescheduling animation-frame loop. The captured generation makes the
/// loop cancelable: once `GENERATION` moves on, this closure returns without
/// rescheduling and the old subscription dies.
fn start_frame_loop(generation: u32) {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        if GENERATION.with(Cell::get) != generation {
            return;
        }
        STATE.with(|cell| {
            if let Some(state) = cell.borrow_mut().as_mut() {
                shell_tick(state, ts);
            }
        });
        if let Some(w) = window() {
            let _ =
                w.request_animation_frame(f.borrow().as_ref().unwrap().as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64)>));
    if let Some(w) = window() {
        let _ = w.request_animation_frame(g.borrow().as_ref().unwrap().as_ref().unchecked_ref());
    }
}

/// One scheduled pass: simulate, dispatch events, render, refresh overlays.
fn shell_tick(state: &mut ShellState, ts: f64) {
    // Delta time is measured per pass and available to hosts that want a
    // fixed timestep; the simulation itself is purely frame-counted.
    let _delta_ms = ts - state.last_ts;
    state.last_ts = ts;

    let events = state.session.tick(state.input);
    for event in events {
        match event {
            GameEvent::Collect => state.hud.score += SCORE_COLLECT,
            GameEvent::Hit => {
                state.hud.score = (state.hud.score - SCORE_HIT_PENALTY).max(0);
                state.hud.health = (state.hud.health - HIT_DAMAGE).max(0);
            }
            // Optional hook: the external store may count kills; the built-in
            // HUD only reflects them through the live-enemy hint.
            GameEvent::EnemyKill => {}
            GameEvent::CheckpointReached => {
                state.session.phase = GamePhase::Interlude;
                set_message("The church doors open before you...", true);
            }
        }
    }

    render::draw_frame(&state.ctx, &state.session);

    if let Some(doc) = window().and_then(|w| w.document()) {
        if let Some(el) = doc.get_element_by_id("gq-score") {
            el.set_text_content(Some(&format!("Score: {}", state.hud.score)));
        }
        if let Some(el) = doc.get_element_by_id("gq-health") {
            el.set_text_content(Some(&format!("Health: {}", state.hud.health)));
        }
    }
}

fn set_message(text: &str, visible: bool) {
    let Some(doc) = window().and_then(|w| w.document()) else {
        return;
    };
    let Some(el) = doc.get_element_by_id("gq-message") else {
        return;
    };
    el.set_text_content(Some(text));
    let display = if visible { "block" } else { "none" };
    el.set_attribute(
        "style",
        &format!(
            "position:fixed; top:50%; left:50%; transform:translate(-50%,-50%); \
             font-family:monospace; font-size:22px; padding:12px 18px; \
             background:rgba(0,0,0,0.72); border:1px solid #333; border-radius:6px; \
             color:#ffd166; z-index:60; display:{display};"
        ),
    )
    .ok();
}
