// Browser-side smoke test. Run with `wasm-pack test --headless --chrome`;
// ignored entirely on native targets where the regular integration tests
// cover the simulation.
#![cfg(target_arch = "wasm32")]

use grace_quest::game::level_town;
use grace_quest::game::player::InputSnapshot;
use grace_quest::game::session::GameSession;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn session_ticks_under_wasm() {
    let mut session = GameSession::new(level_town::town().clone());
    let events = session.tick(InputSnapshot::default());
    assert!(events.is_empty());
    assert_eq!(session.frame, 1);
}
