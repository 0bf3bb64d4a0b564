//! Browser smoke tests, run with `wasm-pack test --headless --firefox`
#![cfg(target_arch = "wasm32")]

use droplet_run::config::GameConfig;
use droplet_run::geometry::Viewport;
use droplet_run::host::{AudioSink, Cue};
use droplet_run::scheduler::Scheduler;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn cue_player_survives_every_cue() {
    let mut player = droplet_run::audio::CuePlayer::new();
    for cue in [Cue::Jump, Cue::Collect, Cue::Combo(4), Cue::GameOver] {
        player.play(cue);
    }
}

#[wasm_bindgen_test]
fn core_runs_under_wasm() {
    let mut scheduler = Scheduler::new(
        GameConfig::default(),
        Viewport::fit(1280.0),
        Pcg32::seed_from_u64(7),
    )
    .expect("default config is valid");
    let mut muted = Muted;
    assert!(!scheduler.jump(&mut muted));
    assert_eq!(scheduler.session().score(), 0);
    assert_eq!(scheduler.viewport().width, 852.0);
    assert_eq!(
        scheduler.world().obstacles.len(),
        GameConfig::default().layout.obstacle_count
    );
}

#[wasm_bindgen_test]
fn input_needs_the_game_canvas() {
    // the test page has no #game-canvas, so wiring stops before any listener
    let err = droplet_run::engine::input::prepare_input().unwrap_err();
    assert!(err.to_string().contains("game-canvas"));
}

struct Muted;

impl AudioSink for Muted {
    fn play(&mut self, _cue: Cue) {}
}
