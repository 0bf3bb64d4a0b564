// ==================== Modules ====================
// core : pure game logic, runs and tests anywhere
pub mod ball;
pub mod config;
pub mod geometry;
pub mod host;
pub mod layout;
pub mod respawn;
pub mod scheduler;
pub mod session;

// browser glue
pub mod audio;
pub mod browser;
pub mod engine;
pub mod game;

use wasm_bindgen::prelude::*;

// ==================== Main Functions ====================
/// Main entry for Webassembly module
/// - installs panic + log hooks
/// - loads config and starts the game loop
#[wasm_bindgen]
pub fn main_js() -> Result<(), JsValue> {
    // better panic messages for debugging
    console_error_panic_hook::set_once();

    init_logging();

    // wasm has no threads : the loop runs as a local task
    browser::spawn_local(async move {
        if let Err(err) = engine::GameLoop::start(game::DropletRun::new()).await {
            log::error!("Could not start game : {:#}", err);
        }
    });

    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn init_logging() {
    if let Err(err) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("logger already set : {}", err).into());
    }
}

// native builds (tests) leave the log facade unset
#[cfg(not(target_arch = "wasm32"))]
fn init_logging() {}
