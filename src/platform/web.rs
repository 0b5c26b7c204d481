//! Browser bindings
//!
//! `ClawGame` wraps a `RoundController` for a JS presentation layer:
//! JSON config in, JSON snapshots out. The page drives it from
//! `requestAnimationFrame`, passing `performance.now()` as the clock.

use wasm_bindgen::prelude::*;

use crate::config::RoundConfig;
use crate::sim::{RoundController, TickInput};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        // Logger already set by an earlier module instance
        return;
    }
    log::info!("Claw Rush core loaded");
}

/// One claw machine
#[wasm_bindgen]
pub struct ClawGame {
    controller: RoundController,
}

#[wasm_bindgen]
impl ClawGame {
    /// Seed is taken as f64 (JS number); e.g. `Date.now()`
    #[wasm_bindgen(constructor)]
    pub fn new(seed: f64) -> ClawGame {
        ClawGame {
            controller: RoundController::new(seed as u64),
        }
    }

    /// Start (or restart) a round; `undefined` uses the default config
    pub fn start_round(&mut self, config_json: Option<String>) -> Result<(), JsError> {
        let config = match config_json {
            Some(json) => RoundConfig::from_json_str(&json)?,
            None => RoundConfig::default(),
        };
        self.controller.start_round(config)?;
        Ok(())
    }

    /// Advance one frame and return the snapshot as JSON
    pub fn tick(
        &mut self,
        aim: Option<f32>,
        boost_held: bool,
        drop_requested: bool,
        dt: f32,
        now_ms: f64,
    ) -> Result<String, JsError> {
        let input = TickInput {
            aim,
            boost_held,
            drop_requested,
        };
        let snapshot = self.controller.tick(&input, dt, now_ms.max(0.0) as u64);
        Ok(serde_json::to_string(&snapshot)?)
    }

    /// Pick a reward candidate; returns the grant as JSON
    pub fn select_reward(&mut self, index: usize) -> Result<String, JsError> {
        let grant = self.controller.select_reward(index)?;
        Ok(serde_json::to_string(&grant)?)
    }

    /// Current frame without advancing or consuming events
    pub fn snapshot(&self) -> Result<String, JsError> {
        Ok(serde_json::to_string(&self.controller.snapshot())?)
    }
}
