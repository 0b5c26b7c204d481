//! Claw Rush headless runner
//!
//! Plays one round with a simple autopilot, logs the event stream and prints
//! the final snapshot as JSON.
//!
//! Usage: `claw-rush [config.json] [seed]`

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::error::Error;
    use std::time::{SystemTime, UNIX_EPOCH};

    use claw_rush::RoundConfig;
    use claw_rush::consts::*;
    use claw_rush::sim::{ClawMode, GameEvent, RoundController, RoundPhase, TickInput};

    /// Frame cap so a runaway config cannot loop forever (30 simulated minutes)
    const MAX_FRAMES: u64 = 60 * 60 * 30;

    /// Heat kept below this while boosting
    const HEAT_CEILING: f32 = 60.0;

    /// Aim at the most valuable prize, drop at once, boost while it is safe
    fn autopilot(controller: &RoundController) -> TickInput {
        match controller.claw().mode() {
            ClawMode::Ready | ClawMode::Aiming => {
                let Some(target) = controller.pool().most_valuable_prize() else {
                    return TickInput::default();
                };
                TickInput {
                    aim: Some(target.bounds().center().x / FIELD_WIDTH),
                    boost_held: false,
                    drop_requested: true,
                }
            }
            ClawMode::Retracting | ClawMode::Caught => {
                let resource = controller.resource();
                let boost_held = if controller.config().resource_policy.is_fuel() {
                    resource > RESOURCE_MIN
                } else {
                    resource < HEAT_CEILING
                };
                TickInput {
                    boost_held,
                    ..Default::default()
                }
            }
            _ => TickInput::default(),
        }
    }

    fn log_event(event: &GameEvent) {
        match event {
            GameEvent::TimeTick { time_remaining } => {
                log::debug!("{}s left", time_remaining)
            }
            GameEvent::RewardOffered { candidates } => {
                log::info!("Reward offered: {} candidates", candidates.len())
            }
            other => log::info!("{:?}", other),
        }
    }

    fn seed_from_clock() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }

    pub fn run() -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args().skip(1);
        let config = match args.next() {
            Some(path) => RoundConfig::load(&path)?,
            None => RoundConfig::default(),
        };
        let seed = match args.next() {
            Some(raw) => raw.parse::<u64>()?,
            None => seed_from_clock(),
        };
        log::info!("Claw Rush (headless) starting with seed {}", seed);

        let mut controller = RoundController::new(seed);
        controller.start_round(config)?;

        let mut frames = 0u64;
        let mut snapshot = controller.snapshot();
        while snapshot.phase == RoundPhase::Playing {
            if frames >= MAX_FRAMES {
                log::warn!("Frame cap reached; stopping with the round still running");
                break;
            }
            frames += 1;
            let input = autopilot(&controller);
            let now_ms = frames * 1000 / 60;
            snapshot = controller.tick(&input, SIM_DT, now_ms);
            snapshot.events.iter().for_each(log_event);
        }

        if controller.phase() == RoundPhase::RewardSelection {
            let grant = controller.select_reward(0)?;
            log::info!("Took reward: {} ({:?})", grant.item.name, grant.item.rarity);
            snapshot = controller.snapshot();
        }

        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    if let Err(e) = headless::run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::start, this is just to satisfy the compiler
}
