//! Claw Rush - A claw-machine arcade simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (claw, entities, collisions, round flow)
//! - `config`: Data-driven round configuration
//! - `error`: Configuration and reward-selection errors
//! - `platform`: Browser bindings for the presentation layer

pub mod config;
pub mod error;
pub mod platform;
pub mod sim;

pub use config::{KindWeight, ResourcePolicy, RoundConfig};
pub use error::{ConfigError, RewardError};

/// Game configuration constants
pub mod consts {
    /// Default frame step used by headless runners (60 Hz, like a browser rAF loop)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Longest frame step the simulation will integrate (tab-switch stalls)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Play field dimensions (field units, y grows downward)
    pub const FIELD_WIDTH: f32 = 400.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Claw geometry
    pub const CLAW_WIDTH: f32 = 60.0;
    pub const CLAW_HEIGHT: f32 = 50.0;

    /// Claw vertical scale (100 = fully retracted)
    pub const CLAW_HOME: f32 = 100.0;
    pub const CLAW_MIN_DEPTH: f32 = 5.0;

    /// Prize footprint before per-kind scaling
    pub const PRIZE_BASE_WIDTH: f32 = 50.0;
    pub const PRIZE_BASE_HEIGHT: f32 = 70.0;
    /// Gap between prize bottoms and the field floor
    pub const PRIZE_FLOOR_MARGIN: f32 = 10.0;
    /// Placement retries before overlap is accepted
    pub const PLACEMENT_ATTEMPTS: u32 = 24;

    /// Hazard footprint and lanes
    pub const HAZARD_SIZE: f32 = 40.0;
    pub const HAZARD_EDGE_MARGIN: f32 = 10.0;
    pub const HAZARD_LANE_TOP: f32 = 100.0;
    pub const HAZARD_LANE_BOTTOM: f32 = FIELD_HEIGHT - 300.0;
    /// One traversal leg lasts between these (seconds)
    pub const HAZARD_LEG_MIN_SECS: f32 = 6.0;
    pub const HAZARD_LEG_MAX_SECS: f32 = 10.0;

    /// Resource gauge bounds
    pub const RESOURCE_MIN: f32 = 0.0;
    pub const RESOURCE_MAX: f32 = 100.0;

    /// Countdown cadence
    pub const COUNTDOWN_PERIOD_MS: u64 = 1000;
}

/// Map a normalized aim in [0, 1] to the claw's left edge, keeping the claw
/// inside the field
#[inline]
pub fn aim_to_claw_x(aim: f32) -> f32 {
    use consts::{CLAW_WIDTH, FIELD_WIDTH};
    let aim = if aim.is_finite() { aim.clamp(0.0, 1.0) } else { 0.5 };
    (aim * FIELD_WIDTH - CLAW_WIDTH / 2.0).clamp(0.0, FIELD_WIDTH - CLAW_WIDTH)
}

/// Screen-space y of the claw tip for a vertical position on the 0-100 scale
#[inline]
pub fn claw_tip_y(vertical: f32) -> f32 {
    consts::FIELD_HEIGHT * (1.0 - vertical / consts::CLAW_HOME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use consts::*;

    #[test]
    fn test_aim_clamps_to_field() {
        assert_eq!(aim_to_claw_x(0.0), 0.0);
        assert_eq!(aim_to_claw_x(1.0), FIELD_WIDTH - CLAW_WIDTH);
        assert_eq!(aim_to_claw_x(5.0), FIELD_WIDTH - CLAW_WIDTH);
        let mid = aim_to_claw_x(0.5);
        assert!((mid - (FIELD_WIDTH / 2.0 - CLAW_WIDTH / 2.0)).abs() < 0.001);
    }

    #[test]
    fn test_claw_tip_spans_field() {
        assert!(claw_tip_y(CLAW_HOME).abs() < 0.001);
        assert!((claw_tip_y(0.0) - FIELD_HEIGHT).abs() < 0.001);
    }
}
