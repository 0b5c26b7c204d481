//! Per-kind prize profiles and catch effects
//!
//! Each kind maps to a pure effect description. Nothing here touches round
//! state; the round controller applies the description at catch time.

use serde::{Deserialize, Serialize};

use super::state::PrizeKind;

/// Spawn-time ranges for a prize kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrizeProfile {
    /// Inclusive weight range
    pub weight: (f32, f32),
    /// Inclusive base value range
    pub value: (u32, u32),
    /// Footprint multiplier on the base prize size
    pub scale: f32,
}

/// What catching a prize does beyond crediting its value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatchEffect {
    None,
    /// Add seconds to the countdown
    GrantTime { seconds: u32 },
    /// Remove every hazard and buff from the field
    ClearHazards,
    /// Replace the prize value with a draw from an inclusive range
    RerollValue { min: u32, max: u32 },
    /// Bonus equal to the summed value of every prize still on the field
    BoardBonus,
    /// Next drop snaps over the most valuable prize
    ArmAutoGrab { duration_ms: u64 },
    /// Hazards are neutralized instead of costing a life
    Shield { duration_ms: u64 },
}

impl PrizeKind {
    pub fn profile(&self) -> PrizeProfile {
        match self {
            PrizeKind::Normal => PrizeProfile {
                weight: (1.0, 1.5),
                value: (80, 150),
                scale: 1.0,
            },
            PrizeKind::Heavy => PrizeProfile {
                weight: (1.8, 2.2),
                value: (200, 300),
                scale: 1.25,
            },
            PrizeKind::TimeBonus => PrizeProfile {
                weight: (1.0, 1.0),
                value: (50, 50),
                scale: 0.9,
            },
            PrizeKind::Cleaner => PrizeProfile {
                weight: (1.2, 1.2),
                value: (60, 60),
                scale: 0.9,
            },
            PrizeKind::Surprise => PrizeProfile {
                weight: (1.0, 1.0),
                value: (100, 100),
                scale: 1.0,
            },
            PrizeKind::GoldEgg => PrizeProfile {
                weight: (2.5, 2.5),
                value: (500, 500),
                scale: 1.1,
            },
            PrizeKind::RainbowEgg => PrizeProfile {
                weight: (1.3, 1.3),
                value: (100, 100),
                scale: 1.0,
            },
            PrizeKind::Mystery => PrizeProfile {
                weight: (1.0, 1.0),
                value: (30, 30),
                scale: 0.8,
            },
        }
    }

    /// Effect dispatch table
    pub fn catch_effect(&self) -> CatchEffect {
        match self {
            PrizeKind::Normal | PrizeKind::Heavy => CatchEffect::None,
            PrizeKind::TimeBonus => CatchEffect::GrantTime { seconds: 10 },
            PrizeKind::Cleaner => CatchEffect::ClearHazards,
            PrizeKind::Surprise => CatchEffect::RerollValue { min: 5, max: 300 },
            PrizeKind::GoldEgg => CatchEffect::Shield { duration_ms: 3000 },
            PrizeKind::RainbowEgg => CatchEffect::BoardBonus,
            PrizeKind::Mystery => CatchEffect::ArmAutoGrab { duration_ms: 8000 },
        }
    }
}
