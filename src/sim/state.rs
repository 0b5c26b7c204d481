//! Entity and round state types
//!
//! Everything a round owns lives here: prizes, hazards, the scoring
//! aggregate and the events reported to the presentation layer.

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use super::reward::{RewardCandidate, RewardItem};
use crate::config::RoundConfig;

/// Entity identifier, unique within a round generation
pub type EntityId = u32;

/// Prize types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PrizeKind {
    #[default]
    Normal,
    Heavy,
    TimeBonus,
    Cleaner,
    Surprise,
    GoldEgg,
    RainbowEgg,
    Mystery,
}

impl PrizeKind {
    pub const ALL: [PrizeKind; 8] = [
        PrizeKind::Normal,
        PrizeKind::Heavy,
        PrizeKind::TimeBonus,
        PrizeKind::Cleaner,
        PrizeKind::Surprise,
        PrizeKind::GoldEgg,
        PrizeKind::RainbowEgg,
        PrizeKind::Mystery,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PrizeKind::Normal => "Normal",
            PrizeKind::Heavy => "Heavy",
            PrizeKind::TimeBonus => "TimeBonus",
            PrizeKind::Cleaner => "Cleaner",
            PrizeKind::Surprise => "Surprise",
            PrizeKind::GoldEgg => "GoldEgg",
            PrizeKind::RainbowEgg => "RainbowEgg",
            PrizeKind::Mystery => "Mystery",
        }
    }
}

/// A grabbable prize
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prize {
    pub id: EntityId,
    pub kind: PrizeKind,
    /// Top-left corner in field space
    pub pos: Vec2,
    pub size: Vec2,
    /// Retract speed divisor once grabbed (always > 0)
    pub weight: f32,
    pub base_value: u32,
    /// Held by the claw
    pub captured: bool,
    /// Where the prize sits on the field floor; restored when dropped
    pub original_pos: Vec2,
}

impl Prize {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    /// Put the prize back where it was spawned and release it
    pub fn restore(&mut self) {
        self.pos = self.original_pos;
        self.captured = false;
    }
}

/// Hazard/buff categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardCategory {
    /// Costs a life on contact
    Hazard,
    /// Refills the fuel gauge on contact
    FuelRefill,
}

/// Horizontal ping-pong sweep across a lane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Traverse {
    pub from_x: f32,
    pub to_x: f32,
    /// Seconds for one leg (from -> to)
    pub leg_secs: f32,
    /// Seconds since the sweep started
    pub elapsed: f32,
}

impl Traverse {
    /// A traverse that never moves
    pub fn stationary(x: f32) -> Self {
        Self {
            from_x: x,
            to_x: x,
            leg_secs: 0.0,
            elapsed: 0.0,
        }
    }

    /// Current x for the elapsed time
    pub fn x(&self) -> f32 {
        if self.leg_secs <= 0.0 || self.from_x == self.to_x {
            return self.from_x;
        }
        let t = self.elapsed.rem_euclid(2.0 * self.leg_secs);
        let span = self.to_x - self.from_x;
        if t < self.leg_secs {
            self.from_x + span * (t / self.leg_secs)
        } else {
            self.to_x - span * ((t - self.leg_secs) / self.leg_secs)
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.elapsed += dt;
    }
}

/// A non-grabbable obstacle or buff drifting across the field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hazard {
    pub id: EntityId,
    pub category: HazardCategory,
    pub pos: Vec2,
    pub size: Vec2,
    /// Set on first contact; destroyed hazards never re-trigger
    pub destroyed: bool,
    pub motion: Traverse,
}

impl Hazard {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    /// Follow the traverse by `dt` seconds
    pub fn advance(&mut self, dt: f32) {
        self.motion.advance(dt);
        self.pos.x = self.motion.x();
    }
}

/// A scored catch, kept for the reward-selection phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatchRecord {
    pub prize_id: EntityId,
    pub kind: PrizeKind,
    pub weight: f32,
    /// Value credited for the prize itself (after any reroll)
    pub value: u32,
    /// Extra score from the kind's effect (board-wide bonus)
    pub bonus: u64,
}

/// Round lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RoundPhase {
    /// No round started yet
    #[default]
    Idle,
    /// Ticks advance the simulation
    Playing,
    /// Won; waiting for the host to pick one candidate
    RewardSelection,
    /// Terminal
    Finished,
}

/// Why a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    TimeUp,
    OutOfLives,
}

/// Result of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundOutcome {
    /// Score threshold met; a reward is (or was) on offer
    Won,
    Failed,
}

/// Why a held prize went back to the field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropReason {
    HazardHit,
    Overload,
}

/// Occurrences reported to the presentation layer, in tick order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    PrizeGrabbed {
        prize_id: EntityId,
    },
    PrizeCaught {
        prize_id: EntityId,
        kind: PrizeKind,
        value: u32,
        bonus: u64,
    },
    PrizeDropped {
        prize_id: EntityId,
        reason: DropReason,
    },
    HazardHit {
        hazard_id: EntityId,
        lives_left: u8,
    },
    HazardNeutralized {
        hazard_id: EntityId,
        bonus: u64,
    },
    BuffCollected {
        buff_id: EntityId,
        category: HazardCategory,
    },
    Overloaded,
    StunEnded,
    TimeTick {
        time_remaining: u32,
    },
    RoundEnded {
        reason: EndReason,
        outcome: RoundOutcome,
    },
    RewardOffered {
        candidates: Vec<RewardCandidate>,
    },
    RewardGranted {
        candidate: usize,
        item: RewardItem,
    },
}

/// RNG state wrapper: one stream per round generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    /// Stream for a given round generation
    pub fn for_generation(&self, generation: u32) -> Pcg32 {
        Pcg32::new(self.seed, self.stream.wrapping_add(u64::from(generation)))
    }
}

/// Scoring aggregate for one round generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundState {
    pub generation: u32,
    pub score: u64,
    pub lives: u8,
    pub time_remaining: u32,
    /// Append-only catch log
    pub history: Vec<CatchRecord>,
    /// Post-hit grace: hazards are ignored until this clock reading (ms)
    pub invulnerable_until: Option<u64>,
    /// Shield/frenzy: hazards are neutralized until this clock reading (ms)
    pub shield_until: Option<u64>,
    /// Auto-grab is armed for the next drop until this clock reading (ms)
    pub auto_grab_until: Option<u64>,
}

impl RoundState {
    pub fn new(config: &RoundConfig, generation: u32) -> Self {
        Self {
            generation,
            score: 0,
            lives: config.starting_lives,
            time_remaining: config.initial_time_secs,
            history: Vec::new(),
            invulnerable_until: None,
            shield_until: None,
            auto_grab_until: None,
        }
    }

    pub fn in_grace(&self, now_ms: u64) -> bool {
        self.invulnerable_until.is_some_and(|t| now_ms < t)
    }

    pub fn shielded(&self, now_ms: u64) -> bool {
        self.shield_until.is_some_and(|t| now_ms < t)
    }

    pub fn auto_grab_armed(&self, now_ms: u64) -> bool {
        self.auto_grab_until.is_some_and(|t| now_ms < t)
    }

    /// Drop deadlines that have passed
    pub fn expire_deadlines(&mut self, now_ms: u64) {
        for deadline in [
            &mut self.invulnerable_until,
            &mut self.shield_until,
            &mut self.auto_grab_until,
        ] {
            if deadline.is_some_and(|t| now_ms >= t) {
                *deadline = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_traverse_ping_pong() {
        let mut t = Traverse {
            from_x: 10.0,
            to_x: 110.0,
            leg_secs: 2.0,
            elapsed: 0.0,
        };
        assert_eq!(t.x(), 10.0);
        t.advance(1.0);
        assert!((t.x() - 60.0).abs() < 0.001);
        t.advance(1.0);
        assert!((t.x() - 110.0).abs() < 0.001);
        t.advance(1.0);
        assert!((t.x() - 60.0).abs() < 0.001);
        t.advance(1.0);
        assert!((t.x() - 10.0).abs() < 0.001);
    }

    #[test]
    fn test_stationary_traverse() {
        let mut t = Traverse::stationary(42.0);
        t.advance(3.0);
        assert_eq!(t.x(), 42.0);
    }

    #[test]
    fn test_prize_restore_releases() {
        let mut prize = Prize {
            id: 1,
            kind: PrizeKind::Normal,
            pos: Vec2::new(5.0, 5.0),
            size: Vec2::new(10.0, 10.0),
            weight: 1.0,
            base_value: 80,
            captured: true,
            original_pos: Vec2::new(100.0, 500.0),
        };
        prize.restore();
        assert!(!prize.captured);
        assert_eq!(prize.pos, Vec2::new(100.0, 500.0));
    }

    #[test]
    fn test_deadlines_expire() {
        let mut state = RoundState::new(&RoundConfig::default(), 0);
        state.invulnerable_until = Some(500);
        state.shield_until = Some(2000);
        assert!(state.in_grace(499));
        state.expire_deadlines(500);
        assert!(state.invulnerable_until.is_none());
        assert!(state.shielded(1999));
    }

    #[test]
    fn test_generations_use_distinct_streams() {
        use rand::Rng;
        let rng_state = RngState::new(7);
        let a: u64 = rng_state.for_generation(0).random();
        let b: u64 = rng_state.for_generation(1).random();
        let a2: u64 = rng_state.for_generation(0).random();
        assert_eq!(a, a2);
        assert_ne!(a, b);
    }
}
