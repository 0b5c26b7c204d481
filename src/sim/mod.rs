//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Host-supplied frame time and clock only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod claw;
pub mod clock;
pub mod collision;
pub mod effects;
pub mod geometry;
pub mod pool;
pub mod resource;
pub mod reward;
pub mod round;
pub mod state;
pub mod tick;

pub use claw::{ClawMode, ClawStateMachine};
pub use collision::{CollisionOutcome, HazardGuard};
pub use effects::{CatchEffect, PrizeProfile};
pub use pool::{EntityKind, EntityPool, EntityView};
pub use resource::ResourceGovernor;
pub use reward::{Rarity, RewardCandidate, RewardGrant, RewardItem};
pub use round::RoundController;
pub use state::{
    CatchRecord, DropReason, EndReason, EntityId, GameEvent, HazardCategory, PrizeKind,
    RoundOutcome, RoundPhase, RoundState,
};
pub use tick::{Snapshot, TickInput};
