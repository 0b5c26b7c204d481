//! Claw state machine
//!
//! Owns the claw's position, mode and the grabbed prize. The claw is the only
//! code that flips `captured`/`destroyed` flags, and it only does so by
//! applying a collision outcome.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{self, CollisionOutcome, HazardGuard};
use super::geometry::Rect;
use super::pool::EntityPool;
use super::resource::ResourceGovernor;
use super::state::{EntityId, HazardCategory, Prize};
use crate::config::RoundConfig;
use crate::consts::*;
use crate::{aim_to_claw_x, claw_tip_y};

/// Claw modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ClawMode {
    /// At home, waiting for input
    #[default]
    Ready,
    /// At home, following the aim position
    Aiming,
    /// Descending with a frozen horizontal position
    Dropping,
    /// Ascending empty-handed
    Retracting,
    /// Ascending with a prize
    Caught,
    /// Overheated: frozen until the stun deadline
    Stunned,
    /// Round over
    Over,
}

impl ClawMode {
    /// Retracting and Caught share the vertical-advance logic
    pub fn is_ascending(&self) -> bool {
        matches!(self, ClawMode::Retracting | ClawMode::Caught)
    }
}

/// Claw-side occurrences the round controller acts on
#[derive(Debug, Clone, PartialEq)]
pub enum ClawSignal {
    Grabbed {
        prize_id: EntityId,
    },
    HazardStruck {
        hazard_id: EntityId,
        /// Prize knocked back to the field
        dropped: Option<EntityId>,
    },
    HazardNeutralized {
        hazard_id: EntityId,
    },
    BuffCollected {
        buff_id: EntityId,
        category: HazardCategory,
    },
    Overloaded {
        dropped: Option<EntityId>,
    },
    StunEnded,
    /// Prize brought home; ready for catch resolution
    Delivered(Prize),
}

/// Per-tick inputs for the claw
#[derive(Debug, Clone, Copy)]
pub struct ClawStep<'a> {
    pub dt: f32,
    pub now_ms: u64,
    pub boost_held: bool,
    pub guard: HazardGuard,
    pub config: &'a RoundConfig,
}

/// Ascent speed for an empty claw or one carrying `weight`
pub fn retract_speed(config: &RoundConfig, weight: Option<f32>, boosting: bool) -> f32 {
    let speed = match weight {
        Some(w) => config.base_retract_speed / w,
        None => config.empty_retract_speed,
    };
    if boosting {
        speed * config.boost_multiplier
    } else {
        speed
    }
}

/// The claw
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClawStateMachine {
    mode: ClawMode,
    /// 0-100 scale, 100 = home
    vertical: f32,
    /// Left edge in field space
    horizontal: f32,
    grabbed: Option<Prize>,
    /// Clock reading (ms) when the stun wears off
    stun_until: Option<u64>,
}

impl Default for ClawStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl ClawStateMachine {
    pub fn new() -> Self {
        Self {
            mode: ClawMode::Ready,
            vertical: CLAW_HOME,
            horizontal: aim_to_claw_x(0.5),
            grabbed: None,
            stun_until: None,
        }
    }

    pub fn mode(&self) -> ClawMode {
        self.mode
    }

    pub fn vertical(&self) -> f32 {
        self.vertical
    }

    pub fn horizontal(&self) -> f32 {
        self.horizontal
    }

    pub fn grabbed(&self) -> Option<&Prize> {
        self.grabbed.as_ref()
    }

    pub fn grabbed_id(&self) -> Option<EntityId> {
        self.grabbed.as_ref().map(|p| p.id)
    }

    /// Claw collision box: hangs above the tip
    pub fn claw_box(&self) -> Rect {
        let tip = claw_tip_y(self.vertical);
        Rect::new(
            Vec2::new(self.horizontal, tip - CLAW_HEIGHT),
            Vec2::new(CLAW_WIDTH, CLAW_HEIGHT),
        )
    }

    /// Follow the aim position; the first aim from Ready begins aiming
    pub fn aim(&mut self, aim: f32) -> bool {
        match self.mode {
            ClawMode::Ready | ClawMode::Aiming => {
                self.mode = ClawMode::Aiming;
                self.horizontal = aim_to_claw_x(aim);
                true
            }
            _ => false,
        }
    }

    /// Start descending; `snap_x` overrides the aimed position
    ///
    /// Returns false (and changes nothing) unless the claw is Ready or Aiming.
    pub fn drop_claw(&mut self, snap_x: Option<f32>) -> bool {
        if !matches!(self.mode, ClawMode::Ready | ClawMode::Aiming) {
            return false;
        }
        if let Some(x) = snap_x {
            self.horizontal = x.clamp(0.0, FIELD_WIDTH - CLAW_WIDTH);
        }
        self.mode = ClawMode::Dropping;
        true
    }

    /// Advance one tick
    pub fn step(
        &mut self,
        step: &ClawStep<'_>,
        pool: &mut EntityPool,
        governor: &mut ResourceGovernor,
    ) -> Vec<ClawSignal> {
        let mut signals = Vec::new();

        match self.mode {
            ClawMode::Over => return signals,
            ClawMode::Stunned => {
                governor.tick(step.dt, false, ClawMode::Stunned);
                if self.stun_until.is_none_or(|t| step.now_ms >= t) {
                    governor.end_stun();
                    self.stun_until = None;
                    self.mode = if self.vertical < CLAW_HOME {
                        ClawMode::Retracting
                    } else {
                        ClawMode::Ready
                    };
                    signals.push(ClawSignal::StunEnded);
                }
                return signals;
            }
            _ => {}
        }

        let reading = governor.tick(step.dt, step.boost_held, self.mode);
        if reading.overloaded {
            let dropped = self.release(pool);
            let duration = step.config.stun_duration_ms.unwrap_or(0);
            governor.begin_stun(duration);
            self.stun_until = Some(step.now_ms.saturating_add(duration));
            self.mode = ClawMode::Stunned;
            signals.push(ClawSignal::Overloaded { dropped });
            return signals;
        }

        let guard = if step.config.boost_smashes_hazards && reading.boosting {
            HazardGuard::Shielded
        } else {
            step.guard
        };

        match self.mode {
            ClawMode::Dropping => {
                let descent = step.config.drop_speed * step.dt;
                self.vertical = (self.vertical - descent).max(CLAW_MIN_DEPTH);
                self.check_collisions(pool, governor, guard, &mut signals);
                if self.mode == ClawMode::Dropping && self.vertical <= CLAW_MIN_DEPTH {
                    self.mode = ClawMode::Retracting;
                }
            }
            ClawMode::Retracting | ClawMode::Caught => {
                let weight = self.grabbed.as_ref().map(|p| p.weight);
                let speed = retract_speed(step.config, weight, reading.boosting);
                self.vertical = (self.vertical + speed * step.dt).min(CLAW_HOME);
                self.carry_grabbed();
                self.check_collisions(pool, governor, guard, &mut signals);

                if self.vertical >= CLAW_HOME && self.mode.is_ascending() {
                    self.mode = ClawMode::Ready;
                    if let Some(prize) = self.grabbed.take() {
                        signals.push(ClawSignal::Delivered(prize));
                    }
                }
            }
            _ => {}
        }

        signals
    }

    fn check_collisions(
        &mut self,
        pool: &mut EntityPool,
        governor: &mut ResourceGovernor,
        guard: HazardGuard,
        signals: &mut Vec<ClawSignal>,
    ) {
        let Some(outcome) = collision::resolve(&self.claw_box(), pool, self.mode, guard) else {
            return;
        };
        log::debug!("Claw collision: {:?}", outcome);

        match outcome {
            CollisionOutcome::Destructive { hazard_id } => {
                pool.destroy_hazard(hazard_id);
                let dropped = self.release(pool);
                self.mode = ClawMode::Retracting;
                signals.push(ClawSignal::HazardStruck { hazard_id, dropped });
            }
            CollisionOutcome::Neutralized { hazard_id } => {
                pool.destroy_hazard(hazard_id);
                signals.push(ClawSignal::HazardNeutralized { hazard_id });
            }
            CollisionOutcome::Buff { buff_id, category } => {
                pool.destroy_hazard(buff_id);
                governor.collect_buff(category);
                signals.push(ClawSignal::BuffCollected { buff_id, category });
            }
            CollisionOutcome::Grab { prize_id } => {
                if let Some(prize) = pool.take_prize(prize_id) {
                    self.grabbed = Some(prize);
                    self.mode = ClawMode::Caught;
                    self.carry_grabbed();
                    signals.push(ClawSignal::Grabbed { prize_id });
                }
            }
        }
    }

    /// Hang the grabbed prize under the claw tip
    fn carry_grabbed(&mut self) {
        let tip = claw_tip_y(self.vertical);
        let x = self.horizontal;
        if let Some(prize) = self.grabbed.as_mut() {
            prize.pos = Vec2::new(x + (CLAW_WIDTH - prize.size.x) / 2.0, tip - 20.0);
        }
    }

    /// Give the grabbed prize back to the field, uncaptured
    pub fn release(&mut self, pool: &mut EntityPool) -> Option<EntityId> {
        let prize = self.grabbed.take()?;
        let id = prize.id;
        pool.return_prize(prize);
        if self.mode == ClawMode::Caught {
            self.mode = ClawMode::Retracting;
        }
        Some(id)
    }

    /// Send the claw home after a life loss
    pub fn force_retract(&mut self, pool: &mut EntityPool) -> Option<EntityId> {
        let dropped = self.release(pool);
        if self.mode == ClawMode::Dropping {
            self.mode = ClawMode::Retracting;
        }
        dropped
    }

    /// Terminal stop; a held prize goes back to the field unscored
    pub fn halt(&mut self, pool: &mut EntityPool) -> Option<EntityId> {
        let dropped = self.release(pool);
        self.stun_until = None;
        self.mode = ClawMode::Over;
        dropped
    }
}
