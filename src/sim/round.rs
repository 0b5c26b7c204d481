//! Round controller: score, lives, countdown, catch resolution and rewards
//!
//! Owns every per-round aggregate. `start_round` builds a fresh generation;
//! nothing from a previous round (entities, deadlines, RNG stream) survives.

use rand::Rng;
use rand_pcg::Pcg32;

use super::claw::{ClawSignal, ClawStateMachine};
use super::clock::Countdown;
use super::effects::CatchEffect;
use super::pool::EntityPool;
use super::resource::ResourceGovernor;
use super::reward::{RewardCandidate, RewardGrant, RewardSelection};
use super::state::{
    CatchRecord, DropReason, EndReason, EntityId, GameEvent, HazardCategory, Prize, RngState,
    RoundOutcome, RoundPhase, RoundState,
};
use crate::config::RoundConfig;
use crate::error::{ConfigError, RewardError};

/// Drives one round at a time
#[derive(Debug, Clone)]
pub struct RoundController {
    pub(crate) config: RoundConfig,
    rng_state: RngState,
    pub(crate) rng: Pcg32,
    pub(crate) phase: RoundPhase,
    pub(crate) state: RoundState,
    pub(crate) pool: EntityPool,
    pub(crate) claw: ClawStateMachine,
    pub(crate) governor: ResourceGovernor,
    pub(crate) countdown: Countdown,
    reward: Option<RewardSelection>,
    outcome: Option<(EndReason, RoundOutcome)>,
    /// Events not yet handed to the host
    pub(crate) events: Vec<GameEvent>,
    /// Latest clock reading seen (ms)
    pub(crate) now_ms: u64,
    generation: u32,
}

impl RoundController {
    /// Idle controller; call `start_round` to play
    pub fn new(seed: u64) -> Self {
        let config = RoundConfig::default();
        let rng_state = RngState::new(seed);
        Self {
            rng: rng_state.for_generation(0),
            rng_state,
            phase: RoundPhase::Idle,
            state: RoundState::new(&config, 0),
            pool: EntityPool::new(),
            claw: ClawStateMachine::new(),
            governor: ResourceGovernor::new(config.resource_policy),
            countdown: Countdown::new(),
            reward: None,
            outcome: None,
            events: Vec::new(),
            now_ms: 0,
            generation: 0,
            config,
        }
    }

    /// Validate `config` and start a fresh round
    ///
    /// On error nothing changes: a running round keeps running.
    pub fn start_round(&mut self, config: RoundConfig) -> Result<(), ConfigError> {
        config.validate()?;

        // Invalidate everything timed from the previous generation first
        self.countdown.cancel();
        self.state.invulnerable_until = None;
        self.state.shield_until = None;
        self.state.auto_grab_until = None;
        // Each round runs on its own clock, starting from the host's zero
        self.now_ms = 0;

        self.generation = self.generation.wrapping_add(1);
        self.rng = self.rng_state.for_generation(self.generation);
        self.state = RoundState::new(&config, self.generation);
        self.pool = EntityPool::new();
        self.claw = ClawStateMachine::new();
        self.governor = ResourceGovernor::new(config.resource_policy);
        self.reward = None;
        self.outcome = None;
        self.events.clear();
        self.config = config;

        let placed = self.pool.spawn_prizes(
            self.config.prize_count,
            &self.config.prize_kind_weights,
            &mut self.rng,
        );
        for _ in 0..self.config.initial_hazards {
            self.spawn_field_hazard();
        }
        self.phase = RoundPhase::Playing;

        log::info!(
            "Round {} started: {} prizes, {} hazards, {}s, {} policy, goal {}",
            self.generation,
            placed,
            self.pool.hazard_count(),
            self.config.initial_time_secs,
            self.config.resource_policy.as_str(),
            self.config.win_score
        );
        Ok(())
    }

    /// Close the round; a winning score opens reward selection
    pub fn end_round(&mut self, reason: EndReason) {
        if self.phase != RoundPhase::Playing {
            return;
        }
        if let Some(prize_id) = self.claw.halt(&mut self.pool) {
            log::debug!("Prize {} returned to the field at round end", prize_id);
        }
        self.countdown.cancel();
        self.state.invulnerable_until = None;
        self.state.shield_until = None;
        self.state.auto_grab_until = None;

        let outcome = if self.state.score >= self.config.win_score {
            RoundOutcome::Won
        } else {
            RoundOutcome::Failed
        };
        self.outcome = Some((reason, outcome));
        self.events.push(GameEvent::RoundEnded { reason, outcome });
        log::info!(
            "Round {} ended ({:?}): score {} / {} -> {:?}",
            self.generation,
            reason,
            self.state.score,
            self.config.win_score,
            outcome
        );

        match outcome {
            RoundOutcome::Won => {
                let selection = RewardSelection::offer(&self.state.history);
                self.events.push(GameEvent::RewardOffered {
                    candidates: selection.candidates().to_vec(),
                });
                self.reward = Some(selection);
                self.phase = RoundPhase::RewardSelection;
            }
            RoundOutcome::Failed => self.phase = RoundPhase::Finished,
        }
    }

    /// Pick one offered candidate; the resulting draw is final
    pub fn select_reward(&mut self, index: usize) -> Result<RewardGrant, RewardError> {
        if self.phase != RoundPhase::RewardSelection {
            return Err(RewardError::NotOffered);
        }
        let selection = self.reward.as_mut().ok_or(RewardError::NotOffered)?;
        let grant = selection.select(index, &mut self.rng, self.config.rare_reward_chance)?;

        log::info!(
            "Reward granted: {} ({:?}) for candidate {}",
            grant.item.name,
            grant.item.rarity,
            index
        );
        self.events.push(GameEvent::RewardGranted {
            candidate: index,
            item: grant.item.clone(),
        });
        self.phase = RoundPhase::Finished;
        Ok(grant)
    }

    /// React to one claw signal
    pub(crate) fn apply_signal(&mut self, signal: ClawSignal, now_ms: u64) {
        match signal {
            ClawSignal::Grabbed { prize_id } => {
                self.events.push(GameEvent::PrizeGrabbed { prize_id });
            }
            ClawSignal::HazardStruck { hazard_id, dropped } => {
                self.lose_life(hazard_id, now_ms);
                if let Some(prize_id) = dropped {
                    self.events.push(GameEvent::PrizeDropped {
                        prize_id,
                        reason: DropReason::HazardHit,
                    });
                }
            }
            ClawSignal::HazardNeutralized { hazard_id } => {
                let bonus = self.config.neutralize_bonus;
                self.state.score = self.state.score.saturating_add(bonus);
                self.events.push(GameEvent::HazardNeutralized { hazard_id, bonus });
            }
            ClawSignal::BuffCollected { buff_id, category } => {
                self.events.push(GameEvent::BuffCollected { buff_id, category });
            }
            ClawSignal::Overloaded { dropped } => {
                log::info!("Overheated! Claw stunned");
                self.events.push(GameEvent::Overloaded);
                if let Some(prize_id) = dropped {
                    self.events.push(GameEvent::PrizeDropped {
                        prize_id,
                        reason: DropReason::Overload,
                    });
                }
            }
            ClawSignal::StunEnded => self.events.push(GameEvent::StunEnded),
            ClawSignal::Delivered(prize) => self.resolve_catch(prize, now_ms),
        }
    }

    /// Lose a life and open the grace window
    fn lose_life(&mut self, hazard_id: EntityId, now_ms: u64) {
        if self.state.lives == 0 {
            return;
        }
        self.state.lives -= 1;
        self.state.invulnerable_until = Some(now_ms.saturating_add(self.config.grace_ms));
        self.claw.force_retract(&mut self.pool);
        self.events.push(GameEvent::HazardHit {
            hazard_id,
            lives_left: self.state.lives,
        });
        log::info!("Hazard {} hit, {} lives left", hazard_id, self.state.lives);
    }

    /// Score a prize brought home and refill the field
    fn resolve_catch(&mut self, prize: Prize, now_ms: u64) {
        let mut value = prize.base_value;
        let mut bonus = 0;

        match prize.kind.catch_effect() {
            CatchEffect::None => {}
            CatchEffect::GrantTime { seconds } => {
                self.state.time_remaining = self.state.time_remaining.saturating_add(seconds);
            }
            CatchEffect::ClearHazards => {
                let cleared = self.pool.clear_hazards();
                log::debug!("Board cleared: {} hazards removed", cleared);
            }
            CatchEffect::RerollValue { min, max } => {
                value = self.rng.random_range(min..=max);
            }
            CatchEffect::BoardBonus => {
                bonus = self.pool.active_prize_value();
            }
            CatchEffect::ArmAutoGrab { duration_ms } => {
                self.state.auto_grab_until = Some(now_ms.saturating_add(duration_ms));
            }
            CatchEffect::Shield { duration_ms } => {
                self.state.shield_until = Some(now_ms.saturating_add(duration_ms));
            }
        }

        self.state.score = self
            .state
            .score
            .saturating_add(u64::from(value))
            .saturating_add(bonus);
        self.state.history.push(CatchRecord {
            prize_id: prize.id,
            kind: prize.kind,
            weight: prize.weight,
            value,
            bonus,
        });
        self.events.push(GameEvent::PrizeCaught {
            prize_id: prize.id,
            kind: prize.kind,
            value,
            bonus,
        });
        log::info!(
            "Caught {:?} #{} for {} (+{} bonus), score {}",
            prize.kind,
            prize.id,
            value,
            bonus,
            self.state.score
        );

        self.pool.remove(prize.id);
        self.pool.spawn_prizes(1, &self.config.prize_kind_weights, &mut self.rng);
        self.spawn_field_hazard();
    }

    /// Hazard pressure: heat rounds only get hazards, fuel rounds mix in refills
    fn spawn_field_hazard(&mut self) -> EntityId {
        let category = if self.config.resource_policy.is_fuel() {
            None
        } else {
            Some(HazardCategory::Hazard)
        };
        self.pool.spawn_hazard(category, self.config.hazard_spawn_probability, &mut self.rng)
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn pool(&self) -> &EntityPool {
        &self.pool
    }

    pub fn claw(&self) -> &ClawStateMachine {
        &self.claw
    }

    pub fn resource(&self) -> f32 {
        self.governor.value()
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn outcome(&self) -> Option<(EndReason, RoundOutcome)> {
        self.outcome
    }

    /// Candidates on offer (empty unless a winning round is awaiting a pick)
    pub fn reward_candidates(&self) -> &[RewardCandidate] {
        match (&self.reward, self.phase) {
            (Some(selection), RoundPhase::RewardSelection) => selection.candidates(),
            _ => &[],
        }
    }

    pub fn reward_granted(&self) -> Option<&RewardGrant> {
        self.reward.as_ref().and_then(|r| r.granted())
    }
}
