//! Per-frame simulation tick
//!
//! Advances a round by one host frame. Order within a tick is fixed: due
//! countdown seconds, expired deadlines, input, hazard motion, the claw, then
//! the end-of-round checks.

use serde::{Deserialize, Serialize};

use super::claw::{ClawMode, ClawStep};
use super::collision::HazardGuard;
use super::pool::EntityView;
use super::round::RoundController;
use super::state::{EndReason, EntityId, GameEvent, RoundPhase};
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickInput {
    /// Normalized aim position in [0, 1] (pointer/touch x)
    pub aim: Option<f32>,
    /// Boost button held
    pub boost_held: bool,
    /// Drop button pressed this frame
    pub drop_requested: bool,
}

/// Everything the presentation layer needs to draw one frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: RoundPhase,
    pub claw_mode: ClawMode,
    pub claw_vertical: f32,
    pub claw_horizontal: f32,
    pub grabbed_id: Option<EntityId>,
    pub resource: f32,
    pub score: u64,
    pub lives: u8,
    pub time_remaining: u32,
    /// Field entities, the held prize last
    pub entities: Vec<EntityView>,
    /// Events since the previous snapshot, in order
    pub events: Vec<GameEvent>,
}

impl RoundController {
    /// Advance the round by `dt` seconds at clock reading `now_ms`
    ///
    /// Outside `Playing` nothing moves; the snapshot still carries pending
    /// events (reward grants, for instance).
    pub fn tick(&mut self, input: &TickInput, dt: f32, now_ms: u64) -> Snapshot {
        if self.phase != RoundPhase::Playing {
            return self.take_snapshot();
        }

        let dt = if dt.is_finite() {
            dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };
        // Never let the clock run backwards
        let now_ms = now_ms.max(self.now_ms);
        self.now_ms = now_ms;

        // Countdown seconds first
        for _ in 0..self.countdown.poll(now_ms) {
            self.state.time_remaining = self.state.time_remaining.saturating_sub(1);
            self.events.push(GameEvent::TimeTick {
                time_remaining: self.state.time_remaining,
            });
            if self.state.time_remaining == 0 {
                self.end_round(EndReason::TimeUp);
                return self.take_snapshot();
            }
        }

        self.state.expire_deadlines(now_ms);
        self.apply_input(input, now_ms);
        self.pool.advance_hazards(dt);

        let guard = if self.state.shielded(now_ms) {
            HazardGuard::Shielded
        } else if self.state.in_grace(now_ms) {
            HazardGuard::Grace
        } else {
            HazardGuard::Exposed
        };
        let step = ClawStep {
            dt,
            now_ms,
            boost_held: input.boost_held,
            guard,
            config: &self.config,
        };
        let signals = self.claw.step(&step, &mut self.pool, &mut self.governor);
        for signal in signals {
            self.apply_signal(signal, now_ms);
        }

        if self.state.lives == 0 {
            self.end_round(EndReason::OutOfLives);
        }

        self.take_snapshot()
    }

    fn apply_input(&mut self, input: &TickInput, now_ms: u64) {
        if let Some(aim) = input.aim {
            if !self.claw.aim(aim) {
                log::trace!("Aim ignored in {:?}", self.claw.mode());
            }
        }

        if !input.drop_requested {
            return;
        }
        // An armed auto-grab snaps the claw over the best prize
        let snap_x = if self.state.auto_grab_armed(now_ms) {
            self.pool.most_valuable_prize()
                .map(|p| p.bounds().center().x - CLAW_WIDTH / 2.0)
        } else {
            None
        };
        if self.claw.drop_claw(snap_x) {
            if snap_x.is_some() {
                self.state.auto_grab_until = None;
                log::debug!("Auto-grab snapped claw to x={:.0}", self.claw.horizontal());
            }
        } else {
            log::trace!("Drop ignored in {:?}", self.claw.mode());
        }
    }

    /// Current frame without consuming pending events
    pub fn snapshot(&self) -> Snapshot {
        self.build_snapshot(self.events.clone())
    }

    fn take_snapshot(&mut self) -> Snapshot {
        let events = std::mem::take(&mut self.events);
        self.build_snapshot(events)
    }

    fn build_snapshot(&self, events: Vec<GameEvent>) -> Snapshot {
        let mut entities = self.pool.all();
        if let Some(prize) = self.claw.grabbed() {
            entities.push(EntityView::from(prize));
        }
        Snapshot {
            phase: self.phase,
            claw_mode: self.claw.mode(),
            claw_vertical: self.claw.vertical(),
            claw_horizontal: self.claw.horizontal(),
            grabbed_id: self.claw.grabbed_id(),
            resource: self.governor.value(),
            score: self.state.score,
            lives: self.state.lives,
            time_remaining: self.state.time_remaining,
            entities,
            events,
        }
    }
}
