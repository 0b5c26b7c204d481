//! Secondary resource gauge (heat or fuel) gating the boost
//!
//! One governor, two polarities. Heat climbs while boosting and stuns the
//! claw at the ceiling; fuel burns while boosting and simply stops the boost
//! when empty.

use serde::{Deserialize, Serialize};

use super::claw::ClawMode;
use super::state::HazardCategory;
use crate::config::ResourcePolicy;
use crate::consts::{RESOURCE_MAX, RESOURCE_MIN};

/// Result of one governor step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResourceReading {
    pub value: f32,
    /// Boost multiplier applies this tick
    pub boosting: bool,
    /// Heat hit the ceiling while boosting
    pub overloaded: bool,
}

/// Heat/fuel gauge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceGovernor {
    policy: ResourcePolicy,
    value: f32,
    /// Units per second drained while stunned
    stun_drain: f32,
}

impl ResourceGovernor {
    pub fn new(policy: ResourcePolicy) -> Self {
        Self {
            policy,
            value: RESOURCE_MIN,
            stun_drain: 0.0,
        }
    }

    pub fn policy(&self) -> ResourcePolicy {
        self.policy
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// Advance the gauge by `dt` seconds
    pub fn tick(&mut self, dt: f32, boost_held: bool, mode: ClawMode) -> ResourceReading {
        let ascending = matches!(mode, ClawMode::Retracting | ClawMode::Caught);
        let wants_boost = boost_held && ascending;
        let mut reading = ResourceReading {
            value: self.value,
            boosting: false,
            overloaded: false,
        };

        match self.policy {
            ResourcePolicy::Heat {
                rise_rate,
                decay_rate,
            } => {
                if mode == ClawMode::Stunned {
                    self.value -= self.stun_drain * dt;
                } else if wants_boost {
                    self.value += rise_rate * dt;
                    reading.boosting = true;
                    reading.overloaded = self.value >= RESOURCE_MAX;
                } else {
                    self.value -= decay_rate * dt;
                }
            }
            ResourcePolicy::Fuel { burn_rate } => {
                if wants_boost && self.value > RESOURCE_MIN {
                    self.value -= burn_rate * dt;
                    reading.boosting = true;
                }
            }
        }

        self.value = self.value.clamp(RESOURCE_MIN, RESOURCE_MAX);
        reading.value = self.value;
        reading
    }

    /// Start draining toward zero over the stun duration
    pub fn begin_stun(&mut self, duration_ms: u64) {
        let secs = duration_ms as f32 / 1000.0;
        self.stun_drain = if secs > 0.0 { self.value / secs } else { self.value };
    }

    /// Stun is over; the gauge restarts from empty
    pub fn end_stun(&mut self) {
        self.value = RESOURCE_MIN;
        self.stun_drain = 0.0;
    }

    /// A buff was picked up
    pub fn collect_buff(&mut self, category: HazardCategory) {
        if category == HazardCategory::FuelRefill && self.policy.is_fuel() {
            self.value = RESOURCE_MAX;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    fn heat(rise: f32, decay: f32) -> ResourceGovernor {
        ResourceGovernor::new(ResourcePolicy::Heat {
            rise_rate: rise,
            decay_rate: decay,
        })
    }

    fn fuel(burn: f32) -> ResourceGovernor {
        ResourceGovernor::new(ResourcePolicy::Fuel { burn_rate: burn })
    }

    #[test]
    fn test_heat_rises_only_while_ascending() {
        let mut gov = heat(60.0, 30.0);
        let reading = gov.tick(0.5, true, ClawMode::Dropping);
        assert_eq!(reading.value, 0.0);
        assert!(!reading.boosting);

        let reading = gov.tick(0.5, true, ClawMode::Caught);
        assert!((reading.value - 30.0).abs() < 0.001);
        assert!(reading.boosting);
    }

    #[test]
    fn test_heat_decays_when_released() {
        let mut gov = heat(60.0, 30.0);
        gov.tick(1.0, true, ClawMode::Retracting);
        let reading = gov.tick(1.0, false, ClawMode::Retracting);
        assert!((reading.value - 30.0).abs() < 0.001);
        let reading = gov.tick(5.0, false, ClawMode::Retracting);
        assert_eq!(reading.value, 0.0);
    }

    #[test]
    fn test_heat_overloads_at_ceiling() {
        let mut gov = heat(60.0, 30.0);
        let mut overloaded_at = None;
        for i in 0..120 {
            let reading = gov.tick(DT, true, ClawMode::Caught);
            assert!(reading.value <= RESOURCE_MAX);
            if reading.overloaded {
                overloaded_at = Some(i);
                break;
            }
        }
        let tick = overloaded_at.expect("overload within two seconds");
        // 100 units at 60/s is ~1.67 s
        assert!((98..=102).contains(&tick));
        assert_eq!(gov.value(), RESOURCE_MAX);
    }

    #[test]
    fn test_stun_drains_to_zero() {
        let mut gov = heat(60.0, 30.0);
        gov.tick(2.0, true, ClawMode::Caught);
        gov.begin_stun(1500);
        let reading = gov.tick(0.75, true, ClawMode::Stunned);
        assert!((reading.value - 50.0).abs() < 0.01);
        assert!(!reading.boosting);
        gov.tick(0.75, true, ClawMode::Stunned);
        gov.end_stun();
        assert_eq!(gov.value(), 0.0);
    }

    #[test]
    fn test_fuel_burns_and_stops_at_empty() {
        let mut gov = fuel(50.0);
        let reading = gov.tick(DT, true, ClawMode::Caught);
        assert!(!reading.boosting, "empty tank cannot boost");

        gov.collect_buff(HazardCategory::FuelRefill);
        assert_eq!(gov.value(), RESOURCE_MAX);
        let reading = gov.tick(1.0, true, ClawMode::Caught);
        assert!(reading.boosting);
        assert!((reading.value - 50.0).abs() < 0.001);

        gov.tick(1.0, true, ClawMode::Caught);
        let reading = gov.tick(1.0, true, ClawMode::Caught);
        assert_eq!(reading.value, 0.0);
        assert!(!reading.boosting);
        assert!(!reading.overloaded);
    }

    #[test]
    fn test_fuel_does_not_regenerate() {
        let mut gov = fuel(50.0);
        gov.collect_buff(HazardCategory::FuelRefill);
        gov.tick(1.0, true, ClawMode::Caught);
        let reading = gov.tick(10.0, false, ClawMode::Retracting);
        assert!((reading.value - 50.0).abs() < 0.001);
    }

    #[test]
    fn test_heat_ignores_refills() {
        let mut gov = heat(60.0, 30.0);
        gov.collect_buff(HazardCategory::FuelRefill);
        assert_eq!(gov.value(), 0.0);
    }

    fn any_mode() -> impl Strategy<Value = ClawMode> {
        prop_oneof![
            Just(ClawMode::Ready),
            Just(ClawMode::Aiming),
            Just(ClawMode::Dropping),
            Just(ClawMode::Retracting),
            Just(ClawMode::Caught),
            Just(ClawMode::Stunned),
        ]
    }

    proptest! {
        /// Property: the gauge never leaves [0, 100]
        #[test]
        fn prop_value_stays_in_bounds(
            fuel_policy in any::<bool>(),
            steps in prop::collection::vec((0.0f32..0.5, any::<bool>(), any_mode(), any::<bool>()), 1..200)
        ) {
            let mut gov = if fuel_policy { fuel(40.0) } else { heat(80.0, 30.0) };
            for (dt, boost, mode, refill) in steps {
                if refill {
                    gov.collect_buff(HazardCategory::FuelRefill);
                }
                let reading = gov.tick(dt, boost, mode);
                prop_assert!(reading.value >= RESOURCE_MIN && reading.value <= RESOURCE_MAX);
            }
        }
    }
}
