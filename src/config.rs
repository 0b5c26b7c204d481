//! Round configuration
//!
//! Loaded from JSON by hosts; any field left out falls back to the default
//! tuning.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sim::PrizeKind;

/// Secondary resource behavior gating the boost
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy")]
pub enum ResourcePolicy {
    /// Boosting heats the claw; hitting the ceiling stuns it
    Heat {
        /// Units per second while boosting
        rise_rate: f32,
        /// Units per second while not boosting
        decay_rate: f32,
    },
    /// Boosting burns fuel; refills come from buff pickups
    Fuel {
        /// Units per second while boosting
        burn_rate: f32,
    },
}

impl ResourcePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourcePolicy::Heat { .. } => "Heat",
            ResourcePolicy::Fuel { .. } => "Fuel",
        }
    }

    pub fn is_fuel(&self) -> bool {
        matches!(self, ResourcePolicy::Fuel { .. })
    }
}

impl Default for ResourcePolicy {
    fn default() -> Self {
        ResourcePolicy::Heat {
            rise_rate: 80.0,
            decay_rate: 30.0,
        }
    }
}

/// Relative spawn weight for one prize kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KindWeight {
    pub kind: PrizeKind,
    pub weight: f32,
}

/// Default spawn table
pub fn default_kind_weights() -> Vec<KindWeight> {
    [
        (PrizeKind::Normal, 40.0),
        (PrizeKind::Heavy, 20.0),
        (PrizeKind::TimeBonus, 8.0),
        (PrizeKind::Cleaner, 6.0),
        (PrizeKind::Surprise, 8.0),
        (PrizeKind::GoldEgg, 5.0),
        (PrizeKind::RainbowEgg, 5.0),
        (PrizeKind::Mystery, 8.0),
    ]
    .into_iter()
    .map(|(kind, weight)| KindWeight { kind, weight })
    .collect()
}

/// Everything a round needs to start
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundConfig {
    // === Round ===
    pub initial_time_secs: u32,
    pub win_score: u64,
    pub starting_lives: u8,

    // === Entities ===
    pub prize_kind_weights: Vec<KindWeight>,
    /// Prizes placed at round start
    pub prize_count: u32,
    /// Hazards placed at round start
    pub initial_hazards: u32,
    /// Chance a randomly spawned field entity is a Hazard rather than a
    /// FuelRefill buff (buffs only spawn under the fuel policy)
    pub hazard_spawn_probability: f64,

    // === Claw (vertical units per second on the 0-100 scale) ===
    pub drop_speed: f32,
    pub empty_retract_speed: f32,
    /// Divided by the grabbed prize's weight
    pub base_retract_speed: f32,
    pub boost_multiplier: f32,

    // === Resource ===
    pub resource_policy: ResourcePolicy,
    /// Overload stun length (heat policy)
    pub stun_duration_ms: Option<u64>,

    // === Hazards ===
    /// Grace window after losing a life
    pub grace_ms: u64,
    /// Score for destroying a hazard while shielded
    pub neutralize_bonus: u64,
    /// An effective boost smashes hazards instead of costing a life
    pub boost_smashes_hazards: bool,

    // === Rewards ===
    pub rare_reward_chance: f64,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            initial_time_secs: 60,
            win_score: 500,
            starting_lives: 3,

            prize_kind_weights: default_kind_weights(),
            prize_count: 5,
            initial_hazards: 1,
            hazard_spawn_probability: 1.0,

            drop_speed: 42.0,
            empty_retract_speed: 36.0,
            base_retract_speed: 24.0,
            boost_multiplier: 3.0,

            resource_policy: ResourcePolicy::default(),
            stun_duration_ms: Some(1500),

            grace_ms: 500,
            neutralize_bonus: 10,
            boost_smashes_hazards: false,
            rare_reward_chance: 0.05,
        }
    }
}

impl RoundConfig {
    /// Heat-gauge preset (overload stuns the claw)
    pub fn heat() -> Self {
        Self::default()
    }

    /// Fuel-gauge preset (refill buffs drift across the field)
    pub fn fuel() -> Self {
        Self {
            resource_policy: ResourcePolicy::Fuel { burn_rate: 25.0 },
            stun_duration_ms: None,
            initial_hazards: 2,
            hazard_spawn_probability: 0.6,
            ..Self::default()
        }
    }

    /// Reject configurations the simulation cannot run
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.win_score == 0 {
            return Err(ConfigError::NonPositiveWinScore);
        }
        if self.initial_time_secs == 0 {
            return Err(ConfigError::ZeroInitialTime);
        }
        if self.starting_lives == 0 {
            return Err(ConfigError::ZeroLives);
        }

        positive("drop_speed", self.drop_speed)?;
        positive("empty_retract_speed", self.empty_retract_speed)?;
        positive("base_retract_speed", self.base_retract_speed)?;
        if !self.boost_multiplier.is_finite() || self.boost_multiplier < 1.0 {
            return Err(ConfigError::BoostBelowOne(self.boost_multiplier));
        }

        match self.resource_policy {
            ResourcePolicy::Heat {
                rise_rate,
                decay_rate,
            } => {
                positive("rise_rate", rise_rate)?;
                positive("decay_rate", decay_rate)?;
                if self.stun_duration_ms.unwrap_or(0) == 0 {
                    return Err(ConfigError::MissingStunDuration);
                }
            }
            ResourcePolicy::Fuel { burn_rate } => positive("burn_rate", burn_rate)?,
        }

        probability("hazard_spawn_probability", self.hazard_spawn_probability)?;
        probability("rare_reward_chance", self.rare_reward_chance)?;

        let mut total = 0.0;
        for entry in &self.prize_kind_weights {
            if !entry.weight.is_finite() || entry.weight < 0.0 {
                return Err(ConfigError::InvalidKindWeight {
                    kind: entry.kind.as_str(),
                    value: entry.weight,
                });
            }
            total += entry.weight;
        }
        if total <= 0.0 {
            return Err(ConfigError::EmptyKindTable);
        }

        Ok(())
    }

    /// Parse and validate a JSON config
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: RoundConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        log::info!(
            "Loaded round config from {} ({} policy)",
            path.display(),
            config.resource_policy.as_str()
        );
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn probability(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidProbability { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        assert!(RoundConfig::heat().validate().is_ok());
        assert!(RoundConfig::fuel().validate().is_ok());
    }

    #[test]
    fn test_zero_win_score_rejected() {
        let config = RoundConfig {
            win_score: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositiveWinScore)
        ));
    }

    #[test]
    fn test_negative_kind_weight_rejected() {
        let mut config = RoundConfig::default();
        config.prize_kind_weights[0].weight = -1.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidKindWeight { kind: "Normal", .. })
        ));
    }

    #[test]
    fn test_all_zero_kind_weights_rejected() {
        let mut config = RoundConfig::default();
        for entry in &mut config.prize_kind_weights {
            entry.weight = 0.0;
        }
        assert!(matches!(config.validate(), Err(ConfigError::EmptyKindTable)));
    }

    #[test]
    fn test_heat_needs_stun_duration() {
        let config = RoundConfig {
            stun_duration_ms: None,
            ..RoundConfig::heat()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingStunDuration)
        ));
    }

    #[test]
    fn test_nan_speed_rejected() {
        let config = RoundConfig {
            drop_speed: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive {
                field: "drop_speed",
                ..
            })
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = RoundConfig::from_json_str(
            r#"{ "win_score": 900, "resource_policy": { "policy": "Fuel", "burn_rate": 40.0 } }"#,
        )
        .expect("valid config");
        assert_eq!(config.win_score, 900);
        assert_eq!(config.starting_lives, 3);
        assert_eq!(config.resource_policy, ResourcePolicy::Fuel { burn_rate: 40.0 });
    }

    #[test]
    fn test_json_round_trip() {
        let config = RoundConfig::fuel();
        let json = config.to_json().expect("serialize");
        assert_eq!(RoundConfig::from_json_str(&json).expect("parse"), config);
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        assert!(matches!(
            RoundConfig::from_json_str("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
