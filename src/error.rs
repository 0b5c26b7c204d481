//! Errors surfaced to the host
//!
//! Gameplay outcomes (hazard hits, time-outs, missed score goals) are events,
//! not errors. Only a rejected configuration or a bad reward selection ends up
//! here.

use std::path::PathBuf;

use thiserror::Error;

/// Round configuration was rejected; the round does not start
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("win score must be greater than zero")]
    NonPositiveWinScore,
    #[error("initial time must be at least one second")]
    ZeroInitialTime,
    #[error("starting lives must be at least one")]
    ZeroLives,
    #[error("{field} must be a positive finite number, got {value}")]
    NonPositive { field: &'static str, value: f32 },
    #[error("boost multiplier must be at least 1.0, got {0}")]
    BoostBelowOne(f32),
    #[error("{field} must be a probability in [0, 1], got {value}")]
    InvalidProbability { field: &'static str, value: f64 },
    #[error("prize kind weight for {kind} must be finite and non-negative, got {value}")]
    InvalidKindWeight { kind: &'static str, value: f32 },
    #[error("prize kind table has no positive weight")]
    EmptyKindTable,
    #[error("heat policy requires a non-zero stun duration")]
    MissingStunDuration,
    #[error("failed to parse round config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read round config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Reward selection was rejected; no state changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RewardError {
    #[error("reward candidate {index} not found ({count} offered)")]
    EntityNotFound { index: usize, count: usize },
    #[error("no reward is on offer")]
    NotOffered,
}
