#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Climate hazard risk scoring engine.
//!
//! [`RiskScoringEngine`] turns a [`ClimateObservation`] into a risk score,
//! a [`RiskLevel`](climate_risk_models::RiskLevel) and a confidence value
//! for one of the known hazards, or picks the most likely hazard when the
//! caller doesn't name one.
//!
//! The engine is a placeholder model: a weighted sum over normalized
//! readings with multiplicative and seasonal jitter. All tables live in
//! [`EngineConfig`] and all randomness comes from a caller-supplied
//! [`rand::Rng`], so a seeded generator plus
//! [`EngineConfig::deterministic`] gives exact, repeatable output.
//!
//! [`ClimateObservation`]: climate_risk_models::ClimateObservation

pub mod config;
pub mod explanations;
pub mod normalize;
mod scoring;
pub mod trends;

pub use config::{EngineConfig, HazardWeights, RiskThresholds, UniformRange};
pub use scoring::RiskScoringEngine;

use thiserror::Error;

/// Errors that can occur while loading engine configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML or doesn't match the expected shape.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config parsed but is internally inconsistent.
    #[error("Invalid configuration: {message}")]
    Invalid {
        /// Description of what went wrong.
        message: String,
    },
}

impl ConfigError {
    fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }
}
