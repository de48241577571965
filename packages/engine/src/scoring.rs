//! The risk scoring engine.

use chrono::{DateTime, Datelike as _, Utc};
use climate_risk_models::{
    ClimateObservation, Hazard, HazardTag, PredictionResult, RiskLevel, round3,
};
use rand::Rng;

use crate::EngineConfig;
use crate::normalize::{NormalizedObservation, unit};

/// Scores climate observations against hazard weighting tables.
///
/// The engine only reads its [`EngineConfig`] after construction, so one
/// instance can be shared across threads. Every method that draws random
/// numbers takes the generator explicitly.
#[derive(Debug, Clone, Default)]
pub struct RiskScoringEngine {
    config: EngineConfig,
}

impl RiskScoringEngine {
    /// Creates an engine from a validated configuration.
    #[must_use]
    pub const fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// The configuration this engine scores with.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Deterministic part of the score for a known hazard: the weighted
    /// sum of normalized readings mapped from `[-1, 1]` to `[0, 1]`.
    #[must_use]
    pub fn base_score(&self, observation: &ClimateObservation, hazard: Hazard) -> f64 {
        let normalized = NormalizedObservation::from_observation(observation);
        let raw = normalized.weighted_sum(self.config.weights.get(hazard));
        (raw + 1.0) / 2.0
    }

    /// Scores `observation` for `hazard` as of `now`.
    ///
    /// Known hazards get the weighted base score, the realism factor and
    /// the seasonal adjustment for `now`'s month. Unknown tags get a
    /// uniform draw from the configured fallback range. The result is
    /// always within `[0, 1]`.
    pub fn score<R: Rng + ?Sized>(
        &self,
        observation: &ClimateObservation,
        hazard: &HazardTag,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> f64 {
        match hazard {
            HazardTag::Known(hazard) => self.score_hazard(observation, *hazard, now.month(), rng),
            HazardTag::Unknown(tag) => {
                log::debug!("No weighting table for hazard '{tag}', using fallback score");
                unit(self.config.unknown_hazard.sample(rng))
            }
        }
    }

    fn score_hazard<R: Rng + ?Sized>(
        &self,
        observation: &ClimateObservation,
        hazard: Hazard,
        month: u32,
        rng: &mut R,
    ) -> f64 {
        let base = self.base_score(observation, hazard);
        let realistic = unit(base * self.config.realism.sample(rng));
        unit(realistic + self.seasonal_adjustment(hazard, month, rng))
    }

    /// Additive adjustment for `hazard` in calendar `month` (1-12).
    ///
    /// Draws from the first matching seasonal window's bonus range, or
    /// from the off-season range if no window matches.
    pub fn seasonal_adjustment<R: Rng + ?Sized>(
        &self,
        hazard: Hazard,
        month: u32,
        rng: &mut R,
    ) -> f64 {
        self.config
            .seasons
            .iter()
            .find(|season| season.matches(hazard, month))
            .map_or(self.config.off_season, |season| season.bonus)
            .sample(rng)
    }

    /// Maps a score to its [`RiskLevel`].
    #[must_use]
    pub fn classify(&self, score: f64) -> RiskLevel {
        self.config.thresholds.classify(score)
    }

    /// Total confidence penalty for the extreme readings in `observation`.
    #[must_use]
    pub fn confidence_penalty(&self, observation: &ClimateObservation) -> f64 {
        let model = &self.config.confidence;
        let limits = &model.extremes;

        let conditions = [
            observation.temperature() > limits.max_temperature
                || observation.temperature() < limits.min_temperature,
            observation.precipitation() > limits.max_precipitation,
            observation.wind_speed() > limits.max_wind_speed,
        ];

        let count = conditions.iter().filter(|hit| **hit).count();
        #[allow(clippy::cast_precision_loss)]
        let count = count as f64;
        model.penalty * count
    }

    /// Confidence in a prediction for `observation`.
    ///
    /// Independent of the risk score and of the hazard: the base
    /// confidence minus the extremeness penalty, times a jitter factor,
    /// clamped to the configured bounds.
    pub fn confidence<R: Rng + ?Sized>(&self, observation: &ClimateObservation, rng: &mut R) -> f64 {
        let model = &self.config.confidence;
        let penalized = model.base - self.confidence_penalty(observation);
        (penalized * model.jitter.sample(rng)).clamp(model.min, model.max)
    }

    /// Scores every known hazard and returns the highest-scoring one.
    ///
    /// Each hazard gets its own random draws. Ties go to the hazard that
    /// comes first in [`Hazard::all`].
    pub fn primary_hazard<R: Rng + ?Sized>(
        &self,
        observation: &ClimateObservation,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Hazard {
        let month = now.month();
        let mut best = Hazard::all()[0];
        let mut best_score = f64::NEG_INFINITY;

        for hazard in Hazard::all() {
            let score = self.score_hazard(observation, *hazard, month, rng);
            log::trace!("Candidate hazard {hazard}: {score:.3}");
            if score > best_score {
                best = *hazard;
                best_score = score;
            }
        }

        log::debug!("Primary hazard determined: {best} ({best_score:.3})");
        best
    }

    /// Produces a full prediction for `region`, evaluated now.
    ///
    /// See [`Self::predict_at`].
    pub fn predict<R: Rng + ?Sized>(
        &self,
        region: &str,
        observation: &ClimateObservation,
        hazard: Option<HazardTag>,
        rng: &mut R,
    ) -> PredictionResult {
        self.predict_at(region, observation, hazard, Utc::now(), rng)
    }

    /// Produces a full prediction for `region` as of `now`.
    ///
    /// When `hazard` is `None` the primary hazard is selected first and
    /// then scored again. The level is classified from the unrounded
    /// score; score and confidence are then rounded to three decimal
    /// places.
    pub fn predict_at<R: Rng + ?Sized>(
        &self,
        region: &str,
        observation: &ClimateObservation,
        hazard: Option<HazardTag>,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> PredictionResult {
        log::info!("Predicting risk for region {region}");

        let hazard = hazard
            .unwrap_or_else(|| HazardTag::Known(self.primary_hazard(observation, now, rng)));

        let raw_score = self.score(observation, &hazard, now, rng);
        let risk_level = self.classify(raw_score);
        let risk_score = round3(raw_score);
        let confidence = round3(self.confidence(observation, rng));

        log::info!("Prediction completed: {hazard} risk = {risk_score:.3} ({risk_level})");

        PredictionResult {
            risk_score,
            risk_level,
            confidence,
            hazard,
            region: region.to_string(),
            prediction_date: now,
        }
    }
}
