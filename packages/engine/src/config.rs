//! Scoring configuration: weighting tables, thresholds and jitter ranges.
//!
//! The built-in configuration is embedded from `config/default.toml` at
//! compile time. Callers may load an override file with the same layout
//! via [`EngineConfig::from_path`] or [`EngineConfig::from_toml_str`].

use std::path::Path;

use climate_risk_models::{Hazard, RiskLevel};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

const DEFAULT_TOML: &str = include_str!("../config/default.toml");

/// A closed interval `[min, max]` sampled uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UniformRange {
    /// Lower bound (inclusive).
    pub min: f64,
    /// Upper bound (inclusive).
    pub max: f64,
}

impl UniformRange {
    /// Creates a range.
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// A degenerate range that always yields `value`.
    #[must_use]
    pub const fn fixed(value: f64) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    /// Draws a value from the range.
    ///
    /// Degenerate ranges return `min` without touching `rng`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.min >= self.max {
            return self.min;
        }
        rng.gen_range(self.min..=self.max)
    }

    /// Midpoint of the range.
    #[must_use]
    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    fn validate(&self, name: &str) -> Result<(), ConfigError> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(ConfigError::invalid(format!(
                "{name}: bounds must be finite"
            )));
        }
        if self.min > self.max {
            return Err(ConfigError::invalid(format!(
                "{name}: min {} exceeds max {}",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Signed weights applied to each normalized observation field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HazardWeights {
    /// Weight on normalized temperature.
    pub temperature: f64,
    /// Weight on normalized precipitation.
    pub precipitation: f64,
    /// Weight on normalized humidity.
    pub humidity: f64,
    /// Weight on normalized wind speed.
    pub wind_speed: f64,
}

impl HazardWeights {
    fn validate(&self, hazard: Hazard) -> Result<(), ConfigError> {
        let all = [
            self.temperature,
            self.precipitation,
            self.humidity,
            self.wind_speed,
        ];
        if all.iter().all(|w| w.is_finite()) {
            Ok(())
        } else {
            Err(ConfigError::invalid(format!(
                "weights.{hazard}: weights must be finite"
            )))
        }
    }
}

/// One weighting table per [`Hazard`].
///
/// A field per hazard means a new hazard cannot be added without a table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightTables {
    /// Flood weights.
    pub flood: HazardWeights,
    /// Drought weights.
    pub drought: HazardWeights,
    /// Heatwave weights.
    pub heatwave: HazardWeights,
    /// Wildfire weights.
    pub wildfire: HazardWeights,
    /// Storm weights.
    pub storm: HazardWeights,
}

impl WeightTables {
    /// Returns the table for `hazard`.
    #[must_use]
    pub const fn get(&self, hazard: Hazard) -> &HazardWeights {
        match hazard {
            Hazard::Flood => &self.flood,
            Hazard::Drought => &self.drought,
            Hazard::Heatwave => &self.heatwave,
            Hazard::Wildfire => &self.wildfire,
            Hazard::Storm => &self.storm,
        }
    }

    /// Returns a mutable reference to the table for `hazard`.
    pub const fn get_mut(&mut self, hazard: Hazard) -> &mut HazardWeights {
        match hazard {
            Hazard::Flood => &mut self.flood,
            Hazard::Drought => &mut self.drought,
            Hazard::Heatwave => &mut self.heatwave,
            Hazard::Wildfire => &mut self.wildfire,
            Hazard::Storm => &mut self.storm,
        }
    }
}

/// Score thresholds used for classification.
///
/// Only `medium`, `high` and `critical` are classification boundaries.
/// Scores below `medium` are [`RiskLevel::Low`] regardless of `low`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskThresholds {
    /// Advisory lower bound, not a classification boundary.
    pub low: f64,
    /// Scores at or above this are at least medium.
    pub medium: f64,
    /// Scores at or above this are at least high.
    pub high: f64,
    /// Scores at or above this are critical.
    pub critical: f64,
}

impl RiskThresholds {
    /// Maps a score to its [`RiskLevel`].
    #[must_use]
    pub fn classify(&self, score: f64) -> RiskLevel {
        if score >= self.high {
            if score >= self.critical {
                RiskLevel::Critical
            } else {
                RiskLevel::High
            }
        } else if score >= self.medium {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let ordered = [self.low, self.medium, self.high, self.critical];
        if ordered.iter().any(|t| !(0.0..=1.0).contains(t)) {
            return Err(ConfigError::invalid("thresholds must lie within [0, 1]"));
        }
        if ordered.windows(2).any(|w| w[0] > w[1]) {
            return Err(ConfigError::invalid(
                "thresholds must satisfy low <= medium <= high <= critical",
            ));
        }
        Ok(())
    }
}

/// A hazard's canonical season and the bonus applied during it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalWindow {
    /// Hazard the window applies to.
    pub hazard: Hazard,
    /// Calendar months (1-12) in season.
    pub months: Vec<u32>,
    /// Additive bonus range while in season.
    pub bonus: UniformRange,
}

impl SeasonalWindow {
    /// Returns `true` if the window covers `hazard` in `month`.
    #[must_use]
    pub fn matches(&self, hazard: Hazard, month: u32) -> bool {
        self.hazard == hazard && self.months.contains(&month)
    }
}

/// Observation limits beyond which confidence is penalized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtremeLimits {
    /// Temperatures above this are extreme.
    pub max_temperature: f64,
    /// Temperatures below this are extreme.
    pub min_temperature: f64,
    /// Precipitation above this is extreme.
    pub max_precipitation: f64,
    /// Wind speeds above this are extreme.
    pub max_wind_speed: f64,
}

/// Parameters of the confidence model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceModel {
    /// Confidence before penalties.
    pub base: f64,
    /// Penalty per extreme condition.
    pub penalty: f64,
    /// Lower clamp.
    pub min: f64,
    /// Upper clamp.
    pub max: f64,
    /// Multiplicative jitter.
    pub jitter: UniformRange,
    /// Extremeness limits.
    pub extremes: ExtremeLimits,
}

/// Complete, immutable scoring configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Per-hazard weighting tables.
    pub weights: WeightTables,
    /// Classification thresholds.
    pub thresholds: RiskThresholds,
    /// Multiplicative realism factor.
    pub realism: UniformRange,
    /// Additive jitter outside any seasonal window.
    pub off_season: UniformRange,
    /// Score range for hazard tags without a weighting table.
    pub unknown_hazard: UniformRange,
    /// Seasonal bonus windows.
    #[serde(default)]
    pub seasons: Vec<SeasonalWindow>,
    /// Confidence model.
    pub confidence: ConfidenceModel,
}

impl EngineConfig {
    /// Returns the built-in configuration.
    ///
    /// # Panics
    ///
    /// Panics if the embedded `config/default.toml` is malformed. It is
    /// compiled into the binary, so this is covered by the crate's tests.
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_toml_str(DEFAULT_TOML)
            .unwrap_or_else(|e| panic!("Failed to parse built-in engine config: {e}"))
    }

    /// Parses and validates a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise
    /// the errors of [`Self::from_toml_str`].
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        log::info!("Loading engine config from {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Returns the built-in configuration with every random draw pinned
    /// to its neutral value.
    ///
    /// Realism and confidence jitter become `1.0`, seasonal and off-season
    /// adjustments become `0.0`, and unknown hazards score the midpoint of
    /// their range.
    #[must_use]
    pub fn deterministic() -> Self {
        Self::builtin().without_jitter()
    }

    /// Collapses every jitter range in `self` to its neutral value.
    #[must_use]
    pub fn without_jitter(mut self) -> Self {
        self.realism = UniformRange::fixed(1.0);
        self.off_season = UniformRange::fixed(0.0);
        self.unknown_hazard = UniformRange::fixed(self.unknown_hazard.midpoint());
        for season in &mut self.seasons {
            season.bonus = UniformRange::fixed(0.0);
        }
        self.confidence.jitter = UniformRange::fixed(1.0);
        self
    }

    /// Checks internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for hazard in Hazard::all() {
            self.weights.get(*hazard).validate(*hazard)?;
        }
        self.thresholds.validate()?;
        self.realism.validate("realism")?;
        self.off_season.validate("off_season")?;
        self.unknown_hazard.validate("unknown_hazard")?;

        for season in &self.seasons {
            season
                .bonus
                .validate(&format!("seasons.{}.bonus", season.hazard))?;
            if let Some(month) = season.months.iter().find(|m| !(1..=12).contains(*m)) {
                return Err(ConfigError::invalid(format!(
                    "seasons.{}: month {month} is outside 1-12",
                    season.hazard
                )));
            }
        }

        let confidence = &self.confidence;
        confidence.jitter.validate("confidence.jitter")?;
        for (name, value) in [
            ("confidence.base", confidence.base),
            ("confidence.penalty", confidence.penalty),
            ("confidence.min", confidence.min),
            ("confidence.max", confidence.max),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::invalid(format!("{name}: bounds must be finite")));
            }
        }
        if confidence.min > confidence.max {
            return Err(ConfigError::invalid(
                "confidence: min must not exceed max",
            ));
        }

        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn builtin_config_parses_and_validates() {
        let config = EngineConfig::builtin();
        assert!(config.validate().is_ok());
        assert_eq!(config.seasons.len(), 4);
    }

    #[test]
    fn builtin_weights_match_published_table() {
        let config = EngineConfig::builtin();
        let drought = config.weights.get(Hazard::Drought);
        assert!((drought.precipitation + 0.5).abs() < 1e-12);
        assert!((drought.temperature - 0.3).abs() < 1e-12);

        let heatwave = config.weights.get(Hazard::Heatwave);
        assert!((heatwave.temperature - 0.6).abs() < 1e-12);
        assert!((heatwave.wind_speed + 0.1).abs() < 1e-12);
    }

    #[test]
    fn thresholds_table_keeps_all_entries() {
        let t = EngineConfig::builtin().thresholds;
        assert!((t.low - 0.3).abs() < 1e-12);
        assert!((t.medium - 0.6).abs() < 1e-12);
        assert!((t.high - 0.8).abs() < 1e-12);
        assert!((t.critical - 0.9).abs() < 1e-12);
    }

    #[test]
    fn rejects_inverted_range() {
        let text = DEFAULT_TOML.replace(
            "[realism]\nmin = 0.8\nmax = 1.2",
            "[realism]\nmin = 1.2\nmax = 0.8",
        );
        let err = EngineConfig::from_toml_str(&text).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }), "{err}");
    }

    #[test]
    fn rejects_missing_weight_table() {
        let text = DEFAULT_TOML.replace("[weights.storm]", "[unused_storm]");
        let err = EngineConfig::from_toml_str(&text).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)), "{err}");
    }

    #[test]
    fn rejects_unordered_thresholds() {
        let text = DEFAULT_TOML.replace("high = 0.8", "high = 0.5");
        assert!(EngineConfig::from_toml_str(&text).is_err());
    }

    #[test]
    fn rejects_non_finite_confidence_bounds() {
        for (from, to) in [
            ("min = 0.3\n", "min = nan\n"),
            ("max = 0.95\n", "max = inf\n"),
            ("base = 0.75\n", "base = nan\n"),
            ("penalty = 0.1\n", "penalty = -inf\n"),
        ] {
            assert!(DEFAULT_TOML.contains(from), "{from}");
            let text = DEFAULT_TOML.replace(from, to);
            let err = EngineConfig::from_toml_str(&text).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { .. }), "{to}: {err}");
        }
    }

    #[test]
    fn rejects_bad_month() {
        let text = DEFAULT_TOML.replace("months = [6, 7, 8]", "months = [6, 7, 13]");
        assert!(EngineConfig::from_toml_str(&text).is_err());
    }

    #[test]
    fn weight_override_round_trips_through_toml() {
        let mut config = EngineConfig::builtin();
        config.weights.get_mut(Hazard::Flood).precipitation = 0.55;
        let text = toml::to_string(&config).unwrap();
        let parsed = EngineConfig::from_toml_str(&text).unwrap();
        assert!((parsed.weights.flood.precipitation - 0.55).abs() < 1e-12);
    }

    #[test]
    fn fixed_range_does_not_consume_entropy() {
        let mut a = StdRng::seed_from_u64(9);
        let mut b = StdRng::seed_from_u64(9);
        assert!((UniformRange::fixed(0.4).sample(&mut a) - 0.4).abs() < f64::EPSILON);
        let x: f64 = a.r#gen();
        let y: f64 = b.r#gen();
        assert!((x - y).abs() < f64::EPSILON);
    }

    #[test]
    fn sampled_values_stay_in_range() {
        let range = UniformRange::new(0.8, 1.2);
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..1000 {
            let value = range.sample(&mut rng);
            assert!((range.min..=range.max).contains(&value), "{value}");
        }
    }

    #[test]
    fn deterministic_config_pins_jitter() {
        let config = EngineConfig::deterministic();
        assert_eq!(config.realism, UniformRange::fixed(1.0));
        assert_eq!(config.confidence.jitter, UniformRange::fixed(1.0));
        assert!(config.seasons.iter().all(|s| s.bonus == UniformRange::fixed(0.0)));
        assert!((config.unknown_hazard.min - 0.5).abs() < 1e-12);
    }
}
