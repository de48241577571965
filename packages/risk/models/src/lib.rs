#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Climate observation, hazard and prediction value types.
//!
//! These types are shared by the scoring engine, the API server and the
//! CLI. They carry no behaviour beyond construction-time validation and
//! string conversions; all scoring logic lives in `climate_risk_engine`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use thiserror::Error;

/// Errors raised while building core values from upstream data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RiskError {
    /// A climate field could not be coerced to a finite real number.
    #[error("Computation failure on '{field}': {message}")]
    ComputationFailure {
        /// Name of the offending field.
        field: String,
        /// Description of what went wrong.
        message: String,
    },
}

impl RiskError {
    /// Builds a [`RiskError::ComputationFailure`] for `field`.
    #[must_use]
    pub fn computation(field: &str, message: impl Into<String>) -> Self {
        Self::ComputationFailure {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// A single set of current weather readings for a region.
///
/// Values outside their nominal ranges are accepted here and saturated by
/// the engine. Only non-finite values are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawObservation")]
pub struct ClimateObservation {
    temperature: f64,
    precipitation: f64,
    humidity: f64,
    wind_speed: f64,
}

#[derive(Deserialize)]
struct RawObservation {
    temperature: f64,
    precipitation: f64,
    humidity: f64,
    wind_speed: f64,
}

impl TryFrom<RawObservation> for ClimateObservation {
    type Error = RiskError;

    fn try_from(raw: RawObservation) -> Result<Self, Self::Error> {
        Self::new(
            raw.temperature,
            raw.precipitation,
            raw.humidity,
            raw.wind_speed,
        )
    }
}

impl ClimateObservation {
    /// Creates an observation from temperature (°C), precipitation (mm),
    /// humidity (%) and wind speed (km/h).
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::ComputationFailure`] if any value is NaN or
    /// infinite.
    pub fn new(
        temperature: f64,
        precipitation: f64,
        humidity: f64,
        wind_speed: f64,
    ) -> Result<Self, RiskError> {
        for (field, value) in [
            ("temperature", temperature),
            ("precipitation", precipitation),
            ("humidity", humidity),
            ("wind_speed", wind_speed),
        ] {
            if !value.is_finite() {
                return Err(RiskError::computation(
                    field,
                    format!("{value} is not a finite number"),
                ));
            }
        }

        Ok(Self {
            temperature,
            precipitation,
            humidity,
            wind_speed,
        })
    }

    /// Temperature in degrees Celsius.
    #[must_use]
    pub const fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Precipitation in millimetres.
    #[must_use]
    pub const fn precipitation(&self) -> f64 {
        self.precipitation
    }

    /// Relative humidity in percent.
    #[must_use]
    pub const fn humidity(&self) -> f64 {
        self.humidity
    }

    /// Wind speed in km/h.
    #[must_use]
    pub const fn wind_speed(&self) -> f64 {
        self.wind_speed
    }
}

/// Climate hazard categories the engine has weighting tables for.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Hazard {
    /// Riverine and flash flooding
    Flood,
    /// Prolonged water shortage
    Drought,
    /// Sustained extreme heat
    Heatwave,
    /// Vegetation fires
    Wildfire,
    /// Wind and rain storms
    Storm,
}

impl Hazard {
    /// Returns all variants in their stable evaluation order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Flood,
            Self::Drought,
            Self::Heatwave,
            Self::Wildfire,
            Self::Storm,
        ]
    }
}

/// A hazard tag as supplied by a caller.
///
/// Tags naming one of the known [`Hazard`]s resolve to [`HazardTag::Known`];
/// anything else is kept verbatim in [`HazardTag::Unknown`] so it can be
/// scored by the engine's fallback and echoed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HazardTag {
    /// A hazard with a weighting table.
    Known(Hazard),
    /// A tag the engine does not recognise.
    Unknown(String),
}

impl HazardTag {
    /// Parses a tag. Never fails: unrecognised tags become
    /// [`HazardTag::Unknown`].
    #[must_use]
    pub fn parse(tag: &str) -> Self {
        tag.parse::<Hazard>()
            .map_or_else(|_| Self::Unknown(tag.to_string()), Self::Known)
    }

    /// Returns the known hazard, if any.
    #[must_use]
    pub const fn hazard(&self) -> Option<Hazard> {
        match self {
            Self::Known(hazard) => Some(*hazard),
            Self::Unknown(_) => None,
        }
    }

    /// Returns the tag's string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(hazard) => hazard.as_ref(),
            Self::Unknown(tag) => tag,
        }
    }
}

impl From<Hazard> for HazardTag {
    fn from(hazard: Hazard) -> Self {
        Self::Known(hazard)
    }
}

impl From<String> for HazardTag {
    fn from(tag: String) -> Self {
        match tag.parse::<Hazard>() {
            Ok(hazard) => Self::Known(hazard),
            Err(_) => Self::Unknown(tag),
        }
    }
}

impl From<HazardTag> for String {
    fn from(tag: HazardTag) -> Self {
        match tag {
            HazardTag::Known(hazard) => hazard.to_string(),
            HazardTag::Unknown(tag) => tag,
        }
    }
}

impl std::fmt::Display for HazardTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Discrete risk level derived from a risk score.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RiskLevel {
    /// Score below the medium threshold
    Low,
    /// Score in the medium band
    Medium,
    /// Score in the high band
    High,
    /// Score at or above the critical threshold
    Critical,
}

/// The outcome of a single prediction.
///
/// `risk_score` lies in `[0, 1]` and `confidence` in `[0.3, 0.95]`, both
/// rounded to three decimal places. `risk_level` classifies the score
/// before rounding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Risk score.
    pub risk_score: f64,
    /// Level of the unrounded score.
    pub risk_level: RiskLevel,
    /// Confidence in the prediction.
    pub confidence: f64,
    /// Hazard that was scored.
    pub hazard: HazardTag,
    /// Region identifier, passed through unchanged.
    pub region: String,
    /// When the prediction was evaluated.
    pub prediction_date: DateTime<Utc>,
}

/// Static metadata for a region.
///
/// Only `name` is consulted by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    /// Region name, used as the identifier.
    pub name: String,
    /// Country name.
    pub country: String,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Population estimate.
    pub population: u64,
}

impl Region {
    /// Creates a placeholder region for a name seen for the first time.
    #[must_use]
    pub fn placeholder(name: &str) -> Self {
        Self {
            name: name.to_string(),
            country: "Unknown".to_string(),
            latitude: 0.0,
            longitude: 0.0,
            population: 0,
        }
    }
}

/// One day of a historical risk trend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// Day the point describes.
    pub date: DateTime<Utc>,
    /// Risk score for the day.
    pub risk_score: f64,
    /// Level derived from `risk_score`.
    pub risk_level: RiskLevel,
}

/// Why a hazard's risk moves and what to do about it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFactorExplanation {
    /// Conditions that drive the risk up.
    pub primary_factors: Vec<String>,
    /// Short narrative description.
    pub description: String,
    /// Suggested preparedness measures.
    pub prevention_tips: Vec<String>,
}

/// Rounds `value` to three decimal places.
#[must_use]
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
