#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the climate risk server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the engine's value types to allow independent evolution of the API
//! contract.

use chrono::{DateTime, Utc};
use climate_risk_models::{
    ClimateObservation, HazardTag, PredictionResult, RiskError, RiskFactorExplanation, RiskLevel,
    TrendPoint,
};
use serde::{Deserialize, Serialize};

/// A numeric request field, sent either as a JSON number or as a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    /// A JSON number.
    Number(f64),
    /// A string expected to contain a number.
    Text(String),
}

impl NumericInput {
    /// Coerces the input to a real number.
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::ComputationFailure`] if the text does not parse
    /// as a number.
    pub fn coerce(&self, field: &str) -> Result<f64, RiskError> {
        match self {
            Self::Number(value) => Ok(*value),
            Self::Text(text) => text.trim().parse::<f64>().map_err(|e| {
                RiskError::computation(field, format!("'{text}' is not a number: {e}"))
            }),
        }
    }
}

/// Current climate conditions as sent by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiClimateData {
    /// Temperature in Celsius.
    pub temperature: NumericInput,
    /// Precipitation in mm.
    pub precipitation: NumericInput,
    /// Humidity percentage.
    pub humidity: NumericInput,
    /// Wind speed in km/h.
    pub wind_speed: NumericInput,
}

impl ApiClimateData {
    /// Converts the request fields into a validated observation.
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::ComputationFailure`] if any field cannot be
    /// coerced to a finite real number.
    pub fn to_observation(&self) -> Result<ClimateObservation, RiskError> {
        ClimateObservation::new(
            self.temperature.coerce("temperature")?,
            self.precipitation.coerce("precipitation")?,
            self.humidity.coerce("humidity")?,
            self.wind_speed.coerce("wind_speed")?,
        )
    }
}

/// Body of `POST /api/predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    /// Region name or identifier.
    pub region: String,
    /// Current climate conditions.
    pub climate_data: ApiClimateData,
    /// Specific hazard to score; the primary hazard is chosen if absent.
    #[serde(default)]
    pub risk_type: Option<String>,
}

impl PredictionRequest {
    /// The requested hazard tag, if any. Empty strings count as absent.
    #[must_use]
    pub fn hazard(&self) -> Option<HazardTag> {
        self.risk_type
            .as_deref()
            .filter(|tag| !tag.is_empty())
            .map(HazardTag::parse)
    }
}

/// A prediction as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    /// Risk score between 0 and 1.
    pub risk_score: f64,
    /// Risk level label.
    pub risk_label: RiskLevel,
    /// Prediction confidence.
    pub confidence: f64,
    /// Type of climate risk.
    pub risk_type: HazardTag,
    /// Region name.
    pub region: String,
    /// When the prediction was made (ISO 8601).
    pub prediction_date: DateTime<Utc>,
}

impl From<PredictionResult> for PredictionResponse {
    fn from(result: PredictionResult) -> Self {
        Self {
            risk_score: result.risk_score,
            risk_label: result.risk_level,
            confidence: result.confidence,
            risk_type: result.hazard,
            region: result.region,
            prediction_date: result.prediction_date,
        }
    }
}

impl From<PredictionResponse> for PredictionResult {
    fn from(response: PredictionResponse) -> Self {
        Self {
            risk_score: response.risk_score,
            risk_level: response.risk_label,
            confidence: response.confidence,
            hazard: response.risk_type,
            region: response.region,
            prediction_date: response.prediction_date,
        }
    }
}

/// Query parameters for the prediction history endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryQueryParams {
    /// Maximum number of predictions to return.
    pub limit: Option<usize>,
}

/// Response from the prediction history endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiPredictionHistory {
    /// Region name.
    pub region: String,
    /// Stored predictions, newest first.
    pub predictions: Vec<PredictionResponse>,
}

/// Query parameters for the trends endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TrendsQueryParams {
    /// Hazard the trend is labelled with.
    pub risk_type: Option<String>,
    /// Number of days to cover.
    pub days: Option<u32>,
}

/// Response from the trends endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiTrends {
    /// Region name.
    pub region: String,
    /// Hazard the trend is labelled with.
    pub risk_type: Option<HazardTag>,
    /// Daily trend points, oldest first.
    pub trends: Vec<TrendPoint>,
}

/// Response from the risk factors endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiRiskFactors {
    /// Hazard the explanation describes.
    pub risk_type: HazardTag,
    /// Explanation body.
    #[serde(flatten)]
    pub explanation: RiskFactorExplanation,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct ApiHealth {
    /// Health status.
    pub status: String,
    /// Service name.
    pub service: String,
    /// Service version.
    pub version: String,
}

/// Error body returned for failed requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Description of what went wrong.
    pub detail: String,
}
