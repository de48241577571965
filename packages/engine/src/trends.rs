//! Synthetic historical risk trends.
//!
//! Produces a daily series following a slow sine wave around 0.5 with
//! uniform noise. Stands in for a query over stored predictions.

use chrono::{DateTime, Duration, Utc};
use climate_risk_models::{TrendPoint, round3};
use rand::Rng;

use crate::RiskScoringEngine;

/// Default number of days in a trend.
pub const DEFAULT_TREND_DAYS: u32 = 30;

/// Largest number of days a single trend may cover.
pub const MAX_TREND_DAYS: u32 = 365;

const FREQUENCY: f64 = 0.2;
const AMPLITUDE: f64 = 0.2;
const MIDLINE: f64 = 0.5;
const NOISE: f64 = 0.1;
const FLOOR: f64 = 0.1;
const CEILING: f64 = 0.9;

impl RiskScoringEngine {
    /// Builds `days` daily trend points ending the day before `now`.
    ///
    /// `days` is capped at [`MAX_TREND_DAYS`]. Scores stay within
    /// `[0.1, 0.9]` and are rounded to three decimal places.
    pub fn historical_trends<R: Rng + ?Sized>(
        &self,
        days: u32,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Vec<TrendPoint> {
        let days = days.min(MAX_TREND_DAYS);
        let start = now - Duration::days(i64::from(days));

        (0..days)
            .map(|i| {
                let wave = (f64::from(i) * FREQUENCY).sin().mul_add(AMPLITUDE, MIDLINE);
                let noise = rng.gen_range(-NOISE..=NOISE);
                let risk_score = (wave + noise).clamp(FLOOR, CEILING);

                TrendPoint {
                    date: start + Duration::days(i64::from(i)),
                    risk_score: round3(risk_score),
                    risk_level: self.classify(risk_score),
                }
            })
            .collect()
    }
}
