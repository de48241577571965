//! Linear rescaling of raw observations into `[0, 1]`.
//!
//! Bounds are hazard-independent. Readings outside the nominal range
//! saturate at 0 or 1.

use climate_risk_models::ClimateObservation;

use crate::HazardWeights;

/// Lowest temperature (°C) of the nominal range.
pub const TEMPERATURE_MIN: f64 = -10.0;
/// Width of the nominal temperature range (°C), i.e. up to 50 °C.
pub const TEMPERATURE_SPAN: f64 = 60.0;
/// Precipitation (mm) mapped to 1.0.
pub const PRECIPITATION_MAX: f64 = 100.0;
/// Humidity (%) mapped to 1.0.
pub const HUMIDITY_MAX: f64 = 100.0;
/// Wind speed (km/h) mapped to 1.0.
pub const WIND_SPEED_MAX: f64 = 100.0;

/// An observation with every field mapped into `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedObservation {
    /// Normalized temperature.
    pub temperature: f64,
    /// Normalized precipitation.
    pub precipitation: f64,
    /// Normalized humidity.
    pub humidity: f64,
    /// Normalized wind speed.
    pub wind_speed: f64,
}

impl NormalizedObservation {
    /// Normalizes `observation`.
    #[must_use]
    pub fn from_observation(observation: &ClimateObservation) -> Self {
        Self {
            temperature: unit((observation.temperature() - TEMPERATURE_MIN) / TEMPERATURE_SPAN),
            precipitation: unit(observation.precipitation() / PRECIPITATION_MAX),
            humidity: unit(observation.humidity() / HUMIDITY_MAX),
            wind_speed: unit(observation.wind_speed() / WIND_SPEED_MAX),
        }
    }

    /// Weighted sum of the normalized fields.
    #[must_use]
    pub fn weighted_sum(&self, weights: &HazardWeights) -> f64 {
        weights.temperature.mul_add(
            self.temperature,
            weights.precipitation.mul_add(
                self.precipitation,
                weights
                    .humidity
                    .mul_add(self.humidity, weights.wind_speed * self.wind_speed),
            ),
        )
    }
}

/// Clamps `value` into `[0, 1]`.
#[must_use]
pub fn unit(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(t: f64, p: f64, h: f64, w: f64) -> ClimateObservation {
        ClimateObservation::new(t, p, h, w).unwrap()
    }

    #[test]
    fn maps_nominal_bounds_to_unit_interval() {
        let low = NormalizedObservation::from_observation(&obs(-10.0, 0.0, 0.0, 0.0));
        assert!(low.temperature.abs() < 1e-12);
        assert!(low.precipitation.abs() < 1e-12);

        let high = NormalizedObservation::from_observation(&obs(50.0, 100.0, 100.0, 100.0));
        assert!((high.temperature - 1.0).abs() < 1e-12);
        assert!((high.precipitation - 1.0).abs() < 1e-12);
        assert!((high.humidity - 1.0).abs() < 1e-12);
        assert!((high.wind_speed - 1.0).abs() < 1e-12);
    }

    #[test]
    fn saturates_out_of_range_inputs() {
        let n = NormalizedObservation::from_observation(&obs(200.0, -50.0, 150.0, -5.0));
        assert!((n.temperature - 1.0).abs() < 1e-12);
        assert!(n.precipitation.abs() < 1e-12);
        assert!((n.humidity - 1.0).abs() < 1e-12);
        assert!(n.wind_speed.abs() < 1e-12);
    }

    #[test]
    fn midrange_temperature() {
        let n = NormalizedObservation::from_observation(&obs(20.0, 0.0, 0.0, 0.0));
        assert!((n.temperature - 0.5).abs() < 1e-12);
    }

    #[test]
    fn weighted_sum_uses_signed_weights() {
        let n = NormalizedObservation {
            temperature: 1.0,
            precipitation: 1.0,
            humidity: 0.0,
            wind_speed: 0.0,
        };
        let weights = HazardWeights {
            temperature: 0.3,
            precipitation: -0.5,
            humidity: -0.2,
            wind_speed: 0.1,
        };
        assert!((n.weighted_sum(&weights) + 0.2).abs() < 1e-12);
    }
}
