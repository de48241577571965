//! Compile-time registry of risk-factor explanations.
//!
//! Each hazard's explanation is defined in a TOML file under `factors/`.
//! Tags without a file get the generic explanation.

use climate_risk_models::{Hazard, HazardTag, RiskFactorExplanation};

// ── Compile-time embedded TOML files ────────────────────────────────

const FACTOR_TOMLS: &[(Hazard, &str)] = &[
    (Hazard::Flood, include_str!("../factors/flood.toml")),
    (Hazard::Drought, include_str!("../factors/drought.toml")),
    (Hazard::Heatwave, include_str!("../factors/heatwave.toml")),
    (Hazard::Wildfire, include_str!("../factors/wildfire.toml")),
    (Hazard::Storm, include_str!("../factors/storm.toml")),
];

const GENERIC_TOML: &str = include_str!("../factors/generic.toml");

fn parse(name: &str, toml_str: &str) -> RiskFactorExplanation {
    toml::de::from_str(toml_str)
        .unwrap_or_else(|e| panic!("Failed to parse risk factors '{name}': {e}"))
}

/// Returns the explanation for `tag`.
///
/// # Panics
///
/// Panics if an embedded TOML file is malformed (this is a compile-time
/// guarantee since the files are embedded).
#[must_use]
pub fn explain(tag: &HazardTag) -> RiskFactorExplanation {
    tag.hazard()
        .and_then(|hazard| FACTOR_TOMLS.iter().find(|(h, _)| *h == hazard))
        .map_or_else(
            || parse("generic", GENERIC_TOML),
            |(hazard, toml_str)| parse(hazard.as_ref(), toml_str),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_hazard_has_an_explanation() {
        assert_eq!(FACTOR_TOMLS.len(), Hazard::all().len());
        for hazard in Hazard::all() {
            let explanation = explain(&HazardTag::Known(*hazard));
            assert!(!explanation.primary_factors.is_empty(), "{hazard}");
            assert!(!explanation.description.is_empty(), "{hazard}");
            assert!(!explanation.prevention_tips.is_empty(), "{hazard}");
        }
    }

    #[test]
    fn unknown_tag_gets_generic_explanation() {
        let explanation = explain(&HazardTag::parse("tsunami"));
        assert_eq!(explanation.primary_factors, ["Various climate conditions"]);
    }

    #[test]
    fn drought_mentions_low_precipitation() {
        let explanation = explain(&Hazard::Drought.into());
        assert!(
            explanation
                .primary_factors
                .iter()
                .any(|f| f == "Low precipitation")
        );
    }
}
