#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front-end for the climate risk engine.
//!
//! Scores observations, prints explanations and trends, dumps the
//! effective engine configuration, and launches the API server.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use climate_risk_engine::trends::DEFAULT_TREND_DAYS;
use climate_risk_engine::{ConfigError, EngineConfig, RiskScoringEngine, explanations};
use climate_risk_models::{ClimateObservation, HazardTag};
use climate_risk_server_models::{ApiRiskFactors, PredictionResponse};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Parser)]
#[command(name = "climate_risk", about = "Climate hazard risk scoring tool")]
struct Cli {
    /// Engine config file overriding the built-in weights and thresholds
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Seed for the random generator (random if omitted)
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score an observation and print the prediction as JSON
    Predict {
        /// Region name or identifier
        #[arg(long)]
        region: String,
        /// Temperature in Celsius
        #[arg(long, allow_negative_numbers = true)]
        temperature: f64,
        /// Precipitation in mm
        #[arg(long, allow_negative_numbers = true)]
        precipitation: f64,
        /// Humidity percentage
        #[arg(long, allow_negative_numbers = true)]
        humidity: f64,
        /// Wind speed in km/h
        #[arg(long, allow_negative_numbers = true)]
        wind_speed: f64,
        /// Hazard to score (flood, drought, heatwave, wildfire, storm);
        /// the primary hazard is selected if omitted
        #[arg(long)]
        hazard: Option<String>,
    },
    /// Print the risk factors for a hazard
    Explain {
        /// Hazard name
        hazard: String,
    },
    /// Print a synthetic daily risk trend
    Trends {
        /// Number of days to cover
        #[arg(long, default_value_t = DEFAULT_TREND_DAYS)]
        days: u32,
    },
    /// Print the effective engine configuration as TOML
    Config,
    /// Start the API server
    Serve {
        /// Prompt for bind address, port and config file
        #[arg(long)]
        interactive: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let engine = || -> Result<RiskScoringEngine, ConfigError> {
        let config = match &cli.config {
            Some(path) => EngineConfig::from_path(path)?,
            None => EngineConfig::builtin(),
        };
        Ok(RiskScoringEngine::new(config))
    };
    let mut rng = cli
        .seed
        .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);

    match &cli.command {
        Commands::Predict {
            region,
            temperature,
            precipitation,
            humidity,
            wind_speed,
            hazard,
        } => {
            let observation =
                ClimateObservation::new(*temperature, *precipitation, *humidity, *wind_speed)?;
            let hazard = hazard.as_deref().map(HazardTag::parse);
            let json = prediction_json(
                &engine()?,
                region,
                &observation,
                hazard,
                Utc::now(),
                &mut rng,
            )?;
            println!("{json}");
        }
        Commands::Explain { hazard } => {
            let risk_type = HazardTag::parse(hazard);
            let explanation = explanations::explain(&risk_type);
            println!(
                "{}",
                serde_json::to_string_pretty(&ApiRiskFactors {
                    risk_type,
                    explanation,
                })?
            );
        }
        Commands::Trends { days } => {
            let trends = engine()?.historical_trends(*days, Utc::now(), &mut rng);
            println!("{}", serde_json::to_string_pretty(&trends)?);
        }
        Commands::Config => {
            print!("{}", toml::to_string(engine()?.config())?);
        }
        Commands::Serve { interactive } => serve(cli.config.clone(), *interactive)?,
    }

    Ok(())
}

/// Scores `observation` and renders the response body as pretty JSON.
fn prediction_json<R: Rng + ?Sized>(
    engine: &RiskScoringEngine,
    region: &str,
    observation: &ClimateObservation,
    hazard: Option<HazardTag>,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Result<String, serde_json::Error> {
    let result = engine.predict_at(region, observation, hazard, now, rng);
    serde_json::to_string_pretty(&PredictionResponse::from(result))
}

/// Runs the API server on its own actix system.
fn serve(config: Option<PathBuf>, interactive: bool) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = config {
        // SAFETY: Single-threaded at this point; the variable is read once
        // during server initialisation.
        unsafe {
            std::env::set_var(climate_risk_server::CONFIG_ENV_VAR, path);
        }
    }

    log::info!("Starting API server");
    actix_web::rt::System::new().block_on(async move {
        if interactive {
            climate_risk_server::interactive::run().await
        } else {
            climate_risk_server::run_server().await
        }
    })?;

    Ok(())
}
