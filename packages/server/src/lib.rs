#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for climate risk predictions.
//!
//! A thin HTTP layer over [`climate_risk_engine::RiskScoringEngine`]:
//! `POST /api/predict` scores climate data, and the remaining endpoints
//! expose prediction history, synthetic trends and risk-factor
//! explanations. Regions and predictions are kept in memory.

mod handlers;
pub mod interactive;
pub mod store;

use std::path::Path;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use climate_risk_engine::{EngineConfig, RiskScoringEngine};

use crate::store::PredictionStore;

/// Environment variable naming an engine config override file.
pub const CONFIG_ENV_VAR: &str = "CLIMATE_RISK_CONFIG";

/// Shared application state.
pub struct AppState {
    /// Scoring engine, read-only after startup.
    pub engine: Arc<RiskScoringEngine>,
    /// Regions and recorded predictions.
    pub store: Arc<PredictionStore>,
}

/// Registers the API routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .service(
                web::resource("/predict")
                    .app_data(handlers::prediction_json_config())
                    .route(web::post().to(handlers::predict)),
            )
            .route(
                "/predict/history/{region}",
                web::get().to(handlers::history),
            )
            .route("/predict/trends/{region}", web::get().to(handlers::trends))
            .route(
                "/risk-factors/{risk_type}",
                web::get().to(handlers::risk_factors),
            ),
    );
}

/// Loads the engine configuration from [`CONFIG_ENV_VAR`] if set, or the
/// built-in configuration otherwise.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the override file cannot be read,
/// parsed, or validated.
pub fn load_engine_config() -> std::io::Result<EngineConfig> {
    match std::env::var(CONFIG_ENV_VAR) {
        Ok(path) if !path.is_empty() => {
            EngineConfig::from_path(Path::new(&path)).map_err(std::io::Error::other)
        }
        _ => Ok(EngineConfig::builtin()),
    }
}

/// Starts the climate risk API server.
///
/// Loads the engine configuration and starts the Actix-Web HTTP server on
/// `BIND_ADDR:PORT` (default `127.0.0.1:8080`). This is a regular async
/// function — the caller is responsible for providing the async runtime
/// (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the engine configuration is
/// invalid, or if the HTTP server fails to bind or encounters a runtime
/// error.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    let _ = pretty_env_logger::try_init_custom_env("RUST_LOG");

    log::info!("Loading engine configuration...");
    let engine = RiskScoringEngine::new(load_engine_config()?);

    let state = web::Data::new(AppState {
        engine: Arc::new(engine),
        store: Arc::new(PredictionStore::new()),
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
