//! HTTP handler functions for the climate risk API.

use actix_web::{HttpRequest, HttpResponse, error, web};
use chrono::Utc;
use climate_risk_engine::explanations;
use climate_risk_engine::trends::{DEFAULT_TREND_DAYS, MAX_TREND_DAYS};
use climate_risk_models::HazardTag;
use climate_risk_server_models::{
    ApiError, ApiHealth, ApiPredictionHistory, ApiRiskFactors, ApiTrends, HistoryQueryParams,
    PredictionRequest, PredictionResponse, TrendsQueryParams,
};

use crate::AppState;

const DEFAULT_HISTORY_LIMIT: usize = 10;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        status: "ok".to_string(),
        service: "Climate Risk API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `POST /api/predict`
///
/// Scores the submitted climate data for the requested hazard (or the
/// primary hazard) and records the result under the region.
pub async fn predict(
    state: web::Data<AppState>,
    request: web::Json<PredictionRequest>,
) -> HttpResponse {
    log::info!("Prediction request for region: {}", request.region);

    let observation = match request.climate_data.to_observation() {
        Ok(observation) => observation,
        Err(e) => {
            log::error!("Prediction error: {e}");
            return prediction_failed(&e);
        }
    };

    let region = state.store.get_or_create_region(&request.region);
    let result = state.engine.predict(
        &region.name,
        &observation,
        request.hazard(),
        &mut rand::thread_rng(),
    );
    state.store.record(result.clone());

    log::info!(
        "Prediction completed for {}: {}",
        result.region,
        result.risk_score
    );
    HttpResponse::Ok().json(PredictionResponse::from(result))
}

/// `GET /api/predict/history/{region}`
///
/// Returns stored predictions for a known region, newest first.
pub async fn history(
    state: web::Data<AppState>,
    region: web::Path<String>,
    params: web::Query<HistoryQueryParams>,
) -> HttpResponse {
    let region = region.into_inner();
    let limit = params.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);

    match state.store.history(&region, limit) {
        Some(predictions) => HttpResponse::Ok().json(ApiPredictionHistory {
            region,
            predictions: predictions
                .into_iter()
                .map(PredictionResponse::from)
                .collect(),
        }),
        None => {
            log::warn!("History requested for unknown region '{region}'");
            HttpResponse::NotFound().json(ApiError {
                detail: "Region not found".to_string(),
            })
        }
    }
}

/// `GET /api/predict/trends/{region}`
///
/// Returns a daily historical risk trend for the region.
pub async fn trends(
    state: web::Data<AppState>,
    region: web::Path<String>,
    params: web::Query<TrendsQueryParams>,
) -> HttpResponse {
    let days = params.days.unwrap_or(DEFAULT_TREND_DAYS).min(MAX_TREND_DAYS);
    let trends = state
        .engine
        .historical_trends(days, Utc::now(), &mut rand::thread_rng());

    HttpResponse::Ok().json(ApiTrends {
        region: region.into_inner(),
        risk_type: params.risk_type.as_deref().map(HazardTag::parse),
        trends,
    })
}

/// `GET /api/risk-factors/{risk_type}`
///
/// Explains which conditions drive a hazard's risk.
pub async fn risk_factors(risk_type: web::Path<String>) -> HttpResponse {
    let risk_type = HazardTag::parse(&risk_type);
    let explanation = explanations::explain(&risk_type);
    HttpResponse::Ok().json(ApiRiskFactors {
        risk_type,
        explanation,
    })
}

/// JSON extractor config for prediction requests.
///
/// Malformed bodies are reported like any other prediction failure.
pub fn prediction_json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req: &HttpRequest| {
        log::error!("Prediction error: {err}");
        let response = prediction_failed(&err);
        error::InternalError::from_response(err, response).into()
    })
}

fn prediction_failed(e: &dyn std::fmt::Display) -> HttpResponse {
    HttpResponse::InternalServerError().json(ApiError {
        detail: format!("Prediction failed: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, http::StatusCode, test, web};
    use climate_risk_engine::{EngineConfig, RiskScoringEngine};
    use serde_json::{Value, json};

    use crate::store::PredictionStore;
    use crate::{AppState, configure};

    fn state() -> web::Data<AppState> {
        web::Data::new(AppState {
            engine: Arc::new(RiskScoringEngine::new(EngineConfig::builtin())),
            store: Arc::new(PredictionStore::new()),
        })
    }

    #[actix_web::test]
    async fn health_reports_ok() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;
        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "ok");
    }

    #[actix_web::test]
    async fn predict_returns_wire_contract() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;
        let req = test::TestRequest::post()
            .uri("/api/predict")
            .set_json(json!({
                "region": "Sydney",
                "climate_data": {
                    "temperature": 41.0,
                    "precipitation": 0.0,
                    "humidity": 12.0,
                    "wind_speed": 35.0
                },
                "risk_type": "wildfire"
            }))
            .to_request();

        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["risk_type"], "wildfire");
        assert_eq!(body["region"], "Sydney");

        let score = body["risk_score"].as_f64().unwrap();
        assert!((0.0..=1.0).contains(&score));
        let confidence = body["confidence"].as_f64().unwrap();
        assert!((0.3..=0.95).contains(&confidence));
        assert!(
            ["low", "medium", "high", "critical"]
                .contains(&body["risk_label"].as_str().unwrap())
        );
        assert!(body["prediction_date"].as_str().unwrap().ends_with('Z'));
    }

    #[actix_web::test]
    async fn predict_with_unknown_hazard_does_not_fail() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;
        let req = test::TestRequest::post()
            .uri("/api/predict")
            .set_json(json!({
                "region": "Tokyo",
                "climate_data": {
                    "temperature": 20,
                    "precipitation": 5,
                    "humidity": 60,
                    "wind_speed": 10
                },
                "risk_type": "tsunami"
            }))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["risk_type"], "tsunami");
    }

    #[actix_web::test]
    async fn non_numeric_climate_data_is_a_failure() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;
        let req = test::TestRequest::post()
            .uri("/api/predict")
            .set_json(json!({
                "region": "Cairo",
                "climate_data": {
                    "temperature": "hot",
                    "precipitation": 0,
                    "humidity": 10,
                    "wind_speed": 5
                }
            }))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(resp).await;
        let detail = body["detail"].as_str().unwrap();
        assert!(detail.starts_with("Prediction failed"), "{detail}");
        assert!(detail.contains("temperature"), "{detail}");
    }

    #[actix_web::test]
    async fn malformed_body_is_a_failure() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;
        let req = test::TestRequest::post()
            .uri("/api/predict")
            .insert_header(("content-type", "application/json"))
            .set_payload(r#"{"region": "Cairo"}"#)
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[actix_web::test]
    async fn history_lists_recorded_predictions() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;

        let missing = test::TestRequest::get()
            .uri("/api/predict/history/Lima")
            .to_request();
        assert_eq!(
            test::call_service(&app, missing).await.status(),
            StatusCode::NOT_FOUND
        );

        for _ in 0..3 {
            let req = test::TestRequest::post()
                .uri("/api/predict")
                .set_json(json!({
                    "region": "Lima",
                    "climate_data": {
                        "temperature": 22,
                        "precipitation": 1,
                        "humidity": 70,
                        "wind_speed": 12
                    }
                }))
                .to_request();
            assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
        }

        let req = test::TestRequest::get()
            .uri("/api/predict/history/Lima?limit=2")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["region"], "Lima");
        assert_eq!(body["predictions"].as_array().unwrap().len(), 2);
    }

    #[actix_web::test]
    async fn trends_default_to_thirty_days() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;
        let req = test::TestRequest::get()
            .uri("/api/predict/trends/London?risk_type=flood")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["risk_type"], "flood");
        assert_eq!(body["trends"].as_array().unwrap().len(), 30);
    }

    #[actix_web::test]
    async fn risk_factors_explain_hazard() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;
        let req = test::TestRequest::get()
            .uri("/api/risk-factors/heatwave")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["risk_type"], "heatwave");
        assert!(!body["prevention_tips"].as_array().unwrap().is_empty());
    }
}
