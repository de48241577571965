#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for climate risk predictions.
//!
//! Reads `BIND_ADDR`, `PORT` and `CLIMATE_RISK_CONFIG` from the
//! environment.

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    climate_risk_server::run_server().await
}
