#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the geoscope query engine.
//!
//! Serves the competitor search/count/statistics endpoints and the IRIS
//! zone aggregation endpoint over the configured CSV datasets.

mod handlers;

use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use geoscope_datasets::DataConfig;
use geoscope_engine::Engine;

/// Shared application state.
pub struct AppState {
    /// Per-request query engine over the configured datasets.
    pub engine: Engine,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let config = DataConfig::load();
    for (label, path) in config.all_paths() {
        if !path.is_file() {
            log::error!("{label} dataset not found at {}", path.display());
            std::process::exit(1);
        }
        log::info!("using {label} dataset at {}", path.display());
    }

    let state = web::Data::new(AppState {
        engine: Engine::new(config),
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .route(
                "/competitor-search",
                web::post().to(handlers::competitor_search),
            )
            .route(
                "/competitor-count",
                web::post().to(handlers::competitor_count),
            )
            .route(
                "/competition-data",
                web::post().to(handlers::competition_data),
            )
            .route("/iris-data", web::post().to(handlers::iris_data))
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
