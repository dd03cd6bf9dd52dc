//! Climate API Server
//!
//! HTTP service exposing climate datasets as hexagonal GeoJSON coverages
//! for the mapping front end.

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use clap::Parser;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use climate_api::handlers;
use climate_api::state::AppState;

/// Climate API Server
#[derive(Parser, Debug)]
#[command(name = "climate-api")]
#[command(about = "Climate dataset server producing hexagonal GeoJSON coverages")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:8090", env = "CLIMATE_LISTEN_ADDR")]
    listen: String,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Number of worker threads
    #[arg(long, env = "CLIMATE_WORKER_THREADS")]
    worker_threads: Option<usize>,
}

fn main() {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Build runtime with configured threads
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(threads) = args.worker_threads {
        runtime_builder.worker_threads(threads);
    }

    let runtime = runtime_builder
        .build()
        .expect("Failed to create Tokio runtime");

    runtime.block_on(async move {
        run_server(args).await;
    });
}

async fn run_server(args: Args) {
    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .json()
        .init();

    info!("Starting climate API server");

    // Initialize Prometheus metrics exporter
    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder");

    // Initialize application state (constructs the process-wide reducer)
    let state = match AppState::from_env(prometheus_handle) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            tracing::error!("Failed to initialize application state: {}", e);
            std::process::exit(1);
        }
    };

    // Build router
    let app = Router::new()
        // Health and observability
        .route("/health", get(handlers::health_handler))
        .route("/metrics", get(handlers::metrics_handler))
        .route("/api/climate/status", get(handlers::status_handler))
        // Hexagonal coverages
        .route(
            "/api/climate/temperature-projection",
            get(handlers::temperature_projection_handler),
        )
        .route(
            "/api/climate/precipitation-drought",
            get(handlers::precipitation_handler),
        )
        .route(
            "/api/climate/urban-heat-island",
            get(handlers::heat_island_handler),
        )
        .route("/api/climate/groundwater", get(handlers::groundwater_handler))
        .route("/api/climate/wet-bulb", get(handlers::wet_bulb_handler))
        // Visualization tile URLs
        .route(
            "/api/climate/temperature-projection/tiles",
            get(handlers::temperature_tiles_handler),
        )
        .route(
            "/api/climate/urban-heat-island/tiles",
            get(handlers::heat_island_tiles_handler),
        )
        .route(
            "/api/climate/groundwater/tiles",
            get(handlers::groundwater_tiles_handler),
        )
        .route(
            "/api/climate/precipitation-drought/tiles",
            get(handlers::precipitation_tiles_handler),
        )
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new());

    let listener = tokio::net::TcpListener::bind(&args.listen)
        .await
        .expect("Failed to bind listen address");

    info!(listen = %args.listen, "Climate API listening");

    axum::serve(listener, app)
        .await
        .expect("Server error");
}
