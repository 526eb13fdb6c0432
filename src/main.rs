use axum::{routing::get, Router};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use job_board::{
    app_state::AppState,
    config::AppConfig,
    routes::{self, MAX_REQUEST_BYTES},
    services::{jobs_api::JobsApiClient, notifications::LogNotifier},
};

#[tokio::main]
async fn main() {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    let config = AppConfig::from_env().expect("Failed to load configuration from environment");

    tracing::info!("Initializing job-board server");

    let prometheus_handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus metrics recorder");
    let prometheus_handle = Arc::new(prometheus_handle);

    metrics::describe_histogram!(
        "jobs_api_request_seconds",
        "Latency of successful jobs API requests"
    );
    metrics::describe_counter!(
        "jobs_api_failures_total",
        "Jobs API requests that failed or returned a non-success status"
    );
    metrics::describe_counter!(
        "job_listing_fetch_failures_total",
        "Listing refreshes that ended in the error state"
    );
    metrics::describe_counter!("job_submissions_total", "Job postings created upstream");
    metrics::describe_counter!(
        "job_submissions_rejected_total",
        "Job postings rejected by form validation"
    );

    tracing::info!(url = %config.jobs_api_url, "Initializing jobs API client");
    let api = JobsApiClient::new(&config.jobs_api_url).expect("Failed to initialize jobs API client");

    let state = AppState::new(api, Arc::new(LogNotifier));

    let app = routes::router(state)
        .merge(
            Router::new()
                .route("/metrics", get(routes::metrics::prometheus_metrics))
                .with_state(prometheus_handle),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(RequestBodyLimitLayer::new(MAX_REQUEST_BYTES));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await.expect("Server error");
}
