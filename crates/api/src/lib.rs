//! PC Diagnostics API Server
//!
//! REST API for the diagnostic form: fact-set evaluation, server-side form
//! collection, and the read-only rule catalog.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use fact_collector::{CollectorConfig, FactCollector};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use rule_engine::RuleEngine;
use serde::Serialize;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use tokio::signal;
use tower::ServiceBuilder;
use tower_governor::GovernorLayer;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

pub mod config;
pub mod error;
pub mod presenter;
pub mod rate_limit;
mod routes;

pub use self::config::{LogFormat, LoggingConfig, ServiceConfig};
pub use self::error::{ApiError, ApiResult};
pub use self::presenter::{DiagnosisReport, MatchReport};

/// Application state shared across handlers.
///
/// Everything here is read-only after startup.
pub struct AppState {
    /// Evaluator over the standard rule catalog
    pub engine: RuleEngine<'static>,
    /// Form-to-facts collector
    pub collector: FactCollector,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
    /// Prometheus handle, when a recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new application state
    pub fn new(collector: CollectorConfig) -> Self {
        Self {
            engine: RuleEngine::standard(),
            collector: FactCollector::new(collector),
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
            metrics: None,
        }
    }

    /// Attach a Prometheus handle for `/metrics`
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(CollectorConfig::default())
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub rule_count: usize,
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/health", get(health_handler))
        .route("/api/v1/diagnose", post(routes::diagnose::diagnose_facts))
        .route("/api/v1/diagnose/form", post(routes::diagnose::diagnose_form))
        .route("/api/v1/rules", get(routes::rules::list_rules))
        .route("/api/v1/rules/:id", get(routes::rules::get_rule))
        .route("/metrics", get(routes::metrics::render))
        .with_state(state)
}

/// Router with tracing, CORS and (optionally) rate limiting
pub fn build_app(state: Arc<AppState>, config: &ServiceConfig) -> Result<Router, ApiError> {
    let app = create_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    if !config.rate_limit.enabled {
        return Ok(app);
    }

    let governor = rate_limit::create_governor_config(&config.rate_limit)?;
    info!(
        "Rate limiting enabled: burst={}, replenish every {}s",
        config.rate_limit.burst_size, config.rate_limit.per_second
    );
    Ok(app.layer(GovernorLayer { config: governor }))
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        rule_count: state.engine.rules().len(),
    })
}

/// Initialize logging
pub fn init_logging(config: &LoggingConfig) -> Result<(), ApiError> {
    let level = Level::from_str(&config.level)
        .map_err(|e| ApiError::internal(format!("Invalid log level {}: {}", config.level, e)))?;

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);

    let result = match config.format {
        LogFormat::Pretty => tracing::subscriber::set_global_default(builder.finish()),
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish()),
    };

    result.map_err(|e| ApiError::internal(format!("Failed to set tracing subscriber: {}", e)))
}

/// Install the global Prometheus recorder
pub fn install_metrics() -> Result<PrometheusHandle, ApiError> {
    PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| ApiError::internal(format!("Failed to install metrics recorder: {}", e)))
}

/// Run the server until Ctrl+C or SIGTERM
pub async fn run_server(config: ServiceConfig) -> Result<(), ApiError> {
    let addr = config.socket_addr().map_err(ApiError::internal)?;

    let state = AppState::new(config.collector.clone()).with_metrics(install_metrics()?);
    let app = build_app(Arc::new(state), &config)?;

    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        error!("Failed to bind to {}: {:?}", addr, e);
        ApiError::internal(format!("Failed to bind to {}: {}", addr, e))
    })?;

    info!("Starting API server on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| ApiError::internal(format!("Server error: {}", e)))?;

    info!("API server stopped");
    Ok(())
}

/// Resolve once Ctrl+C or SIGTERM is received
async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received shutdown signal"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix;
        match unix::signal(unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received TERM signal");
            }
            Err(e) => {
                error!("Failed to install TERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
