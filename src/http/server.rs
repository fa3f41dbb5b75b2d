//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout, body limit, CORS,
//!   metrics, bearer verification)
//! - Bind server to listener and drain on shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::{
    error_handling::HandleErrorLayer,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use sqlx::SqlitePool;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::{timeout::error::Elapsed, timeout::TimeoutLayer, BoxError, ServiceBuilder};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::auth::TokenVerifier;
use crate::config::{ApiConfig, ReportConfig, SecurityConfig};
use crate::http::error::ApiError;
use crate::http::handlers::{account, budget, expenses, health, homepage, reports};
use crate::http::middleware::{require_bearer, track_metrics};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub verifier: Arc<dyn TokenVerifier>,
    pub reports: ReportConfig,
}

impl AppState {
    pub fn new(pool: SqlitePool, verifier: Arc<dyn TokenVerifier>, reports: ReportConfig) -> Self {
        Self {
            pool,
            verifier,
            reports,
        }
    }
}

/// HTTP server for the expense tracker API.
pub struct ApiServer {
    router: Router,
}

impl ApiServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ApiConfig, state: AppState) -> Self {
        Self {
            router: Self::build_router(&config, state),
        }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Oversized bodies and timeouts surface as `ApiError`s.
    fn build_router(config: &ApiConfig, state: AppState) -> Router {
        let protected = Router::new()
            .route("/RetrieveHomepageData", get(homepage::retrieve))
            .route("/CreateExpense", post(expenses::create))
            .route("/UpdateExpense", put(expenses::update))
            .route("/DeleteExpense", delete(expenses::delete))
            .route("/UpdateMonthlyBudget", put(budget::update_monthly))
            .route("/GetBarGraph", get(reports::bar_graph))
            .route("/GetLineGraph", get(reports::line_graph))
            .route("/GetPieChart", get(reports::pie_chart))
            .route("/UpdateDisplayName", put(account::update_display_name))
            .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer));

        Router::new()
            .route("/health", get(health::health))
            .route("/register", post(account::register))
            .merge(protected)
            .route_layer(middleware::from_fn(track_metrics))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(HandleErrorLayer::new(layer_error))
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
                    .layer(DefaultBodyLimit::max(config.security.max_body_size))
                    .layer(cors_layer(&config.security)),
            )
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining requests");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

}

async fn layer_error(err: BoxError) -> ApiError {
    if err.is::<Elapsed>() {
        ApiError::Timeout
    } else {
        ApiError::Internal(err.to_string())
    }
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    if security.cors_allowed_origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = security
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}
