//! HTTP adapters - REST API implementations.
//!
//! Everything lives under `/api/plannings`; commands require the
//! `x-operator-id` header.

pub mod operator;
pub mod planning;

use axum::{http::HeaderValue, routing::get, Router};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;

pub use operator::{Operator, OPERATOR_HEADER, REQUEST_ID_HEADER};
pub use planning::{planning_routes, ErrorResponse, PlanningHandlers, PlanningPorts};

/// Creates the application router with all routes and middleware.
pub fn app_router(handlers: PlanningHandlers, config: &ServerConfig) -> Router {
    let api_routes = Router::new().nest("/plannings", planning_routes(handlers));

    Router::new()
        .nest("/api", api_routes)
        .route("/health", get(health_check))
        .layer(TimeoutLayer::new(config.request_timeout()))
        .layer(cors_layer(config))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        cors.allow_origin(AllowOrigin::list(origins))
    }
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
