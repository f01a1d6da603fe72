//! Router assembly: operational routes at the root, apartments under `/api`.

mod apartments;
mod common;

pub use apartments::apartment_routes;
pub use common::common_routes;

use crate::config::ServerConfig;
use crate::state::AppState;
use axum::http::{header, Method};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;

/// Full application router with CORS for the configured frontend origin and a body limit.
pub fn app(state: AppState, config: &ServerConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(config.cors_origin.clone())
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true);

    Router::new()
        .merge(common_routes(state.clone()))
        .nest("/api", apartment_routes(state))
        .layer(RequestBodyLimitLayer::new(config.body_limit_bytes))
        .layer(cors)
}
