//! Shopping-cart GraphQL API built with Rust.
//!
//! Exposes product CRUD and search plus user registration, login and profile
//! management over a single GraphQL endpoint. Sessions are stateless JWTs.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod graphql;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::AppError;
pub use handlers::http::AppState;
pub use services::{AuthService, CatalogService};

use axum::body::Body;
use axum::http::Request;
use axum::routing::get;
use handlers::http;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

/// Build the API router (graphql, health). Used by main and by integration tests.
pub fn create_app(state: AppState) -> axum::Router {
    let layers = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("-");
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id,
                )
            }),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(CorsLayer::permissive());

    axum::Router::new()
        .route(http::GRAPHQL_PATH, get(http::graphiql).post(http::graphql))
        .route("/health", get(http::health))
        .with_state(state)
        .layer(layers)
}
