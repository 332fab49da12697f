//! HTTP handlers: GraphQL endpoint, GraphiQL page and health.

use async_graphql::http::GraphiQLSource;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    Json,
};
use serde_json::json;

use crate::graphql::{build_schema, AppSchema};
use crate::middleware::BearerToken;
use crate::services::{AuthService, CatalogService};

/// Shared application state for HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub catalog_service: CatalogService,
    pub schema: AppSchema,
}

impl AppState {
    /// Wire the services into a schema and bundle them for the router.
    pub fn new(
        auth_service: AuthService,
        catalog_service: CatalogService,
    ) -> Result<Self, async_graphql::dynamic::SchemaError> {
        let schema = build_schema(auth_service.clone(), catalog_service.clone())?;
        Ok(Self {
            auth_service,
            catalog_service,
            schema,
        })
    }

    pub fn auth_service(&self) -> &AuthService {
        &self.auth_service
    }
    pub fn schema(&self) -> &AppSchema {
        &self.schema
    }
}

pub const GRAPHQL_PATH: &str = "/graphql";

/// POST /graphql — execute a GraphQL request. The bearer token, if any, is
/// handed to resolvers as request data.
pub async fn graphql(
    State(state): State<AppState>,
    token: BearerToken,
    Json(request): Json<async_graphql::Request>,
) -> Json<async_graphql::Response> {
    let request = request.data(token);
    Json(state.schema().execute(request).await)
}

/// GET /graphql — GraphiQL explorer.
pub async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint(GRAPHQL_PATH).finish())
}

/// GET /health: liveness check.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "service": "shopcart" })),
    )
}
