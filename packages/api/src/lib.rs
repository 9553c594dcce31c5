use axum::{Json, Router, middleware::from_fn_with_state, routing::get};
use middleware::auth::auth_middleware;
use openapi::ApiDoc;
use state::AppState;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, decompression::RequestDecompressionLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;

pub mod entity;
mod middleware;
mod routes;

pub mod config;
pub mod error;
pub mod mock;
pub mod openapi;
pub mod state;
pub mod store;
pub mod store_config;
pub mod token;

pub mod auth {
    use crate::middleware;
    pub use middleware::auth::{AdminUser, AppUser};
}

pub fn construct_router(state: AppState) -> Router {
    let router = Router::new()
        .nest("/report-error", routes::report::routes())
        .nest("/auth", routes::auth::routes())
        .nest("/reports", routes::reports::routes())
        .nest("/health", routes::health::routes())
        .route("/openapi.json", get(openapi_json))
        .with_state(state.clone())
        .layer(from_fn_with_state(state.clone(), auth_middleware))
        .layer(CorsLayer::permissive())
        .layer(
            ServiceBuilder::new()
                .layer(RequestDecompressionLayer::new())
                .layer(CompressionLayer::new()),
        );

    Router::new()
        .nest("/api", router)
        .merge(routes::script::routes().with_state(state))
        .layer(TraceLayer::new_for_http())
}

#[tracing::instrument(name = "GET /openapi.json")]
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
