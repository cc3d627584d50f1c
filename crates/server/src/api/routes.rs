use std::any::Any;
use std::sync::Arc;

use axum::{
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::error;

use super::{api_error, handlers, history, search};
use super::middleware::{cors_middleware, metrics_middleware};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // API routes; any method other than GET lands in the 405 fallback
    let api_routes = Router::new()
        .route(
            "/health",
            get(handlers::health).fallback(handlers::method_not_allowed),
        )
        .route(
            "/adapters",
            get(handlers::list_adapters).fallback(handlers::method_not_allowed),
        )
        .route(
            "/config",
            get(handlers::get_config).fallback(handlers::method_not_allowed),
        )
        .route(
            "/search",
            get(search::search).fallback(handlers::method_not_allowed),
        )
        .route(
            "/history",
            get(history::list_history).fallback(handlers::method_not_allowed),
        );

    // Layers run bottom-up: CORS is outermost so even panics and 404s carry its headers
    Router::new()
        .nest("/api", api_routes)
        .route(
            "/metrics",
            get(handlers::metrics).fallback(handlers::method_not_allowed),
        )
        .fallback(handlers::not_found)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(cors_middleware))
        .with_state(state)
}

fn handle_panic(_panic: Box<dyn Any + Send + 'static>) -> Response {
    error!("Request handler panicked");
    api_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
}
