pub mod handlers;
pub mod history;
pub mod middleware;
pub mod routes;
pub mod search;

use axum::{http::StatusCode, Json};
use serde::Serialize;

pub use routes::create_router;

/// Body of every non-2xx API response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub(crate) fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}
