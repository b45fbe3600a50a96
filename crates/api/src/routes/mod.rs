//! API route definitions.

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{AppState, middleware::auth::auth_middleware};
use kindra_shared::AppError;

pub mod admin;
pub mod auth;
pub mod causes;
pub mod donor;
pub mod health;
pub mod ngo;

/// Creates the API router with public and protected routes.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(ngo::routes())
        .merge(donor::routes())
        .merge(admin::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(causes::routes())
        .merge(protected_routes)
}

/// Builds the JSON error envelope every handler uses.
pub(crate) fn json_error(status: StatusCode, error: &str, message: impl AsRef<str>) -> Response {
    (
        status,
        Json(json!({ "error": error, "message": message.as_ref() })),
    )
        .into_response()
}

/// 500 response for unexpected database or service failures.
pub(crate) fn internal_error() -> Response {
    json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal_error",
        "An error occurred",
    )
}

/// Maps a core error, converted into `AppError`, onto its wire shape.
pub(crate) fn app_error_response(err: &AppError) -> Response {
    json_error(
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        err.error_code(),
        err.to_string(),
    )
}
