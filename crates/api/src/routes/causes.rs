//! Public cause routes: approved requests and categories.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde_json::json;
use tracing::error;

use crate::AppState;
use crate::routes::{internal_error, json_error};
use kindra_core::ledger::LedgerService;
use kindra_db::entities::donation_requests;
use kindra_db::repositories::{CategoryRepository, DonationRequestRepository};
use kindra_shared::types::Money;

/// Creates the public cause routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/causes", get(list_causes))
        .route("/causes/categories", get(list_categories))
        .route("/causes/{request_id}", get(get_cause))
}

/// Serializes a request for API responses, including the derived
/// remaining capacity.
pub(crate) fn request_json(request: &donation_requests::Model) -> serde_json::Value {
    let remaining = LedgerService::remaining(
        Money::new(request.amount_needed),
        Money::new(request.amount_received),
    );

    json!({
        "id": request.id,
        "ngo_id": request.ngo_id,
        "category_id": request.category_id,
        "title": request.title,
        "description": request.description,
        "amount_needed": request.amount_needed,
        "amount_received": request.amount_received,
        "amount_remaining": remaining.amount(),
        "image_url": request.image_url,
        "status": request.status,
        "approved_by_admin_id": request.approved_by_admin_id,
        "approval_date": request.approval_date,
        "created_at": request.created_at,
        "updated_at": request.updated_at
    })
}

/// GET /causes - List donor-visible requests. Publicly accessible.
async fn list_causes(State(state): State<AppState>) -> impl IntoResponse {
    let repo = DonationRequestRepository::new((*state.db).clone());

    match repo.list_visible(None).await {
        Ok(requests) => {
            let causes: Vec<_> = requests.iter().map(request_json).collect();
            (StatusCode::OK, Json(json!({ "causes": causes }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Database error listing causes");
            internal_error()
        }
    }
}

/// GET /causes/categories - List all categories. Publicly accessible.
async fn list_categories(State(state): State<AppState>) -> impl IntoResponse {
    let repo = CategoryRepository::new((*state.db).clone());

    match repo.list().await {
        Ok(categories) => {
            (StatusCode::OK, Json(json!({ "categories": categories }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Database error listing categories");
            internal_error()
        }
    }
}

/// GET `/causes/{request_id}` - Single donor-visible request.
async fn get_cause(
    State(state): State<AppState>,
    Path(request_id): Path<uuid::Uuid>,
) -> impl IntoResponse {
    let repo = DonationRequestRepository::new((*state.db).clone());

    match repo.find_visible(request_id).await {
        Ok(Some(request)) => (StatusCode::OK, Json(request_json(&request))).into_response(),
        Ok(None) => json_error(
            StatusCode::NOT_FOUND,
            "not_found",
            "Approved donation request not found",
        ),
        Err(e) => {
            error!(error = %e, "Database error fetching cause");
            internal_error()
        }
    }
}
