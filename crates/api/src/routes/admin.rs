//! Admin routes: moderation of requests and NGO accounts, categories,
//! and dashboard stats.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use validator::Validate;

use crate::AppState;
use crate::middleware::AuthUser;
use crate::routes::causes::request_json;
use crate::routes::{app_error_response, internal_error, json_error};
use kindra_core::identity::require_admin;
use kindra_shared::AppError;
use kindra_db::repositories::{
    CategoryError, CategoryRepository, DonationRepository, DonationRequestRepository,
    RequestError, UserError, UserRepository,
};

/// Payload for creating a category.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    /// Unique category name.
    #[validate(length(min = 3, max = 100))]
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
}

/// Creates the admin routes (requires auth middleware).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/stats", get(dashboard_stats))
        .route("/admin/ngos/pending", get(pending_ngos))
        .route("/admin/ngos/{user_id}/approve", post(approve_ngo))
        .route("/admin/ngos/{user_id}/reject", post(reject_ngo))
        .route("/admin/donation-requests", get(list_requests))
        .route(
            "/admin/donation-requests/{request_id}/approve",
            post(approve_request),
        )
        .route(
            "/admin/donation-requests/{request_id}/reject",
            post(reject_request),
        )
        .route("/admin/categories", post(create_category))
        .route("/admin/categories", get(list_categories))
        .route("/admin/categories/{category_id}", delete(delete_category))
}

/// Rejects non-admin callers.
fn require_admin_identity(auth: &AuthUser) -> Result<(), Response> {
    let identity = auth.identity()?;
    require_admin(&identity)
        .map_err(|_| json_error(StatusCode::FORBIDDEN, "forbidden", "Admins only!"))
}

/// GET /admin/stats - Dashboard counters.
async fn dashboard_stats(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    if let Err(response) = require_admin_identity(&auth) {
        return response;
    }

    let user_repo = UserRepository::new((*state.db).clone());
    let donation_repo = DonationRepository::new((*state.db).clone());

    let (total_ngos, pending_approvals) = match user_repo.ngo_counts().await {
        Ok(counts) => counts,
        Err(e) => {
            error!(error = %e, "Database error counting NGOs");
            return internal_error();
        }
    };

    let total_donations = match donation_repo.total_donated().await {
        Ok(total) => total,
        Err(e) => {
            error!(error = %e, "Database error summing donations");
            return internal_error();
        }
    };

    (
        StatusCode::OK,
        Json(json!({
            "total_ngos": total_ngos,
            "pending_approvals": pending_approvals,
            "total_donations": total_donations
        })),
    )
        .into_response()
}

/// GET /admin/ngos/pending - NGO accounts awaiting approval.
async fn pending_ngos(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    if let Err(response) = require_admin_identity(&auth) {
        return response;
    }

    let user_repo = UserRepository::new((*state.db).clone());
    match user_repo.list_pending_ngos().await {
        Ok(users) => {
            let ngos: Vec<_> = users
                .into_iter()
                .map(|u| {
                    json!({
                        "id": u.id,
                        "name": u.username,
                        "email": u.email,
                        "date_joined": u.created_at
                    })
                })
                .collect();
            (StatusCode::OK, Json(json!({ "ngos": ngos }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Database error listing pending NGOs");
            internal_error()
        }
    }
}

/// Maps user moderation errors shared by approve/reject handlers.
fn user_error_response(e: &UserError) -> Response {
    match e {
        UserError::NotFound(_) | UserError::NotAnNgo(_) => {
            json_error(StatusCode::NOT_FOUND, "not_found", "NGO not found")
        }
        err => {
            error!(error = %err, "Database error moderating NGO account");
            internal_error()
        }
    }
}

/// POST `/admin/ngos/{user_id}/approve` - Approve an NGO account.
async fn approve_ngo(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<uuid::Uuid>,
) -> impl IntoResponse {
    if let Err(response) = require_admin_identity(&auth) {
        return response;
    }

    let user_repo = UserRepository::new((*state.db).clone());
    match user_repo.approve_ngo(user_id).await {
        Ok(user) => {
            info!(user_id = %user_id, approved_by = %auth.user_id(), "NGO account approved");
            (
                StatusCode::OK,
                Json(json!({
                    "message": format!("NGO {} has been approved.", user.username)
                })),
            )
                .into_response()
        }
        Err(e) => user_error_response(&e),
    }
}

/// POST `/admin/ngos/{user_id}/reject` - Reject and remove an NGO account.
async fn reject_ngo(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<uuid::Uuid>,
) -> impl IntoResponse {
    if let Err(response) = require_admin_identity(&auth) {
        return response;
    }

    let user_repo = UserRepository::new((*state.db).clone());
    match user_repo.reject_ngo(user_id).await {
        Ok(()) => {
            info!(user_id = %user_id, rejected_by = %auth.user_id(), "NGO account rejected");
            (
                StatusCode::OK,
                Json(json!({ "message": "NGO has been rejected and removed." })),
            )
                .into_response()
        }
        Err(e) => user_error_response(&e),
    }
}

/// GET /admin/donation-requests - Every request, newest first.
async fn list_requests(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    if let Err(response) = require_admin_identity(&auth) {
        return response;
    }

    let repo = DonationRequestRepository::new((*state.db).clone());
    match repo.list_all().await {
        Ok(requests) => {
            let items: Vec<_> = requests.iter().map(request_json).collect();
            (StatusCode::OK, Json(json!({ "donation_requests": items }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Database error listing donation requests");
            internal_error()
        }
    }
}

/// Maps request moderation errors shared by approve/reject handlers.
fn moderation_error_response(e: RequestError) -> Response {
    match e {
        RequestError::NotFound(_) => json_error(
            StatusCode::NOT_FOUND,
            "not_found",
            "Donation request not found",
        ),
        RequestError::Moderation(m) => app_error_response(&AppError::from(m)),
        err => {
            error!(error = %err, "Database error moderating request");
            internal_error()
        }
    }
}

/// POST `/admin/donation-requests/{request_id}/approve` - Approve a
/// pending request, recording the approver and timestamp.
async fn approve_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(request_id): Path<uuid::Uuid>,
) -> impl IntoResponse {
    if let Err(response) = require_admin_identity(&auth) {
        return response;
    }

    let repo = DonationRequestRepository::new((*state.db).clone());
    match repo.approve(request_id, auth.user_id()).await {
        Ok(request) => {
            info!(request_id = %request_id, approved_by = %auth.user_id(), "Donation request approved");
            (
                StatusCode::OK,
                Json(json!({
                    "message": "Donation request approved successfully",
                    "request": request_json(&request)
                })),
            )
                .into_response()
        }
        Err(e) => moderation_error_response(e),
    }
}

/// POST `/admin/donation-requests/{request_id}/reject` - Reject a
/// pending request (terminal).
async fn reject_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(request_id): Path<uuid::Uuid>,
) -> impl IntoResponse {
    if let Err(response) = require_admin_identity(&auth) {
        return response;
    }

    let repo = DonationRequestRepository::new((*state.db).clone());
    match repo.reject(request_id).await {
        Ok(request) => {
            info!(request_id = %request_id, rejected_by = %auth.user_id(), "Donation request rejected");
            (
                StatusCode::OK,
                Json(json!({
                    "message": "Donation request rejected successfully",
                    "request": request_json(&request)
                })),
            )
                .into_response()
        }
        Err(e) => moderation_error_response(e),
    }
}

/// POST /admin/categories - Create a category with a unique name.
async fn create_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateCategoryRequest>,
) -> impl IntoResponse {
    if let Err(response) = require_admin_identity(&auth) {
        return response;
    }

    if let Err(e) = payload.validate() {
        return json_error(StatusCode::BAD_REQUEST, "validation_error", e.to_string());
    }

    let repo = CategoryRepository::new((*state.db).clone());
    match repo.create(payload.name, payload.description).await {
        Ok(category) => {
            info!(category_id = %category.id, "Category created");
            (StatusCode::CREATED, Json(json!(category))).into_response()
        }
        Err(CategoryError::DuplicateName(name)) => json_error(
            StatusCode::CONFLICT,
            "duplicate_name",
            format!("Category name '{name}' already exists"),
        ),
        Err(e) => {
            error!(error = %e, "Failed to create category");
            internal_error()
        }
    }
}

/// GET /admin/categories - List all categories.
async fn list_categories(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    if let Err(response) = require_admin_identity(&auth) {
        return response;
    }

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

/// DELETE `/admin/categories/{category_id}` - Delete a category,
/// cascading to its requests and their donations.
async fn delete_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(category_id): Path<uuid::Uuid>,
) -> impl IntoResponse {
    if let Err(response) = require_admin_identity(&auth) {
        return response;
    }

    let repo = CategoryRepository::new((*state.db).clone());
    match repo.delete(category_id).await {
        Ok(()) => {
            info!(category_id = %category_id, "Category deleted with cascade");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(CategoryError::NotFound(_)) => {
            json_error(StatusCode::NOT_FOUND, "not_found", "Category not found")
        }
        Err(e) => {
            error!(error = %e, "Failed to delete category");
            internal_error()
        }
    }
}
