//! Donor routes: browsing approved causes, donating, and history.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::AppState;
use crate::middleware::AuthUser;
use crate::routes::causes::request_json;
use crate::routes::{app_error_response, internal_error, json_error};
use kindra_core::identity::require_donor;
use kindra_shared::AppError;
use kindra_db::entities::donor_profiles;
use kindra_db::repositories::{
    CategoryRepository, DonationError, DonationRepository, DonationRequestRepository,
    ProfileRepository,
};
use kindra_shared::types::Money;

/// Query parameters for cause listings.
#[derive(Debug, Deserialize)]
pub struct CauseListQuery {
    /// Filter by category name.
    pub category: Option<String>,
}

/// Donation payload.
#[derive(Debug, Deserialize)]
pub struct DonateRequest {
    /// Amount to donate.
    pub amount_donated: Decimal,
}

/// Creates the donor routes (requires auth middleware).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/donors/causes", get(list_approved_causes))
        .route("/donors/causes/{request_id}", get(get_approved_cause))
        .route("/donors/causes/{request_id}/donate", post(donate))
        .route("/donors/my-donations", get(my_donations))
}

/// Resolves the calling identity to a donor profile.
async fn resolve_donor_profile(
    state: &AppState,
    auth: &AuthUser,
) -> Result<donor_profiles::Model, Response> {
    let identity = auth.identity()?;

    if require_donor(&identity).is_err() {
        return Err(json_error(
            StatusCode::FORBIDDEN,
            "forbidden",
            "Donors only!",
        ));
    }

    let profile_repo = ProfileRepository::new((*state.db).clone());
    match profile_repo.find_donor_by_user(auth.user_id()).await {
        Ok(Some(profile)) => Ok(profile),
        Ok(None) => Err(json_error(
            StatusCode::NOT_FOUND,
            "profile_not_found",
            "Donor profile not found. Please complete your donor profile first.",
        )),
        Err(e) => {
            error!(error = %e, "Database error resolving donor profile");
            Err(internal_error())
        }
    }
}

/// GET /donors/causes - Donor-visible requests, optionally by category name.
async fn list_approved_causes(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<CauseListQuery>,
) -> impl IntoResponse {
    if let Err(response) = resolve_donor_profile(&state, &auth).await {
        return response;
    }

    let category_id = if let Some(name) = query.category {
        let category_repo = CategoryRepository::new((*state.db).clone());
        match category_repo.find_by_name(&name).await {
            Ok(Some(category)) => Some(category.id),
            Ok(None) => {
                return json_error(StatusCode::NOT_FOUND, "not_found", "Category not found");
            }
            Err(e) => {
                error!(error = %e, "Database error resolving category");
                return internal_error();
            }
        }
    } else {
        None
    };

    let repo = DonationRequestRepository::new((*state.db).clone());
    match repo.list_visible(category_id).await {
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

/// GET `/donors/causes/{request_id}` - Single donor-visible request.
async fn get_approved_cause(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(request_id): Path<uuid::Uuid>,
) -> impl IntoResponse {
    if let Err(response) = resolve_donor_profile(&state, &auth).await {
        return response;
    }

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

/// POST `/donors/causes/{request_id}/donate` - Donate to an approved request.
async fn donate(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(request_id): Path<uuid::Uuid>,
    Json(payload): Json<DonateRequest>,
) -> impl IntoResponse {
    let profile = match resolve_donor_profile(&state, &auth).await {
        Ok(p) => p,
        Err(response) => return response,
    };

    let repo = DonationRepository::new((*state.db).clone());
    let receipt = match repo
        .apply_donation(request_id, profile.id, Money::new(payload.amount_donated))
        .await
    {
        Ok(r) => r,
        Err(DonationError::RequestNotFound(_)) => {
            return json_error(
                StatusCode::NOT_FOUND,
                "not_found",
                "Donation request not found or not approved",
            );
        }
        Err(DonationError::Ledger(e)) => {
            return app_error_response(&AppError::from(e));
        }
        Err(DonationError::Database(e)) => {
            error!(error = %e, "Database error applying donation");
            return internal_error();
        }
    };

    info!(
        donation_id = %receipt.donation.id,
        request_id = %request_id,
        donor_id = %profile.id,
        amount = %receipt.donation.amount_donated,
        completed = receipt.request.status == kindra_db::entities::sea_orm_active_enums::RequestStatus::Completed,
        "Donation applied"
    );

    (
        StatusCode::CREATED,
        Json(json!({
            "message": "Donation successful",
            "donation": receipt.donation,
            "request": request_json(&receipt.request)
        })),
    )
        .into_response()
}

/// GET /donors/my-donations - The caller's donation history, newest first.
async fn my_donations(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let profile = match resolve_donor_profile(&state, &auth).await {
        Ok(p) => p,
        Err(response) => return response,
    };

    let repo = DonationRepository::new((*state.db).clone());
    match repo.history_for_donor(profile.id).await {
        Ok(entries) => {
            let donations: Vec<_> = entries
                .iter()
                .map(|entry| {
                    json!({
                        "id": entry.donation.id,
                        "amount_donated": entry.donation.amount_donated,
                        "created_at": entry.donation.created_at,
                        "request": {
                            "id": entry.donation.donation_request_id,
                            "title": entry.request_title,
                            "organization_name": entry.organization_name
                        }
                    })
                })
                .collect();

            (StatusCode::OK, Json(json!({ "donations": donations }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Database error fetching donation history");
            internal_error()
        }
    }
}
