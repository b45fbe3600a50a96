//! NGO routes: managing own causes and image uploads.

use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use validator::Validate;

use crate::AppState;
use crate::middleware::AuthUser;
use crate::routes::causes::request_json;
use crate::routes::{app_error_response, internal_error, json_error};
use kindra_core::identity::{AuthzError, require_approved_ngo};
use kindra_shared::AppError;
use kindra_db::entities::ngo_profiles;
use kindra_db::repositories::{
    CreateRequestInput, DonationRequestRepository, ProfileRepository, RequestError,
    UpdateRequestInput, UserRepository,
};
use kindra_shared::types::{Money, RequestId};

/// Payload for creating a cause.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCauseRequest {
    /// Category reference.
    pub category_id: uuid::Uuid,
    /// Cause title.
    #[validate(length(min = 5, max = 255))]
    pub title: String,
    /// Cause description.
    #[validate(length(min = 20))]
    pub description: String,
    /// Funding target.
    pub amount_needed: Decimal,
    /// Optional image URL.
    #[validate(url)]
    pub image_url: Option<String>,
}

/// Payload for updating a cause. Absent fields are left unchanged.
#[derive(Debug, Deserialize, Validate, Default)]
pub struct UpdateCauseRequest {
    /// New category reference.
    pub category_id: Option<uuid::Uuid>,
    /// New title.
    #[validate(length(min = 5, max = 255))]
    pub title: Option<String>,
    /// New description.
    #[validate(length(min = 20))]
    pub description: Option<String>,
    /// New funding target.
    pub amount_needed: Option<Decimal>,
}

/// Creates the NGO routes (requires auth middleware).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/ngo/causes", post(create_cause))
        .route("/ngo/causes", get(list_my_causes))
        .route("/ngo/causes/{request_id}", put(update_cause))
        .route("/ngo/causes/{request_id}", delete(delete_cause))
        .route("/ngo/causes/{request_id}/image", post(upload_cause_image))
}

/// Resolves the calling identity to an approved NGO profile.
async fn resolve_ngo_profile(
    state: &AppState,
    auth: &AuthUser,
) -> Result<ngo_profiles::Model, Response> {
    let identity = auth.identity()?;

    let user_repo = UserRepository::new((*state.db).clone());
    let user = match user_repo.find_by_id(auth.user_id()).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            return Err(json_error(
                StatusCode::NOT_FOUND,
                "not_found",
                "User not found",
            ));
        }
        Err(e) => {
            error!(error = %e, "Database error resolving user");
            return Err(internal_error());
        }
    };

    if let Err(e) = require_approved_ngo(&identity, user.is_approved) {
        let message = match e {
            AuthzError::AccountNotApproved => "Your NGO account is pending admin approval.",
            AuthzError::RoleMismatch { .. } => "Approved NGOs only!",
        };
        return Err(json_error(StatusCode::FORBIDDEN, "forbidden", message));
    }

    let profile_repo = ProfileRepository::new((*state.db).clone());
    match profile_repo.find_ngo_by_user(auth.user_id()).await {
        Ok(Some(profile)) => Ok(profile),
        Ok(None) => Err(json_error(
            StatusCode::NOT_FOUND,
            "profile_not_found",
            "NGO profile not found.",
        )),
        Err(e) => {
            error!(error = %e, "Database error resolving NGO profile");
            Err(internal_error())
        }
    }
}

/// Maps request repository errors shared by several handlers.
fn request_error_response(e: RequestError) -> Response {
    match e {
        RequestError::NotFound(_) => json_error(
            StatusCode::NOT_FOUND,
            "not_found",
            "Donation request not found or you do not have permission to modify it.",
        ),
        RequestError::CategoryNotFound(_) => {
            json_error(StatusCode::NOT_FOUND, "category_not_found", "Category not found")
        }
        RequestError::Moderation(m) => app_error_response(&AppError::from(m)),
        RequestError::Database(err) => {
            error!(error = %err, "Database error in request operation");
            internal_error()
        }
    }
}

/// POST /ngo/causes - Create a new cause (status Pending).
async fn create_cause(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateCauseRequest>,
) -> impl IntoResponse {
    let profile = match resolve_ngo_profile(&state, &auth).await {
        Ok(p) => p,
        Err(response) => return response,
    };

    if let Err(e) = payload.validate() {
        return json_error(StatusCode::BAD_REQUEST, "validation_error", e.to_string());
    }

    let amount_needed = Money::new(payload.amount_needed);
    if !amount_needed.is_positive() {
        return json_error(
            StatusCode::BAD_REQUEST,
            "invalid_amount",
            "amount_needed must be a positive amount",
        );
    }

    let repo = DonationRequestRepository::new((*state.db).clone());
    let request = match repo
        .create(CreateRequestInput {
            ngo_id: profile.id,
            category_id: payload.category_id,
            title: payload.title,
            description: payload.description,
            amount_needed: amount_needed.amount(),
            image_url: payload.image_url,
        })
        .await
    {
        Ok(r) => r,
        Err(e) => return request_error_response(e),
    };

    info!(request_id = %request.id, ngo_id = %profile.id, "Donation request created");

    (StatusCode::CREATED, Json(request_json(&request))).into_response()
}

/// GET /ngo/causes - List the caller's causes, any status.
async fn list_my_causes(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let profile = match resolve_ngo_profile(&state, &auth).await {
        Ok(p) => p,
        Err(response) => return response,
    };

    let repo = DonationRequestRepository::new((*state.db).clone());
    match repo.list_for_ngo(profile.id).await {
        Ok(requests) => {
            let causes: Vec<_> = requests.iter().map(request_json).collect();
            (StatusCode::OK, Json(json!({ "causes": causes }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Database error listing NGO causes");
            internal_error()
        }
    }
}

/// PUT `/ngo/causes/{request_id}` - Update an owned cause.
async fn update_cause(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(request_id): Path<uuid::Uuid>,
    Json(payload): Json<UpdateCauseRequest>,
) -> impl IntoResponse {
    let profile = match resolve_ngo_profile(&state, &auth).await {
        Ok(p) => p,
        Err(response) => return response,
    };

    if let Err(e) = payload.validate() {
        return json_error(StatusCode::BAD_REQUEST, "validation_error", e.to_string());
    }

    if let Some(amount) = payload.amount_needed
        && !Money::new(amount).is_positive()
    {
        return json_error(
            StatusCode::BAD_REQUEST,
            "invalid_amount",
            "amount_needed must be a positive amount",
        );
    }

    let repo = DonationRequestRepository::new((*state.db).clone());
    let updated = match repo
        .update_by_owner(
            request_id,
            profile.id,
            UpdateRequestInput {
                title: payload.title,
                description: payload.description,
                amount_needed: payload.amount_needed.map(|a| Money::new(a).amount()),
                category_id: payload.category_id,
            },
        )
        .await
    {
        Ok(r) => r,
        Err(e) => return request_error_response(e),
    };

    info!(request_id = %request_id, "Donation request updated");

    (StatusCode::OK, Json(request_json(&updated))).into_response()
}

/// DELETE `/ngo/causes/{request_id}` - Delete an owned cause and its donations.
async fn delete_cause(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(request_id): Path<uuid::Uuid>,
) -> impl IntoResponse {
    let profile = match resolve_ngo_profile(&state, &auth).await {
        Ok(p) => p,
        Err(response) => return response,
    };

    let repo = DonationRequestRepository::new((*state.db).clone());
    if let Err(e) = repo.delete_by_owner(request_id, profile.id).await {
        return request_error_response(e);
    }

    info!(request_id = %request_id, "Donation request deleted");

    (
        StatusCode::OK,
        Json(json!({ "message": "Donation request deleted successfully." })),
    )
        .into_response()
}

/// POST `/ngo/causes/{request_id}/image` - Upload a cause image and
/// record its durable URL.
async fn upload_cause_image(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(request_id): Path<uuid::Uuid>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let profile = match resolve_ngo_profile(&state, &auth).await {
        Ok(p) => p,
        Err(response) => return response,
    };

    let Some(storage) = state.storage.clone() else {
        return json_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "storage_unavailable",
            "Image uploads are not configured",
        );
    };

    let repo = DonationRequestRepository::new((*state.db).clone());

    // Verify ownership before writing to storage.
    match repo.find_by_id(request_id).await {
        Ok(Some(request)) if request.ngo_id == profile.id => {}
        Ok(_) => {
            return json_error(
                StatusCode::NOT_FOUND,
                "not_found",
                "Donation request not found or you do not have permission to modify it.",
            );
        }
        Err(e) => {
            error!(error = %e, "Database error verifying ownership");
            return internal_error();
        }
    }

    let field = match multipart.next_field().await {
        Ok(Some(f)) => f,
        Ok(None) => {
            return json_error(
                StatusCode::BAD_REQUEST,
                "missing_file",
                "No image file provided",
            );
        }
        Err(e) => {
            return json_error(StatusCode::BAD_REQUEST, "invalid_multipart", e.to_string());
        }
    };

    let filename = field.file_name().unwrap_or("upload").to_string();
    let content_type = field.content_type().unwrap_or("").to_string();
    let data = match field.bytes().await {
        Ok(b) => b.to_vec(),
        Err(e) => {
            return json_error(StatusCode::BAD_REQUEST, "invalid_multipart", e.to_string());
        }
    };

    let image_url = match storage
        .upload_image(
            RequestId::from_uuid(request_id),
            &filename,
            &content_type,
            data,
        )
        .await
    {
        Ok(url) => url,
        Err(e @ (kindra_core::storage::StorageError::FileTooLarge { .. }
        | kindra_core::storage::StorageError::InvalidMimeType { .. })) => {
            return json_error(StatusCode::BAD_REQUEST, "invalid_upload", e.to_string());
        }
        Err(e) => {
            error!(error = %e, "Image upload failed");
            return json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "storage_error",
                "Failed to store the image",
            );
        }
    };

    let updated = match repo
        .set_image_url(request_id, profile.id, image_url)
        .await
    {
        Ok(r) => r,
        Err(e) => return request_error_response(e),
    };

    info!(request_id = %request_id, "Cause image uploaded");

    (StatusCode::OK, Json(request_json(&updated))).into_response()
}
