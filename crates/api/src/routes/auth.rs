//! Registration and login routes.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use validator::Validate;

use crate::AppState;
use crate::routes::{internal_error, json_error};
use kindra_core::auth::{hash_password, verify_password};
use kindra_core::identity::Role;
use kindra_db::repositories::{RegisterDonorInput, RegisterNgoInput, UserError, UserRepository};

/// Registration payload.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Unique username.
    #[validate(length(min = 3, max = 80))]
    pub username: String,
    /// Unique email.
    #[validate(email)]
    pub email: String,
    /// Plaintext password, hashed before storage.
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    /// Requested role: "Donor" (default) or "NGO".
    pub role: Option<String>,
    /// Organization name (NGO registration).
    #[validate(length(min = 3, max = 120))]
    pub organization_name: Option<String>,
    /// Contact person (NGO registration).
    pub contact_person: Option<String>,
    /// First name (donor registration).
    pub first_name: Option<String>,
    /// Last name (donor registration).
    pub last_name: Option<String>,
}

/// Login payload.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Account email.
    #[validate(email)]
    pub email: String,
    /// Account password.
    pub password: String,
}

/// Creates auth routes (public).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

/// POST /auth/register - Register a donor or NGO account.
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> impl IntoResponse {
    if let Err(e) = payload.validate() {
        return json_error(StatusCode::BAD_REQUEST, "validation_error", e.to_string());
    }

    let role = match payload.role.as_deref() {
        None => Role::Donor,
        Some(r) => match Role::parse(r) {
            // Admin accounts are seeded, never self-registered.
            Some(Role::Admin) | None => {
                return json_error(
                    StatusCode::BAD_REQUEST,
                    "invalid_role",
                    "Role must be 'Donor' or 'NGO'",
                );
            }
            Some(r) => r,
        },
    };

    let password_hash = match hash_password(&payload.password) {
        Ok(h) => h,
        Err(e) => {
            error!(error = %e, "Failed to hash password");
            return internal_error();
        }
    };

    let user_repo = UserRepository::new((*state.db).clone());

    let result = match role {
        Role::Ngo => {
            user_repo
                .register_ngo(RegisterNgoInput {
                    username: payload.username.clone(),
                    email: payload.email,
                    password_hash,
                    organization_name: payload
                        .organization_name
                        .unwrap_or_else(|| payload.username.clone()),
                    contact_person: payload.contact_person.unwrap_or_else(|| payload.username),
                })
                .await
        }
        _ => {
            user_repo
                .register_donor(RegisterDonorInput {
                    username: payload.username.clone(),
                    email: payload.email,
                    password_hash,
                    first_name: payload.first_name.unwrap_or_else(|| payload.username),
                    last_name: payload.last_name.unwrap_or_default(),
                })
                .await
        }
    };

    let user = match result {
        Ok(u) => u,
        Err(UserError::EmailTaken) => {
            return json_error(
                StatusCode::CONFLICT,
                "email_taken",
                "Email is already registered",
            );
        }
        Err(UserError::UsernameTaken) => {
            return json_error(
                StatusCode::CONFLICT,
                "username_taken",
                "Username is already taken",
            );
        }
        Err(UserError::OrganizationNameTaken(name)) => {
            return json_error(
                StatusCode::CONFLICT,
                "organization_name_taken",
                format!("Organization name '{name}' is already taken"),
            );
        }
        Err(e) => {
            error!(error = %e, "Failed to register user");
            return internal_error();
        }
    };

    info!(user_id = %user.id, role = %role, "User registered");

    (
        StatusCode::CREATED,
        Json(json!({
            "message": "User registered successfully",
            "user_id": user.id,
            "role": role.as_str()
        })),
    )
        .into_response()
}

/// POST /auth/login - Authenticate and issue an access token.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    if let Err(e) = payload.validate() {
        return json_error(StatusCode::BAD_REQUEST, "validation_error", e.to_string());
    }

    let user_repo = UserRepository::new((*state.db).clone());

    let user = match user_repo.find_by_email(&payload.email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            return json_error(
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                "Invalid credentials",
            );
        }
        Err(e) => {
            error!(error = %e, "Database error during login");
            return internal_error();
        }
    };

    match verify_password(&payload.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            return json_error(
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                "Invalid credentials",
            );
        }
        Err(e) => {
            error!(error = %e, "Password verification failed");
            return internal_error();
        }
    }

    let role: Role = user.role.clone().into();

    // Unapproved NGO accounts cannot log in.
    if role == Role::Ngo && !user.is_approved {
        return json_error(
            StatusCode::FORBIDDEN,
            "account_pending",
            "Your NGO account is pending admin approval.",
        );
    }

    let access_token = match state.jwt_service.generate_access_token(user.id, role.as_str()) {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "Failed to issue access token");
            return internal_error();
        }
    };

    info!(user_id = %user.id, role = %role, "User logged in");

    (
        StatusCode::OK,
        Json(json!({
            "access_token": access_token,
            "role": role.as_str(),
            "expires_in": state.jwt_service.access_token_expires_in()
        })),
    )
        .into_response()
}
