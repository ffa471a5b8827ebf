use argon2::{
    password_hash::{PasswordHash, PasswordVerifier},
    Argon2,
};
use axum::{extract::State, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;

use crate::auth::{issue_token, Claims};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /admin/login - Authenticate an admin and receive a bearer token
///
/// The token is a signed JWT carrying the admin id and role. Unknown
/// email and wrong password produce the same 401 response.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let email = payload
        .email
        .filter(|e| !e.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Missing field: email"))?;
    let password = payload
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::bad_request("Missing field: password"))?;

    let admin = state
        .credentials
        .admin_by_email(&email)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid admin credentials"))?;

    let parsed_hash = PasswordHash::new(&admin.password_hash).map_err(|e| {
        tracing::error!("stored password hash is unparseable: {}", e);
        ApiError::internal_server_error("Authentication error")
    })?;

    let valid = Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok();

    if !valid {
        return Err(ApiError::unauthorized("Invalid admin credentials"));
    }

    let token = issue_token(Claims::new(admin.id, admin.role))?;

    Ok(Json(json!({ "access_token": token })))
}

/// POST /admin/logout - Acknowledge logout
///
/// Tokens are not revoked server-side; clients discard them and the
/// token lapses at expiry.
pub async fn logout() -> impl IntoResponse {
    Json(json!({ "message": "Admin logged out successfully" }))
}
