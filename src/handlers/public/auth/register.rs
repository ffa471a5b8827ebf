use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;

use crate::error::ApiError;
use crate::state::AppState;
use crate::store::NewAdmin;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /admin/register - Create a new admin account
///
/// Fails with 409 when the email or username is already registered.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let username = required_field(payload.username, "username")?;
    let email = required_field(payload.email, "email")?;
    let password = required_field(payload.password, "password")?;

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| {
            tracing::error!("failed to hash password: {}", e);
            ApiError::internal_server_error("Failed to register admin")
        })?
        .to_string();

    let admin = state
        .credentials
        .create_admin(NewAdmin {
            username,
            email,
            password_hash,
        })
        .await?;

    tracing::info!(admin_id = %admin.id, "admin registered");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Admin registered successfully" })),
    ))
}

fn required_field(value: Option<String>, name: &str) -> Result<String, ApiError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ApiError::bad_request(format!("Missing field: {}", name))),
    }
}
