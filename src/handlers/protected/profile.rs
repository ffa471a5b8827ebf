use axum::{extract::State, response::IntoResponse, Extension, Json};
use serde_json::json;

use crate::auth::AdminIdentity;
use crate::error::ApiError;
use crate::state::AppState;
use crate::store::AdminUpdate;

/// GET /admin/profile - The authenticated admin's own record
pub async fn profile_get(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
) -> Result<impl IntoResponse, ApiError> {
    let admin = state
        .credentials
        .admin_by_id(identity.admin_id)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Unknown admin"))?;

    Ok(Json(json!({
        "username": admin.username,
        "email": admin.email,
        "role": admin.role,
        "status": admin.status,
    })))
}

/// PUT /admin/update-profile - Apply provided fields to the admin's record
pub async fn profile_update(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Json(changes): Json<AdminUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(status) = &changes.status {
        if status != "active" && status != "inactive" {
            return Err(ApiError::bad_request(
                "status must be 'active' or 'inactive'",
            ));
        }
    }

    match state
        .credentials
        .update_admin(identity.admin_id, changes)
        .await
    {
        Ok(()) => {}
        // A valid token for a since-removed admin reads as unauthenticated
        Err(crate::store::StoreError::NotFound(_)) => {
            return Err(ApiError::unauthorized("Unknown admin"));
        }
        Err(e) => return Err(e.into()),
    }

    Ok(Json(json!({ "message": "Admin profile updated" })))
}
