use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;
use crate::store::DocumentUpdate;

/// PUT /admin/document/:document_id - Merge provided fields into a record
pub async fn update(
    State(state): State<AppState>,
    Path(document_id): Path<String>,
    Json(changes): Json<DocumentUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    let document_id = parse_document_id(&document_id)?;

    state.documents.update_document(document_id, changes).await?;

    Ok(Json(json!({ "message": "Document updated successfully" })))
}

pub(super) fn parse_document_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::bad_request("invalid document id"))
}
