use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;

use crate::error::ApiError;
use crate::state::AppState;

use super::update::parse_document_id;

/// DELETE /admin/document/:document_id - Remove a record and its vectors
///
/// The metadata row, its board index rows and every embedding chunk for
/// the document are removed together.
pub async fn delete(
    State(state): State<AppState>,
    Path(document_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let document_id = parse_document_id(&document_id)?;

    state.documents.delete_document(document_id).await?;
    state.embeddings.delete_document(document_id).await?;

    tracing::info!(%document_id, "document deleted");

    Ok(Json(json!({ "message": "Document deleted successfully" })))
}
