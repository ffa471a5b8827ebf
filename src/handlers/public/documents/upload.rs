use axum::{
    extract::{Multipart, State},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::config;
use crate::error::ApiError;
use crate::ingest::{self, ChunkConfig};
use crate::state::AppState;
use crate::store::{DocumentRecord, EmbeddedChunk};

struct UploadForm {
    filename: Option<String>,
    bytes: Option<Vec<u8>>,
    class: Option<String>,
    board: Option<String>,
    subject: Option<String>,
    group: Option<String>,
}

/// POST /admin/upload - Ingest a document with its syllabus tags
///
/// Persists the raw file, extracts and chunks its text, embeds every
/// chunk and stores the vectors, then records the metadata row and the
/// board index row. This surface takes no bearer token; uploads are
/// driven by trusted tooling in front of this service.
pub async fn upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let form = read_form(multipart).await?;

    let bytes = form
        .bytes
        .ok_or_else(|| ApiError::bad_request("No file uploaded"))?;
    let filename = form.filename.unwrap_or_else(|| "upload.bin".to_string());
    let class = required_tag(form.class, "class")?;
    let board = required_tag(form.board, "board")?;
    let subject = required_tag(form.subject, "subject")?;

    let config = config::config();
    let document_id = Uuid::new_v4();

    let saved_path = ingest::save_upload(&config.storage.upload_dir, &filename, &bytes)
        .await
        .map_err(|e| {
            tracing::error!("failed to persist upload: {}", e);
            ApiError::internal_server_error("Failed to store uploaded file")
        })?;
    tracing::debug!(path = %saved_path.display(), "upload persisted");

    let text = ingest::extract_text(&filename, &bytes);
    let chunk_config = ChunkConfig {
        chunk_size: config.embedding.chunk_size,
        overlap: config.embedding.chunk_overlap,
    };
    let chunks = ingest::chunk_text(&text, &chunk_config);

    if !chunks.is_empty() {
        let embeddings = state.embedder.embed(chunks.clone()).await?;
        let embedded = chunks
            .into_iter()
            .zip(embeddings)
            .enumerate()
            .map(|(i, (text, values))| EmbeddedChunk::new(document_id, i, text, values))
            .collect();
        state.embeddings.upsert_chunks(embedded).await?;
    }

    let record = DocumentRecord {
        document_id,
        filename: ingest::sanitize_filename(&filename),
        class,
        board,
        subject,
        group: form.group,
        uploaded_at: Utc::now(),
    };
    state.documents.insert_document(record).await?;

    tracing::info!(%document_id, "document uploaded");

    Ok(Json(json!({
        "message": "Document uploaded successfully",
        "document_id": document_id,
    })))
}

async fn read_form(mut multipart: Multipart) -> Result<UploadForm, ApiError> {
    let mut form = UploadForm {
        filename: None,
        bytes: None,
        class: None,
        board: None,
        subject: None,
        group: None,
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart payload: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                form.filename = field.file_name().map(|f| f.to_string());
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Failed to read file: {}", e)))?;
                form.bytes = Some(data.to_vec());
            }
            "class" => form.class = Some(read_text(field).await?),
            "board" => form.board = Some(read_text(field).await?),
            "subject" => form.subject = Some(read_text(field).await?),
            "group" => form.group = Some(read_text(field).await?),
            _ => {}
        }
    }

    Ok(form)
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart field: {}", e)))
}

fn required_tag(value: Option<String>, name: &str) -> Result<String, ApiError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ApiError::bad_request(format!("Missing field: {}", name))),
    }
}
