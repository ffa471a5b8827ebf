//! Upload ingestion: file persistence and text extraction.

pub mod chunker;

use std::path::{Path, PathBuf};

pub use chunker::{chunk_text, ChunkConfig};

/// Decode uploaded bytes into text for embedding.
///
/// Plain-text formats are decoded as UTF-8; anything else falls back to a
/// lossy decode. Binary formats (PDF, DOCX) are converted upstream of this
/// service, so this is the single seam where a parser would slot in.
pub fn extract_text(filename: &str, bytes: &[u8]) -> String {
    let extension = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("txt") | Some("md") | Some("csv") => match std::str::from_utf8(bytes) {
            Ok(text) => text.to_string(),
            Err(_) => String::from_utf8_lossy(bytes).into_owned(),
        },
        _ => String::from_utf8_lossy(bytes).into_owned(),
    }
}

/// Keep only the final path component of a client-supplied filename.
pub fn sanitize_filename(filename: &str) -> String {
    let name = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename)
        .trim();
    if name.is_empty() {
        "upload.bin".to_string()
    } else {
        name.to_string()
    }
}

/// Persist the raw upload under `dir`, creating the directory on demand.
pub async fn save_upload(dir: &str, filename: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = Path::new(dir).join(sanitize_filename(filename));
    tokio::fs::write(&path, bytes).await?;
    Ok(path)
}
