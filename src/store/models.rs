use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An authenticated operator of the platform.
///
/// The password hash never leaves the process: profile responses are built
/// from the individual fields, and `password_hash` is skipped if a record
/// is ever serialized wholesale.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Admin {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Partial admin update; only provided fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub status: Option<String>,
}

impl AdminUpdate {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none() && self.status.is_none()
    }
}

/// A document uploaded with its syllabus taxonomy tags.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DocumentRecord {
    pub document_id: Uuid,
    pub filename: String,
    pub class: String,
    pub board: String,
    pub subject: String,
    pub group: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}

/// Partial document update; only provided fields are merged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentUpdate {
    pub filename: Option<String>,
    pub class: Option<String>,
    pub board: Option<String>,
    pub subject: Option<String>,
    pub group: Option<String>,
}

impl DocumentUpdate {
    pub fn is_empty(&self) -> bool {
        self.filename.is_none()
            && self.class.is_none()
            && self.board.is_none()
            && self.subject.is_none()
            && self.group.is_none()
    }
}

/// Filters for the flat document listing. All provided filters AND together.
#[derive(Debug, Clone, Default)]
pub struct DocumentFilter {
    pub board: Option<String>,
    pub class: Option<String>,
    pub subject: Option<String>,
    pub limit: i64,
}

/// Filters for the board-scoped listings.
#[derive(Debug, Clone, Default)]
pub struct BoardFilter {
    pub class: Option<String>,
    pub subject: Option<String>,
    pub group: Option<String>,
    pub limit: i64,
}

/// The two syllabus boards with dedicated indexes. Every upload lands in
/// exactly one: `stateboard` by name, everything else under `cbse`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Board {
    Stateboard,
    Cbse,
}

impl Board {
    pub fn from_tag(tag: &str) -> Self {
        if tag == "stateboard" {
            Board::Stateboard
        } else {
            Board::Cbse
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Board::Stateboard => "stateboard",
            Board::Cbse => "cbse",
        }
    }
}

/// One row of a per-board index, written at upload and removed at delete.
#[derive(Debug, Clone, FromRow)]
pub struct BoardIndexEntry {
    pub board: String,
    pub class: String,
    pub subject: String,
    pub group: Option<String>,
    pub document_id: Uuid,
}

impl BoardIndexEntry {
    pub fn for_document(doc: &DocumentRecord) -> Self {
        Self {
            board: Board::from_tag(&doc.board).as_str().to_string(),
            class: doc.class.clone(),
            subject: doc.subject.clone(),
            group: doc.group.clone(),
            document_id: doc.document_id,
        }
    }
}

/// One embedded chunk ready for the vector store.
#[derive(Debug, Clone)]
pub struct EmbeddedChunk {
    /// Vector id, `"{document_id}-{chunk_index}"`.
    pub id: String,
    pub values: Vec<f32>,
    pub text: String,
    pub document_id: Uuid,
}

impl EmbeddedChunk {
    pub fn new(document_id: Uuid, index: usize, text: String, values: Vec<f32>) -> Self {
        Self {
            id: format!("{}-{}", document_id, index),
            values,
            text,
            document_id,
        }
    }
}
