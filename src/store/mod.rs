//! Storage ports for the admin surface.
//!
//! Handlers never touch a database directly: they go through these traits,
//! injected once at startup via [`crate::state::AppState`]. Backends live in
//! [`postgres`], [`vector`] and [`memory`].

pub mod memory;
pub mod models;
pub mod postgres;
pub mod vector;

use async_trait::async_trait;
use uuid::Uuid;

pub use models::{
    Admin, AdminUpdate, Board, BoardFilter, BoardIndexEntry, DocumentFilter, DocumentRecord,
    DocumentUpdate, EmbeddedChunk, NewAdmin,
};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Already exists: {0}")]
    Duplicate(String),
    #[error("Connection error: {0}")]
    Connection(String),
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Admin credential records.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Insert a new admin. Fails with `Duplicate` when the email or
    /// username is already registered.
    async fn create_admin(&self, admin: NewAdmin) -> StoreResult<Admin>;

    async fn admin_by_email(&self, email: &str) -> StoreResult<Option<Admin>>;

    async fn admin_by_id(&self, id: Uuid) -> StoreResult<Option<Admin>>;

    /// Apply the provided fields to an existing admin. Fails with
    /// `NotFound` for an unknown id.
    async fn update_admin(&self, id: Uuid, changes: AdminUpdate) -> StoreResult<()>;

    /// Backend liveness probe for the health endpoint.
    async fn ping(&self) -> StoreResult<()>;
}

/// Document metadata records plus the per-board index.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert the metadata row and its board index row.
    async fn insert_document(&self, doc: DocumentRecord) -> StoreResult<()>;

    /// Records matching all provided filters, capped at the filter limit.
    async fn list_documents(&self, filter: DocumentFilter) -> StoreResult<Vec<DocumentRecord>>;

    /// Full document records for board index rows matching the filter.
    async fn list_board_documents(
        &self,
        board: Board,
        filter: BoardFilter,
    ) -> StoreResult<Vec<DocumentRecord>>;

    /// Merge the provided fields into an existing record. Fails with
    /// `NotFound` for an unknown id.
    async fn update_document(&self, document_id: Uuid, changes: DocumentUpdate) -> StoreResult<()>;

    /// Remove the metadata row and its board index rows. Fails with
    /// `NotFound` for an unknown id.
    async fn delete_document(&self, document_id: Uuid) -> StoreResult<()>;
}

/// Embedding vectors, keyed `"{document_id}-{chunk_index}"`.
#[async_trait]
pub trait EmbeddingStore: Send + Sync {
    async fn upsert_chunks(&self, chunks: Vec<EmbeddedChunk>) -> StoreResult<()>;

    /// Drop every vector belonging to a document. Deleting an unknown
    /// document is not an error.
    async fn delete_document(&self, document_id: Uuid) -> StoreResult<()>;

    async fn chunk_count(&self, document_id: Uuid) -> StoreResult<i64>;
}
