//! Shared application state.

use std::sync::Arc;

use crate::embedder::Embedder;
use crate::store::{CredentialStore, DocumentStore, EmbeddingStore};

/// Injected dependencies for every handler, created once at startup.
/// Handlers depend on the traits only; backends are wired in `main`
/// (Postgres/pgvector) or in tests (in-memory).
#[derive(Clone)]
pub struct AppState {
    pub credentials: Arc<dyn CredentialStore>,
    pub documents: Arc<dyn DocumentStore>,
    pub embeddings: Arc<dyn EmbeddingStore>,
    pub embedder: Arc<dyn Embedder>,
}

impl AppState {
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        documents: Arc<dyn DocumentStore>,
        embeddings: Arc<dyn EmbeddingStore>,
        embedder: Arc<dyn Embedder>,
    ) -> Self {
        Self {
            credentials,
            documents,
            embeddings,
            embedder,
        }
    }

    /// Fully in-memory state for local development and tests.
    pub fn in_memory(embedder: Arc<dyn Embedder>) -> Self {
        use crate::store::memory::{
            InMemoryCredentialStore, InMemoryDocumentStore, InMemoryEmbeddingStore,
        };

        Self {
            credentials: Arc::new(InMemoryCredentialStore::new()),
            documents: Arc::new(InMemoryDocumentStore::new()),
            embeddings: Arc::new(InMemoryEmbeddingStore::new()),
            embedder,
        }
    }
}
