//! In-memory store backends.
//!
//! Used by the test suite and for local development without Postgres.
//! Concurrency control is a plain `RwLock` per table; no guard is held
//! across an await point.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use super::models::{
    Admin, AdminUpdate, Board, BoardFilter, BoardIndexEntry, DocumentFilter, DocumentRecord,
    DocumentUpdate, EmbeddedChunk, NewAdmin,
};
use super::{CredentialStore, DocumentStore, EmbeddingStore, StoreError, StoreResult};

#[derive(Default)]
pub struct InMemoryCredentialStore {
    admins: RwLock<HashMap<Uuid, Admin>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn create_admin(&self, admin: NewAdmin) -> StoreResult<Admin> {
        let mut admins = self.admins.write().unwrap();

        let taken = admins
            .values()
            .any(|a| a.email == admin.email || a.username == admin.username);
        if taken {
            return Err(StoreError::Duplicate(format!(
                "admin already registered: {}",
                admin.email
            )));
        }

        let created = Admin {
            id: Uuid::new_v4(),
            username: admin.username,
            email: admin.email,
            password_hash: admin.password_hash,
            role: "admin".to_string(),
            status: "active".to_string(),
            created_at: chrono::Utc::now(),
        };
        admins.insert(created.id, created.clone());
        Ok(created)
    }

    async fn admin_by_email(&self, email: &str) -> StoreResult<Option<Admin>> {
        let admins = self.admins.read().unwrap();
        Ok(admins.values().find(|a| a.email == email).cloned())
    }

    async fn admin_by_id(&self, id: Uuid) -> StoreResult<Option<Admin>> {
        let admins = self.admins.read().unwrap();
        Ok(admins.get(&id).cloned())
    }

    async fn update_admin(&self, id: Uuid, changes: AdminUpdate) -> StoreResult<()> {
        let mut admins = self.admins.write().unwrap();
        let admin = admins
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("admin not found: {}", id)))?;

        if let Some(username) = changes.username {
            admin.username = username;
        }
        if let Some(email) = changes.email {
            admin.email = email;
        }
        if let Some(status) = changes.status {
            admin.status = status;
        }
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryDocumentStore {
    documents: RwLock<HashMap<Uuid, DocumentRecord>>,
    board_index: RwLock<Vec<BoardIndexEntry>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn insert_document(&self, doc: DocumentRecord) -> StoreResult<()> {
        let entry = BoardIndexEntry::for_document(&doc);
        self.documents
            .write()
            .unwrap()
            .insert(doc.document_id, doc);
        self.board_index.write().unwrap().push(entry);
        Ok(())
    }

    async fn list_documents(&self, filter: DocumentFilter) -> StoreResult<Vec<DocumentRecord>> {
        let documents = self.documents.read().unwrap();
        let matches = documents
            .values()
            .filter(|d| filter.board.as_ref().map_or(true, |b| &d.board == b))
            .filter(|d| filter.class.as_ref().map_or(true, |c| &d.class == c))
            .filter(|d| filter.subject.as_ref().map_or(true, |s| &d.subject == s))
            .take(filter.limit.max(0) as usize)
            .cloned()
            .collect();
        Ok(matches)
    }

    async fn list_board_documents(
        &self,
        board: Board,
        filter: BoardFilter,
    ) -> StoreResult<Vec<DocumentRecord>> {
        let index = self.board_index.read().unwrap();
        let documents = self.documents.read().unwrap();

        let matches = index
            .iter()
            .filter(|e| e.board == board.as_str())
            .filter(|e| filter.class.as_ref().map_or(true, |c| &e.class == c))
            .filter(|e| filter.subject.as_ref().map_or(true, |s| &e.subject == s))
            .filter(|e| filter.group.as_ref().map_or(true, |g| e.group.as_ref() == Some(g)))
            .take(filter.limit.max(0) as usize)
            .filter_map(|e| documents.get(&e.document_id).cloned())
            .collect();
        Ok(matches)
    }

    async fn update_document(&self, document_id: Uuid, changes: DocumentUpdate) -> StoreResult<()> {
        let mut documents = self.documents.write().unwrap();
        let doc = documents
            .get_mut(&document_id)
            .ok_or_else(|| StoreError::NotFound(format!("document not found: {}", document_id)))?;

        if let Some(filename) = changes.filename {
            doc.filename = filename;
        }
        if let Some(class) = changes.class {
            doc.class = class;
        }
        if let Some(board) = changes.board {
            doc.board = board;
        }
        if let Some(subject) = changes.subject {
            doc.subject = subject;
        }
        if let Some(group) = changes.group {
            doc.group = Some(group);
        }
        Ok(())
    }

    async fn delete_document(&self, document_id: Uuid) -> StoreResult<()> {
        let removed = self.documents.write().unwrap().remove(&document_id);
        if removed.is_none() {
            return Err(StoreError::NotFound(format!(
                "document not found: {}",
                document_id
            )));
        }
        self.board_index
            .write()
            .unwrap()
            .retain(|e| e.document_id != document_id);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryEmbeddingStore {
    chunks: RwLock<HashMap<String, EmbeddedChunk>>,
}

impl InMemoryEmbeddingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EmbeddingStore for InMemoryEmbeddingStore {
    async fn upsert_chunks(&self, chunks: Vec<EmbeddedChunk>) -> StoreResult<()> {
        let mut stored = self.chunks.write().unwrap();
        for chunk in chunks {
            stored.insert(chunk.id.clone(), chunk);
        }
        Ok(())
    }

    async fn delete_document(&self, document_id: Uuid) -> StoreResult<()> {
        self.chunks
            .write()
            .unwrap()
            .retain(|_, c| c.document_id != document_id);
        Ok(())
    }

    async fn chunk_count(&self, document_id: Uuid) -> StoreResult<i64> {
        let chunks = self.chunks.read().unwrap();
        Ok(chunks.values().filter(|c| c.document_id == document_id).count() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn doc(board: &str, class: &str, subject: &str) -> DocumentRecord {
        DocumentRecord {
            document_id: Uuid::new_v4(),
            filename: "notes.txt".to_string(),
            class: class.to_string(),
            board: board.to_string(),
            subject: subject.to_string(),
            group: None,
            uploaded_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn filters_and_together() {
        let store = InMemoryDocumentStore::new();
        store.insert_document(doc("stateboard", "10", "Science")).await.unwrap();
        store.insert_document(doc("stateboard", "12", "Science")).await.unwrap();
        store.insert_document(doc("cbse", "10", "Science")).await.unwrap();

        let filter = DocumentFilter {
            board: Some("stateboard".to_string()),
            class: Some("10".to_string()),
            subject: None,
            limit: 20,
        };
        let results = store.list_documents(filter).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].class, "10");
        assert_eq!(results[0].board, "stateboard");
    }

    #[tokio::test]
    async fn list_respects_limit() {
        let store = InMemoryDocumentStore::new();
        for _ in 0..5 {
            store.insert_document(doc("cbse", "9", "Maths")).await.unwrap();
        }

        let filter = DocumentFilter {
            limit: 3,
            ..Default::default()
        };
        let results = store.list_documents(filter).await.unwrap();
        assert_eq!(results.len(), 3);
    }

    #[tokio::test]
    async fn unknown_board_indexes_under_cbse() {
        let store = InMemoryDocumentStore::new();
        store.insert_document(doc("icse", "10", "Science")).await.unwrap();

        let results = store
            .list_board_documents(Board::Cbse, BoardFilter { limit: 20, ..Default::default() })
            .await
            .unwrap();
        assert_eq!(results.len(), 1);

        let results = store
            .list_board_documents(Board::Stateboard, BoardFilter { limit: 20, ..Default::default() })
            .await
            .unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn delete_removes_index_rows() {
        let store = InMemoryDocumentStore::new();
        let record = doc("stateboard", "10", "Science");
        let id = record.document_id;
        store.insert_document(record).await.unwrap();

        store.delete_document(id).await.unwrap();
        assert!(matches!(
            store.delete_document(id).await,
            Err(StoreError::NotFound(_))
        ));

        let results = store
            .list_board_documents(Board::Stateboard, BoardFilter { limit: 20, ..Default::default() })
            .await
            .unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = InMemoryCredentialStore::new();
        let admin = NewAdmin {
            username: "ops".to_string(),
            email: "ops@example.com".to_string(),
            password_hash: "hash".to_string(),
        };
        store.create_admin(admin.clone()).await.unwrap();

        let again = NewAdmin {
            username: "ops2".to_string(),
            ..admin
        };
        assert!(matches!(
            store.create_admin(again).await,
            Err(StoreError::Duplicate(_))
        ));
    }

    #[tokio::test]
    async fn embedding_delete_is_scoped_to_document() {
        let store = InMemoryEmbeddingStore::new();
        let keep = Uuid::new_v4();
        let gone = Uuid::new_v4();
        store
            .upsert_chunks(vec![
                EmbeddedChunk::new(keep, 0, "a".to_string(), vec![0.1]),
                EmbeddedChunk::new(gone, 0, "b".to_string(), vec![0.2]),
                EmbeddedChunk::new(gone, 1, "c".to_string(), vec![0.3]),
            ])
            .await
            .unwrap();

        store.delete_document(gone).await.unwrap();
        assert_eq!(store.chunk_count(gone).await.unwrap(), 0);
        assert_eq!(store.chunk_count(keep).await.unwrap(), 1);
    }
}
