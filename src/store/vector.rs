//! pgvector-backed embedding store.

use async_trait::async_trait;
use pgvector::Vector;
use sqlx::PgPool;
use uuid::Uuid;

use super::models::EmbeddedChunk;
use super::{EmbeddingStore, StoreResult};

pub struct PgVectorEmbeddingStore {
    pool: PgPool,
    dimension: usize,
}

impl PgVectorEmbeddingStore {
    /// Wrap an existing pool, creating the extension and chunk table on
    /// first use.
    pub async fn new(pool: PgPool, dimension: usize) -> StoreResult<Self> {
        sqlx::query("CREATE EXTENSION IF NOT EXISTS vector")
            .execute(&pool)
            .await?;

        let ddl = format!(
            r#"
            CREATE TABLE IF NOT EXISTS document_chunks (
                id TEXT PRIMARY KEY,
                document_id UUID NOT NULL,
                content TEXT NOT NULL,
                embedding vector({dimension}),
                created_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#
        );
        sqlx::query(&ddl).execute(&pool).await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS document_chunks_document_id_idx ON document_chunks (document_id)",
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool, dimension })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }
}

#[async_trait]
impl EmbeddingStore for PgVectorEmbeddingStore {
    async fn upsert_chunks(&self, chunks: Vec<EmbeddedChunk>) -> StoreResult<()> {
        if chunks.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;
        for chunk in chunks {
            let embedding = Vector::from(chunk.values);
            sqlx::query(
                r#"
                INSERT INTO document_chunks (id, document_id, content, embedding)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (id) DO UPDATE
                SET content = EXCLUDED.content, embedding = EXCLUDED.embedding
                "#,
            )
            .bind(&chunk.id)
            .bind(chunk.document_id)
            .bind(&chunk.text)
            .bind(embedding)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        Ok(())
    }

    async fn delete_document(&self, document_id: Uuid) -> StoreResult<()> {
        sqlx::query("DELETE FROM document_chunks WHERE document_id = $1")
            .bind(document_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn chunk_count(&self, document_id: Uuid) -> StoreResult<i64> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM document_chunks WHERE document_id = $1")
                .bind(document_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count.0)
    }
}
