//! Postgres-backed credential and document stores.

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::models::{
    Admin, AdminUpdate, Board, BoardFilter, BoardIndexEntry, DocumentFilter, DocumentRecord,
    DocumentUpdate, NewAdmin,
};
use super::{CredentialStore, DocumentStore, StoreError, StoreResult};

/// Open a shared pool for the metadata stores.
pub async fn connect(database_url: &str, max_connections: u32) -> StoreResult<PgPool> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .map_err(|e| StoreError::Connection(e.to_string()))
}

/// Create the metadata tables if they do not exist yet.
pub async fn ensure_schema(pool: &PgPool) -> StoreResult<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS admins (
            id UUID PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            role TEXT NOT NULL DEFAULT 'admin',
            status TEXT NOT NULL DEFAULT 'active',
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS documents (
            document_id UUID PRIMARY KEY,
            filename TEXT NOT NULL,
            class TEXT NOT NULL,
            board TEXT NOT NULL,
            subject TEXT NOT NULL,
            "group" TEXT,
            uploaded_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS board_index (
            board TEXT NOT NULL,
            class TEXT NOT NULL,
            subject TEXT NOT NULL,
            "group" TEXT,
            document_id UUID NOT NULL REFERENCES documents (document_id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub struct PostgresCredentialStore {
    pool: PgPool,
}

impl PostgresCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    async fn create_admin(&self, admin: NewAdmin) -> StoreResult<Admin> {
        let taken: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM admins WHERE email = $1 OR username = $2",
        )
        .bind(&admin.email)
        .bind(&admin.username)
        .fetch_one(&self.pool)
        .await?;

        if taken.0 > 0 {
            return Err(StoreError::Duplicate(format!(
                "admin already registered: {}",
                admin.email
            )));
        }

        let created: Admin = sqlx::query_as(
            r#"
            INSERT INTO admins (id, username, email, password_hash, role, status)
            VALUES ($1, $2, $3, $4, 'admin', 'active')
            RETURNING id, username, email, password_hash, role, status, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&admin.username)
        .bind(&admin.email)
        .bind(&admin.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(created)
    }

    async fn admin_by_email(&self, email: &str) -> StoreResult<Option<Admin>> {
        let admin = sqlx::query_as::<_, Admin>(
            "SELECT id, username, email, password_hash, role, status, created_at FROM admins WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(admin)
    }

    async fn admin_by_id(&self, id: Uuid) -> StoreResult<Option<Admin>> {
        let admin = sqlx::query_as::<_, Admin>(
            "SELECT id, username, email, password_hash, role, status, created_at FROM admins WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(admin)
    }

    async fn update_admin(&self, id: Uuid, changes: AdminUpdate) -> StoreResult<()> {
        if changes.is_empty() {
            // Nothing to apply; still report unknown ids
            return match self.admin_by_id(id).await? {
                Some(_) => Ok(()),
                None => Err(StoreError::NotFound(format!("admin not found: {}", id))),
            };
        }

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE admins SET ");
        let mut fields = builder.separated(", ");
        if let Some(username) = &changes.username {
            fields.push("username = ").push_bind_unseparated(username);
        }
        if let Some(email) = &changes.email {
            fields.push("email = ").push_bind_unseparated(email);
        }
        if let Some(status) = &changes.status {
            fields.push("status = ").push_bind_unseparated(status);
        }
        builder.push(" WHERE id = ").push_bind(id);

        let result = builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(map_unique_violation)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("admin not found: {}", id)));
        }
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

pub struct PostgresDocumentStore {
    pool: PgPool,
}

impl PostgresDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    async fn insert_document(&self, doc: DocumentRecord) -> StoreResult<()> {
        let entry = BoardIndexEntry::for_document(&doc);
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO documents (document_id, filename, class, board, subject, "group", uploaded_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(doc.document_id)
        .bind(&doc.filename)
        .bind(&doc.class)
        .bind(&doc.board)
        .bind(&doc.subject)
        .bind(&doc.group)
        .bind(doc.uploaded_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO board_index (board, class, subject, "group", document_id)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&entry.board)
        .bind(&entry.class)
        .bind(&entry.subject)
        .bind(&entry.group)
        .bind(entry.document_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn list_documents(&self, filter: DocumentFilter) -> StoreResult<Vec<DocumentRecord>> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            r#"SELECT document_id, filename, class, board, subject, "group", uploaded_at FROM documents WHERE TRUE"#,
        );
        if let Some(board) = &filter.board {
            builder.push(" AND board = ").push_bind(board);
        }
        if let Some(class) = &filter.class {
            builder.push(" AND class = ").push_bind(class);
        }
        if let Some(subject) = &filter.subject {
            builder.push(" AND subject = ").push_bind(subject);
        }
        builder.push(" LIMIT ").push_bind(filter.limit);

        let docs = builder
            .build_query_as::<DocumentRecord>()
            .fetch_all(&self.pool)
            .await?;

        Ok(docs)
    }

    async fn list_board_documents(
        &self,
        board: Board,
        filter: BoardFilter,
    ) -> StoreResult<Vec<DocumentRecord>> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            r#"
            SELECT d.document_id, d.filename, d.class, d.board, d.subject, d."group", d.uploaded_at
            FROM documents d
            JOIN board_index b ON b.document_id = d.document_id
            WHERE b.board =
            "#,
        );
        builder.push_bind(board.as_str());
        if let Some(class) = &filter.class {
            builder.push(" AND b.class = ").push_bind(class);
        }
        if let Some(subject) = &filter.subject {
            builder.push(" AND b.subject = ").push_bind(subject);
        }
        if let Some(group) = &filter.group {
            builder.push(r#" AND b."group" = "#).push_bind(group);
        }
        builder.push(" LIMIT ").push_bind(filter.limit);

        let docs = builder
            .build_query_as::<DocumentRecord>()
            .fetch_all(&self.pool)
            .await?;

        Ok(docs)
    }

    async fn update_document(&self, document_id: Uuid, changes: DocumentUpdate) -> StoreResult<()> {
        if changes.is_empty() {
            let exists: (i64,) =
                sqlx::query_as("SELECT COUNT(*) FROM documents WHERE document_id = $1")
                    .bind(document_id)
                    .fetch_one(&self.pool)
                    .await?;
            return if exists.0 > 0 {
                Ok(())
            } else {
                Err(StoreError::NotFound(format!(
                    "document not found: {}",
                    document_id
                )))
            };
        }

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE documents SET ");
        let mut fields = builder.separated(", ");
        if let Some(filename) = &changes.filename {
            fields.push("filename = ").push_bind_unseparated(filename);
        }
        if let Some(class) = &changes.class {
            fields.push("class = ").push_bind_unseparated(class);
        }
        if let Some(board) = &changes.board {
            fields.push("board = ").push_bind_unseparated(board);
        }
        if let Some(subject) = &changes.subject {
            fields.push("subject = ").push_bind_unseparated(subject);
        }
        if let Some(group) = &changes.group {
            fields.push(r#""group" = "#).push_bind_unseparated(group);
        }
        builder.push(" WHERE document_id = ").push_bind(document_id);

        let result = builder.build().execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!(
                "document not found: {}",
                document_id
            )));
        }
        Ok(())
    }

    async fn delete_document(&self, document_id: Uuid) -> StoreResult<()> {
        // board_index rows go with it via ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM documents WHERE document_id = $1")
            .bind(document_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!(
                "document not found: {}",
                document_id
            )));
        }
        Ok(())
    }
}

/// Map a unique-constraint violation to `Duplicate`; races past the
/// pre-insert existence check land here.
fn map_unique_violation(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23505") {
            return StoreError::Duplicate("admin already registered".to_string());
        }
    }
    StoreError::Sqlx(err)
}
