use std::sync::Arc;

use edudocs_api::config;
use edudocs_api::embedder;
use edudocs_api::handlers;
use edudocs_api::state::AppState;
use edudocs_api::store::postgres::{self, PostgresCredentialStore, PostgresDocumentStore};
use edudocs_api::store::vector::PgVectorEmbeddingStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET_KEY, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "edudocs_api=info,tower_http=info".into()),
        )
        .init();

    let config = config::config();
    tracing::info!("starting edudocs-api in {:?} mode", config.environment);

    let embedder = embedder::from_config(&config.embedding)
        .map_err(|e| anyhow::anyhow!("failed to build embedder: {}", e))?;

    let state = match &config.storage.database_url {
        Some(database_url) => {
            let pool = postgres::connect(database_url, config.storage.max_connections)
                .await
                .map_err(|e| anyhow::anyhow!("failed to connect to database: {}", e))?;
            postgres::ensure_schema(&pool)
                .await
                .map_err(|e| anyhow::anyhow!("failed to prepare schema: {}", e))?;
            let embeddings = PgVectorEmbeddingStore::new(pool.clone(), config.embedding.dimension)
                .await
                .map_err(|e| anyhow::anyhow!("failed to prepare vector store: {}", e))?;

            AppState::new(
                Arc::new(PostgresCredentialStore::new(pool.clone())),
                Arc::new(PostgresDocumentStore::new(pool)),
                Arc::new(embeddings),
                embedder,
            )
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory stores");
            AppState::in_memory(embedder)
        }
    };

    let app = handlers::app(state);

    // Allow tests or deployments to override port via env
    let port = std::env::var("EDUDOCS_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(6000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("edudocs-api listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
