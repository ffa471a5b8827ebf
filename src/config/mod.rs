use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub storage: StorageConfig,
    pub embedding: EmbeddingConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub upload_dir: String,
    pub max_upload_bytes: usize,
    pub default_list_limit: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub dimension: usize,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Storage overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.storage.database_url = Some(v);
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.storage.max_connections = v.parse().unwrap_or(self.storage.max_connections);
        }
        if let Ok(v) = env::var("UPLOAD_DIR") {
            self.storage.upload_dir = v;
        }
        if let Ok(v) = env::var("MAX_UPLOAD_BYTES") {
            self.storage.max_upload_bytes = v.parse().unwrap_or(self.storage.max_upload_bytes);
        }

        // Embedding overrides
        if let Ok(v) = env::var("EMBEDDING_ENDPOINT") {
            self.embedding.endpoint = Some(v);
        }
        if let Ok(v) = env::var("EMBEDDING_API_KEY") {
            self.embedding.api_key = Some(v);
        }
        if let Ok(v) = env::var("EMBEDDING_DIMENSION") {
            self.embedding.dimension = v.parse().unwrap_or(self.embedding.dimension);
        }
        if let Ok(v) = env::var("EMBEDDING_TIMEOUT_SECS") {
            self.embedding.timeout_secs = v.parse().unwrap_or(self.embedding.timeout_secs);
        }

        // Security overrides
        if let Ok(v) = env::var("JWT_SECRET_KEY") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            storage: StorageConfig {
                database_url: None,
                max_connections: 10,
                upload_dir: "uploads".to_string(),
                max_upload_bytes: 200 * 1024 * 1024, // 200MB
                default_list_limit: 20,
            },
            embedding: EmbeddingConfig {
                endpoint: None,
                api_key: None,
                dimension: 384,
                timeout_secs: 30,
                max_retries: 3,
                chunk_size: 500,
                chunk_overlap: 100,
            },
            security: SecurityConfig {
                // Overridden by JWT_SECRET_KEY outside local development
                jwt_secret: "edudocs-dev-secret".to_string(),
                jwt_expiry_hours: 24,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            storage: StorageConfig {
                max_connections: 20,
                ..Self::development().storage
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 24,
            },
            ..Self::development()
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            storage: StorageConfig {
                max_connections: 50,
                ..Self::development().storage
            },
            security: SecurityConfig {
                // Must come from JWT_SECRET_KEY; token issuing fails on an empty secret
                jwt_secret: String::new(),
                jwt_expiry_hours: 24,
            },
            ..Self::development()
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
