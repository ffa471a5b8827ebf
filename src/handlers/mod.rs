pub mod protected;
pub mod public;

use axum::extract::{DefaultBodyLimit, State};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config;
use crate::state::AppState;

/// Build the full application router over the injected stores.
pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Admin auth (public - token acquisition)
        .merge(admin_auth_routes())
        // Profile (bearer token required)
        .merge(profile_routes())
        // Document registry (public, as documented)
        .merge(document_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn admin_auth_routes() -> Router<AppState> {
    use axum::routing::post;
    use public::auth;

    Router::new()
        .route("/admin/register", post(auth::register))
        .route("/admin/login", post(auth::login))
        .route("/admin/logout", post(auth::logout))
}

fn profile_routes() -> Router<AppState> {
    use axum::routing::put;
    use protected::profile;

    Router::new()
        .route("/admin/profile", get(profile::profile_get))
        .route("/admin/update-profile", put(profile::profile_update))
        .route_layer(axum::middleware::from_fn(
            crate::middleware::jwt_auth_middleware,
        ))
}

fn document_routes() -> Router<AppState> {
    use axum::routing::{post, put};
    use public::documents;

    Router::new()
        .route(
            "/admin/upload",
            post(documents::upload)
                .layer(DefaultBodyLimit::max(config::config().storage.max_upload_bytes)),
        )
        .route("/admin/documents", get(documents::list))
        .route("/admin/stateboard/documents", get(documents::stateboard_list))
        .route("/admin/cbse/documents", get(documents::cbse_list))
        .route(
            "/admin/document/:document_id",
            put(documents::update).delete(documents::delete),
        )
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "edudocs-api",
        "version": version,
        "description": "Admin backend for the edudocs retrieval platform",
        "endpoints": {
            "auth": "/admin/register, /admin/login, /admin/logout (public)",
            "profile": "/admin/profile, /admin/update-profile (bearer)",
            "upload": "/admin/upload (public)",
            "documents": "/admin/documents, /admin/stateboard/documents, /admin/cbse/documents (public)",
            "registry": "/admin/document/:id (public)",
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match state.credentials.ping().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "storage": "ok"
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "degraded",
                "timestamp": now,
                "storage_error": e.to_string()
            })),
        ),
    }
}
