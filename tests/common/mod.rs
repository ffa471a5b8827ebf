// Shared between test binaries; not every binary uses every helper
#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Result;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use edudocs_api::embedder::FallbackEmbedder;
use edudocs_api::handlers;
use edudocs_api::state::AppState;

pub const MULTIPART_BOUNDARY: &str = "edudocs-test-boundary";

/// Router over fresh in-memory stores and the deterministic embedder.
pub fn test_app() -> Router {
    // Keep test uploads out of the repo tree
    let upload_dir = std::env::temp_dir().join("edudocs-test-uploads");
    std::env::set_var("UPLOAD_DIR", &upload_dir);

    let embedder = Arc::new(FallbackEmbedder::new(8));
    handlers::app(AppState::in_memory(embedder))
}

/// Fire a JSON request at the router and decode the response.
pub async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> Result<(StatusCode, Value)> {
    let mut builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            builder.body(Body::from(json.to_string()))?
        }
        None => builder.body(Body::empty())?,
    };

    send(app, request).await
}

/// Same as `send_json` with a bearer token attached.
pub async fn send_authed(
    app: &Router,
    method: &str,
    uri: &str,
    token: &str,
    body: Option<Value>,
) -> Result<(StatusCode, Value)> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {}", token));
    let request = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            builder.body(Body::from(json.to_string()))?
        }
        None => builder.body(Body::empty())?,
    };

    send(app, request).await
}

pub async fn send(app: &Router, request: Request<Body>) -> Result<(StatusCode, Value)> {
    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };
    Ok((status, value))
}

/// A multipart form field: `(name, filename, content)`.
pub type FormField<'a> = (&'a str, Option<&'a str>, &'a str);

/// Build a multipart/form-data body by hand for upload tests.
pub fn multipart_body(fields: &[FormField<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, filename, content) in fields {
        body.extend_from_slice(format!("--{}\r\n", MULTIPART_BOUNDARY).as_bytes());
        match filename {
            Some(filename) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                        name, filename
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(b"Content-Type: text/plain\r\n\r\n");
            }
            None => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                );
            }
        }
        body.extend_from_slice(content.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", MULTIPART_BOUNDARY).as_bytes());
    body
}

pub async fn send_multipart(
    app: &Router,
    uri: &str,
    fields: &[FormField<'_>],
) -> Result<(StatusCode, Value)> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", MULTIPART_BOUNDARY),
        )
        .body(Body::from(multipart_body(fields)))?;

    send(app, request).await
}

/// Register an admin and log in, returning the bearer token.
pub async fn register_and_login(app: &Router, username: &str, email: &str) -> Result<String> {
    let (status, _) = send_json(
        app,
        "POST",
        "/admin/register",
        Some(serde_json::json!({
            "username": username,
            "email": email,
            "password": "correct-horse",
        })),
    )
    .await?;
    anyhow::ensure!(status == StatusCode::CREATED, "register failed: {}", status);

    let (status, body) = send_json(
        app,
        "POST",
        "/admin/login",
        Some(serde_json::json!({
            "email": email,
            "password": "correct-horse",
        })),
    )
    .await?;
    anyhow::ensure!(status == StatusCode::OK, "login failed: {}", status);

    let token = body["access_token"]
        .as_str()
        .ok_or_else(|| anyhow::anyhow!("no access_token in login response"))?;
    Ok(token.to_string())
}

/// Upload a document with the given tags, returning its id.
pub async fn upload_document(
    app: &Router,
    board: &str,
    class: &str,
    subject: &str,
    group: Option<&str>,
) -> Result<String> {
    let mut fields: Vec<FormField<'_>> = vec![
        ("file", Some("chapter.txt"), "Plants make food from sunlight."),
        ("class", None, class),
        ("board", None, board),
        ("subject", None, subject),
    ];
    if let Some(group) = group {
        fields.push(("group", None, group));
    }

    let (status, body) = send_multipart(app, "/admin/upload", &fields).await?;
    anyhow::ensure!(status == StatusCode::OK, "upload failed: {}", status);

    let id = body["document_id"]
        .as_str()
        .ok_or_else(|| anyhow::anyhow!("no document_id in upload response"))?;
    Ok(id.to_string())
}
