mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn upload_returns_document_id_and_list_includes_it() -> Result<()> {
    let app = common::test_app();

    let id = common::upload_document(&app, "stateboard", "10", "Science", None).await?;

    let (status, body) = common::send_json(
        &app,
        "GET",
        "/admin/documents?board=stateboard&class=10",
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);

    let records = body.as_array().expect("list response is an array");
    assert!(records.iter().any(|r| r["document_id"] == id.as_str()));
    Ok(())
}

#[tokio::test]
async fn upload_requires_file() -> Result<()> {
    let app = common::test_app();

    let fields = [
        ("class", None, "10"),
        ("board", None, "stateboard"),
        ("subject", None, "Science"),
    ];
    let (status, body) = common::send_multipart(&app, "/admin/upload", &fields).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "No file uploaded");
    Ok(())
}

#[tokio::test]
async fn upload_requires_syllabus_tags() -> Result<()> {
    let app = common::test_app();

    let fields = [
        ("file", Some("chapter.txt"), "some content"),
        ("class", None, "10"),
        ("board", None, "stateboard"),
    ];
    let (status, _) = common::send_multipart(&app, "/admin/upload", &fields).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn list_filters_and_together() -> Result<()> {
    let app = common::test_app();

    common::upload_document(&app, "stateboard", "10", "Science", None).await?;
    common::upload_document(&app, "stateboard", "12", "Science", None).await?;
    common::upload_document(&app, "cbse", "10", "Maths", None).await?;

    let (_, body) = common::send_json(
        &app,
        "GET",
        "/admin/documents?board=stateboard&subject=Science&class=10",
        None,
    )
    .await?;
    let records = body.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["class"], "10");

    // No filters returns everything up to the default limit
    let (_, body) = common::send_json(&app, "GET", "/admin/documents", None).await?;
    assert_eq!(body.as_array().unwrap().len(), 3);
    Ok(())
}

#[tokio::test]
async fn list_respects_limit() -> Result<()> {
    let app = common::test_app();

    for _ in 0..4 {
        common::upload_document(&app, "cbse", "9", "Maths", None).await?;
    }

    let (_, body) = common::send_json(&app, "GET", "/admin/documents?limit=2", None).await?;
    assert_eq!(body.as_array().unwrap().len(), 2);
    Ok(())
}

#[tokio::test]
async fn board_scoped_lists_route_by_board() -> Result<()> {
    let app = common::test_app();

    let state_id = common::upload_document(&app, "stateboard", "10", "Science", Some("A")).await?;
    // Unknown boards index under cbse
    let other_id = common::upload_document(&app, "icse", "10", "Science", None).await?;

    let (status, body) =
        common::send_json(&app, "GET", "/admin/stateboard/documents?class=10", None).await?;
    assert_eq!(status, StatusCode::OK);
    let records = body.as_array().unwrap();
    assert!(records.iter().any(|r| r["document_id"] == state_id.as_str()));
    assert!(!records.iter().any(|r| r["document_id"] == other_id.as_str()));

    let (_, body) = common::send_json(&app, "GET", "/admin/cbse/documents", None).await?;
    let records = body.as_array().unwrap();
    assert!(records.iter().any(|r| r["document_id"] == other_id.as_str()));
    Ok(())
}

#[tokio::test]
async fn board_list_filters_on_group() -> Result<()> {
    let app = common::test_app();

    let grouped = common::upload_document(&app, "stateboard", "11", "Biology", Some("A")).await?;
    common::upload_document(&app, "stateboard", "11", "Biology", Some("B")).await?;

    let (_, body) = common::send_json(
        &app,
        "GET",
        "/admin/stateboard/documents?class=11&group=A",
        None,
    )
    .await?;
    let records = body.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["document_id"], grouped.as_str());
    Ok(())
}

#[tokio::test]
async fn update_merges_only_provided_fields() -> Result<()> {
    let app = common::test_app();

    let id = common::upload_document(&app, "stateboard", "10", "Science", None).await?;

    let (status, body) = common::send_json(
        &app,
        "PUT",
        &format!("/admin/document/{}", id),
        Some(json!({ "subject": "Physics" })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Document updated successfully");

    let (_, body) = common::send_json(&app, "GET", "/admin/documents", None).await?;
    let record = body
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["document_id"] == id.as_str())
        .cloned()
        .expect("updated record still listed");
    assert_eq!(record["subject"], "Physics");
    // Every other field is untouched
    assert_eq!(record["board"], "stateboard");
    assert_eq!(record["class"], "10");
    assert_eq!(record["filename"], "chapter.txt");
    Ok(())
}

#[tokio::test]
async fn update_unknown_document_is_not_found() -> Result<()> {
    let app = common::test_app();

    let (status, _) = common::send_json(
        &app,
        "PUT",
        &format!("/admin/document/{}", uuid::Uuid::new_v4()),
        Some(json!({ "subject": "Physics" })),
    )
    .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn update_rejects_malformed_document_id() -> Result<()> {
    let app = common::test_app();

    let (status, _) = common::send_json(
        &app,
        "PUT",
        "/admin/document/not-a-uuid",
        Some(json!({ "subject": "Physics" })),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn delete_removes_record_then_reports_not_found() -> Result<()> {
    let app = common::test_app();

    let id = common::upload_document(&app, "stateboard", "10", "Science", None).await?;

    let (status, body) =
        common::send_json(&app, "DELETE", &format!("/admin/document/{}", id), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Document deleted successfully");

    // Gone from the listing
    let (_, body) = common::send_json(&app, "GET", "/admin/documents", None).await?;
    assert!(!body
        .as_array()
        .unwrap()
        .iter()
        .any(|r| r["document_id"] == id.as_str()));

    // Gone from the board index
    let (_, body) = common::send_json(&app, "GET", "/admin/stateboard/documents", None).await?;
    assert!(!body
        .as_array()
        .unwrap()
        .iter()
        .any(|r| r["document_id"] == id.as_str()));

    // Further mutations 404
    let (status, _) =
        common::send_json(&app, "DELETE", &format!("/admin/document/{}", id), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = common::send_json(
        &app,
        "PUT",
        &format!("/admin/document/{}", id),
        Some(json!({ "subject": "Physics" })),
    )
    .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}
