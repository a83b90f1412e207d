//! Integration tests for file operations.

use axum::http::StatusCode;
use chrono::Utc;
use serde_json::json;

use secureshare_auth::JwtEncoder;
use secureshare_core::config::AuthConfig;
use secureshare_core::types::FileId;
use secureshare_database::MetadataStore;
use secureshare_entity::{FileRecord, TokenType};

use crate::helpers::{TestApp, token_from_url};

#[tokio::test]
async fn test_upload_then_metadata_and_list() {
    let app = TestApp::new();
    let token = app.token_for("alice");

    let id = app.upload_ok(&token, "report.txt", b"quarterly numbers").await;

    let response = app
        .request("GET", &format!("/file/metadata/{id}"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let file = &response.body["data"];
    assert_eq!(file["owner"], "alice");
    assert_eq!(file["filename"], "report.txt");
    assert_eq!(file["size_bytes"], 17);
    assert!(file.get("download_token").is_none());

    let response = app.request("GET", "/file/list", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);
    let files = response.body["data"].as_array().expect("list is an array");
    assert_eq!(files.len(), 1);
    assert_eq!(files[0]["id"], id.as_str());
    assert_eq!(files[0]["blob_present"], true);

    let stored = app
        .objects
        .get(&format!("{id}_report.txt"))
        .expect("blob stored under id_filename");
    assert_eq!(&stored.data[..], b"quarterly numbers");
}

#[tokio::test]
async fn test_upload_requires_bearer_token() {
    let app = TestApp::new();

    let response = app.request("GET", "/file/list", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "AUTHENTICATION");

    let expired = app
        .upload(
            &JwtEncoder::new(&app.config.auth)
                .issue("alice", "user", chrono::Duration::hours(-1))
                .unwrap(),
            "a.txt",
            b"x",
        )
        .await;
    assert_eq!(expired.status, StatusCode::UNAUTHORIZED);

    let foreign = JwtEncoder::new(&AuthConfig {
        jwt_secret: "some-other-secret".into(),
        ..AuthConfig::default()
    })
    .issue("alice", "user", chrono::Duration::minutes(5))
    .unwrap();
    let response = app.upload(&foreign, "a.txt", b"x").await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert!(app.records.is_empty());
}

#[tokio::test]
async fn test_upload_rejects_bad_input() {
    let app = TestApp::new();
    let token = app.token_for("alice");

    let response = app.upload(&token, "nested/name.txt", b"data").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "INVALID_INPUT");

    let response = app
        .request("POST", "/file/upload", Some(json!({})), Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    assert!(app.objects.is_empty());
    assert!(app.records.is_empty());
}

#[tokio::test]
async fn test_one_time_token_is_single_use() {
    let app = TestApp::new();
    let token = app.token_for("alice");
    let id = app.upload_ok(&token, "once.txt", b"secret").await;

    let response = app
        .request(
            "POST",
            &format!("/file/presigned/{id}"),
            Some(json!({ "token_type": "one-time", "duration": 5 })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["token_type"], "one-time");
    let url = response.body["data"]["presigned_url"].as_str().unwrap();
    let download_token = token_from_url(url);

    let path = format!("/file/download/{id}?token={download_token}");
    let first = app.request("GET", &path, None, None).await;
    assert_eq!(first.status, StatusCode::OK);
    assert!(first.body["data"]["download_url"].as_str().unwrap().contains("once.txt"));
    assert_eq!(
        first.body["data"]["expires_in_minutes"],
        app.config.transfer.download_url_minutes
    );

    let second = app.request("GET", &path, None, None).await;
    assert_eq!(second.status, StatusCode::UNAUTHORIZED);
    assert_eq!(second.body["error"], "INVALID_TOKEN");
}

#[tokio::test]
async fn test_time_limited_token_is_reusable() {
    let app = TestApp::new();
    let token = app.token_for("alice");
    let id = app.upload_ok(&token, "shared.txt", b"data").await;

    let response = app
        .request(
            "POST",
            "/file/presigned",
            Some(json!({ "file_id": id, "duration": 60 })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["token_type"], "time-limited");
    let download_token = token_from_url(response.body["data"]["presigned_url"].as_str().unwrap());

    let path = format!("/file/download/{id}?token={download_token}");
    for _ in 0..3 {
        let response = app.request("GET", &path, None, None).await;
        assert_eq!(response.status, StatusCode::OK);
    }
}

#[tokio::test]
async fn test_download_rejects_bad_tokens() {
    let app = TestApp::new();
    let token = app.token_for("alice");
    let id = app.upload_ok(&token, "a.txt", b"data").await;

    let missing = app
        .request("GET", &format!("/file/download/{id}"), None, None)
        .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);

    let wrong = app
        .request("GET", &format!("/file/download/{id}?token=deadbeef"), None, None)
        .await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.body["error"], "INVALID_TOKEN");

    let unknown = app
        .request(
            "GET",
            &format!("/file/download/{}?token=deadbeef", FileId::new()),
            None,
            None,
        )
        .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_expired_token_is_gone() {
    let app = TestApp::new();
    let record = FileRecord::for_upload(
        "alice",
        "old.txt",
        None,
        3,
        "cafebabe".to_string(),
        std::time::Duration::from_secs(60),
        Utc::now() - chrono::Duration::hours(1),
    );
    app.records.insert_one(&record).await.unwrap();

    let response = app
        .request(
            "GET",
            &format!("/file/download/{}?token=cafebabe", record.id),
            None,
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::GONE);
    assert_eq!(response.body["error"], "TOKEN_EXPIRED");
    assert_eq!(record.token_type, TokenType::TimeLimited);
}

#[tokio::test]
async fn test_presign_checks_ownership_and_input() {
    let app = TestApp::new();
    let alice = app.token_for("alice");
    let bob = app.token_for("bob");
    let id = app.upload_ok(&alice, "a.txt", b"data").await;

    let response = app
        .request("POST", &format!("/file/presigned/{id}"), None, Some(&bob))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["error"], "UNAUTHORIZED");

    let response = app
        .request(
            "POST",
            &format!("/file/presigned/{id}"),
            Some(json!({ "duration": 20000 })),
            Some(&alice),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .request(
            "POST",
            &format!("/file/presigned/{id}"),
            Some(json!({ "token_type": "forever" })),
            Some(&alice),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .request("POST", "/file/presigned/not-a-uuid", None, Some(&alice))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .request("POST", "/file/presigned", Some(json!({})), Some(&alice))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_batch_presign_reports_each_file() {
    let app = TestApp::new();
    let token = app.token_for("alice");
    let first = app.upload_ok(&token, "1.txt", b"one").await;
    let second = app.upload_ok(&token, "2.txt", b"two").await;

    let response = app
        .request(
            "POST",
            "/file/presigned",
            Some(json!({ "file_ids": [first, second, "garbage"] })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let data = &response.body["data"];
    let urls = data["presigned_urls"].as_object().unwrap();
    assert_eq!(urls.len(), 2);
    assert!(urls.contains_key(&first));
    assert!(urls.contains_key(&second));

    let errors = data["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["file_id"], "garbage");
    assert_eq!(errors[0]["error"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_delete_removes_both_sides() {
    let app = TestApp::new();
    let token = app.token_for("alice");
    let id = app.upload_ok(&token, "gone.txt", b"bye").await;

    let response = app
        .request("DELETE", &format!("/file/{id}"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(app.objects.is_empty());
    assert!(app.records.is_empty());

    let response = app
        .request("GET", &format!("/file/metadata/{id}"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "NOT_FOUND_OR_FORBIDDEN");
}

#[tokio::test]
async fn test_other_owner_cannot_see_or_delete() {
    let app = TestApp::new();
    let alice = app.token_for("alice");
    let bob = app.token_for("bob");
    let id = app.upload_ok(&alice, "private.txt", b"mine").await;

    let response = app
        .request("GET", &format!("/file/metadata/{id}"), None, Some(&bob))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app
        .request("DELETE", &format!("/file/{id}"), None, Some(&bob))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(app.records.len(), 1);

    let response = app.request("GET", "/file/list", None, Some(&bob)).await;
    assert_eq!(response.body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_batch_delete_reports_each_file() {
    let app = TestApp::new();
    let token = app.token_for("alice");
    let id = app.upload_ok(&token, "a.txt", b"data").await;
    let unknown = FileId::new().to_string();

    let response = app
        .request(
            "POST",
            "/file/delete",
            Some(json!({ "file_ids": [id, unknown] })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let results = &response.body["data"]["results"];
    assert_eq!(results[&id]["deleted"], true);
    assert_eq!(results[&unknown]["deleted"], false);
    assert_eq!(results[&unknown]["error"], "NOT_FOUND_OR_FORBIDDEN");
    assert!(app.records.is_empty());
}

#[tokio::test]
async fn test_single_delete_through_post() {
    let app = TestApp::new();
    let token = app.token_for("alice");
    let id = app.upload_ok(&token, "a.txt", b"data").await;

    let response = app
        .request("POST", "/file/delete", Some(json!({ "file_id": id })), Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(app.records.is_empty());

    let response = app
        .request("POST", "/file/delete", Some(json!({})), Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}
