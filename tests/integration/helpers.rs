//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use secureshare_api::AppState;
use secureshare_auth::JwtEncoder;
use secureshare_core::config::AppConfig;
use secureshare_database::MemoryFileRecordStore;
use secureshare_storage::MemoryObjectStore;

/// Signing secret shared by the router and the test encoder.
pub const TEST_SECRET: &str = "integration-test-secret";

const BOUNDARY: &str = "secureshare-test-boundary";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Application config
    pub config: AppConfig,
    /// Blob store behind the router
    pub objects: Arc<MemoryObjectStore>,
    /// Metadata store behind the router
    pub records: Arc<MemoryFileRecordStore>,
    encoder: JwtEncoder,
}

impl TestApp {
    /// Create a new test application over in-memory stores
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = TEST_SECRET.to_string();
        config.storage.provider = "memory".to_string();
        config.database.provider = "memory".to_string();
        config.storage.max_upload_size_bytes = 1024 * 1024;

        let objects = Arc::new(MemoryObjectStore::new(config.storage.bucket.clone()));
        let records = Arc::new(MemoryFileRecordStore::new());
        let encoder = JwtEncoder::new(&config.auth);

        let state = AppState::new(config.clone(), objects.clone(), records.clone());
        let router = secureshare_api::build_app(state);

        Self {
            router,
            config,
            objects,
            records,
            encoder,
        }
    }

    /// Mint a bearer token for `user_id`
    pub fn token_for(&self, user_id: &str) -> String {
        self.encoder
            .issue(user_id, "user", chrono::Duration::minutes(5))
            .expect("Failed to mint token")
    }

    /// Make a JSON request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        self.send(req).await
    }

    /// Upload `data` as `filename` through the multipart endpoint
    pub async fn upload(&self, token: &str, filename: &str, data: &[u8]) -> TestResponse {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: text/plain\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        let req = Request::builder()
            .method("POST")
            .uri("/file/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::from(body))
            .expect("Failed to build request");

        self.send(req).await
    }

    /// Upload a file and return its identifier
    pub async fn upload_ok(&self, token: &str, filename: &str, data: &[u8]) -> String {
        let response = self.upload(token, filename, data).await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Upload failed: {:?}",
            response.body
        );
        response.body["data"]["file"]["id"]
            .as_str()
            .expect("No file id in upload response")
            .to_string()
    }

    async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");
        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Pull the `token` query parameter out of a presigned URL
pub fn token_from_url(url: &str) -> String {
    url.split(['?', '&'])
        .find_map(|pair| pair.strip_prefix("token="))
        .expect("presigned URL carries no token")
        .to_string()
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}
