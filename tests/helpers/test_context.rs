//! Test context for unified test setup
//!
//! Builds the full application router against the test database, creates
//! the bootstrap administrator and offers request helpers that drive the
//! router with `tower::ServiceExt::oneshot`.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use Colecta::app::{build_router, AppState};
use Colecta::config::Settings;

use super::database_helper::TestDatabase;

pub const ADMIN_USERNAME: &str = "admin.test";
pub const ADMIN_PASSWORD: &str = "admin-password-123";

/// Unified test context that manages all test components
pub struct TestContext {
    pub database: TestDatabase,
    pub state: AppState,
    pub router: Router,
    pub settings: Settings,
    pub temp_dir: TempDir,
    pub admin_token: String,
}

/// Response status and parsed JSON body (`Null` when empty)
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestContext {
    /// Create a context with default settings; `None` when no database is available
    pub async fn new() -> Option<Self> {
        Self::new_with_settings(|_| {}).await
    }

    /// Create a context after adjusting the test settings
    pub async fn new_with_settings(adjust: impl FnOnce(&mut Settings)) -> Option<Self> {
        let database = TestDatabase::new().await?;
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");

        let mut settings = Self::create_test_settings(&database, &temp_dir);
        adjust(&mut settings);

        let state = AppState::new(settings.clone(), database.pool.clone()).expect("Failed to build state");
        state
            .services
            .auth_service
            .bootstrap_admin()
            .await
            .expect("Failed to bootstrap admin")
            .expect("admin should be created on a clean database");

        let router = build_router(state.clone());
        let mut ctx = Self {
            database,
            state,
            router,
            settings,
            temp_dir,
            admin_token: String::new(),
        };
        ctx.admin_token = ctx.login(ADMIN_USERNAME, ADMIN_PASSWORD).await;
        Some(ctx)
    }

    fn create_test_settings(database: &TestDatabase, temp_dir: &TempDir) -> Settings {
        let mut settings = Settings::default();
        settings.database.url = database.database_url.clone();
        settings.database.max_connections = 5;
        settings.database.min_connections = 0;
        settings.server.upload_dir = temp_dir.path().join("uploads").to_string_lossy().into_owned();
        settings.server.max_upload_bytes = 64 * 1024;
        settings.redis.enabled = false;
        settings.rate_limit.enabled = false;
        settings.auth.jwt_secret = "integration-test-secret-integration-test".to_string();
        settings.auth.bootstrap_admin_username = Some(ADMIN_USERNAME.to_string());
        settings.auth.bootstrap_admin_password = Some(ADMIN_PASSWORD.to_string());
        settings.inventory.low_stock_threshold = 5;
        settings
    }

    /// Send a request through the router
    pub async fn request(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send(request).await
    }

    /// Send a prebuilt request, e.g. a multipart upload
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        TestResponse { status, body }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, Some(&self.admin_token), None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(&self.admin_token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::PUT, uri, Some(&self.admin_token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.request(Method::DELETE, uri, Some(&self.admin_token), None).await
    }

    /// Log in and return the bearer token
    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self
            .request(
                Method::POST,
                "/auth/login",
                None,
                Some(json!({ "username": username, "password": password })),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "login failed: {}", response.body);
        response.body["token"].as_str().expect("token in response").to_string()
    }

    /// Create a user with the named seeded role and return its id and token
    pub async fn user_with_role(&self, username: &str, role: &str) -> (i64, String) {
        let role_id: (i64,) = sqlx::query_as("SELECT id FROM roles WHERE name = $1")
            .bind(role)
            .fetch_one(&self.database.pool)
            .await
            .expect("role exists");

        let password = "volunteer-password-1";
        let response = self
            .post(
                "/usuarios/create",
                json!({ "username": username, "password": password, "role_id": role_id.0 }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);

        let id = response.body["id"].as_i64().expect("user id");
        (id, self.login(username, password).await)
    }

    /// POST to a create route and return the new id, asserting 201
    pub async fn create(&self, uri: &str, body: Value) -> i64 {
        let response = self.post(uri, body).await;
        assert_eq!(response.status, StatusCode::CREATED, "POST {} failed: {}", uri, response.body);
        response.body["id"].as_i64().expect("id in created body")
    }
}
