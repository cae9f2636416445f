//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use cms_api::{AppState, Repositories};
use cms_auth::password::PasswordHasher;
use cms_core::config::{AuthConfig, ServerConfig};
use cms_database::memory::{
    MemoryAccessControlRepository, MemoryRefreshTokenRepository, MemoryUserRepository,
};
use cms_database::repositories::UserRepository;
use cms_entity::user::User;

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    pub users: Arc<MemoryUserRepository>,
    pub access: Arc<MemoryAccessControlRepository>,
    pub refresh_tokens: Arc<MemoryRefreshTokenRepository>,
    pub auth_config: AuthConfig,
}

/// Knobs for [`TestApp::with_options`]
pub struct TestOptions {
    /// Read client addresses from proxy headers
    pub trust_proxy_headers: bool,
    /// Bound on each store call
    pub query_timeout: Duration,
    /// Replaces the user repository seen by the app; seeding still goes
    /// through `TestApp::users`
    pub wrap_users: Option<Box<dyn FnOnce(Arc<MemoryUserRepository>) -> Arc<dyn UserRepository>>>,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            trust_proxy_headers: false,
            query_timeout: Duration::from_secs(5),
            wrap_users: None,
        }
    }
}

/// Response captured from the router
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

/// Auth settings with the cheapest Argon2 cost accepted.
pub fn auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: "integration-test-secret".to_string(),
        argon2_memory_kib: 8,
        argon2_iterations: 1,
        argon2_parallelism: 1,
        ..AuthConfig::default()
    }
}

impl TestApp {
    /// Create a new test application over empty in-memory stores
    pub fn new() -> Self {
        Self::with_options(TestOptions::default())
    }

    /// Create a test application with non-default wiring
    pub fn with_options(options: TestOptions) -> Self {
        let auth_config = auth_config();
        let users = Arc::new(MemoryUserRepository::new());
        let access = Arc::new(MemoryAccessControlRepository::new());
        let refresh_tokens = Arc::new(MemoryRefreshTokenRepository::new());

        let user_repo: Arc<dyn UserRepository> = match options.wrap_users {
            Some(wrap) => wrap(users.clone()),
            None => users.clone(),
        };

        let server = ServerConfig {
            trust_proxy_headers: options.trust_proxy_headers,
            ..ServerConfig::default()
        };

        let state = AppState::new(
            server,
            &auth_config,
            options.query_timeout,
            Repositories {
                users: user_repo,
                access: access.clone(),
                refresh_tokens: refresh_tokens.clone(),
            },
            None,
        )
        .expect("Failed to build app state");

        Self {
            router: cms_api::build_router(state),
            users,
            access,
            refresh_tokens,
            auth_config,
        }
    }

    /// Insert a user with the given password
    pub async fn create_test_user(&self, email: &str, password: &str) -> User {
        let hash = PasswordHasher::new(&self.auth_config)
            .expect("Failed to build hasher")
            .hash_password(password)
            .expect("Failed to hash password");
        let user = User::new(email, hash);
        self.users.insert(user.clone()).await;
        user
    }

    /// Log in and return `(access_token, refresh_token)`
    pub async fn login(&self, email: &str, password: &str) -> (String, String) {
        let response = self
            .request(
                "POST",
                "/api/login",
                Some(serde_json::json!({ "email": email, "password": password })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "login failed: {}", response.body);
        (
            response.body["accessToken"]["token"]
                .as_str()
                .expect("access token")
                .to_string(),
            response.body["refreshToken"]["token"]
                .as_str()
                .expect("refresh token")
                .to_string(),
        )
    }

    /// Make a request against the router
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        self.request_with_headers(method, path, body, token, &[])
            .await
    }

    /// Make a request with extra headers
    pub async fn request_with_headers(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }
        for (name, value) in headers {
            req = req.header(*name, *value);
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

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
