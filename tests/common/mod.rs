//! Common Test Utilities
//!
//! Shared helpers, fixtures, and test infrastructure. The router is built
//! exactly as in production but over in-memory stores and a stub uploader.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use fake::faker::internet::en::{SafeEmail, Username};
use fake::Fake;
use tower::ServiceExt;

use event_manager::application::services::{Asset, AssetUploader, UploadError};
use event_manager::config::{
    CorsSettings, DatabaseSettings, PasswordSettings, RedisSettings, ServerSettings,
    SessionSettings, Settings, SnowflakeSettings, UploadSettings,
};
use event_manager::infrastructure::memory::{
    InMemoryEventRepository, InMemorySessionStore, InMemoryUserRepository,
};
use event_manager::shared::snowflake::DEFAULT_EPOCH;
use event_manager::startup::{build_router, AppState, Backends};

pub const COOKIE_NAME: &str = "event_session";
pub const PASSWORD: &str = "secret123";
pub const MAX_BODY_BYTES: usize = 64 * 1024;

static COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Uploader double that counts calls and can be switched to failing.
#[derive(Default)]
pub struct StubUploader {
    calls: AtomicUsize,
    failing: AtomicBool,
}

impl StubUploader {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn fail_from_now_on(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl AssetUploader for StubUploader {
    async fn upload(&self, asset: Asset) -> Result<String, UploadError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.failing.load(Ordering::SeqCst) {
            return Err(UploadError::Rejected("media host unavailable".into()));
        }
        let name = asset.file_name.unwrap_or_else(|| "upload".into());
        Ok(format!("https://cdn.test/{}/{}", n, name))
    }
}

/// Test application builder
pub struct TestApp {
    pub router: Router,
    pub users: Arc<InMemoryUserRepository>,
    pub sessions: Arc<InMemorySessionStore>,
    pub events: Arc<InMemoryEventRepository>,
    pub uploader: Arc<StubUploader>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_idle_timeout(60)
    }

    /// `0` makes every session expire as soon as it is created.
    pub fn with_idle_timeout(minutes: i64) -> Self {
        let users = Arc::new(InMemoryUserRepository::new());
        let sessions = Arc::new(InMemorySessionStore::new());
        let events = Arc::new(InMemoryEventRepository::new());
        let uploader = Arc::new(StubUploader::default());

        let state = AppState::new(
            test_settings(minutes),
            Backends {
                users: users.clone(),
                events: events.clone(),
                sessions: sessions.clone(),
                uploader: uploader.clone(),
            },
        )
        .expect("test state");

        Self {
            router: build_router(state),
            users,
            sessions,
            events,
            uploader,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Make a GET request, optionally carrying a session cookie
    pub async fn get(&self, uri: &str, session: Option<&str>) -> Response {
        self.send(with_session(Request::builder().method("GET").uri(uri), session)
            .body(Body::empty())
            .unwrap())
            .await
    }

    /// Make a DELETE request
    pub async fn delete(&self, uri: &str, session: Option<&str>) -> Response {
        self.send(with_session(Request::builder().method("DELETE").uri(uri), session)
            .body(Body::empty())
            .unwrap())
            .await
    }

    /// POST an urlencoded form
    pub async fn post_form(&self, uri: &str, fields: &[(&str, &str)], session: Option<&str>) -> Response {
        self.send(
            with_session(Request::builder().method("POST").uri(uri), session)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(form_body(fields)))
                .unwrap(),
        )
        .await
    }

    /// Send a multipart form
    pub async fn send_multipart(
        &self,
        method: &str,
        uri: &str,
        form: MultipartForm,
        session: Option<&str>,
    ) -> Response {
        let (content_type, body) = form.finish();
        self.send(
            with_session(Request::builder().method(method).uri(uri), session)
                .header(header::CONTENT_TYPE, content_type)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> Response {
        self.post_form(
            "/users/register",
            &[
                ("username", username),
                ("email", email),
                ("password", password),
                ("password2", password),
            ],
            None,
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> Response {
        self.post_form("/users/login", &[("email", email), ("password", password)], None)
            .await
    }

    /// Register a fresh user and return its session token.
    pub async fn signed_in_user(&self) -> TestUser {
        let user = TestUser::generate();
        let response = self.register(&user.username, &user.email, PASSWORD).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let response = self.login(&user.email, PASSWORD).await;
        let session = session_cookie(&response).expect("login sets a session cookie");
        TestUser {
            session: Some(session),
            ..user
        }
    }

    /// Create an event as `session` and return its id.
    pub async fn create_event(&self, session: &str, title: &str) -> String {
        let form = MultipartForm::new()
            .text("title", title)
            .text("description", "details")
            .text("date", "2026-06-01");
        let response = self.send_multipart("POST", "/events", form, Some(session)).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response).await["id"].as_str().unwrap().to_string()
    }
}

fn with_session(builder: axum::http::request::Builder, session: Option<&str>) -> axum::http::request::Builder {
    match session {
        Some(token) => builder.header(header::COOKIE, format!("{}={}", COOKIE_NAME, token)),
        None => builder,
    }
}

pub fn test_settings(idle_timeout_minutes: i64) -> Settings {
    Settings {
        server: ServerSettings {
            host: "127.0.0.1".into(),
            port: 4000,
        },
        database: DatabaseSettings {
            url: "postgres://unused".into(),
            max_connections: 1,
            min_connections: 0,
            acquire_timeout: 1,
        },
        redis: RedisSettings {
            url: "redis://unused".into(),
        },
        session: SessionSettings {
            secret: "integration-test-secret-0123456789abcdef".into(),
            idle_timeout_minutes,
            cookie_name: COOKIE_NAME.into(),
            cookie_secure: false,
        },
        password: PasswordSettings {
            memory_kib: 7168,
            iterations: 5,
            parallelism: 1,
        },
        upload: UploadSettings {
            endpoint: "http://uploads.invalid/".into(),
            api_key: None,
            timeout_secs: 5,
            max_bytes: MAX_BODY_BYTES,
        },
        snowflake: SnowflakeSettings {
            machine_id: 1,
            epoch: DEFAULT_EPOCH,
        },
        cors: CorsSettings {
            allowed_origins: vec![],
        },
        environment: "test".into(),
    }
}

/// Generated identity, unique within the test binary.
#[derive(Debug, Clone)]
pub struct TestUser {
    pub username: String,
    pub email: String,
    pub session: Option<String>,
}

impl TestUser {
    pub fn generate() -> Self {
        let n = COUNTER.fetch_add(1, Ordering::SeqCst);
        let username: String = Username().fake();
        let email: String = SafeEmail().fake();
        Self {
            username: format!("{}{}", username, n),
            email: format!("u{}.{}", n, email),
            session: None,
        }
    }

    pub fn session(&self) -> &str {
        self.session.as_deref().expect("user is signed in")
    }
}

/// Value of the session cookie set by `response`, if any.
pub fn session_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|v| {
            let pair = v.split(';').next()?;
            let value = pair.strip_prefix(&format!("{}=", COOKIE_NAME))?;
            (!value.is_empty()).then(|| value.to_string())
        })
}

pub fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// `application/x-www-form-urlencoded` encoding, as browsers submit forms.
pub fn form_body(fields: &[(&str, &str)]) -> String {
    serde_urlencoded::to_string(fields).expect("form fields encode")
}

/// Minimal `multipart/form-data` builder.
pub struct MultipartForm {
    boundary: &'static str,
    body: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self {
            boundary: "----event-manager-test-boundary",
            body: Vec::new(),
        }
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                self.boundary, name, value
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                self.boundary, name, file_name, content_type
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn finish(mut self) -> (String, Vec<u8>) {
        self.body
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        (
            format!("multipart/form-data; boundary={}", self.boundary),
            self.body,
        )
    }
}
