//! End-to-end workflow test harness.
//!
//! Drives the full client stack (session store, typed API clients, token
//! refresh pipeline) against a wiremock backend that plays the server's part
//! in each workflow. Every test builds its own backend and state, so tests
//! are isolated and run in parallel.

use bugtrack_client::config::{ApiSettings, Settings, TokenSettings};
use bugtrack_client::guard::Navigator;
use bugtrack_client::notify::Notifier;
use bugtrack_client::tokens::{MemoryTokenStore, TokenKind, TokenStore};
use bugtrack_client::{AppState, SessionContext};
use std::sync::{Arc, Mutex, Once};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_USERNAME: &str = "alice";
pub const TEST_PASSWORD: &str = "correct horse";

static INIT: Once = Once::new();

/// Initialize tracing for tests (only once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("info,workflow_tests=debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Notifier that records every message for later assertions.
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().expect("notifier lock poisoned").clone()
    }
}

impl Notifier for RecordingNotifier {
    fn error(&self, message: &str) {
        self.messages
            .lock()
            .expect("notifier lock poisoned")
            .push(message.to_string());
    }
}

/// Navigator that records visited paths for later assertions.
#[derive(Default)]
pub struct RecordingNavigator {
    visits: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn visits(&self) -> Vec<String> {
        self.visits.lock().expect("navigator lock poisoned").clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        self.visits
            .lock()
            .expect("navigator lock poisoned")
            .push(path.to_string());
    }
}

/// Mock backend plus the client state wired against it.
pub struct TestBackend {
    pub server: MockServer,
    pub state: AppState,
    pub tokens: Arc<MemoryTokenStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub navigator: Arc<RecordingNavigator>,
}

impl TestBackend {
    pub async fn spawn() -> Self {
        init_tracing();
        let server = MockServer::start().await;

        let tokens = Arc::new(MemoryTokenStore::new());
        let notifier = Arc::new(RecordingNotifier::default());
        let navigator = Arc::new(RecordingNavigator::default());
        let context = SessionContext::new(tokens.clone(), notifier.clone(), navigator.clone());

        let state = AppState::new(&settings_for(&server.uri()), context)
            .expect("Failed to build app state");

        Self {
            server,
            state,
            tokens,
            notifier,
            navigator,
        }
    }

    pub fn access_token(&self) -> Option<String> {
        self.tokens.get(TokenKind::Access)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.tokens.get(TokenKind::Refresh)
    }

    /// Mount the login endpoint issuing the given token pair.
    pub async fn allow_login(&self, access: &str, refresh: &str) {
        Mock::given(method("POST"))
            .and(path("/api/users/login/"))
            .and(body_json(serde_json::json!({
                "username": TEST_USERNAME,
                "password": TEST_PASSWORD
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access": access,
                "refresh": refresh,
                "user": test_user()
            })))
            .mount(&self.server)
            .await;
    }

    /// Mount the refresh endpoint, exchanging `refresh` for a new access
    /// token.
    pub async fn allow_refresh(&self, refresh: &str, new_access: &str) {
        Mock::given(method("POST"))
            .and(path("/api/users/token/refresh/"))
            .and(body_json(serde_json::json!({ "refresh": refresh })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access": new_access
            })))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Mount the refresh endpoint as rejecting every exchange.
    pub async fn reject_refresh(&self) {
        Mock::given(method("POST"))
            .and(path("/api/users/token/refresh/"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "detail": "Token is invalid or expired"
            })))
            .mount(&self.server)
            .await;
    }

    /// Mount a GET endpoint that serves `body` only to the given bearer
    /// token and rejects every other credential with 401.
    pub async fn serve_for_token(&self, route: &str, token: &str, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path(route))
            .and(header("authorization", format!("Bearer {token}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(401))
            .mount(&self.server)
            .await;
    }
}

pub fn settings_for(base_url: &str) -> Settings {
    Settings {
        api: ApiSettings {
            base_url: base_url.to_string(),
            prefix: "/api".to_string(),
            timeout_seconds: 5,
        },
        tokens: TokenSettings::default(),
    }
}

pub fn test_user() -> serde_json::Value {
    serde_json::json!({
        "id": 1,
        "username": TEST_USERNAME,
        "email": "alice@example.com",
        "phone": "12345678901",
        "role": "admin",
        "role_display": "Admin",
        "avatar": null
    })
}

pub fn bug_page(titles: &[&str]) -> serde_json::Value {
    let results: Vec<serde_json::Value> = titles
        .iter()
        .enumerate()
        .map(|(i, title)| {
            serde_json::json!({
                "id": i as i64 + 1,
                "title": title,
                "severity": "major",
                "severity_display": "Major",
                "priority": "medium",
                "priority_display": "Medium",
                "status": "pending",
                "status_display": "Pending",
                "module_path": "Shop / Checkout",
                "creator": 1,
                "creator_name": TEST_USERNAME,
                "created_at": "2026-05-01T12:00:00Z"
            })
        })
        .collect();

    serde_json::json!({
        "count": results.len(),
        "next": null,
        "previous": null,
        "results": results
    })
}
