use bugtrack_client::config::{ApiSettings, Settings, TokenSettings};
use bugtrack_client::guard::Navigator;
use bugtrack_client::notify::Notifier;
use bugtrack_client::tokens::{MemoryTokenStore, TokenKind, TokenStore};
use bugtrack_client::{AppState, SessionContext};
use std::sync::{Arc, Mutex};
use wiremock::MockServer;

/// Notifier that records every message instead of emitting it.
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

/// Navigator that records visited paths instead of routing.
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

/// A full [`AppState`] wired against a wiremock backend, with recording
/// doubles for the notification and navigation sinks.
pub struct TestApp {
    pub server: MockServer,
    pub state: AppState,
    pub tokens: Arc<MemoryTokenStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub navigator: Arc<RecordingNavigator>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let server = MockServer::start().await;

        let settings = Settings {
            api: ApiSettings {
                base_url: server.uri(),
                prefix: "/api".to_string(),
                timeout_seconds: 5,
            },
            tokens: TokenSettings::default(),
        };

        let tokens = Arc::new(MemoryTokenStore::new());
        let notifier = Arc::new(RecordingNotifier::default());
        let navigator = Arc::new(RecordingNavigator::default());
        let context = SessionContext::new(tokens.clone(), notifier.clone(), navigator.clone());

        let state = AppState::new(&settings, context).expect("Failed to build app state");

        Self {
            server,
            state,
            tokens,
            notifier,
            navigator,
        }
    }

    /// Seed the store with a valid token pair, as after a successful login.
    pub fn seed_tokens(&self, access: &str, refresh: &str) {
        self.tokens
            .set(TokenKind::Access, access, chrono::Duration::hours(24));
        self.tokens
            .set(TokenKind::Refresh, refresh, chrono::Duration::days(7));
    }

    pub fn access_token(&self) -> Option<String> {
        self.tokens.get(TokenKind::Access)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.tokens.get(TokenKind::Refresh)
    }
}

/// Login response payload as the backend issues it.
pub fn login_body(access: &str, refresh: &str) -> serde_json::Value {
    serde_json::json!({
        "access": access,
        "refresh": refresh,
        "user": profile_body()
    })
}

pub fn profile_body() -> serde_json::Value {
    serde_json::json!({
        "id": 1,
        "username": "alice",
        "email": "alice@example.com",
        "phone": "12345678901",
        "role": "tester",
        "role_display": "Tester",
        "avatar": null
    })
}

/// Empty paginated listing.
pub fn empty_page() -> serde_json::Value {
    serde_json::json!({
        "count": 0,
        "next": null,
        "previous": null,
        "results": []
    })
}
