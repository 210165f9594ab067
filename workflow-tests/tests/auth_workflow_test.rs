//! End-to-end authentication workflows.
//!
//! Each test drives the full stack: session store, token store, typed API
//! clients and the refresh pipeline, against a mock backend playing the
//! server's role in the flow.

mod common;

use bugtrack_client::config::TokenSettings;
use bugtrack_client::error::ApiError;
use bugtrack_client::models::BugFilters;
use bugtrack_client::notify::messages;
use bugtrack_client::tokens::{FileTokenStore, TokenKind, TokenStore};
use bugtrack_client::{AppState, SessionContext};
use std::sync::Arc;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};
use workflow_tests::{
    bug_page, settings_for, RecordingNavigator, RecordingNotifier, TEST_USERNAME,
};

/// Sign in, then fetch a listing whose access token has expired: the refresh
/// and retry are invisible to the caller, and the refresh token is never
/// rotated.
#[tokio::test]
async fn login_then_listing_with_transparent_refresh() {
    let backend = common::setup().await;
    backend.allow_login("acc-1", "ref-1").await;
    backend.allow_refresh("ref-1", "acc-2").await;
    backend
        .serve_for_token("/api/bugs/", "acc-2", bug_page(&["Checkout total wrong"]))
        .await;

    let response = backend
        .state
        .session
        .login(&common::credentials())
        .await
        .expect("Login should succeed");
    assert_eq!(response.user.username, TEST_USERNAME);
    assert_eq!(backend.access_token().as_deref(), Some("acc-1"));

    // The backend only honors acc-2, so this request 401s, refreshes and
    // retries without the caller noticing.
    let page = backend
        .state
        .bugs
        .list(&BugFilters::default())
        .await
        .expect("Listing should succeed after transparent refresh");

    assert_eq!(page.count, 1);
    assert_eq!(page.results[0].title, "Checkout total wrong");
    assert_eq!(backend.access_token().as_deref(), Some("acc-2"));
    assert_eq!(backend.refresh_token().as_deref(), Some("ref-1"));
    assert!(backend.notifier.messages().is_empty());
    assert!(backend.navigator.visits().is_empty());
}

/// When the refresh token is itself rejected the session is torn down, the
/// user lands on the login page, and signing back in restores a working
/// session.
#[tokio::test]
async fn refresh_exhaustion_forces_reauthentication() {
    let backend = common::setup().await;
    backend.allow_login("acc-1", "ref-1").await;
    backend.reject_refresh().await;

    Mock::given(method("GET"))
        .and(path("/api/bugs/"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&backend.server)
        .await;

    backend
        .state
        .session
        .login(&common::credentials())
        .await
        .expect("Login should succeed");

    let err = backend
        .state
        .bugs
        .list(&BugFilters::default())
        .await
        .expect_err("Listing must fail once the refresh token is rejected");

    assert!(matches!(err, ApiError::RefreshFailed(_)));
    assert_eq!(backend.access_token(), None);
    assert_eq!(backend.refresh_token(), None);
    assert_eq!(backend.notifier.messages(), vec![messages::SESSION_EXPIRED]);
    assert_eq!(backend.navigator.visits(), vec!["/login"]);

    // Signing back in issues a fresh pair and the session works again.
    backend
        .state
        .session
        .login(&common::credentials())
        .await
        .expect("Re-login should succeed");
    assert!(backend.state.session.is_logged_in());
    assert_eq!(backend.access_token().as_deref(), Some("acc-1"));
}

/// Logout revokes the refresh token server-side and clears everything
/// locally; afterwards the client holds no credential at all.
#[tokio::test]
async fn logout_ends_the_authenticated_session() {
    let backend = common::setup().await;
    backend.allow_login("acc-1", "ref-1").await;

    Mock::given(method("POST"))
        .and(path("/api/users/logout/"))
        .and(body_json(serde_json::json!({ "refresh": "ref-1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "detail": "Logged out"
        })))
        .expect(1)
        .mount(&backend.server)
        .await;

    backend
        .state
        .session
        .login(&common::credentials())
        .await
        .expect("Login should succeed");
    backend.state.session.logout().await;

    assert!(!backend.state.session.is_logged_in());
    assert_eq!(backend.access_token(), None);
    assert_eq!(backend.refresh_token(), None);
    assert!(backend.state.session.user().is_none());
    assert_eq!(backend.navigator.visits(), vec!["/login"]);
}

/// Tokens persisted by the file store survive a client restart: a second
/// state built over the same store starts out logged in and can call the
/// API without signing in again.
#[tokio::test]
async fn persisted_tokens_survive_a_restart() {
    let backend = common::setup().await;
    backend.allow_login("acc-1", "ref-1").await;
    backend
        .serve_for_token("/api/bugs/", "acc-1", bug_page(&[]))
        .await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let store_path = dir.path().join("tokens.json");

    let mut settings = settings_for(&backend.server.uri());
    settings.tokens = TokenSettings {
        store_path: store_path.clone(),
        ..TokenSettings::default()
    };

    let first_context = SessionContext::new(
        Arc::new(FileTokenStore::new(store_path.clone())),
        Arc::new(RecordingNotifier::default()),
        Arc::new(RecordingNavigator::default()),
    );
    let first = AppState::new(&settings, first_context).expect("Failed to build app state");
    first
        .session
        .login(&common::credentials())
        .await
        .expect("Login should succeed");
    drop(first);

    // A fresh store over the same file picks the pair back up.
    let tokens: Arc<FileTokenStore> = Arc::new(FileTokenStore::new(store_path));
    assert_eq!(tokens.get(TokenKind::Access).as_deref(), Some("acc-1"));

    let second_context = SessionContext::new(
        tokens,
        Arc::new(RecordingNotifier::default()),
        Arc::new(RecordingNavigator::default()),
    );
    let second = AppState::new(&settings, second_context).expect("Failed to build app state");

    assert!(second.session.is_logged_in());
    second
        .bugs
        .list(&BugFilters::default())
        .await
        .expect("Persisted credential should authenticate the listing");
}
