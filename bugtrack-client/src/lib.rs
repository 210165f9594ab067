pub mod api;
pub mod config;
pub mod error;
pub mod guard;
pub mod http;
pub mod models;
pub mod notify;
pub mod observability;
pub mod session;
pub mod tokens;

use api::{BugsClient, ModulesClient, UsersClient};
use config::Settings;
use error::ApiError;
use guard::{Navigator, TracingNavigator};
use notify::{Notifier, TracingNotifier};
use session::SessionStore;
use std::sync::Arc;
use tokens::{FileTokenStore, TokenStore};

/// Explicitly constructed session context: token persistence plus the
/// notification and navigation sinks the pipeline drives on failure.
///
/// Built once at startup and injected everywhere it is needed; there is no
/// ambient global state.
#[derive(Clone)]
pub struct SessionContext {
    pub tokens: Arc<dyn TokenStore>,
    pub notifier: Arc<dyn Notifier>,
    pub navigator: Arc<dyn Navigator>,
}

impl SessionContext {
    pub fn new(
        tokens: Arc<dyn TokenStore>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            tokens,
            notifier,
            navigator,
        }
    }

    /// Context with a file-backed token store and tracing sinks, for
    /// embedders that do not wire their own.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            Arc::new(FileTokenStore::new(settings.tokens.store_path.clone())),
            Arc::new(TracingNotifier),
            Arc::new(TracingNavigator),
        )
    }
}

/// Shared application state containing the typed API clients and the session.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UsersClient>,
    pub bugs: Arc<BugsClient>,
    pub modules: Arc<ModulesClient>,
    pub session: Arc<SessionStore>,
}

impl AppState {
    pub fn new(settings: &Settings, context: SessionContext) -> Result<Self, ApiError> {
        let api = Arc::new(http::ApiClient::new(
            settings.api.clone(),
            settings.tokens.clone(),
            context.clone(),
        )?);

        let users = Arc::new(UsersClient::new(api.clone()));
        let bugs = Arc::new(BugsClient::new(api.clone()));
        let modules = Arc::new(ModulesClient::new(api));
        let session = Arc::new(SessionStore::new(
            users.clone(),
            context,
            settings.tokens.clone(),
        ));

        Ok(Self {
            users,
            bugs,
            modules,
            session,
        })
    }
}
