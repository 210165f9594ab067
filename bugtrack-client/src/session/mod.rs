//! Session lifecycle: login, logout, profile hydration and permission checks.

pub mod permissions;

use crate::api::users::UsersClient;
use crate::config::TokenSettings;
use crate::error::ApiError;
use crate::guard::LOGIN_PATH;
use crate::models::{LoginResponse, Role, UserProfile};
use crate::tokens::{TokenKind, TokenStore};
use crate::SessionContext;
use permissions::{role_allows, Permission};
use secrecy::Secret;
use std::sync::{Arc, RwLock};
use validator::Validate;

#[derive(Debug, Validate)]
pub struct Credentials {
    #[validate(length(min = 1))]
    pub username: String,
    pub password: Secret<String>,
}

/// Holds the signed-in user and drives the token store.
///
/// Created empty at startup; the persisted token (if still within its TTL)
/// makes the session count as logged in until the next authenticated request
/// says otherwise.
pub struct SessionStore {
    users: Arc<UsersClient>,
    context: SessionContext,
    token_settings: TokenSettings,
    user: RwLock<Option<UserProfile>>,
}

impl SessionStore {
    pub fn new(
        users: Arc<UsersClient>,
        context: SessionContext,
        token_settings: TokenSettings,
    ) -> Self {
        Self {
            users,
            context,
            token_settings,
            user: RwLock::new(None),
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.context.tokens.get(TokenKind::Access).is_some()
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.user.read().expect("session lock poisoned").clone()
    }

    pub fn role(&self) -> Option<Role> {
        self.user().map(|user| user.role)
    }

    pub fn is_super_admin(&self) -> bool {
        self.role() == Some(Role::SuperAdmin)
    }

    pub fn is_admin(&self) -> bool {
        matches!(self.role(), Some(Role::SuperAdmin) | Some(Role::Admin))
    }

    pub fn is_tester(&self) -> bool {
        self.role() == Some(Role::Tester)
    }

    pub fn is_developer(&self) -> bool {
        self.role() == Some(Role::Developer)
    }

    /// Authenticate and persist the returned token pair and user.
    ///
    /// Errors from the pipeline propagate untouched; nothing is stored on
    /// failure.
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        let response = self.users.login(credentials).await?;

        self.context.tokens.set(
            TokenKind::Access,
            &response.access,
            self.token_settings.access_ttl(),
        );
        self.context.tokens.set(
            TokenKind::Refresh,
            &response.refresh,
            self.token_settings.refresh_ttl(),
        );

        *self.user.write().expect("session lock poisoned") = Some(response.user.clone());

        tracing::info!(
            user_id = response.user.id,
            username = %response.user.username,
            "User logged in"
        );

        Ok(response)
    }

    /// Revoke the refresh token server-side when possible, then clear local
    /// state and navigate to login. The server call is best-effort; its
    /// failure never blocks the local teardown.
    pub async fn logout(&self) {
        if let Some(refresh) = self.context.tokens.get(TokenKind::Refresh) {
            if let Err(e) = self.users.logout(&refresh).await {
                tracing::warn!(error = %e, "Server-side logout failed, clearing session anyway");
            }
        }

        self.context.tokens.clear();
        *self.user.write().expect("session lock poisoned") = None;
        self.context.navigator.navigate(LOGIN_PATH);
    }

    /// Hydrate the user from the profile endpoint.
    ///
    /// No-op without an access token. A profile that cannot be read means the
    /// session is not worth keeping, so any failure triggers `logout`.
    pub async fn fetch_profile(&self) {
        if self.context.tokens.get(TokenKind::Access).is_none() {
            return;
        }

        match self.users.profile().await {
            Ok(profile) => {
                *self.user.write().expect("session lock poisoned") = Some(profile);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Profile fetch failed, logging out");
                self.logout().await;
            }
        }
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        match self.role() {
            Some(role) => role_allows(role, permission),
            None => false,
        }
    }

    /// String-name variant for UI callers; unknown names deny.
    pub fn has_permission_named(&self, name: &str) -> bool {
        Permission::from_name(name)
            .map(|permission| self.has_permission(permission))
            .unwrap_or(false)
    }
}
