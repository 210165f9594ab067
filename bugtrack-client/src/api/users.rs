//! User and account-management endpoints.

use crate::error::ApiError;
use crate::http::ApiClient;
use crate::models::{
    ApiMessage, ChangePasswordForm, LoginResponse, Paginated, ProfileUpdate, ResetPasswordForm,
    User, UserCreateForm, UserFilters, UserProfile, UserUpdateForm,
};
use crate::session::Credentials;
use secrecy::ExposeSecret;
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

pub struct UsersClient {
    api: Arc<ApiClient>,
}

/// Acknowledgement of a status toggle (`{"detail", "status"}`).
#[derive(Debug, Clone, Deserialize)]
pub struct UserStatusChange {
    #[serde(default)]
    pub detail: String,
    pub status: crate::models::UserStatus,
}

impl UsersClient {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        credentials.validate()?;
        let body = serde_json::json!({
            "username": credentials.username,
            "password": credentials.password.expose_secret(),
        });
        self.api.post_json("/users/login/", &body).await
    }

    pub async fn logout(&self, refresh: &str) -> Result<ApiMessage, ApiError> {
        let body = serde_json::json!({ "refresh": refresh });
        self.api.post_json("/users/logout/", &body).await
    }

    pub async fn profile(&self) -> Result<UserProfile, ApiError> {
        self.api.get("/users/profile/").await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserProfile, ApiError> {
        self.api.put_json("/users/profile/", update).await
    }

    pub async fn change_password(&self, form: &ChangePasswordForm) -> Result<ApiMessage, ApiError> {
        let body = serde_json::json!({
            "old_password": form.old_password.expose_secret(),
            "new_password": form.new_password.expose_secret(),
            "confirm_password": form.confirm_password.expose_secret(),
        });
        self.api.post_json("/users/change-password/", &body).await
    }

    pub async fn list(&self, filters: &UserFilters) -> Result<Paginated<User>, ApiError> {
        self.api.get_query("/users/", filters).await
    }

    pub async fn get(&self, id: i64) -> Result<User, ApiError> {
        self.api.get(&format!("/users/{id}/")).await
    }

    pub async fn create(&self, form: &UserCreateForm) -> Result<User, ApiError> {
        form.validate()?;
        let body = serde_json::json!({
            "username": form.username,
            "email": form.email,
            "phone": form.phone,
            "password": form.password.expose_secret(),
            "confirm_password": form.confirm_password.expose_secret(),
            "role": form.role,
            "status": form.status,
        });
        self.api.post_json("/users/", &body).await
    }

    pub async fn update(&self, id: i64, form: &UserUpdateForm) -> Result<User, ApiError> {
        self.api.put_json(&format!("/users/{id}/"), form).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.api.delete(&format!("/users/{id}/")).await
    }

    pub async fn reset_password(
        &self,
        id: i64,
        form: &ResetPasswordForm,
    ) -> Result<ApiMessage, ApiError> {
        let body = serde_json::json!({
            "new_password": form.new_password.expose_secret(),
            "confirm_password": form.confirm_password.expose_secret(),
        });
        self.api
            .post_json(&format!("/users/{id}/reset_password/"), &body)
            .await
    }

    pub async fn toggle_status(&self, id: i64) -> Result<UserStatusChange, ApiError> {
        self.api
            .post_empty(&format!("/users/{id}/toggle_status/"))
            .await
    }

    /// Active developers, for the bug assignment picker.
    pub async fn developers(&self) -> Result<Vec<User>, ApiError> {
        self.api.get("/users/developers/").await
    }
}
