use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User roles, ordered from widest to narrowest authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    Admin,
    Tester,
    Developer,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::Admin => "admin",
            Role::Tester => "tester",
            Role::Developer => "developer",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    Active,
    Disabled,
}

/// The signed-in user's own profile, as returned by login and profile fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub role: Role,
    #[serde(default)]
    pub role_display: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// Full user record from the account-management endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub role: Role,
    #[serde(default)]
    pub role_display: String,
    pub status: UserStatus,
    #[serde(default)]
    pub status_display: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Payload of a successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access: String,
    pub refresh: String,
    pub user: UserProfile,
}

/// Partial update of the signed-in user's own profile.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Self-service password change; requires the current password.
#[derive(Debug)]
pub struct ChangePasswordForm {
    pub old_password: secrecy::Secret<String>,
    pub new_password: secrecy::Secret<String>,
    pub confirm_password: secrecy::Secret<String>,
}

/// Administrative password reset; no current password needed.
#[derive(Debug)]
pub struct ResetPasswordForm {
    pub new_password: secrecy::Secret<String>,
    pub confirm_password: secrecy::Secret<String>,
}

#[derive(Debug, validator::Validate)]
pub struct UserCreateForm {
    #[validate(length(min = 1, max = 150))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    pub phone: String,
    pub password: secrecy::Secret<String>,
    pub confirm_password: secrecy::Secret<String>,
    pub role: Role,
    pub status: UserStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserUpdateForm {
    pub email: String,
    pub phone: String,
    pub role: Role,
    pub status: UserStatus,
}

/// Query filters for the user list.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&Role::SuperAdmin).unwrap(),
            "\"super_admin\""
        );
        let role: Role = serde_json::from_str("\"developer\"").unwrap();
        assert_eq!(role, Role::Developer);
    }

    #[test]
    fn profile_tolerates_extra_and_missing_fields() {
        // Login responses carry the full user record; the profile endpoint a subset.
        let profile: UserProfile = serde_json::from_value(serde_json::json!({
            "id": 3,
            "username": "tester1",
            "email": "t@example.com",
            "role": "tester",
            "role_display": "Tester",
            "status": "active",
            "is_active": true
        }))
        .unwrap();
        assert_eq!(profile.role, Role::Tester);
        assert!(profile.avatar.is_none());
    }
}
