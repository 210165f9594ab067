use serde::Deserialize;
use std::path::PathBuf;

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub api: ApiSettings,
    #[serde(default)]
    pub tokens: TokenSettings,
}

#[derive(Deserialize, Clone)]
pub struct ApiSettings {
    /// Root URL of the backend (e.g. http://localhost:8000). The API prefix
    /// is appended for regular calls; the token refresh endpoint is resolved
    /// against this root directly.
    pub base_url: String,
    /// Path prefix for all regular API calls.
    #[serde(default = "default_api_prefix")]
    pub prefix: String,
    /// Request timeout applied to every call.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_api_prefix() -> String {
    "/api".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

#[derive(Deserialize, Clone)]
pub struct TokenSettings {
    /// Where the file-backed token store persists its entries.
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
    /// Lifetime of a stored access token, in hours.
    #[serde(default = "default_access_ttl_hours")]
    pub access_ttl_hours: i64,
    /// Lifetime of a stored refresh token, in days.
    #[serde(default = "default_refresh_ttl_days")]
    pub refresh_ttl_days: i64,
}

impl Default for TokenSettings {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            access_ttl_hours: default_access_ttl_hours(),
            refresh_ttl_days: default_refresh_ttl_days(),
        }
    }
}

fn default_store_path() -> PathBuf {
    PathBuf::from(".bugtrack/tokens.json")
}

fn default_access_ttl_hours() -> i64 {
    24
}

fn default_refresh_ttl_days() -> i64 {
    7
}

impl ApiSettings {
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_seconds)
    }
}

impl TokenSettings {
    pub fn access_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.access_ttl_hours)
    }

    pub fn refresh_ttl(&self) -> chrono::Duration {
        chrono::Duration::days(self.refresh_ttl_days)
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    dotenvy::dotenv().ok();

    let base_path = std::env::current_dir().expect("Failed to determine the current directory");

    // Check if we're already in bugtrack-client directory or need to navigate to it
    let configuration_directory = if base_path.ends_with("bugtrack-client") {
        base_path.join("config")
    } else {
        base_path.join("bugtrack-client").join("config")
    };

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")).required(true))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_cookie_lifetimes() {
        let tokens = TokenSettings::default();
        assert_eq!(tokens.access_ttl(), chrono::Duration::days(1));
        assert_eq!(tokens.refresh_ttl(), chrono::Duration::days(7));
    }

    #[test]
    fn api_prefix_defaults_to_api() {
        let api: ApiSettings =
            serde_json::from_value(serde_json::json!({ "base_url": "http://localhost:8000" }))
                .unwrap();
        assert_eq!(api.prefix, "/api");
        assert_eq!(api.timeout(), std::time::Duration::from_secs(30));
    }
}
