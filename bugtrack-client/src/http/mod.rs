//! Authenticated request pipeline.
//!
//! Every call goes through [`ApiClient::execute`]: the current access token is
//! attached as a bearer credential, successful responses hand back only the
//! payload body, and failures run through a status-keyed recovery path. An
//! expired access token (401) is recovered exactly once per original request
//! by exchanging the refresh token for a new access token and re-issuing the
//! call; when that fails the session is torn down and navigation is forced
//! back to the login route.

use crate::config::{ApiSettings, TokenSettings};
use crate::error::ApiError;
use crate::guard::LOGIN_PATH;
use crate::notify::messages;
use crate::tokens::{TokenKind, TokenStore};
use crate::SessionContext;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;

pub struct ApiClient {
    http: Client,
    /// Bare client for the token refresh call; it must not run back through
    /// the pipeline, or a rejected refresh would trigger another refresh.
    refresh_http: Client,
    api: ApiSettings,
    token_settings: TokenSettings,
    context: SessionContext,
    /// Serializes concurrent refresh attempts; see `refresh_access_token`.
    refresh_gate: Mutex<()>,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access: String,
}

impl ApiClient {
    pub fn new(
        api: ApiSettings,
        token_settings: TokenSettings,
        context: SessionContext,
    ) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(api.timeout()).build()?;
        let refresh_http = Client::builder().timeout(api.timeout()).build()?;

        Ok(Self {
            http,
            refresh_http,
            api,
            token_settings,
            context,
            refresh_gate: Mutex::new(()),
        })
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}{}", self.api.base_url, self.api.prefix, path)
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        self.fetch(|client| Ok(client.get(&url))).await
    }

    pub(crate) async fn get_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize,
    {
        let url = self.url(path);
        self.fetch(|client| Ok(client.get(&url).query(query))).await
    }

    pub(crate) async fn post_json<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        let url = self.url(path);
        self.fetch(|client| Ok(client.post(&url).json(body))).await
    }

    pub(crate) async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        self.fetch(|client| Ok(client.post(&url))).await
    }

    pub(crate) async fn put_json<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        let url = self.url(path);
        self.fetch(|client| Ok(client.put(&url).json(body))).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let url = self.url(path);
        self.execute(|client| Ok(client.delete(&url))).await?;
        Ok(())
    }

    pub(crate) async fn delete_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        self.fetch(|client| Ok(client.delete(&url))).await
    }

    /// Multipart bodies cannot be cloned, so the form is rebuilt through the
    /// closure if the request is re-issued after a token refresh.
    pub(crate) async fn post_multipart<T, F>(&self, path: &str, form: F) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        F: Fn() -> Result<reqwest::multipart::Form, ApiError>,
    {
        let url = self.url(path);
        self.fetch(|client| Ok(client.post(&url).multipart(form()?)))
            .await
    }

    pub(crate) async fn put_multipart<T, F>(&self, path: &str, form: F) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        F: Fn() -> Result<reqwest::multipart::Form, ApiError>,
    {
        let url = self.url(path);
        self.fetch(|client| Ok(client.put(&url).multipart(form()?)))
            .await
    }

    async fn fetch<T, F>(&self, build: F) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        F: Fn(&Client) -> Result<RequestBuilder, ApiError>,
    {
        let response = self.execute(build).await?;
        Ok(response.json::<T>().await?)
    }

    /// Dispatch a request, recovering from an expired access token at most
    /// once. Returns the successful response; every failure path has emitted
    /// its notification by the time the error is returned.
    async fn execute<F>(&self, build: F) -> Result<Response, ApiError>
    where
        F: Fn(&Client) -> Result<RequestBuilder, ApiError>,
    {
        let mut retried = false;

        loop {
            let access = self.context.tokens.get(TokenKind::Access);
            let mut request = build(&self.http)?;
            if let Some(token) = &access {
                request = request.bearer_auth(token);
            }

            let response = match request.send().await {
                Ok(response) => response,
                Err(e) => {
                    self.context.notifier.error(messages::NETWORK_FAILURE);
                    return Err(ApiError::Network(e));
                }
            };

            let status = response.status();
            if status.is_success() {
                return Ok(response);
            }

            if status == StatusCode::UNAUTHORIZED {
                if !retried {
                    if let Some(refresh) = self.context.tokens.get(TokenKind::Refresh) {
                        retried = true;
                        match self.refresh_access_token(access, &refresh).await {
                            Ok(()) => continue,
                            Err(refresh_err) => {
                                tracing::warn!(error = %refresh_err, "Token refresh rejected, expiring session");
                                self.expire_session();
                                return Err(ApiError::RefreshFailed(Box::new(refresh_err)));
                            }
                        }
                    }
                }

                let error = unauthorized_error(response).await;
                self.expire_session();
                return Err(error);
            }

            return Err(self.fail(response).await);
        }
    }

    /// Exchange the refresh token for a new access token.
    ///
    /// Concurrent 401 handlers serialize on the gate; a waiter that acquires
    /// it after a peer already replaced the access token skips the duplicate
    /// call. The new access token is persisted to the store, which is what
    /// subsequent requests read their credential from.
    async fn refresh_access_token(
        &self,
        stale_access: Option<String>,
        refresh: &str,
    ) -> Result<(), ApiError> {
        let _gate = self.refresh_gate.lock().await;

        if self.context.tokens.get(TokenKind::Access) != stale_access {
            return Ok(());
        }

        let url = self.url("/users/token/refresh/");
        let response = self
            .refresh_http
            .post(&url)
            .json(&serde_json::json!({ "refresh": refresh }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = read_json(response).await;
            let (_, error) = map_status_error(status, &body);
            return Err(error);
        }

        let payload: RefreshResponse = response.json().await?;
        self.context.tokens.set(
            TokenKind::Access,
            &payload.access,
            self.token_settings.access_ttl(),
        );
        tracing::debug!("Access token refreshed");
        Ok(())
    }

    /// Map a non-401 failure response, emitting its notification.
    async fn fail(&self, response: Response) -> ApiError {
        let status = response.status();
        let body = read_json(response).await;
        let (message, error) = map_status_error(status, &body);
        self.context.notifier.error(&message);
        error
    }

    fn expire_session(&self) {
        self.context.tokens.clear();
        self.context.notifier.error(messages::SESSION_EXPIRED);
        self.context.navigator.navigate(LOGIN_PATH);
    }
}

/// Notification message and typed error for a failure status.
fn map_status_error(status: StatusCode, body: &Value) -> (String, ApiError) {
    let detail = body_detail(body);

    match status {
        StatusCode::UNAUTHORIZED => (
            messages::SESSION_EXPIRED.to_string(),
            ApiError::Unauthorized { detail },
        ),
        StatusCode::FORBIDDEN => (
            detail
                .clone()
                .unwrap_or_else(|| messages::NO_PERMISSION.to_string()),
            ApiError::Forbidden { detail },
        ),
        StatusCode::BAD_REQUEST => {
            let message = detail
                .or_else(|| first_field_error(body))
                .unwrap_or_else(|| messages::BAD_REQUEST.to_string());
            (message.clone(), ApiError::Validation { message })
        }
        _ => (
            detail
                .clone()
                .unwrap_or_else(|| messages::SERVER_ERROR.to_string()),
            ApiError::Server {
                status: status.as_u16(),
                detail,
            },
        ),
    }
}

async fn unauthorized_error(response: Response) -> ApiError {
    let body = read_json(response).await;
    ApiError::Unauthorized {
        detail: body_detail(&body),
    }
}

async fn read_json(response: Response) -> Value {
    response.json::<Value>().await.unwrap_or(Value::Null)
}

fn body_detail(body: &Value) -> Option<String> {
    body.get("detail")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// First message of the first field-level validation error, the way the
/// server reports 400s without a top-level `detail`.
fn first_field_error(body: &Value) -> Option<String> {
    let fields = body.as_object()?;
    fields
        .values()
        .find_map(|value| value.as_array()?.first()?.as_str().map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_error_extraction_prefers_first_message() {
        let body = serde_json::json!({
            "title": ["This field may not be blank.", "Too long."],
            "assignee": ["Invalid pk."]
        });
        let message = first_field_error(&body).unwrap();
        assert!(message == "This field may not be blank." || message == "Invalid pk.");
    }

    #[test]
    fn field_error_extraction_skips_non_array_values() {
        let body = serde_json::json!({ "code": "invalid", "errors": ["broken field"] });
        assert_eq!(first_field_error(&body), Some("broken field".to_string()));
    }

    #[test]
    fn bad_request_falls_back_to_generic_message() {
        let (message, error) = map_status_error(StatusCode::BAD_REQUEST, &Value::Null);
        assert_eq!(message, messages::BAD_REQUEST);
        assert!(matches!(error, ApiError::Validation { .. }));
    }

    #[test]
    fn forbidden_uses_server_detail_when_present() {
        let body = serde_json::json!({ "detail": "You cannot delete this bug" });
        let (message, error) = map_status_error(StatusCode::FORBIDDEN, &body);
        assert_eq!(message, "You cannot delete this bug");
        assert!(matches!(error, ApiError::Forbidden { detail: Some(_) }));
    }

    #[test]
    fn unexpected_status_maps_to_server_error() {
        let (message, error) = map_status_error(StatusCode::BAD_GATEWAY, &Value::Null);
        assert_eq!(message, messages::SERVER_ERROR);
        assert_eq!(error.status(), Some(502));
    }
}
