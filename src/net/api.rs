//! REST API adapter for the shortlink server.
//!
//! One method per endpoint. Every call resolves to `Result<T, ClientError>`:
//! 2xx bodies are parsed as JSON (only `/health` may answer in plain text),
//! non-2xx bodies are mined for a `message` field, and transport failures
//! surface as `ClientError::Network`. No retries, no timeouts.
//!
//! AUTH
//! ====
//! The bearer token is read from the [`SessionStore`] at request time, so a
//! token written by login is used by the very next call. Anonymous endpoints
//! (health, shorten, login, register, refresh) never carry it.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use reqwest::Method;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::types::{
    AuthResponse, HealthStatus, LoginRequest, PasswordChange, RefreshRequest, RefreshResponse, RegisterRequest,
    ShortenRequest, User, UserId, UserUpdate,
};
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::session::SessionStore;

// =============================================================================
// AUTH API TRAIT
// =============================================================================

/// The endpoints the auth session manager depends on. Enables mocking in tests.
#[async_trait::async_trait]
pub trait AuthApi: Send + Sync {
    /// `POST /auth/login`.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] for transport, status, or parse failures.
    async fn login(&self, credentials: &LoginRequest) -> Result<AuthResponse, ClientError>;

    /// `POST /users`.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] for transport, status, or parse failures.
    async fn register(&self, registration: &RegisterRequest) -> Result<AuthResponse, ClientError>;

    /// `POST /auth/logout`.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] for transport, status, or parse failures.
    async fn logout(&self) -> Result<serde_json::Value, ClientError>;

    /// `POST /auth/refresh`.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] for transport, status, or parse failures.
    async fn refresh_token(&self, refresh_token: &str) -> Result<RefreshResponse, ClientError>;

    /// `GET /users/{id}` for the stored user id.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotAuthenticated`] when no user id is stored,
    /// otherwise transport, status, or parse failures.
    async fn current_user(&self) -> Result<User, ClientError>;

    /// `PUT /users/{id}`.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] for transport, status, or parse failures.
    async fn update_user(&self, id: &UserId, update: &UserUpdate) -> Result<User, ClientError>;

    /// `PUT /users/{id}/password`.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] for transport, status, or parse failures.
    async fn change_password(&self, id: &UserId, change: &PasswordChange) -> Result<serde_json::Value, ClientError>;
}

// =============================================================================
// CLIENT
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Auth {
    Anonymous,
    Bearer,
}

struct RawResponse {
    status: u16,
    content_type: Option<String>,
    body: String,
}

/// HTTP adapter over `reqwest`.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionStore,
}

impl ApiClient {
    /// Build a client rooted at `base_url` reading tokens from `session`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::HttpClientBuild`] if the HTTP client fails to build.
    pub fn new(base_url: impl Into<String>, session: SessionStore) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ClientError::HttpClientBuild(e.to_string()))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url, session })
    }

    /// Build a client from parsed config.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::HttpClientBuild`] if the HTTP client fails to build.
    pub fn from_config(config: &ClientConfig, session: SessionStore) -> Result<Self, ClientError> {
        Self::new(config.base_url.clone(), session)
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /health`. Accepts a JSON or plain-text body.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] for transport or status failures, or a parse
    /// failure when the body claims JSON but is not.
    pub async fn check_health(&self) -> Result<HealthStatus, ClientError> {
        let raw = Self::execute(self.request(Method::GET, "/health", Auth::Anonymous)).await?;
        parse_health_body(raw.content_type.as_deref(), &raw.body)
    }

    /// `POST /shorten`.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] for transport, status, or parse failures.
    pub async fn shorten_url(&self, request: &ShortenRequest) -> Result<serde_json::Value, ClientError> {
        self.send_json(Method::POST, "/shorten", Auth::Anonymous, Some(request)).await
    }

    /// `GET /users`.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] for transport, status, or parse failures.
    pub async fn list_users(&self) -> Result<Vec<User>, ClientError> {
        self.send_json::<_, ()>(Method::GET, "/users", Auth::Bearer, None).await
    }

    /// `DELETE /users/{id}`.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] for transport, status, or parse failures.
    pub async fn delete_user(&self, id: &UserId) -> Result<serde_json::Value, ClientError> {
        self.send_json::<_, ()>(Method::DELETE, &user_endpoint(id), Auth::Bearer, None).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn request(&self, method: Method, path: &str, auth: Auth) -> reqwest::RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match (auth, self.session.token()) {
            (Auth::Bearer, Some(token)) => builder.bearer_auth(token),
            _ => builder,
        }
    }

    async fn send_json<T, B>(&self, method: Method, path: &str, auth: Auth, body: Option<&B>) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        tracing::debug!(%method, path, authed = (auth == Auth::Bearer), "api request");
        let mut builder = self.request(method, path, auth);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let raw = Self::execute(builder).await?;
        parse_json_body(raw.status, &raw.body)
    }

    async fn execute(builder: reqwest::RequestBuilder) -> Result<RawResponse, ClientError> {
        let response = builder.send().await.map_err(|e| ClientError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = response.text().await.map_err(|e| ClientError::Network(e.to_string()))?;

        if !(200..300).contains(&status) {
            let message = error_message(status, &body);
            tracing::debug!(status, %message, "api request rejected");
            return Err(ClientError::Request { status, message });
        }

        Ok(RawResponse { status, content_type, body })
    }
}

#[async_trait::async_trait]
impl AuthApi for ApiClient {
    async fn login(&self, credentials: &LoginRequest) -> Result<AuthResponse, ClientError> {
        self.send_json(Method::POST, "/auth/login", Auth::Anonymous, Some(credentials)).await
    }

    async fn register(&self, registration: &RegisterRequest) -> Result<AuthResponse, ClientError> {
        self.send_json(Method::POST, "/users", Auth::Anonymous, Some(registration)).await
    }

    async fn logout(&self) -> Result<serde_json::Value, ClientError> {
        self.send_json::<_, ()>(Method::POST, "/auth/logout", Auth::Bearer, None).await
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<RefreshResponse, ClientError> {
        let body = RefreshRequest { refresh_token: refresh_token.to_owned() };
        self.send_json(Method::POST, "/auth/refresh", Auth::Anonymous, Some(&body)).await
    }

    async fn current_user(&self) -> Result<User, ClientError> {
        let id = self.session.user_id().ok_or(ClientError::NotAuthenticated)?;
        self.send_json::<_, ()>(Method::GET, &user_endpoint(&UserId::new(id)), Auth::Bearer, None)
            .await
    }

    async fn update_user(&self, id: &UserId, update: &UserUpdate) -> Result<User, ClientError> {
        self.send_json(Method::PUT, &user_endpoint(id), Auth::Bearer, Some(update)).await
    }

    async fn change_password(&self, id: &UserId, change: &PasswordChange) -> Result<serde_json::Value, ClientError> {
        self.send_json(Method::PUT, &user_password_endpoint(id), Auth::Bearer, Some(change)).await
    }
}

// =============================================================================
// PARSING
// =============================================================================

fn user_endpoint(id: &UserId) -> String {
    format!("/users/{id}")
}

fn user_password_endpoint(id: &UserId) -> String {
    format!("/users/{id}/password")
}

/// Human-readable message for a non-2xx response.
///
/// Prefers a JSON `message` string, then `error`, then `Error: <status>`.
fn error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["message", "error"].into_iter().find_map(|field| {
                value
                    .get(field)
                    .and_then(serde_json::Value::as_str)
                    .map(str::trim)
                    .filter(|msg| !msg.is_empty())
                    .map(str::to_owned)
            })
        })
        .unwrap_or_else(|| format!("Error: {status}"))
}

/// Parse a 2xx body as JSON. `204 No Content` parses as JSON `null`.
fn parse_json_body<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, ClientError> {
    let body = if status == 204 && body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(body).map_err(|e| ClientError::Parse(e.to_string()))
}

fn parse_health_body(content_type: Option<&str>, body: &str) -> Result<HealthStatus, ClientError> {
    let is_json = content_type.is_some_and(|ct| ct.contains("application/json"));
    if is_json {
        serde_json::from_str(body)
            .map(HealthStatus::Json)
            .map_err(|e| ClientError::Parse(e.to_string()))
    } else {
        Ok(HealthStatus::Text(body.to_owned()))
    }
}
