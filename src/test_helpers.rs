//! Shared test fixtures: a scripted [`AuthApi`] and canned users.

use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use crate::error::ClientError;
use crate::net::api::AuthApi;
use crate::net::types::{
    AuthResponse, LoginRequest, PasswordChange, RefreshResponse, RegisterRequest, User, UserId, UserUpdate,
};
use crate::session::SessionStore;
use crate::state::auth::AuthManager;

/// Scripted reply: `Ok` value, HTTP failure `(status, message)`, or a
/// transport failure when the status is 0.
pub(crate) type Reply<T> = Result<T, (u16, &'static str)>;

fn into_result<T: Clone>(reply: &Reply<T>) -> Result<T, ClientError> {
    match reply {
        Ok(value) => Ok(value.clone()),
        Err((0, msg)) => Err(ClientError::Network((*msg).to_owned())),
        Err((status, msg)) => Err(ClientError::Request { status: *status, message: (*msg).to_owned() }),
    }
}

pub(crate) struct MockApi {
    pub(crate) login: Reply<AuthResponse>,
    pub(crate) register: Reply<AuthResponse>,
    pub(crate) logout: Reply<serde_json::Value>,
    pub(crate) refresh: Reply<RefreshResponse>,
    pub(crate) current_user: Reply<User>,
    pub(crate) update_user: Reply<User>,
    pub(crate) change_password: Reply<serde_json::Value>,
    pub(crate) login_delay: Option<Duration>,
    pub(crate) current_user_delay: Option<Duration>,
    pub(crate) calls: StdMutex<Vec<&'static str>>,
}

impl MockApi {
    pub(crate) fn new() -> Self {
        Self {
            login: Err((0, "unscripted")),
            register: Err((0, "unscripted")),
            logout: Ok(serde_json::json!({ "ok": true })),
            refresh: Err((0, "unscripted")),
            current_user: Err((0, "unscripted")),
            update_user: Err((0, "unscripted")),
            change_password: Ok(serde_json::json!({ "ok": true })),
            login_delay: None,
            current_user_delay: None,
            calls: StdMutex::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait::async_trait]
impl AuthApi for MockApi {
    async fn login(&self, _credentials: &LoginRequest) -> Result<AuthResponse, ClientError> {
        self.record("login");
        if let Some(delay) = self.login_delay {
            tokio::time::sleep(delay).await;
        }
        into_result(&self.login)
    }

    async fn register(&self, _registration: &RegisterRequest) -> Result<AuthResponse, ClientError> {
        self.record("register");
        into_result(&self.register)
    }

    async fn logout(&self) -> Result<serde_json::Value, ClientError> {
        self.record("logout");
        into_result(&self.logout)
    }

    async fn refresh_token(&self, _refresh_token: &str) -> Result<RefreshResponse, ClientError> {
        self.record("refresh");
        into_result(&self.refresh)
    }

    async fn current_user(&self) -> Result<User, ClientError> {
        self.record("current_user");
        if let Some(delay) = self.current_user_delay {
            tokio::time::sleep(delay).await;
        }
        into_result(&self.current_user)
    }

    async fn update_user(&self, _id: &UserId, _update: &UserUpdate) -> Result<User, ClientError> {
        self.record("update_user");
        into_result(&self.update_user)
    }

    async fn change_password(&self, _id: &UserId, _change: &PasswordChange) -> Result<serde_json::Value, ClientError> {
        self.record("change_password");
        into_result(&self.change_password)
    }
}

pub(crate) fn user(id: i64, username: &str) -> User {
    User { id: UserId::from(id), username: Some(username.to_owned()), email: None, avatar: None }
}

pub(crate) fn auth_response(token: &str, user: User) -> AuthResponse {
    AuthResponse { access_token: token.to_owned(), user, refresh_token: None }
}

/// Build a restored manager over `api` and `session`.
pub(crate) async fn manager_with(api: MockApi, session: SessionStore) -> (Arc<AuthManager>, Arc<MockApi>) {
    let api = Arc::new(api);
    let manager = AuthManager::init(api.clone(), session).await;
    (manager, api)
}
