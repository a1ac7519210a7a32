//! Auth-session state for the current user.
//!
//! SYSTEM CONTEXT
//! ==============
//! `AuthManager` is the single owner of [`AuthState`] and the only writer of
//! the [`SessionStore`]. UI models hold an [`AuthHandle`]: a weak reference
//! to the manager plus a `watch` receiver, so they observe every published
//! state and can invoke operations without keeping the manager alive.
//!
//! CONCURRENCY
//! ===========
//! State-mutating operations take `op_lock` for their whole duration, so an
//! overlapping login and logout run one after the other in call order. Each
//! operation runs on its own task: dropping the caller's future (a timeout, a
//! `select!`, an aborted UI task) does not cancel it, and it still publishes
//! its outcome. `loading` therefore never outlives the work it reports.
//!
//! FAILURE POLICY
//! ==============
//! Restore swallows every error into "signed out" and clears the store.
//! Login/register/refresh surface errors unchanged. Logout resets local state
//! unconditionally and only logs a failed remote call.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::sync::{Arc, Weak};

use tokio::sync::{Mutex, watch};

use crate::error::ClientError;
use crate::net::api::AuthApi;
use crate::net::types::{AuthResponse, LoginRequest, PasswordChange, RegisterRequest, User, UserUpdate};
use crate::session::SessionStore;

/// Authentication state tracking the current user and loading status.
///
/// `loading` is true while any auth operation is in flight and before the
/// initial restore settles; consumers must not treat the state as final then.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<User>,
    pub loading: bool,
}

impl AuthState {
    /// State before restoration has run.
    #[must_use]
    pub fn pending() -> Self {
        Self { user: None, loading: true }
    }

    #[must_use]
    pub fn signed_out() -> Self {
        Self { user: None, loading: false }
    }

    #[must_use]
    pub fn signed_in(user: User) -> Self {
        Self { user: Some(user), loading: false }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

// =============================================================================
// MANAGER
// =============================================================================

pub struct AuthManager {
    api: Arc<dyn AuthApi>,
    session: SessionStore,
    state: watch::Sender<AuthState>,
    op_lock: Arc<Mutex<()>>,
}

impl AuthManager {
    fn new(api: Arc<dyn AuthApi>, session: SessionStore) -> Self {
        let (state, _) = watch::channel(AuthState::pending());
        Self { api, session, state, op_lock: Arc::new(Mutex::new(())) }
    }

    /// Create a shared manager and run session restoration once.
    ///
    /// Restoration keeps running if this future is dropped; the manager then
    /// lives until it publishes.
    pub async fn init(api: Arc<dyn AuthApi>, session: SessionStore) -> Arc<Self> {
        let manager = Arc::new(Self::new(api, session));
        manager.restore().await;
        manager
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// Subscription handle for UI models.
    #[must_use]
    pub fn handle(self: &Arc<Self>) -> AuthHandle {
        AuthHandle { manager: Arc::downgrade(self), state: self.subscribe() }
    }

    /// Read access to the persisted session.
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    async fn restore(self: &Arc<Self>) {
        let outcome = self
            .run("restore", |this| async move {
                this.restore_stored_session().await;
                Ok::<_, ClientError>(())
            })
            .await;
        if let Err(e) = outcome {
            tracing::warn!(error = %e, "session restore did not finish");
        }
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Propagates the adapter error unchanged; the previous session, if any,
    /// is kept.
    pub async fn login(self: &Arc<Self>, email: &str, password: &str) -> Result<User, ClientError> {
        let credentials = LoginRequest { email: email.to_owned(), password: password.to_owned() };
        self.run("login", move |this| async move {
            this.set_loading(true);
            let result = this.api.login(&credentials).await;
            this.finish_sign_in(result, "login")
        })
        .await
    }

    /// Create an account and sign in with it.
    ///
    /// # Errors
    ///
    /// Propagates the adapter error unchanged; the previous session, if any,
    /// is kept.
    pub async fn register(
        self: &Arc<Self>,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, ClientError> {
        let registration =
            RegisterRequest { username: username.to_owned(), email: email.to_owned(), password: password.to_owned() };
        self.run("register", move |this| async move {
            this.set_loading(true);
            let result = this.api.register(&registration).await;
            this.finish_sign_in(result, "register")
        })
        .await
    }

    /// Sign out. Local state is always reset, whatever the server says.
    pub async fn logout(self: &Arc<Self>) {
        let outcome = self
            .run("logout", |this| async move {
                this.sign_out().await;
                Ok::<_, ClientError>(())
            })
            .await;
        if let Err(e) = outcome {
            tracing::warn!(error = %e, "logout did not finish");
        }
    }

    /// Exchange the stored refresh token for a new access token.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotAuthenticated`] without a stored refresh
    /// token, otherwise propagates the adapter error. State is unchanged on
    /// failure.
    pub async fn refresh(self: &Arc<Self>) -> Result<(), ClientError> {
        self.run("refresh", |this| async move { this.rotate_tokens().await }).await
    }

    /// Update the signed-in user's profile and publish the server's copy.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotAuthenticated`] when signed out, otherwise
    /// propagates the adapter error.
    pub async fn update_profile(self: &Arc<Self>, update: UserUpdate) -> Result<User, ClientError> {
        self.run("update_profile", move |this| async move { this.apply_profile_update(update).await }).await
    }

    /// Change the signed-in user's password.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotAuthenticated`] when signed out, otherwise
    /// propagates the adapter error.
    pub async fn change_password(self: &Arc<Self>, old_password: &str, new_password: &str) -> Result<(), ClientError> {
        let change = PasswordChange { old_password: old_password.to_owned(), new_password: new_password.to_owned() };
        self.run("change_password", move |this| async move { this.apply_password_change(change).await }).await
    }

    /// Run one operation on its own task while holding `op_lock`.
    ///
    /// The lock is taken before the task is spawned, so operations start in
    /// call order. Once spawned, the operation completes and publishes even
    /// if the caller stops waiting.
    async fn run<T, F, Fut>(self: &Arc<Self>, op: &'static str, body: F) -> Result<T, ClientError>
    where
        F: FnOnce(Arc<Self>) -> Fut,
        Fut: Future<Output = Result<T, ClientError>> + Send + 'static,
        T: Send + 'static,
    {
        let permit = Arc::clone(&self.op_lock).lock_owned().await;
        let work = body(Arc::clone(self));
        let task = tokio::spawn(async move {
            let result = work.await;
            drop(permit);
            result
        });

        task.await.map_err(|e| {
            tracing::error!(op, error = %e, "auth operation task failed");
            ClientError::Interrupted(e.to_string())
        })?
    }

    async fn rotate_tokens(&self) -> Result<(), ClientError> {
        let refresh_token = self.session.refresh_token().ok_or(ClientError::NotAuthenticated)?;

        self.set_loading(true);
        let result = self.api.refresh_token(&refresh_token).await;
        self.set_loading(false);

        let tokens = result?;
        self.session.set_token(&tokens.access_token);
        if let Some(rotated) = tokens.refresh_token.as_deref() {
            self.session.set_refresh_token(Some(rotated));
        }
        tracing::info!("access token refreshed");
        Ok(())
    }

    async fn apply_profile_update(&self, update: UserUpdate) -> Result<User, ClientError> {
        let current = self.state().user.ok_or(ClientError::NotAuthenticated)?;
        if update.is_empty() {
            return Ok(current);
        }

        let user = self.api.update_user(&current.id, &update).await?;
        self.session.set_user_id(user.id.as_str());
        self.state.send_modify(|state| state.user = Some(user.clone()));
        tracing::info!(user_id = %user.id, "profile updated");
        Ok(user)
    }

    async fn apply_password_change(&self, change: PasswordChange) -> Result<(), ClientError> {
        let current = self.state().user.ok_or(ClientError::NotAuthenticated)?;
        self.api.change_password(&current.id, &change).await?;
        tracing::info!(user_id = %current.id, "password changed");
        Ok(())
    }

    async fn sign_out(&self) {
        self.set_loading(true);
        if let Err(e) = self.api.logout().await {
            tracing::warn!(error = %e, "remote logout failed; signing out locally");
        }
        self.session.clear();
        self.publish(AuthState::signed_out());
        tracing::info!("signed out");
    }

    async fn restore_stored_session(&self) {
        if self.session.token().is_none() {
            tracing::debug!("no stored session");
            self.publish(AuthState::signed_out());
            return;
        }

        self.set_loading(true);
        match self.validate_stored_session().await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "session restored");
                self.publish(AuthState::signed_in(user));
            }
            Err(e) => {
                tracing::info!(error = %e, "stored session discarded");
                self.session.clear();
                self.publish(AuthState::signed_out());
            }
        }
    }

    async fn validate_stored_session(&self) -> Result<User, ClientError> {
        self.api.current_user().await.map_err(|e| {
            tracing::debug!(error = %e, "profile fetch failed");
            ClientError::AuthExpired
        })
    }

    fn finish_sign_in(&self, result: Result<AuthResponse, ClientError>, op: &'static str) -> Result<User, ClientError> {
        match result {
            Ok(response) => {
                self.session.set_token(&response.access_token);
                self.session.set_user_id(response.user.id.as_str());
                self.session.set_refresh_token(response.refresh_token.as_deref());
                tracing::info!(op, user_id = %response.user.id, "signed in");
                self.publish(AuthState::signed_in(response.user.clone()));
                Ok(response.user)
            }
            Err(e) => {
                tracing::debug!(op, error = %e, "sign-in rejected");
                self.set_loading(false);
                Err(e)
            }
        }
    }

    fn publish(&self, next: AuthState) {
        self.state.send_replace(next);
    }

    fn set_loading(&self, loading: bool) {
        self.state.send_if_modified(|state| {
            let changed = state.loading != loading;
            state.loading = loading;
            changed
        });
    }
}

// =============================================================================
// HANDLE
// =============================================================================

/// A UI consumer's view of the auth session.
///
/// Holds no ownership of the manager; operations fail with
/// [`ClientError::SessionClosed`] once it is gone.
#[derive(Clone)]
pub struct AuthHandle {
    manager: Weak<AuthManager>,
    state: watch::Receiver<AuthState>,
}

impl AuthHandle {
    /// Latest published state.
    #[must_use]
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    /// Wait for the next published state.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::SessionClosed`] if the manager was dropped.
    pub async fn changed(&mut self) -> Result<AuthState, ClientError> {
        self.state.changed().await.map_err(|_| ClientError::SessionClosed)?;
        Ok(self.state.borrow_and_update().clone())
    }

    /// Wait until no auth operation is in flight.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::SessionClosed`] if the manager was dropped first.
    pub async fn settled(&mut self) -> Result<AuthState, ClientError> {
        let state = self.state.wait_for(|s| !s.loading).await.map_err(|_| ClientError::SessionClosed)?;
        Ok((*state).clone())
    }

    /// # Errors
    ///
    /// See [`AuthManager::login`].
    pub async fn login(&self, email: &str, password: &str) -> Result<User, ClientError> {
        self.manager()?.login(email, password).await
    }

    /// # Errors
    ///
    /// See [`AuthManager::register`].
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<User, ClientError> {
        self.manager()?.register(username, email, password).await
    }

    /// # Errors
    ///
    /// Only [`ClientError::SessionClosed`]; remote failures are absorbed.
    pub async fn logout(&self) -> Result<(), ClientError> {
        self.manager()?.logout().await;
        Ok(())
    }

    fn manager(&self) -> Result<Arc<AuthManager>, ClientError> {
        self.manager.upgrade().ok_or(ClientError::SessionClosed)
    }
}
