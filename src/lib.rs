//! Session-aware client for the shortlink URL-shortening API.
//!
//! ARCHITECTURE
//! ============
//! - `net`: HTTP adapter and wire types for the remote API.
//! - `session`: injected key-value storage and the persisted session keys.
//! - `state`: the auth session manager that owns login state.
//! - `ui`: framework-neutral models for the login/register forms and navbar.
//!
//! Data flows one way: a UI model calls the manager, the manager calls the
//! adapter, then updates the session store and publishes a new
//! [`AuthState`](state::AuthState) to every subscriber.

pub mod config;
pub mod error;
pub mod net;
pub mod session;
pub mod state;
pub mod ui;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use config::ClientConfig;
pub use error::ClientError;
pub use net::{ApiClient, AuthApi};
pub use session::{SessionStore, Storage};
pub use state::{AuthHandle, AuthManager, AuthState};
