//! Client-side state containers.
//!
//! SYSTEM CONTEXT
//! ==============
//! `auth` owns the login session; UI models subscribe to it through
//! [`auth::AuthHandle`].

pub mod auth;

pub use auth::{AuthHandle, AuthManager, AuthState};
