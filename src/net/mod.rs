//! Networking modules for the shortlink REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` issues HTTP calls and normalizes responses, `types` defines the wire
//! schema shared with the server.

pub mod api;
pub mod types;

pub use api::{ApiClient, AuthApi};
