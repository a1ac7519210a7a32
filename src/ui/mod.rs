//! Auth-aware UI models.
//!
//! SYSTEM CONTEXT
//! ==============
//! Framework-neutral state behind the login form, registration form and
//! navbar. Each model holds an [`AuthHandle`](crate::state::AuthHandle)
//! subscription and nothing else from the session layer.

pub mod login;
pub mod navbar;
pub mod register;
pub mod routes;

pub use login::LoginForm;
pub use navbar::{MemberMenu, Navbar, NavbarView};
pub use register::RegisterForm;
pub use routes::Route;
