//! Navigation bar with the user menu.

#[cfg(test)]
#[path = "navbar_test.rs"]
mod navbar_test;

use super::routes::Route;
use crate::error::ClientError;
use crate::state::auth::AuthHandle;

/// Avatar shown when the user has none.
pub const DEFAULT_AVATAR: &str = "https://i.pravatar.cc/150?img=5";
const PASSWORD_MASK: &str = "••••••••";

/// What the navbar renders for the current auth state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavbarView {
    /// Signed out: Login and Register links.
    Guest,
    /// Signed in: avatar button with a dropdown.
    Member(MemberMenu),
}

impl NavbarView {
    /// Links rendered beside the brand.
    #[must_use]
    pub fn links(&self) -> Vec<Route> {
        match self {
            Self::Guest => vec![Route::Home, Route::Login, Route::Register],
            Self::Member(_) => vec![Route::Home],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberMenu {
    pub avatar_url: String,
    pub username: String,
    pub email: String,
    pub password_mask: &'static str,
    pub dropdown_open: bool,
}

pub struct Navbar {
    auth: AuthHandle,
    dropdown_open: bool,
}

impl Navbar {
    #[must_use]
    pub fn new(auth: AuthHandle) -> Self {
        Self { auth, dropdown_open: false }
    }

    #[must_use]
    pub fn view(&self) -> NavbarView {
        let state = self.auth.state();
        let Some(user) = state.user else {
            return NavbarView::Guest;
        };
        NavbarView::Member(MemberMenu {
            avatar_url: user.avatar.filter(|a| !a.is_empty()).unwrap_or_else(|| DEFAULT_AVATAR.to_owned()),
            username: user.username.filter(|u| !u.is_empty()).unwrap_or_else(|| "Guest".to_owned()),
            email: user.email.filter(|e| !e.is_empty()).unwrap_or_else(|| "N/A".to_owned()),
            password_mask: PASSWORD_MASK,
            dropdown_open: self.dropdown_open,
        })
    }

    pub fn toggle_dropdown(&mut self) {
        self.dropdown_open = !self.dropdown_open;
    }

    /// Close the dropdown, e.g. on a click outside it.
    pub fn close_dropdown(&mut self) {
        self.dropdown_open = false;
    }

    /// Close the menu, sign out, and return where to navigate.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::SessionClosed`] if the auth manager is gone.
    pub async fn logout(&mut self) -> Result<Route, ClientError> {
        self.close_dropdown();
        self.auth.logout().await?;
        Ok(Route::Login)
    }
}
