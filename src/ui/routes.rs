//! Route identities and per-route chrome.

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;

/// Client-side routes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Register,
    NotFound,
}

impl Route {
    /// Resolve a location path, ignoring query string, fragment and trailing slash.
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        match path.trim_end_matches('/') {
            "" => Self::Home,
            "/login" => Self::Login,
            "/register" => Self::Register,
            _ => Self::NotFound,
        }
    }

    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Login => "/login",
            Self::Register => "/register",
            Self::NotFound => "/404",
        }
    }

    /// Whether the navbar and footer render on this route.
    ///
    /// The auth pages are full-screen forms without site chrome.
    #[must_use]
    pub fn shows_chrome(self) -> bool {
        !matches!(self, Self::Login | Self::Register)
    }
}
