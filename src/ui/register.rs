//! Account registration form.

#[cfg(test)]
#[path = "register_test.rs"]
mod register_test;

use super::routes::Route;
use crate::state::auth::AuthHandle;

#[derive(Clone)]
pub struct RegisterForm {
    auth: AuthHandle,
    pub username: String,
    pub email: String,
    pub password: String,
    error: Option<String>,
}

impl RegisterForm {
    #[must_use]
    pub fn new(auth: AuthHandle) -> Self {
        Self { auth, username: String::new(), email: String::new(), password: String::new(), error: None }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// True while an auth operation is in flight.
    #[must_use]
    pub fn busy(&self) -> bool {
        self.auth.state().loading
    }

    fn validate(&self) -> Result<(), &'static str> {
        if self.username.trim().is_empty() || self.email.trim().is_empty() || self.password.is_empty() {
            return Err("Fill in username, email and password.");
        }
        if !self.email.contains('@') {
            return Err("Enter a valid email address.");
        }
        Ok(())
    }

    /// Submit the form. Returns the route to navigate to on success.
    ///
    /// Server rejections (e.g. a taken email) are shown verbatim.
    pub async fn submit(&mut self) -> Option<Route> {
        if self.busy() {
            tracing::debug!("registration submit ignored while busy");
            return None;
        }
        self.error = None;
        if let Err(msg) = self.validate() {
            self.error = Some(msg.to_owned());
            return None;
        }

        match self.auth.register(self.username.trim(), self.email.trim(), &self.password).await {
            Ok(_) => {
                self.password.clear();
                Some(Route::Home)
            }
            Err(e) => {
                tracing::error!(error = %e, "registration failed");
                self.error = Some(e.to_string());
                None
            }
        }
    }
}
