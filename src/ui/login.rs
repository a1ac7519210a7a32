//! Email + password sign-in form.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use super::routes::Route;
use crate::state::auth::AuthHandle;

/// Inline message for any failed sign-in. Server detail goes to the log only.
pub const LOGIN_FAILED_MESSAGE: &str = "Invalid email or password. Please try again.";

#[derive(Clone)]
pub struct LoginForm {
    auth: AuthHandle,
    pub email: String,
    pub password: String,
    error: Option<String>,
}

impl LoginForm {
    #[must_use]
    pub fn new(auth: AuthHandle) -> Self {
        Self { auth, email: String::new(), password: String::new(), error: None }
    }

    /// Message rendered under the inputs, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// True while an auth operation is in flight; the submit button is
    /// disabled and [`LoginForm::submit`] does nothing.
    #[must_use]
    pub fn busy(&self) -> bool {
        self.auth.state().loading
    }

    fn validate(&self) -> Result<(String, String), &'static str> {
        let email = self.email.trim();
        if email.is_empty() || self.password.is_empty() {
            return Err("Enter both email and password.");
        }
        if !email.contains('@') {
            return Err("Enter a valid email address.");
        }
        Ok((email.to_owned(), self.password.clone()))
    }

    /// Submit the form. Returns the route to navigate to on success.
    pub async fn submit(&mut self) -> Option<Route> {
        if self.busy() {
            tracing::debug!("login submit ignored while busy");
            return None;
        }
        self.error = None;
        let (email, password) = match self.validate() {
            Ok(fields) => fields,
            Err(msg) => {
                self.error = Some(msg.to_owned());
                return None;
            }
        };

        match self.auth.login(&email, &password).await {
            Ok(_) => {
                self.password.clear();
                Some(Route::Home)
            }
            Err(e) => {
                tracing::error!(error = %e, "login failed");
                self.error = Some(LOGIN_FAILED_MESSAGE.to_owned());
                None
            }
        }
    }
}
