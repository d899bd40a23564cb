use serde::Deserialize;
use thiserror::Error;

use storefront_core::{FieldErrors, NON_FIELD_ERRORS};

use crate::account::{Account, UserDirectory};

/// Sign-in form exactly as submitted.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl core::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LoginForm")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoginError {
    #[error("Please complete all fields.")]
    MissingFields,

    #[error("Incorrect username or password.")]
    InvalidCredentials,

    #[error("This account is disabled.")]
    Inactive,
}

impl LoginError {
    /// Login failures are reported at form level, never against a field, so
    /// the form does not reveal which half of the credentials was wrong.
    pub fn to_field_errors(&self) -> FieldErrors {
        FieldErrors::single(NON_FIELD_ERRORS, self.to_string())
    }
}

/// Check a sign-in attempt against the directory.
pub fn login(form: &LoginForm, directory: &dyn UserDirectory) -> Result<Account, LoginError> {
    let username = form.username.trim();
    if username.is_empty() || form.password.is_empty() {
        return Err(LoginError::MissingFields);
    }

    let account = directory
        .authenticate(username, &form.password)
        .ok_or(LoginError::InvalidCredentials)?;

    if !account.is_active {
        return Err(LoginError::Inactive);
    }
    Ok(account)
}

/// Where to send the user after signing in. Only same-site absolute paths are
/// honoured; anything else falls back to `default`.
pub fn next_destination<'a>(next: Option<&'a str>, default: &'a str) -> &'a str {
    match next.map(str::trim) {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => path,
        _ => default,
    }
}
