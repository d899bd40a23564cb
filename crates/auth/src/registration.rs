//! Sign-up form validation and username availability.

use serde::{Deserialize, Serialize};

use storefront_core::{FieldErrors, FieldMap, ValidationResult};

use crate::account::UserDirectory;

pub const MIN_PASSWORD_CHARS: usize = 8;
pub const MAX_USERNAME_CHARS: usize = 150;

/// Form field names.
pub mod fields {
    pub const USERNAME: &str = "username";
    pub const EMAIL: &str = "email";
    pub const PASSWORD: &str = "password1";
    pub const PASSWORD_CONFIRMATION: &str = "password2";
    pub const FIRST_NAME: &str = "first_name";
    pub const LAST_NAME: &str = "last_name";
}

/// Remote registration error field -> sign-up form field.
pub const AUTH_FIELD_MAP: FieldMap = FieldMap::new(&[
    ("username", fields::USERNAME),
    ("email", fields::EMAIL),
    ("password", fields::PASSWORD),
    ("password1", fields::PASSWORD),
    ("password2", fields::PASSWORD_CONFIRMATION),
    ("first_name", fields::FIRST_NAME),
    ("last_name", fields::LAST_NAME),
]);

/// Sign-up form exactly as submitted.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RegistrationForm {
    pub username: String,
    pub email: String,
    #[serde(alias = "password1")]
    pub password: String,
    pub password2: String,
    pub first_name: String,
    pub last_name: String,
}

/// A sign-up that passed validation, ready to hand to the directory.
#[derive(Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

// Passwords never reach logs.
impl core::fmt::Debug for RegistrationForm {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RegistrationForm")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("password2", &"<redacted>")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .finish()
    }
}

impl core::fmt::Debug for NewAccount {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NewAccount")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .finish()
    }
}

/// Validate a sign-up form. Every rule is checked; uniqueness is asked of the
/// directory only for values that are otherwise well-formed.
pub fn validate_registration(
    form: &RegistrationForm,
    directory: &dyn UserDirectory,
) -> ValidationResult<NewAccount> {
    let mut errors = FieldErrors::new();

    let username = form.username.trim();
    if username.is_empty() {
        errors.add(fields::USERNAME, "A username is required.");
    } else if !is_valid_username(username) {
        errors.add(
            fields::USERNAME,
            format!(
                "Enter a valid username of at most {MAX_USERNAME_CHARS} characters. \
                 This value may contain only letters, numbers, and @/./+/-/_ characters."
            ),
        );
    } else if directory.username_exists(username) {
        errors.add(fields::USERNAME, "This username is already taken.");
    }

    let email = form.email.trim();
    if email.is_empty() {
        errors.add(fields::EMAIL, "An email address is required.");
    } else if !is_valid_email(email) {
        errors.add(fields::EMAIL, "Enter a valid email address.");
    } else if directory.email_exists(email) {
        errors.add(fields::EMAIL, "This email address is already registered.");
    }

    if form.password.is_empty() {
        errors.add(fields::PASSWORD, "A password is required.");
    } else if form.password.chars().count() < MIN_PASSWORD_CHARS {
        errors.add(
            fields::PASSWORD,
            format!("The password must be at least {MIN_PASSWORD_CHARS} characters long."),
        );
    }

    if form.password != form.password2 {
        errors.add(fields::PASSWORD_CONFIRMATION, "The passwords do not match.");
    }

    errors.into_result(NewAccount {
        username: username.to_string(),
        email: email.to_string(),
        password: form.password.clone(),
        first_name: form.first_name.trim().to_string(),
        last_name: form.last_name.trim().to_string(),
    })
}

/// Answer to a username availability check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Availability {
    pub available: bool,
    pub message: String,
}

pub fn check_username(raw: &str, directory: &dyn UserDirectory) -> ValidationResult<Availability> {
    let username = raw.trim();
    if username.is_empty() {
        return Err(FieldErrors::single(fields::USERNAME, "A username must be provided."));
    }

    let taken = directory.username_exists(username);
    Ok(Availability {
        available: !taken,
        message: if taken {
            "Username is not available.".to_string()
        } else {
            "Username is available.".to_string()
        },
    })
}

fn is_valid_username(username: &str) -> bool {
    username.chars().count() <= MAX_USERNAME_CHARS
        && username
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
}

fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.rsplit_once('@') else {
        return false;
    };
    !local.is_empty()
        && !email.chars().any(char::is_whitespace)
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}
