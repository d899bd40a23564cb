//! Accounts and the directory that stores them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered account as seen by the storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    pub date_joined: DateTime<Utc>,
}

impl Account {
    /// Name used when greeting the user: first name, else username.
    pub fn display_name(&self) -> &str {
        if self.first_name.trim().is_empty() {
            &self.username
        } else {
            &self.first_name
        }
    }
}

/// Public view of an account returned by profile lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub date_joined: DateTime<Utc>,
}

impl From<&Account> for Profile {
    fn from(account: &Account) -> Self {
        Self {
            username: account.username.clone(),
            email: account.email.clone(),
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            date_joined: account.date_joined,
        }
    }
}

/// Account storage and credential checks.
///
/// Password hashing and persistence belong to the implementor; validation in
/// this crate only asks questions through this trait.
pub trait UserDirectory {
    fn username_exists(&self, username: &str) -> bool;

    fn email_exists(&self, email: &str) -> bool;

    /// The account matching these credentials, active or not.
    fn authenticate(&self, username: &str, password: &str) -> Option<Account>;
}
