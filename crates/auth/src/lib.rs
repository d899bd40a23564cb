//! `storefront-auth` — account rules for the storefront: sign-up, sign-in and
//! username availability.
//!
//! This crate is decoupled from HTTP, sessions and storage; accounts are
//! reached through the [`UserDirectory`] trait.

pub mod account;
pub mod login;
pub mod registration;

pub use account::{Account, Profile, UserDirectory};
pub use login::{LoginError, LoginForm, login, next_destination};
pub use registration::{
    AUTH_FIELD_MAP, Availability, NewAccount, RegistrationForm, check_username, validate_registration,
};
