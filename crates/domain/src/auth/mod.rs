//! Authentication domain types

mod types;

pub use types::{AccessToken, AuthConfig, AuthError, Credentials};
