//! Spoiler Application - Use cases and ports
//!
//! This crate defines the application layer with:
//! - Port traits (interfaces for external dependencies)
//! - Use cases for authentication and the Story endpoints
//! - Application-level error handling

pub mod error;
pub mod ports;
pub mod use_cases;

#[cfg(test)]
mod mock;

pub use error::{ApplicationError, ApplicationResult};
pub use ports::{HttpClient, HttpClientError};
pub use use_cases::{Authenticate, StoryApi};
