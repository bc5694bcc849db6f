//! Spoiler Domain - Core types
//!
//! This crate defines the domain model for the Story Spoiler API suite.
//! All types here are pure Rust with no I/O dependencies.

pub mod auth;
pub mod error;
pub mod request;
pub mod response;
pub mod story;
pub mod testing;

pub use auth::{AccessToken, AuthConfig, AuthError, Credentials};
pub use error::{DomainError, DomainResult};
pub use story::{ApiMessage, StoryDraft, StoryId};
pub use testing::{Assertion, AssertionResult, StatusExpectation, TestResults, TestSuite};
