//! Use cases
//!
//! Each use case wraps one interaction with the Story API.

mod authenticate;
mod story_api;

pub use authenticate::Authenticate;
pub use story_api::StoryApi;
