//! Story resource types and the fixed API contract strings.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Path segments of the Story API endpoints, relative to the base URL.
pub mod endpoints {
    /// `POST /User/Authentication`
    pub const AUTHENTICATE: [&str; 2] = ["User", "Authentication"];
    /// `POST /Story/Create`
    pub const CREATE: [&str; 2] = ["Story", "Create"];
    /// `PUT /Story/Edit/{id}`
    pub const EDIT: [&str; 2] = ["Story", "Edit"];
    /// `GET /Story/All`
    pub const LIST: [&str; 2] = ["Story", "All"];
    /// `DELETE /Story/Delete/{id}`
    pub const DELETE: [&str; 2] = ["Story", "Delete"];
}

/// Messages the server returns in the `msg` field.
pub mod messages {
    /// Create succeeded.
    pub const CREATED: &str = "Successfully created!";
    /// Edit succeeded.
    pub const EDITED: &str = "Successfully edited";
    /// Edit targeted an unknown story.
    pub const NOT_FOUND: &str = "No spoilers...";
    /// Delete succeeded.
    pub const DELETED: &str = "Deleted successfully!";
    /// Delete targeted an unknown story.
    pub const DELETE_FAILED: &str = "Unable to delete this story spoiler!";
}

/// Server-assigned story identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoryId(String);

impl StoryId {
    /// Identifier that is never issued by the server.
    pub const NON_EXISTING: &'static str = "non-existing-id";

    /// Wraps an identifier, rejecting blank values.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidIdentifier` if `id` is empty or whitespace.
    pub fn new(id: impl Into<String>) -> DomainResult<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(DomainError::InvalidIdentifier("story id is empty".to_string()));
        }
        Ok(Self(id))
    }

    /// The literal identifier used by the negative-path steps.
    #[must_use]
    pub fn non_existing() -> Self {
        Self(Self::NON_EXISTING.to_string())
    }

    /// Returns the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Request body for create and edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StoryDraft {
    /// Story title
    #[serde(alias = "Title")]
    pub title: String,
    /// Story description (the spoiler itself)
    #[serde(alias = "Description")]
    pub description: String,
}

impl StoryDraft {
    /// Creates a draft.
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    /// A draft with both fields empty, which the server must reject.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns true if both fields are non-empty.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.title.is_empty() && !self.description.is_empty()
    }
}

/// Response body shared by the create, edit and delete endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ApiMessage {
    /// Identifier of the created story (create only)
    #[serde(rename = "storyId", default, skip_serializing_if = "Option::is_none")]
    pub story_id: Option<String>,
    /// Outcome message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
}

impl ApiMessage {
    /// Creates a message-only body.
    #[must_use]
    pub fn message(msg: impl Into<String>) -> Self {
        Self {
            story_id: None,
            msg: Some(msg.into()),
        }
    }

    /// Creates the body returned by a successful create.
    #[must_use]
    pub fn created(story_id: impl Into<String>) -> Self {
        Self {
            story_id: Some(story_id.into()),
            msg: Some(messages::CREATED.to_string()),
        }
    }

    /// Returns the story id if present and non-blank.
    #[must_use]
    pub fn story_id(&self) -> Option<StoryId> {
        self.story_id.clone().and_then(|id| StoryId::new(id).ok())
    }
}
