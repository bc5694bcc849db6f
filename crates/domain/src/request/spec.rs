//! Request specification type

use url::Url;
use uuid::Uuid;

use super::{HttpMethod, RequestBody};
use crate::auth::AuthConfig;
use crate::error::{DomainError, DomainResult};

/// Complete specification for an HTTP request against the Story API.
///
/// The path is kept as a list of raw segments and resolved against the
/// configured base URL at send time, so identifiers coming back from the
/// server are percent-encoded rather than spliced into a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    /// Unique identifier, logged with each request
    pub id: Uuid,
    /// Human-readable name used in logs
    pub name: String,
    /// HTTP method
    pub method: HttpMethod,
    /// Path segments relative to the base URL
    pub path: Vec<String>,
    /// Request body
    pub body: RequestBody,
    /// Authentication configuration
    pub auth: AuthConfig,
}

impl RequestSpec {
    /// Creates a new request specification with no path, body or auth.
    #[must_use]
    pub fn new(name: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            method,
            path: Vec::new(),
            body: RequestBody::none(),
            auth: AuthConfig::default(),
        }
    }

    /// Creates a GET request.
    #[must_use]
    pub fn get(name: impl Into<String>) -> Self {
        Self::new(name, HttpMethod::Get)
    }

    /// Creates a POST request.
    #[must_use]
    pub fn post(name: impl Into<String>) -> Self {
        Self::new(name, HttpMethod::Post)
    }

    /// Creates a PUT request.
    #[must_use]
    pub fn put(name: impl Into<String>) -> Self {
        Self::new(name, HttpMethod::Put)
    }

    /// Creates a DELETE request.
    #[must_use]
    pub fn delete(name: impl Into<String>) -> Self {
        Self::new(name, HttpMethod::Delete)
    }

    /// Appends one path segment (builder pattern).
    #[must_use]
    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.path.push(segment.into());
        self
    }

    /// Appends several path segments (builder pattern).
    #[must_use]
    pub fn segments<I, S>(mut self, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.path.extend(segments.into_iter().map(Into::into));
        self
    }

    /// Sets the body (builder pattern).
    #[must_use]
    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    /// Sets the authentication (builder pattern).
    #[must_use]
    pub fn with_auth(mut self, auth: AuthConfig) -> Self {
        self.auth = auth;
        self
    }

    /// Returns the path as it appears after the base URL, e.g. `/Story/All`.
    #[must_use]
    pub fn path_display(&self) -> String {
        format!("/{}", self.path.join("/"))
    }

    /// Resolves the request path against a base URL.
    ///
    /// The base path is preserved, so `https://host/api` plus
    /// `["Story", "All"]` yields `https://host/api/Story/All`.
    ///
    /// # Errors
    ///
    /// Returns an error if a segment is empty or the base URL cannot carry
    /// a path (e.g. `mailto:`).
    pub fn resolve(&self, base: &Url) -> DomainResult<Url> {
        if self.path.iter().any(String::is_empty) {
            return Err(DomainError::InvalidIdentifier(format!(
                "empty path segment in {}",
                self.path_display()
            )));
        }

        let mut url = base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| DomainError::InvalidUrl(format!("{base} cannot be a base URL")))?;
            segments.pop_if_empty();
            for segment in &self.path {
                segments.push(segment);
            }
        }
        Ok(url)
    }
}
