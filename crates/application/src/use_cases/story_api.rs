//! Authenticated access to the Story endpoints.

use std::sync::Arc;
use std::time::Instant;

use spoiler_domain::request::{RequestBody, RequestSpec};
use spoiler_domain::response::ResponseSpec;
use spoiler_domain::story::endpoints;
use spoiler_domain::{AccessToken, AuthConfig, Credentials, StoryDraft, StoryId};
use tracing::debug;

use super::Authenticate;
use crate::ApplicationResult;
use crate::ports::HttpClient;

/// Authenticated client context for the Story API.
///
/// Holds the HTTP client and the bearer token obtained at setup. Every call
/// issues exactly one request and hands back the raw response so callers
/// can check status and body themselves; only transport failures are
/// errors.
pub struct StoryApi<C: HttpClient> {
    client: Arc<C>,
    auth: AuthConfig,
}

impl<C: HttpClient> StoryApi<C> {
    /// Wraps a client with an already obtained token.
    pub const fn new(client: Arc<C>, token: AccessToken) -> Self {
        Self {
            client,
            auth: AuthConfig::bearer(token),
        }
    }

    /// Authenticates and returns a ready context.
    ///
    /// # Errors
    ///
    /// Returns an error if authentication fails for any reason.
    pub async fn connect(client: Arc<C>, credentials: &Credentials) -> ApplicationResult<Self> {
        let token = Authenticate::new(Arc::clone(&client))
            .execute(credentials)
            .await?;
        Ok(Self::new(client, token))
    }

    /// `POST /Story/Create`
    ///
    /// # Errors
    ///
    /// Returns an error if the draft cannot be encoded or the request fails.
    pub async fn create(&self, draft: &StoryDraft) -> ApplicationResult<ResponseSpec> {
        let request = RequestSpec::post("create story")
            .segments(endpoints::CREATE)
            .with_body(RequestBody::json(draft)?);
        self.send(request).await
    }

    /// `PUT /Story/Edit/{id}`
    ///
    /// # Errors
    ///
    /// Returns an error if the draft cannot be encoded or the request fails.
    pub async fn edit(&self, id: &StoryId, draft: &StoryDraft) -> ApplicationResult<ResponseSpec> {
        let request = RequestSpec::put("edit story")
            .segments(endpoints::EDIT)
            .segment(id.as_str())
            .with_body(RequestBody::json(draft)?);
        self.send(request).await
    }

    /// `GET /Story/All`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list(&self) -> ApplicationResult<ResponseSpec> {
        self.send(RequestSpec::get("list stories").segments(endpoints::LIST))
            .await
    }

    /// `DELETE /Story/Delete/{id}`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete(&self, id: &StoryId) -> ApplicationResult<ResponseSpec> {
        let request = RequestSpec::delete("delete story")
            .segments(endpoints::DELETE)
            .segment(id.as_str());
        self.send(request).await
    }

    async fn send(&self, request: RequestSpec) -> ApplicationResult<ResponseSpec> {
        let request = request.with_auth(self.auth.clone());
        let start = Instant::now();

        let response = self.client.execute(&request).await?;

        debug!(
            request_id = %request.id,
            method = %request.method,
            path = %request.path_display(),
            status = response.status,
            elapsed = ?start.elapsed(),
            "{}",
            request.name
        );
        Ok(response)
    }
}
