//! Authenticate use case.
//!
//! Exchanges a username/password pair for a bearer token.

use std::sync::Arc;

use serde::Deserialize;
use spoiler_domain::request::{RequestBody, RequestSpec};
use spoiler_domain::story::endpoints;
use spoiler_domain::{AccessToken, AuthError, Credentials};
use tracing::{info, warn};

use crate::ApplicationResult;
use crate::ports::HttpClient;

/// Body returned by the authentication endpoint.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(rename = "accessToken", default)]
    access_token: Option<String>,
}

/// Use case for obtaining an access token.
///
/// A response without a token is a hard failure: nothing downstream can
/// succeed with an empty credential, so there is no silent fallback.
pub struct Authenticate<C: HttpClient> {
    client: Arc<C>,
}

impl<C: HttpClient> Authenticate<C> {
    /// Creates the use case over the given HTTP client.
    pub const fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Builds the authentication request.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials cannot be encoded.
    pub fn request(credentials: &Credentials) -> ApplicationResult<RequestSpec> {
        Ok(RequestSpec::post("authenticate")
            .segments(endpoints::AUTHENTICATE)
            .with_body(RequestBody::json(credentials)?))
    }

    /// Performs the exchange.
    ///
    /// # Errors
    ///
    /// - `AuthError::Transport` if no response arrived
    /// - `AuthError::Rejected` on a non-2xx status
    /// - `AuthError::MissingToken` if the body has no non-empty `accessToken`
    pub async fn execute(&self, credentials: &Credentials) -> ApplicationResult<AccessToken> {
        let request = Self::request(credentials)?;

        let response = self
            .client
            .execute(&request)
            .await
            .map_err(|e| AuthError::Transport {
                message: e.to_string(),
            })?;

        if !response.is_success() {
            warn!(
                username = %credentials.username,
                status = response.status,
                "authentication rejected"
            );
            return Err(AuthError::Rejected {
                status: response.status,
            }
            .into());
        }

        let token = response
            .json::<TokenResponse>()
            .ok()
            .and_then(|body| body.access_token)
            .filter(|token| !token.is_empty())
            .map(AccessToken::new)
            .ok_or(AuthError::MissingToken)?;

        info!(
            username = %credentials.username,
            token = %token.preview(),
            "authenticated"
        );
        Ok(token)
    }
}
