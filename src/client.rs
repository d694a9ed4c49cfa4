use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::backend::Backend;
use crate::config::Config;
use crate::error::Error;
use crate::types::{AccessToken, AddWordOutcome, DeviceSessionId, UserProfile, Word};

/// HTTP client for the wordbook backend.
pub struct WordbookClient {
    config: Config,
    http: reqwest::Client,
}

#[derive(Serialize)]
struct AddWordRequest<'a> {
    word: &'a Word,
}

#[derive(Deserialize)]
struct AddWordResponse {
    #[serde(default)]
    result: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeviceSessionResponse {
    #[serde(default)]
    access_token: Option<String>,
}

impl WordbookClient {
    /// Create a client with its own connection pool.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if the TLS backend cannot be initialised.
    pub fn new(config: Config) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { config, http })
    }

    /// Use a custom HTTP client (for connection pool reuse or testing).
    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http = client;
        self
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Checks HTTP response status; returns the response on success or an error with details.
    async fn ensure_success(
        response: reqwest::Response,
        operation: &'static str,
    ) -> Result<reqwest::Response, Error> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(Error::Http {
            operation,
            status,
            body,
        })
    }
}

/// 401 and 403 mean the token is no longer accepted.
pub(crate) fn is_token_rejection(status: StatusCode) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
}

impl Backend for WordbookClient {
    async fn add_word(&self, word: &Word, token: &AccessToken) -> Result<AddWordOutcome, Error> {
        let response = self
            .http
            .post(self.config.words_url()?)
            .bearer_auth(token.as_str())
            .json(&AddWordRequest { word })
            .send()
            .await?;

        let response = Self::ensure_success(response, "add word").await?;
        let body = response.json::<AddWordResponse>().await?;
        Ok(body.result.into())
    }

    async fn fetch_profile(&self, token: &AccessToken) -> Result<UserProfile, Error> {
        let response = self
            .http
            .get(self.config.profile_url()?)
            .bearer_auth(token.as_str())
            .send()
            .await?;

        if is_token_rejection(response.status()) {
            tracing::warn!(status = %response.status(), "Access token rejected by profile endpoint");
            return Err(Error::TokenInvalid);
        }

        let response = Self::ensure_success(response, "profile request").await?;
        response.json::<UserProfile>().await.map_err(Into::into)
    }

    async fn lookup_device_session(
        &self,
        session_id: &DeviceSessionId,
    ) -> Result<Option<AccessToken>, Error> {
        let response = self
            .http
            .get(self.config.device_session_url()?)
            .query(&[("deviceSessionId", session_id.as_str())])
            .send()
            .await?;

        let response = Self::ensure_success(response, "device session lookup").await?;
        let body = response.json::<DeviceSessionResponse>().await?;
        Ok(body
            .access_token
            .filter(|t| !t.is_empty())
            .map(AccessToken::from))
    }
}
