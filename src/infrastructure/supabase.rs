use std::time::Duration;

use anyhow::Context;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::domain::RepositoryError;

const USER_AGENT: &str = "scranbook/1.0";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Postgres `invalid_text_representation`, e.g. a non-UUID value in a uuid filter.
const INVALID_TEXT_REPRESENTATION: &str = "22P02";

/// Shared HTTP client for the managed backend (identity, storage and table
/// APIs all live under one base URL and accept the same service credential).
#[derive(Clone)]
pub struct SupabaseClient {
    base_url: Url,
    service_key: String,
    http: Client,
}

/// Error body fields used by the backend's REST, storage and auth services.
#[derive(Debug, Default, Deserialize)]
struct UpstreamError {
    code: Option<String>,
    message: Option<String>,
    msg: Option<String>,
    error_description: Option<String>,
    error: Option<serde_json::Value>,
}

impl UpstreamError {
    fn into_message(self) -> Option<String> {
        self.message
            .or(self.msg)
            .or(self.error_description)
            .or_else(|| match self.error? {
                serde_json::Value::String(error) => Some(error),
                other => Some(other.to_string()),
            })
    }
}

impl SupabaseClient {
    pub fn new(base_url: Url, service_key: impl Into<String>) -> anyhow::Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to configure HTTP client")?;
        Ok(Self::with_http_client(base_url, service_key, http))
    }

    pub fn with_http_client(base_url: Url, service_key: impl Into<String>, http: Client) -> Self {
        let mut normalized = base_url;
        if !normalized.path().ends_with('/') {
            normalized.set_path(&format!("{}/", normalized.path().trim_end_matches('/')));
        }

        Self {
            base_url: normalized,
            service_key: service_key.into(),
            http,
        }
    }

    pub fn from_base_url(base_url: &str, service_key: impl Into<String>) -> anyhow::Result<Self> {
        let url =
            Url::parse(base_url).with_context(|| format!("invalid backend url: {base_url}"))?;
        Self::new(url, service_key)
    }

    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, RepositoryError> {
        self.base_url
            .join(path)
            .map_err(|err| RepositoryError::unexpected(format!("invalid backend path {path}: {err}")))
    }

    /// `endpoint(prefix)` with each `/`-separated part of `key` appended as an
    /// escaped path segment.
    pub(crate) fn object_endpoint(&self, prefix: &str, key: &str) -> Result<Url, RepositoryError> {
        let mut url = self.endpoint(prefix)?;
        url.path_segments_mut()
            .map_err(|()| RepositoryError::unexpected("backend url cannot carry a path"))?
            .pop_if_empty()
            .extend(key.split('/'));
        Ok(url)
    }

    /// Request authenticated with the service credential.
    pub(crate) fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }

    /// Request made on behalf of an end user, identified by their own token.
    pub(crate) fn user_request(&self, method: Method, url: Url, token: &str) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.service_key)
            .bearer_auth(token)
    }

    pub(crate) async fn send(&self, request: RequestBuilder) -> Result<Response, RepositoryError> {
        request
            .send()
            .await
            .map_err(|err| RepositoryError::unexpected(format!("backend request failed: {err}")))
    }

    pub(crate) async fn handle_response<T>(&self, response: Response) -> Result<T, RepositoryError>
    where
        T: DeserializeOwned,
    {
        if response.status().is_success() {
            response.json::<T>().await.map_err(|err| {
                RepositoryError::unexpected(format!("failed to deserialize backend response: {err}"))
            })
        } else {
            Err(self.response_error(response).await)
        }
    }

    pub(crate) async fn expect_success(&self, response: Response) -> Result<(), RepositoryError> {
        if response.status().is_success() {
            Ok(())
        } else {
            Err(self.response_error(response).await)
        }
    }

    pub(crate) async fn response_error(&self, response: Response) -> RepositoryError {
        let status = response.status();
        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return RepositoryError::Unauthorized;
        }

        let bytes = response.bytes().await.unwrap_or_default();
        let upstream = serde_json::from_slice::<UpstreamError>(&bytes).unwrap_or_default();
        let invalid_input = upstream.code.as_deref() == Some(INVALID_TEXT_REPRESENTATION);
        let message = upstream
            .into_message()
            .unwrap_or_else(|| String::from_utf8_lossy(&bytes).into_owned());

        if invalid_input {
            return RepositoryError::InvalidInput(message);
        }
        RepositoryError::unexpected(format!("backend returned {status}: {message}"))
    }
}
