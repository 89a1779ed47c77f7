pub mod images;
pub mod recipes;

use anyhow::{Context, Result, anyhow};
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;

use crate::application::errors::ErrorResponse;

/// Bearer token the CLI presents to the API.
pub const TOKEN_ENV: &str = "SCRANBOOK_TOKEN";

/// Talks to a running scranbook server on behalf of one signed-in user.
pub struct ScranbookClient {
    api_root: Url,
    http: Client,
    token: Option<String>,
}

impl ScranbookClient {
    /// `server_url` is the server origin; routes are resolved under its `/api/`.
    pub fn new(server_url: Url, token: Option<String>) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("scranbook-cli/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to configure HTTP client")?;

        Ok(Self {
            api_root: api_root(server_url),
            http,
            token: token.filter(|token| !token.trim().is_empty()),
        })
    }

    pub fn from_env(server_url: &str) -> Result<Self> {
        let url =
            Url::parse(server_url).with_context(|| format!("invalid server url: {server_url}"))?;
        Self::new(url, std::env::var(TOKEN_ENV).ok())
    }

    pub fn recipes(&self) -> recipes::RecipesClient<'_> {
        recipes::RecipesClient::new(self)
    }

    pub fn images(&self) -> images::ImagesClient<'_> {
        images::ImagesClient::new(self)
    }

    /// Request for an API route, carrying the user's token when one is set.
    /// Without a token the server answers 401, which surfaces as an error.
    pub(crate) fn call(&self, method: Method, route: &str) -> Result<RequestBuilder> {
        let url = self
            .api_root
            .join(route)
            .with_context(|| format!("invalid API route: {route}"))?;

        let request = self.http.request(method, url);
        Ok(match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        })
    }
}

pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let response = check_status(response).await?;
    response
        .json::<T>()
        .await
        .context("server sent an unreadable response")
}

/// Turns a non-2xx response into an error carrying the server's `detail`.
pub(crate) async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let reason = serde_json::from_str::<ErrorResponse>(&body)
        .map(|err| err.detail)
        .unwrap_or(body);
    Err(anyhow!("server answered {status}: {reason}"))
}

fn api_root(mut server_url: Url) -> Url {
    let base = server_url.path().trim_end_matches('/').to_string();
    server_url.set_path(&format!("{base}/api/"));
    server_url
}
