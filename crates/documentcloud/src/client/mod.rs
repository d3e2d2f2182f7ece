//! DocumentCloud API client.
//!
//! Provides an async HTTP client with:
//! - Connection pooling via reqwest
//! - Retry middleware with exponential backoff for transient failures
//! - HTTP Basic authentication when credentials are configured
//!
//! Definitive outcomes are never retried: 404 maps to `DoesNotExist` and
//! 401 to `CredentialsRejected` on first occurrence.

mod documents;
mod projects;

pub use documents::DocumentClient;
pub use projects::ProjectClient;

use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde::de::DeserializeOwned;

use crate::config::{Config, api};
use crate::error::{ClientError, ClientResult};

const USER_AGENT: &str = concat!("documentcloud-rs/", env!("CARGO_PKG_VERSION"));

/// The public interface for the DocumentCloud API.
///
/// Cheap to clone; every record produced by the client keeps a clone so it
/// can lazily re-fetch itself and push updates.
#[derive(Clone)]
pub struct DocumentCloud {
    /// HTTP client with retry middleware, for API calls.
    http: ClientWithMiddleware,

    /// Plain HTTP client, for asset downloads and non-replayable uploads.
    assets: reqwest::Client,

    /// Account username (optional).
    username: Option<String>,

    /// Account password (optional).
    password: Option<String>,

    /// Base URI for the API, with a trailing slash.
    base_uri: String,
}

impl DocumentCloud {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let assets = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .gzip(true)
            .build()?;

        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(api::RETRY_MIN, api::RETRY_MAX)
            .build_with_max_retries(config.max_retries);

        let http = ClientBuilder::new(assets.clone())
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            http,
            assets,
            username: config.username,
            password: config.password,
            base_uri: config.base_uri,
        })
    }

    /// Methods for collecting documents.
    #[must_use]
    pub fn documents(&self) -> DocumentClient {
        DocumentClient::new(self.clone())
    }

    /// Methods for collecting projects.
    #[must_use]
    pub fn projects(&self) -> ProjectClient {
        ProjectClient::new(self.clone())
    }

    /// Check if both a username and a password are configured.
    #[must_use]
    pub const fn has_credentials(&self) -> bool {
        self.username.is_some() && self.password.is_some()
    }

    /// Precondition for operations the service only allows with an account.
    pub(crate) fn require_credentials(&self) -> ClientResult<()> {
        if self.has_credentials() { Ok(()) } else { Err(ClientError::CredentialsMissing) }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_uri, path)
    }

    fn authorize(
        &self,
        request: reqwest_middleware::RequestBuilder,
    ) -> reqwest_middleware::RequestBuilder {
        match (&self.username, &self.password) {
            (Some(username), Some(password)) => request.basic_auth(username, Some(password)),
            _ => request,
        }
    }

    /// Make a GET request with query parameters.
    pub(crate) async fn get_json<T>(&self, path: &str, query: &[(&str, String)]) -> ClientResult<T>
    where
        T: DeserializeOwned,
    {
        tracing::debug!(path, "GET");
        let response = self.authorize(self.http.get(self.url(path))).query(query).send().await?;
        let response = Self::handle_response(response).await?;
        Ok(response.json().await?)
    }

    /// Make a form-encoded POST request.
    ///
    /// List parameters are passed as repeated `key[]` entries and map
    /// parameters as `key[subkey]` entries, the array/map convention the
    /// service expects.
    pub(crate) async fn post_form<T>(&self, path: &str, params: &[(String, String)]) -> ClientResult<T>
    where
        T: DeserializeOwned,
    {
        tracing::debug!(path, "POST");
        let response = self.authorize(self.http.post(self.url(path))).form(params).send().await?;
        let response = Self::handle_response(response).await?;
        Ok(response.json().await?)
    }

    /// Post changes back to the service.
    ///
    /// The service simulates PUT with a POST carrying `_method=put`.
    pub(crate) async fn put_form(&self, path: &str, params: &[(String, String)]) -> ClientResult<()> {
        self.require_credentials()?;
        tracing::debug!(path, "PUT");
        let mut params = params.to_vec();
        params.push(("_method".to_string(), "put".to_string()));
        let response =
            self.authorize(self.http.post(self.url(path))).form(&params).send().await?;
        Self::handle_response(response).await?;
        Ok(())
    }

    /// Delete a resource via the service's `_method=delete` convention.
    pub(crate) async fn delete_form(&self, path: &str) -> ClientResult<()> {
        tracing::debug!(path, "DELETE");
        let params = [("_method".to_string(), "delete".to_string())];
        let response =
            self.authorize(self.http.post(self.url(path))).form(&params).send().await?;
        Self::handle_response(response).await?;
        Ok(())
    }

    /// Make a multipart POST request with a file part.
    ///
    /// Multipart bodies are not replayable, so uploads bypass the retry
    /// middleware and are sent exactly once.
    pub(crate) async fn post_multipart<T>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> ClientResult<T>
    where
        T: DeserializeOwned,
    {
        tracing::debug!(path, "POST multipart");
        let mut request = self.assets.post(self.url(path)).multipart(form);
        if let (Some(username), Some(password)) = (&self.username, &self.password) {
            request = request.basic_auth(username, Some(password));
        }
        let response = request.send().await?;
        let response = Self::handle_response(response).await?;
        Ok(response.json().await?)
    }

    /// Download a public asset URL without authentication.
    pub(crate) async fn download(&self, url: &str) -> ClientResult<Vec<u8>> {
        tracing::debug!(url, "download");
        let response = self.assets.get(url).send().await?;
        let response = Self::handle_response(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Map API response status codes onto the error taxonomy.
    async fn handle_response(response: reqwest::Response) -> ClientResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let status = status.as_u16();
        let message = response.text().await.unwrap_or_default();
        match status {
            404 => {
                let resource = if message.is_empty() {
                    "the resource you've requested does not exist or is unavailable \
                     without the proper credentials"
                        .to_string()
                } else {
                    message
                };
                Err(ClientError::not_found(resource))
            }
            401 => Err(ClientError::CredentialsRejected { message }),
            500..=599 => Err(ClientError::server(status, message)),
            _ => Err(ClientError::UnexpectedStatus { status, message }),
        }
    }
}

impl std::fmt::Debug for DocumentCloud {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentCloud")
            .field("base_uri", &self.base_uri)
            .field("username", &self.username)
            .field("has_credentials", &self.has_credentials())
            .finish()
    }
}
