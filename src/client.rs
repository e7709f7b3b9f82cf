use std::sync::Arc;

use reqwest::multipart::Form;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ApiConfig;
use crate::error::Error;
use crate::store::TokenStore;

/// Header carrying the session token on every outgoing request.
pub const TOKEN_HEADER: &str = "x-token";

/// HTTP client for the Café backend.
///
/// Wraps a single `reqwest::Client` pointed at one base URL. Before each
/// request the token store is consulted and, when a token is present, it is
/// attached as the [`TOKEN_HEADER`] header. Non-2xx responses become
/// [`Error::Api`] with the response body preserved verbatim.
pub struct ApiClient<S> {
    config: ApiConfig,
    http: reqwest::Client,
    tokens: Arc<S>,
}

// Manual Clone: avoid derive adding an `S: Clone` bound.
impl<S> Clone for ApiClient<S> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            http: self.http.clone(),
            tokens: self.tokens.clone(),
        }
    }
}

impl<S: TokenStore> ApiClient<S> {
    /// Create a new client over the given configuration and token store.
    #[must_use]
    pub fn new(config: ApiConfig, tokens: Arc<S>) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
            tokens,
        }
    }

    /// Use a custom HTTP client (for connection pool reuse or testing).
    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http = client;
        self
    }

    /// The shared token store.
    #[must_use]
    pub fn token_store(&self) -> &Arc<S> {
        &self.tokens
    }

    fn endpoint(&self, path: &str) -> String {
        let base = self.config.base_url.as_str().trim_end_matches('/');
        format!("{base}{path}")
    }

    /// Attaches the stored session token, if any.
    async fn authorize(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::RequestBuilder, Error> {
        match self.tokens.get().await.map_err(Error::Store)? {
            Some(token) => Ok(request.header(TOKEN_HEADER, token)),
            None => Ok(request),
        }
    }

    /// GET `path` and deserialize the JSON response.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] on network failure, [`Error::Api`] on a
    /// non-2xx response, or [`Error::Store`] if the token store fails.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        operation: &'static str,
    ) -> Result<T, Error> {
        let request = self.authorize(self.http.get(self.endpoint(path))).await?;
        let response = request.send().await?;
        let response = Self::ensure_success(response, operation).await?;
        response.json::<T>().await.map_err(Into::into)
    }

    /// POST `body` as JSON to `path` and deserialize the JSON response.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`ApiClient::get`].
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        operation: &'static str,
    ) -> Result<T, Error> {
        let request = self
            .authorize(self.http.post(self.endpoint(path)).json(body))
            .await?;
        let response = request.send().await?;
        let response = Self::ensure_success(response, operation).await?;
        response.json::<T>().await.map_err(Into::into)
    }

    /// PUT `body` as JSON to `path` and deserialize the JSON response.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`ApiClient::get`].
    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        operation: &'static str,
    ) -> Result<T, Error> {
        let request = self
            .authorize(self.http.put(self.endpoint(path)).json(body))
            .await?;
        let response = request.send().await?;
        let response = Self::ensure_success(response, operation).await?;
        response.json::<T>().await.map_err(Into::into)
    }

    /// PUT a multipart form to `path`, discarding the response body.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`ApiClient::get`].
    pub async fn put_multipart(
        &self,
        path: &str,
        form: Form,
        operation: &'static str,
    ) -> Result<(), Error> {
        let request = self
            .authorize(self.http.put(self.endpoint(path)).multipart(form))
            .await?;
        let response = request.send().await?;
        Self::ensure_success(response, operation).await?;
        Ok(())
    }

    /// Checks HTTP response status; returns the response on success or an
    /// error carrying the body text.
    async fn ensure_success(
        response: reqwest::Response,
        operation: &'static str,
    ) -> Result<reqwest::Response, Error> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let detail = response.text().await.unwrap_or_default();
        tracing::debug!(operation, status, "backend rejected request");
        Err(Error::Api {
            operation,
            status,
            detail,
        })
    }
}
