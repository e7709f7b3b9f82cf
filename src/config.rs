use url::Url;

use crate::error::Error;

/// Backend API configuration.
///
/// The required field (`base_url`) is a constructor parameter — no runtime
/// "missing field" errors.
///
/// ```rust,ignore
/// use cafe_client::ApiConfig;
///
/// let config = ApiConfig::new("https://cafe.example.com/api".parse()?);
/// ```
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct ApiConfig {
    pub(crate) base_url: Url,
}

impl ApiConfig {
    /// Create a configuration pointing at the given API root,
    /// e.g. `https://cafe.example.com/api`.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self { base_url }
    }

    /// Create a configuration from environment variables.
    ///
    /// # Required env vars
    /// - `CAFE_API_URL`: API root URL
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `CAFE_API_URL` is missing or not a
    /// valid URL.
    pub fn from_env() -> Result<Self, Error> {
        let raw = std::env::var("CAFE_API_URL")
            .map_err(|_| Error::Config("CAFE_API_URL is required".into()))?;
        let base_url: Url = raw
            .parse()
            .map_err(|e| Error::Config(format!("CAFE_API_URL: {e}")))?;
        Ok(Self::new(base_url))
    }

    /// API root URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}
