/// Client configuration
use crate::error::{ClientError, Result};

/// Environment variable conventionally holding the store endpoint
pub const ENDPOINT_ENV_VAR: &str = "REPLIT_DB_URL";

/// Configuration for a [`Client`](crate::Client)
///
/// The endpoint is the only setting. It is fixed once the client is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the store, without a trailing slash
    pub endpoint: String,
}

impl ClientConfig {
    /// Create a configuration for the given endpoint
    ///
    /// # Example
    /// ```
    /// # use flatkv_client::ClientConfig;
    /// let config = ClientConfig::new("https://kv.example.com/v0/token/");
    /// assert_eq!(config.endpoint, "https://kv.example.com/v0/token");
    /// ```
    pub fn new(endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }

    /// Read the endpoint from [`ENDPOINT_ENV_VAR`]
    ///
    /// This is the only place the library consults the process environment,
    /// and only when called explicitly.
    pub fn from_env() -> Result<Self> {
        match std::env::var(ENDPOINT_ENV_VAR) {
            Ok(endpoint) if !endpoint.trim().is_empty() => Ok(Self::new(endpoint.trim())),
            _ => Err(ClientError::Config(format!("{} is not set", ENDPOINT_ENV_VAR))),
        }
    }

    /// Check that the endpoint is an absolute http(s) URL
    pub fn validate(&self) -> Result<()> {
        let url = reqwest::Url::parse(&self.endpoint)
            .map_err(|e| ClientError::Config(format!("Invalid endpoint {:?}: {}", self.endpoint, e)))?;

        match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(ClientError::Config(format!(
                "Unsupported endpoint scheme {:?}",
                scheme
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_strips_trailing_slashes() {
        assert_eq!(ClientConfig::new("http://localhost:8080//").endpoint, "http://localhost:8080");
        assert_eq!(ClientConfig::new("http://localhost:8080").endpoint, "http://localhost:8080");
    }

    #[test]
    fn test_validate() {
        assert!(ClientConfig::new("http://127.0.0.1:1234").validate().is_ok());
        assert!(ClientConfig::new("https://kv.example.com/v0/abc").validate().is_ok());

        let err = ClientConfig::new("not a url").validate().unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));

        let err = ClientConfig::new("ftp://example.com").validate().unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }
}
