/// flatkv HTTP client implementation
use crate::codec::{self, encode_component};
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::shape::Shape;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Options for [`Client::get_with`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GetOptions {
    /// Return the stored text without decoding it
    pub raw: bool,
}

impl GetOptions {
    pub fn raw() -> Self {
        Self { raw: true }
    }
}

/// Result of [`Client::get_with`]
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched {
    /// Stored text, empty when the key is absent
    Raw(String),
    /// Decoded value, `None` when absent or `null`
    Value(Option<Value>),
}

/// flatkv remote client
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct Client {
    config: ClientConfig,
    http: reqwest::Client,
}

impl Client {
    /// Create a client from a configuration
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::with_http_client(config, reqwest::Client::new())
    }

    /// Create a client that sends requests through a caller-built
    /// `reqwest::Client` (TLS, default headers, proxies)
    pub fn with_http_client(config: ClientConfig, http: reqwest::Client) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, http })
    }

    /// Create a client for an endpoint URL
    ///
    /// No request is made until the first operation.
    ///
    /// # Example
    /// ```no_run
    /// # use flatkv_client::Client;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = Client::connect("http://localhost:8080")?;
    /// client.set("greeting", "hello").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn connect(endpoint: impl Into<String>) -> Result<Self> {
        Self::new(ClientConfig::new(endpoint))
    }

    /// Create a client for the endpoint in `REPLIT_DB_URL`
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    fn key_url(&self, key: &str) -> String {
        format!("{}/{}", self.config.endpoint, encode_component(key))
    }

    /// Get the stored text at `key` without decoding it
    ///
    /// # Returns
    /// The text as stored, or an empty string when the key is absent
    pub async fn get_raw(&self, key: &str) -> Result<String> {
        let response = self.http.get(self.key_url(key)).send().await?;
        debug!(key, status = %response.status(), "GET key");

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(String::new());
        }

        read_body(response).await
    }

    /// Get and decode the value at `key`
    ///
    /// # Returns
    /// The decoded value, or `None` when the key is absent or holds `null`
    ///
    /// # Errors
    /// [`ClientError::Parse`] when the stored text is not JSON; use
    /// [`get_raw`](Self::get_raw) to read such values.
    ///
    /// # Example
    /// ```no_run
    /// # use flatkv_client::Client;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = Client::connect("http://localhost:8080")?;
    /// if let Some(value) = client.get("settings").await? {
    ///     println!("settings = {}", value);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get(&self, key: &str) -> Result<Option<Value>> {
        let text = self.get_raw(key).await?;
        codec::decode_value(key, &text)
    }

    /// Get the value at `key`, raw or decoded depending on `options`
    pub async fn get_with(&self, key: &str, options: GetOptions) -> Result<Fetched> {
        if options.raw {
            Ok(Fetched::Raw(self.get_raw(key).await?))
        } else {
            Ok(Fetched::Value(self.get(key).await?))
        }
    }

    /// Get the value at `key` deserialized into `T`
    pub async fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get(key).await? {
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|source| ClientError::Parse {
                    key: key.to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }

    /// Get the value at `key` classified by shape
    pub async fn get_shape(&self, key: &str) -> Result<Shape> {
        Ok(Shape::from(self.get(key).await?))
    }

    /// Store `value` as JSON at `key`, replacing any previous value
    ///
    /// Returns the client so writes can be chained.
    ///
    /// # Example
    /// ```no_run
    /// # use flatkv_client::Client;
    /// # use serde_json::json;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = Client::connect("http://localhost:8080")?;
    /// client
    ///     .set("user#1", &json!({"name": "Alice"}))
    ///     .await?
    ///     .set("user#2", &json!({"name": "Bob"}))
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<&Self> {
        let json = codec::encode_value(value)?;
        let response = self
            .http
            .post(&self.config.endpoint)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(codec::form_body(key, &json))
            .send()
            .await?;
        debug!(key, bytes = json.len(), status = %response.status(), "POST key");

        response.error_for_status()?;
        Ok(self)
    }

    /// Delete `key`; deleting a missing key is not an error
    pub async fn delete(&self, key: &str) -> Result<&Self> {
        let response = self.http.delete(self.key_url(key)).send().await?;
        debug!(key, status = %response.status(), "DELETE key");

        if response.status() != StatusCode::NOT_FOUND {
            response.error_for_status()?;
        }
        Ok(self)
    }

    /// List keys starting with `prefix`, in the order the store returns them
    pub async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let url = format!(
            "{}?encode=true&prefix={}",
            self.config.endpoint,
            encode_component(prefix)
        );
        let response = self.http.get(url).send().await?;
        debug!(prefix, status = %response.status(), "GET key listing");

        let body = read_body(response).await?;
        codec::parse_key_list(&body)
    }

    /// List every key in the store
    pub async fn list_all(&self) -> Result<Vec<String>> {
        self.list("").await
    }
}

async fn read_body(response: Response) -> Result<String> {
    Ok(response.error_for_status()?.text().await?)
}
