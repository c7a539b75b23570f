//! Client configuration and the buffered call facade.

use crate::api::{Completion, CompletionPayload, CompletionRequest};
use crate::auth::Credential;
use crate::error::Error;
use crate::http::{HttpConfig, HttpTransport, RequestDescriptor};
use crate::model::{DEFAULT_MODEL, Model};

pub(crate) const API_BASE: &str = "https://api.openai.com";
pub(crate) const COMPLETIONS_ENDPOINT: &str = "/v1/completions";

/// Configuration for a [`Client`], fixed for the client's lifetime.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    api_key: String,
    base_url: String,
    default_model: String,
    http: HttpConfig,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: API_BASE.to_string(),
            default_model: DEFAULT_MODEL.to_string(),
            http: HttpConfig::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Model that [`Model::Default`] resolves to for this client.
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    pub fn with_http_config(mut self, config: HttpConfig) -> Self {
        self.http = config;
        self
    }
}

/// Typed client for the completion endpoint.
///
/// Immutable after construction and safe to share across any number of
/// concurrent calls; each call is independent and stateless relative to its
/// siblings.
#[derive(Debug)]
pub struct Client {
    credential: Credential,
    base_url: String,
    default_model: String,
    pub(crate) transport: HttpTransport,
}

impl Client {
    /// Build a client with the default endpoint and model.
    ///
    /// Performs no network I/O. The key is not validated locally beyond
    /// being non-empty; a bad key surfaces later as an
    /// [`Error::Authentication`] from the server.
    pub fn new(api_key: impl Into<String>) -> Result<Self, Error> {
        Self::with_config(ClientConfig::new(api_key))
    }

    pub fn with_config(config: ClientConfig) -> Result<Self, Error> {
        if config.api_key.is_empty() {
            return Err(Error::Authentication {
                message: "API key must not be empty".to_string(),
            });
        }

        let transport = HttpTransport::new(&config.http)?;
        Ok(Self {
            credential: Credential::new(config.api_key),
            base_url: config.base_url,
            default_model: config.default_model,
            transport,
        })
    }

    /// The model identifier [`Model::Default`] resolves to.
    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    /// Build the request body `complete` would send for this prompt, with
    /// the default-model marker resolved against this client's config.
    pub fn request(&self, prompt: &str, model: &Model) -> CompletionRequest {
        CompletionRequest::new(model.resolve(&self.default_model), prompt)
    }

    /// Complete `prompt` with the client's default model.
    pub async fn complete(&self, prompt: &str) -> Result<Completion, Error> {
        self.send(self.request(prompt, &Model::Default)).await
    }

    /// Complete `prompt` with an explicit model selector.
    pub async fn complete_with(&self, prompt: &str, model: &Model) -> Result<Completion, Error> {
        self.send(self.request(prompt, model)).await
    }

    /// Send a fully custom request body. No model substitution happens; the
    /// body already carries its own model field.
    ///
    /// Exactly one request goes out per call and nothing is retried.
    pub async fn send(&self, request: CompletionRequest) -> Result<Completion, Error> {
        let desc = self.describe(&request)?;
        let payload: CompletionPayload = self.transport.post_json(&desc).await?;
        payload.into_completion()
    }

    /// The one place a request body becomes a transport descriptor.
    ///
    /// Both the send paths and the curl renderer go through here, which is
    /// what makes rendered output representative of a real send.
    pub(crate) fn describe(&self, request: &CompletionRequest) -> Result<RequestDescriptor, Error> {
        let body = serde_json::to_value(request).map_err(Error::serialization)?;

        let mut headers = vec![
            self.credential.header(),
            ("Content-Type".to_string(), "application/json".to_string()),
        ];
        if request.is_streaming() {
            headers.push(("Accept".to_string(), "text/event-stream".to_string()));
        }

        Ok(RequestDescriptor {
            method: reqwest::Method::POST,
            url: format!("{}{}", self.base_url, COMPLETIONS_ENDPOINT),
            headers,
            body,
        })
    }
}
