//! Transport adapter over reqwest.
//!
//! Consumes fully-formed request descriptors and performs the exchange,
//! buffered or streaming. Failure classification is delegated to
//! [`crate::error`]; nothing here retries.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::Error;

/// Transport tuning.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Total deadline for a buffered exchange. Streaming exchanges are not
    /// bounded by this; chunks may arrive for as long as the server keeps
    /// producing them.
    pub timeout: Duration,
    /// Deadline for establishing the connection, applied to both modes.
    pub connect_timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Everything the transport needs to perform one exchange.
///
/// Built in exactly one place ([`crate::Client::describe`]) so that real
/// sends and curl rendering can never diverge.
#[derive(Debug, Clone)]
pub(crate) struct RequestDescriptor {
    pub(crate) method: reqwest::Method,
    pub(crate) url: String,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body: serde_json::Value,
}

#[derive(Debug, Clone)]
pub(crate) struct HttpTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpTransport {
    pub(crate) fn new(config: &HttpConfig) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .user_agent(concat!("textgen/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Unknown {
                message: "failed to build HTTP client".to_string(),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            timeout: config.timeout,
        })
    }

    /// Send a descriptor and decode the buffered 2xx body into `T`.
    #[tracing::instrument(name = "http_post", skip(self, desc), fields(url = %desc.url), err)]
    pub(crate) async fn post_json<T>(&self, desc: &RequestDescriptor) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        let response = self
            .request(desc)?
            .timeout(self.timeout)
            .send()
            .await
            .map_err(Error::classify_send)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| String::new());
            warn!(status = %status, "completion endpoint returned error status");
            return Err(Error::classify_status(status, &body));
        }

        debug!(status = %status, "completion request succeeded");
        let body = response.text().await.map_err(Error::classify_send)?;
        serde_json::from_str(&body).map_err(Error::classify_decode)
    }

    /// Send a descriptor in streaming mode and hand back the open response.
    ///
    /// Non-2xx statuses are classified here, before any chunk is surfaced;
    /// the body is consumed lazily by [`crate::stream`].
    #[tracing::instrument(name = "http_post_stream", skip(self, desc), fields(url = %desc.url), err)]
    pub(crate) async fn post_stream(&self, desc: &RequestDescriptor) -> Result<reqwest::Response, Error> {
        let response = self
            .request(desc)?
            .send()
            .await
            .map_err(Error::classify_send)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| String::new());
            warn!(status = %status, "stream open rejected by server");
            return Err(Error::classify_status(status, &body));
        }

        debug!(status = %status, "stream opened");
        Ok(response)
    }

    fn request(&self, desc: &RequestDescriptor) -> Result<reqwest::RequestBuilder, Error> {
        // The body is serialized here and headers are taken verbatim from the
        // descriptor, so the exchange matches the rendered curl byte-for-byte.
        let body = serde_json::to_vec(&desc.body).map_err(Error::serialization)?;
        let mut request = self.client.request(desc.method.clone(), &desc.url).body(body);
        for (name, value) in &desc.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        Ok(request)
    }
}
