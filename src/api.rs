//! Wire types for the completion endpoint.
//!
//! The field set mirrors the OpenAI-style completions contract; it is owned
//! by the remote service and only reflected here. Response payloads that do
//! not match the declared shape are decoding failures, never silently
//! coerced or partially populated.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Body of a completion request.
///
/// The `model` field always carries a concrete identifier; the client
/// resolves [`crate::Model::Default`] before this type is ever built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,
    #[serde(skip_serializing_if = "is_false")]
    pub(crate) stream: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl CompletionRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            max_tokens: None,
            temperature: None,
            stop: None,
            stream: false,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_stop(mut self, stop: Vec<String>) -> Self {
        self.stop = Some(stop);
        self
    }

    pub(crate) fn into_streaming(mut self) -> Self {
        self.stream = true;
        self
    }

    pub(crate) fn is_streaming(&self) -> bool {
        self.stream
    }
}

/// A decoded completion.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    /// The generated continuation of the prompt.
    pub text: String,
    /// The model that actually served the request, as echoed by the server.
    pub model: String,
    /// Why generation stopped, when the server says.
    pub finish_reason: Option<String>,
    pub usage: Usage,
}

/// Token accounting reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// An incremental fragment of generated text delivered during streaming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenChunk {
    pub text: String,
}

/// Raw buffered response shape.
#[derive(Debug, Deserialize)]
pub(crate) struct CompletionPayload {
    pub(crate) model: String,
    pub(crate) choices: Vec<Choice>,
    pub(crate) usage: Usage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Choice {
    pub(crate) text: String,
    pub(crate) finish_reason: Option<String>,
}

impl CompletionPayload {
    pub(crate) fn into_completion(self) -> Result<Completion, Error> {
        let choice = self
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::InvalidResponseShape {
                message: "response carried no choices".to_string(),
                source: None,
            })?;
        Ok(Completion {
            text: choice.text,
            model: self.model,
            finish_reason: choice.finish_reason,
            usage: self.usage,
        })
    }
}

/// Raw streamed event shape.
#[derive(Debug, Deserialize)]
pub(crate) struct ChunkPayload {
    pub(crate) choices: Vec<ChunkChoice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChunkChoice {
    pub(crate) text: String,
}

impl ChunkPayload {
    pub(crate) fn into_chunk(self) -> Result<TokenChunk, Error> {
        let choice = self
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::InvalidResponseShape {
                message: "stream event carried no choices".to_string(),
                source: None,
            })?;
        Ok(TokenChunk { text: choice.text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_fields_are_omitted_from_the_body() {
        let body = serde_json::to_value(CompletionRequest::new("ada", "hi")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "model": "ada", "prompt": "hi" })
        );
    }

    #[test]
    fn generation_parameters_serialize_when_set() {
        let request = CompletionRequest::new("ada", "hi")
            .with_max_tokens(16)
            .with_temperature(0.2)
            .with_stop(vec!["\n".to_string()]);
        let body = serde_json::to_value(request).unwrap();
        assert_eq!(body["max_tokens"], 16);
        assert_eq!(body["stop"][0], "\n");
    }

    #[test]
    fn streaming_flag_only_appears_when_enabled() {
        let buffered = serde_json::to_value(CompletionRequest::new("ada", "hi")).unwrap();
        assert!(buffered.get("stream").is_none());

        let streaming =
            serde_json::to_value(CompletionRequest::new("ada", "hi").into_streaming()).unwrap();
        assert_eq!(streaming["stream"], true);
    }

    #[test]
    fn payload_without_choices_is_a_shape_error() {
        let payload: CompletionPayload = serde_json::from_value(serde_json::json!({
            "model": "ada",
            "choices": [],
            "usage": { "prompt_tokens": 1, "completion_tokens": 0, "total_tokens": 1 }
        }))
        .unwrap();
        assert!(matches!(
            payload.into_completion(),
            Err(Error::InvalidResponseShape { .. })
        ));
    }
}
