//! `Ollama` adapter using the chat endpoint's `format` schema option.

use std::{fmt, time::Duration};

use async_trait::async_trait;
use futures::stream;
use hyper::Uri;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::http_client::{HyperClient, build_https_client, post_json, sanitize_base_url};
use crate::traits::{
    AdapterError, AdapterMetadata, AdapterResult, AdapterStream, InferenceChunk, ModelAdapter,
    PromptMessage, StructuredRequest,
};

/// Configuration for the `Ollama` adapter.
#[derive(Clone, Debug)]
pub struct OllamaConfig {
    base_url: String,
    model: String,
    default_temperature: Option<f32>,
    timeout: Duration,
}

impl OllamaConfig {
    /// Creates a configuration for the supplied model using the local daemon.
    #[must_use]
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            base_url: "http://127.0.0.1:11434/".to_owned(),
            model: model.into(),
            default_temperature: None,
            timeout: Duration::from_secs(120),
        }
    }

    /// Overrides the base URL of the Ollama daemon.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Configuration`] if the supplied URL is invalid.
    pub fn with_base_url(mut self, base_url: impl AsRef<str>) -> AdapterResult<Self> {
        self.base_url = sanitize_base_url("Ollama", base_url.as_ref())?;
        Ok(self)
    }

    /// Sets the default sampling temperature used when the request does not
    /// provide one explicitly.
    #[must_use]
    pub fn with_default_temperature(mut self, temperature: f32) -> Self {
        self.default_temperature = Some(temperature);
        self
    }

    /// Sets the HTTP timeout for requests to the Ollama daemon.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// `Ollama` adapter that calls an Ollama daemon over HTTP/HTTPS.
pub struct OllamaAdapter {
    client: HyperClient,
    endpoint: Uri,
    metadata: AdapterMetadata,
    timeout: Duration,
    default_temperature: Option<f32>,
}

impl fmt::Debug for OllamaAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OllamaAdapter")
            .field("model", &self.metadata.model())
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl OllamaAdapter {
    /// Constructs a new adapter from the supplied configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Configuration`] if the endpoint is invalid.
    #[allow(clippy::needless_pass_by_value)]
    pub fn new(config: OllamaConfig) -> AdapterResult<Self> {
        let endpoint = format!("{}api/chat", config.base_url)
            .parse::<Uri>()
            .map_err(|err| {
                AdapterError::configuration(format!("invalid Ollama endpoint: {err}"))
            })?;

        Ok(Self {
            client: build_https_client(),
            endpoint,
            metadata: AdapterMetadata::new("ollama", config.model.clone()),
            timeout: config.timeout,
            default_temperature: config.default_temperature,
        })
    }

    fn build_request(&self, request: &StructuredRequest) -> ChatRequest {
        let messages = request.messages().iter().map(map_prompt_message).collect();

        let options = if request.temperature().is_some()
            || self.default_temperature.is_some()
            || request.max_output_tokens().is_some()
        {
            Some(ChatOptions {
                temperature: request.temperature().or(self.default_temperature),
                max_output_tokens: request.max_output_tokens(),
            })
        } else {
            None
        };

        ChatRequest {
            model: self.metadata.model().to_owned(),
            stream: false,
            messages,
            format: request.schema().to_json_schema(),
            options,
        }
    }
}

#[async_trait]
impl ModelAdapter for OllamaAdapter {
    fn metadata(&self) -> &AdapterMetadata {
        &self.metadata
    }

    async fn generate(&self, request: StructuredRequest) -> AdapterResult<AdapterStream> {
        let payload = self.build_request(&request);
        let body = serde_json::to_vec(&payload).map_err(|err| {
            AdapterError::invalid_request(format!("failed to encode Ollama request: {err}"))
        })?;

        let bytes = post_json(
            &self.client,
            "Ollama",
            self.endpoint.clone(),
            &[],
            body,
            self.timeout,
        )
        .await?;

        let response: ChatResponse = serde_json::from_slice(&bytes)
            .map_err(|err| AdapterError::response(format!("failed to decode Ollama response: {err}")))?;

        if let Some(error) = response.error {
            return Err(AdapterError::response(error));
        }

        let content = response
            .message
            .map(|message| message.content)
            .or(response.response)
            .unwrap_or_default();

        let stream = stream::once(async move { Ok(InferenceChunk::new(content, true)) });
        Ok(Box::pin(stream))
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    stream: bool,
    messages: Vec<ChatMessage>,
    format: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<ChatOptions>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "num_predict")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    message: Option<ChatMessage>,
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

fn map_prompt_message(message: &PromptMessage) -> ChatMessage {
    ChatMessage {
        role: message.role().to_string(),
        content: message.content().to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::MessageRole;
    use recipe_primitives::{Field, Schema};

    #[test]
    fn rejects_base_url_without_scheme() {
        let err = OllamaConfig::new("gemma")
            .with_base_url("localhost:11434")
            .expect_err("missing scheme should error");
        assert!(matches!(err, AdapterError::Configuration { .. }));
    }

    #[test]
    fn chat_response_parsing_prefers_message() {
        let json = r#"{
            "message": {"role": "assistant", "content": "hi"},
            "response": "ignored"
        }"#;

        let parsed: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.message.unwrap().content, "hi");
    }

    #[test]
    fn build_request_carries_schema_and_system_message() {
        let config = OllamaConfig::new("gemma").with_default_temperature(0.1);
        let adapter = OllamaAdapter::new(config).expect("adapter");
        let schema = Schema::object([Field::required("imageUrl", Schema::string())]);
        let request = StructuredRequest::new(
            vec![
                PromptMessage::new(MessageRole::System, "be brief"),
                PromptMessage::new(MessageRole::User, "hello"),
            ],
            schema,
        )
        .unwrap();

        let chat = adapter.build_request(&request);
        assert_eq!(chat.model, "gemma");
        assert_eq!(chat.messages.len(), 2);
        assert_eq!(chat.messages[0].role, "system");
        assert_eq!(chat.format["type"], "object");
        assert_eq!(chat.format["required"][0], "imageUrl");
        assert!(chat.options.is_some());
        assert!(!chat.stream);
    }
}
