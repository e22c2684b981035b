//! `OpenAI` adapter using `response_format` JSON schema output.

use std::{env, fmt, time::Duration};

use async_trait::async_trait;
use futures::stream;
use hyper::Uri;
use hyper::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::http_client::{HyperClient, build_https_client, post_json, sanitize_base_url};
use crate::traits::{
    AdapterError, AdapterMetadata, AdapterResult, AdapterStream, InferenceChunk, ModelAdapter,
    PromptMessage, StructuredRequest,
};

/// Environment variable used when loading configuration automatically.
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Configuration for the `OpenAI` adapter.
#[derive(Clone, Debug)]
pub struct OpenAiConfig {
    api_key: Option<String>,
    model: String,
    base_url: String,
    timeout: Duration,
    default_temperature: Option<f32>,
}

impl OpenAiConfig {
    /// Creates a configuration using the supplied model identifier.
    #[must_use]
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            api_key: None,
            model: model.into(),
            base_url: "https://api.openai.com/".to_owned(),
            timeout: Duration::from_secs(60),
            default_temperature: None,
        }
    }

    /// Loads the API key from the `OPENAI_API_KEY` environment variable.
    #[must_use]
    pub fn from_env(model: impl Into<String>) -> Self {
        let mut cfg = Self::new(model);
        cfg.api_key = env::var(OPENAI_API_KEY_ENV).ok();
        cfg
    }

    /// Overrides the base URL used for API calls.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Configuration`] if the supplied URL is invalid.
    pub fn with_base_url(mut self, base_url: impl AsRef<str>) -> AdapterResult<Self> {
        self.base_url = sanitize_base_url("OpenAI", base_url.as_ref())?;
        Ok(self)
    }

    /// Sets the default sampling temperature used when requests omit it.
    #[must_use]
    pub fn with_default_temperature(mut self, temperature: f32) -> Self {
        self.default_temperature = Some(temperature);
        self
    }

    /// Sets the HTTP request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Supplies an explicit API key.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }
}

/// `OpenAI` adapter that calls the chat completions API over HTTPS.
pub struct OpenAiAdapter {
    client: HyperClient,
    endpoint: Uri,
    metadata: AdapterMetadata,
    api_key: String,
    timeout: Duration,
    default_temperature: Option<f32>,
}

impl fmt::Debug for OpenAiAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiAdapter")
            .field("model", &self.metadata.model())
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl OpenAiAdapter {
    /// Constructs a new adapter with the provided configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Configuration`] if the API key is missing.
    pub fn new(config: OpenAiConfig) -> AdapterResult<Self> {
        let api_key = config
            .api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AdapterError::configuration("OpenAI adapter requires an API key"))?;

        let endpoint = format!("{}v1/chat/completions", config.base_url)
            .parse::<Uri>()
            .map_err(|err| {
                AdapterError::configuration(format!("invalid OpenAI endpoint: {err}"))
            })?;

        Ok(Self {
            client: build_https_client(),
            endpoint,
            metadata: AdapterMetadata::new("openai", config.model.clone()),
            api_key,
            timeout: config.timeout,
            default_temperature: config.default_temperature,
        })
    }

    fn build_request(&self, request: &StructuredRequest) -> ChatCompletionRequest {
        let messages = request.messages().iter().map(map_prompt_message).collect();

        ChatCompletionRequest {
            model: self.metadata.model().to_owned(),
            messages,
            temperature: request.temperature().or(self.default_temperature),
            max_tokens: request.max_output_tokens(),
            response_format: ResponseFormat {
                kind: "json_schema",
                json_schema: JsonSchemaFormat {
                    name: request.schema_name().to_owned(),
                    schema: request.schema().to_json_schema(),
                },
            },
            stream: false,
        }
    }
}

#[async_trait]
impl ModelAdapter for OpenAiAdapter {
    fn metadata(&self) -> &AdapterMetadata {
        &self.metadata
    }

    async fn generate(&self, request: StructuredRequest) -> AdapterResult<AdapterStream> {
        let payload = self.build_request(&request);
        let body = serde_json::to_vec(&payload).map_err(|err| {
            AdapterError::invalid_request(format!("failed to encode OpenAI request: {err}"))
        })?;

        let headers = [(AUTHORIZATION, format!("Bearer {}", self.api_key))];
        let bytes = post_json(
            &self.client,
            "OpenAI",
            self.endpoint.clone(),
            &headers,
            body,
            self.timeout,
        )
        .await?;

        let response: ChatCompletionResponse = serde_json::from_slice(&bytes)
            .map_err(|err| AdapterError::response(format!("failed to decode OpenAI response: {err}")))?;

        let message = response
            .choices
            .into_iter()
            .find_map(|choice| choice.message)
            .ok_or_else(|| AdapterError::response("OpenAI returned no choices"))?;

        if let Some(refusal) = message.refusal {
            return Err(AdapterError::response(format!("OpenAI refused: {refusal}")));
        }
        let content = message.content.unwrap_or_default();

        let stream = stream::once(async move { Ok(InferenceChunk::new(content, true)) });
        Ok(Box::pin(stream))
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    response_format: ResponseFormat,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
    json_schema: JsonSchemaFormat,
}

#[derive(Debug, Serialize)]
struct JsonSchemaFormat {
    name: String,
    schema: Value,
}

#[derive(Debug, Serialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

fn map_prompt_message(message: &PromptMessage) -> OpenAiMessage {
    OpenAiMessage {
        role: message.role().to_string(),
        content: message.content().to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recipe_primitives::{Field, Schema};

    #[test]
    fn base_url_requires_scheme() {
        let err = OpenAiConfig::new("gpt-4o-mini")
            .with_base_url("api.openai.com")
            .expect_err("missing scheme should error");

        assert!(matches!(err, AdapterError::Configuration { .. }));
    }

    #[test]
    fn missing_key_is_rejected() {
        let err = OpenAiAdapter::new(OpenAiConfig::new("gpt-4o-mini")).expect_err("no key");
        assert!(matches!(err, AdapterError::Configuration { .. }));
    }

    #[test]
    fn response_parsing_extracts_content() {
        let json = r#"{
            "choices": [
                { "message": { "content": "{\"imageUrl\":\"x\"}" } }
            ]
        }"#;

        let parsed: ChatCompletionResponse = serde_json::from_str(json).unwrap();
        let content = parsed
            .choices
            .into_iter()
            .find_map(|choice| choice.message.and_then(|msg| msg.content))
            .unwrap();

        assert_eq!(content, "{\"imageUrl\":\"x\"}");
    }

    #[test]
    fn build_request_uses_json_schema_format() {
        let config = OpenAiConfig::new("gpt-4o-mini")
            .with_default_temperature(0.2)
            .with_api_key("test_key");
        let adapter = OpenAiAdapter::new(config).expect("adapter");
        let schema = Schema::object([Field::required("filteredRecipes", Schema::array(Schema::string()))]);
        let request = StructuredRequest::from_prompt("hello", schema)
            .unwrap()
            .with_schema_name("filtered_recipes");

        let payload = serde_json::to_value(adapter.build_request(&request)).unwrap();
        assert_eq!(payload["model"], "gpt-4o-mini");
        assert_eq!(payload["response_format"]["type"], "json_schema");
        assert_eq!(payload["response_format"]["json_schema"]["name"], "filtered_recipes");
        assert_eq!(
            payload["response_format"]["json_schema"]["schema"]["properties"]["filteredRecipes"]["type"],
            "array"
        );
        assert!(payload["temperature"].is_number());
    }
}
