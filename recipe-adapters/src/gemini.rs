//! Google Gemini adapter using `responseSchema` constrained output.

use std::{env, fmt, time::Duration};

use async_trait::async_trait;
use futures::stream;
use hyper::Uri;
use recipe_primitives::{Schema, SchemaKind};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::http_client::{HyperClient, build_https_client, post_json, sanitize_base_url};
use crate::traits::{
    AdapterError, AdapterMetadata, AdapterResult, AdapterStream, InferenceChunk, MessageRole,
    ModelAdapter, PromptMessage, StructuredRequest,
};

/// Environment variable used when loading configuration automatically.
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Model used when none is configured.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

/// Configuration for the Gemini adapter.
#[derive(Clone, Debug)]
pub struct GeminiConfig {
    api_key: Option<String>,
    model: String,
    base_url: String,
    timeout: Duration,
    default_temperature: Option<f32>,
}

impl GeminiConfig {
    /// Creates a configuration using the supplied model identifier.
    #[must_use]
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            api_key: None,
            model: model.into(),
            base_url: "https://generativelanguage.googleapis.com/".to_owned(),
            timeout: Duration::from_secs(60),
            default_temperature: None,
        }
    }

    /// Loads the API key from the `GEMINI_API_KEY` environment variable.
    #[must_use]
    pub fn from_env(model: impl Into<String>) -> Self {
        let mut cfg = Self::new(model);
        cfg.api_key = env::var(GEMINI_API_KEY_ENV).ok();
        cfg
    }

    /// Overrides the base URL used for API calls.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Configuration`] if the supplied URL is invalid.
    pub fn with_base_url(mut self, base_url: impl AsRef<str>) -> AdapterResult<Self> {
        self.base_url = sanitize_base_url("Gemini", base_url.as_ref())?;
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

/// Google Gemini adapter that calls the official API over HTTPS.
pub struct GeminiAdapter {
    client: HyperClient,
    base_endpoint: String,
    metadata: AdapterMetadata,
    api_key: String,
    timeout: Duration,
    default_temperature: Option<f32>,
}

impl fmt::Debug for GeminiAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiAdapter")
            .field("model", &self.metadata.model())
            .field("base_endpoint", &self.base_endpoint)
            .finish_non_exhaustive()
    }
}

impl GeminiAdapter {
    /// Constructs a new adapter with the provided configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Configuration`] if the API key is missing or blank.
    pub fn new(config: GeminiConfig) -> AdapterResult<Self> {
        let api_key = config
            .api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AdapterError::configuration("Gemini adapter requires an API key"))?;

        let metadata = AdapterMetadata::new("gemini", config.model.clone());
        let base_endpoint = format!(
            "{}v1beta/models/{}:generateContent",
            config.base_url, config.model
        );

        Ok(Self {
            client: build_https_client(),
            base_endpoint,
            metadata,
            api_key,
            timeout: config.timeout,
            default_temperature: config.default_temperature,
        })
    }

    fn build_request(&self, request: &StructuredRequest) -> GenerateContentRequest {
        let parts: Vec<Part> = request
            .messages()
            .iter()
            .filter(|msg| msg.role() == MessageRole::System)
            .map(|msg| Part {
                text: msg.content().to_owned(),
            })
            .collect();
        let system_instruction = (!parts.is_empty()).then_some(SystemInstruction { parts });

        let contents = request
            .messages()
            .iter()
            .filter(|msg| msg.role() != MessageRole::System)
            .map(map_prompt_message)
            .collect();

        GenerateContentRequest {
            system_instruction,
            contents,
            generation_config: GenerationConfig {
                temperature: request.temperature().or(self.default_temperature),
                max_output_tokens: request.max_output_tokens(),
                response_mime_type: "application/json",
                response_schema: gemini_schema(request.schema()),
            },
        }
    }

    fn build_uri(&self) -> AdapterResult<Uri> {
        format!("{}?key={}", self.base_endpoint, self.api_key)
            .parse::<Uri>()
            .map_err(|err| AdapterError::configuration(format!("invalid Gemini endpoint: {err}")))
    }
}

#[async_trait]
impl ModelAdapter for GeminiAdapter {
    fn metadata(&self) -> &AdapterMetadata {
        &self.metadata
    }

    async fn generate(&self, request: StructuredRequest) -> AdapterResult<AdapterStream> {
        let payload = self.build_request(&request);
        let body = serde_json::to_vec(&payload).map_err(|err| {
            AdapterError::invalid_request(format!("failed to encode Gemini request: {err}"))
        })?;

        debug!(
            model = self.metadata.model(),
            schema = request.schema_name(),
            "sending Gemini generateContent request"
        );
        let bytes = post_json(
            &self.client,
            "Gemini",
            self.build_uri()?,
            &[],
            body,
            self.timeout,
        )
        .await?;

        let response: GenerateContentResponse = serde_json::from_slice(&bytes)
            .map_err(|err| AdapterError::response(format!("failed to decode Gemini response: {err}")))?;

        if response.candidates.is_empty() {
            let reason = response
                .prompt_feedback
                .and_then(|feedback| feedback.block_reason)
                .unwrap_or_else(|| "no candidates returned".to_owned());
            return Err(AdapterError::response(format!("Gemini returned no content: {reason}")));
        }

        let content = response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .map(|part| part.text)
                    .collect::<String>()
            })
            .unwrap_or_default();

        let stream = stream::once(async move { Ok(InferenceChunk::new(content, true)) });
        Ok(Box::pin(stream))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<SystemInstruction>,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct SystemInstruction {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    role: String,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    response_mime_type: &'static str,
    response_schema: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

fn map_prompt_message(message: &PromptMessage) -> Content {
    let role = match message.role() {
        MessageRole::Assistant => "model",
        MessageRole::User | MessageRole::System => "user",
    };

    Content {
        role: role.to_owned(),
        parts: vec![Part {
            text: message.content().to_owned(),
        }],
    }
}

/// Renders a schema in Gemini's OpenAPI subset.
///
/// Types are upper case, objects carry `propertyOrdering` so fields come back
/// in declaration order, and string length bounds are dropped because the API
/// rejects them.
fn gemini_schema(schema: &Schema) -> Value {
    let mut out = Map::new();
    match schema.kind() {
        SchemaKind::String => {
            out.insert("type".into(), json!("STRING"));
        }
        SchemaKind::Integer { minimum } => {
            out.insert("type".into(), json!("INTEGER"));
            if let Some(min) = minimum {
                out.insert("minimum".into(), json!(min));
            }
        }
        SchemaKind::Number => {
            out.insert("type".into(), json!("NUMBER"));
        }
        SchemaKind::Boolean => {
            out.insert("type".into(), json!("BOOLEAN"));
        }
        SchemaKind::Enum(values) => {
            out.insert("type".into(), json!("STRING"));
            out.insert("format".into(), json!("enum"));
            out.insert("enum".into(), json!(values));
        }
        SchemaKind::Array(items) => {
            out.insert("type".into(), json!("ARRAY"));
            out.insert("items".into(), gemini_schema(items));
            if schema.is_non_empty() {
                out.insert("minItems".into(), json!(1));
            }
        }
        SchemaKind::Object(fields) => {
            let properties: Map<String, Value> = fields
                .iter()
                .map(|field| (field.name().to_owned(), gemini_schema(field.schema())))
                .collect();
            let ordering: Vec<&str> = fields.iter().map(|field| field.name()).collect();
            let required: Vec<&str> = fields
                .iter()
                .filter(|field| field.is_required())
                .map(|field| field.name())
                .collect();
            out.insert("type".into(), json!("OBJECT"));
            out.insert("properties".into(), Value::Object(properties));
            out.insert("propertyOrdering".into(), json!(ordering));
            out.insert("required".into(), json!(required));
        }
        SchemaKind::AnyOf(alternatives) => {
            let rendered: Vec<Value> = alternatives.iter().map(gemini_schema).collect();
            out.insert("anyOf".into(), Value::Array(rendered));
        }
    }
    if let Some(description) = schema.description() {
        out.insert("description".into(), json!(description));
    }
    Value::Object(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use recipe_primitives::Field;

    fn adapter() -> GeminiAdapter {
        let config = GeminiConfig::new("gemini-2.0-flash").with_api_key("test_key");
        GeminiAdapter::new(config).expect("adapter")
    }

    #[test]
    fn base_url_requires_scheme() {
        let err = GeminiConfig::new("gemini-2.0-flash")
            .with_base_url("generativelanguage.googleapis.com")
            .expect_err("missing scheme should error");

        assert!(matches!(err, AdapterError::Configuration { .. }));
    }

    #[test]
    fn blank_api_key_is_rejected() {
        let err = GeminiAdapter::new(GeminiConfig::new("m").with_api_key("  "))
            .expect_err("blank key");
        assert!(matches!(err, AdapterError::Configuration { .. }));
    }

    #[test]
    fn prompt_mapping_uses_model_role() {
        let message = PromptMessage::new(MessageRole::Assistant, "response");
        let mapped = map_prompt_message(&message);
        assert_eq!(mapped.role, "model");
        assert_eq!(mapped.parts[0].text, "response");
    }

    #[test]
    fn build_request_sets_structured_output() {
        let schema = Schema::object([Field::required("name", Schema::string().non_empty())]);
        let request = StructuredRequest::new(
            vec![
                PromptMessage::new(MessageRole::System, "You are helpful"),
                PromptMessage::new(MessageRole::User, "hello"),
            ],
            schema,
        )
        .unwrap()
        .with_temperature(0.2);

        let payload = serde_json::to_value(adapter().build_request(&request)).unwrap();
        let config = &payload["generationConfig"];
        assert_eq!(config["responseMimeType"], "application/json");
        assert_eq!(config["responseSchema"]["type"], "OBJECT");
        assert_eq!(config["responseSchema"]["properties"]["name"]["type"], "STRING");
        assert!(config["responseSchema"]["properties"]["name"].get("minLength").is_none());
        assert_eq!(payload["systemInstruction"]["parts"][0]["text"], "You are helpful");
        assert_eq!(payload["contents"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn user_only_request_has_no_system_instruction() {
        let request = StructuredRequest::from_prompt("hello", Schema::string()).unwrap();
        let payload = serde_json::to_value(adapter().build_request(&request)).unwrap();
        assert!(payload.get("systemInstruction").is_none());
        assert_eq!(payload["contents"][0]["role"], "user");
    }

    #[test]
    fn schema_conversion_keeps_order_and_enums() {
        let schema = Schema::object([
            Field::required("b", Schema::array(Schema::string()).non_empty()),
            Field::optional("a", Schema::enumeration(["x", "y"])),
        ]);
        let rendered = gemini_schema(&schema);
        assert_eq!(rendered["propertyOrdering"], json!(["b", "a"]));
        assert_eq!(rendered["required"], json!(["b"]));
        assert_eq!(rendered["properties"]["b"]["minItems"], 1);
        assert_eq!(rendered["properties"]["a"]["format"], "enum");
        assert_eq!(rendered["properties"]["a"]["enum"], json!(["x", "y"]));
    }

    #[test]
    fn response_parsing_joins_parts() {
        let json = r#"{
            "candidates": [
                { "content": { "role": "model", "parts": [{ "text": "{\"a\"" }, { "text": ":1}" }] } }
            ]
        }"#;
        let parsed: GenerateContentResponse = serde_json::from_str(json).unwrap();
        let text: String = parsed.candidates[0]
            .content
            .as_ref()
            .unwrap()
            .parts
            .iter()
            .map(|part| part.text.as_str())
            .collect();
        assert_eq!(text, "{\"a\":1}");
    }
}
