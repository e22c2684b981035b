//! Shared model adapter traits and data structures.

use std::fmt;
use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use futures::Stream;
use recipe_primitives::Schema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result alias used by model adapters.
pub type AdapterResult<T> = Result<T, AdapterError>;

/// Streaming response emitted by [`ModelAdapter::generate`].
pub type AdapterStream = Pin<Box<dyn Stream<Item = AdapterResult<InferenceChunk>> + Send>>;

/// Error type shared by adapter implementations.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Adapter is misconfigured or missing credentials.
    #[error("adapter not configured: {reason}")]
    Configuration {
        /// Additional context for the failure.
        reason: String,
    },

    /// The supplied request was invalid for the target model.
    #[error("invalid generation request: {reason}")]
    InvalidRequest {
        /// Reason describing why the request could not be processed.
        reason: String,
    },

    /// Transport-level failures (network, protocol, timeouts).
    #[error("adapter transport error: {reason}")]
    Transport {
        /// Additional context about the error.
        reason: String,
    },

    /// The provider rejected the request due to rate limiting.
    #[error("adapter rate limited (retry after {retry_after:?})")]
    RateLimited {
        /// Suggested delay before retrying.
        retry_after: Option<Duration>,
    },

    /// The provider returned an error status or a malformed envelope.
    #[error("adapter response error: {reason}")]
    Response {
        /// Additional context about the response failure.
        reason: String,
    },
}

impl AdapterError {
    /// Convenience constructor for invalid requests.
    #[must_use]
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            reason: reason.into(),
        }
    }

    /// Convenience constructor for configuration issues.
    #[must_use]
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    /// Convenience constructor for transport failures.
    #[must_use]
    pub fn transport(reason: impl Into<String>) -> Self {
        Self::Transport {
            reason: reason.into(),
        }
    }

    /// Convenience constructor for response failures.
    #[must_use]
    pub fn response(reason: impl Into<String>) -> Self {
        Self::Response {
            reason: reason.into(),
        }
    }
}

/// Minimal metadata describing a model adapter instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdapterMetadata {
    provider: &'static str,
    model: String,
}

impl AdapterMetadata {
    /// Creates metadata for the supplied provider and model identifier.
    #[must_use]
    pub fn new(provider: &'static str, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    /// Returns the provider identifier (e.g., "gemini").
    #[must_use]
    pub const fn provider(&self) -> &'static str {
        self.provider
    }

    /// Returns the configured model name.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

/// Roles supported in chat-style prompts.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System messages steer the assistant behaviour.
    System,
    /// User-authored content.
    User,
    /// Assistant (model) responses.
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        })
    }
}

/// Represents an instruction or message in a chat-style prompt.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct PromptMessage {
    role: MessageRole,
    content: String,
}

impl PromptMessage {
    /// Creates a new prompt message.
    #[must_use]
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Returns the message role.
    #[must_use]
    pub const fn role(&self) -> MessageRole {
        self.role
    }

    /// Returns the message content.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Schema-constrained generation request.
///
/// Adapters translate `schema` into the provider's constrained decoding
/// option so the model answers with a JSON document of that shape.
#[derive(Clone, Debug, PartialEq)]
pub struct StructuredRequest {
    messages: Vec<PromptMessage>,
    schema: Schema,
    schema_name: String,
    max_output_tokens: Option<u32>,
    temperature: Option<f32>,
}

impl StructuredRequest {
    /// Creates a request with the supplied messages and output schema.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::InvalidRequest`] if the message list is empty.
    pub fn new(messages: Vec<PromptMessage>, schema: Schema) -> AdapterResult<Self> {
        if messages.is_empty() {
            return Err(AdapterError::invalid_request(
                "generation request requires at least one message",
            ));
        }

        Ok(Self {
            messages,
            schema,
            schema_name: "response".to_owned(),
            max_output_tokens: None,
            temperature: None,
        })
    }

    /// Creates a single-turn request from rendered prompt text.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::InvalidRequest`] if the prompt is blank.
    pub fn from_prompt(prompt: impl Into<String>, schema: Schema) -> AdapterResult<Self> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(AdapterError::invalid_request("prompt text is empty"));
        }
        Self::new(vec![PromptMessage::new(MessageRole::User, prompt)], schema)
    }

    /// Names the schema; some providers require an identifier.
    #[must_use]
    pub fn with_schema_name(mut self, name: impl Into<String>) -> Self {
        self.schema_name = name.into();
        self
    }

    /// Sets the maximum output token budget.
    #[must_use]
    pub fn with_max_output_tokens(mut self, tokens: u32) -> Self {
        self.max_output_tokens = Some(tokens);
        self
    }

    /// Sets the sampling temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Returns the prompt messages.
    #[must_use]
    pub fn messages(&self) -> &[PromptMessage] {
        &self.messages
    }

    /// Returns the expected output shape.
    #[must_use]
    pub const fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns the schema identifier.
    #[must_use]
    pub fn schema_name(&self) -> &str {
        &self.schema_name
    }

    /// Returns the configured maximum output tokens.
    #[must_use]
    pub const fn max_output_tokens(&self) -> Option<u32> {
        self.max_output_tokens
    }

    /// Returns the configured sampling temperature.
    #[must_use]
    pub const fn temperature(&self) -> Option<f32> {
        self.temperature
    }
}

/// Streaming chunk returned by the adapter.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct InferenceChunk {
    /// Partial text emitted by the provider.
    pub delta: String,
    /// Whether the generation is complete.
    pub done: bool,
}

impl InferenceChunk {
    /// Creates a new chunk.
    #[must_use]
    pub fn new(delta: impl Into<String>, done: bool) -> Self {
        Self {
            delta: delta.into(),
            done,
        }
    }
}

/// Generative backend capable of schema-constrained output.
#[async_trait]
pub trait ModelAdapter: Send + Sync {
    /// Returns basic metadata describing the adapter instance.
    fn metadata(&self) -> &AdapterMetadata;

    /// Executes the request. The concatenated chunk text is the JSON document.
    async fn generate(&self, request: StructuredRequest) -> AdapterResult<AdapterStream>;
}
