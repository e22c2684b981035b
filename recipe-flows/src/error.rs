//! Error types raised by the invoker and the flows.

use recipe_adapters::AdapterError;
use recipe_primitives::{SchemaViolation, ValidationError};
use recipe_prompts::TemplateError;
use thiserror::Error;

/// Result alias for a single backend invocation.
pub type InvokeResult<T> = Result<T, GenerationFailure>;

/// Result alias for flow execution.
pub type FlowResult<T> = Result<T, FlowError>;

/// The backend call did not yield a conformant value.
#[derive(Debug, Error)]
pub enum GenerationFailure {
    /// Adapter returned an error before or while streaming.
    #[error("backend `{provider}` failed: {source}")]
    Backend {
        /// Provider identifier of the adapter.
        provider: &'static str,
        /// Underlying adapter error.
        #[source]
        source: AdapterError,
    },

    /// The response contained no text.
    #[error("backend returned an empty response")]
    Empty,

    /// The response text was not JSON.
    #[error("backend returned malformed JSON: {reason}")]
    Malformed {
        /// Parser message.
        reason: String,
    },

    /// The JSON did not match the output contract.
    #[error("backend output does not match the contract: {violation}")]
    Nonconforming {
        /// First violation found.
        #[source]
        violation: SchemaViolation,
    },

    /// The conformant JSON could not be decoded into the output type.
    #[error("failed to decode backend output: {reason}")]
    Decode {
        /// Decoder message.
        reason: String,
    },
}

impl GenerationFailure {
    /// Convenience constructor for adapter failures.
    #[must_use]
    pub fn backend(provider: &'static str, source: AdapterError) -> Self {
        Self::Backend { provider, source }
    }
}

/// Failure of a flow or of the JSON request boundary.
#[derive(Debug, Error)]
pub enum FlowError {
    /// The request was rejected by a domain check.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The caller's JSON did not match the flow's input contract.
    #[error("invalid input for `{flow}`: {reason}")]
    InvalidInput {
        /// Flow name.
        flow: &'static str,
        /// Violation or decoder message.
        reason: String,
    },

    /// The prompt could not be rendered.
    #[error("failed to render prompt: {0}")]
    Prompt(#[from] TemplateError),

    /// The backend did not produce a usable value.
    #[error(transparent)]
    Generation(#[from] GenerationFailure),

    /// The result could not be encoded as JSON.
    #[error("failed to encode result: {reason}")]
    Encode {
        /// Encoder message.
        reason: String,
    },
}

impl FlowError {
    /// Convenience constructor for input contract failures.
    #[must_use]
    pub fn invalid_input(flow: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            flow,
            reason: reason.into(),
        }
    }

    /// Whether the caller can fix the failure by changing the request.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::InvalidInput { .. })
    }
}
