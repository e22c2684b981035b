//! Single structured call to a model backend.

use std::sync::Arc;

use futures::StreamExt;
use recipe_adapters::{ModelAdapter, StructuredRequest};
use recipe_primitives::Schema;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::{GenerationFailure, InvokeResult};

/// Sampling parameters fixed per flow.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sampling {
    /// Sampling temperature.
    pub temperature: f32,
    /// Optional output token budget.
    pub max_output_tokens: Option<u32>,
}

impl Sampling {
    /// Sampling at the given temperature with no token budget.
    #[must_use]
    pub const fn with_temperature(temperature: f32) -> Self {
        Self {
            temperature,
            max_output_tokens: None,
        }
    }

    /// Adds an output token budget.
    #[must_use]
    pub const fn max_output_tokens(mut self, tokens: u32) -> Self {
        self.max_output_tokens = Some(tokens);
        self
    }
}

/// Sends a prompt plus output schema and returns a decoded, conformant value.
///
/// One attempt per call; failures are returned, never retried.
#[derive(Clone)]
pub struct ModelInvoker {
    adapter: Arc<dyn ModelAdapter>,
}

impl std::fmt::Debug for ModelInvoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let metadata = self.adapter.metadata();
        f.debug_struct("ModelInvoker")
            .field("provider", &metadata.provider())
            .field("model", &metadata.model())
            .finish()
    }
}

impl ModelInvoker {
    /// Wraps an adapter.
    #[must_use]
    pub fn new(adapter: Arc<dyn ModelAdapter>) -> Self {
        Self { adapter }
    }

    /// Returns the wrapped adapter.
    #[must_use]
    pub fn adapter(&self) -> &Arc<dyn ModelAdapter> {
        &self.adapter
    }

    /// Invokes the backend and decodes its answer as `T`.
    ///
    /// `schema_name` identifies the output shape to providers that require one.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationFailure`] when the backend fails, answers with
    /// nothing, answers with non-JSON text, or answers with JSON that does not
    /// satisfy `schema` or cannot be decoded as `T`.
    pub async fn invoke<T>(
        &self,
        prompt: &str,
        schema: &Schema,
        schema_name: &str,
        sampling: Sampling,
    ) -> InvokeResult<T>
    where
        T: DeserializeOwned,
    {
        let value = self.invoke_value(prompt, schema, schema_name, sampling).await?;
        serde_json::from_value(value).map_err(|err| GenerationFailure::Decode {
            reason: err.to_string(),
        })
    }

    /// Invokes the backend and returns the checked JSON value undecoded.
    ///
    /// # Errors
    ///
    /// See [`ModelInvoker::invoke`].
    pub async fn invoke_value(
        &self,
        prompt: &str,
        schema: &Schema,
        schema_name: &str,
        sampling: Sampling,
    ) -> InvokeResult<Value> {
        let provider = self.adapter.metadata().provider();

        let mut request = StructuredRequest::from_prompt(prompt, schema.clone())
            .map_err(|err| GenerationFailure::backend(provider, err))?
            .with_schema_name(schema_name)
            .with_temperature(sampling.temperature);
        if let Some(tokens) = sampling.max_output_tokens {
            request = request.with_max_output_tokens(tokens);
        }

        debug!(
            provider,
            model = self.adapter.metadata().model(),
            schema = schema_name,
            prompt_chars = prompt.chars().count(),
            temperature = sampling.temperature,
            "invoking model"
        );

        let mut stream = self
            .adapter
            .generate(request)
            .await
            .map_err(|err| GenerationFailure::backend(provider, err))?;

        let mut response = String::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|err| GenerationFailure::backend(provider, err))?;
            response.push_str(&chunk.delta);
            if chunk.done {
                break;
            }
        }
        debug!(provider, response_chars = response.chars().count(), "model responded");

        let body = strip_code_fence(&response);
        if body.is_empty() {
            return Err(GenerationFailure::Empty);
        }

        let value: Value = serde_json::from_str(body).map_err(|err| GenerationFailure::Malformed {
            reason: err.to_string(),
        })?;
        schema
            .check(&value)
            .map_err(|violation| GenerationFailure::Nonconforming { violation })?;
        Ok(value)
    }
}

/// Removes a surrounding markdown code fence some models wrap JSON in.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(body) = trimmed
        .strip_prefix("```")
        .and_then(|rest| rest.strip_suffix("```"))
    else {
        return trimmed;
    };
    // An info string such as `json` may follow the opening fence.
    match body.split_once('\n') {
        Some((info, inner)) if is_info_string(info) => inner.trim(),
        _ => body.trim(),
    }
}

fn is_info_string(line: &str) -> bool {
    let line = line.trim();
    !line.starts_with(['{', '[']) && !line.contains(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use recipe_adapters::{AdapterError, CannedAdapter};
    use recipe_primitives::Field;
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Named {
        name: String,
    }

    fn schema() -> Schema {
        Schema::object([Field::required("name", Schema::string().non_empty())])
    }

    fn invoker(adapter: CannedAdapter) -> (Arc<CannedAdapter>, ModelInvoker) {
        let adapter = Arc::new(adapter);
        (adapter.clone(), ModelInvoker::new(adapter))
    }

    async fn run(adapter: CannedAdapter) -> InvokeResult<Named> {
        let (_, invoker) = invoker(adapter);
        invoker
            .invoke("prompt", &schema(), "named", Sampling::with_temperature(0.5))
            .await
    }

    #[tokio::test]
    async fn decodes_conformant_output() {
        let (adapter, invoker) = invoker(CannedAdapter::new().with_json(&json!({"name": "Paella"})));
        let named: Named = invoker
            .invoke(
                "prompt",
                &schema(),
                "named",
                Sampling::with_temperature(0.2).max_output_tokens(512),
            )
            .await
            .unwrap();
        assert_eq!(named.name, "Paella");

        let sent = &adapter.requests()[0];
        assert_eq!(sent.temperature(), Some(0.2));
        assert_eq!(sent.max_output_tokens(), Some(512));
        assert_eq!(sent.schema_name(), "named");
        assert_eq!(sent.schema(), &schema());
    }

    #[tokio::test]
    async fn accepts_fenced_json() {
        let named = run(CannedAdapter::new().with_text("```json\n{\"name\": \"Gazpacho\"}\n```"))
            .await
            .unwrap();
        assert_eq!(named.name, "Gazpacho");
    }

    #[tokio::test]
    async fn classifies_failures() {
        let err = run(CannedAdapter::new().with_text("   ")).await.expect_err("empty");
        assert!(matches!(err, GenerationFailure::Empty));

        let err = run(CannedAdapter::new().with_text("not json")).await.expect_err("malformed");
        assert!(matches!(err, GenerationFailure::Malformed { .. }));

        let err = run(CannedAdapter::new().with_json(&json!({"name": ""})))
            .await
            .expect_err("nonconforming");
        assert!(matches!(err, GenerationFailure::Nonconforming { .. }));

        let err = run(CannedAdapter::new().with_failure("offline"))
            .await
            .expect_err("backend");
        assert!(matches!(
            err,
            GenerationFailure::Backend {
                provider: "canned",
                source: AdapterError::Transport { .. }
            }
        ));
    }

    #[test]
    fn fence_stripping() {
        assert_eq!(strip_code_fence("```\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fence("```{\"a\":1}```"), "{\"a\":1}");
        assert_eq!(strip_code_fence(" {\"a\":1} "), "{\"a\":1}");
        assert_eq!(strip_code_fence("```{\"a\":\n1}```"), "{\"a\":\n1}");
        assert_eq!(strip_code_fence("```[1,\n2]\n```"), "[1,\n2]");
        assert_eq!(strip_code_fence("```json\n{\"a\":\n1}\n```"), "{\"a\":\n1}");
    }
}
