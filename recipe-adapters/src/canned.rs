//! Offline adapter that replays queued replies.
//!
//! Used by tests and by the CLI's `canned` provider. Every request is recorded
//! so callers can assert on the prompt, schema and sampling a flow sent.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use futures::stream;
use recipe_primitives::{Schema, SchemaKind};
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::traits::{
    AdapterError, AdapterMetadata, AdapterResult, AdapterStream, InferenceChunk, ModelAdapter,
    StructuredRequest,
};

/// One queued reply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CannedReply {
    /// Raw text returned as a single chunk.
    Text(String),
    /// Text split over several streamed chunks.
    Chunks(Vec<String>),
    /// A transport failure with the given reason.
    Failure(String),
}

/// What to answer once the queue is drained.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Fallback {
    /// Fail the request.
    #[default]
    Exhausted,
    /// Repeat the same text for every request.
    Text(String),
    /// Synthesize a minimal document satisfying the request schema.
    Sketch,
}

#[derive(Debug, Default)]
struct State {
    replies: VecDeque<CannedReply>,
    requests: Vec<StructuredRequest>,
}

/// Adapter that never touches the network.
#[derive(Debug)]
pub struct CannedAdapter {
    metadata: AdapterMetadata,
    fallback: Fallback,
    state: Mutex<State>,
}

impl Default for CannedAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl CannedAdapter {
    /// Creates an adapter with an empty queue that fails once drained.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: AdapterMetadata::new("canned", "canned"),
            fallback: Fallback::Exhausted,
            state: Mutex::new(State::default()),
        }
    }

    /// Creates an adapter that answers every request with a schema sketch.
    #[must_use]
    pub fn sketching() -> Self {
        Self::new().with_fallback(Fallback::Sketch)
    }

    /// Sets the behaviour once the queue is empty.
    #[must_use]
    pub fn with_fallback(mut self, fallback: Fallback) -> Self {
        self.fallback = fallback;
        self
    }

    /// Queues a JSON document.
    #[must_use]
    pub fn with_json(self, value: &Value) -> Self {
        self.push(CannedReply::Text(value.to_string()));
        self
    }

    /// Queues raw text, which need not be valid JSON.
    #[must_use]
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.push(CannedReply::Text(text.into()));
        self
    }

    /// Queues a transport failure.
    #[must_use]
    pub fn with_failure(self, reason: impl Into<String>) -> Self {
        self.push(CannedReply::Failure(reason.into()));
        self
    }

    /// Appends a reply to the queue.
    pub fn push(&self, reply: CannedReply) {
        self.lock().replies.push_back(reply);
    }

    /// Number of requests received so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.lock().requests.len()
    }

    /// Copies of every request received, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<StructuredRequest> {
        self.lock().requests.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ModelAdapter for CannedAdapter {
    fn metadata(&self) -> &AdapterMetadata {
        &self.metadata
    }

    async fn generate(&self, request: StructuredRequest) -> AdapterResult<AdapterStream> {
        let reply = {
            let mut state = self.lock();
            let reply = state.replies.pop_front();
            state.requests.push(request.clone());
            reply
        };

        let reply = match reply {
            Some(reply) => reply,
            None => match &self.fallback {
                Fallback::Exhausted => {
                    return Err(AdapterError::response("no canned reply queued"));
                }
                Fallback::Text(text) => CannedReply::Text(text.clone()),
                Fallback::Sketch => CannedReply::Text(sketch(request.schema()).to_string()),
            },
        };
        debug!(schema = request.schema_name(), "replaying canned reply");

        match reply {
            CannedReply::Text(text) => {
                let chunk = InferenceChunk::new(text, true);
                Ok(Box::pin(stream::once(async move { Ok(chunk) })))
            }
            CannedReply::Chunks(parts) => {
                let last = parts.len().saturating_sub(1);
                let chunks: Vec<AdapterResult<InferenceChunk>> = parts
                    .into_iter()
                    .enumerate()
                    .map(|(idx, part)| Ok(InferenceChunk::new(part, idx == last)))
                    .collect();
                Ok(Box::pin(stream::iter(chunks)))
            }
            CannedReply::Failure(reason) => Err(AdapterError::transport(reason)),
        }
    }
}

/// Builds the smallest document that satisfies `schema`.
///
/// Required members only, one element per array, the first enum value and
/// the lower bound for integers.
#[must_use]
pub fn sketch(schema: &Schema) -> Value {
    match schema.kind() {
        SchemaKind::String => json!("sample"),
        SchemaKind::Integer { minimum } => json!(minimum.unwrap_or(0).max(1)),
        SchemaKind::Number => json!(1.0),
        SchemaKind::Boolean => json!(false),
        SchemaKind::Enum(values) => values.first().map_or(Value::Null, |value| json!(value)),
        SchemaKind::Array(items) => Value::Array(vec![sketch(items)]),
        SchemaKind::Object(fields) => {
            let members: Map<String, Value> = fields
                .iter()
                .filter(|field| field.is_required())
                .map(|field| (field.name().to_owned(), sketch(field.schema())))
                .collect();
            Value::Object(members)
        }
        SchemaKind::AnyOf(alternatives) => alternatives.first().map_or(Value::Null, sketch),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use recipe_primitives::Field;

    async fn collect(stream: AdapterStream) -> String {
        stream
            .map(|chunk| chunk.unwrap().delta)
            .collect::<Vec<_>>()
            .await
            .concat()
    }

    fn request() -> StructuredRequest {
        StructuredRequest::from_prompt("ping", Schema::string()).unwrap()
    }

    #[tokio::test]
    async fn replays_in_order_and_records() {
        let adapter = CannedAdapter::new()
            .with_text("first")
            .with_json(&json!({"a": 1}));

        assert_eq!(collect(adapter.generate(request()).await.unwrap()).await, "first");
        assert_eq!(
            collect(adapter.generate(request()).await.unwrap()).await,
            "{\"a\":1}"
        );
        assert_eq!(adapter.calls(), 2);
        assert_eq!(adapter.requests()[0].messages()[0].content(), "ping");
    }

    #[tokio::test]
    async fn drained_queue_fails() {
        let adapter = CannedAdapter::new();
        let err = adapter.generate(request()).await.err().expect("exhausted");
        assert!(matches!(err, AdapterError::Response { .. }));
        assert_eq!(adapter.calls(), 1);
    }

    #[tokio::test]
    async fn failures_and_chunks() {
        let adapter = CannedAdapter::new().with_failure("boom");
        adapter.push(CannedReply::Chunks(vec!["{\"a\"".into(), ":2}".into()]));

        let err = adapter.generate(request()).await.err().expect("failure");
        assert!(matches!(err, AdapterError::Transport { .. }));
        assert_eq!(
            collect(adapter.generate(request()).await.unwrap()).await,
            "{\"a\":2}"
        );
    }

    #[test]
    fn sketch_satisfies_schema() {
        let schema = Schema::object([
            Field::required("name", Schema::string().non_empty()),
            Field::required("guests", Schema::integer().minimum(1)),
            Field::required("tags", Schema::array(Schema::enumeration(["a", "b"])).non_empty()),
            Field::optional("note", Schema::string()),
        ]);
        let value = sketch(&schema);
        schema.check(&value).expect("sketch conforms");
        assert!(value.get("note").is_none());
        assert_eq!(value["tags"], json!(["a"]));
    }
}
