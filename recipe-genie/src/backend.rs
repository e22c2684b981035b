//! Builds the configured [`ModelAdapter`].

use std::sync::Arc;

use recipe_adapters::gemini::{GeminiAdapter, GeminiConfig};
use recipe_adapters::ollama::{OllamaAdapter, OllamaConfig};
use recipe_adapters::openai::{OpenAiAdapter, OpenAiConfig};
use recipe_adapters::{AdapterResult, CannedAdapter, ModelAdapter};
use recipe_config::{ProviderConfig, ProviderKind};
use tracing::info;

/// Instantiates the adapter described by `config`.
///
/// The `canned` provider needs no network and answers every request with a
/// minimal document conforming to the requested schema.
///
/// # Errors
///
/// Returns [`recipe_adapters::AdapterError::Configuration`] for a missing API
/// key or an invalid base URL.
pub fn adapter_from_config(config: &ProviderConfig) -> AdapterResult<Arc<dyn ModelAdapter>> {
    let model = config.model();
    let adapter: Arc<dyn ModelAdapter> = match config.kind {
        ProviderKind::Gemini => {
            let mut cfg = GeminiConfig::new(model).with_timeout(config.timeout());
            if let Some(key) = &config.api_key {
                cfg = cfg.with_api_key(key.clone());
            }
            if let Some(url) = &config.base_url {
                cfg = cfg.with_base_url(url)?;
            }
            Arc::new(GeminiAdapter::new(cfg)?)
        }
        ProviderKind::OpenAi => {
            let mut cfg = OpenAiConfig::new(model).with_timeout(config.timeout());
            if let Some(key) = &config.api_key {
                cfg = cfg.with_api_key(key.clone());
            }
            if let Some(url) = &config.base_url {
                cfg = cfg.with_base_url(url)?;
            }
            Arc::new(OpenAiAdapter::new(cfg)?)
        }
        ProviderKind::Ollama => {
            let mut cfg = OllamaConfig::new(model).with_timeout(config.timeout());
            if let Some(url) = &config.base_url {
                cfg = cfg.with_base_url(url)?;
            }
            Arc::new(OllamaAdapter::new(cfg)?)
        }
        ProviderKind::Canned => Arc::new(CannedAdapter::sketching()),
    };

    let metadata = adapter.metadata();
    info!(
        provider = metadata.provider(),
        model = metadata.model(),
        "model adapter ready"
    );
    Ok(adapter)
}

#[cfg(test)]
mod tests {
    use recipe_adapters::AdapterError;

    use super::*;

    fn provider(kind: ProviderKind) -> ProviderConfig {
        ProviderConfig {
            kind,
            ..ProviderConfig::default()
        }
    }

    #[test]
    fn hosted_providers_require_a_key() {
        for kind in [ProviderKind::Gemini, ProviderKind::OpenAi] {
            let err = adapter_from_config(&provider(kind)).err().expect("no key");
            assert!(matches!(err, AdapterError::Configuration { .. }), "{kind}");
        }
    }

    #[test]
    fn builds_keyed_and_local_providers() {
        let mut gemini = provider(ProviderKind::Gemini);
        gemini.api_key = Some("test-key".into());
        let adapter = adapter_from_config(&gemini).unwrap();
        assert_eq!(adapter.metadata().provider(), "gemini");
        assert_eq!(adapter.metadata().model(), "gemini-2.0-flash");

        let mut ollama = provider(ProviderKind::Ollama);
        ollama.model = Some("qwen2.5".into());
        let adapter = adapter_from_config(&ollama).unwrap();
        assert_eq!(adapter.metadata().model(), "qwen2.5");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let mut ollama = provider(ProviderKind::Ollama);
        ollama.base_url = Some("not a url".into());
        assert!(adapter_from_config(&ollama).is_err());
    }

    #[cfg(feature = "flows")]
    #[tokio::test]
    async fn canned_provider_serves_every_flow() {
        use recipe_flows::{FlowKind, RecipeService};
        use serde_json::json;

        let adapter = adapter_from_config(&provider(ProviderKind::Canned)).unwrap();
        let service = RecipeService::new(adapter);
        let list = service
            .dispatch(
                FlowKind::Ingredients,
                json!({ "ingredients": "tomato, rice, onion" }),
            )
            .await
            .unwrap();
        assert!(!list["recipes"].as_array().unwrap().is_empty());

        let filtered = service
            .dispatch(
                FlowKind::Filter,
                json!({ "recipes": ["Paella"], "dietaryRestrictions": "vegan" }),
            )
            .await
            .unwrap();
        assert!(filtered["filteredRecipes"].is_array());
    }
}
