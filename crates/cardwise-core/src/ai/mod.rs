//! Pluggable AI backend abstraction
//!
//! All card intelligence (which card to use, what a card earns, which new
//! card would be better) comes from a generative model that receives a prompt
//! with a JSON schema and answers with JSON. This module hides which server
//! answers.
//!
//! # Architecture
//!
//! - `AIBackend` trait: defines the interface for all AI operations
//! - `AIClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `OpenAICompatibleBackend`, `MockBackend`
//!
//! Every call is a single best-effort request. There are no retries and no
//! backoff; failures go straight back to the caller.
//!
//! # Usage
//!
//! ```rust,ignore
//! // Create from environment
//! let ai = AIClient::from_env();
//!
//! if let Some(ref client) = ai {
//!     let result = client.recommend_card(&purchase, &wallet.recommendation_candidates()).await?;
//!     println!("Use card {:?}", result.card_id);
//! }
//! ```
//!
//! # Configuration
//!
//! Environment variables:
//! - `AI_BACKEND`: Backend to use (openai_compatible, mock). Default: openai_compatible
//! - `OPENAI_COMPATIBLE_HOST`: Server URL (required for openai_compatible backend)
//! - `OPENAI_COMPATIBLE_MODEL`: Model name (default: gpt-4o-mini)
//! - `OPENAI_COMPATIBLE_API_KEY`: API key if required (optional)

mod mock;
mod openai_compatible;
pub mod parsing;
pub mod types;

pub use mock::MockBackend;
pub use openai_compatible::{OpenAICompatibleBackend, DEFAULT_MODEL};
pub use types::*;

use async_trait::async_trait;

use crate::config::{AiConfig, Config};
use crate::error::Result;
use crate::models::{
    CardSummary, DraftCard, MarketRecommendation, PurchaseContext, RecommendationResult,
};

/// Trait defining the interface for all AI backends
///
/// Backends should be Send + Sync to allow use across async tasks.
#[async_trait]
pub trait AIBackend: Send + Sync {
    /// Pick the wallet card to use for a purchase
    async fn recommend_card(
        &self,
        purchase: &PurchaseContext,
        cards: &[CardSummary],
    ) -> Result<RecommendationResult>;

    /// Suggest a card outside the wallet that suits the purchase better
    async fn find_market_card(
        &self,
        purchase: &PurchaseContext,
        cards: &[CardSummary],
    ) -> Result<MarketRecommendation>;

    /// Look up a card's bank, product, network, rewards and benefits
    async fn lookup_card(&self, query: &str) -> Result<DraftCard>;

    /// Check if the backend is available
    async fn health_check(&self) -> bool;

    /// Get the model name
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete AI client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum AIClient {
    /// OpenAI-compatible backend (OpenAI, vLLM, LocalAI, llama-server, etc.)
    OpenAICompatible(OpenAICompatibleBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl AIClient {
    /// Create an AI client from environment variables
    ///
    /// Returns None if the required environment variables are not set.
    pub fn from_env() -> Option<Self> {
        let mut config = Config::default();
        config.apply_env();
        Self::from_config(&config.ai)
    }

    /// Create an AI client from configuration
    ///
    /// Checks `backend` to determine which backend to use:
    /// - `openai_compatible` (default): needs a host
    /// - `mock`: deterministic mock backend
    ///
    /// Returns None if the selected backend is missing required settings.
    pub fn from_config(config: &AiConfig) -> Option<Self> {
        match config.backend.to_lowercase().as_str() {
            "openai_compatible" | "openai" | "vllm" | "localai" | "llamacpp" => {
                OpenAICompatibleBackend::from_config(config).map(AIClient::OpenAICompatible)
            }
            "mock" => Some(AIClient::Mock(MockBackend::new())),
            _ => {
                tracing::warn!(backend = %config.backend, "Unknown AI backend, falling back to openai_compatible");
                OpenAICompatibleBackend::from_config(config).map(AIClient::OpenAICompatible)
            }
        }
    }

    /// Create an OpenAI-compatible backend directly
    pub fn openai_compatible(host: &str, model: &str) -> Self {
        AIClient::OpenAICompatible(OpenAICompatibleBackend::new(host, model))
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        AIClient::Mock(MockBackend::new())
    }

    /// Create a new instance with a different model
    pub fn with_model(&self, model: &str) -> Self {
        match self {
            AIClient::OpenAICompatible(b) => AIClient::OpenAICompatible(b.with_model(model)),
            AIClient::Mock(b) => AIClient::Mock(b.with_model(model)),
        }
    }
}

// Implement AIBackend for AIClient by delegating to the inner backend
#[async_trait]
impl AIBackend for AIClient {
    async fn recommend_card(
        &self,
        purchase: &PurchaseContext,
        cards: &[CardSummary],
    ) -> Result<RecommendationResult> {
        match self {
            AIClient::OpenAICompatible(b) => b.recommend_card(purchase, cards).await,
            AIClient::Mock(b) => b.recommend_card(purchase, cards).await,
        }
    }

    async fn find_market_card(
        &self,
        purchase: &PurchaseContext,
        cards: &[CardSummary],
    ) -> Result<MarketRecommendation> {
        match self {
            AIClient::OpenAICompatible(b) => b.find_market_card(purchase, cards).await,
            AIClient::Mock(b) => b.find_market_card(purchase, cards).await,
        }
    }

    async fn lookup_card(&self, query: &str) -> Result<DraftCard> {
        match self {
            AIClient::OpenAICompatible(b) => b.lookup_card(query).await,
            AIClient::Mock(b) => b.lookup_card(query).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            AIClient::OpenAICompatible(b) => b.health_check().await,
            AIClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            AIClient::OpenAICompatible(b) => b.model(),
            AIClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            AIClient::OpenAICompatible(b) => b.host(),
            AIClient::Mock(b) => b.host(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_client_mock() {
        let client = AIClient::mock();
        assert_eq!(client.model(), "mock");
        assert_eq!(client.host(), "mock://localhost");
    }

    #[tokio::test]
    async fn test_mock_health_check() {
        let client = AIClient::mock();
        assert!(client.health_check().await);
    }

    #[test]
    fn test_from_config_mock() {
        let config = AiConfig {
            backend: "MOCK".into(),
            ..Default::default()
        };
        assert!(matches!(AIClient::from_config(&config), Some(AIClient::Mock(_))));
    }

    #[test]
    fn test_from_config_requires_host() {
        let config = AiConfig::default();
        assert!(AIClient::from_config(&config).is_none());

        let config = AiConfig {
            host: Some("http://localhost:8080".into()),
            model: "llama3.2".into(),
            ..Default::default()
        };
        let client = AIClient::from_config(&config).unwrap();
        assert_eq!(client.model(), "llama3.2");
        assert_eq!(client.host(), "http://localhost:8080");
    }

    #[test]
    fn test_unknown_backend_falls_back() {
        let config = AiConfig {
            backend: "gemini-magic".into(),
            host: Some("http://localhost:8080".into()),
            ..Default::default()
        };
        assert!(matches!(
            AIClient::from_config(&config),
            Some(AIClient::OpenAICompatible(_))
        ));
    }

    #[test]
    fn test_with_model() {
        let client = AIClient::openai_compatible("http://localhost:8080", "a").with_model("b");
        assert_eq!(client.model(), "b");
    }
}
