//! OpenAI-compatible backend implementation
//!
//! Works with any server that implements the OpenAI chat completions API:
//! - OpenAI itself (https://api.openai.com)
//! - vLLM (http://localhost:8000)
//! - LocalAI (http://localhost:8080)
//! - llama-server / llama.cpp (http://localhost:8080)
//!
//! # Configuration
//!
//! Environment variables:
//! - `OPENAI_COMPATIBLE_HOST`: Server URL (required)
//! - `OPENAI_COMPATIBLE_MODEL`: Model name (default: gpt-4o-mini)
//! - `OPENAI_COMPATIBLE_API_KEY`: API key if required (optional)

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AiConfig;
use crate::error::{Error, Result};
use crate::models::{
    CardSummary, DraftCard, MarketRecommendation, PurchaseContext, RecommendationResult,
};
use crate::prompts::PromptLibrary;

use super::parsing::{parse_card_details, parse_market_recommendation, parse_recommendation};
use super::AIBackend;

/// Model used when none is configured
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// OpenAI-compatible backend
///
/// Works with any server implementing the OpenAI `/v1/chat/completions` API.
///
/// # Example
///
/// ```rust,ignore
/// // OpenAI
/// export OPENAI_COMPATIBLE_HOST="https://api.openai.com"
/// export OPENAI_COMPATIBLE_API_KEY="sk-..."
///
/// // vLLM on the LAN
/// export OPENAI_COMPATIBLE_HOST="http://192.168.1.100:8000"
/// export OPENAI_COMPATIBLE_MODEL="meta-llama/Llama-3.2-3B-Instruct"
/// ```
#[derive(Clone)]
pub struct OpenAICompatibleBackend {
    http_client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    prompts: PromptLibrary,
}

impl OpenAICompatibleBackend {
    /// Create a new OpenAI-compatible backend
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: None,
            prompts: PromptLibrary::new(),
        }
    }

    /// Create with an API key
    pub fn with_api_key(base_url: &str, model: &str, api_key: &str) -> Self {
        let mut backend = Self::new(base_url, model);
        backend.api_key = Some(api_key.to_string());
        backend
    }

    /// Create a new instance with a different model
    pub fn with_model(&self, model: &str) -> Self {
        Self {
            model: model.to_string(),
            ..self.clone()
        }
    }

    /// Use a specific prompt library (e.g. embedded defaults only)
    pub fn with_prompts(mut self, prompts: PromptLibrary) -> Self {
        self.prompts = prompts;
        self
    }

    /// Create from configuration; None without a host
    pub fn from_config(config: &AiConfig) -> Option<Self> {
        let host = config.host.as_deref()?;
        let mut backend = Self::new(host, &config.model);
        backend.api_key = config.api_key.clone();
        Some(backend)
    }

    /// Make a chat completion request
    async fn chat_completion(&self, prompt: &str) -> Result<String> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: Some(0.1),
            max_tokens: None,
            stream: false,
        };

        let mut req_builder = self
            .http_client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .json(&request);

        if let Some(ref api_key) = self.api_key {
            req_builder = req_builder.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = req_builder.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::InvalidData(format!(
                "OpenAI API error {}: {}",
                status, body
            )));
        }

        let chat_response: ChatCompletionResponse = response.json().await?;

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| Error::InvalidData("No response from OpenAI API".into()))
    }
}

/// OpenAI chat completion request
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

/// Chat message
#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// OpenAI chat completion response
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

/// Chat completion choice
#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

/// Chat response message
#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[async_trait]
impl AIBackend for OpenAICompatibleBackend {
    async fn recommend_card(
        &self,
        purchase: &PurchaseContext,
        cards: &[CardSummary],
    ) -> Result<RecommendationResult> {
        let prompt = self.prompts.recommend_card(purchase, cards)?;
        let response = self.chat_completion(&prompt).await?;
        debug!("OpenAI-compatible recommendation response: {}", response);

        parse_recommendation(&response)
    }

    async fn find_market_card(
        &self,
        purchase: &PurchaseContext,
        cards: &[CardSummary],
    ) -> Result<MarketRecommendation> {
        let prompt = self.prompts.find_market_card(purchase, cards)?;
        let response = self.chat_completion(&prompt).await?;
        debug!("OpenAI-compatible market response: {}", response);

        parse_market_recommendation(&response)
    }

    async fn lookup_card(&self, query: &str) -> Result<DraftCard> {
        let prompt = self.prompts.lookup_card(query)?;
        let response = self.chat_completion(&prompt).await?;
        debug!("OpenAI-compatible card lookup response: {}", response);

        parse_card_details(&response)
    }

    async fn health_check(&self) -> bool {
        // Try /v1/models first (standard OpenAI endpoint)
        if let Ok(resp) = self
            .http_client
            .get(format!("{}/v1/models", self.base_url))
            .send()
            .await
        {
            if resp.status().is_success() {
                return true;
            }
        }

        // Try /health (common for LocalAI, llama-server)
        if let Ok(resp) = self
            .http_client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
        {
            if resp.status().is_success() {
                return true;
            }
        }

        // Try root endpoint (some servers return 200 on /)
        if let Ok(resp) = self.http_client.get(&self.base_url).send().await {
            if resp.status().is_success() {
                return true;
            }
        }

        false
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Reward;
    use crate::test_utils::MockOpenAIServer;

    fn purchase() -> PurchaseContext {
        PurchaseContext {
            item: "Groceries".into(),
            merchant: Some("Whole Foods".into()),
            amount: Some("120".into()),
            online: false,
        }
    }

    fn summaries() -> Vec<CardSummary> {
        vec![CardSummary {
            id: "card-1".into(),
            display_name: "Blue Cash".into(),
            rewards: vec![Reward::new("Groceries", "6%", "")],
            benefits: vec![],
        }]
    }

    #[test]
    fn test_backend_new() {
        let backend = OpenAICompatibleBackend::new("http://localhost:8080", "llama3.2");
        assert_eq!(backend.model(), "llama3.2");
        assert_eq!(backend.host(), "http://localhost:8080");
    }

    #[test]
    fn test_backend_new_trims_trailing_slash() {
        let backend = OpenAICompatibleBackend::new("http://localhost:8080/", "llama3.2");
        assert_eq!(backend.host(), "http://localhost:8080");
    }

    #[test]
    fn test_backend_with_api_key() {
        let backend =
            OpenAICompatibleBackend::with_api_key("https://api.openai.com", "gpt-4o", "sk-test123");
        assert_eq!(backend.model(), "gpt-4o");
        assert_eq!(backend.api_key, Some("sk-test123".to_string()));
    }

    #[test]
    fn test_from_config() {
        assert!(OpenAICompatibleBackend::from_config(&AiConfig::default()).is_none());

        let config = AiConfig {
            host: Some("http://localhost:8000".into()),
            api_key: Some("secret".into()),
            ..Default::default()
        };
        let backend = OpenAICompatibleBackend::from_config(&config).unwrap();
        assert_eq!(backend.model(), DEFAULT_MODEL);
        assert_eq!(backend.api_key.as_deref(), Some("secret"));
    }

    #[test]
    fn test_with_model_keeps_host_and_key() {
        let backend = OpenAICompatibleBackend::with_api_key("http://h", "a", "k").with_model("b");
        assert_eq!(backend.model(), "b");
        assert_eq!(backend.host(), "http://h");
        assert_eq!(backend.api_key.as_deref(), Some("k"));
    }

    #[tokio::test]
    async fn test_health_check_unreachable() {
        let backend = OpenAICompatibleBackend::new("http://localhost:99999", "llama3.2");
        assert!(!backend.health_check().await);
    }

    #[test]
    fn test_chat_completion_request_serialization() {
        let request = ChatCompletionRequest {
            model: "gpt-4o-mini".to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: "Hello".to_string(),
            }],
            temperature: Some(0.1),
            max_tokens: None,
            stream: false,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "Hello");
        let temp = json["temperature"].as_f64().unwrap();
        assert!((temp - 0.1).abs() < 0.001);
        assert_eq!(json["stream"], false);
        assert!(json.get("max_tokens").is_none());
    }

    #[test]
    fn test_chat_completion_response_deserialization() {
        let json = r#"{
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "model": "gpt-4o-mini",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "{\"cardId\":\"x\"}"},
                "finish_reason": "stop"
            }]
        }"#;

        let response: ChatCompletionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.choices[0].message.content, "{\"cardId\":\"x\"}");
    }

    #[tokio::test]
    async fn test_against_mock_server() {
        let server = MockOpenAIServer::start().await;
        let backend = OpenAICompatibleBackend::new(&server.url(), "gpt-4o-mini")
            .with_prompts(PromptLibrary::embedded());

        assert!(backend.health_check().await);

        let rec = backend.recommend_card(&purchase(), &summaries()).await.unwrap();
        assert_eq!(rec.card_id.as_deref(), Some("card-1"));

        let market = backend.find_market_card(&purchase(), &summaries()).await.unwrap();
        assert!(!market.card_name.is_empty());

        let draft = backend.lookup_card("Chase Sapphire Preferred").await.unwrap();
        assert_eq!(draft.bank_name.as_deref(), Some("Chase"));
    }
}
