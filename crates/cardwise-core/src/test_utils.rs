//! Test utilities for cardwise-core
//!
//! This module provides testing infrastructure including a mock
//! OpenAI-compatible server that can be used for development and
//! integration tests.

use axum::{
    extract::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use tokio::sync::oneshot;

use crate::models::{Card, DraftCard, Reward};

/// Mock OpenAI-compatible server for testing and development
pub struct MockOpenAIServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockOpenAIServer {
    /// Start the mock server on an available port
    pub async fn start() -> Self {
        let app = Router::new()
            .route("/v1/models", get(handle_models))
            .route("/v1/chat/completions", post(handle_chat_completion));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockOpenAIServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Models endpoint (health check)
async fn handle_models() -> Json<Value> {
    Json(json!({
        "object": "list",
        "data": [{"id": "gpt-4o-mini", "object": "model", "owned_by": "mock"}]
    }))
}

/// Chat completions endpoint
async fn handle_chat_completion(Json(request): Json<Value>) -> Json<Value> {
    let prompt = request["messages"][0]["content"]
        .as_str()
        .unwrap_or_default()
        .to_string();

    // Detect what type of request this is based on prompt content
    // These patterns match the embedded prompts in prompts.rs
    let content = if prompt.contains("Which card should be used") {
        recommend_mock(&prompt)
    } else if prompt.contains("not in the wallet") {
        market_mock()
    } else if let Some(query) = lookup_query(&prompt) {
        lookup_mock(query)
    } else {
        "I can only help with credit card questions.".to_string()
    };

    Json(json!({
        "id": "chatcmpl-mock",
        "object": "chat.completion",
        "model": request["model"],
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    }))
}

/// Pick the first card listed in the prompt
fn recommend_mock(prompt: &str) -> String {
    let card_id = first_card_id(prompt);
    let online = prompt.contains("(online purchase)");

    let mut result = json!({
        "cardId": card_id,
        "reasoning": "Best match for this purchase category",
        "estimatedReward": "3%",
        "sources": [{"title": "Issuer rewards page", "uri": "https://example.com/rewards"}]
    });
    if online {
        result["stackingInfo"] = json!("Go through Rakuten first for 2% extra");
        result["optimizationAnalysis"] = json!({
            "totalPotentialReturn": "5% combined",
            "stepsToMaximize": ["Open Rakuten", "Pay with the recommended card"]
        });
    }

    format!("Here is my recommendation:\n```json\n{}\n```", result)
}

fn first_card_id(prompt: &str) -> Option<String> {
    let marker = "\"id\": \"";
    let start = prompt.find(marker)? + marker.len();
    let end = prompt[start..].find('"')?;
    Some(prompt[start..start + end].to_string())
}

fn market_mock() -> String {
    json!({
        "bankName": "Chase",
        "cardName": "Freedom Unlimited",
        "headline": "1.5% on everything, 3% on dining",
        "whyBetter": "Earns more than the wallet's general rate",
        "benefits": ["No annual fee", "Purchase protection"],
        "searchQuery": "Chase Freedom Unlimited apply",
        "estimatedAnnualReturn": "$350"
    })
    .to_string()
}

fn lookup_query(prompt: &str) -> Option<&str> {
    let marker = "Look up the credit card described as: ";
    let start = prompt.find(marker)? + marker.len();
    prompt[start..].lines().next()
}

fn lookup_mock(query: &str) -> String {
    let mut words = query.split_whitespace();
    let bank = words.next().unwrap_or("Unknown");
    let product = words.collect::<Vec<_>>().join(" ");

    json!({
        "bankName": bank,
        "productName": if product.is_empty() { "Card".to_string() } else { product },
        "network": "VISA",
        "color": "#1a1f71",
        "rewards": [
            {"category": "Travel", "rate": "5x", "description": "Booked through the portal"},
            {"category": "Dining", "rate": "3x", "description": ""}
        ],
        "benefits": [{"title": "Trip delay insurance", "description": "Up to $500 per ticket"}]
    })
    .to_string()
}

/// A valid wallet card with the given nickname and rewards
pub fn sample_card(nickname: &str, rewards: Vec<Reward>) -> Card {
    DraftCard {
        bank_name: Some("Test Bank".into()),
        product_name: Some(format!("{} Card", nickname)),
        network: Some("VISA".into()),
        holder_name: Some("Alex Doe".into()),
        nickname: Some(nickname.into()),
        rewards: Some(rewards),
        ..Default::default()
    }
    .into_card()
    .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_card_id() {
        let prompt = "Cards:\n[\n  {\n    \"id\": \"abc-123\",\n    \"displayName\": \"X\"\n  }\n]";
        assert_eq!(first_card_id(prompt).as_deref(), Some("abc-123"));
        assert!(first_card_id("no cards").is_none());
    }

    #[test]
    fn test_lookup_query() {
        let prompt = "Look up the credit card described as: Amex Gold\n\nReturn...";
        assert_eq!(lookup_query(prompt), Some("Amex Gold"));
    }

    #[tokio::test]
    async fn test_mock_server_health() {
        let server = MockOpenAIServer::start().await;
        let resp = reqwest::get(format!("{}/v1/models", server.url()))
            .await
            .unwrap();
        assert!(resp.status().is_success());
    }
}
