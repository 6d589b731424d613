//! JSON parsing helpers for AI backend responses
//!
//! These functions extract JSON from AI model responses, which often include
//! extra text (or markdown fences) before/after the JSON payload.

use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::models::{DraftCard, MarketRecommendation, RecommendationResult};

use super::types::CardDetails;

const RAW_PREVIEW_CHARS: usize = 200;

/// Slice from the first `{` to the last `}`, if any
pub fn extract_json(response: &str) -> Option<&str> {
    let start = response.find('{')?;
    let end = response.rfind('}')?;
    (start < end).then(|| &response[start..=end])
}

fn preview(text: &str) -> String {
    if text.chars().count() > RAW_PREVIEW_CHARS {
        let head: String = text.chars().take(RAW_PREVIEW_CHARS).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

/// Parse the JSON object embedded in a model response
pub fn parse_json_response<T: DeserializeOwned>(response: &str, what: &str) -> Result<T> {
    let response = response.trim();
    match extract_json(response) {
        Some(json_str) => serde_json::from_str(json_str).map_err(|e| {
            Error::InvalidData(format!(
                "Invalid {} JSON from AI: {} | Raw: {}",
                what,
                e,
                preview(json_str)
            ))
        }),
        None => Err(Error::InvalidData(format!(
            "No JSON found in AI {} response | Raw: {}",
            what,
            preview(response)
        ))),
    }
}

/// Parse a card recommendation
pub fn parse_recommendation(response: &str) -> Result<RecommendationResult> {
    parse_json_response(response, "recommendation")
}

/// Parse a market (new card) recommendation
pub fn parse_market_recommendation(response: &str) -> Result<MarketRecommendation> {
    parse_json_response(response, "market recommendation")
}

/// Parse looked-up card details into a draft
pub fn parse_card_details(response: &str) -> Result<DraftCard> {
    let details: CardDetails = parse_json_response(response, "card details")?;
    if details.bank_name.trim().is_empty() || details.product_name.trim().is_empty() {
        return Err(Error::InvalidData(
            "AI card lookup returned no bank or product name".into(),
        ));
    }
    Ok(details.into_draft())
}
