//! Prompt library for the AI collaborator
//!
//! Prompts are loaded with a two-layer resolution:
//! 1. Check for override in data dir (~/.local/share/cardwise/prompts/<id>.md)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Every prompt ends with the JSON schema of the expected response,
//! generated from the response type with `schemars`.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use schemars::JsonSchema;

use crate::ai::CardDetails;
use crate::error::{Error, Result};
use crate::models::{CardSummary, MarketRecommendation, PurchaseContext, RecommendationResult};

/// Embedded default prompts
mod defaults {
    pub const RECOMMEND_CARD: &str = "\
You are a credit card rewards expert. Which card should be used for this purchase?

Purchase: {{purchase}}

Cards in the wallet (JSON):
{{cards}}

Pick exactly one card from the wallet and return its id as cardId. Explain the choice \
in reasoning. Put the card's reward rate for this purchase in estimatedReward, as a \
percentage when possible (e.g. \"5%\"). If a cashback portal or wallet offer (Rakuten, \
PayPal, Capital One Shopping) stacks on top, describe it in stackingInfo and add an \
optimizationAnalysis with the combined return and the steps to get it.

Respond with JSON only, matching this schema:
{{schema}}";

    pub const FIND_MARKET_CARD: &str = "\
You are a credit card rewards expert. Suggest one credit card that is not in the wallet \
and would earn noticeably more on this kind of purchase.

Purchase: {{purchase}}

Cards already in the wallet (JSON):
{{cards}}

List the benefits specific to this purchase, a web search query that finds the \
application page, and an estimated annual return for a typical spender.

Respond with JSON only, matching this schema:
{{schema}}";

    pub const LOOKUP_CARD: &str = "\
You are a credit card data assistant. Look up the credit card described as: {{query}}

Return the issuing bank, the exact product name, the network (VISA, MASTERCARD, AMEX, \
DISCOVER or OTHER), a hex color resembling the card design, every reward category with \
its rate exactly as the issuer states it, and the main benefits.

Respond with JSON only, matching this schema:
{{schema}}";
}

/// Known prompt IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptId {
    /// Which wallet card to use for a purchase
    RecommendCard,
    /// A better card outside the wallet
    FindMarketCard,
    /// Card details for search-assisted add and refresh
    LookupCard,
}

impl PromptId {
    /// Get the string identifier for this prompt
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RecommendCard => "recommend_card",
            Self::FindMarketCard => "find_market_card",
            Self::LookupCard => "lookup_card",
        }
    }

    /// Get all known prompt IDs
    pub fn all() -> &'static [PromptId] {
        &[Self::RecommendCard, Self::FindMarketCard, Self::LookupCard]
    }

    /// Look up a prompt ID by its string identifier
    pub fn parse(id: &str) -> Option<PromptId> {
        Self::all().iter().copied().find(|p| p.as_str() == id)
    }

    fn default_content(&self) -> &'static str {
        match self {
            Self::RecommendCard => defaults::RECOMMEND_CARD,
            Self::FindMarketCard => defaults::FIND_MARKET_CARD,
            Self::LookupCard => defaults::LOOKUP_CARD,
        }
    }
}

/// Prompt library with optional on-disk overrides
#[derive(Debug, Clone)]
pub struct PromptLibrary {
    /// Override directory path
    override_dir: Option<PathBuf>,
}

impl PromptLibrary {
    /// Create a prompt library with the default override directory
    pub fn new() -> Self {
        Self {
            override_dir: default_prompts_dir(),
        }
    }

    /// Use a specific override directory
    pub fn with_override_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            override_dir: Some(dir.into()),
        }
    }

    /// Embedded defaults only
    pub fn embedded() -> Self {
        Self { override_dir: None }
    }

    /// Override file for a prompt, if one exists
    pub fn override_path(&self, id: PromptId) -> Option<PathBuf> {
        let path = self
            .override_dir
            .as_ref()?
            .join(format!("{}.md", id.as_str()));
        path.exists().then_some(path)
    }

    /// Raw template text (override first, then default)
    pub fn template(&self, id: PromptId) -> Result<String> {
        if let Some(path) = self.override_path(id) {
            return fs::read_to_string(&path).map_err(|e| {
                Error::InvalidData(format!(
                    "Failed to read prompt override {}: {}",
                    path.display(),
                    e
                ))
            });
        }
        Ok(id.default_content().to_string())
    }

    /// Render a template with `{{var}}` substitution
    pub fn render(&self, id: PromptId, vars: &HashMap<&str, String>) -> Result<String> {
        let mut result = self.template(id)?;
        for (key, value) in vars {
            let pattern = format!("{{{{{}}}}}", key);
            result = result.replace(&pattern, value);
        }
        Ok(result)
    }

    /// Prompt asking which wallet card to use
    pub fn recommend_card(
        &self,
        purchase: &PurchaseContext,
        cards: &[CardSummary],
    ) -> Result<String> {
        let mut vars = HashMap::new();
        vars.insert("purchase", purchase.describe());
        vars.insert("cards", serde_json::to_string_pretty(cards)?);
        vars.insert("schema", response_schema::<RecommendationResult>()?);
        self.render(PromptId::RecommendCard, &vars)
    }

    /// Prompt asking for a better card outside the wallet
    pub fn find_market_card(
        &self,
        purchase: &PurchaseContext,
        cards: &[CardSummary],
    ) -> Result<String> {
        let mut vars = HashMap::new();
        vars.insert("purchase", purchase.describe());
        vars.insert("cards", serde_json::to_string_pretty(cards)?);
        vars.insert("schema", response_schema::<MarketRecommendation>()?);
        self.render(PromptId::FindMarketCard, &vars)
    }

    /// Prompt asking for a card's details
    pub fn lookup_card(&self, query: &str) -> Result<String> {
        let mut vars = HashMap::new();
        vars.insert("query", query.to_string());
        vars.insert("schema", response_schema::<CardDetails>()?);
        self.render(PromptId::LookupCard, &vars)
    }
}

impl Default for PromptLibrary {
    fn default() -> Self {
        Self::new()
    }
}

/// JSON schema for a response type, pretty-printed
pub fn response_schema<T: JsonSchema>() -> Result<String> {
    let schema = schemars::schema_for!(T);
    Ok(serde_json::to_string_pretty(&schema)?)
}

/// Default prompt override directory
pub fn default_prompts_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("cardwise").join("prompts"))
}
