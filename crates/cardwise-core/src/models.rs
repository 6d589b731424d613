//! Domain models for Cardwise

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Id of the non-persisted cash/debit fallback card.
///
/// The wallet refuses to store a card with this id.
pub const GENERIC_CARD_ID: &str = "generic-cash";

/// Color used when a card has none
pub const DEFAULT_CARD_COLOR: &str = "#1e293b";

/// Card payment network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CardNetwork {
    Visa,
    Mastercard,
    Amex,
    Discover,
    Other,
}

impl CardNetwork {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Visa => "VISA",
            Self::Mastercard => "MASTERCARD",
            Self::Amex => "AMEX",
            Self::Discover => "DISCOVER",
            Self::Other => "OTHER",
        }
    }
}

impl std::str::FromStr for CardNetwork {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "visa" => Ok(Self::Visa),
            "mastercard" | "master card" | "mc" => Ok(Self::Mastercard),
            "amex" | "american express" | "americanexpress" => Ok(Self::Amex),
            "discover" => Ok(Self::Discover),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown card network: {}", s)),
        }
    }
}

impl std::fmt::Display for CardNetwork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A reward earned by a card in some spending category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Reward {
    /// Spending category label (e.g., "Dining", "Groceries")
    pub category: String,
    /// Free-form rate ("5%", "3x", "2 miles per dollar")
    pub rate: String,
    #[serde(default)]
    pub description: String,
}

impl Reward {
    pub fn new(category: &str, rate: &str, description: &str) -> Self {
        Self {
            category: category.to_string(),
            rate: rate.to_string(),
            description: description.to_string(),
        }
    }
}

/// A non-reward card benefit (insurance, lounge access, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Benefit {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl Benefit {
    pub fn new(title: &str, description: &str) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
        }
    }
}

/// Kind of an attached document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Text,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Text => "text",
        }
    }

    /// Guess the kind from a filename extension (anything but `.pdf` is text)
    pub fn from_filename(filename: &str) -> Self {
        if filename.to_lowercase().ends_with(".pdf") {
            Self::Pdf
        } else {
            Self::Text
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A document attached to a card (terms, benefit guide, statement)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDocument {
    pub id: String,
    pub filename: String,
    #[serde(rename = "type")]
    pub kind: DocumentKind,
    /// Raw bytes, stored as base64 text in JSON
    #[serde(with = "base64_content")]
    pub content: Vec<u8>,
    pub added_at: DateTime<Utc>,
}

impl CardDocument {
    /// Create a new document with a fresh id, stamped now
    pub fn new(filename: &str, kind: DocumentKind, content: Vec<u8>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            filename: filename.to_string(),
            kind,
            content,
            added_at: Utc::now(),
        }
    }
}

mod base64_content {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

/// A payment card in the wallet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// Opaque id, assigned once
    pub id: String,
    pub bank_name: String,
    pub product_name: String,
    pub network: CardNetwork,
    #[serde(default = "default_color")]
    pub color: String,
    pub holder_name: String,
    pub nickname: String,
    /// When rewards/benefits were last fetched
    pub last_refreshed: DateTime<Utc>,
    #[serde(default)]
    pub rewards: Vec<Reward>,
    #[serde(default)]
    pub benefits: Vec<Benefit>,
    /// Free-text notes; never sent to the AI service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Attached documents, append-only
    #[serde(default)]
    pub documents: Vec<CardDocument>,
}

fn default_color() -> String {
    DEFAULT_CARD_COLOR.to_string()
}

impl Card {
    /// The cash/debit stand-in used when no wallet card applies
    pub fn generic() -> Self {
        Self {
            id: GENERIC_CARD_ID.to_string(),
            bank_name: "Generic".to_string(),
            product_name: "Cash / Debit".to_string(),
            network: CardNetwork::Other,
            color: "#64748b".to_string(),
            holder_name: String::new(),
            nickname: "Cash / Debit".to_string(),
            last_refreshed: DateTime::<Utc>::UNIX_EPOCH,
            rewards: vec![Reward::new("General", "1%", "Flat rate on every purchase")],
            benefits: Vec::new(),
            notes: None,
            documents: Vec::new(),
        }
    }

    pub fn is_generic(&self) -> bool {
        self.id == GENERIC_CARD_ID
    }

    /// Name shown to the user and to the AI service
    pub fn display_name(&self) -> String {
        let product = format!("{} {}", self.bank_name, self.product_name);
        if self.nickname.trim().is_empty() || self.nickname == self.product_name {
            product
        } else {
            format!("{} ({})", self.nickname, product)
        }
    }

    /// Minimal projection sent to the AI service
    pub fn summary(&self) -> CardSummary {
        CardSummary {
            id: self.id.clone(),
            display_name: self.display_name(),
            rewards: self.rewards.clone(),
            benefits: self.benefits.clone(),
        }
    }

    /// Check the fields a card needs before it can live in the wallet
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::Validation("Card id is required".into()));
        }
        if self.holder_name.trim().is_empty() {
            return Err(Error::Validation("Cardholder name is required".into()));
        }
        if self.nickname.trim().is_empty() {
            return Err(Error::Validation("Card nickname is required".into()));
        }
        Ok(())
    }
}

/// Card summary sent to the AI service
///
/// Deliberately excludes notes and document content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSummary {
    pub id: String,
    pub display_name: String,
    pub rewards: Vec<Reward>,
    pub benefits: Vec<Benefit>,
}

/// A card being edited or previewed; every field may be missing
///
/// Converted into a [`Card`] with [`DraftCard::into_card`], which validates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DraftCard {
    #[serde(default)]
    pub bank_name: Option<String>,
    #[serde(default)]
    pub product_name: Option<String>,
    /// One of VISA, MASTERCARD, AMEX, DISCOVER, OTHER
    #[serde(default)]
    pub network: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub holder_name: Option<String>,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub rewards: Option<Vec<Reward>>,
    #[serde(default)]
    pub benefits: Option<Vec<Benefit>>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl DraftCard {
    /// Validate and turn the draft into a card with a fresh id
    pub fn into_card(self) -> Result<Card> {
        let bank_name = required(self.bank_name, "Bank name")?;
        let product_name = required(self.product_name, "Product name")?;
        let holder_name = required(self.holder_name, "Cardholder name")?;
        let nickname = required(self.nickname, "Card nickname")?;
        let network = match self.network.as_deref() {
            Some(raw) if !raw.trim().is_empty() => {
                raw.parse::<CardNetwork>().map_err(Error::Validation)?
            }
            _ => CardNetwork::Other,
        };

        Ok(Card {
            id: uuid::Uuid::new_v4().to_string(),
            bank_name,
            product_name,
            network,
            color: self
                .color
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(default_color),
            holder_name,
            nickname,
            last_refreshed: Utc::now(),
            rewards: self.rewards.unwrap_or_default(),
            benefits: self.benefits.unwrap_or_default(),
            notes: self.notes.filter(|n| !n.trim().is_empty()),
            documents: Vec::new(),
        })
    }
}

impl From<&Card> for DraftCard {
    fn from(card: &Card) -> Self {
        Self {
            bank_name: Some(card.bank_name.clone()),
            product_name: Some(card.product_name.clone()),
            network: Some(card.network.as_str().to_string()),
            color: Some(card.color.clone()),
            holder_name: Some(card.holder_name.clone()),
            nickname: Some(card.nickname.clone()),
            rewards: Some(card.rewards.clone()),
            benefits: Some(card.benefits.clone()),
            notes: card.notes.clone(),
        }
    }
}

fn required(value: Option<String>, field: &str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(Error::Validation(format!("{} is required", field))),
    }
}

/// What the user is about to buy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseContext {
    pub item: String,
    #[serde(default)]
    pub merchant: Option<String>,
    /// Amount as entered; parsed by the valuation module
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub online: bool,
}

impl PurchaseContext {
    /// One-line description used in prompts
    pub fn describe(&self) -> String {
        let mut text = format!("Buying \"{}\"", self.item);
        if let Some(ref merchant) = self.merchant {
            text.push_str(&format!(" at {}", merchant));
        }
        if let Some(ref amount) = self.amount {
            text.push_str(&format!(" for ${}", amount.trim().trim_start_matches('$')));
        }
        text.push_str(if self.online {
            " (online purchase)"
        } else {
            " (in-store purchase)"
        });
        text
    }
}

/// A source the AI service cited
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SourceLink {
    pub title: String,
    pub uri: String,
}

/// Best-case combined return and how to get it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationAnalysis {
    /// Combined return as a rate string (e.g., "7% total")
    pub total_potential_return: String,
    #[serde(default)]
    pub steps_to_maximize: Vec<String>,
}

/// The AI service's answer to "which card should I use?"
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResult {
    /// Id of the recommended wallet card; may be missing or unknown
    #[serde(default)]
    pub card_id: Option<String>,
    #[serde(default)]
    pub reasoning: String,
    /// Reward rate of the chosen card for this purchase (e.g., "5%")
    #[serde(default)]
    pub estimated_reward: Option<String>,
    #[serde(default)]
    pub sources: Vec<SourceLink>,
    /// Cashback portal or wallet offers that stack on top of the card
    #[serde(default)]
    pub stacking_info: Option<String>,
    #[serde(default)]
    pub optimization_analysis: Option<OptimizationAnalysis>,
}

/// A card outside the wallet that would suit the purchase better
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarketRecommendation {
    pub bank_name: String,
    pub card_name: String,
    pub headline: String,
    pub why_better: String,
    #[serde(default)]
    pub benefits: Vec<String>,
    /// Query for locating the application page
    pub search_query: String,
    pub estimated_annual_return: String,
}

impl MarketRecommendation {
    /// Web search link for the card's application page
    pub fn application_search_url(&self) -> Option<String> {
        reqwest::Url::parse_with_params(
            "https://www.google.com/search",
            &[("q", self.search_query.as_str())],
        )
        .ok()
        .map(|url| url.to_string())
    }
}
