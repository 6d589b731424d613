//! AI backend response types
//!
//! These types are backend-agnostic and used across all AI implementations.
//! Recommendation and market responses live in [`crate::models`].

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::models::{Benefit, DraftCard, Reward};

/// Card details found by a lookup (search-assisted add, refresh)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CardDetails {
    pub bank_name: String,
    pub product_name: String,
    /// One of VISA, MASTERCARD, AMEX, DISCOVER, OTHER
    #[serde(default)]
    pub network: Option<String>,
    /// Hex color resembling the card design
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub rewards: Vec<Reward>,
    #[serde(default)]
    pub benefits: Vec<Benefit>,
}

impl CardDetails {
    /// Draft with the looked-up fields; holder and nickname left for the user
    pub fn into_draft(self) -> DraftCard {
        DraftCard {
            bank_name: Some(self.bank_name),
            product_name: Some(self.product_name),
            network: self.network,
            color: self.color,
            rewards: Some(self.rewards),
            benefits: Some(self.benefits),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_draft_leaves_personal_fields_empty() {
        let details = CardDetails {
            bank_name: "Citi".into(),
            product_name: "Custom Cash".into(),
            network: Some("MASTERCARD".into()),
            color: None,
            rewards: vec![Reward::new("Top category", "5%", "Up to $500/cycle")],
            benefits: vec![],
        };

        let draft = details.into_draft();
        assert_eq!(draft.bank_name.as_deref(), Some("Citi"));
        assert!(draft.holder_name.is_none());
        assert!(draft.nickname.is_none());
        assert_eq!(draft.rewards.unwrap().len(), 1);
    }
}
