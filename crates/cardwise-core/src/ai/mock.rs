//! Mock backend for testing
//!
//! Provides deterministic responses for all AI operations.
//! Useful for unit tests and development without a model server.

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::models::{
    Benefit, CardSummary, DraftCard, MarketRecommendation, OptimizationAnalysis, PurchaseContext,
    RecommendationResult, Reward,
};
use crate::valuation::extract_percentage;

use super::AIBackend;

/// Mock AI backend for testing
///
/// Recommends the candidate with the best percentage reward, preferring
/// rewards whose category appears in the purchase description.
#[derive(Clone, Default)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
    /// Whether every request should fail
    pub failing: bool,
}

impl MockBackend {
    /// Create a new mock backend (healthy by default)
    pub fn new() -> Self {
        Self {
            healthy: true,
            failing: false,
        }
    }

    /// Create an unhealthy mock backend
    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            failing: false,
        }
    }

    /// Create a mock whose requests all fail
    pub fn failing() -> Self {
        Self {
            healthy: false,
            failing: true,
        }
    }

    /// Create a new instance with a different model (no-op for mock)
    pub fn with_model(&self, _model: &str) -> Self {
        self.clone()
    }

    fn check(&self) -> Result<()> {
        if self.failing {
            Err(Error::InvalidData("Mock AI backend is set to fail".into()))
        } else {
            Ok(())
        }
    }
}

/// Best (card, reward) pick for a purchase
fn best_reward<'a>(
    purchase: &PurchaseContext,
    cards: &'a [CardSummary],
) -> Option<(&'a CardSummary, Option<&'a Reward>)> {
    let haystack = format!(
        "{} {}",
        purchase.item,
        purchase.merchant.as_deref().unwrap_or_default()
    )
    .to_lowercase();

    let mut best: Option<(&CardSummary, &Reward, bool, f64)> = None;
    for card in cards {
        for reward in &card.rewards {
            let Some(pct) = extract_percentage(&reward.rate) else {
                continue;
            };
            let relevant = haystack.contains(&reward.category.to_lowercase());
            let better = match best {
                None => true,
                Some((_, _, best_relevant, best_pct)) => {
                    (relevant, pct) > (best_relevant, best_pct)
                }
            };
            if better {
                best = Some((card, reward, relevant, pct));
            }
        }
    }

    match best {
        Some((card, reward, _, _)) => Some((card, Some(reward))),
        None => cards.first().map(|card| (card, card.rewards.first())),
    }
}

#[async_trait]
impl AIBackend for MockBackend {
    async fn recommend_card(
        &self,
        purchase: &PurchaseContext,
        cards: &[CardSummary],
    ) -> Result<RecommendationResult> {
        self.check()?;

        let Some((card, reward)) = best_reward(purchase, cards) else {
            return Ok(RecommendationResult {
                reasoning: "No cards to choose from".to_string(),
                ..Default::default()
            });
        };

        let estimated_reward = reward.map(|r| r.rate.clone());
        let reasoning = match reward {
            Some(r) => format!("{} earns {} on {}", card.display_name, r.rate, r.category),
            None => format!("{} is the only option", card.display_name),
        };

        let (stacking_info, optimization_analysis) = if purchase.online {
            let base = estimated_reward
                .as_deref()
                .and_then(extract_percentage)
                .unwrap_or(0.0);
            (
                Some("Start at Rakuten for an extra 2% cashback".to_string()),
                Some(OptimizationAnalysis {
                    total_potential_return: format!("{}% combined", base + 2.0),
                    steps_to_maximize: vec![
                        "Activate the Rakuten portal".to_string(),
                        format!("Pay with {}", card.display_name),
                    ],
                }),
            )
        } else {
            (None, None)
        };

        Ok(RecommendationResult {
            card_id: Some(card.id.clone()),
            reasoning,
            estimated_reward,
            sources: Vec::new(),
            stacking_info,
            optimization_analysis,
        })
    }

    async fn find_market_card(
        &self,
        purchase: &PurchaseContext,
        _cards: &[CardSummary],
    ) -> Result<MarketRecommendation> {
        self.check()?;

        Ok(MarketRecommendation {
            bank_name: "Citi".to_string(),
            card_name: "Double Cash".to_string(),
            headline: "2% back on everything".to_string(),
            why_better: format!("Flat 2% beats 1% on \"{}\"", purchase.item),
            benefits: vec![
                "1% when you buy, 1% when you pay".to_string(),
                "No annual fee".to_string(),
            ],
            search_query: "Citi Double Cash credit card apply".to_string(),
            estimated_annual_return: "$400".to_string(),
        })
    }

    async fn lookup_card(&self, query: &str) -> Result<DraftCard> {
        self.check()?;

        let mut words = query.split_whitespace();
        let bank = words
            .next()
            .ok_or_else(|| Error::InvalidData("Empty card lookup query".into()))?;
        let product: Vec<&str> = words.collect();
        let product = if product.is_empty() {
            "Card".to_string()
        } else {
            product.join(" ")
        };

        let network = match bank.to_lowercase().as_str() {
            "amex" | "american" => "AMEX",
            "discover" => "DISCOVER",
            "citi" | "capital" => "MASTERCARD",
            _ => "VISA",
        };

        Ok(DraftCard {
            bank_name: Some(bank.to_string()),
            product_name: Some(product),
            network: Some(network.to_string()),
            color: Some("#0f172a".to_string()),
            rewards: Some(vec![
                Reward::new("Dining", "3%", "Restaurants and takeout"),
                Reward::new("General", "1.5%", "Everything else"),
            ]),
            benefits: Some(vec![Benefit::new(
                "Purchase protection",
                "Covers damage or theft for 120 days",
            )]),
            ..Default::default()
        })
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cards() -> Vec<CardSummary> {
        vec![
            CardSummary {
                id: "flat".into(),
                display_name: "Flat".into(),
                rewards: vec![Reward::new("General", "2%", "")],
                benefits: vec![],
            },
            CardSummary {
                id: "dining".into(),
                display_name: "Dining".into(),
                rewards: vec![Reward::new("Dining", "4%", ""), Reward::new("General", "1%", "")],
                benefits: vec![],
            },
        ]
    }

    fn purchase(item: &str, online: bool) -> PurchaseContext {
        PurchaseContext {
            item: item.into(),
            merchant: None,
            amount: Some("100".into()),
            online,
        }
    }

    #[tokio::test]
    async fn test_prefers_relevant_category() {
        let mock = MockBackend::new();
        let result = mock
            .recommend_card(&purchase("Dining out", false), &cards())
            .await
            .unwrap();
        assert_eq!(result.card_id.as_deref(), Some("dining"));
        assert_eq!(result.estimated_reward.as_deref(), Some("4%"));
        assert!(result.stacking_info.is_none());
    }

    #[tokio::test]
    async fn test_general_purchase_uses_highest_rate() {
        let mock = MockBackend::new();
        let result = mock
            .recommend_card(&purchase("Lawn mower", false), &cards())
            .await
            .unwrap();
        assert_eq!(result.card_id.as_deref(), Some("dining"));
    }

    #[tokio::test]
    async fn test_online_purchase_adds_stacking() {
        let mock = MockBackend::new();
        let result = mock
            .recommend_card(&purchase("Shoes", true), &cards())
            .await
            .unwrap();
        assert!(result.stacking_info.unwrap().contains("Rakuten"));
        assert_eq!(
            result.optimization_analysis.unwrap().total_potential_return,
            "6% combined"
        );
    }

    #[tokio::test]
    async fn test_empty_candidates() {
        let mock = MockBackend::new();
        let result = mock
            .recommend_card(&purchase("Shoes", false), &[])
            .await
            .unwrap();
        assert!(result.card_id.is_none());
    }

    #[tokio::test]
    async fn test_failing_mock() {
        let mock = MockBackend::failing();
        assert!(mock.recommend_card(&purchase("x", false), &cards()).await.is_err());
        assert!(mock.lookup_card("Chase Freedom").await.is_err());
        assert!(!mock.health_check().await);
    }

    #[tokio::test]
    async fn test_unhealthy_mock_still_answers() {
        let mock = MockBackend::unhealthy();
        assert!(!mock.health_check().await);
        assert!(mock.recommend_card(&purchase("x", false), &cards()).await.is_ok());
    }

    #[tokio::test]
    async fn test_lookup_card() {
        let mock = MockBackend::new();
        let draft = mock.lookup_card("Amex Blue Cash Preferred").await.unwrap();
        assert_eq!(draft.bank_name.as_deref(), Some("Amex"));
        assert_eq!(draft.product_name.as_deref(), Some("Blue Cash Preferred"));
        assert_eq!(draft.network.as_deref(), Some("AMEX"));
        assert!(mock.lookup_card("   ").await.is_err());
    }
}
