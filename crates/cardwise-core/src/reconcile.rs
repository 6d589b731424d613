//! Recommendation reconciliation
//!
//! Resolves the card an AI recommendation refers to against the wallet and
//! derives the figures shown to the user. Pure: no I/O, no AI calls.

use serde::Serialize;
use tracing::debug;

use crate::models::{Card, RecommendationResult, SourceLink};
use crate::valuation::{estimate_dollar_value, parse_amount};
use crate::wallet::Wallet;

/// Purchases above this many dollars prompt a "find a better card" search
pub const HIGH_VALUE_PURCHASE_THRESHOLD: f64 = 500.0;

/// A recommendation resolved to a concrete card with derived estimates
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciledRecommendation {
    /// Wallet card, or the generic cash card when unresolvable
    pub card: Card,
    pub used_fallback: bool,
    pub reasoning: String,
    pub estimated_reward: Option<String>,
    /// Dollars earned by the card alone
    pub estimated_card_earnings: Option<String>,
    /// Best-case combined return text, when the AI provided one
    pub total_potential_return: Option<String>,
    /// Dollars earned with every stacking step applied
    pub estimated_total_earnings: Option<String>,
    pub steps_to_maximize: Vec<String>,
    pub stacking_info: Option<String>,
    pub sources: Vec<SourceLink>,
    pub is_high_value_purchase: bool,
    pub should_offer_market_search: bool,
}

/// Whether an amount is large enough to suggest shopping for a new card
pub fn is_high_value_purchase(purchase_amount: Option<&str>) -> bool {
    purchase_amount
        .and_then(parse_amount)
        .is_some_and(|amount| amount > HIGH_VALUE_PURCHASE_THRESHOLD)
}

/// Resolve an AI recommendation against the wallet
pub fn reconcile(
    result: &RecommendationResult,
    wallet: &Wallet,
    purchase_amount: Option<&str>,
) -> ReconciledRecommendation {
    let resolved = result
        .card_id
        .as_deref()
        .and_then(|id| wallet.find_by_id(id));

    let used_fallback = resolved.is_none();
    let card = match resolved {
        Some(card) => card.clone(),
        None => {
            debug!(card_id = ?result.card_id, "Recommended card not in wallet, using generic card");
            Card::generic()
        }
    };

    let estimated_card_earnings =
        estimate_dollar_value(result.estimated_reward.as_deref(), purchase_amount);

    let total_potential_return = result
        .optimization_analysis
        .as_ref()
        .map(|analysis| analysis.total_potential_return.clone());
    let estimated_total_earnings = total_potential_return
        .as_deref()
        .and_then(|total| estimate_dollar_value(Some(total), purchase_amount));

    let is_high_value = is_high_value_purchase(purchase_amount);

    ReconciledRecommendation {
        card,
        used_fallback,
        reasoning: result.reasoning.clone(),
        estimated_reward: result.estimated_reward.clone(),
        estimated_card_earnings,
        total_potential_return,
        estimated_total_earnings,
        steps_to_maximize: result
            .optimization_analysis
            .as_ref()
            .map(|analysis| analysis.steps_to_maximize.clone())
            .unwrap_or_default(),
        stacking_info: result.stacking_info.clone(),
        sources: result.sources.clone(),
        is_high_value_purchase: is_high_value,
        should_offer_market_search: is_high_value || used_fallback,
    }
}
