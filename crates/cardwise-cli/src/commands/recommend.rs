//! Recommendation commands (recommend, better-card, estimate)

use anyhow::{Context, Result};
use cardwise_core::{
    estimate_dollar_value, Advice, CardAdvisor, MarketRecommendation, PurchaseContext,
    WalletStore,
};

pub async fn cmd_recommend<S: WalletStore>(
    advisor: &CardAdvisor<S>,
    purchase: &PurchaseContext,
) -> Result<()> {
    println!("🤔 {}", purchase.describe());

    let advice = advisor
        .recommend(purchase)
        .await
        .context("Recommendation failed")?;

    print_advice(&advice);
    Ok(())
}

pub async fn cmd_better_card<S: WalletStore>(
    advisor: &CardAdvisor<S>,
    purchase: &PurchaseContext,
) -> Result<()> {
    println!("🔍 Searching for a better card: {}", purchase.describe());

    let market = advisor
        .find_better_card(purchase)
        .await
        .context("Market search failed")?;

    print_market(&market);
    Ok(())
}

pub fn cmd_estimate(rate: &str, amount: &str) -> Result<()> {
    match estimate_dollar_value(Some(rate), Some(amount)) {
        Some(value) => println!("${}", value),
        None => println!("Cannot estimate: need a percentage rate and a positive amount"),
    }
    Ok(())
}

fn print_advice(advice: &Advice) {
    let rec = &advice.recommendation;

    println!();
    println!("💳 Use: {}", rec.card.display_name());
    if rec.used_fallback {
        println!("   (No wallet card matched; showing the generic cash card)");
    }
    if !rec.reasoning.is_empty() {
        println!("   {}", rec.reasoning);
    }

    if let Some(reward) = &rec.estimated_reward {
        match &rec.estimated_card_earnings {
            Some(earnings) => println!("   Reward: {} (≈ ${})", reward, earnings),
            None => println!("   Reward: {}", reward),
        }
    }

    if let Some(stacking) = &rec.stacking_info {
        println!();
        println!("   💰 Stacking: {}", stacking);
    }

    if let Some(total) = &rec.total_potential_return {
        match &rec.estimated_total_earnings {
            Some(earnings) => println!("   Total potential: {} (≈ ${})", total, earnings),
            None => println!("   Total potential: {}", total),
        }
    }
    if !rec.steps_to_maximize.is_empty() {
        println!("   Steps:");
        for (i, step) in rec.steps_to_maximize.iter().enumerate() {
            println!("     {}. {}", i + 1, step);
        }
    }

    if !advice.offers.is_empty() {
        println!();
        println!("   Quick links:");
        for vendor in &advice.offers {
            println!("     {:<22} {}", vendor.label(), vendor.affiliate_url());
        }
    }

    if !rec.sources.is_empty() {
        println!();
        println!("   Sources:");
        for source in &rec.sources {
            println!("     - {} ({})", source.title, source.uri);
        }
    }

    if rec.should_offer_market_search {
        println!();
        if rec.is_high_value_purchase {
            println!("   Big purchase! A new card's sign-up bonus may be worth it.");
        }
        println!("   Run `cardwise better-card` with the same options to compare.");
    }
}

fn print_market(market: &MarketRecommendation) {
    println!();
    println!("✨ {} {}", market.bank_name, market.card_name);
    println!("   {}", market.headline);
    println!("   {}", market.why_better);

    if !market.benefits.is_empty() {
        println!();
        for benefit in &market.benefits {
            println!("   • {}", benefit);
        }
    }

    println!();
    println!("   Estimated annual return: {}", market.estimated_annual_return);
    if let Some(url) = market.application_search_url() {
        println!("   Apply: {}", url);
    }
}
