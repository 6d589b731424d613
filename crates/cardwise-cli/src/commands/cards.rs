//! Card management commands

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use cardwise_core::{
    Benefit, Card, CardAdvisor, CardDocument, CardEdit, DocumentKind, DraftCard, Reward,
    WalletStore,
};

use super::truncate;

/// Flags for a hand-entered card
#[derive(Debug, Clone, Default)]
pub struct NewCard {
    pub bank: String,
    pub product: String,
    pub network: Option<String>,
    pub color: Option<String>,
    pub holder: String,
    pub nickname: String,
    pub notes: Option<String>,
    pub rewards: Vec<String>,
    pub benefits: Vec<String>,
}

pub fn cmd_cards_list<S: WalletStore>(advisor: &CardAdvisor<S>) -> Result<()> {
    let wallet = advisor.store().load().context("Failed to load wallet")?;

    if wallet.is_empty() {
        println!("No cards in the wallet.");
        println!("Add one with: cardwise cards add --bank ... or cardwise cards lookup \"<card>\"");
        return Ok(());
    }

    println!(
        "{:<36}  {:<30}  {:<10}  {}",
        "ID", "CARD", "NETWORK", "TOP REWARD"
    );
    println!("{}", "-".repeat(100));

    for card in wallet.cards() {
        let top = card
            .rewards
            .first()
            .map(|r| format!("{} {}", r.rate, r.category))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<36}  {:<30}  {:<10}  {}",
            card.id,
            truncate(&card.display_name(), 30),
            card.network.as_str(),
            truncate(&top, 24)
        );
    }

    println!();
    println!("{} card(s)", wallet.len());
    Ok(())
}

pub fn cmd_cards_show<S: WalletStore>(advisor: &CardAdvisor<S>, id: &str) -> Result<()> {
    let wallet = advisor.store().load().context("Failed to load wallet")?;
    let card = wallet
        .find_by_id(id)
        .ok_or_else(|| anyhow::anyhow!("Card not found: {}", id))?;

    print_card(card);
    Ok(())
}

pub fn cmd_cards_add<S: WalletStore>(advisor: &CardAdvisor<S>, new_card: NewCard) -> Result<()> {
    let rewards = new_card
        .rewards
        .iter()
        .map(|r| parse_reward(r))
        .collect::<Result<Vec<_>>>()?;
    let benefits = new_card
        .benefits
        .iter()
        .map(|b| parse_benefit(b))
        .collect::<Result<Vec<_>>>()?;

    let draft = DraftCard {
        bank_name: Some(new_card.bank),
        product_name: Some(new_card.product),
        network: new_card.network,
        color: new_card.color,
        holder_name: Some(new_card.holder),
        nickname: Some(new_card.nickname),
        rewards: Some(rewards),
        benefits: Some(benefits),
        notes: new_card.notes,
    };

    let card = advisor.add_card(draft).context("Failed to add card")?;
    println!("✅ Added {}", card.display_name());
    println!("   ID: {}", card.id);
    Ok(())
}

pub async fn cmd_cards_lookup<S: WalletStore>(
    advisor: &CardAdvisor<S>,
    query: &str,
    holder: &str,
    nickname: &str,
) -> Result<()> {
    println!("🔎 Looking up \"{}\"...", query);

    let card = advisor
        .add_card_from_lookup(query, holder, nickname)
        .await
        .context("Card lookup failed")?;

    println!("✅ Added {}", card.display_name());
    println!();
    print_card(&card);
    Ok(())
}

pub fn cmd_cards_edit<S: WalletStore>(
    advisor: &CardAdvisor<S>,
    id: &str,
    holder: Option<String>,
    nickname: Option<String>,
    notes: Option<String>,
    attachments: &[PathBuf],
) -> Result<()> {
    let documents = attachments
        .iter()
        .map(|path| read_document(path))
        .collect::<Result<Vec<_>>>()?;

    let edit = CardEdit {
        holder_name: holder,
        nickname,
        notes,
        documents,
    };

    let card = advisor.edit_card(id, edit).context("Failed to edit card")?;
    println!("✅ Updated {}", card.display_name());
    if !card.documents.is_empty() {
        println!("   Documents: {}", card.documents.len());
    }
    Ok(())
}

pub async fn cmd_cards_refresh<S: WalletStore>(advisor: &CardAdvisor<S>, id: &str) -> Result<()> {
    println!("🔄 Refreshing card {}...", id);

    let card = advisor
        .refresh_card(id)
        .await
        .context("Failed to refresh card")?;

    println!(
        "✅ {} now has {} reward(s) and {} benefit(s)",
        card.display_name(),
        card.rewards.len(),
        card.benefits.len()
    );
    Ok(())
}

pub fn cmd_cards_remove<S: WalletStore>(advisor: &CardAdvisor<S>, id: &str) -> Result<()> {
    if advisor.remove_card(id).context("Failed to remove card")? {
        println!("✅ Removed card {}", id);
    } else {
        println!("No card with ID {} (nothing removed)", id);
    }
    Ok(())
}

fn print_card(card: &Card) {
    println!("💳 {}", card.display_name());
    println!("   ID: {}", card.id);
    println!("   Bank: {}", card.bank_name);
    println!("   Product: {}", card.product_name);
    println!("   Network: {}", card.network);
    println!("   Holder: {}", card.holder_name);
    println!("   Color: {}", card.color);
    println!(
        "   Last refreshed: {}",
        card.last_refreshed.format("%Y-%m-%d %H:%M UTC")
    );

    if !card.rewards.is_empty() {
        println!();
        println!("   Rewards:");
        for reward in &card.rewards {
            if reward.description.is_empty() {
                println!("     {:<8} {}", reward.rate, reward.category);
            } else {
                println!(
                    "     {:<8} {} ({})",
                    reward.rate, reward.category, reward.description
                );
            }
        }
    }

    if !card.benefits.is_empty() {
        println!();
        println!("   Benefits:");
        for benefit in &card.benefits {
            println!("     • {}: {}", benefit.title, benefit.description);
        }
    }

    if let Some(notes) = &card.notes {
        println!();
        println!("   Notes: {}", notes);
    }

    if !card.documents.is_empty() {
        println!();
        println!("   Documents:");
        for doc in &card.documents {
            println!(
                "     {} [{}] {} bytes, added {}",
                doc.filename,
                doc.kind.as_str(),
                doc.content.len(),
                doc.added_at.format("%Y-%m-%d")
            );
        }
    }
}

/// Parse `CATEGORY=RATE[=DESCRIPTION]`
pub fn parse_reward(text: &str) -> Result<Reward> {
    let mut parts = text.splitn(3, '=').map(str::trim);
    let category = parts.next().unwrap_or_default();
    let rate = parts.next().unwrap_or_default();
    let description = parts.next().unwrap_or_default();

    if category.is_empty() || rate.is_empty() {
        bail!(
            "Invalid reward '{}': expected CATEGORY=RATE[=DESCRIPTION]",
            text
        );
    }
    Ok(Reward::new(category, rate, description))
}

/// Parse `TITLE=DESCRIPTION`
pub fn parse_benefit(text: &str) -> Result<Benefit> {
    match text.split_once('=') {
        Some((title, description)) if !title.trim().is_empty() => {
            Ok(Benefit::new(title.trim(), description.trim()))
        }
        _ => bail!("Invalid benefit '{}': expected TITLE=DESCRIPTION", text),
    }
}

/// Read a file into a card document
pub fn read_document(path: &Path) -> Result<CardDocument> {
    let content =
        fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| anyhow::anyhow!("Not a file: {}", path.display()))?;
    let kind = DocumentKind::from_filename(&filename);
    Ok(CardDocument::new(&filename, kind, content))
}
