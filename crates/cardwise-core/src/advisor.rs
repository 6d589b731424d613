//! Card advisor
//!
//! Ties the wallet store to the AI collaborator. Each operation loads the
//! wallet, does its work, and saves when something changed. AI failures are
//! returned as-is: there is no retry and no offline fallback.

use std::collections::BTreeSet;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};

use crate::ai::{AIBackend, AIClient};
use crate::backup::{export_wallet, import_wallet};
use crate::error::{Error, Result};
use crate::models::{Card, CardDocument, DraftCard, MarketRecommendation, PurchaseContext};
use crate::reconcile::{reconcile, ReconciledRecommendation};
use crate::stacking::{detect_offers, StackingVendor};
use crate::store::WalletStore;

/// A reconciled recommendation plus the cashback portals it mentions
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Advice {
    pub recommendation: ReconciledRecommendation,
    pub offers: BTreeSet<StackingVendor>,
}

/// User-editable changes to an existing card
///
/// `None` leaves a field alone. `notes: Some("")` clears the notes.
/// Documents are appended, never replaced.
#[derive(Debug, Clone, Default)]
pub struct CardEdit {
    pub holder_name: Option<String>,
    pub nickname: Option<String>,
    pub notes: Option<String>,
    pub documents: Vec<CardDocument>,
}

/// Wallet operations backed by a store and an optional AI client
///
/// Without an AI client the wallet can still be edited, exported and
/// imported; recommendation, lookup and refresh fail with `Error::Config`.
pub struct CardAdvisor<S: WalletStore> {
    ai: Option<AIClient>,
    store: S,
}

impl<S: WalletStore> CardAdvisor<S> {
    pub fn new(ai: Option<AIClient>, store: S) -> Self {
        Self { ai, store }
    }

    pub fn ai(&self) -> Option<&AIClient> {
        self.ai.as_ref()
    }

    fn require_ai(&self) -> Result<&AIClient> {
        self.ai.as_ref().ok_or_else(|| {
            Error::Config(
                "No AI backend configured (set OPENAI_COMPATIBLE_HOST or AI_BACKEND=mock)".into(),
            )
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Ask which card to use and resolve the answer against the wallet
    pub async fn recommend(&self, purchase: &PurchaseContext) -> Result<Advice> {
        let ai = self.require_ai()?;
        let wallet = self.store.load()?;
        let candidates = wallet.recommendation_candidates();
        debug!(
            candidates = candidates.len(),
            model = %ai.model(),
            "Requesting card recommendation"
        );

        let result = ai.recommend_card(purchase, &candidates).await?;
        let recommendation = reconcile(&result, &wallet, purchase.amount.as_deref());
        let offers = detect_offers(&result);

        info!(
            card = %recommendation.card.display_name(),
            fallback = recommendation.used_fallback,
            offers = offers.len(),
            "Recommendation ready"
        );
        Ok(Advice {
            recommendation,
            offers,
        })
    }

    /// Ask for a card outside the wallet that would do better
    pub async fn find_better_card(&self, purchase: &PurchaseContext) -> Result<MarketRecommendation> {
        let ai = self.require_ai()?;
        let wallet = self.store.load()?;
        ai.find_market_card(purchase, &wallet.summarize()).await
    }

    /// Validate a draft and add it to the wallet
    pub fn add_card(&self, draft: DraftCard) -> Result<Card> {
        let card = draft.into_card()?;
        self.store.modify(|wallet| wallet.add(card.clone()))?;
        info!(id = %card.id, name = %card.display_name(), "Card added");
        Ok(card)
    }

    /// Look a card up, fill in the personal fields, and add it
    pub async fn add_card_from_lookup(
        &self,
        query: &str,
        holder_name: &str,
        nickname: &str,
    ) -> Result<Card> {
        let mut draft = self.require_ai()?.lookup_card(query).await?;
        draft.holder_name = Some(holder_name.to_string());
        draft.nickname = Some(nickname.to_string());
        self.add_card(draft)
    }

    /// Fetch current rewards and benefits for a card and stamp the refresh time
    pub async fn refresh_card(&self, id: &str) -> Result<Card> {
        let ai = self.require_ai()?;
        let card = self
            .store
            .load()?
            .find_by_id(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Card {}", id)))?;

        let query = format!("{} {}", card.bank_name, card.product_name);
        let details = ai.lookup_card(&query).await?;

        let refreshed = self.store.modify(|wallet| {
            wallet
                .refresh(
                    id,
                    details.rewards.unwrap_or_default(),
                    details.benefits.unwrap_or_default(),
                    Utc::now(),
                )
                .cloned()
        })?;
        info!(id = %id, rewards = refreshed.rewards.len(), "Card refreshed");
        Ok(refreshed)
    }

    /// Apply user edits; attached documents are appended
    pub fn edit_card(&self, id: &str, edit: CardEdit) -> Result<Card> {
        self.store.modify(|wallet| {
            let mut card = wallet
                .find_by_id(id)
                .cloned()
                .ok_or_else(|| Error::NotFound(format!("Card {}", id)))?;

            if let Some(holder_name) = edit.holder_name {
                card.holder_name = holder_name.trim().to_string();
            }
            if let Some(nickname) = edit.nickname {
                card.nickname = nickname.trim().to_string();
            }
            if let Some(notes) = edit.notes {
                card.notes = Some(notes).filter(|n| !n.trim().is_empty());
            }
            card.documents.extend(edit.documents);

            wallet.update(card).cloned()
        })
    }

    /// Remove a card; false when no card had that id
    pub fn remove_card(&self, id: &str) -> Result<bool> {
        let removed = self.store.modify(|wallet| Ok(wallet.remove(id)))?;
        debug!(id = %id, removed, "Remove card");
        Ok(removed)
    }

    /// Encode the whole wallet as a backup document
    pub fn export_backup(&self) -> Result<String> {
        let wallet = self.store.load()?;
        export_wallet(&wallet)
    }

    /// Replace the whole wallet with a backup; returns the card count
    ///
    /// The stored wallet is never read, so a damaged wallet file can still be
    /// restored.
    pub fn import_backup(&self, text: &str) -> Result<usize> {
        let imported = import_wallet(text)?;
        let count = imported.len();
        self.store.save(&imported)?;
        info!(cards = count, location = %self.store.location(), "Imported wallet backup");
        Ok(count)
    }
}
